//! Error taxonomy for the digitizing pipeline.
//!
//! Errors fall into two groups:
//!
//! - **Recoverable** form errors ([`WaveError::ImageLoad`], [`WaveError::MissingField`],
//!   [`WaveError::Parse`]) reset the setup form to its last safe checkpoint and ask the
//!   operator to try again.
//! - **Fatal** errors (arithmetic degeneracies, abandoned sessions, I/O) abort the
//!   run and carry enough context to tell which stage failed and on which inputs.

use std::path::PathBuf;

/// Which calibrated axis an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Pipeline stage, used to attribute abandonment and numeric failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Calibration,
    Sampling,
    Fitting,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Calibration => "calibration capture",
            Stage::Sampling => "sample capture",
            Stage::Fitting => "fourier fitting",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WaveError {
    #[error("could not open image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("all fields are mandatory ({field} is empty)")]
    MissingField { field: &'static str },
    #[error("{field} must be a number, got {value:?}")]
    Parse { field: &'static str, value: String },
    #[error(
        "degenerate {axis} calibration: pixel span {pixel_span} maps to real span {real_span}"
    )]
    DegenerateCalibration {
        axis: Axis,
        pixel_span: f64,
        real_span: f64,
    },
    #[error("cannot fit a series to {samples} sample(s) spanning t = {period}")]
    EmptySeries { samples: usize, period: f64 },
    #[error("input closed during {stage}")]
    SessionAbandoned { stage: Stage },
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {path:?} is invalid: {reason}")]
    Artifact { path: PathBuf, reason: String },
}

impl WaveError {
    /// Returns `true` for errors the setup form recovers from by asking again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WaveError::ImageLoad { .. } | WaveError::MissingField { .. } | WaveError::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(WaveError::MissingField { field: "x start" }.is_recoverable());
        assert!(WaveError::Parse {
            field: "y end",
            value: "abc".into()
        }
        .is_recoverable());
        assert!(!WaveError::EmptySeries {
            samples: 1,
            period: 0.0
        }
        .is_recoverable());
        assert!(!WaveError::SessionAbandoned {
            stage: Stage::Sampling
        }
        .is_recoverable());
    }

    #[test]
    fn test_degenerate_message_names_axis() {
        let e = WaveError::DegenerateCalibration {
            axis: Axis::Y,
            pixel_span: 0.0,
            real_span: 5.0,
        };
        let msg = e.to_string();
        assert!(msg.contains("degenerate y calibration"), "got {msg}");
    }
}
