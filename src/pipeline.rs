//! End-to-end digitizing pipeline.
//!
//! ```text
//! calibration capture → resolve scales → sample capture → scale → fit → persist
//! ```
//!
//! Scales are resolved as soon as the fourth calibration click is in, so a
//! degenerate calibration fails before the operator starts sampling.

use std::path::PathBuf;

use tracing::{error, info};

use crate::calibration::{AxisBounds, AxisCalibration, AxisScale};
use crate::capture::{capture_calibration_points, capture_samples, Canvas, PointSource};
use crate::error::{Result, Stage};
use crate::fourier::{fit_fourier, FitConfig, FourierFit};
use crate::output::ResultSink;
use crate::point::{SamplePoint, ScaledPoint};
use crate::scaler::scale_samples;

/// Diagnostic verbosity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `info` and above.
    #[default]
    Normal,
    /// Everything down to per-step `debug` traces.
    Trace,
}

impl Verbosity {
    /// `tracing_subscriber` filter directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Normal => "info",
            Verbosity::Trace => "debug",
        }
    }
}

/// Configuration for a digitizing run.
#[derive(Debug, Clone)]
pub struct DigitizeConfig {
    /// Number of guide-line intervals; `n_terms + 1` samples are captured.
    /// Default: 49
    pub n_terms: usize,
    /// Fourier fit parameters. Default: 21 coefficients.
    pub fit: FitConfig,
    /// Where results are written. Default: `./output`
    pub output_dir: PathBuf,
    /// Write the intermediate point sets as debug artifacts. Default: false
    pub debug: bool,
    /// Default: [`Verbosity::Normal`]
    pub verbosity: Verbosity,
}

impl Default for DigitizeConfig {
    fn default() -> Self {
        Self {
            n_terms: 49,
            fit: FitConfig::default(),
            output_dir: PathBuf::from("./output"),
            debug: false,
            verbosity: Verbosity::Normal,
        }
    }
}

impl DigitizeConfig {
    /// Defaults, with the debug flag selecting trace verbosity and artifacts.
    pub fn from_debug_flag(debug: bool) -> Self {
        Self {
            debug,
            verbosity: if debug {
                Verbosity::Trace
            } else {
                Verbosity::Normal
            },
            ..Default::default()
        }
    }
}

/// Everything one pass of the pipeline produced.
#[derive(Debug, Clone)]
pub struct DigitizeRun {
    pub calibration: AxisCalibration,
    pub scale: AxisScale,
    pub samples: Vec<SamplePoint>,
    pub scaled: Vec<ScaledPoint>,
    pub fit: FourierFit,
}

#[derive(Debug, Clone, Default)]
pub struct Digitizer {
    config: DigitizeConfig,
}

impl Digitizer {
    pub fn new(config: DigitizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DigitizeConfig {
        &self.config
    }

    /// Run capture, scaling and fitting.
    ///
    /// `frame` is the image size used to reject clicks outside the image.
    /// Blocks on `source` for every operator action.
    pub fn digitize<S: PointSource, C: Canvas>(
        &self,
        bounds: AxisBounds,
        frame: Option<(u32, u32)>,
        source: &mut S,
        canvas: &mut C,
    ) -> Result<DigitizeRun> {
        info!("taking in graphical input");
        let clicks = capture_calibration_points(source, canvas, frame)?;
        let calibration = AxisCalibration::from_clicks(clicks, bounds);
        let scale = calibration
            .resolve()
            .inspect_err(|e| error!("{} failed on {:?}: {}", Stage::Calibration, calibration, e))?;

        let samples = capture_samples(
            self.config.n_terms,
            calibration.x_span_px(),
            calibration.x_start_px.x,
            source,
            canvas,
            frame,
        )?;

        let scaled = scale_samples(&samples, &scale);
        let fit = fit_fourier(&scaled, &self.config.fit).inspect_err(|e| {
            error!("{} failed on {} scaled samples: {}", Stage::Fitting, scaled.len(), e)
        })?;

        Ok(DigitizeRun {
            calibration,
            scale,
            samples,
            scaled,
            fit,
        })
    }

    /// Write the run's results to the configured output directory.
    pub fn persist(&self, run: &DigitizeRun) -> Result<ResultSink> {
        let sink = ResultSink::new(&self.config.output_dir, self.config.debug)?;
        sink.persist(run)?;
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_config() {
        let normal = DigitizeConfig::from_debug_flag(false);
        assert_eq!(normal.verbosity, Verbosity::Normal);
        assert!(!normal.debug);
        assert_eq!(normal.n_terms, 49);
        assert_eq!(normal.fit.n_coeff, 21);

        let debug = DigitizeConfig::from_debug_flag(true);
        assert_eq!(debug.verbosity.filter_directive(), "debug");
        assert!(debug.debug);
    }
}
