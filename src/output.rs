//! Result sink: coefficient text file and debug artifacts.
//!
//! `fourier_params.txt` holds one `a`/`b` line pair per harmonic:
//!
//! ```text
//! Fourier Coefficients:
//! a00in= 0.98
//! b00in= 0
//! a01in= -0.41
//! ...
//! ```
//!
//! In debug mode the intermediate point sets are also written as rkyv-encoded
//! [`NumericArray`]s so a fit can be inspected or replayed later.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rkyv::{Archive, Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, WaveError};
use crate::fourier::FourierCoefficientSet;
use crate::pipeline::DigitizeRun;

pub const PARAMS_FILE: &str = "fourier_params.txt";
pub const CALIBRATION_ARTIFACT: &str = "calibration_points.rkyv";
pub const UNSCALED_ARTIFACT: &str = "unscaled_coords.rkyv";
pub const SCALED_ARTIFACT: &str = "scaled_coords.rkyv";
pub const COEFFICIENT_ARTIFACT: &str = "fourier_coeff.rkyv";

/// Row-major `f64` array with its shape.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct NumericArray {
    pub shape: Vec<u32>,
    pub data: Vec<f64>,
}

impl NumericArray {
    /// Build an `N × 2` array.
    pub fn from_rows(rows: impl IntoIterator<Item = [f64; 2]>) -> Self {
        let data: Vec<f64> = rows.into_iter().flatten().collect();
        Self {
            shape: vec![(data.len() / 2) as u32, 2],
            data,
        }
    }

    /// Rows of an `N × 2` array, or `None` for any other shape.
    pub fn rows(&self) -> Option<Vec<[f64; 2]>> {
        match self.shape.as_slice() {
            [n, 2] if self.data.len() == *n as usize * 2 => Some(
                self.data
                    .chunks_exact(2)
                    .map(|c| [c[0], c[1]])
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self).map_err(|e| WaveError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, &bytes).map_err(|source| WaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| WaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);
        let array = rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned).map_err(|e| {
            WaveError::Artifact {
                path: path.to_path_buf(),
                reason: format!("rkyv deserialization failed: {}", e),
            }
        })?;
        let expected: usize = array.shape.iter().map(|&d| d as usize).product();
        if expected != array.data.len() {
            return Err(WaveError::Artifact {
                path: path.to_path_buf(),
                reason: format!(
                    "shape {:?} does not match {} values",
                    array.shape,
                    array.data.len()
                ),
            });
        }
        Ok(array)
    }

    /// Load an `N × 2` artifact as rows.
    pub fn load_rows(path: &Path) -> Result<Vec<[f64; 2]>> {
        let array = Self::load(path)?;
        array.rows().ok_or_else(|| WaveError::Artifact {
            path: path.to_path_buf(),
            reason: format!("expected an N x 2 array, got shape {:?}", array.shape),
        })
    }
}

/// Render the coefficient file contents.
pub fn format_coefficients(coefficients: &FourierCoefficientSet) -> String {
    let mut out = String::from("Fourier Coefficients: \n");
    for (i, c) in coefficients.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = write!(out, "a{:02}in= {}\nb{:02}in= {}\n", i, c.a, i, c.b);
    }
    out
}

/// Writes pipeline results under an output directory.
#[derive(Debug, Clone)]
pub struct ResultSink {
    dir: PathBuf,
    debug: bool,
}

impl ResultSink {
    /// Create the sink, creating `dir` if needed. `debug` enables artifacts.
    ///
    /// The directory only appears once a run is persisted, so a run that
    /// fails or is abandoned leaves nothing behind.
    pub fn new(dir: impl Into<PathBuf>, debug: bool) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| WaveError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, debug })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn write_coefficients(&self, coefficients: &FourierCoefficientSet) -> Result<PathBuf> {
        info!("saving coefficients to file");
        let path = self.path(PARAMS_FILE);
        std::fs::write(&path, format_coefficients(coefficients)).map_err(|source| {
            WaveError::Io {
                path: path.clone(),
                source,
            }
        })?;
        Ok(path)
    }

    /// Write the four debug artifacts. Does nothing outside debug mode.
    pub fn write_debug_artifacts(&self, run: &DigitizeRun) -> Result<()> {
        if !self.debug {
            return Ok(());
        }
        debug!("saving calibration points to {}", CALIBRATION_ARTIFACT);
        NumericArray::from_rows(run.calibration.clicks().iter().map(|p| [p.x, p.y]))
            .save(&self.path(CALIBRATION_ARTIFACT))?;
        debug!("saving raw clicks to {}", UNSCALED_ARTIFACT);
        NumericArray::from_rows(run.samples.iter().map(|s| s.click()).map(|p| [p.x, p.y]))
            .save(&self.path(UNSCALED_ARTIFACT))?;
        debug!("saving scaled coordinates to {}", SCALED_ARTIFACT);
        NumericArray::from_rows(run.scaled.iter().map(|p| [p.t, p.y]))
            .save(&self.path(SCALED_ARTIFACT))?;
        debug!("saving Fourier coefficients to {}", COEFFICIENT_ARTIFACT);
        NumericArray::from_rows(run.fit.coefficients.iter().map(|c| [c.a, c.b]))
            .save(&self.path(COEFFICIENT_ARTIFACT))?;
        Ok(())
    }

    /// Write the coefficient file and, in debug mode, the artifacts.
    pub fn persist(&self, run: &DigitizeRun) -> Result<()> {
        self.write_coefficients(&run.fit.coefficients)?;
        self.write_debug_artifacts(run)?;
        info!("file(s) saved successfully to {}", self.dir.display());
        Ok(())
    }
}
