//! # wavextract
//!
//! Digitize a periodic waveform from a raster image of its plot and fit a
//! truncated Fourier series to it.
//!
//! The operator calibrates the plot's axes with four clicks, then picks the
//! curve at equally spaced vertical guide lines. Picked pixels are mapped to
//! real `(t, y)` coordinates and run through a DFT whose low harmonics are
//! written out as `a`/`b` coefficient pairs.
//!
//! ## Example
//!
//! ```no_run
//! use wavextract::{AxisBounds, DigitizeConfig, Digitizer, SceneCanvas, ScriptedSource};
//!
//! // Operator clicks, e.g. replayed from a recorded session
//! let mut source = ScriptedSource::accepts([
//!     (100.0, 900.0), // x axis start
//!     (900.0, 900.0), // x axis end
//!     (100.0, 900.0), // y axis start
//!     (100.0, 100.0), // y axis end
//!     // ... one click per guide line ...
//! ]);
//! let mut canvas = SceneCanvas::new();
//!
//! let digitizer = Digitizer::new(DigitizeConfig::default());
//! let bounds = AxisBounds::new(0.0, 10.0, 0.0, 5.0);
//! let run = digitizer
//!     .digitize(bounds, Some((1000, 1000)), &mut source, &mut canvas)
//!     .unwrap();
//! println!("DC term: {}", run.fit.coefficients.as_slice()[0].a);
//! digitizer.persist(&run).unwrap();
//! ```
//!
//! ## Pipeline
//!
//! 1. **Setup** ([`SetupForm`]): image selection and the four real-valued axis bounds
//! 2. **Calibration** ([`capture_calibration_points`]): clicks on the start and
//!    end of both axes, resolved into an [`AxisScale`]
//! 3. **Sampling** ([`capture_samples`]): one click per guide line, `n_terms + 1` in total
//! 4. **Scaling** ([`scale_samples`]): pixel rows are inverted so `y` grows upward
//! 5. **Fitting** ([`fit_fourier`]): DFT of the scaled `y` series
//! 6. **Output** ([`ResultSink`]): `fourier_params.txt`, plus rkyv artifacts in debug mode

pub mod calibration;
pub mod capture;
pub mod error;
pub mod form;
pub mod fourier;
pub mod output;
pub mod pipeline;
#[cfg(feature = "plot")]
pub mod plot;
mod point;
pub mod scaler;

pub use calibration::{AxisBounds, AxisCalibration, AxisScale};
pub use capture::{
    capture_calibration_points, capture_samples, Canvas, ConsoleSource, InputEvent, PointSource,
    SceneCanvas, ScriptedSource,
};
pub use error::{Axis, Stage, WaveError};
pub use form::SetupForm;
pub use fourier::{fit_fourier, FitConfig, FourierCoefficient, FourierCoefficientSet, FourierFit};
pub use output::{NumericArray, ResultSink};
pub use pipeline::{DigitizeConfig, DigitizeRun, Digitizer, Verbosity};
pub use point::*;
pub use scaler::scale_samples;

/// Pixel position in image coordinates: column `x`, row `y` growing downward.
pub type PixelPoint = nalgebra::Point2<f64>;
