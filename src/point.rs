//! Point types flowing through the digitizer.
//!
//! Pixel-space points come out of the capture session; scaled points are the
//! real-world signal handed to the Fourier fitter and the result sink.

use crate::PixelPoint;

/// A captured sample on the waveform.
///
/// `x_px` is the abscissa of the guide line the sample belongs to, not the
/// abscissa of the click. Only the guide index and the clicked row carry
/// information, so samples are uniformly spaced in index space by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Ordinal position along the calibrated x-axis (0..N-1).
    pub index: usize,
    /// Guide-line column in pixels. +X points right.
    pub x_px: f64,
    /// Clicked row in pixels. +Y points down.
    pub y_px: f64,
    /// Column the operator actually clicked. Persisted with the raw
    /// samples, never used for scaling.
    pub click_x_px: f64,
}

impl SamplePoint {
    /// Pixel position used for scaling (guide column, clicked row).
    pub fn pixel(&self) -> PixelPoint {
        PixelPoint::new(self.x_px, self.y_px)
    }

    /// Where the operator actually clicked.
    pub fn click(&self) -> PixelPoint {
        PixelPoint::new(self.click_x_px, self.y_px)
    }
}

/// A sample in real-world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPoint {
    /// Abscissa, shifted so the first sample sits at `t = 0`.
    pub t: f64,
    /// Ordinate in the units of the calibrated y-axis.
    pub y: f64,
}

impl ScaledPoint {
    pub fn new(t: f64, y: f64) -> Self {
        Self { t, y }
    }
}
