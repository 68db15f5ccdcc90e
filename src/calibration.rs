//! Axis calibration: from four reference clicks and four real bounds to a
//! pixel → real transform.
//!
//! # Coordinate conventions
//!
//! - **Pixel coordinates**: origin at the top-left pixel, +X right, +Y down.
//! - **Real coordinates**: the units the operator typed for each axis, +y up.
//!
//! The resolver only produces the magnitude ratios between pixel distance and
//! real distance. The row inversion and the origin shift are applied by the
//! [scaler](crate::scaler).

use tracing::debug;

use crate::error::{Axis, Result, WaveError};
use crate::PixelPoint;

/// Real-world values of the four axis references, as typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
}

impl AxisBounds {
    pub fn new(x_start: f64, x_end: f64, y_start: f64, y_end: f64) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    pub fn x_range(&self) -> f64 {
        self.x_end - self.x_start
    }

    pub fn y_range(&self) -> f64 {
        self.y_end - self.y_start
    }
}

/// The four calibration clicks plus the real bounds they stand for.
///
/// Built once after the fourth calibration click is accepted and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCalibration {
    pub x_start_px: PixelPoint,
    pub x_end_px: PixelPoint,
    pub y_start_px: PixelPoint,
    pub y_end_px: PixelPoint,
    pub bounds: AxisBounds,
}

/// Resolved pixel → real ratios with their origin references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    /// Real x units per pixel column.
    pub x_scale: f64,
    /// Real y units per pixel row.
    pub y_scale: f64,
    /// Column of the x_start reference click.
    pub x_origin_px: f64,
    /// Row of the y_start reference click.
    pub y_origin_px: f64,
    /// Real value at `y_origin_px`.
    pub y_start_real: f64,
}

impl AxisCalibration {
    /// Build a calibration from the clicks in capture order
    /// `[x_start, x_end, y_start, y_end]`.
    pub fn from_clicks(clicks: [PixelPoint; 4], bounds: AxisBounds) -> Self {
        let [x_start_px, x_end_px, y_start_px, y_end_px] = clicks;
        Self {
            x_start_px,
            x_end_px,
            y_start_px,
            y_end_px,
            bounds,
        }
    }

    /// The clicks in capture order.
    pub fn clicks(&self) -> [PixelPoint; 4] {
        [self.x_start_px, self.x_end_px, self.y_start_px, self.y_end_px]
    }

    /// Horizontal pixel distance between the x references.
    pub fn x_span_px(&self) -> f64 {
        (self.x_end_px.x - self.x_start_px.x).abs()
    }

    /// Vertical pixel distance between the y references.
    pub fn y_span_px(&self) -> f64 {
        (self.y_end_px.y - self.y_start_px.y).abs()
    }

    /// Resolve the pixel → real ratios.
    ///
    /// ```text
    /// x_scale = (x_end_real - x_start_real) / |x_end_px.x - x_start_px.x|
    /// y_scale = (y_end_real - y_start_real) / |y_end_px.y - y_start_px.y|
    /// ```
    ///
    /// Fails with [`WaveError::DegenerateCalibration`] when a reference pair
    /// coincides along its axis or when a real range is zero.
    pub fn resolve(&self) -> Result<AxisScale> {
        let x_scale = axis_ratio(Axis::X, self.x_span_px(), self.bounds.x_range())?;
        let y_scale = axis_ratio(Axis::Y, self.y_span_px(), self.bounds.y_range())?;
        debug!(
            "real x range: {}, real y range: {}, x_scale: {}, y_scale: {}",
            self.bounds.x_range(),
            self.bounds.y_range(),
            x_scale,
            y_scale
        );
        Ok(AxisScale {
            x_scale,
            y_scale,
            x_origin_px: self.x_start_px.x,
            y_origin_px: self.y_start_px.y,
            y_start_real: self.bounds.y_start,
        })
    }
}

fn axis_ratio(axis: Axis, pixel_span: f64, real_span: f64) -> Result<f64> {
    let ratio = real_span / pixel_span;
    if pixel_span == 0.0 || real_span == 0.0 || !ratio.is_finite() {
        return Err(WaveError::DegenerateCalibration {
            axis,
            pixel_span,
            real_span,
        });
    }
    Ok(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_calibration(bounds: AxisBounds) -> AxisCalibration {
        AxisCalibration::from_clicks(
            [
                PixelPoint::new(100.0, 900.0),
                PixelPoint::new(900.0, 900.0),
                PixelPoint::new(100.0, 900.0),
                PixelPoint::new(100.0, 100.0),
            ],
            bounds,
        )
    }

    #[test]
    fn test_resolve_reference_axes() {
        let cal = reference_calibration(AxisBounds::new(0.0, 10.0, 0.0, 5.0));
        let scale = cal.resolve().unwrap();
        assert!((scale.x_scale - 10.0 / 800.0).abs() < 1e-15);
        assert!((scale.y_scale - 5.0 / 800.0).abs() < 1e-15);
        assert_eq!(scale.x_origin_px, 100.0);
        assert_eq!(scale.y_origin_px, 900.0);
        assert_eq!(scale.y_start_real, 0.0);
    }

    #[test]
    fn test_increasing_bounds_give_positive_scales() {
        // Click order within each pair must not matter for the magnitude.
        let pairs = [
            ((10.0, 480.0), (600.0, 30.0)),
            ((600.0, 30.0), (10.0, 480.0)),
            ((0.5, 1.0), (1.5, 0.0)),
            ((1023.0, 2.0), (3.0, 1021.0)),
        ];
        for &((x0, y0), (x1, y1)) in &pairs {
            let cal = AxisCalibration::from_clicks(
                [
                    PixelPoint::new(x0, y0),
                    PixelPoint::new(x1, y0),
                    PixelPoint::new(x0, y0),
                    PixelPoint::new(x0, y1),
                ],
                AxisBounds::new(-2.0, 3.5, 1e-3, 2e-3),
            );
            let scale = cal.resolve().unwrap();
            assert!(scale.x_scale > 0.0, "x_scale {} for {:?}", scale.x_scale, (x0, x1));
            assert!(scale.y_scale > 0.0, "y_scale {} for {:?}", scale.y_scale, (y0, y1));
        }
    }

    #[test]
    fn test_coincident_x_references() {
        let cal = AxisCalibration::from_clicks(
            [
                PixelPoint::new(100.0, 900.0),
                PixelPoint::new(100.0, 500.0),
                PixelPoint::new(100.0, 900.0),
                PixelPoint::new(100.0, 100.0),
            ],
            AxisBounds::new(0.0, 10.0, 0.0, 5.0),
        );
        match cal.resolve() {
            Err(WaveError::DegenerateCalibration { axis, pixel_span, .. }) => {
                assert_eq!(axis, Axis::X);
                assert_eq!(pixel_span, 0.0);
            }
            other => panic!("expected degenerate x calibration, got {:?}", other),
        }
    }

    #[test]
    fn test_coincident_y_references() {
        let cal = AxisCalibration::from_clicks(
            [
                PixelPoint::new(100.0, 900.0),
                PixelPoint::new(900.0, 900.0),
                PixelPoint::new(100.0, 300.0),
                PixelPoint::new(700.0, 300.0),
            ],
            AxisBounds::new(0.0, 10.0, 0.0, 5.0),
        );
        assert!(matches!(
            cal.resolve(),
            Err(WaveError::DegenerateCalibration { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn test_zero_real_range() {
        let cal = reference_calibration(AxisBounds::new(3.0, 3.0, 0.0, 5.0));
        assert!(matches!(
            cal.resolve(),
            Err(WaveError::DegenerateCalibration { axis: Axis::X, .. })
        ));
    }
}
