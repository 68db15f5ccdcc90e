//! Pixel → real conversion of captured samples.
//!
//! ```text
//! t_k = (x_px_k - x_px_0) · x_scale
//! y_k = (y_origin_px - y_px_k) · y_scale + y_start_real
//! ```
//!
//! The abscissa is shifted against the first sample, so the scaled series
//! always starts at `t = 0`. The row difference is taken from the y_start
//! reference before scaling, which flips image rows (down) into real y (up).
//!
//! Scaling is not a fixed point: feeding scaled output back in applies the
//! shift a second time.

use crate::calibration::AxisScale;
use crate::point::{SamplePoint, ScaledPoint};

/// Scale captured samples into real-world `(t, y)` pairs.
///
/// Returns an empty vector for empty input.
pub fn scale_samples(samples: &[SamplePoint], scale: &AxisScale) -> Vec<ScaledPoint> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    let x0 = first.x_px;
    samples
        .iter()
        .map(|s| {
            let p = s.pixel();
            ScaledPoint::new(
                (p.x - x0) * scale.x_scale,
                (scale.y_origin_px - p.y) * scale.y_scale + scale.y_start_real,
            )
        })
        .collect()
}
