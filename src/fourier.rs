//! Truncated Fourier series fitting of scaled samples.
//!
//! The samples are treated as one period of a uniformly sampled signal in
//! index space. A forward FFT of the ordinates gives the bins `F_n`, from
//! which the trigonometric coefficients follow as
//!
//! ```text
//! a_n =  2 · Re(F_n) / N
//! b_n = -2 · Im(F_n) / N
//! ```
//!
//! The series is reconstructed against the captured abscissas with the
//! fundamental period `T` taken as the last sample's `t`:
//!
//! ```text
//! series(t) = a_0 / 2 + Σ_{n=1}^{K-1} [a_n · cos(2π·n·t/T) + b_n · sin(2π·n·t/T)]
//! ```
//!
//! Keep `K` under `N / 2`; above that the harmonics alias and the fit degrades.

use std::f64::consts::TAU;

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::{debug, info, warn};

use crate::error::{Result, WaveError};
use crate::point::ScaledPoint;

/// Configuration for the Fourier fit.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Number of (a_n, b_n) pairs to keep, including the DC pair. Default 21.
    pub n_coeff: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self { n_coeff: 21 }
    }
}

/// One harmonic of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierCoefficient {
    /// Cosine amplitude.
    pub a: f64,
    /// Sine amplitude. Unused for the DC term.
    pub b: f64,
}

/// Ordered harmonics `0..K`. Immutable once fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierCoefficientSet {
    coeffs: Vec<FourierCoefficient>,
}

impl FourierCoefficientSet {
    pub fn new(coeffs: Vec<FourierCoefficient>) -> Self {
        Self { coeffs }
    }

    /// Build from `[a, b]` rows, e.g. a loaded debug artifact.
    pub fn from_pairs(pairs: impl IntoIterator<Item = [f64; 2]>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|[a, b]| FourierCoefficient { a, b })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn get(&self, n: usize) -> Option<&FourierCoefficient> {
        self.coeffs.get(n)
    }

    pub fn as_slice(&self) -> &[FourierCoefficient] {
        &self.coeffs
    }

    pub fn iter(&self) -> impl Iterator<Item = &FourierCoefficient> {
        self.coeffs.iter()
    }

    /// Evaluate the truncated series at `t` for fundamental period `period`.
    pub fn evaluate(&self, t: f64, period: f64) -> f64 {
        let Some(dc) = self.coeffs.first() else {
            return 0.0;
        };
        let w = TAU / period * t;
        self.coeffs
            .iter()
            .enumerate()
            .skip(1)
            .fold(dc.a / 2.0, |acc, (n, c)| {
                let (s, co) = (w * n as f64).sin_cos();
                acc + c.a * co + c.b * s
            })
    }

    /// Evaluate the series on `n` evenly spaced points over `[0, period]`,
    /// using `period` as the fundamental.
    pub fn sample_curve(&self, period: f64, n: usize) -> Vec<ScaledPoint> {
        let step = if n > 1 { period / (n - 1) as f64 } else { 0.0 };
        (0..n)
            .map(|i| {
                let t = i as f64 * step;
                ScaledPoint::new(t, self.evaluate(t, period))
            })
            .collect()
    }
}

/// Result of fitting a series to a sampled curve.
#[derive(Debug, Clone)]
pub struct FourierFit {
    pub coefficients: FourierCoefficientSet,
    /// Fundamental period: the last captured `t`.
    pub period: f64,
    /// Reconstructed series at every sample abscissa.
    pub series: Vec<f64>,
    /// RMS difference between samples and reconstruction.
    pub rmse: f64,
}

/// Fit `config.n_coeff` harmonics to the scaled samples.
///
/// Fails with [`WaveError::EmptySeries`] when there are no samples or when the
/// captured span is zero (a single sample, or all samples on one abscissa).
pub fn fit_fourier(points: &[ScaledPoint], config: &FitConfig) -> Result<FourierFit> {
    let n_bins = points.len();
    let period = points.last().map(|p| p.t).unwrap_or(0.0);
    if n_bins == 0 || period == 0.0 || !period.is_finite() {
        return Err(WaveError::EmptySeries {
            samples: n_bins,
            period,
        });
    }
    if 2 * config.n_coeff > n_bins {
        warn!(
            "{} coefficients from {} samples is below the Nyquist limit; harmonics will alias",
            config.n_coeff, n_bins
        );
    }
    info!("calculating fourier coefficients");

    let mut buffer: Vec<Complex<f64>> = points.iter().map(|p| Complex::new(p.y, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n_bins).process(&mut buffer);

    // The DFT is N-periodic, so harmonics past the last bin read their alias.
    let norm = 2.0 / n_bins as f64;
    let coefficients = FourierCoefficientSet::new(
        (0..config.n_coeff)
            .map(|n| {
                let bin = buffer[n % n_bins];
                FourierCoefficient {
                    a: bin.re * norm,
                    b: -bin.im * norm,
                }
            })
            .collect(),
    );

    let series: Vec<f64> = points
        .iter()
        .map(|p| coefficients.evaluate(p.t, period))
        .collect();
    let rmse = (points
        .iter()
        .zip(&series)
        .map(|(p, s)| (p.y - s) * (p.y - s))
        .sum::<f64>()
        / n_bins as f64)
        .sqrt();

    debug!(
        "fitted {} coefficients to {} samples, period {}",
        coefficients.len(),
        n_bins,
        period
    );
    info!("Fourier coefficients calculated, RMS residual {:.6}", rmse);

    Ok(FourierFit {
        coefficients,
        period,
        series,
        rmse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(ys: impl IntoIterator<Item = f64>, dt: f64) -> Vec<ScaledPoint> {
        ys.into_iter()
            .enumerate()
            .map(|(k, y)| ScaledPoint::new(k as f64 * dt, y))
            .collect()
    }

    #[test]
    fn test_pure_sinusoid_recovery() {
        let n = 50;
        let (amp_a, amp_b) = (1.75, -0.6);
        let points = uniform(
            (0..n).map(|k| {
                let phase = TAU * k as f64 / n as f64;
                amp_a * phase.cos() + amp_b * phase.sin()
            }),
            0.02,
        );
        let fit = fit_fourier(&points, &FitConfig::default()).unwrap();
        assert_eq!(fit.coefficients.len(), 21);

        let tol = 1e-9 * amp_a.abs().max(amp_b.abs());
        let c1 = fit.coefficients.get(1).unwrap();
        assert!((c1.a - amp_a).abs() <= 1e-9 * amp_a.abs(), "a_1 = {}", c1.a);
        assert!((c1.b - amp_b).abs() <= 1e-9 * amp_b.abs(), "b_1 = {}", c1.b);
        for (n, c) in fit.coefficients.iter().enumerate() {
            if n == 1 {
                continue;
            }
            assert!(c.a.abs() < tol, "a_{} = {}", n, c.a);
            assert!(c.b.abs() < tol, "b_{} = {}", n, c.b);
        }
    }

    #[test]
    fn test_constant_signal_is_dc() {
        let points = uniform(std::iter::repeat(3.25).take(50), 0.1);
        let fit = fit_fourier(&points, &FitConfig::default()).unwrap();
        let dc = fit.coefficients.get(0).unwrap();
        assert!((dc.a - 6.5).abs() < 1e-12);
        assert!(dc.b.abs() < 1e-12);
        assert!(fit.rmse < 1e-12);
        for c in fit.coefficients.iter().skip(1) {
            assert!(c.a.abs() < 1e-12 && c.b.abs() < 1e-12);
        }
    }

    #[test]
    fn test_period_is_last_t() {
        let points = uniform([0.0, 1.0, 0.0, -1.0, 0.0, 1.0], 0.5);
        let fit = fit_fourier(&points, &FitConfig { n_coeff: 3 }).unwrap();
        assert_eq!(fit.period, 2.5);
        assert_eq!(fit.series.len(), points.len());
    }

    #[test]
    fn test_harmonics_alias_past_last_bin() {
        let points = uniform([1.0, 4.0, -2.0, 0.5], 1.0);
        let fit = fit_fourier(&points, &FitConfig { n_coeff: 6 }).unwrap();
        let c = fit.coefficients.as_slice();
        assert_eq!(c[4], c[0]);
        assert_eq!(c[5], c[1]);
    }

    #[test]
    fn test_empty_and_single_sample() {
        assert!(matches!(
            fit_fourier(&[], &FitConfig::default()),
            Err(WaveError::EmptySeries { samples: 0, .. })
        ));
        let single = [ScaledPoint::new(0.0, 2.0)];
        assert!(matches!(
            fit_fourier(&single, &FitConfig::default()),
            Err(WaveError::EmptySeries { samples: 1, .. })
        ));
    }

    #[test]
    fn test_evaluate_known_series() {
        let set = FourierCoefficientSet::from_pairs([[2.0, 0.0], [0.0, 1.0]]);
        assert!((set.evaluate(0.0, 4.0) - 1.0).abs() < 1e-12);
        assert!((set.evaluate(1.0, 4.0) - 2.0).abs() < 1e-12);
        assert!((set.evaluate(3.0, 4.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_curve_spans_period() {
        let set = FourierCoefficientSet::from_pairs([[1.0, 0.0], [0.5, 0.0]]);
        let curve = set.sample_curve(0.8, 1000);
        assert_eq!(curve.len(), 1000);
        assert_eq!(curve[0].t, 0.0);
        assert!((curve[999].t - 0.8).abs() < 1e-12);
        // cos term is back at its start value after one full period.
        assert!((curve[999].y - curve[0].y).abs() < 1e-9);
    }
}
