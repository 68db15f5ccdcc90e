//! Re-plot a fitted series from the debug artifacts of an earlier run.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wavextract::output::{COEFFICIENT_ARTIFACT, SCALED_ARTIFACT};
use wavextract::plot::{plot_fit, PlotConfig};
use wavextract::{FourierCoefficientSet, NumericArray, ScaledPoint};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a Fourier fit from debug artifacts")]
struct Args {
    /// Directory holding fourier_coeff.rkyv and scaled_coords.rkyv
    dir: PathBuf,

    /// End of the evaluation interval; the series is plotted over [0, t_end]
    t_end: f64,

    /// Number of evaluation points
    #[arg(long, default_value_t = 1000)]
    points: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    ensure!(
        args.t_end.is_finite() && args.t_end > 0.0,
        "t_end must be positive, got {}",
        args.t_end
    );

    let coeff_path = args.dir.join(COEFFICIENT_ARTIFACT);
    let coefficients = FourierCoefficientSet::from_pairs(
        NumericArray::load_rows(&coeff_path)
            .with_context(|| format!("Failed to load coefficients: {}", coeff_path.display()))?,
    );
    let scaled_path = args.dir.join(SCALED_ARTIFACT);
    let samples: Vec<ScaledPoint> = NumericArray::load_rows(&scaled_path)
        .with_context(|| format!("Failed to load scaled points: {}", scaled_path.display()))?
        .into_iter()
        .map(|[t, y]| ScaledPoint::new(t, y))
        .collect();
    info!(
        "loaded {} coefficients and {} samples",
        coefficients.len(),
        samples.len()
    );

    let curve = coefficients.sample_curve(args.t_end, args.points);
    let out = args.dir.join("replay_fit.png");
    plot_fit(
        &samples,
        &curve,
        &out,
        &PlotConfig {
            title: "Replayed Fourier series".to_string(),
            ..Default::default()
        },
    )
    .context("Failed to plot the replayed series")?;
    Ok(())
}
