//! PNG rendering of fits and of the reviewed capture view.
//!
//! Both outputs are validation aids only. Nothing here gates the numeric
//! result, so callers usually log a failure and carry on.
//!
//! Requires the `plot` feature to be enabled.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use plotters::prelude::*;
use tracing::{info, warn};

use crate::capture::{Annotation, Color as CanvasColor, MarkerStyle, SceneCanvas};
use crate::point::ScaledPoint;

/// Configuration for fit plots.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Image width in pixels. Default 600.
    pub width: u32,
    /// Image height in pixels. Default 600.
    pub height: u32,
    /// Chart caption.
    pub title: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            title: "Fourier series vs. captured samples".to_string(),
        }
    }
}

fn rgb(c: CanvasColor) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Plot the captured samples as dots and a fitted curve as a line.
pub fn plot_fit(
    samples: &[ScaledPoint],
    curve: &[ScaledPoint],
    path: &Path,
    config: &PlotConfig,
) -> Result<()> {
    anyhow::ensure!(!samples.is_empty() || !curve.is_empty(), "nothing to plot");

    let (mut t_min, mut t_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in samples.iter().chain(curve) {
        t_min = t_min.min(p.t);
        t_max = t_max.max(p.t);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    let t_pad = ((t_max - t_min) * 0.05).max(1e-9);
    let y_pad = ((y_max - y_min) * 0.1).max(1e-9);

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (t_min - t_pad)..(t_max + t_pad),
            (y_min - y_pad)..(y_max + y_pad),
        )?;

    chart
        .configure_mesh()
        .x_desc("t")
        .y_desc("y")
        .x_label_formatter(&|x| format!("{x:.2}"))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            curve.iter().map(|p| (p.t, p.y)),
            ShapeStyle::from(&rgb(CanvasColor::BLUE)).stroke_width(1),
        ))?
        .label("fitted series")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], rgb(CanvasColor::BLUE)));

    chart
        .draw_series(
            samples
                .iter()
                .map(|p| Circle::new((p.t, p.y), 2, BLACK.filled())),
        )?
        .label("points taken")
        .legend(|(x, y)| Circle::new((x + 10, y), 2, BLACK.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write plot: {}", path.display()))?;
    info!("fit plot saved to {}", path.display());
    Ok(())
}

/// Draw the scene's annotations and title over the source image.
pub fn render_capture_view(image: &RgbImage, scene: &SceneCanvas, path: &Path) -> Result<()> {
    let (width, height) = image.dimensions();
    let mut buf = image.as_raw().clone();
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        let (w, h) = (width as i32, height as i32);

        for annotation in scene.annotations() {
            match *annotation {
                Annotation::Marker { at, color, style } => {
                    let center = (at.x.round() as i32, at.y.round() as i32);
                    match style {
                        MarkerStyle::Dot => {
                            root.draw(&Circle::new(center, 6, rgb(color).mix(0.5).filled()))?
                        }
                        MarkerStyle::Cross => root.draw(&Cross::new(
                            center,
                            5,
                            ShapeStyle::from(&rgb(color)).stroke_width(2),
                        ))?,
                    }
                }
                Annotation::HLine { y, color, width } => {
                    let y = y.round() as i32;
                    root.draw(&PathElement::new(
                        vec![(0, y), (w - 1, y)],
                        ShapeStyle::from(&rgb(color)).stroke_width(width.max(1.0) as u32),
                    ))?;
                }
                Annotation::VLine { x, color, width } => {
                    let x = x.round() as i32;
                    root.draw(&PathElement::new(
                        vec![(x, 0), (x, h - 1)],
                        ShapeStyle::from(&rgb(color)).stroke_width(width.max(1.0) as u32),
                    ))?;
                }
            }
        }

        if !scene.title().is_empty() {
            let style = ("sans-serif", 18).into_font().color(&rgb(scene.title_color()));
            // Text needs a system font; the annotations are still worth keeping without it.
            if let Err(e) = root.draw(&Text::new(scene.title(), (10, 10), style)) {
                warn!("could not draw the view title: {}", e);
            }
        }
        root.present()?;
    }

    let view = RgbImage::from_raw(width, height, buf)
        .context("rendered view does not match the image size")?;
    view.save(path)
        .with_context(|| format!("Failed to write capture view: {}", path.display()))?;
    info!("capture view saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Canvas;
    use crate::PixelPoint;

    #[test]
    fn test_render_capture_view_draws_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.png");
        let image = RgbImage::from_pixel(40, 30, image::Rgb([255, 255, 255]));

        let mut scene = SceneCanvas::new();
        scene.add(Annotation::VLine {
            x: 20.0,
            color: CanvasColor::RED,
            width: 1.0,
        });
        scene.add(Annotation::Marker {
            at: PixelPoint::new(5.0, 5.0),
            color: CanvasColor::ORANGE,
            style: MarkerStyle::Cross,
        });
        render_capture_view(&image, &scene, &path).unwrap();

        let view = image::open(&path).unwrap().to_rgb8();
        assert_eq!(view.dimensions(), (40, 30));
        assert_eq!(view.get_pixel(20, 15).0, [214, 39, 40]);
        assert_eq!(view.get_pixel(35, 25).0, [255, 255, 255]);
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn test_plot_fit_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.png");
        let samples: Vec<ScaledPoint> = (0..20)
            .map(|k| ScaledPoint::new(k as f64 * 0.1, (k as f64 * 0.3).sin()))
            .collect();
        plot_fit(&samples, &samples, &path, &PlotConfig::default()).unwrap();
        assert!(path.exists());
    }
}
