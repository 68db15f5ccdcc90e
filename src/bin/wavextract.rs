//! Digitize a waveform plot from the console.
//!
//! Axis bounds and clicks are read line by line from stdin. A click is
//! `<x> <y>` in image pixels, `undo` removes the last point and `done` closes
//! the finished view. Results are written under `./output/`.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wavextract::capture::{Annotation, AnnotationId, Color};
use wavextract::form::Field;
use wavextract::plot::{plot_fit, render_capture_view, PlotConfig};
use wavextract::{
    AxisBounds, Canvas, ConsoleSource, DigitizeConfig, Digitizer, SceneCanvas, SetupForm,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Digitize a periodic waveform and fit a Fourier series")]
struct Args {
    /// Image of the plot (prompted for when omitted)
    image: Option<PathBuf>,

    /// Trace every capture step and write the intermediate point sets
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Scene canvas that echoes prompts to the terminal.
struct ConsoleCanvas {
    scene: SceneCanvas,
}

impl Canvas for ConsoleCanvas {
    fn add(&mut self, annotation: Annotation) -> AnnotationId {
        self.scene.add(annotation)
    }

    fn remove(&mut self, id: AnnotationId) -> bool {
        self.scene.remove(id)
    }

    fn set_title(&mut self, title: &str, color: Color) {
        eprintln!("> {}", title);
        self.scene.set_title(title, color);
    }

    fn annotation_count(&self) -> usize {
        self.scene.annotation_count()
    }
}

fn prompt<R: BufRead>(console: &mut ConsoleSource<R>, label: &str) -> Result<String> {
    eprint!("{}: ", label);
    std::io::stderr().flush().ok();
    match console.next_line().context("Failed to read from the console")? {
        Some(line) => Ok(line.trim().to_string()),
        None => bail!("input closed during setup"),
    }
}

/// Fill the setup form until the image decodes and all bounds parse.
fn run_setup<R: BufRead>(
    form: &mut SetupForm,
    console: &mut ConsoleSource<R>,
) -> Result<(image::RgbImage, AxisBounds)> {
    let image = loop {
        if form.image_path().is_none() {
            let path = prompt(console, "image file")?;
            if path.is_empty() {
                continue;
            }
            form.select_image(path);
        }
        match form.load_image() {
            Ok(img) => break img,
            Err(e) if e.is_recoverable() => eprintln!("{}, choose another file", e),
            Err(e) => return Err(e).context("Setup failed"),
        }
    };

    let bounds = loop {
        for field in Field::ALL {
            let value = prompt(console, field.label())?;
            form.set_field(field, value);
        }
        match form.submit() {
            Ok(bounds) => break bounds,
            Err(e) if e.is_recoverable() => eprintln!("{}, enter all four bounds again", e),
            Err(e) => return Err(e).context("Setup failed"),
        }
    };
    Ok((image, bounds))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DigitizeConfig::from_debug_flag(args.debug);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.verbosity.filter_directive()))
        .with_writer(std::io::stderr)
        .init();
    info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let stdin = std::io::stdin();
    let mut console = ConsoleSource::new(stdin.lock());

    let mut form = SetupForm::new();
    if let Some(path) = args.image {
        form.select_image(path);
    }
    let (image, bounds) = run_setup(&mut form, &mut console)?;

    let digitizer = Digitizer::new(config);
    let mut canvas = ConsoleCanvas {
        scene: SceneCanvas::new(),
    };
    let run = digitizer
        .digitize(bounds, Some(image.dimensions()), &mut console, &mut canvas)
        .context("Digitizing failed")?;

    let sink = digitizer.persist(&run).context("Failed to save results")?;

    if let Err(e) = render_capture_view(&image, &canvas.scene, &sink.path("capture_view.png")) {
        warn!("capture view not saved: {:#}", e);
    }
    let curve = run.fit.coefficients.sample_curve(run.fit.period, 1000);
    if let Err(e) = plot_fit(
        &run.scaled,
        &curve,
        &sink.path("fourier_fit.png"),
        &PlotConfig::default(),
    ) {
        warn!("fit plot not saved: {:#}", e);
    }

    Ok(())
}
