//! Sample capture: one click per equally spaced vertical guide line.
//!
//! Guide `k` sits at column `x_origin_px + k · x_span_px / n_terms` for
//! `k = 0..=n_terms`. The recorded sample takes its column from the guide and
//! its row from the click.

use tracing::debug;

use super::canvas::{Annotation, AnnotationId, Canvas, Color, MarkerStyle};
use super::session::{CaptureMode, CaptureSession};
use super::source::{InputEvent, PointSource};
use crate::error::{Result, Stage};
use crate::point::SamplePoint;
use crate::PixelPoint;

#[derive(Debug)]
pub struct SamplingMode {
    n_terms: usize,
    x_origin_px: f64,
    x_step_px: f64,
    guide: Option<AnnotationId>,
}

impl SamplingMode {
    pub fn new(n_terms: usize, x_span_px: f64, x_origin_px: f64) -> Self {
        let x_step_px = if n_terms == 0 {
            0.0
        } else {
            x_span_px / n_terms as f64
        };
        Self {
            n_terms,
            x_origin_px,
            x_step_px,
            guide: None,
        }
    }

    /// Column of guide line `k`.
    pub fn guide_x(&self, k: usize) -> f64 {
        self.x_origin_px + self.x_step_px * k as f64
    }

    fn move_guide<C: Canvas>(&mut self, k: Option<usize>, canvas: &mut C) {
        if let Some(id) = self.guide.take() {
            canvas.remove(id);
        }
        let x = k.map(|k| self.guide_x(k));
        self.guide = x.map(|x| {
            canvas.add(Annotation::VLine {
                x,
                color: Color::RED,
                width: 1.0,
            })
        });
    }
}

impl CaptureMode for SamplingMode {
    type Point = SamplePoint;

    fn target_count(&self) -> usize {
        self.n_terms + 1
    }

    fn begin<C: Canvas>(&mut self, canvas: &mut C) {
        self.move_guide(Some(0), canvas);
    }

    fn prompt<C: Canvas>(&self, step: usize, canvas: &mut C) {
        let title = format!(
            "click on the intersect between the vertical line and the figure, you have {} terms left",
            self.target_count() - step
        );
        canvas.set_title(&title, Color::BLACK);
    }

    fn accept<C: Canvas>(
        &mut self,
        step: usize,
        click: PixelPoint,
        canvas: &mut C,
    ) -> (SamplePoint, Vec<AnnotationId>) {
        let marker = canvas.add(Annotation::Marker {
            at: click,
            color: Color::ORANGE,
            style: MarkerStyle::Cross,
        });
        let next = step + 1;
        self.move_guide((next < self.target_count()).then_some(next), canvas);
        let sample = SamplePoint {
            index: step,
            x_px: self.guide_x(step),
            y_px: click.y,
            click_x_px: click.x,
        };
        (sample, vec![marker])
    }

    fn undo<C: Canvas>(&mut self, step: usize, canvas: &mut C) {
        self.move_guide(Some(step), canvas);
    }

    fn finish<C: Canvas>(&mut self, _annotations: &[Vec<AnnotationId>], canvas: &mut C) {
        self.move_guide(None, canvas);
        canvas.set_title(
            "point selection is now complete, close the window to proceed",
            Color::BLACK,
        );
    }
}

/// Capture `n_terms + 1` samples along the guide lines, then wait for the
/// operator to dismiss the finished view.
///
/// `frame` is the image size; clicks outside it are ignored. The source
/// closing after the last sample counts as the dismissal.
pub fn capture_samples<S: PointSource, C: Canvas>(
    n_terms: usize,
    x_span_px: f64,
    x_origin_px: f64,
    source: &mut S,
    canvas: &mut C,
    frame: Option<(u32, u32)>,
) -> Result<Vec<SamplePoint>> {
    let mut session = CaptureSession::new(SamplingMode::new(n_terms, x_span_px, x_origin_px));
    if let Some((w, h)) = frame {
        session = session.with_frame(w, h);
    }
    session.run(source, canvas, Stage::Sampling)?;
    await_dismissal(source);
    Ok(session.into_points())
}

fn await_dismissal<S: PointSource>(source: &mut S) {
    loop {
        match source.await_next_point() {
            Some(InputEvent::Dismiss) | None => return,
            Some(event) => debug!("view is waiting for dismissal, ignoring {:?}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::canvas::SceneCanvas;
    use crate::capture::source::ScriptedSource;

    #[test]
    fn test_guides_are_equally_spaced() {
        let mode = SamplingMode::new(49, 800.0, 100.0);
        assert_eq!(mode.guide_x(0), 100.0);
        assert!((mode.guide_x(49) - 900.0).abs() < 1e-9);
        assert!((mode.guide_x(1) - mode.guide_x(0) - 800.0 / 49.0).abs() < 1e-12);
    }

    #[test]
    fn test_samples_snap_to_guides() {
        let mut canvas = SceneCanvas::new();
        let mut source = ScriptedSource::accepts([(3.0, 50.0), (47.0, 40.0), (111.0, 30.0)]);
        let samples =
            capture_samples(2, 100.0, 0.0, &mut source, &mut canvas, None).unwrap();
        assert_eq!(samples.len(), 3);
        let xs: Vec<f64> = samples.iter().map(|s| s.x_px).collect();
        assert_eq!(xs, vec![0.0, 50.0, 100.0]);
        assert_eq!(samples[1].click_x_px, 47.0);
        assert_eq!(samples[2].y_px, 30.0);
        assert_eq!(samples[2].index, 2);
    }

    #[test]
    fn test_zero_terms_single_point() {
        let mut canvas = SceneCanvas::new();
        let mut source = ScriptedSource::accepts([(10.0, 20.0), (30.0, 40.0)]);
        let samples =
            capture_samples(0, 800.0, 10.0, &mut source, &mut canvas, None).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].x_px, 10.0);
        // The trailing click is swallowed while waiting for dismissal.
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_guide_follows_accept_and_undo() {
        let mut canvas = SceneCanvas::new();
        let mut session = CaptureSession::new(SamplingMode::new(4, 40.0, 0.0));
        session.start(&mut canvas);
        assert_eq!(canvas.annotation_count(), 1);
        assert_eq!(
            canvas.title(),
            "click on the intersect between the vertical line and the figure, you have 5 terms left"
        );

        session.accept(PixelPoint::new(0.0, 5.0), &mut canvas);
        session.accept(PixelPoint::new(10.0, 5.0), &mut canvas);
        let guide = session.mode().guide.and_then(|id| canvas.get(id).copied());
        assert_eq!(
            guide,
            Some(Annotation::VLine {
                x: 20.0,
                color: Color::RED,
                width: 1.0
            })
        );

        session.undo(&mut canvas);
        let guide = session.mode().guide.and_then(|id| canvas.get(id).copied());
        assert!(matches!(guide, Some(Annotation::VLine { x, .. }) if x == 10.0));
        assert_eq!(canvas.annotation_count(), 2);
        assert!(canvas.title().ends_with("you have 4 terms left"));
    }

    #[test]
    fn test_completion_title_and_guide_removed() {
        let mut canvas = SceneCanvas::new();
        let mut source = ScriptedSource::accepts([(0.0, 1.0), (5.0, 2.0)]);
        source.push(InputEvent::Undo);
        source.push(InputEvent::Dismiss);
        source.push(InputEvent::Accept(PixelPoint::new(9.0, 9.0)));
        let samples = capture_samples(1, 5.0, 0.0, &mut source, &mut canvas, None).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(canvas.annotation_count(), 2);
        assert!(canvas.title().starts_with("point selection is now complete"));
        assert_eq!(source.remaining(), 1);
    }
}
