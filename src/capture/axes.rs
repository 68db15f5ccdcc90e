//! Calibration capture: the four axis reference clicks.

use super::canvas::{Annotation, AnnotationId, Canvas, Color, MarkerStyle};
use super::session::{CaptureMode, CaptureSession};
use super::source::PointSource;
use crate::error::{Result, Stage};
use crate::PixelPoint;

const CUES: [&str; 4] = ["x = x_start", "x = x_end", "y = y_start", "y = y_end"];
const COLORS: [Color; 4] = [Color::BLUE, Color::RED, Color::GREEN, Color::PURPLE];

/// Collects `[x_start, x_end, y_start, y_end]`, each drawn as a dot with a
/// crosshair in the step's color.
#[derive(Debug, Default)]
pub struct CalibrationMode;

impl CaptureMode for CalibrationMode {
    type Point = PixelPoint;

    fn target_count(&self) -> usize {
        CUES.len()
    }

    fn prompt<C: Canvas>(&self, step: usize, canvas: &mut C) {
        canvas.set_title(&format!("click on the AXIS where {}", CUES[step]), COLORS[step]);
    }

    fn accept<C: Canvas>(
        &mut self,
        step: usize,
        click: PixelPoint,
        canvas: &mut C,
    ) -> (PixelPoint, Vec<AnnotationId>) {
        let color = COLORS[step];
        let handles = vec![
            canvas.add(Annotation::Marker {
                at: click,
                color,
                style: MarkerStyle::Dot,
            }),
            canvas.add(Annotation::HLine {
                y: click.y,
                color,
                width: 1.0,
            }),
            canvas.add(Annotation::VLine {
                x: click.x,
                color,
                width: 1.0,
            }),
        ];
        (click, handles)
    }

    fn finish<C: Canvas>(&mut self, annotations: &[Vec<AnnotationId>], canvas: &mut C) {
        // Crosshairs would clutter sampling; the dots stay as references.
        for handles in annotations {
            for &id in handles.iter().skip(1) {
                canvas.remove(id);
            }
        }
    }
}

/// Capture the four calibration clicks in order
/// `[x_start, x_end, y_start, y_end]`.
///
/// `frame` is the image size; clicks outside it are ignored.
pub fn capture_calibration_points<S: PointSource, C: Canvas>(
    source: &mut S,
    canvas: &mut C,
    frame: Option<(u32, u32)>,
) -> Result<[PixelPoint; 4]> {
    let mut session = CaptureSession::new(CalibrationMode);
    if let Some((w, h)) = frame {
        session = session.with_frame(w, h);
    }
    session.run(source, canvas, Stage::Calibration)?;
    let p = session.into_points();
    Ok([p[0], p[1], p[2], p[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::canvas::SceneCanvas;
    use crate::capture::source::{InputEvent, ScriptedSource};

    #[test]
    fn test_four_points_in_order() {
        let mut canvas = SceneCanvas::new();
        let mut source = ScriptedSource::accepts([
            (100.0, 900.0),
            (900.0, 900.0),
            (100.0, 900.0),
            (100.0, 100.0),
            (555.0, 555.0),
        ]);
        let points = capture_calibration_points(&mut source, &mut canvas, None).unwrap();
        assert_eq!(points[1], PixelPoint::new(900.0, 900.0));
        assert_eq!(points[3], PixelPoint::new(100.0, 100.0));
        // Terminates after the fourth click without consuming more input.
        assert_eq!(source.remaining(), 1);
        // Only the four dots survive once the crosshairs are cleared.
        assert_eq!(canvas.annotation_count(), 4);
    }

    #[test]
    fn test_undo_restores_prompt_and_annotations() {
        let mut canvas = SceneCanvas::new();
        let mut session = CaptureSession::new(CalibrationMode);
        session.start(&mut canvas);
        session.accept(PixelPoint::new(10.0, 20.0), &mut canvas);
        assert_eq!(canvas.annotation_count(), 3);
        assert_eq!(canvas.title(), "click on the AXIS where x = x_end");
        assert_eq!(canvas.title_color(), Color::RED);

        session.undo(&mut canvas);
        assert_eq!(canvas.annotation_count(), 0);
        assert_eq!(canvas.title(), "click on the AXIS where x = x_start");
        assert_eq!(canvas.title_color(), Color::BLUE);
    }

    #[test]
    fn test_undo_replaces_point() {
        let mut canvas = SceneCanvas::new();
        let mut source = ScriptedSource::new([
            InputEvent::Undo,
            InputEvent::Accept(PixelPoint::new(1.0, 1.0)),
            InputEvent::Accept(PixelPoint::new(7.0, 7.0)),
            InputEvent::Undo,
            InputEvent::Accept(PixelPoint::new(2.0, 2.0)),
            InputEvent::Accept(PixelPoint::new(3.0, 3.0)),
            InputEvent::Accept(PixelPoint::new(4.0, 4.0)),
        ]);
        let points = capture_calibration_points(&mut source, &mut canvas, None).unwrap();
        assert_eq!(
            points,
            [
                PixelPoint::new(1.0, 1.0),
                PixelPoint::new(2.0, 2.0),
                PixelPoint::new(3.0, 3.0),
                PixelPoint::new(4.0, 4.0),
            ]
        );
    }
}
