//! Generic undoable capture state machine.
//!
//! ```text
//! AwaitingPoint(i) --accept--> AwaitingPoint(i+1)   (i+1 < target)
//! AwaitingPoint(i) --accept--> Complete             (i+1 == target)
//! AwaitingPoint(i) --undo----> AwaitingPoint(i-1)   (i > 0)
//! AwaitingPoint(0) --undo----> AwaitingPoint(0)     (no-op, diagnostic)
//! ```
//!
//! The session owns the accepted points and the canvas handles drawn for
//! each of them. What gets drawn, and how guides are restored on undo, is
//! delegated to a [`CaptureMode`].

use tracing::{debug, warn};

use super::canvas::{AnnotationId, Canvas};
use super::source::{InputEvent, PointSource};
use crate::error::{Result, Stage, WaveError};
use crate::PixelPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    AwaitingPoint(usize),
    Complete,
}

/// Per-mode behavior of a capture session.
pub trait CaptureMode {
    /// What one accepted click is recorded as.
    type Point: Clone;

    /// Number of points that completes the session.
    fn target_count(&self) -> usize;

    /// Draw whatever the first step needs before any click.
    fn begin<C: Canvas>(&mut self, _canvas: &mut C) {}

    /// Show the prompt for step `step`.
    fn prompt<C: Canvas>(&self, step: usize, canvas: &mut C);

    /// Record the click for `step` and draw its feedback. The returned
    /// handles are erased again if the point is undone.
    fn accept<C: Canvas>(
        &mut self,
        step: usize,
        click: PixelPoint,
        canvas: &mut C,
    ) -> (Self::Point, Vec<AnnotationId>);

    /// Restore guides after the point of `step` was removed.
    fn undo<C: Canvas>(&mut self, _step: usize, _canvas: &mut C) {}

    /// Called once after the last point is accepted.
    fn finish<C: Canvas>(&mut self, _annotations: &[Vec<AnnotationId>], _canvas: &mut C) {}
}

pub struct CaptureSession<M: CaptureMode> {
    mode: M,
    accepted: Vec<M::Point>,
    annotations: Vec<Vec<AnnotationId>>,
    state: CaptureState,
    frame: Option<(f64, f64)>,
}

impl<M: CaptureMode> CaptureSession<M> {
    pub fn new(mode: M) -> Self {
        Self {
            mode,
            accepted: Vec::new(),
            annotations: Vec::new(),
            state: CaptureState::AwaitingPoint(0),
            frame: None,
        }
    }

    /// Ignore accepts outside a `width × height` pixel frame.
    pub fn with_frame(mut self, width: u32, height: u32) -> Self {
        self.frame = Some((width as f64, height as f64));
        self
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == CaptureState::Complete
    }

    pub fn points(&self) -> &[M::Point] {
        &self.accepted
    }

    pub fn into_points(self) -> Vec<M::Point> {
        self.accepted
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    /// Draw the initial guides and prompt.
    pub fn start<C: Canvas>(&mut self, canvas: &mut C) {
        self.mode.begin(canvas);
        self.mode.prompt(0, canvas);
    }

    /// Accept a click for the current step.
    pub fn accept<C: Canvas>(&mut self, click: PixelPoint, canvas: &mut C) -> CaptureState {
        let CaptureState::AwaitingPoint(step) = self.state else {
            debug!("session complete, ignoring click at ({}, {})", click.x, click.y);
            return self.state;
        };
        if !self.in_frame(&click) {
            debug!("click at ({}, {}) is outside the image, ignored", click.x, click.y);
            return self.state;
        }

        let (point, handles) = self.mode.accept(step, click, canvas);
        self.accepted.push(point);
        self.annotations.push(handles);

        let next = step + 1;
        if next >= self.mode.target_count() {
            self.state = CaptureState::Complete;
            self.mode.finish(&self.annotations, canvas);
        } else {
            self.state = CaptureState::AwaitingPoint(next);
            self.mode.prompt(next, canvas);
        }
        self.trace(canvas);
        self.state
    }

    /// Remove the most recent point and restore the previous step.
    pub fn undo<C: Canvas>(&mut self, canvas: &mut C) -> CaptureState {
        let step = match self.state {
            CaptureState::AwaitingPoint(step) if step > 0 => step - 1,
            CaptureState::AwaitingPoint(_) => {
                warn!("nothing to undo");
                return self.state;
            }
            CaptureState::Complete => {
                debug!("session complete, ignoring undo");
                return self.state;
            }
        };

        self.accepted.pop();
        for id in self.annotations.pop().unwrap_or_default() {
            canvas.remove(id);
        }
        self.state = CaptureState::AwaitingPoint(step);
        self.mode.undo(step, canvas);
        self.mode.prompt(step, canvas);
        self.trace(canvas);
        self.state
    }

    /// Dispatch one event. Accept and undo are the only actions a session reacts to.
    pub fn handle<C: Canvas>(&mut self, event: InputEvent, canvas: &mut C) -> CaptureState {
        match event {
            InputEvent::Accept(click) => self.accept(click, canvas),
            InputEvent::Undo => self.undo(canvas),
            InputEvent::Dismiss | InputEvent::Other => self.state,
        }
    }

    /// Drive the session from `source` until complete.
    ///
    /// Fails with [`WaveError::SessionAbandoned`] if the source closes first.
    pub fn run<S: PointSource, C: Canvas>(
        &mut self,
        source: &mut S,
        canvas: &mut C,
        stage: Stage,
    ) -> Result<()> {
        if self.accepted.is_empty() {
            self.start(canvas);
        }
        while !self.is_complete() {
            let event = source
                .await_next_point()
                .ok_or(WaveError::SessionAbandoned { stage })?;
            self.handle(event, canvas);
        }
        Ok(())
    }

    fn in_frame(&self, p: &PixelPoint) -> bool {
        match self.frame {
            Some((w, h)) => p.x >= 0.0 && p.y >= 0.0 && p.x < w && p.y < h,
            None => true,
        }
    }

    fn trace<C: Canvas>(&self, canvas: &C) {
        debug!(
            "current state is {:?}, accepted points: {}, annotations drawn: {}",
            self.state,
            self.accepted.len(),
            canvas.annotation_count()
        );
    }
}
