//! Interactive point capture.
//!
//! Capture runs as an explicit state machine ([`CaptureSession`]) driven by a
//! blocking [`PointSource`] and drawing feedback onto a [`Canvas`]. Two modes
//! are provided:
//!
//! - [`capture_calibration_points`]: the four axis reference clicks.
//! - [`capture_samples`]: one click per vertical guide line.
//!
//! Every accepted point can be undone with the secondary action, walking back
//! as far as the start of the session.

pub mod axes;
pub mod canvas;
pub mod samples;
pub mod session;
pub mod source;

pub use axes::{capture_calibration_points, CalibrationMode};
pub use canvas::{Annotation, AnnotationId, Canvas, Color, MarkerStyle, SceneCanvas};
pub use samples::{capture_samples, SamplingMode};
pub use session::{CaptureMode, CaptureSession, CaptureState};
pub use source::{ConsoleSource, InputEvent, PointSource, ScriptedSource};
