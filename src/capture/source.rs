//! Input events and the blocking suspension primitive.
//!
//! A capture session never talks to a UI toolkit. It asks a [`PointSource`]
//! for the next discrete event and blocks until one arrives. `None` means the
//! view was closed.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::warn;

use crate::PixelPoint;

/// One discrete operator action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary action: accept a point at this pixel position.
    Accept(PixelPoint),
    /// Secondary action: undo the most recent accept.
    Undo,
    /// Dismiss the finished view.
    Dismiss,
    /// Anything else; ignored by sessions.
    Other,
}

impl InputEvent {
    /// Parse one console line.
    ///
    /// ```text
    /// <x> <y>            accept
    /// accept <x> <y>     accept (alias `a`)
    /// undo               undo (alias `u`)
    /// done               dismiss (aliases `close`, `q`)
    /// ```
    ///
    /// Coordinates may be separated by whitespace or a comma. Anything else
    /// parses to [`InputEvent::Other`].
    pub fn parse(line: &str) -> InputEvent {
        let tokens: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        let coords = match tokens.as_slice() {
            [cmd] => {
                return match cmd.to_ascii_lowercase().as_str() {
                    "undo" | "u" => InputEvent::Undo,
                    "done" | "close" | "q" => InputEvent::Dismiss,
                    _ => InputEvent::Other,
                }
            }
            [cmd, x, y] if cmd.eq_ignore_ascii_case("accept") || cmd.eq_ignore_ascii_case("a") => {
                (x, y)
            }
            [x, y] => (x, y),
            _ => return InputEvent::Other,
        };
        match (coords.0.parse::<f64>(), coords.1.parse::<f64>()) {
            (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => {
                InputEvent::Accept(PixelPoint::new(x, y))
            }
            _ => InputEvent::Other,
        }
    }
}

/// Source of operator events.
pub trait PointSource {
    /// Block until the next event. Returns `None` once the view is closed.
    fn await_next_point(&mut self) -> Option<InputEvent>;
}

impl<T: PointSource + ?Sized> PointSource for &mut T {
    fn await_next_point(&mut self) -> Option<InputEvent> {
        (**self).await_next_point()
    }
}

/// Queue-backed source replaying a fixed event script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    events: VecDeque<InputEvent>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Queue accepts for each `(x, y)`.
    pub fn accepts(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::new(
            points
                .into_iter()
                .map(|(x, y)| InputEvent::Accept(PixelPoint::new(x, y))),
        )
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Events not consumed yet.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl PointSource for ScriptedSource {
    fn await_next_point(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

/// Line-oriented console source, one event per line.
///
/// The same reader also serves the setup form's field prompts, so form entry
/// and point capture share one input stream.
pub struct ConsoleSource<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> ConsoleSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }

    /// Read the next line without its terminator. `Ok(None)` at end of input.
    pub fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead> PointSource for ConsoleSource<R> {
    fn await_next_point(&mut self) -> Option<InputEvent> {
        match self.next_line() {
            Ok(line) => line.map(|l| InputEvent::parse(&l)),
            Err(e) => {
                warn!("console input failed, treating the view as closed: {}", e);
                None
            }
        }
    }
}
