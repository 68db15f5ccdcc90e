//! The session-scoped visual surface.
//!
//! Capture sessions draw feedback annotations (markers, guide lines) and a
//! prompt title onto a [`Canvas`]. The canvas is display-only; nothing on it
//! feeds back into the numeric result.

use std::collections::BTreeMap;

use crate::PixelPoint;

/// RGB color of an annotation or title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const BLUE: Color = Color(31, 119, 180);
    pub const RED: Color = Color(214, 39, 40);
    pub const GREEN: Color = Color(44, 160, 44);
    pub const PURPLE: Color = Color(148, 103, 189);
    pub const ORANGE: Color = Color(255, 127, 14);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Filled, semi-transparent disc.
    Dot,
    /// `+` cross.
    Cross,
}

/// Something drawn on the canvas. Lines span the whole image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    Marker {
        at: PixelPoint,
        color: Color,
        style: MarkerStyle,
    },
    HLine {
        y: f64,
        color: Color,
        width: f64,
    },
    VLine {
        x: f64,
        color: Color,
        width: f64,
    },
}

/// Handle returned by [`Canvas::add`], used to erase the annotation later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationId(u64);

pub trait Canvas {
    /// Draw an annotation and return its handle.
    fn add(&mut self, annotation: Annotation) -> AnnotationId;
    /// Erase an annotation. Returns `false` if the handle is unknown.
    fn remove(&mut self, id: AnnotationId) -> bool;
    /// Replace the prompt shown above the image.
    fn set_title(&mut self, title: &str, color: Color);
    /// Number of annotations currently drawn.
    fn annotation_count(&self) -> usize;
}

/// In-memory canvas that keeps the current scene.
///
/// The scene can be rendered over the source image once capture is done
/// (see [`render_capture_view`](crate::plot::render_capture_view)).
#[derive(Debug, Clone)]
pub struct SceneCanvas {
    next_id: u64,
    annotations: BTreeMap<AnnotationId, Annotation>,
    title: String,
    title_color: Color,
}

impl SceneCanvas {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            annotations: BTreeMap::new(),
            title: String::new(),
            title_color: Color::BLACK,
        }
    }

    /// Annotations in drawing order.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn title_color(&self) -> Color {
        self.title_color
    }
}

impl Default for SceneCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for SceneCanvas {
    fn add(&mut self, annotation: Annotation) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        self.annotations.insert(id, annotation);
        id
    }

    fn remove(&mut self, id: AnnotationId) -> bool {
        self.annotations.remove(&id).is_some()
    }

    fn set_title(&mut self, title: &str, color: Color) {
        self.title.clear();
        self.title.push_str(title);
        self.title_color = color;
    }

    fn annotation_count(&self) -> usize {
        self.annotations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut canvas = SceneCanvas::new();
        let a = canvas.add(Annotation::VLine {
            x: 10.0,
            color: Color::RED,
            width: 1.0,
        });
        let b = canvas.add(Annotation::HLine {
            y: 5.0,
            color: Color::RED,
            width: 1.0,
        });
        assert_ne!(a, b);
        assert_eq!(canvas.annotation_count(), 2);
        assert!(canvas.remove(a));
        assert!(!canvas.remove(a));
        assert_eq!(canvas.annotation_count(), 1);
        assert!(canvas.get(b).is_some());
    }

    #[test]
    fn test_title_replaced() {
        let mut canvas = SceneCanvas::new();
        canvas.set_title("first", Color::BLUE);
        canvas.set_title("second", Color::GREEN);
        assert_eq!(canvas.title(), "second");
        assert_eq!(canvas.title_color(), Color::GREEN);
    }
}
