//! Setup form: image selection and axis bound entry.
//!
//! The form is the last safe checkpoint before capture. Errors raised here are
//! recoverable and reset the form instead of aborting:
//!
//! - an image that cannot be decoded clears the selected path;
//! - an empty or non-numeric bound clears all four fields but keeps the image.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{error, info};

use crate::calibration::AxisBounds;
use crate::error::{Result, WaveError};

/// One of the four axis bound fields. All bounds are in arbitrary units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    XStart,
    XEnd,
    YStart,
    YEnd,
}

impl Field {
    /// Fields in entry order.
    pub const ALL: [Field; 4] = [Field::XStart, Field::XEnd, Field::YStart, Field::YEnd];

    pub fn label(&self) -> &'static str {
        match self {
            Field::XStart => "x start",
            Field::XEnd => "x end",
            Field::YStart => "y start",
            Field::YEnd => "y end",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    image_path: Option<PathBuf>,
    fields: [String; 4],
}

impl SetupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_image(&mut self, path: impl Into<PathBuf>) {
        self.image_path = Some(path.into());
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields[field.index()] = value.into();
    }

    pub fn field(&self, field: Field) -> &str {
        &self.fields[field.index()]
    }

    /// Returns `true` when no field holds any text.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.is_empty())
    }

    pub fn clear_fields(&mut self) {
        self.fields = Default::default();
    }

    /// Validate and parse the four bounds.
    ///
    /// On [`WaveError::MissingField`] or [`WaveError::Parse`] every field is
    /// cleared and the selected image is kept.
    pub fn submit(&mut self) -> Result<AxisBounds> {
        match parse_fields(&self.fields) {
            Ok(bounds) => Ok(bounds),
            Err(e) => {
                error!("{}", e);
                self.clear_fields();
                Err(e)
            }
        }
    }

    /// Decode the selected image.
    ///
    /// On [`WaveError::ImageLoad`] the selection is cleared. With no image
    /// selected this reports the image as a missing field.
    pub fn load_image(&mut self) -> Result<RgbImage> {
        let path = self
            .image_path
            .clone()
            .ok_or(WaveError::MissingField { field: "image" })?;
        match image::open(&path) {
            Ok(img) => {
                info!("file opened successfully: {}", path.display());
                Ok(img.to_rgb8())
            }
            Err(source) => {
                error!("could not open file {}", path.display());
                self.image_path = None;
                Err(WaveError::ImageLoad { path, source })
            }
        }
    }
}

fn parse_fields(fields: &[String; 4]) -> Result<AxisBounds> {
    let mut values = [0.0; 4];
    for (i, (raw, field)) in fields.iter().zip(Field::ALL).enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(WaveError::MissingField {
                field: field.label(),
            });
        }
        values[i] = raw.parse::<f64>().map_err(|_| WaveError::Parse {
            field: field.label(),
            value: raw.to_string(),
        })?;
    }
    let [x_start, x_end, y_start, y_end] = values;
    Ok(AxisBounds::new(x_start, x_end, y_start, y_end))
}
