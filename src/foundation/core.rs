use crate::foundation::error::{ReviewError, ReviewResult};

pub use kurbo::{Point, Rect, Size};

/// Integer pixel dimensions of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> ReviewResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReviewError::validation(format!(
                "pixel size must be non-zero (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb`, alpha is emitted separately as `*-opacity` by the SVG writer.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f32 {
        self.a as f32 / 255.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
