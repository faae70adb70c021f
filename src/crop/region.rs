use std::str::FromStr;

use crate::foundation::{
    core::{Rect, Size},
    error::{ReviewError, ReviewResult},
};

/// Unit of a [`CropRegion`]'s coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropUnit {
    /// Display pixels of the rendered image.
    #[default]
    Px,
    /// Percent of the displayed width (x, width) or height (y, height).
    Percent,
}

impl FromStr for CropUnit {
    type Err = ReviewError;

    fn from_str(s: &str) -> ReviewResult<Self> {
        match s.trim() {
            "px" => Ok(Self::Px),
            "%" | "percent" => Ok(Self::Percent),
            other => Err(ReviewError::validation(format!(
                "unknown crop unit '{other}' (expected 'px' or 'percent')"
            ))),
        }
    }
}

/// Selection rectangle over the displayed (possibly scaled-down) image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    #[serde(default)]
    pub unit: CropUnit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn px(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Px,
            x,
            y,
            width,
            height,
        }
    }

    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    /// Largest region of aspect `width / height == aspect` centered in `displayed`.
    pub fn full_bounds(displayed: Size, aspect: f64) -> Self {
        let (dw, dh) = (displayed.width, displayed.height);
        if !(aspect.is_finite() && aspect > 0.0) {
            return Self::px(0.0, 0.0, dw, dh);
        }
        let (w, h) = if dw / dh > aspect {
            (dh * aspect, dh)
        } else {
            (dw, dw / aspect)
        };
        Self::px((dw - w) / 2.0, (dh - h) / 2.0, w, h)
    }

    /// Parse `"x,y,width,height"`.
    pub fn parse_xywh(s: &str, unit: CropUnit) -> ReviewResult<Self> {
        let parts = s
            .split(',')
            .map(|p| {
                p.trim().parse::<f64>().map_err(|_| {
                    ReviewError::validation(format!("crop value '{}' is not a number", p.trim()))
                })
            })
            .collect::<ReviewResult<Vec<f64>>>()?;
        let &[x, y, width, height] = parts.as_slice() else {
            return Err(ReviewError::validation(format!(
                "crop must be 'x,y,width,height' (got {} values)",
                parts.len()
            )));
        };
        Ok(Self {
            unit,
            x,
            y,
            width,
            height,
        })
    }

    /// The same region in display pixels.
    pub fn to_px(self, displayed: Size) -> Self {
        match self.unit {
            CropUnit::Px => self,
            CropUnit::Percent => Self::px(
                self.x * displayed.width / 100.0,
                self.y * displayed.height / 100.0,
                self.width * displayed.width / 100.0,
                self.height * displayed.height / 100.0,
            ),
        }
    }

    /// The region in display pixels, clamped into `[0, displayed]`.
    ///
    /// Non-finite coordinates collapse to zero.
    pub fn clamped(self, displayed: Size) -> Self {
        let px = self.to_px(displayed);
        let fix = |v: f64| if v.is_finite() { v } else { 0.0 };
        let x = fix(px.x).clamp(0.0, displayed.width);
        let y = fix(px.y).clamp(0.0, displayed.height);
        let width = fix(px.width).clamp(0.0, displayed.width - x);
        let height = fix(px.height).clamp(0.0, displayed.height - y);
        Self::px(x, y, width, height)
    }

    /// Shrink the longer side so `width / height == aspect`, keeping the origin.
    ///
    /// Units are left as they are; call on display-pixel regions. Empty regions are returned
    /// unchanged.
    pub fn fit_aspect(self, aspect: f64) -> Self {
        if self.is_empty() || !(aspect.is_finite() && aspect > 0.0) {
            return self;
        }
        let (width, height) = if self.width / self.height > aspect {
            (self.height * aspect, self.height)
        } else {
            (self.width, self.width / aspect)
        };
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Display-space rectangle; only meaningful for [`CropUnit::Px`] regions.
    pub fn to_rect(self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/region.rs"]
mod tests;
