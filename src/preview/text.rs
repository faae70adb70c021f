use std::borrow::Cow;

use usvg::fontdb;

use crate::foundation::{
    core::Rgba8,
    error::{ReviewError, ReviewResult},
};

/// Families the card asks for, before the generic sans-serif fallback.
pub const CARD_FONT_FAMILIES: &[&str] = &["Inter", "Helvetica", "Arial"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    /// Minimum line box height; taller font metrics win.
    pub line_height: f64,
    pub weight: u16,
    pub color: Rgba8,
}

/// One shaped line, positioned relative to the top of its line box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Advance of the shaped line.
    pub width: f64,
    pub height: f64,
    /// Distance from the top of the line box to the baseline.
    pub baseline: f64,
}

/// Shapes and line-breaks card text with Parley.
///
/// The engine holds the face that `usvg` will pick for the same family list, so widths measured
/// here match what `resvg` draws. Without any face there is nothing to measure: text is laid
/// out unwrapped with zero advance, and `resvg` draws nothing for it either.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// An engine with no faces registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family: None,
        }
    }

    /// Register the card family as `fontdb` resolves it: the first of
    /// [`CARD_FONT_FAMILIES`] or sans-serif that matches, else the first face loaded.
    pub fn from_fontdb(db: &fontdb::Database) -> Self {
        let mut engine = Self::new();
        let Some(regular) = resolve_card_face(db) else {
            tracing::warn!("no font faces available; card text will not be measured");
            return engine;
        };

        let family = match register_face(&mut engine, db, regular) {
            Ok(name) => name,
            Err(err) => {
                tracing::warn!(error = %err, "could not register card font");
                return engine;
            }
        };

        // Heavier faces of the same family, when installed.
        let mut seen = vec![regular];
        for weight in [500, 600] {
            let families = [fontdb::Family::Name(&family)];
            let Some(id) = db.query(&fontdb::Query {
                families: &families,
                weight: fontdb::Weight(weight),
                stretch: fontdb::Stretch::Normal,
                style: fontdb::Style::Normal,
            }) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Err(err) = register_face(&mut engine, db, id) {
                tracing::debug!(weight, error = %err, "skipping card font weight");
            }
        }

        tracing::debug!(%family, faces = seen.len(), "card text engine ready");
        engine.family = Some(family);
        engine
    }

    /// Register raw font bytes and return the family name Parley knows them by.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> ReviewResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReviewError::render("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReviewError::render("registered font family has no name"))?
            .to_string();
        if self.family.is_none() {
            self.family = Some(name.clone());
        }
        Ok(name)
    }

    /// Family all card text is shaped with, if any face is registered.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Shape `text` and break it into lines no wider than `max_width` (unbounded for `None`).
    ///
    /// Whitespace runs collapse to a single space. Blank text yields no lines; a word wider
    /// than `max_width` overflows on its own line.
    pub fn layout_lines(
        &mut self,
        text: &str,
        style: &TextStyle,
        max_width: Option<f64>,
    ) -> Vec<TextLine> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Vec::new();
        }
        let Some(family) = self.family.clone() else {
            return vec![TextLine {
                text,
                width: 0.0,
                height: style.line_height,
                baseline: style.line_height,
            }];
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(
            style.font_size as f32,
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(style.weight)),
        ));

        let mut layout: parley::Layout<()> = builder.build(&text);
        let max_width = max_width.map(|w| w as f32);
        layout.break_all_lines(max_width);
        layout.align(
            max_width,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        layout
            .lines()
            .map(|line| {
                let m = line.metrics();
                let ascent = f64::from(m.ascent);
                let content = ascent + f64::from(m.descent);
                let height = (content + f64::from(m.leading)).max(style.line_height);
                TextLine {
                    text: text[line.text_range()].trim().to_owned(),
                    width: f64::from(m.advance),
                    height,
                    // half-leading above the ascent, as a CSS line box does
                    baseline: (height - content) / 2.0 + ascent,
                }
            })
            .filter(|line| !line.text.is_empty())
            .collect()
    }

    /// Advance of `text` on a single line.
    pub fn measure(&mut self, text: &str, style: &TextStyle) -> f64 {
        self.layout_lines(text, style, None)
            .iter()
            .map(|l| l.width)
            .fold(0.0, f64::max)
    }
}

fn resolve_card_face(db: &fontdb::Database) -> Option<fontdb::ID> {
    let families = CARD_FONT_FAMILIES
        .iter()
        .map(|name| fontdb::Family::Name(name))
        .chain([fontdb::Family::SansSerif])
        .collect::<Vec<_>>();
    db.query(&fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    })
    .or_else(|| db.faces().next().map(|face| face.id))
}

fn register_face(
    engine: &mut TextLayoutEngine,
    db: &fontdb::Database,
    id: fontdb::ID,
) -> ReviewResult<String> {
    let bytes = db
        .with_face_data(id, |data, _index| data.to_vec())
        .ok_or_else(|| ReviewError::render("font face data is not available"))?;
    engine.register_font(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/preview/text.rs"]
mod tests;
