use std::fmt::Write as _;

use crate::{
    foundation::core::{Rect, Rgba8},
    preview::{
        layout::{CardLayout, TextBlock, palette},
        text::CARD_FONT_FAMILIES,
    },
};

/// 20x20 star outline used by the rating row.
pub const STAR_PATH: &str = "M9.049 2.927c.3-.921 1.603-.921 1.902 0l1.07 3.292a1 1 0 00.95.69h3.462c.969 0 1.371 1.24.588 1.81l-2.8 2.034a1 1 0 00-.364 1.118l1.07 3.292c.3.921-.755 1.688-1.54 1.118l-2.8-2.034a1 1 0 00-1.175 0l-2.8 2.034c-.784.57-1.838-.197-1.539-1.118l1.07-3.292a1 1 0 00-.364-1.118L2.98 8.72c-.783-.57-.38-1.81.588-1.81h3.461a1 1 0 00.951-.69l1.07-3.292z";

/// Serialize a card layout as a standalone SVG document in CSS pixel units.
///
/// The image slot is drawn as a flat placeholder; the bitmap is composited by the rasterizer.
pub fn card_svg(layout: &CardLayout) -> String {
    let mut out = String::with_capacity(4096);
    let (w, h) = (layout.size.width, layout.size.height);
    let family = font_family_list(layout.font_family.as_deref());
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    push_rect(&mut out, Rect::new(0.0, 0.0, w, h), 0.0, palette::BACKGROUND, None);
    push_rect(
        &mut out,
        layout.card,
        8.0,
        Rgba8::WHITE,
        Some(palette::CARD_BORDER),
    );

    push_text(&mut out, &layout.title, &family);
    push_text(&mut out, &layout.release_info, &family);

    for badge in &layout.badges {
        push_rect(&mut out, badge.rect, 4.0, palette::BADGE_FILL, None);
        push_text(&mut out, &badge.label, &family);
    }

    if let Some(slot) = layout.image_slot {
        push_rect(&mut out, slot, 0.0, palette::IMAGE_SLOT, None);
    }

    for star in &layout.stars {
        let color = if star.filled {
            palette::STAR_ON
        } else {
            palette::STAR_OFF
        };
        let _ = writeln!(
            out,
            r#"<path transform="translate({} {})" d="{STAR_PATH}" fill="{}"/>"#,
            star.rect.x0,
            star.rect.y0,
            color.to_hex()
        );
    }

    push_text(&mut out, &layout.score_label, &family);
    push_text(&mut out, &layout.review_text, &family);

    out.push_str("</svg>\n");
    out
}

fn push_rect(out: &mut String, r: Rect, radius: f64, fill: Rgba8, stroke: Option<Rgba8>) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" fill="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
        fill.to_hex()
    );
    if let Some(stroke) = stroke {
        let _ = write!(out, r#" stroke="{}" stroke-width="1""#, stroke.to_hex());
    }
    out.push_str("/>\n");
}

fn push_text(out: &mut String, block: &TextBlock, font_family: &str) {
    let s = block.style;
    let mut top = block.origin.y;
    for line in &block.lines {
        let baseline = top + line.baseline;
        top += line.height;
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{baseline}" font-family="{font_family}" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
            block.origin.x,
            s.font_size,
            s.weight,
            s.color.to_hex(),
            escape_xml(&line.text)
        );
    }
}

/// The resolved family first, so `usvg` picks the face the text was measured with.
fn font_family_list(resolved: Option<&str>) -> String {
    let mut families = Vec::with_capacity(CARD_FONT_FAMILIES.len() + 2);
    if let Some(name) = resolved {
        families.push(format!("'{name}'"));
    }
    families.extend(CARD_FONT_FAMILIES.iter().map(|f| f.to_string()));
    families.push("sans-serif".to_owned());
    escape_xml(&families.join(", "))
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/preview/svg.rs"]
mod tests;
