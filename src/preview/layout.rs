//! Box layout of the preview card in CSS pixels. Text is shaped and broken into lines by a
//! [`TextLayoutEngine`].

use crate::{
    foundation::core::{Point, Rect, Size},
    preview::{
        card::PreviewCard,
        text::{TextLayoutEngine, TextLine, TextStyle},
    },
};

pub const CARD_WIDTH: f64 = 448.0;
pub const OUTER_PADDING_Y: f64 = 16.0;
pub const CARD_PADDING: f64 = 24.0;
pub const IMAGE_HEIGHT: f64 = 208.0;
pub const STAR_SIZE: f64 = 20.0;

pub mod palette {
    use crate::foundation::core::Rgba8;

    pub const BACKGROUND: Rgba8 = Rgba8::WHITE;
    pub const CARD_BORDER: Rgba8 = Rgba8::opaque(0xe5, 0xe7, 0xeb);
    pub const TITLE: Rgba8 = Rgba8::opaque(0x0f, 0x17, 0x2a);
    pub const MUTED: Rgba8 = Rgba8::opaque(0x6b, 0x72, 0x80);
    pub const BODY: Rgba8 = Rgba8::opaque(0x37, 0x41, 0x51);
    pub const BADGE_FILL: Rgba8 = Rgba8::opaque(0xdb, 0xea, 0xfe);
    pub const BADGE_TEXT: Rgba8 = Rgba8::opaque(0x1e, 0x40, 0xaf);
    pub const STAR_ON: Rgba8 = Rgba8::opaque(0xfd, 0xe0, 0x47);
    pub const STAR_OFF: Rgba8 = Rgba8::opaque(0xd1, 0xd5, 0xdb);
    pub const IMAGE_SLOT: Rgba8 = Rgba8::opaque(0xf3, 0xf4, 0xf6);
}

const TITLE_STYLE: TextStyle = TextStyle {
    font_size: 24.0,
    line_height: 32.0,
    weight: 600,
    color: palette::TITLE,
};
const RELEASE_STYLE: TextStyle = TextStyle {
    font_size: 14.0,
    line_height: 20.0,
    weight: 400,
    color: palette::MUTED,
};
const BADGE_STYLE: TextStyle = TextStyle {
    font_size: 12.0,
    line_height: 16.0,
    weight: 600,
    color: palette::BADGE_TEXT,
};
const SCORE_STYLE: TextStyle = TextStyle {
    font_size: 14.0,
    line_height: 20.0,
    weight: 500,
    color: palette::MUTED,
};
const BODY_STYLE: TextStyle = TextStyle {
    font_size: 16.0,
    line_height: 20.0,
    weight: 400,
    color: palette::BODY,
};

/// Wrapped lines placed at a top-left origin.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub origin: Point,
    pub lines: Vec<TextLine>,
    pub style: TextStyle,
}

impl TextBlock {
    pub fn height(&self) -> f64 {
        self.lines.iter().map(|l| l.height).sum()
    }

    /// Widest line advance.
    pub fn width(&self) -> f64 {
        self.lines.iter().map(|l| l.width).fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
    pub rect: Rect,
    pub label: TextBlock,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub rect: Rect,
    pub filled: bool,
}

/// Positions of every element of the card inside the snapshot area.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    /// Snapshot size, card plus vertical padding.
    pub size: Size,
    pub card: Rect,
    /// Family the text was shaped with; `None` when no font face is available.
    pub font_family: Option<String>,
    pub title: TextBlock,
    pub release_info: TextBlock,
    pub badges: Vec<Badge>,
    pub image_slot: Option<Rect>,
    pub stars: Vec<Star>,
    pub score_label: TextBlock,
    pub review_text: TextBlock,
}

impl CardLayout {
    pub fn compute(card: &PreviewCard, text: &mut TextLayoutEngine) -> Self {
        let left = CARD_PADDING;
        let content_w = CARD_WIDTH - 2.0 * CARD_PADDING;
        let mut y = OUTER_PADDING_Y + CARD_PADDING;

        let title = text_block(text, &card.title, Point::new(left, y), content_w, TITLE_STYLE);
        y += title.height() + 6.0;

        let release_info = text_block(
            text,
            &card.release_info,
            Point::new(left, y),
            content_w,
            RELEASE_STYLE,
        );
        y += release_info.height() + 8.0;

        let (badges, badges_h) = layout_badges(text, &card.tags, Point::new(left, y), content_w);
        y += badges_h + CARD_PADDING;

        let image_slot = card.image.map(|_| {
            let slot = Rect::from_origin_size((left, y), (content_w, IMAGE_HEIGHT));
            y += IMAGE_HEIGHT + 16.0;
            slot
        });

        let stars = card
            .stars()
            .iter()
            .enumerate()
            .map(|(i, &filled)| Star {
                rect: Rect::from_origin_size(
                    (left + i as f64 * STAR_SIZE, y),
                    (STAR_SIZE, STAR_SIZE),
                ),
                filled,
            })
            .collect::<Vec<_>>();
        let score_label = TextBlock {
            origin: Point::new(left + stars.len() as f64 * STAR_SIZE + 8.0, y),
            lines: text.layout_lines(&card.score_label, &SCORE_STYLE, None),
            style: SCORE_STYLE,
        };
        y += STAR_SIZE + 16.0;

        let review_text = text_block(
            text,
            &card.review_text,
            Point::new(left, y),
            content_w,
            BODY_STYLE,
        );
        y += review_text.height() + CARD_PADDING;

        let card_rect = Rect::new(0.0, OUTER_PADDING_Y, CARD_WIDTH, y);
        Self {
            size: Size::new(CARD_WIDTH, y + OUTER_PADDING_Y),
            card: card_rect,
            font_family: text.family().map(str::to_owned),
            title,
            release_info,
            badges,
            image_slot,
            stars,
            score_label,
            review_text,
        }
    }
}

fn text_block(
    text: &mut TextLayoutEngine,
    value: &str,
    origin: Point,
    max_width: f64,
    style: TextStyle,
) -> TextBlock {
    TextBlock {
        origin,
        lines: text.layout_lines(value, &style, Some(max_width)),
        style,
    }
}

/// Tag badges flow left to right and wrap onto new rows. An empty tag still gets a badge.
fn layout_badges(
    text: &mut TextLayoutEngine,
    tags: &[String],
    origin: Point,
    max_width: f64,
) -> (Vec<Badge>, f64) {
    const PAD_X: f64 = 10.0;
    const PAD_Y: f64 = 2.0;
    const GAP: f64 = 8.0;
    let badge_h = BADGE_STYLE.line_height + 2.0 * PAD_Y;

    let mut badges = Vec::with_capacity(tags.len());
    let (mut x, mut y) = (origin.x, origin.y);
    for tag in tags {
        let lines = text.layout_lines(tag, &BADGE_STYLE, None);
        let label_w = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let w = (label_w + 2.0 * PAD_X).min(max_width);
        if x > origin.x && x + w > origin.x + max_width {
            x = origin.x;
            y += badge_h + GAP;
        }
        badges.push(Badge {
            rect: Rect::from_origin_size((x, y), (w, badge_h)),
            label: TextBlock {
                origin: Point::new(x + PAD_X, y + PAD_Y),
                lines,
                style: BADGE_STYLE,
            },
        });
        x += w + GAP;
    }

    let height = if badges.is_empty() {
        0.0
    } else {
        y + badge_h - origin.y
    };
    (badges, height)
}

#[cfg(test)]
#[path = "../../tests/unit/preview/layout.rs"]
mod tests;
