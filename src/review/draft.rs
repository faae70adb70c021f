use std::fmt;

use crate::crop::transform::FinalizedImage;

/// Maximum length of the review body, in UTF-16 code units (a textarea's `maxLength`), so
/// a character outside the Basic Multilingual Plane such as an emoji counts twice.
pub const REVIEW_TEXT_MAX_CHARS: usize = 300;
/// Upper bound of the score scale (lower bound is 0).
pub const MAX_SCORE: f64 = 10.0;
/// Number of stars in the rating row.
pub const STAR_COUNT: u8 = 5;

/// Form fields of a review, named as the form names them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    ReleaseInfo,
    Tags,
    Score,
    ReviewText,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::ReleaseInfo,
        Field::Tags,
        Field::Score,
        Field::ReviewText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::ReleaseInfo => "releaseInfo",
            Field::Tags => "tags",
            Field::Score => "score",
            Field::ReviewText => "reviewText",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The review being composed.
///
/// Updates are pure: [`ReviewDraft::with_field`] and [`ReviewDraft::with_image`] consume the
/// draft and return the next one. Values are stored as typed in; derived views (tags, stars,
/// character counter) are computed on demand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewDraft {
    pub title: String,
    pub release_info: String,
    /// Raw comma-separated tags, see [`ReviewDraft::tag_list`].
    pub tags: String,
    /// `None` when the score input is empty or not a number.
    pub score: Option<f64>,
    pub review_text: String,
    pub image: Option<FinalizedImage>,
}

impl ReviewDraft {
    /// Merge one field change into the draft.
    ///
    /// The review text is capped at [`REVIEW_TEXT_MAX_CHARS`] the way the textarea caps input,
    /// and the score follows number-input rules (unparseable input reads as empty).
    pub fn with_field(mut self, field: Field, value: &str) -> Self {
        match field {
            Field::Title => self.title = value.to_owned(),
            Field::ReleaseInfo => self.release_info = value.to_owned(),
            Field::Tags => self.tags = value.to_owned(),
            Field::Score => self.score = parse_score(value),
            Field::ReviewText => self.review_text = cap_review_text(value),
        }
        self
    }

    /// Replace the finalized image. The previous handle, if any, is dropped.
    pub fn with_image(mut self, image: Option<FinalizedImage>) -> Self {
        self.image = image;
        self
    }

    /// Raw value of a field as it would appear in the form.
    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::ReleaseInfo => self.release_info.clone(),
            Field::Tags => self.tags.clone(),
            Field::Score => self.score.map(format_score).unwrap_or_default(),
            Field::ReviewText => self.review_text.clone(),
        }
    }

    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }

    /// Filled stars for the current score; an unset score renders as 0.
    pub fn filled_stars(&self) -> u8 {
        filled_stars(self.score.unwrap_or(0.0))
    }

    pub fn char_counter(&self) -> CharCounter {
        CharCounter::for_text(&self.review_text)
    }
}

/// Split a raw tag string on commas and trim each tag.
///
/// Empty segments are kept: `""` yields `[""]` and `"a,,b"` yields `["a", "", "b"]`.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_owned()).collect()
}

/// `round(score / 2)` clamped to `[0, STAR_COUNT]`. Halves round up.
pub fn filled_stars(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    (score / 2.0).round().clamp(0.0, STAR_COUNT as f64) as u8
}

/// Parse a score the way a number input reports it.
pub fn parse_score(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shortest decimal rendering of a score (`8`, `7.5`).
pub fn format_score(score: f64) -> String {
    format!("{score}")
}

/// Length as a text input reports it, in UTF-16 code units.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Keep whole characters while they fit in [`REVIEW_TEXT_MAX_CHARS`] code units.
fn cap_review_text(raw: &str) -> String {
    let mut units = 0;
    raw.chars()
        .take_while(|c| {
            units += c.len_utf16();
            units <= REVIEW_TEXT_MAX_CHARS
        })
        .collect()
}

/// The `count/limit` indicator under the review textarea.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCounter {
    pub count: usize,
    pub limit: usize,
}

impl CharCounter {
    pub fn for_text(text: &str) -> Self {
        Self {
            count: text_length(text),
            limit: REVIEW_TEXT_MAX_CHARS,
        }
    }

    /// Highlighted once the limit is reached.
    pub fn at_limit(self) -> bool {
        self.count >= self.limit
    }
}

impl fmt::Display for CharCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.count, self.limit)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/review/draft.rs"]
mod tests;
