use crate::{
    crop::transform::ImageHandle,
    review::draft::{ReviewDraft, STAR_COUNT, format_score},
};

pub const TITLE_PLACEHOLDER: &str = "Title";
pub const RELEASE_INFO_PLACEHOLDER: &str = "Release Info";
pub const REVIEW_TEXT_PLACEHOLDER: &str = "Your review here (max 300 characters)";

/// What the preview card shows for a draft.
///
/// Empty text fields fall back to placeholders; tags are the derived tag list (including empty
/// tags); the star row and score label follow the current score.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewCard {
    pub title: String,
    pub release_info: String,
    pub tags: Vec<String>,
    pub filled_stars: u8,
    pub score_label: String,
    pub review_text: String,
    pub image: Option<ImageHandle>,
}

impl PreviewCard {
    pub fn from_draft(draft: &ReviewDraft) -> Self {
        Self {
            title: or_placeholder(&draft.title, TITLE_PLACEHOLDER),
            release_info: or_placeholder(&draft.release_info, RELEASE_INFO_PLACEHOLDER),
            tags: draft.tag_list(),
            filled_stars: draft.filled_stars(),
            score_label: format!("{}/10", format_score(draft.score.unwrap_or(0.0))),
            review_text: or_placeholder(&draft.review_text, REVIEW_TEXT_PLACEHOLDER),
            image: draft.image.as_ref().map(|img| img.handle()),
        }
    }

    /// `true` for each filled star, left to right.
    pub fn stars(&self) -> [bool; STAR_COUNT as usize] {
        std::array::from_fn(|i| i < self.filled_stars as usize)
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_owned()
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/card.rs"]
mod tests;
