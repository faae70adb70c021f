use crate::{
    foundation::error::{ReviewError, ReviewResult},
    review::draft::{Field, MAX_SCORE, REVIEW_TEXT_MAX_CHARS, ReviewDraft, text_length},
};

/// A validation failure attached to one form field, shown inline under the input.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a single field. Required text fields reject only the empty string; whitespace
/// counts as a value.
pub fn validate_field(draft: &ReviewDraft, field: Field) -> Option<FieldError> {
    let required = |value: &str, message: &str| {
        value.is_empty().then(|| FieldError::new(field, message))
    };

    match field {
        Field::Title => required(&draft.title, "Title is required"),
        Field::ReleaseInfo => required(&draft.release_info, "Release info is required"),
        Field::Tags => required(&draft.tags, "At least one tag is required"),
        Field::Score => match draft.score {
            None => Some(FieldError::new(field, "Score is required")),
            Some(s) if !(0.0..=MAX_SCORE).contains(&s) => {
                Some(FieldError::new(field, "Score must be between 0 and 10"))
            }
            Some(_) => None,
        },
        Field::ReviewText => {
            if draft.review_text.is_empty() {
                Some(FieldError::new(field, "Review text is required"))
            } else if text_length(&draft.review_text) > REVIEW_TEXT_MAX_CHARS {
                Some(FieldError::new(
                    field,
                    "Review must be 300 characters or less",
                ))
            } else {
                None
            }
        }
    }
}

/// Every field error of the draft, in form order.
pub fn field_errors(draft: &ReviewDraft) -> Vec<FieldError> {
    Field::ALL
        .iter()
        .filter_map(|&f| validate_field(draft, f))
        .collect()
}

impl ReviewDraft {
    /// Validate the form fields. The image is checked separately at export time.
    pub fn validate(&self) -> ReviewResult<()> {
        let errors = field_errors(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReviewError::FieldValidation(errors))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/review/validate.rs"]
mod tests;
