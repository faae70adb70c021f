use crate::review::validate::FieldError;

/// Convenience result type used across reviewcard.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Top-level error taxonomy used by composer, crop and render APIs.
///
/// Every variant is recoverable: the composer is left in a valid state and the user can retry.
#[derive(thiserror::Error, Debug)]
pub enum ReviewError {
    /// Invalid configuration or caller-provided arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// One or more form fields failed validation.
    #[error("form validation failed: {}", summarize_fields(.0))]
    FieldValidation(Vec<FieldError>),

    /// Export was requested before an image was cropped and accepted.
    #[error("image required: no finalized image in the review")]
    MissingImage,

    /// The crop transform produced no pixel data.
    #[error("crop produced no image data: {0}")]
    EmptyCrop(String),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(String),

    /// Rasterizing the preview card failed.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReviewError {
    /// Build a [`ReviewError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReviewError::EmptyCrop`] value.
    pub fn empty_crop(msg: impl Into<String>) -> Self {
        Self::EmptyCrop(msg.into())
    }

    /// Build a [`ReviewError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`ReviewError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Per-field errors carried by a [`ReviewError::FieldValidation`], empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::FieldValidation(errors) => errors,
            _ => &[],
        }
    }
}

fn summarize_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
