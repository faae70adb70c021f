//! reviewcard composes a short review (title, release info, tags, score, text and a cropped
//! cover image) into a styled card and exports it as a PNG.
//!
//! # Flow
//!
//! 1. **Edit**: field updates fold into a [`ReviewDraft`] through pure functions.
//! 2. **Crop**: a selected file goes through a [`CropSession`]; the confirmed region is mapped
//!    from display to native pixels by [`compute_cropped_image`] and stored as a
//!    [`FinalizedImage`].
//! 3. **Export**: [`Composer::request_export`] validates, rasterizes the [`PreviewCard`] with a
//!    [`PreviewRasterizer`] and hands the PNG to an [`ExportSink`].
//!
//! Everything is single-threaded. File reads are two-phase ([`LoadTicket`]) so a newer
//! selection always wins over a stale one.
#![forbid(unsafe_code)]

mod compose;
mod crop;
mod foundation;
mod preview;
mod review;

pub use compose::composer::{Composer, ExportReport};
pub use compose::config::{ComposerConfig, MAX_EXPORT_SCALE};
pub use compose::export::{DirSink, ExportSink, InMemorySink, encode_png};
pub use compose::notify::{Notification, NotificationQueue, Severity};
pub use crop::region::{CropRegion, CropUnit};
pub use crop::session::{CancelOutcome, CropPhase, CropSession, LoadOutcome, LoadTicket};
pub use crop::transform::{
    CropGeometry, CropOptions, CropPlan, FinalizedImage, ImageHandle, MAX_OUTPUT_DIM,
    SourceImage, compute_cropped_image, plan_crop,
};
pub use foundation::core::{PixelSize, Point, Rect, Rgba8, Size};
pub use foundation::error::{ReviewError, ReviewResult};
pub use preview::card::{
    PreviewCard, RELEASE_INFO_PLACEHOLDER, REVIEW_TEXT_PLACEHOLDER, TITLE_PLACEHOLDER,
};
pub use preview::layout::{CardLayout, TextBlock};
pub use preview::raster::{CardRasterizer, MAX_SNAPSHOT_DIM, PreviewRasterizer};
pub use preview::svg::card_svg;
pub use preview::text::{CARD_FONT_FAMILIES, TextLayoutEngine, TextLine, TextStyle};
pub use review::draft::{
    CharCounter, Field, MAX_SCORE, REVIEW_TEXT_MAX_CHARS, ReviewDraft, STAR_COUNT, filled_stars,
    split_tags, text_length,
};
pub use review::form::{ReviewForm, ScoreInput};
pub use review::validate::{FieldError, field_errors, validate_field};
