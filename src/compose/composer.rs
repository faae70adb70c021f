use crate::{
    compose::{
        config::ComposerConfig,
        export::{ExportSink, encode_png},
        notify::{Notification, NotificationQueue},
    },
    crop::{
        region::CropRegion,
        session::{CancelOutcome, CropSession, LoadOutcome, LoadTicket},
        transform::ImageHandle,
    },
    foundation::{
        core::PixelSize,
        error::{ReviewError, ReviewResult},
    },
    preview::{card::PreviewCard, raster::PreviewRasterizer},
    review::{
        draft::{CharCounter, Field, ReviewDraft},
        form::ReviewForm,
        validate::{FieldError, validate_field},
    },
};

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub filename: String,
    pub size: PixelSize,
    pub png_bytes: usize,
}

/// Owns the review being composed and everything derived from it.
///
/// All mutation goes through user-event methods; the draft itself is replaced by pure
/// updates. Rendering and delivery collaborators are passed in per call.
#[derive(Debug)]
pub struct Composer {
    config: ComposerConfig,
    draft: ReviewDraft,
    preview: PreviewCard,
    field_errors: Vec<FieldError>,
    session: CropSession,
    notifications: NotificationQueue,
}

impl Composer {
    pub fn new(config: ComposerConfig) -> ReviewResult<Self> {
        config.validate()?;
        let draft = ReviewDraft::default();
        Ok(Self {
            preview: PreviewCard::from_draft(&draft),
            session: CropSession::new(config.crop.clone()),
            config,
            draft,
            field_errors: Vec::new(),
            notifications: NotificationQueue::default(),
        })
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn preview(&self) -> &PreviewCard {
        &self.preview
    }

    pub fn session(&self) -> &CropSession {
        &self.session
    }

    pub fn char_counter(&self) -> CharCounter {
        self.draft.char_counter()
    }

    /// Inline errors from the last failed export; flagged fields are re-checked as they change.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn field_error(&self, field: Field) -> Option<&FieldError> {
        self.field_errors.iter().find(|e| e.field == field)
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// A form input changed.
    pub fn update_field(&mut self, field: Field, value: &str) {
        let draft = std::mem::take(&mut self.draft);
        self.draft = draft.with_field(field, value);
        self.refresh_field_error(field);
        self.rerender();
    }

    /// Apply every field of a submitted form.
    pub fn apply_form(&mut self, form: &ReviewForm) {
        for (field, value) in form.updates() {
            self.update_field(field, &value);
        }
    }

    /// A file was picked; the read completes later through [`Composer::file_loaded`].
    pub fn select_file(&mut self) -> LoadTicket {
        self.session.begin_load()
    }

    /// File bytes arrived. A staged image opens the cropper straight away.
    pub fn file_loaded(
        &mut self,
        ticket: LoadTicket,
        read: ReviewResult<Vec<u8>>,
    ) -> ReviewResult<Option<CropRegion>> {
        match self.session.finish_load(ticket, read) {
            LoadOutcome::Staged => self.session.present().map(Some),
            LoadOutcome::Superseded | LoadOutcome::Failed(_) => Ok(None),
        }
    }

    /// The crop widget reported a new selection.
    pub fn adjust_crop(&mut self, region: CropRegion) -> ReviewResult<CropRegion> {
        self.session.adjust(region)
    }

    /// Confirm the crop. On success the new image replaces any earlier one in the draft.
    ///
    /// An empty crop is only logged; the draft keeps its image and the cropper stays open.
    pub fn complete_crop(&mut self) -> ReviewResult<ImageHandle> {
        let image = self.session.confirm()?;
        let handle = image.handle();
        if let Some(old) = self.draft.image.as_ref() {
            tracing::debug!(old = %old.handle(), new = %handle, "image superseded");
        }
        let draft = std::mem::take(&mut self.draft);
        self.draft = draft.with_image(Some(image));
        self.rerender();
        Ok(handle)
    }

    /// Dismiss the cropper. Drops the staged file; an accepted image is never cleared.
    pub fn cancel_crop(&mut self) -> CancelOutcome {
        self.session.cancel()
    }

    /// Validate and, if everything is in place, rasterize the card and deliver it.
    ///
    /// Invalid fields yield [`ReviewError::FieldValidation`] plus one aggregate notification;
    /// a missing image yields [`ReviewError::MissingImage`] plus one notification. Neither
    /// touches the rasterizer or the sink.
    #[tracing::instrument(skip_all)]
    pub fn request_export(
        &mut self,
        rasterizer: &dyn PreviewRasterizer,
        sink: &mut dyn ExportSink,
    ) -> ReviewResult<ExportReport> {
        if let Err(err) = self.draft.validate() {
            self.field_errors = err.field_errors().to_vec();
            tracing::debug!(errors = ?self.field_errors, "export blocked by invalid fields");
            self.notifications.push(Notification::validation_failed());
            return Err(err);
        }
        self.field_errors.clear();

        let Some(image) = self.draft.image.as_ref() else {
            self.notifications.push(Notification::image_required());
            return Err(ReviewError::MissingImage);
        };

        let pixels = image.decode()?;
        let snapshot = rasterizer.rasterize(&self.preview, Some(&pixels), self.config.export_scale)?;
        let size = PixelSize::new(snapshot.width(), snapshot.height())?;
        let png = encode_png(snapshot)?;
        sink.deliver(&self.config.export_filename, &png)?;

        tracing::info!(
            filename = %self.config.export_filename,
            width = size.width,
            height = size.height,
            "review exported"
        );
        Ok(ExportReport {
            filename: self.config.export_filename.clone(),
            size,
            png_bytes: png.len(),
        })
    }

    /// Re-check a field that is currently flagged, so its inline error clears once fixed.
    fn refresh_field_error(&mut self, field: Field) {
        let Some(pos) = self.field_errors.iter().position(|e| e.field == field) else {
            return;
        };
        match validate_field(&self.draft, field) {
            Some(err) => self.field_errors[pos] = err,
            None => {
                self.field_errors.remove(pos);
            }
        }
    }

    fn rerender(&mut self) {
        self.preview = PreviewCard::from_draft(&self.draft);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
