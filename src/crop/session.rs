use std::fmt;

use crate::{
    crop::{
        region::CropRegion,
        transform::{CropOptions, FinalizedImage, SourceImage, compute_cropped_image},
    },
    foundation::error::{ReviewError, ReviewResult},
};

/// Where a crop interaction stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropPhase {
    /// Nothing staged; a load may be pending.
    Idle,
    /// A file was read and decoded, the cropper is not shown yet.
    Staged,
    /// The cropper is shown and the region can be adjusted.
    Cropping,
    /// The crop was confirmed. Terminal until the next file selection.
    Finalized,
    /// The interaction was dismissed before anything was finalized.
    Cancelled,
}

impl fmt::Display for CropPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CropPhase::Idle => "idle",
            CropPhase::Staged => "staged",
            CropPhase::Cropping => "cropping",
            CropPhase::Finalized => "finalized",
            CropPhase::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Identifies one file selection. Only the newest ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Result of delivering a file read to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// The image is decoded and staged.
    Staged,
    /// A newer selection replaced this one; the bytes were dropped.
    Superseded,
    /// Reading or decoding failed; the session is back to idle.
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The staged image and region were dropped.
    Discarded,
    /// Nothing to cancel, or the crop was already finalized.
    Ignored,
}

/// State machine of one upload-and-crop cycle.
///
/// File reads are two-phase: [`CropSession::begin_load`] hands out a ticket and
/// [`CropSession::finish_load`] delivers the bytes. Selecting another file before the
/// previous read lands (or while cropping) supersedes it.
#[derive(Debug)]
pub struct CropSession {
    opts: CropOptions,
    phase: CropPhase,
    last_ticket: u64,
    pending: Option<LoadTicket>,
    source: Option<SourceImage>,
    region: Option<CropRegion>,
}

impl CropSession {
    pub fn new(opts: CropOptions) -> Self {
        Self {
            opts,
            phase: CropPhase::Idle,
            last_ticket: 0,
            pending: None,
            source: None,
            region: None,
        }
    }

    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    pub fn options(&self) -> &CropOptions {
        &self.opts
    }

    pub fn pending(&self) -> Option<LoadTicket> {
        self.pending
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Current selection in display pixels, while cropping.
    pub fn region(&self) -> Option<CropRegion> {
        self.region
    }

    /// A file was selected. Restarts the cycle and supersedes any earlier selection.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        if let Some(old) = self.pending.replace(ticket) {
            tracing::debug!(?old, new = ?ticket, "pending load superseded");
        }
        self.source = None;
        self.region = None;
        self.transition(CropPhase::Idle);
        ticket
    }

    /// Deliver the bytes (or read error) for `ticket`.
    pub fn finish_load(&mut self, ticket: LoadTicket, read: ReviewResult<Vec<u8>>) -> LoadOutcome {
        if self.pending != Some(ticket) {
            tracing::warn!(?ticket, current = ?self.pending, "ignoring stale file load");
            return LoadOutcome::Superseded;
        }
        self.pending = None;

        match read.and_then(|bytes| SourceImage::decode(&bytes)) {
            Ok(source) => {
                tracing::debug!(natural = ?source.natural(), "file staged");
                self.source = Some(source);
                self.transition(CropPhase::Staged);
                LoadOutcome::Staged
            }
            Err(err) => {
                tracing::warn!(error = %err, "file load failed");
                self.transition(CropPhase::Idle);
                LoadOutcome::Failed(err.to_string())
            }
        }
    }

    /// Show the cropper: lay the source out at the configured display width and select the
    /// largest centered region of the fixed aspect ratio.
    pub fn present(&mut self) -> ReviewResult<CropRegion> {
        self.expect_phase(CropPhase::Staged, "present the cropper")?;
        let source = self
            .source
            .clone()
            .ok_or_else(|| ReviewError::validation("no staged image to crop"))?
            .displayed_at_width(self.opts.display_width)?;
        let region = CropRegion::full_bounds(source.displayed(), self.opts.aspect_ratio);

        self.source = Some(source);
        self.region = Some(region);
        self.transition(CropPhase::Cropping);
        Ok(region)
    }

    /// Replace the selection. The stored region is clamped to the displayed image and held to
    /// the fixed aspect ratio by shrinking its longer side.
    pub fn adjust(&mut self, region: CropRegion) -> ReviewResult<CropRegion> {
        self.expect_phase(CropPhase::Cropping, "adjust the crop")?;
        let displayed = self
            .source
            .as_ref()
            .map(SourceImage::displayed)
            .ok_or_else(|| ReviewError::validation("no image is being cropped"))?;
        let region = region
            .clamped(displayed)
            .fit_aspect(self.opts.aspect_ratio)
            .clamped(displayed);
        self.region = Some(region);
        Ok(region)
    }

    /// Confirm the selection and produce the finalized image.
    ///
    /// On failure the session stays in [`CropPhase::Cropping`] so the user can retry.
    pub fn confirm(&mut self) -> ReviewResult<FinalizedImage> {
        self.expect_phase(CropPhase::Cropping, "confirm the crop")?;
        let (Some(source), Some(region)) = (self.source.as_ref(), self.region) else {
            return Err(ReviewError::validation("no image is being cropped"));
        };

        match compute_cropped_image(source, &region, &self.opts) {
            Ok(image) => {
                self.source = None;
                self.region = None;
                self.transition(CropPhase::Finalized);
                Ok(image)
            }
            Err(err) => {
                tracing::warn!(error = %err, "crop produced no image");
                Err(err)
            }
        }
    }

    /// Dismiss the cropper. Only an unfinished crop is discarded.
    pub fn cancel(&mut self) -> CancelOutcome {
        match self.phase {
            CropPhase::Staged | CropPhase::Cropping => {}
            CropPhase::Idle if self.pending.is_some() => {}
            _ => return CancelOutcome::Ignored,
        }
        self.pending = None;
        self.source = None;
        self.region = None;
        self.transition(CropPhase::Cancelled);
        CancelOutcome::Discarded
    }

    fn expect_phase(&self, want: CropPhase, action: &str) -> ReviewResult<()> {
        if self.phase != want {
            return Err(ReviewError::validation(format!(
                "cannot {action} while {} (expected {want})",
                self.phase
            )));
        }
        Ok(())
    }

    fn transition(&mut self, to: CropPhase) {
        if self.phase != to {
            tracing::debug!(from = %self.phase, %to, "crop phase");
        }
        self.phase = to;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/session.rs"]
mod tests;
