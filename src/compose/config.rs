use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    crop::transform::CropOptions,
    foundation::error::{ReviewError, ReviewResult},
};

/// Largest accepted export scale.
pub const MAX_EXPORT_SCALE: f32 = 8.0;

/// Composer settings. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Device pixels per CSS pixel of the exported snapshot.
    pub export_scale: f32,
    pub export_filename: String,
    /// Extra font files for the card, on top of system fonts.
    pub fonts_dir: Option<PathBuf>,
    pub crop: CropOptions,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            export_scale: 2.0,
            export_filename: "review.png".to_owned(),
            fonts_dir: None,
            crop: CropOptions::default(),
        }
    }
}

impl ComposerConfig {
    pub fn from_path(path: &Path) -> ReviewResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReviewResult<()> {
        if !(self.export_scale.is_finite()
            && self.export_scale > 0.0
            && self.export_scale <= MAX_EXPORT_SCALE)
        {
            return Err(ReviewError::validation(format!(
                "export_scale must be in (0, {MAX_EXPORT_SCALE}]"
            )));
        }
        let name = self.export_filename.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ReviewError::validation(
                "export_filename must be a non-empty file name",
            ));
        }
        self.crop.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/config.rs"]
mod tests;
