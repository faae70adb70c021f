use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::error::{ReviewError, ReviewResult};

/// Receives the exported PNG. Stands in for the browser download.
pub trait ExportSink {
    fn deliver(&mut self, filename: &str, png: &[u8]) -> ReviewResult<()>;
}

/// Writes exports into a directory, creating it if needed.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ExportSink for DirSink {
    fn deliver(&mut self, filename: &str, png: &[u8]) -> ReviewResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = png.len(), "export written");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps exports in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl ExportSink for InMemorySink {
    fn deliver(&mut self, filename: &str, png: &[u8]) -> ReviewResult<()> {
        self.files.push((filename.to_owned(), png.to_vec()));
        Ok(())
    }
}

pub fn encode_png(img: RgbaImage) -> ReviewResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ReviewError::image(format!("encode snapshot as PNG: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/export.rs"]
mod tests;
