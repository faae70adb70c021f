use std::{cell::RefCell, path::Path, sync::Arc};

use image::RgbaImage;
use resvg::tiny_skia;

use crate::{
    foundation::{
        core::Rect,
        error::{ReviewError, ReviewResult},
    },
    preview::{card::PreviewCard, layout::CardLayout, svg::card_svg, text::TextLayoutEngine},
};

/// Snapshots larger than this on either side are rejected instead of allocated.
pub const MAX_SNAPSHOT_DIM: u32 = 16_384;

/// Turns a preview card into pixels.
pub trait PreviewRasterizer {
    /// Rasterize `card` at `scale` device pixels per CSS pixel. `image` is the decoded
    /// finalized image, drawn cover-fitted into the card's image slot.
    fn rasterize(
        &self,
        card: &PreviewCard,
        image: Option<&RgbaImage>,
        scale: f32,
    ) -> ReviewResult<RgbaImage>;
}

/// CPU rasterizer: card layout → SVG → `resvg`, then the image composited with `tiny-skia`.
///
/// Text is shaped with Parley over the same font set `usvg` renders with.
pub struct CardRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
    text: RefCell<TextLayoutEngine>,
}

impl CardRasterizer {
    /// System fonts plus any `.ttf`/`.otf`/`.ttc` files in `fonts_dir`.
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "card font database ready");
        let text = TextLayoutEngine::from_fontdb(&db);
        Self {
            fontdb: Arc::new(db),
            text: RefCell::new(text),
        }
    }

    pub fn font_face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Family card text is shaped and rendered with.
    pub fn font_family(&self) -> Option<String> {
        self.text.borrow().family().map(str::to_owned)
    }

    /// Lay out `card` the way [`PreviewRasterizer::rasterize`] will draw it.
    pub fn layout(&self, card: &PreviewCard) -> CardLayout {
        CardLayout::compute(card, &mut self.text.borrow_mut())
    }
}

impl PreviewRasterizer for CardRasterizer {
    #[tracing::instrument(skip(self, card, image), fields(has_image = image.is_some()))]
    fn rasterize(
        &self,
        card: &PreviewCard,
        image: Option<&RgbaImage>,
        scale: f32,
    ) -> ReviewResult<RgbaImage> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ReviewError::validation("rasterize scale must be > 0"));
        }

        let layout = self.layout(card);
        let svg = card_svg(&layout);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| ReviewError::render(format!("parse card svg: {e}")))?;

        let width = to_px(layout.size.width as f32 * scale)?;
        let height = to_px(layout.size.height as f32 * scale)?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ReviewError::render("failed to allocate card pixmap"))?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        if let (Some(slot), Some(image)) = (layout.image_slot, image) {
            draw_cover(&mut pixmap, image, slot, scale)?;
        }

        tracing::debug!(width, height, "card rasterized");
        Ok(pixmap_to_rgba(&pixmap))
    }
}

fn to_px(v: f32) -> ReviewResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ReviewError::render("card has invalid width/height"));
    }
    let px = (v.ceil() as u32).max(1);
    if px > MAX_SNAPSHOT_DIM {
        return Err(ReviewError::render(format!(
            "card raster too large: {px} px (max {MAX_SNAPSHOT_DIM})"
        )));
    }
    Ok(px)
}

/// Scale `image` to cover `slot` (cropping the overflow, centered) and draw it.
fn draw_cover(
    pixmap: &mut tiny_skia::Pixmap,
    image: &RgbaImage,
    slot: Rect,
    scale: f32,
) -> ReviewResult<()> {
    let s = scale as f64;
    let x = (slot.x0 * s).round() as i32;
    let y = (slot.y0 * s).round() as i32;
    let w = ((slot.width() * s).round() as u32).max(1);
    let h = ((slot.height() * s).round() as u32).max(1);

    let fitted = image::DynamicImage::ImageRgba8(image.clone())
        .resize_to_fill(w, h, image::imageops::FilterType::Triangle)
        .to_rgba8();
    let (fw, fh) = fitted.dimensions();
    let mut data = fitted.into_raw();
    premultiply_rgba8_in_place(&mut data);

    let size = tiny_skia::IntSize::from_wh(fw, fh)
        .ok_or_else(|| ReviewError::render("image slot has zero size"))?;
    let src = tiny_skia::Pixmap::from_vec(data, size)
        .ok_or_else(|| ReviewError::render("failed to wrap image pixels"))?;
    pixmap.draw_pixmap(
        x,
        y,
        src.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::identity(),
        None,
    );
    Ok(())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "fonts directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "skipping font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/raster.rs"]
mod tests;
