use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Context as _;
use image::{ExtendedColorType, ImageEncoder, RgbaImage, codecs::jpeg::JpegEncoder};

use crate::{
    crop::region::CropRegion,
    foundation::{
        core::{PixelSize, Rect, Size},
        error::{ReviewError, ReviewResult},
    },
};

/// Output rasters larger than this on either side are rejected instead of allocated.
pub const MAX_OUTPUT_DIM: u32 = 16_384;

/// A decoded image together with the size it is displayed at while cropping.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
    natural: PixelSize,
    displayed: Size,
}

impl SourceImage {
    /// Decode any format `image` understands. The displayed size starts at the natural size.
    pub fn decode(bytes: &[u8]) -> ReviewResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        Self::from_rgba(dyn_img.to_rgba8())
    }

    pub fn from_rgba(pixels: RgbaImage) -> ReviewResult<Self> {
        let (w, h) = pixels.dimensions();
        let natural = PixelSize::new(w, h)?;
        Ok(Self {
            pixels: Arc::new(pixels),
            natural,
            displayed: natural.to_size(),
        })
    }

    pub fn with_displayed(mut self, displayed: Size) -> ReviewResult<Self> {
        if !(displayed.width.is_finite() && displayed.height.is_finite())
            || displayed.width <= 0.0
            || displayed.height <= 0.0
        {
            return Err(ReviewError::validation(format!(
                "displayed size must be positive (got {}x{})",
                displayed.width, displayed.height
            )));
        }
        self.displayed = displayed;
        Ok(self)
    }

    /// Lay the image out at `width` with its height following the aspect ratio, rounded to
    /// whole pixels as a rendered element reports them.
    pub fn displayed_at_width(self, width: f64) -> ReviewResult<Self> {
        let w = width.round();
        let h = (self.natural.height as f64 * w / self.natural.width as f64)
            .round()
            .max(1.0);
        self.with_displayed(Size::new(w, h))
    }

    pub fn natural(&self) -> PixelSize {
        self.natural
    }

    pub fn displayed(&self) -> Size {
        self.displayed
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// `(natural / displayed)` per axis.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.natural.width as f64 / self.displayed.width,
            self.natural.height as f64 / self.displayed.height,
        )
    }
}

/// How display-space regions map to output dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropGeometry {
    /// Height is scaled by the horizontal factor and the output is square by width.
    ///
    /// The square output is deliberate: a canvas sized `ceil(h * scale_x)` tall would keep the
    /// region's shape, but this policy keeps the width-by-width buffer the card has always
    /// received. Use [`CropGeometry::Corrected`] for shape-preserving output.
    #[default]
    Legacy,
    /// Height is scaled by the vertical factor and the output matches the source rect.
    Corrected,
}

/// Crop settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropOptions {
    /// Fixed selection aspect, `width / height`.
    pub aspect_ratio: f64,
    pub geometry: CropGeometry,
    /// JPEG quality of the finalized image, 1..=100.
    pub jpeg_quality: u8,
    /// Width the source is laid out at while the user selects a region.
    pub display_width: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 8.0,
            geometry: CropGeometry::Legacy,
            jpeg_quality: 92,
            display_width: 600.0,
        }
    }
}

impl CropOptions {
    pub fn validate(&self) -> ReviewResult<()> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ReviewError::validation("crop aspect_ratio must be > 0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ReviewError::validation(
                "crop jpeg_quality must be in 1..=100",
            ));
        }
        if !(self.display_width.is_finite() && self.display_width >= 1.0) {
            return Err(ReviewError::validation("crop display_width must be >= 1"));
        }
        Ok(())
    }
}

/// Native-space work for one crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropPlan {
    /// Rectangle read from the source, in natural pixels (not clamped).
    pub source_rect: Rect,
    /// Dimensions of the output buffer; either may be zero for a degenerate region.
    pub output_width: u32,
    pub output_height: u32,
}

/// Map a display-space region into native pixel space.
pub fn plan_crop(source: &SourceImage, region: &CropRegion, geometry: CropGeometry) -> CropPlan {
    let region = region.clamped(source.displayed());
    let (scale_x, scale_y) = source.scale();

    let native_w = region.width * scale_x;
    let native_h = match geometry {
        CropGeometry::Legacy => region.height * scale_x,
        CropGeometry::Corrected => region.height * scale_y,
    };
    let source_rect =
        Rect::from_origin_size((region.x * scale_x, region.y * scale_y), (native_w, native_h));

    let out_w = ceil_dim(native_w);
    let out_h = match geometry {
        CropGeometry::Legacy => out_w,
        CropGeometry::Corrected => ceil_dim(native_h),
    };

    CropPlan {
        source_rect,
        output_width: out_w,
        output_height: out_h,
    }
}

fn ceil_dim(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.ceil().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Opaque identity of a finalized image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub u64);

impl ImageHandle {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// A cropped image, JPEG-encoded.
#[derive(Clone, PartialEq)]
pub struct FinalizedImage {
    handle: ImageHandle,
    size: PixelSize,
    jpeg: Arc<[u8]>,
}

impl fmt::Debug for FinalizedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalizedImage")
            .field("handle", &self.handle)
            .field("size", &self.size)
            .field("jpeg_bytes", &self.jpeg.len())
            .finish()
    }
}

impl FinalizedImage {
    pub fn handle(&self) -> ImageHandle {
        self.handle
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Encoded JPEG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn decode(&self) -> ReviewResult<RgbaImage> {
        let img = image::load_from_memory_with_format(&self.jpeg, image::ImageFormat::Jpeg)
            .with_context(|| format!("decode finalized image {}", self.handle))?;
        Ok(img.to_rgba8())
    }
}

/// Crop `source` to `region` and encode the result.
///
/// Fails with [`ReviewError::EmptyCrop`] when the region maps to a zero-size output; the
/// caller keeps whatever image it already had.
#[tracing::instrument(skip_all, fields(geometry = ?opts.geometry))]
pub fn compute_cropped_image(
    source: &SourceImage,
    region: &CropRegion,
    opts: &CropOptions,
) -> ReviewResult<FinalizedImage> {
    let plan = plan_crop(source, region, opts.geometry);
    tracing::debug!(
        source_rect = ?plan.source_rect,
        out_w = plan.output_width,
        out_h = plan.output_height,
        "planned crop"
    );

    if plan.output_width == 0 || plan.output_height == 0 {
        return Err(ReviewError::empty_crop(format!(
            "region {:?} maps to a {}x{} output",
            region, plan.output_width, plan.output_height
        )));
    }
    if plan.output_width > MAX_OUTPUT_DIM || plan.output_height > MAX_OUTPUT_DIM {
        return Err(ReviewError::validation(format!(
            "crop output too large: {}x{} (max {MAX_OUTPUT_DIM}x{MAX_OUTPUT_DIM})",
            plan.output_width, plan.output_height
        )));
    }

    let out = draw_source_rect(source.pixels(), &plan);
    let jpeg = encode_jpeg(out, opts.jpeg_quality)?;

    let image = FinalizedImage {
        handle: ImageHandle::next(),
        size: PixelSize::new(plan.output_width, plan.output_height)?,
        jpeg: jpeg.into(),
    };
    tracing::debug!(handle = %image.handle, bytes = image.jpeg.len(), "crop finalized");
    Ok(image)
}

/// Copy the plan's source rect 1:1 into a fresh transparent buffer at the origin.
/// Parts of the rect outside the source stay transparent.
fn draw_source_rect(src: &RgbaImage, plan: &CropPlan) -> RgbaImage {
    let mut out = RgbaImage::new(plan.output_width, plan.output_height);

    let (nat_w, nat_h) = src.dimensions();
    let bounds = Rect::new(0.0, 0.0, nat_w as f64, nat_h as f64);
    let rect = plan.source_rect;

    let x0 = rect.x0.max(bounds.x0).floor();
    let y0 = rect.y0.max(bounds.y0).floor();
    let x1 = rect.x1.min(bounds.x1).ceil();
    let y1 = rect.y1.min(bounds.y1).ceil();
    if x1 <= x0 || y1 <= y0 {
        return out;
    }

    let sub = image::imageops::crop_imm(
        src,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image();
    let dx = (x0 - rect.x0).round() as i64;
    let dy = (y0 - rect.y0).round() as i64;
    image::imageops::replace(&mut out, &sub, dx, dy);
    out
}

/// Encode as JPEG. Alpha is dropped, so transparent pixels come out black.
fn encode_jpeg(img: RgbaImage, quality: u8) -> ReviewResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ReviewError::image(format!("encode cropped image as JPEG: {e}")))?;
    if buf.is_empty() {
        return Err(ReviewError::empty_crop("JPEG encoder produced no data"));
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/crop/transform.rs"]
mod tests;
