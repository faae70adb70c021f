use super::*;

use image::Rgba;

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 80, 255])
    })
}

fn half_scale_source() -> SourceImage {
    SourceImage::from_rgba(gradient(1000, 500))
        .unwrap()
        .with_displayed(Size::new(500.0, 250.0))
        .unwrap()
}

#[test]
fn legacy_plan_reuses_horizontal_scale_and_squares_output() {
    let source = half_scale_source();
    let region = CropRegion::px(100.0, 50.0, 200.0, 100.0);
    let plan = plan_crop(&source, &region, CropGeometry::Legacy);

    assert_eq!(plan.source_rect.x0, 200.0);
    assert_eq!(plan.source_rect.y0, 100.0);
    assert_eq!(plan.source_rect.width(), 400.0);
    assert_eq!(plan.source_rect.height(), 200.0);
    assert_eq!((plan.output_width, plan.output_height), (400, 400));
}

#[test]
fn legacy_height_uses_x_scale_even_when_axes_differ() {
    // scale_x = 4, scale_y = 2
    let source = SourceImage::from_rgba(gradient(800, 200))
        .unwrap()
        .with_displayed(Size::new(200.0, 100.0))
        .unwrap();
    let region = CropRegion::px(10.0, 10.0, 20.0, 10.0);

    let legacy = plan_crop(&source, &region, CropGeometry::Legacy);
    assert_eq!(legacy.source_rect.y0, 20.0);
    assert_eq!(legacy.source_rect.height(), 40.0);
    assert_eq!((legacy.output_width, legacy.output_height), (80, 80));

    let corrected = plan_crop(&source, &region, CropGeometry::Corrected);
    assert_eq!(corrected.source_rect.height(), 20.0);
    assert_eq!((corrected.output_width, corrected.output_height), (80, 20));
}

#[test]
fn output_dims_round_up() {
    let source = SourceImage::from_rgba(gradient(300, 300))
        .unwrap()
        .with_displayed(Size::new(200.0, 200.0))
        .unwrap();
    let plan = plan_crop(
        &source,
        &CropRegion::px(0.0, 0.0, 33.0, 11.0),
        CropGeometry::Corrected,
    );
    assert_eq!((plan.output_width, plan.output_height), (50, 17));
}

#[test]
fn computed_image_matches_planned_dimensions() {
    let source = half_scale_source();
    let region = CropRegion::px(100.0, 50.0, 200.0, 100.0);
    let img = compute_cropped_image(&source, &region, &CropOptions::default()).unwrap();
    assert_eq!(img.size(), PixelSize::new(400, 400).unwrap());
    assert_eq!(&img.bytes()[..2], &[0xFF, 0xD8]);

    let decoded = img.decode().unwrap();
    assert_eq!(decoded.dimensions(), (400, 400));
}

#[test]
fn copied_pixels_come_from_the_native_rect() {
    let mut src = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255]));
    for y in 4..8 {
        for x in 8..16 {
            src.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }
    // displayed at half size: region (4,2,4,2) -> native (8,4,8,4)
    let source = SourceImage::from_rgba(src)
        .unwrap()
        .with_displayed(Size::new(20.0, 10.0))
        .unwrap();
    let opts = CropOptions {
        geometry: CropGeometry::Corrected,
        jpeg_quality: 100,
        ..CropOptions::default()
    };
    let img = compute_cropped_image(&source, &CropRegion::px(4.0, 2.0, 4.0, 2.0), &opts).unwrap();
    let decoded = img.decode().unwrap();
    assert_eq!(decoded.dimensions(), (8, 4));
    for (x, y) in [(1, 1), (6, 2)] {
        let p = decoded.get_pixel(x, y);
        assert!(p[0] > 200 && p[2] < 60, "expected red at ({x},{y}), got {p:?}");
    }
}

#[test]
fn zero_size_region_is_an_empty_crop() {
    let source = half_scale_source();
    let err = compute_cropped_image(
        &source,
        &CropRegion::px(10.0, 10.0, 0.0, 50.0),
        &CropOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReviewError::EmptyCrop(_)));

    let opts = CropOptions {
        geometry: CropGeometry::Corrected,
        ..CropOptions::default()
    };
    let err = compute_cropped_image(&source, &CropRegion::px(10.0, 10.0, 50.0, 0.0), &opts)
        .unwrap_err();
    assert!(matches!(err, ReviewError::EmptyCrop(_)));
}

#[test]
fn displayed_at_width_keeps_aspect() {
    let source = SourceImage::from_rgba(gradient(1000, 500))
        .unwrap()
        .displayed_at_width(600.0)
        .unwrap();
    assert_eq!(source.displayed(), Size::new(600.0, 300.0));
    let (sx, sy) = source.scale();
    assert!((sx - 1000.0 / 600.0).abs() < 1e-12);
    assert!((sy - 500.0 / 300.0).abs() < 1e-12);
}

#[test]
fn decode_rejects_garbage_and_bad_display_sizes() {
    assert!(SourceImage::decode(b"not an image").is_err());
    let s = SourceImage::from_rgba(gradient(4, 4)).unwrap();
    assert!(s.clone().with_displayed(Size::new(0.0, 4.0)).is_err());
    assert!(s.with_displayed(Size::new(f64::NAN, 4.0)).is_err());
}

#[test]
fn handles_are_unique() {
    let source = half_scale_source();
    let region = CropRegion::px(0.0, 0.0, 20.0, 10.0);
    let a = compute_cropped_image(&source, &region, &CropOptions::default()).unwrap();
    let b = compute_cropped_image(&source, &region, &CropOptions::default()).unwrap();
    assert_ne!(a.handle(), b.handle());
}

#[test]
fn options_validate_ranges() {
    CropOptions::default().validate().unwrap();
    let bad = CropOptions {
        jpeg_quality: 0,
        ..CropOptions::default()
    };
    assert!(bad.validate().is_err());
    let bad = CropOptions {
        aspect_ratio: 0.0,
        ..CropOptions::default()
    };
    assert!(bad.validate().is_err());
}
