use super::*;
use crate::{crop::transform::ImageHandle, preview::layout::palette};

fn card(image: bool) -> PreviewCard {
    PreviewCard {
        title: "Title".into(),
        release_info: "Release Info".into(),
        tags: vec!["tag".into()],
        filled_stars: 5,
        score_label: "10/10".into(),
        review_text: "Review".into(),
        image: image.then_some(ImageHandle(1)),
    }
}

fn near(px: &image::Rgba<u8>, want: crate::foundation::core::Rgba8) -> bool {
    let d = |a: u8, b: u8| (a as i16 - b as i16).abs() <= 6;
    d(px[0], want.r) && d(px[1], want.g) && d(px[2], want.b)
}

#[test]
fn snapshot_size_follows_scale() {
    let r = CardRasterizer::new(None);
    let layout = r.layout(&card(false));
    let one = r.rasterize(&card(false), None, 1.0).unwrap();
    let two = r.rasterize(&card(false), None, 2.0).unwrap();
    assert_eq!(one.width(), layout.size.width.ceil() as u32);
    assert_eq!(one.height(), layout.size.height.ceil() as u32);
    assert_eq!(two.width(), one.width() * 2);
    assert_eq!(two.height(), one.height() * 2);
}

#[test]
fn image_is_cover_fitted_into_slot() {
    let r = CardRasterizer::new(None);
    let cover = RgbaImage::from_pixel(300, 50, image::Rgba([200, 20, 20, 255]));
    let out = r.rasterize(&card(true), Some(&cover), 2.0).unwrap();

    let slot = r.layout(&card(true)).image_slot.unwrap();
    let samples = [
        (slot.x0 + 2.0, slot.y0 + 2.0),
        (slot.center().x, slot.center().y),
        (slot.x1 - 2.0, slot.y1 - 2.0),
    ];
    for (x, y) in samples {
        let px = out.get_pixel((x * 2.0) as u32, (y * 2.0) as u32);
        assert!(near(px, crate::foundation::core::Rgba8::opaque(200, 20, 20)), "{px:?}");
    }
}

#[test]
fn filled_stars_are_yellow() {
    let r = CardRasterizer::new(None);
    let out = r.rasterize(&card(false), None, 1.0).unwrap();
    let star = r.layout(&card(false)).stars[0].rect;
    let c = star.center();
    assert!(near(out.get_pixel(c.x as u32, c.y as u32), palette::STAR_ON));
    // outside the card border the snapshot background is white
    assert!(near(out.get_pixel(0, 0), palette::BACKGROUND));
}

#[test]
fn layout_uses_the_rendering_font_set() {
    let r = CardRasterizer::new(None);
    let layout = r.layout(&card(false));
    assert_eq!(layout.font_family, r.font_family());
    if r.font_face_count() == 0 {
        assert_eq!(r.font_family(), None);
    }
}

#[test]
fn rejects_bad_scale() {
    let r = CardRasterizer::new(None);
    assert!(r.rasterize(&card(false), None, 0.0).is_err());
    assert!(r.rasterize(&card(false), None, f32::NAN).is_err());
}
