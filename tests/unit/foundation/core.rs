use super::*;

#[test]
fn pixel_size_rejects_zero() {
    assert!(PixelSize::new(0, 10).is_err());
    assert!(PixelSize::new(10, 0).is_err());
    let s = PixelSize::new(4, 3).unwrap();
    assert_eq!(s.area(), 12);
    assert_eq!(s.to_size(), Size::new(4.0, 3.0));
}

#[test]
fn rgba_hex_is_lowercase_rrggbb() {
    assert_eq!(Rgba8::opaque(0xdb, 0xea, 0xfe).to_hex(), "#dbeafe");
    assert_eq!(Rgba8::WHITE.opacity(), 1.0);
}
