use super::*;

fn checker() -> RgbaImage {
    RgbaImage::from_fn(4, 3, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 128])
        }
    })
}

#[test]
fn encode_png_decodes_back_to_same_pixels() {
    let img = checker();
    let png = encode_png(img.clone()).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let back = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(back, img);
}

#[test]
fn in_memory_sink_keeps_every_delivery() {
    let mut sink = InMemorySink::default();
    sink.deliver("review.png", b"one").unwrap();
    sink.deliver("review.png", b"two").unwrap();
    assert_eq!(
        sink.files,
        vec![
            ("review.png".to_owned(), b"one".to_vec()),
            ("review.png".to_owned(), b"two".to_vec()),
        ]
    );
}

#[test]
fn dir_sink_creates_directory_and_overwrites() {
    let dir = PathBuf::from("target").join("unit_dir_sink").join("nested");
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = DirSink::new(&dir);
    sink.deliver("review.png", b"first").unwrap();
    sink.deliver("review.png", b"second").unwrap();

    let path = dir.join("review.png");
    assert_eq!(std::fs::read(&path).unwrap(), b"second");
    assert_eq!(sink.written(), &[path.clone(), path]);
    assert_eq!(sink.dir(), dir.as_path());
}
