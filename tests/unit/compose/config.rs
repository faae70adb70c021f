use super::*;

#[test]
fn empty_json_is_the_default_config() {
    let cfg: ComposerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, ComposerConfig::default());
    assert_eq!(cfg.export_scale, 2.0);
    assert_eq!(cfg.export_filename, "review.png");
    assert_eq!(cfg.crop.aspect_ratio, 2.0);
    cfg.validate().unwrap();
}

#[test]
fn nested_crop_options_parse() {
    let cfg: ComposerConfig = serde_json::from_str(
        r#"{"export_scale":1,"crop":{"geometry":"corrected","jpeg_quality":80}}"#,
    )
    .unwrap();
    assert_eq!(cfg.export_scale, 1.0);
    assert_eq!(cfg.crop.geometry, crate::crop::transform::CropGeometry::Corrected);
    assert_eq!(cfg.crop.jpeg_quality, 80);
    assert_eq!(cfg.crop.display_width, 600.0);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let bad = |f: fn(&mut ComposerConfig)| {
        let mut cfg = ComposerConfig::default();
        f(&mut cfg);
        cfg.validate().is_err()
    };
    assert!(bad(|c| c.export_scale = 0.0));
    assert!(bad(|c| c.export_scale = 9.0));
    assert!(bad(|c| c.export_filename = " ".into()));
    assert!(bad(|c| c.export_filename = "../x.png".into()));
    assert!(bad(|c| c.crop.jpeg_quality = 101));
}

#[test]
fn from_path_reports_missing_file() {
    let err = ComposerConfig::from_path(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("open config"));
}
