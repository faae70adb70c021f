use super::*;

const BODY: TextStyle = TextStyle {
    font_size: 16.0,
    line_height: 20.0,
    weight: 400,
    color: Rgba8::opaque(0, 0, 0),
};

/// Engine over the system fonts, or `None` on hosts without any installed face.
fn system_engine() -> Option<TextLayoutEngine> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let engine = TextLayoutEngine::from_fontdb(&db);
    if engine.family().is_none() {
        eprintln!("no system fonts installed; skipping shaped-text assertions");
        return None;
    }
    Some(engine)
}

#[test]
fn blank_text_has_no_lines() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.layout_lines("  \n\t ", &BODY, Some(100.0)).is_empty());
    if let Some(mut engine) = system_engine() {
        assert!(engine.layout_lines("   ", &BODY, Some(100.0)).is_empty());
    }
}

#[test]
fn without_faces_text_stays_on_one_collapsed_line() {
    let mut engine = TextLayoutEngine::new();
    assert_eq!(engine.family(), None);
    let lines = engine.layout_lines("one  two\nthree", &BODY, Some(10.0));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "one two three");
    assert_eq!(lines[0].width, 0.0);
    assert_eq!(lines[0].height, BODY.line_height);
}

#[test]
fn shaped_lines_fit_the_box_and_keep_every_word() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let text = "one  two\nthree four five six seven eight nine ten";
    let lines = engine.layout_lines(text, &BODY, Some(80.0));
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(line.width <= 80.0 + 0.5, "{line:?} wider than the box");
        assert!(line.height >= BODY.line_height);
        assert!(line.baseline > 0.0 && line.baseline <= line.height, "{line:?}");
        assert!(!line.text.contains("  "));
    }
    let joined = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(joined, "one two three four five six seven eight nine ten");
}

#[test]
fn measure_grows_with_text_and_size() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let short = engine.measure("Kind of Blue", &BODY);
    let long = engine.measure("Kind of Blue, remastered", &BODY);
    assert!(short > 0.0);
    assert!(long > short);

    let big = TextStyle {
        font_size: 32.0,
        ..BODY
    };
    assert!(engine.measure("Kind of Blue", &big) > short * 1.5);
}

#[test]
fn register_font_rejects_non_font_bytes() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.register_font(b"not a font".to_vec()).is_err());
    assert_eq!(engine.family(), None);
}
