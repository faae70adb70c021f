use super::*;

fn filled() -> ReviewDraft {
    ReviewDraft::default()
        .with_field(Field::Title, "Kind of Blue")
        .with_field(Field::ReleaseInfo, "1959")
        .with_field(Field::Tags, "jazz, modal")
        .with_field(Field::Score, "9.5")
        .with_field(Field::ReviewText, "Still the benchmark.")
}

#[test]
fn complete_form_is_valid_without_image() {
    filled().validate().unwrap();
}

#[test]
fn empty_form_reports_every_field_in_order() {
    let errors = field_errors(&ReviewDraft::default());
    let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, Field::ALL.to_vec());
    assert_eq!(errors[0].message, "Title is required");
    assert_eq!(errors[2].message, "At least one tag is required");
    assert_eq!(errors[3].message, "Score is required");
}

#[test]
fn only_the_empty_string_is_missing() {
    let d = filled().with_field(Field::Title, "");
    let err = d.validate().unwrap_err();
    assert_eq!(
        err.field_errors(),
        &[FieldError::new(Field::Title, "Title is required")]
    );

    let d = filled()
        .with_field(Field::Title, " ")
        .with_field(Field::ReleaseInfo, "\t")
        .with_field(Field::ReviewText, "  ");
    d.validate().unwrap();
}

#[test]
fn whitespace_tags_pass_and_render_one_empty_tag() {
    let d = filled().with_field(Field::Tags, "   ");
    assert!(validate_field(&d, Field::Tags).is_none());
    assert_eq!(d.tag_list(), vec![String::new()]);
}

#[test]
fn score_range_is_inclusive() {
    assert!(validate_field(&filled().with_field(Field::Score, "0"), Field::Score).is_none());
    assert!(validate_field(&filled().with_field(Field::Score, "10"), Field::Score).is_none());
    let e = validate_field(&filled().with_field(Field::Score, "10.1"), Field::Score).unwrap();
    assert_eq!(e.message, "Score must be between 0 and 10");
    let e = validate_field(&filled().with_field(Field::Score, "-1"), Field::Score).unwrap();
    assert_eq!(e.message, "Score must be between 0 and 10");
}

#[test]
fn overlong_review_is_rejected_when_set_directly() {
    let mut d = filled();
    d.review_text = "x".repeat(301);
    let e = validate_field(&d, Field::ReviewText).unwrap();
    assert_eq!(e.message, "Review must be 300 characters or less");

    d.review_text = "x".repeat(300);
    assert!(validate_field(&d, Field::ReviewText).is_none());

    d.review_text = format!("{}🎷", "x".repeat(299));
    assert!(validate_field(&d, Field::ReviewText).is_some());
}
