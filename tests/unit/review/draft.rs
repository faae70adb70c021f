use super::*;

#[test]
fn tags_are_trimmed_and_ordered() {
    assert_eq!(split_tags("a, b ,c"), vec!["a", "b", "c"]);
}

#[test]
fn empty_tags_yield_one_empty_tag() {
    assert_eq!(split_tags(""), vec![String::new()]);
    assert_eq!(split_tags("rock,,jazz"), vec!["rock", "", "jazz"]);
}

#[test]
fn stars_follow_half_score_rounding() {
    for tenth in 0..=100 {
        let s = tenth as f64 / 10.0;
        let expected = (s / 2.0).round().clamp(0.0, 5.0) as u8;
        assert_eq!(filled_stars(s), expected, "score {s}");
    }
    assert_eq!(filled_stars(5.0), 3);
    assert_eq!(filled_stars(4.9), 2);
    assert_eq!(filled_stars(10.0), 5);
}

#[test]
fn stars_clamp_out_of_range_scores() {
    assert_eq!(filled_stars(-3.0), 0);
    assert_eq!(filled_stars(42.0), 5);
    assert_eq!(filled_stars(f64::NAN), 0);
}

#[test]
fn score_follows_number_input_rules() {
    let d = ReviewDraft::default().with_field(Field::Score, " 7.5 ");
    assert_eq!(d.score, Some(7.5));
    assert_eq!(d.field_value(Field::Score), "7.5");

    let d = d.with_field(Field::Score, "seven");
    assert_eq!(d.score, None);
    assert_eq!(d.filled_stars(), 0);

    let d = d.with_field(Field::Score, "");
    assert_eq!(d.score, None);
}

#[test]
fn review_text_is_capped_and_counter_tracks_it() {
    let mut draft = ReviewDraft::default();
    let mut typed = String::new();
    for i in 0..320 {
        typed.push(if i % 7 == 0 { 'é' } else { 'x' });
        draft = draft.with_field(Field::ReviewText, &typed);
        let counter = draft.char_counter();
        assert!(counter.count <= REVIEW_TEXT_MAX_CHARS);
        assert_eq!(counter.count, text_length(&draft.review_text));
        assert_eq!(counter.count, text_length(&typed).min(REVIEW_TEXT_MAX_CHARS));
    }
    assert!(draft.char_counter().at_limit());
    assert_eq!(draft.char_counter().to_string(), "300/300");
}

#[test]
fn review_text_counts_utf16_units_like_a_textarea() {
    assert_eq!(text_length("ab"), 2);
    assert_eq!(text_length("🎷"), 2);

    let draft = ReviewDraft::default().with_field(Field::ReviewText, &"🎷".repeat(200));
    assert_eq!(draft.review_text.chars().count(), 150);
    assert_eq!(draft.char_counter().to_string(), "300/300");

    // an emoji that would straddle the limit is dropped whole
    let typed = format!("{}🎷", "x".repeat(299));
    let draft = ReviewDraft::default().with_field(Field::ReviewText, &typed);
    assert_eq!(draft.review_text, "x".repeat(299));
    assert_eq!(draft.char_counter().count, 299);
}

#[test]
fn with_field_leaves_other_fields_alone() {
    let d = ReviewDraft::default()
        .with_field(Field::Title, "Blue Train")
        .with_field(Field::Tags, "jazz, hard bop")
        .with_field(Field::ReleaseInfo, "1957 · Blue Note");
    assert_eq!(d.title, "Blue Train");
    assert_eq!(d.tag_list(), vec!["jazz", "hard bop"]);
    assert_eq!(d.release_info, "1957 · Blue Note");
    assert!(d.image.is_none());
    assert_eq!(Field::ReleaseInfo.to_string(), "releaseInfo");
}
