use super::*;

#[test]
fn default_grid_places_only_the_first_row() {
    let layout = PoseCardLayout::default();
    assert_eq!(layout.card_width(), 475.0);
    let slots = layout.card_slots(4);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0], Rect::new(50.0, 1030.0, 525.0, 1470.0));
    assert_eq!(slots[1], Rect::new(555.0, 1030.0, 1030.0, 1470.0));
}

#[test]
fn shorter_cards_fit_two_rows() {
    let layout = PoseCardLayout {
        card_height: 380.0,
        ..PoseCardLayout::default()
    };
    let slots = layout.card_slots(6);
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[2].y0, 1030.0 + 380.0 + 30.0);
    assert!(slots.iter().all(|r| r.y1 <= 1920.0 - 60.0));
}

#[test]
fn fewer_drawings_than_slots() {
    assert_eq!(PoseCardLayout::default().card_slots(1).len(), 1);
    assert!(PoseCardLayout::default().card_slots(0).is_empty());
}

#[test]
fn session_height_grows_per_pose() {
    let layout = SessionLayout::default();
    assert_eq!(layout.canvas_height(3).unwrap(), 400 + 3 * 920 + 200);
    assert_eq!(layout.canvas_height(0).unwrap(), 600);
    assert!(layout.canvas_height(usize::MAX).is_err());
}

#[test]
fn session_slots_follow_reference() {
    let layout = SessionLayout::default();
    let top = layout.section_top(1);
    assert_eq!(top, 1320.0);
    assert_eq!(layout.reference_rect(top), Rect::new(100.0, 1400.0, 550.0, 2000.0));

    let slots = layout.drawing_slots(top, 7);
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0].x0, 610.0);
    assert_eq!(slots[3].x0, 610.0 + 3.0 * 340.0);
    assert_eq!(slots[3].x1, 1930.0);
}

#[test]
fn labels_substitute_placeholders() {
    let labels = Labels::default();
    assert_eq!(labels.pose_title(3), "POSE #3");
    assert_eq!(
        labels.session_stats(12, "7.4"),
        "TOTAL DIBUJOS: 12   •   PUNTUACIÓN MEDIA: 7.4/10"
    );
}

#[test]
fn partial_json_keeps_defaults() {
    let json = r##"{
        "pose_card": {"card_height": 380},
        "theme": {"good_score": "#00ff00"},
        "good_score_threshold": 75,
        "fetch_timeout_secs": 10
    }"##;
    let opts = ExportOptions::from_reader(json.as_bytes()).unwrap();
    assert_eq!(opts.pose_card.card_height, 380.0);
    assert_eq!(opts.pose_card.width, 1080);
    assert_eq!(opts.theme.good_score, Rgba8::rgb(0, 255, 0));
    assert_eq!(opts.theme.fair_score, Theme::default().fair_score);
    assert_eq!(opts.good_score_threshold, 75.0);
    assert_eq!(opts.fetch_timeout(), Some(Duration::from_secs(10)));
    assert_eq!(opts.labels, Labels::default());
}

#[test]
fn invalid_options_are_rejected() {
    let err = ExportOptions::from_reader(r#"{"pose_card": {"columns": 0}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PosecardError::Validation(_)));

    let err =
        ExportOptions::from_reader(r#"{"pose_card": {"max_cards": 5}}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("max_cards"));

    let err =
        ExportOptions::from_reader(r#"{"session": {"max_drawings": 6}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PosecardError::Validation(_)));

    let fewer = ExportOptions::from_reader(r#"{"session": {"max_drawings": 2}}"#.as_bytes());
    assert_eq!(fewer.unwrap().session.max_drawings, 2);

    let err = ExportOptions::from_reader(r#"{"labels": 5}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PosecardError::Serde(_)));
}

#[test]
fn default_theme_colors() {
    let theme = Theme::default();
    assert_eq!(theme.good_score, Rgba8::new(16, 185, 129, 230));
    assert_eq!(theme.fair_score, Rgba8::new(245, 158, 11, 230));
    assert_eq!(theme.name_pill.a, 153);
}
