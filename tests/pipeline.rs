//! End-to-end scenarios across the whole engine: summarize, compare,
//! analyze, calibrate.

use layoutlens::{
    analyze, calibrate, compare, summarize_tree, CalibrationOptions, DiffOptions, DiffPattern,
    RawElement, Rect, Severity, Viewport,
};

fn viewport() -> Viewport {
    Viewport::new(1280, 720)
}

fn hello_heading(rect: Rect) -> RawElement {
    let mut el = RawElement::new("h1", rect);
    el.text = Some("Hello".into());
    el
}

#[test]
fn identical_single_node_pages_are_the_same_layout() {
    let base = summarize_tree(&hello_heading(Rect::new(0.0, 0.0, 200.0, 40.0)), viewport())
        .unwrap();
    let current =
        summarize_tree(&hello_heading(Rect::new(0.0, 0.0, 200.0, 40.0)), viewport()).unwrap();

    let report = compare(&base, &current, &DiffOptions::default());
    assert!((report.similarity.overall - 1.0).abs() < 1e-9);
    assert!(report.diff.is_empty());
    assert_eq!(report.diff.severity, Severity::Minimal);
}

#[test]
fn one_pixel_shift_is_detected_and_scored() {
    let base = summarize_tree(&hello_heading(Rect::new(0.0, 0.0, 200.0, 40.0)), viewport())
        .unwrap();
    let current =
        summarize_tree(&hello_heading(Rect::new(0.0, 1.0, 200.0, 40.0)), viewport()).unwrap();

    let report = compare(&base, &current, &DiffOptions::default());
    assert_eq!(report.diff.moved.len(), 1);
    assert!(report.diff.patterns.contains(&DiffPattern::MicroShift));
    assert!(
        (report.similarity.details.coordinate.position_score - 0.98).abs() < 1e-9,
        "a 1 px average shift scores 1 - 1/50 on position"
    );
    assert!(report.similarity.overall < 1.0);
}

#[test]
fn live_date_text_drives_calibration_to_ignore_text() {
    let day = |text: &str| {
        let mut el = RawElement::new("span", Rect::new(10.0, 10.0, 80.0, 20.0));
        el.text = Some(text.into());
        summarize_tree(&el, viewport()).unwrap()
    };
    let summaries = vec![day("Mon"), day("Tue"), day("Tue")];

    let stability = analyze(&summaries).unwrap();
    let profile = &stability.profiles[0];
    assert_eq!(profile.distinct_texts(), 2);
    assert!(profile.stability < 0.9);
    assert!(!profile.is_stable());

    let settings = calibrate(&stability, &CalibrationOptions::default());
    assert!(settings.ignore_attributes.contains(&"text".to_string()));
}

#[test]
fn a_larger_page_survives_a_full_round_trip() {
    let page = |shift: f64| {
        let mut root = RawElement::new("body", Rect::new(0.0, 0.0, 1280.0, 2000.0));
        let mut nav = RawElement::new("nav", Rect::new(0.0, 0.0, 1280.0, 60.0));
        nav.class = Some("main-nav".into());
        let mut title = hello_heading(Rect::new(40.0, 100.0 + shift, 600.0, 48.0));
        title.id = Some("page-title".into());
        let mut button = RawElement::new("button", Rect::new(40.0, 180.0, 120.0, 36.0));
        button.text = Some("Sign up".into());
        root.children = vec![nav, title, button];
        summarize_tree(&root, viewport()).unwrap()
    };

    let base = page(0.0);
    let current = page(3.0);
    let report = compare(&base, &current, &DiffOptions::default());
    assert_eq!(report.diff.moved.len(), 1);
    assert!(report.diff.added.is_empty());
    assert!(report.diff.removed.is_empty());
    assert!(report.diff.patterns.contains(&DiffPattern::SmallShift));
    assert!(report.similarity.overall > 0.9);
}

#[test]
fn comparison_report_serializes_for_the_reporting_layer() {
    let base = summarize_tree(&hello_heading(Rect::new(0.0, 0.0, 200.0, 40.0)), viewport())
        .unwrap();
    let current =
        summarize_tree(&hello_heading(Rect::new(4.0, 0.0, 200.0, 40.0)), viewport()).unwrap();
    let report = compare(&base, &current, &DiffOptions::default());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["similarity"]["overall"].is_f64());
    assert!(json["diff"]["moved"].is_array());
}
