use super::*;

fn minimal_spec() -> RenderSpec {
    RenderSpec {
        video_src: "clip.mp4".to_owned(),
        caption: String::new(),
        background_src: None,
        is_greenscreen: false,
        text_style: None,
        labels: Vec::new(),
        label_style: None,
        is_cropped: false,
    }
}

#[test]
fn resolve_applies_documented_defaults() {
    let r = minimal_spec().resolve().unwrap();
    assert_eq!(r.mode, RenderMode::Standard);
    assert_eq!(r.text.font, "Impact");
    assert_eq!(r.text.size, 78.0);
    assert_eq!(r.text.color, TextColor::Primary);
    assert_eq!(r.text.stroke_weight, 0.08);
    assert_eq!(r.text.alignment, HAlign::Center);
    assert_eq!(r.text.vertical_position, 25.0);
    assert_eq!(r.label_style.color, TextColor::Primary);
    assert_eq!(r.label_style.background, LabelBackground::Primary);
    assert_eq!(r.label_style.background_opacity, 0.5);
}

#[test]
fn greenscreen_takes_precedence_over_crop() {
    let mut spec = minimal_spec();
    spec.is_greenscreen = true;
    spec.background_src = Some("bg.png".to_owned());
    spec.is_cropped = true;
    assert_eq!(spec.resolve().unwrap().mode, RenderMode::Greenscreen);
}

#[test]
fn crop_mode_engages_only_outside_greenscreen() {
    let mut spec = minimal_spec();
    spec.is_cropped = true;
    assert_eq!(spec.resolve().unwrap().mode, RenderMode::Cropped);

    // A greenscreen request without a background image falls back to the
    // standard canvas and still blocks crop mode.
    spec.is_greenscreen = true;
    assert_eq!(spec.resolve().unwrap().mode, RenderMode::Standard);
}

#[test]
fn labels_fall_back_to_shared_style_then_defaults() {
    let mut spec = minimal_spec();
    spec.labels = vec![Label {
        id: "l1".to_owned(),
        text: "hi".to_owned(),
        horizontal_position: 50.0,
        vertical_position: 50.0,
        size: None,
        font: None,
    }];
    let r = spec.resolve().unwrap();
    assert_eq!(r.labels[0].font, "Impact");
    assert_eq!(r.labels[0].size, DEFAULT_LABEL_SIZE);

    spec.label_style = Some(LabelStyle {
        font: Some("Anton".to_owned()),
        size: Some(60.0),
        ..LabelStyle::default()
    });
    let r = spec.resolve().unwrap();
    assert_eq!(r.labels[0].font, "Anton");
    assert_eq!(r.labels[0].size, 60.0);

    spec.labels[0].font = Some("Oswald".to_owned());
    spec.labels[0].size = Some(32.0);
    let r = spec.resolve().unwrap();
    assert_eq!(r.labels[0].font, "Oswald");
    assert_eq!(r.labels[0].size, 32.0);
}

#[test]
fn resolve_rejects_out_of_range_values() {
    let mut spec = minimal_spec();
    spec.video_src = "  ".to_owned();
    assert!(spec.resolve().is_err());

    let mut spec = minimal_spec();
    spec.text_style = Some(TextStyle {
        vertical_position: Some(150.0),
        ..TextStyle::default()
    });
    assert!(spec.resolve().is_err());

    let mut spec = minimal_spec();
    spec.text_style = Some(TextStyle {
        size: Some(0.0),
        ..TextStyle::default()
    });
    assert!(spec.resolve().is_err());

    let mut spec = minimal_spec();
    spec.labels = vec![Label {
        id: "l1".to_owned(),
        text: "hi".to_owned(),
        horizontal_position: 120.0,
        vertical_position: 50.0,
        size: None,
        font: None,
    }];
    assert!(spec.resolve().is_err());
}

#[test]
fn palette_stroke_is_always_the_fill_inverse() {
    assert_eq!(TextColor::Primary.fill_rgba8(), [255, 255, 255, 255]);
    assert_eq!(TextColor::Primary.stroke_rgba8(), [0, 0, 0, 255]);
    assert_eq!(TextColor::Inverse.fill_rgba8(), [0, 0, 0, 255]);
    assert_eq!(TextColor::Inverse.stroke_rgba8(), [255, 255, 255, 255]);
}

#[test]
fn label_background_maps_to_box_colors() {
    assert_eq!(
        LabelBackground::Primary.rgba8(0.5),
        Some([0, 0, 0, 128])
    );
    assert_eq!(
        LabelBackground::Inverse.rgba8(1.0),
        Some([255, 255, 255, 255])
    );
    assert_eq!(LabelBackground::None.rgba8(0.5), None);
}

#[test]
fn render_spec_deserializes_with_sparse_fields() {
    let json = r#"{
        "video_src": "clip.mp4",
        "caption": "TOP TEXT",
        "is_cropped": true,
        "text_style": { "alignment": "start", "color": "inverse" },
        "labels": [
            { "id": "a", "text": "wow", "horizontal_position": 10, "vertical_position": 60 }
        ]
    }"#;
    let spec: RenderSpec = serde_json::from_str(json).unwrap();
    let r = spec.resolve().unwrap();
    assert_eq!(r.mode, RenderMode::Cropped);
    assert_eq!(r.text.alignment, HAlign::Start);
    assert_eq!(r.text.color, TextColor::Inverse);
    assert_eq!(r.labels.len(), 1);
    assert_eq!(r.labels[0].size, DEFAULT_LABEL_SIZE);
}
