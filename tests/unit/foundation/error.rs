use super::*;

#[test]
fn constructors_build_expected_variants() {
    assert!(matches!(CapclipError::load("x"), CapclipError::Load(_)));
    assert!(matches!(
        CapclipError::unsupported_format("x"),
        CapclipError::UnsupportedFormat(_)
    ));
    assert!(matches!(CapclipError::encode("x"), CapclipError::Encode(_)));
    assert!(matches!(
        CapclipError::playback("x"),
        CapclipError::Playback(_)
    ));
    assert!(matches!(
        CapclipError::validation("x"),
        CapclipError::Validation(_)
    ));
}

#[test]
fn display_includes_category_and_message() {
    let e = CapclipError::load("video gone");
    assert_eq!(e.to_string(), "load error: video gone");
    let e = CapclipError::unsupported_format("no encoder");
    assert_eq!(e.to_string(), "unsupported format: no encoder");
}

#[test]
fn anyhow_errors_wrap_transparently() {
    let e: CapclipError = anyhow::anyhow!("inner detail").into();
    assert!(e.to_string().contains("inner detail"));
}
