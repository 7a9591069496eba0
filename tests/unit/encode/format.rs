use super::*;

fn set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn full_toolchain_picks_h264_mp4() {
    let available = set(&["libx264", "aac", "libvpx", "libopus", "libvorbis", "mpeg4"]);
    let f = select_format(&available);
    assert_eq!(f, PREFERENCE[0]);
    assert_eq!(f.mime_type, "video/mp4;codecs=h264,aac");
    assert_eq!(f.extension, "mp4");
}

#[test]
fn missing_h264_falls_through_to_plain_mp4() {
    let available = set(&["mpeg4", "aac", "libvpx", "libopus"]);
    assert_eq!(select_format(&available), PREFERENCE[1]);
}

#[test]
fn webm_is_used_when_no_mp4_encoder_exists() {
    let available = set(&["libvpx", "libopus"]);
    let f = select_format(&available);
    assert_eq!(f, PREFERENCE[2]);
    assert_eq!(f.mime_type, "video/webm;codecs=vp8,opus");
}

#[test]
fn empty_runtime_gets_the_baseline_fallback() {
    let f = select_format(&HashSet::new());
    assert_eq!(f, FALLBACK);
    assert_eq!(f.mime_type, "video/webm");
}

#[test]
fn preference_order_is_mp4_first() {
    assert_eq!(PREFERENCE.len(), 4);
    assert_eq!(PREFERENCE[0].container, "mp4");
    assert_eq!(PREFERENCE[1].container, "mp4");
    assert_eq!(PREFERENCE[2].container, "webm");
    assert_eq!(PREFERENCE[3].container, "webm");
}
