use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_math_round_trips() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.as_f64() - 30.0).abs() < 1e-12);
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
    assert!((fps.frames_to_secs(30) - 1.0).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_floor(1.0), 30);
    assert_eq!(fps.secs_to_frames_floor(0.999), 29);
}

#[test]
fn fps_rational_ntsc() {
    let fps = Fps::new(30_000, 1001).unwrap();
    assert!((fps.as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn frame_index_orders() {
    assert!(FrameIndex(1) < FrameIndex(2));
    assert_eq!(FrameIndex(7), FrameIndex(7));
}
