use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let src = vec![0u8; 8];
    let mut dst = vec![0u8; 4];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [0, 0, 0, 255]).is_err());
}

#[test]
fn sink_opts_default_to_overwrite_and_8mbit() {
    let opts = FfmpegSinkOpts::new("/tmp/out.mp4", crate::encode::format::PREFERENCE[0]);
    assert!(opts.overwrite);
    assert_eq!(opts.video_bitrate, 8_000_000);
    assert_eq!(opts.bg_rgba, [0, 0, 0, 255]);
}
