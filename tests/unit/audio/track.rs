use super::*;

fn pcm(frames: usize, sample_rate: u32) -> AudioPcm {
    // Interleaved stereo ramp so sample indices are recognizable.
    let interleaved_f32 = (0..frames * 2).map(|i| i as f32).collect();
    AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32,
    }
}

#[test]
fn clip_window_trims_lead_and_truncates() {
    let src = pcm(20, 10);
    // 0.5s lead at 10 Hz drops 5 frames; 1.0s window keeps 10 frames.
    let out = clip_window(&src, 0.5, 1.0);
    assert_eq!(out.len(), 10 * 2);
    assert_eq!(out[0], 10.0);
    assert_eq!(out[out.len() - 1], 29.0);
}

#[test]
fn clip_window_clamps_to_decoded_samples() {
    let src = pcm(20, 10);
    // A window running past the end keeps what actually decoded.
    let out = clip_window(&src, 1.5, 5.0);
    assert_eq!(out.len(), 5 * 2);

    // A window entirely past the end is empty.
    let out = clip_window(&src, 10.0, 1.0);
    assert!(out.is_empty());
}

#[test]
fn f32le_file_round_trips_bytes() {
    let samples = [0.0f32, 1.0, -1.0, 0.25];
    let path = std::env::temp_dir().join(format!(
        "capclip_track_test_{}.f32le",
        std::process::id()
    ));
    write_f32le_file(&samples, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let mut expected = Vec::new();
    for s in samples {
        expected.extend_from_slice(&s.to_le_bytes());
    }
    assert_eq!(bytes, expected);
    let _ = std::fs::remove_file(&path);
}
