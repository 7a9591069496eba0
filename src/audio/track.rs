//! Phase alignment for the independently decoded audio track.
//!
//! The visual track covers `[start, early_stop]` of the source; the audio
//! track is cut to exactly the same window from its own decode, so the two
//! stay aligned by construction rather than by coordinated playback starts.

use std::path::Path;

use crate::assets::media::AudioPcm;
use crate::foundation::error::{CapclipError, CapclipResult};

/// Cut `[start_secs, start_secs + duration_secs]` out of decoded PCM.
///
/// The window is clamped to the samples that actually decoded; a short source
/// yields a short clip and the encoder's `-shortest` keeps the tracks even.
pub fn clip_window(pcm: &AudioPcm, start_secs: f64, duration_secs: f64) -> Vec<f32> {
    let channels = usize::from(pcm.channels.max(1));
    let total_frames = pcm.interleaved_f32.len() / channels;

    let start_frame = ((start_secs.max(0.0)) * f64::from(pcm.sample_rate)).round() as usize;
    let want_frames = ((duration_secs.max(0.0)) * f64::from(pcm.sample_rate)).round() as usize;

    let start_frame = start_frame.min(total_frames);
    let end_frame = start_frame.saturating_add(want_frames).min(total_frames);

    pcm.interleaved_f32[start_frame * channels..end_frame * channels].to_vec()
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> CapclipResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CapclipError::encode(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        CapclipError::encode(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
