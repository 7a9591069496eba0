//! Encoder/container negotiation.
//!
//! An ordered preference list is probed against the encoders the runtime's
//! `ffmpeg` actually ships; the first fully supported entry wins and its mime
//! type travels with the finished blob. When nothing matches, the
//! known-baseline WebM entry is used rather than failing the export.

use std::collections::HashSet;

use crate::foundation::error::CapclipResult;

#[cfg(feature = "media-ffmpeg")]
use crate::foundation::error::CapclipError;

/// One negotiable encoder configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderFormat {
    /// Container muxer name passed to the encoder.
    pub container: &'static str,
    /// Video codec name.
    pub video_codec: &'static str,
    /// Audio codec name.
    pub audio_codec: &'static str,
    /// Mime type reported back with the finished blob.
    pub mime_type: &'static str,
    /// Conventional file extension for the container.
    pub extension: &'static str,
}

/// Preference order: H.264 MP4 first, then plain MP4, then VP8 WebM.
pub const PREFERENCE: &[EncoderFormat] = &[
    EncoderFormat {
        container: "mp4",
        video_codec: "libx264",
        audio_codec: "aac",
        mime_type: "video/mp4;codecs=h264,aac",
        extension: "mp4",
    },
    EncoderFormat {
        container: "mp4",
        video_codec: "mpeg4",
        audio_codec: "aac",
        mime_type: "video/mp4",
        extension: "mp4",
    },
    EncoderFormat {
        container: "webm",
        video_codec: "libvpx",
        audio_codec: "libopus",
        mime_type: "video/webm;codecs=vp8,opus",
        extension: "webm",
    },
    EncoderFormat {
        container: "webm",
        video_codec: "libvpx",
        audio_codec: "libvorbis",
        mime_type: "video/webm",
        extension: "webm",
    },
];

/// Baseline used when no preference entry is fully supported.
pub const FALLBACK: EncoderFormat = EncoderFormat {
    container: "webm",
    video_codec: "libvpx",
    audio_codec: "libvorbis",
    mime_type: "video/webm",
    extension: "webm",
};

/// Pick the first preference entry whose codecs are all in `available`.
pub(crate) fn select_format(available: &HashSet<String>) -> EncoderFormat {
    PREFERENCE
        .iter()
        .find(|f| available.contains(f.video_codec) && available.contains(f.audio_codec))
        .copied()
        .unwrap_or(FALLBACK)
}

/// Negotiate the export format against the runtime's `ffmpeg`.
#[cfg(feature = "media-ffmpeg")]
pub fn negotiate_format() -> CapclipResult<EncoderFormat> {
    Ok(select_format(&probe_encoders()?))
}

/// Negotiate the export format against the runtime's `ffmpeg`.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn negotiate_format() -> CapclipResult<EncoderFormat> {
    Err(crate::foundation::error::CapclipError::unsupported_format(
        "encoder negotiation requires the 'media-ffmpeg' feature",
    ))
}

/// Collect the encoder names `ffmpeg -encoders` reports.
#[cfg(feature = "media-ffmpeg")]
fn probe_encoders() -> CapclipResult<HashSet<String>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map_err(|e| {
            CapclipError::unsupported_format(format!(
                "ffmpeg is required for encoding but could not be run: {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(CapclipError::unsupported_format(format!(
            "ffmpeg -encoders failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let text = String::from_utf8_lossy(&out.stdout);
    let mut names = HashSet::new();
    let mut in_list = false;
    for line in text.lines() {
        // The list body starts after the "------" separator line.
        if !in_list {
            in_list = line.trim_start().starts_with("------");
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(_flags), Some(name)) = (fields.next(), fields.next()) else {
            continue;
        };
        names.insert(name.to_owned());
    }
    Ok(names)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
