use crate::foundation::error::CapclipResult;

#[cfg(feature = "media-ffmpeg")]
use crate::foundation::core::Fps;
#[cfg(feature = "media-ffmpeg")]
use crate::foundation::error::CapclipError;
#[cfg(feature = "media-ffmpeg")]
use std::io::Read;
#[cfg(feature = "media-ffmpeg")]
use std::process::{Child, ChildStdout, Command, Stdio};

/// Internal audio sample rate used across the decode/align/encode pipeline.
pub const AUDIO_SAMPLE_RATE: u32 = 48_000;

/// Basic metadata about a source clip.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Source path or URL used for probing/decoding.
    pub source: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// `true` when no samples were decoded (e.g. a silent source).
    pub fn is_empty(&self) -> bool {
        self.interleaved_f32.is_empty()
    }
}

/// Probe source clip metadata through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source: &str) -> CapclipResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source)
        .output()
        .map_err(|e| CapclipError::load(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CapclipError::load(format!(
            "ffprobe failed for '{source}': {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| CapclipError::load(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CapclipError::load(format!("no video stream found in '{source}'")))?;
    let width = video_stream
        .width
        .ok_or_else(|| CapclipError::load("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| CapclipError::load("missing video height from ffprobe"))?;
    let duration_secs = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| CapclipError::load(format!("missing duration from ffprobe for '{source}'")))?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source: source.to_owned(),
        width,
        height,
        duration_secs,
        has_audio,
    })
}

/// Probe source clip metadata through `ffprobe`.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source: &str) -> CapclipResult<VideoSourceInfo> {
    Err(crate::foundation::error::CapclipError::load(
        "video/audio sources require the 'media-ffmpeg' feature",
    ))
}

/// Decode a single straight-alpha RGBA frame at `source_time_secs`.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_video_frame_rgba8(
    source: &VideoSourceInfo,
    source_time_secs: f64,
) -> CapclipResult<Vec<u8>> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{source_time_secs:.9}")])
        .arg("-i")
        .arg(&source.source)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| CapclipError::load(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(CapclipError::load(format!(
            "ffmpeg video decode failed for '{}': {}",
            source.source,
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = source.width as usize * source.height as usize * 4;
    if out.stdout.len() < expected_len {
        return Err(CapclipError::load(format!(
            "ffmpeg returned no stable frame at {source_time_secs}s for '{}'",
            source.source
        )));
    }
    Ok(out.stdout[..expected_len].to_vec())
}

/// Decode a single straight-alpha RGBA frame at `source_time_secs`.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_video_frame_rgba8(
    _source: &VideoSourceInfo,
    _source_time_secs: f64,
) -> CapclipResult<Vec<u8>> {
    Err(crate::foundation::error::CapclipError::load(
        "video/audio sources require the 'media-ffmpeg' feature",
    ))
}

/// Sequential frame reader over one long-lived `ffmpeg` decode process.
///
/// Frames arrive as raw straight-alpha RGBA at the requested output rate,
/// starting from the seek offset. The child process is torn down on drop so
/// an aborted export never leaks a decoder.
#[cfg(feature = "media-ffmpeg")]
pub struct VideoFrameStream {
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
}

#[cfg(feature = "media-ffmpeg")]
impl VideoFrameStream {
    /// Spawn the decode process seeked to `start_secs`, resampled to `fps`.
    pub fn open(source: &VideoSourceInfo, start_secs: f64, fps: Fps) -> CapclipResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-ss", &format!("{start_secs:.9}")])
            .arg("-i")
            .arg(&source.source)
            .args([
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-r",
                &format!("{}/{}", fps.num, fps.den),
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CapclipError::load(format!(
                    "failed to spawn ffmpeg for '{}' (is it installed and on PATH?): {e}",
                    source.source
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CapclipError::load("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| CapclipError::load("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frame_len: source.width as usize * source.height as usize * 4,
        })
    }

    /// Byte length of one frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Read the next frame into `buf`.
    ///
    /// Returns `Ok(false)` on clean end-of-stream at a frame boundary; a
    /// partial frame is a playback error.
    pub fn next_frame(&mut self, buf: &mut [u8]) -> CapclipResult<bool> {
        if buf.len() != self.frame_len {
            return Err(CapclipError::validation(
                "frame buffer size mismatch with width*height*4",
            ));
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(false);
        };

        let mut filled = 0usize;
        while filled < buf.len() {
            let n = stdout
                .read(&mut buf[filled..])
                .map_err(|e| CapclipError::playback(format!("video decode read failed: {e}")))?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(false);
        }
        if filled < buf.len() {
            return Err(CapclipError::playback(
                "video decode stream ended mid-frame",
            ));
        }
        Ok(true)
    }

    /// Stop the decode process and release its pipes.
    pub fn close(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(drain) = self.stderr_drain.take() {
            let _ = drain.join();
        }
    }
}

#[cfg(feature = "media-ffmpeg")]
impl Drop for VideoFrameStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sequential frame reader over one long-lived `ffmpeg` decode process.
///
/// Inert without the `media-ffmpeg` feature; `open` returns an error.
#[cfg(not(feature = "media-ffmpeg"))]
pub struct VideoFrameStream {
    _private: (),
}

#[cfg(not(feature = "media-ffmpeg"))]
impl VideoFrameStream {
    /// Spawn the decode process seeked to `start_secs`, resampled to `fps`.
    ///
    /// Returns an error when the `media-ffmpeg` feature is disabled.
    pub fn open(
        _source: &VideoSourceInfo,
        _start_secs: f64,
        _fps: crate::foundation::core::Fps,
    ) -> CapclipResult<Self> {
        Err(crate::foundation::error::CapclipError::load(
            "video/audio sources require the 'media-ffmpeg' feature",
        ))
    }

    /// Byte length of one frame.
    pub fn frame_len(&self) -> usize {
        0
    }

    /// Read the next frame into `buf`; always end-of-stream here.
    pub fn next_frame(&mut self, _buf: &mut [u8]) -> CapclipResult<bool> {
        Ok(false)
    }

    /// Stop the decode process and release its pipes.
    pub fn close(&mut self) {}
}

/// Decode a source's audio to stereo interleaved `f32` PCM.
///
/// Sources without an audio stream decode to empty PCM rather than an error;
/// audio is best-effort across the pipeline.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_audio_f32_stereo(source: &str, sample_rate: u32) -> CapclipResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(source)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| CapclipError::load(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // ffmpeg reports a missing audio stream as an error; treat it as
        // silence so audio-free clips still export.
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("does not contain any stream")
        {
            return Ok(AudioPcm {
                sample_rate,
                channels: 2,
                interleaved_f32: Vec::new(),
            });
        }
        return Err(CapclipError::load(format!(
            "ffmpeg audio decode failed for '{source}': {}",
            msg.trim()
        )));
    }

    if out.stdout.len() % 4 != 0 {
        return Err(CapclipError::load(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: pcm,
    })
}

/// Decode a source's audio to stereo interleaved `f32` PCM.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_audio_f32_stereo(_source: &str, _sample_rate: u32) -> CapclipResult<AudioPcm> {
    Err(crate::foundation::error::CapclipError::load(
        "video/audio sources require the 'media-ffmpeg' feature",
    ))
}

// No unit tests here: these functions shell out to `ffprobe`/`ffmpeg` and are
// covered by integration tests that skip when the tools are unavailable.
