use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::decode::decode_image;
use crate::assets::fonts::FontLibrary;
use crate::assets::media::{
    AUDIO_SAMPLE_RATE, VideoFrameStream, decode_audio_f32_stereo, probe_video,
};
use crate::audio::track::{clip_window, write_f32le_file};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::format::negotiate_format;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Fps};
use crate::foundation::error::{CapclipError, CapclipResult};
use crate::render::compositor::{Compositor, VideoFrame};
use crate::scene::model::{RenderMode, RenderSpec, ResolvedSpec};

/// Seek offset past true start; many codecs produce a black or garbage frame
/// at t=0, so both tracks start here instead.
pub const START_OFFSET_SECS: f64 = 0.1;
/// Recording stops this long before true media end, where some decoders emit
/// unstable or duplicated tail frames.
pub const EARLY_STOP_GUARD_SECS: f64 = 0.1;
/// Export frame rate.
pub const EXPORT_FPS: Fps = Fps { num: 30, den: 1 };

/// Lifecycle states of an [`ExportDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, nothing started.
    Idle,
    /// Probing the source and decoding the background image.
    MediaLoading,
    /// Opening the decode stream at the stable start offset.
    SeekingToStableFrame,
    /// The frame-production loop is running.
    Recording,
    /// Early stop crossed; finishing the last frame and the encoder.
    Stopping,
    /// Export finished and the blob was produced.
    Done,
    /// A fatal error ended the export.
    Failed,
}

/// One finished export: encoded bytes plus the negotiated mime type.
#[derive(Clone, Debug)]
pub struct VideoBlob {
    /// Encoded container bytes.
    pub bytes: Vec<u8>,
    /// Mime type of the negotiated encoder configuration.
    pub mime_type: String,
}

/// Owns the capture/encode lifecycle for one export call.
///
/// The driver decodes frames sequentially from the stable start offset,
/// invokes the [`Compositor`] once per frame at [`EXPORT_FPS`], streams the
/// results into an `ffmpeg` sink together with the independently decoded
/// audio track, and stops at the computed early-stop time. All spawned
/// processes and temp files are released on every exit path.
pub struct ExportDriver {
    spec: ResolvedSpec,
    compositor: Compositor,
    state: DriverState,
    stream: Option<VideoFrameStream>,
    sink: Option<FfmpegSink>,
}

impl ExportDriver {
    /// Resolve `spec` and construct an idle driver drawing text from `fonts`.
    pub fn new(spec: &RenderSpec, fonts: FontLibrary) -> CapclipResult<Self> {
        Ok(Self {
            spec: spec.resolve()?,
            compositor: Compositor::new(fonts),
            state: DriverState::Idle,
            stream: None,
            sink: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run the full export lifecycle and return the finished blob.
    ///
    /// A driver exports once; calling again after `Done` or `Failed` is a
    /// validation error. Resources are torn down whether the export succeeds
    /// or fails.
    #[tracing::instrument(skip(self))]
    pub fn export(&mut self) -> CapclipResult<VideoBlob> {
        if self.state != DriverState::Idle {
            return Err(CapclipError::validation(
                "export driver has already run; construct a new one per export",
            ));
        }

        let result = self.run();
        self.teardown();
        self.set_state(match result {
            Ok(_) => DriverState::Done,
            Err(_) => DriverState::Failed,
        });
        result
    }

    /// Release every live resource: the decode stream and, when the encoder
    /// is still running, the encoder process.
    ///
    /// Callable from any state; an external abort is this plus dropping the
    /// driver.
    pub fn teardown(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
        }
        if let Some(mut sink) = self.sink.take() {
            sink.abort();
        }
    }

    fn set_state(&mut self, next: DriverState) {
        tracing::debug!(from = ?self.state, to = ?next, "export driver transition");
        self.state = next;
    }

    fn run(&mut self) -> CapclipResult<VideoBlob> {
        self.set_state(DriverState::MediaLoading);
        let info = probe_video(&self.spec.video_src)?;
        if self.spec.mode == RenderMode::Greenscreen {
            prepare_background(&mut self.compositor, &self.spec)?;
        }

        let early_stop = info.duration_secs - EARLY_STOP_GUARD_SECS;
        if early_stop <= START_OFFSET_SECS {
            return Err(CapclipError::load(format!(
                "source '{}' is too short to export ({:.3}s)",
                self.spec.video_src, info.duration_secs
            )));
        }

        self.set_state(DriverState::SeekingToStableFrame);
        self.stream = Some(VideoFrameStream::open(
            &info,
            START_OFFSET_SECS,
            EXPORT_FPS,
        )?);

        // The audio track comes from its own decode of the same source, the
        // counterpart of the dedicated audio element in the capture design.
        // Audio is best-effort: a failed decode degrades to video-only.
        let audio = if info.has_audio {
            match decode_audio_f32_stereo(&self.spec.video_src, AUDIO_SAMPLE_RATE) {
                Ok(pcm) => Some(pcm),
                Err(e) => {
                    tracing::warn!(error = %e, "audio capture failed, continuing with video only");
                    None
                }
            }
        } else {
            None
        };

        let format = negotiate_format()?;

        let mut audio_guard = TempFileGuard(None);
        let audio_cfg = match audio {
            Some(pcm) if !pcm.is_empty() => {
                let samples = clip_window(&pcm, START_OFFSET_SECS, early_stop - START_OFFSET_SECS);
                let path = temp_path("audio", "f32le");
                write_f32le_file(&samples, &path)?;
                audio_guard.0 = Some(path.clone());
                Some(AudioInputConfig {
                    path,
                    sample_rate: pcm.sample_rate,
                    channels: pcm.channels,
                })
            }
            _ => None,
        };

        let out_path = temp_path("export", format.extension);
        let out_guard = TempFileGuard(Some(out_path.clone()));
        self.sink = Some(FfmpegSink::new(FfmpegSinkOpts::new(&out_path, format)));

        self.set_state(DriverState::Recording);
        let frame_len = self
            .stream
            .as_ref()
            .map(VideoFrameStream::frame_len)
            .unwrap_or_default();
        let mut buf = vec![0u8; frame_len];
        let mut produced = 0u64;
        loop {
            // Early stop is checked before each frame is produced, so the
            // loop never emits a frame at or past the computed stop time.
            let t = START_OFFSET_SECS + EXPORT_FPS.frames_to_secs(produced);
            if t >= early_stop {
                break;
            }
            let Some(stream) = self.stream.as_mut() else {
                return Err(CapclipError::playback("decode stream torn down mid-export"));
            };
            if !stream.next_frame(&mut buf)? {
                break;
            }

            let frame = VideoFrame {
                width: info.width,
                height: info.height,
                rgba: &buf,
            };
            let rendered = self.compositor.render(&self.spec, &frame)?;

            let Some(sink) = self.sink.as_mut() else {
                return Err(CapclipError::encode("encoder sink torn down mid-export"));
            };
            if produced == 0 {
                sink.begin(SinkConfig {
                    width: rendered.width,
                    height: rendered.height,
                    fps: EXPORT_FPS,
                    audio: audio_cfg.clone(),
                })?;
            }
            sink.push_frame(FrameIndex(produced), &rendered)?;
            produced += 1;
        }

        self.set_state(DriverState::Stopping);
        if produced == 0 {
            return Err(CapclipError::load(format!(
                "no stable frames decoded from '{}'",
                self.spec.video_src
            )));
        }

        // One forced final frame from the last decoded image guarantees a
        // clean tail regardless of decoder behavior near end-of-stream.
        let frame = VideoFrame {
            width: info.width,
            height: info.height,
            rgba: &buf,
        };
        let rendered = self.compositor.render(&self.spec, &frame)?;
        let Some(sink) = self.sink.as_mut() else {
            return Err(CapclipError::encode("encoder sink torn down mid-export"));
        };
        sink.push_frame(FrameIndex(produced), &rendered)?;

        if let Some(stream) = self.stream.as_mut() {
            stream.close();
        }
        sink.end()?;
        self.sink = None;

        let bytes = std::fs::read(&out_path).map_err(|e| {
            CapclipError::encode(format!(
                "failed to read encoded output '{}': {e}",
                out_path.display()
            ))
        })?;
        drop(out_guard);
        drop(audio_guard);

        Ok(VideoBlob {
            bytes,
            mime_type: format.mime_type.to_owned(),
        })
    }
}

impl Drop for ExportDriver {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Decode and install the greenscreen background image.
pub(crate) fn prepare_background(
    compositor: &mut Compositor,
    spec: &ResolvedSpec,
) -> CapclipResult<()> {
    let src = spec.background_src.as_deref().ok_or_else(|| {
        CapclipError::validation("greenscreen mode requires background_src")
    })?;
    let bytes = std::fs::read(src)
        .map_err(|e| CapclipError::load(format!("failed to read background image '{src}': {e}")))?;
    let image = decode_image(&bytes)?;
    compositor.set_background(&image)
}

fn temp_path(tag: &str, ext: &str) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let n = SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("capclip_{tag}_{}_{n}.{ext}", std::process::id()))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
