//! Capclip composites a wrapped caption and floating labels over a short
//! vertical video clip and exports the result.
//!
//! The pipeline is built around four pieces that share one layout
//! implementation:
//!
//! - a pure layout engine (greedy wrap + canvas geometry)
//! - a [`Compositor`] that draws one finished frame
//! - a fixed-rule chroma keyer for greenscreen sources
//! - an [`ExportDriver`] that runs the capture/encode lifecycle, plus
//!   [`render_preview`] for the one-frame still path
//!
//! Media decode and encode shell out to `ffmpeg`/`ffprobe` behind the
//! `media-ffmpeg` cargo feature.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod driver;
mod encode;
mod foundation;
mod layout;
mod render;
mod scene;

pub use crate::foundation::core::{Affine, Fps, FrameIndex, Point, Rect, Vec2};
pub use crate::foundation::error::{CapclipError, CapclipResult};

pub use crate::scene::model::{
    DEFAULT_CAPTION_SIZE, DEFAULT_FONT, DEFAULT_LABEL_BG_OPACITY, DEFAULT_LABEL_SIZE,
    DEFAULT_STROKE_WEIGHT, DEFAULT_VERTICAL_POSITION, HAlign, Label, LabelBackground, LabelStyle,
    RenderMode, RenderSpec, ResolvedLabel, ResolvedLabelStyle, ResolvedSpec, ResolvedTextStyle,
    TextColor, TextStyle,
};

pub use crate::layout::geometry::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CAPTION_MARGIN, CROP_BOTTOM_PAD, CROP_TEXT_VIDEO_GAP,
    CROP_TOP_PAD, CropGeometry, LABEL_BOX_PADDING, LabelAnchor, RESIZE_TOLERANCE, VideoPlacement,
    anchor_x, caption_line_bottom, caption_line_top, caption_max_width, crop_geometry,
    label_anchor, label_box, line_left, needs_resize, reproject_label, standard_placement,
};
pub use crate::layout::wrap::{LINE_HEIGHT_FACTOR, TextMeasure, line_height, wrap};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::fonts::FontLibrary;
pub use crate::assets::media::{
    AUDIO_SAMPLE_RATE, AudioPcm, VideoFrameStream, VideoSourceInfo, decode_audio_f32_stereo,
    decode_video_frame_rgba8, probe_video,
};
pub use crate::audio::track::clip_window;

pub use crate::render::FrameRGBA;
pub use crate::render::chroma::{GREEN_DOMINANCE, GREEN_MIN, key_out_green};
pub use crate::render::compositor::{Compositor, VideoFrame};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::format::{EncoderFormat, FALLBACK, PREFERENCE, negotiate_format};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};

pub use crate::driver::export::{
    DriverState, EARLY_STOP_GUARD_SECS, EXPORT_FPS, ExportDriver, START_OFFSET_SECS, VideoBlob,
};
pub use crate::driver::preview::render_preview;
