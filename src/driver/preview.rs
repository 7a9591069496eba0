use crate::assets::fonts::FontLibrary;
use crate::assets::media::{decode_video_frame_rgba8, probe_video};
use crate::driver::export::{START_OFFSET_SECS, prepare_background};
use crate::foundation::error::CapclipResult;
use crate::render::FrameRGBA;
use crate::render::compositor::{Compositor, VideoFrame};
use crate::scene::model::{RenderMode, RenderSpec};

/// Render the one-frame still preview for `spec`.
///
/// The frame is decoded at the stable seek point and composited by the same
/// [`Compositor`] the export loop drives, so preview layout is pixel-identical
/// to the exported video.
#[tracing::instrument(skip(spec, fonts), fields(video_src = %spec.video_src))]
pub fn render_preview(spec: &RenderSpec, fonts: FontLibrary) -> CapclipResult<FrameRGBA> {
    let resolved = spec.resolve()?;
    let info = probe_video(&resolved.video_src)?;

    let mut compositor = Compositor::new(fonts);
    if resolved.mode == RenderMode::Greenscreen {
        prepare_background(&mut compositor, &resolved)?;
    }

    // Very short sources fall back to their first frame.
    let seek = if info.duration_secs > START_OFFSET_SECS {
        START_OFFSET_SECS
    } else {
        0.0
    };
    let rgba = decode_video_frame_rgba8(&info, seek)?;
    let frame = VideoFrame {
        width: info.width,
        height: info.height,
        rgba: &rgba,
    };
    compositor.render(&resolved, &frame)
}
