//! Canvas geometry shared by the preview and export paths.
//!
//! Everything here is a pure function of the inputs; the compositor consults
//! this module for every placement decision so the two paths can never
//! disagree about layout.

use kurbo::Rect;

use crate::foundation::error::{CapclipError, CapclipResult};
use crate::layout::wrap::line_height;
use crate::scene::model::HAlign;

/// Logical canvas width shared by every render mode.
pub const CANVAS_WIDTH: u32 = 1080;
/// Logical canvas height in standard and greenscreen modes.
pub const CANVAS_HEIGHT: u32 = 1920;
/// Horizontal margin reserved on each side of the caption.
pub const CAPTION_MARGIN: f64 = 40.0;
/// Crop mode: padding above the caption block.
pub const CROP_TOP_PAD: f64 = 30.0;
/// Crop mode: gap between the caption block and the clip.
pub const CROP_TEXT_VIDEO_GAP: f64 = 15.0;
/// Crop mode: padding below the clip.
pub const CROP_BOTTOM_PAD: f64 = 15.0;
/// Surface sizes within this tolerance are treated as equal to avoid
/// reallocating the canvas every frame over sub-pixel rounding.
pub const RESIZE_TOLERANCE: f64 = 2.0;
/// Padding around a label's measured text bounds for its background box.
pub const LABEL_BOX_PADDING: f64 = 10.0;

/// Maximum caption line width for a canvas width.
pub fn caption_max_width(canvas_width: f64) -> f64 {
    canvas_width - 2.0 * CAPTION_MARGIN
}

/// Where the scaled clip lands on the standard canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoPlacement {
    /// Scaled clip width (always the canvas width).
    pub target_width: f64,
    /// Scaled clip height preserving the source aspect ratio.
    pub target_height: f64,
    /// Top edge of the clip on the standard canvas.
    pub y_offset: f64,
}

/// Scale a clip to the canvas width and center it vertically.
pub fn standard_placement(video_width: u32, video_height: u32) -> CapclipResult<VideoPlacement> {
    if video_width == 0 || video_height == 0 {
        return Err(CapclipError::validation(
            "video dimensions must be non-zero",
        ));
    }
    let aspect = f64::from(video_width) / f64::from(video_height);
    let target_width = f64::from(CANVAS_WIDTH);
    let target_height = target_width / aspect;
    Ok(VideoPlacement {
        target_width,
        target_height,
        y_offset: (f64::from(CANVAS_HEIGHT) - target_height) / 2.0,
    })
}

/// Crop-mode vertical geometry, derived from the wrapped caption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropGeometry {
    /// Top edge of the caption block.
    pub text_top: f64,
    /// Top edge of the clip.
    pub video_top: f64,
    /// Derived canvas height.
    pub canvas_height: f64,
}

/// Derive the cropped canvas from the caption line count and clip height.
///
/// The same value feeds canvas sizing, the caption draw and label
/// reprojection, which is what keeps those three in agreement.
pub fn crop_geometry(line_count: usize, size: f64, target_height: f64) -> CropGeometry {
    let text_height = line_count as f64 * line_height(size);
    let video_top = CROP_TOP_PAD + text_height + CROP_TEXT_VIDEO_GAP;
    CropGeometry {
        text_top: CROP_TOP_PAD,
        video_top,
        canvas_height: video_top + target_height + CROP_BOTTOM_PAD,
    }
}

/// `true` when the current surface must be reallocated for `wanted`.
pub fn needs_resize(current: f64, wanted: f64) -> bool {
    (current - wanted).abs() > RESIZE_TOLERANCE
}

/// Horizontal text anchor for an alignment: the caption margin, the canvas
/// center, or the mirrored margin.
pub fn anchor_x(alignment: HAlign, canvas_width: f64) -> f64 {
    match alignment {
        HAlign::Start => CAPTION_MARGIN,
        HAlign::Center => canvas_width / 2.0,
        HAlign::End => canvas_width - CAPTION_MARGIN,
    }
}

/// Left edge of a measured line whose anchor point is `anchor`.
pub fn line_left(alignment: HAlign, anchor: f64, text_width: f64) -> f64 {
    match alignment {
        HAlign::Start => anchor,
        HAlign::Center => anchor - text_width / 2.0,
        HAlign::End => anchor - text_width,
    }
}

/// Bottom edge of caption line `index` when the block's last line bottoms out
/// at `anchor_y` and earlier lines stack upward by one line advance each.
pub fn caption_line_bottom(anchor_y: f64, line_count: usize, index: usize, size: f64) -> f64 {
    anchor_y - ((line_count - 1 - index) as f64) * line_height(size)
}

/// Top edge of caption line `index` when the block is top-anchored at
/// `text_top` (crop mode).
pub fn caption_line_top(text_top: f64, index: usize, size: f64) -> f64 {
    text_top + (index as f64) * line_height(size)
}

/// A label's center point in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelAnchor {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
}

/// Resolve a label's percentage position against a canvas.
pub fn label_anchor(
    horizontal_pct: f64,
    vertical_pct: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> LabelAnchor {
    LabelAnchor {
        x: canvas_width * horizontal_pct / 100.0,
        y: canvas_height * vertical_pct / 100.0,
    }
}

/// Re-project a standard-canvas label anchor into the cropped canvas.
///
/// Labels whose original y falls outside the clip's standard-mode band have
/// nothing to attach to after the crop and are dropped. Inside the band the
/// offset from the clip's top edge is preserved; x is unchanged.
pub fn reproject_label(
    anchor: LabelAnchor,
    placement: &VideoPlacement,
    video_top: f64,
) -> Option<LabelAnchor> {
    let band_top = placement.y_offset;
    let band_bottom = placement.y_offset + placement.target_height;
    if anchor.y < band_top || anchor.y > band_bottom {
        return None;
    }
    Some(LabelAnchor {
        x: anchor.x,
        y: video_top + (anchor.y - band_top),
    })
}

/// Background box for a label with the given measured text width.
pub fn label_box(anchor: LabelAnchor, text_width: f64, size: f64) -> Rect {
    let x0 = anchor.x - text_width / 2.0 - LABEL_BOX_PADDING;
    let y0 = anchor.y - size / 2.0 - LABEL_BOX_PADDING / 2.0;
    Rect::new(
        x0,
        y0,
        x0 + text_width + 2.0 * LABEL_BOX_PADDING,
        y0 + size + LABEL_BOX_PADDING,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
