use serde::{Deserialize, Serialize};

use crate::foundation::error::{CapclipError, CapclipResult};

/// Default caption/label font family.
pub const DEFAULT_FONT: &str = "Impact";
/// Default caption size in logical pixels.
pub const DEFAULT_CAPTION_SIZE: f64 = 78.0;
/// Default label size in logical pixels.
pub const DEFAULT_LABEL_SIZE: f64 = 48.0;
/// Default stroke width as a fraction of the font size.
pub const DEFAULT_STROKE_WEIGHT: f64 = 0.08;
/// Default caption anchor as a percentage of canvas height.
pub const DEFAULT_VERTICAL_POSITION: f64 = 25.0;
/// Default label background opacity.
pub const DEFAULT_LABEL_BG_OPACITY: f64 = 0.5;

/// Two-value text palette: `Primary` fills white, `Inverse` fills black.
///
/// The stroke is always the visual inverse of the fill so text stays legible
/// over arbitrary video content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    /// White fill, black stroke.
    #[default]
    Primary,
    /// Black fill, white stroke.
    Inverse,
}

impl TextColor {
    /// Fill color as straight-alpha RGBA8.
    pub fn fill_rgba8(self) -> [u8; 4] {
        match self {
            Self::Primary => [255, 255, 255, 255],
            Self::Inverse => [0, 0, 0, 255],
        }
    }

    /// Stroke color as straight-alpha RGBA8 (the fill's inverse).
    pub fn stroke_rgba8(self) -> [u8; 4] {
        match self {
            Self::Primary => [0, 0, 0, 255],
            Self::Inverse => [255, 255, 255, 255],
        }
    }
}

/// Horizontal text alignment inside the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// Anchor at the left caption margin.
    Start,
    /// Anchor at the canvas center.
    #[default]
    Center,
    /// Anchor at the right caption margin.
    End,
}

/// Label background box variants.
///
/// `Primary` is a black box (pairs with the default white label text),
/// `Inverse` a white one, `None` draws no box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelBackground {
    /// Translucent black box.
    #[default]
    Primary,
    /// Translucent white box.
    Inverse,
    /// No background box.
    None,
}

impl LabelBackground {
    /// Box color as straight-alpha RGBA8 for the given opacity, or `None`
    /// when no box should be drawn.
    pub fn rgba8(self, opacity: f64) -> Option<[u8; 4]> {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Self::Primary => Some([0, 0, 0, a]),
            Self::Inverse => Some([255, 255, 255, a]),
            Self::None => None,
        }
    }
}

/// Caption styling. All fields optional at the boundary; [`RenderSpec::resolve`]
/// fills the documented defaults exactly once per call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family identifier.
    pub font: Option<String>,
    /// Size in logical pixels.
    pub size: Option<f64>,
    /// Fill palette entry.
    pub color: Option<TextColor>,
    /// Stroke width as a fraction of size.
    pub stroke_weight: Option<f64>,
    /// Horizontal alignment.
    pub alignment: Option<HAlign>,
    /// Anchor for the bottom of the caption block, percent of canvas height.
    pub vertical_position: Option<f64>,
}

/// One floating text label, center-anchored by percentage position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// Caller-assigned identifier.
    pub id: String,
    /// Label text; whitespace-only labels are skipped entirely.
    pub text: String,
    /// Center x as a percentage of canvas width.
    pub horizontal_position: f64,
    /// Center y as a percentage of canvas height.
    pub vertical_position: f64,
    /// Size override; falls back to [`LabelStyle`].
    #[serde(default)]
    pub size: Option<f64>,
    /// Font override; falls back to [`LabelStyle`].
    #[serde(default)]
    pub font: Option<String>,
}

/// Shared label styling and font/size fallback.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Fallback font family for labels without their own.
    pub font: Option<String>,
    /// Fallback size for labels without their own.
    pub size: Option<f64>,
    /// Fill palette entry shared by all labels.
    pub color: Option<TextColor>,
    /// Stroke width as a fraction of the label size.
    pub stroke_weight: Option<f64>,
    /// Background box variant.
    pub background: Option<LabelBackground>,
    /// Background box opacity in `[0, 1]`.
    pub background_opacity: Option<f64>,
}

/// Render mode, selected once per call.
///
/// Greenscreen wins when both greenscreen and crop are requested; crop mode
/// only engages outside greenscreen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Fixed 1080x1920 canvas, video vertically centered, caption overlaid.
    Standard,
    /// Background image behind the chroma-keyed clip on the fixed canvas.
    Greenscreen,
    /// Canvas height derived from caption height; caption above the clip.
    Cropped,
}

/// Input record for one render/export call.
///
/// `video_src` and `background_src` are local paths or URLs handed through to
/// the decoder; the engine never fetches or stores anything beyond them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Source clip location.
    pub video_src: String,
    /// Raw caption text; newlines separate paragraphs.
    #[serde(default)]
    pub caption: String,
    /// Still image shown behind the keyed clip in greenscreen mode.
    #[serde(default)]
    pub background_src: Option<String>,
    /// Request greenscreen keying.
    #[serde(default)]
    pub is_greenscreen: bool,
    /// Caption style overrides.
    #[serde(default)]
    pub text_style: Option<TextStyle>,
    /// Floating labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Shared label style overrides.
    #[serde(default)]
    pub label_style: Option<LabelStyle>,
    /// Request crop mode.
    #[serde(default)]
    pub is_cropped: bool,
}

/// Fully-populated caption style after defaulting.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTextStyle {
    /// Font family identifier.
    pub font: String,
    /// Size in logical pixels.
    pub size: f64,
    /// Fill palette entry.
    pub color: TextColor,
    /// Stroke width as a fraction of size.
    pub stroke_weight: f64,
    /// Horizontal alignment.
    pub alignment: HAlign,
    /// Caption block bottom anchor, percent of canvas height.
    pub vertical_position: f64,
}

/// Fully-populated label style after defaulting.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLabelStyle {
    /// Fill palette entry.
    pub color: TextColor,
    /// Stroke width as a fraction of the label size.
    pub stroke_weight: f64,
    /// Background box variant.
    pub background: LabelBackground,
    /// Background box opacity.
    pub background_opacity: f64,
}

/// A label with its font and size fallbacks applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLabel {
    /// Caller-assigned identifier.
    pub id: String,
    /// Label text.
    pub text: String,
    /// Center x as a percentage of canvas width.
    pub horizontal_position: f64,
    /// Center y as a percentage of canvas height.
    pub vertical_position: f64,
    /// Size in logical pixels.
    pub size: f64,
    /// Font family identifier.
    pub font: String,
}

/// A [`RenderSpec`] with every default applied and the render mode fixed.
#[derive(Clone, Debug)]
pub struct ResolvedSpec {
    /// Source clip location.
    pub video_src: String,
    /// Raw caption text.
    pub caption: String,
    /// Background image for greenscreen mode.
    pub background_src: Option<String>,
    /// The mode this call renders in.
    pub mode: RenderMode,
    /// Caption style.
    pub text: ResolvedTextStyle,
    /// Labels with fallbacks applied.
    pub labels: Vec<ResolvedLabel>,
    /// Shared label style.
    pub label_style: ResolvedLabelStyle,
}

impl RenderSpec {
    /// Validate the spec and apply every default, producing the single style
    /// configuration the compositor and driver consume.
    pub fn resolve(&self) -> CapclipResult<ResolvedSpec> {
        if self.video_src.trim().is_empty() {
            return Err(CapclipError::validation("video_src must be non-empty"));
        }

        let ts = self.text_style.clone().unwrap_or_default();
        let text = ResolvedTextStyle {
            font: ts.font.unwrap_or_else(|| DEFAULT_FONT.to_owned()),
            size: ts.size.unwrap_or(DEFAULT_CAPTION_SIZE),
            color: ts.color.unwrap_or_default(),
            stroke_weight: ts.stroke_weight.unwrap_or(DEFAULT_STROKE_WEIGHT),
            alignment: ts.alignment.unwrap_or_default(),
            vertical_position: ts.vertical_position.unwrap_or(DEFAULT_VERTICAL_POSITION),
        };
        validate_size("text_style.size", text.size)?;
        validate_fraction("text_style.stroke_weight", text.stroke_weight)?;
        validate_percent("text_style.vertical_position", text.vertical_position)?;

        let ls = self.label_style.clone().unwrap_or_default();
        let label_style = ResolvedLabelStyle {
            color: ls.color.unwrap_or_default(),
            stroke_weight: ls.stroke_weight.unwrap_or(DEFAULT_STROKE_WEIGHT),
            background: ls.background.unwrap_or_default(),
            background_opacity: ls.background_opacity.unwrap_or(DEFAULT_LABEL_BG_OPACITY),
        };
        validate_fraction("label_style.stroke_weight", label_style.stroke_weight)?;
        if !(0.0..=1.0).contains(&label_style.background_opacity) {
            return Err(CapclipError::validation(
                "label_style.background_opacity must be within [0, 1]",
            ));
        }

        let fallback_font = ls.font.unwrap_or_else(|| DEFAULT_FONT.to_owned());
        let fallback_size = ls.size.unwrap_or(DEFAULT_LABEL_SIZE);
        let mut labels = Vec::with_capacity(self.labels.len());
        for label in &self.labels {
            let resolved = ResolvedLabel {
                id: label.id.clone(),
                text: label.text.clone(),
                horizontal_position: label.horizontal_position,
                vertical_position: label.vertical_position,
                size: label.size.unwrap_or(fallback_size),
                font: label.font.clone().unwrap_or_else(|| fallback_font.clone()),
            };
            validate_size("label.size", resolved.size)?;
            validate_percent("label.horizontal_position", resolved.horizontal_position)?;
            validate_percent("label.vertical_position", resolved.vertical_position)?;
            labels.push(resolved);
        }

        // Greenscreen requires a background image to engage; a greenscreen
        // request also disables crop mode even when the image is missing.
        let mode = if self.is_greenscreen && self.background_src.is_some() {
            RenderMode::Greenscreen
        } else if self.is_cropped && !self.is_greenscreen {
            RenderMode::Cropped
        } else {
            RenderMode::Standard
        };

        Ok(ResolvedSpec {
            video_src: self.video_src.clone(),
            caption: self.caption.clone(),
            background_src: self.background_src.clone(),
            mode,
            text,
            labels,
            label_style,
        })
    }
}

fn validate_size(field: &str, v: f64) -> CapclipResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(CapclipError::validation(format!(
            "{field} must be finite and > 0"
        )));
    }
    Ok(())
}

fn validate_fraction(field: &str, v: f64) -> CapclipResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(CapclipError::validation(format!(
            "{field} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn validate_percent(field: &str, v: f64) -> CapclipResult<()> {
    if !(0.0..=100.0).contains(&v) {
        return Err(CapclipError::validation(format!(
            "{field} must be within [0, 100]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
