use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{CapclipError, CapclipResult};
use crate::layout::wrap::TextMeasure;

/// Registry mapping font family identifiers to raw font bytes.
///
/// Styles refer to fonts by name (`"Impact"` by default); the library is the
/// only place those names are resolved, so a missing font surfaces as one
/// descriptive load error instead of a mid-render surprise.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    families: HashMap<String, Arc<Vec<u8>>>,
}

impl FontLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family from in-memory font bytes.
    pub fn register(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.families.insert(name.into(), Arc::new(bytes));
    }

    /// Register a family from a font file on disk.
    pub fn load_file(&mut self, name: impl Into<String>, path: &Path) -> CapclipResult<()> {
        let bytes = std::fs::read(path).map_err(|e| {
            CapclipError::load(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.register(name, bytes);
        Ok(())
    }

    /// Register every `.ttf`/`.otf` file in `dir`, keyed by file stem.
    pub fn load_dir(&mut self, dir: &Path) -> CapclipResult<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CapclipError::load(format!("failed to read font dir '{}': {e}", dir.display()))
        })?;
        for entry in entries {
            let path = entry
                .map_err(|e| CapclipError::load(format!("failed to list font dir: {e}")))?
                .path();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            if !matches!(ext.as_deref(), Some("ttf") | Some("otf")) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            self.load_file(stem.to_owned(), &path)?;
        }
        Ok(())
    }

    /// Raw bytes for a registered family.
    pub fn bytes_for(&self, name: &str) -> CapclipResult<Arc<Vec<u8>>> {
        self.families.get(name).cloned().ok_or_else(|| {
            CapclipError::load(format!(
                "font family '{name}' is not registered; load it into the FontLibrary first"
            ))
        })
    }
}

/// Brush placeholder carried through Parley layouts; paint colors are set at
/// draw time (stroke and fill passes use different colors).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GlyphBrush;

/// One shaped caption/label line ready for glyph drawing.
#[derive(Clone)]
pub(crate) struct ShapedLine {
    /// Parley layout for the single line (no line breaking applied).
    pub(crate) layout: Arc<parley::Layout<GlyphBrush>>,
    /// Font handle for the raster backend's glyph runs.
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Measured advance width in logical pixels.
    pub(crate) width: f64,
    /// Layout height in logical pixels (ascent + descent + leading).
    pub(crate) height: f64,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct ShapeKey {
    text: String,
    font: String,
    size_bits: u64,
}

/// Stateful text shaper shared by measurement and drawing.
///
/// Shaped lines are cached by `(text, font, size)`; in the export loop the
/// caption and labels are static, so steady-state frames hit the cache and
/// allocate no new layouts.
pub(crate) struct TextShaper {
    library: FontLibrary,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    family_names: HashMap<String, String>,
    font_data: HashMap<String, vello_cpu::peniko::FontData>,
    shaped: HashMap<ShapeKey, ShapedLine>,
}

impl TextShaper {
    pub(crate) fn new(library: FontLibrary) -> Self {
        Self {
            library,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family_names: HashMap::new(),
            font_data: HashMap::new(),
            shaped: HashMap::new(),
        }
    }

    /// Resolve a library family into a registered Parley family name, loading
    /// the font bytes into the shaping contexts on first use.
    fn family_for(&mut self, font: &str) -> CapclipResult<String> {
        if let Some(name) = self.family_names.get(font) {
            return Ok(name.clone());
        }

        let bytes = self.library.bytes_for(font)?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CapclipError::load(format!("no font families found in '{font}' font bytes"))
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                CapclipError::load(format!("registered font family '{font}' has no name"))
            })?
            .to_string();

        self.font_data.insert(
            font.to_owned(),
            vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                0,
            ),
        );
        self.family_names.insert(font.to_owned(), family_name.clone());
        Ok(family_name)
    }

    /// Shape one line of text without any wrapping applied.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        font: &str,
        size: f64,
    ) -> CapclipResult<ShapedLine> {
        if !size.is_finite() || size <= 0.0 {
            return Err(CapclipError::validation(
                "text size must be finite and > 0",
            ));
        }

        let key = ShapeKey {
            text: text.to_owned(),
            font: font.to_owned(),
            size_bits: size.to_bits(),
        };
        if let Some(line) = self.shaped.get(&key) {
            return Ok(line.clone());
        }

        let family_name = self.family_for(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(GlyphBrush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);

        let width = f64::from(layout.full_width());
        let height = f64::from(layout.height());
        let line = ShapedLine {
            layout: Arc::new(layout),
            font: self.font_data[font].clone(),
            width,
            height,
        };
        self.shaped.insert(key, line.clone());
        Ok(line)
    }
}

impl TextMeasure for TextShaper {
    fn measure_width(&mut self, text: &str, font: &str, size: f64) -> CapclipResult<f64> {
        Ok(self.shape_line(text, font, size)?.width)
    }
}
