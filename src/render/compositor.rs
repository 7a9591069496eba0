use std::sync::Arc;

use kurbo::Affine;

use crate::assets::decode::{PreparedImage, premultiply_rgba8_in_place};
use crate::assets::fonts::{FontLibrary, ShapedLine, TextShaper};
use crate::foundation::error::{CapclipError, CapclipResult};
use crate::layout::geometry::{self, VideoPlacement};
use crate::layout::wrap::wrap;
use crate::render::FrameRGBA;
use crate::render::chroma::key_out_green;
use crate::scene::model::{RenderMode, ResolvedSpec, TextColor};

/// One decoded video frame in straight-alpha RGBA8, borrowed from the decoder.
#[derive(Clone, Copy, Debug)]
pub struct VideoFrame<'a> {
    /// Source frame width in pixels.
    pub width: u32,
    /// Source frame height in pixels.
    pub height: u32,
    /// Tightly packed straight-alpha RGBA8 bytes.
    pub rgba: &'a [u8],
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// Draws one finished raster from a decoded frame, the caption, and labels.
///
/// The compositor owns the only canvas surface of a render pipeline and is
/// driven once per preview and once per exported frame. Shaped text and the
/// prepared background are cached across calls; in the export loop the
/// steady-state frame allocates the video paint and nothing else.
pub struct Compositor {
    shaper: TextShaper,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
    background: Option<ImagePaint>,
    chroma_scratch: Vec<u8>,
}

impl Compositor {
    /// Create a compositor drawing text from `fonts`.
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            shaper: TextShaper::new(fonts),
            ctx: None,
            pixmap: None,
            background: None,
            chroma_scratch: Vec::new(),
        }
    }

    /// Prepare the greenscreen background image.
    pub fn set_background(&mut self, image: &PreparedImage) -> CapclipResult<()> {
        let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
        self.background = Some(ImagePaint {
            paint,
            w: image.width,
            h: image.height,
        });
        Ok(())
    }

    /// Composite one frame according to `spec`, returning the finished
    /// premultiplied raster.
    pub fn render(&mut self, spec: &ResolvedSpec, frame: &VideoFrame<'_>) -> CapclipResult<FrameRGBA> {
        let expected = frame.width as usize * frame.height as usize * 4;
        if frame.rgba.len() != expected {
            return Err(CapclipError::validation(
                "video frame byte length mismatch with width*height*4",
            ));
        }
        let placement = geometry::standard_placement(frame.width, frame.height)?;

        // Crop geometry comes first because the surface size depends on the
        // wrapped caption; the same wrap feeds the caption draw and the label
        // reprojection below.
        let crop = if spec.mode == RenderMode::Cropped {
            let lines = self.wrap_caption(spec, f64::from(geometry::CANVAS_WIDTH))?;
            let geom =
                geometry::crop_geometry(lines.len(), spec.text.size, placement.target_height);
            Some((lines, geom))
        } else {
            None
        };

        let wanted_height = crop
            .as_ref()
            .map(|(_, g)| g.canvas_height)
            .unwrap_or(f64::from(geometry::CANVAS_HEIGHT));
        let (width, height) = self.surface_size(wanted_height);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let canvas_w = f64::from(width);
        let canvas_h = f64::from(height);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, canvas_w, canvas_h));

        match spec.mode {
            RenderMode::Standard => {
                let video = rgba_straight_to_image_premul(frame.rgba, frame.width, frame.height)?;
                draw_image(
                    &mut ctx,
                    &video,
                    frame.width,
                    frame.height,
                    0.0,
                    placement.y_offset,
                    placement.target_width,
                    placement.target_height,
                );
                self.draw_caption_bottom(&mut ctx, spec, canvas_w, canvas_h)?;
                self.draw_labels(&mut ctx, spec, None)?;
            }
            RenderMode::Greenscreen => {
                let bg = self.background.clone().ok_or_else(|| {
                    CapclipError::load("greenscreen render requires a prepared background image")
                })?;
                draw_image(&mut ctx, &bg.paint, bg.w, bg.h, 0.0, 0.0, canvas_w, canvas_h);

                self.chroma_scratch.clear();
                self.chroma_scratch.extend_from_slice(frame.rgba);
                key_out_green(&mut self.chroma_scratch);
                let video =
                    rgba_straight_to_image_premul(&self.chroma_scratch, frame.width, frame.height)?;
                draw_image(
                    &mut ctx,
                    &video,
                    frame.width,
                    frame.height,
                    0.0,
                    placement.y_offset,
                    placement.target_width,
                    placement.target_height,
                );
                self.draw_caption_bottom(&mut ctx, spec, canvas_w, canvas_h)?;
                self.draw_labels(&mut ctx, spec, None)?;
            }
            RenderMode::Cropped => {
                let Some((lines, geom)) = crop else {
                    return Err(CapclipError::validation(
                        "crop geometry missing for cropped render",
                    ));
                };
                let video = rgba_straight_to_image_premul(frame.rgba, frame.width, frame.height)?;
                draw_image(
                    &mut ctx,
                    &video,
                    frame.width,
                    frame.height,
                    0.0,
                    geom.video_top,
                    placement.target_width,
                    placement.target_height,
                );
                self.draw_caption_top(&mut ctx, spec, &lines, geom.text_top, canvas_w)?;
                self.draw_labels(&mut ctx, spec, Some((&placement, geom.video_top)))?;
            }
        }

        ctx.flush();
        let mut pixmap = match self.pixmap.take() {
            Some(p) if p.width() == width && p.height() == height => p,
            _ => vello_cpu::Pixmap::new(width, height),
        };
        ctx.render_to_pixmap(&mut pixmap);

        let out = FrameRGBA {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        };
        self.pixmap = Some(pixmap);
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Wrap the caption for the current spec; crop sizing, the caption draw
    /// and label reprojection all consume this one computation.
    fn wrap_caption(&mut self, spec: &ResolvedSpec, canvas_w: f64) -> CapclipResult<Vec<String>> {
        wrap(
            &spec.caption,
            &mut self.shaper,
            &spec.text.font,
            spec.text.size,
            geometry::caption_max_width(canvas_w),
        )
    }

    fn surface_size(&self, wanted_height: f64) -> (u16, u16) {
        let width = geometry::CANVAS_WIDTH as u16;
        // Within the tolerance the current surface is kept; drawing positions
        // are computed analytically, so a sub-pixel height difference never
        // shifts content.
        if let Some(ctx) = self.ctx.as_ref() {
            let current = f64::from(ctx.height());
            if ctx.width() == width && !geometry::needs_resize(current, wanted_height) {
                return (width, ctx.height());
            }
        }
        (width, wanted_height.round().max(1.0) as u16)
    }

    fn draw_caption_bottom(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        spec: &ResolvedSpec,
        canvas_w: f64,
        canvas_h: f64,
    ) -> CapclipResult<()> {
        if spec.caption.is_empty() {
            return Ok(());
        }
        let style = &spec.text;
        let lines = self.wrap_caption(spec, canvas_w)?;
        let anchor_y = canvas_h * style.vertical_position / 100.0;
        let anchor = geometry::anchor_x(style.alignment, canvas_w);
        let stroke_px = style.size * style.stroke_weight;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let shaped = self.shaper.shape_line(line, &style.font, style.size)?;
            let bottom = geometry::caption_line_bottom(anchor_y, lines.len(), i, style.size);
            let left = geometry::line_left(style.alignment, anchor, shaped.width);
            draw_line_text(ctx, &shaped, left, bottom - shaped.height, stroke_px, style.color);
        }
        Ok(())
    }

    fn draw_caption_top(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        spec: &ResolvedSpec,
        lines: &[String],
        text_top: f64,
        canvas_w: f64,
    ) -> CapclipResult<()> {
        if spec.caption.is_empty() {
            return Ok(());
        }
        let style = &spec.text;
        let anchor = geometry::anchor_x(style.alignment, canvas_w);
        let stroke_px = style.size * style.stroke_weight;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let shaped = self.shaper.shape_line(line, &style.font, style.size)?;
            let top = geometry::caption_line_top(text_top, i, style.size);
            let left = geometry::line_left(style.alignment, anchor, shaped.width);
            draw_line_text(ctx, &shaped, left, top, stroke_px, style.color);
        }
        Ok(())
    }

    /// Draw labels at their standard-canvas anchors, or reprojected into the
    /// cropped canvas when `reproject` carries the crop placement.
    fn draw_labels(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        spec: &ResolvedSpec,
        reproject: Option<(&VideoPlacement, f64)>,
    ) -> CapclipResult<()> {
        for label in &spec.labels {
            if label.text.trim().is_empty() {
                continue;
            }

            let anchor = geometry::label_anchor(
                label.horizontal_position,
                label.vertical_position,
                f64::from(geometry::CANVAS_WIDTH),
                f64::from(geometry::CANVAS_HEIGHT),
            );
            let anchor = match reproject {
                Some((placement, video_top)) => {
                    match geometry::reproject_label(anchor, placement, video_top) {
                        Some(a) => a,
                        None => continue,
                    }
                }
                None => anchor,
            };

            let shaped = self.shaper.shape_line(&label.text, &label.font, label.size)?;

            let style = &spec.label_style;
            if let Some(bg) = style.background.rgba8(style.background_opacity) {
                let rect = geometry::label_box(anchor, shaped.width, label.size);
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    bg[0], bg[1], bg[2], bg[3],
                ));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    rect.x0, rect.y0, rect.x1, rect.y1,
                ));
            }

            let stroke_px = label.size * style.stroke_weight;
            let left = anchor.x - shaped.width / 2.0;
            let top = anchor.y - shaped.height / 2.0;
            draw_line_text(ctx, &shaped, left, top, stroke_px, style.color);
        }
        Ok(())
    }
}

/// Draw one shaped line at `(left, top)`, stroke pass first, then fill.
fn draw_line_text(
    ctx: &mut vello_cpu::RenderContext,
    shaped: &ShapedLine,
    left: f64,
    top: f64,
    stroke_px: f64,
    color: TextColor,
) {
    ctx.set_transform(affine_to_cpu(Affine::translate((left, top))));

    if stroke_px > 0.0 {
        let sc = color.stroke_rgba8();
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke_px));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            sc[0], sc[1], sc[2], sc[3],
        ));
        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&shaped.font)
                    .font_size(run.run().font_size())
                    .stroke_glyphs(glyphs);
            }
        }
    }

    let fc = color.fill_rgba8();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        fc[0], fc[1], fc[2], fc[3],
    ));
    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&shaped.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Scale-draw an image paint so its natural bounds land on `(x, y, dst_w, dst_h)`.
#[allow(clippy::too_many_arguments)]
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: &vello_cpu::Image,
    src_w: u32,
    src_h: u32,
    x: f64,
    y: f64,
    dst_w: f64,
    dst_h: f64,
) {
    let sx = dst_w / f64::from(src_w);
    let sy = dst_h / f64::from(src_h);
    let t = Affine::translate((x, y)) * Affine::scale_non_uniform(sx, sy);
    ctx.set_transform(affine_to_cpu(t));
    ctx.set_paint(paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(src_w),
        f64::from(src_h),
    ));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CapclipResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CapclipError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CapclipError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CapclipError::validation("pixmap byte len mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> CapclipResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn rgba_straight_to_image_premul(
    bytes_rgba: &[u8],
    width: u32,
    height: u32,
) -> CapclipResult<vello_cpu::Image> {
    let mut tmp = bytes_rgba.to_vec();
    premultiply_rgba8_in_place(&mut tmp);
    rgba_premul_to_image(&tmp, width, height)
}
