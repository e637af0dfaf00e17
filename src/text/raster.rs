use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{PixelPaneError, PixelPaneResult},
    raster::{bitmap::Bitmap, composite::unpremultiply, pixel::Pixel},
};

/// How a string is rendered by [`TextRasterizer::rasterize`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Glyph color.
    pub color: Pixel,
    /// Smooth glyph edges. Without it every pixel is either `color` or blank.
    pub antialias: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 12.0,
            color: Pixel::WHITE,
            antialias: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrush {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Renders strings from one font into bitmaps cropped to the laid-out text.
pub struct TextRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl TextRasterizer {
    /// Register a TrueType/OpenType font from its bytes.
    pub fn from_font_bytes(bytes: Vec<u8>) -> PixelPaneResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PixelPaneError::text("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PixelPaneError::text("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        })
    }

    /// Load a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> PixelPaneResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    /// Family name of the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Render `text` on a single line.
    ///
    /// The bitmap covers the measured layout box, rounded up. Text that measures empty yields
    /// a 1x1 blank bitmap.
    #[tracing::instrument(level = "debug", skip(self, style))]
    pub fn rasterize(&mut self, text: &str, style: &TextStyle) -> PixelPaneResult<Bitmap> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(PixelPaneError::text("text size_px must be finite and > 0"));
        }

        let brush = TextBrush {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.alpha,
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width().ceil();
        let height = layout.height().ceil();
        if !(width >= 1.0 && height >= 1.0) {
            return Bitmap::blank(1, 1);
        }
        let (w, h) = match (to_u16(width), to_u16(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(PixelPaneError::text(format!(
                    "text measures {width}x{height}, larger than a bitmap can hold"
                )));
            }
        };

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let mut out = Bitmap::blank(u32::from(w), u32::from(h))?;
        let bytes = pixmap.data_as_u8_slice();
        for (px, c) in out.pixels_mut().iter_mut().zip(bytes.chunks_exact(4)) {
            let straight = unpremultiply([c[0], c[1], c[2], c[3]]);
            *px = if style.antialias {
                straight
            } else if straight.alpha >= 0x80 {
                Pixel { alpha: 0xFF, ..style.color }
            } else {
                Pixel::BLANK
            };
        }
        Ok(out)
    }
}

fn to_u16(v: f32) -> Option<u16> {
    (v <= f32::from(u16::MAX)).then_some(v as u16)
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
