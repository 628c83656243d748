use std::path::Path;

use anyhow::Context as _;
use kurbo::{Affine, Rect};

use crate::{
    foundation::core::FrameRGBA,
    foundation::error::{ShowreelError, ShowreelResult},
    foundation::math::mul_div255_u8,
    storyboard::model::Placement,
};

/// Backing-band opacity for top/bottom placements.
const BAND_ALPHA_EDGE: u8 = 102; // 0.4
/// Backing-band opacity for the narrower center placement.
const BAND_ALPHA_CENTER: u8 = 77; // 0.3
/// Drop-shadow offset in pixels, applied on both axes.
const SHADOW_OFFSET_PX: f64 = 3.0;

/// RGBA8 brush color carried through Parley text layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Stateful overlay renderer: one registered brand font plus reusable
/// Parley contexts.
///
/// `overlay` is a pure function over the input frame: it returns a new
/// composited frame and never mutates the caller's buffer. Pixels outside
/// the computed backing rectangle are guaranteed to pass through untouched.
pub struct TextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    font_family: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("font_family", &self.font_family)
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl TextRenderer {
    /// Build a renderer from raw font bytes.
    pub fn new(font_bytes: Vec<u8>, size_px: f32) -> ShowreelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ShowreelError::validation(
                "overlay size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ShowreelError::validation("no font families registered from font bytes")
        })?;
        let font_family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ShowreelError::validation("registered font family has no name"))?
            .to_string();

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_family,
            font,
            size_px,
        })
    }

    /// Build a renderer by reading a font file.
    pub fn from_font_file(path: &Path, size_px: f32) -> ShowreelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::new(bytes, size_px)
    }

    /// Primary family name of the registered font.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Composite `text` onto a copy of `frame` at the given placement.
    ///
    /// The text color is chosen against the local background: the placement
    /// third of the frame is averaged as grayscale, and a mean below 0.5
    /// selects white text, otherwise black. A semi-transparent black band
    /// behind the text keeps it legible either way. The text is drawn twice,
    /// shadow first, horizontally centered from the measured layout width;
    /// strings wider than the frame overflow (and are clipped to the band)
    /// rather than wrapping.
    pub fn overlay(
        &mut self,
        frame: &FrameRGBA,
        text: &str,
        placement: Placement,
    ) -> ShowreelResult<FrameRGBA> {
        if frame.width == 0 || frame.height == 0 {
            return Err(ShowreelError::validation(
                "overlay frame must have non-zero dimensions",
            ));
        }
        let width: u16 = frame
            .width
            .try_into()
            .map_err(|_| ShowreelError::validation("overlay frame width exceeds u16"))?;
        let height: u16 = frame
            .height
            .try_into()
            .map_err(|_| ShowreelError::validation("overlay frame height exceeds u16"))?;
        if frame.data.len() != (frame.width as usize) * (frame.height as usize) * 4 {
            return Err(ShowreelError::validation(
                "overlay frame byte length mismatch",
            ));
        }

        let text_rgba = contrast_color(mean_luminance(frame, placement));
        let layout = self.layout_plain(text)?;
        let band = band_rect(frame.width, frame.height, placement);
        let band_alpha = match placement {
            Placement::Top | Placement::Bottom => BAND_ALPHA_EDGE,
            Placement::Center => BAND_ALPHA_CENTER,
        };

        let text_w = f64::from(layout.width());
        let text_h = f64::from(layout.height());
        let tx = (f64::from(frame.width) - text_w) / 2.0;
        let ty = baseline_center_y(frame.height, placement) - text_h / 2.0;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, band_alpha));
        ctx.fill_rect(&rect_to_cpu(band));

        self.fill_layout_glyphs(
            &mut ctx,
            &layout,
            Affine::translate((tx + SHADOW_OFFSET_PX, ty + SHADOW_OFFSET_PX)),
            vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255),
        );
        self.fill_layout_glyphs(
            &mut ctx,
            &layout,
            Affine::translate((tx, ty)),
            vello_cpu::peniko::Color::from_rgba8(text_rgba[0], text_rgba[1], text_rgba[2], 255),
        );

        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut layer);

        let mut out = frame.clone();
        composite_layer_within(&mut out, layer.data_as_u8_slice(), band);
        Ok(out)
    }

    fn layout_plain(&mut self, text: &str) -> ShowreelResult<parley::Layout<TextBrushRgba8>> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.font_family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        // Overlay strings are short by contract; no wrapping.
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn fill_layout_glyphs(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        layout: &parley::Layout<TextBrushRgba8>,
        transform: Affine,
        color: vello_cpu::peniko::Color,
    ) {
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(color);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
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
    }
}

/// Mean Rec.601 luminance of the placement's sample third, normalized to
/// `[0, 1]`. Top samples the upper third, bottom the lower third, center the
/// middle third; all at full frame width.
fn mean_luminance(frame: &FrameRGBA, placement: Placement) -> f64 {
    let h = frame.height as usize;
    let w = frame.width as usize;
    let (row_start, row_end) = match placement {
        Placement::Top => (0, h / 3),
        Placement::Center => (h / 3, 2 * h / 3),
        Placement::Bottom => (2 * h / 3, h),
    };
    // Degenerate heights collapse a third to zero rows; sample everything.
    let (row_start, row_end) = if row_start == row_end {
        (0, h)
    } else {
        (row_start, row_end)
    };

    let mut sum = 0.0f64;
    let mut count = 0.0f64;
    for y in row_start..row_end {
        let row = &frame.data[y * w * 4..(y + 1) * w * 4];
        for px in row.chunks_exact(4) {
            sum += 0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2]);
            count += 1.0;
        }
    }
    if count == 0.0 {
        return 0.0;
    }
    sum / count / 255.0
}

/// White on dark backgrounds, black on light ones.
fn contrast_color(mean_luminance: f64) -> [u8; 3] {
    if mean_luminance < 0.5 {
        [255, 255, 255]
    } else {
        [0, 0, 0]
    }
}

/// Backing rectangle behind the text zone.
///
/// Top and bottom bands span the full width over a quarter of the frame
/// height; the center band is narrower on both axes.
fn band_rect(width: u32, height: u32, placement: Placement) -> Rect {
    let w = f64::from(width);
    let h = f64::from(height);
    match placement {
        Placement::Top => Rect::new(0.0, 0.0, w, (h / 4.0).floor()),
        Placement::Bottom => Rect::new(0.0, (3.0 * h / 4.0).floor(), w, h),
        Placement::Center => Rect::new(
            (w / 6.0).floor(),
            (h / 3.0).floor(),
            (5.0 * w / 6.0).floor(),
            (2.0 * h / 3.0).floor(),
        ),
    }
}

/// Vertical center the text block is aligned around for each placement.
fn baseline_center_y(height: u32, placement: Placement) -> f64 {
    let h = f64::from(height);
    match placement {
        Placement::Top => h / 6.0,
        Placement::Center => h / 2.0,
        Placement::Bottom => 5.0 * h / 6.0,
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// Composite a premultiplied overlay layer over an opaque frame, restricted
/// to the integer bounds of `band`. Pixels outside the band are never
/// touched, which is what keeps the overlay contained no matter how wide
/// the text is.
fn composite_layer_within(frame: &mut FrameRGBA, layer_premul: &[u8], band: Rect) {
    let w = frame.width as usize;
    let x0 = band.x0.max(0.0) as usize;
    let y0 = band.y0.max(0.0) as usize;
    let x1 = (band.x1.min(f64::from(frame.width)) as usize).max(x0);
    let y1 = (band.y1.min(f64::from(frame.height)) as usize).max(y0);

    for y in y0..y1 {
        for x in x0..x1 {
            let i = (y * w + x) * 4;
            let sa = layer_premul[i + 3];
            if sa == 0 {
                continue;
            }
            let inv = u16::from(255 - sa);
            for c in 0..3 {
                let src = layer_premul[i + c];
                let dst = frame.data[i + c];
                frame.data[i + c] = src.saturating_add(mul_div255_u8(u16::from(dst), inv));
            }
            // The base frame is opaque; it stays opaque.
            frame.data[i + 3] = 255;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/text.rs"]
mod tests;
