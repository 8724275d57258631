use kurbo::Point;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::surface::{Surface, affine_to_cpu};

/// Smallest font size the autosize search may return.
pub const MIN_TITLE_SIZE: f32 = 12.0;
/// Starting (largest) font size of the autosize search.
pub const MAX_TITLE_SIZE: f32 = 64.0;

/// Measured extents of a laid-out text block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Widest line width in pixels.
    pub width: f32,
    /// Total laid-out height in pixels.
    pub height: f32,
}

/// Pluggable text/glyph rendering capability the compositor depends on.
///
/// The default implementation is [`ParleyTextRenderer`]; tests substitute
/// recording stubs so the suite needs no font binary.
pub trait TextRenderer {
    /// Measure `text` at `size_px`, word-wrapped at `max_width` when given.
    fn measure(
        &mut self,
        text: &str,
        size_px: f32,
        max_width: Option<f32>,
    ) -> PosterResult<TextMetrics>;

    /// Draw `text` onto `surface` with the layout's top-left at `origin`.
    ///
    /// Empty text draws nothing and succeeds.
    fn draw(
        &mut self,
        surface: &mut Surface,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()>;

    /// Draw `text` rotated a quarter turn about `origin`, so lines run
    /// vertically and stack leftward from the origin.
    fn draw_rotated(
        &mut self,
        surface: &mut Surface,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()>;
}

/// Largest integer font size in `[MIN_TITLE_SIZE, max_size]` whose wrapped
/// text height fits `max_height`; returns the floor when nothing fits.
///
/// Bounded binary search over integer sizes, so it terminates in O(log N)
/// measurements. Assumes wrapped height is non-decreasing in font size.
pub fn fit_font_size(
    renderer: &mut dyn TextRenderer,
    text: &str,
    max_width: f32,
    max_height: f32,
    max_size: f32,
) -> PosterResult<f32> {
    let floor = MIN_TITLE_SIZE as i32;
    let mut lo = floor;
    let mut hi = (max_size.max(MIN_TITLE_SIZE)) as i32;
    let mut best = floor;

    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let metrics = renderer.measure(text, mid as f32, Some(max_width))?;
        if metrics.height <= max_height {
            best = mid;
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }
    Ok(best as f32)
}

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Default Parley-backed text renderer.
///
/// The caller supplies raw TTF/OTF bytes; no system font lookup or other
/// I/O happens inside the engine, so output is deterministic for a given
/// font.
pub struct ParleyTextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<BrushRgba8>,
    font_data: vello_cpu::peniko::FontData,
    family_name: String,
}

impl ParleyTextRenderer {
    /// Register the given font bytes and build a renderer around them.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> PosterResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PosterError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::validation("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_data,
            family_name,
        })
    }

    /// Primary family name detected from the registered font bytes.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: BrushRgba8,
        max_width: Option<f32>,
    ) -> PosterResult<parley::Layout<BrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<BrushRgba8> = builder.build(text);
        if let Some(w) = max_width {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }
        Ok(layout)
    }

    fn draw_with_transform(
        &mut self,
        surface: &mut Surface,
        text: &str,
        transform: kurbo::Affine,
        size_px: f32,
        color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let brush = BrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self.layout(text, size_px, brush, max_width)?;

        let ctx = surface.ctx_mut();
        ctx.set_transform(affine_to_cpu(transform));
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
                ctx.glyph_run(&self.font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl TextRenderer for ParleyTextRenderer {
    fn measure(
        &mut self,
        text: &str,
        size_px: f32,
        max_width: Option<f32>,
    ) -> PosterResult<TextMetrics> {
        if text.is_empty() {
            return Ok(TextMetrics::default());
        }
        let layout = self.layout(text, size_px, BrushRgba8::default(), max_width)?;
        Ok(TextMetrics {
            width: layout.width(),
            height: layout.height(),
        })
    }

    fn draw(
        &mut self,
        surface: &mut Surface,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()> {
        self.draw_with_transform(
            surface,
            text,
            kurbo::Affine::translate((origin.x, origin.y)),
            size_px,
            color,
            max_width,
        )
    }

    fn draw_rotated(
        &mut self,
        surface: &mut Surface,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()> {
        let transform = kurbo::Affine::translate((origin.x, origin.y))
            * kurbo::Affine::rotate(std::f64::consts::FRAC_PI_2);
        self.draw_with_transform(surface, text, transform, size_px, color, max_width)
    }
}

#[cfg(test)]
#[path = "../tests/unit/text.rs"]
mod tests;
