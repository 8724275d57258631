use std::sync::Arc;

use kurbo::{BezPath, PathEl, Point, Rect};

use crate::artwork::premultiply_rgba8_in_place;
use crate::foundation::color::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};
use crate::geometry;

/// Final composed poster raster: fully opaque RGBA8 at the fixed canvas
/// size, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedPoster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl ComposedPoster {
    /// Convert into an `image` buffer for host-side encoding or export.
    pub fn into_rgba_image(self) -> PosterResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| PosterError::validation("poster byte length does not match dimensions"))
    }

    /// Sample one pixel. Out-of-bounds coordinates are an error.
    pub fn pixel(&self, x: u32, y: u32) -> PosterResult<Rgba8> {
        if x >= self.width || y >= self.height {
            return Err(PosterError::validation(format!(
                "pixel ({x},{y}) outside {}x{}",
                self.width, self.height
            )));
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Ok(Rgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }
}

/// An explicit, caller-owned drawing surface.
///
/// One surface wraps one `vello_cpu` render context and target pixmap.
/// All drawing steps take `&mut Surface`; there is no global or
/// thread-local graphics state, so independent surfaces can be driven
/// from independent threads.
pub struct Surface {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    width: u32,
    height: u32,
}

impl Surface {
    /// Allocate a surface of the given pixel dimensions.
    pub fn new(width: u32, height: u32) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::validation(format!(
                "surface dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| PosterError::validation(format!("surface width exceeds u16: {width}")))?;
        let h: u16 = height.try_into().map_err(|_| {
            PosterError::validation(format!("surface height exceeds u16: {height}"))
        })?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            width,
            height,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the whole surface with a solid color.
    pub fn fill(&mut self, color: Rgba8) {
        let rect = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        self.fill_rect(rect, color);
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_paint(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Stroke a rectangle outline with the given line width, centered on
    /// the rectangle edges.
    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba8, line_width: f64) {
        use kurbo::Shape;
        self.stroke_path(&rect.to_path(0.1), color, line_width);
    }

    /// Fill an arbitrary path.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_paint(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke an arbitrary path.
    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba8, line_width: f64) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_paint(color));
        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(line_width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Fill a rounded rectangle.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.fill_path(&geometry::rounded_rect_path(rect, radius), color);
    }

    /// Fill the whole surface with a top-to-bottom two-stop linear
    /// gradient, built as a pixel ramp so the result is deterministic.
    pub fn fill_vertical_gradient(&mut self, top: Rgba8, bottom: Rgba8) -> PosterResult<()> {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut bytes = vec![0u8; w * h * 4];
        let h1 = (h.max(1) - 1) as f32;
        for y in 0..h {
            let t = if h1 <= 0.0 { 0.0 } else { (y as f32) / h1 };
            let c = top.lerp(bottom, t);
            let row = [c.r, c.g, c.b, c.a];
            for x in 0..w {
                let idx = (y * w + x) * 4;
                bytes[idx..idx + 4].copy_from_slice(&row);
            }
        }
        premultiply_rgba8_in_place(&mut bytes);
        let img = image_from_premul_bytes(&bytes, self.width, self.height)?;

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        Ok(())
    }

    /// Draw a straight-alpha RGBA8 bitmap with its top-left corner at
    /// `origin`, at its own pixel size. Callers resize beforehand
    /// (stretch-fit or aspect-fit) so placement stays exact.
    pub fn draw_bitmap(&mut self, bitmap: &image::RgbaImage, origin: Point) -> PosterResult<()> {
        let (w, h) = bitmap.dimensions();
        let img = image_paint_from_rgba(bitmap)?;
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        Ok(())
    }

    /// Draw a bitmap clipped to a rounded rectangle of its own size, by
    /// filling the rounded path with the bitmap as paint.
    pub fn draw_bitmap_rounded(
        &mut self,
        bitmap: &image::RgbaImage,
        origin: Point,
        corner_radius: f64,
    ) -> PosterResult<()> {
        let (w, h) = bitmap.dimensions();
        let img = image_paint_from_rgba(bitmap)?;
        let local = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        self.ctx.set_paint(img);
        self.ctx
            .fill_path(&bezpath_to_cpu(&geometry::rounded_rect_path(
                local,
                corner_radius,
            )));
        Ok(())
    }

    /// Mutable access to the underlying render context, for the glyph
    /// rendering path.
    pub(crate) fn ctx_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Flush queued drawing and read back the final pixels.
    ///
    /// The readback is premultiplied RGBA8; composed posters are fully
    /// opaque, for which premultiplied and straight alpha coincide.
    pub fn finish(mut self) -> ComposedPoster {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        ComposedPoster {
            width: self.width,
            height: self.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

fn color_paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::validation("bitmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::validation("bitmap height exceeds u16"))?;
    let expected = (width as usize) * (height as usize) * 4;
    if bytes.len() != expected {
        return Err(PosterError::validation(format!(
            "bitmap byte length {} does not match {width}x{height}",
            bytes.len()
        )));
    }

    // caller guarantees premultiplied input, which is the pixmap's storage
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn image_from_premul_bytes(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> PosterResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_paint_from_rgba(bitmap: &image::RgbaImage) -> PosterResult<vello_cpu::Image> {
    let (w, h) = bitmap.dimensions();
    let mut bytes = bitmap.as_raw().clone();
    premultiply_rgba8_in_place(&mut bytes);
    image_from_premul_bytes(&bytes, w, h)
}

#[cfg(test)]
#[path = "../tests/unit/surface.rs"]
mod tests;
