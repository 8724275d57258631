use crate::foundation::color::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};

/// A decoded source artwork bitmap in straight-alpha RGBA8.
///
/// Construction validates the bitmap (non-zero dimensions, decodable bytes);
/// a value of this type is always drawable. All operations produce resized
/// copies and never mutate the source pixels.
#[derive(Clone, Debug)]
pub struct SourceArtwork {
    pixels: image::RgbaImage,
}

impl SourceArtwork {
    /// Wrap an already-decoded bitmap.
    ///
    /// Fails with [`PosterError::InvalidArtwork`] when either dimension is
    /// zero.
    pub fn from_rgba8(pixels: image::RgbaImage) -> PosterResult<Self> {
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(PosterError::invalid_artwork(format!(
                "artwork dimensions must be non-zero, got {w}x{h}"
            )));
        }
        Ok(Self { pixels })
    }

    /// Decode encoded image bytes (any format the `image` crate recognizes)
    /// and convert to RGBA8.
    pub fn decode(bytes: &[u8]) -> PosterResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| PosterError::invalid_artwork(format!("undecodable artwork bytes: {e}")))?;
        Self::from_rgba8(dyn_img.to_rgba8())
    }

    /// Width in pixels (always non-zero).
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels (always non-zero).
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.pixels.width()) / f64::from(self.pixels.height())
    }

    /// Borrow the decoded pixels.
    pub fn as_rgba8(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Dominant color of the artwork: the box-filter mean of every pixel,
    /// i.e. a 1x1 downsample. Falls back to [`Rgba8::NEUTRAL_GRAY`] when the
    /// bitmap holds no pixels.
    pub fn average_color(&self) -> Rgba8 {
        let count = u64::from(self.pixels.width()) * u64::from(self.pixels.height());
        if count == 0 {
            return Rgba8::NEUTRAL_GRAY;
        }

        let mut sums = [0u64; 4];
        for px in self.pixels.pixels() {
            for (sum, &c) in sums.iter_mut().zip(px.0.iter()) {
                *sum += u64::from(c);
            }
        }
        Rgba8 {
            r: (sums[0] / count) as u8,
            g: (sums[1] / count) as u8,
            b: (sums[2] / count) as u8,
            a: (sums[3] / count) as u8,
        }
    }

    /// Stretch-fit resize: exact target dimensions, aspect ratio NOT
    /// preserved.
    pub fn stretch_to(&self, width: u32, height: u32) -> image::RgbaImage {
        image::imageops::resize(
            &self.pixels,
            width.max(1),
            height.max(1),
            image::imageops::FilterType::Triangle,
        )
    }

    /// Aspect-preserving resize into a bounding box: the result touches at
    /// least one bound and never exceeds either, so extreme aspect ratios
    /// stay drawable. Output dimensions are decided before any resampling
    /// work happens.
    pub fn fit_within(&self, max_width: u32, max_height: u32) -> image::RgbaImage {
        let target = crate::geometry::size_to_fit(
            self.width(),
            self.height(),
            kurbo::Size::new(f64::from(max_width.max(1)), f64::from(max_height.max(1))),
        );
        image::imageops::resize(
            &self.pixels,
            target.width as u32,
            target.height as u32,
            image::imageops::FilterType::Triangle,
        )
    }
}

/// Scale color channels by alpha with round-half-up, the form `vello_cpu`
/// pixmaps store.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/artwork.rs"]
mod tests;
