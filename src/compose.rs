use kurbo::{Point, Rect, Size};
use rayon::prelude::*;

use crate::artwork::SourceArtwork;
use crate::foundation::color::Rgba8;
use crate::foundation::error::{PosterError, PosterResult, RenderStage};
use crate::geometry;
use crate::layout::{CANVAS_HEIGHT, CANVAS_WIDTH, ModernLayout, STAR_COUNT, TraditionalLayout};
use crate::record::{LayoutMode, MediaRecord};
use crate::surface::{ComposedPoster, Surface};
use crate::text::{MAX_TITLE_SIZE, TextRenderer, fit_font_size};

/// Scale applied to the dominant color for the top stop of the modern
/// background gradient.
const DARKEN_FACTOR: f64 = 0.55;

/// Title policy for the modern layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModernTitlePolicy {
    /// Word-wrap at the fixed title size inside the title rect. Text may
    /// overflow the rect vertically; this is the canonical policy.
    #[default]
    Wrapped,
    /// Autosized title drawn rotated a quarter turn inside the vertical
    /// strip box.
    RotatedStrip,
}

/// Deterministic poster compositor.
///
/// One call to [`PosterCompositor::compose`] is a pure transformation of
/// `(artwork, record, mode)` into a [`ComposedPoster`]: no I/O, no shared
/// state, no randomness. Independent compositors can run on independent
/// threads; see [`compose_batch`] for the parallel fan-out.
pub struct PosterCompositor<T: TextRenderer> {
    text: T,
    traditional: TraditionalLayout,
    modern: ModernLayout,
    modern_title_policy: ModernTitlePolicy,
}

impl<T: TextRenderer> PosterCompositor<T> {
    /// Build a compositor around a text renderer, with default layout
    /// tables and the canonical modern title policy.
    pub fn new(text: T) -> Self {
        Self {
            text,
            traditional: TraditionalLayout::DEFAULT,
            modern: ModernLayout::DEFAULT,
            modern_title_policy: ModernTitlePolicy::default(),
        }
    }

    /// Select the modern layout's title policy.
    pub fn with_modern_title_policy(mut self, policy: ModernTitlePolicy) -> Self {
        self.modern_title_policy = policy;
        self
    }

    /// Compose one poster.
    ///
    /// Atomic: returns either a complete opaque 1179x2556 raster or an
    /// error, never partial output. `record.rating` is clamped into
    /// `[0, 10]`; empty title/year strings render as empty text.
    #[tracing::instrument(skip(self, artwork, record), fields(title = %record.title, mode = ?mode))]
    pub fn compose(
        &mut self,
        artwork: &SourceArtwork,
        record: &MediaRecord,
        mode: LayoutMode,
    ) -> PosterResult<ComposedPoster> {
        match mode {
            LayoutMode::Traditional => self.compose_traditional(artwork, record),
            LayoutMode::Modern => self.compose_modern(artwork, record),
        }
    }

    fn compose_traditional(
        &mut self,
        artwork: &SourceArtwork,
        record: &MediaRecord,
    ) -> PosterResult<ComposedPoster> {
        let spec = self.traditional;
        let mut surface = new_canvas_surface()?;

        surface.fill(artwork.average_color());
        surface.fill_rect(spec.panel, Rgba8::WHITE);
        surface.stroke_rect(spec.panel, Rgba8::BLACK, spec.panel_border_width);

        // Deliberate stretch-fit: the poster sub-rectangle is filled
        // exactly, source aspect ratio is not preserved.
        let poster = spec.poster;
        let resized =
            artwork.stretch_to(poster.width().round() as u32, poster.height().round() as u32);
        surface
            .draw_bitmap(&resized, poster.origin())
            .map_err(stage_err(RenderStage::ArtworkPlacement))?;

        // No wrapping: long titles may run past the panel edge.
        self.text
            .draw(
                &mut surface,
                &record.title,
                spec.title_anchor,
                spec.title_size,
                Rgba8::BLACK,
                None,
            )
            .map_err(stage_err(RenderStage::Text))?;

        for (i, line) in split_year(&record.year).iter().enumerate() {
            let anchor = Point::new(
                spec.year_anchor.x,
                spec.year_anchor.y + (i as f64) * spec.year_line_height,
            );
            self.text
                .draw(
                    &mut surface,
                    line,
                    anchor,
                    spec.year_size,
                    Rgba8::BLACK,
                    None,
                )
                .map_err(stage_err(RenderStage::Text))?;
        }

        draw_star_row(
            &mut surface,
            record.clamped_rating(),
            |i| spec.star_rect(i),
            spec.star_fill,
            spec.star_outline,
            spec.star_outline_width,
        );
        Ok(surface.finish())
    }

    fn compose_modern(
        &mut self,
        artwork: &SourceArtwork,
        record: &MediaRecord,
    ) -> PosterResult<ComposedPoster> {
        let spec = self.modern;
        let mut surface = new_canvas_surface()?;

        let top = artwork.average_color().scaled(DARKEN_FACTOR);
        surface
            .fill_vertical_gradient(top, Rgba8::BLACK)
            .map_err(stage_err(RenderStage::Background))?;
        surface.fill_rounded_rect(
            spec.info_box,
            spec.box_corner_radius,
            Rgba8::WHITE.with_alpha(spec.box_alpha),
        );

        // Aspect-fit: width follows the source ratio at the fixed target
        // height, capped so the placed rect cannot leave the info box, then
        // the result is right-aligned inside the box.
        let max_width = spec.info_box.width() - spec.artwork_margin;
        let fitted = artwork.fit_within(
            max_width.round() as u32,
            spec.artwork_target_height().round() as u32,
        );
        let (fw, fh) = fitted.dimensions();
        let placed = spec.artwork_rect(Size::new(f64::from(fw), f64::from(fh)));
        surface
            .draw_bitmap_rounded(&fitted, placed.origin(), spec.artwork_corner_radius)
            .map_err(stage_err(RenderStage::ArtworkPlacement))?;

        self.text
            .draw(
                &mut surface,
                &record.year,
                spec.year_anchor(),
                spec.year_size,
                Rgba8::BLACK,
                None,
            )
            .map_err(stage_err(RenderStage::Text))?;

        match self.modern_title_policy {
            ModernTitlePolicy::Wrapped => {
                let title_rect = spec.title_rect(f64::from(fw));
                self.text
                    .draw(
                        &mut surface,
                        &record.title,
                        title_rect.origin(),
                        spec.title_size,
                        Rgba8::BLACK,
                        Some(title_rect.width() as f32),
                    )
                    .map_err(stage_err(RenderStage::Text))?;
            }
            ModernTitlePolicy::RotatedStrip => {
                // The strip is rotated a quarter turn: wrap width runs
                // along the strip length, the height budget across its
                // width.
                let wrap_width = spec.strip_size.height as f32;
                let height_budget = spec.strip_size.width as f32;
                let size = fit_font_size(
                    &mut self.text,
                    &record.title,
                    wrap_width,
                    height_budget,
                    MAX_TITLE_SIZE,
                )
                .map_err(stage_err(RenderStage::Text))?;
                let origin = Point::new(
                    spec.strip_origin.x + spec.strip_size.width,
                    spec.strip_origin.y,
                );
                self.text
                    .draw_rotated(
                        &mut surface,
                        &record.title,
                        origin,
                        size,
                        Rgba8::BLACK,
                        Some(wrap_width),
                    )
                    .map_err(stage_err(RenderStage::Text))?;
            }
        }

        draw_star_row(
            &mut surface,
            record.clamped_rating(),
            |i| spec.star_rect(i),
            spec.star_fill,
            spec.star_outline,
            spec.star_outline_width,
        );
        Ok(surface.finish())
    }
}

/// Compose one poster per `(artwork, record)` pair in parallel, preserving
/// input order.
///
/// Each job gets its own compositor with a fresh renderer from
/// `make_renderer` (renderers are stateful), so jobs share no mutable
/// state. The first error aborts the batch.
#[tracing::instrument(skip(jobs, make_renderer), fields(jobs = jobs.len(), mode = ?mode))]
pub fn compose_batch<T, F>(
    jobs: &[(SourceArtwork, MediaRecord)],
    mode: LayoutMode,
    threads: Option<usize>,
    make_renderer: F,
) -> PosterResult<Vec<ComposedPoster>>
where
    T: TextRenderer,
    F: Fn() -> PosterResult<T> + Sync,
{
    let pool = build_thread_pool(threads)?;
    pool.install(|| {
        jobs.par_iter()
            .map(|(artwork, record)| {
                let mut compositor = PosterCompositor::new(make_renderer()?);
                compositor.compose(artwork, record, mode)
            })
            .collect()
    })
}

fn new_canvas_surface() -> PosterResult<Surface> {
    Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT).map_err(|e| {
        PosterError::render(
            RenderStage::Background,
            format!("failed to acquire drawing surface: {e}"),
        )
    })
}

fn stage_err(stage: RenderStage) -> impl Fn(PosterError) -> PosterError {
    move |e| match e {
        already @ PosterError::Render { .. } => already,
        other => PosterError::render(stage, other.to_string()),
    }
}

fn draw_star_row(
    surface: &mut Surface,
    rating: u8,
    cell: impl Fn(usize) -> Rect,
    fill: Rgba8,
    outline: Rgba8,
    outline_width: f64,
) {
    for i in 0..STAR_COUNT {
        let path = geometry::star_in_rect(cell(i));
        if i < usize::from(rating) {
            surface.fill_path(&path, fill);
        } else {
            surface.stroke_path(&path, outline, outline_width);
        }
    }
}

/// Year display lines for the traditional layout's narrow column.
///
/// A year of exactly four ASCII digits is split into two stacked
/// two-character lines; anything else (including `"????"`) stays on one
/// line.
pub(crate) fn split_year(year: &str) -> Vec<String> {
    let chars: Vec<char> = year.chars().collect();
    if chars.len() == 4 && chars.iter().all(|c| c.is_ascii_digit()) {
        vec![chars[..2].iter().collect(), chars[2..].iter().collect()]
    } else {
        vec![year.to_string()]
    }
}

fn build_thread_pool(threads: Option<usize>) -> PosterResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PosterError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PosterError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/compose.rs"]
mod tests;
