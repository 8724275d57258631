use std::sync::{Arc, Mutex};

use super::*;
use crate::surface::ComposedPoster;
use crate::text::TextMetrics;

#[derive(Clone, Debug, PartialEq)]
struct DrawCall {
    text: String,
    origin: (f64, f64),
    size: f32,
    rotated: bool,
    max_width: Option<f32>,
}

/// Records draw calls instead of rasterizing glyphs, so the suite needs
/// no font binary. Measured height is `size * height_per_size`.
#[derive(Clone)]
struct RecordingRenderer {
    calls: Arc<Mutex<Vec<DrawCall>>>,
    height_per_size: f32,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            height_per_size: 1.0,
        }
    }
}

impl RecordingRenderer {
    fn record(&self, text: &str, origin: Point, size: f32, rotated: bool, max_width: Option<f32>) {
        // empty text draws nothing, matching the trait contract
        if text.is_empty() {
            return;
        }
        self.calls.lock().unwrap().push(DrawCall {
            text: text.to_string(),
            origin: (origin.x, origin.y),
            size,
            rotated,
            max_width,
        });
    }
}

impl TextRenderer for RecordingRenderer {
    fn measure(
        &mut self,
        text: &str,
        size_px: f32,
        _max_width: Option<f32>,
    ) -> PosterResult<TextMetrics> {
        Ok(TextMetrics {
            width: text.len() as f32 * size_px * 0.5,
            height: size_px * self.height_per_size,
        })
    }

    fn draw(
        &mut self,
        _surface: &mut Surface,
        text: &str,
        origin: Point,
        size_px: f32,
        _color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()> {
        self.record(text, origin, size_px, false, max_width);
        Ok(())
    }

    fn draw_rotated(
        &mut self,
        _surface: &mut Surface,
        text: &str,
        origin: Point,
        size_px: f32,
        _color: Rgba8,
        max_width: Option<f32>,
    ) -> PosterResult<()> {
        self.record(text, origin, size_px, true, max_width);
        Ok(())
    }
}

fn recording() -> (
    PosterCompositor<RecordingRenderer>,
    Arc<Mutex<Vec<DrawCall>>>,
) {
    let renderer = RecordingRenderer::default();
    let calls = renderer.calls.clone();
    (PosterCompositor::new(renderer), calls)
}

fn artwork(w: u32, h: u32, rgba: [u8; 4]) -> SourceArtwork {
    SourceArtwork::from_rgba8(image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))).unwrap()
}

fn record(title: &str, year: &str, rating: i32) -> MediaRecord {
    MediaRecord {
        title: title.into(),
        year: year.into(),
        rating,
        is_series: false,
    }
}

fn px(poster: &ComposedPoster, x: f64, y: f64) -> Rgba8 {
    poster.pixel(x as u32, y as u32).unwrap()
}

#[test]
fn canvas_is_always_full_size() {
    let (mut compositor, _) = recording();
    for mode in [LayoutMode::Traditional, LayoutMode::Modern] {
        for art in [
            artwork(1, 1, [9, 9, 9, 255]),
            artwork(640, 480, [9, 9, 9, 255]),
            artwork(100, 2000, [9, 9, 9, 255]),
        ] {
            let poster = compositor
                .compose(&art, &record("T", "1999", 5), mode)
                .unwrap();
            assert_eq!((poster.width, poster.height), (CANVAS_WIDTH, CANVAS_HEIGHT));
            assert_eq!(
                poster.data.len(),
                (CANVAS_WIDTH as usize) * (CANVAS_HEIGHT as usize) * 4
            );
        }
    }
}

#[test]
fn traditional_star_fill_count_matches_rating() {
    let (mut compositor, _) = recording();
    let art = artwork(4, 4, [255, 255, 255, 255]);
    let poster = compositor
        .compose(&art, &record("T", "1999", 4), LayoutMode::Traditional)
        .unwrap();

    let layout = TraditionalLayout::DEFAULT;
    for i in 0..STAR_COUNT {
        let c = layout.star_rect(i).center();
        let sample = px(&poster, c.x, c.y);
        if i < 4 {
            assert_eq!(sample, Rgba8::BLACK, "star {i} should be filled");
        } else {
            assert_eq!(sample, Rgba8::WHITE, "star {i} should be outline only");
        }
    }
}

#[test]
fn rating_is_clamped_before_drawing() {
    let (mut compositor, _) = recording();
    let art = artwork(4, 4, [255, 255, 255, 255]);
    let layout = TraditionalLayout::DEFAULT;

    let poster = compositor
        .compose(&art, &record("T", "1999", 17), LayoutMode::Traditional)
        .unwrap();
    for i in 0..STAR_COUNT {
        let c = layout.star_rect(i).center();
        assert_eq!(px(&poster, c.x, c.y), Rgba8::BLACK);
    }

    let poster = compositor
        .compose(&art, &record("T", "1999", -3), LayoutMode::Traditional)
        .unwrap();
    for i in 0..STAR_COUNT {
        let c = layout.star_rect(i).center();
        assert_eq!(px(&poster, c.x, c.y), Rgba8::WHITE);
    }
}

#[test]
fn modern_filled_stars_are_yellow() {
    let (mut compositor, _) = recording();
    let art = artwork(4, 4, [255, 255, 255, 255]);
    let poster = compositor
        .compose(&art, &record("T", "1999", 6), LayoutMode::Modern)
        .unwrap();

    let layout = ModernLayout::DEFAULT;
    for i in 0..STAR_COUNT {
        let c = layout.star_rect(i).center();
        let sample = px(&poster, c.x, c.y);
        if i < 6 {
            assert_eq!(sample, Rgba8::rgb(255, 215, 0), "star {i} should be filled");
        } else {
            // unfilled cells show the translucent info box underneath
            assert!(sample.b > 100, "star {i} should be outline only, got {sample:?}");
        }
    }
}

#[test]
fn traditional_stretch_fills_the_poster_rect() {
    let (mut compositor, _) = recording();
    let art = artwork(10, 30, [255, 0, 0, 255]);
    let poster = compositor
        .compose(&art, &record("T", "1999", 0), LayoutMode::Traditional)
        .unwrap();

    let rect = TraditionalLayout::DEFAULT.poster;
    let inside = px(&poster, rect.center().x, rect.center().y);
    assert!(inside.r > 240 && inside.g < 10, "expected artwork red, got {inside:?}");

    // panel interior stays white left of the artwork
    let beside = px(&poster, 220.0, rect.center().y);
    assert_eq!(beside, Rgba8::WHITE);

    // panel border stroke is black
    let border = px(&poster, 190.0, 1400.0);
    assert_eq!(border, Rgba8::BLACK);
}

#[test]
fn modern_artwork_is_aspect_fit_and_right_aligned() {
    let (mut compositor, _) = recording();
    // 1:2 portrait source; fitted width is 947 * 0.5 = 474
    let art = artwork(100, 200, [255, 0, 0, 255]);
    let poster = compositor
        .compose(&art, &record("T", "1999", 0), LayoutMode::Modern)
        .unwrap();

    let layout = ModernLayout::DEFAULT;
    let placed = layout.artwork_rect(kurbo::Size::new(474.0, 947.0));
    let inside = px(&poster, placed.center().x, placed.center().y);
    assert!(inside.r > 240 && inside.g < 10, "expected artwork red, got {inside:?}");

    // left of the placed artwork the info box shows through
    let beside = px(&poster, placed.x0 - 30.0, placed.center().y);
    assert!(beside.g > 150, "expected info box, got {beside:?}");
}

#[test]
fn modern_composes_wide_banner_artwork() {
    let (mut compositor, _) = recording();
    // 100:1 banner; the fitted width is capped so placement stays inside
    // the info box instead of overflowing the pixmap
    let art = artwork(400, 4, [255, 0, 0, 255]);
    let poster = compositor
        .compose(&art, &record("T", "1999", 0), LayoutMode::Modern)
        .unwrap();
    assert_eq!((poster.width, poster.height), (CANVAS_WIDTH, CANVAS_HEIGHT));

    let layout = ModernLayout::DEFAULT;
    let placed = layout.artwork_rect(kurbo::Size::new(977.0, 10.0));
    assert!(placed.x0 >= layout.info_box.x0);
    let inside = px(&poster, placed.center().x, placed.center().y);
    assert!(inside.r > 240 && inside.g < 10, "expected artwork red, got {inside:?}");
}

#[test]
fn four_digit_year_renders_two_stacked_lines() {
    let (mut compositor, calls) = recording();
    let art = artwork(4, 4, [0, 0, 0, 255]);
    compositor
        .compose(&art, &record("", "2023", 0), LayoutMode::Traditional)
        .unwrap();

    let calls = calls.lock().unwrap();
    let layout = TraditionalLayout::DEFAULT;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].text, "20");
    assert_eq!(calls[1].text, "23");
    assert_eq!(calls[0].origin, (layout.year_anchor.x, layout.year_anchor.y));
    assert_eq!(
        calls[1].origin,
        (
            layout.year_anchor.x,
            layout.year_anchor.y + layout.year_line_height
        )
    );
    assert!(calls.iter().all(|c| c.size == layout.year_size));
}

#[test]
fn non_digit_year_stays_on_one_line() {
    let (mut compositor, calls) = recording();
    let art = artwork(4, 4, [0, 0, 0, 255]);
    compositor
        .compose(&art, &record("", "????", 0), LayoutMode::Traditional)
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "????");
}

#[test]
fn split_year_handles_the_edge_shapes() {
    assert_eq!(split_year("2023"), vec!["20", "23"]);
    assert_eq!(split_year("????"), vec!["????"]);
    assert_eq!(split_year("85"), vec!["85"]);
    assert_eq!(split_year(""), vec![""]);
    assert_eq!(split_year("20235"), vec!["20235"]);
    assert_eq!(split_year("20a3"), vec!["20a3"]);
}

#[test]
fn empty_title_and_year_compose_without_text() {
    let (mut compositor, calls) = recording();
    let art = artwork(4, 4, [0, 0, 0, 255]);
    for mode in [LayoutMode::Traditional, LayoutMode::Modern] {
        compositor.compose(&art, &record("", "", 3), mode).unwrap();
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn modern_wrapped_title_uses_the_title_rect() {
    let (mut compositor, calls) = recording();
    let art = artwork(100, 200, [0, 0, 0, 255]);
    compositor
        .compose(&art, &record("A Long Movie Title", "", 0), LayoutMode::Modern)
        .unwrap();

    let layout = ModernLayout::DEFAULT;
    let title_rect = layout.title_rect(474.0);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "A Long Movie Title");
    assert_eq!(calls[0].origin, (title_rect.x0, title_rect.y0));
    assert_eq!(calls[0].size, layout.title_size);
    assert_eq!(calls[0].max_width, Some(title_rect.width() as f32));
    assert!(!calls[0].rotated);
}

#[test]
fn rotated_strip_title_autosizes_within_bounds() {
    let art = artwork(4, 4, [0, 0, 0, 255]);
    let layout = ModernLayout::DEFAULT;

    // single measured line always fits the strip width, so the search
    // tops out
    let renderer = RecordingRenderer::default();
    let calls = renderer.calls.clone();
    let mut compositor = PosterCompositor::new(renderer)
        .with_modern_title_policy(ModernTitlePolicy::RotatedStrip);
    compositor
        .compose(&art, &record("Vertical", "", 0), LayoutMode::Modern)
        .unwrap();
    {
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].rotated);
        assert_eq!(calls[0].size, crate::text::MAX_TITLE_SIZE);
        assert_eq!(calls[0].max_width, Some(layout.strip_size.height as f32));
        assert_eq!(
            calls[0].origin,
            (
                layout.strip_origin.x + layout.strip_size.width,
                layout.strip_origin.y
            )
        );
    }

    // nothing fits: the search settles on the floor size
    let renderer = RecordingRenderer {
        calls: Arc::new(Mutex::new(Vec::new())),
        height_per_size: 100.0,
    };
    let calls = renderer.calls.clone();
    let mut compositor = PosterCompositor::new(renderer)
        .with_modern_title_policy(ModernTitlePolicy::RotatedStrip);
    compositor
        .compose(&art, &record("Vertical", "", 0), LayoutMode::Modern)
        .unwrap();
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].size, crate::text::MIN_TITLE_SIZE);
}

#[test]
fn identical_inputs_compose_identical_bytes() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let art = artwork(12, 20, [40, 80, 160, 255]);
    let rec = record("Same Input", "2001", 7);
    let run = || {
        let (mut compositor, _) = recording();
        let traditional = compositor
            .compose(&art, &rec, LayoutMode::Traditional)
            .unwrap();
        let modern = compositor.compose(&art, &rec, LayoutMode::Modern).unwrap();
        (traditional.data, modern.data)
    };
    assert_eq!(run(), run());
}

#[test]
fn compose_batch_preserves_input_order() {
    let jobs = vec![
        (artwork(4, 4, [255, 255, 255, 255]), record("A", "1990", 0)),
        (artwork(4, 4, [255, 255, 255, 255]), record("B", "1991", 10)),
        (artwork(4, 4, [255, 255, 255, 255]), record("C", "1992", 0)),
    ];
    let posters = compose_batch(&jobs, LayoutMode::Traditional, Some(2), || {
        Ok(RecordingRenderer::default())
    })
    .unwrap();

    assert_eq!(posters.len(), 3);
    let first_star = TraditionalLayout::DEFAULT.star_rect(0).center();
    assert_eq!(px(&posters[0], first_star.x, first_star.y), Rgba8::WHITE);
    assert_eq!(px(&posters[1], first_star.x, first_star.y), Rgba8::BLACK);
    assert_eq!(px(&posters[2], first_star.x, first_star.y), Rgba8::WHITE);
}

#[test]
fn compose_batch_rejects_zero_threads() {
    let jobs = vec![(artwork(4, 4, [0, 0, 0, 255]), record("A", "1990", 0))];
    let err = compose_batch(&jobs, LayoutMode::Traditional, Some(0), || {
        Ok(RecordingRenderer::default())
    })
    .unwrap_err();
    assert!(matches!(err, PosterError::Validation(_)));
}
