use kurbo::{Point, Rect, Size};

use crate::foundation::color::Rgba8;

/// Fixed output canvas width in device pixels (phone-screen target).
pub const CANVAS_WIDTH: u32 = 1179;
/// Fixed output canvas height in device pixels.
pub const CANVAS_HEIGHT: u32 = 2556;

/// Number of star glyphs in the rating row, for both layouts.
pub const STAR_COUNT: usize = 10;

/// Hand-tuned constant table for the traditional layout.
///
/// Every geometric offset of the algorithm lives here; call sites derive
/// positions through the accessor methods and never do ad hoc arithmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraditionalLayout {
    /// White framed panel.
    pub panel: Rect,
    /// Stroke width of the panel's black border.
    pub panel_border_width: f64,
    /// Sub-rectangle the artwork is stretch-fit into.
    pub poster: Rect,
    /// Title baseline-box origin.
    pub title_anchor: Point,
    /// Title font size.
    pub title_size: f32,
    /// Year anchor (narrow column right of the title).
    pub year_anchor: Point,
    /// Year font size.
    pub year_size: f32,
    /// Vertical advance between the two stacked year lines.
    pub year_line_height: f64,
    /// Left edge of the first star cell.
    pub stars_start_x: f64,
    /// Top edge of the star row.
    pub stars_y: f64,
    /// Star cell width/height.
    pub star_size: f64,
    /// Horizontal gap between star cells.
    pub star_spacing: f64,
    /// Fill color of earned stars.
    pub star_fill: Rgba8,
    /// Outline color of empty stars.
    pub star_outline: Rgba8,
    /// Stroke width of empty star outlines.
    pub star_outline_width: f64,
}

impl TraditionalLayout {
    /// The canonical traditional constant set.
    pub const DEFAULT: Self = Self {
        panel: Rect::new(190.0, 700.0, 990.0, 2100.0),
        panel_border_width: 15.0,
        poster: Rect::new(250.0, 960.0, 932.0, 1983.0),
        title_anchor: Point::new(247.0, 749.0),
        title_size: 64.0,
        year_anchor: Point::new(893.0, 749.0),
        year_size: 28.0,
        year_line_height: 34.0,
        stars_start_x: 300.0,
        stars_y: 2000.0,
        star_size: 35.0,
        star_spacing: 10.0,
        star_fill: Rgba8::BLACK,
        star_outline: Rgba8::BLACK,
        star_outline_width: 2.0,
    };

    /// Cell of the `i`-th star in the horizontal row.
    pub fn star_rect(&self, i: usize) -> Rect {
        let x = self.stars_start_x + (i as f64) * (self.star_size + self.star_spacing);
        Rect::new(x, self.stars_y, x + self.star_size, self.stars_y + self.star_size)
    }
}

impl Default for TraditionalLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Hand-tuned constant table for the modern layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModernLayout {
    /// Semi-transparent rounded info box.
    pub info_box: Rect,
    /// Corner radius of the info box.
    pub box_corner_radius: f64,
    /// Alpha of the white info box fill (0.8 of full).
    pub box_alpha: u8,
    /// Margin between the artwork and the box's top/right edges.
    pub artwork_margin: f64,
    /// Height subtracted from the box height to get the artwork target
    /// height.
    pub artwork_height_inset: f64,
    /// Corner radius of the rounded artwork clip.
    pub artwork_corner_radius: f64,
    /// Year anchor offset from the box origin.
    pub year_offset: Size,
    /// Year font size.
    pub year_size: f32,
    /// Left inset of the title rect inside the box.
    pub title_left_inset: f64,
    /// Vertical gap between the year anchor and the title rect.
    pub title_top_offset: f64,
    /// Horizontal gutter reserved between title rect and artwork.
    pub title_gutter: f64,
    /// Fixed height of the title rect (text may overflow it vertically).
    pub title_box_height: f64,
    /// Title font size (word-wrap policy, no autosizing).
    pub title_size: f32,
    /// Star cell width/height.
    pub star_size: f64,
    /// Horizontal gap between star cells.
    pub star_spacing: f64,
    /// Distance from the box bottom edge up to the star row.
    pub star_bottom_inset: f64,
    /// Fill color of earned stars.
    pub star_fill: Rgba8,
    /// Outline color of empty stars.
    pub star_outline: Rgba8,
    /// Stroke width of empty star outlines.
    pub star_outline_width: f64,
    /// Origin of the rotated title strip (alternative title policy).
    pub strip_origin: Point,
    /// Size of the rotated title strip, pre-rotation (w across, h along).
    pub strip_size: Size,
}

impl ModernLayout {
    /// The canonical modern constant set.
    pub const DEFAULT: Self = Self {
        info_box: Rect::new(86.0, 736.0, 1093.0, 1743.0),
        box_corner_radius: 32.0,
        box_alpha: 204,
        artwork_margin: 30.0,
        artwork_height_inset: 60.0,
        artwork_corner_radius: 20.0,
        year_offset: Size::new(30.0, 40.0),
        year_size: 36.0,
        title_left_inset: 30.0,
        title_top_offset: 60.0,
        title_gutter: 100.0,
        title_box_height: 300.0,
        title_size: 44.0,
        star_size: 40.0,
        star_spacing: 8.0,
        star_bottom_inset: 60.0,
        star_fill: Rgba8::rgb(255, 215, 0),
        star_outline: Rgba8::rgb(128, 128, 128),
        star_outline_width: 1.0,
        strip_origin: Point::new(120.0, 850.0),
        strip_size: Size::new(270.0, 850.0),
    };

    /// Target height for aspect-fit artwork placement.
    pub fn artwork_target_height(&self) -> f64 {
        self.info_box.height() - self.artwork_height_inset
    }

    /// Placement rect for artwork of the given (already aspect-fit) size:
    /// right-aligned inside the info box with fixed margins.
    pub fn artwork_rect(&self, size: Size) -> Rect {
        let x1 = self.info_box.x1 - self.artwork_margin;
        let y0 = self.info_box.y0 + self.artwork_margin;
        Rect::new(x1 - size.width, y0, x1, y0 + size.height)
    }

    /// Year anchor at the box top-left.
    pub fn year_anchor(&self) -> Point {
        Point::new(
            self.info_box.x0 + self.year_offset.width,
            self.info_box.y0 + self.year_offset.height,
        )
    }

    /// Title rect left of artwork of the given placed width. Text wrapped
    /// into this rect may overflow it vertically.
    pub fn title_rect(&self, artwork_width: f64) -> Rect {
        let x0 = self.info_box.x0 + self.title_left_inset;
        let y0 = self.year_anchor().y + self.title_top_offset;
        let width = (self.info_box.width() - artwork_width - self.title_gutter).max(1.0);
        Rect::new(x0, y0, x0 + width, y0 + self.title_box_height)
    }

    /// Cell of the `i`-th star, with the row centered on the box mid-x along
    /// its bottom edge.
    pub fn star_rect(&self, i: usize) -> Rect {
        let total = (STAR_COUNT as f64) * self.star_size
            + ((STAR_COUNT - 1) as f64) * self.star_spacing;
        let start_x = self.info_box.center().x - total / 2.0;
        let y = self.info_box.y1 - self.star_bottom_inset;
        let x = start_x + (i as f64) * (self.star_size + self.star_spacing);
        Rect::new(x, y, x + self.star_size, y + self.star_size)
    }
}

impl Default for ModernLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[path = "../tests/unit/layout.rs"]
mod tests;
