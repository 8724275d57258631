use kurbo::{BezPath, Point, Rect, RoundedRect, Shape, Size};

/// Inner/outer radius ratio of the star glyph (9/20, the tuned art).
pub const STAR_INNER_RATIO: f64 = 0.45;

/// Closed 5-point star polygon centered at `center`, first point up.
pub fn star_path(center: Point, outer_radius: f64, inner_radius: f64) -> BezPath {
    let n = 5usize;
    let step = std::f64::consts::PI / (n as f64);
    let mut angle = std::f64::consts::FRAC_PI_2;

    let mut path = BezPath::new();
    for i in 0..(2 * n) {
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        // Raster space is y-down, so the y term is subtracted.
        let p = Point::new(center.x + r * angle.cos(), center.y - r * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
        angle += step;
    }
    path.close_path();
    path
}

/// Star polygon sized to fill a square glyph cell.
pub fn star_in_rect(cell: Rect) -> BezPath {
    let outer = cell.width().min(cell.height()) / 2.0;
    star_path(cell.center(), outer, outer * STAR_INNER_RATIO)
}

/// Rounded rectangle outline as a flattened `BezPath`.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let rr = RoundedRect::from_rect(rect, radius);
    let mut path = BezPath::new();
    for el in rr.path_elements(0.1) {
        path.push(el);
    }
    path
}

/// Aspect-preserving size that fits inside `bounds`, touching at least one
/// bound edge. Both extents stay in `[1, bound]`.
pub fn size_to_fit(source_width: u32, source_height: u32, bounds: Size) -> Size {
    let w = f64::from(source_width.max(1));
    let h = f64::from(source_height.max(1));
    let max_w = bounds.width.max(1.0);
    let max_h = bounds.height.max(1.0);
    let scale = (max_w / w).min(max_h / h);
    Size::new(
        (w * scale).round().clamp(1.0, max_w),
        (h * scale).round().clamp(1.0, max_h),
    )
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
