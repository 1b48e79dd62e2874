//! Background grid, drawn in screen space so it stays crisp at any zoom.

use kurbo::{Affine, Line, Point, Rect};
use siteboard_core::Camera;

/// Below this on-screen spacing the grid turns into noise and is skipped.
pub const MIN_SCREEN_SPACING: f64 = 4.0;

/// Screen-space dot radius for a zoom level.
pub fn dot_radius(zoom: f64) -> f64 {
    (4.0 * zoom).max(1.0)
}

/// One background dot, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDot {
    pub center: Point,
    pub radius: f64,
}

/// World-space extent of grid lines covering `viewport`, snapped outward to
/// multiples of `spacing`.
fn grid_bounds(viewport: Rect, transform: Affine, spacing: f64) -> (f64, f64, f64, f64) {
    let inv = transform.inverse();
    let world_tl = inv * Point::new(viewport.x0, viewport.y0);
    let world_br = inv * Point::new(viewport.x1, viewport.y1);

    let start_x = (world_tl.x / spacing).floor() * spacing;
    let start_y = (world_tl.y / spacing).floor() * spacing;
    let end_x = (world_br.x / spacing).ceil() * spacing;
    let end_y = (world_br.y / spacing).ceil() * spacing;

    (start_x, start_y, end_x, end_y)
}

fn too_dense(camera: &Camera, spacing: f64) -> bool {
    !(spacing.is_finite() && spacing > 0.0) || spacing * camera.zoom < MIN_SCREEN_SPACING
}

/// Dots at every world grid intersection visible in `viewport`.
///
/// Positions are computed per frame from the camera, so the pattern pans and
/// scales exactly with the content layer.
pub fn grid_dots(camera: &Camera, viewport: Rect, spacing: f64) -> Vec<GridDot> {
    if too_dense(camera, spacing) {
        return Vec::new();
    }
    let transform = camera.transform();
    let radius = dot_radius(camera.zoom);
    let (start_x, start_y, end_x, end_y) = grid_bounds(viewport, transform, spacing);

    let mut dots = Vec::new();
    let mut x = start_x;
    while x <= end_x {
        let mut y = start_y;
        while y <= end_y {
            dots.push(GridDot {
                center: transform * Point::new(x, y),
                radius,
            });
            y += spacing;
        }
        x += spacing;
    }
    dots
}

/// Full-height and full-width grid lines visible in `viewport`, in screen
/// coordinates.
pub fn grid_lines(camera: &Camera, viewport: Rect, spacing: f64) -> Vec<Line> {
    if too_dense(camera, spacing) {
        return Vec::new();
    }
    let transform = camera.transform();
    let (start_x, start_y, end_x, end_y) = grid_bounds(viewport, transform, spacing);

    let mut lines = Vec::new();
    let mut x = start_x;
    while x <= end_x {
        lines.push(transform * Line::new((x, start_y), (x, end_y)));
        x += spacing;
    }
    let mut y = start_y;
    while y <= end_y {
        lines.push(transform * Line::new((start_x, y), (end_x, y)));
        y += spacing;
    }
    lines
}
