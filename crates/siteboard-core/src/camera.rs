//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: f64 = 0.2;
/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 8.0;

/// Camera manages the view transform for the board.
///
/// `offset` is the world coordinate shown at the viewport's top-left corner,
/// so `screen = (world - offset) * zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World coordinate at the top-left of the viewport.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom bounds.
    pub fn with_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            ..Self::default()
        }
    }

    /// World-to-screen transform, also applied to the DOM/scene layer.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(-self.offset)
    }

    /// Screen-to-world transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(1.0 / self.zoom)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a screen-space delta. Dividing by zoom keeps the drag speed
    /// visually constant.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.offset -= screen_delta / self.zoom;
    }

    /// Zoom by `factor`, keeping the world point under `screen_point` fixed.
    ///
    /// The resulting zoom is clamped to the bounds. Non-positive or
    /// non-finite factors are ignored.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world_point = self.screen_to_world(screen_point);
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);

        self.zoom = new_zoom;
        self.offset = world_point.to_vec2() - screen_point.to_vec2() / new_zoom;
    }

    /// Zoom around the middle of the viewport (toolbar buttons).
    pub fn zoom_from_center(&mut self, viewport: Size, factor: f64) {
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.zoom_at(center, factor);
    }

    /// Reset camera to the origin at 100%.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// The world-space rectangle currently visible in a viewport.
    pub fn visible_world_rect(&self, viewport: Size) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.offset.x + viewport.width / self.zoom,
            self.offset.y + viewport.height / self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
        assert!((camera.min_zoom - 0.2).abs() < f64::EPSILON);
        assert!((camera.max_zoom - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_identity() {
        let camera = Camera::new();
        let screen = Point::new(100.0, 200.0);
        let world = camera.screen_to_world(screen);
        assert!(close(world, screen));
    }

    #[test]
    fn test_screen_to_world_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let world = camera.screen_to_world(Point::new(100.0, 200.0));
        assert!(close(world, Point::new(150.0, 300.0)));
    }

    #[test]
    fn test_world_to_screen_with_zoom() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(10.0, 20.0);
        camera.zoom = 2.0;
        let screen = camera.world_to_screen(Point::new(110.0, 220.0));
        assert!(close(screen, Point::new(200.0, 400.0)));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;

        for p in [Point::new(123.0, 456.0), Point::new(-1e4, 3.5), Point::ZERO] {
            let back = camera.world_to_screen(camera.screen_to_world(p));
            assert!(close(back, p));
            let back = camera.screen_to_world(camera.world_to_screen(p));
            assert!((back.x - p.x).abs() < 1e-7 && (back.y - p.y).abs() < 1e-7);
        }
    }

    #[test]
    fn test_zoom_keeps_cursor_anchored() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(-200.0, 75.0);

        let cursor = Point::new(317.0, 211.0);
        for factor in [1.1, 0.9, 3.0, 0.25, 1.1, 1.1, 0.5] {
            let world_before = camera.screen_to_world(cursor);
            camera.zoom_at(cursor, factor);
            assert!(close(camera.world_to_screen(world_before), cursor));
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 0.001);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);

        camera.zoom_at(Point::ZERO, 1000.0);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);

        for i in 0..200 {
            let factor = if i % 3 == 0 { 0.9 } else { 1.1 };
            camera.zoom_at(Point::new(400.0, 300.0), factor);
            assert!(camera.zoom >= camera.min_zoom && camera.zoom <= camera.max_zoom);
        }
    }

    #[test]
    fn test_zoom_ignores_bad_factor() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::new(10.0, 10.0), f64::NAN);
        camera.zoom_at(Point::new(10.0, 10.0), 0.0);
        camera.zoom_at(Point::new(10.0, 10.0), -2.0);
        assert_eq!(camera, Camera::new());
    }

    #[test]
    fn test_zoom_from_center() {
        let mut camera = Camera::new();
        let viewport = Size::new(800.0, 600.0);
        let center_world = camera.screen_to_world(Point::new(400.0, 300.0));
        camera.zoom_from_center(viewport, 1.1);
        assert!((camera.zoom - 1.1).abs() < 1e-12);
        assert!(close(camera.world_to_screen(center_world), Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_pan_divides_by_zoom() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        assert_eq!(camera.offset, Vec2::new(-10.0, -20.0));

        camera.zoom = 2.0;
        camera.pan(Vec2::new(10.0, 20.0));
        assert_eq!(camera.offset, Vec2::new(-15.0, -30.0));
    }

    #[test]
    fn test_reset_and_percent() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(5.0, 5.0));
        camera.zoom_at(Point::ZERO, 2.5);
        assert_eq!(camera.zoom_percent(), 250);

        camera.reset();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert_eq!(camera.zoom_percent(), 100);
    }

    #[test]
    fn test_visible_world_rect() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(100.0, 50.0);
        camera.zoom = 2.0;
        let rect = camera.visible_world_rect(Size::new(800.0, 600.0));
        assert_eq!(rect, Rect::new(100.0, 50.0, 500.0, 350.0));
    }
}
