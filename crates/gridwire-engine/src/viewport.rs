//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Size, Vec2};

/// Viewport manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling), converting
/// between device coordinates and logical scene coordinates.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Device size of the rendered area
    pub size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            size: Size::new(800.0, 600.0),
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform converting logical coordinates to device coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Transform converting device coordinates to logical coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a device point to logical coordinates.
    pub fn to_logical(&self, device_point: Point) -> Point {
        self.inverse_transform() * device_point
    }

    /// Convert a logical point to device coordinates.
    pub fn to_device(&self, logical_point: Point) -> Point {
        self.transform() * logical_point
    }

    /// Pan the viewport by a delta in device coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the viewport, keeping the given device point fixed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let logical_point = self.to_logical(device_point);
        self.zoom = new_zoom;

        // Adjust offset so logical_point stays under device_point.
        let new_device = self.to_device(logical_point);
        self.offset += Vec2::new(
            device_point.x - new_device.x,
            device_point.y - new_device.y,
        );
    }

    /// Reset to the default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
