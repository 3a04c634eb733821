//! Composed canvas overlays.
//!
//! Overlays are display-only layers composited above the shape layer.
//! They are not shapes: they never hit-test, never export, never print and
//! never enter the undo history.

use gridwire_core::Rgba;
use kurbo::{Line, Point};

use crate::viewport::Viewport;

/// Line batch produced by an overlay for one frame, in logical
/// coordinates.
#[derive(Debug, Default)]
pub struct OverlayFrame {
    pub lines: Vec<Line>,
    pub color: Rgba,
    pub width: f64,
}

/// A display-only layer composited above the shapes.
pub trait Overlay {
    /// Lines to draw for the region the viewport currently shows.
    fn frame(&self, viewport: &Viewport) -> OverlayFrame;

    /// Overlays never take part in hit testing.
    fn interactive(&self) -> bool {
        false
    }
}

/// The alignment grid, rendered as full lines every cell.
#[derive(Debug)]
pub struct GridOverlay {
    pub cell: f64,
    pub color: Rgba,
}

impl GridOverlay {
    pub fn new(cell: f64) -> Self {
        Self {
            cell,
            color: Rgba::new(200, 200, 200, 100),
        }
    }

    /// Visible region in logical coordinates, expanded outward to whole
    /// cell multiples.
    fn grid_bounds(&self, viewport: &Viewport) -> (f64, f64, f64, f64) {
        let tl = viewport.to_logical(Point::ZERO);
        let br = viewport.to_logical(Point::new(viewport.size.width, viewport.size.height));

        let start_x = (tl.x / self.cell).floor() * self.cell;
        let start_y = (tl.y / self.cell).floor() * self.cell;
        let end_x = (br.x / self.cell).ceil() * self.cell;
        let end_y = (br.y / self.cell).ceil() * self.cell;

        (start_x, start_y, end_x, end_y)
    }
}

impl Overlay for GridOverlay {
    fn frame(&self, viewport: &Viewport) -> OverlayFrame {
        let mut frame = OverlayFrame {
            color: self.color,
            width: 0.5,
            ..Default::default()
        };
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport);

        // Vertical lines
        let mut x = start_x;
        while x <= end_x {
            frame
                .lines
                .push(Line::new(Point::new(x, start_y), Point::new(x, end_y)));
            x += self.cell;
        }

        // Horizontal lines
        let mut y = start_y;
        while y <= end_y {
            frame
                .lines
                .push(Line::new(Point::new(start_x, y), Point::new(end_x, y)));
            y += self.cell;
        }

        frame
    }
}
