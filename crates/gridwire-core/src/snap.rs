//! Grid snapping.
//!
//! Pure positional quantization: no scene access, no state. Snapping is
//! applied by draw handlers when the editor's snap flag is on; freehand
//! strokes bypass it entirely.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid cell size in logical units.
pub const DEFAULT_GRID_CELL: f64 = 30.0;

/// Round a coordinate to the nearest multiple of `cell`.
pub fn snap_axis(value: f64, cell: f64) -> f64 {
    (value / cell).round() * cell
}

/// Round a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, cell: f64) -> Point {
    Point::new(snap_axis(point.x, cell), snap_axis(point.y, cell))
}

/// Snaps points to a fixed grid.
///
/// The cell size must be positive; [`GridSnapper::new`] falls back to the
/// default for non-positive input rather than dividing by zero later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSnapper {
    cell: f64,
}

impl GridSnapper {
    pub fn new(cell: f64) -> Self {
        if cell > 0.0 {
            Self { cell }
        } else {
            log::warn!("ignoring non-positive grid cell {cell}, using default");
            Self {
                cell: DEFAULT_GRID_CELL,
            }
        }
    }

    pub fn cell(&self) -> f64 {
        self.cell
    }

    /// Snap `point` to the nearest grid intersection. Idempotent: snapping
    /// an already-snapped point returns it unchanged.
    pub fn snap(&self, point: Point) -> Point {
        snap_to_grid(point, self.cell)
    }
}

impl Default for GridSnapper {
    fn default() -> Self {
        Self {
            cell: DEFAULT_GRID_CELL,
        }
    }
}
