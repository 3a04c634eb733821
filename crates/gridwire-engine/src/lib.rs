//! GridWire Engine Library
//!
//! Reference engine for the GridWire interaction core: an in-memory scene
//! graph with viewport and composed overlays, plus an offscreen print
//! pipeline.

pub mod overlay;
pub mod print;
pub mod scene;
pub mod viewport;

pub use overlay::{GridOverlay, Overlay, OverlayFrame};
pub use print::{encode_png, render_region, save_png, PrintError, PrintImage, PrintRegion};
pub use scene::{pump, SceneGraph};
pub use viewport::Viewport;
