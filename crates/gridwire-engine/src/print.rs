//! Offscreen printing.
//!
//! Renders a logical region of the scene into an RGBA buffer on a plain
//! white background. Only shapes are drawn: overlays, the selection and
//! the cursor are screen furniture and never reach a print.

use std::fs;
use std::path::Path;

use kurbo::{Point, Rect};
use thiserror::Error;

use gridwire_core::shapes::point_to_segment_dist;
use gridwire_core::{Rgba, Shape};

use crate::scene::SceneGraph;

/// Margin added around the scene bounds by [`PrintRegion::around`].
const DEFAULT_PRINT_MARGIN: f64 = 20.0;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("print I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Logical region to print and the device scale to print it at.
#[derive(Debug, Clone, Copy)]
pub struct PrintRegion {
    pub rect: Rect,
    pub scale: f64,
}

impl PrintRegion {
    pub fn new(rect: Rect, scale: f64) -> Self {
        Self { rect, scale }
    }

    /// Region covering every shape in the scene plus a margin, at scale
    /// 1.0. An empty scene yields one grid-cell worth of white page.
    pub fn around(scene: &SceneGraph) -> Self {
        let bounds = scene
            .shapes_in_order()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b));
        let rect = match bounds {
            Some(b) => b.inflate(DEFAULT_PRINT_MARGIN, DEFAULT_PRINT_MARGIN),
            None => Rect::new(0.0, 0.0, 30.0, 30.0),
        };
        Self::new(rect, 1.0)
    }
}

/// RGBA8 pixel buffer produced by a print.
#[derive(Debug, Clone)]
pub struct PrintImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PrintImage {
    fn blank(width: u32, height: u32) -> Self {
        let white = Rgba::white();
        let pixels = [white.r, white.g, white.b, white.a]
            .repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the page. Reads clip the same
    /// way `set_pixel` writes do.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
        self.pixels[i + 3] = color.a;
    }
}

/// Rasterize `region` of the scene onto a white page.
pub fn render_region(scene: &SceneGraph, region: &PrintRegion) -> PrintImage {
    let width = (region.rect.width() * region.scale).ceil().max(1.0) as u32;
    let height = (region.rect.height() * region.scale).ceil().max(1.0) as u32;
    let mut image = PrintImage::blank(width, height);

    let origin = region.rect.origin();
    let to_page = |p: Point| {
        Point::new(
            (p.x - origin.x) * region.scale,
            (p.y - origin.y) * region.scale,
        )
    };

    for shape in scene.shapes_in_order() {
        let style = shape.style();
        match shape {
            Shape::Dot(dot) => {
                let color = style.fill.unwrap_or(style.stroke);
                fill_disc(
                    &mut image,
                    to_page(dot.center),
                    dot.radius * region.scale,
                    color,
                );
            }
            Shape::Wire(wire) => {
                stroke_polyline(
                    &mut image,
                    &wire.points,
                    &to_page,
                    style.stroke_width * region.scale,
                    style.stroke,
                );
            }
            Shape::Freehand(stroke) => {
                stroke_polyline(
                    &mut image,
                    &stroke.points,
                    &to_page,
                    style.stroke_width * region.scale,
                    style.stroke,
                );
            }
        }
    }
    image
}

fn fill_disc(image: &mut PrintImage, center: Point, radius: f64, color: Rgba) {
    let r = radius.max(0.5);
    let x0 = (center.x - r).floor() as i64;
    let x1 = (center.x + r).ceil() as i64;
    let y0 = (center.y - r).floor() as i64;
    let y1 = (center.y + r).ceil() as i64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= r * r {
                image.set_pixel(x, y, color);
            }
        }
    }
}

fn stroke_polyline(
    image: &mut PrintImage,
    points: &[Point],
    to_page: &impl Fn(Point) -> Point,
    width: f64,
    color: Rgba,
) {
    let half = (width / 2.0).max(0.5);
    for pair in points.windows(2) {
        let a = to_page(pair[0]);
        let b = to_page(pair[1]);
        let bbox = Rect::from_points(a, b).inflate(half + 1.0, half + 1.0);
        let x0 = bbox.x0.floor() as i64;
        let x1 = bbox.x1.ceil() as i64;
        let y0 = bbox.y0.floor() as i64;
        let y1 = bbox.y1.ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if point_to_segment_dist(p, a, b) <= half {
                    image.set_pixel(x, y, color);
                }
            }
        }
    }
}

/// Encode a print image as a PNG byte stream.
pub fn encode_png(image: &PrintImage) -> Result<Vec<u8>, PrintError> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
    }
    Ok(data)
}

/// Encode a print image and write it to `path`.
pub fn save_png(image: &PrintImage, path: &Path) -> Result<(), PrintError> {
    fs::write(path, encode_png(image)?)?;
    Ok(())
}
