//! Software rendering of the scatter data into the cached plot image.
use image::{Rgba, RgbaImage};

use crate::{scatter_data::ScatterData, transform::CoordinateTransformer};

/// Dot diameter, in ems.
pub const DOT_SIZE_EM: f64 = 0.4;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render every cluster as filled dots on a white background.
///
/// Classes are drawn in order, so later classes paint over earlier ones.
pub fn render_scatter(
    data: &ScatterData,
    transformer: &CoordinateTransformer,
    dot_size_px: f64,
) -> RgbaImage {
    let (width, height) = transformer.image_dimensions();
    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);
    let radius = dot_size_px / 2.0;

    for cluster in &data.classes {
        let color = Rgba::from(cluster.color);
        for [x, y] in transformer.to_pixels(&cluster.points) {
            fill_disk(&mut image, x, y, radius, color);
        }
    }
    image
}

/// Fill every pixel whose center lies within `radius` of `(cx, cy)`.
///
/// Pixels outside the image are clipped.
pub fn fill_disk(image: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    if !(cx.is_finite() && cy.is_finite() && radius > 0.0) {
        return;
    }
    let (width, height) = image.dimensions();
    let x0 = (cx - radius).floor().max(0.0);
    let y0 = (cy - radius).floor().max(0.0);
    let x1 = (cx + radius).ceil().min(width as f64);
    let y1 = (cy + radius).ceil().min(height as f64);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let r2 = radius * radius;
    for py in y0 as u32..y1 as u32 {
        let dy = py as f64 + 0.5 - cy;
        for px in x0 as u32..x1 as u32 {
            let dx = px as f64 + 0.5 - cx;
            if dx * dx + dy * dy <= r2 {
                image.put_pixel(px, py, color);
            }
        }
    }
}
