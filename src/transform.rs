use glam::{DAffine2, DMat2, DVec2};

use crate::{
    error::ScatterError,
    scatter_data::{Bounding, Point2d},
};

/// Largest plot image side, in pixels, that will be rasterized.
pub const MAX_IMAGE_SIDE_PX: f64 = 16384.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// A 2×3 affine transform restricted to per-axis scale and translation.
pub struct AffineTransform(DAffine2);

impl AffineTransform {
    /// Build the transform mapping `src` onto `dst`, corner to corner.
    ///
    /// Corners may be given in any orientation: mapping `((0, h), (w, 0))`
    /// as a destination flips the y axis.
    pub fn between(
        src_min: DVec2,
        src_max: DVec2,
        dst_min: DVec2,
        dst_max: DVec2,
    ) -> Option<Self> {
        let src_span = src_max - src_min;
        if !src_span.is_finite() || src_span.x == 0.0 || src_span.y == 0.0 {
            return None;
        }
        let scale = (dst_max - dst_min) / src_span;
        let translation = dst_min - src_min * scale;
        if !scale.is_finite() || !translation.is_finite() {
            return None;
        }
        Some(Self(DAffine2::from_mat2_translation(
            DMat2::from_diagonal(scale),
            translation,
        )))
    }

    pub fn apply(&self, point: DVec2) -> DVec2 {
        self.0.transform_point2(point)
    }

    /// The matrix in row-major form `[[sx, 0, tx], [0, sy, ty]]`.
    pub fn rows(&self) -> [[f64; 3]; 2] {
        let m = self.0.matrix2;
        let t = self.0.translation;
        [[m.x_axis.x, m.y_axis.x, t.x], [m.x_axis.y, m.y_axis.y, t.y]]
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Maps points between the scatter bounds and the pixel space of the plot image.
///
/// The image spans `[0, width] x [0, height]` pixels with the origin at the
/// top-left corner, so the logical y axis points up on screen.
pub struct CoordinateTransformer {
    scatter_bounding: Bounding,
    image_size_em: [f64; 2],
    em_size: f64,
    image_size_px: DVec2,
    bounds_to_pixel: AffineTransform,
    pixel_to_bounds: AffineTransform,
}

impl CoordinateTransformer {
    pub fn new(
        scatter_bounding: Bounding,
        image_size_em: [f64; 2],
        em_size: f64,
    ) -> Result<Self, ScatterError> {
        if !scatter_bounding.is_valid() {
            return Err(ScatterError::DegenerateBounds(scatter_bounding));
        }
        let image_size_px = DVec2::from(image_size_em) * em_size;
        if !image_size_px.is_finite()
            || image_size_px.min_element() <= 0.0
            || image_size_px.max_element() > MAX_IMAGE_SIDE_PX
        {
            return Err(ScatterError::InvalidImageSize {
                width: image_size_px.x,
                height: image_size_px.y,
            });
        }

        let src_min = DVec2::from(scatter_bounding.min);
        let src_max = DVec2::from(scatter_bounding.max);
        let dst_min = DVec2::new(0.0, image_size_px.y);
        let dst_max = DVec2::new(image_size_px.x, 0.0);

        let degenerate = || ScatterError::DegenerateBounds(scatter_bounding);
        let bounds_to_pixel =
            AffineTransform::between(src_min, src_max, dst_min, dst_max).ok_or_else(degenerate)?;
        let pixel_to_bounds =
            AffineTransform::between(dst_min, dst_max, src_min, src_max).ok_or_else(degenerate)?;

        Ok(Self {
            scatter_bounding,
            image_size_em,
            em_size,
            image_size_px,
            bounds_to_pixel,
            pixel_to_bounds,
        })
    }

    pub fn scatter_bounding(&self) -> Bounding {
        self.scatter_bounding
    }

    pub fn image_size_em(&self) -> [f64; 2] {
        self.image_size_em
    }

    pub fn em_size(&self) -> f64 {
        self.em_size
    }

    /// Image size in (fractional) pixels.
    pub fn image_size_px(&self) -> [f64; 2] {
        self.image_size_px.to_array()
    }

    /// Pixel dimensions of the raster buffer (truncated, at least 1x1).
    pub fn image_dimensions(&self) -> (u32, u32) {
        (
            (self.image_size_px.x as u32).max(1),
            (self.image_size_px.y as u32).max(1),
        )
    }

    pub fn bounds_to_pixel(&self) -> &AffineTransform {
        &self.bounds_to_pixel
    }

    pub fn pixel_to_bounds(&self) -> &AffineTransform {
        &self.pixel_to_bounds
    }

    /// Whether this transformer was built from the same inputs.
    pub(crate) fn matches(&self, bounding: Bounding, image_size_em: [f64; 2], em_size: f64) -> bool {
        self.scatter_bounding == bounding
            && self.image_size_em == image_size_em
            && self.em_size == em_size
    }

    pub fn to_pixel(&self, point: Point2d) -> Point2d {
        self.bounds_to_pixel.apply(DVec2::from(point)).to_array()
    }

    pub fn to_pixels(&self, points: &[Point2d]) -> Vec<Point2d> {
        points.iter().map(|&p| self.to_pixel(p)).collect()
    }

    pub fn to_bounds(&self, point_pixel: Point2d) -> Point2d {
        self.pixel_to_bounds.apply(DVec2::from(point_pixel)).to_array()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn transformer() -> CoordinateTransformer {
        CoordinateTransformer::new(Bounding::new([-1.0, 0.0], [3.0, 2.0]), [20.0, 10.0], 16.0)
            .unwrap()
    }

    #[test]
    fn corners_map_to_image_corners() {
        let t = transformer();
        assert_eq!(t.image_size_px(), [320.0, 160.0]);
        let [x, y] = t.to_pixel([-1.0, 0.0]);
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 160.0);
        let [x, y] = t.to_pixel([3.0, 2.0]);
        assert_relative_eq!(x, 320.0);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn matrix_rows_hold_scale_and_translation() {
        let t = transformer();
        let rows = t.bounds_to_pixel().rows();
        assert_relative_eq!(rows[0][0], 80.0);
        assert_relative_eq!(rows[0][1], 0.0);
        assert_relative_eq!(rows[0][2], 80.0);
        assert_relative_eq!(rows[1][1], -80.0);
        assert_relative_eq!(rows[1][2], 160.0);
    }

    #[test]
    fn to_pixels_of_nothing_is_empty() {
        assert!(transformer().to_pixels(&[]).is_empty());
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let err = CoordinateTransformer::new(Bounding::new([0.0, 0.0], [0.0, 1.0]), [20.0, 20.0], 16.0);
        assert!(matches!(err, Err(ScatterError::DegenerateBounds(_))));
    }

    #[test]
    fn rejects_empty_image() {
        let err = CoordinateTransformer::new(Bounding::default(), [20.0, 0.0], 16.0);
        assert!(matches!(err, Err(ScatterError::InvalidImageSize { .. })));
        let err = CoordinateTransformer::new(Bounding::default(), [20.0, 20.0], f64::NAN);
        assert!(matches!(err, Err(ScatterError::InvalidImageSize { .. })));
    }

    #[test]
    fn rejects_oversized_image() {
        let err = CoordinateTransformer::new(Bounding::default(), [1e9, 1e9], 16.0);
        assert!(matches!(err, Err(ScatterError::InvalidImageSize { .. })));
        let err = CoordinateTransformer::new(Bounding::default(), [20.0, 20.0], 1e12);
        assert!(matches!(err, Err(ScatterError::InvalidImageSize { .. })));
        let t = CoordinateTransformer::new(Bounding::default(), [1024.0, 1.0], 16.0).unwrap();
        assert_eq!(t.image_dimensions(), (16384, 16));
    }

    #[test]
    fn dimensions_truncate_fractional_pixels() {
        let t = CoordinateTransformer::new(Bounding::default(), [20.5, 10.0], 12.5).unwrap();
        assert_eq!(t.image_dimensions(), (256, 125));
    }

    proptest! {
        #[test]
        fn pixel_round_trip_returns_the_point(
            min_x in -1000.0f64..1000.0,
            min_y in -1000.0f64..1000.0,
            w in 0.01f64..1000.0,
            h in 0.01f64..1000.0,
            fx in 0.0f64..=1.0,
            fy in 0.0f64..=1.0,
            em in 4.0f64..40.0,
        ) {
            let bounding = Bounding::new([min_x, min_y], [min_x + w, min_y + h]);
            let t = CoordinateTransformer::new(bounding, [20.0, 15.0], em).unwrap();
            let p = [min_x + fx * w, min_y + fy * h];
            let back = t.to_bounds(t.to_pixel(p));
            prop_assert!((back[0] - p[0]).abs() <= 1e-9 * (1.0 + p[0].abs() + w));
            prop_assert!((back[1] - p[1]).abs() <= 1e-9 * (1.0 + p[1].abs() + h));
        }
    }
}
