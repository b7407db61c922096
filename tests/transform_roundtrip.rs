use approx::assert_relative_eq;
use iced_scatter_brush::{Bounding, CoordinateTransformer};
use proptest::prelude::*;

#[test]
fn y_axis_points_up_on_screen() {
    let t = CoordinateTransformer::new(Bounding::default(), [20.0, 20.0], 16.0).unwrap();
    let low = t.to_pixel([0.5, 0.1]);
    let high = t.to_pixel([0.5, 0.9]);
    assert!(high[1] < low[1]);
    assert_relative_eq!(t.to_bounds([0.0, 0.0])[1], 1.0);
}

proptest! {
    #[test]
    fn bounds_pixel_bounds_is_identity(
        x0 in -500.0f64..500.0,
        y0 in -500.0f64..500.0,
        w in 1e-3f64..500.0,
        h in 1e-3f64..500.0,
        size_w in 1.0f64..60.0,
        size_h in 1.0f64..60.0,
        points in proptest::collection::vec((0.0f64..=1.0, 0.0f64..=1.0), 1..20),
    ) {
        let bounding = Bounding::new([x0, y0], [x0 + w, y0 + h]);
        let t = CoordinateTransformer::new(bounding, [size_w, size_h], 16.0).unwrap();
        let logical: Vec<[f64; 2]> = points.iter().map(|(fx, fy)| [x0 + fx * w, y0 + fy * h]).collect();
        for (p, px) in logical.iter().zip(t.to_pixels(&logical)) {
            let [sx, sy] = t.image_size_px();
            prop_assert!(px[0] >= -1e-6 && px[0] <= sx + 1e-6);
            prop_assert!(px[1] >= -1e-6 && px[1] <= sy + 1e-6);
            let back = t.to_bounds(px);
            prop_assert!((back[0] - p[0]).abs() <= 1e-9 * (1.0 + p[0].abs() + w));
            prop_assert!((back[1] - p[1]).abs() <= 1e-9 * (1.0 + p[1].abs() + h));
        }
    }
}
