//! Bilinear resampling of single-channel float planes.
//!
//! This is the reference filter for both resizes in the colorization
//! pipeline (luminance down to the model canvas, chrominance back up to the
//! source resolution). Destination sample `d` maps to source coordinate
//! `(d + 0.5) * src / dst - 0.5`, clamped to the valid range, and blends its
//! two nearest neighbours on each axis. Values are never clamped, so planes
//! in L*a*b* units survive unchanged.

use ndarray::{Array2, ArrayView2};

/// Resize a `(height, width)` plane to `dst_w` x `dst_h`.
///
/// Aspect ratio is not preserved. A zero-sized source or destination yields
/// an empty plane of the requested shape.
#[must_use]
pub fn resize_bilinear(plane: ArrayView2<'_, f32>, dst_w: usize, dst_h: usize) -> Array2<f32> {
    let (src_h, src_w) = plane.dim();
    if src_h == 0 || src_w == 0 || dst_h == 0 || dst_w == 0 {
        return Array2::zeros((dst_h, dst_w));
    }
    if (src_h, src_w) == (dst_h, dst_w) {
        return plane.to_owned();
    }

    let xs = taps(src_w, dst_w);
    let ys = taps(src_h, dst_h);

    Array2::from_shape_fn((dst_h, dst_w), |(y, x)| {
        let (y0, y1, fy) = ys[y];
        let (x0, x1, fx) = xs[x];
        let top = plane[[y0, x0]].mul_add(1.0 - fx, plane[[y0, x1]] * fx);
        let bottom = plane[[y1, x0]].mul_add(1.0 - fx, plane[[y1, x1]] * fx);
        top.mul_add(1.0 - fy, bottom * fy)
    })
}

/// Precompute `(lower index, upper index, upper weight)` for each output sample.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn taps(src: usize, dst: usize) -> Vec<(usize, usize, f32)> {
    let scale = src as f32 / dst as f32;
    let last = (src - 1) as f32;

    (0..dst)
        .map(|d| {
            // Safe: clamped to [0, src - 1] before the cast
            let s = ((d as f32 + 0.5).mul_add(scale, -0.5)).clamp(0.0, last);
            let lo = s.floor() as usize;
            let hi = (lo + 1).min(src - 1);
            (lo, hi, s - lo as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_plane_stays_constant() {
        let plane = Array2::from_elem((7, 5), 42.5_f32);
        let up = resize_bilinear(plane.view(), 224, 224);
        let down = resize_bilinear(up.view(), 3, 11);

        assert_eq!(up.dim(), (224, 224));
        assert_eq!(down.dim(), (11, 3));
        assert!(up.iter().chain(down.iter()).all(|&v| (v - 42.5).abs() < 1e-4));
    }

    #[test]
    fn test_same_size_is_identity() {
        let plane = Array2::from_shape_fn((4, 6), |(y, x)| (y * 6 + x) as f32);
        assert_eq!(resize_bilinear(plane.view(), 6, 4), plane);
    }

    #[test]
    fn test_upsample_interpolates_between_centres() {
        // Two columns, -10 and 10. Doubling the width puts the outer samples
        // on the clamped edges and the inner ones a quarter of the way in.
        let plane = Array2::from_shape_vec((1, 2), vec![-10.0_f32, 10.0]).unwrap();
        let up = resize_bilinear(plane.view(), 4, 1);

        let expected = [-10.0, -5.0, 5.0, 10.0];
        for (got, want) in up.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_values_outside_unit_range_are_kept() {
        let plane = Array2::from_shape_fn((2, 2), |(y, _)| if y == 0 { 100.0 } else { -80.0 });
        let up = resize_bilinear(plane.view(), 2, 8);
        assert!((up[[0, 0]] - 100.0).abs() < 1e-5);
        assert!((up[[7, 1]] + 80.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_source_yields_zeros() {
        let plane = Array2::<f32>::zeros((0, 3));
        assert_eq!(resize_bilinear(plane.view(), 2, 2), Array2::zeros((2, 2)));
    }
}
