//! Unsharp-mask sharpening followed by a linear gain.

use image::{Luma, Rgb, Rgb32FImage, RgbImage};
use imageproc::definitions::Image;

/// Gaussian-blur each RGB channel independently, keeping `f32` precision.
///
/// `imageproc::filter::gaussian_blur_f32` works on single-channel images, so
/// the image is split into `f32` planes, blurred per plane and reassembled.
/// Blurring in `f32` keeps a flat region at exactly its value; an 8-bit
/// result would be truncated. Non-positive sigma returns the image unchanged
/// (imageproc panics on `sigma <= 0.0`).
#[must_use = "returns the blurred image"]
pub fn gaussian_blur_rgb(image: &RgbImage, sigma: f32) -> Rgb32FImage {
    let (w, h) = image.dimensions();
    let planes: [Image<Luma<f32>>; 3] =
        std::array::from_fn(|c| Image::from_fn(w, h, |x, y| Luma([f32::from(image.get_pixel(x, y).0[c])])));

    let blurred = if sigma <= 0.0 || w == 0 || h == 0 {
        planes
    } else {
        planes.map(|plane| imageproc::filter::gaussian_blur_f32(&plane, sigma))
    };

    Rgb32FImage::from_fn(w, h, |x, y| {
        Rgb([
            blurred[0].get_pixel(x, y).0[0],
            blurred[1].get_pixel(x, y).0[0],
            blurred[2].get_pixel(x, y).0[0],
        ])
    })
}

/// Weighted blend `original * original_weight + blurred * blurred_weight`,
/// rounded and saturated to 8 bits.
///
/// With weights 1.5 and -0.5 this is a classic unsharp mask: the weights
/// sum to one, so flat regions keep their brightness while detail that the
/// blur removed is boosted. Rounding happens once, after the blend.
#[must_use]
pub fn unsharp_mask(
    original: &RgbImage,
    blurred: &Rgb32FImage,
    original_weight: f32,
    blurred_weight: f32,
) -> RgbImage {
    RgbImage::from_fn(original.width(), original.height(), |x, y| {
        let o = original.get_pixel(x, y).0;
        let b = blurred.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| saturate(f32::from(o[c]).mul_add(original_weight, b[c] * blurred_weight))))
    })
}

/// Per-channel `|value * gain + offset|`, rounded and saturated to 8 bits.
#[must_use]
pub fn apply_gain(image: &RgbImage, gain: f32, offset: f32) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| saturate(f32::from(px[c]).mul_add(gain, offset).abs())))
    })
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturate(value: f32) -> u8 {
    // Safe: clamped to [0, 255] before casting
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half black, right half white, boundary at x = 5.
    fn sharp_edge_image() -> RgbImage {
        RgbImage::from_fn(10, 6, |x, _| if x < 5 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) })
    }

    fn to_float(image: &RgbImage) -> Rgb32FImage {
        Rgb32FImage::from_fn(image.width(), image.height(), |x, y| {
            Rgb(image.get_pixel(x, y).0.map(f32::from))
        })
    }

    #[test]
    fn test_zero_sigma_returns_identical_image() {
        let img = sharp_edge_image();
        assert_eq!(gaussian_blur_rgb(&img, 0.0), to_float(&img));
        assert_eq!(gaussian_blur_rgb(&img, -2.0), to_float(&img));
    }

    #[test]
    fn test_blur_smooths_and_keeps_dimensions() {
        let img = sharp_edge_image();
        let blurred = gaussian_blur_rgb(&img, 3.0);

        assert_eq!(blurred.dimensions(), img.dimensions());
        assert!(blurred.get_pixel(4, 3).0[0] > 0.0);
        assert!(blurred.get_pixel(5, 3).0[0] < 255.0);
    }

    #[test]
    fn test_blur_uniform_image_is_stable() {
        let img = RgbImage::from_pixel(12, 9, Rgb([100, 150, 200]));
        let blurred = gaussian_blur_rgb(&img, 3.0);
        for px in blurred.pixels() {
            for (got, want) in px.0.iter().zip([100.0_f32, 150.0, 200.0]) {
                assert!((got - want).abs() < 1e-3, "got {px:?}");
            }
        }
    }

    #[test]
    fn test_unsharp_mask_overshoots_and_saturates() {
        let original = RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([40, 40, 40]) } else { Rgb([220, 220, 220]) });
        let blurred = Rgb32FImage::from_pixel(2, 1, Rgb([130.0; 3]));

        let sharpened = unsharp_mask(&original, &blurred, 1.5, -0.5);

        // 40 * 1.5 - 130 * 0.5 = -5 -> 0; 220 * 1.5 - 65 = 265 -> 255.
        assert_eq!(sharpened.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(sharpened.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_unsharp_mask_rounds_after_blending() {
        let original = RgbImage::from_pixel(1, 1, Rgb([80; 3]));
        let blurred = Rgb32FImage::from_pixel(1, 1, Rgb([79.4; 3]));

        // 120 - 39.7 = 80.3: one rounding step, not two.
        assert_eq!(unsharp_mask(&original, &blurred, 1.5, -0.5).get_pixel(0, 0).0, [80; 3]);
    }

    #[test]
    fn test_blur_then_unsharp_keeps_flat_images_exact() {
        for value in [0, 1, 10, 79, 80, 128, 200, 254, 255] {
            let flat = RgbImage::from_pixel(24, 24, Rgb([value; 3]));
            let blurred = gaussian_blur_rgb(&flat, 3.0);
            assert_eq!(unsharp_mask(&flat, &blurred, 1.5, -0.5), flat, "flat {value}");
        }

        let tinted = RgbImage::from_pixel(17, 9, Rgb([10, 128, 250]));
        let blurred = gaussian_blur_rgb(&tinted, 3.0);
        assert_eq!(unsharp_mask(&tinted, &blurred, 1.5, -0.5), tinted);
    }

    #[test]
    fn test_gain_scales_and_clips() {
        let img = RgbImage::from_fn(3, 1, |x, _| Rgb([[0, 100, 240][x as usize]; 3]));
        let scaled = apply_gain(&img, 1.2, 0.0);

        assert_eq!(scaled.get_pixel(0, 0).0, [0; 3]);
        assert_eq!(scaled.get_pixel(1, 0).0, [120; 3]);
        assert_eq!(scaled.get_pixel(2, 0).0, [255; 3]);
    }

    #[test]
    fn test_gain_takes_absolute_value() {
        let img = RgbImage::from_pixel(1, 1, Rgb([50, 50, 50]));
        assert_eq!(apply_gain(&img, 1.0, -80.0).get_pixel(0, 0).0, [30; 3]);
    }
}
