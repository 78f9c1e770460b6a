//! Conversions between stored pixels and the L*a*b* working space.
//!
//! The model is trained on CIE L*a*b* under a D65 white point: L in [0, 100],
//! a and b roughly in [-110, 110]. Going there from 8-bit sRGB takes three
//! steps: bytes to [0, 1] floats, sRGB companding to linear light, and the
//! linear RGB -> XYZ -> Lab chain. The inverse chain runs on the way back and
//! is clipped to [0, 1] before anything else touches it.

use image::{Rgb, RgbImage};
use ndarray::Array3;
use palette::{FromColor, IntoColor, Lab, LinSrgb, Srgb};

use crate::image::{FloatImage, RGB_CHANNELS};

/// Planar L*a*b* image in `(channel, height, width)` layout; channel 0 is L.
pub type LabImage = Array3<f32>;

/// Map an 8-bit sample to [0, 1].
#[inline]
#[must_use]
pub fn byte_to_float(value: u8) -> f32 {
    f32::from(value) / 255.0
}

/// Map a float sample back to 8 bits, clipping to [0, 1] and rounding.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn float_to_byte(value: f32) -> u8 {
    // Safe: clamped to [0, 255] before casting
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert an 8-bit RGB image to a planar float image.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rgb_to_float(image: &RgbImage) -> FloatImage {
    let (width, height) = (image.width() as usize, image.height() as usize);

    // Safe: x and y are bounded by the source dimensions, which came from u32
    Array3::from_shape_fn((RGB_CHANNELS, height, width), |(c, y, x)| {
        byte_to_float(image.get_pixel(x as u32, y as u32)[c])
    })
}

/// Convert a planar float image back to 8-bit RGB.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn float_to_rgb(image: &FloatImage) -> RgbImage {
    let (_, height, width) = image.dim();

    // Safe: the dimensions of any image we build came from u32
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            float_to_byte(image[[0, y, x]]),
            float_to_byte(image[[1, y, x]]),
            float_to_byte(image[[2, y, x]]),
        ])
    })
}

/// Convert normalized sRGB to L*a*b* (D65).
///
/// Inputs outside [0, 1] are not meaningful.
#[must_use]
pub fn to_lab(image: &FloatImage) -> LabImage {
    let (_, height, width) = image.dim();
    let mut lab = Array3::zeros((3, height, width));

    for y in 0..height {
        for x in 0..width {
            let srgb = Srgb::new(image[[0, y, x]], image[[1, y, x]], image[[2, y, x]]);
            let linear: LinSrgb<f32> = srgb.into_linear();
            let px: Lab = Lab::from_color(linear);

            lab[[0, y, x]] = px.l;
            lab[[1, y, x]] = px.a;
            lab[[2, y, x]] = px.b;
        }
    }

    lab
}

/// Convert L*a*b* (D65) back to normalized sRGB, clipped to [0, 1].
#[must_use]
pub fn from_lab(lab: &LabImage) -> FloatImage {
    let (_, height, width) = lab.dim();
    let mut rgb = Array3::zeros((RGB_CHANNELS, height, width));

    for y in 0..height {
        for x in 0..width {
            let px: Lab = Lab::new(lab[[0, y, x]], lab[[1, y, x]], lab[[2, y, x]]);
            let linear: LinSrgb<f32> = px.into_color();
            let srgb: Srgb<f32> = Srgb::from_linear(linear);

            rgb[[0, y, x]] = srgb.red.clamp(0.0, 1.0);
            rgb[[1, y, x]] = srgb.green.clamp(0.0, 1.0);
            rgb[[2, y, x]] = srgb.blue.clamp(0.0, 1.0);
        }
    }

    rgb
}
