//! Post-colorization enhancement: sharpening, gain, and an edge map.

mod edges;
mod sharpen;

pub use edges::canny_rgb;
pub use sharpen::{apply_gain, gaussian_blur_rgb, unsharp_mask};

use image::{GrayImage, RgbImage};

use crate::error::{Error, Result};
use crate::pipeline::ColorizedImage;

/// Tuning constants for the enhancement stage.
///
/// The defaults are empirical and kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceConfig {
    /// Gaussian sigma of the blurred copy. Zero disables the blur.
    pub blur_sigma: f32,

    /// Weight of the original image in the unsharp blend.
    pub original_weight: f32,

    /// Weight of the blurred copy in the unsharp blend.
    pub blurred_weight: f32,

    /// Contrast gain applied after sharpening.
    pub gain: f32,

    /// Brightness offset applied with the gain.
    pub offset: f32,

    /// Lower hysteresis threshold of the edge detector.
    pub canny_low: f32,

    /// Upper hysteresis threshold of the edge detector.
    pub canny_high: f32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 3.0,
            original_weight: 1.5,
            blurred_weight: -0.5,
            gain: 1.2,
            offset: 0.0,
            canny_low: 100.0,
            canny_high: 200.0,
        }
    }
}

impl EnhanceConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(invalid("blur_sigma", "must be a finite value >= 0"));
        }

        let coefficients = [
            ("original_weight", self.original_weight),
            ("blurred_weight", self.blurred_weight),
            ("gain", self.gain),
            ("offset", self.offset),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(invalid(name, "must be finite"));
            }
        }

        if !self.canny_low.is_finite() || self.canny_low < 0.0 {
            return Err(invalid("canny_low", "must be a finite value >= 0"));
        }

        if !self.canny_high.is_finite() || self.canny_high < self.canny_low {
            return Err(invalid("canny_high", "must be finite and >= canny_low"));
        }

        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// The artifacts derived from a colorized image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enhancement {
    /// Sharpened, gain-adjusted colour image.
    pub image: RgbImage,

    /// Binary edge map of `image` (0 or 255), same dimensions.
    pub edges: GrayImage,
}

/// Sharpen a colorized image and trace its edges.
///
/// # Pipeline steps
///
/// 1. Gaussian blur of each channel
/// 2. Unsharp blend of the original against the blur
/// 3. Gain and offset, saturated to 8 bits
/// 4. Canny edge detection on the result
///
/// Pure: the same input and configuration always give the same output.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `config` does not validate.
pub fn enhance(colorized: &ColorizedImage, config: &EnhanceConfig) -> Result<Enhancement> {
    config.validate()?;

    let original = colorized.as_rgb();
    tracing::info!("Enhancing {}x{} image", original.width(), original.height());

    let blurred = gaussian_blur_rgb(original, config.blur_sigma);
    let sharpened = unsharp_mask(original, &blurred, config.original_weight, config.blurred_weight);
    let image = apply_gain(&sharpened, config.gain, config.offset);

    let edges = canny_rgb(&image, config.canny_low, config.canny_high);
    tracing::debug!(
        "Edge map has {} edge pixels",
        edges.pixels().filter(|p| p.0[0] != 0).count()
    );

    Ok(Enhancement { image, edges })
}
