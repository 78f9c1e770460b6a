//! Image loading, resampling, and saving utilities.

mod load;
mod resize;
mod save;

pub use load::load_image;
pub use resize::resize_bilinear;
pub use save::{save_gray, save_rgb};

use ndarray::Array3;

/// Planar float image in `(channel, height, width)` layout.
/// RGB channels in that order, values normalized to the [0, 1] range.
pub type FloatImage = Array3<f32>;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;
