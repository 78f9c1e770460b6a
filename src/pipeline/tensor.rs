//! Preparation of the model's luminance input.

use ndarray::{Array4, Axis};

use crate::color::LabImage;
use crate::image::resize_bilinear;

/// Luminance tensor in NCHW format `(1, 1, MODEL_INPUT_SIZE, MODEL_INPUT_SIZE)`.
pub type LuminanceTensor = Array4<f32>;

/// Predicted chrominance in NCHW format `(1, 2, h, w)`, in a*b* units.
pub type ChrominanceTensor = Array4<f32>;

/// Side of the square canvas the colorization model was trained on.
pub const MODEL_INPUT_SIZE: usize = 224;

/// Training-time mean of the L channel, subtracted before inference.
pub const LUMINANCE_BIAS: f32 = 50.0;

/// Build the model input from a full-resolution L*a*b* image.
///
/// The L channel is squashed to the fixed square canvas with the bilinear
/// reference filter (aspect ratio is deliberately not kept) and
/// mean-centred by [`LUMINANCE_BIAS`].
#[must_use]
pub fn prepare(lab: &LabImage) -> LuminanceTensor {
    let luminance = lab.index_axis(Axis(0), 0);
    let resized = resize_bilinear(luminance, MODEL_INPUT_SIZE, MODEL_INPUT_SIZE) - LUMINANCE_BIAS;

    resized.insert_axis(Axis(0)).insert_axis(Axis(0))
}
