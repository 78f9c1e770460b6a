//! Grayscale-to-colour pipeline.

mod colorize;
mod tensor;

pub use colorize::{ColorizedImage, Config, Pipeline};
pub use tensor::{prepare, ChrominanceTensor, LuminanceTensor, LUMINANCE_BIAS, MODEL_INPUT_SIZE};
