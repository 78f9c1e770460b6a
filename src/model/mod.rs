//! The pretrained color-prediction model and its host-side output head.

mod artifacts;
mod cluster;
mod onnx;

pub use artifacts::{Artifact, ModelPaths};
pub use cluster::{ClusterHead, NUM_CLUSTERS, RESCALE_FACTOR};
pub use onnx::OnnxColorizer;

use crate::error::Result;
use crate::pipeline::{ChrominanceTensor, LuminanceTensor};

/// Something that predicts a*b* chrominance from a prepared luminance tensor.
///
/// Implementations are built once and never change their weights afterwards.
/// `predict` takes `&mut self` only because ONNX Runtime sessions need it.
pub trait ColorPredictor {
    /// Predict chrominance for a `(1, 1, 224, 224)` bias-shifted L tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to run or produces an unexpected shape.
    fn predict(&mut self, luminance: &LuminanceTensor) -> Result<ChrominanceTensor>;
}

impl<P: ColorPredictor + ?Sized> ColorPredictor for Box<P> {
    fn predict(&mut self, luminance: &LuminanceTensor) -> Result<ChrominanceTensor> {
        (**self).predict(luminance)
    }
}
