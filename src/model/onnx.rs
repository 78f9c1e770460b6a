//! ONNX Runtime backed colorization model.

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::pipeline::{ChrominanceTensor, LuminanceTensor};

use super::{Artifact, ClusterHead, ColorPredictor, ModelPaths};

/// The pretrained colorization network plus its reconfigured output head.
pub struct OnnxColorizer {
    session: Session,
    head: ClusterHead,
}

impl OnnxColorizer {
    /// Load the model from its three artifacts.
    ///
    /// This is a start-up step: on failure nothing is kept and the caller
    /// should not go on to accept requests.
    ///
    /// # Errors
    ///
    /// Returns an error if any artifact is missing, the cluster centres are
    /// malformed, or ONNX Runtime rejects the graph.
    pub fn load(paths: &ModelPaths) -> Result<Self> {
        paths.verify()?;

        tracing::info!("Loading cluster centres from {}", paths.points.display());
        let head = ClusterHead::load(&paths.points)?;

        tracing::info!("Loading colorization network from {}", paths.network.display());
        let name = paths.network.file_name().map_or_else(
            || Artifact::Network.filename().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );

        let session = Session::builder()
            .map_err(|source| Error::ModelLoad {
                name: name.clone(),
                source,
            })?
            .commit_from_file(&paths.network)
            .map_err(|source| Error::ModelLoad { name, source })?;

        tracing::info!("Model loaded");
        Ok(Self { session, head })
    }
}

impl ColorPredictor for OnnxColorizer {
    fn predict(&mut self, luminance: &LuminanceTensor) -> Result<ChrominanceTensor> {
        let input_value =
            Tensor::from_array(luminance.clone()).map_err(|source| Error::Inference { source })?;

        let logits = {
            let outputs = self
                .session
                .run(ort::inputs![input_value])
                .map_err(|source| Error::Inference { source })?;

            // Get first output
            let output = outputs
                .values()
                .next()
                .ok_or_else(|| Error::ShapeMismatch {
                    expected: "class logits output".to_string(),
                    actual: "no output".to_string(),
                })?;

            extract_array4(&output)?
        };

        tracing::debug!("Network produced logits of shape {:?}", logits.shape());
        self.head.apply(logits.view())
    }
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<Array4<f32>> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}
