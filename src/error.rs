//! Custom error types for chromafy.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the chromafy library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or decode an image file.
    #[error("failed to decode image from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A model artifact is absent or unreadable.
    #[error("model artifact {path} is missing or unreadable")]
    MissingArtifact { path: PathBuf },

    /// The cluster-centre table could not be parsed.
    #[error("invalid cluster centres in {path}: {reason}")]
    ClusterCenters { path: PathBuf, reason: String },

    /// Failed to load an ONNX model.
    #[error("failed to load ONNX model {name}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Enhancement was requested before any image was colorized.
    #[error("no colorized image is available; colorize an image first")]
    NoCurrentImage,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error belongs to the fatal start-up class.
    ///
    /// A process that sees one of these must not go on to accept requests.
    #[must_use]
    pub const fn is_model_load(&self) -> bool {
        matches!(
            self,
            Self::MissingArtifact { .. } | Self::ClusterCenters { .. } | Self::ModelLoad { .. }
        )
    }
}

/// Result type alias for chromafy operations.
pub type Result<T> = std::result::Result<T, Error>;
