//! Locating and checking the model files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The three files that make up the colorization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// ONNX graph of the colorization network.
    Network,
    /// External-data weights referenced by the graph.
    Weights,
    /// Table of the 313 quantized a*b* cluster centres.
    Points,
}

impl Artifact {
    /// Every artifact, in load order.
    pub const ALL: [Self; 3] = [Self::Network, Self::Weights, Self::Points];

    /// Get the default filename for this artifact.
    #[must_use]
    pub const fn filename(&self) -> &'static str {
        match self {
            Self::Network => "colorization.onnx",
            // ONNX graph references this exact name internally
            Self::Weights => "colorization.onnx_data",
            Self::Points => "pts_in_hull.npy",
        }
    }
}

/// Paths to the model artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    /// ONNX graph whose first output is the 313-class logits.
    pub network: PathBuf,
    /// Weights file; must sit beside `network` under the name the graph expects.
    pub weights: PathBuf,
    /// `.npy` file holding a `(313, 2)` table of a*b* cluster centres.
    pub points: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self::in_dir(Self::default_dir())
    }
}

impl ModelPaths {
    /// Use the default file names inside `dir`.
    #[must_use]
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            network: dir.join(Artifact::Network.filename()),
            weights: dir.join(Artifact::Weights.filename()),
            points: dir.join(Artifact::Points.filename()),
        }
    }

    /// The platform-appropriate model directory:
    /// - Windows: `%LOCALAPPDATA%\chromafy\models`
    /// - Linux: `~/.cache/chromafy/models`
    /// - macOS: `~/Library/Caches/chromafy/models`
    #[must_use]
    pub fn default_dir() -> PathBuf {
        let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("chromafy").join("models")
    }

    /// Path of one artifact.
    #[must_use]
    pub fn path(&self, artifact: Artifact) -> &Path {
        match artifact {
            Artifact::Network => &self.network,
            Artifact::Weights => &self.weights,
            Artifact::Points => &self.points,
        }
    }

    /// Check that every artifact exists and that the weights are where the
    /// graph will look for them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArtifact`] naming the first file that is absent,
    /// not a regular file, or not beside the graph.
    pub fn verify(&self) -> Result<()> {
        for artifact in Artifact::ALL {
            let path = self.path(artifact);
            let is_file = fs::metadata(path).is_ok_and(|meta| meta.is_file());
            if !is_file {
                return Err(Error::MissingArtifact {
                    path: path.to_path_buf(),
                });
            }
        }

        // External data is resolved relative to the graph's own directory.
        let expected = match self.weights.file_name() {
            Some(name) => self.network.with_file_name(name),
            None => {
                return Err(Error::MissingArtifact {
                    path: self.weights.clone(),
                })
            }
        };
        let beside = match (fs::canonicalize(&expected), fs::canonicalize(&self.weights)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !beside {
            return Err(Error::MissingArtifact { path: expected });
        }

        Ok(())
    }
}
