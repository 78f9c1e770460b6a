//! # chromafy
//!
//! A library for colorizing grayscale photographs with a pretrained
//! colorization network, plus a sharpening and edge-tracing pass over the
//! result.
//!
//! The network sees only the lightness channel, squashed onto a fixed
//! 224x224 canvas, and predicts a*b* chrominance on its own small grid. That
//! prediction is resized back and recombined with the full-resolution
//! lightness, so the output always matches the input's size and detail.
//!
//! ## Example
//!
//! ```no_run
//! use chromafy::{Config, Pipeline, Studio};
//!
//! # fn main() -> chromafy::Result<()> {
//! let pipeline = Pipeline::new(Config::default())?;
//! let mut studio = Studio::new(pipeline);
//!
//! studio.open("grandparents.jpg")?;
//! let enhanced = studio.enhance()?;
//! enhanced.edges.save("edges.png").ok();
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod enhance;
pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod studio;

pub use enhance::{EnhanceConfig, Enhancement};
pub use error::{Error, Result};
pub use model::{ColorPredictor, ModelPaths, OnnxColorizer};
pub use pipeline::{ColorizedImage, Config, Pipeline};
pub use studio::Studio;
