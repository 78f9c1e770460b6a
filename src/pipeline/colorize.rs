//! Main colorization pipeline.

use std::path::Path;

use image::RgbImage;
use ndarray::{s, Array3, Axis};

use crate::color;
use crate::enhance::EnhanceConfig;
use crate::error::{Error, Result};
use crate::image::{load_image, resize_bilinear};
use crate::model::{ColorPredictor, ModelPaths, OnnxColorizer};

use super::tensor::{self, ChrominanceTensor};

/// Configuration for the colorization pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Where the model artifacts live.
    pub models: ModelPaths,

    /// Constants for the enhancement pass.
    pub enhance: EnhanceConfig,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        self.enhance.validate()
    }
}

/// A colorized photograph at its original resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorizedImage(RgbImage);

impl ColorizedImage {
    /// Borrow the pixels.
    #[must_use]
    pub const fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    /// Take ownership of the pixels.
    #[must_use]
    pub fn into_rgb(self) -> RgbImage {
        self.0
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }
}

impl From<RgbImage> for ColorizedImage {
    fn from(image: RgbImage) -> Self {
        Self(image)
    }
}

/// Colorizes images with a [`ColorPredictor`].
pub struct Pipeline<P = OnnxColorizer> {
    config: Config,
    predictor: P,
}

impl Pipeline<OnnxColorizer> {
    /// Create a new pipeline, loading the ONNX model named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model cannot
    /// be loaded. Either is fatal.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing pipeline with config: {config:?}");
        let predictor = OnnxColorizer::load(&config.models)?;
        tracing::info!("Pipeline initialized successfully");

        Ok(Self { config, predictor })
    }
}

impl<P: ColorPredictor> Pipeline<P> {
    /// Create a pipeline around an already-built predictor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_predictor(config: Config, predictor: P) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, predictor })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn predictor_mut(&mut self) -> &mut P {
        &mut self.predictor
    }

    /// Colorize the image stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the file is not a readable image, or an
    /// inference error if the model fails.
    pub fn colorize<Q: AsRef<Path>>(&mut self, path: Q) -> Result<ColorizedImage> {
        let path = path.as_ref();
        tracing::info!("Colorizing image: {}", path.display());

        let raster = load_image(path)?;
        self.colorize_image(&raster)
    }

    /// Colorize an already-decoded image.
    ///
    /// # Pipeline steps
    ///
    /// 1. Bytes to [0, 1] floats, then to L*a*b* at full resolution
    /// 2. L squashed to the model canvas and bias-shifted
    /// 3. Chrominance predicted at the model's internal resolution
    /// 4. Chrominance resized back to the source resolution
    /// 5. Full-resolution L recombined with it, converted back, clipped to 8 bits
    ///
    /// The output always has the input's dimensions.
    ///
    /// # Errors
    ///
    /// Returns an inference error if the predictor fails or returns a tensor
    /// that is not `(1, 2, h, w)`.
    pub fn colorize_image(&mut self, raster: &RgbImage) -> Result<ColorizedImage> {
        let (width, height) = (raster.width() as usize, raster.height() as usize);

        let mut lab = color::to_lab(&color::rgb_to_float(raster));

        let input = tensor::prepare(&lab);
        tracing::info!("Coloring the image");
        let predicted = self.predictor.predict(&input)?;
        tracing::debug!("Predicted chrominance of shape {:?}", predicted.shape());

        // L stays at full resolution; only a and b are replaced.
        let chroma = upsample_chroma(&predicted, width, height)?;
        lab.slice_mut(s![1..3, .., ..]).assign(&chroma);

        let rgb = color::float_to_rgb(&color::from_lab(&lab));
        Ok(ColorizedImage(rgb))
    }
}

/// Resize `(1, 2, h, w)` chrominance to `(2, height, width)`.
fn upsample_chroma(predicted: &ChrominanceTensor, width: usize, height: usize) -> Result<Array3<f32>> {
    let (batch, channels, h, w) = predicted.dim();
    if batch != 1 || channels != 2 || h == 0 || w == 0 {
        return Err(Error::ShapeMismatch {
            expected: "(1, 2, h, w) chrominance".to_string(),
            actual: format!("{:?}", predicted.shape()),
        });
    }

    let mut chroma = Array3::zeros((2, height, width));
    for (c, mut plane) in chroma.axis_iter_mut(Axis(0)).enumerate() {
        plane.assign(&resize_bilinear(predicted.slice(s![0, c, .., ..]), width, height));
    }

    Ok(chroma)
}
