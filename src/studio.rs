//! The "current image" workflow: colorize, then enhance on demand.

use std::path::Path;

use crate::enhance::{self, Enhancement};
use crate::error::{Error, Result};
use crate::model::{ColorPredictor, OnnxColorizer};
use crate::pipeline::{ColorizedImage, Pipeline};

/// Holds at most one current colorized image.
///
/// A new colorization replaces the current image only if it succeeds; on
/// any error the previous image stays in place. `&mut self` on [`open`]
/// means only one colorization can be in flight against a studio.
///
/// [`open`]: Studio::open
pub struct Studio<P = OnnxColorizer> {
    pipeline: Pipeline<P>,
    current: Option<ColorizedImage>,
}

impl<P: ColorPredictor> Studio<P> {
    #[must_use]
    pub const fn new(pipeline: Pipeline<P>) -> Self {
        Self {
            pipeline,
            current: None,
        }
    }

    /// Colorize `path` and make it the current image.
    ///
    /// # Errors
    ///
    /// Returns the pipeline's error; the current image is left untouched.
    pub fn open<Q: AsRef<Path>>(&mut self, path: Q) -> Result<&ColorizedImage> {
        let colorized = self.pipeline.colorize(path)?;
        Ok(self.current.insert(colorized))
    }

    /// The current colorized image, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&ColorizedImage> {
        self.current.as_ref()
    }

    /// Drop the current image.
    pub fn clear(&mut self) -> Option<ColorizedImage> {
        self.current.take()
    }

    /// Enhance the current image with the pipeline's enhancement settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentImage`] if nothing has been colorized yet.
    pub fn enhance(&self) -> Result<Enhancement> {
        let current = self.current.as_ref().ok_or(Error::NoCurrentImage)?;
        enhance::enhance(current, &self.pipeline.config().enhance)
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline<P> {
        &self.pipeline
    }
}
