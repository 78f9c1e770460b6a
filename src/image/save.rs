//! Image saving utilities.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{Error, Result};

/// Save an RGB image, inferring the format from the extension.
///
/// # Arguments
///
/// * `image` - Image to write
/// * `path` - Output file path
/// * `quality` - JPEG quality (1-100), ignored for other formats
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written.
pub fn save_rgb<P: AsRef<Path>>(image: &RgbImage, path: P, quality: u8) -> Result<()> {
    save_dynamic(&DynamicImage::ImageRgb8(image.clone()), path.as_ref(), quality)
}

/// Save a single-channel image such as an edge map.
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written.
pub fn save_gray<P: AsRef<Path>>(image: &GrayImage, path: P, quality: u8) -> Result<()> {
    save_dynamic(&DynamicImage::ImageLuma8(image.clone()), path.as_ref(), quality)
}

fn save_dynamic(img: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            let mut output = std::fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            img.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        _ => {
            img.save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
