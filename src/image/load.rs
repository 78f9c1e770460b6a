//! Image loading utilities.

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// Load an image from disk as 8-bit RGB.
///
/// Grayscale, palette, and alpha-carrying inputs are all converted to three
/// 8-bit channels, so a luminance-only photograph arrives with R = G = B.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be read or is not an image
/// in a supported format.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    use image::{GrayImage, Luma};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("chromafy-load-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_grayscale_expands_to_rgb() {
        let path = temp_path("gray.png");
        GrayImage::from_pixel(6, 4, Luma([77])).save(&path).unwrap();

        let rgb = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rgb.dimensions(), (6, 4));
        assert!(rgb.pixels().all(|p| p.0 == [77, 77, 77]));
    }

    #[test]
    fn test_text_file_is_decode_error() {
        let path = temp_path("not_an_image.txt");
        std::fs::write(&path, "definitely not pixels").unwrap();

        let err = load_image(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = load_image(temp_path("does-not-exist.png")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    }
}
