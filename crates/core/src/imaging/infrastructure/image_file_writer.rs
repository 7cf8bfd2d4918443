use std::path::Path;

use crate::imaging::domain::image_writer::{ImageWriteError, ImageWriter};
use crate::shared::image::Image;

/// Writes an [`Image`] using the `image` crate; the format follows the file
/// extension (`.ppm` gives binary P6).
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, image: &Image) -> Result<(), ImageWriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ImageWriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let img = image::RgbImage::from_raw(image.width(), image.height(), image.bytes().to_vec())
            .ok_or(ImageWriteError::Buffer)?;

        img.save(path).map_err(|source| ImageWriteError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Wrote {}x{} image to {}", image.width(), image.height(), path.display());
        Ok(())
    }
}
