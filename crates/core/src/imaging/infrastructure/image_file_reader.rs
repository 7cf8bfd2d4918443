use std::path::Path;

use crate::imaging::domain::image_reader::{ImageReadError, ImageReader};
use crate::shared::constants::MAX_COLOR_VALUE;
use crate::shared::image::Image;
use crate::shared::pixel::Pixel;

/// Reads PPM (and any other format the `image` crate decodes) into an
/// 8-bit RGB [`Image`].
///
/// Grayscale and alpha inputs are converted to RGB. Inputs with more than
/// 8 bits per channel are rejected rather than quantized.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Image, ImageReadError> {
        let decoded = image::open(path).map_err(|source| ImageReadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let color = decoded.color();
        let bits = u32::from(color.bytes_per_pixel()) * 8 / u32::from(color.channel_count());
        if bits > 8 {
            return Err(ImageReadError::ColorDepth {
                path: path.to_path_buf(),
                max_value: (1u64 << bits) - 1,
            });
        }

        let rgb = decoded.into_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels: Vec<Pixel> = bytemuck::cast_slice(rgb.as_raw().as_slice()).to_vec();
        log::debug!("Read {width}x{height} image from {}", path.display());
        Ok(Image::new(width, height, MAX_COLOR_VALUE, pixels))
    }
}
