use ndarray::ArrayView3;

use crate::shared::pixel::{self, Pixel};

/// A full raster image: row-major RGB pixels.
///
/// Held only by the root rank for the lifetime of a job. The `u8`
/// `max_color_value` keeps the 8-bit depth limit in the type.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    max_color_value: u8,
    pixels: Vec<Pixel>,
}

impl Image {
    pub fn new(width: u32, height: u32, max_color_value: u8, pixels: Vec<Pixel>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize),
            "pixel count must equal width * height"
        );
        Self {
            width,
            height,
            max_color_value,
            pixels,
        }
    }

    /// An image where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: Pixel) -> Self {
        let count = (width as usize) * (height as usize);
        Self::new(width, height, u8::MAX, vec![color; count])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_color_value(&self) -> u8 {
        self.max_color_value
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    pub fn bytes(&self) -> &[u8] {
        pixel::as_bytes(&self.pixels)
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        pixel::as_bytes_mut(&mut self.pixels)
    }

    /// Pixels of rows `[start, start + count)`.
    pub fn rows(&self, start: usize, count: usize) -> &[Pixel] {
        let w = self.width as usize;
        &self.pixels[start * w..(start + count) * w]
    }

    /// `(height, width, channel)` view over the pixel bytes.
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, Pixel::SIZE),
            self.bytes(),
        )
        .expect("Image pixel count must match dimensions")
    }
}
