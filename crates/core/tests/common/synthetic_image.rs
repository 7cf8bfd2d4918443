use std::path::Path;

use distblur_core::shared::image::Image;
use distblur_core::shared::pixel::Pixel;

/// Deterministic pseudo-random RGB image.
pub fn noise_image(width: u32, height: u32, seed: u32) -> Image {
    let mut state = seed.max(1);
    let pixels = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Pixel::new(r, g, b)
        })
        .collect();
    Image::new(width, height, 255, pixels)
}

/// Saves an image through the `image` crate, format from the extension.
pub fn save(image: &Image, path: &Path) {
    image::RgbImage::from_raw(image.width(), image.height(), image.bytes().to_vec())
        .unwrap()
        .save(path)
        .unwrap();
}
