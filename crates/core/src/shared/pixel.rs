use bytemuck::{Pod, Zeroable};

/// One 8-bit-per-channel RGB sample.
///
/// `#[repr(C)]` with three `u8` fields has no padding, so pixel slices can be
/// reinterpreted as byte slices for transfer without copying.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const SIZE: usize = std::mem::size_of::<Pixel>();

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// Views a pixel slice as raw bytes.
pub fn as_bytes(pixels: &[Pixel]) -> &[u8] {
    bytemuck::cast_slice(pixels)
}

/// Views a mutable pixel slice as raw bytes.
pub fn as_bytes_mut(pixels: &mut [Pixel]) -> &mut [u8] {
    bytemuck::cast_slice_mut(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_three_bytes() {
        assert_eq!(Pixel::SIZE, 3);
    }

    #[test]
    fn test_as_bytes_is_channel_interleaved() {
        let pixels = [Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)];
        assert_eq!(as_bytes(&pixels), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_as_bytes_mut_writes_through() {
        let mut pixels = [Pixel::default(); 2];
        as_bytes_mut(&mut pixels)[4] = 200;
        assert_eq!(pixels[1], Pixel::new(0, 200, 0));
    }

    #[test]
    fn test_gray_sets_all_channels() {
        assert_eq!(Pixel::gray(7), Pixel::new(7, 7, 7));
    }
}
