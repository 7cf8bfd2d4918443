use std::ops::Range;

use crate::shared::pixel::{self, Pixel};

/// A rank's private rows: read-only context above, owned rows, read-only
/// context below, stored contiguously in that order.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalBlock {
    width: usize,
    halo_top: usize,
    row_count: usize,
    halo_bottom: usize,
    pixels: Vec<Pixel>,
}

impl LocalBlock {
    /// A block with no context rows.
    pub fn from_rows(width: usize, own: Vec<Pixel>) -> Self {
        Self::with_halo(width, Vec::new(), own, Vec::new())
    }

    pub fn with_halo(width: usize, above: Vec<Pixel>, own: Vec<Pixel>, below: Vec<Pixel>) -> Self {
        let rows_of = |v: &Vec<Pixel>| if width == 0 { 0 } else { v.len() / width };
        debug_assert!(
            width == 0 || (above.len() % width == 0 && own.len() % width == 0 && below.len() % width == 0),
            "block segments must hold whole rows"
        );
        let (halo_top, row_count, halo_bottom) = (rows_of(&above), rows_of(&own), rows_of(&below));

        let mut pixels = above;
        pixels.extend_from_slice(&own);
        pixels.extend_from_slice(&below);

        Self {
            width,
            halo_top,
            row_count,
            halo_bottom,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn halo_top(&self) -> usize {
        self.halo_top
    }

    pub fn halo_bottom(&self) -> usize {
        self.halo_bottom
    }

    /// Rows owned by this rank, excluding context.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn total_rows(&self) -> usize {
        self.halo_top + self.row_count + self.halo_bottom
    }

    /// Row indices of the owned rows within the block.
    pub fn own_row_range(&self) -> Range<usize> {
        self.halo_top..self.halo_top + self.row_count
    }

    pub fn own_rows(&self) -> &[Pixel] {
        let rows = self.own_row_range();
        &self.pixels[rows.start * self.width..rows.end * self.width]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        pixel::as_bytes_mut(&mut self.pixels)
    }
}
