use std::ops::Range;

use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::blurring::domain::weight_table::WeightTable;
use crate::shared::pixel::Pixel;

/// Gaussian weights for the given radius.
///
/// The kernel spans `2 * radius + 1` taps. Sigma is derived as
/// `kernel_size / 6.0` so the kernel covers roughly three standard
/// deviations on each side.
pub fn compute_weights(radius: usize) -> WeightTable {
    let kernel_size = 2 * radius + 1;
    let sigma = kernel_size as f64 / 6.0;
    let mut weights: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    WeightTable::new(weights)
}

/// Separable blur of the rows in `band` of a `rows x width` RGB buffer.
///
/// The horizontal pass runs over every row of `data`, the vertical pass only
/// rewrites `band`. Sample indices clamp to the buffer edges, so rows outside
/// `band` act as read-only context.
pub fn separable_blur_band(
    data: &mut [u8],
    width: usize,
    rows: usize,
    band: Range<usize>,
    weights: &[f64],
) {
    if weights.len() <= 1 || width == 0 || rows == 0 || band.is_empty() {
        return;
    }
    let half = weights.len() / 2;
    let shape = (rows, width, Pixel::SIZE);

    // Horizontal pass: data → temp
    let mut temp = Array3::<f64>::zeros(shape);
    {
        let src = ArrayView3::from_shape(shape, &*data)
            .expect("Block data length must match its dimensions");
        for y in 0..rows {
            for x in 0..width {
                for c in 0..Pixel::SIZE {
                    let mut sum = 0.0;
                    for (k, &w) in weights.iter().enumerate() {
                        let sx = clamp_index(x, k, half, width);
                        sum += src[[y, sx, c]] as f64 * w;
                    }
                    temp[[y, x, c]] = sum;
                }
            }
        }
    }

    // Vertical pass: temp → data, owned rows only
    let mut dst = ArrayViewMut3::from_shape(shape, data)
        .expect("Block data length must match its dimensions");
    for y in band {
        for x in 0..width {
            for c in 0..Pixel::SIZE {
                let mut sum = 0.0;
                for (k, &w) in weights.iter().enumerate() {
                    let sy = clamp_index(y, k, half, rows);
                    sum += temp[[sy, x, c]] * w;
                }
                dst[[y, x, c]] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

fn clamp_index(pos: usize, tap: usize, half: usize, len: usize) -> usize {
    (pos as isize + tap as isize - half as isize).clamp(0, len as isize - 1) as usize
}
