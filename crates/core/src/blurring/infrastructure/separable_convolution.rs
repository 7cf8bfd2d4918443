use crate::blurring::domain::convolution_step::ConvolutionStep;
use crate::blurring::domain::local_block::LocalBlock;
use crate::blurring::domain::weight_table::WeightTable;

use super::gaussian;

/// CPU horizontal-then-vertical convolution of a block's owned rows.
///
/// Context rows feed the vertical pass; the block edges stand in for the
/// image borders because context is always complete up to the radius
/// unless the image ends first.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeparableConvolution;

impl SeparableConvolution {
    pub fn new() -> Self {
        Self
    }
}

impl ConvolutionStep for SeparableConvolution {
    fn apply(&self, block: &mut LocalBlock, weights: &WeightTable) {
        let width = block.width();
        let rows = block.total_rows();
        let band = block.own_row_range();
        gaussian::separable_blur_band(block.bytes_mut(), width, rows, band, weights.weights());
    }
}
