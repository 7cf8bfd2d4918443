use crate::blurring::domain::local_block::LocalBlock;
use crate::blurring::domain::weight_table::WeightTable;

/// Domain interface for filtering one rank's block.
///
/// Implementations rewrite the owned rows in place and may read, but never
/// rely on writing, the context rows. One instance is shared by all ranks.
pub trait ConvolutionStep: Send + Sync {
    fn apply(&self, block: &mut LocalBlock, weights: &WeightTable);
}
