/// Normalized 1-D convolution weights of length `2 * radius + 1`.
///
/// Immutable once built; shared read-only by every rank of a job.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    weights: Vec<f64>,
}

impl WeightTable {
    pub fn new(weights: Vec<f64>) -> Self {
        debug_assert!(weights.len() % 2 == 1, "weight table length must be odd");
        Self { weights }
    }

    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}
