use std::ops::Range;

use thiserror::Error;

use crate::distribution::domain::rank_group::RankGroup;
use crate::shared::pixel::Pixel;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("cannot partition rows across zero workers")]
    NoWorkers,
    #[error("partition invariant violated: {0}")]
    InvariantViolation(String),
}

/// One worker's contiguous row range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub rank: usize,
    pub start_row: usize,
    pub row_count: usize,
}

impl Partition {
    pub fn end_row(&self) -> usize {
        self.start_row + self.row_count
    }

    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.end_row()
    }

    /// Bytes occupied by this partition's rows at the given image width.
    pub fn byte_extent(&self, width: usize) -> usize {
        self.row_count * width * Pixel::SIZE
    }

    /// Byte range of this partition inside a full row-major image buffer.
    pub fn byte_range(&self, width: usize) -> Range<usize> {
        let row_bytes = width * Pixel::SIZE;
        self.start_row * row_bytes..self.end_row() * row_bytes
    }
}

/// Row assignment of one job under the remainder-owner scheme.
///
/// Every rank but the last gets `height / worker_count` rows; the last rank
/// (the remainder owner) also absorbs `height % worker_count`. The equal
/// shares travel through a uniform collective inside the transfer group,
/// the remainder owner's block over point-to-point messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    height: usize,
    worker_count: usize,
    rows_per_worker: usize,
    partitions: Vec<Partition>,
}

impl PartitionPlan {
    /// Deterministic: every rank computing this from the same inputs gets
    /// the same plan.
    pub fn compute(height: usize, worker_count: usize) -> Result<Self, PartitionError> {
        if worker_count == 0 {
            return Err(PartitionError::NoWorkers);
        }
        let rows_per_worker = height / worker_count;
        let residue = height % worker_count;
        let partitions = (0..worker_count)
            .map(|rank| Partition {
                rank,
                start_row: rank * rows_per_worker,
                row_count: if rank == worker_count - 1 {
                    rows_per_worker + residue
                } else {
                    rows_per_worker
                },
            })
            .collect();
        Ok(Self {
            height,
            worker_count,
            rows_per_worker,
            partitions,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn rows_per_worker(&self) -> usize {
        self.rows_per_worker
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// # Panics
    /// If `rank >= worker_count`.
    pub fn partition(&self, rank: usize) -> &Partition {
        &self.partitions[rank]
    }

    pub fn remainder_owner(&self) -> usize {
        self.worker_count - 1
    }

    /// All ranks except the remainder owner, in rank order.
    pub fn transfer_group(&self) -> RankGroup {
        RankGroup::new((0..self.remainder_owner()).collect())
    }

    /// Rows carried by the uniform collective, which is also the row
    /// offset of the remainder owner's block.
    pub fn collective_rows(&self) -> usize {
        self.rows_per_worker * (self.worker_count - 1)
    }

    /// Checks the invariants the distribution protocol relies on.
    pub fn validate(&self) -> Result<(), PartitionError> {
        let violation = |msg: String| Err(PartitionError::InvariantViolation(msg));

        if self.partitions.len() != self.worker_count {
            return violation(format!(
                "{} partitions for {} workers",
                self.partitions.len(),
                self.worker_count
            ));
        }

        let mut next_row = 0;
        for (rank, p) in self.partitions.iter().enumerate() {
            if p.rank != rank {
                return violation(format!("partition {rank} labelled as rank {}", p.rank));
            }
            if p.start_row != next_row {
                return violation(format!(
                    "rank {rank} starts at row {} instead of {next_row}",
                    p.start_row
                ));
            }
            if rank != self.remainder_owner() && p.row_count != self.rows_per_worker {
                return violation(format!(
                    "transfer group rank {rank} has {} rows, expected {}",
                    p.row_count, self.rows_per_worker
                ));
            }
            next_row = p.end_row();
        }

        if next_row != self.height {
            return violation(format!(
                "partitions cover {next_row} rows of {}",
                self.height
            ));
        }

        let owner_start = self.partitions[self.remainder_owner()].start_row;
        if owner_start != self.collective_rows() {
            return violation(format!(
                "remainder block starts at row {owner_start}, collective covers {}",
                self.collective_rows()
            ));
        }

        Ok(())
    }
}
