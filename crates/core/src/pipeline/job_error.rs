use thiserror::Error;

use crate::distribution::domain::communicator::CommError;
use crate::imaging::domain::image_reader::ImageReadError;
use crate::imaging::domain::image_writer::ImageWriteError;
use crate::partition::domain::partition_plan::PartitionError;
use crate::shared::constants::MAX_RADIUS;

/// Every way a blur job can fail. None of them is retried.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("radius ({radius}) must be between 1 and {max}", max = MAX_RADIUS)]
    InvalidRadius { radius: i64 },
    #[error(transparent)]
    ImageRead(#[from] ImageReadError),
    #[error(transparent)]
    Write(#[from] ImageWriteError),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error("communication failed: {0}")]
    Communication(#[from] CommError),
    #[error("root rank has no image to distribute")]
    MissingRootImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_radius_message_names_bounds() {
        let msg = JobError::InvalidRadius { radius: 0 }.to_string();
        assert_eq!(msg, "radius (0) must be between 1 and 1000");
    }

    #[test]
    fn test_partition_error_is_transparent() {
        let err: JobError = PartitionError::NoWorkers.into();
        assert_eq!(err.to_string(), PartitionError::NoWorkers.to_string());
    }
}
