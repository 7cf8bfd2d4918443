use std::path::{Path, PathBuf};

use crate::pipeline::job_error::JobError;
use crate::shared::constants::MAX_RADIUS;

/// Validated parameters of one blur job. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobParams {
    radius: usize,
    input: PathBuf,
    output: PathBuf,
}

impl JobParams {
    /// Checks the radius bounds. File existence is left to the image reader.
    pub fn new(
        radius: i64,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Self, JobError> {
        if !(1..=MAX_RADIUS as i64).contains(&radius) {
            return Err(JobError::InvalidRadius { radius });
        }
        Ok(Self {
            radius: radius as usize,
            input: input.into(),
            output: output.into(),
        })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::smallest(1)]
    #[case::typical(15)]
    #[case::largest(MAX_RADIUS as i64)]
    fn test_accepts_radius_in_bounds(#[case] radius: i64) {
        let params = JobParams::new(radius, "in.ppm", "out.ppm").unwrap();
        assert_eq!(params.radius() as i64, radius);
        assert_eq!(params.input(), Path::new("in.ppm"));
        assert_eq!(params.output(), Path::new("out.ppm"));
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-3)]
    #[case::above_max(MAX_RADIUS as i64 + 1)]
    fn test_rejects_radius_out_of_bounds(#[case] radius: i64) {
        let err = JobParams::new(radius, "in.ppm", "out.ppm").unwrap_err();
        assert!(matches!(err, JobError::InvalidRadius { radius: r } if r == radius));
    }
}
