use std::time::Duration;

use crate::blurring::domain::convolution_step::ConvolutionStep;
use crate::blurring::infrastructure::gaussian;
use crate::distribution::infrastructure::local_cluster::LocalCluster;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::partition::domain::partition_plan::PartitionError;
use crate::pipeline::coordinator::{Coordinator, RankReport};
use crate::pipeline::job_error::JobError;
use crate::pipeline::job_logger::JobLogger;
use crate::shared::constants::ROOT_RANK;
use crate::shared::job_params::JobParams;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobReport {
    pub worker_count: usize,
    /// Root-rank wall time of the distributed phase, I/O excluded.
    pub distributed_time: Duration,
    pub ranks: Vec<RankReport>,
}

/// Whole-job pipeline: read → distribute → blur → gather → write, over a
/// fixed number of ranks.
pub struct BlurJobUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    convolution: Box<dyn ConvolutionStep>,
    logger: Box<dyn JobLogger>,
    worker_count: usize,
}

impl BlurJobUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        convolution: Box<dyn ConvolutionStep>,
        logger: Box<dyn JobLogger>,
        worker_count: usize,
    ) -> Self {
        Self {
            reader,
            writer,
            convolution,
            logger,
            worker_count,
        }
    }

    pub fn execute(&mut self, params: &JobParams) -> Result<JobReport, JobError> {
        if self.worker_count == 0 {
            return Err(PartitionError::NoWorkers.into());
        }

        let weights = gaussian::compute_weights(params.radius());
        self.logger.info(&format!(
            "Blurring {} with radius {} on {} ranks",
            params.input().display(),
            params.radius(),
            self.worker_count
        ));

        let coordinator = Coordinator::new(
            params,
            &weights,
            &*self.reader,
            &*self.writer,
            &*self.convolution,
        );
        let ranks = LocalCluster::launch(self.worker_count, |comm| coordinator.run_rank(&comm))?;

        let distributed_time = ranks
            .get(ROOT_RANK)
            .map(|r| r.elapsed)
            .unwrap_or_default();
        self.logger
            .timing("distributed", distributed_time.as_secs_f64() * 1000.0);
        for report in &ranks {
            self.logger.metric("rank_rows", report.row_count as f64);
        }
        self.logger.info(&format!(
            "Filtering took: {} secs",
            distributed_time.as_secs_f64()
        ));
        self.logger
            .info(&format!("Output written to {}", params.output().display()));
        self.logger.summary();

        Ok(JobReport {
            worker_count: self.worker_count,
            distributed_time,
            ranks,
        })
    }
}
