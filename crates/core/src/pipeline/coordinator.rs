use std::time::{Duration, Instant};

use crate::blurring::domain::convolution_step::ConvolutionStep;
use crate::blurring::domain::weight_table::WeightTable;
use crate::distribution::distribution_channel::{DistributionChannel, Geometry};
use crate::distribution::domain::communicator::Communicator;
use crate::distribution::halo_exchange::exchange_halo;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::partition::domain::partition_plan::PartitionPlan;
use crate::pipeline::job_error::JobError;
use crate::shared::constants::ROOT_RANK;
use crate::shared::image::Image;
use crate::shared::job_params::JobParams;

/// What one rank did during the distributed phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankReport {
    pub rank: usize,
    pub start_row: usize,
    pub row_count: usize,
    /// From just before the geometry broadcast until the rank's last
    /// transfer. On the root this ends with the remainder receive.
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct PhaseResult {
    /// The reassembled image; `Some` on the root only.
    pub image: Option<Image>,
    pub geometry: Geometry,
    pub report: RankReport,
}

/// Runs one rank's share of the distributed phase: broadcast geometry,
/// partition, scatter, halo exchange, convolution, gather.
///
/// The root passes the source image and gets it back filtered; every other
/// rank passes `None`.
pub fn distribute_and_blur<C: Communicator + ?Sized>(
    comm: &C,
    weights: &WeightTable,
    convolution: &dyn ConvolutionStep,
    mut image: Option<Image>,
) -> Result<PhaseResult, JobError> {
    let rank = comm.rank();
    if rank == ROOT_RANK && image.is_none() {
        return Err(JobError::MissingRootImage);
    }
    let channel = DistributionChannel::new(comm);

    let start = Instant::now();
    let geometry = channel.broadcast_geometry(image.as_ref().map(Geometry::of))?;
    let width = geometry.width as usize;

    let plan = PartitionPlan::compute(geometry.height as usize, comm.size())?;
    plan.validate()?;

    let own = channel.scatter_rows(&plan, width, image.as_ref())?;
    let mut block = exchange_halo(comm, &plan, width, weights.radius(), own)?;
    convolution.apply(&mut block, weights);
    channel.gather_rows(&plan, width, block.own_rows(), image.as_mut())?;
    let elapsed = start.elapsed();

    let part = plan.partition(rank);
    log::debug!(
        "Rank {rank} filtered {} rows ({} context rows) in {:.3}ms",
        part.row_count,
        block.halo_top() + block.halo_bottom(),
        elapsed.as_secs_f64() * 1000.0
    );

    Ok(PhaseResult {
        image: if rank == ROOT_RANK { image } else { None },
        geometry,
        report: RankReport {
            rank,
            start_row: part.start_row,
            row_count: part.row_count,
            elapsed,
        },
    })
}

/// Per-rank job driver. The root reads the input before anything is
/// communicated and writes the output once the gather completes; the other
/// ranks never touch files.
pub struct Coordinator<'a> {
    params: &'a JobParams,
    weights: &'a WeightTable,
    reader: &'a dyn ImageReader,
    writer: &'a dyn ImageWriter,
    convolution: &'a dyn ConvolutionStep,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        params: &'a JobParams,
        weights: &'a WeightTable,
        reader: &'a dyn ImageReader,
        writer: &'a dyn ImageWriter,
        convolution: &'a dyn ConvolutionStep,
    ) -> Self {
        Self {
            params,
            weights,
            reader,
            writer,
            convolution,
        }
    }

    pub fn run_rank<C: Communicator + ?Sized>(&self, comm: &C) -> Result<RankReport, JobError> {
        if comm.rank() != ROOT_RANK {
            return distribute_and_blur(comm, self.weights, self.convolution, None)
                .map(|result| result.report);
        }

        let image = self.reader.read(self.params.input())?;
        log::info!(
            "Has read the {}x{} image, distributing over {} ranks",
            image.width(),
            image.height(),
            comm.size()
        );

        let result = distribute_and_blur(comm, self.weights, self.convolution, Some(image))?;
        let image = result.image.ok_or(JobError::MissingRootImage)?;

        log::info!("Writing output file {}", self.params.output().display());
        self.writer.write(self.params.output(), &image)?;
        Ok(result.report)
    }
}
