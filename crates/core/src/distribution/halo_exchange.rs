use crate::blurring::domain::local_block::LocalBlock;
use crate::distribution::domain::communicator::{ChannelId, CommError, Communicator};
use crate::partition::domain::partition_plan::PartitionPlan;
use crate::shared::pixel::{self, Pixel};

/// Surrounds a rank's rows with up to `radius` rows of context per side.
///
/// Context is relayed rank to rank: rank `r` receives the rows above it from
/// `r - 1` on [`ChannelId::HaloDown`], appends its own rows and forwards the
/// tail to `r + 1`; the upward pass on [`ChannelId::HaloUp`] mirrors it.
/// Partitions smaller than `radius` therefore still yield complete context.
/// Context is short of `radius` rows only where the image itself ends.
pub fn exchange_halo<C: Communicator + ?Sized>(
    comm: &C,
    plan: &PartitionPlan,
    width: usize,
    radius: usize,
    own: Vec<Pixel>,
) -> Result<LocalBlock, CommError> {
    let rank = comm.rank();
    let last = plan.worker_count() - 1;
    let part = plan.partition(rank);
    let height = plan.height();

    let mut above = Vec::new();
    if rank > 0 {
        above = vec![Pixel::default(); radius.min(part.start_row) * width];
        comm.receive(rank - 1, ChannelId::HaloDown, pixel::as_bytes_mut(&mut above))?;
    }
    if rank < last {
        let next_start = plan.partition(rank + 1).start_row;
        let tail = last_rows(&above, &own, radius.min(next_start) * width);
        comm.send(rank + 1, ChannelId::HaloDown, pixel::as_bytes(&tail))?;
    }

    let mut below = Vec::new();
    if rank < last {
        below = vec![Pixel::default(); radius.min(height - part.end_row()) * width];
        comm.receive(rank + 1, ChannelId::HaloUp, pixel::as_bytes_mut(&mut below))?;
    }
    if rank > 0 {
        let head = first_rows(&own, &below, radius.min(height - part.start_row) * width);
        comm.send(rank - 1, ChannelId::HaloUp, pixel::as_bytes(&head))?;
    }

    Ok(LocalBlock::with_halo(width, above, own, below))
}

fn last_rows(first: &[Pixel], second: &[Pixel], count: usize) -> Vec<Pixel> {
    let total = first.len() + second.len();
    first
        .iter()
        .chain(second)
        .skip(total.saturating_sub(count))
        .copied()
        .collect()
}

fn first_rows(first: &[Pixel], second: &[Pixel], count: usize) -> Vec<Pixel> {
    first.iter().chain(second).take(count).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::infrastructure::local_cluster::LocalCluster;
    use rstest::rstest;

    fn row_pixels(width: usize, rows: std::ops::Range<usize>) -> Vec<Pixel> {
        rows.flat_map(|y| std::iter::repeat(Pixel::gray(y as u8)).take(width))
            .collect()
    }

    fn exchange(height: usize, workers: usize, radius: usize) -> Vec<LocalBlock> {
        let width = 2;
        LocalCluster::launch(workers, |comm| {
            let plan = PartitionPlan::compute(height, comm.size())
                .map_err(|_| CommError::Aborted)?;
            let own = row_pixels(width, plan.partition(comm.rank()).rows());
            exchange_halo(&comm, &plan, width, radius, own)
        })
        .unwrap()
    }

    #[rstest]
    #[case::large_partitions(12, 3, 2)]
    #[case::radius_spans_partitions(10, 4, 5)]
    #[case::empty_partitions(2, 4, 3)]
    #[case::single_worker(6, 1, 4)]
    fn test_context_matches_image_neighbourhood(
        #[case] height: usize,
        #[case] workers: usize,
        #[case] radius: usize,
    ) {
        let plan = PartitionPlan::compute(height, workers).unwrap();
        let blocks = exchange(height, workers, radius);

        for (rank, block) in blocks.iter().enumerate() {
            let p = plan.partition(rank);
            let first = p.start_row.saturating_sub(radius);
            let end = (p.end_row() + radius).min(height);
            assert_eq!(block.halo_top(), p.start_row - first, "rank {rank}");
            assert_eq!(block.halo_bottom(), end - p.end_row(), "rank {rank}");
            assert_eq!(block.pixels(), row_pixels(2, first..end).as_slice(), "rank {rank}");
        }
    }

    #[test]
    fn test_edge_ranks_have_one_sided_context() {
        let blocks = exchange(9, 3, 1);
        assert_eq!(blocks[0].halo_top(), 0);
        assert_eq!(blocks[0].halo_bottom(), 1);
        assert_eq!(blocks[2].halo_top(), 1);
        assert_eq!(blocks[2].halo_bottom(), 0);
    }
}
