use crate::distribution::domain::communicator::{ChannelId, CommError, Communicator};
use crate::partition::domain::partition_plan::PartitionPlan;
use crate::shared::constants::{GEOMETRY_BYTES, ROOT_RANK};
use crate::shared::image::Image;
use crate::shared::pixel::{self, Pixel};

/// Image dimensions agreed on by every rank at the start of a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn of(image: &Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    fn encode(&self) -> [u8; GEOMETRY_BYTES] {
        let mut buf = [0u8; GEOMETRY_BYTES];
        buf[..4].copy_from_slice(&self.width.to_le_bytes());
        buf[4..].copy_from_slice(&self.height.to_le_bytes());
        buf
    }

    fn decode(buf: &[u8; GEOMETRY_BYTES]) -> Self {
        let [w0, w1, w2, w3, h0, h1, h2, h3] = *buf;
        Self {
            width: u32::from_le_bytes([w0, w1, w2, w3]),
            height: u32::from_le_bytes([h0, h1, h2, h3]),
        }
    }
}

/// Moves image rows between the root rank and the workers.
///
/// Rows of the transfer group travel through a uniform scatter/gather; the
/// remainder owner's block goes point-to-point on its own channel in each
/// direction. Every method is called by every rank in the same order.
pub struct DistributionChannel<'a, C: Communicator + ?Sized> {
    comm: &'a C,
}

impl<'a, C: Communicator + ?Sized> DistributionChannel<'a, C> {
    pub fn new(comm: &'a C) -> Self {
        Self { comm }
    }

    /// Root passes the geometry, the other ranks pass `None` and receive it.
    pub fn broadcast_geometry(&self, geometry: Option<Geometry>) -> Result<Geometry, CommError> {
        let mut buf = geometry.map(|g| g.encode()).unwrap_or_default();
        self.comm.broadcast(ROOT_RANK, &mut buf)?;
        Ok(Geometry::decode(&buf))
    }

    /// Delivers each rank its own rows. `image` is only read on the root.
    pub fn scatter_rows(
        &self,
        plan: &PartitionPlan,
        width: usize,
        image: Option<&Image>,
    ) -> Result<Vec<Pixel>, CommError> {
        let rank = self.comm.rank();
        let own = plan.partition(rank);
        let mut local = vec![Pixel::default(); own.row_count * width];
        let source = image.map(Image::bytes).unwrap_or_default();

        let group = plan.transfer_group();
        if group.contains(rank) {
            let send = if rank == ROOT_RANK {
                Some(slice_prefix(source, collective_bytes(plan, width), "scatter")?)
            } else {
                None
            };
            self.comm
                .scatter(&group, ROOT_RANK, send, pixel::as_bytes_mut(&mut local))?;
        }

        let owner = plan.remainder_owner();
        if rank == ROOT_RANK {
            let range = plan.partition(owner).byte_range(width);
            let block = source.get(range.clone()).ok_or(CommError::ExtentMismatch {
                operation: "remainder scatter",
                expected: range.end,
                actual: source.len(),
            })?;
            self.comm.send(owner, ChannelId::RemainderScatter, block)?;
        }
        if rank == owner {
            self.comm.receive(
                ROOT_RANK,
                ChannelId::RemainderScatter,
                pixel::as_bytes_mut(&mut local),
            )?;
        }

        log::debug!(
            "Rank {rank} holds rows {}..{}",
            own.start_row,
            own.end_row()
        );
        Ok(local)
    }

    /// Returns each rank's processed rows into `image` on the root, at their
    /// original offsets.
    pub fn gather_rows(
        &self,
        plan: &PartitionPlan,
        width: usize,
        rows: &[Pixel],
        mut image: Option<&mut Image>,
    ) -> Result<(), CommError> {
        let rank = self.comm.rank();
        let send = pixel::as_bytes(rows);

        let group = plan.transfer_group();
        if group.contains(rank) {
            let recv = match image.as_deref_mut() {
                Some(img) if rank == ROOT_RANK => Some(slice_prefix_mut(
                    img.bytes_mut(),
                    collective_bytes(plan, width),
                    "gather",
                )?),
                _ => None,
            };
            self.comm.gather(&group, ROOT_RANK, send, recv)?;
        }

        let owner = plan.remainder_owner();
        if rank == owner {
            self.comm.send(ROOT_RANK, ChannelId::RemainderGather, send)?;
        }
        if rank == ROOT_RANK {
            let range = plan.partition(owner).byte_range(width);
            let target = image.map(Image::bytes_mut).unwrap_or_default();
            let available = target.len();
            let slot = target.get_mut(range.clone()).ok_or(CommError::ExtentMismatch {
                operation: "remainder gather",
                expected: range.end,
                actual: available,
            })?;
            self.comm.receive(owner, ChannelId::RemainderGather, slot)?;
        }
        Ok(())
    }
}

fn collective_bytes(plan: &PartitionPlan, width: usize) -> usize {
    plan.collective_rows() * width * Pixel::SIZE
}

fn slice_prefix<'b>(
    buf: &'b [u8],
    len: usize,
    operation: &'static str,
) -> Result<&'b [u8], CommError> {
    buf.get(..len).ok_or(CommError::ExtentMismatch {
        operation,
        expected: len,
        actual: buf.len(),
    })
}

fn slice_prefix_mut<'b>(
    buf: &'b mut [u8],
    len: usize,
    operation: &'static str,
) -> Result<&'b mut [u8], CommError> {
    let actual = buf.len();
    buf.get_mut(..len).ok_or(CommError::ExtentMismatch {
        operation,
        expected: len,
        actual,
    })
}
