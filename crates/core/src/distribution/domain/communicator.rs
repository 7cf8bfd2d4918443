use thiserror::Error;

use crate::distribution::domain::rank_group::RankGroup;

/// Point-to-point channel of one logical exchange.
///
/// Each direction of each exchange has its own id so a receive can never
/// match a message belonging to another exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Root to remainder owner: the owner's unprocessed block.
    RemainderScatter,
    /// Remainder owner to root: the owner's processed block.
    RemainderGather,
    /// Rank `r` to `r + 1`: context rows above the receiver.
    HaloDown,
    /// Rank `r` to `r - 1`: context rows below the receiver.
    HaloUp,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("job aborted by another rank")]
    Aborted,
    #[error("rank {rank} is no longer reachable")]
    Disconnected { rank: usize },
    #[error("rank {rank} out of range for a group of {size} ranks")]
    RankOutOfRange { rank: usize, size: usize },
    #[error("rank {rank} is not a member of the collective group")]
    NotAMember { rank: usize },
    #[error("{operation}: expected {expected} bytes, got {actual}")]
    ExtentMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("rank {rank} panicked")]
    RankPanicked { rank: usize },
}

/// Message-passing transport seen by one rank.
///
/// Rank identity and group membership are explicit here rather than
/// process globals. Collectives block until every member of the group has
/// made the matching call; ranks outside the group do not take part.
pub trait Communicator: Send {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Copies `buf` from `root` into `buf` on every rank. All ranks call
    /// this with buffers of the same length.
    fn broadcast(&self, root: usize, buf: &mut [u8]) -> Result<(), CommError>;

    /// Splits `send` (root only) into `group.len()` equal chunks and
    /// delivers chunk `i` into `recv` on `group.members()[i]`.
    fn scatter(
        &self,
        group: &RankGroup,
        root: usize,
        send: Option<&[u8]>,
        recv: &mut [u8],
    ) -> Result<(), CommError>;

    /// Inverse of [`Communicator::scatter`]: concatenates every member's
    /// `send` into `recv` on root, in group order.
    fn gather(
        &self,
        group: &RankGroup,
        root: usize,
        send: &[u8],
        recv: Option<&mut [u8]>,
    ) -> Result<(), CommError>;

    fn send(&self, dest: usize, channel: ChannelId, buf: &[u8]) -> Result<(), CommError>;

    /// Blocks until the message from `source` on `channel` arrives. Its
    /// length must equal `buf.len()`.
    fn receive(&self, source: usize, channel: ChannelId, buf: &mut [u8])
        -> Result<(), CommError>;
}
