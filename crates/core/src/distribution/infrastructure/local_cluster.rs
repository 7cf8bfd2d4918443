use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{Receiver, Sender};

use crate::distribution::domain::communicator::{ChannelId, CommError, Communicator};
use crate::distribution::domain::rank_group::RankGroup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Broadcast,
    Scatter,
    Gather,
    Channel(ChannelId),
}

struct Envelope {
    source: usize,
    tag: Tag,
    payload: Vec<u8>,
}

/// Bootstraps a fixed-size group of ranks inside one process.
///
/// Each rank runs on its own thread and owns a [`LocalCommunicator`]. Ranks
/// share nothing but their mailboxes: every transfer moves an owned byte
/// vector through a `crossbeam_channel`.
pub struct LocalCluster;

impl LocalCluster {
    /// Runs `job` once per rank and returns the per-rank results in rank order.
    ///
    /// The first rank to fail (error or panic) aborts the job: every rank
    /// still blocked in a receive gets [`CommError::Aborted`]. The error of
    /// the failing rank is returned.
    pub fn launch<T, E, F>(size: usize, job: F) -> Result<Vec<T>, E>
    where
        T: Send,
        E: From<CommError> + Send,
        F: Fn(LocalCommunicator) -> Result<T, E> + Sync,
    {
        let (abort_tx, abort_rx) = crossbeam_channel::bounded::<()>(0);
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, Result<T, E>)>();
        let comms = communicators(size, abort_rx);
        log::debug!("Launching local cluster with {size} ranks");

        std::thread::scope(|scope| {
            for comm in comms {
                let done_tx = done_tx.clone();
                let job = &job;
                scope.spawn(move || {
                    let rank = comm.rank();
                    let result = panic::catch_unwind(AssertUnwindSafe(|| job(comm)))
                        .unwrap_or_else(|_| Err(CommError::RankPanicked { rank }.into()));
                    let _ = done_tx.send((rank, result));
                });
            }
            drop(done_tx);

            let mut abort_tx = Some(abort_tx);
            let mut first_error: Option<E> = None;
            let mut results: Vec<Option<T>> = (0..size).map(|_| None).collect();

            for (rank, result) in done_rx {
                match result {
                    Ok(value) => results[rank] = Some(value),
                    Err(e) => {
                        if abort_tx.take().is_some() {
                            log::debug!("Rank {rank} failed, aborting remaining ranks");
                        }
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(results.into_iter().flatten().collect()),
            }
        })
    }
}

fn communicators(size: usize, abort: Receiver<()>) -> Vec<LocalCommunicator> {
    let (senders, receivers): (Vec<Sender<Envelope>>, Vec<Receiver<Envelope>>) =
        (0..size).map(|_| crossbeam_channel::unbounded()).unzip();

    receivers
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| LocalCommunicator {
            rank,
            mailboxes: senders.clone(),
            inbox,
            abort: abort.clone(),
            pending: RefCell::new(Vec::new()),
        })
        .collect()
}

/// One rank's endpoint in a [`LocalCluster`].
///
/// Sends never block (mailboxes are unbounded). Receives match on
/// `(source, tag)` and stash anything else, so messages from one source
/// with one tag are delivered in the order they were sent.
pub struct LocalCommunicator {
    rank: usize,
    mailboxes: Vec<Sender<Envelope>>,
    inbox: Receiver<Envelope>,
    abort: Receiver<()>,
    pending: RefCell<Vec<Envelope>>,
}

impl LocalCommunicator {
    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank >= self.mailboxes.len() {
            return Err(CommError::RankOutOfRange {
                rank,
                size: self.mailboxes.len(),
            });
        }
        Ok(())
    }

    fn check_membership(&self, group: &RankGroup, root: usize) -> Result<(), CommError> {
        self.check_rank(root)?;
        for rank in [self.rank, root] {
            if !group.contains(rank) {
                return Err(CommError::NotAMember { rank });
            }
        }
        Ok(())
    }

    fn post(&self, dest: usize, tag: Tag, payload: Vec<u8>) -> Result<(), CommError> {
        self.mailboxes[dest]
            .send(Envelope {
                source: self.rank,
                tag,
                payload,
            })
            .map_err(|_| CommError::Disconnected { rank: dest })
    }

    fn take(&self, source: usize, tag: Tag) -> Result<Vec<u8>, CommError> {
        {
            let mut pending = self.pending.borrow_mut();
            if let Some(pos) = pending
                .iter()
                .position(|e| e.source == source && e.tag == tag)
            {
                return Ok(pending.remove(pos).payload);
            }
        }

        loop {
            crossbeam_channel::select! {
                recv(self.inbox) -> msg => {
                    let envelope = msg.map_err(|_| CommError::Disconnected { rank: source })?;
                    if envelope.source == source && envelope.tag == tag {
                        return Ok(envelope.payload);
                    }
                    self.pending.borrow_mut().push(envelope);
                }
                recv(self.abort) -> _ => return Err(CommError::Aborted),
            }
        }
    }

    fn take_into(
        &self,
        source: usize,
        tag: Tag,
        operation: &'static str,
        buf: &mut [u8],
    ) -> Result<(), CommError> {
        let payload = self.take(source, tag)?;
        copy_exact(operation, &payload, buf)
    }
}

fn copy_exact(operation: &'static str, src: &[u8], dst: &mut [u8]) -> Result<(), CommError> {
    if src.len() != dst.len() {
        return Err(CommError::ExtentMismatch {
            operation,
            expected: dst.len(),
            actual: src.len(),
        });
    }
    dst.copy_from_slice(src);
    Ok(())
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.mailboxes.len()
    }

    fn broadcast(&self, root: usize, buf: &mut [u8]) -> Result<(), CommError> {
        self.check_rank(root)?;
        if self.rank == root {
            for dest in (0..self.size()).filter(|&d| d != root) {
                self.post(dest, Tag::Broadcast, buf.to_vec())?;
            }
            Ok(())
        } else {
            self.take_into(root, Tag::Broadcast, "broadcast", buf)
        }
    }

    fn scatter(
        &self,
        group: &RankGroup,
        root: usize,
        send: Option<&[u8]>,
        recv: &mut [u8],
    ) -> Result<(), CommError> {
        self.check_membership(group, root)?;
        if self.rank != root {
            return self.take_into(root, Tag::Scatter, "scatter", recv);
        }

        let chunk = recv.len();
        let send = send.unwrap_or_default();
        if send.len() != chunk * group.len() {
            return Err(CommError::ExtentMismatch {
                operation: "scatter",
                expected: chunk * group.len(),
                actual: send.len(),
            });
        }
        for (i, &member) in group.members().iter().enumerate() {
            let piece = &send[i * chunk..(i + 1) * chunk];
            if member == root {
                recv.copy_from_slice(piece);
            } else {
                self.post(member, Tag::Scatter, piece.to_vec())?;
            }
        }
        Ok(())
    }

    fn gather(
        &self,
        group: &RankGroup,
        root: usize,
        send: &[u8],
        recv: Option<&mut [u8]>,
    ) -> Result<(), CommError> {
        self.check_membership(group, root)?;
        if self.rank != root {
            return self.post(root, Tag::Gather, send.to_vec());
        }

        let chunk = send.len();
        let recv = recv.unwrap_or_default();
        if recv.len() != chunk * group.len() {
            return Err(CommError::ExtentMismatch {
                operation: "gather",
                expected: chunk * group.len(),
                actual: recv.len(),
            });
        }
        for (i, &member) in group.members().iter().enumerate() {
            let slot = &mut recv[i * chunk..(i + 1) * chunk];
            if member == root {
                slot.copy_from_slice(send);
            } else {
                self.take_into(member, Tag::Gather, "gather", slot)?;
            }
        }
        Ok(())
    }

    fn send(&self, dest: usize, channel: ChannelId, buf: &[u8]) -> Result<(), CommError> {
        self.check_rank(dest)?;
        self.post(dest, Tag::Channel(channel), buf.to_vec())
    }

    fn receive(
        &self,
        source: usize,
        channel: ChannelId,
        buf: &mut [u8],
    ) -> Result<(), CommError> {
        self.check_rank(source)?;
        self.take_into(source, Tag::Channel(channel), "receive", buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_returns_results_in_rank_order() {
        let ranks = LocalCluster::launch(4, |comm| Ok::<_, CommError>(comm.rank())).unwrap();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_broadcast_reaches_every_rank() {
        let seen = LocalCluster::launch(3, |comm| {
            let mut buf = if comm.rank() == 1 { [7u8, 8, 9] } else { [0u8; 3] };
            comm.broadcast(1, &mut buf)?;
            Ok::<_, CommError>(buf)
        })
        .unwrap();
        assert!(seen.iter().all(|b| b == &[7, 8, 9]));
    }

    #[test]
    fn test_scatter_then_gather_restores_source() {
        let source: Vec<u8> = (0..12).collect();
        let results = LocalCluster::launch(4, |comm| {
            let group = RankGroup::new(vec![0, 1, 2]);
            if !group.contains(comm.rank()) {
                return Ok::<_, CommError>(None);
            }
            let mut chunk = [0u8; 4];
            let send = (comm.rank() == 0).then_some(source.as_slice());
            comm.scatter(&group, 0, send, &mut chunk)?;
            for b in &mut chunk {
                *b += 100;
            }
            let mut out = vec![0u8; 12];
            let recv = (comm.rank() == 0).then_some(out.as_mut_slice());
            comm.gather(&group, 0, &chunk, recv)?;
            Ok(Some(out))
        })
        .unwrap();

        let expected: Vec<u8> = (100..112).collect();
        assert_eq!(results[0].as_deref(), Some(expected.as_slice()));
        assert!(results[3].is_none());
    }

    #[test]
    fn test_receive_matches_channel_not_arrival_order() {
        let results = LocalCluster::launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, ChannelId::HaloUp, &[1])?;
                comm.send(1, ChannelId::HaloDown, &[2])?;
                Ok::<_, CommError>((0, 0))
            } else {
                let mut down = [0u8];
                let mut up = [0u8];
                comm.receive(0, ChannelId::HaloDown, &mut down)?;
                comm.receive(0, ChannelId::HaloUp, &mut up)?;
                Ok((down[0], up[0]))
            }
        })
        .unwrap();
        assert_eq!(results[1], (2, 1));
    }

    #[test]
    fn test_self_send_with_single_rank() {
        let results = LocalCluster::launch(1, |comm| {
            comm.send(0, ChannelId::RemainderScatter, &[5, 6])?;
            let mut buf = [0u8; 2];
            comm.receive(0, ChannelId::RemainderScatter, &mut buf)?;
            Ok::<_, CommError>(buf)
        })
        .unwrap();
        assert_eq!(results, vec![[5, 6]]);
    }

    #[test]
    fn test_zero_length_messages_are_delivered() {
        let results = LocalCluster::launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, ChannelId::RemainderGather, &[])?;
            } else {
                comm.receive(0, ChannelId::RemainderGather, &mut [])?;
            }
            Ok::<_, CommError>(())
        });
        assert!(results.is_ok());
    }

    #[test]
    fn test_receive_length_mismatch_is_reported() {
        let err = LocalCluster::launch(2, |comm| {
            if comm.rank() == 0 {
                comm.send(1, ChannelId::RemainderScatter, &[1, 2, 3])
            } else {
                comm.receive(0, ChannelId::RemainderScatter, &mut [0u8; 2])
            }
        })
        .unwrap_err();
        assert_eq!(
            err,
            CommError::ExtentMismatch {
                operation: "receive",
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_scatter_rejects_uneven_source() {
        let err = LocalCluster::launch(1, |comm| {
            let group = RankGroup::new(vec![0]);
            comm.scatter(&group, 0, Some(&[1, 2, 3]), &mut [0u8; 2])
        })
        .unwrap_err();
        assert!(matches!(err, CommError::ExtentMismatch { operation: "scatter", .. }));
    }

    #[test]
    fn test_collective_outside_group_is_rejected() {
        let err = LocalCluster::launch(2, |comm| {
            let group = RankGroup::new(vec![0]);
            if comm.rank() == 1 {
                comm.scatter(&group, 0, None, &mut [])
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert_eq!(err, CommError::NotAMember { rank: 1 });
    }

    #[test]
    fn test_unknown_destination_is_rejected() {
        let err = LocalCluster::launch(2, |comm| comm.send(5, ChannelId::HaloDown, &[]))
            .unwrap_err();
        assert_eq!(err, CommError::RankOutOfRange { rank: 5, size: 2 });
    }

    #[test]
    fn test_failing_rank_aborts_blocked_ranks() {
        let err = LocalCluster::launch(3, |comm| {
            if comm.rank() == 0 {
                return Err(CommError::Disconnected { rank: 42 });
            }
            let mut buf = [0u8; 8];
            comm.broadcast(0, &mut buf)
        })
        .unwrap_err();
        assert_eq!(err, CommError::Disconnected { rank: 42 });
    }

    #[test]
    fn test_panicking_rank_aborts_job() {
        let err = LocalCluster::launch(2, |comm| {
            if comm.rank() == 1 {
                panic!("worker failure");
            }
            comm.receive(1, ChannelId::RemainderGather, &mut [0u8; 4])
        })
        .unwrap_err();
        assert_eq!(err, CommError::RankPanicked { rank: 1 });
    }
}
