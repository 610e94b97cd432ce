use crate::consensus::Index;
use crate::replica::{Command, CorrelationId};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// ReadIndexToken correlates a read-index request sent to the consensus core with the read index
/// it later confirms. It's the correlation id of the command that triggered the read.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ReadIndexToken(CorrelationId);

impl ReadIndexToken {
    pub fn new(correlation_id: CorrelationId) -> Self {
        ReadIndexToken(correlation_id)
    }
}

/// ReadSeqNo identifies one entry in the queue. Unlike the token, it's never reused.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct ReadSeqNo(u64);

struct PendingRead {
    seq_no: ReadSeqNo,
    token: ReadIndexToken,
    // Filled in once the consensus core confirms the read index for `token`.
    read_index: Option<Index>,
    command: Command,
}

/// PendingReads holds read commands between issuing a read-index request and the confirmed
/// index being applied locally.
///
/// Entries leave in exactly the order they entered. The consensus core confirms read indexes in
/// non-decreasing order, so draining from the head until the first ineligible entry releases
/// every read that is safe to serve, and never lets a later read overtake an earlier one.
///
/// All methods take `&self`. The queue is the synchronization point between the request path
/// (`push`) and the apply-notification path (`drain`).
pub struct PendingReads {
    inner: Mutex<Inner>,
}

struct Inner {
    reads: VecDeque<PendingRead>,
    next_seq_no: u64,
}

impl PendingReads {
    pub fn new() -> Self {
        PendingReads {
            inner: Mutex::new(Inner {
                reads: VecDeque::new(),
                next_seq_no: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("PendingReads mutex guard poison")
    }

    pub fn push(&self, token: ReadIndexToken, command: Command) -> ReadSeqNo {
        let mut inner = self.lock();
        let seq_no = ReadSeqNo(inner.next_seq_no);
        inner.next_seq_no += 1;
        inner.reads.push_back(PendingRead {
            seq_no,
            token,
            read_index: None,
            command,
        });

        seq_no
    }

    /// Record the confirmed read index for the oldest unconfirmed read with this token. Returns
    /// false if there is no such read (e.g. it was already flushed by a leadership change).
    pub fn ready(&self, token: &ReadIndexToken, index: Index) -> bool {
        let mut inner = self.lock();
        let opt_read = inner
            .reads
            .iter_mut()
            .find(|read| read.read_index.is_none() && &read.token == token);

        match opt_read {
            Some(read) => {
                read.read_index.replace(index);
                true
            }
            None => false,
        }
    }

    /// Lazily pop, in FIFO order, every read whose confirmed read index is at or below
    /// `applied_index`. Stops at the first read that isn't eligible yet. Call again once more is
    /// applied to continue.
    pub fn drain(&self, applied_index: Index) -> DrainReady<'_> {
        DrainReady {
            queue: self,
            applied_index,
        }
    }

    /// Pop everything, confirmed or not, in FIFO order.
    pub fn drain_all(&self) -> Vec<Command> {
        self.lock().reads.drain(..).map(|read| read.command).collect()
    }

    /// Remove a single read, wherever it is in the queue.
    pub fn expire(&self, seq_no: ReadSeqNo) -> Option<Command> {
        let mut inner = self.lock();
        let position = inner.reads.iter().position(|read| read.seq_no == seq_no)?;

        inner.reads.remove(position).map(|read| read.command)
    }

    pub fn len(&self) -> usize {
        self.lock().reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().reads.is_empty()
    }
}

pub struct DrainReady<'a> {
    queue: &'a PendingReads,
    applied_index: Index,
}

impl Iterator for DrainReady<'_> {
    type Item = Command;

    // Lock per element, so a push from the request path isn't blocked for the whole drain.
    fn next(&mut self) -> Option<Command> {
        let mut inner = self.queue.lock();
        let head_is_eligible = match inner.reads.front() {
            Some(read) => matches!(read.read_index, Some(read_index) if read_index <= self.applied_index),
            None => false,
        };

        if head_is_eligible {
            inner.reads.pop_front().map(|read| read.command)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellEpoch, CellId};
    use crate::replica::{CmdRequest, Request, RequestHeader};
    use bytes::Bytes;
    use std::sync::Arc;

    fn cmd(id: &'static str) -> Command {
        Command::new(
            CmdRequest {
                header: RequestHeader {
                    correlation_id: Some(CorrelationId::from_static(id.as_bytes())),
                    cell_id: CellId::new(1),
                    cell_epoch: CellEpoch::new(1, 1),
                },
                requests: vec![Request::Get {
                    key: Bytes::from_static(b"k"),
                }],
            },
            None,
        )
    }

    fn token(id: &'static str) -> ReadIndexToken {
        ReadIndexToken::new(CorrelationId::from_static(id.as_bytes()))
    }

    fn push(queue: &PendingReads, id: &'static str) -> ReadSeqNo {
        queue.push(token(id), cmd(id))
    }

    fn ids<I: IntoIterator<Item = Command>>(commands: I) -> Vec<CorrelationId> {
        commands
            .into_iter()
            .map(|c| c.correlation_id().cloned().unwrap())
            .collect()
    }

    fn cid(id: &'static str) -> CorrelationId {
        CorrelationId::from_static(id.as_bytes())
    }

    #[test]
    fn drain_is_fifo() {
        let queue = PendingReads::new();
        push(&queue, "c1");
        push(&queue, "c2");
        push(&queue, "c3");
        assert!(queue.ready(&token("c1"), Index::new(3)));
        assert!(queue.ready(&token("c2"), Index::new(3)));
        assert!(queue.ready(&token("c3"), Index::new(4)));

        assert_eq!(ids(queue.drain(Index::new(10))), vec![cid("c1"), cid("c2"), cid("c3")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn partial_drain() {
        let queue = PendingReads::new();
        push(&queue, "c1");
        push(&queue, "c2");
        queue.ready(&token("c1"), Index::new(5));
        queue.ready(&token("c2"), Index::new(7));

        assert_eq!(ids(queue.drain(Index::new(6))), vec![cid("c1")]);
        assert_eq!(queue.len(), 1);

        assert_eq!(ids(queue.drain(Index::new(7))), vec![cid("c2")]);
        assert!(queue.is_empty());

        assert_eq!(queue.drain(Index::new(8)).count(), 0);
    }

    #[test]
    fn unconfirmed_head_blocks_later_reads() {
        let queue = PendingReads::new();
        push(&queue, "c1");
        push(&queue, "c2");
        queue.ready(&token("c2"), Index::new(2));

        assert_eq!(queue.drain(Index::new(100)).count(), 0);

        queue.ready(&token("c1"), Index::new(2));
        assert_eq!(ids(queue.drain(Index::new(100))), vec![cid("c1"), cid("c2")]);
    }

    #[test]
    fn duplicate_tokens_confirm_oldest_first() {
        let queue = PendingReads::new();
        let first = queue.push(token("dup"), cmd("first"));
        queue.push(token("dup"), cmd("second"));

        assert!(queue.ready(&token("dup"), Index::new(1)));
        assert!(queue.ready(&token("dup"), Index::new(2)));
        assert!(!queue.ready(&token("dup"), Index::new(3)));

        assert_eq!(ids(queue.drain(Index::new(1))), vec![cid("first")]);
        assert!(queue.expire(first).is_none());
        assert_eq!(ids(queue.drain(Index::new(2))), vec![cid("second")]);
    }

    #[test]
    fn ready_for_unknown_token() {
        let queue = PendingReads::new();
        push(&queue, "c1");

        assert!(!queue.ready(&token("nope"), Index::new(1)));
    }

    #[test]
    fn drain_all_flushes_everything_in_order() {
        let queue = PendingReads::new();
        push(&queue, "c1");
        push(&queue, "c2");
        queue.ready(&token("c1"), Index::new(9));

        assert_eq!(ids(queue.drain_all()), vec![cid("c1"), cid("c2")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn expire_removes_from_the_middle() {
        let queue = PendingReads::new();
        push(&queue, "c1");
        let c2 = push(&queue, "c2");
        push(&queue, "c3");

        let expired = queue.expire(c2).unwrap();
        assert_eq!(expired.correlation_id(), Some(&cid("c2")));
        assert!(queue.expire(c2).is_none());

        queue.ready(&token("c1"), Index::new(1));
        queue.ready(&token("c3"), Index::new(1));
        assert_eq!(ids(queue.drain(Index::new(1))), vec![cid("c1"), cid("c3")]);
    }

    #[test]
    fn concurrent_push_and_drain() {
        let queue = Arc::new(PendingReads::new());
        let num_reads = 1000u64;

        let producer = {
            let queue = queue.clone();
            std::thread::spawn(move || {
                for i in 0..num_reads {
                    let id = CorrelationId::new(Bytes::from(i.to_be_bytes().to_vec()));
                    let token = ReadIndexToken::new(id.clone());
                    let command = Command::new(
                        CmdRequest {
                            header: RequestHeader {
                                correlation_id: Some(id),
                                cell_id: CellId::new(1),
                                cell_epoch: CellEpoch::new(1, 1),
                            },
                            requests: vec![],
                        },
                        None,
                    );
                    queue.push(token.clone(), command);
                    queue.ready(&token, Index::new(i + 1));
                }
            })
        };

        let mut drained = Vec::with_capacity(num_reads as usize);
        while drained.len() < num_reads as usize {
            drained.extend(queue.drain(Index::new(num_reads)));
        }
        producer.join().unwrap();

        let expected: Vec<_> = (0..num_reads)
            .map(|i| CorrelationId::new(Bytes::from(i.to_be_bytes().to_vec())))
            .collect();
        assert_eq!(ids(drained), expected);
    }
}
