use crate::consensus::{AppliedEntry, ProposedEntry};
use crate::replica::Command;
use std::collections::VecDeque;

/// PendingWrites tracks write commands that were accepted by the consensus core but aren't
/// applied yet. Proposals are handed out with strictly increasing indexes, so a FIFO is enough.
pub(crate) struct PendingWrites {
    writes: VecDeque<(ProposedEntry, Command)>,
}

/// How an applied entry resolves one pending write.
#[derive(Debug)]
pub(crate) enum WriteOutcome {
    Applied(Command),
    // Proposed in another term. The log position was likely taken over by another leader's entry.
    Stale(Command),
}

impl PendingWrites {
    pub(crate) fn new() -> Self {
        PendingWrites {
            writes: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, proposed: ProposedEntry, command: Command) {
        self.writes.push_back((proposed, command));
    }

    /// Resolve every pending write at or below `applied.index`. The applied entry vouches for every
    /// entry before it in the same term, so notifications may be coalesced.
    pub(crate) fn resolve(&mut self, applied: AppliedEntry) -> Vec<WriteOutcome> {
        let mut outcomes = Vec::new();
        while let Some((proposed, _)) = self.writes.front() {
            if proposed.index > applied.index {
                break;
            }

            let is_committed = proposed.term == applied.term;
            if let Some((_, command)) = self.writes.pop_front() {
                if is_committed {
                    outcomes.push(WriteOutcome::Applied(command));
                } else {
                    outcomes.push(WriteOutcome::Stale(command));
                }
            }
        }

        outcomes
    }

    pub(crate) fn drain_all(&mut self) -> Vec<Command> {
        self.writes.drain(..).map(|(_, command)| command).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellEpoch, CellId};
    use crate::consensus::{Index, Term};
    use crate::replica::{CmdRequest, CorrelationId, RequestHeader};

    fn cmd(id: &'static str) -> Command {
        Command::new(
            CmdRequest {
                header: RequestHeader {
                    correlation_id: Some(CorrelationId::from_static(id.as_bytes())),
                    cell_id: CellId::new(1),
                    cell_epoch: CellEpoch::new(1, 1),
                },
                requests: vec![],
            },
            None,
        )
    }

    fn entry(term: u64, index: u64) -> ProposedEntry {
        ProposedEntry {
            term: Term::new(term),
            index: Index::new(index),
        }
    }

    fn applied(term: u64, index: u64) -> AppliedEntry {
        AppliedEntry {
            term: Term::new(term),
            index: Index::new(index),
        }
    }

    fn describe(outcomes: Vec<WriteOutcome>) -> Vec<(bool, CorrelationId)> {
        outcomes
            .into_iter()
            .map(|o| match o {
                WriteOutcome::Applied(c) => (true, c.correlation_id().cloned().unwrap()),
                WriteOutcome::Stale(c) => (false, c.correlation_id().cloned().unwrap()),
            })
            .collect()
    }

    #[test]
    fn matching_entry_is_applied() {
        let mut writes = PendingWrites::new();
        writes.push(entry(2, 5), cmd("w1"));
        writes.push(entry(2, 6), cmd("w2"));

        assert_eq!(
            describe(writes.resolve(applied(2, 5))),
            vec![(true, CorrelationId::from_static(b"w1"))]
        );
        assert_eq!(writes.len(), 1);
    }

    #[test]
    fn entry_from_other_term_is_stale() {
        let mut writes = PendingWrites::new();
        writes.push(entry(2, 5), cmd("w1"));

        assert_eq!(
            describe(writes.resolve(applied(3, 5))),
            vec![(false, CorrelationId::from_static(b"w1"))]
        );
    }

    #[test]
    fn coalesced_notification_applies_earlier_writes_of_same_term() {
        let mut writes = PendingWrites::new();
        writes.push(entry(5, 11), cmd("w1"));
        writes.push(entry(5, 12), cmd("w2"));
        writes.push(entry(5, 14), cmd("w3"));

        assert_eq!(
            describe(writes.resolve(applied(5, 12))),
            vec![
                (true, CorrelationId::from_static(b"w1")),
                (true, CorrelationId::from_static(b"w2")),
            ]
        );
        assert_eq!(writes.len(), 1);
    }

    #[test]
    fn earlier_writes_of_other_term_are_stale() {
        let mut writes = PendingWrites::new();
        writes.push(entry(2, 5), cmd("w1"));
        writes.push(entry(3, 6), cmd("w2"));
        writes.push(entry(3, 9), cmd("w3"));

        assert_eq!(
            describe(writes.resolve(applied(3, 6))),
            vec![
                (false, CorrelationId::from_static(b"w1")),
                (true, CorrelationId::from_static(b"w2")),
            ]
        );
        assert_eq!(writes.drain_all().len(), 1);
        assert_eq!(writes.len(), 0);
    }
}
