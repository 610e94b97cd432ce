use crate::cell::Peer;
use crate::consensus::{Index, Term};
use crate::replica::ReadIndexToken;
use bytes::Bytes;
use tokio::time::Instant;

/// CurrentLeader is this replica's view of who leads its raft group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CurrentLeader {
    Me,
    Other(Peer),
    // Mid-election, or we haven't heard from a leader yet this term.
    Unknown,
}

/// ProposedEntry identifies where the consensus core placed a proposal in its log. The proposal
/// is only committed once the same (term, index) is reported as applied.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ProposedEntry {
    pub term: Term,
    pub index: Index,
}

/// AppliedEntry is the consensus core's notification that the entry at `index` (written in
/// `term`) is committed and applied to the state machine, as are all entries before it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AppliedEntry {
    pub term: Term,
    pub index: Index,
}

#[derive(Debug, thiserror::Error)]
pub enum ProposeError {
    #[error("I'm not leader")]
    NotLeader,

    #[error("Proposal rejected: {0}")]
    Rejected(String),
}

/// ConsensusCore is the per-cell raft group as seen by the replica's command executor.
///
/// None of these methods may block. Results of `request_read_index()` come back later as a
/// `read_index_ready` notification, and applied entries as an `applied` notification.
pub trait ConsensusCore {
    fn term(&self) -> Term;

    fn leader(&self) -> CurrentLeader;

    fn propose(&mut self, entry: Bytes) -> Result<ProposedEntry, ProposeError>;

    /// Ask raft to confirm the index that is safe to read from without appending to the log.
    /// `deadline` is advisory for the consensus core. The replica enforces it on its own side.
    fn request_read_index(&mut self, token: ReadIndexToken, deadline: Option<Instant>);
}
