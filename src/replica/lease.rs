use crate::consensus::Term;
use tokio::time::Instant;

/// Lease is a time-bounded promise, handed to us by the consensus core, that we are still leader
/// for `term` and have applied everything committed as of when it was granted. While it holds,
/// reads can be served locally without a read-index round trip.
#[derive(Debug)]
pub(crate) struct Lease {
    state: LeaseState,
}

#[derive(Debug)]
enum LeaseState {
    Invalid,
    Valid { term: Term, expires_at: Instant },
}

impl Lease {
    pub(crate) fn new() -> Self {
        Lease {
            state: LeaseState::Invalid,
        }
    }

    /// Renewals for an older term are ignored, and a renewal never shortens a lease within the
    /// same term.
    pub(crate) fn renew(&mut self, term: Term, expires_at: Instant) -> bool {
        let accept = match self.state {
            LeaseState::Invalid => true,
            LeaseState::Valid {
                term: current_term,
                expires_at: current_expiry,
            } => term > current_term || (term == current_term && expires_at > current_expiry),
        };

        if accept {
            self.state = LeaseState::Valid { term, expires_at };
        }

        accept
    }

    pub(crate) fn invalidate(&mut self) {
        self.state = LeaseState::Invalid;
    }

    pub(crate) fn is_valid(&self, current_term: Term, now: Instant) -> bool {
        match self.state {
            LeaseState::Invalid => false,
            LeaseState::Valid { term, expires_at } => term == current_term && now < expires_at,
        }
    }
}
