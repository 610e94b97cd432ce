//! Response envelope, and the only code path that builds one. Every terminal outcome of a command
//! goes through a builder here so the term and correlation id are stamped consistently.
use crate::cell::{CellDescriptor, CellId, Peer};
use crate::consensus::Term;
use crate::replica::CorrelationId;
use bytes::Bytes;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CmdResponse {
    pub header: ResponseHeader,
    // One per request operation, in the same order. Empty when `header.error` is set.
    pub responses: Vec<Response>,
}

impl CmdResponse {
    pub fn error(&self) -> Option<&CmdError> {
        self.header.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.header.error.is_none()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResponseHeader {
    pub correlation_id: Option<CorrelationId>,
    pub current_term: Term,
    pub error: Option<CmdError>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Response {
    Get { value: Option<Bytes> },
    Put,
    Delete,
}

/// CmdError is everything that can go wrong with a command, as the client sees it. Each variant
/// carries enough for the client to retry or re-route without another lookup.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CmdError {
    // Retry as-is.
    #[error("stale command")]
    StaleCommand,

    // Refresh routing from `new_cells` then retry.
    #[error("stale epoch")]
    StaleEpoch { new_cells: Vec<CellDescriptor> },

    // Retry against `leader`, or re-discover the leader if absent.
    #[error("NotLeader")]
    NotLeader { cell_id: CellId, leader: Option<Peer> },

    // Not retriable as-is. Shrink or split the write.
    #[error("entry is too large")]
    RaftEntryTooLarge { cell_id: CellId, entry_size: u64 },

    // Re-resolve routing.
    #[error("key not in cell")]
    KeyNotInCell {
        key: Bytes,
        cell_id: CellId,
        start_key: Bytes,
        end_key: Bytes,
    },

    // Re-resolve routing.
    #[error("cell not found")]
    CellNotFound { cell_id: CellId },

    #[error("{message}")]
    Other { message: String },
}

pub(crate) fn base_response(correlation_id: Option<&CorrelationId>, current_term: Term) -> CmdResponse {
    let mut resp = CmdResponse {
        header: ResponseHeader {
            correlation_id: None,
            current_term,
            error: None,
        },
        responses: Vec::new(),
    };
    fill_correlation_id(&mut resp, correlation_id);

    resp
}

/// Copy the correlation id into the envelope only if the envelope doesn't already carry one.
pub(crate) fn fill_correlation_id(resp: &mut CmdResponse, correlation_id: Option<&CorrelationId>) {
    if resp.header.correlation_id.is_none() {
        resp.header.correlation_id = correlation_id.cloned();
    }
}

pub(crate) fn success(
    correlation_id: Option<&CorrelationId>,
    current_term: Term,
    responses: Vec<Response>,
) -> CmdResponse {
    let mut resp = base_response(correlation_id, current_term);
    resp.responses = responses;
    resp
}

fn error_response(correlation_id: Option<&CorrelationId>, current_term: Term, err: CmdError) -> CmdResponse {
    let mut resp = base_response(correlation_id, current_term);
    resp.header.error = Some(err);
    resp
}

pub(crate) fn stale_command(correlation_id: Option<&CorrelationId>, current_term: Term) -> CmdResponse {
    error_response(correlation_id, current_term, CmdError::StaleCommand)
}

pub(crate) fn stale_epoch<I>(correlation_id: Option<&CorrelationId>, current_term: Term, new_cells: I) -> CmdResponse
where
    I: IntoIterator<Item = CellDescriptor>,
{
    error_response(
        correlation_id,
        current_term,
        CmdError::StaleEpoch {
            new_cells: new_cells.into_iter().collect(),
        },
    )
}

pub(crate) fn not_leader(
    correlation_id: Option<&CorrelationId>,
    current_term: Term,
    cell_id: CellId,
    leader: Option<Peer>,
) -> CmdResponse {
    error_response(correlation_id, current_term, CmdError::NotLeader { cell_id, leader })
}

pub(crate) fn raft_entry_too_large(
    correlation_id: Option<&CorrelationId>,
    current_term: Term,
    cell_id: CellId,
    entry_size: u64,
) -> CmdResponse {
    error_response(
        correlation_id,
        current_term,
        CmdError::RaftEntryTooLarge { cell_id, entry_size },
    )
}

pub(crate) fn key_not_in_cell(
    correlation_id: Option<&CorrelationId>,
    current_term: Term,
    key: Bytes,
    cell: &CellDescriptor,
) -> CmdResponse {
    error_response(
        correlation_id,
        current_term,
        CmdError::KeyNotInCell {
            key,
            cell_id: cell.id,
            start_key: cell.start_key.clone(),
            end_key: cell.end_key.clone(),
        },
    )
}

pub(crate) fn cell_not_found(correlation_id: Option<&CorrelationId>, current_term: Term, cell_id: CellId) -> CmdResponse {
    error_response(correlation_id, current_term, CmdError::CellNotFound { cell_id })
}

/// Catch-all for failures without a dedicated variant. The caller has no authoritative term or
/// request context here, so neither is filled in.
pub(crate) fn other_error<E: fmt::Display + ?Sized>(err: &E) -> CmdResponse {
    error_response(
        None,
        Term::default(),
        CmdError::Other {
            message: err.to_string(),
        },
    )
}
