use crate::cell::{CellEpoch, CellId};
use bytes::Bytes;
use std::fmt;

/// CorrelationId is the client-supplied opaque token used to match a response to its request.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct CorrelationId(Bytes);

impl CorrelationId {
    pub fn new(id: Bytes) -> Self {
        CorrelationId(id)
    }

    pub fn from_static(id: &'static [u8]) -> Self {
        CorrelationId(Bytes::from_static(id))
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestHeader {
    // Required. Requests without one are rejected before anything else is checked.
    pub correlation_id: Option<CorrelationId>,
    pub cell_id: CellId,
    // The epoch of the cell as the client last saw it. Used to detect stale routing.
    pub cell_epoch: CellEpoch,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Request {
    Get { key: Bytes },
    Put { key: Bytes, value: Bytes },
    Delete { key: Bytes },
}

impl Request {
    pub fn key(&self) -> &Bytes {
        match self {
            Request::Get { key } => key,
            Request::Put { key, .. } => key,
            Request::Delete { key } => key,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Request::Get { .. })
    }
}

/// CmdRequest is one client command against a single cell. It's either entirely a read (every
/// operation is a `Get`), or a write that has to go through the raft log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CmdRequest {
    pub header: RequestHeader,
    pub requests: Vec<Request>,
}

impl CmdRequest {
    pub fn is_read_only(&self) -> bool {
        self.requests.iter().all(Request::is_read)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.requests.iter().map(Request::key)
    }
}
