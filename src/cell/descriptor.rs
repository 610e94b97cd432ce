use bytes::Bytes;
use std::fmt;

/// CellId identifies a cell, i.e. one raft group covering a contiguous key range.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellId(u64);

impl CellId {
    pub fn new(id: u64) -> Self {
        CellId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CellEpoch is bumped whenever a cell's membership (`conf_ver`) or key range (`cell_ver`)
/// changes. Both components only ever increase.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CellEpoch {
    pub conf_ver: u64,
    pub cell_ver: u64,
}

impl CellEpoch {
    pub fn new(conf_ver: u64, cell_ver: u64) -> Self {
        CellEpoch { conf_ver, cell_ver }
    }

    /// A request's epoch is stale if the cell has since had a conf change or a split/merge.
    pub fn is_stale_against(&self, current: &CellEpoch) -> bool {
        self.conf_ver < current.conf_ver || self.cell_ver < current.cell_ver
    }
}

/// Peer is one replica of a cell, hosted on a store (node).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Peer {
    pub id: u64,
    pub store_id: u64,
}

impl Peer {
    pub fn new(id: u64, store_id: u64) -> Self {
        Peer { id, store_id }
    }
}

/// CellDescriptor is everything a client needs to route requests to a cell. The key range is
/// `[start_key, end_key)`. An empty `end_key` means the range is unbounded above.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellDescriptor {
    pub id: CellId,
    pub start_key: Bytes,
    pub end_key: Bytes,
    pub epoch: CellEpoch,
    pub peers: Vec<Peer>,
}

impl CellDescriptor {
    pub fn contains_key(&self, key: &[u8]) -> bool {
        key >= self.start_key.as_ref() && (self.end_key.is_empty() || key < self.end_key.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(start: &'static [u8], end: &'static [u8]) -> CellDescriptor {
        CellDescriptor {
            id: CellId::new(1),
            start_key: Bytes::from_static(start),
            end_key: Bytes::from_static(end),
            epoch: CellEpoch::new(1, 1),
            peers: vec![Peer::new(1, 1)],
        }
    }

    #[test]
    fn key_range_is_half_open() {
        let c = cell(b"b", b"d");

        assert!(!c.contains_key(b"a"));
        assert!(c.contains_key(b"b"));
        assert!(c.contains_key(b"c"));
        assert!(c.contains_key(b"czzz"));
        assert!(!c.contains_key(b"d"));
    }

    #[test]
    fn empty_end_key_is_unbounded() {
        let c = cell(b"", b"");
        assert!(c.contains_key(b""));
        assert!(c.contains_key(b"\xff\xff\xff"));

        let c = cell(b"m", b"");
        assert!(!c.contains_key(b"a"));
        assert!(c.contains_key(b"zzz"));
    }

    #[test]
    fn epoch_staleness() {
        let current = CellEpoch::new(3, 5);

        assert!(!CellEpoch::new(3, 5).is_stale_against(&current));
        assert!(!CellEpoch::new(4, 6).is_stale_against(&current));
        assert!(CellEpoch::new(2, 5).is_stale_against(&current));
        assert!(CellEpoch::new(3, 4).is_stale_against(&current));
    }
}
