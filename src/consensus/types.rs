use std::fmt;

/// Term is raft's logical clock for leadership.
#[derive(Copy, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Term(u64);

impl Term {
    pub fn new(term: u64) -> Self {
        Term(term)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, PartialOrd, PartialEq, Ord, Eq)]
struct U64NonZero(u64);

impl U64NonZero {
    fn new(val: u64) -> Self {
        assert_ne!(val, 0);
        U64NonZero(val)
    }
}

/// Index is an index of an entry in the raft log.
///
/// Log indexes start from 1. There is no entry at index 0, so "nothing applied yet" is modeled
/// as `Option<Index>::None`, never as `Index(0)`.
#[derive(Copy, Clone, PartialOrd, PartialEq, Ord, Eq)]
pub struct Index(U64NonZero);

impl Index {
    pub fn new(index: u64) -> Self {
        Index(U64NonZero::new(index))
    }

    pub fn as_u64(&self) -> u64 {
        self.0 .0
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 .0)
    }
}
