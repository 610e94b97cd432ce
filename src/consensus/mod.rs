//! The raft consensus core is an external collaborator. This mod only describes what the replica
//! needs from it, and what it tells the replica back (see `api::ConsensusEvents`).
mod core;
mod types;

pub use self::core::AppliedEntry;
pub use self::core::ConsensusCore;
pub use self::core::CurrentLeader;
pub use self::core::ProposeError;
pub use self::core::ProposedEntry;
pub use types::Index;
pub use types::Term;
