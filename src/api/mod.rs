//! This mod is meant to hold most of the code for the library's client-facing API.
mod client;
mod options;
mod wiring;

pub use client::CellReplica;
pub use client::CellReplicaClient;
pub use client::ConsensusEvents;
pub use options::CellReplicaOptions;
pub use wiring::try_create_cell_replica;
pub use wiring::CellReplicaConfig;
pub use wiring::CellReplicaCreationError;
