mod actor;
mod api;
mod cell;
mod consensus;
mod replica;
mod storage;
mod wire;
mod raftcmdpb {
    include!("../generated/raftcmdpb.rs");
}

pub use api::try_create_cell_replica;
pub use api::CellReplica;
pub use api::CellReplicaClient;
pub use api::CellReplicaConfig;
pub use api::CellReplicaCreationError;
pub use api::CellReplicaOptions;
pub use api::ConsensusEvents;
pub use cell::cell_metadata;
pub use cell::CellDescriptor;
pub use cell::CellEpoch;
pub use cell::CellId;
pub use cell::CellMetadataListener;
pub use cell::CellMetadataNotifier;
pub use cell::Peer;
pub use consensus::AppliedEntry;
pub use consensus::ConsensusCore;
pub use consensus::CurrentLeader;
pub use consensus::Index;
pub use consensus::ProposeError;
pub use consensus::ProposedEntry;
pub use consensus::Term;
pub use replica::CmdError;
pub use replica::CmdRequest;
pub use replica::CmdResponse;
pub use replica::CorrelationId;
pub use replica::PendingResponse;
pub use replica::ReadIndexToken;
pub use replica::Request;
pub use replica::RequestHeader;
pub use replica::Response;
pub use replica::ResponseHeader;
pub use replica::SubmitError;
pub use storage::InMemoryKv;
pub use storage::KvReader;
pub use wire::decode_entry;
pub use wire::decode_response;
pub use wire::encode_entry;
pub use wire::encode_response;
pub use wire::WireError;

// `crate::{root_mod}` holds no code. Only `mod` and `pub use` statements, and no `mod` is `pub`.
// Everything exported goes through an individual `pub use`.
