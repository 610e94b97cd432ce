// ------- Cell metadata -------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPeer {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub store_id: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCellEpoch {
    #[prost(uint64, tag = "1")]
    pub conf_ver: u64,
    #[prost(uint64, tag = "2")]
    pub cell_ver: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCell {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub start_key: ::prost::alloc::vec::Vec<u8>,
    /// Empty means unbounded.
    #[prost(bytes = "vec", tag = "3")]
    pub end_key: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "4")]
    pub epoch: ::core::option::Option<ProtoCellEpoch>,
    #[prost(message, repeated, tag = "5")]
    pub peers: ::prost::alloc::vec::Vec<ProtoPeer>,
}
// ------- Request -------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRequestHeader {
    /// Empty means the client did not supply one.
    #[prost(bytes = "vec", tag = "1")]
    pub uuid: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub cell_id: u64,
    #[prost(message, optional, tag = "3")]
    pub cell_epoch: ::core::option::Option<ProtoCellEpoch>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGet {
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPut {
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDelete {
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRequest {
    #[prost(oneof = "proto_request::Op", tags = "1, 2, 3")]
    pub op: ::core::option::Option<proto_request::Op>,
}
/// Nested message and enum types in `ProtoRequest`.
pub mod proto_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Op {
        #[prost(message, tag = "1")]
        Get(super::ProtoGet),
        #[prost(message, tag = "2")]
        Put(super::ProtoPut),
        #[prost(message, tag = "3")]
        Delete(super::ProtoDelete),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCmdRequest {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ProtoRequestHeader>,
    #[prost(message, repeated, tag = "2")]
    pub requests: ::prost::alloc::vec::Vec<ProtoRequest>,
}
// ------- Response -------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStaleCommand {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStaleEpoch {
    #[prost(message, repeated, tag = "1")]
    pub new_cells: ::prost::alloc::vec::Vec<ProtoCell>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoNotLeader {
    #[prost(uint64, tag = "1")]
    pub cell_id: u64,
    /// Absent when the replica doesn't know who the leader is.
    #[prost(message, optional, tag = "2")]
    pub leader: ::core::option::Option<ProtoPeer>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRaftEntryTooLarge {
    #[prost(uint64, tag = "1")]
    pub cell_id: u64,
    #[prost(uint64, tag = "2")]
    pub entry_size: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoKeyNotInCell {
    #[prost(bytes = "vec", tag = "1")]
    pub key: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub cell_id: u64,
    #[prost(bytes = "vec", tag = "3")]
    pub start_key: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub end_key: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCellNotFound {
    #[prost(uint64, tag = "1")]
    pub cell_id: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoError {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
    #[prost(oneof = "proto_error::Kind", tags = "2, 3, 4, 5, 6, 7")]
    pub kind: ::core::option::Option<proto_error::Kind>,
}
/// Nested message and enum types in `ProtoError`.
pub mod proto_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "2")]
        StaleCommand(super::ProtoStaleCommand),
        #[prost(message, tag = "3")]
        StaleEpoch(super::ProtoStaleEpoch),
        #[prost(message, tag = "4")]
        NotLeader(super::ProtoNotLeader),
        #[prost(message, tag = "5")]
        RaftEntryTooLarge(super::ProtoRaftEntryTooLarge),
        #[prost(message, tag = "6")]
        KeyNotInCell(super::ProtoKeyNotInCell),
        #[prost(message, tag = "7")]
        CellNotFound(super::ProtoCellNotFound),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoResponseHeader {
    #[prost(bytes = "vec", tag = "1")]
    pub uuid: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub current_term: u64,
    /// Absent on success.
    #[prost(message, optional, tag = "3")]
    pub error: ::core::option::Option<ProtoError>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetResult {
    #[prost(bool, tag = "1")]
    pub found: bool,
    #[prost(bytes = "vec", tag = "2")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPutResult {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDeleteResult {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoResponse {
    #[prost(oneof = "proto_response::Outcome", tags = "1, 2, 3")]
    pub outcome: ::core::option::Option<proto_response::Outcome>,
}
/// Nested message and enum types in `ProtoResponse`.
pub mod proto_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Outcome {
        #[prost(message, tag = "1")]
        Get(super::ProtoGetResult),
        #[prost(message, tag = "2")]
        Put(super::ProtoPutResult),
        #[prost(message, tag = "3")]
        Delete(super::ProtoDeleteResult),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCmdResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ProtoResponseHeader>,
    #[prost(message, repeated, tag = "2")]
    pub responses: ::prost::alloc::vec::Vec<ProtoResponse>,
}
