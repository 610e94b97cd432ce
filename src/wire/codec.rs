use crate::raftcmdpb::{ProtoCmdRequest, ProtoCmdResponse};
use crate::replica::{CmdRequest, CmdResponse};
use bytes::{Bytes, BytesMut};
use prost::Message;
use std::convert::TryFrom;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Failed to encode message")]
    Encode(#[from] prost::EncodeError),

    #[error("Failed to decode message")]
    Decode(#[from] prost::DecodeError),

    #[error("Message is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Encode a command as the payload of a raft log entry. The entry-size ceiling is checked
/// against the length of the returned buffer.
pub fn encode_entry(request: &CmdRequest) -> Result<Bytes, WireError> {
    encode(&ProtoCmdRequest::from(request))
}

pub fn decode_entry(entry: &[u8]) -> Result<CmdRequest, WireError> {
    let proto = ProtoCmdRequest::decode(entry)?;
    CmdRequest::try_from(proto)
}

pub fn encode_response(response: &CmdResponse) -> Result<Bytes, WireError> {
    encode(&ProtoCmdResponse::from(response))
}

pub fn decode_response(buf: &[u8]) -> Result<CmdResponse, WireError> {
    let proto = ProtoCmdResponse::decode(buf)?;
    CmdResponse::try_from(proto)
}

fn encode<M: Message>(message: &M) -> Result<Bytes, WireError> {
    let mut buf = BytesMut::with_capacity(message.encoded_len());
    message.encode(&mut buf)?;

    Ok(buf.freeze())
}
