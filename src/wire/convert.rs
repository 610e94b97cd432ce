use crate::cell::{CellDescriptor, CellEpoch, CellId, Peer};
use crate::consensus::Term;
use crate::raftcmdpb::{
    proto_error, proto_request, proto_response, ProtoCell, ProtoCellEpoch, ProtoCellNotFound, ProtoCmdRequest,
    ProtoCmdResponse, ProtoDelete, ProtoDeleteResult, ProtoError, ProtoGet, ProtoGetResult, ProtoKeyNotInCell,
    ProtoNotLeader, ProtoPeer, ProtoPut, ProtoPutResult, ProtoRaftEntryTooLarge, ProtoRequest, ProtoRequestHeader,
    ProtoResponse, ProtoResponseHeader, ProtoStaleCommand, ProtoStaleEpoch,
};
use crate::replica::{
    CmdError, CmdRequest, CmdResponse, CorrelationId, Request, RequestHeader, Response, ResponseHeader,
};
use crate::wire::WireError;
use bytes::Bytes;
use std::convert::TryFrom;

// ------- Cell metadata --------

impl From<&Peer> for ProtoPeer {
    fn from(peer: &Peer) -> Self {
        ProtoPeer {
            id: peer.id,
            store_id: peer.store_id,
        }
    }
}

impl From<ProtoPeer> for Peer {
    fn from(proto: ProtoPeer) -> Self {
        Peer::new(proto.id, proto.store_id)
    }
}

impl From<CellEpoch> for ProtoCellEpoch {
    fn from(epoch: CellEpoch) -> Self {
        ProtoCellEpoch {
            conf_ver: epoch.conf_ver,
            cell_ver: epoch.cell_ver,
        }
    }
}

impl From<ProtoCellEpoch> for CellEpoch {
    fn from(proto: ProtoCellEpoch) -> Self {
        CellEpoch::new(proto.conf_ver, proto.cell_ver)
    }
}

impl From<&CellDescriptor> for ProtoCell {
    fn from(cell: &CellDescriptor) -> Self {
        ProtoCell {
            id: cell.id.as_u64(),
            start_key: cell.start_key.to_vec(),
            end_key: cell.end_key.to_vec(),
            epoch: Some(cell.epoch.into()),
            peers: cell.peers.iter().map(ProtoPeer::from).collect(),
        }
    }
}

impl TryFrom<ProtoCell> for CellDescriptor {
    type Error = WireError;

    fn try_from(proto: ProtoCell) -> Result<Self, Self::Error> {
        let epoch = proto.epoch.ok_or(WireError::MissingField("epoch"))?;

        Ok(CellDescriptor {
            id: CellId::new(proto.id),
            start_key: Bytes::from(proto.start_key),
            end_key: Bytes::from(proto.end_key),
            epoch: epoch.into(),
            peers: proto.peers.into_iter().map(Peer::from).collect(),
        })
    }
}

// ------- Request --------

impl From<&CmdRequest> for ProtoCmdRequest {
    fn from(request: &CmdRequest) -> Self {
        let header = ProtoRequestHeader {
            uuid: uuid_to_proto(request.header.correlation_id.as_ref()),
            cell_id: request.header.cell_id.as_u64(),
            cell_epoch: Some(request.header.cell_epoch.into()),
        };

        ProtoCmdRequest {
            header: Some(header),
            requests: request.requests.iter().map(ProtoRequest::from).collect(),
        }
    }
}

impl From<&Request> for ProtoRequest {
    fn from(request: &Request) -> Self {
        let op = match request {
            Request::Get { key } => proto_request::Op::Get(ProtoGet { key: key.to_vec() }),
            Request::Put { key, value } => proto_request::Op::Put(ProtoPut {
                key: key.to_vec(),
                value: value.to_vec(),
            }),
            Request::Delete { key } => proto_request::Op::Delete(ProtoDelete { key: key.to_vec() }),
        };

        ProtoRequest { op: Some(op) }
    }
}

impl TryFrom<ProtoCmdRequest> for CmdRequest {
    type Error = WireError;

    fn try_from(proto: ProtoCmdRequest) -> Result<Self, Self::Error> {
        let header = proto.header.ok_or(WireError::MissingField("header"))?;
        let cell_epoch = header.cell_epoch.ok_or(WireError::MissingField("cell_epoch"))?;

        let mut requests = Vec::with_capacity(proto.requests.len());
        for request in proto.requests {
            requests.push(Request::try_from(request)?);
        }

        Ok(CmdRequest {
            header: RequestHeader {
                correlation_id: uuid_from_proto(header.uuid),
                cell_id: CellId::new(header.cell_id),
                cell_epoch: cell_epoch.into(),
            },
            requests,
        })
    }
}

impl TryFrom<ProtoRequest> for Request {
    type Error = WireError;

    fn try_from(proto: ProtoRequest) -> Result<Self, Self::Error> {
        match proto.op {
            Some(proto_request::Op::Get(get)) => Ok(Request::Get {
                key: Bytes::from(get.key),
            }),
            Some(proto_request::Op::Put(put)) => Ok(Request::Put {
                key: Bytes::from(put.key),
                value: Bytes::from(put.value),
            }),
            Some(proto_request::Op::Delete(delete)) => Ok(Request::Delete {
                key: Bytes::from(delete.key),
            }),
            None => Err(WireError::MissingField("op")),
        }
    }
}

// ------- Response --------

impl From<&CmdResponse> for ProtoCmdResponse {
    fn from(response: &CmdResponse) -> Self {
        let header = ProtoResponseHeader {
            uuid: uuid_to_proto(response.header.correlation_id.as_ref()),
            current_term: response.header.current_term.as_u64(),
            error: response.header.error.as_ref().map(ProtoError::from),
        };

        ProtoCmdResponse {
            header: Some(header),
            responses: response.responses.iter().map(ProtoResponse::from).collect(),
        }
    }
}

impl From<&Response> for ProtoResponse {
    fn from(response: &Response) -> Self {
        let outcome = match response {
            Response::Get { value } => proto_response::Outcome::Get(ProtoGetResult {
                found: value.is_some(),
                value: value.as_ref().map(|v| v.to_vec()).unwrap_or_default(),
            }),
            Response::Put => proto_response::Outcome::Put(ProtoPutResult {}),
            Response::Delete => proto_response::Outcome::Delete(ProtoDeleteResult {}),
        };

        ProtoResponse { outcome: Some(outcome) }
    }
}

impl From<&CmdError> for ProtoError {
    fn from(error: &CmdError) -> Self {
        let kind = match error {
            CmdError::StaleCommand => Some(proto_error::Kind::StaleCommand(ProtoStaleCommand {})),
            CmdError::StaleEpoch { new_cells } => Some(proto_error::Kind::StaleEpoch(ProtoStaleEpoch {
                new_cells: new_cells.iter().map(ProtoCell::from).collect(),
            })),
            CmdError::NotLeader { cell_id, leader } => Some(proto_error::Kind::NotLeader(ProtoNotLeader {
                cell_id: cell_id.as_u64(),
                leader: leader.as_ref().map(ProtoPeer::from),
            })),
            CmdError::RaftEntryTooLarge { cell_id, entry_size } => {
                Some(proto_error::Kind::RaftEntryTooLarge(ProtoRaftEntryTooLarge {
                    cell_id: cell_id.as_u64(),
                    entry_size: *entry_size,
                }))
            }
            CmdError::KeyNotInCell {
                key,
                cell_id,
                start_key,
                end_key,
            } => Some(proto_error::Kind::KeyNotInCell(ProtoKeyNotInCell {
                key: key.to_vec(),
                cell_id: cell_id.as_u64(),
                start_key: start_key.to_vec(),
                end_key: end_key.to_vec(),
            })),
            CmdError::CellNotFound { cell_id } => Some(proto_error::Kind::CellNotFound(ProtoCellNotFound {
                cell_id: cell_id.as_u64(),
            })),
            CmdError::Other { .. } => None,
        };

        ProtoError {
            message: error.to_string(),
            kind,
        }
    }
}

impl TryFrom<ProtoCmdResponse> for CmdResponse {
    type Error = WireError;

    fn try_from(proto: ProtoCmdResponse) -> Result<Self, Self::Error> {
        let header = proto.header.ok_or(WireError::MissingField("header"))?;
        let error = match header.error {
            Some(error) => Some(CmdError::try_from(error)?),
            None => None,
        };

        let mut responses = Vec::with_capacity(proto.responses.len());
        for response in proto.responses {
            responses.push(Response::try_from(response)?);
        }

        Ok(CmdResponse {
            header: ResponseHeader {
                correlation_id: uuid_from_proto(header.uuid),
                current_term: Term::new(header.current_term),
                error,
            },
            responses,
        })
    }
}

impl TryFrom<ProtoResponse> for Response {
    type Error = WireError;

    fn try_from(proto: ProtoResponse) -> Result<Self, Self::Error> {
        match proto.outcome {
            Some(proto_response::Outcome::Get(get)) => {
                let value = if get.found { Some(Bytes::from(get.value)) } else { None };
                Ok(Response::Get { value })
            }
            Some(proto_response::Outcome::Put(_)) => Ok(Response::Put),
            Some(proto_response::Outcome::Delete(_)) => Ok(Response::Delete),
            None => Err(WireError::MissingField("outcome")),
        }
    }
}

impl TryFrom<ProtoError> for CmdError {
    type Error = WireError;

    fn try_from(proto: ProtoError) -> Result<Self, Self::Error> {
        let error = match proto.kind {
            None => CmdError::Other { message: proto.message },
            Some(proto_error::Kind::StaleCommand(_)) => CmdError::StaleCommand,
            Some(proto_error::Kind::StaleEpoch(stale)) => {
                let mut new_cells = Vec::with_capacity(stale.new_cells.len());
                for cell in stale.new_cells {
                    new_cells.push(CellDescriptor::try_from(cell)?);
                }
                CmdError::StaleEpoch { new_cells }
            }
            Some(proto_error::Kind::NotLeader(not_leader)) => CmdError::NotLeader {
                cell_id: CellId::new(not_leader.cell_id),
                leader: not_leader.leader.map(Peer::from),
            },
            Some(proto_error::Kind::RaftEntryTooLarge(too_large)) => CmdError::RaftEntryTooLarge {
                cell_id: CellId::new(too_large.cell_id),
                entry_size: too_large.entry_size,
            },
            Some(proto_error::Kind::KeyNotInCell(not_in_cell)) => CmdError::KeyNotInCell {
                key: Bytes::from(not_in_cell.key),
                cell_id: CellId::new(not_in_cell.cell_id),
                start_key: Bytes::from(not_in_cell.start_key),
                end_key: Bytes::from(not_in_cell.end_key),
            },
            Some(proto_error::Kind::CellNotFound(not_found)) => CmdError::CellNotFound {
                cell_id: CellId::new(not_found.cell_id),
            },
        };

        Ok(error)
    }
}

// An empty uuid on the wire means the client didn't send one.
fn uuid_to_proto(correlation_id: Option<&CorrelationId>) -> Vec<u8> {
    correlation_id.map(|id| id.as_bytes().to_vec()).unwrap_or_default()
}

fn uuid_from_proto(uuid: Vec<u8>) -> Option<CorrelationId> {
    if uuid.is_empty() {
        None
    } else {
        Some(CorrelationId::new(Bytes::from(uuid)))
    }
}
