use bytes::Bytes;
use chrono::Utc;
use raftstore::{
    CellDescriptor, CellEpoch, CellId, CmdRequest, ConsensusCore, CorrelationId, CurrentLeader, Index, Peer,
    ProposeError, ProposedEntry, ReadIndexToken, Request, RequestHeader, Term,
};
use slog::Drain;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::{Duration, Instant};

pub const CELL_ID: u64 = 1;

pub struct ConsensusState {
    pub term: Term,
    pub leader: CurrentLeader,
    pub last_index: u64,
    pub proposals: Vec<(ProposedEntry, Bytes)>,
    pub read_index_requests: Vec<(ReadIndexToken, Option<Instant>)>,
}

/// RecordingConsensus stands in for a raft group. It accepts every proposal while it thinks it's
/// leader and records what the replica asked of it, so tests can play back the notifications.
#[derive(Clone)]
pub struct RecordingConsensus {
    state: Arc<Mutex<ConsensusState>>,
}

impl RecordingConsensus {
    pub fn new_leader(term: u64, last_index: u64) -> Self {
        RecordingConsensus {
            state: Arc::new(Mutex::new(ConsensusState {
                term: Term::new(term),
                leader: CurrentLeader::Me,
                last_index,
                proposals: vec![],
                read_index_requests: vec![],
            })),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, ConsensusState> {
        self.state.lock().expect("RecordingConsensus lock poison")
    }

    pub fn step_down(&self, new_term: u64, new_leader: Option<Peer>) {
        let mut state = self.lock();
        state.term = Term::new(new_term);
        state.leader = match new_leader {
            Some(peer) => CurrentLeader::Other(peer),
            None => CurrentLeader::Unknown,
        };
    }

    /// Wait until the replica has made `count` proposals, and return them.
    pub async fn wait_for_proposals(&self, count: usize) -> Vec<(ProposedEntry, Bytes)> {
        let start = Instant::now();
        loop {
            {
                let state = self.lock();
                if state.proposals.len() >= count {
                    return state.proposals.clone();
                }
            }
            assert!(start.elapsed() < Duration::from_secs(5), "Timed out waiting for proposals");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Wait until the replica has asked for `count` read indexes, and return the requests.
    pub async fn wait_for_read_index_requests(&self, count: usize) -> Vec<(ReadIndexToken, Option<Instant>)> {
        let start = Instant::now();
        loop {
            {
                let state = self.lock();
                if state.read_index_requests.len() >= count {
                    return state.read_index_requests.clone();
                }
            }
            assert!(start.elapsed() < Duration::from_secs(5), "Timed out waiting for read index requests");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

impl ConsensusCore for RecordingConsensus {
    fn term(&self) -> Term {
        self.lock().term
    }

    fn leader(&self) -> CurrentLeader {
        self.lock().leader.clone()
    }

    fn propose(&mut self, entry: Bytes) -> Result<ProposedEntry, ProposeError> {
        let mut state = self.lock();
        if state.leader != CurrentLeader::Me {
            return Err(ProposeError::NotLeader);
        }

        state.last_index += 1;
        let proposed = ProposedEntry {
            term: state.term,
            index: Index::new(state.last_index),
        };
        state.proposals.push((proposed, entry));

        Ok(proposed)
    }

    fn request_read_index(&mut self, token: ReadIndexToken, deadline: Option<Instant>) {
        self.lock().read_index_requests.push((token, deadline));
    }
}

pub fn whole_keyspace_cell() -> CellDescriptor {
    CellDescriptor {
        id: CellId::new(CELL_ID),
        start_key: Bytes::new(),
        end_key: Bytes::new(),
        epoch: CellEpoch::new(1, 1),
        peers: vec![Peer::new(1, 100), Peer::new(2, 200), Peer::new(3, 300)],
    }
}

pub fn header(id: &'static str) -> RequestHeader {
    RequestHeader {
        correlation_id: Some(CorrelationId::from_static(id.as_bytes())),
        cell_id: CellId::new(CELL_ID),
        cell_epoch: CellEpoch::new(1, 1),
    }
}

pub fn get(id: &'static str, key: &'static str) -> CmdRequest {
    CmdRequest {
        header: header(id),
        requests: vec![Request::Get {
            key: Bytes::from_static(key.as_bytes()),
        }],
    }
}

pub fn put(id: &'static str, key: &'static str, value: &'static str) -> CmdRequest {
    CmdRequest {
        header: header(id),
        requests: vec![Request::Put {
            key: Bytes::from_static(key.as_bytes()),
            value: Bytes::from_static(value.as_bytes()),
        }],
    }
}

pub fn token(id: &'static str) -> ReadIndexToken {
    ReadIndexToken::new(CorrelationId::from_static(id.as_bytes()))
}

#[allow(dead_code)]
pub fn create_root_logger_for_file(directory_prefix: String, cell_id: u64) -> slog::Logger {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let log_path = format!("{}/cell-{}-{}.log", directory_prefix, cell_id, now);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .unwrap();

    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!())
}

pub fn create_root_logger_for_stdout() -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).use_file_location().build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!())
}
