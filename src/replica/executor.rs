use crate::actor::WeakActorClient;
use crate::cell::{CellDescriptor, CellId, CellMetadataListener, Peer};
use crate::consensus::{AppliedEntry, ConsensusCore, CurrentLeader, Index, ProposeError, Term};
use crate::replica::lease::Lease;
use crate::replica::pending_reads::{PendingReads, ReadIndexToken, ReadSeqNo};
use crate::replica::pending_writes::{PendingWrites, WriteOutcome};
use crate::replica::response::{self, Response};
use crate::replica::time::Clock;
use crate::replica::{CmdRequest, Command, Request};
use crate::storage::KvReader;
use crate::wire;
use bytes::Bytes;
use std::io;
use tokio::time::Instant;

const MISSING_UUID: &str = "missing request uuid";
const READ_INDEX_DEADLINE_EXCEEDED: &str = "read index deadline exceeded";

pub(crate) struct ExecutorConfig<C, K, T> {
    pub logger: slog::Logger,
    pub cell_id: CellId,
    pub consensus: C,
    pub kv: K,
    pub cell_metadata: CellMetadataListener,
    pub clock: T,
    pub actor_client: WeakActorClient,
    pub max_raft_entry_size: u64,
}

/// Which of the two linearizable read paths a read command takes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ReadPath {
    // Leader lease is valid: storage is known to be up to date, serve right away.
    Local,
    // Ask raft for a read index, and serve once storage has applied up to it.
    ReadIndex,
}

/// CellExecutor classifies every command submitted to one cell, answers the ones that can't be
/// served, and drives the rest through the read-local, read-index or write path.
///
/// It's owned by a single actor and is never shared, so nothing in here is synchronized except
/// the pending-reads queue.
pub(crate) struct CellExecutor<C, K, T>
where
    C: ConsensusCore,
    K: KvReader,
    T: Clock,
{
    logger: slog::Logger,
    cell_id: CellId,
    consensus: C,
    kv: K,
    cell_metadata: CellMetadataListener,
    clock: T,
    lease: Lease,
    pending_reads: PendingReads,
    pending_writes: PendingWrites,
    // None until the consensus core reports the first applied entry.
    applied_index: Option<Index>,
    max_raft_entry_size: u64,
    actor_client: WeakActorClient,
}

// Why a command can't be served. Answered with the matching error response.
enum Rejection {
    MissingCorrelationId,
    CellNotFound,
    NotLeader(Option<Peer>),
    StaleEpoch(CellDescriptor),
    KeyNotInCell(Bytes, CellDescriptor),
}

enum ReadError {
    Storage(io::Error),
    WriteInReadCommand,
}

impl<C, K, T> CellExecutor<C, K, T>
where
    C: ConsensusCore,
    K: KvReader,
    T: Clock,
{
    pub(crate) fn new(config: ExecutorConfig<C, K, T>) -> Self {
        CellExecutor {
            logger: config.logger,
            cell_id: config.cell_id,
            consensus: config.consensus,
            kv: config.kv,
            cell_metadata: config.cell_metadata,
            clock: config.clock,
            lease: Lease::new(),
            pending_reads: PendingReads::new(),
            pending_writes: PendingWrites::new(),
            applied_index: None,
            max_raft_entry_size: config.max_raft_entry_size,
            actor_client: config.actor_client,
        }
    }

    /// Entry point for every client command. Never blocks: the command is either answered before
    /// this returns, or parked until a consensus notification resolves it.
    pub(crate) fn submit(&mut self, command: Command, deadline: Option<Instant>) {
        if let Err(rejection) = self.check_command(&command) {
            slog::debug!(self.logger, "Rejecting command {:?}", command);
            self.reject(command, rejection);
            return;
        }

        if command.request().is_read_only() {
            match self.classify() {
                ReadPath::Local => self.exec_read_local(command),
                ReadPath::ReadIndex => self.exec_read_index(command, deadline),
            }
        } else {
            self.exec_write(command);
        }
    }

    pub(crate) fn classify(&self) -> ReadPath {
        if self.lease.is_valid(self.consensus.term(), self.clock.now()) {
            ReadPath::Local
        } else {
            ReadPath::ReadIndex
        }
    }

    pub(crate) fn exec_read_local(&mut self, command: Command) {
        self.do_exec_read_cmd(command);
    }

    /// Park the read until raft confirms a read index and storage has applied up to it. With a
    /// deadline, the read is answered with an error if it's still parked once the deadline passes.
    pub(crate) fn exec_read_index(&mut self, command: Command, deadline: Option<Instant>) {
        let token = match command.correlation_id() {
            Some(id) => ReadIndexToken::new(id.clone()),
            None => {
                command.resp_other_error(MISSING_UUID);
                return;
            }
        };

        let seq_no = self.pending_reads.push(token.clone(), command);
        slog::debug!(
            self.logger,
            "Requesting read index for {:?}. {} reads pending.",
            token,
            self.pending_reads.len()
        );
        self.consensus.request_read_index(token, deadline);

        if let Some(deadline) = deadline {
            self.spawn_deadline_watcher(seq_no, deadline);
        }
    }

    fn exec_write(&mut self, command: Command) {
        let term = self.consensus.term();

        let entry = match wire::encode_entry(command.request()) {
            Ok(entry) => entry,
            Err(e) => {
                slog::error!(self.logger, "Failed to encode write command {:?}: {:?}", command, e);
                command.resp_other_error(&e);
                return;
            }
        };

        let entry_size = entry.len() as u64;
        if entry_size > self.max_raft_entry_size {
            slog::warn!(
                self.logger,
                "Rejecting write of {} bytes. Ceiling is {} bytes.",
                entry_size,
                self.max_raft_entry_size
            );
            command.resp_large_raft_entry_size(self.cell_id, entry_size, term);
            return;
        }

        match self.consensus.propose(entry) {
            Ok(proposed) => {
                self.pending_writes.push(proposed, command);
                slog::debug!(
                    self.logger,
                    "Proposed write at {:?}. {} writes pending.",
                    proposed,
                    self.pending_writes.len()
                );
            }
            Err(ProposeError::NotLeader) => {
                let leader = self.known_leader();
                command.resp_not_leader(self.cell_id, term, leader);
            }
            Err(e @ ProposeError::Rejected(_)) => {
                slog::warn!(self.logger, "Proposal rejected: {:?}", e);
                command.resp_other_error(&e);
            }
        }
    }

    pub(crate) fn on_read_index_ready(&mut self, token: ReadIndexToken, index: Index) {
        if !self.pending_reads.ready(&token, index) {
            // Already flushed by a leadership change or expired by its deadline.
            slog::debug!(self.logger, "No pending read for token {:?}", token);
            return;
        }

        self.drain_ready_reads();
    }

    pub(crate) fn on_applied(&mut self, entry: AppliedEntry) {
        if self.applied_index.map_or(true, |applied| entry.index > applied) {
            self.applied_index = Some(entry.index);
        }

        let term = self.consensus.term();
        for outcome in self.pending_writes.resolve(entry) {
            match outcome {
                WriteOutcome::Applied(command) => match write_responses(&self.kv, command.request()) {
                    Ok(responses) => {
                        let resp = response::success(command.correlation_id(), term, responses);
                        command.respond(resp);
                    }
                    Err(e) => {
                        slog::error!(self.logger, "Storage read failed for {:?}: {:?}", command, e);
                        command.resp_other_error(&e);
                    }
                },
                WriteOutcome::Stale(command) => {
                    slog::debug!(self.logger, "Proposal superseded: {:?}", command);
                    command.resp_stale_command(term);
                }
            }
        }

        self.drain_ready_reads();
    }

    pub(crate) fn on_leader_lost(&mut self) {
        self.lease.invalidate();

        let term = self.consensus.term();
        let leader = self.known_leader();

        let reads = self.pending_reads.drain_all();
        let writes = self.pending_writes.drain_all();
        slog::info!(
            self.logger,
            "Lost leadership. Flushing {} pending reads and {} pending writes.",
            reads.len(),
            writes.len()
        );

        for command in reads {
            command.resp_not_leader(self.cell_id, term, leader);
        }
        for command in writes {
            command.resp_stale_command(term);
        }
    }

    pub(crate) fn on_lease_renewed(&mut self, term: Term, expires_at: Instant) {
        if !self.lease.renew(term, expires_at) {
            slog::debug!(self.logger, "Ignoring outdated lease for term {:?}", term);
        }
    }

    pub(crate) fn on_read_index_expired(&mut self, seq_no: ReadSeqNo) {
        // Usually it was answered before the deadline, and there's nothing left to expire.
        if let Some(command) = self.pending_reads.expire(seq_no) {
            slog::debug!(self.logger, "Read index deadline exceeded for {:?}", command);
            command.resp_other_error(READ_INDEX_DEADLINE_EXCEEDED);
        }
    }

    fn drain_ready_reads(&mut self) {
        let applied_index = match self.applied_index {
            Some(index) => index,
            None => return,
        };
        if self.pending_reads.is_empty() {
            return;
        }

        let ready: Vec<Command> = self.pending_reads.drain(applied_index).collect();
        for command in ready {
            self.do_exec_read_cmd(command);
        }
    }

    // The cell may have split or changed membership while the read was parked, so the checks
    // against cell metadata run again right before reading.
    fn do_exec_read_cmd(&self, command: Command) {
        let cell = self.cell_metadata.current();
        if let Err(rejection) = check_cell(command.request(), &cell) {
            self.reject(command, rejection);
            return;
        }

        match read_all(&self.kv, command.request()) {
            Ok(responses) => {
                let resp = response::success(command.correlation_id(), self.consensus.term(), responses);
                command.respond(resp);
            }
            Err(ReadError::Storage(e)) => {
                slog::error!(self.logger, "Storage read failed for {:?}: {:?}", command, e);
                command.resp_other_error(&e);
            }
            Err(ReadError::WriteInReadCommand) => {
                command.resp_other_error("write operation in read command");
            }
        }
    }

    fn check_command(&self, command: &Command) -> Result<(), Rejection> {
        let request = command.request();

        if request.header.correlation_id.is_none() {
            return Err(Rejection::MissingCorrelationId);
        }

        if request.header.cell_id != self.cell_id {
            return Err(Rejection::CellNotFound);
        }

        match self.consensus.leader() {
            CurrentLeader::Me => { /* carry on */ }
            CurrentLeader::Other(leader) => return Err(Rejection::NotLeader(Some(leader))),
            CurrentLeader::Unknown => return Err(Rejection::NotLeader(None)),
        }

        check_cell(request, &self.cell_metadata.current())
    }

    fn reject(&self, command: Command, rejection: Rejection) {
        let term = self.consensus.term();
        match rejection {
            Rejection::MissingCorrelationId => command.resp_other_error(MISSING_UUID),
            Rejection::CellNotFound => {
                let cell_id = command.request().header.cell_id;
                command.resp_cell_not_found(cell_id, term);
            }
            Rejection::NotLeader(leader) => command.resp_not_leader(self.cell_id, term, leader),
            Rejection::StaleEpoch(cell) => command.resp_stale_epoch(term, vec![cell]),
            Rejection::KeyNotInCell(key, cell) => command.resp_key_not_in_cell(key, &cell, term),
        }
    }

    fn known_leader(&self) -> Option<Peer> {
        match self.consensus.leader() {
            CurrentLeader::Other(leader) => Some(leader),
            CurrentLeader::Me | CurrentLeader::Unknown => None,
        }
    }

    fn spawn_deadline_watcher(&self, seq_no: ReadSeqNo, deadline: Instant) {
        let mut clock = self.clock.clone();
        let actor_client = self.actor_client.clone();

        tokio::spawn(async move {
            clock.sleep_until(deadline).await;
            if let Some(actor_client) = actor_client.upgrade() {
                actor_client.read_index_expired(seq_no).await;
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn num_pending_reads(&self) -> usize {
        self.pending_reads.len()
    }

    #[cfg(test)]
    pub(crate) fn num_pending_writes(&self) -> usize {
        self.pending_writes.len()
    }
}

fn check_cell(request: &CmdRequest, cell: &CellDescriptor) -> Result<(), Rejection> {
    if request.header.cell_epoch.is_stale_against(&cell.epoch) {
        return Err(Rejection::StaleEpoch(cell.clone()));
    }

    if let Some(key) = request.keys().find(|key| !cell.contains_key(key)) {
        return Err(Rejection::KeyNotInCell(key.clone(), cell.clone()));
    }

    Ok(())
}

fn read_all<K: KvReader>(kv: &K, request: &CmdRequest) -> Result<Vec<Response>, ReadError> {
    let mut responses = Vec::with_capacity(request.requests.len());
    for op in request.requests.iter() {
        match op {
            Request::Get { key } => {
                let value = kv.get(key).map_err(ReadError::Storage)?;
                responses.push(Response::Get { value });
            }
            Request::Put { .. } | Request::Delete { .. } => return Err(ReadError::WriteInReadCommand),
        }
    }

    Ok(responses)
}

// Gets batched with mutations observe storage as of the write being applied.
fn write_responses<K: KvReader>(kv: &K, request: &CmdRequest) -> Result<Vec<Response>, io::Error> {
    request
        .requests
        .iter()
        .map(|op| match op {
            Request::Get { key } => kv.get(key).map(|value| Response::Get { value }),
            Request::Put { .. } => Ok(Response::Put),
            Request::Delete { .. } => Ok(Response::Delete),
        })
        .collect()
}
