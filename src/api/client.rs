use crate::actor::ActorClient;
use crate::consensus::{AppliedEntry, Index, Term};
use crate::replica::{CmdRequest, Command, PendingResponse, ReadIndexToken};
use tokio::time::Instant;

/// CellReplica is what `try_create_cell_replica()` hands back: one handle for clients, and one
/// for the consensus core to report progress through.
pub struct CellReplica {
    pub client: CellReplicaClient,
    pub events: ConsensusEvents,
}

/// CellReplicaClient is the request ingestion side of a cell replica. It's cheap to clone. The
/// replica keeps running for as long as any clone (or `ConsensusEvents`) is alive.
#[derive(Clone)]
pub struct CellReplicaClient {
    actor_client: ActorClient,
}

impl CellReplicaClient {
    pub(crate) fn new(actor_client: ActorClient) -> Self {
        CellReplicaClient { actor_client }
    }

    /// Submit a command and get a future for its response. Every command is answered exactly
    /// once, or resolves to `SubmitError::ReplicaExited` if the replica shuts down first.
    pub async fn submit(&self, request: CmdRequest) -> PendingResponse {
        self.submit_inner(request, None).await
    }

    /// Like `submit()`, but a read still waiting on its read index when `deadline` passes is
    /// answered with an error instead of waiting indefinitely.
    pub async fn submit_with_deadline(&self, request: CmdRequest, deadline: Instant) -> PendingResponse {
        self.submit_inner(request, Some(deadline)).await
    }

    /// Fire and forget. The command is still executed, but its response is discarded.
    pub async fn submit_detached(&self, request: CmdRequest) {
        self.actor_client.submit(Command::new(request, None), None).await;
    }

    async fn submit_inner(&self, request: CmdRequest, deadline: Option<Instant>) -> PendingResponse {
        let (command, pending) = Command::with_receiver(request);
        self.actor_client.submit(command, deadline).await;

        pending
    }
}

/// ConsensusEvents is how the raft consensus core tells the replica about progress it made.
pub struct ConsensusEvents {
    actor_client: ActorClient,
}

impl ConsensusEvents {
    pub(crate) fn new(actor_client: ActorClient) -> Self {
        ConsensusEvents { actor_client }
    }

    /// Answer to an earlier `ConsensusCore::request_read_index()`. Confirmations must be reported
    /// in non-decreasing `index` order.
    pub async fn read_index_ready(&self, token: ReadIndexToken, index: Index) {
        self.actor_client.read_index_ready(token, index).await;
    }

    /// The entry at `entry.index` is applied to storage, as is every entry before it.
    pub async fn applied(&self, entry: AppliedEntry) {
        self.actor_client.applied(entry).await;
    }

    pub async fn leader_lost(&self) {
        self.actor_client.leader_lost().await;
    }

    /// We are guaranteed to remain leader for `term` until `expires_at`, with storage applied up
    /// to everything committed before the lease was granted.
    pub async fn lease_renewed(&self, term: Term, expires_at: Instant) {
        self.actor_client.lease_renewed(term, expires_at).await;
    }
}
