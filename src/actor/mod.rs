use crate::consensus::{AppliedEntry, ConsensusCore, Index, Term};
use crate::replica::{CellExecutor, Clock, Command, ReadIndexToken, ReadSeqNo};
use crate::storage::KvReader;
use tokio::sync::mpsc;
use tokio::time::Instant;

// Every client submission and every consensus notification for a cell funnels through one of
// these, so the executor sees them strictly one at a time.
#[derive(Debug)]
pub(crate) enum Event {
    Submit(Command, Option<Instant>),
    ReadIndexReady { token: ReadIndexToken, index: Index },
    Applied(AppliedEntry),
    LeaderLost,
    LeaseRenewed { term: Term, expires_at: Instant },
    ReadIndexExpired(ReadSeqNo),
}

#[derive(Clone)]
pub(crate) struct ActorClient {
    sender: mpsc::Sender<Event>,
}

impl ActorClient {
    pub(crate) fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer_size);

        (ActorClient { sender: tx }, rx)
    }

    /// A handle that doesn't keep the actor alive. Tasks spawned by the actor itself must use one,
    /// otherwise the event loop could never observe that every client went away.
    pub(crate) fn weak(&self) -> WeakActorClient {
        WeakActorClient {
            sender: self.sender.downgrade(),
        }
    }

    /// If the actor has exited the command is dropped unanswered, which its client observes as
    /// `SubmitError::ReplicaExited`.
    pub(crate) async fn submit(&self, command: Command, deadline: Option<Instant>) {
        self.send(Event::Submit(command, deadline)).await;
    }

    pub(crate) async fn read_index_ready(&self, token: ReadIndexToken, index: Index) {
        self.send(Event::ReadIndexReady { token, index }).await;
    }

    pub(crate) async fn applied(&self, entry: AppliedEntry) {
        self.send(Event::Applied(entry)).await;
    }

    pub(crate) async fn leader_lost(&self) {
        self.send(Event::LeaderLost).await;
    }

    pub(crate) async fn lease_renewed(&self, term: Term, expires_at: Instant) {
        self.send(Event::LeaseRenewed { term, expires_at }).await;
    }

    pub(crate) async fn read_index_expired(&self, seq_no: ReadSeqNo) {
        self.send(Event::ReadIndexExpired(seq_no)).await;
    }

    async fn send(&self, event: Event) {
        // Actor has exited, meaning the replica is being torn down. Notifications are moot.
        let _ = self.sender.send(event).await;
    }
}

#[derive(Clone)]
pub(crate) struct WeakActorClient {
    sender: mpsc::WeakSender<Event>,
}

impl WeakActorClient {
    pub(crate) fn upgrade(&self) -> Option<ActorClient> {
        self.sender.upgrade().map(|sender| ActorClient { sender })
    }
}

/// ReplicaActor is the cell's command executor in actor model.
pub(crate) struct ReplicaActor<C, K, T>
where
    C: ConsensusCore,
    K: KvReader,
    T: Clock,
{
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    executor: CellExecutor<C, K, T>,
}

impl<C, K, T> ReplicaActor<C, K, T>
where
    C: ConsensusCore,
    K: KvReader,
    T: Clock,
{
    pub(crate) fn new(logger: slog::Logger, receiver: mpsc::Receiver<Event>, executor: CellExecutor<C, K, T>) -> Self {
        ReplicaActor {
            logger,
            receiver,
            executor,
        }
    }

    pub(crate) async fn run_event_loop(mut self) {
        slog::info!(self.logger, "Replica event loop started.");
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        // Every pending command still held by the executor is dropped here, so its client sees
        // `SubmitError::ReplicaExited`.
        slog::info!(self.logger, "Replica event loop exiting. All clients are gone.");
    }

    // This must NOT be async. Any long running work must be spawned on another task and come
    // back as an event to this actor.
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Submit(command, deadline) => {
                self.executor.submit(command, deadline);
            }
            Event::ReadIndexReady { token, index } => {
                self.executor.on_read_index_ready(token, index);
            }
            Event::Applied(entry) => {
                self.executor.on_applied(entry);
            }
            Event::LeaderLost => {
                self.executor.on_leader_lost();
            }
            Event::LeaseRenewed { term, expires_at } => {
                self.executor.on_lease_renewed(term, expires_at);
            }
            Event::ReadIndexExpired(seq_no) => {
                self.executor.on_read_index_expired(seq_no);
            }
        }
    }
}
