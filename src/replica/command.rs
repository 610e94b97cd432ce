use crate::cell::{CellDescriptor, CellId, Peer};
use crate::consensus::Term;
use crate::replica::response::{self, CmdResponse};
use crate::replica::{CmdRequest, CorrelationId};
use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

pub fn completion() -> (Completion, PendingResponse) {
    let (tx, rx) = oneshot::channel();

    (Completion(tx), PendingResponse { rx })
}

/// Completion is the sending half of a command's one-shot response. Sending consumes it, so a
/// response can't be delivered twice.
pub struct Completion(oneshot::Sender<CmdResponse>);

impl Completion {
    pub fn send(self, resp: CmdResponse) {
        // Receiver may have stopped waiting (e.g. client side timeout). That's fine.
        let _ = self.0.send(resp);
    }
}

/// PendingResponse resolves once the replica answers the command. If the replica drops the
/// command without answering (it was shut down), this resolves to `SubmitError::ReplicaExited`.
pub struct PendingResponse {
    rx: oneshot::Receiver<CmdResponse>,
}

impl Future for PendingResponse {
    type Output = Result<CmdResponse, SubmitError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let rx = Pin::new(&mut self.rx);

        match rx.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(resp)) => Poll::Ready(Ok(resp)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(SubmitError::ReplicaExited)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    // Replica logic runs on a background task. This error is returned if the task has exited.
    #[error("Replica task has exited")]
    ReplicaExited,
}

/// Command is one client request flowing through the replica, plus where to send its answer.
/// Every `resp*` method consumes the command.
pub struct Command {
    request: CmdRequest,
    // None means fire and forget.
    completion: Option<Completion>,
}

impl Command {
    pub fn new(request: CmdRequest, completion: Option<Completion>) -> Self {
        Command { request, completion }
    }

    pub fn with_receiver(request: CmdRequest) -> (Self, PendingResponse) {
        let (completion, pending) = completion();
        (Self::new(request, Some(completion)), pending)
    }

    pub fn request(&self) -> &CmdRequest {
        &self.request
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.request.header.correlation_id.as_ref()
    }

    pub fn respond(self, resp: CmdResponse) {
        if let Some(completion) = self.completion {
            completion.send(resp);
        }
    }

    pub fn resp_stale_command(self, term: Term) {
        let rsp = response::stale_command(self.correlation_id(), term);
        self.respond(rsp);
    }

    pub fn resp_stale_epoch(self, term: Term, new_cells: Vec<CellDescriptor>) {
        let rsp = response::stale_epoch(self.correlation_id(), term, new_cells);
        self.respond(rsp);
    }

    pub fn resp_not_leader(self, cell_id: CellId, term: Term, leader: Option<Peer>) {
        let rsp = response::not_leader(self.correlation_id(), term, cell_id, leader);
        self.respond(rsp);
    }

    pub fn resp_large_raft_entry_size(self, cell_id: CellId, size: u64, term: Term) {
        let rsp = response::raft_entry_too_large(self.correlation_id(), term, cell_id, size);
        self.respond(rsp);
    }

    pub fn resp_key_not_in_cell(self, key: Bytes, cell: &CellDescriptor, term: Term) {
        let rsp = response::key_not_in_cell(self.correlation_id(), term, key, cell);
        self.respond(rsp);
    }

    pub fn resp_cell_not_found(self, cell_id: CellId, term: Term) {
        let rsp = response::cell_not_found(self.correlation_id(), term, cell_id);
        self.respond(rsp);
    }

    pub fn resp_other_error<E: fmt::Display + ?Sized>(self, err: &E) {
        let rsp = response::other_error(err);
        self.respond(rsp);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("correlation_id", &self.correlation_id())
            .field("cell_id", &self.request.header.cell_id)
            .field("num_requests", &self.request.requests.len())
            .field("detached", &self.completion.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellEpoch;
    use crate::replica::{CmdError, Request, RequestHeader};

    fn request() -> CmdRequest {
        CmdRequest {
            header: RequestHeader {
                correlation_id: Some(CorrelationId::from_static(b"c-1")),
                cell_id: CellId::new(1),
                cell_epoch: CellEpoch::new(1, 1),
            },
            requests: vec![Request::Get {
                key: Bytes::from_static(b"k"),
            }],
        }
    }

    #[tokio::test]
    async fn respond_delivers_once() {
        let (cmd, pending) = Command::with_receiver(request());
        cmd.resp_stale_command(Term::new(4));

        let resp = pending.await.unwrap();
        assert_eq!(resp.error(), Some(&CmdError::StaleCommand));
        assert_eq!(resp.header.current_term, Term::new(4));
        assert_eq!(resp.header.correlation_id, Some(CorrelationId::from_static(b"c-1")));
    }

    #[test]
    fn detached_command_skips_delivery() {
        let cmd = Command::new(request(), None);
        // Nothing to assert other than not panicking.
        cmd.resp_not_leader(CellId::new(1), Term::new(1), None);
    }

    #[tokio::test]
    async fn dropped_command_resolves_replica_exited() {
        let (cmd, pending) = Command::with_receiver(request());
        drop(cmd);

        assert!(matches!(pending.await, Err(SubmitError::ReplicaExited)));
    }

    #[tokio::test]
    async fn respond_after_receiver_dropped_is_harmless() {
        let (cmd, pending) = Command::with_receiver(request());
        drop(pending);

        cmd.resp_other_error("whatever");
    }

    #[tokio::test]
    async fn large_entry_helper_carries_cell_and_size() {
        let (cmd, pending) = Command::with_receiver(request());
        cmd.resp_large_raft_entry_size(CellId::new(9), 1025, Term::new(2));

        let resp = pending.await.unwrap();
        assert_eq!(
            resp.error(),
            Some(&CmdError::RaftEntryTooLarge {
                cell_id: CellId::new(9),
                entry_size: 1025,
            })
        );
    }

    #[tokio::test]
    async fn respond_from_another_thread() {
        let (cmd, pending) = Command::with_receiver(request());

        std::thread::spawn(move || cmd.resp_cell_not_found(CellId::new(2), Term::new(1)))
            .join()
            .unwrap();

        let resp = pending.await.unwrap();
        assert_eq!(
            resp.error(),
            Some(&CmdError::CellNotFound {
                cell_id: CellId::new(2)
            })
        );
    }
}
