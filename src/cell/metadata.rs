use crate::cell::CellDescriptor;
use tokio::sync::watch;

/// `cell_metadata()` creates the channel over which the cluster-metadata collaborator publishes
/// the latest descriptor of a cell (after splits, merges, conf changes) to the replica.
pub fn cell_metadata(initial: CellDescriptor) -> (CellMetadataNotifier, CellMetadataListener) {
    let (snd, rcv) = watch::channel(initial);

    (CellMetadataNotifier { snd }, CellMetadataListener { rcv })
}

pub struct CellMetadataNotifier {
    snd: watch::Sender<CellDescriptor>,
}

impl CellMetadataNotifier {
    pub fn notify_new_descriptor(&self, descriptor: CellDescriptor) {
        // The replica may already be gone. Nothing to do about it.
        let _ = self.snd.send(descriptor);
    }
}

/// CellMetadataListener is the replica's read-only view of its own cell. It never blocks: it
/// always returns the most recently published descriptor.
#[derive(Clone)]
pub struct CellMetadataListener {
    rcv: watch::Receiver<CellDescriptor>,
}

impl CellMetadataListener {
    pub fn current(&self) -> CellDescriptor {
        self.rcv.borrow().clone()
    }
}
