use std::convert::TryFrom;

#[derive(Clone, Default)]
pub struct CellReplicaOptions {
    /// Largest encoded write command, in bytes, that will be proposed to raft.
    pub max_raft_entry_size: Option<u64>,
    /// Capacity of the replica's event queue. Once full, `submit()` and consensus notifications
    /// wait for room.
    pub event_queue_size: Option<usize>,
}

pub(super) struct CellReplicaOptionsValidated {
    pub max_raft_entry_size: u64,
    pub event_queue_size: usize,
}

impl CellReplicaOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.max_raft_entry_size == 0 {
            return Err("Max raft entry size must be greater than 0");
        }
        if self.event_queue_size == 0 {
            return Err("Event queue size must be greater than 0");
        }

        Ok(())
    }
}

impl TryFrom<CellReplicaOptions> for CellReplicaOptionsValidated {
    type Error = &'static str;

    fn try_from(options: CellReplicaOptions) -> Result<Self, Self::Error> {
        let values = CellReplicaOptionsValidated {
            max_raft_entry_size: options.max_raft_entry_size.unwrap_or(8 * 1024 * 1024),
            event_queue_size: options.event_queue_size.unwrap_or(1024),
        };

        values.validate()?;
        Ok(values)
    }
}
