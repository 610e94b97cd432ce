use crate::actor::{ActorClient, ReplicaActor};
use crate::api::client::{CellReplica, CellReplicaClient, ConsensusEvents};
use crate::api::options::CellReplicaOptionsValidated;
use crate::cell::{CellId, CellMetadataListener};
use crate::consensus::ConsensusCore;
use crate::replica::{CellExecutor, ExecutorConfig, RealClock};
use crate::storage::KvReader;
use crate::CellReplicaOptions;
use std::convert::TryFrom;

pub struct CellReplicaConfig<C, K> {
    pub cell_id: CellId,
    pub consensus: C,
    pub kv: K,
    pub cell_metadata: CellMetadataListener,
    pub info_logger: slog::Logger,
    pub options: CellReplicaOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum CellReplicaCreationError {
    #[error("Illegal options for configuring replica: {0}")]
    IllegalReplicaOptions(String),
    #[error("Cell metadata is for cell {metadata_cell_id:?}, expected {cell_id:?}")]
    MismatchedCellMetadata { cell_id: CellId, metadata_cell_id: CellId },
}

/// Spawn the command executor for one cell onto the current tokio runtime.
pub fn try_create_cell_replica<C, K>(config: CellReplicaConfig<C, K>) -> Result<CellReplica, CellReplicaCreationError>
where
    C: ConsensusCore + Send + 'static,
    K: KvReader + Send + 'static,
{
    let options = CellReplicaOptionsValidated::try_from(config.options)
        .map_err(|e| CellReplicaCreationError::IllegalReplicaOptions(e.to_string()))?;

    let metadata_cell_id = config.cell_metadata.current().id;
    if metadata_cell_id != config.cell_id {
        return Err(CellReplicaCreationError::MismatchedCellMetadata {
            cell_id: config.cell_id,
            metadata_cell_id,
        });
    }

    let logger = config
        .info_logger
        .new(slog::o!("CellId" => config.cell_id.as_u64()));

    let (actor_client, actor_queue_rx) = ActorClient::new(options.event_queue_size);

    let executor = CellExecutor::new(ExecutorConfig {
        logger: logger.clone(),
        cell_id: config.cell_id,
        consensus: config.consensus,
        kv: config.kv,
        cell_metadata: config.cell_metadata,
        clock: RealClock,
        actor_client: actor_client.weak(),
        max_raft_entry_size: options.max_raft_entry_size,
    });

    let replica_actor = ReplicaActor::new(logger, actor_queue_rx, executor);
    tokio::spawn(replica_actor.run_event_loop());

    Ok(CellReplica {
        client: CellReplicaClient::new(actor_client.clone()),
        events: ConsensusEvents::new(actor_client),
    })
}
