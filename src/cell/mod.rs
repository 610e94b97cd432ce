mod descriptor;
mod metadata;

pub use descriptor::CellDescriptor;
pub use descriptor::CellEpoch;
pub use descriptor::CellId;
pub use descriptor::Peer;
pub use metadata::cell_metadata;
pub use metadata::CellMetadataListener;
pub use metadata::CellMetadataNotifier;
