use bytes::Bytes;
use std::io;

/// KvReader is the storage engine's synchronous read interface. It is used both for lease-backed
/// local reads and for reads released by the read-index queue; in the latter case the caller
/// guarantees storage has applied at least the confirmed read index.
pub trait KvReader {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, io::Error>;
}
