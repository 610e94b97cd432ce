use crate::replica::Request;
use crate::storage::KvReader;
use crate::wire;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, RwLock};

// Not durable at all. Good enough for embedding in tests and for single process experiments; the
// real storage engine lives outside this crate.
#[derive(Clone, Default)]
pub struct InMemoryKv {
    data: Arc<RwLock<BTreeMap<Bytes, Bytes>>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: Bytes, value: Bytes) {
        self.data
            .write()
            .expect("InMemoryKv.put() lock poison")
            .insert(key, value);
    }

    pub fn delete(&self, key: &[u8]) {
        self.data
            .write()
            .expect("InMemoryKv.delete() lock poison")
            .remove(key);
    }

    /// Apply a committed log entry, as produced by the replica's write path, to the map.
    pub fn apply_entry(&self, entry: &[u8]) -> Result<(), wire::WireError> {
        let request = wire::decode_entry(entry)?;
        for op in request.requests {
            match op {
                Request::Get { .. } => {}
                Request::Put { key, value } => self.put(key, value),
                Request::Delete { key } => self.delete(&key),
            }
        }

        Ok(())
    }
}

impl KvReader for InMemoryKv {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, io::Error> {
        let data = self
            .data
            .read()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "InMemoryKv lock poison"))?;

        Ok(data.get(key).cloned())
    }
}
