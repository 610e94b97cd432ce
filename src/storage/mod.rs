mod in_memory;
mod kv;

pub use in_memory::InMemoryKv;
pub use kv::KvReader;
