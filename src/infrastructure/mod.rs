//! Storage backends for the domain ports.

pub mod in_memory;
pub mod retention;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
