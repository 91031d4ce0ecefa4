//! Persistent storage for domain cache entries.
//!
//! Two tiers sit behind one [`StoreClient`]:
//! - a partitioned primary store (disk by default, memory for ephemeral runs)
//! - a flat file store keyed by the same cache keys, used when the primary
//!   store fails
//!
//! # Configuration
//!
//! ```toml
//! [storage]
//! enabled = true
//! backend = "disk"  # or "memory"
//! directory = "data/cache"
//! fallback_directory = "data/fallback"
//! ```

mod client;
mod disk;
mod entry;
mod error;
mod flat_file;
mod memory;
mod noop;
pub mod policy;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{StoreClient, WriteOutcome};
pub use disk::DiskStore;
pub use entry::{CacheEntry, EntryMetadata};
pub use error::StoreError;
pub use flat_file::FlatFileStore;
pub use memory::MemoryStore;
pub use noop::NoOpStore;
pub use traits::EntryStore;

pub use crate::config::settings::{StorageBackend, StorageConfig};
