// Cache module for locally persisted API results.
// Entries expire after a per-kind TTL and are overwritten whole.

pub mod paths;
pub mod store;

pub use paths::{base_dir, entry_key, log_path, store_dir};
pub use store::{
    COMMITS_TTL, CachedData, FileStore, KeyValueStore, MemoryStore, PROJECTS_TTL, invalidate,
    read_cached, read_if_valid, write_cached,
};
