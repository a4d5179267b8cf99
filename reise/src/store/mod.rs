//! Local stop cache.
//!
//! Maps user-chosen aliases to stops. The cache file is the only state that
//! survives between runs and is always rewritten as a whole.
//!
//! Two invocations writing at the same time are not coordinated: the last
//! writer wins.

mod cache;
mod error;
mod snapshot;

pub use cache::CacheStore;
pub use error::StoreError;
pub use snapshot::{CacheFile, CacheFileConfig, MemorySnapshot, SNAPSHOT_VERSION, Snapshot};
