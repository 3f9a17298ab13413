//! Replica side: the durable local mirror and its reconciliation engine.
//!
//! Everything here runs independently per client; no shared mutable state
//! crosses client boundaries.

pub mod blob;
pub mod cache;
pub mod stats;
pub mod sync;

pub use blob::{BlobStore, CacheError, FsBlobStore, MemBlobStore};
pub use cache::ReplicaCache;
pub use stats::{count_by_date, count_by_type, summarize, IncidentStats};
pub use sync::{
    merge_snapshot, LoadOutcome, LoadStatus, Reconciler, SnapshotSource, SyncError,
    UnavailableError,
};
