#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod core;
pub mod error;
mod paths;
pub mod policy;
pub mod server;
pub mod telemetry;

pub use error::{Effect, Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::client::{
    LoadOutcome, LoadStatus, Reconciler, ReplicaCache, SnapshotSource, UnavailableError,
};
pub use crate::core::{
    Incident, IncidentDraft, IncidentId, IncidentPatch, IncidentStatus, IncidentType, Role,
    Session, Timestamp, UserRecord,
};
pub use crate::policy::{can_mutate, MutationAction};
pub use crate::server::{Attachment, IncidentApi, IncidentStore, StoreEvent};
