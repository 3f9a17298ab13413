//! Authoritative side: the incident store, its event fan-out, and the
//! REST-equivalent facade.

pub mod api;
pub mod broadcast;
pub mod store;

pub use api::{ApiError, IncidentApi, MutationResponse};
pub use broadcast::{BroadcastError, EventSubscription, StoreBroadcaster, StoreEvent};
pub use store::{Attachment, IncidentStore, StoreError};
