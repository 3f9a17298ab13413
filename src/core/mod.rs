//! Domain model, layered leaves-first.
//!
//! domain: the enums
//! time: boundary timestamps
//! incident: the record, its draft and patch forms
//! user: directory and session shapes
//! error: canonical core errors

pub mod domain;
pub mod error;
pub mod incident;
pub mod time;
pub mod user;

pub use domain::{IncidentStatus, IncidentType, Role};
pub use error::{CoreError, InvalidRole, NotFoundError, ValidationError};
pub use incident::{Incident, IncidentDraft, IncidentId, IncidentPatch};
pub use time::Timestamp;
pub use user::{Session, UserRecord};
