//! The Incident record.
//!
//! IncidentId: store-assigned, strictly increasing, never reused
//! IncidentDraft: validated creation input
//! IncidentPatch: lenient partial update (unknown fields dropped)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{IncidentStatus, IncidentType};
use super::error::{CoreError, ValidationError};
use super::time::Timestamp;

/// Store-assigned incident identity.
///
/// Only the authoritative store allocates these; clients never supply one.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IncidentId(pub u64);

impl IncidentId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A field-reported incident.
///
/// `id` and `timestamp` are set once by the store; `status` and `verified`
/// mutate in place an unbounded number of times. Never deleted in the
/// synchronization path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub location: String,
    pub status: IncidentStatus,
    pub verified: bool,
    pub timestamp: Timestamp,
}

/// Creation input, validated at the store boundary.
#[derive(Clone, Debug, Deserialize)]
pub struct IncidentDraft {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub location: String,
}

impl IncidentDraft {
    pub fn new(
        incident_type: IncidentType,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            incident_type,
            description: description.into(),
            location: location.into(),
        }
    }

    /// Reject blank required fields; everything else passes.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::missing("description").into());
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::missing("location").into());
        }
        Ok(())
    }
}

/// Partial update: only `status` and `verified` are recognized.
///
/// Deliberately permissive, not a validation engine: an invalid status
/// string or a non-boolean `verified` is dropped, never rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncidentPatch {
    pub status: Option<IncidentStatus>,
    pub verified: Option<bool>,
}

impl IncidentPatch {
    pub fn status(status: IncidentStatus) -> Self {
        Self {
            status: Some(status),
            verified: None,
        }
    }

    pub fn verified(verified: bool) -> Self {
        Self {
            status: None,
            verified: Some(verified),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.verified.is_none()
    }

    /// Lenient decode from an arbitrary JSON body.
    ///
    /// Unrecognized keys, unknown status strings, and mistyped values are
    /// silently ignored.
    pub fn from_value(body: &Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .and_then(IncidentStatus::parse);
        let verified = body.get("verified").and_then(Value::as_bool);
        Self { status, verified }
    }
}
