//! REST-equivalent surface over the store.
//!
//! Transport framing (HTTP itself) is an external collaborator; this
//! module fixes the status codes, envelopes, and decode behavior that any
//! framing must produce.
//!
//! | operation | success | failure |
//! |-----------|---------|---------|
//! | create    | 201     | 400 missing field, 500 internal |
//! | list      | 200 timestamp-desc | 500 internal |
//! | get       | 200     | 404 |
//! | update    | 200     | 404 |

use serde::Serialize;
use serde_json::Value;

use crate::core::{CoreError, Incident, IncidentId, IncidentPatch};

use super::store::{IncidentStore, StoreError};

/// Structured failure: transport status plus a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            message: "Incident not found".to_string(),
        }
    }

    fn internal(context: &str) -> Self {
        Self {
            status: 500,
            message: format!("Failed to {context}"),
        }
    }
}

/// Success envelope for mutations, mirroring the wire shape consumed by
/// existing clients.
#[derive(Clone, Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
    pub incident: Incident,
}

/// The REST facade. Thin by design: decode, delegate, map errors.
#[derive(Clone)]
pub struct IncidentApi {
    store: IncidentStore,
}

impl IncidentApi {
    pub fn new(store: IncidentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &IncidentStore {
        &self.store
    }

    /// POST /incident → 201 with the created incident.
    pub fn create_incident(&self, body: &Value) -> Result<MutationResponse, ApiError> {
        let draft = serde_json::from_value(body.clone()).map_err(|_| {
            ApiError::bad_request("Missing required fields: type, description, location")
        })?;

        match self.store.create(draft) {
            Ok(incident) => Ok(MutationResponse {
                message: "Incident created successfully".to_string(),
                incident,
            }),
            Err(StoreError::Core(CoreError::Validation(_))) => Err(ApiError::bad_request(
                "Missing required fields: type, description, location",
            )),
            Err(_) => Err(ApiError::internal("create incident")),
        }
    }

    /// GET /incidents → 200, sorted newest first.
    pub fn list_incidents(&self) -> Result<Vec<Incident>, ApiError> {
        let mut incidents = self
            .store
            .list()
            .map_err(|_| ApiError::internal("fetch incidents"))?;
        incidents.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(incidents)
    }

    /// GET /incident/:id → 200 or 404.
    pub fn get_incident(&self, id: IncidentId) -> Result<Incident, ApiError> {
        match self.store.get(id) {
            Ok(incident) => Ok(incident),
            Err(StoreError::Core(CoreError::NotFound(_))) => Err(ApiError::not_found()),
            Err(_) => Err(ApiError::internal("fetch incident")),
        }
    }

    /// PATCH /incident/:id → 200 with the post-update incident, or 404.
    ///
    /// The body is decoded leniently: only recognized fields with valid
    /// values are applied, anything else is ignored.
    pub fn update_incident(
        &self,
        id: IncidentId,
        body: &Value,
    ) -> Result<MutationResponse, ApiError> {
        let patch = IncidentPatch::from_value(body);
        match self.store.update(id, patch) {
            Ok(incident) => Ok(MutationResponse {
                message: "Incident updated successfully".to_string(),
                incident,
            }),
            Err(StoreError::Core(CoreError::NotFound(_))) => Err(ApiError::not_found()),
            Err(_) => Err(ApiError::internal("update incident")),
        }
    }
}
