//! Core capability errors (validation, lookup).
//!
//! These are bounded and stable: core errors represent domain/refusal
//! states, not library implementation details.

use thiserror::Error;

use crate::error::{Effect, Transience};

use super::incident::IncidentId;

/// Required input missing or blank.
#[derive(Debug, Error, Clone)]
#[error("field `{field}` is invalid: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: "must be non-empty".to_string(),
        }
    }
}

/// Referenced incident id is absent from the store.
#[derive(Debug, Error, Clone)]
#[error("incident {id} not found")]
pub struct NotFoundError {
    pub id: IncidentId,
}

/// Role string outside the capability model.
#[derive(Debug, Error, Clone)]
#[error("role `{raw}` is invalid: must be `citizen` or `responder`")]
pub struct InvalidRole {
    pub raw: String,
}

/// Canonical error enum for the core capability.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    InvalidRole(#[from] InvalidRole),
}

impl CoreError {
    pub fn transience(&self) -> Transience {
        // Core errors are pure domain/input failures.
        Transience::Permanent
    }

    pub fn effect(&self) -> Effect {
        Effect::None
    }
}
