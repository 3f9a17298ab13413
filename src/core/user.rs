//! User directory and session records.
//!
//! Modeled only as a capability source: the sync core consults the session
//! role, nothing more. Credentials are compared for equality; hardening is
//! out of scope and the comparison is isolated in the replica cache.

use serde::{Deserialize, Serialize};

use super::domain::Role;
use super::time::Timestamp;

/// Persisted directory entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
}

/// The active session for a client. At most one; no expiry, no revocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    #[serde(rename = "loginTime")]
    pub login_time: Timestamp,
}

impl Session {
    pub fn for_user(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            login_time: Timestamp::now(),
        }
    }
}
