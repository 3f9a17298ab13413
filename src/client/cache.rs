//! The client's durable replica of the incident collection.
//!
//! A flat mirror keyed by incident id plus the user directory and the
//! current session, persisted as three independent blobs: `incidents`,
//! `users`, `current_user`. Not a CRDT: no vector clocks, no versions.
//! Merge precedence lives in the reconciler, not here.
//!
//! Every medium failure is caught at this boundary and degrades to "no
//! cached state". A broken disk never fails an operation upstream.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::core::{Incident, IncidentId, IncidentStatus, Role, Session, Timestamp, UserRecord};

use super::blob::BlobStore;

const INCIDENTS_KEY: &str = "incidents";
const USERS_KEY: &str = "users";
const SESSION_KEY: &str = "current_user";

pub struct ReplicaCache {
    medium: Box<dyn BlobStore>,
}

impl ReplicaCache {
    pub fn new(medium: Box<dyn BlobStore>) -> Self {
        Self { medium }
    }

    pub fn at_default_dir() -> Self {
        Self::new(Box::new(super::blob::FsBlobStore::at_default_dir()))
    }

    // -------------------------------------------------------------------------
    // Incident mirror
    // -------------------------------------------------------------------------

    /// All cached incidents; empty on any medium or decode failure.
    pub fn get_all(&self) -> Vec<Incident> {
        self.load_vec(INCIDENTS_KEY)
    }

    pub fn get(&self, id: IncidentId) -> Option<Incident> {
        self.get_all().into_iter().find(|i| i.id == id)
    }

    /// Insert-or-replace by id. A full field replace when the id is already
    /// present: the later write wins entirely, no field-level merge.
    pub fn put(&self, incident: &Incident) -> bool {
        let mut incidents = self.get_all();
        match incidents.iter_mut().find(|i| i.id == incident.id) {
            Some(existing) => *existing = incident.clone(),
            None => incidents.push(incident.clone()),
        }
        self.store_vec(INCIDENTS_KEY, &incidents)
    }

    /// Local-only housekeeping; never propagated to the authority.
    pub fn remove(&self, id: IncidentId) -> bool {
        let incidents = self.get_all();
        let filtered: Vec<Incident> = incidents.iter().filter(|i| i.id != id).cloned().collect();
        if filtered.len() == incidents.len() {
            warn!(id = id.value(), "remove: incident not in cache");
            return false;
        }
        self.store_vec(INCIDENTS_KEY, &filtered)
    }

    /// Overwrite the whole mirror in one write (the reconciler's commit).
    pub fn replace_all(&self, incidents: &[Incident]) -> bool {
        self.store_vec(INCIDENTS_KEY, incidents)
    }

    pub fn clear(&self) -> bool {
        match self.medium.remove(INCIDENTS_KEY) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to clear incident cache");
                false
            }
        }
    }

    pub fn by_status(&self, status: IncidentStatus) -> Vec<Incident> {
        self.get_all()
            .into_iter()
            .filter(|i| i.status == status)
            .collect()
    }

    pub fn verified_only(&self) -> Vec<Incident> {
        self.get_all().into_iter().filter(|i| i.verified).collect()
    }

    /// Pretty-printed JSON dump of the mirror.
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.get_all()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Import a JSON array of incidents. With `merge`, imported copies win
    /// on id collision and existing-only entries are kept; without it the
    /// mirror is replaced wholesale. Returns false on malformed input.
    pub fn import_json(&self, json: &str, merge: bool) -> bool {
        let imported: Vec<Incident> = match serde_json::from_str(json) {
            Ok(incidents) => incidents,
            Err(e) => {
                warn!(error = %e, "import: malformed incident JSON");
                return false;
            }
        };
        if merge {
            let merged = super::sync::merge_snapshot(imported, self.get_all());
            self.replace_all(&merged)
        } else {
            self.replace_all(&imported)
        }
    }

    // -------------------------------------------------------------------------
    // User directory and session
    // -------------------------------------------------------------------------

    /// Add a directory entry. Refuses duplicates and blank credentials.
    pub fn save_user(&self, username: &str, password: &str, role: Role) -> bool {
        if username.trim().is_empty() || password.is_empty() {
            warn!("save_user: missing username or password");
            return false;
        }
        let mut users = self.all_users();
        if users.iter().any(|u| u.username == username) {
            warn!(username, "save_user: username already exists");
            return false;
        }
        users.push(UserRecord {
            username: username.to_string(),
            password: password.to_string(),
            role,
            created_at: Timestamp::now(),
        });
        self.store_vec(USERS_KEY, &users)
    }

    pub fn all_users(&self) -> Vec<UserRecord> {
        self.load_vec(USERS_KEY)
    }

    /// Equality check against the directory. This is the single place
    /// credentials are compared; a stronger scheme replaces this function
    /// without touching the sync core.
    pub fn login(&self, username: &str, password: &str) -> Option<Session> {
        let users = self.all_users();
        let user = users
            .iter()
            .find(|u| u.username == username && u.password == password)?;
        let session = Session::for_user(user);
        if !self.store_blob(SESSION_KEY, &session) {
            return None;
        }
        Some(session)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.load_blob(SESSION_KEY)
    }

    pub fn logout(&self) -> bool {
        match self.medium.remove(SESSION_KEY) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to clear session");
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Blob plumbing: catch everything, degrade to empty
    // -------------------------------------------------------------------------

    fn load_vec<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_blob::<Vec<T>>(key).unwrap_or_default()
    }

    fn load_blob<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.medium.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as empty");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "cache blob malformed, treating as empty");
                None
            }
        }
    }

    fn store_vec<T: Serialize>(&self, key: &str, values: &[T]) -> bool {
        match serde_json::to_string(values) {
            Ok(json) => self.store_raw(key, &json),
            Err(e) => {
                warn!(key, error = %e, "cache encode failed");
                false
            }
        }
    }

    fn store_blob<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => self.store_raw(key, &json),
            Err(e) => {
                warn!(key, error = %e, "cache encode failed");
                false
            }
        }
    }

    fn store_raw(&self, key: &str, json: &str) -> bool {
        match self.medium.store(key, json) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "cache write failed");
                false
            }
        }
    }
}
