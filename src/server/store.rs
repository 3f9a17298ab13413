//! The authoritative incident store.
//!
//! Single instance, single-writer: the state lock serializes every
//! mutation, and the matching broadcast is published under that same lock
//! so channel order always equals commit order. State lives in memory
//! only; a process restart resets to empty by design.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::{
    CoreError, Incident, IncidentDraft, IncidentId, IncidentPatch, IncidentStatus, NotFoundError,
    Timestamp,
};
use crate::error::{Effect, Transience};

use super::broadcast::{BroadcastError, EventSubscription, StoreBroadcaster, StoreEvent};

/// Snapshot plus live event feed, handed to a newly-attached observer.
///
/// The snapshot is taken under the store lock together with the channel
/// registration, so no committed event is missed or seen twice.
pub struct Attachment {
    pub snapshot: Vec<Incident>,
    pub events: EventSubscription,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn transience(&self) -> Transience {
        match self {
            StoreError::Core(e) => e.transience(),
            StoreError::Broadcast(_) | StoreError::LockPoisoned => Transience::Unknown,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            StoreError::Core(e) => e.effect(),
            // Broadcast failures happen after the mutation committed.
            StoreError::Broadcast(_) => Effect::Some,
            StoreError::LockPoisoned => Effect::Unknown,
        }
    }
}

struct StoreState {
    incidents: Vec<Incident>,
    next_id: u64,
}

/// The single source of truth for incident identity and current state.
///
/// No mutable handle into the internal collection ever escapes; callers
/// only see owned clones.
#[derive(Clone)]
pub struct IncidentStore {
    state: Arc<Mutex<StoreState>>,
    broadcaster: StoreBroadcaster,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                incidents: Vec::new(),
                next_id: 1,
            })),
            broadcaster: StoreBroadcaster::new(),
        }
    }

    /// Validate, allocate the next id, stamp the creation instant, commit,
    /// then emit exactly one `created` event.
    pub fn create(&self, draft: IncidentDraft) -> Result<Incident, StoreError> {
        draft.validate().map_err(StoreError::Core)?;

        let mut state = self.lock_state()?;
        let id = IncidentId(state.next_id);
        state.next_id += 1;

        let incident = Incident {
            id,
            incident_type: draft.incident_type,
            description: draft.description,
            location: draft.location,
            status: IncidentStatus::Open,
            verified: false,
            timestamp: Timestamp::now(),
        };
        state.incidents.push(incident.clone());

        info!(id = id.value(), kind = incident.incident_type.as_str(), "incident created");
        self.broadcaster.publish(StoreEvent::Created(incident.clone()))?;
        Ok(incident)
    }

    pub fn get(&self, id: IncidentId) -> Result<Incident, StoreError> {
        let state = self.lock_state()?;
        state
            .incidents
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| StoreError::Core(NotFoundError { id }.into()))
    }

    /// All incidents, unordered at rest. Display ordering is the caller's
    /// concern.
    pub fn list(&self) -> Result<Vec<Incident>, StoreError> {
        Ok(self.lock_state()?.incidents.clone())
    }

    /// Apply recognized patch fields to an existing incident and emit one
    /// `updated` event carrying the full post-state.
    ///
    /// An empty patch still commits (a no-op write) and still emits: the
    /// original surface treats it as a successful update.
    pub fn update(&self, id: IncidentId, patch: IncidentPatch) -> Result<Incident, StoreError> {
        let mut state = self.lock_state()?;
        let incident = state
            .incidents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::Core(NotFoundError { id }.into()))?;

        if let Some(status) = patch.status {
            incident.status = status;
        }
        if let Some(verified) = patch.verified {
            incident.verified = verified;
        }
        let updated = incident.clone();

        debug!(
            id = id.value(),
            status = updated.status.as_str(),
            verified = updated.verified,
            "incident updated"
        );
        self.broadcaster.publish(StoreEvent::Updated(updated.clone()))?;
        Ok(updated)
    }

    /// Attach an observer: current collection as a one-time snapshot plus
    /// the live event feed, registered atomically.
    pub fn subscribe(&self) -> Result<Attachment, StoreError> {
        let state = self.lock_state()?;
        let snapshot = state.incidents.clone();
        let events = self.broadcaster.attach()?;
        Ok(Attachment { snapshot, events })
    }

    pub fn observer_count(&self) -> Result<usize, StoreError> {
        Ok(self.broadcaster.subscriber_count()?)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IncidentType;
    use crossbeam::channel::TryRecvError;

    fn draft(description: &str) -> IncidentDraft {
        IncidentDraft::new(IncidentType::Fire, description, "Main St")
    }

    #[test]
    fn create_assigns_strictly_increasing_ids() {
        let store = IncidentStore::new();
        let mut prev = 0;
        for n in 0..5 {
            let incident = store.create(draft(&format!("incident {n}"))).unwrap();
            assert!(incident.id.value() > prev);
            prev = incident.id.value();
        }
    }

    #[test]
    fn create_defaults_open_and_unverified() {
        let store = IncidentStore::new();
        let incident = store.create(draft("smoke")).unwrap();
        assert_eq!(incident.status, IncidentStatus::Open);
        assert!(!incident.verified);
    }

    #[test]
    fn create_rejects_blank_description() {
        let store = IncidentStore::new();
        let err = store.create(draft("   ")).unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert_eq!(err.transience(), Transience::Permanent);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn update_applies_fields_independently() {
        let store = IncidentStore::new();
        let incident = store.create(draft("smoke")).unwrap();

        let updated = store
            .update(incident.id, IncidentPatch::status(IncidentStatus::Resolved))
            .unwrap();
        assert_eq!(updated.status, IncidentStatus::Resolved);
        assert!(!updated.verified, "status change must not touch verified");

        let updated = store.update(incident.id, IncidentPatch::verified(true)).unwrap();
        assert!(updated.verified);
        assert_eq!(updated.status, IncidentStatus::Resolved);
    }

    #[test]
    fn update_missing_id_is_not_found_and_emits_nothing() {
        let store = IncidentStore::new();
        let attachment = store.subscribe().unwrap();

        let err = store
            .update(IncidentId(99), IncidentPatch::verified(true))
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::NotFound(_))));
        assert!(matches!(
            attachment.events.try_recv(),
            Err(TryRecvError::Empty)
        ));
    }

    #[test]
    fn subscribe_snapshot_is_consistent_with_event_feed() {
        let store = IncidentStore::new();
        let first = store.create(draft("before attach")).unwrap();

        let attachment = store.subscribe().unwrap();
        assert_eq!(attachment.snapshot, vec![first]);

        let second = store.create(draft("after attach")).unwrap();
        let event = attachment.events.recv().unwrap();
        assert_eq!(event, StoreEvent::Created(second));
    }

    #[test]
    fn mutation_order_matches_event_order() {
        let store = IncidentStore::new();
        let attachment = store.subscribe().unwrap();

        let a = store.create(draft("first")).unwrap();
        store.update(a.id, IncidentPatch::verified(true)).unwrap();
        let b = store.create(draft("second")).unwrap();

        assert_eq!(attachment.events.recv().unwrap().kind(), "created");
        let updated = attachment.events.recv().unwrap();
        assert_eq!(updated.kind(), "updated");
        assert!(updated.incident().verified);
        assert_eq!(attachment.events.recv().unwrap().incident().id, b.id);
    }
}
