//! Event fan-out for store mutations.
//!
//! Attached observers receive every committed mutation, in commit order.
//! Disconnected observers get nothing and must re-acquire state via a
//! snapshot on reattachment; no replay log is kept.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crossbeam::channel::{Receiver, Sender, TryRecvError};
use thiserror::Error;

use crate::core::Incident;

/// A committed store mutation.
///
/// Both variants carry the full post-state of the incident, so an observer
/// can apply them without a read-back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Created(Incident),
    Updated(Incident),
}

impl StoreEvent {
    pub fn incident(&self) -> &Incident {
        match self {
            Self::Created(incident) | Self::Updated(incident) => incident,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
        }
    }
}

/// Receiving half handed to an observer.
pub struct EventSubscription {
    receiver: Receiver<StoreEvent>,
}

impl EventSubscription {
    pub fn recv(&self) -> Result<StoreEvent, crossbeam::channel::RecvError> {
        self.receiver.recv()
    }

    pub fn try_recv(&self) -> Result<StoreEvent, TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Fan-out of store events to all currently-attached observers.
///
/// Channels are unbounded: upstream mutation rate is assumed low and the
/// channel itself never drops an event. A dropped receiver is pruned on the
/// next publish.
#[derive(Clone)]
pub struct StoreBroadcaster {
    inner: Arc<Mutex<BroadcasterState>>,
}

impl StoreBroadcaster {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BroadcasterState {
                next_subscriber_id: 1,
                subscribers: BTreeMap::new(),
            })),
        }
    }

    /// Register a new observer. The caller is responsible for pairing this
    /// with a snapshot taken under the same store lock.
    pub fn attach(&self) -> Result<EventSubscription, BroadcastError> {
        let mut state = self.lock_state()?;
        let (sender, receiver) = crossbeam::channel::unbounded();
        let id = state.next_subscriber_id;
        state.next_subscriber_id = state.next_subscriber_id.saturating_add(1);
        state.subscribers.insert(id, sender);
        Ok(EventSubscription { receiver })
    }

    /// Deliver one event to every attached observer, pruning any whose
    /// receiving half has gone away.
    pub fn publish(&self, event: StoreEvent) -> Result<(), BroadcastError> {
        let mut state = self.lock_state()?;
        let mut disconnected = Vec::new();
        for (id, sender) in &state.subscribers {
            if sender.send(event.clone()).is_err() {
                disconnected.push(*id);
            }
        }
        for id in disconnected {
            state.subscribers.remove(&id);
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> Result<usize, BroadcastError> {
        Ok(self.lock_state()?.subscribers.len())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, BroadcasterState>, BroadcastError> {
        self.inner.lock().map_err(|_| BroadcastError::LockPoisoned)
    }
}

impl Default for StoreBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

struct BroadcasterState {
    next_subscriber_id: u64,
    subscribers: BTreeMap<u64, Sender<StoreEvent>>,
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("broadcaster lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IncidentId, IncidentStatus, IncidentType, Timestamp};

    fn incident(id: u64) -> Incident {
        Incident {
            id: IncidentId(id),
            incident_type: IncidentType::Other,
            description: format!("incident {id}"),
            location: "somewhere".to_string(),
            status: IncidentStatus::Open,
            verified: false,
            timestamp: Timestamp::from_rfc3339("2024-01-01T00:00:00Z"),
        }
    }

    #[test]
    fn delivers_events_in_publish_order() {
        let broadcaster = StoreBroadcaster::new();
        let sub = broadcaster.attach().unwrap();

        broadcaster.publish(StoreEvent::Created(incident(1))).unwrap();
        broadcaster.publish(StoreEvent::Updated(incident(1))).unwrap();

        assert_eq!(sub.recv().unwrap().kind(), "created");
        assert_eq!(sub.recv().unwrap().kind(), "updated");
    }

    #[test]
    fn all_attached_observers_receive_each_event() {
        let broadcaster = StoreBroadcaster::new();
        let a = broadcaster.attach().unwrap();
        let b = broadcaster.attach().unwrap();

        broadcaster.publish(StoreEvent::Created(incident(7))).unwrap();

        assert_eq!(a.recv().unwrap().incident().id, IncidentId(7));
        assert_eq!(b.recv().unwrap().incident().id, IncidentId(7));
    }

    #[test]
    fn dropped_subscriber_is_pruned_on_next_publish() {
        let broadcaster = StoreBroadcaster::new();
        let keep = broadcaster.attach().unwrap();
        let gone = broadcaster.attach().unwrap();
        drop(gone);

        broadcaster.publish(StoreEvent::Created(incident(1))).unwrap();
        assert_eq!(broadcaster.subscriber_count().unwrap(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn detached_observer_receives_nothing_later() {
        let broadcaster = StoreBroadcaster::new();
        broadcaster.publish(StoreEvent::Created(incident(1))).unwrap();

        // attached after the emission: no replay
        let late = broadcaster.attach().unwrap();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }
}
