//! Snapshot reconciliation and live event application.
//!
//! On every load (initial or reconnect): fetch the authoritative list,
//! merge it with the replica cache (authoritative wins on id collision,
//! cached-only entries retained), sort newest-first, overwrite the cache
//! in full, and hand the merged view to the caller. If the authority is
//! unreachable the cached view is served instead, explicitly flagged.
//!
//! A monotonic request sequence guards reconnects: a fetch superseded by
//! a newer one discards its result rather than overwrite a fresher merge.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{Incident, IncidentId};
use crate::error::{Effect, Transience};
use crate::server::StoreEvent;

use super::cache::ReplicaCache;

/// Authoritative source unreachable.
#[derive(Debug, Error)]
#[error("authoritative source unavailable: {reason}")]
pub struct UnavailableError {
    pub reason: String,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error(transparent)]
    Unavailable(#[from] UnavailableError),
}

impl SyncError {
    pub fn transience(&self) -> Transience {
        // Outages are worth retrying under the reconnect backoff policy.
        Transience::Retryable
    }

    pub fn effect(&self) -> Effect {
        Effect::None
    }
}

/// The snapshot fetch seam: whatever transport sits between the client
/// and the authority implements this.
pub trait SnapshotSource {
    fn fetch(&self) -> Result<Vec<Incident>, SyncError>;
}

/// How the working view in a [`LoadOutcome`] was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Fetched, merged, and committed to the cache.
    Reconciled,
    /// Authority unreachable; cached data served unmodified.
    Degraded,
    /// A newer load started before this one finished; its result was
    /// discarded and the current view returned untouched.
    Superseded,
}

/// Result of a snapshot load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOutcome {
    pub incidents: Vec<Incident>,
    pub status: LoadStatus,
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        self.status == LoadStatus::Degraded
    }
}

/// Merge an authoritative snapshot with cached incidents.
///
/// Every authoritative incident is kept as-is: on id collision the
/// authoritative copy replaces the cached copy in full, no field-level
/// merge. Cached incidents absent from the snapshot are preserved; an
/// offline-created record and one the server dropped look identical here,
/// so both are retained. Sorted by timestamp descending, stable on ties.
pub fn merge_snapshot(authoritative: Vec<Incident>, cached: Vec<Incident>) -> Vec<Incident> {
    let authoritative_ids: BTreeSet<IncidentId> =
        authoritative.iter().map(|i| i.id).collect();

    let mut merged = authoritative;
    merged.extend(
        cached
            .into_iter()
            .filter(|i| !authoritative_ids.contains(&i.id)),
    );
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}

struct ViewState {
    incidents: Vec<Incident>,
}

/// Per-client reconciliation engine owning the replica cache and the
/// in-memory working view. Clients share nothing; each owns its engine.
pub struct Reconciler {
    cache: ReplicaCache,
    view: Mutex<ViewState>,
    loads_started: AtomicU64,
}

impl Reconciler {
    pub fn new(cache: ReplicaCache) -> Self {
        Self {
            cache,
            view: Mutex::new(ViewState {
                incidents: Vec::new(),
            }),
            loads_started: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &ReplicaCache {
        &self.cache
    }

    /// Current working view.
    pub fn view(&self) -> Vec<Incident> {
        self.lock_view().incidents.clone()
    }

    /// Full snapshot load: fetch, merge, commit. See module docs for the
    /// degraded and superseded paths.
    pub fn load<S: SnapshotSource + ?Sized>(&self, source: &S) -> LoadOutcome {
        let my_seq = self.loads_started.fetch_add(1, Ordering::SeqCst) + 1;

        match source.fetch() {
            Ok(authoritative) => {
                let cached = self.cache.get_all();
                let merged = merge_snapshot(authoritative, cached);

                let mut state = self.lock_view();
                if self.loads_started.load(Ordering::SeqCst) != my_seq {
                    debug!(seq = my_seq, "snapshot fetch superseded, discarding");
                    return LoadOutcome {
                        incidents: state.incidents.clone(),
                        status: LoadStatus::Superseded,
                    };
                }
                state.incidents = merged.clone();
                drop(state);

                if !self.cache.replace_all(&merged) {
                    warn!("reconciled view could not be persisted to the replica cache");
                }
                LoadOutcome {
                    incidents: merged,
                    status: LoadStatus::Reconciled,
                }
            }
            Err(e) => {
                warn!(error = %e, "snapshot fetch failed, serving cached view");
                let cached = self.cache.get_all();

                let mut state = self.lock_view();
                if self.loads_started.load(Ordering::SeqCst) != my_seq {
                    return LoadOutcome {
                        incidents: state.incidents.clone(),
                        status: LoadStatus::Superseded,
                    };
                }
                state.incidents = cached.clone();
                LoadOutcome {
                    incidents: cached,
                    status: LoadStatus::Degraded,
                }
            }
        }
    }

    /// Apply one broadcast event while connected: upsert into the working
    /// view and the cache. Strictly additive/overwriting; no re-sort and
    /// no full reconciliation.
    pub fn apply_event(&self, event: &StoreEvent) {
        let incident = event.incident();
        let mut state = self.lock_view();
        match state.incidents.iter_mut().find(|i| i.id == incident.id) {
            Some(existing) => *existing = incident.clone(),
            None => state.incidents.push(incident.clone()),
        }
        drop(state);

        if !self.cache.put(incident) {
            warn!(id = incident.id.value(), "event could not be persisted to the replica cache");
        }
    }

    fn lock_view(&self) -> std::sync::MutexGuard<'_, ViewState> {
        // A poisoned view lock only means a panicked reader; the data is
        // still the last committed state.
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
