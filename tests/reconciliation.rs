//! Reconciliation properties over a durable on-disk replica: survival
//! across client restarts, fixed-point merges, and id allocation.

use tempfile::TempDir;

use sitrep_rs::client::{merge_snapshot, FsBlobStore, ReplicaCache};
use sitrep_rs::{
    Incident, IncidentDraft, IncidentId, IncidentStatus, IncidentStore, IncidentType, Timestamp,
};

fn incident(id: u64, status: IncidentStatus, ts: &str) -> Incident {
    Incident {
        id: IncidentId(id),
        incident_type: IncidentType::Fire,
        description: format!("incident {id}"),
        location: "Grid 7".to_string(),
        status,
        verified: false,
        timestamp: Timestamp::from_rfc3339(ts),
    }
}

fn cache_at(dir: &TempDir) -> ReplicaCache {
    ReplicaCache::new(Box::new(FsBlobStore::new(dir.path().to_path_buf())))
}

#[test]
fn replica_survives_client_restart() {
    let dir = TempDir::new().expect("failed to create cache dir");

    {
        let cache = cache_at(&dir);
        cache.put(&incident(1, IncidentStatus::Open, "2024-03-01T00:00:00Z"));
        cache.put(&incident(2, IncidentStatus::Resolved, "2024-03-02T00:00:00Z"));
    }

    // a fresh handle over the same directory sees the same mirror
    let cache = cache_at(&dir);
    let all = cache.get_all();
    assert_eq!(all.len(), 2);
    assert_eq!(cache.get(IncidentId(2)).map(|i| i.status), Some(IncidentStatus::Resolved));
}

#[test]
fn merge_result_is_a_fixed_point() {
    let authoritative = vec![
        incident(1, IncidentStatus::Open, "2024-03-02T00:00:00Z"),
        incident(2, IncidentStatus::InProgress, "2024-03-03T00:00:00Z"),
    ];
    let cached = vec![
        incident(1, IncidentStatus::Resolved, "2024-03-02T00:00:00Z"),
        incident(9, IncidentStatus::Open, "2024-03-01T00:00:00Z"),
    ];

    let merged = merge_snapshot(authoritative.clone(), cached);
    let remerged = merge_snapshot(authoritative, merged.clone());
    assert_eq!(remerged, merged, "merging a previous merge must be stable");
}

#[test]
fn merge_precedence_matches_contract() {
    let authoritative = vec![incident(1, IncidentStatus::Open, "2024-03-02T00:00:00Z")];
    let cached = vec![
        incident(1, IncidentStatus::Resolved, "2024-03-02T00:00:00Z"),
        incident(2, IncidentStatus::Open, "2024-03-01T00:00:00Z"),
    ];

    let merged = merge_snapshot(authoritative, cached);
    let statuses: Vec<(u64, IncidentStatus)> =
        merged.iter().map(|i| (i.id.value(), i.status)).collect();
    assert_eq!(
        statuses,
        vec![(1, IncidentStatus::Open), (2, IncidentStatus::Open)]
    );
}

#[test]
fn store_ids_are_unique_and_strictly_increasing() {
    let store = IncidentStore::new();
    let mut seen = Vec::new();
    for n in 0..10 {
        let incident = store
            .create(IncidentDraft::new(
                IncidentType::Other,
                format!("report {n}"),
                "field",
            ))
            .expect("create failed");
        seen.push(incident.id.value());
    }
    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(seen, sorted, "ids must be unique and increasing in order");
}

#[test]
fn corrupt_replica_blob_degrades_to_empty_not_fatal() {
    let dir = TempDir::new().expect("failed to create cache dir");
    std::fs::write(dir.path().join("incidents.json"), b"\xff\xfe not json").expect("seed corrupt");

    let cache = cache_at(&dir);
    assert!(cache.get_all().is_empty());

    // and the cache recovers on the next write
    cache.put(&incident(1, IncidentStatus::Open, "2024-03-01T00:00:00Z"));
    assert_eq!(cache.get_all().len(), 1);
}
