//! Aggregate counts over a set of incidents.
//!
//! Pure functions; callers pass whatever slice they care about (usually
//! the working view or the cache contents).

use std::collections::BTreeMap;

use crate::core::{Incident, IncidentStatus};

/// Rollup of an incident collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncidentStats {
    pub total: usize,
    pub verified: usize,
    pub unverified: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub average_per_day: f64,
}

pub fn summarize(incidents: &[Incident]) -> IncidentStats {
    let days = count_by_date(incidents).len();
    IncidentStats {
        total: incidents.len(),
        verified: incidents.iter().filter(|i| i.verified).count(),
        unverified: incidents.iter().filter(|i| !i.verified).count(),
        open: count_status(incidents, IncidentStatus::Open),
        in_progress: count_status(incidents, IncidentStatus::InProgress),
        resolved: count_status(incidents, IncidentStatus::Resolved),
        average_per_day: if incidents.is_empty() {
            0.0
        } else {
            incidents.len() as f64 / days.max(1) as f64
        },
    }
}

/// Counts keyed by incident type label.
pub fn count_by_type(incidents: &[Incident]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.incident_type.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Counts keyed by creation date (`YYYY-MM-DD`), sorted by date.
pub fn count_by_date(incidents: &[Incident]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for incident in incidents {
        let raw = incident.timestamp.as_str();
        let date = raw.split('T').next().unwrap_or(raw).to_string();
        *counts.entry(date).or_insert(0) += 1;
    }
    counts
}

fn count_status(incidents: &[Incident], status: IncidentStatus) -> usize {
    incidents.iter().filter(|i| i.status == status).count()
}
