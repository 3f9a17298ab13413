//! Domain enums.
//!
//! IncidentType: fire, medical, accident, crime, other
//! IncidentStatus: open, in-progress, resolved
//! Role: citizen, responder

use serde::{Deserialize, Serialize};

use super::error::{CoreError, InvalidRole};

/// Incident classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentType {
    Fire,
    Medical,
    Accident,
    Crime,
    Other,
}

impl IncidentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Medical => "medical",
            Self::Accident => "accident",
            Self::Crime => "crime",
            Self::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "fire" => Some(Self::Fire),
            "medical" => Some(Self::Medical),
            "accident" => Some(Self::Accident),
            "crime" => Some(Self::Crime),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Incident lifecycle status.
///
/// No enforced transition order: any status may move to any other. The
/// update path is permissive, unrecognized values are ignored rather than
/// rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    Open,
    InProgress,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }

    /// Permissive parse used by the update path: unknown strings map to
    /// `None` and the caller drops the field.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "open" => Some(Self::Open),
            "in-progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

impl Default for IncidentStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Caller role. Citizens report incidents; responders work them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Responder,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Responder => "responder",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "citizen" => Ok(Self::Citizen),
            "responder" => Ok(Self::Responder),
            _ => Err(InvalidRole {
                raw: raw.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trips_known_values() {
        for status in [
            IncidentStatus::Open,
            IncidentStatus::InProgress,
            IncidentStatus::Resolved,
        ] {
            assert_eq!(IncidentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_parse_rejects_unknown_silently() {
        assert_eq!(IncidentStatus::parse("escalated"), None);
        assert_eq!(IncidentStatus::parse(""), None);
        assert_eq!(IncidentStatus::parse("OPEN"), None);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&IncidentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn role_parse_rejects_unknown() {
        assert!(Role::parse("admin").is_err());
        assert_eq!(Role::parse("responder").unwrap(), Role::Responder);
    }
}
