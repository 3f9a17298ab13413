//! Access policy gate.
//!
//! A pure predicate over the capability model: citizens report, responders
//! mutate status and verification. Advisory at this boundary; the request
//! handling layer decides whether to act on it. The gate never rejects a
//! call itself.

use crate::core::{Role, Session};

/// A mutation the caller wants to perform against the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationAction {
    /// Create a new incident.
    Report,
    /// Change an incident's status.
    SetStatus,
    /// Change an incident's verification flag.
    SetVerified,
}

/// Can this session perform this mutation? No session means no.
pub fn can_mutate(session: Option<&Session>, action: MutationAction) -> bool {
    let Some(session) = session else {
        return false;
    };
    match action {
        MutationAction::Report => session.role == Role::Citizen,
        MutationAction::SetStatus | MutationAction::SetVerified => {
            session.role == Role::Responder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Timestamp;

    fn session(role: Role) -> Session {
        Session {
            username: "t".to_string(),
            role,
            login_time: Timestamp::from_rfc3339("2024-03-01T00:00:00Z"),
        }
    }

    #[test]
    fn citizen_reports_but_does_not_mutate() {
        let s = session(Role::Citizen);
        assert!(can_mutate(Some(&s), MutationAction::Report));
        assert!(!can_mutate(Some(&s), MutationAction::SetStatus));
        assert!(!can_mutate(Some(&s), MutationAction::SetVerified));
    }

    #[test]
    fn responder_mutates_but_does_not_report() {
        let s = session(Role::Responder);
        assert!(!can_mutate(Some(&s), MutationAction::Report));
        assert!(can_mutate(Some(&s), MutationAction::SetStatus));
        assert!(can_mutate(Some(&s), MutationAction::SetVerified));
    }

    #[test]
    fn no_session_means_no_capability() {
        for action in [
            MutationAction::Report,
            MutationAction::SetStatus,
            MutationAction::SetVerified,
        ] {
            assert!(!can_mutate(None, action));
        }
    }
}
