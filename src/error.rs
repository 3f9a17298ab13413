use thiserror::Error;

use crate::client::{CacheError, SyncError};
use crate::core::CoreError;
use crate::server::StoreError;

/// Whether retrying this operation may succeed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transience {
    /// Retry will never help without changing inputs/state.
    Permanent,
    /// Retry may help (transient outage).
    Retryable,
    /// Unknown if retry will help.
    Unknown,
}

impl Transience {
    pub fn is_retryable(self) -> bool {
        matches!(self, Transience::Retryable)
    }
}

/// What we know about side effects when an error is returned.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Effect {
    /// Definitely no side effects occurred.
    None,
    /// Side effects definitely occurred.
    Some,
    /// We don't know if side effects occurred.
    Unknown,
}

impl Effect {
    pub fn as_str(self) -> &'static str {
        match self {
            Effect::None => "none",
            Effect::Some => "some",
            Effect::Unknown => "unknown",
        }
    }
}

/// Crate-level convenience error.
///
/// Not a "god error": a thin wrapper over canonical capability errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl Error {
    pub fn transience(&self) -> Transience {
        match self {
            Error::Core(e) => e.transience(),
            Error::Store(e) => e.transience(),
            Error::Sync(e) => e.transience(),
            Error::Cache(e) => e.transience(),
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            Error::Core(e) => e.effect(),
            Error::Store(e) => e.effect(),
            Error::Sync(e) => e.effect(),
            Error::Cache(e) => e.effect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UnavailableError;
    use crate::core::{IncidentId, NotFoundError};

    #[test]
    fn not_found_is_permanent_with_no_effect() {
        let err = Error::Core(NotFoundError { id: IncidentId(1) }.into());
        assert_eq!(err.transience(), Transience::Permanent);
        assert_eq!(err.effect().as_str(), "none");
    }

    #[test]
    fn unavailable_is_retryable() {
        let err = Error::Sync(
            UnavailableError {
                reason: "timeout".to_string(),
            }
            .into(),
        );
        assert!(err.transience().is_retryable());
    }
}
