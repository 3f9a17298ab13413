//! The local persistence medium behind the replica cache.
//!
//! A keyed string-blob store: the same contract a browser's local storage
//! offers, expressed as a seam so the cache can run against the filesystem
//! in production and memory in tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::error::{Effect, Transience};

/// Local persistence failure (quota, permissions, corrupt medium).
///
/// Callers at the cache boundary always catch this and degrade to "no
/// cached state"; it is never fatal to the calling operation.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read blob `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write blob `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("blob store lock poisoned")]
    LockPoisoned,
}

impl CacheError {
    pub fn transience(&self) -> Transience {
        Transience::Unknown
    }

    pub fn effect(&self) -> Effect {
        match self {
            CacheError::Write { .. } => Effect::Unknown,
            _ => Effect::None,
        }
    }
}

/// Keyed blob persistence. All operations succeed or fail against the
/// local medium only; connectivity is irrelevant.
pub trait BlobStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn store(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// One JSON file per key under a root directory, written atomically via
/// rename so a crash mid-write leaves the previous blob intact.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root at the default data dir (`SITREP_DATA_DIR`/XDG).
    pub fn at_default_dir() -> Self {
        Self::new(crate::paths::data_dir())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for FsBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(write_err)?;
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Write {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

/// In-memory medium for tests and throwaway clients.
#[derive(Default)]
pub struct MemBlobStore {
    blobs: Mutex<BTreeMap<String, String>>,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let blobs = self.blobs.lock().map_err(|_| CacheError::LockPoisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut blobs = self.blobs.lock().map_err(|_| CacheError::LockPoisoned)?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut blobs = self.blobs.lock().map_err(|_| CacheError::LockPoisoned)?;
        blobs.remove(key);
        Ok(())
    }
}
