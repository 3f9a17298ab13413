//! XDG directory helpers for the replica medium.

use std::path::PathBuf;

/// Base directory for the client's durable replica blobs.
///
/// Uses `SITREP_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/sitrep-rs` or
/// `~/.local/share/sitrep-rs`. Tests bypass this entirely by handing the
/// blob store an explicit root.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SITREP_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local")
                .join("share")
        })
        .join("sitrep-rs")
}

/// Directory for the config file: `$XDG_CONFIG_HOME/sitrep-rs` or
/// `~/.config/sitrep-rs`.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("sitrep-rs")
}
