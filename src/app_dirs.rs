//! Application directory paths for Studybell.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution,
//! which is sandbox-transparent on macOS (returns container-relative paths
//! under App Sandbox automatically).
//!
//! # Environment Overrides
//!
//! - `STUDYBELL_DATA_DIR` — overrides [`data_dir`] for testing or custom
//!   deployments.

use std::path::PathBuf;

/// Application data root directory.
///
/// Holds the persisted reminder set and dismissal ledger.
///
/// Resolves to `dirs::data_dir()/studybell/` by default. Override with
/// the `STUDYBELL_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("STUDYBELL_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("studybell"))
        .unwrap_or_else(|| PathBuf::from("/tmp/studybell-data"))
}

/// Default path for the persisted reminder set.
#[must_use]
pub fn reminders_path() -> PathBuf {
    data_dir().join("reminders.json")
}

/// Default path for the persisted dismissal ledger.
#[must_use]
pub fn dismissals_path() -> PathBuf {
    data_dir().join("dismissals.json")
}
