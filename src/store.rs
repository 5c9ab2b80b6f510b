//! Durable storage for the reminder set.
//!
//! The store is a single JSON file holding the ordered reminder list.
//! Loading never fails the caller: a missing file yields an empty list and
//! corrupt data yields an empty list plus a logged warning. Writes go
//! through a temp file and rename so a crash mid-write cannot corrupt the
//! blob. Single-writer: only the [`ReminderController`](crate::controller::ReminderController)
//! calls `save`, synchronously, after every mutation.

use crate::error::{ReminderError, Result};
use crate::reminder::Reminder;
use std::path::PathBuf;
use tracing::{debug, warn};

/// File-backed store for the persisted reminder set.
pub struct ReminderStore {
    /// `None` disables persistence (ephemeral store for tests).
    path: Option<PathBuf>,
}

impl ReminderStore {
    /// Store backed by the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Store at the default platform data path.
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(crate::app_dirs::reminders_path())
    }

    /// In-memory-only store: loads empty, saves are dropped.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    /// Load the persisted reminder sequence.
    ///
    /// Missing or unreadable or corrupt data degrades to an empty list;
    /// this method never fails the caller.
    #[must_use]
    pub fn load(&self) -> Vec<Reminder> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("cannot read reminder store at {}: {e}", path.display());
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Reminder>>(&bytes) {
            Ok(reminders) => {
                debug!(
                    count = reminders.len(),
                    "loaded reminders from {}",
                    path.display()
                );
                reminders
            }
            Err(e) => {
                warn!(
                    "ignoring corrupt reminder store at {}: {e}",
                    path.display()
                );
                Vec::new()
            }
        }
    }

    /// Persist the reminder sequence, replacing the previous contents.
    pub fn save(&self, reminders: &[Reminder]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReminderError::Store(format!("cannot create store directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(reminders)
            .map_err(|e| ReminderError::Store(format!("cannot serialize reminders: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| ReminderError::Store(format!("cannot write store temp file: {e}")))?;
        std::fs::rename(&tmp_path, path)
            .map_err(|e| ReminderError::Store(format!("cannot finalize store file: {e}")))?;

        debug!(count = reminders.len(), "saved reminders to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::reminder::{ReminderKind, ReminderTime};

    fn sample() -> Reminder {
        Reminder::new(
            ReminderKind::DailyStudy,
            ReminderTime::new(9, 0).unwrap(),
            "Morning review",
        )
        .unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReminderStore::new(dir.path().join("reminders.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReminderStore::new(dir.path().join("reminders.json"));

        let a = sample();
        let mut b = sample();
        b.label = "Evening review".to_owned();
        store.save(&[a.clone(), b.clone()]).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, vec![a, b]);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = ReminderStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("reminders.json");
        let store = ReminderStore::new(path.clone());

        store.save(&[sample()]).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn ephemeral_store_is_a_no_op() {
        let store = ReminderStore::ephemeral();
        store.save(&[sample()]).unwrap();
        assert!(store.load().is_empty());
    }
}
