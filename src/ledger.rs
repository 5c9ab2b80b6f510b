//! Per-day dismissal ledger.
//!
//! Records which reminders the user has already acknowledged today so a
//! re-armed timer does not surface the same reminder twice on one calendar
//! date. The ledger holds a single `{date, ids}` pair: entries whose date is
//! not today are stale and read as empty, and the whole record resets the
//! first time a dismissal lands on a new date. Persisted immediately on
//! every mark.

use crate::error::{ReminderError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

/// Persisted ledger record: one calendar date and the ids dismissed on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerRecord {
    /// Calendar date the `ids` set applies to (`None` until first mark).
    #[serde(default)]
    date: Option<NaiveDate>,
    /// Reminder ids dismissed on `date`.
    #[serde(default)]
    ids: HashSet<Uuid>,
}

/// File-backed record of today's dismissed reminders.
pub struct DismissalLedger {
    /// `None` disables persistence (ephemeral ledger for tests).
    path: Option<PathBuf>,
    record: LedgerRecord,
}

impl DismissalLedger {
    /// Load the ledger from the given file path.
    ///
    /// Missing or corrupt data degrades to an empty ledger with a logged
    /// warning; a stale date is kept as-is and treated as empty by the
    /// queries until the next mark resets it.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let record = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<LedgerRecord>(&bytes) {
                Ok(record) => record,
                Err(e) => {
                    warn!("ignoring corrupt dismissal ledger at {}: {e}", path.display());
                    LedgerRecord::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LedgerRecord::default(),
            Err(e) => {
                warn!("cannot read dismissal ledger at {}: {e}", path.display());
                LedgerRecord::default()
            }
        };

        Self {
            path: Some(path),
            record,
        }
    }

    /// Ledger at the default platform data path.
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::load(crate::app_dirs::dismissals_path())
    }

    /// In-memory-only ledger: marks are kept but never persisted.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            record: LedgerRecord::default(),
        }
    }

    /// True only if the stored date equals today's calendar date and the id
    /// is in the stored set.
    #[must_use]
    pub fn is_dismissed_today(&self, id: Uuid) -> bool {
        self.is_dismissed_on(id, Local::now().date_naive())
    }

    /// Date-explicit form of [`is_dismissed_today`](Self::is_dismissed_today).
    #[must_use]
    pub fn is_dismissed_on(&self, id: Uuid, date: NaiveDate) -> bool {
        self.record.date == Some(date) && self.record.ids.contains(&id)
    }

    /// Record a dismissal for today and persist immediately.
    pub fn mark_dismissed(&mut self, id: Uuid) -> Result<()> {
        self.mark_dismissed_on(id, Local::now().date_naive())
    }

    /// Date-explicit form of [`mark_dismissed`](Self::mark_dismissed).
    ///
    /// A date different from the stored one resets the set before inserting,
    /// which is how the ledger rolls over at midnight.
    pub fn mark_dismissed_on(&mut self, id: Uuid, date: NaiveDate) -> Result<()> {
        if self.record.date != Some(date) {
            debug!(%date, "dismissal ledger rolling over to new date");
            self.record.date = Some(date);
            self.record.ids.clear();
        }
        self.record.ids.insert(id);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReminderError::Ledger(format!("cannot create ledger directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.record)
            .map_err(|e| ReminderError::Ledger(format!("cannot serialize ledger: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| ReminderError::Ledger(format!("cannot write ledger temp file: {e}")))?;
        std::fs::rename(&tmp_path, path)
            .map_err(|e| ReminderError::Ledger(format!("cannot finalize ledger file: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn fresh_ledger_has_no_dismissals() {
        let ledger = DismissalLedger::ephemeral();
        assert!(!ledger.is_dismissed_on(Uuid::new_v4(), day(14)));
    }

    #[test]
    fn mark_then_query_same_date() {
        let mut ledger = DismissalLedger::ephemeral();
        let id = Uuid::new_v4();
        ledger.mark_dismissed_on(id, day(14)).unwrap();
        assert!(ledger.is_dismissed_on(id, day(14)));
        assert!(!ledger.is_dismissed_on(Uuid::new_v4(), day(14)));
    }

    #[test]
    fn yesterdays_entries_read_as_empty() {
        let mut ledger = DismissalLedger::ephemeral();
        let id = Uuid::new_v4();
        ledger.mark_dismissed_on(id, day(13)).unwrap();
        assert!(!ledger.is_dismissed_on(id, day(14)));
    }

    #[test]
    fn new_date_resets_the_set() {
        let mut ledger = DismissalLedger::ephemeral();
        let yesterday_id = Uuid::new_v4();
        let today_id = Uuid::new_v4();
        ledger.mark_dismissed_on(yesterday_id, day(13)).unwrap();
        ledger.mark_dismissed_on(today_id, day(14)).unwrap();

        assert!(ledger.is_dismissed_on(today_id, day(14)));
        assert!(!ledger.is_dismissed_on(yesterday_id, day(14)));
        // The old date is gone entirely, not archived.
        assert!(!ledger.is_dismissed_on(yesterday_id, day(13)));
    }

    #[test]
    fn marks_persist_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissals.json");
        let id = Uuid::new_v4();

        let mut ledger = DismissalLedger::load(path.clone());
        ledger.mark_dismissed_on(id, day(14)).unwrap();
        drop(ledger);

        let reloaded = DismissalLedger::load(path);
        assert!(reloaded.is_dismissed_on(id, day(14)));
        assert!(!reloaded.is_dismissed_on(id, day(15)));
    }

    #[test]
    fn corrupt_ledger_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissals.json");
        std::fs::write(&path, b"][").unwrap();

        let ledger = DismissalLedger::load(path);
        assert!(!ledger.is_dismissed_on(Uuid::new_v4(), day(14)));
    }

    #[test]
    fn today_wrappers_use_the_local_date() {
        let mut ledger = DismissalLedger::ephemeral();
        let id = Uuid::new_v4();
        assert!(!ledger.is_dismissed_today(id));
        ledger.mark_dismissed(id).unwrap();
        assert!(ledger.is_dismissed_today(id));
    }
}
