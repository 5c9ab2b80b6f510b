//! Reminder controller.
//!
//! The single entry point for every reminder mutation. Each operation runs
//! the same fixed sequence: validate → mutate the in-memory model → persist
//! via the store → update the soft timer scheduler → mirror into the native
//! bridge. The store write always reflects the latest accepted state even
//! though the later steps are advisory, which is what keeps the two
//! delivery channels and the persisted set consistent with each other.

use crate::bridge::NativeNotificationBridge;
use crate::error::{ReminderError, Result};
use crate::ledger::DismissalLedger;
use crate::reminder::{Reminder, ReminderFired, ReminderPatch, validated_label};
use crate::store::ReminderStore;
use crate::timers::SoftTimerScheduler;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates the store, soft timers, dismissal ledger, and native bridge.
pub struct ReminderController {
    reminders: Vec<Reminder>,
    store: ReminderStore,
    timers: SoftTimerScheduler,
    bridge: NativeNotificationBridge,
    ledger: Arc<Mutex<DismissalLedger>>,
}

impl ReminderController {
    /// Create a controller emitting fired events on `fired_tx`.
    ///
    /// The in-memory model starts empty; call [`restore`](Self::restore) to
    /// load the persisted set and arm its timers.
    #[must_use]
    pub fn new(
        store: ReminderStore,
        ledger: DismissalLedger,
        bridge: NativeNotificationBridge,
        fired_tx: mpsc::UnboundedSender<ReminderFired>,
    ) -> Self {
        let ledger = Arc::new(Mutex::new(ledger));
        let timers = SoftTimerScheduler::new(fired_tx, Arc::clone(&ledger));
        Self {
            reminders: Vec::new(),
            store,
            timers,
            bridge,
            ledger,
        }
    }

    /// Load the persisted reminder set and converge both channels on it.
    ///
    /// Every enabled reminder gets a fresh timer; a reminder whose fire time
    /// already passed today arms for tomorrow, so a restart never replays a
    /// backlog of missed fires. The native bridge is re-synced as well,
    /// which also repairs any mirror drift from earlier swallowed failures.
    pub async fn restore(&mut self) {
        self.reminders = self.store.load();
        info!(count = self.reminders.len(), "restoring reminders");
        for reminder in self.reminders.clone() {
            if reminder.enabled {
                self.timers.arm(&reminder);
            }
            self.bridge.sync(&reminder).await;
        }
    }

    /// Current reminder list, in persisted order.
    #[must_use]
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// True when a live soft timer exists for the id.
    #[must_use]
    pub fn is_armed(&self, id: Uuid) -> bool {
        self.timers.is_armed(id)
    }

    /// Add a reminder. Returns the updated list.
    pub async fn create(&mut self, mut reminder: Reminder) -> Result<Vec<Reminder>> {
        reminder.label = validated_label(reminder.label)?;
        if self.reminders.iter().any(|r| r.id == reminder.id) {
            return Err(ReminderError::InvalidInput(format!(
                "duplicate reminder id: {}",
                reminder.id
            )));
        }

        info!(id = %reminder.id, time = %reminder.time, "creating reminder");
        self.reminders.push(reminder.clone());
        self.persist();
        if reminder.enabled {
            self.timers.arm(&reminder);
        }
        self.bridge.sync(&reminder).await;
        Ok(self.reminders.clone())
    }

    /// Apply a patch (toggle, retime, relabel, text overrides) to one
    /// reminder. Returns the updated list.
    ///
    /// Validation happens before any mutation, so a rejected patch leaves
    /// the model, store, timers, and native mirror untouched.
    pub async fn update(&mut self, id: Uuid, patch: ReminderPatch) -> Result<Vec<Reminder>> {
        let label = patch.label.map(validated_label).transpose()?;
        let index = self
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or(ReminderError::UnknownReminder(id))?;

        let mut updated = self.reminders[index].clone();
        if let Some(label) = label {
            updated.label = label;
        }
        if let Some(time) = patch.time {
            updated.time = time;
        }
        if let Some(enabled) = patch.enabled {
            updated.enabled = enabled;
        }
        if let Some(custom_title) = patch.custom_title {
            updated.custom_title = custom_title;
        }
        if let Some(custom_message) = patch.custom_message {
            updated.custom_message = custom_message;
        }

        info!(id = %id, time = %updated.time, enabled = updated.enabled, "updating reminder");
        self.reminders[index] = updated.clone();
        self.persist();
        if updated.enabled {
            // Idempotent re-arm: the scheduler cancels any previous timer
            // for this id, so a retime never leaves two live timers.
            self.timers.arm(&updated);
        } else {
            self.timers.disarm(id);
        }
        self.bridge.sync(&updated).await;
        Ok(self.reminders.clone())
    }

    /// Remove a reminder. Returns the updated list.
    pub async fn delete(&mut self, id: Uuid) -> Result<Vec<Reminder>> {
        let index = self
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or(ReminderError::UnknownReminder(id))?;

        info!(id = %id, "deleting reminder");
        self.reminders.remove(index);
        self.persist();
        // Unconditional disarm: a no-op when the reminder was disabled.
        self.timers.disarm(id);
        self.bridge.remove(id).await;
        Ok(self.reminders.clone())
    }

    /// Record that the user acknowledged today's fire of a reminder.
    ///
    /// Suppresses any further fire of this id for the rest of the calendar
    /// date. The already re-armed next-day timer stays armed. The id is
    /// recorded even when the reminder no longer exists: the user may
    /// acknowledge a banner for a reminder deleted moments earlier.
    pub async fn dismiss(&mut self, id: Uuid) {
        if let Err(e) = self.ledger.lock().await.mark_dismissed(id) {
            warn!(id = %id, "cannot persist dismissal: {e}");
        }
    }

    /// Cancel every pending timer. Call on process teardown.
    pub fn shutdown(&mut self) {
        self.timers.shutdown();
    }

    /// Store writes are synchronous and assumed to succeed; a failure is
    /// logged and the mutation proceeds so the in-memory model, timers, and
    /// native mirror stay consistent with each other.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.reminders) {
            warn!("cannot persist reminders: {e}");
        }
    }
}
