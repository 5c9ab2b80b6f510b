//! Soft timer scheduler.
//!
//! Maintains exactly one live in-process timer per enabled reminder. Each
//! timer is a background tokio task that sleeps until the next occurrence of
//! the reminder's time of day, consults the dismissal ledger, emits a
//! [`ReminderFired`] event when not suppressed, and loops to re-arm for the
//! following day. Firing and re-arming are decoupled from dismissal: an
//! ignored reminder still comes back tomorrow.
//!
//! # Design
//!
//! The live timers form an explicit registry (reminder id →
//! [`CancellationToken`]) owned by the scheduler instance, so independent
//! schedulers can coexist in tests. Each per-reminder task runs a small
//! state machine: armed (awaiting the `select!`), firing (after the sleep
//! arm wins), and back to armed, or disarmed when its token is cancelled.
//! The task re-checks its token after waking and before emitting, so a
//! reminder disabled or deleted while the wake raced the cancel neither
//! surfaces nor re-arms.

use crate::ledger::DismissalLedger;
use crate::reminder::{Reminder, ReminderFired};
use chrono::Local;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Live timer registry, shared with the timer tasks so one that dies on a
/// closed event channel can remove its own entry.
type TimerMap = Arc<std::sync::Mutex<HashMap<Uuid, CancellationToken>>>;

/// Lock the registry, recovering from a poisoned lock: the map stays usable
/// even if a holder panicked, since it only carries cancellation handles.
fn lock_timers(timers: &TimerMap) -> std::sync::MutexGuard<'_, HashMap<Uuid, CancellationToken>> {
    timers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of live per-reminder timers.
pub struct SoftTimerScheduler {
    /// One cancellation handle per armed reminder.
    timers: TimerMap,
    /// Channel carrying fired events to the presentation layer.
    fired_tx: mpsc::UnboundedSender<ReminderFired>,
    /// Ledger consulted by every fire before surfacing.
    ledger: Arc<Mutex<DismissalLedger>>,
    /// Parent of every timer token; cancelled on shutdown/drop.
    root: CancellationToken,
}

impl SoftTimerScheduler {
    /// Create a scheduler emitting fired events on `fired_tx`.
    #[must_use]
    pub fn new(
        fired_tx: mpsc::UnboundedSender<ReminderFired>,
        ledger: Arc<Mutex<DismissalLedger>>,
    ) -> Self {
        Self {
            timers: Arc::new(std::sync::Mutex::new(HashMap::new())),
            fired_tx,
            ledger,
            root: CancellationToken::new(),
        }
    }

    /// Arm (or re-arm) the timer for a reminder.
    ///
    /// Idempotent: an existing timer for the same id is cancelled before the
    /// new one starts, so two `arm` calls in a row leave exactly one pending
    /// timer. Must be called from within a tokio runtime.
    pub fn arm(&mut self, reminder: &Reminder) {
        if !reminder.enabled {
            debug!(id = %reminder.id, "refusing to arm disabled reminder");
            return;
        }

        let token = self.root.child_token();
        {
            // Replace and cancel under one lock so a timer task observing
            // an uncancelled token knows the registry entry is its own.
            let mut timers = lock_timers(&self.timers);
            if let Some(previous) = timers.insert(reminder.id, token.clone()) {
                previous.cancel();
            }
        }

        debug!(id = %reminder.id, time = %reminder.time, "arming soft timer");
        tokio::spawn(run_timer(
            reminder.clone(),
            token,
            self.fired_tx.clone(),
            Arc::clone(&self.ledger),
            Arc::clone(&self.timers),
        ));
    }

    /// Cancel the pending timer for an id, if any.
    ///
    /// Safe to call for ids with no live timer, and safe against a racing
    /// natural expiry: a wake that lost the race to this cancel does not
    /// surface or re-arm.
    pub fn disarm(&mut self, id: Uuid) {
        if let Some(token) = lock_timers(&self.timers).remove(&id) {
            debug!(id = %id, "disarming soft timer");
            token.cancel();
        }
    }

    /// True when a live timer exists for the id.
    #[must_use]
    pub fn is_armed(&self, id: Uuid) -> bool {
        lock_timers(&self.timers).contains_key(&id)
    }

    /// Number of live timers.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        lock_timers(&self.timers).len()
    }

    /// Cancel every pending timer. Used on process teardown so no callback
    /// outlives the reminder subsystem.
    pub fn shutdown(&mut self) {
        self.root.cancel();
        lock_timers(&self.timers).clear();
    }
}

impl Drop for SoftTimerScheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

/// Per-reminder timer loop: sleep until the next occurrence, fire, repeat.
async fn run_timer(
    reminder: Reminder,
    cancel: CancellationToken,
    fired_tx: mpsc::UnboundedSender<ReminderFired>,
    ledger: Arc<Mutex<DismissalLedger>>,
    timers: TimerMap,
) {
    loop {
        let now = Local::now().naive_local();
        let fire_at = reminder.time.next_occurrence(now);
        let delay = (fire_at - now).to_std().unwrap_or_default();
        debug!(id = %reminder.id, %fire_at, "soft timer sleeping");

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(id = %reminder.id, "soft timer cancelled");
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        // A disarm may have raced the wakeup; a cancelled timer must not
        // surface or re-arm.
        if cancel.is_cancelled() {
            debug!(id = %reminder.id, "soft timer cancelled during wake");
            return;
        }

        let fired_at = Local::now();
        let dismissed = ledger
            .lock()
            .await
            .is_dismissed_on(reminder.id, fired_at.date_naive());
        if dismissed {
            debug!(id = %reminder.id, "already dismissed today, suppressing fire");
            continue; // re-arm for tomorrow
        }

        let event = ReminderFired {
            reminder_id: reminder.id,
            title: reminder.title(),
            body: reminder.body(),
            fired_at,
        };
        if fired_tx.send(event).is_err() {
            warn!(id = %reminder.id, "fired-event channel closed, stopping timer");
            // Remove our own registry entry so the dead timer no longer
            // reads as armed. Any replacing arm cancels this token under
            // the same lock first, so an uncancelled token still owns the
            // entry and a cancelled one must leave it alone.
            let mut timers = lock_timers(&timers);
            if !cancel.is_cancelled() {
                timers.remove(&reminder.id);
            }
            return;
        }
        // Loop continues: unconditionally re-armed for tomorrow regardless
        // of whether the user dismisses this fire.
    }
}
