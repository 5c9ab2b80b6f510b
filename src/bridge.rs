//! Native notification bridge.
//!
//! Best-effort mirror of the soft-scheduler state into the host platform's
//! scheduled-notification service, so reminders still fire while the process
//! is not running (platform permitting). Every authority call is advisory:
//! failures are logged and swallowed, never propagated to the soft-timer
//! path. The two delivery channels are intentionally independent.

use crate::error::Result;
use crate::reminder::{Reminder, ReminderTime};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A request for a repeating daily native alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeSchedule {
    /// Numeric key the authority addresses the alert by.
    pub key: u32,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Wall-clock local trigger time.
    pub time: ReminderTime,
    /// Always `true` here; present because the wire schema carries it.
    pub repeats_daily: bool,
}

/// External OS-level notification authority.
///
/// Implementations wrap the platform service; hosts without one use
/// [`NativeNotificationBridge::disabled`] instead. Calls may fail for
/// missing permissions or unsupported platforms; the bridge treats every
/// failure as a no-op.
#[async_trait]
pub trait NotificationAuthority: Send + Sync {
    /// Schedule (or replace) the daily-repeating alert for a key.
    async fn schedule(&self, request: NativeSchedule) -> Result<()>;

    /// Cancel the alert for a key. Cancelling an unknown key is a no-op.
    async fn cancel(&self, key: u32) -> Result<()>;
}

/// Mirrors reminder state into a [`NotificationAuthority`], best-effort.
pub struct NativeNotificationBridge {
    authority: Option<Arc<dyn NotificationAuthority>>,
}

impl NativeNotificationBridge {
    /// Bridge backed by a live notification authority.
    #[must_use]
    pub fn new(authority: Arc<dyn NotificationAuthority>) -> Self {
        Self {
            authority: Some(authority),
        }
    }

    /// Bridge for hosts without native notifications; every call is a no-op.
    #[must_use]
    pub fn disabled() -> Self {
        Self { authority: None }
    }

    /// Stable numeric key the native authority addresses a reminder by.
    ///
    /// Derived from the UUID's leading bytes so the same reminder maps to
    /// the same key across process restarts.
    #[must_use]
    pub fn notification_key(id: Uuid) -> u32 {
        let bytes = id.as_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Mirror one reminder: schedule when enabled, cancel when not.
    ///
    /// Failures are swallowed; the next `sync` triggered by any future
    /// mutation naturally re-attempts.
    pub async fn sync(&self, reminder: &Reminder) {
        let Some(authority) = &self.authority else {
            return;
        };

        let key = Self::notification_key(reminder.id);
        let outcome = if reminder.enabled {
            debug!(id = %reminder.id, key, "scheduling native notification");
            authority
                .schedule(NativeSchedule {
                    key,
                    title: reminder.title(),
                    body: reminder.body(),
                    time: reminder.time,
                    repeats_daily: true,
                })
                .await
        } else {
            debug!(id = %reminder.id, key, "cancelling native notification");
            authority.cancel(key).await
        };

        if let Err(e) = outcome {
            warn!(id = %reminder.id, "native notification sync failed: {e}");
        }
    }

    /// Cancel the native alert for a deleted reminder. Failures are
    /// swallowed like in [`sync`](Self::sync).
    pub async fn remove(&self, id: Uuid) {
        let Some(authority) = &self.authority else {
            return;
        };

        let key = Self::notification_key(id);
        debug!(id = %id, key, "removing native notification");
        if let Err(e) = authority.cancel(key).await {
            warn!(id = %id, "native notification removal failed: {e}");
        }
    }
}
