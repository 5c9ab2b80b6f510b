//! Studybell: recurring reminder scheduling engine.
//!
//! Fires a user-defined set of reminders at specific times of day, every
//! day, indefinitely, keeping two independent notification channels
//! consistent with each other and with user edits:
//!
//! - **Soft timers**: in-process single-shot wall-clock delays that emit a
//!   [`ReminderFired`] event to the presentation layer and re-arm for the
//!   next day.
//! - **Native notifications**: a best-effort mirror into the host OS
//!   scheduled-notification service, for delivery while the process is not
//!   running.
//!
//! # Architecture
//!
//! The [`ReminderController`] is the only entry point the rest of the
//! application talks to. Every mutation runs the same fixed sequence:
//! in-memory model → [`ReminderStore`] → [`SoftTimerScheduler`] →
//! [`NativeNotificationBridge`]. Fires consult the [`DismissalLedger`] so an
//! acknowledged reminder stays quiet for the rest of its calendar date,
//! while its timer keeps re-arming for tomorrow.
//!
//! Wall-clock local time only; timezone-aware calendars, cross-device sync,
//! and UI rendering are out of scope.

pub mod app_dirs;
pub mod bridge;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod reminder;
pub mod store;
pub mod timers;

pub use bridge::{NativeNotificationBridge, NativeSchedule, NotificationAuthority};
pub use controller::ReminderController;
pub use error::{ReminderError, Result};
pub use ledger::DismissalLedger;
pub use reminder::{Reminder, ReminderFired, ReminderKind, ReminderPatch, ReminderTime};
pub use store::ReminderStore;
pub use timers::SoftTimerScheduler;
