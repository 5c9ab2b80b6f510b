//! End-to-end reminder lifecycle scenario.
//!
//! Drives the controller through the full flow: create → soft timer fires
//! with the kind-derived text → dismiss → suppressed for the rest of the
//! day → process restart converges both channels from the persisted set.
//! Runs entirely on tokio's paused clock, so no real sleeping happens.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studybell::{
    DismissalLedger, NativeNotificationBridge, NativeSchedule, NotificationAuthority, Reminder,
    ReminderController, ReminderFired, ReminderKind, ReminderStore, ReminderTime,
};
use tokio::sync::mpsc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Records every schedule/cancel request the bridge issues.
#[derive(Default)]
struct RecordingAuthority {
    scheduled: Mutex<Vec<NativeSchedule>>,
    cancelled: Mutex<Vec<u32>>,
}

#[async_trait]
impl NotificationAuthority for RecordingAuthority {
    async fn schedule(&self, request: NativeSchedule) -> studybell::Result<()> {
        self.scheduled.lock().unwrap().push(request);
        Ok(())
    }

    async fn cancel(&self, key: u32) -> studybell::Result<()> {
        self.cancelled.lock().unwrap().push(key);
        Ok(())
    }
}

fn make_controller(
    data_dir: &Path,
    authority: Arc<RecordingAuthority>,
) -> (ReminderController, mpsc::UnboundedReceiver<ReminderFired>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = ReminderController::new(
        ReminderStore::new(data_dir.join("reminders.json")),
        DismissalLedger::load(data_dir.join("dismissals.json")),
        NativeNotificationBridge::new(authority),
        tx,
    );
    (controller, rx)
}

#[tokio::test(start_paused = true)]
async fn create_fire_dismiss_restart_cycle() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let authority = Arc::new(RecordingAuthority::default());
    let (mut controller, mut rx) = make_controller(dir.path(), Arc::clone(&authority));

    // Create a daily-study reminder at 09:00.
    let reminder = Reminder::new(
        ReminderKind::DailyStudy,
        ReminderTime::new(9, 0).unwrap(),
        "Morning review",
    )
    .unwrap();
    let id = reminder.id;
    let list = controller.create(reminder).await.unwrap();
    assert_eq!(list.len(), 1);

    // Both channels converged: soft timer armed, native alert scheduled.
    assert!(controller.is_armed(id));
    {
        let scheduled = authority.scheduled.lock().unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].title, "📚 Time to Study!");
        assert!(scheduled[0].repeats_daily);
        assert_eq!(
            scheduled[0].key,
            NativeNotificationBridge::notification_key(id)
        );
    }

    // The soft timer fires with the kind-derived text.
    let event = rx.recv().await.expect("reminder fired");
    assert_eq!(event.reminder_id, id);
    assert_eq!(event.title, "📚 Time to Study!");
    assert_eq!(event.body, "Your daily study session is waiting.");

    // The user acknowledges the banner: no more fires today, yet the
    // next-day timer stays armed.
    controller.dismiss(id).await;
    let silence = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
    assert!(silence.is_err(), "no second event on the same calendar date");
    assert!(controller.is_armed(id));

    // Process teardown cancels every pending timer.
    controller.shutdown();
    assert!(!controller.is_armed(id));
    drop(controller);

    // "Restart": a fresh controller restores from the persisted set and
    // re-arms the enabled reminder with the same native key.
    let (mut restarted, _rx2) = make_controller(dir.path(), Arc::clone(&authority));
    restarted.restore().await;
    assert_eq!(restarted.reminders().len(), 1);
    assert_eq!(restarted.reminders()[0].id, id);
    assert!(restarted.is_armed(id));
    {
        let scheduled = authority.scheduled.lock().unwrap();
        assert_eq!(scheduled.len(), 2);
        assert_eq!(scheduled[0].key, scheduled[1].key);
    }
}

#[tokio::test(start_paused = true)]
async fn delete_cancels_the_native_alert() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let authority = Arc::new(RecordingAuthority::default());
    let (mut controller, _rx) = make_controller(dir.path(), Arc::clone(&authority));

    let reminder = Reminder::new(
        ReminderKind::Exam,
        ReminderTime::new(18, 30).unwrap(),
        "Finals prep",
    )
    .unwrap();
    let id = reminder.id;
    controller.create(reminder).await.unwrap();
    controller.delete(id).await.unwrap();

    assert!(controller.reminders().is_empty());
    assert!(!controller.is_armed(id));
    assert_eq!(
        *authority.cancelled.lock().unwrap(),
        vec![NativeNotificationBridge::notification_key(id)]
    );

    // The empty set is what a restart sees.
    let persisted = ReminderStore::new(dir.path().join("reminders.json")).load();
    assert!(persisted.is_empty());
}
