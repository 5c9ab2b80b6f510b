//! Reminder data model.
//!
//! Defines the [`Reminder`] type, [`ReminderKind`] with its kind-derived
//! default texts, the wall-clock [`ReminderTime`], the [`ReminderPatch`]
//! used by update operations, and the [`ReminderFired`] event delivered to
//! the presentation layer.

use crate::error::{ReminderError, Result};
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a reminder, determining its default title and body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Daily study session nudge.
    DailyStudy,
    /// Review-streak preservation nudge.
    Streak,
    /// Upcoming-exam preparation nudge.
    Exam,
    /// User-defined reminder; text comes from the label or custom overrides.
    Custom,
}

impl ReminderKind {
    /// Default notification title for this kind.
    #[must_use]
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::DailyStudy => "📚 Time to Study!",
            Self::Streak => "🔥 Keep Your Streak!",
            Self::Exam => "📝 Exam Prep",
            Self::Custom => "⏰ Reminder",
        }
    }

    /// Default notification body for this kind.
    ///
    /// `Custom` has no meaningful default body; callers fall back to the
    /// reminder label instead.
    #[must_use]
    pub fn default_body(&self) -> &'static str {
        match self {
            Self::DailyStudy => "Your daily study session is waiting.",
            Self::Streak => "A quick review session keeps your streak alive.",
            Self::Exam => "An exam is coming up. Time for a practice round.",
            Self::Custom => "",
        }
    }
}

/// Wall-clock local time of day (hour and minute), no date component.
///
/// Serializes as an `"HH:MM"` string to match the persisted reminder schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    /// Create a time of day, validating the hour and minute ranges.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(ReminderError::InvalidInput(format!(
                "time out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Hour of day (0-23, local wall clock).
    #[must_use]
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of hour (0-59).
    #[must_use]
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Parse an `"HH:MM"` string.
    pub fn parse(s: &str) -> Result<Self> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ReminderError::InvalidInput(format!("malformed time: {s:?}")))?;
        let hour: u8 = h
            .parse()
            .map_err(|_| ReminderError::InvalidInput(format!("malformed time: {s:?}")))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| ReminderError::InvalidInput(format!("malformed time: {s:?}")))?;
        Self::new(hour, minute)
    }

    /// Next occurrence of this time of day at or after `now`.
    ///
    /// Returns today at this time when that moment is still ahead, otherwise
    /// tomorrow at the same time. A fire at exactly `now` counts as passed,
    /// so a timer that just fired re-arms for tomorrow rather than today.
    #[must_use]
    pub fn next_occurrence(&self, now: NaiveDateTime) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0)
            .unwrap_or(NaiveTime::MIN);
        let candidate = now.date().and_time(time);
        if candidate > now {
            candidate
        } else {
            candidate + TimeDelta::days(1)
        }
    }
}

impl std::fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for ReminderTime {
    type Err = ReminderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = ReminderError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ReminderTime> for String {
    fn from(t: ReminderTime) -> Self {
        t.to_string()
    }
}

/// A user-defined recurring daily reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Opaque unique identifier, stable for the reminder's lifetime.
    pub id: Uuid,
    /// Category determining default notification texts.
    pub kind: ReminderKind,
    /// Wall-clock local time of day at which the reminder fires.
    pub time: ReminderTime,
    /// Disabled reminders have no live timer and no native schedule.
    pub enabled: bool,
    /// Display name.
    pub label: String,
    /// Optional override of the kind-derived title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    /// Optional override of the kind-derived body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

impl Reminder {
    /// Create a new enabled reminder with a fresh id.
    pub fn new(kind: ReminderKind, time: ReminderTime, label: impl Into<String>) -> Result<Self> {
        let label = validated_label(label.into())?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            time,
            enabled: true,
            label,
            custom_title: None,
            custom_message: None,
        })
    }

    /// Notification title: custom override, else the kind-derived default.
    #[must_use]
    pub fn title(&self) -> String {
        self.custom_title
            .clone()
            .unwrap_or_else(|| self.kind.default_title().to_owned())
    }

    /// Notification body: custom override, else the kind-derived default,
    /// with the label standing in for `Custom` reminders.
    #[must_use]
    pub fn body(&self) -> String {
        if let Some(message) = &self.custom_message {
            return message.clone();
        }
        match self.kind {
            ReminderKind::Custom => self.label.clone(),
            kind => kind.default_body().to_owned(),
        }
    }
}

/// Partial update applied by [`ReminderController::update`](crate::controller::ReminderController::update).
///
/// Unset fields leave the reminder untouched. The custom text fields are
/// doubly optional so a patch can clear an override (`Some(None)`) as well
/// as set one.
#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    /// New display name.
    pub label: Option<String>,
    /// New fire time.
    pub time: Option<ReminderTime>,
    /// Enable or disable.
    pub enabled: Option<bool>,
    /// Set or clear the title override.
    pub custom_title: Option<Option<String>>,
    /// Set or clear the body override.
    pub custom_message: Option<Option<String>>,
}

impl ReminderPatch {
    /// Patch that only retimes the reminder.
    #[must_use]
    pub fn retime(time: ReminderTime) -> Self {
        Self {
            time: Some(time),
            ..Self::default()
        }
    }

    /// Patch that only toggles the enabled flag.
    #[must_use]
    pub fn set_enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    /// Patch that only renames the reminder.
    #[must_use]
    pub fn relabel(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

/// Event emitted to the presentation layer when a reminder fires and is not
/// suppressed by the dismissal ledger. Delivery is fire-and-forget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderFired {
    /// Id of the reminder that fired.
    pub reminder_id: Uuid,
    /// Resolved notification title.
    pub title: String,
    /// Resolved notification body.
    pub body: String,
    /// Local timestamp of the firing.
    pub fired_at: DateTime<Local>,
}

/// Validate and normalize a reminder label. Rejected labels cause no
/// mutation anywhere.
pub(crate) fn validated_label(label: String) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ReminderError::InvalidInput(
            "label must not be empty".to_owned(),
        ));
    }
    Ok(trimmed.to_owned())
}
