//! Error types for the reminder engine.

/// Top-level error type for the reminder subsystem.
///
/// Filesystem failures surface through the variant of the subsystem that hit
/// them (`Store`, `Ledger`, `Bridge`) with the cause formatted into the
/// message, since callers never branch on the underlying I/O kind.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    /// Reminder store read/write error.
    #[error("store error: {0}")]
    Store(String),

    /// Dismissal ledger read/write error.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Native notification authority error.
    #[error("bridge error: {0}")]
    Bridge(String),

    /// Rejected reminder input (empty label, malformed time).
    #[error("invalid reminder: {0}")]
    InvalidInput(String),

    /// No reminder exists with the given id.
    #[error("unknown reminder: {0}")]
    UnknownReminder(uuid::Uuid),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ReminderError>;
