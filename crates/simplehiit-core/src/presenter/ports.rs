//! Collaborators the presenter depends on.

use std::sync::Arc;

use crate::error::Result;
use crate::session::{SessionRecord, SessionSettings};

/// Source of the settings for the next session.
pub trait SettingsProvider {
    fn session_settings(&self) -> Result<SessionSettings>;
}

/// Sink for finished sessions. Returns the id of the stored record.
pub trait SessionRepository {
    fn insert_session(&self, record: &SessionRecord) -> Result<i64>;
}

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for Arc<T> {
    fn session_settings(&self) -> Result<SessionSettings> {
        (**self).session_settings()
    }
}

impl<T: SessionRepository + ?Sized> SessionRepository for Arc<T> {
    fn insert_session(&self, record: &SessionRecord) -> Result<i64> {
        (**self).insert_session(record)
    }
}
