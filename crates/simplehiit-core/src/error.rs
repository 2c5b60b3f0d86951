//! Core error types for simplehiit-core.
//!
//! Every error that can reach the session presenter maps to a stable
//! error code string (see [`CoreError::code`]), which is what the
//! `Error` view state carries.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for simplehiit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

impl CoreError {
    /// Stable code published in the `Error` view state.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Database(_) => "DATABASE_ERROR",
            CoreError::Config(_) => "CONFIG_ERROR",
            CoreError::Validation(_) => "INVALID_SETTINGS",
            CoreError::Session(e) => e.code(),
            CoreError::Io(_) => "IO_ERROR",
            CoreError::Json(_) => "SERIALIZATION_ERROR",
            CoreError::Custom(_) => "UNKNOWN_ERROR",
        }
    }
}

/// Errors raised by the session lifecycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// An operation needed an active session but none is loaded.
    #[error("no active session")]
    SessionNotFound,

    /// Nobody is selected to take part in the session.
    #[error("no user selected for the session")]
    NoUsersSelected,

    /// Every exercise type is disabled.
    #[error("no exercise type selected")]
    NoExerciseTypesSelected,

    /// The task driving the session has stopped.
    #[error("session controller stopped")]
    ControllerStopped,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::SessionNotFound => "SESSION_NOT_FOUND",
            SessionError::NoUsersSelected => "NO_USERS_SELECTED",
            SessionError::NoExerciseTypesSelected => "NO_EXERCISE_TYPES_SELECTED",
            SessionError::ControllerStopped => "SESSION_CONTROLLER_STOPPED",
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Row referenced by id does not exist
    #[error("No {table} row with id {id}")]
    NotFound { table: &'static str, id: i64 },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_not_found_has_stable_code() {
        let err: CoreError = SessionError::SessionNotFound.into();
        assert_eq!(err.code(), "SESSION_NOT_FOUND");
    }

    #[test]
    fn locked_sqlite_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(DatabaseError::from(err), DatabaseError::Locked));
    }

    #[test]
    fn validation_errors_report_invalid_settings() {
        let err: CoreError = ValidationError::invalid("work_period_length_ms", "too short").into();
        assert_eq!(err.code(), "INVALID_SETTINGS");
        assert!(err.to_string().contains("work_period_length_ms"));
    }
}
