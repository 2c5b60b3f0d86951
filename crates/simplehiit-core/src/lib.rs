//! # SimpleHiit Core Library
//!
//! Session timing core of SimpleHiit, a high-intensity interval training
//! coach. Everything the app does is available through this library; the
//! `simplehiit-cli` binary is a thin front-end over it.
//!
//! ## Architecture
//!
//! - **Exercises**: fixed catalog of exercises grouped by type, and a
//!   composer picking a varied sequence from the selected types
//! - **Session**: builder turning settings and exercises into a timed list
//!   of prepare, rest and work steps
//! - **Timer**: cancellable one-second countdown publishing to a watch channel
//! - **Presenter**: state machine reacting to ticks and commands, publishing
//!   view state and recording finished sessions
//! - **Stats**: streaks and weekly averages over recorded sessions
//! - **Storage**: SQLite users and session history, TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionBuilder`]: settings + exercises to [`Session`]
//! - [`StepTimer`]: countdown engine
//! - [`SessionPresenter`] / [`SessionController`]: session lifecycle
//! - [`Database`]: users and session records
//! - [`Config`]: workout preferences

pub mod error;
pub mod exercise;
pub mod format;
pub mod presenter;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, SessionError, ValidationError};
pub use exercise::{Exercise, ExerciseType, ExerciseTypeSelected};
pub use format::{DurationFormatter, DurationStyle};
pub use presenter::{
    Clock, SessionController, SessionDialog, SessionHandle, SessionPresenter, SessionRepository,
    SessionViewState, SettingsProvider, SystemClock,
};
pub use session::{Session, SessionBuilder, SessionRecord, SessionSettings, SessionStep, Side, User};
pub use stats::UserStatistics;
pub use storage::{Config, Database, StoreSettingsProvider};
pub use timer::{StepTimer, StepTimerState};
