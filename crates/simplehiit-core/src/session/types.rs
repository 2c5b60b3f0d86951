use serde::{Deserialize, Serialize};

use crate::exercise::{selected_types, Exercise, ExerciseType, ExerciseTypeSelected};

/// Someone taking part in sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

/// Parameters of one session launch. Built from the persisted preferences
/// and the selected users; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub number_cumulated_cycles: usize,
    pub work_period_length_ms: u64,
    pub rest_period_length_ms: u64,
    pub number_of_work_periods: usize,
    pub cycle_length_ms: u64,
    pub beep_sound_count_down_active: bool,
    pub session_start_count_down_length_ms: u64,
    pub periods_start_count_down_length_ms: u64,
    pub users: Vec<User>,
    pub exercise_types: Vec<ExerciseTypeSelected>,
}

impl SessionSettings {
    pub fn selected_types(&self) -> Vec<ExerciseType> {
        selected_types(&self.exercise_types)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    None,
    Left,
    Right,
}

/// Fields shared by rest and work steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseStep {
    pub exercise: Exercise,
    pub side: Side,
    pub duration_ms: u64,
    pub duration_formatted: String,
    pub count_down_length_ms: u64,
    pub remaining_session_duration_ms_after_me: u64,
}

/// One timed phase of a session.
///
/// `remaining_session_duration_ms_after_me` is the sum of the durations of
/// every later step, so progress is computed from a tick without summing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionStep {
    Prepare {
        duration_ms: u64,
        count_down_length_ms: u64,
        remaining_session_duration_ms_after_me: u64,
    },
    Rest(ExerciseStep),
    Work(ExerciseStep),
}

impl SessionStep {
    pub fn duration_ms(&self) -> u64 {
        match self {
            SessionStep::Prepare { duration_ms, .. } => *duration_ms,
            SessionStep::Rest(s) | SessionStep::Work(s) => s.duration_ms,
        }
    }

    pub fn count_down_length_ms(&self) -> u64 {
        match self {
            SessionStep::Prepare {
                count_down_length_ms,
                ..
            } => *count_down_length_ms,
            SessionStep::Rest(s) | SessionStep::Work(s) => s.count_down_length_ms,
        }
    }

    pub fn remaining_session_duration_ms_after_me(&self) -> u64 {
        match self {
            SessionStep::Prepare {
                remaining_session_duration_ms_after_me,
                ..
            } => *remaining_session_duration_ms_after_me,
            SessionStep::Rest(s) | SessionStep::Work(s) => {
                s.remaining_session_duration_ms_after_me
            }
        }
    }

    /// Session time left when this step starts.
    pub fn remaining_session_duration_ms_at_start(&self) -> u64 {
        self.duration_ms() + self.remaining_session_duration_ms_after_me()
    }

    pub fn exercise_step(&self) -> Option<&ExerciseStep> {
        match self {
            SessionStep::Prepare { .. } => None,
            SessionStep::Rest(s) | SessionStep::Work(s) => Some(s),
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, SessionStep::Work(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, SessionStep::Rest(_))
    }
}

/// An immutable, fully planned workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub steps: Vec<SessionStep>,
    pub duration_ms: u64,
    pub beep_sound_count_down_active: bool,
    pub users: Vec<User>,
}

/// What gets persisted once a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Assigned by the store; `None` until inserted.
    #[serde(default)]
    pub id: Option<i64>,
    pub timestamp_ms: i64,
    pub duration_ms: u64,
    pub users_ids: Vec<i64>,
}
