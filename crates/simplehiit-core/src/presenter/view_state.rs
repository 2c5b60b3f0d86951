use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;
use crate::session::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Rest,
    Work,
}

/// Countdown shown at the end of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountDown {
    pub seconds_display: String,
    /// 1.0 when the countdown starts, towards 0.0 at the step boundary.
    pub progress: f64,
    pub play_beep: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningState {
    pub period_type: PeriodType,
    pub exercise: Exercise,
    pub side: Side,
    pub step_remaining_time: String,
    pub step_remaining_percentage: f64,
    pub session_remaining_time: String,
    pub session_remaining_percentage: f64,
    pub count_down: Option<CountDown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoneExercise {
    pub exercise: Exercise,
    pub side: Side,
}

/// Published state of a session run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionViewState {
    #[default]
    Loading,
    InitialCountDownSession {
        count_down: CountDown,
    },
    RunningNominal(RunningState),
    Finished {
        session_duration_formatted: String,
        working_steps_done: Vec<DoneExercise>,
    },
    Error {
        error_code: String,
    },
}

impl SessionViewState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionViewState::Finished { .. } | SessionViewState::Error { .. }
        )
    }
}

/// Dialog overlaid on the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionDialog {
    #[default]
    None,
    Pause,
}
