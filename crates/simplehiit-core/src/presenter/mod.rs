mod controller;
mod ports;
mod state_machine;
mod view_state;

pub use controller::{SessionCommand, SessionController, SessionHandle};
pub use ports::{Clock, SessionRepository, SettingsProvider, SystemClock};
pub use state_machine::SessionPresenter;
pub use view_state::{
    CountDown, DoneExercise, PeriodType, RunningState, SessionDialog, SessionViewState,
};
