mod engine;

pub use engine::{StepTimer, StepTimerState};
