mod builder;
mod types;

pub use builder::SessionBuilder;
pub use types::{
    ExerciseStep, Session, SessionRecord, SessionSettings, SessionStep, Side, User,
};
