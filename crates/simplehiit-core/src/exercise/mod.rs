mod catalog;
mod composer;

pub use catalog::{
    exercises_of_types, selected_types, Exercise, ExerciseType, ExerciseTypeSelected,
};
pub use composer::compose;
