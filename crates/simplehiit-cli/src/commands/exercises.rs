use serde::Serialize;
use simplehiit_core::{Config, Exercise, ExerciseType};

#[derive(Serialize)]
struct ExerciseEntry {
    exercise: Exercise,
    name: String,
    asymmetrical: bool,
}

#[derive(Serialize)]
struct TypeEntry {
    exercise_type: ExerciseType,
    name: String,
    selected: bool,
    exercises: Vec<ExerciseEntry>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let entries: Vec<TypeEntry> = ExerciseType::ALL
        .iter()
        .map(|&t| TypeEntry {
            exercise_type: t,
            name: t.to_string(),
            selected: config
                .exercise_types
                .iter()
                .any(|s| s.exercise_type == t && s.selected),
            exercises: t
                .exercises()
                .map(|e| ExerciseEntry {
                    exercise: e,
                    name: e.display_name(),
                    asymmetrical: e.is_asymmetrical(),
                })
                .collect(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
