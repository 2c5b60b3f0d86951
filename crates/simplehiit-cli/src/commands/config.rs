use clap::Subcommand;
use simplehiit_core::{Config, ExerciseType};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "session.work_period_length_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Enable an exercise type
    Enable {
        /// Exercise type (e.g. "lunge", "leaning_side_plank")
        exercise_type: String,
    },
    /// Disable an exercise type
    Disable {
        /// Exercise type
        exercise_type: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

fn parse_type(name: &str) -> Result<ExerciseType, Box<dyn std::error::Error>> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown exercise type: {name}").into())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::Enable { exercise_type } => {
            let mut config = Config::load()?;
            config.set_exercise_type_selected(parse_type(&exercise_type)?, true);
            config.save()?;
            println!("ok");
        }
        ConfigAction::Disable { exercise_type } => {
            let mut config = Config::load()?;
            config.set_exercise_type_selected(parse_type(&exercise_type)?, false);
            config.validate()?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
