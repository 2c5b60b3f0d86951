use std::io::Write;

use clap::Subcommand;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use simplehiit_core::presenter::{PeriodType, RunningState};
use simplehiit_core::{
    Database, SessionBuilder, SessionController, SessionPresenter, SessionViewState, Side,
    SettingsProvider, StoreSettingsProvider,
};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session in the terminal (Ctrl-C ends it early)
    Run {
        /// Do not print countdown seconds or ring the terminal bell
        #[arg(long)]
        no_countdown_output: bool,
        /// Seed for the exercise picker
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the steps of a session without running it
    Plan {
        /// Seed for the exercise picker
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run {
            no_countdown_output,
            seed,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_session(no_countdown_output, seed))
        }
        SessionAction::Plan { seed } => {
            let settings = StoreSettingsProvider::open()?.session_settings()?;
            let mut rng = match seed {
                Some(seed) => Pcg64::seed_from_u64(seed),
                None => Pcg64::from_entropy(),
            };
            let session = SessionBuilder::default().build_random(&settings, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
            Ok(())
        }
    }
}

async fn run_session(
    no_countdown_output: bool,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut presenter = SessionPresenter::new(StoreSettingsProvider::open()?, Database::open()?);
    if let Some(seed) = seed {
        presenter = presenter.with_seed(seed);
    }
    let handle = SessionController::spawn(presenter);
    let mut view = handle.view_state();
    let mut beeps = handle.beeps();
    handle.sound_loaded().await?;

    let mut last_line = String::new();
    let mut aborted = false;
    let final_state = loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break view.borrow().clone();
                }
                let state = view.borrow_and_update().clone();
                if state.is_terminal() {
                    break state;
                }
                if let Some(line) = render(&state, no_countdown_output) {
                    if line != last_line {
                        println!("{line}");
                        last_line = line;
                    }
                }
            }
            beep = beeps.recv() => {
                if beep.is_ok() && !no_countdown_output {
                    print!("\x07");
                    std::io::stdout().flush()?;
                }
            }
            _ = tokio::signal::ctrl_c(), if !aborted => {
                tracing::debug!("interrupted, ending session early");
                aborted = true;
                handle.abort().await?;
            }
        }
    };
    handle.shutdown().await;

    match final_state {
        SessionViewState::Finished {
            session_duration_formatted,
            working_steps_done,
        } => {
            println!("Session finished: {session_duration_formatted}");
            for done in working_steps_done {
                println!("  - {}{}", done.exercise.display_name(), side_suffix(done.side));
            }
            Ok(())
        }
        SessionViewState::Error { error_code } => {
            Err(format!("session failed: {error_code}").into())
        }
        other => Err(format!("session stopped in state {other:?}").into()),
    }
}

fn render(state: &SessionViewState, no_countdown_output: bool) -> Option<String> {
    match state {
        SessionViewState::InitialCountDownSession { count_down } => {
            Some(format!("Get ready... {}", count_down.seconds_display))
        }
        SessionViewState::RunningNominal(running) => {
            Some(render_running(running, no_countdown_output))
        }
        _ => None,
    }
}

fn render_running(state: &RunningState, no_countdown_output: bool) -> String {
    let label = match state.period_type {
        PeriodType::Work => "WORK",
        PeriodType::Rest => "REST",
    };
    let mut line = format!(
        "[{label}] {}{} {} | session {} ({:.0}%)",
        state.exercise.display_name(),
        side_suffix(state.side),
        state.step_remaining_time,
        state.session_remaining_time,
        state.session_remaining_percentage * 100.0,
    );
    if let (Some(count_down), false) = (&state.count_down, no_countdown_output) {
        line.push_str(&format!(" ... {}", count_down.seconds_display));
    }
    line
}

fn side_suffix(side: Side) -> &'static str {
    match side {
        Side::None => "",
        Side::Left => " (left)",
        Side::Right => " (right)",
    }
}
