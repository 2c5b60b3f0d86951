//! Session presenter: timer ticks in, view states out.
//!
//! ```text
//! Loading -> InitialCountDownSession -> RunningNominal -> Finished
//!    \______________________\________________\__________> Error
//! ```
//!
//! Every progress value is recomputed from the absolute tick and the
//! step's precomputed `remaining_session_duration_ms_after_me`, so a
//! dropped tick never shifts anything. The pause dialog is published on its
//! own channel and leaves the view state untouched underneath.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;
use tokio::sync::{broadcast, watch};

use super::ports::{Clock, SessionRepository, SettingsProvider, SystemClock};
use super::view_state::{
    CountDown, DoneExercise, PeriodType, RunningState, SessionDialog, SessionViewState,
};
use crate::error::{CoreError, SessionError, ValidationError};
use crate::format::DurationFormatter;
use crate::session::{Session, SessionBuilder, SessionRecord, SessionStep};
use crate::timer::{StepTimer, StepTimerState};

const BEEP_CHANNEL_CAPACITY: usize = 16;

/// Session and step index of the run in progress.
#[derive(Debug)]
struct SessionRunner {
    session: Session,
    current_index: usize,
}

impl SessionRunner {
    fn current_step(&self) -> &SessionStep {
        &self.session.steps[self.current_index]
    }
}

pub struct SessionPresenter<S, R, C = SystemClock> {
    settings: S,
    repository: R,
    clock: C,
    builder: SessionBuilder,
    rng: Box<dyn RngCore + Send>,
    timer: StepTimer,
    /// Ticks from any other run are stale.
    active_run: Option<u64>,
    runner: Option<SessionRunner>,
    view_tx: watch::Sender<SessionViewState>,
    dialog_tx: watch::Sender<SessionDialog>,
    beep_tx: broadcast::Sender<()>,
    digits: DurationFormatter,
    words: DurationFormatter,
}

impl<S, R> SessionPresenter<S, R, SystemClock>
where
    S: SettingsProvider,
    R: SessionRepository,
{
    pub fn new(settings: S, repository: R) -> Self {
        Self::with_clock(settings, repository, SystemClock)
    }
}

impl<S, R, C> SessionPresenter<S, R, C>
where
    S: SettingsProvider,
    R: SessionRepository,
    C: Clock,
{
    pub fn with_clock(settings: S, repository: R, clock: C) -> Self {
        let (view_tx, _) = watch::channel(SessionViewState::Loading);
        let (dialog_tx, _) = watch::channel(SessionDialog::None);
        let (beep_tx, _) = broadcast::channel(BEEP_CHANNEL_CAPACITY);
        Self {
            settings,
            repository,
            clock,
            builder: SessionBuilder::new(DurationFormatter::digits()),
            rng: Box::new(Pcg64::from_entropy()),
            timer: StepTimer::new(),
            active_run: None,
            runner: None,
            view_tx,
            dialog_tx,
            beep_tx,
            digits: DurationFormatter::digits(),
            words: DurationFormatter::words(),
        }
    }

    /// Make exercise composition reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Box::new(Pcg64::seed_from_u64(seed));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn view_state(&self) -> watch::Receiver<SessionViewState> {
        self.view_tx.subscribe()
    }

    pub fn dialog(&self) -> watch::Receiver<SessionDialog> {
        self.dialog_tx.subscribe()
    }

    /// Fires once per tick that falls inside a countdown with beeps on.
    pub fn beeps(&self) -> broadcast::Receiver<()> {
        self.beep_tx.subscribe()
    }

    pub(crate) fn beep_sender(&self) -> broadcast::Sender<()> {
        self.beep_tx.clone()
    }

    pub fn ticks(&self) -> watch::Receiver<Option<StepTimerState>> {
        self.timer.subscribe()
    }

    pub fn session(&self) -> Option<&Session> {
        self.runner.as_ref().map(|r| &r.session)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.runner.as_ref().map(|r| r.current_index)
    }

    pub fn timer(&self) -> &StepTimer {
        &self.timer
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Sounds are ready: load settings, build the session, start the timer.
    pub fn on_sound_loaded(&mut self) {
        let settings = match self.settings.session_settings() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "could not load session settings");
                self.emit_error(e.code());
                return;
            }
        };
        let session = match self.builder.build_random(&settings, &mut *self.rng) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "could not build session");
                self.emit_error(e.code());
                return;
            }
        };
        if session.steps.is_empty() {
            let e: CoreError = ValidationError::EmptyCollection("session steps".into()).into();
            self.emit_error(e.code());
            return;
        }

        tracing::info!(
            steps = session.steps.len(),
            duration_ms = session.duration_ms,
            users = session.users.len(),
            "session started"
        );
        let total_ms = session.duration_ms;
        self.runner = Some(SessionRunner {
            session,
            current_index: 0,
        });
        self.active_run = Some(self.timer.start(total_ms));
    }

    /// Handle one timer value. Values from a stale run are dropped.
    pub fn on_tick(&mut self, tick: StepTimerState) {
        if self.active_run != Some(tick.run) {
            return;
        }
        let Some(runner) = self.runner.as_mut() else {
            self.emit_error(SessionError::SessionNotFound.code());
            return;
        };

        let remaining = tick.milli_seconds_remaining;
        let last_index = runner.session.steps.len() - 1;
        while runner.current_index < last_index
            && remaining <= runner.current_step().remaining_session_duration_ms_after_me()
        {
            runner.current_index += 1;
            tracing::debug!(index = runner.current_index, remaining, "step boundary crossed");
        }

        if remaining == 0 && runner.current_index == last_index {
            self.finalize();
            return;
        }

        let view = running_view(&runner.session, runner.current_step(), remaining, &self.digits);
        let beep = match &view {
            SessionViewState::InitialCountDownSession { count_down } => count_down.play_beep,
            SessionViewState::RunningNominal(state) => {
                state.count_down.as_ref().is_some_and(|c| c.play_beep)
            }
            _ => false,
        };
        self.view_tx.send_replace(view);
        if beep {
            // No subscriber is not an error.
            let _ = self.beep_tx.send(());
        }
    }

    /// Stop the timer and show the pause dialog. A work step in progress
    /// is rewound to the rest step before it.
    pub fn pause(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            self.emit_error(SessionError::SessionNotFound.code());
            return;
        };
        self.timer.cancel();
        self.active_run = None;
        // Index 0 is a prepare or rest step, never work.
        if runner.current_step().is_work() {
            runner.current_index = runner.current_index.saturating_sub(1);
        }
        tracing::debug!(index = runner.current_index, "session paused");
        self.dialog_tx.send_replace(SessionDialog::Pause);
    }

    /// Restart the timer from the start of the current step.
    pub fn resume(&mut self) {
        let Some(runner) = self.runner.as_ref() else {
            self.emit_error(SessionError::SessionNotFound.code());
            return;
        };
        let restart_ms = runner.current_step().remaining_session_duration_ms_at_start();
        tracing::debug!(index = runner.current_index, restart_ms, "session resumed");
        self.active_run = Some(self.timer.start(restart_ms));
        self.dialog_tx.send_replace(SessionDialog::None);
    }

    /// End the session early, keeping what was done.
    pub fn abort_session(&mut self) {
        if self.runner.is_none() {
            self.emit_error(SessionError::SessionNotFound.code());
            return;
        }
        self.finalize();
        self.dialog_tx.send_replace(SessionDialog::None);
    }

    /// Drop the session and stop background work.
    pub fn cleanup(&mut self) {
        self.timer.cancel();
        self.active_run = None;
        self.runner = None;
    }

    pub fn reset_and_start(&mut self) {
        self.cleanup();
        self.view_tx.send_replace(SessionViewState::Loading);
        self.dialog_tx.send_replace(SessionDialog::None);
        self.on_sound_loaded();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finalize(&mut self) {
        self.timer.cancel();
        self.active_run = None;
        let Some(SessionRunner {
            session,
            current_index,
        }) = self.runner.take()
        else {
            self.emit_error(SessionError::SessionNotFound.code());
            return;
        };

        // A rest step in progress is not counted.
        let last_counted = if session.steps[current_index].is_rest() {
            current_index.checked_sub(1)
        } else {
            Some(current_index)
        };
        let done = match last_counted {
            Some(index) => &session.steps[..=index],
            None => &[][..],
        };
        let (mut rest_ms, mut rest_count) = (0u64, 0usize);
        let (mut work_ms, mut work_count) = (0u64, 0usize);
        let mut working_steps_done = Vec::new();
        for step in done {
            match step {
                SessionStep::Rest(s) => {
                    rest_ms += s.duration_ms;
                    rest_count += 1;
                }
                SessionStep::Work(s) => {
                    work_ms += s.duration_ms;
                    work_count += 1;
                    working_steps_done.push(DoneExercise {
                        exercise: s.exercise,
                        side: s.side,
                    });
                }
                SessionStep::Prepare { .. } => {}
            }
        }
        let actual_ms = if rest_count > 0 && work_count > 0 {
            rest_ms + work_ms
        } else {
            0
        };

        if actual_ms > 0 {
            let record = SessionRecord {
                id: None,
                timestamp_ms: self.clock.now_ms(),
                duration_ms: actual_ms,
                users_ids: session.users.iter().map(|u| u.id).collect(),
            };
            match self.repository.insert_session(&record) {
                Ok(id) => tracing::info!(id, duration_ms = actual_ms, "session recorded"),
                Err(e) => tracing::error!(error = %e, "failed to record session"),
            }
        } else {
            tracing::info!("session too short to be recorded");
        }

        self.view_tx.send_replace(SessionViewState::Finished {
            session_duration_formatted: self.words.format(actual_ms),
            working_steps_done,
        });
    }

    fn emit_error(&mut self, code: &str) {
        tracing::warn!(code, "session error");
        self.view_tx.send_replace(SessionViewState::Error {
            error_code: code.to_string(),
        });
    }
}

fn running_view(
    session: &Session,
    step: &SessionStep,
    remaining: u64,
    formatter: &DurationFormatter,
) -> SessionViewState {
    let step_remaining = remaining.saturating_sub(step.remaining_session_duration_ms_after_me());
    let count_down_length = step.count_down_length_ms();
    let count_down = (count_down_length > 0 && step_remaining <= count_down_length).then(|| {
        CountDown {
            seconds_display: (step_remaining / 1000).to_string(),
            progress: ratio(step_remaining, count_down_length),
            play_beep: session.beep_sound_count_down_active,
        }
    });

    match step {
        SessionStep::Prepare { .. } => SessionViewState::InitialCountDownSession {
            count_down: count_down.unwrap_or_else(|| CountDown {
                seconds_display: (step_remaining / 1000).to_string(),
                progress: 1.0,
                play_beep: false,
            }),
        },
        SessionStep::Rest(s) | SessionStep::Work(s) => {
            SessionViewState::RunningNominal(RunningState {
                period_type: if step.is_work() {
                    PeriodType::Work
                } else {
                    PeriodType::Rest
                },
                exercise: s.exercise,
                side: s.side,
                step_remaining_time: formatter.format(step_remaining),
                step_remaining_percentage: ratio(step_remaining, s.duration_ms),
                session_remaining_time: formatter.format(remaining),
                session_remaining_percentage: ratio(remaining, session.duration_ms),
                count_down,
            })
        }
    }
}

/// `part / whole` clamped to 0.0 ..= 1.0.
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).min(1.0)
}
