//! Single task owning a [`SessionPresenter`].
//!
//! Commands and timer ticks are both handled by this one task, so the step
//! index and the session are never touched concurrently. Observers read
//! the published watch channels from anywhere.

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use super::ports::{Clock, SessionRepository, SettingsProvider};
use super::state_machine::SessionPresenter;
use super::view_state::{SessionDialog, SessionViewState};
use crate::error::{Result, SessionError};

const COMMAND_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    SoundLoaded,
    Pause,
    Resume,
    Abort,
    ResetAndStart,
    Cleanup,
}

pub struct SessionController;

impl SessionController {
    /// Move `presenter` into a new task and return a handle to drive it.
    /// Must be called from within a tokio runtime.
    pub fn spawn<S, R, C>(presenter: SessionPresenter<S, R, C>) -> SessionHandle
    where
        S: SettingsProvider + Send + 'static,
        R: SessionRepository + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (commands, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let view = presenter.view_state();
        let dialog = presenter.dialog();
        let beeps = presenter.beep_sender();
        let task = tokio::spawn(run(presenter, command_rx));
        SessionHandle {
            commands,
            view,
            dialog,
            beeps,
            task,
        }
    }
}

async fn run<S, R, C>(
    mut presenter: SessionPresenter<S, R, C>,
    mut commands: mpsc::Receiver<SessionCommand>,
) where
    S: SettingsProvider,
    R: SessionRepository,
    C: Clock,
{
    let mut ticks = presenter.ticks();
    loop {
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(command) => apply(&mut presenter, command),
                None => break,
            },
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let tick = *ticks.borrow_and_update();
                if let Some(tick) = tick {
                    presenter.on_tick(tick);
                }
            }
        }
    }
    presenter.cleanup();
    tracing::debug!("session controller stopped");
}

fn apply<S, R, C>(presenter: &mut SessionPresenter<S, R, C>, command: SessionCommand)
where
    S: SettingsProvider,
    R: SessionRepository,
    C: Clock,
{
    match command {
        SessionCommand::SoundLoaded => presenter.on_sound_loaded(),
        SessionCommand::Pause => presenter.pause(),
        SessionCommand::Resume => presenter.resume(),
        SessionCommand::Abort => presenter.abort_session(),
        SessionCommand::ResetAndStart => presenter.reset_and_start(),
        SessionCommand::Cleanup => presenter.cleanup(),
    }
}

/// Handle to a running [`SessionController`].
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    view: watch::Receiver<SessionViewState>,
    dialog: watch::Receiver<SessionDialog>,
    beeps: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// # Errors
    /// Returns [`SessionError::ControllerStopped`] if the task is gone.
    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::ControllerStopped.into())
    }

    pub async fn sound_loaded(&self) -> Result<()> {
        self.send(SessionCommand::SoundLoaded).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.send(SessionCommand::Resume).await
    }

    pub async fn abort(&self) -> Result<()> {
        self.send(SessionCommand::Abort).await
    }

    pub async fn reset_and_start(&self) -> Result<()> {
        self.send(SessionCommand::ResetAndStart).await
    }

    pub async fn cleanup(&self) -> Result<()> {
        self.send(SessionCommand::Cleanup).await
    }

    pub fn view_state(&self) -> watch::Receiver<SessionViewState> {
        self.view.clone()
    }

    pub fn dialog(&self) -> watch::Receiver<SessionDialog> {
        self.dialog.clone()
    }

    pub fn beeps(&self) -> broadcast::Receiver<()> {
        self.beeps.subscribe()
    }

    /// Wait until the view state is terminal and return it.
    pub async fn finished(&self) -> SessionViewState {
        let mut view = self.view.clone();
        if let Ok(state) = view.wait_for(SessionViewState::is_terminal).await {
            return state.clone();
        }
        let last = view.borrow().clone();
        last
    }

    /// Stop the controller task and wait for it.
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "session controller task failed");
        }
    }
}
