//! One-second countdown engine.
//!
//! `start(total)` publishes `total` immediately, then one value per second
//! down to 0 inclusive. Values go through a `watch` channel: subscribers
//! always see the latest one, and a slow subscriber skips intermediate
//! values instead of queueing them.
//!
//! ## Run ids
//!
//! Every `start` opens a new run. A value is only published while its run
//! is the current one, and the check happens under the same lock `cancel`
//! takes, so nothing from a cancelled run is published once `cancel`
//! returns.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_secs(1);
const TICK_MS: u64 = 1000;

/// One emission of the step timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTimerState {
    pub milli_seconds_remaining: u64,
    /// Value the run was started with.
    pub total_milli_seconds: u64,
    /// Run that produced this value.
    pub run: u64,
}

impl StepTimerState {
    /// 0.0 .. 1.0
    pub fn remaining_percentage(&self) -> f64 {
        if self.total_milli_seconds == 0 {
            return 0.0;
        }
        self.milli_seconds_remaining as f64 / self.total_milli_seconds as f64
    }
}

#[derive(Debug, Default)]
struct RunSlot {
    current: Option<u64>,
}

/// Cancellable background countdown. Must be started from within a tokio
/// runtime.
#[derive(Debug)]
pub struct StepTimer {
    /// `None` until the first start.
    tx: Arc<watch::Sender<Option<StepTimerState>>>,
    slot: Arc<Mutex<RunSlot>>,
    handle: Option<JoinHandle<()>>,
    last_run: u64,
}

impl StepTimer {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            slot: Arc::new(Mutex::new(RunSlot::default())),
            handle: None,
            last_run: 0,
        }
    }

    /// Latest value now, then every later one.
    pub fn subscribe(&self) -> watch::Receiver<Option<StepTimerState>> {
        self.tx.subscribe()
    }

    /// Latest published value.
    pub fn current(&self) -> Option<StepTimerState> {
        *self.tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .is_some()
    }

    /// Start counting down from `total_ms`, cancelling any previous run.
    /// Returns the id carried by every value of the new run.
    pub fn start(&mut self, total_ms: u64) -> u64 {
        self.cancel();
        self.last_run += 1;
        let run = self.last_run;

        {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            slot.current = Some(run);
            self.tx.send_replace(Some(StepTimerState {
                milli_seconds_remaining: total_ms,
                total_milli_seconds: total_ms,
                run,
            }));
            if total_ms == 0 {
                slot.current = None;
                return run;
            }
        }

        tracing::debug!(run, total_ms, "step timer started");
        let tx = Arc::clone(&self.tx);
        let slot = Arc::clone(&self.slot);
        self.handle = Some(tokio::spawn(async move {
            let mut remaining = total_ms;
            while remaining > 0 {
                tokio::time::sleep(TICK).await;
                remaining = remaining.saturating_sub(TICK_MS);

                let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
                if guard.current != Some(run) {
                    return;
                }
                tx.send_replace(Some(StepTimerState {
                    milli_seconds_remaining: remaining,
                    total_milli_seconds: total_ms,
                    run,
                }));
                if remaining == 0 {
                    guard.current = None;
                }
            }
        }));
        run
    }

    /// Stop the current run. Idempotent.
    pub fn cancel(&mut self) {
        let cancelled = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .take();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        if let Some(run) = cancelled {
            tracing::debug!(run, "step timer cancelled");
        }
    }
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StepTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
