//! One-shot initialization barrier
//!
//! The logger accepts calls as soon as it is constructed, but nothing may
//! touch the sink before initialization has finished. [`init_barrier`] hands
//! out a signal (consumed on use, so it fires exactly once) and a barrier
//! that any number of callers can wait on.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{LogError, LogResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum BarrierState {
    Pending,
    Ready,
    Failed(Arc<str>),
}

/// Create a linked signal/barrier pair
pub fn init_barrier() -> (InitSignal, InitBarrier) {
    let (tx, rx) = watch::channel(BarrierState::Pending);
    (InitSignal { tx }, InitBarrier { rx })
}

/// The completing side of the barrier
#[derive(Debug)]
pub struct InitSignal {
    tx: watch::Sender<BarrierState>,
}

impl InitSignal {
    /// Mark initialization as successful
    pub fn succeed(self) {
        self.tx.send_replace(BarrierState::Ready);
    }

    /// Mark initialization as failed
    pub fn fail(self, reason: impl Into<String>) {
        let reason: String = reason.into();
        self.tx.send_replace(BarrierState::Failed(reason.into()));
    }

    /// Signal the outcome of an initialization result
    pub fn complete(self, outcome: &LogResult<()>) {
        match outcome {
            Ok(()) => self.succeed(),
            Err(e) => self.fail(e.to_string()),
        }
    }
}

/// The waiting side of the barrier
#[derive(Debug, Clone)]
pub struct InitBarrier {
    rx: watch::Receiver<BarrierState>,
}

impl InitBarrier {
    /// Whether the barrier has been signaled, either way
    pub fn is_signaled(&self) -> bool {
        *self.rx.borrow() != BarrierState::Pending
    }

    /// Wait until initialization finished
    ///
    /// Returns the failure reason if it failed. If the signal was dropped
    /// without firing (the initialization task died), that counts as a
    /// failure too.
    pub async fn wait(&self) -> LogResult<()> {
        let mut rx = self.rx.clone();
        let result = match rx.wait_for(|s| *s != BarrierState::Pending).await {
            Ok(state) => outcome(&state),
            Err(_) => Err(LogError::Initialization(
                "initialization ended without completing".to_string(),
            )),
        };
        result
    }
}

/// Only `Ready` lets logging proceed
fn outcome(state: &BarrierState) -> LogResult<()> {
    match state {
        BarrierState::Ready => Ok(()),
        BarrierState::Failed(reason) => Err(LogError::Initialization(reason.to_string())),
        BarrierState::Pending => Err(LogError::Initialization(
            "initialization has not completed".to_string(),
        )),
    }
}
