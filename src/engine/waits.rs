//! One-shot completions for operations that finish on a later notification.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};

use crate::error::{PlayerError, PlayerResult};

/// Outcome of `load`, `play` and friends.
///
/// Resolves exactly once. If the engine drops the operation without an
/// answer (for instance because it shut down) the completion reports
/// `PlaybackAborted`.
#[derive(Debug)]
pub struct Completion {
    rx: Receiver<PlayerResult<()>>,
    outcome: Option<PlayerResult<()>>,
}

#[derive(Debug)]
pub(crate) struct Responder {
    tx: Sender<PlayerResult<()>>,
}

pub(crate) fn completion() -> (Responder, Completion) {
    let (tx, rx) = bounded(1);
    (Responder { tx }, Completion { rx, outcome: None })
}

impl Responder {
    pub(crate) fn resolve(self, result: PlayerResult<()>) {
        // The caller may have dropped its Completion; nothing to report to then.
        let _ = self.tx.send(result);
    }
}

impl Completion {
    /// An already-resolved completion.
    pub fn ready(result: PlayerResult<()>) -> Self {
        let (responder, completion) = completion();
        responder.resolve(result);
        completion
    }

    /// Non-blocking check; `None` while still pending.
    pub fn try_result(&mut self) -> Option<PlayerResult<()>> {
        if self.outcome.is_none() {
            self.outcome = match self.rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(dropped())),
            };
        }
        self.outcome.clone()
    }

    pub fn is_pending(&mut self) -> bool {
        self.try_result().is_none()
    }

    /// Block until resolved. Only useful off the engine's own thread.
    pub fn wait(mut self) -> PlayerResult<()> {
        if let Some(result) = self.outcome.take() {
            return result;
        }
        self.rx.recv().unwrap_or_else(|_| Err(dropped()))
    }

    /// Block for at most `timeout`; `None` if still pending afterwards.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<PlayerResult<()>> {
        if self.outcome.is_none() {
            self.outcome = match self.rx.recv_timeout(timeout) {
                Ok(result) => Some(result),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(Err(dropped())),
            };
        }
        self.outcome.clone()
    }
}

fn dropped() -> PlayerError {
    PlayerError::aborted("operation dropped before it completed")
}

/// Readiness wait registered by `load`.
#[derive(Debug)]
pub(crate) struct PendingLoad {
    pub(crate) deadline: Instant,
    pub(crate) responder: Responder,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum PlayStage {
    /// Not buffered enough yet; waiting for `CanPlayThrough`.
    AwaitingPlayThrough,
    /// `play` issued; waiting for `PlayResolved` / `PlayRejected`.
    AwaitingStart,
}

#[derive(Debug)]
pub(crate) struct PendingPlay {
    pub(crate) stage: PlayStage,
    pub(crate) responder: Responder,
}
