//! Folds media element notifications into [`PlaybackState`].
//!
//! The bridge holds the engine's end of the notification mailbox and the
//! subscription on the backend. It is attached once when the engine is built
//! and detached when the engine is dropped.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::media::{MediaBackend, MediaEvent, MediaNotification, NotificationSink};

use super::state::{EnginePhase, PlaybackState};

pub(crate) struct EventBridge {
    rx: Receiver<MediaNotification>,
    // Kept so the mailbox never reports disconnection while the engine lives,
    // even if a backend drops its sink.
    _tx: Sender<MediaNotification>,
    attached: bool,
}

impl EventBridge {
    pub(crate) fn attach<B: MediaBackend>(backend: &mut B) -> Self {
        let (tx, rx) = unbounded();
        backend.subscribe(NotificationSink::new(tx.clone()));
        log::debug!("event bridge attached");
        Self {
            rx,
            _tx: tx,
            attached: true,
        }
    }

    pub(crate) fn detach<B: MediaBackend>(&mut self, backend: &mut B) {
        if self.attached {
            backend.unsubscribe();
            self.attached = false;
            log::debug!("event bridge detached");
        }
    }

    pub(crate) fn receiver(&self) -> &Receiver<MediaNotification> {
        &self.rx
    }

    pub(crate) fn try_next(&self) -> Option<MediaNotification> {
        self.rx.try_recv().ok()
    }
}

/// Apply the state effects of one notification.
///
/// Waits (load readiness, play confirmation) are resolved by the engine; this
/// only covers the fold into state and phase.
pub(crate) fn fold(state: &mut PlaybackState, phase: &mut EnginePhase, event: &MediaEvent) {
    match event {
        MediaEvent::TimeUpdate { position } => {
            if position.is_finite() && *position >= 0.0 {
                state.current_time = *position;
            }
        }
        MediaEvent::LoadedMetadata { duration } => {
            // Streams report an infinite duration; keep it as unknown.
            state.duration = if duration.is_finite() && *duration > 0.0 {
                *duration
            } else {
                0.0
            };
            log::info!("metadata loaded, duration {:.2}s", state.duration);
        }
        MediaEvent::Ended => {
            log::info!("track ended");
            state.is_playing = false;
            state.current_time = 0.0;
            if !matches!(phase, EnginePhase::Errored(_)) {
                *phase = EnginePhase::Ready;
            }
        }
        MediaEvent::Playing => {
            log::debug!("media started playing");
            state.is_playing = true;
            *phase = EnginePhase::Playing;
        }
        MediaEvent::Paused => {
            state.is_playing = false;
            if *phase == EnginePhase::Playing {
                *phase = EnginePhase::Paused;
            }
        }
        MediaEvent::Error { .. } => {
            state.is_playing = false;
        }
        MediaEvent::LoadStart => log::debug!("media load started"),
        MediaEvent::Waiting => log::debug!("media waiting for data"),
        MediaEvent::Stalled => log::debug!("media download stalled"),
        MediaEvent::Suspend => log::debug!("media loading suspended"),
        MediaEvent::CanPlay
        | MediaEvent::CanPlayThrough
        | MediaEvent::PlayResolved
        | MediaEvent::PlayRejected(_) => {}
    }
}
