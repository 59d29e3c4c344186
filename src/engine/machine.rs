use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::analysis::{AnalyserConfig, AnalysisNode};
use crate::config::Settings;
use crate::error::{PlayerError, PlayerResult};
use crate::library::{Direction, Playlist, RepeatMode, Track};
use crate::media::{
    AnalysisGraph, ContextState, FormatSupport, Generation, MediaBackend, MediaEvent,
    MediaNotification, ReadyState,
};

use super::bridge::{self, EventBridge};
use super::state::{EnginePhase, EngineSnapshot, PlaybackState};
use super::waits::{Completion, PendingLoad, PendingPlay, PlayStage, completion};

/// Owns the media element, the analysis graph and the playback state.
pub struct PlaybackEngine<B: MediaBackend> {
    backend: B,
    bridge: EventBridge,
    load_timeout: Duration,
    analyser_config: AnalyserConfig,

    state: PlaybackState,
    phase: EnginePhase,
    current: Option<Arc<Track>>,
    generation: Generation,
    last_error: Option<PlayerError>,

    // Built on the first play attempt, at most once.
    analysis: Option<AnalysisNode<B::Graph>>,

    pending_load: Option<PendingLoad>,
    pending_play: Option<PendingPlay>,
}

impl<B: MediaBackend> PlaybackEngine<B> {
    pub fn new(mut backend: B, settings: &Settings) -> Self {
        let bridge = EventBridge::attach(&mut backend);

        let volume = sanitize_volume(settings.playback.initial_volume);
        let state = PlaybackState {
            volume,
            is_muted: volume == 0.0,
            repeat_mode: settings.playback.repeat_mode,
            ..PlaybackState::default()
        };
        backend.set_volume(state.volume);

        Self {
            backend,
            bridge,
            load_timeout: settings.load_timeout(),
            analyser_config: AnalyserConfig::from(&settings.analyser),
            state,
            phase: EnginePhase::Idle,
            current: None,
            generation: 0,
            last_error: None,
            analysis: None,
            pending_load: None,
            pending_play: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&PlayerError> {
        self.last_error.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Read-only adapter over the analyser, once the graph exists.
    pub fn analyser(&self) -> Option<&AnalysisNode<B::Graph>> {
        self.analysis.as_ref()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase,
            state: self.state.clone(),
            track: self.current.clone(),
            last_error: self.last_error.clone(),
        }
    }

    /// Mailbox the backend posts into; hosts can `select!` on it.
    pub fn notifications(&self) -> &Receiver<MediaNotification> {
        self.bridge.receiver()
    }

    /// Earliest instant at which `poll` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_load.as_ref().map(|p| p.deadline)
    }

    /// Fold every queued notification, then expire overdue waits.
    pub fn pump(&mut self, now: Instant) {
        while let Some(notification) = self.bridge.try_next() {
            self.handle_notification(notification);
        }
        self.poll(now);
    }

    /// Expire the readiness wait if its deadline has passed.
    pub fn poll(&mut self, now: Instant) {
        let expired = self
            .pending_load
            .as_ref()
            .is_some_and(|p| now >= p.deadline);
        if !expired {
            return;
        }

        if let Some(pending) = self.pending_load.take() {
            log::error!(
                "audio load timed out after {}ms",
                self.load_timeout.as_millis()
            );
            let err = PlayerError::LoadTimeout {
                timeout: self.load_timeout,
            };
            self.fail(err.clone());
            if let Some(play) = self.pending_play.take() {
                play.responder.resolve(Err(err.clone()));
            }
            pending.responder.resolve(Err(err));
        }
    }

    /// Switch the element to `track`.
    ///
    /// Supersedes whatever was pending: the older completion resolves as
    /// aborted and notifications for the old source are ignored from here on.
    pub fn load(&mut self, track: Arc<Track>, now: Instant) -> Completion {
        log::info!("loading track '{}' from {}", track.title, track.audio_url);
        for (format, support) in self.format_support() {
            log::debug!("format {format}: {support}");
        }

        self.backend.pause();
        self.abort_pending("superseded by a new load");

        self.generation += 1;
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.last_error = None;

        self.backend.set_source(&track.audio_url, self.generation);
        self.current = Some(track);
        self.phase = EnginePhase::Loading;

        let (responder, completion) = completion();
        self.pending_load = Some(PendingLoad {
            deadline: now + self.load_timeout,
            responder,
        });
        self.backend.load();

        completion
    }

    /// Start playback of the current track.
    pub fn play(&mut self) -> Completion {
        if self.phase == EnginePhase::Playing && self.state.is_playing {
            return Completion::ready(Ok(()));
        }

        let Some(track) = self.current.clone() else {
            log::warn!("play requested with no track loaded");
            return Completion::ready(Err(PlayerError::NoTrackLoaded));
        };
        log::info!("attempting to play '{}'", track.title);

        if let Some(older) = self.pending_play.take() {
            older
                .responder
                .resolve(Err(PlayerError::aborted("superseded by a newer play request")));
        }

        self.ensure_analysis_graph();
        if let Err(err) = self.resume_suspended_graph() {
            return Completion::ready(Err(self.fail(err)));
        }

        let ready = self.backend.ready_state();
        if ready < ReadyState::HaveFutureData && self.pending_load.is_none() {
            if let EnginePhase::Errored(kind) = self.phase {
                // A failed source never reaches play-through.
                log::warn!("play refused, current source failed ({kind})");
                let err = self
                    .last_error
                    .clone()
                    .unwrap_or_else(|| PlayerError::Other {
                        detail: kind.to_string(),
                    });
                return Completion::ready(Err(err));
            }
        }

        let (responder, completion) = completion();
        let stage = if ready < ReadyState::HaveFutureData {
            log::debug!("media not ready ({ready:?}), waiting for can-play-through");
            PlayStage::AwaitingPlayThrough
        } else {
            self.backend.play();
            PlayStage::AwaitingStart
        };

        self.pending_play = Some(PendingPlay {
            stage,
            responder,
        });
        completion
    }

    pub fn pause(&mut self) {
        if let Some(pending) = self.pending_play.take() {
            if pending.stage == PlayStage::AwaitingStart {
                self.backend.pause();
            }
            pending
                .responder
                .resolve(Err(PlayerError::aborted("paused before playback started")));
        }

        if self.phase != EnginePhase::Playing && !self.state.is_playing {
            return;
        }

        self.backend.pause();
        self.state.is_playing = false;
        self.phase = EnginePhase::Paused;
        log::info!("paused");
    }

    /// Pause when playing, otherwise play. Returns the play completion, or
    /// an already-resolved one after pausing.
    pub fn toggle_play(&mut self) -> Completion {
        log::debug!("toggle play, currently playing: {}", self.state.is_playing);
        if self.state.is_playing {
            self.pause();
            Completion::ready(Ok(()))
        } else {
            self.play()
        }
    }

    /// Move the playhead and mirror it into state right away.
    ///
    /// Not clamped against the duration; callers map slider positions.
    pub fn seek(&mut self, seconds: f64) {
        if self.current.is_none() {
            log::warn!("seek ignored, no track loaded");
            return;
        }
        if !seconds.is_finite() || seconds < 0.0 {
            log::warn!("seek ignored, invalid position {seconds}");
            return;
        }
        self.backend.set_position(seconds);
        self.state.current_time = seconds;
    }

    /// Set the volume. Exactly zero counts as muted, anything else unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = sanitize_volume(volume);
        self.backend.set_volume(volume);
        self.state.volume = volume;
        self.state.is_muted = volume == 0.0;
    }

    /// Muting silences the element; unmuting restores the remembered volume.
    pub fn toggle_mute(&mut self) {
        let muted = !self.state.is_muted;
        self.backend
            .set_volume(if muted { 0.0 } else { self.state.volume });
        self.state.is_muted = muted;
    }

    pub fn next(&mut self, playlist: &mut Playlist, now: Instant) -> Option<Completion> {
        self.step(playlist, Direction::Next, now)
    }

    pub fn previous(&mut self, playlist: &mut Playlist, now: Instant) -> Option<Completion> {
        self.step(playlist, Direction::Previous, now)
    }

    fn step(&mut self, playlist: &mut Playlist, direction: Direction, now: Instant) -> Option<Completion> {
        let track = playlist.step(direction, self.state.repeat_mode)?;
        Some(self.load(track, now))
    }

    /// Load the playlist entry with `id`; unknown ids are ignored.
    pub fn select(&mut self, playlist: &mut Playlist, id: &str, now: Instant) -> Option<Completion> {
        match playlist.select_id(id) {
            Some(track) => Some(self.load(track, now)),
            None => {
                log::warn!("no track with id '{id}' in playlist '{}'", playlist.name);
                None
            }
        }
    }

    pub fn set_shuffle(&mut self, playlist: &mut Playlist, on: bool) {
        playlist.set_shuffle(on, &mut rand::rng());
        self.state.is_shuffled = on;
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.state.repeat_mode = mode;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.state.repeat_mode = self.state.repeat_mode.cycle();
        self.state.repeat_mode
    }

    /// What the element reports for the common audio containers.
    pub fn format_support(&self) -> Vec<(&'static str, FormatSupport)> {
        COMMON_FORMATS
            .iter()
            .map(|&(name, mime)| (name, self.backend.can_play_type(mime)))
            .collect()
    }

    /// Fold one notification and resolve whatever wait it answers.
    pub fn handle_notification(&mut self, notification: MediaNotification) {
        let MediaNotification { generation, event } = notification;
        if generation != self.generation {
            log::trace!("dropping {event:?} for stale source generation {generation}");
            return;
        }

        bridge::fold(&mut self.state, &mut self.phase, &event);

        match event {
            MediaEvent::CanPlay => self.on_ready(),
            MediaEvent::CanPlayThrough => {
                self.on_ready();
                self.on_play_through();
            }
            MediaEvent::PlayResolved => self.on_play_resolved(),
            MediaEvent::PlayRejected(failure) => match self.take_play(PlayStage::AwaitingStart) {
                Some(pending) => {
                    let err = self.fail(PlayerError::from_play_failure(failure));
                    pending.responder.resolve(Err(err));
                }
                // Answer to a play that was paused or superseded.
                None => log::debug!("ignoring play rejection with no request waiting: {failure}"),
            },
            MediaEvent::Error { code, detail } => {
                let loading = self.pending_load.is_some();
                let err = PlayerError::from_media_error(code, detail, loading);
                let err = self.fail(err);
                if let Some(pending) = self.pending_load.take() {
                    pending.responder.resolve(Err(err.clone()));
                }
                if let Some(pending) = self.pending_play.take() {
                    pending.responder.resolve(Err(err));
                }
            }
            MediaEvent::Ended => {
                self.pending_play = None;
            }
            _ => {}
        }
    }

    fn on_ready(&mut self) {
        let Some(pending) = self.pending_load.take() else {
            return;
        };
        if let Some(track) = &self.current {
            log::info!("ready to play '{}'", track.title);
        }
        if self.phase == EnginePhase::Loading {
            self.phase = EnginePhase::Ready;
        }
        pending.responder.resolve(Ok(()));
    }

    fn on_play_through(&mut self) {
        if let Some(pending) = self.pending_play.as_mut() {
            if pending.stage == PlayStage::AwaitingPlayThrough {
                pending.stage = PlayStage::AwaitingStart;
                self.backend.play();
            }
        }
    }

    fn on_play_resolved(&mut self) {
        if let Some(pending) = self.take_play(PlayStage::AwaitingStart) {
            log::info!("playback started");
            self.state.is_playing = true;
            self.phase = EnginePhase::Playing;
            self.last_error = None;
            pending.responder.resolve(Ok(()));
        }
    }

    fn take_play(&mut self, stage: PlayStage) -> Option<PendingPlay> {
        match &self.pending_play {
            Some(p) if p.stage == stage => self.pending_play.take(),
            _ => None,
        }
    }

    /// Fold a failure into state and keep it as the last report.
    fn fail(&mut self, err: PlayerError) -> PlayerError {
        log::error!("{} ({}): {}", err.kind(), err, err.user_message());
        self.state.is_playing = false;
        self.phase = EnginePhase::Errored(err.kind());
        self.last_error = Some(err.clone());
        err
    }

    fn abort_pending(&mut self, reason: &str) {
        if let Some(pending) = self.pending_load.take() {
            pending.responder.resolve(Err(PlayerError::aborted(reason)));
        }
        if let Some(pending) = self.pending_play.take() {
            pending.responder.resolve(Err(PlayerError::aborted(reason)));
        }
    }

    fn ensure_analysis_graph(&mut self) {
        if self.analysis.is_some() {
            return;
        }
        match self.backend.connect_analysis_graph(&self.analyser_config) {
            Ok(graph) => {
                log::info!(
                    "analysis graph connected ({} bins, smoothing {})",
                    self.analyser_config.bin_count(),
                    self.analyser_config.smoothing
                );
                self.analysis = Some(AnalysisNode::new(graph, self.analyser_config));
            }
            Err(e) => {
                // Playback works without visualization; retried on the next play.
                log::error!("error initializing analysis graph: {e}");
            }
        }
    }

    fn resume_suspended_graph(&mut self) -> PlayerResult<()> {
        let Some(node) = self.analysis.as_mut() else {
            return Ok(());
        };
        let graph = node.graph_mut();
        if graph.context_state() == ContextState::Suspended {
            log::debug!("resuming suspended audio context");
            graph.resume().map_err(PlayerError::from_play_failure)?;
        }
        Ok(())
    }
}

const COMMON_FORMATS: [(&str, &str); 4] = [
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
];

/// Clamp to `0.0..=1.0`; NaN counts as silence.
fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl<B: MediaBackend> Drop for PlaybackEngine<B> {
    fn drop(&mut self) {
        self.abort_pending("playback engine shut down");
        self.backend.pause();
        self.bridge.detach(&mut self.backend);
        if let Some(mut node) = self.analysis.take() {
            node.graph_mut().close();
        }
        log::debug!("playback engine torn down");
    }
}
