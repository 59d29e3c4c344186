//! In-memory media backend for tests.
//!
//! `FakeMedia` records every command and lets a test post notifications on
//! demand. Clones share state, so a test can keep one handle while the
//! engine (or the player thread) owns another.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::analysis::AnalyserConfig;
use crate::media::{
    AnalysisGraph, ContextState, FormatSupport, GraphError, MediaBackend, MediaEvent,
    NotificationSink, PlayFailure, ReadyState,
};

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub sink: Option<NotificationSink>,
    pub subscribes: usize,
    pub unsubscribes: usize,
    pub generation: u64,
    pub source: Option<String>,
    pub loads: usize,
    pub plays: usize,
    pub pauses: usize,
    pub position: f64,
    pub volume: f32,
    pub ready_state: ReadyState,
    pub graphs_built: usize,
    pub graph_error: Option<String>,
    pub graphs_closed: usize,
    pub context: Option<ContextState>,
    pub resume_failure: Option<PlayFailure>,
    pub resumes: usize,
    pub spectrum: (u8, u8),
    pub playable: Vec<&'static str>,
    pub type_queries: usize,
    /// Answer `load` with metadata + can-play and `play` with resolved + playing.
    pub auto: bool,
    pub duration: f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeMedia {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that answers every command immediately and successfully.
    pub fn auto(duration: f64) -> Self {
        let media = Self::new();
        {
            let mut s = media.state();
            s.auto = true;
            s.duration = duration;
        }
        media
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Post `event` for the current source generation.
    pub fn emit(&self, event: MediaEvent) {
        let generation = self.state().generation;
        self.emit_for(generation, event);
    }

    pub fn emit_for(&self, generation: u64, event: MediaEvent) {
        let sink = self.state().sink.clone();
        if let Some(sink) = sink {
            sink.post(generation, event);
        }
    }

    pub fn set_ready_state(&self, ready: ReadyState) {
        self.state().ready_state = ready;
    }

    pub fn set_spectrum(&self, frequency: u8, waveform: u8) {
        self.state().spectrum = (frequency, waveform);
    }

    pub fn suspend_context(&self, resume_failure: Option<PlayFailure>) {
        let mut s = self.state();
        s.context = Some(ContextState::Suspended);
        s.resume_failure = resume_failure;
    }
}

impl MediaBackend for FakeMedia {
    type Graph = FakeGraph;

    fn subscribe(&mut self, sink: NotificationSink) {
        let mut s = self.state();
        s.sink = Some(sink);
        s.subscribes += 1;
    }

    fn unsubscribe(&mut self) {
        let mut s = self.state();
        s.sink = None;
        s.unsubscribes += 1;
    }

    fn set_source(&mut self, locator: &str, generation: u64) {
        let mut s = self.state();
        s.source = Some(locator.to_string());
        s.generation = generation;
        s.ready_state = ReadyState::HaveNothing;
        s.position = 0.0;
    }

    fn load(&mut self) {
        let (auto, duration) = {
            let mut s = self.state();
            s.loads += 1;
            if s.auto {
                s.ready_state = ReadyState::HaveEnoughData;
            }
            (s.auto, s.duration)
        };
        if auto {
            self.emit(MediaEvent::LoadStart);
            self.emit(MediaEvent::LoadedMetadata { duration });
            self.emit(MediaEvent::CanPlay);
        }
    }

    fn play(&mut self) {
        let auto = {
            let mut s = self.state();
            s.plays += 1;
            s.auto
        };
        if auto {
            self.emit(MediaEvent::PlayResolved);
            self.emit(MediaEvent::Playing);
        }
    }

    fn pause(&mut self) {
        self.state().pauses += 1;
    }

    fn set_position(&mut self, seconds: f64) {
        self.state().position = seconds;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state().volume = volume;
    }

    fn ready_state(&self) -> ReadyState {
        self.state().ready_state
    }

    fn can_play_type(&self, mime: &str) -> FormatSupport {
        let mut s = self.state();
        s.type_queries += 1;
        if s.playable.iter().any(|&m| m == mime) {
            FormatSupport::Probably
        } else {
            FormatSupport::No
        }
    }

    fn connect_analysis_graph(&mut self, config: &AnalyserConfig) -> Result<FakeGraph, GraphError> {
        let mut s = self.state();
        if let Some(msg) = s.graph_error.clone() {
            return Err(GraphError(msg));
        }
        s.graphs_built += 1;
        if s.context.is_none() {
            s.context = Some(ContextState::Running);
        }
        Ok(FakeGraph {
            inner: self.inner.clone(),
            bins: config.bin_count(),
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeGraph {
    inner: Arc<Mutex<FakeState>>,
    bins: usize,
}

impl FakeGraph {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AnalysisGraph for FakeGraph {
    fn context_state(&self) -> ContextState {
        self.state().context.unwrap_or(ContextState::Running)
    }

    fn resume(&mut self) -> Result<(), PlayFailure> {
        let mut s = self.state();
        s.resumes += 1;
        match s.resume_failure.clone() {
            Some(failure) => Err(failure),
            None => {
                s.context = Some(ContextState::Running);
                Ok(())
            }
        }
    }

    fn frequency_data(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.bins);
        out.fill(self.state().spectrum.0);
    }

    fn waveform_data(&self, out: &mut [u8]) {
        out.fill(self.state().spectrum.1);
    }

    fn close(&mut self) {
        let mut s = self.state();
        s.graphs_closed += 1;
        s.context = Some(ContextState::Closed);
    }
}
