//! Traits a host implements to plug its media element and analyser in.

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::analysis::AnalyserConfig;

use super::types::{
    ContextState, FormatSupport, Generation, MediaEvent, MediaNotification, PlayFailure, ReadyState,
};

/// Failure to build or connect the analysis graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GraphError(pub String);

/// Handle a backend uses to deliver notifications to the engine.
///
/// Cloneable and `Send`, so a backend may post from its own callback thread.
#[derive(Debug, Clone)]
pub struct NotificationSink {
    tx: Sender<MediaNotification>,
}

impl NotificationSink {
    pub(crate) fn new(tx: Sender<MediaNotification>) -> Self {
        Self { tx }
    }

    /// Post an event for `generation`. Returns `false` once the engine is gone.
    pub fn post(&self, generation: Generation, event: MediaEvent) -> bool {
        self.tx
            .send(MediaNotification::new(generation, event))
            .is_ok()
    }
}

/// The platform media element: one per engine, reused for every track.
///
/// Commands return immediately. Their outcome arrives later as a
/// notification, e.g. `play` is answered by `PlayResolved` or `PlayRejected`.
pub trait MediaBackend {
    type Graph: AnalysisGraph;

    /// Attach the engine's notification sink. Called once per engine.
    fn subscribe(&mut self, sink: NotificationSink);

    /// Detach the sink given to `subscribe`. Called on engine teardown.
    fn unsubscribe(&mut self);

    /// Point the element at a new resource. Subsequent notifications must
    /// carry `generation`.
    fn set_source(&mut self, locator: &str, generation: Generation);

    /// Start fetching the current source.
    fn load(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    /// Move the playhead, in seconds.
    fn set_position(&mut self, seconds: f64);

    /// Output gain in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);

    fn ready_state(&self) -> ReadyState;

    /// Whether the element can decode `mime`. Only used for diagnostics.
    fn can_play_type(&self, mime: &str) -> FormatSupport {
        let _ = mime;
        FormatSupport::Maybe
    }

    /// Build source -> analyser -> destination around this element.
    fn connect_analysis_graph(&mut self, config: &AnalyserConfig) -> Result<Self::Graph, GraphError>;
}

/// The analyser stage of the audio graph plus its context controls.
pub trait AnalysisGraph {
    fn context_state(&self) -> ContextState;

    fn resume(&mut self) -> Result<(), PlayFailure>;

    /// Fill `out` with byte-scaled frequency magnitudes.
    fn frequency_data(&self, out: &mut [u8]);

    /// Fill `out` with byte-scaled time-domain samples (128 is silence).
    fn waveform_data(&self, out: &mut [u8]);

    /// Disconnect the graph and release the context.
    fn close(&mut self);
}
