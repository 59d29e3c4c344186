//! vinyl: playback engine and visualization sampler for a music player.
//!
//! The crate does not decode audio itself. A host plugs its media element and
//! analyser in through [`media::MediaBackend`] and [`media::AnalysisGraph`];
//! the engine drives them, folds their lifecycle notifications into
//! [`engine::PlaybackState`] and the sampler turns the analyser into a stream
//! of [`analysis::VisualizationSample`]s for renderers.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod media;
pub mod player;
pub mod visualizer;

#[cfg(test)]
pub(crate) mod testing;

pub use analysis::{AnalyserConfig, AnalysisNode, VisualizationSample};
pub use config::Settings;
pub use engine::{Completion, EnginePhase, EngineSnapshot, PlaybackEngine, PlaybackState};
pub use error::{ErrorKind, PlayerError, PlayerResult};
pub use library::{Playlist, RepeatMode, Track};
pub use player::{Player, PlayerSnapshot};
pub use visualizer::Sampler;
