//! Commands, snapshots and shared handles of the player thread.

use std::sync::{Arc, Mutex};

use crate::analysis::VisualizationSample;
use crate::engine::{EngineSnapshot, Responder};
use crate::library::RepeatMode;

#[derive(Debug)]
pub(crate) enum PlayerCmd {
    /// Load the playlist entry with this id.
    Select { id: String, done: Responder },
    Play(Responder),
    TogglePlay(Responder),
    Next(Responder),
    Previous(Responder),
    Pause,
    /// Absolute position in seconds.
    Seek(f64),
    SetVolume(f32),
    ToggleMute,
    SetShuffle(bool),
    ToggleShuffle,
    SetRepeat(RepeatMode),
    CycleRepeat,
    Quit,
}

/// What hosts render from: engine state plus playlist position.
#[derive(Debug, Clone, Default)]
pub struct PlayerSnapshot {
    pub engine: EngineSnapshot,
    /// Catalog index of the selected track.
    pub playlist_index: Option<usize>,
    /// Traversal order (a permutation of catalog indices while shuffled).
    pub order: Vec<usize>,
}

pub type PlaybackHandle = Arc<Mutex<PlayerSnapshot>>;
pub type SampleHandle = Arc<Mutex<VisualizationSample>>;
