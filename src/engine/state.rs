//! Playback state shared with renderers.

use std::sync::Arc;

use crate::error::{ErrorKind, PlayerError};
use crate::library::{RepeatMode, Track};

/// Engine lifecycle phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EnginePhase {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// Waiting for the current source to become playable.
    Loading,
    Ready,
    Playing,
    Paused,
    Errored(ErrorKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Seconds.
    pub current_time: f64,
    /// Seconds; 0 until the element reports metadata.
    pub duration: f64,
    pub volume: f32,
    pub is_muted: bool,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 0.7,
            is_muted: false,
            is_shuffled: false,
            repeat_mode: RepeatMode::None,
        }
    }
}

impl PlaybackState {
    /// Playhead as a fraction of the duration, 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct EngineSnapshot {
    pub phase: EnginePhase,
    pub state: PlaybackState,
    pub track: Option<Arc<Track>>,
    pub last_error: Option<PlayerError>,
}
