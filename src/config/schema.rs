use serde::Deserialize;

use crate::library::RepeatMode;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vinyl/config.toml` or `~/.config/vinyl/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VINYL__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub analyser: AnalyserSettings,
    pub visualizer: VisualizerSettings,
    pub player: PlayerSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume applied to the media element at construction, `0.0..=1.0`.
    pub initial_volume: f32,
    /// How long `load` waits for the resource to become playable (milliseconds).
    pub load_timeout_ms: u64,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Default repeat mode.
    pub repeat_mode: RepeatMode,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            load_timeout_ms: 10_000,
            shuffle: false,
            repeat_mode: RepeatMode::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyserSettings {
    /// FFT size; must be a power of two between 32 and 32768.
    pub fft_size: usize,
    /// Smoothing between analyser frames, `0.0..=1.0`.
    pub smoothing: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Interval between sampling ticks (milliseconds). 16 is roughly 60Hz.
    pub frame_interval_ms: u64,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// How long the player thread sleeps when nothing is scheduled (milliseconds).
    pub idle_poll_ms: u64,
    /// Load the first playlist entry as soon as the player starts.
    pub load_first_track: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            idle_poll_ms: 200,
            load_first_track: true,
        }
    }
}
