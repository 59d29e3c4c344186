use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

const ENV_PREFIX: &str = "VINYL";
const PATH_VAR: &str = "VINYL_CONFIG_PATH";

/// Layering: struct defaults, then the optional file, then `VINYL__*`
/// environment overrides.
impl Settings {
    /// Load from the resolved config path (see [`resolve_config_path`]).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load with `path` as the file layer. A missing file is not an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load and validate, falling back to defaults on any problem.
    ///
    /// A broken config file must not stop playback.
    pub fn load_or_default() -> Self {
        let loaded = Self::load().and_then(|s| {
            s.validate().map_err(ConfigError::Message)?;
            Ok(s)
        });
        loaded.unwrap_or_else(|e| {
            log::warn!("config rejected, using defaults: {e}");
            Self::default()
        })
    }

    /// Range checks the type system can't express.
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.playback.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!("playback.initial_volume must be within 0..=1, got {volume}"));
        }
        if self.playback.load_timeout_ms == 0 {
            return Err("playback.load_timeout_ms must be >= 1".to_string());
        }
        let fft = self.analyser.fft_size;
        if !fft.is_power_of_two() || !(32..=32768).contains(&fft) {
            return Err(format!(
                "analyser.fft_size must be a power of two within 32..=32768, got {fft}"
            ));
        }
        let smoothing = self.analyser.smoothing;
        if !(0.0..=1.0).contains(&smoothing) {
            return Err(format!("analyser.smoothing must be within 0..=1, got {smoothing}"));
        }
        if self.visualizer.frame_interval_ms == 0 {
            return Err("visualizer.frame_interval_ms must be >= 1".to_string());
        }
        if self.player.idle_poll_ms == 0 {
            return Err("player.idle_poll_ms must be >= 1".to_string());
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.playback.load_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.visualizer.frame_interval_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.player.idle_poll_ms)
    }
}

/// `$VINYL_CONFIG_PATH` if set, else [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/vinyl/config.toml`, falling back to
/// `~/.config/vinyl/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("vinyl").join("config.toml"))
}
