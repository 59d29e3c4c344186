//! Static track catalog loaded from TOML.
//!
//! ```toml
//! id = "favorites"
//! name = "Favorites"
//!
//! [[tracks]]
//! id = "1"
//! title = "Midnight Dreams"
//! artist = "Luna Eclipse"
//! duration = 245
//! audio_url = "https://example.com/midnight.mp3"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::model::Track;
use super::playlist::Playlist;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate track id '{0}'")]
    DuplicateId(String),

    #[error("track '{0}' has no audio url")]
    MissingUrl(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_id")]
    id: String,
    #[serde(default = "default_name")]
    name: String,
    artwork: Option<String>,
    #[serde(default)]
    tracks: Vec<Track>,
}

fn default_id() -> String {
    "default".to_string()
}

fn default_name() -> String {
    "Playlist".to_string()
}

/// Parse a catalog document into a playlist in file order.
pub fn parse_catalog(text: &str) -> Result<Playlist, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;

    let mut seen = HashSet::new();
    for track in &file.tracks {
        if !seen.insert(track.id.as_str()) {
            return Err(CatalogError::DuplicateId(track.id.clone()));
        }
        if track.audio_url.trim().is_empty() {
            return Err(CatalogError::MissingUrl(track.id.clone()));
        }
    }

    let mut playlist = Playlist::new(file.id, file.name, file.tracks);
    playlist.artwork = file.artwork;
    Ok(playlist)
}

pub fn load_catalog(path: &Path) -> Result<Playlist, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let playlist = parse_catalog(&text)?;
    log::info!(
        "loaded catalog '{}' with {} tracks from {}",
        playlist.name,
        playlist.len(),
        path.display()
    );
    Ok(playlist)
}
