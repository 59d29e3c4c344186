use serde::Deserialize;

/// Immutable track descriptor from the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Catalog duration in seconds. Informational; the media element's
    /// metadata is authoritative.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub artwork: String,
    #[serde(alias = "audioUrl")]
    pub audio_url: String,
}

impl Track {
    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
