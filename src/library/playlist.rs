use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::model::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Manual navigation still wraps at both ends.
    #[default]
    #[serde(alias = "no-repeat", alias = "no_repeat", alias = "off")]
    None,
    /// `previous`/`next` reselect the current track.
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    One,
    /// Wrap around at both ends of the playlist.
    #[serde(alias = "repeat-all", alias = "repeat_all", alias = "loop-all")]
    All,
}

impl RepeatMode {
    /// None -> All -> One -> None, the order the repeat button cycles.
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Ordered tracks plus the traversal cursor.
///
/// `order` holds track indices in traversal order: identity when shuffle is
/// off, a permutation when it is on. `cursor` is a position in `order`.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub artwork: Option<String>,
    tracks: Vec<Arc<Track>>,
    order: Vec<usize>,
    shuffled: bool,
    cursor: Option<usize>,
}

impl Playlist {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let tracks: Vec<Arc<Track>> = tracks.into_iter().map(Arc::new).collect();
        let order = (0..tracks.len()).collect();
        Self {
            id: id.into(),
            name: name.into(),
            artwork: None,
            tracks,
            order,
            shuffled: false,
            cursor: None,
        }
    }

    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self::new("default", "Playlist", tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Track>> {
        self.tracks.get(index)
    }

    /// Traversal order as track indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Catalog index of the selected track.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.and_then(|pos| self.order.get(pos).copied())
    }

    pub fn current(&self) -> Option<&Arc<Track>> {
        self.current_index().and_then(|i| self.tracks.get(i))
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Move the cursor to catalog index `index`.
    pub fn select_index(&mut self, index: usize) -> Option<Arc<Track>> {
        let pos = self.order.iter().position(|&i| i == index)?;
        self.cursor = Some(pos);
        self.tracks.get(index).cloned()
    }

    pub fn select_id(&mut self, id: &str) -> Option<Arc<Track>> {
        let index = self.position_of(id)?;
        self.select_index(index)
    }

    /// Advance the cursor one step and return the newly selected track.
    ///
    /// Wraps at both ends unless `repeat` is `One`, which keeps the current
    /// track. With no selection yet, `Next` lands on the first entry and
    /// `Previous` on the last.
    pub fn step(&mut self, direction: Direction, repeat: RepeatMode) -> Option<Arc<Track>> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }

        let pos = match (self.cursor, direction, repeat) {
            (Some(pos), _, RepeatMode::One) => pos,
            (Some(pos), Direction::Next, _) => (pos + 1) % len,
            (Some(0), Direction::Previous, _) => len - 1,
            (Some(pos), Direction::Previous, _) => pos - 1,
            (None, Direction::Next, _) => 0,
            (None, Direction::Previous, _) => len - 1,
        };

        self.cursor = Some(pos);
        self.tracks.get(self.order[pos]).cloned()
    }

    /// Turn shuffle on or off, keeping the current selection.
    ///
    /// A fresh permutation is drawn each time shuffle is enabled; the current
    /// track moves to its front so a full `next` cycle visits every track once.
    pub fn set_shuffle<R: Rng + ?Sized>(&mut self, on: bool, rng: &mut R) {
        let current = self.current_index();
        self.shuffled = on;
        self.order = (0..self.tracks.len()).collect();

        if on {
            self.order.shuffle(rng);
            if let Some(i) = current {
                if let Some(pos) = self.order.iter().position(|&x| x == i) {
                    self.order.swap(0, pos);
                }
            }
        }

        self.cursor = current.and_then(|i| self.order.iter().position(|&x| x == i));
    }
}
