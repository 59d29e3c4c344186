//! Track catalog types and playlist traversal.
//!
//! The engine only ever borrows tracks through `Arc<Track>`; the playlist
//! owns the ordered list and the cursor that `previous`/`next` move.

mod catalog;
mod model;
mod playlist;

pub use catalog::{CatalogError, load_catalog, parse_catalog};
pub use model::*;
pub use playlist::{Direction, Playlist, RepeatMode};
