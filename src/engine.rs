//! The playback engine: one media element, one current track, one state.
//!
//! `PlaybackEngine` is a non-blocking state machine. Commands return at once;
//! anything that has to wait for the media element (readiness, buffering,
//! play confirmation) is parked as a pending wait and resolved when the
//! matching notification arrives or its deadline passes in [`PlaybackEngine::poll`].

mod bridge;
mod machine;
mod state;
mod waits;

pub use machine::PlaybackEngine;
pub use state::*;
pub use waits::Completion;
pub(crate) use waits::{Responder, completion};
