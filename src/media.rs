//! Platform media primitives.
//!
//! The engine never touches a decoder directly. It issues commands through
//! [`MediaBackend`] and learns what happened from the [`MediaNotification`]s
//! the backend posts into a [`NotificationSink`].

mod backend;
mod types;

pub use backend::*;
pub use types::*;
