//! Configuration loader and schema types.
//!
//! Settings drive the engine defaults (volume, load timeout, shuffle/repeat),
//! the analyser shape and the player thread's cadence.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
