//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playlist, the cursor,
//! the volume controller and the mirrored playback state.

mod model;
mod volume;

pub use model::*;
pub use volume::*;
