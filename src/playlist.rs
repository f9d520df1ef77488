//! Playlist module: track descriptors, the ordered playlist model and the
//! directory scanner that builds it.
//!
//! Navigation semantics live in `playlist::model`: manual next/previous wrap
//! at the boundaries, natural end-of-track advance does not.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;

#[cfg(test)]
mod tests;
