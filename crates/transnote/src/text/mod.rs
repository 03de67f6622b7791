//! Text transforms that run around the model calls: transcript cleanup and
//! jargon substitution before, response normalization after.

pub mod clean;
pub mod jargon;
pub mod postprocess;

pub use clean::clean_transcript;
pub use jargon::JargonMap;
pub use postprocess::{BULLET_MARKER, filter_bullets, trim_blank_edges};
