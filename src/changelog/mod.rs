//! Change classification, rendering and writing.

pub mod fetch;
pub mod render;
pub mod types;
pub mod writer;

pub use fetch::{ChangeFetcher, classify};
pub use render::Renderer;
pub use types::{BREAKING_KINDS, Change, PullRequest, SEVERITY_ORDER, severity};
pub use writer::write_changelog;
