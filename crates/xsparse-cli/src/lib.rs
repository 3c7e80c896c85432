//! xsparse CLI support: configuration resolution and JSON rendering.

pub mod config;
pub mod render;

pub use config::{resolve_encoding, resolve_log_level};
pub use render::{collect_events, normalize_line_endings, SaxEvent};
