//! Configuration types
//!
//! Board-agnostic configuration structures and the `board.toml` parser.

pub mod hardware;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use toml::{parse_config, ParseError};
pub use types::*;
