//! Configuration types and the `rig.toml` parser
//!
//! The firmware embeds `rig.toml` at build time. `build.rs` validates it on
//! the host, and the same text is parsed again at boot by [`parse_config`].

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
