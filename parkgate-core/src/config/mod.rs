//! Configuration
//!
//! All tunables of the controller, with defaults matching the reference
//! hardware, and a parser for the small TOML file embedded in the
//! firmware image.

pub mod toml;
pub mod types;

pub use self::toml::parse_config;
pub use types::*;
