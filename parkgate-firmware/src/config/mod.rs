//! Configuration loading
//!
//! The configuration is the parking.toml file embedded at build time,
//! parsed by the no_std parser in parkgate-core.

pub mod loader;

pub use loader::load_config;
