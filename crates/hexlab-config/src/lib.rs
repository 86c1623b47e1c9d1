//! World configuration for hexlab terrain generation.
//!
//! Provides the immutable-per-generation [`WorldConfig`] snapshot consumed by
//! the terrain composer, the optional per-session [`Remix`] delta layered on
//! top of it, RON persistence, and CLI overrides. A config value is treated
//! as a snapshot everywhere downstream: changing the world means swapping in
//! a new value, never mutating one in place.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{NoiseParams, PlateShift, Remix, WeightDeltas, WorldConfig};
pub use error::ConfigError;
