//! Core module - configuration, embedded data, loading and unit parsing

pub mod config;
pub mod embedded;
pub mod loader;
pub mod units;

pub use config::{Config, ConfigError};
