//! Command implementations

pub mod classify;
pub mod completions;
pub mod config;
pub mod eval;
pub mod map;
pub mod missing;
pub mod rank;
pub mod search;
pub mod table;
