//! xref: electronic component cross-reference engine
//!
//! Maps raw vendor catalog records to canonical parts, classifies them into
//! component families and scores replacement candidates against per-family
//! rule tables.

pub mod classify;
pub mod cli;
pub mod core;
pub mod entities;
pub mod mapper;
pub mod matching;
pub mod tables;
pub mod yaml;
