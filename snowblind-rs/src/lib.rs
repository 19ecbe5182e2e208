//! Snowblind-RS library
//!
//! Command implementations and helpers behind the `snowblind-rs` binary.

pub mod cli;
pub mod commands;
pub mod utils;
