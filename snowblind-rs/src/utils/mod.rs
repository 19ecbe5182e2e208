//! Shared utilities for the snowblind-rs CLI

pub mod format;
pub mod progress;
pub mod source;
pub mod table;
pub mod tree;

pub use format::*;
pub use progress::*;
pub use source::*;
pub use table::*;
