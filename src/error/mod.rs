//! Error handling
//!
//! Defines error types and handling for the drive storage core.

pub mod types;

pub use types::*;
