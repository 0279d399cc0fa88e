//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::fs::File;
use std::path::PathBuf;
use std::time::SystemTime;

/// Result of a successful store operation
#[derive(Debug)]
pub struct StoreReceipt {
    pub filename: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// An opened stored file together with its metadata
#[derive(Debug)]
pub struct LoadedFile {
    pub file: File,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<SystemTime>,
}
