//! Archive result types

use std::path::PathBuf;

/// Handle to a compressed bundle written to the temp area.
///
/// The artifact stays on disk only until the next retention sweep
/// observes it; there is no access-time renewal.
#[derive(Debug, Clone)]
pub struct TempArtifact {
    pub path: PathBuf,
    pub entries: usize,
    pub size_bytes: u64,
}
