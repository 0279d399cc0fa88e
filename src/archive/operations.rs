//! Archive operations
//!
//! Bundles selected stored files into temporary zip artifacts under the
//! temp area, and reclaims that area wholesale during cleanup.

use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

use crate::archive::results::TempArtifact;
use crate::error::{ArchiveError, InitError};
use crate::storage::FileStore;
use crate::storage::resolver::ensure_directory;

/// Builds compressed bundles of stored files and owns the temp area
/// they live in.
#[derive(Debug, Clone)]
pub struct Archiver {
    store: FileStore,
    temp_dir: PathBuf,
}

impl Archiver {
    /// Creates an archiver writing bundles under
    /// `<root>/<temp_dir_name>`, verifying or creating that directory
    /// with the same fatal-on-failure policy as the storage root.
    pub fn new(store: FileStore, temp_dir_name: &str) -> Result<Self, InitError> {
        let temp_dir = store.resolver().root().join(temp_dir_name);
        ensure_directory(&temp_dir)?;
        info!("Archive temp directory ready at {}", temp_dir.display());
        Ok(Self { store, temp_dir })
    }

    /// The directory holding temporary artifacts.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Bundles the named files for `owner_id` into a deflate-compressed
    /// zip under the temp area, each entry keyed by its base filename.
    ///
    /// The artifact name is derived from the ordered filename list, so
    /// identical requests map to the same path; the bundle is still
    /// regenerated on every call. A missing input fails the request
    /// before the artifact is created, as does a duplicate filename in
    /// the request.
    pub fn archive(
        &self,
        filenames: &[String],
        owner_id: u64,
    ) -> Result<TempArtifact, ArchiveError> {
        info!(
            "Owner {} requested compression of {} files",
            owner_id,
            filenames.len()
        );

        // Duplicate base names would collide inside the bundle.
        for (i, name) in filenames.iter().enumerate() {
            if filenames[..i].contains(name) {
                return Err(ArchiveError::DuplicateEntry(name.clone()));
            }
        }

        // Open every input up front so the whole request fails before
        // the artifact exists if any file is missing.
        let mut inputs = Vec::with_capacity(filenames.len());
        for name in filenames {
            inputs.push((name.as_str(), self.store.load(owner_id, name)?));
        }

        let artifact_path = self
            .temp_dir
            .join(format!("{}.zip", bundle_name(filenames, owner_id)));

        let file = fs::File::create(&artifact_path)?;
        let mut writer = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, loaded) in inputs.iter_mut() {
            writer.start_file(*name, options)?;
            io::copy(&mut loaded.file, &mut writer)?;
        }

        let file = writer.finish()?;
        let size_bytes = file.metadata()?.len();

        info!(
            "Compressed {} files to {}",
            inputs.len(),
            artifact_path.display()
        );
        Ok(TempArtifact {
            path: artifact_path,
            entries: inputs.len(),
            size_bytes,
        })
    }

    /// Removes every entry directly under the temp area, skipping the
    /// area itself. Per-entry failures are logged and skipped; an
    /// unreadable temp directory yields a count of zero. This never
    /// fails and is a no-op on an empty directory.
    pub fn cleanup(&self) -> usize {
        info!("Archive directory cleanup started");

        let entries = match fs::read_dir(&self.temp_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "Could not read temp directory {} during cleanup: {}",
                    self.temp_dir.display(),
                    e
                );
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Could not read an entry during cleanup: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => debug!("Could not remove {} during cleanup: {}", path.display(), e),
            }
        }

        info!("Archive cleanup complete, removed entry count: {}", removed);
        removed
    }
}

/// Lowercase hex SHA-256 of the owner id and the ordered filename
/// list. Folding in the owner keeps identical requests from different
/// owners on distinct artifact paths; a separator byte keeps
/// ["ab", "c"] and ["a", "bc"] distinct.
fn bundle_name(filenames: &[String], owner_id: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner_id.to_le_bytes());
    for name in filenames {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
