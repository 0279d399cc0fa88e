//! Path resolution and confinement
//!
//! Computes on-disk locations for owner directories and their files, and
//! enforces the confinement boundary every other component depends on: a
//! path resolved for an owner must never leave that owner's directory.

use log::{error, info};
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{InitError, StorageError};

/// Resolves and validates on-disk paths under the storage root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver over `root`, verifying that it exists and is a
    /// directory, or creating it if absent. Failure is fatal to startup;
    /// the hosting process decides whether to abort.
    pub fn new(root: PathBuf) -> Result<Self, InitError> {
        ensure_directory(&root)?;
        info!("Storage root ready at {}", root.display());
        Ok(Self { root })
    }

    /// The storage root this resolver confines paths under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all files owned by `owner_id`. Pure
    /// computation; the directory may not exist yet.
    pub fn owner_directory(&self, owner_id: u64) -> PathBuf {
        self.root.join(owner_id.to_string())
    }

    /// Resolves `filename` inside the owner's directory.
    ///
    /// Fails with `InvalidPath` before any filesystem call when the name
    /// is anything other than a single normal path component, or when
    /// the resolved parent is not exactly the owner directory.
    pub fn file_path(&self, filename: &str, owner_id: u64) -> Result<PathBuf, StorageError> {
        if !is_single_component(filename) {
            return Err(StorageError::InvalidPath(filename.to_string()));
        }

        let owner_dir = self.owner_directory(owner_id);
        let resolved = owner_dir.join(filename);

        // Exact parent equality, never a prefix test: a prefix check
        // would accept owner 421's directory for owner 42.
        if resolved.parent() != Some(owner_dir.as_path()) {
            return Err(StorageError::InvalidPath(filename.to_string()));
        }

        Ok(resolved)
    }

    /// Symlink defense for paths that already exist on disk: after
    /// resolving symlinks, the path's parent must still be the owner
    /// directory. Catches a link planted inside an owner directory that
    /// points outside the root.
    pub fn verify_confined(&self, path: &Path, owner_id: u64) -> Result<(), StorageError> {
        let owner_dir = self.owner_directory(owner_id);
        let canonical_owner = owner_dir.canonicalize()?;
        let canonical = path.canonicalize()?;

        if canonical.parent() != Some(canonical_owner.as_path()) {
            error!(
                "Confinement violation: {} resolves outside {}",
                path.display(),
                canonical_owner.display()
            );
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(StorageError::InvalidPath(name));
        }

        Ok(())
    }
}

/// True when `filename` parses as exactly one normal path component.
/// Rejects empty names, separators, `.`/`..`, absolute paths, and
/// trailing-separator forms that normalize away.
fn is_single_component(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => name == OsStr::new(filename),
        _ => false,
    }
}

/// Verify-or-create bootstrap shared by the storage root and the archive
/// temp directory. Runs once at component construction.
pub(crate) fn ensure_directory(path: &Path) -> Result<(), InitError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        error!("Resource at {} is not a directory", path.display());
        return Err(InitError::NotADirectory(path.to_path_buf()));
    }

    info!("Directory {} does not exist, creating it", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed to create directory {}: {}", path.display(), e);
        InitError::CreateFailed(path.to_path_buf(), e)
    })
}
