//! File lifecycle operations
//!
//! Store, load, list, delete, and rename over paths confined by the
//! resolver. Operations are synchronous, blocking filesystem calls;
//! concurrent calls on the same `(owner, filename)` are best-effort and
//! may surface a spurious `FileAlreadyExists` or `FileNotFound` under
//! contention.

use log::{info, warn};
use std::fs;
use std::io::{self, Read};

use crate::error::StorageError;
use crate::storage::resolver::PathResolver;
use crate::storage::results::{LoadedFile, StoreReceipt};

/// File lifecycle operations over owner namespaces.
#[derive(Debug, Clone)]
pub struct FileStore {
    resolver: PathResolver,
}

impl FileStore {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// The resolver confining this store's paths.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Stores `content` as a new file for `owner_id`, creating the
    /// owner directory on first write. An occupied destination fails
    /// with `FileAlreadyExists` and nothing is written. A crash
    /// mid-write may leave a truncated file; that is accepted.
    pub fn store<R: Read>(
        &self,
        owner_id: u64,
        filename: &str,
        mut content: R,
    ) -> Result<StoreReceipt, StorageError> {
        let path = self.resolver.file_path(filename, owner_id)?;

        let owner_dir = self.resolver.owner_directory(owner_id);
        if !owner_dir.exists() {
            fs::create_dir_all(&owner_dir)?;
        }

        if path.exists() {
            warn!(
                "Upload rejected, {} already exists for owner {}",
                filename, owner_id
            );
            return Err(StorageError::FileAlreadyExists(filename.to_string()));
        }

        // create_new keeps the existence check honest if another writer
        // races us between the check and the open.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    StorageError::FileAlreadyExists(filename.to_string())
                }
                _ => StorageError::IoError(e),
            })?;
        let size_bytes = io::copy(&mut content, &mut file)?;

        info!(
            "Stored {} for owner {} ({} bytes) at {}",
            filename,
            owner_id,
            size_bytes,
            path.display()
        );
        Ok(StoreReceipt {
            filename: filename.to_string(),
            size_bytes,
            path,
        })
    }

    /// Opens a stored file for reading, returning the handle together
    /// with its length and modification time.
    pub fn load(&self, owner_id: u64, filename: &str) -> Result<LoadedFile, StorageError> {
        let path = self.resolver.file_path(filename, owner_id)?;

        if !path.exists() {
            warn!("Load failed, {} not found for owner {}", filename, owner_id);
            return Err(StorageError::FileNotFound(filename.to_string()));
        }
        self.resolver.verify_confined(&path, owner_id)?;

        let file = fs::File::open(&path)?;
        let metadata = file.metadata()?;
        Ok(LoadedFile {
            size_bytes: metadata.len(),
            modified: metadata.modified().ok(),
            file,
            path,
        })
    }

    /// Lists the filenames directly inside the owner's directory, in
    /// enumeration order. A missing directory is an empty listing, not
    /// an error.
    pub fn list(&self, owner_id: u64) -> Result<Vec<String>, StorageError> {
        let owner_dir = self.resolver.owner_directory(owner_id);

        let entries = match fs::read_dir(&owner_dir) {
            Ok(entries) => entries,
            // No writes yet for this owner, or something non-directory
            // squatting on the name: both are an empty listing.
            Err(e)
                if e.kind() == io::ErrorKind::NotFound
                    || e.kind() == io::ErrorKind::NotADirectory =>
            {
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let mut filenames = Vec::new();
        for entry in entries {
            let entry = entry?;
            filenames.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(filenames)
    }

    /// Offset/limit slice over the same enumeration as `list`. The
    /// slice is unstable across concurrent mutation of the directory.
    pub fn list_page(
        &self,
        owner_id: u64,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<String>, StorageError> {
        let offset = page.saturating_mul(page_size);
        Ok(self
            .list(owner_id)?
            .into_iter()
            .skip(offset)
            .take(page_size)
            .collect())
    }

    /// Removes a stored file.
    pub fn delete(&self, owner_id: u64, filename: &str) -> Result<(), StorageError> {
        let path = self.resolver.file_path(filename, owner_id)?;

        if !path.exists() {
            warn!(
                "Delete failed, {} not found for owner {}",
                filename, owner_id
            );
            return Err(StorageError::FileNotFound(filename.to_string()));
        }
        self.resolver.verify_confined(&path, owner_id)?;

        fs::remove_file(&path)?;
        info!("Deleted {} for owner {}", filename, owner_id);
        Ok(())
    }

    /// Atomically moves a file to a new name within the same owner
    /// directory. The destination must not already exist, matching
    /// `store`'s no-overwrite policy.
    pub fn rename(
        &self,
        owner_id: u64,
        current_filename: &str,
        new_filename: &str,
    ) -> Result<(), StorageError> {
        let current_path = self.resolver.file_path(current_filename, owner_id)?;
        let new_path = self.resolver.file_path(new_filename, owner_id)?;

        if !current_path.exists() {
            warn!(
                "Rename failed, {} not found for owner {}",
                current_filename, owner_id
            );
            return Err(StorageError::FileNotFound(current_filename.to_string()));
        }
        self.resolver.verify_confined(&current_path, owner_id)?;

        if new_path.exists() {
            warn!(
                "Rename rejected, {} already exists for owner {}",
                new_filename, owner_id
            );
            return Err(StorageError::FileAlreadyExists(new_filename.to_string()));
        }

        fs::rename(&current_path, &new_path)?;
        info!(
            "Renamed {} to {} for owner {}",
            current_filename, new_filename, owner_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    fn store(root: &std::path::Path) -> FileStore {
        FileStore::new(PathResolver::new(root.to_path_buf()).unwrap())
    }

    fn read_back(store: &FileStore, owner_id: u64, filename: &str) -> Vec<u8> {
        let mut loaded = store.load(owner_id, filename).unwrap();
        let mut content = Vec::new();
        loaded.file.read_to_end(&mut content).unwrap();
        content
    }

    #[test]
    fn store_then_load_returns_content() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        let receipt = store.store(42, "a.txt", &b"hello drive"[..]).unwrap();
        assert_eq!(receipt.size_bytes, 11);
        assert!(temp.path().join("42").join("a.txt").is_file());

        assert_eq!(read_back(&store, 42, "a.txt"), b"hello drive");
        let loaded = store.load(42, "a.txt").unwrap();
        assert_eq!(loaded.size_bytes, 11);
        assert!(loaded.modified.is_some());
    }

    #[test]
    fn store_does_not_overwrite() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        store.store(42, "a.txt", &b"first"[..]).unwrap();
        let second = store.store(42, "a.txt", &b"second"[..]);
        assert!(matches!(
            second,
            Err(StorageError::FileAlreadyExists(name)) if name == "a.txt"
        ));

        assert_eq!(read_back(&store, 42, "a.txt"), b"first");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        assert!(matches!(
            store.load(42, "ghost.txt"),
            Err(StorageError::FileNotFound(_))
        ));
    }

    #[test]
    fn delete_removes_file() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        store.store(42, "a.txt", &b"bytes"[..]).unwrap();
        store.delete(42, "a.txt").unwrap();
        assert!(matches!(
            store.load(42, "a.txt"),
            Err(StorageError::FileNotFound(_))
        ));
        assert!(matches!(
            store.delete(42, "a.txt"),
            Err(StorageError::FileNotFound(_))
        ));
    }

    #[test]
    fn rename_moves_content_to_new_name() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        store.store(42, "a.txt", &b"payload"[..]).unwrap();
        store.rename(42, "a.txt", "b.txt").unwrap();

        assert!(matches!(
            store.load(42, "a.txt"),
            Err(StorageError::FileNotFound(_))
        ));
        assert_eq!(read_back(&store, 42, "b.txt"), b"payload");
    }

    #[test]
    fn rename_missing_source_is_not_found() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        assert!(matches!(
            store.rename(42, "ghost.txt", "b.txt"),
            Err(StorageError::FileNotFound(_))
        ));
    }

    #[test]
    fn rename_does_not_overwrite_destination() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        store.store(42, "a.txt", &b"a"[..]).unwrap();
        store.store(42, "b.txt", &b"b"[..]).unwrap();

        assert!(matches!(
            store.rename(42, "a.txt", "b.txt"),
            Err(StorageError::FileAlreadyExists(name)) if name == "b.txt"
        ));
        assert_eq!(read_back(&store, 42, "a.txt"), b"a");
        assert_eq!(read_back(&store, 42, "b.txt"), b"b");
    }

    #[test]
    fn list_unknown_owner_is_empty() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        assert!(store.list(42).unwrap().is_empty());
    }

    #[test]
    fn list_returns_stored_filenames() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        store.store(42, "a.txt", &b"a"[..]).unwrap();
        store.store(42, "b.txt", &b"b"[..]).unwrap();
        store.store(7, "c.txt", &b"c"[..]).unwrap();

        let mut listed = store.list(42).unwrap();
        listed.sort();
        assert_eq!(listed, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn list_page_slices_the_enumeration() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        for i in 0..5 {
            store
                .store(42, &format!("f{}.txt", i), &b"x"[..])
                .unwrap();
        }

        let all = store.list(42).unwrap();
        assert_eq!(store.list_page(42, 0, 2).unwrap(), all[0..2]);
        assert_eq!(store.list_page(42, 1, 2).unwrap(), all[2..4]);
        assert_eq!(store.list_page(42, 2, 2).unwrap(), all[4..5]);
        assert!(store.list_page(42, 3, 2).unwrap().is_empty());
        assert!(store.list_page(42, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn operations_reject_traversal_before_touching_disk() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        assert!(matches!(
            store.store(42, "../evil.txt", &b"x"[..]),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            store.load(42, "../evil.txt"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            store.delete(42, "../evil.txt"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            store.rename(42, "../evil.txt", "b.txt"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(!temp.path().join("evil.txt").exists());
        assert!(!temp.path().join("42").exists());
    }
}
