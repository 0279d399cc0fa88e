//! Error types
//!
//! Defines domain-specific error types for each module of the drive core.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// File storage errors
///
/// Variants carry the client-supplied filename rather than the resolved
/// on-disk path so they can be surfaced to callers without leaking the
/// root layout.
#[derive(Debug)]
pub enum StorageError {
    InvalidPath(String),
    FileAlreadyExists(String),
    FileNotFound(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidPath(name) => write!(f, "Invalid filename: {}", name),
            StorageError::FileAlreadyExists(name) => write!(f, "File already exists: {}", name),
            StorageError::FileNotFound(name) => write!(f, "File not found: {}", name),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Archive module errors
#[derive(Debug)]
pub enum ArchiveError {
    Storage(StorageError),
    DuplicateEntry(String),
    Zip(zip::result::ZipError),
    IoError(io::Error),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::Storage(e) => write!(f, "Storage error: {}", e),
            ArchiveError::DuplicateEntry(name) => {
                write!(f, "Duplicate filename in archive request: {}", name)
            }
            ArchiveError::Zip(e) => write!(f, "Compression error: {}", e),
            ArchiveError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<StorageError> for ArchiveError {
    fn from(error: StorageError) -> Self {
        ArchiveError::Storage(error)
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(error: zip::result::ZipError) -> Self {
        ArchiveError::Zip(error)
    }
}

impl From<io::Error> for ArchiveError {
    fn from(error: io::Error) -> Self {
        ArchiveError::IoError(error)
    }
}

/// Fatal initialization errors
///
/// Raised while establishing the storage root or the archive temp
/// directory. The hosting process decides whether to abort.
#[derive(Debug)]
pub enum InitError {
    NotADirectory(PathBuf),
    CreateFailed(PathBuf, io::Error),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NotADirectory(path) => {
                write!(f, "Resource at {} is not a directory", path.display())
            }
            InitError::CreateFailed(path, e) => {
                write!(f, "Failed to create directory {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for InitError {}

/// General drive error that encompasses all error types
#[derive(Debug)]
pub enum DriveError {
    Storage(StorageError),
    Archive(ArchiveError),
    Init(InitError),
    IoError(io::Error),
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::Storage(e) => write!(f, "Storage error: {}", e),
            DriveError::Archive(e) => write!(f, "Archive error: {}", e),
            DriveError::Init(e) => write!(f, "Initialization error: {}", e),
            DriveError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DriveError {}

impl From<StorageError> for DriveError {
    fn from(error: StorageError) -> Self {
        DriveError::Storage(error)
    }
}

impl From<ArchiveError> for DriveError {
    fn from(error: ArchiveError) -> Self {
        DriveError::Archive(error)
    }
}

impl From<InitError> for DriveError {
    fn from(error: InitError) -> Self {
        DriveError::Init(error)
    }
}

impl From<io::Error> for DriveError {
    fn from(error: io::Error) -> Self {
        DriveError::IoError(error)
    }
}
