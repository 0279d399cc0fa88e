//! Multi-owner drive storage core
//!
//! Each owner keeps a private, flat collection of files under a shared
//! root. The crate provides the path-confinement boundary, the file
//! lifecycle operations built on top of it, and the archive/cleanup
//! subsystem that produces and reclaims temporary compressed bundles.
//! Transport, authentication, and owner records are collaborators of
//! this crate, not part of it.

pub mod archive;
pub mod config;
pub mod error;
pub mod storage;
pub mod sweeper;

pub use archive::{Archiver, TempArtifact};
pub use config::StorageConfig;
pub use error::{ArchiveError, DriveError, InitError, StorageError};
pub use storage::{FileStore, LoadedFile, PathResolver, StoreReceipt};
pub use sweeper::RetentionSweeper;
