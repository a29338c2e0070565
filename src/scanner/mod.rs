//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking with subtree-pruning filter rules
//! - Streaming SHA-256 content hashing
//! - Persisting (path, hash, encoded size) records through the store
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`hasher`]: SHA-256 file hashing (streaming, fixed-size chunks)
//! - [`indexer`]: Directory traversal, filtering, and record persistence
//!
//! # Example
//!
//! ```no_run
//! use hashdex::config::Filters;
//! use hashdex::scanner::Indexer;
//! use hashdex::store::FileStore;
//! use std::path::Path;
//!
//! let filters = Filters::default();
//! let store = FileStore::open_in_memory().unwrap();
//! let count = Indexer::new(Path::new("."), &filters)
//!     .index(&store)
//!     .unwrap();
//! println!("Indexed {count} files");
//! ```

pub mod hasher;
pub mod indexer;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_file, hash_to_hex};
pub use indexer::Indexer;

/// Errors that can occur during file hashing.
///
/// These are always recovered locally: the indexer logs the error, skips the
/// file, and keeps walking.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_error_display() {
        let err = HashError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "File not found: /missing");

        let err = HashError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "Permission denied: /secret");
    }
}
