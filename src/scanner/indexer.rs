//! Directory indexer: traversal, filtering, hashing, and persistence.
//!
//! # Overview
//!
//! The [`Indexer`] walks a directory tree with [`walkdir`], applies the
//! configured [`Filters`] and persists one `(path, hash, encoded size)`
//! record per admitted file through the [`FileStore`].
//!
//! Directory exclusion is evaluated before descending, so excluded subtrees
//! are never visited at all. Traversal is single-threaded; indexing and the
//! later duplicate query are strictly sequential phases.
//!
//! # Error recovery
//!
//! Per-file failures are recovered locally: a file that cannot be hashed is
//! logged and skipped (no record), and a file that cannot be statted is
//! recorded with a `"0B"` size. Only store write failures abort the walk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::hasher;
use crate::config::Filters;
use crate::size;
use crate::store::{FileStore, StoreResult};

/// A progress line is emitted after this many persisted records.
const PROGRESS_INTERVAL: u64 = 200;

/// Walks a directory tree and writes index records for qualifying files.
#[derive(Debug)]
pub struct Indexer<'a> {
    /// Root path to walk
    root: PathBuf,
    /// Filter sets applied during the walk
    filters: &'a Filters,
    /// Report each scanned directory at info level
    verbose: bool,
}

impl<'a> Indexer<'a> {
    /// Create a new indexer for the given root directory.
    #[must_use]
    pub fn new(root: &Path, filters: &'a Filters) -> Self {
        Self {
            root: root.to_path_buf(),
            filters,
            verbose: false,
        }
    }

    /// Report each directory as it is scanned.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Walk the tree and persist a record for every admitted file.
    ///
    /// Returns the number of records written in this run. Files that fail
    /// to hash are skipped with a warning; traversal errors (unreadable
    /// directories, vanished entries) are warned about and walked past.
    ///
    /// # Errors
    ///
    /// Only store write failures propagate; they abort the run.
    pub fn index(&self, store: &FileStore) -> StoreResult<u64> {
        let mut count: u64 = 0;

        // Sorted enumeration keeps insertion order deterministic per directory
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // Pruned directories are never descended into, so an
                // allowlisted file below one stays invisible.
                !(entry.file_type().is_dir() && self.filters.excludes_dir(entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Walk error: {e}");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if self.verbose {
                    log::info!("Scanning directory: {}", entry.path().display());
                } else {
                    log::trace!("Scanning directory: {}", entry.path().display());
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.filters.admits_file(path) {
                log::trace!("Skipping filtered file: {}", path.display());
                continue;
            }

            // A file without a digest gets no record.
            let hash = match hasher::hash_file(path) {
                Ok(hash) => hash,
                Err(e) => {
                    log::warn!("Error reading {}: {e}", path.display());
                    continue;
                }
            };

            // A stat failure falls back to a zero size, not a skip.
            let encoded_size = match entry.metadata() {
                Ok(meta) => size::encode(meta.len()),
                Err(e) => {
                    log::warn!("Failed to stat {}: {e}", path.display());
                    "0B".to_string()
                }
            };

            store.insert(&path.to_string_lossy(), &hash, &encoded_size)?;
            count += 1;
            if count % PROGRESS_INTERVAL == 0 {
                log::info!("Processed {count} files...");
            }
        }

        log::debug!("Indexed {} files under {}", count, self.root.display());
        Ok(count)
    }
}
