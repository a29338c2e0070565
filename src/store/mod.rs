//! SQLite-backed record store for indexed files.
//!
//! # Overview
//!
//! The store is a single durable table of `(path, hash, encoded size)`
//! records keyed by a synthetic rowid, with indexes on `hash` and `size`.
//! It is append-only by design: re-indexing the same file creates a new row,
//! nothing is ever updated or pruned. Duplicate detection is a read-side
//! query that groups records by hash.
//!
//! # Failure model
//!
//! Unlike per-file scan errors, any failure against the database is fatal to
//! the run and propagates as a [`StoreError`].

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::size;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the underlying storage file.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The directory holding the database file could not be created.
    #[error("Failed to create store directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// One persisted index record.
///
/// `hash` is the digest of the content at `path` as observed at index time;
/// it is never re-validated. `size` is the codec-encoded size string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as scanned
    pub path: String,
    /// Hex-encoded SHA-256 content digest
    pub hash: String,
    /// Encoded human-scaled size (e.g. `"12M"`)
    pub size: String,
}

/// A set of indexed records sharing one content digest.
///
/// Only hashes with two or more records form a group. Paths appear in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content digest
    pub hash: String,
    /// Member paths, in insertion order
    pub paths: Vec<String>,
}

impl DuplicateGroup {
    /// Number of records in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Persistent index of scanned files backed by SQLite.
pub struct FileStore {
    conn: Connection,
}

impl FileStore {
    /// Open (or create) the store at the given path.
    ///
    /// The parent directory and the schema are created if absent; schema
    /// setup is idempotent.
    ///
    /// # Errors
    ///
    /// Fails if the directory or database file cannot be created, or the
    /// schema cannot be initialized.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        log::debug!("Opened file store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory store. Used by tests and throwaway runs.
    ///
    /// # Errors
    ///
    /// Fails if the schema cannot be initialized.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS files (
                 id   INTEGER PRIMARY KEY,
                 path TEXT NOT NULL,
                 hash TEXT NOT NULL,
                 size TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_hash ON files (hash);
             CREATE INDEX IF NOT EXISTS idx_size ON files (size);",
        )?;
        Ok(())
    }

    /// Append one record.
    ///
    /// No uniqueness constraint and no upsert: indexing the same file twice
    /// creates two rows.
    ///
    /// # Errors
    ///
    /// Fails on any write error; the caller treats this as fatal.
    pub fn insert(&self, path: &str, hash: &str, size: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO files (path, hash, size) VALUES (?1, ?2, ?3)",
            (path, hash, size),
        )?;
        Ok(())
    }

    /// All records in insertion (rowid) order.
    ///
    /// # Errors
    ///
    /// Fails on any read error against the database.
    pub fn records(&self) -> StoreResult<Vec<FileRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, hash, size FROM files ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(FileRecord {
                path: row.get(0)?,
                hash: row.get(1)?,
                size: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// Group records by hash and return the groups with two or more members.
    ///
    /// Groups appear in first-seen order and paths within a group in
    /// insertion order. With `min_bytes`, a group is kept only if at least
    /// one member's stored size decodes to at least that many bytes; the
    /// decode happens per record at query time against the codec's unit
    /// table, never by re-statting the file.
    ///
    /// # Errors
    ///
    /// Fails on any read error against the database.
    pub fn duplicate_groups(&self, min_bytes: Option<u64>) -> StoreResult<Vec<DuplicateGroup>> {
        let mut groups: Vec<DuplicateGroup> = Vec::new();
        let mut largest: Vec<u64> = Vec::new();
        let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

        for record in self.records()? {
            // Stored sizes are always codec output; a record that fails to
            // decode counts as zero bytes.
            let decoded = size::decode(&record.size).unwrap_or_else(|e| {
                log::debug!("Undecodable size '{}' for {}: {}", record.size, record.path, e);
                0
            });

            match index.get(&record.hash) {
                Some(&i) => {
                    groups[i].paths.push(record.path);
                    largest[i] = largest[i].max(decoded);
                }
                None => {
                    index.insert(record.hash.clone(), groups.len());
                    groups.push(DuplicateGroup {
                        hash: record.hash,
                        paths: vec![record.path],
                    });
                    largest.push(decoded);
                }
            }
        }

        let kept = groups
            .into_iter()
            .zip(largest)
            .filter(|(group, max_bytes)| {
                group.len() >= 2 && min_bytes.is_none_or(|min| *max_bytes >= min)
            })
            .map(|(group, _)| group)
            .collect();
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_records(records: &[(&str, &str, &str)]) -> FileStore {
        let store = FileStore::open_in_memory().unwrap();
        for &(path, hash, size) in records {
            store.insert(path, hash, size).unwrap();
        }
        store
    }

    #[test]
    fn test_open_creates_schema_idempotently() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("nested").join("index.db");

        {
            let store = FileStore::open(&db).unwrap();
            store.insert("/a", "h1", "1K").unwrap();
        }

        // Reopening must keep existing rows and not fail on schema setup
        let store = FileStore::open(&db).unwrap();
        assert_eq!(store.records().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_is_append_only() {
        let store = store_with_records(&[("/a", "h1", "1K"), ("/a", "h1", "1K")]);

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_duplicate_groups_requires_two_members() {
        let store = store_with_records(&[
            ("/a", "h1", "1K"),
            ("/b", "h1", "1K"),
            ("/c", "h2", "1K"),
        ]);

        let groups = store.duplicate_groups(None).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].hash, "h1");
        assert_eq!(groups[0].paths, vec!["/a", "/b"]);
    }

    #[test]
    fn test_duplicate_groups_preserve_insertion_order() {
        let store = store_with_records(&[
            ("/first", "h2", "1K"),
            ("/second", "h1", "1K"),
            ("/third", "h2", "1K"),
            ("/fourth", "h1", "1K"),
            ("/fifth", "h2", "1K"),
        ]);

        let groups = store.duplicate_groups(None).unwrap();
        assert_eq!(groups.len(), 2);
        // First-seen hash order between groups
        assert_eq!(groups[0].hash, "h2");
        assert_eq!(groups[1].hash, "h1");
        // Insertion order within a group
        assert_eq!(groups[0].paths, vec!["/first", "/third", "/fifth"]);
        assert_eq!(groups[1].paths, vec!["/second", "/fourth"]);
    }

    #[test]
    fn test_duplicate_groups_min_size_excludes_small_groups() {
        let store = store_with_records(&[("/a", "h1", "5M"), ("/b", "h1", "5M")]);

        let groups = store.duplicate_groups(Some(10 * 1024 * 1024)).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_duplicate_groups_min_size_needs_one_qualifying_member() {
        let store = store_with_records(&[("/a", "h1", "5M"), ("/b", "h1", "20M")]);

        // One member at or over the threshold keeps the whole group
        let groups = store.duplicate_groups(Some(10 * 1024 * 1024)).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paths, vec!["/a", "/b"]);
    }

    #[test]
    fn test_duplicate_groups_min_size_decodes_raw_byte_sizes() {
        let store = store_with_records(&[("/a", "h1", "2048"), ("/b", "h1", "2048")]);

        assert_eq!(store.duplicate_groups(Some(2048)).unwrap().len(), 1);
        assert!(store.duplicate_groups(Some(4096)).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_groups_empty_store() {
        let store = FileStore::open_in_memory().unwrap();
        assert!(store.duplicate_groups(None).unwrap().is_empty());
    }
}
