//! Filter configuration management.
//!
//! The indexer is driven by three independent filter sets, each loaded from a
//! JSON file holding a list of strings:
//!
//! * `skip_types.json` — filename suffixes that exclude a file
//! * `exclude_dirs.json` — substrings that exclude a directory subtree
//! * `include_files.json` — exact-path allowlist (empty = no restriction)
//!
//! A missing or malformed filter file yields an empty set rather than an
//! error: filter configuration is advisory, and a broken file must never
//! stop a scan. The loaded [`Filters`] value is passed explicitly into the
//! indexer; there is no process-global filter state.

use anyhow::Result;
use directories::ProjectDirs;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name for the skip-extensions filter.
pub const SKIP_TYPES_FILE: &str = "skip_types.json";
/// Default file name for the exclude-directories filter.
pub const EXCLUDE_DIRS_FILE: &str = "exclude_dirs.json";
/// Default file name for the include-files allowlist.
pub const INCLUDE_FILES_FILE: &str = "include_files.json";
/// Default file name for the SQLite index database.
pub const DATABASE_FILE: &str = "file_hashes.db";

/// The three filter sets applied during indexing.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Filename suffixes to skip (`".log"`, `"~"`, ...). Matching is plain
    /// suffix matching on the raw file name, so entries without a leading
    /// dot match arbitrary name endings.
    pub skip_extensions: HashSet<String>,
    /// Directory-path substrings to exclude. Matching is substring-based
    /// against the directory's full path, not per path segment: a `"venv"`
    /// entry also excludes a directory named `venv2`.
    pub exclude_dirs: HashSet<String>,
    /// Exact full paths to index. When non-empty, only these files are
    /// indexed (the walk still never enters excluded directories).
    pub include_files: HashSet<String>,
}

impl Filters {
    /// Load all three filter sets from the given files.
    ///
    /// Missing or malformed files contribute an empty set.
    #[must_use]
    pub fn load(skip_types: &Path, exclude_dirs: &Path, include_files: &Path) -> Self {
        Self {
            skip_extensions: load_filter_file(skip_types),
            exclude_dirs: load_filter_file(exclude_dirs),
            include_files: load_filter_file(include_files),
        }
    }

    /// Whether a directory (and its whole subtree) is excluded from the walk.
    ///
    /// True if any configured exclude substring occurs anywhere in the
    /// directory's full path.
    #[must_use]
    pub fn excludes_dir(&self, dir: &Path) -> bool {
        let path = dir.to_string_lossy();
        self.exclude_dirs.iter().any(|excl| path.contains(excl.as_str()))
    }

    /// Whether a file qualifies for indexing.
    ///
    /// Checked after directory exclusion: the allowlist first (a non-empty
    /// include set admits only exact members), then the skip-suffix list on
    /// the raw file name.
    #[must_use]
    pub fn admits_file(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        if !self.include_files.is_empty() && !self.include_files.contains(full.as_ref()) {
            return false;
        }

        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        !self
            .skip_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Load one filter file: a JSON array of strings.
///
/// Any failure (missing file, unreadable file, bad JSON) yields an empty set
/// with a debug log entry.
#[must_use]
pub fn load_filter_file(path: &Path) -> HashSet<String> {
    match load_filter_file_internal(path) {
        Ok(set) => set,
        Err(e) => {
            log::debug!(
                "Filter file {} not usable, treating as empty: {}",
                path.display(),
                e
            );
            HashSet::new()
        }
    }
}

fn load_filter_file_internal(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path)?;
    let entries: Vec<String> = serde_json::from_str(&content)?;
    Ok(entries.into_iter().collect())
}

/// Get the platform-specific configuration directory.
///
/// # Errors
///
/// Fails only when the platform provides no home directory to anchor on.
pub fn config_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "hashdex", "hashdex")
        .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
    Ok(project_dirs.config_dir().to_path_buf())
}

/// Default path of a filter file inside the configuration directory.
///
/// # Errors
///
/// Fails if the configuration directory cannot be determined.
pub fn default_filter_path(file_name: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(file_name))
}

/// Default path of the SQLite index database.
///
/// # Errors
///
/// Fails if the configuration directory cannot be determined.
pub fn default_database_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(DATABASE_FILE))
}

/// Write default filter files into `dir`, creating it if needed.
///
/// Only files that do not already exist are written; existing configuration
/// is never overwritten. Returns the paths that were created.
///
/// # Errors
///
/// Fails if the directory cannot be created or a default file cannot be
/// written.
pub fn write_defaults(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let defaults: [(&str, &[&str]); 3] = [
        (SKIP_TYPES_FILE, &[]),
        (EXCLUDE_DIRS_FILE, &["anaconda3", "venv"]),
        (INCLUDE_FILES_FILE, &[]),
    ];

    let mut created = Vec::new();
    for (file_name, entries) in defaults {
        let path = dir.join(file_name);
        if path.exists() {
            log::debug!("Config file {} already exists, keeping it", path.display());
            continue;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&path, content)?;
        created.push(path);
    }
    Ok(created)
}
