//! Command-line interface definitions for hashdex.
//!
//! This module defines all CLI arguments, subcommands, and options using the
//! clap derive API: global options (verbosity, quiet, JSON errors) and one
//! subcommand per operation.
//!
//! # Example
//!
//! ```bash
//! # Index a directory into the store
//! hashdex scan ~/Documents
//!
//! # Index with explicit filter files and directory reporting
//! hashdex -v scan ~/Documents --exclude-dirs excludes.json
//!
//! # Report duplicate groups of at least 10 MiB
//! hashdex dupes --min-size 10M
//!
//! # Create default filter files in the config directory
//! hashdex init-config
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// File content indexer and duplicate finder.
///
/// hashdex hashes every qualifying file under a directory into a SQLite
/// store and reports groups of files sharing an identical digest.
#[derive(Debug, Parser)]
#[command(name = "hashdex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for hashdex.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index a directory tree into the store
    Scan(ScanArgs),
    /// Report groups of files sharing a content digest
    Dupes(DupesArgs),
    /// Create default filter files in the config directory
    InitConfig,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// JSON file listing filename suffixes to skip
    ///
    /// Defaults to skip_types.json in the config directory.
    #[arg(long, value_name = "FILE")]
    pub skip_types: Option<PathBuf>,

    /// JSON file listing directory-path substrings to exclude
    ///
    /// Defaults to exclude_dirs.json in the config directory.
    #[arg(long, value_name = "FILE")]
    pub exclude_dirs: Option<PathBuf>,

    /// JSON file listing exact file paths to index (allowlist)
    ///
    /// Defaults to include_files.json in the config directory.
    #[arg(long, value_name = "FILE")]
    pub include_files: Option<PathBuf>,

    /// Path to the SQLite store
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,
}

/// Arguments for the dupes subcommand.
#[derive(Debug, Args)]
pub struct DupesArgs {
    /// Minimum file size for reported groups (e.g. 10M, 1G, or raw bytes)
    ///
    /// Uses the store's own size encoding: single-letter units B, K, M, G,
    /// T, P on a 1024 base. A bare number is a raw byte count.
    #[arg(long, value_name = "SIZE")]
    pub min_size: Option<String>,

    /// Path to the SQLite store
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,
}
