//! hashdex - File content indexer and duplicate finder
//!
//! A cross-platform Rust CLI application that indexes files by SHA-256
//! content digest into a SQLite store and reports groups of files sharing
//! an identical digest, optionally filtered by a minimum size.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod size;
pub mod store;

use std::path::PathBuf;

use cli::{Cli, Commands, DupesArgs, ScanArgs};
use config::Filters;
use error::ExitCode;
use scanner::Indexer;
use store::FileStore;

/// Run the application logic for an already-parsed command line.
///
/// This is the single entry point behind `main`: it initializes logging,
/// dispatches the subcommand, and reports results on stdout.
///
/// # Errors
///
/// Returns an error for fatal conditions only: storage failures and an
/// unparseable `--min-size` value. Per-file scan errors are logged and
/// recovered inside the indexer.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::InitConfig => run_init_config(),
        Commands::Scan(args) => run_scan(args, cli.verbose > 0),
        Commands::Dupes(args) => run_dupes(args),
    }
}

fn run_init_config() -> anyhow::Result<ExitCode> {
    let dir = config::config_dir()?;
    let created = config::write_defaults(&dir)?;
    for path in &created {
        println!("Created default config: {}", path.display());
    }
    println!("Default configuration files initialized.");
    Ok(ExitCode::Success)
}

fn run_scan(args: ScanArgs, verbose: bool) -> anyhow::Result<ExitCode> {
    let filters = load_filters(&args)?;
    let store = FileStore::open(&resolve_database(args.database)?)?;

    let count = Indexer::new(&args.path, &filters)
        .verbose(verbose)
        .index(&store)?;

    println!("Total files processed: {count}");
    Ok(ExitCode::Success)
}

fn run_dupes(args: DupesArgs) -> anyhow::Result<ExitCode> {
    // An unparseable threshold is a hard input error, never a silent default
    let min_bytes = args.min_size.as_deref().map(size::decode).transpose()?;
    let store = FileStore::open(&resolve_database(args.database)?)?;

    let groups = store.duplicate_groups(min_bytes)?;
    if groups.is_empty() {
        println!("No duplicates found.");
    }
    for group in &groups {
        println!("\nDuplicate Hash: {}", group.hash);
        println!("Paths:");
        for path in &group.paths {
            println!("{path}");
        }
    }
    Ok(ExitCode::Success)
}

/// Resolve the three filter files, falling back to the config directory.
fn load_filters(args: &ScanArgs) -> anyhow::Result<Filters> {
    let skip_types = resolve_filter_path(&args.skip_types, config::SKIP_TYPES_FILE)?;
    let exclude_dirs = resolve_filter_path(&args.exclude_dirs, config::EXCLUDE_DIRS_FILE)?;
    let include_files = resolve_filter_path(&args.include_files, config::INCLUDE_FILES_FILE)?;
    Ok(Filters::load(&skip_types, &exclude_dirs, &include_files))
}

fn resolve_filter_path(
    explicit: &Option<PathBuf>,
    default_name: &str,
) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.clone()),
        None => config::default_filter_path(default_name),
    }
}

fn resolve_database(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => config::default_database_path(),
    }
}
