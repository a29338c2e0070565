//! End-to-end tests for the index -> duplicate-report pipeline.

use std::fs;

use hashdex::config::Filters;
use hashdex::scanner::Indexer;
use hashdex::store::FileStore;
use tempfile::TempDir;

/// Directory with two identical files and one different one.
fn create_duplicate_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "shared content").unwrap();
    fs::write(dir.path().join("b.txt"), "shared content").unwrap();
    fs::write(dir.path().join("c.txt"), "different content").unwrap();
    dir
}

#[test]
fn test_index_then_report_finds_identical_pair() {
    let dir = create_duplicate_tree();
    let store = FileStore::open_in_memory().unwrap();
    let filters = Filters::default();

    let count = Indexer::new(dir.path(), &filters).index(&store).unwrap();
    assert_eq!(count, 3);

    let groups = store.duplicate_groups(None).unwrap();
    assert_eq!(groups.len(), 1);

    let paths = &groups[0].paths;
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("a.txt"));
    assert!(paths[1].ends_with("b.txt"));
}

#[test]
fn test_reindexing_appends_and_doubles_groups() {
    let dir = create_duplicate_tree();
    let store = FileStore::open_in_memory().unwrap();
    let filters = Filters::default();
    let indexer = Indexer::new(dir.path(), &filters);

    indexer.index(&store).unwrap();
    indexer.index(&store).unwrap();

    // No pruning, no upsert: every row persists, so after two runs the
    // identical pair appears four times and even the unique file forms a
    // group with itself.
    assert_eq!(store.records().unwrap().len(), 6);

    let groups = store.duplicate_groups(None).unwrap();
    assert_eq!(groups.len(), 2);
    let pair_group = groups
        .iter()
        .find(|g| g.paths.iter().any(|p| p.ends_with("a.txt")))
        .unwrap();
    assert_eq!(pair_group.len(), 4);
}

#[test]
fn test_min_size_threshold_filters_small_groups() {
    let dir = TempDir::new().unwrap();
    // Two identical small files (encodes as a handful of bytes)
    fs::write(dir.path().join("small1.bin"), vec![1u8; 100]).unwrap();
    fs::write(dir.path().join("small2.bin"), vec![1u8; 100]).unwrap();
    // Two identical 2 MiB files
    fs::write(dir.path().join("big1.bin"), vec![2u8; 2 * 1024 * 1024]).unwrap();
    fs::write(dir.path().join("big2.bin"), vec![2u8; 2 * 1024 * 1024]).unwrap();

    let store = FileStore::open_in_memory().unwrap();
    let filters = Filters::default();
    Indexer::new(dir.path(), &filters).index(&store).unwrap();

    // Unfiltered: both pairs report
    assert_eq!(store.duplicate_groups(None).unwrap().len(), 2);

    // With a 1 MiB floor only the big pair survives
    let groups = store.duplicate_groups(Some(1024 * 1024)).unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].paths.iter().all(|p| p.contains("big")));
}

#[test]
fn test_filter_files_drive_the_scan() {
    let tree = TempDir::new().unwrap();
    fs::write(tree.path().join("keep.txt"), "data").unwrap();
    fs::write(tree.path().join("skip.log"), "data").unwrap();
    let venv = tree.path().join("venv");
    fs::create_dir(&venv).unwrap();
    fs::write(venv.join("hidden.txt"), "data").unwrap();

    // Filter configuration loaded from real JSON files, as the CLI does
    let cfg = TempDir::new().unwrap();
    let skip = cfg.path().join("skip_types.json");
    let excl = cfg.path().join("exclude_dirs.json");
    let incl = cfg.path().join("include_files.json");
    fs::write(&skip, r#"[".log"]"#).unwrap();
    fs::write(&excl, r#"["venv"]"#).unwrap();
    // include_files.json intentionally absent: empty allowlist

    let filters = Filters::load(&skip, &excl, &incl);
    let store = FileStore::open_in_memory().unwrap();
    let count = Indexer::new(tree.path(), &filters).index(&store).unwrap();

    assert_eq!(count, 1);
    let records = store.records().unwrap();
    assert!(records[0].path.ends_with("keep.txt"));
}

#[test]
fn test_pipeline_against_on_disk_store() {
    let tree = create_duplicate_tree();
    let db_dir = TempDir::new().unwrap();
    let db_path = db_dir.path().join("file_hashes.db");

    // Index in one store handle, report through a fresh one: records are
    // durable across opens
    {
        let store = FileStore::open(&db_path).unwrap();
        let filters = Filters::default();
        Indexer::new(tree.path(), &filters).index(&store).unwrap();
    }

    let store = FileStore::open(&db_path).unwrap();
    let groups = store.duplicate_groups(None).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
