//! Snapshot Codec Tests
//!
//! Tests verify:
//! - Export writes ascending `key:value` lines and truncates
//! - Import skips blank and malformed lines
//! - First occurrence of a key wins on import
//! - Export/import round trip
//! - I/O failures are surfaced

use std::fs;

use skipkv::config::Config;
use skipkv::snapshot::{self, ImportStats};
use skipkv::{SkipList, Store, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn store_with_path(dir: &TempDir) -> Store<i32, String> {
    let config = Config::builder()
        .snapshot_path(dir.path().join("store").join("dumpFile"))
        .build();
    Store::from_list(config, SkipList::seeded(10, 5)).unwrap()
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_writes_ascending_lines() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);
    store.insert(3, "a".into());
    store.insert(7, "b".into());
    store.insert(5, "c".into());

    let written = store.export().unwrap();

    assert_eq!(written, 3);
    let contents = fs::read_to_string(&store.config().snapshot_path).unwrap();
    assert_eq!(contents, "3:a\n5:c\n7:b\n");
}

#[test]
fn test_export_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);
    store.insert(1, "x".into());

    store.export().unwrap();

    assert!(dir.path().join("store").is_dir());
}

#[test]
fn test_export_truncates_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap");
    fs::write(&path, "99:old\n98:older\n97:oldest\n").unwrap();

    let store = store_with_path(&dir);
    store.insert(1, "new".into());
    store.export_to(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "1:new\n");
}

#[test]
fn test_export_empty_store_writes_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap");
    let store = store_with_path(&dir);

    assert_eq!(store.export_to(&path).unwrap(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_export_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);
    store.insert(2, "b".into());
    store.insert(1, "a".into());

    store.export().unwrap();

    assert_eq!(store.size(), 2);
    assert_eq!(store.search(&1), Some("a".to_string()));
}

#[test]
fn test_export_rejects_key_with_delimiter() {
    let dir = TempDir::new().unwrap();
    let store: Store<String, String> = Store::new(Config::default()).unwrap();
    store.insert("a:b".into(), "v".into());

    let err = store.export_to(&dir.path().join("snap")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord(_)));
}

#[test]
fn test_export_rejects_empty_value() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);
    store.insert(1, String::new());

    let err = store.export().unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord(_)));
}

#[test]
fn test_export_to_directory_fails() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);
    store.insert(1, "a".into());

    let err = store.export_to(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn test_export_to_writer() {
    let store = store_with_path(&TempDir::new().unwrap());
    store.insert(2, "two".into());
    store.insert(1, "one".into());

    let mut out = Vec::new();
    assert_eq!(snapshot::export_to_writer(&store, &mut out).unwrap(), 2);
    assert_eq!(String::from_utf8(out).unwrap(), "1:one\n2:two\n");
}

// =============================================================================
// Import Tests
// =============================================================================

#[test]
fn test_import_skips_malformed_and_keeps_first_duplicate() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);
    let path = dir.path().join("input");
    fs::write(&path, "10:x\n\n10:y\nbad\n20:z\n").unwrap();

    let stats = store.import_from(&path).unwrap();

    assert_eq!(
        stats,
        ImportStats {
            inserted: 2,
            duplicates: 1,
            malformed: 2,
        }
    );
    let entries: Vec<(i32, String)> = store.enumerate().collect();
    assert_eq!(entries, vec![(10, "x".to_string()), (20, "z".to_string())]);
}

#[test]
fn test_import_value_keeps_later_delimiters() {
    let store: Store<String, String> = Store::new(Config::default()).unwrap();
    let input = "url:http://example.com:8080/path\n";

    snapshot::import_from_reader(&store, input.as_bytes()).unwrap();

    assert_eq!(
        store.search(&"url".to_string()),
        Some("http://example.com:8080/path".to_string())
    );
}

#[test]
fn test_import_does_not_overwrite_existing_keys() {
    let store = store_with_path(&TempDir::new().unwrap());
    store.insert(1, "live".into());

    let stats = snapshot::import_from_reader(&store, "1:stale\n2:fresh\n".as_bytes()).unwrap();

    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(store.search(&1), Some("live".to_string()));
    assert_eq!(store.search(&2), Some("fresh".to_string()));
}

#[test]
fn test_import_unparsable_key_is_malformed() {
    let store = store_with_path(&TempDir::new().unwrap());

    let stats = snapshot::import_from_reader(&store, "ten:x\n11:y\n".as_bytes()).unwrap();

    assert_eq!(stats.malformed, 1);
    assert_eq!(store.size(), 1);
}

#[test]
fn test_import_skips_lines_with_empty_key_or_value() {
    let store: Store<String, String> = Store::new(Config::default()).unwrap();

    let stats = snapshot::import_from_reader(&store, "k:\n:v\n:\nkey:val\n".as_bytes()).unwrap();

    assert_eq!(
        stats,
        ImportStats {
            inserted: 1,
            duplicates: 0,
            malformed: 3,
        }
    );
    let entries: Vec<(String, String)> = store.enumerate().collect();
    assert_eq!(entries, vec![("key".to_string(), "val".to_string())]);
}

#[test]
fn test_import_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let store = store_with_path(&dir);

    let err = store.import_from(&dir.path().join("does-not-exist")).unwrap_err();

    match err {
        StoreError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io error, got {:?}", other),
    }
    assert!(store.is_empty());
}

#[test]
fn test_import_with_custom_delimiter() {
    let config = Config::builder().delimiter('=').build();
    let store: Store<String, i64> = Store::new(config).unwrap();

    let stats =
        snapshot::import_from_reader(&store, "a=1\nb:2\nc=-3\n".as_bytes()).unwrap();

    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.malformed, 1);
    assert_eq!(store.search(&"c".to_string()), Some(-3));
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_export_import_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = store_with_path(&dir);
    for key in (0..200).rev() {
        source.insert(key * 3, format!("value-{}", key));
    }
    source.delete(&30);
    source.export().unwrap();

    let restored = store_with_path(&dir);
    let stats = restored.import().unwrap();

    assert_eq!(stats.inserted, 199);
    assert_eq!(stats.malformed, 0);
    let before: Vec<(i32, String)> = source.enumerate().collect();
    let after: Vec<(i32, String)> = restored.enumerate().collect();
    assert_eq!(before, after);
}
