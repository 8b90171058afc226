//! Tests for loading, merging and persisting through [`LabelStore`].

use std::path::Path;

use crate::model::LabelRecord;
use crate::store::{self, LabelFormat, LabelStore, StoreError};

use super::measured_record;

fn write_labels(path: &Path, records: &[LabelRecord]) {
    let format = LabelFormat::from_path(path).unwrap();
    store::persist(path, format, records.iter()).unwrap();
}

#[test]
fn test_missing_or_unsupported_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(store::load(&dir.path().join("absent.csv")).unwrap().is_empty());

    let odd = dir.path().join("labels.txt");
    std::fs::write(&odd, "whatever").unwrap();
    assert!(store::load(&odd).unwrap().is_empty());
}

#[test]
fn test_unparseable_file_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let err = LabelStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Load { .. }));
    assert!(err.is_data_error());
}

#[test]
fn test_open_rejects_unsupported_extension() {
    let err = LabelStore::open("labels.xml").unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedFormat { .. }));
}

#[test]
fn test_load_keys_by_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    write_labels(
        &path,
        &[
            LabelRecord::new("cat.png", 1, "cat"),
            LabelRecord::new("dog.jpg", 0, "dog"),
        ],
    );

    let map = store::load(&path).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["cat"].image_name, "cat.png");
    assert_eq!(map["dog"].label, 0);
}

#[test]
fn test_record_writes_through_and_session_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    write_labels(
        &path,
        &[
            LabelRecord::new("a.png", 1, "one"),
            LabelRecord::new("b.png", 2, "two"),
        ],
    );

    let mut store = LabelStore::open(&path).unwrap();
    assert!(store.contains("a"));
    store.record(LabelRecord::new("a.jpg", 5, "five")).unwrap();
    store.record(LabelRecord::new("c.png", 3, "three")).unwrap();

    // Visible on disk without any explicit flush
    let on_disk = store::load(&path).unwrap();
    assert_eq!(on_disk.len(), 3);
    assert_eq!(on_disk["a"].label, 5);
    assert_eq!(on_disk["a"].image_name, "a.jpg");
    assert_eq!(on_disk["b"].label, 2);
    assert_eq!(store.session_len(), 2);
}

#[test]
fn test_relabel_in_same_session_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.json");
    let mut store = LabelStore::open(&path).unwrap();

    store.record(LabelRecord::new("x.png", 1, "1")).unwrap();
    store.record(measured_record("x.png", 4, "4")).unwrap();

    let on_disk = store::load(&path).unwrap();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk["x"].label, 4);
    assert_eq!(on_disk["x"].measurements.len(), 1);
    assert_eq!(store.session_len(), 1);
}

#[test]
fn test_persist_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    let mut store = LabelStore::open(&path).unwrap();
    store.record(LabelRecord::new("a.png", 0, "0")).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["labels.csv".to_string()]);
}

#[test]
fn test_failed_persist_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.csv");
    write_labels(&path, &[LabelRecord::new("a.png", 1, "one")]);

    // Target directory that does not exist makes the temp write fail
    let missing = dir.path().join("missing/labels.csv");
    assert!(store::persist(&missing, LabelFormat::Tabular, std::iter::empty()).is_err());

    let on_disk = store::load(&path).unwrap();
    assert_eq!(on_disk["a"].label, 1);
}
