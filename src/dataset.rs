//! Dataset discovery.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::DatasetItem;
use crate::store::RecordMap;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read image folder {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Whether a path has one of the given extensions (case-insensitive, without dot).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Recursively collect images under `root`, sorted by full path.
///
/// Unreadable subdirectories are skipped with a warning; an unreadable root
/// is an error.
pub fn discover(root: &Path, extensions: &[&str]) -> Result<Vec<DatasetItem>, DatasetError> {
    let mut paths = Vec::new();
    scan_folder_recursive(root, extensions, &mut paths).map_err(|source| DatasetError::Read {
        path: root.to_path_buf(),
        source,
    })?;
    paths.sort();

    log::info!(
        "Recursively scanned folder {:?}: found {} images",
        root,
        paths.len()
    );
    Ok(paths.into_iter().map(DatasetItem::new).collect())
}

fn scan_folder_recursive(
    folder: &Path,
    extensions: &[&str],
    paths: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(folder)?.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            paths.push(path);
        } else if path.is_dir() {
            if let Err(e) = scan_folder_recursive(&path, extensions, paths) {
                log::warn!("Failed to scan subdirectory {:?}: {}", path, e);
            }
        }
    }
    Ok(())
}

/// Drop items whose identity already has a label.
pub fn filter_unlabeled(items: Vec<DatasetItem>, existing: &RecordMap) -> Vec<DatasetItem> {
    let before = items.len();
    let remaining: Vec<DatasetItem> = items
        .into_iter()
        .filter(|item| !existing.contains_key(&item.identity()))
        .collect();
    if remaining.len() < before {
        log::info!(
            "Skipping {} already labeled images, {} left",
            before - remaining.len(),
            remaining.len()
        );
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SUPPORTED_EXTENSIONS;
    use crate::model::LabelRecord;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_discover_is_recursive_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.JPG"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("sub/c.tif"));

        let items = discover(dir.path(), SUPPORTED_EXTENSIONS).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.display_name.as_str()).collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.tif"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("nope"), SUPPORTED_EXTENSIONS).is_err());
    }

    #[test]
    fn test_filter_unlabeled_skips_by_identity() {
        let items = vec![
            DatasetItem::new("x/cat.png"),
            DatasetItem::new("x/dog.png"),
            DatasetItem::new("y/cow.png"),
        ];
        let mut existing = RecordMap::new();
        // Same stem, different extension still counts as labeled
        existing.insert("cat".into(), LabelRecord::new("cat.jpg", 1, "cat"));

        let left = filter_unlabeled(items, &existing);
        let names: Vec<&str> = left.iter().map(|i| i.display_name.as_str()).collect();
        assert_eq!(names, vec!["dog.png", "cow.png"]);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.PnG"), &["png"]));
        assert!(!has_extension(Path::new("a"), &["png"]));
    }
}
