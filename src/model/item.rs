//! Discovered dataset items.

use std::path::{Path, PathBuf};

/// One image discovered in the dataset. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetItem {
    /// Path to the source image
    pub path: PathBuf,
    /// File name including extension, shown to the operator and written to the label file
    pub display_name: String,
}

impl DatasetItem {
    /// Create an item from a source path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, display_name }
    }

    /// Key used by the label store for this item.
    pub fn identity(&self) -> String {
        image_identity(&self.display_name)
    }
}

/// Derive the label-store key of an image: its base name without extension.
///
/// Accepts bare file names as well as full paths, so records written with
/// `cat.png` and re-encoded `cat.jpg` map to the same key.
pub fn image_identity(name: impl AsRef<Path>) -> String {
    let path = name.as_ref();
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
