//! Resumable label store.
//!
//! Labels from a previous session are loaded once and kept read-only; labels
//! assigned in this session are merged on top and the union is written back
//! after every assignment. Records are keyed by image identity (file name
//! without extension), so relabeling an image replaces its earlier record.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut store = LabelStore::open("labels.json")?;
//! let todo = dataset::filter_unlabeled(items, store.existing());
//! store.record(LabelRecord::new("cat_01.jpg", 2, "cat"))?;
//! ```

mod error;
mod format;
mod structured;
mod tabular;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub use error::StoreError;
pub use format::LabelFormat;

use crate::model::LabelRecord;

/// Records keyed by image identity.
pub type RecordMap = BTreeMap<String, LabelRecord>;

/// Label records of the previous and the current session, bound to one file.
#[derive(Debug)]
pub struct LabelStore {
    path: PathBuf,
    format: LabelFormat,
    existing: RecordMap,
    session: RecordMap,
}

impl LabelStore {
    /// Bind a store to `path` and load whatever labels it already holds.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let format = LabelFormat::from_path(&path)
            .ok_or_else(|| StoreError::UnsupportedFormat { path: path.clone() })?;
        let existing = load(&path)?;
        if !existing.is_empty() {
            log::info!(
                "Resuming: {} images already labeled in {:?}",
                existing.len(),
                path
            );
        }
        Ok(Self {
            path,
            format,
            existing,
            session: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records loaded from disk when the store was opened.
    pub fn existing(&self) -> &RecordMap {
        &self.existing
    }

    /// Records assigned during this session.
    pub fn session(&self) -> &RecordMap {
        &self.session
    }

    /// Number of distinct images labeled during this session.
    pub fn session_len(&self) -> usize {
        self.session.len()
    }

    /// Whether an image identity has a label from either session.
    pub fn contains(&self, identity: &str) -> bool {
        self.session.contains_key(identity) || self.existing.contains_key(identity)
    }

    /// Union of both sessions; records of this session take precedence.
    pub fn merged(&self) -> RecordMap {
        let mut merged = self.existing.clone();
        merged.extend(
            self.session
                .iter()
                .map(|(id, record)| (id.clone(), record.clone())),
        );
        merged
    }

    /// Store a label and write the full set through to disk.
    pub fn record(&mut self, record: LabelRecord) -> Result<(), StoreError> {
        let identity = record.identity();
        if let Some(previous) = self.session.insert(identity.clone(), record) {
            log::debug!("Relabeled '{}' (was {})", identity, previous.label);
        }
        self.flush()
    }

    /// Write the merged records to the bound file.
    pub fn flush(&self) -> Result<(), StoreError> {
        persist(&self.path, self.format, self.merged().values())
    }
}

/// Load label records from `path`.
///
/// A missing file or a file with an unsupported extension yields an empty
/// map. A file that exists but does not parse in its format is an error.
pub fn load(path: &Path) -> Result<RecordMap, StoreError> {
    let Some(format) = LabelFormat::from_path(path) else {
        log::debug!("No label format for {:?}, starting empty", path);
        return Ok(BTreeMap::new());
    };
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }

    let file = File::open(path)?;
    let records = format
        .read(BufReader::new(file))
        .map_err(|source| StoreError::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

    let mut map = BTreeMap::new();
    for record in records {
        // Later rows win, like a relabel
        map.insert(record.identity(), record);
    }
    log::debug!("Loaded {} label records from {:?}", map.len(), path);
    Ok(map)
}

/// Write records to `path` in `format`.
///
/// Content goes to a sibling temporary file first and is renamed over the
/// target, so an interrupted write leaves the previous file intact.
pub fn persist<'a, I>(path: &Path, format: LabelFormat, records: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = &'a LabelRecord>,
{
    let tmp = temp_sibling(path);
    let result = write_file(&tmp, format, records).and_then(|()| {
        std::fs::rename(&tmp, path)?;
        Ok(())
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result?;
    log::trace!("Persisted labels to {:?}", path);
    Ok(())
}

fn write_file<'a, I>(path: &Path, format: LabelFormat, records: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = &'a LabelRecord>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    format.write(&mut writer, records)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "labels".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
