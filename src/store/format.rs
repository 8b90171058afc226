//! Label file formats.

use std::io::{Read, Write};
use std::path::Path;

use super::error::StoreError;
use super::{structured, tabular};
use crate::model::LabelRecord;

/// On-disk representation of the label store, chosen once from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// CSV with header `image_name,label,class`; measurements are not stored
    Tabular,
    /// JSON object keyed by image file name, including measurements
    Structured,
}

impl LabelFormat {
    /// Pick the format for a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(LabelFormat::Tabular),
            "json" => Some(LabelFormat::Structured),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            LabelFormat::Tabular => "csv",
            LabelFormat::Structured => "json",
        }
    }

    /// Whether records keep their measurements in this format.
    pub fn stores_measurements(self) -> bool {
        matches!(self, LabelFormat::Structured)
    }

    pub fn read<R: Read>(self, reader: R) -> Result<Vec<LabelRecord>, StoreError> {
        match self {
            LabelFormat::Tabular => tabular::read_records(reader),
            LabelFormat::Structured => structured::read_records(reader),
        }
    }

    pub fn write<'a, W, I>(self, writer: W, records: I) -> Result<(), StoreError>
    where
        W: Write,
        I: IntoIterator<Item = &'a LabelRecord>,
    {
        match self {
            LabelFormat::Tabular => tabular::write_records(writer, records),
            LabelFormat::Structured => structured::write_records(writer, records),
        }
    }
}
