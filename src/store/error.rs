//! Error types for label store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or persisting labels.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Label outside the digit range
    #[error("Invalid label {label} for image '{image}': labels must be 0-9")]
    InvalidLabel {
        /// Image the record belongs to
        image: String,
        /// The offending value
        label: i64,
    },

    /// Measurement endpoints that do not parse
    #[error("Invalid coordinates '{coords}' for image '{image}'")]
    InvalidCoordinates { image: String, coords: String },

    /// Existing label file could not be read in its declared format
    #[error("Failed to load labels from {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<StoreError>,
    },

    /// Output path has an extension no format handles
    #[error("Unsupported label file format: {path:?} (supported: csv, json)")]
    UnsupportedFormat { path: PathBuf },
}

impl StoreError {
    pub fn invalid_label(image: impl Into<String>, label: i64) -> Self {
        Self::InvalidLabel {
            image: image.into(),
            label,
        }
    }

    pub fn invalid_coordinates(image: impl Into<String>, coords: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            image: image.into(),
            coords: coords.into(),
        }
    }

    /// Whether the error is about file content rather than file access.
    pub fn is_data_error(&self) -> bool {
        match self {
            StoreError::Io(_) | StoreError::UnsupportedFormat { .. } => false,
            StoreError::Load { source, .. } => source.is_data_error(),
            _ => true,
        }
    }
}

/// Validate a raw label value read from disk.
pub(crate) fn checked_label(image: &str, raw: i64) -> Result<u8, StoreError> {
    match u8::try_from(raw) {
        Ok(label) if label <= crate::model::MAX_LABEL => Ok(label),
        _ => Err(StoreError::invalid_label(image, raw)),
    }
}
