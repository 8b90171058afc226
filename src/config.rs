//! Session configuration.
//!
//! [`SessionConfig`] is the fully resolved set of options for one labeling
//! session. The CLI builds it, [`SessionConfig::normalize`] applies the
//! fallbacks for out-of-range values, and the session controller reads it.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;

use crate::constants::{DEFAULT_UNIT, DEFAULT_WINDOW_SIZE, DEFAULT_WORKERS};
use crate::model::ClassNames;
use crate::store::LabelFormat;

/// Errors raised while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Class-name file has the wrong shape
    #[error("Invalid class file: {message}")]
    InvalidClassFile { message: String },

    /// Class-name key that is not a digit label
    #[error("Invalid class key '{key}': keys must be labels 0-9")]
    InvalidClassKey { key: String },

    #[error("Invalid class file {path:?}: {source}")]
    ClassFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    /// An option that requires a destination folder was given without one
    #[error("Invalid usage: `{option}` requires `--dst-folder`")]
    MissingDestination { option: &'static str },

    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid_class_file(message: impl Into<String>) -> Self {
        Self::InvalidClassFile {
            message: message.into(),
        }
    }

    pub fn invalid_class_key(key: impl Into<String>) -> Self {
        Self::InvalidClassKey { key: key.into() }
    }

    /// Attach the file the error came from.
    pub fn with_path(self, path: &Path) -> Self {
        Self::ClassFile {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// What to do with labeled source files once the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransferMode {
    /// Copy into the destination
    #[value(name = "cp")]
    Copy,
    /// Move into the destination
    #[value(name = "mv")]
    Move,
    /// Leave files where they are
    #[default]
    #[value(name = "none")]
    None,
}

impl TransferMode {
    pub fn is_enabled(self) -> bool {
        self != TransferMode::None
    }

    pub fn verb(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
            TransferMode::None => "none",
        }
    }
}

/// Options for the line-measurement overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureConfig {
    /// Whether pointer drags create measurements
    pub enabled: bool,
    /// Units per source-image pixel
    pub calibration: f64,
    /// Unit suffix printed after each length
    pub unit: String,
    /// Commit lines whose press and release points coincide
    pub keep_degenerate: bool,
    /// TrueType font for length labels; system fonts are tried when unset
    pub font_path: Option<PathBuf>,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            calibration: 1.0,
            unit: DEFAULT_UNIT.to_string(),
            keep_degenerate: true,
            font_path: None,
        }
    }
}

/// Resolved options for one labeling session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory scanned recursively for images
    pub images_path: PathBuf,
    /// Label file, `.csv` or `.json`
    pub output_path: PathBuf,
    /// Names shown for each digit label
    pub classes: ClassNames,
    /// Destination for transferred files and exported overlays
    pub destination: Option<PathBuf>,
    pub transfer: TransferMode,
    /// Display size as a percentage of the source size
    pub window_size: u32,
    /// Show the class legend above the image
    pub show_class_names: bool,
    /// Wrap past the last item instead of ending the session
    pub looping: bool,
    /// Write annotated frames next to the transferred files
    pub save_overlays: bool,
    /// Transfer worker threads
    pub workers: usize,
    pub measure: MeasureConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            images_path: PathBuf::from("."),
            output_path: PathBuf::from("labels.csv"),
            classes: ClassNames::default(),
            destination: None,
            transfer: TransferMode::None,
            window_size: DEFAULT_WINDOW_SIZE,
            show_class_names: true,
            looping: true,
            save_overlays: false,
            workers: DEFAULT_WORKERS,
            measure: MeasureConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Apply fallbacks and reject inconsistent option combinations.
    ///
    /// An unsupported output extension is replaced by `.csv`, a window size
    /// below 1 percent by the default and a calibration that is not a
    /// positive finite number by 1.0, each with a warning.
    pub fn normalize(mut self) -> Result<Self, ConfigError> {
        if LabelFormat::from_path(&self.output_path).is_none() {
            let ext = self
                .output_path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            log::warn!(
                "Unsupported file format [{}]. Defaulting to [csv]. Supported formats are [csv, json].",
                ext
            );
            self.output_path.set_extension(LabelFormat::Tabular.extension());
        }

        if self.window_size < 1 {
            log::warn!(
                "Received improper window size [{}], setting to default: [{}] (%).",
                self.window_size,
                DEFAULT_WINDOW_SIZE
            );
            self.window_size = DEFAULT_WINDOW_SIZE;
        }

        let calibration = self.measure.calibration;
        if !calibration.is_finite() || calibration <= 0.0 {
            log::warn!(
                "Received improper scale [{}], setting to default: [1.0] (units per pixel).",
                calibration
            );
            self.measure.calibration = 1.0;
        }

        if self.workers == 0 {
            self.workers = DEFAULT_WORKERS;
        }

        if self.destination.is_none() {
            if self.transfer.is_enabled() {
                return Err(ConfigError::MissingDestination {
                    option: "--data-transfer",
                });
            }
            if self.save_overlays {
                return Err(ConfigError::MissingDestination {
                    option: "--save-overlays",
                });
            }
        }

        Ok(self)
    }

    /// Create the directory that will hold the label file.
    pub fn ensure_output_dir(&self) -> Result<(), ConfigError> {
        match self.output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(|source| ConfigError::OutputDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_falls_back_to_csv() {
        let config = SessionConfig {
            output_path: PathBuf::from("out/labels.txt"),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/labels.csv"));
    }

    #[test]
    fn test_json_extension_is_kept() {
        let config = SessionConfig {
            output_path: PathBuf::from("labels.JSON"),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(config.output_path, PathBuf::from("labels.JSON"));
    }

    #[test]
    fn test_zero_window_size_resets_to_default() {
        let config = SessionConfig {
            window_size: 0,
            workers: 0,
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn test_transfer_without_destination_is_rejected() {
        let err = SessionConfig {
            transfer: TransferMode::Move,
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingDestination {
                option: "--data-transfer"
            }
        ));

        let err = SessionConfig {
            save_overlays: true,
            ..Default::default()
        }
        .normalize()
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDestination { .. }));
    }

    #[test]
    fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            output_path: dir.path().join("nested/deeper/labels.csv"),
            ..Default::default()
        };
        config.ensure_output_dir().unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_improper_calibration_falls_back_to_one() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -2.0] {
            let mut config = SessionConfig::default();
            config.measure.calibration = bad;
            let config = config.normalize().unwrap();
            assert_eq!(config.measure.calibration, 1.0, "scale {bad}");
        }

        let mut config = SessionConfig::default();
        config.measure.calibration = 0.25;
        assert_eq!(config.normalize().unwrap().measure.calibration, 0.25);
    }

    #[test]
    fn test_normalized_calibration_lengths_reload() {
        use crate::measure::DisplayScale;
        use crate::model::{LabelRecord, Measurement, Point};
        use crate::store;

        let mut config = SessionConfig::default();
        config.measure.calibration = f64::NAN;
        let config = config.normalize().unwrap();

        let (start, end) = (Point::new(0, 0), Point::new(10, 0));
        let length = DisplayScale::default().length(start, end, config.measure.calibration);
        assert_eq!(length, 10.0);

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("labels.json");
        let record = LabelRecord::new("a.png", 1, "1")
            .with_measurements(vec![Measurement::new(start, end, length)]);
        store::persist(&path, store::LabelFormat::Structured, [&record]).unwrap();

        let loaded = store::load(&path).unwrap();
        assert_eq!(loaded["a"].measurements[0].length, 10.0);
    }
}
