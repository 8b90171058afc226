//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, LogLevel, MeasureConfig, SessionConfig, TransferMode};
use crate::constants::{DEFAULT_UNIT, DEFAULT_WINDOW_SIZE, DEFAULT_WORKERS};
use crate::model::ClassNames;

#[derive(Parser, Debug)]
#[command(
    name = "quicklabel",
    version,
    about = "Label images with the digit keys, optionally measuring lines on them"
)]
pub struct Cli {
    #[arg(
        long,
        short = 'i',
        required_unless_present = "show_usage",
        help = "Directory containing images"
    )]
    pub images_path: Option<PathBuf>,
    #[arg(
        long,
        short = 'o',
        required_unless_present = "show_usage",
        help = "Output file where labels are stored (supported formats are [csv, json])"
    )]
    pub output_name: Option<PathBuf>,
    #[arg(
        long,
        short = 'l',
        help = "YAML file mapping digit labels to human readable class names"
    )]
    pub labels_path: Option<PathBuf>,
    #[arg(long, short = 'd', help = "Destination folder for labeled images")]
    pub dst_folder: Option<PathBuf>,
    #[arg(
        long,
        short = 't',
        value_enum,
        ignore_case = true,
        default_value_t = TransferMode::None,
        help = "Copy [cp] or move [mv] labeled images into the destination folder after labeling"
    )]
    pub data_transfer: TransferMode,
    #[arg(
        long,
        short = 'w',
        default_value_t = DEFAULT_WINDOW_SIZE,
        help = "Display size as a percentage of the original image size"
    )]
    pub window_size: u32,
    #[arg(long, short = 'x', help = "Hide class names while labeling")]
    pub hide_labels: bool,
    #[arg(long, short = 'n', help = "Stop at the end of the dataset instead of looping over it")]
    pub no_loop: bool,
    #[arg(long, short = 'm', help = "Measure lines drawn with the mouse")]
    pub measure: bool,
    #[arg(
        long,
        help = "Save annotated images under the destination folder (requires --dst-folder)"
    )]
    pub save_overlays: bool,
    #[arg(
        long,
        value_name = "UNITS_PER_PX",
        default_value_t = 1.0,
        help = "Calibration applied to measured lengths"
    )]
    pub scale: f64,
    #[arg(long, default_value = DEFAULT_UNIT, help = "Unit printed after measured lengths")]
    pub unit: String,
    #[arg(long, help = "Drop lines whose start and end coincide")]
    pub discard_degenerate: bool,
    #[arg(long, default_value_t = DEFAULT_WORKERS, help = "Threads used for the transfer")]
    pub workers: usize,
    #[arg(long, help = "TrueType font used for text overlays")]
    pub font: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
    #[arg(long, short = 'u', help = "Show detailed usage with examples and exit")]
    pub show_usage: bool,
}

impl Cli {
    /// Build the session configuration, loading the class-name file if given.
    ///
    /// The result is not yet normalized; see [`SessionConfig::normalize`].
    pub fn into_config(self) -> Result<SessionConfig, ConfigError> {
        let classes = match &self.labels_path {
            Some(path) => ClassNames::load(path)?,
            None => ClassNames::default(),
        };
        let defaults = SessionConfig::default();

        Ok(SessionConfig {
            images_path: self.images_path.unwrap_or(defaults.images_path),
            output_path: self.output_name.unwrap_or(defaults.output_path),
            classes,
            destination: self.dst_folder,
            transfer: self.data_transfer,
            window_size: self.window_size,
            show_class_names: !self.hide_labels,
            looping: !self.no_loop,
            save_overlays: self.save_overlays,
            workers: self.workers,
            measure: MeasureConfig {
                enabled: self.measure,
                calibration: self.scale,
                unit: self.unit,
                keep_degenerate: !self.discard_degenerate,
                font_path: self.font,
            },
        })
    }
}

pub const USAGE: &str = r#"
Label images of up to 10 classes using the digit keys 0-9 (the NumPad works
best, make sure NumLock is on). With more than 10 classes, use one digit for
"others" and relabel those afterwards.

You need to provide:
- a directory containing images to label (searched recursively).
- an output file to store labels in, either [csv] or [json]. An existing file
  is resumed: images it already labels are skipped.

Navigation:
- RIGHT/UP shows the next image, LEFT/DOWN the previous one.
- To fix a label, go back to the image and press the new digit.
- ESC or Q ends the session. Labels are saved after every keystroke.

Options:
- --data-transfer cp|mv copies or moves labeled images into
  <dst-folder>/<class>/ once labeling is over. Requires --dst-folder.
- --window-size is a percentage of the original image size, e.g. 60 shows
  images at 60% and 200 at twice their size.
- --measure lets you drag lines over an image; each line is labeled with its
  length in original image pixels times --scale, followed by --unit.
  Z/BACKSPACE removes the last line. JSON output stores the lines with each
  label, and --save-overlays writes the annotated images to the destination.
- --labels-path gives human readable class names, shown above each image and
  used as folder names when transferring. The file looks like:

    classes:
        0: "dog"
        1: "cat"
        2: "horse"
        3: "mouse"
        4: "rabbit"
        5: "bird"
        6: "car"
        7: "human"
        8: "elephant"
        9: "house"

  Keep class names short; long names do not fit above small images.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["quicklabel", "-i", "imgs", "-o", "labels.json"]).unwrap();
        assert_eq!(cli.data_transfer, TransferMode::None);
        assert_eq!(cli.window_size, 60);
        assert_eq!(cli.log_level, LogLevel::Info);

        let config = cli.into_config().unwrap();
        assert_eq!(config.images_path, PathBuf::from("imgs"));
        assert_eq!(config.output_path, PathBuf::from("labels.json"));
        assert!(config.looping);
        assert!(config.show_class_names);
        assert!(!config.measure.enabled);
        assert_eq!(config.measure.unit, "px");
        assert!(config.measure.keep_degenerate);
    }

    #[test]
    fn test_paths_required_without_usage() {
        assert!(Cli::try_parse_from(["quicklabel", "-i", "imgs"]).is_err());
        assert!(Cli::try_parse_from(["quicklabel", "-o", "labels.csv"]).is_err());

        let cli = Cli::try_parse_from(["quicklabel", "-u"]).unwrap();
        assert!(cli.show_usage);
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "quicklabel",
            "-i",
            "imgs",
            "-o",
            "out.csv",
            "-d",
            "dst",
            "-t",
            "MV",
            "-w",
            "150",
            "-x",
            "-n",
            "-m",
            "--save-overlays",
            "--scale",
            "0.25",
            "--unit",
            "mm",
            "--discard-degenerate",
            "--workers",
            "4",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.destination, Some(PathBuf::from("dst")));
        assert_eq!(config.transfer, TransferMode::Move);
        assert_eq!(config.window_size, 150);
        assert!(!config.show_class_names);
        assert!(!config.looping);
        assert!(config.save_overlays);
        assert_eq!(config.workers, 4);
        assert!(config.measure.enabled);
        assert_eq!(config.measure.calibration, 0.25);
        assert_eq!(config.measure.unit, "mm");
        assert!(!config.measure.keep_degenerate);
    }

    #[test]
    fn test_rejects_unknown_transfer_mode() {
        assert!(Cli::try_parse_from(["quicklabel", "-i", "a", "-o", "b.csv", "-t", "rsync"]).is_err());
    }

    #[test]
    fn test_loads_class_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("labels.yml");
        std::fs::write(&path, "classes:\n  0: dog\n  1: cat\n").unwrap();

        let cli = Cli::try_parse_from([
            "quicklabel",
            "-i",
            "imgs",
            "-o",
            "out.csv",
            "-l",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.classes.name(0), "dog");
        assert_eq!(config.classes.name(1), "cat");
        assert_eq!(config.classes.name(2), "2");
    }

    #[test]
    fn test_bad_class_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("labels.yml");
        std::fs::write(&path, "classes:\n  11: owl\n").unwrap();

        let cli = Cli::try_parse_from([
            "quicklabel",
            "-i",
            "imgs",
            "-o",
            "out.csv",
            "-l",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(cli.into_config().is_err());
    }
}
