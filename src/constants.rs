//! Global constants for quicklabel

use std::time::Duration;

/// Default display size as a percentage of the source image size
pub const DEFAULT_WINDOW_SIZE: u32 = 60;

/// Default number of transfer worker threads
pub const DEFAULT_WORKERS: usize = 1;

/// Default unit suffix for measurement lengths
pub const DEFAULT_UNIT: &str = "px";

/// How long the completion message stays on screen
pub const COMPLETION_HOLD: Duration = Duration::from_secs(2);

/// Text shown once every item has a label
pub const COMPLETION_MESSAGE: &str =
    "THANK YOU! Labeling is complete, program will exit shortly...";

/// Size of the completion message frame
pub const COMPLETION_FRAME_SIZE: (u32, u32) = (900, 50);

/// Top-left position of the labeling window on screen
pub const WINDOW_POSITION: (i32, i32) = (250, 96);

/// Opaque color behind translucent source pixels
pub const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Prefix of exported overlay file names
pub const OVERLAY_PREFIX: &str = "annotated_";

/// Image extensions picked up by dataset discovery (lowercase, without dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "bmp", "dib", "jpg", "jpeg", "jpe", "jp2", "png", "webp", "pbm", "pgm", "ppm", "pxm", "pnm",
    "pfm", "sr", "ras", "tiff", "tif", "exr", "hdr", "pic",
];

/// Banner layout
pub mod banner {
    /// Height of one banner text row in pixels
    pub const ROW_HEIGHT: u32 = 26;
    /// Font size of banner text
    pub const FONT_SIZE: f32 = 16.0;
    /// Left padding of banner text
    pub const PADDING_X: i32 = 7;
    /// Banner background
    pub const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
    /// Color of the navigation help line
    pub const HELP_COLOR: [u8; 4] = [0, 140, 0, 255];
    /// Color of the class legend
    pub const LEGEND_COLOR: [u8; 4] = [0, 0, 180, 255];
}

/// Measurement overlay styling
pub mod overlay {
    /// Line color
    pub const LINE_COLOR: [u8; 4] = [255, 0, 0, 255];
    /// Line stroke width in display pixels
    pub const LINE_WIDTH: f32 = 2.0;
    /// Length label font size
    pub const FONT_SIZE: f32 = 14.0;
    /// Length label color
    pub const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
    /// Opaque box behind each length label
    pub const TEXT_BACKGROUND: [u8; 4] = [0, 0, 0, 255];
    /// Padding between label text and its box
    pub const TEXT_PADDING: f32 = 3.0;
    /// Gap between the line and the label box
    pub const TEXT_OFFSET: f32 = 4.0;
}
