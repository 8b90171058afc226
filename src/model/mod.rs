//! Data models for labeling sessions.

mod classes;
mod item;
mod record;

pub use classes::{ClassNames, MAX_LABEL};
pub use item::{DatasetItem, image_identity};
pub use record::{LabelRecord, Measurement, Point};
