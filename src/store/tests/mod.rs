//! Unit tests for the label store and its file formats.

mod store_tests;
mod structured_tests;

use crate::model::{LabelRecord, Measurement, Point};

/// A record with one horizontal measurement.
fn measured_record(name: &str, label: u8, class: &str) -> LabelRecord {
    LabelRecord::new(name, label, class).with_measurements(vec![Measurement::new(
        Point::new(10, 10),
        Point::new(110, 10),
        200.0,
    )])
}
