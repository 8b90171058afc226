//! Tests for JSON label files.

use crate::model::{LabelRecord, Measurement, Point};
use crate::store::{LabelFormat, StoreError};

use super::measured_record;

#[test]
fn test_round_trip_keeps_measurements() {
    let records = [
        LabelRecord::new("a.png", 0, "dog"),
        measured_record("b.jpg", 1, "cat"),
    ];
    let mut out = Vec::new();
    LabelFormat::Structured
        .write(&mut out, records.iter())
        .unwrap();

    let read = LabelFormat::Structured.read(out.as_slice()).unwrap();
    assert_eq!(read, records.to_vec());
}

#[test]
fn test_wire_layout() {
    let mut out = Vec::new();
    LabelFormat::Structured
        .write(&mut out, [measured_record("cat_01.jpg", 2, "cat")].iter())
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let entry = &value["cat_01.jpg"];
    assert_eq!(entry["image_name"], "cat_01.jpg");
    assert_eq!(entry["label"], 2);
    assert_eq!(entry["class"], "cat");
    assert_eq!(entry["measurements"]["0"]["length"], 200.0);
    assert_eq!(
        entry["measurements"]["0"]["coords"],
        "(10, 10) -> (110, 10)"
    );
}

#[test]
fn test_empty_measurements_are_omitted() {
    let mut out = Vec::new();
    LabelFormat::Structured
        .write(&mut out, [LabelRecord::new("a.png", 0, "dog")].iter())
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("measurements"));
}

#[test]
fn test_measurements_keep_numeric_order() {
    let lines: Vec<Measurement> = (0..12)
        .map(|i| Measurement::new(Point::new(i, 0), Point::new(i, 5), 5.0))
        .collect();
    let record = LabelRecord::new("many.png", 3, "3").with_measurements(lines.clone());
    let mut out = Vec::new();
    LabelFormat::Structured
        .write(&mut out, [record].iter())
        .unwrap();

    let read = LabelFormat::Structured.read(out.as_slice()).unwrap();
    assert_eq!(read[0].measurements, lines);
}

#[test]
fn test_bad_coords_are_rejected() {
    let input = r#"{"a.png": {"image_name": "a.png", "label": 1, "class": "x",
        "measurements": {"0": {"length": 1.0, "coords": "nonsense"}}}}"#;
    let err = LabelFormat::Structured.read(input.as_bytes()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidCoordinates { .. }));
}

#[test]
fn test_bad_label_and_bad_json_are_rejected() {
    let input = r#"{"a.png": {"image_name": "a.png", "label": 10, "class": "x"}}"#;
    assert!(matches!(
        LabelFormat::Structured.read(input.as_bytes()),
        Err(StoreError::InvalidLabel { label: 10, .. })
    ));
    assert!(matches!(
        LabelFormat::Structured.read("{not json".as_bytes()),
        Err(StoreError::Json(_))
    ));
}
