//! JSON label files.
//!
//! The file is one object keyed by image file name. Each entry carries the
//! label, the class name and, when lines were drawn, a `measurements` object
//! keyed by the line's index:
//!
//! ```json
//! {
//!   "cat_01.jpg": {
//!     "image_name": "cat_01.jpg",
//!     "label": 2,
//!     "class": "cat",
//!     "measurements": { "0": { "length": 200.0, "coords": "(10, 10) -> (110, 10)" } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::error::{StoreError, checked_label};
use crate::model::{LabelRecord, Measurement};

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    #[serde(default)]
    image_name: String,
    label: i64,
    class: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    measurements: BTreeMap<String, MeasurementEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeasurementEntry {
    length: f64,
    coords: String,
}

pub(super) fn read_records<R: Read>(reader: R) -> Result<Vec<LabelRecord>, StoreError> {
    let entries: BTreeMap<String, Entry> = serde_json::from_reader(reader)?;
    let mut records = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        // The entry's own name wins; older files may omit it
        let image_name = if entry.image_name.is_empty() {
            key
        } else {
            entry.image_name
        };
        let label = checked_label(&image_name, entry.label)?;

        let mut indexed = Vec::with_capacity(entry.measurements.len());
        for (index, m) in entry.measurements {
            let Some((start, end)) = Measurement::parse_coords(&m.coords) else {
                return Err(StoreError::invalid_coordinates(&image_name, m.coords));
            };
            let order = index.parse::<usize>().unwrap_or(usize::MAX);
            indexed.push((order, Measurement::new(start, end, m.length)));
        }
        indexed.sort_by_key(|(order, _)| *order);

        records.push(
            LabelRecord::new(image_name, label, entry.class)
                .with_measurements(indexed.into_iter().map(|(_, m)| m).collect()),
        );
    }
    Ok(records)
}

pub(super) fn write_records<'a, W, I>(writer: W, records: I) -> Result<(), StoreError>
where
    W: Write,
    I: IntoIterator<Item = &'a LabelRecord>,
{
    let entries: BTreeMap<&str, Entry> = records
        .into_iter()
        .map(|record| {
            let measurements = record
                .measurements
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    (
                        i.to_string(),
                        MeasurementEntry {
                            length: m.length,
                            coords: m.coords(),
                        },
                    )
                })
                .collect();
            (
                record.image_name.as_str(),
                Entry {
                    image_name: record.image_name.clone(),
                    label: i64::from(record.label),
                    class: record.class_name.clone(),
                    measurements,
                },
            )
        })
        .collect();
    serde_json::to_writer_pretty(writer, &entries)?;
    Ok(())
}
