//! CSV label files.

use std::io::{Read, Write};

use serde::Deserialize;

use super::error::{StoreError, checked_label};
use crate::model::LabelRecord;

#[derive(Debug, Deserialize)]
struct Row {
    image_name: String,
    label: i64,
    class: String,
}

pub(super) fn read_records<R: Read>(reader: R) -> Result<Vec<LabelRecord>, StoreError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for row in csv.deserialize::<Row>() {
        let row = row?;
        let label = checked_label(&row.image_name, row.label)?;
        records.push(LabelRecord::new(row.image_name, label, row.class));
    }
    Ok(records)
}

pub(super) fn write_records<'a, W, I>(writer: W, records: I) -> Result<(), StoreError>
where
    W: Write,
    I: IntoIterator<Item = &'a LabelRecord>,
{
    let mut csv = csv::Writer::from_writer(writer);
    // Header is written even for an empty set
    csv.write_record(["image_name", "label", "class"])?;
    for record in records {
        let label = record.label.to_string();
        csv.write_record([
            record.image_name.as_str(),
            label.as_str(),
            record.class_name.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}
