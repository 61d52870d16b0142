//! Arrow table construction for biomarker records and query results.
//!
//! The canonical biomarker table uses a fixed, hand-built schema so that
//! per-participant batches always concatenate cleanly. Ad-hoc query
//! results carry no fixed shape, so their schema is traced from the
//! result samples instead.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};
use chrono::NaiveDateTime;
use serde_arrow::schema::{SchemaLike, TracingOptions};
use serde_json::Value;

use crate::error::Result;
use crate::models::biomarker::Biomarker;

/// The fixed schema of the biomarker table: one column per record field.
#[must_use]
pub fn biomarker_schema() -> SchemaRef {
    let timestamp = DataType::Timestamp(TimeUnit::Millisecond, None);
    Arc::new(Schema::new(vec![
        Field::new("participant", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
        Field::new("time", timestamp.clone(), true),
        Field::new("description", DataType::Utf8, true),
        Field::new("arm", DataType::Utf8, true),
        Field::new("targeted_date", timestamp.clone(), true),
        Field::new("enrolled_date", timestamp, true),
        Field::new("baseline_targeted_days", DataType::Float64, true),
        Field::new("baseline_enrolled_days", DataType::Float64, true),
    ]))
}

/// Build the biomarker table from a slice of records, one row each.
pub fn records_to_batch(rows: &[&Biomarker]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.participant.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.value).collect::<Vec<_>>(),
        )),
        timestamp_column(rows, |r| r.time),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.description.clone()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.arm.clone()).collect::<Vec<_>>(),
        )),
        timestamp_column(rows, |r| r.targeted_date),
        timestamp_column(rows, |r| r.enrolled_date),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.baseline_targeted_days).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.baseline_enrolled_days).collect::<Vec<_>>(),
        )),
    ];

    Ok(RecordBatch::try_new(biomarker_schema(), columns)?)
}

fn timestamp_column(
    rows: &[&Biomarker],
    field: impl Fn(&Biomarker) -> Option<NaiveDateTime>,
) -> ArrayRef {
    Arc::new(TimestampMillisecondArray::from(
        rows.iter()
            .map(|r| field(r).map(|t| t.and_utc().timestamp_millis()))
            .collect::<Vec<_>>(),
    ))
}

/// Wrap raw query results into a record batch.
///
/// Record-shaped results become rows with one column per field; scalar
/// results become a single `value` column. The schema is traced from the
/// results themselves, so mixed shapes beyond that first level fail.
pub fn values_to_batch(values: &[Value]) -> Result<RecordBatch> {
    if values.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    let rows: Vec<Value> = if values.iter().all(Value::is_object) {
        values.to_vec()
    } else {
        values
            .iter()
            .map(|v| {
                let mut row = serde_json::Map::new();
                row.insert("value".to_string(), v.clone());
                Value::Object(row)
            })
            .collect()
    };

    let options = TracingOptions::default()
        .allow_null_fields(true)
        .coerce_numbers(true);
    let fields = Vec::<FieldRef>::from_samples(&rows, options)?;

    Ok(serde_arrow::to_record_batch(&fields, &rows)?)
}
