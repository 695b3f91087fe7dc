//! Shared batch builders for unit tests.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, RecordBatch,
    StringArray, TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};

use crate::table::TIMESTAMP_COLUMN;

fn ts_field(nullable: bool) -> Field {
    Field::new(
        TIMESTAMP_COLUMN,
        DataType::Timestamp(TimeUnit::Nanosecond, None),
        nullable,
    )
}

/// Batch with the conventional timestamp key and one Float64 `value`
/// column.
pub(crate) fn float_batch(ts: &[i64], values: &[f64]) -> RecordBatch {
    assert_eq!(ts.len(), values.len());
    let schema = Schema::new(vec![ts_field(false), Field::new("value", DataType::Float64, false)]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(TimestampNanosecondArray::from(ts.to_vec())),
            Arc::new(Float64Array::from(values.to_vec())),
        ],
    )
    .expect("valid test batch")
}

/// Single-column batch with an Int64 timestamp key under `name`.
pub(crate) fn named_ts_batch(name: &str, ts: &[i64]) -> RecordBatch {
    let schema = Schema::new(vec![Field::new(name, DataType::Int64, false)]);
    RecordBatch::try_new(Arc::new(schema), vec![Arc::new(Int64Array::from(ts.to_vec()))])
        .expect("valid test batch")
}

/// Batch whose timestamp key column is nullable and may hold nulls.
pub(crate) fn ts_batch_with_nulls(ts: &[Option<i64>]) -> RecordBatch {
    let schema = Schema::new(vec![ts_field(true)]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(TimestampNanosecondArray::from(ts.to_vec()))],
    )
    .expect("valid test batch")
}

/// Batch covering every column family the resampler dispatches on:
/// Float64, Float32, Bool, nullable Int32 id, Utf8 label.
pub(crate) fn mixed_batch(ts: &[i64]) -> RecordBatch {
    let n = ts.len();
    let schema = Schema::new(vec![
        ts_field(false),
        Field::new("x [px]", DataType::Float64, false),
        Field::new("y [px]", DataType::Float32, false),
        Field::new("worn", DataType::Boolean, false),
        Field::new("fixation id", DataType::Int32, true),
        Field::new("label", DataType::Utf8, false),
    ]);

    let x: Vec<f64> = (0..n).map(|i| i as f64 * 10.0).collect();
    let y: Vec<f32> = (0..n).map(|i| i as f32 * 0.5).collect();
    let worn: Vec<bool> = (0..n).map(|i| i % 2 == 0).collect();
    let ids: Vec<Option<i32>> = (0..n)
        .map(|i| if i % 3 == 0 { None } else { Some(i as i32) })
        .collect();
    let labels: Vec<String> = (0..n).map(|i| format!("row-{i}")).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampNanosecondArray::from(ts.to_vec())),
        Arc::new(Float64Array::from(x)),
        Arc::new(Float32Array::from(y)),
        Arc::new(BooleanArray::from(worn)),
        Arc::new(Int32Array::from(ids)),
        Arc::new(StringArray::from(
            labels.iter().map(String::as_str).collect::<Vec<_>>(),
        )),
    ];

    RecordBatch::try_new(Arc::new(schema), columns).expect("valid test batch")
}
