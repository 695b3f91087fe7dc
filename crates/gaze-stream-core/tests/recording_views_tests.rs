//! Integration tests for typed recording views: schema conformance, stream
//! lifecycle with derived attributes, the nominal resampling grid, and
//! event tables.

use std::sync::Arc;

use arrow::array::{
    BooleanArray, Float64Array, Int32Array, Int64Array, RecordBatch, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};

use gaze_stream_core::events::{EventKind, EventTable};
use gaze_stream_core::stream::{CropWindow, Stream, StreamError, StreamKind, nominal_timestamps};
use gaze_stream_core::table::TIMESTAMP_COLUMN;

/// A gaze export the way a CSV reader would hand it over: integer
/// timestamps and ids, float samples, boolean worn flag.
fn gaze_batch(ts: &[i64]) -> RecordBatch {
    let n = ts.len();
    let schema = Schema::new(vec![
        Field::new(TIMESTAMP_COLUMN, DataType::Int64, false),
        Field::new("gaze x [px]", DataType::Float64, false),
        Field::new("gaze y [px]", DataType::Float64, false),
        Field::new("worn", DataType::Boolean, false),
        Field::new("fixation id", DataType::Int32, true),
        Field::new("blink id", DataType::Int32, true),
        Field::new("azimuth [deg]", DataType::Float64, false),
        Field::new("elevation [deg]", DataType::Float64, false),
    ]);

    let x: Vec<f64> = (0..n).map(|i| 600.0 + i as f64).collect();
    let y: Vec<f64> = (0..n).map(|i| 400.0 - i as f64).collect();
    let worn = vec![true; n];
    let fixation: Vec<Option<i32>> = (0..n).map(|i| (i > 0).then_some(1)).collect();
    let blink: Vec<Option<i32>> = vec![None; n];
    let azimuth: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
    let elevation: Vec<f64> = (0..n).map(|i| i as f64 * -0.1).collect();

    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(ts.to_vec())),
            Arc::new(Float64Array::from(x)),
            Arc::new(Float64Array::from(y)),
            Arc::new(BooleanArray::from(worn)),
            Arc::new(Int32Array::from(fixation)),
            Arc::new(Int32Array::from(blink)),
            Arc::new(Float64Array::from(azimuth)),
            Arc::new(Float64Array::from(elevation)),
        ],
    )
    .expect("valid gaze batch")
}

#[test]
fn gaze_stream_conforms_and_derives_attributes() {
    // 4 samples over 15 ms
    let ts = [0, 5_000_000, 10_000_000, 15_000_000];
    let stream = Stream::try_new(StreamKind::Gaze, gaze_batch(&ts)).expect("valid stream");

    // conformance normalized the integer key to a nanosecond timestamp
    let table = stream.table();
    assert_eq!(
        table.schema().field(table.time_index()).data_type(),
        &DataType::Timestamp(TimeUnit::Nanosecond, None)
    );

    assert_eq!(stream.first_ts(), 0);
    assert_eq!(stream.last_ts(), 15_000_000);
    assert_eq!(stream.duration(), 0.015);
    assert_eq!(stream.sampling_freq_effective(), 4.0 / 0.015);
    assert_eq!(stream.sampling_freq_nominal(), Some(200.0));
    assert_eq!(stream.times(), &[0.0, 0.005, 0.010, 0.015]);
}

#[test]
fn gaze_auto_grid_starts_at_first_ts_with_fixed_step() {
    // irregular sampling over 16 ms; nominal 200 Hz -> 5 ms step
    let ts = [0, 4_900_000, 10_100_000, 16_000_000];
    let stream = Stream::try_new(StreamKind::Gaze, gaze_batch(&ts)).expect("valid stream");

    let out = stream.resample(None).expect("resample succeeds");
    assert_eq!(out.timestamps(), &[0, 5_000_000, 10_000_000, 15_000_000]);

    // grid invariants directly
    let grid = nominal_timestamps(stream.first_ts(), stream.last_ts(), 200.0);
    assert_eq!(grid.first().copied(), Some(stream.first_ts()));
    assert!(grid.windows(2).all(|w| w[1] - w[0] == 5_000_000));
    assert!(*grid.last().expect("non-empty grid") < stream.last_ts());
}

#[test]
fn in_place_pipeline_keeps_attributes_consistent() {
    let ts = [0, 5_000_000, 10_000_000, 15_000_000, 20_000_000];
    let mut stream = Stream::try_new(StreamKind::Gaze, gaze_batch(&ts)).expect("valid stream");

    stream
        .crop_in_place(CropWindow::timestamp(Some(5_000_000), Some(15_000_000)))
        .expect("crop succeeds");
    assert_eq!(stream.first_ts(), 5_000_000);
    assert_eq!(stream.last_ts(), 15_000_000);
    assert_eq!(stream.duration(), 0.010);
    assert_eq!(stream.table().num_rows(), 3);

    stream
        .resample_in_place(Some(&[5_000_000, 7_500_000, 10_000_000, 15_000_000]))
        .expect("resample succeeds");
    assert_eq!(stream.table().num_rows(), 4);
    assert_eq!(stream.first_ts(), 5_000_000);
    assert_eq!(stream.last_ts(), 15_000_000);
    assert_eq!(stream.times(), &[0.0, 0.0025, 0.005, 0.010]);
}

#[test]
fn custom_streams_have_no_nominal_grid() {
    let schema = Schema::new(vec![
        Field::new(TIMESTAMP_COLUMN, DataType::Int64, false),
        Field::new("reading", DataType::Float64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(vec![0, 10, 20])),
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
        ],
    )
    .expect("valid batch");

    let stream = Stream::custom(batch).expect("valid stream");
    assert_eq!(stream.sampling_freq_nominal(), None);

    let err = stream.resample(None).unwrap_err();
    assert!(matches!(err, StreamError::MissingNominalRate));

    // explicit targets still work
    let out = stream.resample(Some(&[0, 5, 10])).expect("resample succeeds");
    assert_eq!(out.timestamps(), &[0, 5, 10]);
}

#[test]
fn gaze_stream_keeps_undeclared_export_columns() {
    let ts = [0, 5_000_000];
    let base = gaze_batch(&ts);

    // splice in a bookkeeping column the schema does not declare
    let mut fields: Vec<Field> = base
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields.push(Field::new("section id", DataType::Utf8, false));
    let mut columns = base.columns().to_vec();
    columns.push(Arc::new(StringArray::from(vec!["s-1", "s-1"])));
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .expect("valid batch");

    let stream = Stream::try_new(StreamKind::Gaze, batch).expect("valid stream");
    assert!(stream.table().column_by_name("section id").is_some());
}

#[test]
fn blink_events_conform_from_integer_export() {
    let schema = Schema::new(vec![
        Field::new("blink id", DataType::Int64, false),
        Field::new("start timestamp [ns]", DataType::Int64, false),
        Field::new("end timestamp [ns]", DataType::Int64, false),
        Field::new("duration [ms]", DataType::Int64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(Int64Array::from(vec![1_000, 9_000])),
            Arc::new(Int64Array::from(vec![3_000, 12_000])),
            Arc::new(Int64Array::from(vec![2, 3])),
        ],
    )
    .expect("valid batch");

    let events = EventTable::try_new(EventKind::Blinks, batch).expect("valid events");
    assert_eq!(events.len(), 2);
    assert_eq!(events.timestamps(), &[1_000, 9_000]);

    // blink id was narrowed to the declared Int32
    let ids = events
        .batch()
        .column_by_name("blink id")
        .expect("id column")
        .as_any()
        .downcast_ref::<Int32Array>()
        .expect("int32 ids");
    assert_eq!(ids.value(0), 1);
}

#[test]
fn saccade_events_validate_ordering() {
    let schema = Schema::new(vec![
        Field::new("saccade id", DataType::Int32, true),
        Field::new("start timestamp [ns]", DataType::Int64, false),
        Field::new("end timestamp [ns]", DataType::Int64, false),
        Field::new("duration [ms]", DataType::Int64, false),
        Field::new("amplitude [px]", DataType::Float64, false),
        Field::new("amplitude [deg]", DataType::Float64, false),
        Field::new("mean velocity [px/s]", DataType::Float64, false),
        Field::new("peak velocity [px/s]", DataType::Float64, false),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int32Array::from(vec![Some(1), Some(2)])),
            Arc::new(Int64Array::from(vec![9_000, 1_000])),
            Arc::new(Int64Array::from(vec![9_500, 1_500])),
            Arc::new(Int64Array::from(vec![1, 1])),
            Arc::new(Float64Array::from(vec![12.0, 8.0])),
            Arc::new(Float64Array::from(vec![1.2, 0.8])),
            Arc::new(Float64Array::from(vec![300.0, 200.0])),
            Arc::new(Float64Array::from(vec![500.0, 350.0])),
        ],
    )
    .expect("valid batch");

    let err = EventTable::try_new(EventKind::Saccades, batch).unwrap_err();
    assert!(matches!(
        err,
        gaze_stream_core::events::EventError::UnorderedEvents { .. }
    ));
}
