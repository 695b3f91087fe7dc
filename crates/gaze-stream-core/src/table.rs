//! Validated wrapper around a timestamp-keyed Arrow batch.
//!
//! Every stream operation in this crate assumes the same invariants: the
//! batch has at least one row, a known timestamp column of a supported
//! type, and strictly increasing non-null nanosecond keys. Validating once
//! at construction lets `crop` and `interpolate` binary-search the keys
//! without re-checking them on every call.

use arrow::{
    array::{Array, ArrayRef, Int64Array, RecordBatch, TimestampNanosecondArray},
    datatypes::{DataType, SchemaRef, TimeUnit},
};
use snafu::prelude::*;

/// Default name of the timestamp key column in recording exports.
pub const TIMESTAMP_COLUMN: &str = "timestamp [ns]";

/// A non-empty Arrow batch keyed by strictly increasing i64 nanosecond
/// timestamps.
///
/// The decoded key vector is cached at construction; all range and
/// bracketing searches run against it.
#[derive(Debug, Clone)]
pub struct TimestampedTable {
    batch: RecordBatch,
    time_column: String,
    time_index: usize,
    timestamps: Vec<i64>,
}

impl TimestampedTable {
    /// Validate `batch` using the conventional [`TIMESTAMP_COLUMN`] key.
    pub fn try_new(batch: RecordBatch) -> Result<Self, TableError> {
        Self::try_new_with_time_column(batch, TIMESTAMP_COLUMN)
    }

    /// Validate `batch` with an explicitly named timestamp column.
    ///
    /// The column must be `Timestamp(Nanosecond, _)` or `Int64`, non-null,
    /// and strictly increasing. An empty batch is rejected outright since
    /// derived attributes cannot be computed from zero rows.
    pub fn try_new_with_time_column(
        batch: RecordBatch,
        time_column: &str,
    ) -> Result<Self, TableError> {
        ensure!(batch.num_rows() > 0, EmptyTableSnafu);

        let time_index =
            batch
                .schema()
                .index_of(time_column)
                .map_err(|_| TableError::MissingTimestampColumn {
                    column: time_column.to_string(),
                })?;

        let timestamps = decode_timestamps(batch.column(time_index), time_column)?;

        for (row, pair) in timestamps.windows(2).enumerate() {
            ensure!(
                pair[0] < pair[1],
                NonMonotonicTimestampSnafu {
                    column: time_column.to_string(),
                    // the offending row is the second of the pair
                    row: row + 1,
                }
            );
        }

        Ok(TimestampedTable {
            batch,
            time_column: time_column.to_string(),
            time_index,
            timestamps,
        })
    }

    /// The wrapped batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Consume the wrapper, returning the batch.
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Shared Arrow schema of the wrapped batch.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Name of the timestamp key column.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Index of the timestamp key column in the schema.
    pub fn time_index(&self) -> usize {
        self.time_index
    }

    /// The strictly increasing timestamp keys, in nanoseconds.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// First timestamp key.
    pub fn first_ts(&self) -> i64 {
        self.timestamps[0]
    }

    /// Last timestamp key.
    pub fn last_ts(&self) -> i64 {
        self.timestamps[self.timestamps.len() - 1]
    }

    /// Column lookup by name.
    pub fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// Zero-copy contiguous sub-table.
    ///
    /// A slice of a validated table is itself valid (the keys stay sorted,
    /// unique and non-null), so no re-validation runs. `length` must be
    /// non-zero and in bounds; callers check emptiness before slicing.
    pub(crate) fn slice(&self, offset: usize, length: usize) -> TimestampedTable {
        debug_assert!(length > 0, "slice must keep at least one row");
        TimestampedTable {
            batch: self.batch.slice(offset, length),
            time_column: self.time_column.clone(),
            time_index: self.time_index,
            timestamps: self.timestamps[offset..offset + length].to_vec(),
        }
    }
}

fn decode_timestamps(col: &ArrayRef, column: &str) -> Result<Vec<i64>, TableError> {
    let values: &[i64] = match col.data_type() {
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            let arr = col
                .as_any()
                .downcast_ref::<TimestampNanosecondArray>()
                .ok_or_else(|| TableError::UnsupportedTimestampType {
                    column: column.to_string(),
                    datatype: col.data_type().clone(),
                })?;
            check_no_nulls(arr, column)?;
            arr.values()
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().ok_or_else(|| {
                TableError::UnsupportedTimestampType {
                    column: column.to_string(),
                    datatype: col.data_type().clone(),
                }
            })?;
            check_no_nulls(arr, column)?;
            arr.values()
        }
        other => {
            return UnsupportedTimestampTypeSnafu {
                column: column.to_string(),
                datatype: other.clone(),
            }
            .fail();
        }
    };

    Ok(values.to_vec())
}

fn check_no_nulls(arr: &dyn Array, column: &str) -> Result<(), TableError> {
    if arr.null_count() > 0 {
        // report the first null row for diagnostics
        for row in 0..arr.len() {
            if arr.is_null(row) {
                return NullTimestampSnafu {
                    column: column.to_string(),
                    row,
                }
                .fail();
            }
        }
    }
    Ok(())
}

/// Errors raised while validating a timestamp-keyed batch.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TableError {
    /// The batch has zero rows; derived attributes need at least one.
    #[snafu(display("Batch has no rows; a timestamped table must be non-empty"))]
    EmptyTable,

    /// The timestamp key column is absent from the batch schema.
    #[snafu(display("Timestamp column {column} not found in batch"))]
    MissingTimestampColumn {
        /// Name of the expected timestamp column.
        column: String,
    },

    /// The timestamp key column has a type other than nanosecond timestamp
    /// or Int64.
    #[snafu(display("Unsupported timestamp column {column} with type {datatype}"))]
    UnsupportedTimestampType {
        /// Name of the timestamp column.
        column: String,
        /// Arrow data type encountered.
        datatype: DataType,
    },

    /// The timestamp key column holds a null value.
    #[snafu(display("Timestamp column {column} holds a null at row {row}"))]
    NullTimestamp {
        /// Name of the timestamp column.
        column: String,
        /// Row index of the first null.
        row: usize,
    },

    /// Timestamp keys must be strictly increasing (sorted and unique).
    #[snafu(display("Timestamp column {column} is not strictly increasing at row {row}"))]
    NonMonotonicTimestamp {
        /// Name of the timestamp column.
        column: String,
        /// Row index where the order breaks.
        row: usize,
    },
}
