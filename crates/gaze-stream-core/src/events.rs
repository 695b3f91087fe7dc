//! Typed views over sparse event tables.
//!
//! Blinks, fixations and saccades are detected episodes with a start and
//! end timestamp; event markers are user annotations with a single
//! timestamp. Unlike continuous streams they are not resampled, so the
//! view only conforms the batch to the variant's schema and validates the
//! ordering column. Empty event tables are legal (a recording may contain
//! no blinks).

use std::fmt;

use arrow::array::{Array, Int64Array, RecordBatch};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::schema::{SchemaError, StreamSchema, catalog};
use crate::table::TIMESTAMP_COLUMN;

/// The sparse event-table variants of a recording.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    /// Blink episodes.
    Blinks,
    /// Fixation episodes.
    Fixations,
    /// Saccade episodes.
    Saccades,
    /// User-annotated event markers.
    Events,
}

impl EventKind {
    /// Static column schema for this variant.
    pub fn schema(self) -> StreamSchema {
        match self {
            EventKind::Blinks => catalog::blinks(),
            EventKind::Fixations => catalog::fixations(),
            EventKind::Saccades => catalog::saccades(),
            EventKind::Events => catalog::events(),
        }
    }

    /// Name of the column the table is ordered by: the episode start for
    /// detected episodes, the marker timestamp for event markers.
    pub fn order_column(self) -> &'static str {
        match self {
            EventKind::Blinks | EventKind::Fixations | EventKind::Saccades => {
                "start timestamp [ns]"
            }
            EventKind::Events => TIMESTAMP_COLUMN,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Blinks => write!(f, "blinks"),
            EventKind::Fixations => write!(f, "fixations"),
            EventKind::Saccades => write!(f, "saccades"),
            EventKind::Events => write!(f, "events"),
        }
    }
}

/// A conformed, order-validated event table.
#[derive(Debug, Clone)]
pub struct EventTable {
    kind: EventKind,
    batch: RecordBatch,
    timestamps: Vec<i64>,
}

impl EventTable {
    /// Conform `batch` to the schema of `kind` and validate that the
    /// ordering column is non-null and non-decreasing.
    ///
    /// Episodes may share a start timestamp in degenerate exports, so the
    /// ordering check is non-strict, unlike continuous stream keys.
    pub fn try_new(kind: EventKind, batch: RecordBatch) -> Result<Self, EventError> {
        let batch = kind.schema().conform(&batch).context(SchemaSnafu)?;

        let column = kind.order_column();
        // conform guarantees presence and Int64 type for the order column
        let arr = batch
            .column_by_name(column)
            .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
            .context(ColumnSnafu { column })?;

        let mut timestamps = Vec::with_capacity(arr.len());
        for row in 0..arr.len() {
            ensure!(
                !arr.is_null(row),
                NullEventTimestampSnafu { column, row }
            );
            timestamps.push(arr.value(row));
        }

        for (row, pair) in timestamps.windows(2).enumerate() {
            ensure!(
                pair[0] <= pair[1],
                UnorderedEventsSnafu { column, row: row + 1 }
            );
        }

        Ok(EventTable {
            kind,
            batch,
            timestamps,
        })
    }

    /// The event variant.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The conformed batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the table holds no events.
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Values of the ordering column, in nanoseconds.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }
}

/// Errors raised while building a typed event table.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EventError {
    /// Conforming the batch to the variant's schema failed.
    #[snafu(display("Schema conformance failed: {source}"))]
    Schema {
        /// Underlying schema error.
        source: SchemaError,
    },

    /// The ordering column is missing or has an unexpected type after
    /// conformance.
    #[snafu(display("Ordering column {column} unavailable after conformance"))]
    Column {
        /// Name of the ordering column.
        column: &'static str,
    },

    /// The ordering column holds a null value.
    #[snafu(display("Ordering column {column} holds a null at row {row}"))]
    NullEventTimestamp {
        /// Name of the ordering column.
        column: &'static str,
        /// Row index of the null.
        row: usize,
    },

    /// Events are not sorted by their ordering column.
    #[snafu(display("Events are not ordered by {column} at row {row}"))]
    UnorderedEvents {
        /// Name of the ordering column.
        column: &'static str,
        /// Row index where the order breaks.
        row: usize,
    },
}
