//! Error types and SNAFU context selectors for stream operations.
//!
//! This module centralizes the `StreamError` enum used by the public crop
//! and resample API. Context selectors are exposed with
//! `#[snafu(visibility(pub(crate)))]` so sibling modules can attach error
//! context without re-exporting everything at the crate root.

use arrow::{datatypes::DataType, error::ArrowError};
use snafu::prelude::*;

use crate::{schema::SchemaError, table::TableError};

/// Errors from crop and resample operations.
///
/// All variants are raised synchronously at the call that detects them.
/// The operations are deterministic, so none of these is worth retrying;
/// callers either adjust their inputs or propagate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StreamError {
    /// The resolved crop bounds are inverted.
    #[snafu(display("Invalid crop range: tmin={tmin}, tmax={tmax} (expect tmin <= tmax)"))]
    InvalidRange {
        /// Resolved lower bound in nanoseconds.
        tmin: i64,
        /// Resolved upper bound in nanoseconds.
        tmax: i64,
    },

    /// No rows fall inside the crop interval. Signalled explicitly since
    /// derived-attribute computation cannot operate on zero rows.
    #[snafu(display("No rows fall within the crop range [{tmin}, {tmax}]"))]
    EmptyResult {
        /// Resolved lower bound in nanoseconds.
        tmin: i64,
        /// Resolved upper bound in nanoseconds.
        tmax: i64,
    },

    /// Interpolation needs a bracketing pair of samples.
    #[snafu(display("Interpolation needs at least 2 source rows, table has {rows}"))]
    InsufficientData {
        /// Row count of the source table.
        rows: usize,
    },

    /// The automatic resampling grid was requested on a stream with no
    /// nominal sampling frequency (externally supplied data).
    #[snafu(display(
        "No nominal sampling frequency configured; supply explicit target timestamps"
    ))]
    MissingNominalRate,

    /// A requested target timestamp lies outside the source table's range.
    /// The interpolant does not extrapolate.
    #[snafu(display(
        "Requested timestamp {requested} lies outside the source range [{first}, {last}]"
    ))]
    OutOfRange {
        /// The offending target timestamp.
        requested: i64,
        /// First timestamp of the source table.
        first: i64,
        /// Last timestamp of the source table.
        last: i64,
    },

    /// Linear interpolation was requested for a column type it is not
    /// defined on (integer ids, booleans, strings).
    #[snafu(display("Linear interpolation is not defined for column {column} of type {datatype}"))]
    UnsupportedInterpolation {
        /// Name of the offending column.
        column: String,
        /// Arrow data type of the column.
        datatype: DataType,
    },

    /// The source (or reassembled) batch failed timestamped-table
    /// validation.
    #[snafu(display("Invalid timestamped table: {source}"))]
    Table {
        /// Underlying validation error.
        source: TableError,
    },

    /// Conforming the batch to the stream's declared schema failed.
    #[snafu(display("Schema conformance failed: {source}"))]
    Schema {
        /// Underlying schema error.
        source: SchemaError,
    },

    /// Arrow compute or assembly error while building the resampled batch.
    #[snafu(display("Arrow error while building resampled batch: {source}"))]
    Arrow {
        /// Underlying Arrow error.
        source: ArrowError,
    },
}
