//! Closed-interval cropping of a timestamped table.
//!
//! Bounds are addressable in absolute nanosecond timestamps or in seconds
//! since the first row; an unset bound extends to the corresponding data
//! bound. Because the keys are validated as strictly increasing, the rows
//! inside `[tmin, tmax]` form one contiguous run, found by binary search
//! and returned as a zero-copy slice.

use log::debug;
use snafu::prelude::*;

use crate::stream::error::{EmptyResultSnafu, InvalidRangeSnafu, StreamError};
use crate::table::TimestampedTable;

/// Crop bounds, in one of the two supported units.
///
/// The unit applies to both bounds of a call; absolute timestamps and
/// relative times are never mixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropWindow {
    /// Bounds are absolute timestamps in nanoseconds.
    Timestamp {
        /// Lower bound; `None` extends to the first key.
        tmin: Option<i64>,
        /// Upper bound; `None` extends to the last key.
        tmax: Option<i64>,
    },
    /// Bounds are seconds relative to the table's first timestamp.
    Time {
        /// Lower bound in seconds since start; `None` extends to the start.
        tmin: Option<f64>,
        /// Upper bound in seconds since start; `None` extends to the end.
        tmax: Option<f64>,
    },
}

impl CropWindow {
    /// Window with both bounds unset (the identity crop).
    pub fn all() -> Self {
        CropWindow::Timestamp {
            tmin: None,
            tmax: None,
        }
    }

    /// Absolute-timestamp window.
    pub fn timestamp(tmin: Option<i64>, tmax: Option<i64>) -> Self {
        CropWindow::Timestamp { tmin, tmax }
    }

    /// Relative-time window in seconds since the first row.
    pub fn time(tmin: Option<f64>, tmax: Option<f64>) -> Self {
        CropWindow::Time { tmin, tmax }
    }

    /// Resolve both bounds to absolute nanosecond timestamps against the
    /// table's data bounds.
    fn resolve(self, table: &TimestampedTable) -> Result<(i64, i64), StreamError> {
        let first = table.first_ts();
        let last = table.last_ts();

        let (tmin, tmax) = match self {
            CropWindow::Timestamp { tmin, tmax } => {
                (tmin.unwrap_or(first), tmax.unwrap_or(last))
            }
            CropWindow::Time { tmin, tmax } => (
                tmin.map_or(first, |t| relative_to_absolute(first, t)),
                tmax.map_or(last, |t| relative_to_absolute(first, t)),
            ),
        };

        ensure!(tmin <= tmax, InvalidRangeSnafu { tmin, tmax });
        Ok((tmin, tmax))
    }
}

fn relative_to_absolute(first_ts: i64, seconds: f64) -> i64 {
    first_ts + (seconds * 1e9).round() as i64
}

/// Restrict `table` to the rows whose timestamp key lies in the closed
/// interval described by `window`. Row order is preserved.
///
/// Fails with [`StreamError::InvalidRange`] if the resolved bounds are
/// inverted and with [`StreamError::EmptyResult`] if no rows fall in
/// range. Pure function; the input table is untouched.
pub fn crop(table: &TimestampedTable, window: CropWindow) -> Result<TimestampedTable, StreamError> {
    let (tmin, tmax) = window.resolve(table)?;

    let ts = table.timestamps();
    let start = ts.partition_point(|&k| k < tmin);
    let end = ts.partition_point(|&k| k <= tmax);
    ensure!(start < end, EmptyResultSnafu { tmin, tmax });

    debug!(
        "crop [{tmin}, {tmax}] keeps rows {start}..{end} of {}",
        table.num_rows()
    );

    Ok(table.slice(start, end - start))
}
