//! Resampling of a timestamped table onto a new set of timestamps.
//!
//! Each target timestamp is bracketed by the two source rows immediately
//! before and after it (found by binary search over the validated keys).
//! Column values are then produced per column type:
//!
//! - Float columns interpolate linearly between the bracketing pair by
//!   default. A null bracketing value yields a null output value.
//! - Every other column (integer ids, booleans, strings) takes the value
//!   of the nearest bracketing sample; equidistant targets resolve to the
//!   earlier sample. Nearest-neighbor selection is materialized with
//!   Arrow's `take` kernel, so nulls pass through untouched.
//!
//! The interpolant does not extrapolate: targets outside the source range
//! fail with `OutOfRange`. When no targets are supplied by the caller,
//! [`nominal_timestamps`] generates an evenly-spaced grid from the
//! stream's nominal sampling frequency.

use std::sync::Arc;

use arrow::{
    array::{
        Array, ArrayRef, Float32Array, Float32Builder, Float64Array, Float64Builder, Int64Array,
        RecordBatch, TimestampNanosecondArray, UInt32Array,
    },
    compute::take,
    datatypes::{DataType, TimeUnit},
    error::ArrowError,
};
use log::debug;
use snafu::prelude::*;

use crate::stream::error::{
    ArrowSnafu, InsufficientDataSnafu, OutOfRangeSnafu, StreamError, TableSnafu,
    UnsupportedInterpolationSnafu,
};
use crate::table::{TableError, TimestampedTable};

/// Interpolation policy applied to a column family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationKind {
    /// Linear interpolation between the two bracketing samples. Defined
    /// only for float columns.
    Linear,
    /// Value of the bracketing sample closest in time. Equidistant targets
    /// resolve to the earlier sample.
    Nearest,
}

/// Generate the evenly-spaced nominal resampling grid.
///
/// The grid starts exactly at `first_ts` and advances by
/// `round(1e9 / nominal_rate)` nanoseconds, stopping strictly before
/// `last_ts`. When the span is not an exact multiple of the step, the last
/// partial interval is dropped rather than rounded up past the data.
pub fn nominal_timestamps(first_ts: i64, last_ts: i64, nominal_rate: f64) -> Vec<i64> {
    let step = ((1e9 / nominal_rate).round() as i64).max(1);

    let span = last_ts.saturating_sub(first_ts);
    let mut grid = Vec::with_capacity((span / step + 1) as usize);
    let mut t = first_ts;
    while t < last_ts {
        grid.push(t);
        t += step;
    }

    debug_assert!(grid.is_empty() || grid[0] == first_ts);
    debug_assert!(grid.windows(2).all(|w| w[1] - w[0] == step));
    grid
}

/// The two source rows bracketing one target timestamp. For a target that
/// hits a source key exactly, `lo == hi`.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lo: usize,
    hi: usize,
}

impl Bracket {
    /// Index of the bracketing sample nearest to `t`; ties prefer the
    /// earlier sample.
    fn nearest(self, ts: &[i64], t: i64) -> usize {
        let before = t - ts[self.lo];
        let after = ts[self.hi] - t;
        if before <= after { self.lo } else { self.hi }
    }
}

fn bracket_indices(ts: &[i64], new_ts: &[i64]) -> Result<Vec<Bracket>, StreamError> {
    debug_assert!(
        new_ts.windows(2).all(|w| w[0] < w[1]),
        "target timestamps must be strictly increasing"
    );

    let first = ts[0];
    let last = ts[ts.len() - 1];

    new_ts
        .iter()
        .map(|&t| {
            ensure!(
                t >= first && t <= last,
                OutOfRangeSnafu {
                    requested: t,
                    first,
                    last,
                }
            );
            // first index with ts[hi] >= t; in range because t <= last
            let hi = ts.partition_point(|&k| k < t);
            let lo = if ts[hi] == t { hi } else { hi - 1 };
            Ok(Bracket { lo, hi })
        })
        .collect()
}

fn lerp(t: i64, t0: i64, t1: i64, v0: f64, v1: f64) -> f64 {
    if t0 == t1 {
        return v0;
    }
    v0 + (v1 - v0) * ((t - t0) as f64) / ((t1 - t0) as f64)
}

fn interpolate_f64(
    arr: &Float64Array,
    ts: &[i64],
    new_ts: &[i64],
    brackets: &[Bracket],
) -> Float64Array {
    let mut builder = Float64Builder::with_capacity(new_ts.len());
    for (&t, b) in new_ts.iter().zip(brackets) {
        if arr.is_null(b.lo) || arr.is_null(b.hi) {
            builder.append_null();
        } else {
            builder.append_value(lerp(t, ts[b.lo], ts[b.hi], arr.value(b.lo), arr.value(b.hi)));
        }
    }
    builder.finish()
}

fn interpolate_f32(
    arr: &Float32Array,
    ts: &[i64],
    new_ts: &[i64],
    brackets: &[Bracket],
) -> Float32Array {
    let mut builder = Float32Builder::with_capacity(new_ts.len());
    for (&t, b) in new_ts.iter().zip(brackets) {
        if arr.is_null(b.lo) || arr.is_null(b.hi) {
            builder.append_null();
        } else {
            let v = lerp(
                t,
                ts[b.lo],
                ts[b.hi],
                f64::from(arr.value(b.lo)),
                f64::from(arr.value(b.hi)),
            );
            builder.append_value(v as f32);
        }
    }
    builder.finish()
}

fn downcast<'a, A: Array + 'static>(
    col: &'a ArrayRef,
    column: &str,
) -> Result<&'a A, StreamError> {
    col.as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| ArrowError::CastError(format!("column {column} does not match its declared type")))
        .context(ArrowSnafu)
}

fn new_time_array(
    datatype: &DataType,
    column: &str,
    new_ts: &[i64],
) -> Result<ArrayRef, StreamError> {
    match datatype {
        DataType::Timestamp(TimeUnit::Nanosecond, tz) => Ok(Arc::new(
            TimestampNanosecondArray::from(new_ts.to_vec()).with_timezone_opt(tz.clone()),
        )),
        DataType::Int64 => Ok(Arc::new(Int64Array::from(new_ts.to_vec()))),
        other => Err(TableError::UnsupportedTimestampType {
            column: column.to_string(),
            datatype: other.clone(),
        })
        .context(TableSnafu),
    }
}

/// Evaluate `table` at `new_ts`, producing a new timestamped table with
/// one value per original column per target.
///
/// `new_ts` must be strictly increasing and lie within the source range
/// `[first_ts, last_ts]`; the source must have at least two rows. Float
/// columns follow `float_kind`, every other column follows `other_kind`.
/// The timestamp column of the result keeps the source column's Arrow
/// type, including timezone metadata. Pure function; the input table is
/// untouched.
pub fn interpolate(
    new_ts: &[i64],
    table: &TimestampedTable,
    float_kind: InterpolationKind,
    other_kind: InterpolationKind,
) -> Result<TimestampedTable, StreamError> {
    let rows = table.num_rows();
    ensure!(rows >= 2, InsufficientDataSnafu { rows });
    debug_assert!(rows <= u32::MAX as usize, "row index exceeds u32");

    let ts = table.timestamps();
    let brackets = bracket_indices(ts, new_ts)?;

    let nearest_indices = UInt32Array::from(
        new_ts
            .iter()
            .zip(&brackets)
            .map(|(&t, b)| b.nearest(ts, t) as u32)
            .collect::<Vec<_>>(),
    );

    debug!("resampling {rows} rows onto {} targets", new_ts.len());

    let batch = table.batch();
    let schema = batch.schema();
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (idx, field) in schema.fields().iter().enumerate() {
        if idx == table.time_index() {
            columns.push(new_time_array(field.data_type(), field.name(), new_ts)?);
            continue;
        }

        let col = batch.column(idx);
        let kind = match field.data_type() {
            DataType::Float64 | DataType::Float32 => float_kind,
            _ => other_kind,
        };

        let out: ArrayRef = match (kind, field.data_type()) {
            (InterpolationKind::Linear, DataType::Float64) => {
                let arr = downcast::<Float64Array>(col, field.name())?;
                Arc::new(interpolate_f64(arr, ts, new_ts, &brackets))
            }
            (InterpolationKind::Linear, DataType::Float32) => {
                let arr = downcast::<Float32Array>(col, field.name())?;
                Arc::new(interpolate_f32(arr, ts, new_ts, &brackets))
            }
            (InterpolationKind::Linear, other) => {
                return UnsupportedInterpolationSnafu {
                    column: field.name().clone(),
                    datatype: other.clone(),
                }
                .fail();
            }
            (InterpolationKind::Nearest, _) => {
                take(col.as_ref(), &nearest_indices, None).context(ArrowSnafu)?
            }
        };
        columns.push(out);
    }

    let out = RecordBatch::try_new(schema.clone(), columns).context(ArrowSnafu)?;
    TimestampedTable::try_new_with_time_column(out, table.time_column()).context(TableSnafu)
}
