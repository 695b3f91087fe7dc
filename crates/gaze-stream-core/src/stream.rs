//! Continuous recording streams: kinds, derived attributes, crop and
//! resample orchestration.
//!
//! A [`Stream`] owns one validated [`TimestampedTable`] plus the scalar
//! attributes derived from it (first/last timestamp, elapsed times,
//! duration, effective rate). The attributes are recomputed whenever the
//! owned table is replaced; the replacement and the recomputation happen
//! inside one method so no stale state is observable.

pub mod crop;
pub mod error;
pub mod interpolate;

use std::fmt;

use arrow::array::RecordBatch;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::schema::{StreamSchema, catalog};
use crate::table::TimestampedTable;

pub use crop::{CropWindow, crop};
pub use error::StreamError;
pub use interpolate::{InterpolationKind, interpolate, nominal_timestamps};

use error::{MissingNominalRateSnafu, SchemaSnafu, TableSnafu};

/// The continuous stream variants of a recording.
///
/// Each variant carries its device-declared nominal sampling frequency and
/// its static column schema. `Custom` covers externally supplied data with
/// neither.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StreamKind {
    /// Gaze point stream (200 Hz nominal).
    Gaze,
    /// 3D eye states stream (200 Hz nominal).
    EyeStates,
    /// Inertial measurement unit stream (110 Hz nominal).
    Imu,
    /// Externally supplied data: no declared schema, no nominal rate.
    Custom,
}

impl StreamKind {
    /// Device-declared nominal sampling frequency in Hz, if any.
    pub fn nominal_sampling_freq(self) -> Option<f64> {
        match self {
            StreamKind::Gaze | StreamKind::EyeStates => Some(200.0),
            StreamKind::Imu => Some(110.0),
            StreamKind::Custom => None,
        }
    }

    /// Static column schema for this variant, if any.
    pub fn schema(self) -> Option<StreamSchema> {
        match self {
            StreamKind::Gaze => Some(catalog::gaze()),
            StreamKind::EyeStates => Some(catalog::eye_states()),
            StreamKind::Imu => Some(catalog::imu()),
            StreamKind::Custom => None,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Gaze => write!(f, "gaze"),
            StreamKind::EyeStates => write!(f, "eye states"),
            StreamKind::Imu => write!(f, "imu"),
            StreamKind::Custom => write!(f, "custom"),
        }
    }
}

/// Scalar attributes derived from a stream's table.
///
/// Recomputed in full on every table replacement; never held stale.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamAttributes {
    /// First timestamp key, in nanoseconds.
    pub first_ts: i64,
    /// Last timestamp key, in nanoseconds.
    pub last_ts: i64,
    /// Per-row elapsed time in seconds since the first timestamp.
    pub times: Vec<f64>,
    /// Total duration in seconds.
    pub duration: f64,
    /// Observed sampling rate: row count divided by duration. Infinite for
    /// a single-row stream (zero duration).
    pub sampling_freq_effective: f64,
}

impl StreamAttributes {
    fn compute(table: &TimestampedTable) -> Self {
        let ts = table.timestamps();
        let first_ts = ts[0];
        let last_ts = ts[ts.len() - 1];
        let times: Vec<f64> = ts.iter().map(|&t| (t - first_ts) as f64 / 1e9).collect();
        let duration = (last_ts - first_ts) as f64 / 1e9;
        let sampling_freq_effective = ts.len() as f64 / duration;

        StreamAttributes {
            first_ts,
            last_ts,
            times,
            duration,
            sampling_freq_effective,
        }
    }
}

/// One continuous stream: a kind, its table, and the derived attributes.
///
/// Table ownership is exclusive; crop and resample come in copying forms
/// (returning a new table) and `_in_place` forms (replacing the owned
/// table and refreshing the attributes before returning).
#[derive(Debug, Clone)]
pub struct Stream {
    kind: StreamKind,
    table: TimestampedTable,
    attributes: StreamAttributes,
}

impl Stream {
    /// Build a stream of `kind` from an already-loaded batch.
    ///
    /// For kinds with a declared schema the batch is first conformed to it
    /// (declared columns cast, extras passed through), then validated as a
    /// timestamped table.
    pub fn try_new(kind: StreamKind, batch: RecordBatch) -> Result<Self, StreamError> {
        let batch = match kind.schema() {
            Some(schema) => schema.conform(&batch).context(SchemaSnafu)?,
            None => batch,
        };
        let table = TimestampedTable::try_new(batch).context(TableSnafu)?;
        let attributes = StreamAttributes::compute(&table);
        Ok(Stream {
            kind,
            table,
            attributes,
        })
    }

    /// Build a `Custom` stream from externally supplied data. Legal, but
    /// the automatic resampling grid is unavailable (no nominal rate).
    pub fn custom(batch: RecordBatch) -> Result<Self, StreamError> {
        Self::try_new(StreamKind::Custom, batch)
    }

    /// The stream variant.
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// The owned table.
    pub fn table(&self) -> &TimestampedTable {
        &self.table
    }

    /// The derived attributes.
    pub fn attributes(&self) -> &StreamAttributes {
        &self.attributes
    }

    /// First timestamp key in nanoseconds.
    pub fn first_ts(&self) -> i64 {
        self.attributes.first_ts
    }

    /// Last timestamp key in nanoseconds.
    pub fn last_ts(&self) -> i64 {
        self.attributes.last_ts
    }

    /// Per-row elapsed seconds since the first timestamp.
    pub fn times(&self) -> &[f64] {
        &self.attributes.times
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.attributes.duration
    }

    /// Observed sampling rate in Hz.
    pub fn sampling_freq_effective(&self) -> f64 {
        self.attributes.sampling_freq_effective
    }

    /// Device-declared nominal sampling rate in Hz, if any.
    pub fn sampling_freq_nominal(&self) -> Option<f64> {
        self.kind.nominal_sampling_freq()
    }

    /// Crop to `window`, returning the cropped table and leaving the
    /// stream untouched.
    pub fn crop(&self, window: CropWindow) -> Result<TimestampedTable, StreamError> {
        crop::crop(&self.table, window)
    }

    /// Crop to `window`, replace the owned table with the result, and
    /// refresh the derived attributes.
    pub fn crop_in_place(&mut self, window: CropWindow) -> Result<&TimestampedTable, StreamError> {
        let cropped = crop::crop(&self.table, window)?;
        self.replace_table(cropped);
        Ok(&self.table)
    }

    /// Resample with the default policies (linear floats, nearest others).
    ///
    /// `new_ts` of `None` selects the nominal grid, which requires the
    /// stream kind to declare a nominal sampling frequency.
    pub fn resample(&self, new_ts: Option<&[i64]>) -> Result<TimestampedTable, StreamError> {
        self.resample_with(
            new_ts,
            InterpolationKind::Linear,
            InterpolationKind::Nearest,
        )
    }

    /// Resample with explicit per-column-family policies.
    pub fn resample_with(
        &self,
        new_ts: Option<&[i64]>,
        float_kind: InterpolationKind,
        other_kind: InterpolationKind,
    ) -> Result<TimestampedTable, StreamError> {
        match new_ts {
            Some(targets) => interpolate::interpolate(targets, &self.table, float_kind, other_kind),
            None => {
                let rate = self
                    .kind
                    .nominal_sampling_freq()
                    .context(MissingNominalRateSnafu)?;
                let grid = nominal_timestamps(self.first_ts(), self.last_ts(), rate);
                interpolate::interpolate(&grid, &self.table, float_kind, other_kind)
            }
        }
    }

    /// Resample with default policies, replace the owned table with the
    /// result, and refresh the derived attributes.
    pub fn resample_in_place(
        &mut self,
        new_ts: Option<&[i64]>,
    ) -> Result<&TimestampedTable, StreamError> {
        let resampled = self.resample(new_ts)?;
        self.replace_table(resampled);
        Ok(&self.table)
    }

    /// Resample with explicit policies, replace the owned table, and
    /// refresh the derived attributes.
    pub fn resample_with_in_place(
        &mut self,
        new_ts: Option<&[i64]>,
        float_kind: InterpolationKind,
        other_kind: InterpolationKind,
    ) -> Result<&TimestampedTable, StreamError> {
        let resampled = self.resample_with(new_ts, float_kind, other_kind)?;
        self.replace_table(resampled);
        Ok(&self.table)
    }

    // Single point where the owned table changes: the attribute refresh
    // cannot be separated from the replacement.
    fn replace_table(&mut self, table: TimestampedTable) {
        self.attributes = StreamAttributes::compute(&table);
        self.table = table;
    }
}
