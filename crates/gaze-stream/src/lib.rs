//! # gaze-stream
//!
//! Typed access layer for eye-tracking recordings: per-variant column
//! schemas, timestamp-based cropping, and resampling with per-column-type
//! interpolation.
//!
//! This crate is the supported public entry point and provides a small,
//! stable surface over `gaze-stream-core`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gaze_stream::prelude::*;
//!
//! let mut stream = Stream::try_new(StreamKind::Gaze, batch)?;
//! stream.crop_in_place(CropWindow::time(Some(1.0), Some(4.0)))?;
//! let resampled = stream.resample(None)?;
//! ```
#![deny(missing_docs)]

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Schema namespace: semantic column types and the static per-variant
/// declarations.
pub mod schema {
    pub use gaze_stream_core::schema::catalog;
    pub use gaze_stream_core::schema::{ColumnDef, ColumnType, SchemaError, StreamSchema};
}

pub use gaze_stream_core::events::{EventError, EventKind, EventTable};
pub use gaze_stream_core::stream::{
    CropWindow, InterpolationKind, Stream, StreamAttributes, StreamError, StreamKind, crop,
    interpolate, nominal_timestamps,
};
pub use gaze_stream_core::table::{TIMESTAMP_COLUMN, TableError, TimestampedTable};
