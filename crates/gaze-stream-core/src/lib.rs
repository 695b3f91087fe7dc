//! Core access layer for eye-tracking recording data.
//!
//! This crate provides the foundational pieces for `gaze-stream`:
//!
//! - A `TimestampedTable` wrapper that validates the timestamp key column
//!   of an already-loaded Arrow batch (`table` module).
//! - Semantic column types and the static schema declarations for each
//!   stream and event variant, plus batch conformance via Arrow casts
//!   (`schema` module).
//! - The `Stream` wrapper with derived attributes, timestamp-based
//!   cropping, and resampling with per-column-type interpolation
//!   (`stream` module).
//! - Typed views over sparse event tables such as blinks, fixations and
//!   saccades (`events` module).
//!
//! Higher-level crates (reporting, visualization frontends) are expected
//! to depend on this core crate rather than re-implementing the column
//! typing and resampling logic.
#![deny(missing_docs)]
pub mod events;
pub mod schema;
pub mod stream;
pub mod table;

#[cfg(test)]
pub(crate) mod test_util;
