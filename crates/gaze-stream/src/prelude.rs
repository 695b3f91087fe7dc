//! Wrapper prelude.
//!
//! The `gaze-stream` crate is the supported public entry point. Downstream
//! code should prefer importing from this prelude instead of depending on
//! internal core module paths.

pub use crate::schema;
pub use crate::{
    CropWindow, EventKind, EventTable, InterpolationKind, Stream, StreamAttributes, StreamError,
    StreamKind, TIMESTAMP_COLUMN, TableError, TimestampedTable,
};
