//! Semantic column types, stream schemas, and batch conformance.
//!
//! Recording exports arrive as already-loaded Arrow batches whose column
//! types depend on how the caller read them (CSV readers in particular
//! tend to widen everything to strings or doubles). This module declares
//! the semantic type of every known column per stream/event variant and
//! provides `conform`, which casts a batch to its declared schema so the
//! rest of the crate can rely on column types instead of re-inspecting
//! them at every call site.

pub mod catalog;

use std::{collections::HashMap, fmt, sync::Arc};

use arrow::{
    array::{ArrayRef, RecordBatch},
    compute::cast,
    datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit},
    error::ArrowError,
};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Semantic column types used by stream and event schemas.
///
/// This is deliberately a small, flat set: it covers exactly the types the
/// device export produces (float samples, integer ids, worn flags, label
/// strings, and the nanosecond timestamp key).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit floating point sample.
    Float64,
    /// 32-bit floating point sample.
    Float32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit signed integer (episode ids are nullable Int32).
    Int32,
    /// Boolean flag.
    Bool,
    /// UTF-8 encoded string.
    Utf8,
    /// Nanosecond-precision timestamp key.
    TimestampNs,
}

impl ColumnType {
    /// Map this semantic type to its Arrow data type.
    pub fn to_arrow_datatype(self) -> DataType {
        match self {
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Float32 => DataType::Float32,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Int32 => DataType::Int32,
            ColumnType::Bool => DataType::Boolean,
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::TimestampNs => DataType::Timestamp(TimeUnit::Nanosecond, None),
        }
    }

    /// Whether columns of this type are interpolated with the float policy.
    pub fn is_float(self) -> bool {
        matches!(self, ColumnType::Float64 | ColumnType::Float32)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Float64 => write!(f, "float64"),
            ColumnType::Float32 => write!(f, "float32"),
            ColumnType::Int64 => write!(f, "int64"),
            ColumnType::Int32 => write!(f, "int32"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Utf8 => write!(f, "utf8"),
            ColumnType::TimestampNs => write!(f, "timestamp[ns]"),
        }
    }
}

/// Declared column in a stream or event schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name as it appears in the export.
    pub name: String,
    /// Semantic type for the column.
    pub column_type: ColumnType,
    /// Whether the column allows null values.
    pub nullable: bool,
}

impl ColumnDef {
    /// A non-nullable column.
    pub fn required(name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            column_type,
            nullable: false,
        }
    }

    /// A nullable column (episode ids are null outside their episode).
    pub fn nullable(name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }

    fn to_arrow_field(&self) -> Field {
        Field::new(
            self.name.clone(),
            self.column_type.to_arrow_datatype(),
            self.nullable,
        )
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?: {}", self.name, self.column_type)
        } else {
            write!(f, "{}: {}", self.name, self.column_type)
        }
    }
}

/// Ordered, validated set of declared columns for one stream/event variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamSchema {
    columns: Vec<ColumnDef>,
}

impl StreamSchema {
    /// Construct a validated schema (rejects duplicate column names).
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.clone()) {
                return DuplicateColumnSnafu {
                    column: col.name.clone(),
                }
                .fail();
            }
        }
        Ok(StreamSchema { columns })
    }

    /// Borrow the declared columns.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Look up a declared column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Convert this schema to an owned Arrow [`Schema`].
    pub fn to_arrow_schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(ColumnDef::to_arrow_field)
                .collect::<Vec<_>>(),
        )
    }

    /// Convert this schema to a shared Arrow [`SchemaRef`].
    pub fn to_arrow_schema_ref(&self) -> SchemaRef {
        Arc::new(self.to_arrow_schema())
    }

    /// Cast `batch` so every declared column matches its declared type and
    /// nullability.
    ///
    /// - Every declared column must be present in the batch; it is cast
    ///   with Arrow's `cast` kernel when the types differ.
    /// - Columns the schema does not name pass through unchanged, in their
    ///   original position. Device exports carry bookkeeping columns
    ///   (section/recording ids) that the access layer has no opinion on.
    /// - Column order in the batch is preserved.
    pub fn conform(&self, batch: &RecordBatch) -> Result<RecordBatch, SchemaError> {
        let mut pending: HashMap<&str, &ColumnDef> = self
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c))
            .collect();

        let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

        for (idx, field) in batch.schema().fields().iter().enumerate() {
            let col = batch.column(idx);
            match pending.remove(field.name().as_str()) {
                Some(def) => {
                    let target = def.column_type.to_arrow_datatype();
                    let array = if col.data_type() == &target {
                        col.clone()
                    } else {
                        cast(col.as_ref(), &target).map_err(|source| SchemaError::Cast {
                            column: def.name.clone(),
                            from: col.data_type().clone(),
                            to: target.clone(),
                            source,
                        })?
                    };
                    fields.push(def.to_arrow_field());
                    arrays.push(array);
                }
                None => {
                    fields.push(field.as_ref().clone());
                    arrays.push(col.clone());
                }
            }
        }

        if let Some(column) = pending.keys().next() {
            return MissingColumnSnafu {
                column: (*column).to_string(),
            }
            .fail();
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context(BatchSnafu)
    }
}

/// Errors raised while constructing a schema or conforming a batch to it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SchemaError {
    /// Duplicate column names are not allowed in a schema declaration.
    #[snafu(display("Duplicate column name: {column}"))]
    DuplicateColumn {
        /// The duplicate column name.
        column: String,
    },

    /// A declared column is absent from the batch being conformed.
    #[snafu(display("Batch is missing declared column {column}"))]
    MissingColumn {
        /// The name of the missing column.
        column: String,
    },

    /// Arrow's cast kernel rejected the conversion for a declared column.
    #[snafu(display("Cannot cast column {column} from {from} to {to}: {source}"))]
    Cast {
        /// Name of the column that failed to cast.
        column: String,
        /// Type the column had in the batch.
        from: DataType,
        /// Declared target type.
        to: DataType,
        /// Underlying Arrow error.
        source: ArrowError,
    },

    /// Reassembling the conformed batch failed (for example, a cast
    /// produced nulls for a column declared non-nullable).
    #[snafu(display("Could not assemble conformed batch: {source}"))]
    Batch {
        /// Underlying Arrow error.
        source: ArrowError,
    },
}
