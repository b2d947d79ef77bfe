//! Decode failure taxonomy.
//!
//! [`ExtractionError`] is what a cell-level conversion reports: it knows the
//! value and its declared type but not where the cell lives. [`DecodeError`] is
//! what callers see: the extraction failure (or null) placed in its column,
//! table and keyspace, together with the row's formatted contents.

use itertools::Itertools;
use thiserror::Error;

use crate::schema::ColumnDefinition;

/// Failure converting one native value into a domain value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("expected {expected} but found {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("value {value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("cell is null")]
    Null,
    #[error("null value in field '{}' of {nested_type} (expected {expected})", path.join("."))]
    NullField {
        path: Vec<String>,
        nested_type: String,
        expected: String,
    },
    #[error("{nested_type} value has no field '{field}'")]
    MissingField { field: String, nested_type: String },
    #[error("field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: Box<ExtractionError>,
    },
    #[error("{0}")]
    Custom(String),
}

impl ExtractionError {
    pub fn mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        ExtractionError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        ExtractionError::Custom(message.into())
    }

    /// Places this failure under `field` of an enclosing nested value.
    pub(crate) fn within_field(self, field: &str) -> Self {
        match self {
            ExtractionError::NullField {
                mut path,
                nested_type,
                expected,
            } => {
                path.insert(0, field.to_string());
                ExtractionError::NullField {
                    path,
                    nested_type,
                    expected,
                }
            }
            other => ExtractionError::Field {
                field: field.to_string(),
                source: Box::new(other),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(
        "unexpected null in column {keyspace}.{table}.{column} (expected {expected}); row: {row}"
    )]
    UnexpectedNullInColumn {
        keyspace: String,
        table: String,
        column: String,
        expected: String,
        row: String,
    },
    #[error(
        "unexpected null in field '{}' of {nested_type} in column {keyspace}.{table}.{column} (expected {expected}); row: {row}",
        path.join(".")
    )]
    UnexpectedNullInNestedRecord {
        keyspace: String,
        table: String,
        column: String,
        path: Vec<String>,
        nested_type: String,
        expected: String,
        row: String,
    },
    #[error("failed to decode column {keyspace}.{table}.{column} as {expected}: {source}")]
    Extraction {
        keyspace: String,
        table: String,
        column: String,
        expected: String,
        #[source]
        source: ExtractionError,
    },
    #[error("no column '{column}' in {keyspace}.{table} for field of {record}; columns: {available}")]
    MissingColumn {
        keyspace: String,
        table: String,
        column: String,
        record: String,
        available: String,
    },
    #[error("column index {index} out of range for a row of {width} column(s)")]
    IndexOutOfRange { index: usize, width: usize },
}

impl DecodeError {
    pub(crate) fn unexpected_null(column: &ColumnDefinition, expected: String, row: String) -> Self {
        DecodeError::UnexpectedNullInColumn {
            keyspace: column.keyspace.clone(),
            table: column.table.clone(),
            column: column.name.clone(),
            expected,
            row,
        }
    }

    /// Lifts a cell-level failure into column context. Nulls reported from
    /// inside a nested value keep their field path.
    pub(crate) fn from_extraction(
        column: &ColumnDefinition,
        expected: String,
        row: impl FnOnce() -> String,
        error: ExtractionError,
    ) -> Self {
        match error {
            ExtractionError::NullField {
                path,
                nested_type,
                expected: _,
            } => DecodeError::UnexpectedNullInNestedRecord {
                keyspace: column.keyspace.clone(),
                table: column.table.clone(),
                column: column.name.clone(),
                path,
                nested_type,
                expected,
                row: row(),
            },
            source => DecodeError::Extraction {
                keyspace: column.keyspace.clone(),
                table: column.table.clone(),
                column: column.name.clone(),
                expected,
                source,
            },
        }
    }

    pub(crate) fn missing_column<'a>(
        keyspace: &str,
        table: &str,
        column: &str,
        record: &str,
        mut available: impl Iterator<Item = &'a str>,
    ) -> Self {
        DecodeError::MissingColumn {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            column: column.to_string(),
            record: record.to_string(),
            available: available.join(", "),
        }
    }

    pub fn is_unexpected_null(&self) -> bool {
        matches!(
            self,
            DecodeError::UnexpectedNullInColumn { .. }
                | DecodeError::UnexpectedNullInNestedRecord { .. }
        )
    }
}
