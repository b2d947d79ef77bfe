//! In-memory query result rows.
//!
//! A [`Row`] is an immutable ordered sequence of possibly-null cells sharing a
//! [`ResultSchema`]. It exposes the primitive surface decoders are built on:
//! null checks, raw per-type extraction by index or by name, declared type
//! lookups, and a formatted dump used only for diagnostics.

use std::sync::Arc;

use anyhow::{Result, ensure};
use itertools::Itertools;

use crate::{
    data::{Value, display_cell},
    error::{DecodeError, ExtractionError},
    native::FromNative,
    schema::{ColumnDefinition, DataType, ResultSchema},
};

/// One cell together with the definition of the column it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'r> {
    pub value: Option<&'r Value>,
    pub column: &'r ColumnDefinition,
}

impl Cell<'_> {
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn data_type(&self) -> &DataType {
        &self.column.data_type
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Arc<ResultSchema>,
    cells: Vec<Option<Value>>,
}

impl Row {
    pub fn new(schema: Arc<ResultSchema>, cells: Vec<Option<Value>>) -> Result<Self> {
        ensure!(
            cells.len() == schema.len(),
            "Row has {} cell(s) but {}.{} declares {} column(s)",
            cells.len(),
            schema.keyspace(),
            schema.table(),
            schema.len()
        );
        Ok(Self { schema, cells })
    }

    pub fn schema(&self) -> &Arc<ResultSchema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn column_definitions(&self) -> &[ColumnDefinition] {
        self.schema.columns()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    pub fn cell(&self, index: usize) -> Result<Cell<'_>, DecodeError> {
        match (self.cells.get(index), self.schema.column(index)) {
            (Some(value), Some(column)) => Ok(Cell {
                value: value.as_ref(),
                column,
            }),
            _ => Err(DecodeError::IndexOutOfRange {
                index,
                width: self.cells.len(),
            }),
        }
    }

    /// Out-of-range indices are reported as not null; decoding them fails
    /// with [`DecodeError::IndexOutOfRange`] instead.
    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    pub fn data_type(&self, index: usize) -> Option<&DataType> {
        self.schema.column(index).map(|column| &column.data_type)
    }

    pub fn data_type_of(&self, name: &str) -> Option<&DataType> {
        self.index_of(name).and_then(|index| self.data_type(index))
    }

    /// Raw extraction at `index`. Assumes the cell is non-null; a null cell is
    /// reported as [`ExtractionError::Null`] rather than a default value.
    pub fn get<T: FromNative>(&self, index: usize) -> Result<T, DecodeError> {
        let cell = self.cell(index)?;
        let value = cell.value.ok_or(ExtractionError::Null);
        value
            .and_then(|value| T::from_native(value, cell.data_type()))
            .map_err(|err| {
                DecodeError::from_extraction(
                    cell.column,
                    T::TYPE_NAME.to_string(),
                    || self.formatted_contents(),
                    err,
                )
            })
    }

    pub fn get_by_name<T: FromNative>(&self, name: &str) -> Result<T, DecodeError> {
        let index = self.index_of(name).ok_or_else(|| {
            DecodeError::missing_column(
                self.schema.keyspace(),
                self.schema.table(),
                name,
                T::TYPE_NAME,
                self.column_definitions().iter().map(|c| c.name.as_str()),
            )
        })?;
        self.get(index)
    }

    /// Diagnostic rendering of every cell, e.g. `[id: 1, name: 'Alice', age: null]`.
    pub fn formatted_contents(&self) -> String {
        let cells = self
            .column_definitions()
            .iter()
            .zip(&self.cells)
            .map(|(column, value)| format!("{}: {}", column.name, display_cell(value.as_ref())))
            .join(", ");
        format!("[{cells}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Arc<ResultSchema> {
        ResultSchema::new(
            "crm",
            "people",
            vec![
                ("id".to_string(), DataType::Int),
                ("name".to_string(), DataType::Text),
                ("age".to_string(), DataType::Int),
            ],
        )
    }

    #[test]
    fn rejects_cell_count_mismatch() {
        let err = Row::new(people(), vec![Some(Value::Int(1))]).unwrap_err();
        assert!(err.to_string().contains("declares 3 column(s)"));
    }

    #[test]
    fn formatted_contents_lists_every_cell() {
        let row = Row::new(
            people(),
            vec![
                Some(Value::Int(1)),
                Some(Value::Text("Alice".into())),
                None,
            ],
        )
        .unwrap();
        assert_eq!(row.formatted_contents(), "[id: 1, name: 'Alice', age: null]");
        assert!(row.is_null(2));
        assert!(!row.is_null(0));
        assert!(!row.is_null(7));
    }

    #[test]
    fn get_by_name_extracts_and_reports_missing_columns() {
        let row = Row::new(
            people(),
            vec![Some(Value::Int(7)), Some(Value::Text("Bob".into())), None],
        )
        .unwrap();
        assert_eq!(row.get_by_name::<String>("name").unwrap(), "Bob");
        assert_eq!(row.get::<i64>(0).unwrap(), 7);
        assert!(matches!(
            row.get_by_name::<String>("email"),
            Err(DecodeError::MissingColumn { .. })
        ));
        assert!(matches!(
            row.get::<i32>(2),
            Err(DecodeError::Extraction {
                source: ExtractionError::Null,
                ..
            })
        ));
        assert!(matches!(
            row.get::<i32>(9),
            Err(DecodeError::IndexOutOfRange { index: 9, width: 3 })
        ));
    }
}
