//! Result sets described in YAML or JSON.
//!
//! A fixture names its keyspace and table, declares its columns, and lists
//! rows as plain values. Loading coerces every value to the column's declared
//! type so the resulting [`Row`]s hold exactly what a driver would hand out:
//!
//! ```yaml
//! keyspace: crm
//! table: people
//! columns:
//!   - { name: name, type: text }
//!   - { name: age, type: int }
//!   - { name: tags, type: "set<text>" }
//! rows:
//!   - [Alice, 30, [admin]]
//!   - [Bob, null, []]
//! ```

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use anyhow::{Context, Result, anyhow, bail, ensure};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

use crate::{
    data::{UdtValue, Value, parse_primitive},
    row::Row,
    schema::{DataType, ResultSchema},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnFixture {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSetFixture {
    pub keyspace: String,
    pub table: String,
    pub columns: Vec<ColumnFixture>,
    #[serde(default)]
    pub rows: Vec<Vec<YamlValue>>,
}

impl ResultSetFixture {
    /// Loads a fixture, reading JSON for `.json` files and YAML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening fixture {path:?}"))?;
        let reader = BufReader::new(file);
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let fixture: Self = if is_json {
            serde_json::from_reader(reader).context("Parsing fixture JSON")?
        } else {
            serde_yaml::from_reader(reader).context("Parsing fixture YAML")?
        };
        debug!(
            "Loaded fixture for {}.{} with {} column(s) and {} row(s)",
            fixture.keyspace,
            fixture.table,
            fixture.columns.len(),
            fixture.rows.len()
        );
        Ok(fixture)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).context("Parsing fixture YAML")
    }

    pub fn schema(&self) -> Arc<ResultSchema> {
        ResultSchema::new(
            self.keyspace.clone(),
            self.table.clone(),
            self.columns
                .iter()
                .map(|column| (column.name.clone(), column.data_type.clone())),
        )
    }

    pub fn rows(&self) -> Result<Vec<Row>> {
        let schema = self.schema();
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, raw)| {
                ensure!(
                    raw.len() == self.columns.len(),
                    "Row {} has {} value(s) but {} column(s) are declared",
                    row_idx + 1,
                    raw.len(),
                    self.columns.len()
                );
                let cells = raw
                    .iter()
                    .zip(&self.columns)
                    .map(|(value, column)| {
                        coerce(value, &column.data_type).with_context(|| {
                            format!("Row {} column '{}'", row_idx + 1, column.name)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Row::new(Arc::clone(&schema), cells)
            })
            .collect()
    }
}

/// Converts a plain YAML value into a cell of the declared type.
pub fn coerce(value: &YamlValue, ty: &DataType) -> Result<Option<Value>> {
    if value.is_null() {
        return Ok(None);
    }
    let coerced = match ty {
        DataType::List(element) => Value::List(coerce_elements(value, element)?),
        DataType::Set(element) => Value::Set(coerce_elements(value, element)?),
        DataType::Map(key_type, value_type) => {
            let mapping = value
                .as_mapping()
                .ok_or_else(|| anyhow!("Expected a mapping for {ty}"))?;
            let entries = mapping
                .iter()
                .map(|(k, v)| -> Result<(Value, Value)> {
                    Ok((coerce_element(k, key_type)?, coerce_element(v, value_type)?))
                })
                .collect::<Result<Vec<_>>>()?;
            Value::Map(entries)
        }
        DataType::Tuple(types) => {
            let items = value
                .as_sequence()
                .ok_or_else(|| anyhow!("Expected a sequence for {ty}"))?;
            ensure!(
                items.len() == types.len(),
                "Expected {} tuple component(s) but found {}",
                types.len(),
                items.len()
            );
            Value::Tuple(
                items
                    .iter()
                    .zip(types)
                    .map(|(item, component)| coerce(item, component))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
        DataType::Udt(udt) => {
            let mapping = value
                .as_mapping()
                .ok_or_else(|| anyhow!("Expected a mapping for {ty}"))?;
            let mut result = UdtValue::new(udt.name.clone());
            for (field, field_type) in &udt.fields {
                let raw = mapping.get(field.as_str()).unwrap_or(&YamlValue::Null);
                let field_value = coerce(raw, field_type)
                    .with_context(|| format!("Field '{field}' of {}", udt.name))?;
                result = result.with_field(field.clone(), field_value);
            }
            Value::Udt(result)
        }
        primitive => parse_primitive(&scalar_text(value)?, primitive)?,
    };
    Ok(Some(coerced))
}

fn coerce_element(value: &YamlValue, ty: &DataType) -> Result<Value> {
    coerce(value, ty)?.ok_or_else(|| anyhow!("Collection elements cannot be null"))
}

fn coerce_elements(value: &YamlValue, element: &DataType) -> Result<Vec<Value>> {
    value
        .as_sequence()
        .ok_or_else(|| anyhow!("Expected a sequence of {element}"))?
        .iter()
        .map(|item| coerce_element(item, element))
        .collect()
}

fn scalar_text(value: &YamlValue) -> Result<String> {
    match value {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        other => bail!("Expected a scalar value but found {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"
keyspace: crm
table: people
columns:
  - { name: name, type: text }
  - { name: age, type: int }
  - { name: tags, type: "set<text>" }
  - { name: scores, type: "map<text, double>" }
rows:
  - [Alice, 30, [admin], { math: 1.5 }]
  - [Bob, null, [], {}]
"#;

    #[test]
    fn coerces_rows_to_declared_types() {
        let fixture = ResultSetFixture::from_yaml_str(PEOPLE).unwrap();
        let rows = fixture.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].formatted_contents(),
            "[name: 'Alice', age: 30, tags: {'admin'}, scores: {'math': 1.5}]"
        );
        assert!(rows[1].is_null(1));
        assert_eq!(rows[1].data_type(2), Some(&DataType::set(DataType::Text)));
    }

    #[test]
    fn reports_row_and_column_on_bad_values() {
        let yaml = "keyspace: k\ntable: t\ncolumns:\n  - { name: n, type: int }\nrows:\n  - [abc]\n";
        let fixture = ResultSetFixture::from_yaml_str(yaml).unwrap();
        let err = fixture.rows().unwrap_err();
        assert!(format!("{err:#}").contains("Row 1 column 'n'"));
    }

    #[test]
    fn rejects_short_rows() {
        let yaml = "keyspace: k\ntable: t\ncolumns:\n  - { name: a, type: int }\n  - { name: b, type: int }\nrows:\n  - [1]\n";
        let fixture = ResultSetFixture::from_yaml_str(yaml).unwrap();
        assert!(fixture.rows().is_err());
    }

    #[test]
    fn udt_fields_default_to_null() {
        let ty: DataType = serde_yaml::from_str(
            "udt: address\nfields:\n  - { name: street, type: text }\n  - { name: zip, type: int }\n",
        )
        .unwrap();
        let raw: YamlValue = serde_yaml::from_str("{ street: Main }").unwrap();
        let value = coerce(&raw, &ty).unwrap().unwrap();
        assert_eq!(value.to_string(), "{street: 'Main', zip: null}");
    }
}
