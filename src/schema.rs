//! Declared column types and result-set metadata.
//!
//! [`DataType`] describes what a column declares (including element, key,
//! value, tuple component and user-defined type field descriptors),
//! [`NativeClass`] names the native representation a cell is held in, and
//! [`ColumnDefinition`] / [`ResultSchema`] carry the per-column metadata that
//! every row of one query result shares.
//!
//! Column metadata is never consulted to decode a value by position; it is
//! used for lookups by name and to give decode failures their context.

use std::{fmt, str::FromStr, sync::Arc};

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// The native representation a driver hands out for a cell or element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeClass {
    Text,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Timestamp,
    Uuid,
    Blob,
    List,
    Set,
    Map,
    Tuple,
    Udt,
    /// Accepts every native representation.
    Any,
}

impl NativeClass {
    pub fn accepts(self, other: NativeClass) -> bool {
        self == NativeClass::Any || other == NativeClass::Any || self == other
    }
}

impl fmt::Display for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A user-defined type: a named set of named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtType {
    pub name: String,
    pub fields: Vec<(String, DataType)>,
}

impl UdtType {
    pub fn new(name: impl Into<String>, fields: Vec<(String, DataType)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field_type(&self, name: &str) -> Option<&DataType> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Text,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Timestamp,
    Uuid,
    Blob,
    List(Box<DataType>),
    Set(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    Tuple(Vec<DataType>),
    Udt(UdtType),
}

impl DataType {
    pub fn list(element: DataType) -> Self {
        DataType::List(Box::new(element))
    }

    pub fn set(element: DataType) -> Self {
        DataType::Set(Box::new(element))
    }

    pub fn map(key: DataType, value: DataType) -> Self {
        DataType::Map(Box::new(key), Box::new(value))
    }

    pub fn native_class(&self) -> NativeClass {
        match self {
            DataType::Text => NativeClass::Text,
            DataType::Boolean => NativeClass::Boolean,
            DataType::TinyInt => NativeClass::TinyInt,
            DataType::SmallInt => NativeClass::SmallInt,
            DataType::Int => NativeClass::Int,
            DataType::BigInt => NativeClass::BigInt,
            DataType::Float => NativeClass::Float,
            DataType::Double => NativeClass::Double,
            DataType::Decimal => NativeClass::Decimal,
            DataType::Date => NativeClass::Date,
            DataType::Time => NativeClass::Time,
            DataType::Timestamp => NativeClass::Timestamp,
            DataType::Uuid => NativeClass::Uuid,
            DataType::Blob => NativeClass::Blob,
            DataType::List(_) => NativeClass::List,
            DataType::Set(_) => NativeClass::Set,
            DataType::Map(_, _) => NativeClass::Map,
            DataType::Tuple(_) => NativeClass::Tuple,
            DataType::Udt(_) => NativeClass::Udt,
        }
    }

    /// Element descriptor of a declared list or set.
    pub fn element_type(&self) -> Option<&DataType> {
        match self {
            DataType::List(element) | DataType::Set(element) => Some(element),
            _ => None,
        }
    }

    /// Key and value descriptors of a declared map.
    pub fn entry_types(&self) -> Option<(&DataType, &DataType)> {
        match self {
            DataType::Map(key, value) => Some((key, value)),
            _ => None,
        }
    }

    fn primitive_token(&self) -> Option<&'static str> {
        Some(match self {
            DataType::Text => "text",
            DataType::Boolean => "boolean",
            DataType::TinyInt => "tinyint",
            DataType::SmallInt => "smallint",
            DataType::Int => "int",
            DataType::BigInt => "bigint",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Decimal => "decimal",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Timestamp => "timestamp",
            DataType::Uuid => "uuid",
            DataType::Blob => "blob",
            _ => return None,
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(token) = self.primitive_token() {
            return f.write_str(token);
        }
        match self {
            DataType::List(element) => write!(f, "list<{element}>"),
            DataType::Set(element) => write!(f, "set<{element}>"),
            DataType::Map(key, value) => write!(f, "map<{key}, {value}>"),
            DataType::Tuple(components) => {
                f.write_str("tuple<")?;
                for (idx, component) in components.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{component}")?;
                }
                f.write_str(">")
            }
            DataType::Udt(udt) => write!(f, "frozen<{}>", udt.name),
            _ => Ok(()),
        }
    }
}

impl FromStr for DataType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let primitive = match lowered.as_str() {
            "text" | "varchar" | "ascii" | "string" => Some(DataType::Text),
            "boolean" | "bool" => Some(DataType::Boolean),
            "tinyint" => Some(DataType::TinyInt),
            "smallint" => Some(DataType::SmallInt),
            "int" | "integer" => Some(DataType::Int),
            "bigint" | "counter" => Some(DataType::BigInt),
            "float" => Some(DataType::Float),
            "double" => Some(DataType::Double),
            "decimal" => Some(DataType::Decimal),
            "date" => Some(DataType::Date),
            "time" => Some(DataType::Time),
            "timestamp" | "datetime" => Some(DataType::Timestamp),
            "uuid" | "timeuuid" => Some(DataType::Uuid),
            "blob" => Some(DataType::Blob),
            _ => None,
        };
        if let Some(primitive) = primitive {
            return Ok(primitive);
        }

        let (head, inner) = split_parameterized(trimmed)
            .ok_or_else(|| anyhow!("Unsupported column type '{trimmed}'"))?;
        let params = split_top_level(inner)
            .into_iter()
            .map(DataType::from_str)
            .collect::<Result<Vec<_>>>()?;
        match (head.to_ascii_lowercase().as_str(), params.as_slice()) {
            ("list", [element]) => Ok(DataType::list(element.clone())),
            ("set", [element]) => Ok(DataType::set(element.clone())),
            ("map", [key, value]) => Ok(DataType::map(key.clone(), value.clone())),
            ("frozen", [inner]) => Ok(inner.clone()),
            ("tuple", components) if !components.is_empty() => {
                Ok(DataType::Tuple(components.to_vec()))
            }
            (other, params) => bail!(
                "Unsupported column type '{other}' with {} parameter(s)",
                params.len()
            ),
        }
    }
}

fn split_parameterized(value: &str) -> Option<(&str, &str)> {
    let open = value.find('<')?;
    let inner = value[open + 1..].strip_suffix('>')?;
    Some((value[..open].trim(), inner))
}

fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in value.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(value[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts
}

#[derive(Serialize, Deserialize)]
struct UdtRepr {
    udt: String,
    fields: Vec<UdtFieldRepr>,
}

#[derive(Serialize, Deserialize)]
struct UdtFieldRepr {
    name: String,
    #[serde(rename = "type")]
    data_type: DataType,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DataTypeRepr {
    Token(String),
    Udt(UdtRepr),
}

impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataType::Udt(udt) => UdtRepr {
                udt: udt.name.clone(),
                fields: udt
                    .fields
                    .iter()
                    .map(|(name, data_type)| UdtFieldRepr {
                        name: name.clone(),
                        data_type: data_type.clone(),
                    })
                    .collect(),
            }
            .serialize(serializer),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match DataTypeRepr::deserialize(deserializer)? {
            DataTypeRepr::Token(token) => {
                DataType::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
            }
            DataTypeRepr::Udt(repr) => Ok(DataType::Udt(UdtType::new(
                repr.udt,
                repr.fields
                    .into_iter()
                    .map(|field| (field.name, field.data_type))
                    .collect(),
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub index: usize,
    pub keyspace: String,
    pub table: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

/// Column metadata shared by every row of one query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSchema {
    keyspace: String,
    table: String,
    columns: Vec<ColumnDefinition>,
}

impl ResultSchema {
    pub fn new(
        keyspace: impl Into<String>,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = (String, DataType)>,
    ) -> Arc<Self> {
        let keyspace = keyspace.into();
        let table = table.into();
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(index, (name, data_type))| ColumnDefinition {
                name,
                index,
                keyspace: keyspace.clone(),
                table: table.clone(),
                data_type,
            })
            .collect();
        Arc::new(Self {
            keyspace,
            table,
            columns,
        })
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
