use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::schema::{DataType, NativeClass};

/// A non-null cell value in the representation the driver hands out.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
    Blob(Vec<u8>),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Option<Value>>),
    Udt(UdtValue),
}

/// A user-defined type value. Fields keep their declared order and may be null.
#[derive(Debug, Clone, PartialEq)]
pub struct UdtValue {
    pub type_name: String,
    pub fields: Vec<(String, Option<Value>)>,
}

impl UdtValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Option<Value>) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// `None` when the field is not declared; `Some(None)` when it is null.
    pub fn field(&self, name: &str) -> Option<Option<&Value>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_ref())
    }
}

impl Value {
    pub fn native_class(&self) -> NativeClass {
        match self {
            Value::Text(_) => NativeClass::Text,
            Value::Boolean(_) => NativeClass::Boolean,
            Value::TinyInt(_) => NativeClass::TinyInt,
            Value::SmallInt(_) => NativeClass::SmallInt,
            Value::Int(_) => NativeClass::Int,
            Value::BigInt(_) => NativeClass::BigInt,
            Value::Float(_) => NativeClass::Float,
            Value::Double(_) => NativeClass::Double,
            Value::Decimal(_) => NativeClass::Decimal,
            Value::Date(_) => NativeClass::Date,
            Value::Time(_) => NativeClass::Time,
            Value::Timestamp(_) => NativeClass::Timestamp,
            Value::Uuid(_) => NativeClass::Uuid,
            Value::Blob(_) => NativeClass::Blob,
            Value::List(_) => NativeClass::List,
            Value::Set(_) => NativeClass::Set,
            Value::Map(_) => NativeClass::Map,
            Value::Tuple(_) => NativeClass::Tuple,
            Value::Udt(_) => NativeClass::Udt,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::TinyInt(i) => i.to_string(),
            Value::SmallInt(i) => i.to_string(),
            Value::Int(i) => i.to_string(),
            Value::BigInt(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Double(f) => f.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S").to_string(),
            Value::Timestamp(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Uuid(g) => g.to_string(),
            Value::Blob(bytes) => format!(
                "0x{}",
                bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
            ),
            Value::List(items) => format!("[{}]", items.iter().map(Value::quoted).join(", ")),
            Value::Set(items) => format!("{{{}}}", items.iter().map(Value::quoted).join(", ")),
            Value::Map(entries) => format!(
                "{{{}}}",
                entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.quoted(), v.quoted()))
                    .join(", ")
            ),
            Value::Tuple(components) => format!(
                "({})",
                components.iter().map(|c| display_cell(c.as_ref())).join(", ")
            ),
            Value::Udt(udt) => format!(
                "{{{}}}",
                udt.fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", display_cell(value.as_ref())))
                    .join(", ")
            ),
        }
    }

    fn quoted(&self) -> String {
        match self {
            Value::Text(s) => format!("'{s}'"),
            other => other.as_display(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Renders a possibly-null cell the way diagnostics show it.
pub fn display_cell(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.quoted(),
        None => "null".to_string(),
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%d %H:%M",
    ];
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as timestamp"))
}

pub fn parse_naive_time(value: &str) -> Result<NaiveTime> {
    const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as time"))
}

/// Parses the textual form of a primitive cell into its declared native type.
pub fn parse_primitive(value: &str, ty: &DataType) -> Result<Value> {
    let parsed = match ty {
        DataType::Text => Value::Text(value.to_string()),
        DataType::Boolean => match value.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Value::Boolean(true),
            "false" | "f" | "no" | "0" => Value::Boolean(false),
            _ => bail!("Failed to parse '{value}' as boolean"),
        },
        DataType::TinyInt => Value::TinyInt(
            value
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as tinyint"))?,
        ),
        DataType::SmallInt => Value::SmallInt(
            value
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as smallint"))?,
        ),
        DataType::Int => Value::Int(
            value
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as int"))?,
        ),
        DataType::BigInt => Value::BigInt(
            value
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as bigint"))?,
        ),
        DataType::Float => Value::Float(
            value
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as float"))?,
        ),
        DataType::Double => Value::Double(
            value
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as double"))?,
        ),
        DataType::Decimal => Value::Decimal(
            value
                .parse::<Decimal>()
                .with_context(|| format!("Failed to parse '{value}' as decimal"))?,
        ),
        DataType::Date => Value::Date(parse_naive_date(value)?),
        DataType::Time => Value::Time(parse_naive_time(value)?),
        DataType::Timestamp => Value::Timestamp(parse_naive_datetime(value)?),
        DataType::Uuid => {
            let trimmed = value.trim().trim_matches(|c| matches!(c, '{' | '}'));
            Value::Uuid(
                Uuid::parse_str(trimmed)
                    .with_context(|| format!("Failed to parse '{value}' as uuid"))?,
            )
        }
        DataType::Blob => {
            let hex = value.strip_prefix("0x").unwrap_or(value);
            if hex.len() % 2 != 0 {
                bail!("Blob literal '{value}' has an odd number of hex digits");
            }
            let bytes = (0..hex.len())
                .step_by(2)
                .map(|idx| u8::from_str_radix(&hex[idx..idx + 2], 16))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Failed to parse '{value}' as blob"))?;
            Value::Blob(bytes)
        }
        other => bail!("Column type {other} has no textual form"),
    };
    Ok(parsed)
}
