//! Raw per-type extraction from native cell values.
//!
//! | Rust type        | Declared type(s)                     |
//! |------------------|--------------------------------------|
//! | `bool`           | boolean                              |
//! | `i8` .. `i64`    | tinyint, smallint, int, bigint       |
//! | `f32`            | float                                |
//! | `f64`            | float, double                        |
//! | `String`         | text                                 |
//! | `Decimal`        | decimal                              |
//! | `NaiveDate`      | date                                 |
//! | `NaiveTime`      | time                                 |
//! | `NaiveDateTime`  | timestamp                            |
//! | `Uuid`           | uuid                                 |
//! | [`Blob`]         | blob                                 |
//! | [`Value`]        | any                                  |
//!
//! Integer targets accept every integer cell whose value fits; a value that
//! does not fit is [`ExtractionError::OutOfRange`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    data::Value,
    error::ExtractionError,
    schema::{DataType, NativeClass},
};

/// Converts a non-null native value into `Self`.
pub trait FromNative: Sized {
    const TYPE_NAME: &'static str;
    const NATIVE: NativeClass;

    fn from_native(value: &Value, declared: &DataType) -> Result<Self, ExtractionError>;

    /// Whether a cell of this native class can be extracted as `Self`.
    fn accepts(class: NativeClass) -> bool {
        Self::NATIVE.accepts(class)
    }
}

/// Binary payload of a `blob` cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Blob(pub Vec<u8>);

fn mismatch<T: FromNative>(value: &Value, declared: &DataType) -> ExtractionError {
    ExtractionError::mismatch(
        T::TYPE_NAME,
        format!("{declared} value {}", value.as_display()),
    )
}

macro_rules! integer_from_native {
    ($($ty:ty => $name:literal, $native:ident);+ $(;)?) => {
        $(
            impl FromNative for $ty {
                const TYPE_NAME: &'static str = $name;
                const NATIVE: NativeClass = NativeClass::$native;

                fn from_native(value: &Value, declared: &DataType) -> Result<Self, ExtractionError> {
                    let wide: i64 = match value {
                        Value::TinyInt(i) => i64::from(*i),
                        Value::SmallInt(i) => i64::from(*i),
                        Value::Int(i) => i64::from(*i),
                        Value::BigInt(i) => *i,
                        other => return Err(mismatch::<Self>(other, declared)),
                    };
                    <$ty>::try_from(wide).map_err(|_| ExtractionError::OutOfRange {
                        value: wide.to_string(),
                        target: $name,
                    })
                }

                fn accepts(class: NativeClass) -> bool {
                    matches!(
                        class,
                        NativeClass::TinyInt
                            | NativeClass::SmallInt
                            | NativeClass::Int
                            | NativeClass::BigInt
                            | NativeClass::Any
                    )
                }
            }
        )+
    };
}

integer_from_native! {
    i8 => "i8", TinyInt;
    i16 => "i16", SmallInt;
    i32 => "i32", Int;
    i64 => "i64", BigInt;
}

macro_rules! exact_from_native {
    ($($ty:ty => $name:literal, $variant:ident, |$v:ident| $convert:expr);+ $(;)?) => {
        $(
            impl FromNative for $ty {
                const TYPE_NAME: &'static str = $name;
                const NATIVE: NativeClass = NativeClass::$variant;

                fn from_native(value: &Value, declared: &DataType) -> Result<Self, ExtractionError> {
                    match value {
                        Value::$variant($v) => Ok($convert),
                        other => Err(mismatch::<Self>(other, declared)),
                    }
                }
            }
        )+
    };
}

exact_from_native! {
    bool => "bool", Boolean, |v| *v;
    f32 => "f32", Float, |v| *v;
    String => "String", Text, |v| v.clone();
    Decimal => "Decimal", Decimal, |v| *v;
    NaiveDate => "NaiveDate", Date, |v| *v;
    NaiveTime => "NaiveTime", Time, |v| *v;
    NaiveDateTime => "NaiveDateTime", Timestamp, |v| *v;
    Uuid => "Uuid", Uuid, |v| *v;
    Blob => "Blob", Blob, |v| Blob(v.clone());
}

impl FromNative for f64 {
    const TYPE_NAME: &'static str = "f64";
    const NATIVE: NativeClass = NativeClass::Double;

    fn from_native(value: &Value, declared: &DataType) -> Result<Self, ExtractionError> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(f64::from(*v)),
            other => Err(mismatch::<Self>(other, declared)),
        }
    }

    fn accepts(class: NativeClass) -> bool {
        matches!(
            class,
            NativeClass::Float | NativeClass::Double | NativeClass::Any
        )
    }
}

impl FromNative for Value {
    const TYPE_NAME: &'static str = "Value";
    const NATIVE: NativeClass = NativeClass::Any;

    fn from_native(value: &Value, _declared: &DataType) -> Result<Self, ExtractionError> {
        Ok(value.clone())
    }
}
