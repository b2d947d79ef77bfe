//! Named-field record decoding.
//!
//! A record type describes itself through an explicit field list (declared
//! name, transformed column name, decoder), built once per
//! [`RecordDecoder`]. Decoding looks every field up by its column name in a
//! [`FieldSource`]: the row itself at the top level, or the fields of a
//! user-defined type value for a nested record. Lookups never depend on the
//! cursor, so a record decodes the same wherever it sits in a composition.
//!
//! Records are declared with the [`record!`](crate::record!) macro:
//!
//! ```
//! use row_decoder::{record, naming::Configuration, resolve::Decode};
//!
//! #[derive(Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! record!(Person { name: String, age: Option<i32> });
//!
//! let decoder = Person::decoder(&Configuration::default());
//! assert_eq!(decoder.descriptors()[1].column, "age");
//! ```

use log::debug;

use crate::{
    data::{UdtValue, Value},
    decoder::{Decoder, decode_cell, decode_component},
    error::{DecodeError, ExtractionError},
    naming::Configuration,
    row::Row,
    schema::{DataType, NativeClass, UdtType},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub column: String,
    pub type_name: String,
    /// Cells the field's decoder consumes when used positionally.
    pub width: usize,
}

/// Where named fields are looked up.
pub trait FieldSource {
    type Error;

    fn field<D: Decoder>(&self, column: &str, decoder: &D) -> Result<D::Output, Self::Error>;
}

/// Top-level lookup: fields are columns of the row.
pub struct RowFields<'r> {
    row: &'r Row,
    record: &'static str,
}

impl<'r> RowFields<'r> {
    pub fn new(row: &'r Row, record: &'static str) -> Self {
        Self { row, record }
    }
}

impl FieldSource for RowFields<'_> {
    type Error = DecodeError;

    fn field<D: Decoder>(&self, column: &str, decoder: &D) -> Result<D::Output, DecodeError> {
        let index = self.row.index_of(column).ok_or_else(|| {
            let schema = self.row.schema();
            DecodeError::missing_column(
                schema.keyspace(),
                schema.table(),
                column,
                self.record,
                schema.columns().iter().map(|c| c.name.as_str()),
            )
        })?;
        decode_cell(decoder, self.row, self.row.cell(index)?)
    }
}

/// Nested lookup: fields of a user-defined type value.
pub struct UdtFields<'v> {
    value: &'v UdtValue,
    declared: &'v UdtType,
    record: &'static str,
}

impl<'v> UdtFields<'v> {
    pub fn new(value: &'v UdtValue, declared: &'v UdtType, record: &'static str) -> Self {
        Self {
            value,
            declared,
            record,
        }
    }
}

impl FieldSource for UdtFields<'_> {
    type Error = ExtractionError;

    fn field<D: Decoder>(&self, column: &str, decoder: &D) -> Result<D::Output, ExtractionError> {
        let missing = || ExtractionError::MissingField {
            field: column.to_string(),
            nested_type: self.record.to_string(),
        };
        let declared = self.declared.field_type(column).ok_or_else(missing)?;
        let value = self.value.field(column).ok_or_else(missing)?;
        decode_component(decoder, column, value, declared, self.record)
    }
}

/// One field of a record: its declared name, the column it maps to, and the
/// decoder for its type.
pub struct NamedField<D> {
    name: &'static str,
    column: String,
    decoder: D,
}

impl<D: Decoder> NamedField<D> {
    pub fn new(name: &'static str, decoder: D, config: &Configuration) -> Self {
        Self {
            name,
            column: config.column_name(name).into_owned(),
            decoder,
        }
    }

    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name,
            column: self.column.clone(),
            type_name: self.decoder.type_name(),
            width: self.decoder.width(),
        }
    }

    pub fn decode<S: FieldSource>(&self, source: &S) -> Result<D::Output, S::Error> {
        source.field(&self.column, &self.decoder)
    }
}

/// A domain type decoded field by field. Implemented by [`record!`](crate::record!).
pub trait Record: Sized + 'static {
    const TYPE_NAME: &'static str;
    type Fields: Send + Sync;

    fn fields(config: &Configuration) -> Self::Fields;

    fn descriptors(fields: &Self::Fields) -> Vec<FieldDescriptor>;

    /// Builds the record from `source`, decoding fields in declaration order
    /// and stopping at the first failure.
    fn build<S: FieldSource>(fields: &Self::Fields, source: &S) -> Result<Self, S::Error>;
}

pub struct RecordDecoder<R: Record> {
    fields: R::Fields,
    descriptors: Vec<FieldDescriptor>,
}

impl<R: Record> RecordDecoder<R> {
    pub fn new(config: &Configuration) -> Self {
        let fields = R::fields(config);
        let descriptors = R::descriptors(&fields);
        debug!(
            "Built decoder for {} with {} field(s): {}",
            R::TYPE_NAME,
            descriptors.len(),
            descriptors
                .iter()
                .map(|d| format!("{} -> {}", d.name, d.column))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self {
            fields,
            descriptors,
        }
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn decode_row(&self, row: &Row) -> Result<R, DecodeError> {
        R::build(&self.fields, &RowFields::new(row, R::TYPE_NAME))
    }

    pub fn decode_udt(&self, value: &UdtValue, declared: &UdtType) -> Result<R, ExtractionError> {
        R::build(&self.fields, &UdtFields::new(value, declared, R::TYPE_NAME))
    }
}

impl<R: Record> Decoder for RecordDecoder<R> {
    type Output = R;

    fn type_name(&self) -> String {
        R::TYPE_NAME.to_string()
    }

    fn native_class(&self) -> NativeClass {
        NativeClass::Udt
    }

    fn width(&self) -> usize {
        self.descriptors.iter().map(|d| d.width).sum()
    }

    fn from_value(&self, value: &Value, declared: &DataType) -> Result<R, ExtractionError> {
        match (value, declared) {
            (Value::Udt(udt), DataType::Udt(udt_type)) => self.decode_udt(udt, udt_type),
            _ => Err(ExtractionError::mismatch(
                format!("{} user-defined type", R::TYPE_NAME),
                declared,
            )),
        }
    }

    /// Absent when every field's column is present and null. The cursor is
    /// not consulted.
    fn is_absent(&self, row: &Row, _index: usize) -> Result<bool, DecodeError> {
        Ok(self.descriptors.iter().all(|d| {
            row.index_of(&d.column)
                .is_some_and(|index| row.is_null(index))
        }))
    }

    fn decode_unchecked(&self, row: &Row, _index: usize) -> Result<R, DecodeError> {
        self.decode_row(row)
    }

    fn decode(&self, row: &Row, _index: usize) -> Result<R, DecodeError> {
        self.decode_row(row)
    }
}

/// Implements [`Record`] and [`Decode`](crate::resolve::Decode) for a struct
/// with named fields.
///
/// Each field resolves its decoder from its type. A field may instead name an
/// explicit decoder expression, e.g. one built around a custom element mapper:
///
/// ```ignore
/// record!(Order { id: Uuid, tags: Vec<Tag> = ListDecoder::new(TagMapper) });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident { $($field:ident : $fty:ty $(= $dec:expr)?),+ $(,)? }) => {
        impl $crate::record::Record for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            type Fields = ($($crate::record::NamedField<$crate::record!(@decoder_type $fty $(, $dec)?)>,)+);

            fn fields(config: &$crate::naming::Configuration) -> Self::Fields {
                ($(
                    $crate::record::NamedField::new(
                        stringify!($field),
                        $crate::record!(@decoder config, $fty $(, $dec)?),
                        config,
                    ),
                )+)
            }

            #[allow(non_snake_case)]
            fn descriptors(
                fields: &Self::Fields,
            ) -> ::std::vec::Vec<$crate::record::FieldDescriptor> {
                let ($($field,)+) = fields;
                ::std::vec![$($field.descriptor()),+]
            }

            #[allow(non_snake_case)]
            fn build<S: $crate::record::FieldSource>(
                fields: &Self::Fields,
                source: &S,
            ) -> ::core::result::Result<Self, S::Error> {
                let ($($field,)+) = fields;
                $(let $field = $field.decode(source)?;)+
                ::core::result::Result::Ok($ty { $($field),+ })
            }
        }

        impl $crate::resolve::Decode for $ty {
            type Decoder = $crate::record::RecordDecoder<$ty>;
            const STRATEGY: $crate::resolve::Strategy = $crate::resolve::Strategy::Record;

            fn decoder(config: &$crate::naming::Configuration) -> Self::Decoder {
                $crate::record::RecordDecoder::new(config)
            }
        }
    };
    (@decoder_type $fty:ty) => {
        <$fty as $crate::resolve::Decode>::Decoder
    };
    (@decoder_type $fty:ty, $dec:expr) => {
        ::std::boxed::Box<dyn $crate::decoder::Decoder<Output = $fty>>
    };
    (@decoder $config:ident, $fty:ty) => {
        <$fty as $crate::resolve::Decode>::decoder($config)
    };
    (@decoder $config:ident, $fty:ty, $dec:expr) => {
        ::std::boxed::Box::new($dec) as ::std::boxed::Box<dyn $crate::decoder::Decoder<Output = $fty>>
    };
}
