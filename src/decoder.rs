//! Decoders: reusable strategies turning row cells into domain values.
//!
//! Every decoder has two entry points. [`Decoder::decode`] is the safe one: it
//! checks the cell for null first and reports
//! [`DecodeError::UnexpectedNullInColumn`] unless the decoder tolerates
//! absence. [`Decoder::decode_unchecked`] assumes the cell is non-null and goes
//! straight to extraction; composites call it once they have established that
//! themselves. A null reaching the unchecked path is an extraction failure,
//! never a default value.
//!
//! Positional decoders consume [`Decoder::width`] consecutive cells;
//! [`Decoder::decode_next`] threads the cursor through compositions.

use std::marker::PhantomData;

use crate::{
    data::Value,
    error::{DecodeError, ExtractionError},
    native::FromNative,
    row::{Cell, Row},
    schema::{DataType, NativeClass},
};

pub trait Decoder: Send + Sync {
    type Output;

    /// Name of the decoded type, used in error messages.
    fn type_name(&self) -> String;

    /// Native representation this decoder extracts from.
    fn native_class(&self) -> NativeClass;

    fn accepts(&self, declared: &DataType) -> bool {
        self.native_class().accepts(declared.native_class())
    }

    /// Number of cells consumed when used positionally.
    fn width(&self) -> usize {
        1
    }

    /// Converts one non-null native value.
    fn from_value(&self, value: &Value, declared: &DataType)
    -> Result<Self::Output, ExtractionError>;

    /// The value a null cell decodes to, for decoders that tolerate absence.
    fn absent(&self) -> Option<Self::Output> {
        None
    }

    /// Whether the value this decoder would read at `index` is missing. A
    /// positional decoder looks at the cell under the cursor; decoders that
    /// find their cells some other way override this.
    fn is_absent(&self, row: &Row, index: usize) -> Result<bool, DecodeError> {
        Ok(row.cell(index)?.is_null())
    }

    fn decode_unchecked(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
        let cell = row.cell(index)?;
        cell.value
            .ok_or(ExtractionError::Null)
            .and_then(|value| self.from_value(value, cell.data_type()))
            .map_err(|err| lift(self, row, cell, err))
    }

    fn decode(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
        let cell = row.cell(index)?;
        if cell.is_null() {
            return self.absent().ok_or_else(|| {
                DecodeError::unexpected_null(cell.column, self.type_name(), row.formatted_contents())
            });
        }
        self.decode_unchecked(row, index)
    }

    /// Safe decode at `cursor`, returning the value and the next cursor.
    fn decode_next(&self, row: &Row, cursor: usize) -> Result<(Self::Output, usize), DecodeError> {
        let value = self.decode(row, cursor)?;
        Ok((value, cursor + self.width()))
    }

    fn decode_next_unchecked(
        &self,
        row: &Row,
        cursor: usize,
    ) -> Result<(Self::Output, usize), DecodeError> {
        let value = self.decode_unchecked(row, cursor)?;
        Ok((value, cursor + self.width()))
    }

    /// Post-processes every decoded value with `f`.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U + Send + Sync,
    {
        Map { inner: self, f }
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Output = D::Output;

    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn native_class(&self) -> NativeClass {
        (**self).native_class()
    }

    fn accepts(&self, declared: &DataType) -> bool {
        (**self).accepts(declared)
    }

    fn width(&self) -> usize {
        (**self).width()
    }

    fn from_value(
        &self,
        value: &Value,
        declared: &DataType,
    ) -> Result<Self::Output, ExtractionError> {
        (**self).from_value(value, declared)
    }

    fn absent(&self) -> Option<Self::Output> {
        (**self).absent()
    }

    fn is_absent(&self, row: &Row, index: usize) -> Result<bool, DecodeError> {
        (**self).is_absent(row, index)
    }

    fn decode_unchecked(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
        (**self).decode_unchecked(row, index)
    }

    fn decode(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
        (**self).decode(row, index)
    }
}

fn lift<D: Decoder + ?Sized>(decoder: &D, row: &Row, cell: Cell<'_>, err: ExtractionError) -> DecodeError {
    DecodeError::from_extraction(
        cell.column,
        decoder.type_name(),
        || row.formatted_contents(),
        err,
    )
}

/// Safe decode of exactly one cell, regardless of the decoder's positional
/// width. Named lookups go through here.
pub fn decode_cell<D: Decoder + ?Sized>(
    decoder: &D,
    row: &Row,
    cell: Cell<'_>,
) -> Result<D::Output, DecodeError> {
    match cell.value {
        None => decoder.absent().ok_or_else(|| {
            DecodeError::unexpected_null(cell.column, decoder.type_name(), row.formatted_contents())
        }),
        Some(value) => decoder
            .from_value(value, cell.data_type())
            .map_err(|err| lift(decoder, row, cell, err)),
    }
}

/// Decodes one component of a nested value (a UDT field or tuple element).
/// A null the decoder does not tolerate becomes [`ExtractionError::NullField`]
/// naming `field` and the enclosing type.
pub(crate) fn decode_component<D: Decoder + ?Sized>(
    decoder: &D,
    field: &str,
    value: Option<&Value>,
    declared: &DataType,
    enclosing: &str,
) -> Result<D::Output, ExtractionError> {
    match value {
        None => decoder.absent().ok_or_else(|| ExtractionError::NullField {
            path: vec![field.to_string()],
            nested_type: enclosing.to_string(),
            expected: decoder.type_name(),
        }),
        Some(value) => decoder
            .from_value(value, declared)
            .map_err(|err| err.within_field(field)),
    }
}

/// Single-cell decoder for a primitive type.
pub struct Scalar<T>(PhantomData<fn() -> T>);

impl<T> Scalar<T> {
    pub fn new() -> Self {
        Scalar(PhantomData)
    }
}

impl<T> Default for Scalar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Scalar<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for Scalar<T> {}

impl<T: FromNative> Decoder for Scalar<T> {
    type Output = T;

    fn type_name(&self) -> String {
        T::TYPE_NAME.to_string()
    }

    fn native_class(&self) -> NativeClass {
        T::NATIVE
    }

    fn accepts(&self, declared: &DataType) -> bool {
        T::accepts(declared.native_class())
    }

    fn from_value(&self, value: &Value, declared: &DataType) -> Result<T, ExtractionError> {
        T::from_native(value, declared)
    }
}

/// Treats an absent value as `None` instead of failing.
///
/// Absence is decided by the inner decoder's [`Decoder::is_absent`]: the cell
/// under the cursor for single-cell decoders, every component cell for tuples,
/// and every field column for records. A value that is only partly null is
/// not absent and goes to the inner decoder, so a null in a later tuple
/// component fails as `UnexpectedNullInColumn` on the safe path and as an
/// extraction failure on the unchecked path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional<D>(pub D);

impl<D: Decoder> Decoder for Optional<D> {
    type Output = Option<D::Output>;

    fn type_name(&self) -> String {
        format!("Option<{}>", self.0.type_name())
    }

    fn native_class(&self) -> NativeClass {
        self.0.native_class()
    }

    fn accepts(&self, declared: &DataType) -> bool {
        self.0.accepts(declared)
    }

    fn width(&self) -> usize {
        self.0.width()
    }

    fn from_value(
        &self,
        value: &Value,
        declared: &DataType,
    ) -> Result<Self::Output, ExtractionError> {
        self.0.from_value(value, declared).map(Some)
    }

    fn absent(&self) -> Option<Self::Output> {
        Some(None)
    }

    fn is_absent(&self, row: &Row, index: usize) -> Result<bool, DecodeError> {
        self.0.is_absent(row, index)
    }

    fn decode_unchecked(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
        if self.0.is_absent(row, index)? {
            return Ok(None);
        }
        self.0.decode_unchecked(row, index).map(Some)
    }

    fn decode(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
        if self.0.is_absent(row, index)? {
            return Ok(None);
        }
        self.0.decode(row, index).map(Some)
    }
}

/// See [`Decoder::map`].
#[derive(Debug, Clone, Copy)]
pub struct Map<D, F> {
    inner: D,
    f: F,
}

impl<D, F, U> Decoder for Map<D, F>
where
    D: Decoder,
    F: Fn(D::Output) -> U + Send + Sync,
{
    type Output = U;

    fn type_name(&self) -> String {
        self.inner.type_name()
    }

    fn native_class(&self) -> NativeClass {
        self.inner.native_class()
    }

    fn accepts(&self, declared: &DataType) -> bool {
        self.inner.accepts(declared)
    }

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn from_value(&self, value: &Value, declared: &DataType) -> Result<U, ExtractionError> {
        self.inner.from_value(value, declared).map(&self.f)
    }

    fn absent(&self) -> Option<U> {
        self.inner.absent().map(&self.f)
    }

    fn is_absent(&self, row: &Row, index: usize) -> Result<bool, DecodeError> {
        self.inner.is_absent(row, index)
    }

    fn decode_unchecked(&self, row: &Row, index: usize) -> Result<U, DecodeError> {
        self.inner.decode_unchecked(row, index).map(&self.f)
    }

    fn decode(&self, row: &Row, index: usize) -> Result<U, DecodeError> {
        self.inner.decode(row, index).map(&self.f)
    }
}
