//! Positional tuple decoders, arity 1 through 22.
//!
//! A tuple of decoders decodes consecutive cells starting at the requested
//! index, in component order, threading the cursor so a nested tuple
//! component consumes its own width. Components decide null handling
//! individually: only an [`Optional`](crate::decoder::Optional) component
//! tolerates a null cell.
//!
//! Used as a single cell (a `tuple<...>` column or a tuple-typed UDT field) the
//! same decoder maps the tuple value's components in order.

use crate::{
    data::Value,
    decoder::{Decoder, decode_component},
    error::{DecodeError, ExtractionError},
    naming::Configuration,
    resolve::{Decode, Strategy},
    row::Row,
    schema::{DataType, NativeClass},
};

fn tuple_parts<'v>(
    value: &'v Value,
    declared: &'v DataType,
    arity: usize,
) -> Result<(&'v [Option<Value>], &'v [DataType]), ExtractionError> {
    match (value, declared) {
        (Value::Tuple(components), DataType::Tuple(types))
            if components.len() == arity && types.len() == arity =>
        {
            Ok((components, types))
        }
        _ => Err(ExtractionError::mismatch(
            format!("tuple of {arity} component(s)"),
            declared,
        )),
    }
}

/// Decodes the component at `*position` of a tuple value and moves past it.
fn component<D: Decoder>(
    decoder: &D,
    components: &[Option<Value>],
    types: &[DataType],
    position: &mut usize,
    enclosing: &str,
) -> Result<D::Output, ExtractionError> {
    let at = *position;
    *position += 1;
    decode_component(
        decoder,
        &at.to_string(),
        components[at].as_ref(),
        &types[at],
        enclosing,
    )
}

fn advance<D: Decoder>(decoder: &D, row: &Row, cursor: &mut usize) -> Result<D::Output, DecodeError> {
    let (value, next) = decoder.decode_next(row, *cursor)?;
    *cursor = next;
    Ok(value)
}

fn advance_unchecked<D: Decoder>(
    decoder: &D,
    row: &Row,
    cursor: &mut usize,
) -> Result<D::Output, DecodeError> {
    let (value, next) = decoder.decode_next_unchecked(row, *cursor)?;
    *cursor = next;
    Ok(value)
}

fn absent_at<D: Decoder>(decoder: &D, row: &Row, cursor: &mut usize) -> Result<bool, DecodeError> {
    let absent = decoder.is_absent(row, *cursor)?;
    *cursor += decoder.width();
    Ok(absent)
}

macro_rules! tuple_decoder {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Decoder),+> Decoder for ($($ty,)+) {
            type Output = ($($ty::Output,)+);

            fn type_name(&self) -> String {
                let ($($var,)+) = self;
                let names: Vec<String> = vec![$($var.type_name()),+];
                format!("({})", names.join(", "))
            }

            fn native_class(&self) -> NativeClass {
                NativeClass::Tuple
            }

            fn width(&self) -> usize {
                let ($($var,)+) = self;
                0 $(+ $var.width())+
            }

            fn from_value(
                &self,
                value: &Value,
                declared: &DataType,
            ) -> Result<Self::Output, ExtractionError> {
                let arity = [$(stringify!($var)),+].len();
                let (components, types) = tuple_parts(value, declared, arity)?;
                let enclosing = self.type_name();
                let mut position = 0usize;
                let ($($var,)+) = self;
                Ok(($(component($var, components, types, &mut position, &enclosing)?,)+))
            }

            /// Absent only when every component is absent.
            fn is_absent(&self, row: &Row, index: usize) -> Result<bool, DecodeError> {
                let mut cursor = index;
                let ($($var,)+) = self;
                Ok(true $(&& absent_at($var, row, &mut cursor)?)+)
            }

            fn decode_unchecked(
                &self,
                row: &Row,
                index: usize,
            ) -> Result<Self::Output, DecodeError> {
                let mut cursor = index;
                let ($($var,)+) = self;
                Ok(($(advance_unchecked($var, row, &mut cursor)?,)+))
            }

            fn decode(&self, row: &Row, index: usize) -> Result<Self::Output, DecodeError> {
                let mut cursor = index;
                let ($($var,)+) = self;
                Ok(($(advance($var, row, &mut cursor)?,)+))
            }
        }

        impl<$($ty: Decode),+> Decode for ($($ty,)+) {
            type Decoder = ($($ty::Decoder,)+);
            const STRATEGY: Strategy = Strategy::Tuple;

            fn decoder(config: &Configuration) -> Self::Decoder {
                ($($ty::decoder(config),)+)
            }
        }
    };
}

tuple_decoder!(A a);
tuple_decoder!(A a, B b);
tuple_decoder!(A a, B b, C c);
tuple_decoder!(A a, B b, C c, D d);
tuple_decoder!(A a, B b, C c, D d, E e);
tuple_decoder!(A a, B b, C c, D d, E e, F f);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o);
tuple_decoder!(A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p);
tuple_decoder!(
    A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q
);
tuple_decoder!(
    A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q, R r
);
tuple_decoder!(
    A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q, R r,
    S s
);
tuple_decoder!(
    A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q, R r,
    S s, T t
);
tuple_decoder!(
    A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q, R r,
    S s, T t, U u
);
tuple_decoder!(
    A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l, M m, N n, O o, P p, Q q, R r,
    S s, T t, U u, V v
);
