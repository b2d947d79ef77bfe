//! Collection decoders.
//!
//! A list, set or map cell is decoded by reading its native collection,
//! looking up the declared element (or key and value) type of the column, and
//! running an [`ElementMapper`] over every element. Any [`Decoder`] is an
//! element mapper; [`MapWith`] adapts a closure for element types the built-in
//! decoders do not cover.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::Hash,
    marker::PhantomData,
};

use crate::{
    data::Value,
    decoder::Decoder,
    error::ExtractionError,
    schema::{DataType, NativeClass},
};

/// Maps one native collection element to a domain value.
pub trait ElementMapper: Send + Sync {
    type Output;

    /// The native representation this mapper expects elements to arrive in.
    fn expected_native(&self) -> NativeClass;

    fn accepts_element(&self, element_type: &DataType) -> bool {
        self.expected_native()
            .accepts(element_type.native_class())
    }

    fn from_native(
        &self,
        value: &Value,
        element_type: &DataType,
    ) -> Result<Self::Output, ExtractionError>;

    fn describe(&self) -> String;
}

impl<D: Decoder> ElementMapper for D {
    type Output = D::Output;

    fn expected_native(&self) -> NativeClass {
        self.native_class()
    }

    fn accepts_element(&self, element_type: &DataType) -> bool {
        self.accepts(element_type)
    }

    fn from_native(
        &self,
        value: &Value,
        element_type: &DataType,
    ) -> Result<Self::Output, ExtractionError> {
        self.from_value(value, element_type)
    }

    fn describe(&self) -> String {
        self.type_name()
    }
}

/// Element mapper backed by a closure.
pub struct MapWith<F, T> {
    native: NativeClass,
    name: String,
    f: F,
    _output: PhantomData<fn() -> T>,
}

impl<F, T> MapWith<F, T>
where
    F: Fn(&Value, &DataType) -> Result<T, ExtractionError> + Send + Sync,
{
    pub fn new(native: NativeClass, name: impl Into<String>, f: F) -> Self {
        Self {
            native,
            name: name.into(),
            f,
            _output: PhantomData,
        }
    }
}

impl<F, T> ElementMapper for MapWith<F, T>
where
    F: Fn(&Value, &DataType) -> Result<T, ExtractionError> + Send + Sync,
{
    type Output = T;

    fn expected_native(&self) -> NativeClass {
        self.native
    }

    fn from_native(&self, value: &Value, element_type: &DataType) -> Result<T, ExtractionError> {
        if !self.native.accepts(value.native_class()) {
            return Err(ExtractionError::mismatch(self.native, value.native_class()));
        }
        (self.f)(value, element_type)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

fn check_element<M: ElementMapper + ?Sized>(
    mapper: &M,
    element_type: &DataType,
    declared: &DataType,
) -> Result<(), ExtractionError> {
    if mapper.accepts_element(element_type) {
        Ok(())
    } else {
        Err(ExtractionError::mismatch(
            format!("elements of {}", mapper.describe()),
            declared,
        ))
    }
}

fn map_elements<M, C>(
    mapper: &M,
    items: &[Value],
    element_type: &DataType,
) -> Result<C, ExtractionError>
where
    M: ElementMapper,
    C: FromIterator<M::Output>,
{
    items
        .iter()
        .map(|item| mapper.from_native(item, element_type))
        .collect()
}

pub struct ListDecoder<M> {
    element: M,
}

impl<M: ElementMapper> ListDecoder<M> {
    pub fn new(element: M) -> Self {
        Self { element }
    }
}

impl<M: ElementMapper> Decoder for ListDecoder<M> {
    type Output = Vec<M::Output>;

    fn type_name(&self) -> String {
        format!("Vec<{}>", self.element.describe())
    }

    fn native_class(&self) -> NativeClass {
        NativeClass::List
    }

    fn from_value(
        &self,
        value: &Value,
        declared: &DataType,
    ) -> Result<Self::Output, ExtractionError> {
        let (DataType::List(element_type), Value::List(items)) = (declared, value) else {
            return Err(ExtractionError::mismatch("list", declared));
        };
        check_element(&self.element, element_type, declared)?;
        map_elements(&self.element, items, element_type)
    }
}

/// Decodes a set cell into any collection built from its elements, typically
/// `HashSet` or `BTreeSet`.
pub struct SetDecoder<M, C> {
    element: M,
    _collection: PhantomData<fn() -> C>,
}

impl<M, C> SetDecoder<M, C>
where
    M: ElementMapper,
    C: FromIterator<M::Output>,
{
    pub fn new(element: M) -> Self {
        Self {
            element,
            _collection: PhantomData,
        }
    }
}

impl<M> SetDecoder<M, HashSet<M::Output>>
where
    M: ElementMapper,
    M::Output: Eq + Hash,
{
    pub fn hash(element: M) -> Self {
        Self::new(element)
    }
}

impl<M> SetDecoder<M, BTreeSet<M::Output>>
where
    M: ElementMapper,
    M::Output: Ord,
{
    pub fn btree(element: M) -> Self {
        Self::new(element)
    }
}

impl<M, C> Decoder for SetDecoder<M, C>
where
    M: ElementMapper,
    C: FromIterator<M::Output>,
{
    type Output = C;

    fn type_name(&self) -> String {
        format!("Set<{}>", self.element.describe())
    }

    fn native_class(&self) -> NativeClass {
        NativeClass::Set
    }

    fn from_value(&self, value: &Value, declared: &DataType) -> Result<C, ExtractionError> {
        let (DataType::Set(element_type), Value::Set(items)) = (declared, value) else {
            return Err(ExtractionError::mismatch("set", declared));
        };
        check_element(&self.element, element_type, declared)?;
        map_elements(&self.element, items, element_type)
    }
}

/// Decodes a map cell with separate key and value mappers into any
/// collection of pairs, typically `HashMap` or `BTreeMap`.
pub struct MapDecoder<K, V, C> {
    key: K,
    value: V,
    _collection: PhantomData<fn() -> C>,
}

impl<K, V, C> MapDecoder<K, V, C>
where
    K: ElementMapper,
    V: ElementMapper,
    C: FromIterator<(K::Output, V::Output)>,
{
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            _collection: PhantomData,
        }
    }
}

impl<K, V> MapDecoder<K, V, HashMap<K::Output, V::Output>>
where
    K: ElementMapper,
    V: ElementMapper,
    K::Output: Eq + Hash,
{
    pub fn hash(key: K, value: V) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> MapDecoder<K, V, BTreeMap<K::Output, V::Output>>
where
    K: ElementMapper,
    V: ElementMapper,
    K::Output: Ord,
{
    pub fn btree(key: K, value: V) -> Self {
        Self::new(key, value)
    }
}

impl<K, V, C> Decoder for MapDecoder<K, V, C>
where
    K: ElementMapper,
    V: ElementMapper,
    C: FromIterator<(K::Output, V::Output)>,
{
    type Output = C;

    fn type_name(&self) -> String {
        format!("Map<{}, {}>", self.key.describe(), self.value.describe())
    }

    fn native_class(&self) -> NativeClass {
        NativeClass::Map
    }

    fn from_value(&self, value: &Value, declared: &DataType) -> Result<C, ExtractionError> {
        let (DataType::Map(key_type, value_type), Value::Map(entries)) = (declared, value) else {
            return Err(ExtractionError::mismatch("map", declared));
        };
        check_element(&self.key, key_type, declared)?;
        check_element(&self.value, value_type, declared)?;
        entries
            .iter()
            .map(|(k, v)| -> Result<_, ExtractionError> {
                Ok((
                    self.key.from_native(k, key_type)?,
                    self.value.from_native(v, value_type)?,
                ))
            })
            .collect()
    }
}
