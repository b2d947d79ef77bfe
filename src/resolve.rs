//! Type-directed decoder resolution.
//!
//! [`Decode`] maps a domain type to the decoder that handles it. Candidate
//! strategies are considered in the fixed order of
//! [`Strategy::RESOLUTION_ORDER`]: a primitive is a scalar before anything
//! else, `Option<T>` wraps whatever `T` resolves to, tuples compose their
//! components positionally, standard collections map their elements, and
//! every remaining type must be a record declared with [`record!`](crate::record!).
//! Trait coherence guarantees exactly one strategy applies to a given type.
//!
//! Types that need a custom element mapper inside a collection are decoded
//! with an explicitly built [`ListDecoder`], [`SetDecoder`] or [`MapDecoder`].

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::Hash,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    collection::{ListDecoder, MapDecoder, SetDecoder},
    data::Value,
    decoder::{Decoder, Optional, Scalar},
    error::DecodeError,
    naming::Configuration,
    native::Blob,
    row::Row,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    Scalar,
    Optional,
    Tuple,
    Collection,
    Record,
}

impl Strategy {
    pub const RESOLUTION_ORDER: [Strategy; 5] = [
        Strategy::Scalar,
        Strategy::Optional,
        Strategy::Tuple,
        Strategy::Collection,
        Strategy::Record,
    ];

    /// Position in [`Strategy::RESOLUTION_ORDER`]; lower is tried first.
    pub fn priority(self) -> usize {
        Self::RESOLUTION_ORDER
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::RESOLUTION_ORDER.len())
    }
}

/// A type with a statically resolved decoder.
pub trait Decode: Sized {
    type Decoder: Decoder<Output = Self>;
    const STRATEGY: Strategy;

    fn decoder(config: &Configuration) -> Self::Decoder;
}

pub fn strategy_of<T: Decode>() -> Strategy {
    T::STRATEGY
}

macro_rules! scalar_decode {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Decode for $ty {
                type Decoder = Scalar<$ty>;
                const STRATEGY: Strategy = Strategy::Scalar;

                fn decoder(_config: &Configuration) -> Self::Decoder {
                    Scalar::new()
                }
            }
        )+
    };
}

scalar_decode!(
    bool,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
    String,
    Decimal,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    Uuid,
    Blob,
    Value,
);

impl<T: Decode> Decode for Option<T> {
    type Decoder = Optional<T::Decoder>;
    const STRATEGY: Strategy = Strategy::Optional;

    fn decoder(config: &Configuration) -> Self::Decoder {
        Optional(T::decoder(config))
    }
}

impl<T: Decode> Decode for Vec<T> {
    type Decoder = ListDecoder<T::Decoder>;
    const STRATEGY: Strategy = Strategy::Collection;

    fn decoder(config: &Configuration) -> Self::Decoder {
        ListDecoder::new(T::decoder(config))
    }
}

impl<T: Decode + Eq + Hash> Decode for HashSet<T> {
    type Decoder = SetDecoder<T::Decoder, HashSet<T>>;
    const STRATEGY: Strategy = Strategy::Collection;

    fn decoder(config: &Configuration) -> Self::Decoder {
        SetDecoder::new(T::decoder(config))
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    type Decoder = SetDecoder<T::Decoder, BTreeSet<T>>;
    const STRATEGY: Strategy = Strategy::Collection;

    fn decoder(config: &Configuration) -> Self::Decoder {
        SetDecoder::new(T::decoder(config))
    }
}

impl<K: Decode + Eq + Hash, V: Decode> Decode for HashMap<K, V> {
    type Decoder = MapDecoder<K::Decoder, V::Decoder, HashMap<K, V>>;
    const STRATEGY: Strategy = Strategy::Collection;

    fn decoder(config: &Configuration) -> Self::Decoder {
        MapDecoder::new(K::decoder(config), V::decoder(config))
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    type Decoder = MapDecoder<K::Decoder, V::Decoder, BTreeMap<K, V>>;
    const STRATEGY: Strategy = Strategy::Collection;

    fn decoder(config: &Configuration) -> Self::Decoder {
        MapDecoder::new(K::decoder(config), V::decoder(config))
    }
}

impl Row {
    /// Resolves a decoder for `T` and decodes this row from its first cell.
    /// Records ignore the position and look their fields up by name.
    pub fn decode<T: Decode>(&self, config: &Configuration) -> Result<T, DecodeError> {
        self.decode_at(0, config)
    }

    pub fn decode_at<T: Decode>(
        &self,
        index: usize,
        config: &Configuration,
    ) -> Result<T, DecodeError> {
        T::decoder(config).decode(self, index)
    }
}
