//! Field-name transformation.
//!
//! Record fields are matched against column names after passing through the
//! [`FieldNaming`] policy of the active [`Configuration`]. The canonical policy
//! is [`snake_case`], memoized in a concurrent cache shared by every clone of
//! the configuration.

use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, OnceLock},
};

use clap::ValueEnum;
use dashmap::DashMap;
use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToUpperCamelCase};
use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ACRONYM_BOUNDARY: OnceLock<Regex> = OnceLock::new();
static WORD_BOUNDARY: OnceLock<Regex> = OnceLock::new();
static DEFAULT_CONFIGURATION: OnceLock<Configuration> = OnceLock::new();

/// Converts a camel-case identifier to `snake_case`.
///
/// An uppercase run followed by an uppercase-then-lowercase pair is split
/// before the last capital (`HTTPServer` becomes `HTTP_Server`), then a
/// lowercase letter or digit followed by a capital is split (`userId` becomes
/// `user_Id`), and the result is lower-cased. Already snake-cased input is
/// returned unchanged.
pub fn snake_case(name: &str) -> String {
    let acronyms = ACRONYM_BOUNDARY
        .get_or_init(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("static pattern"));
    let words =
        WORD_BOUNDARY.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("static pattern"));
    let split = acronyms.replace_all(name, "${1}_${2}");
    let split = words.replace_all(&split, "${1}_${2}");
    split.to_lowercase()
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CaseConvention {
    #[default]
    Snake,
    ScreamingSnake,
    Kebab,
    LowerCamel,
    UpperCamel,
    Identity,
}

impl CaseConvention {
    pub fn apply(self, name: &str) -> String {
        match self {
            CaseConvention::Snake => snake_case(name),
            CaseConvention::ScreamingSnake => name.to_shouty_snake_case(),
            CaseConvention::Kebab => name.to_kebab_case(),
            CaseConvention::LowerCamel => name.to_lower_camel_case(),
            CaseConvention::UpperCamel => name.to_upper_camel_case(),
            CaseConvention::Identity => name.to_string(),
        }
    }
}

pub type TransformFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A transformation computed at most once per distinct input.
#[derive(Clone)]
pub struct MemoizedTransform {
    transform: TransformFn,
    cache: Arc<DashMap<String, Arc<str>>>,
}

impl MemoizedTransform {
    pub fn new(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            transform: Arc::new(transform),
            cache: Arc::new(DashMap::new()),
        }
    }

    pub fn apply(&self, field: &str) -> Arc<str> {
        if let Some(hit) = self.cache.get(field) {
            return Arc::clone(hit.value());
        }
        // Computed outside the shard lock; a concurrent miss on the same key
        // may compute twice but only the first insert is kept.
        let computed: Arc<str> = (self.transform)(field).into();
        trace!("Field name '{field}' maps to column '{computed}'");
        Arc::clone(
            self.cache
                .entry(field.to_string())
                .or_insert(computed)
                .value(),
        )
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

#[derive(Clone)]
pub enum FieldNaming {
    Identity,
    Transform(TransformFn),
    Memoized(MemoizedTransform),
}

impl FieldNaming {
    pub fn transform(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        FieldNaming::Transform(Arc::new(transform))
    }

    pub fn memoized(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        FieldNaming::Memoized(MemoizedTransform::new(transform))
    }

    pub fn column_name<'a>(&self, field: &'a str) -> Cow<'a, str> {
        match self {
            FieldNaming::Identity => Cow::Borrowed(field),
            FieldNaming::Transform(transform) => Cow::Owned(transform(field)),
            FieldNaming::Memoized(memo) => Cow::Owned(memo.apply(field).to_string()),
        }
    }
}

impl fmt::Debug for FieldNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldNaming::Identity => f.write_str("Identity"),
            FieldNaming::Transform(_) => f.write_str("Transform(..)"),
            FieldNaming::Memoized(memo) => f
                .debug_struct("Memoized")
                .field("cached", &memo.cached_len())
                .finish(),
        }
    }
}

/// Settings a decoder is built with. Clones share any memoization cache.
#[derive(Debug, Clone)]
pub struct Configuration {
    naming: FieldNaming,
}

impl Configuration {
    pub fn new(naming: FieldNaming) -> Self {
        Self { naming }
    }

    pub fn identity() -> Self {
        Self::new(FieldNaming::Identity)
    }

    /// Memoized conversion using one of the built-in conventions.
    pub fn convention(convention: CaseConvention) -> Self {
        match convention {
            CaseConvention::Identity => Self::identity(),
            other => Self::new(FieldNaming::memoized(move |name| other.apply(name))),
        }
    }

    pub fn naming(&self) -> &FieldNaming {
        &self.naming
    }

    pub fn column_name<'a>(&self, field: &'a str) -> Cow<'a, str> {
        self.naming.column_name(field)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::convention(CaseConvention::Snake)
    }
}

/// The process-wide default: memoized snake case, built on first use.
pub fn default_configuration() -> &'static Configuration {
    DEFAULT_CONFIGURATION.get_or_init(Configuration::default)
}
