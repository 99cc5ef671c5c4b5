//! Declarative per-screen query parameter schemas.
//!
//! A [`QueryParamSchema`] lists the URL parameters one listing screen
//! understands, their kind and their default. It is built once per screen
//! and then only read.
//!
//! ```
//! use tabla_sync::{ParamKind, QueryParamSchema};
//!
//! let schema = QueryParamSchema::builder()
//!     .pagination()
//!     .string("q")
//!     .string_array("estado")
//!     .boolean("activo")
//!     .sort()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.spec("estado").unwrap().kind(), ParamKind::StringArray);
//! assert_eq!(schema.len(), 6);
//! ```

mod error;

pub use error::SchemaError;

use crate::constants::{DEFAULT_LIMIT, DEFAULT_PAGE, LIMIT_KEY, MIN_LIMIT, PAGE_KEY, SORT_KEY};
use crate::params::UrlParams;
use crate::typed::{TypedParams, TypedValue};

/// Wire kind of a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParamKind {
    /// Base-10 signed integer.
    Integer,
    /// Free text.
    String,
    /// Comma-joined list of opaque tokens.
    StringArray,
    /// Literal `true` / `false`.
    Boolean,
}

impl ParamKind {
    /// Name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "string",
            Self::StringArray => "stringArray",
            Self::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    key: String,
    kind: ParamKind,
    default: Option<TypedValue>,
    min: Option<i64>,
    max: Option<i64>,
}

impl ParamSpec {
    /// URL parameter name.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declared kind.
    #[inline]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Value used when the parameter is absent or invalid.
    #[inline]
    pub const fn default_value(&self) -> Option<&TypedValue> {
        self.default.as_ref()
    }

    /// Inclusive lower bound for integers.
    #[inline]
    pub const fn min(&self) -> Option<i64> {
        self.min
    }

    /// Inclusive upper bound for integers.
    #[inline]
    pub const fn max(&self) -> Option<i64> {
        self.max
    }

    /// Whether `value` lies inside the declared integer range.
    pub fn in_range(&self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// The recognized URL parameters of one listing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamSchema {
    specs: Vec<ParamSpec>,
}

impl QueryParamSchema {
    /// Start declaring a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Declaration for `key`.
    pub fn spec(&self, key: &str) -> Option<&ParamSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    /// Declarations in order.
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Declared keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.key.as_str())
    }

    /// Number of declared keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// True for a schema without keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Typed, defaulted view of `raw`. See [`TypedParams::read`].
    pub fn read(&self, raw: &UrlParams) -> TypedParams {
        TypedParams::read(self, raw)
    }

    /// The bag produced for a URL without parameters.
    pub fn defaults(&self) -> TypedParams {
        TypedParams::read(self, &UrlParams::new())
    }
}

/// Builder for [`QueryParamSchema`].
///
/// Declaration errors are remembered and reported by [`SchemaBuilder::build`],
/// so declarations chain without intermediate `?`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    specs: Vec<ParamSpec>,
    error: Option<SchemaError>,
}

impl SchemaBuilder {
    fn push(mut self, spec: ParamSpec) -> Self {
        if self.error.is_some() {
            return self;
        }
        if spec.key.is_empty() {
            self.error = Some(SchemaError::EmptyKey);
        } else if self.specs.iter().any(|s| s.key == spec.key) {
            self.error = Some(SchemaError::DuplicateKey { key: spec.key });
        } else if let Err(e) = validate_range(&spec) {
            self.error = Some(e);
        } else {
            self.specs.push(spec);
        }
        self
    }

    fn plain(key: &str, kind: ParamKind, default: Option<TypedValue>) -> ParamSpec {
        ParamSpec {
            key: key.to_string(),
            kind,
            default,
            min: None,
            max: None,
        }
    }

    /// Integer parameter with a default.
    pub fn integer(self, key: &str, default: i64) -> Self {
        self.push(Self::plain(
            key,
            ParamKind::Integer,
            Some(TypedValue::Integer(default)),
        ))
    }

    /// Integer parameter with a default and an inclusive range.
    ///
    /// Values outside the range are treated as invalid and default.
    pub fn integer_in(self, key: &str, default: i64, min: i64, max: i64) -> Self {
        self.push(ParamSpec {
            min: Some(min),
            max: Some(max),
            ..Self::plain(key, ParamKind::Integer, Some(TypedValue::Integer(default)))
        })
    }

    /// Integer parameter with a default and an inclusive lower bound only.
    pub fn integer_at_least(self, key: &str, default: i64, min: i64) -> Self {
        self.push(ParamSpec {
            min: Some(min),
            ..Self::plain(key, ParamKind::Integer, Some(TypedValue::Integer(default)))
        })
    }

    /// Text parameter without a default.
    pub fn string(self, key: &str) -> Self {
        self.push(Self::plain(key, ParamKind::String, None))
    }

    /// Text parameter with a default.
    pub fn string_or(self, key: &str, default: &str) -> Self {
        self.push(Self::plain(
            key,
            ParamKind::String,
            Some(TypedValue::String(default.to_string())),
        ))
    }

    /// Comma-joined list parameter without a default.
    pub fn string_array(self, key: &str) -> Self {
        self.push(Self::plain(key, ParamKind::StringArray, None))
    }

    /// `true`/`false` parameter without a default.
    pub fn boolean(self, key: &str) -> Self {
        self.push(Self::plain(key, ParamKind::Boolean, None))
    }

    /// `true`/`false` parameter with a default.
    pub fn boolean_or(self, key: &str, default: bool) -> Self {
        self.push(Self::plain(
            key,
            ParamKind::Boolean,
            Some(TypedValue::Boolean(default)),
        ))
    }

    /// `page` (default 1) and `limit` (default 10, at least 1, unbounded above).
    ///
    /// `page` carries no lower bound: `page=0` is a valid integer and the
    /// projector clamps it to the first page.
    pub fn pagination(self) -> Self {
        self.integer(PAGE_KEY, DEFAULT_PAGE)
            .integer_at_least(LIMIT_KEY, DEFAULT_LIMIT, MIN_LIMIT)
    }

    /// `sortBy`, without a default.
    pub fn sort(self) -> Self {
        self.string(SORT_KEY)
    }

    /// Finish the schema, reporting the first declaration error.
    pub fn build(self) -> Result<QueryParamSchema, SchemaError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(QueryParamSchema { specs: self.specs }),
        }
    }
}

fn validate_range(spec: &ParamSpec) -> Result<(), SchemaError> {
    if let (Some(min), Some(max)) = (spec.min, spec.max)
        && min > max
    {
        return Err(SchemaError::invalid_default(
            &spec.key,
            format!("minimum {min} exceeds maximum {max}"),
        ));
    }
    if let Some(&TypedValue::Integer(default)) = spec.default.as_ref()
        && !spec.in_range(default)
    {
        return Err(SchemaError::invalid_default(
            &spec.key,
            format!("default {default} outside its range"),
        ));
    }
    Ok(())
}
