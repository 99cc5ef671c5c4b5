//! Schema-validated reading of raw URL parameters.
//!
//! [`TypedParams::read`] turns an untyped [`UrlParams`] bag into one value per
//! schema key, each of the declared kind. It is total: anything that does
//! not coerce falls back to the key's default, with a debug log line saying
//! why.
//!
//! | Kind          | Accepts                                   | Otherwise        |
//! |---------------|-------------------------------------------|------------------|
//! | `integer`     | base-10 integer inside the declared range | default          |
//! | `string`      | first non-empty value                     | default (absent) |
//! | `stringArray` | `a,b,c` split on `,`, or repeated keys    | default (absent) |
//! | `boolean`     | `true` / `false`                          | default          |

mod coerce_error;

pub use coerce_error::CoerceError;

use crate::constants::{BOOL_FALSE, BOOL_TRUE, LIST_SEPARATOR};
use crate::params::{RawValue, UrlParams};
use crate::schema::{ParamKind, ParamSpec, QueryParamSchema};

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TypedValue {
    /// From an `integer` parameter.
    Integer(i64),
    /// From a `string` parameter.
    String(String),
    /// From a `stringArray` parameter.
    StringArray(Vec<String>),
    /// From a `boolean` parameter.
    Boolean(bool),
}

impl TypedValue {
    /// Kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        match self {
            Self::Integer(_) => ParamKind::Integer,
            Self::String(_) => ParamKind::String,
            Self::StringArray(_) => ParamKind::StringArray,
            Self::Boolean(_) => ParamKind::Boolean,
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The text, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The tokens, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(v) => Some(v),
            _ => None,
        }
    }

    /// The flag, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// One value per schema key, in schema order.
///
/// Keys with a default are never absent. Keys without one are absent when
/// the URL does not carry a usable value.
///
/// ```
/// use tabla_sync::{QueryParamSchema, UrlParams};
///
/// let schema = QueryParamSchema::builder()
///     .pagination()
///     .string_array("estado")
///     .build()
///     .unwrap();
///
/// let typed = schema.read(&UrlParams::parse("page=abc&estado=ABIERTO,EN_PROCESO"));
/// assert_eq!(typed.int("page"), Some(1)); // invalid, defaulted
/// assert_eq!(typed.int("limit"), Some(10));
/// assert_eq!(typed.list("estado").unwrap(), ["ABIERTO", "EN_PROCESO"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedParams {
    values: Vec<(String, Option<TypedValue>)>,
}

impl TypedParams {
    /// Read `raw` through `schema`. Never fails.
    pub fn read(schema: &QueryParamSchema, raw: &UrlParams) -> Self {
        let values = schema
            .specs()
            .iter()
            .map(|spec| {
                let value = match Self::coerce(spec, raw.get(spec.key())) {
                    Ok(Some(v)) => Some(v),
                    Ok(None) => spec.default_value().cloned(),
                    Err(e) => {
                        crate::log!(debug, "param defaulted", key: spec.key(), reason: e);
                        spec.default_value().cloned()
                    },
                };
                (spec.key().to_string(), value)
            })
            .collect();
        Self { values }
    }

    /// Coerce one raw value to `spec`'s kind.
    ///
    /// `Ok(None)` means absent or empty, so the default applies.
    pub fn coerce(
        spec: &ParamSpec,
        raw: Option<&RawValue>,
    ) -> Result<Option<TypedValue>, CoerceError> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Ok(None);
        };
        // Scalars read the first non-empty value, like strings do
        let scalar = raw
            .values()
            .iter()
            .map(String::as_str)
            .find(|v| !v.is_empty())
            .unwrap_or_default();

        match spec.kind() {
            ParamKind::Integer => {
                let n: i64 = scalar
                    .parse()
                    .map_err(|_| CoerceError::invalid_integer(spec.key(), scalar))?;
                if spec.in_range(n) {
                    Ok(Some(TypedValue::Integer(n)))
                } else {
                    Err(CoerceError::out_of_range(spec.key(), n))
                }
            },
            ParamKind::String => Ok(raw
                .values()
                .iter()
                .find(|v| !v.is_empty())
                .map(|v| TypedValue::String(v.clone()))),
            ParamKind::StringArray => {
                let tokens: Vec<String> = match raw {
                    RawValue::One(joined) => joined
                        .split(LIST_SEPARATOR)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect(),
                    RawValue::Many(values) => values.clone(),
                };
                Ok((!tokens.is_empty()).then_some(TypedValue::StringArray(tokens)))
            },
            ParamKind::Boolean => match scalar {
                BOOL_TRUE => Ok(Some(TypedValue::Boolean(true))),
                BOOL_FALSE => Ok(Some(TypedValue::Boolean(false))),
                other => Err(CoerceError::invalid_boolean(spec.key(), other)),
            },
        }
    }

    /// Value for `key`, `None` when absent or not a schema key.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether `key` belongs to the schema this bag was read with.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    /// Integer value for `key`.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(TypedValue::as_int)
    }

    /// Text value for `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TypedValue::as_str)
    }

    /// List value for `key`.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(TypedValue::as_list)
    }

    /// Boolean value for `key`.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(TypedValue::as_bool)
    }

    /// Entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&TypedValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of keys (always the schema's length).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for an empty schema.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
