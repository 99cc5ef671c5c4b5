//! SchemaError enum and implementations.

use super::ParamKind;

/// Error in a static schema or synchronizer declaration.
///
/// These are programming errors in a listing screen's declaration, reported
/// once when the schema is built. URL input never produces a `SchemaError`.
///
/// ```
/// # use tabla_sync::{QueryParamSchema, SchemaError};
/// let err = QueryParamSchema::builder()
///     .string("q")
///     .string("q")
///     .build()
///     .unwrap_err();
/// assert_eq!(err, SchemaError::DuplicateKey { key: "q".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// A parameter was declared with an empty key.
    EmptyKey,

    /// The same key was declared twice.
    DuplicateKey {
        /// The repeated key
        key: String,
    },

    /// An integer range with `min > max`, or a default outside its range.
    InvalidDefault {
        /// The parameter key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// A filter column points at a key the schema does not declare.
    UnknownKey {
        /// The missing key
        key: String,
    },

    /// A filter column's encoding does not fit the key's declared kind.
    KindMismatch {
        /// The parameter key
        key: String,
        /// Kind the column encoding needs
        expected: ParamKind,
        /// Kind the schema declares
        found: ParamKind,
    },

    /// The same column id was declared for two filters.
    DuplicateColumn {
        /// The repeated column id
        column: String,
    },
}

impl SchemaError {
    /// Create an invalid-default error.
    #[inline]
    #[must_use]
    pub fn invalid_default(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDefault {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// The key (or column id) the error is about, empty for [`SchemaError::EmptyKey`].
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::EmptyKey => "",
            Self::DuplicateKey { key }
            | Self::InvalidDefault { key, .. }
            | Self::UnknownKey { key }
            | Self::KindMismatch { key, .. } => key,
            Self::DuplicateColumn { column } => column,
        }
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "Query parameter key must not be empty"),
            Self::DuplicateKey { key } => write!(f, "Query parameter '{key}' declared twice"),
            Self::InvalidDefault { key, reason } => {
                write!(f, "Invalid declaration for '{key}': {reason}")
            },
            Self::UnknownKey { key } => {
                write!(f, "Filter column refers to undeclared parameter '{key}'")
            },
            Self::KindMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "Parameter '{key}' is declared as {found} but its filter column needs {expected}"
            ),
            Self::DuplicateColumn { column } => {
                write!(f, "Filter column '{column}' declared twice")
            },
        }
    }
}

impl std::error::Error for SchemaError {}
