//! CoerceError enum and implementations.

/// Why a raw URL value could not be coerced to its declared kind.
///
/// Never surfaced to callers of [`crate::TypedParams::read`]: the reader
/// substitutes the default and logs this error at debug level. It is public
/// so [`crate::TypedParams::coerce`] can be used on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoerceError {
    /// Not a base-10 integer (`"abc"`, `"2.5"`, `"1e3"`).
    InvalidInteger {
        /// The parameter key
        key: String,
        /// The raw value
        value: String,
    },

    /// A valid integer outside the declared range.
    OutOfRange {
        /// The parameter key
        key: String,
        /// The parsed value
        value: i64,
    },

    /// Neither `"true"` nor `"false"`.
    InvalidBoolean {
        /// The parameter key
        key: String,
        /// The raw value
        value: String,
    },
}

impl CoerceError {
    /// Create an invalid integer error.
    #[inline]
    #[must_use]
    pub fn invalid_integer(key: &str, value: &str) -> Self {
        Self::InvalidInteger {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an out-of-range error.
    #[inline]
    #[must_use]
    pub fn out_of_range(key: &str, value: i64) -> Self {
        Self::OutOfRange {
            key: key.to_string(),
            value,
        }
    }

    /// Create an invalid boolean error.
    #[inline]
    #[must_use]
    pub fn invalid_boolean(key: &str, value: &str) -> Self {
        Self::InvalidBoolean {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// The parameter key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidInteger { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::InvalidBoolean { key, .. } => key,
        }
    }
}

impl std::fmt::Display for CoerceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInteger { key, value } => {
                write!(f, "Invalid integer for '{key}': '{value}'")
            },
            Self::OutOfRange { key, value } => {
                write!(f, "Value {value} for '{key}' is outside the allowed range")
            },
            Self::InvalidBoolean { key, value } => {
                write!(f, "Invalid boolean for '{key}': '{value}' (expected true or false)")
            },
        }
    }
}

impl std::error::Error for CoerceError {}
