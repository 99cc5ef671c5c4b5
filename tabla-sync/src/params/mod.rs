//! The address bar's query string as an ordered parameter bag.
//!
//! [`UrlParams`] is the wire form of a listing screen's state and the single
//! source of truth for it: table state is always derived from it, never the
//! other way round. Keys keep their first-seen position so re-serializing a
//! bag after an update only changes what was touched.

mod codec;

pub use codec::{DecodeError, url_decode, url_encode};

use crate::constants::{MAX_URL_DECODED_LEN, max_params};

/// A query parameter value as carried by the URL.
///
/// URLs only carry text. A key that appears once holds [`RawValue::One`];
/// a repeated key (`?tag=a&tag=b`) holds [`RawValue::Many`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RawValue {
    /// Single occurrence.
    One(String),
    /// Repeated key, values in order of appearance.
    Many(Vec<String>),
}

impl RawValue {
    /// First value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(vs) => vs.first().map(String::as_str),
        }
    }

    /// All values as a slice.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs,
        }
    }

    /// True when no non-empty value is carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(String::is_empty)
    }

    fn push(&mut self, value: String) {
        match self {
            Self::One(first) => *self = Self::Many(vec![std::mem::take(first), value]),
            Self::Many(vs) => vs.push(value),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<&[&str]> for RawValue {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Ordered key → value(s) bag parsed from, or serialized to, a query string.
///
/// Absent keys are simply not stored. Updating an existing key keeps its
/// position; new keys are appended.
///
/// ```
/// use tabla_sync::UrlParams;
///
/// let mut params = UrlParams::parse("estado=ABIERTO&page=3");
/// params.set("page", "1");
/// params.set("limit", "10");
/// assert_eq!(params.to_query_string(), "estado=ABIERTO&page=1&limit=10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UrlParams {
    entries: Vec<(String, RawValue)>,
}

impl UrlParams {
    /// Empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// Pairs are split on `&`, keys and values URL-decoded, repeated keys
    /// collected in order. A key without `=` gets an empty value. Pairs that
    /// fail to decode, and keys beyond `TABLA_SYNC_MAX_PARAMS`, are dropped
    /// with a warning. Never fails.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let limit = max_params();
        let mut params = Self::new();
        let mut decode_failures = 0u32;
        let mut over_limit = 0u32;

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let (key, value) = match (url_decode(raw_key), url_decode(raw_value)) {
                (Ok(k), Ok(v)) => (k, v),
                _ => {
                    decode_failures += 1;
                    continue;
                },
            };
            if let Some(existing) = params.get_mut(&key) {
                existing.push(value);
            } else if params.len() < limit {
                params.entries.push((key, RawValue::One(value)));
            } else {
                over_limit += 1;
            }
        }

        if decode_failures > 0 {
            crate::log_warn!(
                "query param decode failed: dropped {} pair(s) exceeding {} bytes after decoding",
                decode_failures,
                MAX_URL_DECODED_LEN
            );
        }
        if over_limit > 0 {
            crate::log_warn!(
                "query param limit exceeded: dropped {} pair(s) (max keys: {})",
                over_limit,
                limit
            );
        }

        params
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value(s) stored under `key`.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut RawValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// First value stored under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RawValue::first)
    }

    /// Whether `key` is present (even with an empty value).
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace `key`, keeping its position when it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove `key`, returning its value(s).
    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Serialize without the leading `?`. Repeated values become repeated keys.
    ///
    /// Deterministic: equal bags always serialize to the same string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            let key = url_encode(key);
            for v in value.values() {
                if !out.is_empty() {
                    out.push('&');
                }
                out.push_str(&key);
                out.push('=');
                out.push_str(&url_encode(v));
            }
        }
        out
    }
}

impl std::fmt::Display for UrlParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for UrlParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}
