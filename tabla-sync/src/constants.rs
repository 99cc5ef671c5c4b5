//! Centralized constants for the tabla-sync crate.
//!
//! Wire keys, defaults and limits live here so every listing screen encodes
//! its address bar the same way.
//!
//! # Environment Variables
//!
//! Some limits can be tuned via environment variables:
//!
//! | Variable                   | Default | Description                                  |
//! |----------------------------|---------|----------------------------------------------|
//! | `TABLA_SYNC_MAX_PARAMS`    | 100     | Distinct query keys kept when parsing a URL  |
//! | `TABLA_SYNC_LOG`           | `warn`  | Minimum log level (`debug`..`error`, `off`)  |
//!
//! Values are read once and cached for the lifetime of the process.
//! Unparseable values fall back to the defaults above.

use std::str::FromStr;
use std::sync::OnceLock;

// ============================================================================
// WIRE KEYS
// ============================================================================

/// 1-based page number parameter.
pub const PAGE_KEY: &str = "page";

/// Page size parameter.
pub const LIMIT_KEY: &str = "limit";

/// Single-column sort parameter, encoded as `<columnId>:<asc|desc>`.
pub const SORT_KEY: &str = "sortBy";

// ============================================================================
// WIRE ENCODING
// ============================================================================

/// Separator for array-valued filters (`estado=ABIERTO,ARCHIVADO`).
pub const LIST_SEPARATOR: char = ',';

/// Separator between column and direction in `sortBy`.
pub const SORT_SEPARATOR: char = ':';

/// Ascending sort direction token.
pub const SORT_ASC: &str = "asc";

/// Descending sort direction token.
pub const SORT_DESC: &str = "desc";

/// Boolean filter token for `true`.
pub const BOOL_TRUE: &str = "true";

/// Boolean filter token for `false`.
pub const BOOL_FALSE: &str = "false";

// ============================================================================
// DEFAULTS
// ============================================================================

/// Page shown when `page` is absent or invalid.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is absent or invalid.
pub const DEFAULT_LIMIT: i64 = 10;

/// Smallest accepted `limit`. There is no upper bound.
pub const MIN_LIMIT: i64 = 1;

/// Largest page number or page size written to the URL, so it reads back as an `i64`.
pub const MAX_WIRE_INT: u64 = i64::MAX.unsigned_abs();

// ============================================================================
// LIMITS
// ============================================================================

/// Maximum decoded length of a single query key or value (64KB).
pub const MAX_URL_DECODED_LEN: usize = 64 * 1024;

/// Environment variable overriding [`max_params`].
pub const ENV_MAX_PARAMS: &str = "TABLA_SYNC_MAX_PARAMS";

/// Environment variable selecting the minimum log level.
pub const ENV_LOG: &str = "TABLA_SYNC_LOG";

const DEFAULT_MAX_PARAMS: usize = 100;

static MAX_PARAMS_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the number of distinct keys kept when parsing a query string.
///
/// Reads `TABLA_SYNC_MAX_PARAMS` on first call. Zero is rejected.
#[inline]
pub fn max_params() -> usize {
    *MAX_PARAMS_CACHE
        .get_or_init(|| env_or(ENV_MAX_PARAMS, DEFAULT_MAX_PARAMS, |v| *v > 0))
}

fn env_or<T: FromStr>(name: &str, default: T, accept: impl Fn(&T) -> bool) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .filter(|v| accept(v))
        .unwrap_or(default)
}
