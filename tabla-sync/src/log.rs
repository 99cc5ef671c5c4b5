//! Structured JSON logging to stderr.
//!
//! Every line is one JSON object:
//!
//! ```json
//! {"level":"debug","msg":"param defaulted","key":"page","reason":"invalid integer 'abc'","ts":"2025-01-16T10:30:00.000Z"}
//! {"level":"warn","msg":"query param limit exceeded: dropped 3 key(s)","ts":"2025-01-16T10:30:01.000Z"}
//! ```
//!
//! The minimum level comes from `TABLA_SYNC_LOG` (`debug`, `info`, `warn`,
//! `error` or `off`, default `warn`). Strings are escaped by miniserde's JSON
//! serializer.
//!
//! # Usage
//!
//! ```no_run
//! # use tabla_sync::log;
//! // Structured, with key-value fields
//! log!(debug, "param defaulted", key: "page", reason: "not an integer");
//!
//! // Format-string style
//! log::warn!("dropped {} query param(s)", 3);
//! ```

use crate::constants::ENV_LOG;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Level {
    /// Defaulting decisions and other diagnostics.
    Debug,
    /// Normal operation.
    Info,
    /// Input was dropped or truncated.
    Warn,
    /// Something the caller should act on.
    Error,
}

impl Level {
    /// Lowercase name used in the `level` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a `TABLA_SYNC_LOG` value. `Some(None)` means logging is off.
    #[must_use]
    pub fn parse_filter(s: &str) -> Option<Option<Self>> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Some(Self::Debug)),
            "info" => Some(Some(Self::Info)),
            "warn" | "warning" => Some(Some(Self::Warn)),
            "error" => Some(Some(Self::Error)),
            "off" | "none" => Some(None),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static MAX_LEVEL: OnceLock<Option<Level>> = OnceLock::new();

/// Minimum level that is written, or `None` when logging is off.
pub fn min_level() -> Option<Level> {
    *MAX_LEVEL.get_or_init(|| {
        std::env::var(ENV_LOG)
            .ok()
            .and_then(|v| Level::parse_filter(&v))
            .unwrap_or(Some(Level::Warn))
    })
}

#[doc(hidden)]
#[inline]
pub fn __enabled(level: Level) -> bool {
    min_level().is_some_and(|min| level >= min)
}

#[doc(hidden)]
pub fn __emit(level: Level, msg: &str, fields: &[(&str, &str)]) {
    use std::io::Write;
    let line = __build_line(level, msg, fields, &__timestamp());
    let _ = writeln!(std::io::stderr(), "{line}");
}

/// Build one JSON log line. `ts` is passed in so tests can pin it.
#[doc(hidden)]
#[must_use]
pub fn __build_line(level: Level, msg: &str, fields: &[(&str, &str)], ts: &str) -> String {
    let mut out = String::with_capacity(48 + msg.len() + fields.len() * 24);
    out.push_str(r#"{"level":""#);
    out.push_str(level.as_str());
    out.push_str(r#"","msg":"#);
    out.push_str(&miniserde::json::to_string(&msg));
    for (key, value) in fields {
        out.push(',');
        out.push_str(&miniserde::json::to_string(key));
        out.push(':');
        out.push_str(&miniserde::json::to_string(value));
    }
    out.push_str(r#","ts":"#);
    out.push_str(&miniserde::json::to_string(&ts));
    out.push('}');
    out
}

#[doc(hidden)]
#[must_use]
pub fn __timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    __timestamp_from(now.as_secs(), now.subsec_millis())
}

/// ISO 8601 UTC timestamp with millisecond precision.
///
/// Date part uses Howard Hinnant's `civil_from_days`
/// (<https://howardhinnant.github.io/date_algorithms.html#civil_from_days>).
#[doc(hidden)]
#[must_use]
#[allow(clippy::similar_names)]
pub fn __timestamp_from(secs: u64, millis: u32) -> String {
    let (days, tod) = (secs / 86_400, secs % 86_400);
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        tod / 3600,
        (tod % 3600) / 60,
        tod % 60
    )
}

/// Log a formatted message at debug level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if $crate::log::__enabled($crate::log::Level::Debug) {
            $crate::log::__emit($crate::log::Level::Debug, &format!($($arg)*), &[]);
        }
    }};
}

/// Log a formatted message at info level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        if $crate::log::__enabled($crate::log::Level::Info) {
            $crate::log::__emit($crate::log::Level::Info, &format!($($arg)*), &[]);
        }
    }};
}

/// Log a formatted message at warn level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        if $crate::log::__enabled($crate::log::Level::Warn) {
            $crate::log::__emit($crate::log::Level::Warn, &format!($($arg)*), &[]);
        }
    }};
}

/// Log a formatted message at error level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        if $crate::log::__enabled($crate::log::Level::Error) {
            $crate::log::__emit($crate::log::Level::Error, &format!($($arg)*), &[]);
        }
    }};
}

pub use crate::log_debug as debug;
pub use crate::log_error as error;
pub use crate::log_info as info;
pub use crate::log_warn as warn;

/// Structured logging with key-value fields.
///
/// Fields are only formatted when the level is enabled.
///
/// ```no_run
/// # use tabla_sync::log;
/// log!(debug, "param defaulted", key: "limit", reason: "out of range");
/// log!(warn, "navigation skipped");
/// ```
#[macro_export]
macro_rules! log {
    (debug, $($rest:tt)+) => { $crate::__log_at!($crate::log::Level::Debug, $($rest)+) };
    (info, $($rest:tt)+) => { $crate::__log_at!($crate::log::Level::Info, $($rest)+) };
    (warn, $($rest:tt)+) => { $crate::__log_at!($crate::log::Level::Warn, $($rest)+) };
    (error, $($rest:tt)+) => { $crate::__log_at!($crate::log::Level::Error, $($rest)+) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $msg:expr $(, $key:ident : $value:expr)* $(,)?) => {{
        if $crate::log::__enabled($level) {
            let fields: &[(&str, &str)] = &[
                $( (stringify!($key), &format!("{}", $value)) ),*
            ];
            $crate::log::__emit($level, $msg, fields);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2025-01-16T10:30:00.000Z";

    #[test]
    fn test_line_without_fields() {
        let line = __build_line(Level::Warn, "dropped", &[], TS);
        assert_eq!(
            line,
            r#"{"level":"warn","msg":"dropped","ts":"2025-01-16T10:30:00.000Z"}"#
        );
    }

    #[test]
    fn test_line_keeps_field_order() {
        let line = __build_line(
            Level::Debug,
            "param defaulted",
            &[("key", "page"), ("reason", "invalid integer")],
            TS,
        );
        insta::assert_snapshot!(line, @r#"{"level":"debug","msg":"param defaulted","key":"page","reason":"invalid integer","ts":"2025-01-16T10:30:00.000Z"}"#);
    }

    #[test]
    fn test_line_escapes_strings() {
        let line = __build_line(Level::Info, "say \"hi\"\n", &[("q", "a\\b")], TS);
        assert!(line.contains(r#""msg":"say \"hi\"\n""#));
        assert!(line.contains(r#""q":"a\\b""#));
    }

    #[test]
    fn test_timestamp_epoch() {
        assert_eq!(__timestamp_from(0, 0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_timestamp_known_dates() {
        // 2000-02-29 12:34:56 UTC
        assert_eq!(__timestamp_from(951_827_696, 7), "2000-02-29T12:34:56.007Z");
        // 2024-12-31 23:59:59 UTC
        assert_eq!(
            __timestamp_from(1_735_689_599, 999),
            "2024-12-31T23:59:59.999Z"
        );
        // 2025-01-01 00:00:00 UTC
        assert_eq!(__timestamp_from(1_735_689_600, 0), "2025-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = __timestamp();
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(Level::parse_filter("DEBUG"), Some(Some(Level::Debug)));
        assert_eq!(Level::parse_filter(" warn "), Some(Some(Level::Warn)));
        assert_eq!(Level::parse_filter("off"), Some(None));
        assert_eq!(Level::parse_filter("loud"), None);
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_macros_expand() {
        crate::log!(debug, "macro smoke", key: "page", n: 3);
        crate::log!(error, "macro smoke without fields");
        crate::log::debug!("formatted {}", 1);
        crate::log::warn!("formatted {}", 2);
    }
}
