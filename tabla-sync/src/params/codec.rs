//! Percent-encoding for query string components.

use crate::constants::MAX_URL_DECODED_LEN;

/// Error returned when URL decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Decoded output would exceed maximum length.
    TooLong,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong => write!(
                f,
                "url decoded output exceeds maximum length ({}KB limit)",
                MAX_URL_DECODED_LEN / 1024
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode a query component: `%XX` escapes and `+` as space.
///
/// Malformed escapes (`%G1`, a trailing `%`) are kept literally. Invalid
/// UTF-8 after decoding is replaced with U+FFFD.
///
/// ```
/// use tabla_sync::url_decode;
///
/// assert_eq!(url_decode("Oficina%20de+Partes").unwrap(), "Oficina de Partes");
/// assert_eq!(url_decode("100%").unwrap(), "100%");
/// ```
pub fn url_decode(s: &str) -> Result<String, DecodeError> {
    let input = s.as_bytes();
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while let Some(&b) = input.get(i) {
        if out.len() >= MAX_URL_DECODED_LEN {
            return Err(DecodeError::TooLong);
        }
        match b {
            b'%' => {
                let hi = input.get(i + 1).copied().and_then(hex_value);
                let lo = input.get(i + 2).copied().and_then(hex_value);
                if let (Some(hi), Some(lo)) = (hi, lo) {
                    out.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            },
            b'+' => out.push(b' '),
            _ => out.push(b),
        }
        i += 1;
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Bytes written verbatim by [`url_encode`].
///
/// RFC 3986 unreserved characters plus `:` `,` `/` `@`, which are legal in a
/// query and keep `sortBy=fechaIngreso:desc` and `estado=A,B` readable.
const fn is_verbatim(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b':' | b',' | b'/' | b'@')
}

/// Percent-encode a query component. Space becomes `%20`.
///
/// ```
/// use tabla_sync::url_encode;
///
/// assert_eq!(url_encode("a b&c"), "a%20b%26c");
/// assert_eq!(url_encode("fechaIngreso:desc"), "fechaIngreso:desc");
/// ```
#[must_use]
pub fn url_encode(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_verbatim(b) {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0F)]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_decode_basic() {
        assert_eq!(url_decode("hello%20world").unwrap(), "hello world");
        assert_eq!(url_decode("hello+world").unwrap(), "hello world");
        assert_eq!(url_decode("a%2Fb").unwrap(), "a/b");
        assert_eq!(url_decode("plain").unwrap(), "plain");
    }

    #[test]
    fn test_url_decode_utf8() {
        assert_eq!(url_decode("Tr%C3%A1mite").unwrap(), "Trámite");
        assert_eq!(url_decode("%E2%9C%93").unwrap(), "✓");
    }

    #[test]
    fn test_url_decode_only_one_level() {
        assert_eq!(url_decode("%2520").unwrap(), "%20");
    }

    #[test]
    fn test_url_decode_malformed_escapes_kept() {
        assert_eq!(url_decode("%GG").unwrap(), "%GG");
        assert_eq!(url_decode("%2").unwrap(), "%2");
        assert_eq!(url_decode("%").unwrap(), "%");
        assert_eq!(url_decode("a%20b%GGc%2").unwrap(), "a b%GGc%2");
        // A bad second digit must not swallow the next escape.
        assert_eq!(url_decode("%4%41").unwrap(), "%4A");
    }

    #[test]
    fn test_url_decode_invalid_utf8_is_lossy() {
        assert_eq!(url_decode("%FF").unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_url_decode_too_long() {
        let long = "a".repeat(MAX_URL_DECODED_LEN + 1);
        assert_eq!(url_decode(&long), Err(DecodeError::TooLong));
        let exact = "a".repeat(MAX_URL_DECODED_LEN);
        assert_eq!(url_decode(&exact).unwrap().len(), MAX_URL_DECODED_LEN);
    }

    #[test]
    fn test_url_encode_reserved() {
        assert_eq!(url_encode("a b"), "a%20b");
        assert_eq!(url_encode("x=1&y"), "x%3D1%26y");
        assert_eq!(url_encode("+"), "%2B");
        assert_eq!(url_encode("%"), "%25");
        assert_eq!(url_encode("#?"), "%23%3F");
    }

    #[test]
    fn test_url_encode_keeps_wire_separators() {
        assert_eq!(url_encode("ABIERTO,ARCHIVADO"), "ABIERTO,ARCHIVADO");
        assert_eq!(url_encode("fechaIngreso:desc"), "fechaIngreso:desc");
    }

    #[test]
    fn test_url_encode_utf8() {
        assert_eq!(url_encode("Trámite"), "Tr%C3%A1mite");
    }

    #[test]
    fn test_encode_then_decode() {
        for s in ["Oficina de Partes", "a+b=c&d", "100% ñandú", "", "~._-"] {
            assert_eq!(url_decode(&url_encode(s)).unwrap(), s);
        }
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::TooLong.to_string(),
            "url decoded output exceeds maximum length (64KB limit)"
        );
    }
}
