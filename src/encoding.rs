//! Percent-encoding, path normalization, and header-value normalization for AWS SigV4 canonicalization.
//!
//! **Stability of the items not re-exported at the crate root is not guaranteed.** They are exposed with the
//! `unstable` feature for testing purposes only.

use {
    crate::constants::HEX_DIGITS_UPPER,
    lazy_static::lazy_static,
    qualifier_attr::qualifiers,
    regex::Regex,
};

lazy_static! {
    /// Multiple space pattern for condensing header values
    static ref MULTISPACE: Regex = Regex::new("  +").unwrap();
}

/// Percent-encode `input` the way AWS SigV4 requires.
///
/// RFC 3986 unreserved characters (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`) are passed through. Every other byte of
/// the UTF-8 encoding becomes `%XX` with upper-case hex digits. The forward slash is left alone unless `encode_slash`
/// is set, in which case it becomes `%2F`; paths are encoded without it, query names and values with it.
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut result = String::with_capacity(input.len() * 3);

    for c in input.bytes() {
        if is_rfc3986_unreserved(c) || (c == b'/' && !encode_slash) {
            result.push(c as char);
        } else {
            let hex = u8_to_upper_hex(c);
            result.push('%');
            result.push(hex[0] as char);
            result.push(hex[1] as char);
        }
    }

    result
}

/// Normalizes a header value by trimming surrounding spaces and control characters and converting runs of spaces to a
/// single space.
///
/// Tabs and other whitespace inside the value are left as-is. Characters above U+0020, such as a no-break space, are
/// never trimmed.
pub fn normalize_header_value(value: &str) -> String {
    MULTISPACE.replace_all(value.trim_matches(|c: char| c <= ' '), " ").into_owned()
}

/// Resolve `path` against the root and return the normalized absolute path.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment; it never climbs above the root. If the
/// result is not just `/`, a trailing slash on the input is preserved. Otherwise a trailing slash is appended only
/// when `insure_trailing_slash` is set and the result is not the root itself.
pub fn normalize_path(path: &str, insure_trailing_slash: bool) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => (),
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut result = String::with_capacity(path.len() + 2);
    for segment in segments {
        result.push('/');
        result.push_str(segment);
    }

    if path.ends_with('/') || insure_trailing_slash {
        result.push('/');
    }

    result
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Convert a Latin-1 slice of bytes to a UTF-8 string.
///
/// HTTP header values are Latin 1 (ISO 8859-1) on the wire, apart from a few oddities like Content-Disposition.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Convert a byte to uppercase hex representation.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]]
}

/// The value of an ASCII hex digit, or `None` for any other byte.
#[inline(always)]
fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Unescapes a URI percent-encoded string, such as the path or query of an [http::Uri].
///
/// A `%` that is not followed by two hex digits is kept literally. Decoded bytes that do not form valid UTF-8 are
/// replaced with U+FFFD.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn unescape_uri_encoding(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit_value(bytes[i + 1]), hex_digit_value(bytes[i + 2])) {
                result.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }

        result.push(c);
        i += 1;
    }

    String::from_utf8_lossy(&result).into_owned()
}

#[cfg(test)]
mod tests {
    use super::{
        latin1_to_string, normalize_header_value, normalize_path, u8_to_upper_hex, unescape_uri_encoding, uri_encode,
    };

    #[test_log::test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("case1", true), "case1");
        assert_eq!(
            uri_encode("arn:aws:lambda:ca-central-1:992382745483:function:get-pets", true),
            "arn%3Aaws%3Alambda%3Aca-central-1%3A992382745483%3Afunction%3Aget-pets"
        );
        assert_eq!(uri_encode("/test$file.text", false), "/test%24file.text");
        assert_eq!(uri_encode("a/b c", true), "a%2Fb%20c");
        assert_eq!(uri_encode("a/b c", false), "a/b%20c");
        assert_eq!(uri_encode("-._~", true), "-._~");
        assert_eq!(uri_encode("é", true), "%C3%A9");
        assert_eq!(uri_encode("", true), "");
    }

    #[test_log::test]
    fn test_normalize_header_value() {
        assert_eq!(normalize_header_value("  a   b  c "), "a b c");
        assert_eq!(normalize_header_value("bytes=0-9"), "bytes=0-9");
        assert_eq!(normalize_header_value("a\t\tb"), "a\t\tb");
        assert_eq!(normalize_header_value("   "), "");
        assert_eq!(normalize_header_value("\r\n value\x0b"), "value");
        assert_eq!(normalize_header_value("\u{a0}value\u{a0}"), "\u{a0}value\u{a0}");
        assert_eq!(normalize_header_value(&latin1_to_string(&[0xa0, b'x', b' '])), "\u{a0}x");
    }

    #[test_log::test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("", false), "/");
        assert_eq!(normalize_path("/", false), "/");
        assert_eq!(normalize_path("/", true), "/");
        assert_eq!(normalize_path("test.txt", false), "/test.txt");
        assert_eq!(normalize_path("/a/./b/../c", false), "/a/c");
        assert_eq!(normalize_path("/a//b/", false), "/a/b/");
        assert_eq!(normalize_path("/../..", false), "/");
        assert_eq!(normalize_path("/v1/LookupUser", true), "/v1/LookupUser/");
        assert_eq!(normalize_path("/v1/LookupUser/", true), "/v1/LookupUser/");
        assert_eq!(normalize_path("/v1/LookupUser/", false), "/v1/LookupUser/");
    }

    #[test_log::test]
    fn test_normalize_path_idempotent() {
        for path in ["/a/b", "/a/b/", "//x/../y/./z", "/"] {
            for flag in [false, true] {
                let once = normalize_path(path, flag);
                assert_eq!(normalize_path(&once, flag), once);
            }
        }
    }

    #[test_log::test]
    fn test_u8_to_upper_hex() {
        for i in 0..=255 {
            let result = u8_to_upper_hex(i);
            assert_eq!(String::from_utf8_lossy(result.as_slice()), format!("{:02X}", i));
        }
    }

    #[test_log::test]
    fn test_unescape_uri_encoding() {
        assert_eq!(unescape_uri_encoding("/test%24file.text"), "/test$file.text");
        assert_eq!(unescape_uri_encoding("%e2%82%ac"), "€");
        assert_eq!(unescape_uri_encoding("100%"), "100%");
        assert_eq!(unescape_uri_encoding("%YY"), "%YY");
        assert_eq!(unescape_uri_encoding("%4"), "%4");
        assert_eq!(unescape_uri_encoding("%+1"), "%+1");
        assert_eq!(unescape_uri_encoding("%1+"), "%1+");
        assert_eq!(unescape_uri_encoding("%-1x"), "%-1x");
        assert_eq!(unescape_uri_encoding("a%2Fb%2fc"), "a/b/c");
    }

    #[test_log::test]
    fn test_latin1_to_string() {
        assert_eq!(latin1_to_string(b"abc"), "abc");
        assert_eq!(latin1_to_string(&[0xe9]), "é");
    }
}
