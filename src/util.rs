//! Byte decoding helpers for page input.

use std::borrow::Cow;

/// Decode page bytes to a string.
///
/// UTF-8 is tried first (a BOM is honored and stripped). When the bytes are
/// not valid UTF-8 the hint encoding is used, and failing that Windows-1252,
/// which is what legacy CMS exports almost always are.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find the charset declared by a `<meta>` tag in the head of a page.
///
/// Recognizes both `<meta charset="x">` and the older
/// `<meta http-equiv="Content-Type" content="text/html; charset=x">`. Only
/// the first 1024 bytes are inspected, matching the HTML prescan limit.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let mut rest = prefix;
    while let Some(pos) = find_ignore_case(rest, b"charset=") {
        let after = &rest[pos + b"charset=".len()..];
        if let Some(value) = charset_value(after) {
            return Some(value);
        }
        rest = after;
    }
    None
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

fn charset_value(after: &[u8]) -> Option<&str> {
    let (start, quote) = match *after.first()? {
        q @ (b'"' | b'\'') => (1, Some(q)),
        _ => (0, None),
    };
    let body = &after[start..];
    let len = body
        .iter()
        .position(|&b| match quote {
            Some(q) => b == q,
            None => b == b'"' || b == b'\'' || b == b';' || b == b'>' || b.is_ascii_whitespace(),
        })
        .unwrap_or(body.len());
    let value = std::str::from_utf8(&body[..len]).ok()?.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_passthrough() {
        let text = decode_text("“Quoted” — ok".as_bytes(), None);
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "“Quoted” — ok");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // 0x93/0x94 are curly quotes in CP1252 and invalid on their own in UTF-8
        let bytes = b"\x93Hi\x94";
        assert_eq!(decode_text(bytes, None), "\u{201c}Hi\u{201d}");
    }

    #[test]
    fn test_decode_uses_hint() {
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes, Some("iso-8859-15")), "café");
    }

    #[test]
    fn test_meta_charset_forms() {
        assert_eq!(
            extract_meta_charset(br#"<head><meta charset="windows-1252"></head>"#),
            Some("windows-1252")
        );
        assert_eq!(
            extract_meta_charset(b"<meta charset=latin1>"),
            Some("latin1")
        );
        assert_eq!(
            extract_meta_charset(
                br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#
            ),
            Some("ISO-8859-1")
        );
        assert_eq!(extract_meta_charset(b"<p>no charset here</p>"), None);
    }
}
