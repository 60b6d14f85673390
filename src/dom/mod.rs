//! Mutable HTML DOM used by block decorators.
//!
//! Pages are parsed with html5ever into an arena ([`ArenaDom`]), queried
//! with CSS selectors, mutated in place and serialized back to markup.
//!
//! ```
//! use quotecraft::dom::{parse_html, select, outer_html};
//!
//! let mut dom = parse_html(r#"<div class="quote"><div>Hi</div></div>"#);
//! let block = select(&dom, ".quote").unwrap()[0];
//! dom.add_class(block, "animate-in");
//! assert_eq!(
//!     outer_html(&dom, block),
//!     r#"<div class="quote animate-in"><div>Hi</div></div>"#
//! );
//! ```

mod arena;
mod element_ref;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, ChildrenIter};
pub use element_ref::{ElementRef, PageSelectors, parse_selector_list, select, select_first};
pub use serialize::{escape_attr, escape_text, inner_html, outer_html, serialize_html};

use std::borrow::Cow;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse a full document or a bare fragment. Fragments end up inside the
/// implied `<body>`, exactly as a browser would place them.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Decode page bytes, honoring a `<meta charset>` declaration when the
/// bytes are not valid UTF-8.
pub fn decode_html_bytes(html: &[u8]) -> Cow<'_, str> {
    let hint = crate::util::extract_meta_charset(html);
    crate::util::decode_text(html, hint)
}

/// Parse page bytes. See [`decode_html_bytes`].
pub fn parse_html_bytes(html: &[u8]) -> ArenaDom {
    parse_html(&decode_html_bytes(html))
}

/// Whether `html` is a whole document rather than a fragment: past any
/// BOM, whitespace and comments it opens with a doctype or an `<html>`,
/// `<head>` or `<body>` tag.
pub fn is_document_markup(html: &str) -> bool {
    let mut rest = html.trim_start_matches('\u{feff}');
    loop {
        rest = rest.trim_start();
        let Some(after) = rest.strip_prefix("<!--") else {
            break;
        };
        match after.find("-->") {
            Some(end) => rest = &after[end + 3..],
            None => return false,
        }
    }

    let bytes = rest.as_bytes();
    starts_with_ignore_case(bytes, b"<!doctype")
        || ["html", "head", "body"]
            .iter()
            .any(|tag| opens_tag(bytes, tag.as_bytes()))
}

fn starts_with_ignore_case(bytes: &[u8], prefix: &[u8]) -> bool {
    bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn opens_tag(bytes: &[u8], name: &[u8]) -> bool {
    let Some(rest) = bytes.strip_prefix(b"<") else {
        return false;
    };
    if !starts_with_ignore_case(rest, name) {
        return false;
    }
    // `<header>` is not `<head>`.
    rest.get(name.len())
        .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
}

/// Serialize a fragment parse: the contents of the implied `<head>` and
/// `<body>`, without the wrapper elements the parser added.
pub fn serialize_fragment(dom: &ArenaDom) -> String {
    ["head", "body"]
        .iter()
        .filter_map(|tag| dom.find_by_tag(tag))
        .map(|id| inner_html(dom, id))
        .collect()
}

/// Serialize `dom` in the shape of the `source` it was parsed from: a full
/// document stays a document, a fragment comes back as a fragment.
pub fn serialize_like(dom: &ArenaDom, source: &str) -> String {
    if is_document_markup(source) {
        serialize_html(dom)
    } else {
        serialize_fragment(dom)
    }
}

/// The `<body>` element, if the parser produced one.
pub fn body(dom: &ArenaDom) -> Option<ArenaNodeId> {
    dom.find_by_tag("body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_markup_detection() {
        assert!(is_document_markup("<!DOCTYPE html><p>x</p>"));
        assert!(is_document_markup("\u{feff}\n  <!-- saved --> <html lang=en>"));
        assert!(is_document_markup("<HEAD><title>t</title></HEAD>"));
        assert!(is_document_markup("<body>"));

        assert!(!is_document_markup(r#"<div class="quote"></div>"#));
        assert!(!is_document_markup("<header>Top</header>"));
        assert!(!is_document_markup("plain text"));
        assert!(!is_document_markup("<!-- unterminated <html>"));
    }

    #[test]
    fn test_fragment_serializes_without_wrappers() {
        let source = r#"<div class="quote"><div>Hi</div></div> tail"#;
        let dom = parse_html(source);
        assert_eq!(serialize_like(&dom, source), source);
    }

    #[test]
    fn test_document_serializes_whole() {
        let source = "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>";
        let dom = parse_html(source);
        assert_eq!(serialize_like(&dom, source), source);
    }
}
