//! HTML serialization for [`ArenaDom`] subtrees.
//!
//! Follows the HTML fragment serialization rules closely enough for
//! decorated pages to round-trip through a browser unchanged: void
//! elements get no end tag, raw-text elements are written verbatim, and
//! only the characters that are ambiguous in each context are escaped.

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the whole document, doctype included.
pub fn serialize_html(dom: &ArenaDom) -> String {
    inner_html(dom, dom.document())
}

/// Markup of `id` itself and everything below it (`Element.outerHTML`).
pub fn outer_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, false, &mut out);
    out
}

/// Markup of the children of `id` (`Element.innerHTML`).
pub fn inner_html(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let raw = dom
        .element_name(id)
        .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n.as_ref()));
    let mut out = String::new();
    for child in dom.children(id) {
        write_node(dom, child, raw, &mut out);
    }
    out
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, raw_parent: bool, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };
    match &node.data {
        ArenaNodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, false, out);
            }
        }
        ArenaNodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        ArenaNodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        ArenaNodeData::Text(text) => {
            if raw_parent {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        ArenaNodeData::Element { name, attrs } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&attr.name.local);
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&tag);
            for child in dom.children(id) {
                write_node(dom, child, raw, out);
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Escape text content. Quotes are left alone, as browsers do.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_void_and_nested_elements() {
        let dom = parse_html("<p>one<br>two <em>three</em></p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(outer_html(&dom, p), "<p>one<br>two <em>three</em></p>");
        assert_eq!(inner_html(&dom, p), "one<br>two <em>three</em>");
    }

    #[test]
    fn test_text_and_attribute_escaping() {
        let dom = parse_html(r#"<div title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp;&amp; "ok"</div>"#);
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(
            outer_html(&dom, div),
            r#"<div title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp;&amp; "ok"</div>"#
        );
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let dom = parse_html("<script>if (a < b && c) {}</script>");
        let script = dom.find_by_tag("script").unwrap();
        assert_eq!(inner_html(&dom, script), "if (a < b && c) {}");
    }

    #[test]
    fn test_full_document() {
        let dom = parse_html("<!DOCTYPE html><html><head></head><body><!--x--><p>hi</p></body></html>");
        assert_eq!(
            serialize_html(&dom),
            "<!DOCTYPE html><html><head></head><body><!--x--><p>hi</p></body></html>"
        );
    }
}
