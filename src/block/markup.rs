//! Restructures authored quote rows into semantic markup.
//!
//! Authoring tools emit a block as a container with positional rows:
//!
//! ```html
//! <div class="quote">
//!   <div><p>Quote body</p></div>   <!-- quote -->
//!   <div>Jane Doe</div>            <!-- author -->
//!   <div>CEO</div>                 <!-- author title -->
//! </div>
//! ```
//!
//! which becomes
//!
//! ```html
//! <div class="quote" role="figure" aria-label="Quote" data-block-status="decorated">
//!   <blockquote role="presentation"><p>Quote body</p></blockquote>
//!   <footer><cite>Jane Doe<br><span class="author-title">CEO</span></cite></footer>
//! </div>
//! ```

use tracing::{debug, trace};

use crate::config::AUTHOR_TITLE_CLASS;
use crate::dom::{ArenaDom, ArenaNodeId};

/// Attribute marking an instance whose markup has already been rebuilt.
pub const STATUS_ATTR: &str = "data-block-status";
pub const STATUS_DECORATED: &str = "decorated";

/// Outcome of [`transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Markup was rebuilt.
    Decorated,
    /// The instance carries the decoration marker; nothing was touched.
    AlreadyDecorated,
    /// No instance (or not an element); nothing was touched.
    NoInstance,
}

/// The three positional rows of a raw block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSources {
    /// Container whose children are the quote body.
    pub body: Option<ArenaNodeId>,
    /// Trimmed author name; `None` when absent or blank.
    pub author: Option<String>,
    /// Trimmed author title; `None` when absent or blank.
    pub author_title: Option<String>,
}

impl QuoteSources {
    /// Read the first three element children of `instance`. Any further
    /// rows are ignored.
    pub fn read(dom: &ArenaDom, instance: ArenaNodeId) -> Self {
        let mut rows = dom.element_children(instance);
        let body = rows.next();
        let author = rows.next().and_then(|row| trimmed_text(dom, row));
        let author_title = rows.next().and_then(|row| trimmed_text(dom, row));
        Self {
            body,
            author,
            author_title,
        }
    }

    pub fn has_citation(&self) -> bool {
        self.author.is_some() || self.author_title.is_some()
    }
}

fn trimmed_text(dom: &ArenaDom, row: ArenaNodeId) -> Option<String> {
    let text = dom.text_content(row);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn is_decorated(dom: &ArenaDom, instance: ArenaNodeId) -> bool {
    dom.get_attr(instance, STATUS_ATTR) == Some(STATUS_DECORATED)
}

/// Replace the rows of `instance` with a blockquote and optional citation
/// footer, then mark the instance as a labelled figure.
///
/// `None` is accepted and ignored, so callers can pass the result of a
/// lookup straight through.
pub fn transform(dom: &mut ArenaDom, instance: Option<ArenaNodeId>) -> Transform {
    let Some(instance) = instance.filter(|&id| dom.is_element(id)) else {
        trace!("no quote instance to transform");
        return Transform::NoInstance;
    };
    if is_decorated(dom, instance) {
        debug!(instance = instance.0, "quote block already decorated; skipping");
        return Transform::AlreadyDecorated;
    }

    let sources = QuoteSources::read(dom, instance);

    // Build the replacement detached, then swap it in.
    let blockquote = dom.create_html_element("blockquote");
    dom.set_attr(blockquote, "role", "presentation");
    if let Some(body) = sources.body {
        dom.reparent_children(body, blockquote);
    }
    let footer = build_footer(dom, &sources);

    dom.take_children(instance);
    dom.append(instance, blockquote);
    if let Some(footer) = footer {
        dom.append(instance, footer);
    }

    dom.set_attr(instance, "role", "figure");
    dom.set_attr(instance, "aria-label", "Quote");
    dom.set_attr(instance, STATUS_ATTR, STATUS_DECORATED);

    debug!(
        instance = instance.0,
        author = sources.author.is_some(),
        author_title = sources.author_title.is_some(),
        "decorated quote block"
    );
    Transform::Decorated
}

fn build_footer(dom: &mut ArenaDom, sources: &QuoteSources) -> Option<ArenaNodeId> {
    if !sources.has_citation() {
        return None;
    }

    let cite = dom.create_html_element("cite");
    if let Some(author) = &sources.author {
        dom.append_text(cite, author);
    }
    if let Some(title) = &sources.author_title {
        let br = dom.create_html_element("br");
        dom.append(cite, br);
        let span = dom.create_html_element("span");
        dom.set_attr(span, "class", AUTHOR_TITLE_CLASS);
        dom.append_text(span, title);
        dom.append(cite, span);
    }

    let footer = dom.create_html_element("footer");
    dom.append(footer, cite);
    Some(footer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{inner_html, parse_html, select_first};

    fn block(html: &str) -> (ArenaDom, ArenaNodeId) {
        let dom = parse_html(html);
        let id = select_first(&dom, ".quote").unwrap().unwrap();
        (dom, id)
    }

    #[test]
    fn test_full_quote() {
        let (mut dom, q) = block(
            r#"<div class="quote"><div><p>Be <em>bold</em>.</p></div><div> Jane Doe </div><div><p>CEO</p></div></div>"#,
        );
        assert_eq!(transform(&mut dom, Some(q)), Transform::Decorated);
        assert_eq!(
            inner_html(&dom, q),
            r#"<blockquote role="presentation"><p>Be <em>bold</em>.</p></blockquote><footer><cite>Jane Doe<br><span class="author-title">CEO</span></cite></footer>"#
        );
        assert_eq!(dom.get_attr(q, "role"), Some("figure"));
        assert_eq!(dom.get_attr(q, "aria-label"), Some("Quote"));
        assert!(dom.has_class(q, "quote"));
    }

    #[test]
    fn test_none_is_noop() {
        let mut dom = parse_html("<p>x</p>");
        let before = dom.len();
        assert_eq!(transform(&mut dom, None), Transform::NoInstance);
        assert_eq!(dom.len(), before);
    }

    #[test]
    fn test_text_node_instance_is_noop() {
        let mut dom = parse_html("<p>x</p>");
        let p = dom.find_by_tag("p").unwrap();
        let text = dom.children(p).next().unwrap();
        assert_eq!(transform(&mut dom, Some(text)), Transform::NoInstance);
    }

    #[test]
    fn test_author_markup_is_stripped_to_text() {
        let (mut dom, q) = block(
            r#"<div class="quote"><div>q</div><div><a href="/jane"><strong>Jane</strong> Doe</a></div></div>"#,
        );
        transform(&mut dom, Some(q));
        let cite = dom.find_by_tag("cite").unwrap();
        assert_eq!(inner_html(&dom, cite), "Jane Doe");
    }

    #[test]
    fn test_title_without_author() {
        let (mut dom, q) = block(r#"<div class="quote"><div>q</div><div>   </div><div>CEO</div></div>"#);
        transform(&mut dom, Some(q));
        let cite = dom.find_by_tag("cite").unwrap();
        assert_eq!(inner_html(&dom, cite), r#"<br><span class="author-title">CEO</span>"#);
    }

    #[test]
    fn test_blank_title_is_dropped() {
        let (mut dom, q) = block(r#"<div class="quote"><div>q</div><div>Jane</div><div> &nbsp; </div></div>"#);
        transform(&mut dom, Some(q));
        let cite = dom.find_by_tag("cite").unwrap();
        assert_eq!(inner_html(&dom, cite), "Jane");
    }

    #[test]
    fn test_text_between_rows_is_discarded() {
        let (mut dom, q) = block("<div class=\"quote\">\n  <div>q</div>\n  <div>Jane</div>\n</div>");
        transform(&mut dom, Some(q));
        let kids: Vec<_> = dom.children(q).collect();
        assert_eq!(kids.len(), 2);
        assert!(kids.iter().all(|&k| dom.is_element(k)));
    }

    #[test]
    fn test_sources_ignore_extra_rows() {
        let (dom, q) = block(
            r#"<div class="quote"><div>q</div><div>a</div><div>t</div><div>extra</div></div>"#,
        );
        let sources = QuoteSources::read(&dom, q);
        assert_eq!(sources.author.as_deref(), Some("a"));
        assert_eq!(sources.author_title.as_deref(), Some("t"));
    }

    #[test]
    fn test_second_transform_is_guarded() {
        let (mut dom, q) = block(r#"<div class="quote"><div>q</div><div>Jane</div></div>"#);
        assert_eq!(transform(&mut dom, Some(q)), Transform::Decorated);
        let first = inner_html(&dom, q);

        assert_eq!(transform(&mut dom, Some(q)), Transform::AlreadyDecorated);
        assert_eq!(inner_html(&dom, q), first);
    }
}
