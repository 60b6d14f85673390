//! The quote block decorator.
//!
//! [`decorate`] runs the three steps for one block instance, in order:
//!
//! 1. [`markup::transform`] rebuilds the authored rows into a labelled
//!    `blockquote` + citation footer.
//! 2. [`LayoutResponder`] subscribes to width changes.
//! 3. [`RevealAnimator`] subscribes to visibility changes.
//!
//! The transform finishes before either subscription is made, so no
//! observer callback can ever see the raw rows.
//!
//! ```
//! use quotecraft::block::decorate_page;
//! use quotecraft::QuoteConfig;
//!
//! let html = r#"<div class="quote"><div>Stay hungry.</div><div>Steve Jobs</div></div>"#;
//! let out = decorate_page(html, &QuoteConfig::default()).unwrap();
//! assert_eq!(
//!     out,
//!     concat!(
//!         r#"<div class="quote" role="figure" aria-label="Quote" data-block-status="decorated">"#,
//!         r#"<blockquote role="presentation">Stay hungry.</blockquote>"#,
//!         "<footer><cite>Steve Jobs</cite></footer></div>",
//!     )
//! );
//! ```

pub mod layout;
pub mod markup;
pub mod reveal;

pub use layout::LayoutResponder;
pub use markup::{QuoteSources, Transform, is_decorated, transform};
pub use reveal::{RevealAnimator, RevealState};

use tracing::{debug, trace};

use crate::config::{AUTHOR_TITLE_CLASS, QuoteConfig};
use crate::dom::{self, ArenaDom, ArenaNodeId};
use crate::error::Result;
use crate::observe::{
    IntersectionEntry, ResizeEntry, Unsupported, VisibilityObserver, WidthObserver,
};

/// A decorated block and the responders attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedQuote {
    instance: ArenaNodeId,
    layout: Option<LayoutResponder>,
    reveal: RevealAnimator,
}

impl DecoratedQuote {
    pub fn instance(&self) -> ArenaNodeId {
        self.instance
    }

    /// `None` when the host could not observe size.
    pub fn layout(&self) -> Option<&LayoutResponder> {
        self.layout.as_ref()
    }

    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    /// Route a resize entry to the layout responder, if installed.
    pub fn on_resize(&self, dom: &mut ArenaDom, entry: &ResizeEntry) -> bool {
        self.layout
            .as_ref()
            .is_some_and(|layout| layout.on_resize(dom, entry))
    }

    /// Route a visibility entry to the reveal animator.
    pub fn on_intersection<V>(
        &mut self,
        dom: &mut ArenaDom,
        entry: &IntersectionEntry,
        observer: &mut V,
    ) -> bool
    where
        V: VisibilityObserver + ?Sized,
    {
        self.reveal.on_intersection(dom, entry, observer)
    }
}

/// Decorate one block instance.
///
/// Returns `None` when there is no instance or it was decorated before;
/// in both cases the DOM and the host are left untouched.
pub fn decorate<H>(
    dom: &mut ArenaDom,
    instance: Option<ArenaNodeId>,
    host: &mut H,
    config: &QuoteConfig,
) -> Option<DecoratedQuote>
where
    H: WidthObserver + VisibilityObserver + ?Sized,
{
    if transform(dom, instance) != Transform::Decorated {
        return None;
    }
    let instance = instance?;

    let layout = LayoutResponder::install(instance, config, host);
    let mut reveal = RevealAnimator::new(instance, config);
    reveal.install(host);

    Some(DecoratedQuote {
        instance,
        layout,
        reveal,
    })
}

/// Decorate every element matching `config.block_selector`.
///
/// Matches are collected up front, so a block nested in an author or
/// title row of another block is gone from the page by the time it is
/// reached. Such blocks are skipped.
pub fn decorate_all<H>(
    dom: &mut ArenaDom,
    host: &mut H,
    config: &QuoteConfig,
) -> Result<Vec<DecoratedQuote>>
where
    H: WidthObserver + VisibilityObserver + ?Sized,
{
    let blocks = dom::select(dom, &config.block_selector)?;
    let decorated: Vec<_> = blocks
        .into_iter()
        .filter_map(|block| {
            if !dom.is_connected(block) {
                trace!(block = block.0, "quote block removed from page; skipping");
                return None;
            }
            decorate(dom, Some(block), host, config)
        })
        .collect();
    debug!(
        selector = %config.block_selector,
        count = decorated.len(),
        "decorated page blocks"
    );
    Ok(decorated)
}

/// Decorate every quote block of a page for a host without observers.
///
/// A full document comes back as a document; a fragment comes back as a
/// fragment, ready to be assigned to `innerHTML`.
pub fn decorate_page(html: &str, config: &QuoteConfig) -> Result<String> {
    let mut dom = dom::parse_html(html);
    decorate_all(&mut dom, &mut Unsupported, config)?;
    Ok(dom::serialize_like(&dom, html))
}

/// Deliver resize entries to every block; returns how many class lists changed.
pub fn dispatch_resize(dom: &mut ArenaDom, quotes: &[DecoratedQuote], entries: &[ResizeEntry]) -> usize {
    entries
        .iter()
        .map(|entry| quotes.iter().filter(|q| q.on_resize(dom, entry)).count())
        .sum()
}

/// Deliver visibility entries to every block; returns how many were revealed.
pub fn dispatch_intersection<V>(
    dom: &mut ArenaDom,
    quotes: &mut [DecoratedQuote],
    entries: &[IntersectionEntry],
    observer: &mut V,
) -> usize
where
    V: VisibilityObserver + ?Sized,
{
    let mut revealed = 0;
    for entry in entries {
        for quote in quotes.iter_mut() {
            if quote.on_intersection(dom, entry, observer) {
                revealed += 1;
            }
        }
    }
    revealed
}

/// Plain-text view of a quote block, raw or decorated.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuoteSummary {
    pub quote: String,
    pub author: Option<String>,
    pub author_title: Option<String>,
    pub decorated: bool,
}

/// Summarize a block without modifying it.
pub fn summarize(dom: &ArenaDom, instance: ArenaNodeId) -> QuoteSummary {
    if !is_decorated(dom, instance) {
        let sources = QuoteSources::read(dom, instance);
        return QuoteSummary {
            quote: sources
                .body
                .map(|b| dom.text_content(b).trim().to_string())
                .unwrap_or_default(),
            author: sources.author,
            author_title: sources.author_title,
            decorated: false,
        };
    }

    let child = |tag: &str| {
        dom.element_children(instance)
            .find(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == tag))
    };
    let quote = child("blockquote")
        .map(|b| dom.text_content(b).trim().to_string())
        .unwrap_or_default();

    let cite = child("footer").and_then(|footer| {
        dom.element_children(footer)
            .find(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "cite"))
    });
    let (author, author_title) = match cite {
        Some(cite) => {
            let author: String = dom
                .children(cite)
                .filter_map(|c| dom.text(c))
                .collect();
            let title = dom
                .element_children(cite)
                .find(|&c| dom.has_class(c, AUTHOR_TITLE_CLASS))
                .map(|span| dom.text_content(span));
            let author = author.trim();
            ((!author.is_empty()).then(|| author.to_string()), title)
        }
        None => (None, None),
    };

    QuoteSummary {
        quote,
        author,
        author_title,
        decorated: true,
    }
}
