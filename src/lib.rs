//! # quotecraft
//!
//! Decorates quote blocks in content-managed HTML pages: authored rows
//! (quote, author, author title) become a semantic, accessible
//! `blockquote` + citation, with a width-driven layout class and a
//! one-shot scroll reveal.
//!
//! ## Features
//!
//! - Arena HTML DOM parsed with html5ever, queried with CSS selectors
//! - Markup transform guarded against double decoration
//! - Observation capabilities injected by the host, degrading silently
//!   when a host cannot observe size or visibility
//! - CLI for decorating page files and WASM bindings for the browser
//!
//! ## Quick Start
//!
//! ```
//! use quotecraft::{QuoteConfig, decorate_page};
//!
//! let page = r#"<div class="quote">
//!   <div><p>Simplicity is prerequisite for reliability.</p></div>
//!   <div>Edsger W. Dijkstra</div>
//!   <div>Computer scientist</div>
//! </div>"#;
//!
//! let html = decorate_page(page, &QuoteConfig::default()).unwrap();
//! assert!(html.contains(r#"role="figure""#));
//! assert!(html.contains(r#"<span class="author-title">Computer scientist</span>"#));
//! ```
//!
//! ## Driving the responders
//!
//! ```
//! use quotecraft::block::decorate;
//! use quotecraft::dom::{parse_html, select_first};
//! use quotecraft::observe::{ResizeEntry, SimulatedHost};
//! use quotecraft::QuoteConfig;
//!
//! let mut dom = parse_html(r#"<div class="quote"><div>Hi</div></div>"#);
//! let block = select_first(&dom, ".quote").unwrap();
//! let mut host = SimulatedHost::new();
//!
//! let quote = decorate(&mut dom, block, &mut host, &QuoteConfig::default()).unwrap();
//! quote.on_resize(&mut dom, &ResizeEntry { target: quote.instance(), width: 360.0 });
//! assert!(dom.has_class(quote.instance(), "mobile-layout"));
//! ```

pub mod block;
pub mod config;
pub mod dom;
pub mod error;
pub mod observe;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use block::{DecoratedQuote, QuoteSummary, decorate, decorate_all, decorate_page, summarize};
pub use config::QuoteConfig;
pub use error::{Error, Result};
