//! WASM bindings for decorating quote blocks in the browser.
//!
//! The page script owns the real DOM and the real observers; these
//! bindings supply the markup transform and the decisions the observer
//! callbacks need:
//!
//! ```js
//! block.outerHTML = decorate_block(block.outerHTML);
//! if (typeof IntersectionObserver !== 'undefined') {
//!   const gate = new RevealGate();
//!   const io = new IntersectionObserver(([e]) => {
//!     if (gate.on_visibility(e.isIntersecting)) { e.target.classList.add('animate-in'); io.unobserve(e.target); }
//!   }, reveal_observer_options());
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::block::{RevealState, decorate_page as decorate_page_html};
use crate::config::QuoteConfig;
use crate::dom;
use crate::observe::{IntersectionOptions, Unsupported};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn config_for(selector: Option<String>) -> QuoteConfig {
    let mut config = QuoteConfig::default();
    if let Some(selector) = selector {
        config.block_selector = selector;
    }
    config
}

/// Decorate every quote block of a page or fragment.
#[wasm_bindgen]
pub fn decorate_page(html: &str, selector: Option<String>) -> Result<String, JsValue> {
    decorate_page_html(html, &config_for(selector)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decorate a single block given as its outer HTML; returns the new outer HTML.
/// Markup that is already decorated comes back unchanged.
#[wasm_bindgen]
pub fn decorate_block(block_html: &str) -> Result<String, JsValue> {
    let mut page = dom::parse_html(block_html);
    let block = dom::body(&page)
        .and_then(|body| page.element_children(body).next())
        .ok_or_else(|| JsValue::from_str("no block element in markup"))?;

    let config = QuoteConfig::default();
    if crate::block::decorate(&mut page, Some(block), &mut Unsupported, &config).is_none() {
        // Already decorated: hand the markup back as parsed.
        tracing::debug!("block already decorated; returning it unchanged");
    }
    Ok(dom::outer_html(&page, block))
}

/// Whether a block of `width` gets the mobile layout class.
#[wasm_bindgen]
pub fn is_mobile_width(width: f64) -> bool {
    width < QuoteConfig::default().mobile_breakpoint
}

/// Whether an observer entry crosses the reveal threshold.
#[wasm_bindgen]
pub fn should_reveal(intersection_ratio: f64, is_intersecting: bool) -> bool {
    is_intersecting && intersection_ratio >= QuoteConfig::default().reveal_threshold
}

/// Options object for `new IntersectionObserver(callback, options)`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn reveal_observer_options() -> Result<js_sys::Object, JsValue> {
    let options = IntersectionOptions::reveal(&QuoteConfig::default());
    let object = js_sys::Object::new();
    js_sys::Reflect::set(
        &object,
        &JsValue::from_str("threshold"),
        &JsValue::from_f64(options.threshold),
    )?;
    js_sys::Reflect::set(
        &object,
        &JsValue::from_str("rootMargin"),
        &JsValue::from_str(&options.root_margin.to_string()),
    )?;
    Ok(object)
}

/// `rootMargin` string for the reveal observer.
#[wasm_bindgen]
pub fn reveal_root_margin() -> String {
    IntersectionOptions::reveal(&QuoteConfig::default())
        .root_margin
        .to_string()
}

/// One-shot reveal decision for a single block.
///
/// Created only once the page has an intersection observer, so it starts
/// out watching.
#[wasm_bindgen]
pub struct RevealGate {
    state: RevealState,
}

impl Default for RevealGate {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RevealGate {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            state: RevealState::Watching,
        }
    }

    /// Returns `true` exactly once: on the first intersecting entry.
    pub fn on_visibility(&mut self, is_intersecting: bool) -> bool {
        if self.state == RevealState::Watching && is_intersecting {
            self.state = RevealState::Revealed;
            return true;
        }
        false
    }

    #[wasm_bindgen(getter)]
    pub fn revealed(&self) -> bool {
        self.state == RevealState::Revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorate_page_fragment() {
        let html = decorate_page(r#"<div class="note"><div>Q</div></div>"#, Some(".note".to_string())).unwrap();
        assert_eq!(
            html,
            r#"<div class="note" role="figure" aria-label="Quote" data-block-status="decorated"><blockquote role="presentation">Q</blockquote></div>"#
        );
    }

    #[test]
    fn test_reveal_gate_fires_once() {
        let mut gate = RevealGate::new();
        assert!(!gate.on_visibility(false));
        assert!(gate.on_visibility(true));
        assert!(!gate.on_visibility(true));
        assert!(gate.revealed());
    }

    #[test]
    fn test_should_reveal_threshold() {
        assert!(!should_reveal(0.1, true));
        assert!(should_reveal(0.2, true));
        assert!(!should_reveal(1.0, false));
    }

    #[test]
    fn test_decorate_block_markup() {
        let html = decorate_block(r#"<div class="quote"><div>Q</div><div>A</div></div>"#).unwrap();
        assert_eq!(
            html,
            r#"<div class="quote" role="figure" aria-label="Quote" data-block-status="decorated"><blockquote role="presentation">Q</blockquote><footer><cite>A</cite></footer></div>"#
        );
        assert_eq!(decorate_block(&html).unwrap(), html);

        assert!(is_mobile_width(479.0));
        assert!(!is_mobile_width(480.0));
        assert_eq!(reveal_root_margin(), "0px 0px -50px 0px");
    }
}
