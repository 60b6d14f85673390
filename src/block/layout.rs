//! Width-driven layout switching.

use tracing::trace;

use crate::config::{MOBILE_LAYOUT_CLASS, QuoteConfig};
use crate::dom::{ArenaDom, ArenaNodeId};
use crate::observe::{ResizeEntry, WidthObserver};

/// Toggles [`MOBILE_LAYOUT_CLASS`] on a block as its rendered width
/// crosses the breakpoint. Lives as long as the block; there is no teardown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResponder {
    target: ArenaNodeId,
    breakpoint: f64,
}

impl LayoutResponder {
    /// Subscribe to width changes of `target`. Returns `None` when the host
    /// cannot observe size; the block then keeps its default layout forever.
    pub fn install<W>(target: ArenaNodeId, config: &QuoteConfig, observer: &mut W) -> Option<Self>
    where
        W: WidthObserver + ?Sized,
    {
        if !observer.observe_width(target) {
            trace!(block = target.0, "resize observation unavailable");
            return None;
        }
        Some(Self {
            target,
            breakpoint: config.mobile_breakpoint,
        })
    }

    pub fn target(&self) -> ArenaNodeId {
        self.target
    }

    pub fn breakpoint(&self) -> f64 {
        self.breakpoint
    }

    pub fn is_mobile(&self, width: f64) -> bool {
        width < self.breakpoint
    }

    /// Apply a resize entry. Entries for other elements are ignored.
    /// Returns whether the class list changed.
    pub fn on_resize(&self, dom: &mut ArenaDom, entry: &ResizeEntry) -> bool {
        if entry.target != self.target {
            return false;
        }
        let changed = if self.is_mobile(entry.width) {
            dom.add_class(self.target, MOBILE_LAYOUT_CLASS)
        } else {
            dom.remove_class(self.target, MOBILE_LAYOUT_CLASS)
        };
        if changed {
            trace!(
                block = self.target.0,
                width = entry.width,
                mobile = self.is_mobile(entry.width),
                "layout mode changed"
            );
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{SimulatedHost, Unsupported};

    fn setup() -> (ArenaDom, ArenaNodeId, LayoutResponder) {
        let mut dom = ArenaDom::new();
        let block = dom.create_html_element("div");
        dom.append(dom.document(), block);
        let mut host = SimulatedHost::new();
        let responder = LayoutResponder::install(block, &QuoteConfig::default(), &mut host).unwrap();
        assert!(host.is_observing_width(block));
        (dom, block, responder)
    }

    fn resize(target: ArenaNodeId, width: f64) -> ResizeEntry {
        ResizeEntry { target, width }
    }

    #[test]
    fn test_toggle_sequence() {
        let (mut dom, block, responder) = setup();

        responder.on_resize(&mut dom, &resize(block, 460.0));
        assert!(dom.has_class(block, MOBILE_LAYOUT_CLASS));

        responder.on_resize(&mut dom, &resize(block, 500.0));
        assert!(!dom.has_class(block, MOBILE_LAYOUT_CLASS));

        responder.on_resize(&mut dom, &resize(block, 460.0));
        assert!(dom.has_class(block, MOBILE_LAYOUT_CLASS));
    }

    #[test]
    fn test_breakpoint_is_exclusive() {
        let (mut dom, block, responder) = setup();
        responder.on_resize(&mut dom, &resize(block, 479.9));
        assert!(dom.has_class(block, MOBILE_LAYOUT_CLASS));
        responder.on_resize(&mut dom, &resize(block, 480.0));
        assert!(!dom.has_class(block, MOBILE_LAYOUT_CLASS));
    }

    #[test]
    fn test_repeated_entries_are_idempotent() {
        let (mut dom, block, responder) = setup();
        assert!(responder.on_resize(&mut dom, &resize(block, 300.0)));
        assert!(!responder.on_resize(&mut dom, &resize(block, 320.0)));
        assert_eq!(dom.get_attr(block, "class"), Some(MOBILE_LAYOUT_CLASS));
    }

    #[test]
    fn test_other_targets_ignored() {
        let (mut dom, block, responder) = setup();
        assert!(!responder.on_resize(&mut dom, &resize(ArenaNodeId(999), 100.0)));
        assert!(!dom.has_class(block, MOBILE_LAYOUT_CLASS));
    }

    #[test]
    fn test_not_installed_without_capability() {
        let mut host = Unsupported;
        assert!(LayoutResponder::install(ArenaNodeId(1), &QuoteConfig::default(), &mut host).is_none());
    }

    #[test]
    fn test_custom_breakpoint() {
        let config = QuoteConfig {
            mobile_breakpoint: 600.0,
            ..Default::default()
        };
        let responder =
            LayoutResponder::install(ArenaNodeId(1), &config, &mut SimulatedHost::new()).unwrap();
        assert!(responder.is_mobile(599.0));
        assert!(!responder.is_mobile(600.0));
    }
}
