//! Observation capabilities supplied by the host environment.
//!
//! Blocks never talk to a browser directly. They ask the host to start
//! delivering width or visibility changes for an element; a host that
//! lacks the facility says no, and the block silently does without.
//!
//! - [`Unsupported`] refuses everything (server-side rendering, old browsers).
//! - [`SimulatedHost`] keeps subscriptions in memory and turns layout
//!   geometry into entries, for tests and prerendering.
//!
//! Entries are delivered by whoever owns the event loop: it calls
//! [`crate::block::DecoratedQuote::on_resize`] and
//! [`crate::block::DecoratedQuote::on_intersection`] with them.

use std::collections::HashMap;

use tracing::trace;

use crate::config::QuoteConfig;
use crate::dom::ArenaNodeId;

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two rectangles. Edge-adjacent rectangles intersect with
    /// zero area, as in the browser's intersection algorithm.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        (x1 <= x2 && y1 <= y2).then(|| Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    /// Grow (positive) or shrink (negative) each edge independently.
    pub fn expand(&self, margin: &RootMargin) -> Rect {
        Rect::new(
            self.x - margin.left,
            self.y - margin.top,
            self.width + margin.left + margin.right,
            self.height + margin.top + margin.bottom,
        )
    }
}

/// CSS-style root margin; negative values contract the root.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl std::fmt::Display for RootMargin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Parameters a visibility subscription is registered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl IntersectionOptions {
    /// Reveal options for a config: threshold plus a contracted bottom edge.
    pub fn reveal(config: &QuoteConfig) -> Self {
        Self {
            threshold: config.reveal_threshold,
            root_margin: RootMargin {
                bottom: -config.reveal_bottom_margin,
                ..RootMargin::default()
            },
        }
    }

    /// Compute the entry a browser would report for `target` laid out at
    /// `bounds` inside `viewport`.
    pub fn evaluate(&self, target: ArenaNodeId, bounds: Rect, viewport: Rect) -> IntersectionEntry {
        let root = viewport.expand(&self.root_margin);
        let Some(overlap) = bounds.intersection(&root) else {
            return IntersectionEntry {
                target,
                is_intersecting: false,
                intersection_ratio: 0.0,
            };
        };

        let ratio = if bounds.area() > 0.0 {
            (overlap.area() / bounds.area()).min(1.0)
        } else {
            1.0
        };

        // Edge contact has zero overlap and never counts, even at threshold 0.
        IntersectionEntry {
            target,
            is_intersecting: ratio > 0.0 && ratio >= self.threshold,
            intersection_ratio: ratio,
        }
    }
}

/// A width change for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEntry {
    pub target: ArenaNodeId,
    /// Rendered width of the element.
    pub width: f64,
}

/// A visibility change for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ArenaNodeId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

/// Capability to report rendered width changes.
pub trait WidthObserver {
    /// Start delivering width changes for `target`. Returns `false` when the
    /// host cannot observe size, in which case nothing will ever be delivered.
    fn observe_width(&mut self, target: ArenaNodeId) -> bool;
}

/// Capability to report viewport visibility changes.
pub trait VisibilityObserver {
    /// Start delivering visibility changes for `target`. Returns `false`
    /// when the host cannot observe intersection.
    fn observe_visibility(&mut self, target: ArenaNodeId, options: IntersectionOptions) -> bool;

    /// Stop delivering visibility changes for `target`.
    fn unobserve_visibility(&mut self, target: ArenaNodeId);
}

/// Host with no observation facilities at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl WidthObserver for Unsupported {
    fn observe_width(&mut self, _target: ArenaNodeId) -> bool {
        false
    }
}

impl VisibilityObserver for Unsupported {
    fn observe_visibility(&mut self, _target: ArenaNodeId, _options: IntersectionOptions) -> bool {
        false
    }

    fn unobserve_visibility(&mut self, _target: ArenaNodeId) {}
}

#[derive(Debug, Clone, Copy)]
struct VisibilitySubscription {
    options: IntersectionOptions,
    /// Last reported state; `None` until the initial entry is delivered.
    last: Option<bool>,
}

/// In-memory host that records subscriptions and produces entries from
/// geometry supplied by the caller.
///
/// Mirrors browser delivery: a visibility entry is produced on the first
/// evaluation after subscribing and afterwards only when the target
/// crosses its threshold.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    supports_resize: bool,
    supports_intersection: bool,
    width_targets: Vec<ArenaNodeId>,
    visibility: HashMap<ArenaNodeId, VisibilitySubscription>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// Host with both capabilities.
    pub fn new() -> Self {
        Self::with_support(true, true)
    }

    pub fn with_support(resize: bool, intersection: bool) -> Self {
        Self {
            supports_resize: resize,
            supports_intersection: intersection,
            width_targets: Vec::new(),
            visibility: HashMap::new(),
        }
    }

    pub fn is_observing_width(&self, target: ArenaNodeId) -> bool {
        self.width_targets.contains(&target)
    }

    pub fn is_observing_visibility(&self, target: ArenaNodeId) -> bool {
        self.visibility.contains_key(&target)
    }

    /// Options `target` was subscribed with.
    pub fn visibility_options(&self, target: ArenaNodeId) -> Option<IntersectionOptions> {
        self.visibility.get(&target).map(|s| s.options)
    }

    /// One resize entry per width-observed target, all at `width`.
    pub fn resize_all(&self, width: f64) -> Vec<ResizeEntry> {
        self.width_targets
            .iter()
            .map(|&target| ResizeEntry { target, width })
            .collect()
    }

    /// Entries for a new layout. `layout` maps targets to their bounds;
    /// observed targets missing from it are treated as not rendered.
    pub fn scroll(&mut self, layout: &[(ArenaNodeId, Rect)], viewport: Rect) -> Vec<IntersectionEntry> {
        let mut targets: Vec<_> = self.visibility.keys().copied().collect();
        targets.sort_by_key(|t| t.0);

        let mut entries = Vec::new();
        for target in targets {
            let Some(sub) = self.visibility.get_mut(&target) else {
                continue;
            };
            let entry = match layout.iter().find(|(id, _)| *id == target) {
                Some(&(_, bounds)) => sub.options.evaluate(target, bounds, viewport),
                None => IntersectionEntry {
                    target,
                    is_intersecting: false,
                    intersection_ratio: 0.0,
                },
            };
            if sub.last != Some(entry.is_intersecting) {
                sub.last = Some(entry.is_intersecting);
                trace!(
                    block = target.0,
                    intersecting = entry.is_intersecting,
                    ratio = entry.intersection_ratio,
                    "visibility changed"
                );
                entries.push(entry);
            }
        }
        entries
    }
}

impl WidthObserver for SimulatedHost {
    fn observe_width(&mut self, target: ArenaNodeId) -> bool {
        if !self.supports_resize {
            return false;
        }
        if !self.width_targets.contains(&target) {
            self.width_targets.push(target);
        }
        true
    }
}

impl VisibilityObserver for SimulatedHost {
    fn observe_visibility(&mut self, target: ArenaNodeId, options: IntersectionOptions) -> bool {
        if !self.supports_intersection {
            return false;
        }
        self.visibility
            .insert(target, VisibilitySubscription { options, last: None });
        true
    }

    fn unobserve_visibility(&mut self, target: ArenaNodeId) {
        self.visibility.remove(&target);
    }
}
