//! One-shot scroll reveal.
//!
//! ```text
//! Unobserved --install--> Watching --visible--> Revealed
//! ```
//!
//! `Revealed` is terminal: the class stays, the subscription is dropped,
//! and later entries are ignored. A host without intersection support
//! leaves the animator in `Unobserved` for good.

use tracing::{debug, trace};

use crate::config::{ANIMATE_IN_CLASS, QuoteConfig};
use crate::dom::{ArenaDom, ArenaNodeId};
use crate::observe::{IntersectionEntry, IntersectionOptions, VisibilityObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Unobserved,
    Watching,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealAnimator {
    target: ArenaNodeId,
    options: IntersectionOptions,
    state: RevealState,
}

impl RevealAnimator {
    pub fn new(target: ArenaNodeId, config: &QuoteConfig) -> Self {
        Self {
            target,
            options: IntersectionOptions::reveal(config),
            state: RevealState::Unobserved,
        }
    }

    pub fn target(&self) -> ArenaNodeId {
        self.target
    }

    pub fn options(&self) -> IntersectionOptions {
        self.options
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Subscribe to visibility changes. Only meaningful from `Unobserved`;
    /// returns whether the animator is now watching.
    pub fn install<V>(&mut self, observer: &mut V) -> bool
    where
        V: VisibilityObserver + ?Sized,
    {
        if self.state != RevealState::Unobserved {
            return self.state == RevealState::Watching;
        }
        if observer.observe_visibility(self.target, self.options) {
            self.state = RevealState::Watching;
            true
        } else {
            trace!(block = self.target.0, "intersection observation unavailable");
            false
        }
    }

    /// Apply a visibility entry. On the first visible entry the block gets
    /// [`ANIMATE_IN_CLASS`] and the subscription is dropped. Returns
    /// whether this entry revealed the block.
    pub fn on_intersection<V>(
        &mut self,
        dom: &mut ArenaDom,
        entry: &IntersectionEntry,
        observer: &mut V,
    ) -> bool
    where
        V: VisibilityObserver + ?Sized,
    {
        if entry.target != self.target
            || self.state != RevealState::Watching
            || !entry.is_intersecting
        {
            return false;
        }

        dom.add_class(self.target, ANIMATE_IN_CLASS);
        observer.unobserve_visibility(self.target);
        self.state = RevealState::Revealed;
        debug!(
            block = self.target.0,
            ratio = entry.intersection_ratio,
            "quote block revealed"
        );
        true
    }
}
