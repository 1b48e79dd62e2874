//! Snap functionality for locking arrow ends onto card anchors.

use crate::entities::{AttachedEnd, Card};
use crate::geometry::{SNAP_DISTANCE, find_snap_target};
use kurbo::Point;
use std::fmt;

/// Decides where a dragged arrow end locks on.
///
/// The interaction machine only talks to this trait, so a different
/// strategy (nearest-anchor, per-zoom radius) can be swapped in without
/// touching gesture code.
pub trait SnapResolver: fmt::Debug {
    /// Anchor to attach to for a pointer at `world_point`, if any.
    fn resolve(&self, world_point: Point, cards: &[Card]) -> Option<AttachedEnd>;
}

/// First open anchor within a fixed world-space radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSnapResolver {
    pub threshold: f64,
}

impl AnchorSnapResolver {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for AnchorSnapResolver {
    fn default() -> Self {
        Self::new(SNAP_DISTANCE)
    }
}

impl SnapResolver for AnchorSnapResolver {
    fn resolve(&self, world_point: Point, cards: &[Card]) -> Option<AttachedEnd> {
        find_snap_target(world_point, cards, self.threshold)
    }
}
