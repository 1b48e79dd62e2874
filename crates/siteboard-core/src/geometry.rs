//! Anchor, snapping and curve geometry.
//!
//! Every function here is pure and total: no lookup fails, no input panics.

use crate::entities::{Anchor, Arrow, ArrowEnd, AttachedEnd, Card, CardId};
use kurbo::{CubicBez, ParamCurve, Point, Vec2};

/// Default snap radius in world units.
pub const SNAP_DISTANCE: f64 = 40.0;

/// Shortest control arm used when bending an arrow away from its anchor.
pub const MIN_CONTROL_DISTANCE: f64 = 40.0;

/// Control arm length as a fraction of the chord length.
pub const CONTROL_DISTANCE_RATIO: f64 = 0.4;

/// World-space midpoint of the given side of a card.
pub fn anchor_position(card: &Card, anchor: Anchor) -> Point {
    match anchor {
        Anchor::Top => Point::new(card.x + card.w / 2.0, card.y),
        Anchor::Bottom => Point::new(card.x + card.w / 2.0, card.y + card.h),
        Anchor::Left => Point::new(card.x, card.y + card.h / 2.0),
        Anchor::Right => Point::new(card.x + card.w, card.y + card.h / 2.0),
    }
}

/// First open anchor strictly closer than `threshold` to `world_point`.
///
/// Cards are scanned in the order given and anchors in canonical order.
/// The first hit wins even when a later anchor is closer.
pub fn find_snap_target<'a>(
    world_point: Point,
    cards: impl IntoIterator<Item = &'a Card>,
    threshold: f64,
) -> Option<AttachedEnd> {
    cards.into_iter().find_map(|card| {
        card.open_anchors
            .iter()
            .find(|&anchor| anchor_position(card, anchor).distance(world_point) < threshold)
            .map(|anchor| AttachedEnd::new(card.id, anchor))
    })
}

/// Vector pointing outward from `anchor`, `distance` long. Zero for free ends.
pub fn control_offset(anchor: Option<Anchor>, distance: f64) -> Vec2 {
    match anchor {
        Some(Anchor::Top) => Vec2::new(0.0, -distance),
        Some(Anchor::Right) => Vec2::new(distance, 0.0),
        Some(Anchor::Bottom) => Vec2::new(0.0, distance),
        Some(Anchor::Left) => Vec2::new(-distance, 0.0),
        None => Vec2::ZERO,
    }
}

/// Point on a cubic bezier at parameter `t` in `[0, 1]`.
pub fn cubic_bezier_point(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    CubicBez::new(p0, p1, p2, p3).eval(t)
}

/// Control arm length for an arrow spanning `from` to `to`.
pub fn control_distance(from: Point, to: Point) -> f64 {
    (from.distance(to) * CONTROL_DISTANCE_RATIO).max(MIN_CONTROL_DISTANCE)
}

/// Cubic for an arrow, leaving each anchored end perpendicular to its edge.
pub fn arrow_curve(
    from: Point,
    from_anchor: Anchor,
    to: Point,
    to_anchor: Option<Anchor>,
) -> CubicBez {
    let distance = control_distance(from, to);
    CubicBez::new(
        from,
        from + control_offset(Some(from_anchor), distance),
        to + control_offset(to_anchor, distance),
        to,
    )
}

/// World-space endpoints of an arrow whose cards all exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedArrow {
    pub from: Point,
    pub from_anchor: Anchor,
    pub to: Point,
    pub to_anchor: Option<Anchor>,
}

impl ResolvedArrow {
    /// Resolve an arrow's ends through `lookup`.
    ///
    /// Returns `None` when either referenced card is gone; such arrows are
    /// simply not drawn.
    pub fn resolve<'a, F>(arrow: &Arrow, lookup: F) -> Option<Self>
    where
        F: Fn(CardId) -> Option<&'a Card>,
    {
        let origin = lookup(arrow.from.card_id)?;
        let from = anchor_position(origin, arrow.from.anchor);
        let (to, to_anchor) = match arrow.to {
            ArrowEnd::Attached(end) => {
                let target = lookup(end.card_id)?;
                (anchor_position(target, end.anchor), Some(end.anchor))
            }
            ArrowEnd::Free { x, y } => (Point::new(x, y), None),
        };
        Some(Self {
            from,
            from_anchor: arrow.from.anchor,
            to,
            to_anchor,
        })
    }

    pub fn curve(&self) -> CubicBez {
        arrow_curve(self.from, self.from_anchor, self.to, self.to_anchor)
    }

    /// Where the delete affordance sits.
    pub fn midpoint(&self) -> Point {
        let c = self.curve();
        cubic_bezier_point(0.5, c.p0, c.p1, c.p2, c.p3)
    }
}
