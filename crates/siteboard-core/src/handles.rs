//! Manipulation handles and hit testing.

use crate::entities::{Anchor, ArrowId, Card, CardId};
use crate::geometry::{ResolvedArrow, anchor_position};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;
use kurbo::{ParamCurveNearest, Point};

/// Handle hit radius in screen pixels.
pub const HANDLE_HIT_RADIUS: f64 = 10.0;
/// Arrow stroke hit tolerance in screen pixels.
pub const ARROW_HIT_TOLERANCE: f64 = 6.0;
/// Distance of the endpoint handle past the arrow tip, in world units.
pub const ENDPOINT_HANDLE_OFFSET: f64 = 5.0;

const CURVE_ACCURACY: f64 = 1e-3;

/// Type of card handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Open anchor; pressing it starts a new arrow.
    Anchor(Anchor),
    /// Bottom-right resize grip.
    Resize,
}

/// A card handle with its world position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a world point hits this handle.
    /// `tolerance` should be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Handles shown on a card: its open anchors, then the resize grip.
pub fn card_handles(card: &Card) -> Vec<Handle> {
    let mut handles: Vec<Handle> = card
        .open_anchors
        .iter()
        .map(|anchor| Handle::new(anchor_position(card, anchor), HandleKind::Anchor(anchor)))
        .collect();
    handles.push(Handle::new(Point::new(card.x + card.w, card.y + card.h), HandleKind::Resize));
    handles
}

/// Where the draggable endpoint handle of a focused arrow sits: a little
/// past the tip along the straight line from origin to tip.
pub fn endpoint_handle_position(arrow: &ResolvedArrow) -> Point {
    let chord = arrow.to - arrow.from;
    let len = chord.hypot();
    if len <= f64::EPSILON {
        return arrow.to;
    }
    arrow.to + chord * (ENDPOINT_HANDLE_OFFSET / len)
}

/// What lies under the pointer, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Endpoint handle of the focused arrow.
    ArrowEndpoint(ArrowId),
    AnchorHandle(CardId, Anchor),
    ResizeHandle(CardId),
    CardBody(CardId),
    /// The stroke of an arrow.
    ArrowCurve(ArrowId),
    Empty,
}

/// Resolve a world point into a [`HitTarget`].
///
/// Handles beat bodies so that starting an arrow never turns into a card
/// drag where the two overlap. Among cards the topmost (highest z) wins.
pub fn hit_test<S: KeyValueStore>(
    store: &EntityStore<S>,
    world: Point,
    zoom: f64,
    focused_arrow: Option<&ArrowId>,
) -> HitTarget {
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };
    let handle_radius = HANDLE_HIT_RADIUS / zoom;

    if let Some(id) = focused_arrow {
        let endpoint = store
            .arrow(id)
            .and_then(|arrow| store.resolve_arrow(arrow))
            .map(|resolved| endpoint_handle_position(&resolved));
        if let Some(position) = endpoint {
            if (world - position).hypot() <= handle_radius {
                return HitTarget::ArrowEndpoint(id.clone());
            }
        }
    }

    let mut by_z: Vec<&Card> = store.cards().iter().collect();
    by_z.sort_by(|a, b| b.z.cmp(&a.z));

    for card in &by_z {
        for handle in card_handles(card) {
            if handle.hit_test(world, handle_radius) {
                return match handle.kind {
                    HandleKind::Anchor(anchor) => HitTarget::AnchorHandle(card.id, anchor),
                    HandleKind::Resize => HitTarget::ResizeHandle(card.id),
                };
            }
        }
    }

    if let Some(card) = by_z.iter().find(|card| card.contains(world)) {
        return HitTarget::CardBody(card.id);
    }

    let tolerance = ARROW_HIT_TOLERANCE / zoom;
    // Later arrows draw on top.
    for arrow in store.arrows().iter().rev() {
        let Some(resolved) = store.resolve_arrow(arrow) else {
            continue;
        };
        let nearest = resolved.curve().nearest(world, CURVE_ACCURACY);
        if nearest.distance_sq <= tolerance * tolerance {
            return HitTarget::ArrowCurve(arrow.id.clone());
        }
    }

    HitTarget::Empty
}
