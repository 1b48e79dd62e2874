//! Arrow entity.

use super::card::{Anchor, CardId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arrow identifier derived from its origin, so one anchor can own at most
/// one outgoing arrow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrowId(String);

impl ArrowId {
    /// The id of the arrow leaving `anchor` on `card`.
    pub fn for_origin(card: CardId, anchor: Anchor) -> Self {
        Self(format!("{}-{}", card, anchor))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An arrow end locked onto a card anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedEnd {
    pub card_id: CardId,
    pub anchor: Anchor,
}

impl AttachedEnd {
    pub fn new(card_id: CardId, anchor: Anchor) -> Self {
        Self { card_id, anchor }
    }
}

/// Destination of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArrowEnd {
    /// Locked to another card's anchor.
    Attached(AttachedEnd),
    /// A raw world coordinate.
    Free { x: f64, y: f64 },
}

impl ArrowEnd {
    pub fn free(point: Point) -> Self {
        Self::Free { x: point.x, y: point.y }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }

    /// Anchor side the end is locked to, if any.
    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            Self::Attached(end) => Some(end.anchor),
            Self::Free { .. } => None,
        }
    }

    pub fn card_id(&self) -> Option<CardId> {
        match self {
            Self::Attached(end) => Some(end.card_id),
            Self::Free { .. } => None,
        }
    }
}

impl From<AttachedEnd> for ArrowEnd {
    fn from(end: AttachedEnd) -> Self {
        Self::Attached(end)
    }
}

/// A directed connection leaving a card anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub id: ArrowId,
    pub from: AttachedEnd,
    pub to: ArrowEnd,
}

impl Arrow {
    /// Create an arrow; the id follows from the origin.
    pub fn new(from: AttachedEnd, to: ArrowEnd) -> Self {
        Self {
            id: ArrowId::for_origin(from.card_id, from.anchor),
            from,
            to,
        }
    }

    /// Whether either end references `card`.
    pub fn touches(&self, card: CardId) -> bool {
        self.from.card_id == card || self.to.card_id() == Some(card)
    }
}
