//! Card entity.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable card identifier, assigned from a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four edge midpoints of a card.
///
/// The declaration order is the canonical scan order used by snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// All anchors in canonical order.
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Right => "right",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anchors not yet claimed by an outgoing arrow.
///
/// Always deduplicated and kept in canonical order, whatever order
/// anchors were removed and restored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Anchor>", into = "Vec<Anchor>")]
pub struct OpenAnchors(Vec<Anchor>);

impl OpenAnchors {
    /// All four anchors open.
    pub fn all() -> Self {
        Self(Anchor::ALL.to_vec())
    }

    /// No anchors open.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, anchor: Anchor) -> bool {
        self.0.contains(&anchor)
    }

    /// Remove an anchor. Returns false if it was not open.
    pub fn remove(&mut self, anchor: Anchor) -> bool {
        let before = self.0.len();
        self.0.retain(|&a| a != anchor);
        self.0.len() != before
    }

    /// Re-open an anchor. Returns false if it was already open.
    pub fn insert(&mut self, anchor: Anchor) -> bool {
        match self.0.binary_search(&anchor) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, anchor);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Anchor> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for OpenAnchors {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Vec<Anchor>> for OpenAnchors {
    fn from(mut anchors: Vec<Anchor>) -> Self {
        anchors.sort();
        anchors.dedup();
        Self(anchors)
    }
}

impl From<OpenAnchors> for Vec<Anchor> {
    fn from(anchors: OpenAnchors) -> Self {
        anchors.0
    }
}

/// What a card currently shows.
///
/// Older boards stored these as `input` / `iframe`; both spellings load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Freshly placed, waiting for a link to be typed.
    #[default]
    #[serde(alias = "input")]
    Editing,
    /// Holds a committed link rendered as embedded content.
    #[serde(alias = "iframe")]
    Embedded,
}

/// A movable, resizable box on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    /// World-space top-left corner.
    pub x: f64,
    pub y: f64,
    /// World-space size, independent of zoom.
    pub w: f64,
    pub h: f64,
    /// Stacking order (higher draws above).
    pub z: u64,
    #[serde(alias = "type", default)]
    pub kind: CardKind,
    #[serde(alias = "value", default)]
    pub content: String,
    #[serde(alias = "anchors", default)]
    pub open_anchors: OpenAnchors,
}

impl Card {
    /// Create an empty editing card with all anchors open.
    pub fn new(id: CardId, position: Point, size: Size, z: u64) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            w: size.width,
            h: size.height,
            z,
            kind: CardKind::Editing,
            content: String::new(),
            open_anchors: OpenAnchors::all(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// World-space bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    pub fn is_editing(&self) -> bool {
        self.kind == CardKind::Editing
    }

    /// Whether the card still has nothing typed into it.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// URL to embed, with a scheme added when the user left it out.
    pub fn embed_url(&self) -> Option<String> {
        match self.kind {
            CardKind::Embedded => Some(normalize_url(&self.content)),
            CardKind::Editing => None,
        }
    }
}

/// Prefix `https://` unless the link already carries an http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Partial update applied by [`crate::store::EntityStore::update_card`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub kind: Option<CardKind>,
    pub content: Option<String>,
}

impl CardPatch {
    pub fn moved_to(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    pub fn resized_to(size: Size) -> Self {
        Self {
            w: Some(size.width),
            h: Some(size.height),
            ..Self::default()
        }
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into a card in place.
    pub fn apply(&self, card: &mut Card) {
        if let Some(x) = self.x {
            card.x = x;
        }
        if let Some(y) = self.y {
            card.y = y;
        }
        if let Some(w) = self.w {
            card.w = w;
        }
        if let Some(h) = self.h {
            card.h = h;
        }
        if let Some(kind) = self.kind {
            card.kind = kind;
        }
        if let Some(content) = &self.content {
            card.content.clone_from(content);
        }
    }
}
