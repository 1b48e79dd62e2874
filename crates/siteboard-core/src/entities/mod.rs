//! Entity definitions for the board.

mod arrow;
mod card;

pub use arrow::{Arrow, ArrowEnd, ArrowId, AttachedEnd};
pub use card::{Anchor, Card, CardId, CardKind, CardPatch, OpenAnchors, normalize_url};
