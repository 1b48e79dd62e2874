//! Authoritative card and arrow collections with write-through persistence.

use crate::entities::{Arrow, ArrowEnd, ArrowId, Card, CardId, CardKind, CardPatch};
use crate::geometry::ResolvedArrow;
use crate::storage::{ARROWS_KEY, ID_COUNTER_KEY, ITEMS_KEY, KeyValueStore, load_json, save_json};
use kurbo::{Point, Size};
use serde::de::DeserializeOwned;

/// Size given to freshly created cards.
pub const DEFAULT_CARD_SIZE: Size = Size::new(200.0, 100.0);

/// Owns every card and arrow on the board.
///
/// Each mutation updates memory first, then overwrites the affected
/// collection in storage. Storage failures are logged and swallowed; the
/// in-memory state stays authoritative for the session.
#[derive(Debug)]
pub struct EntityStore<S: KeyValueStore> {
    storage: S,
    /// Cards in creation order, which is also the snap scan order.
    cards: Vec<Card>,
    arrows: Vec<Arrow>,
    /// Next id (and z) to hand out. Never reused.
    next_id: u64,
    default_card_size: Size,
}

impl<S: KeyValueStore> EntityStore<S> {
    /// Load the board from `storage`, falling back to empty collections for
    /// anything absent or unreadable.
    pub fn load(storage: S) -> Self {
        let cards: Vec<Card> = load_or_default(&storage, ITEMS_KEY);
        let arrows: Vec<Arrow> = load_or_default(&storage, ARROWS_KEY);

        let floor = cards.iter().map(|c| c.id.0 + 1).max().unwrap_or(1);
        let next_id = match load_json::<u64, _>(&storage, ID_COUNTER_KEY) {
            Ok(Some(counter)) => counter.max(floor),
            Ok(None) => floor,
            Err(e) => {
                log::warn!("Ignoring stored id counter: {}", e);
                floor
            }
        };

        log::info!("Loaded {} cards and {} arrows", cards.len(), arrows.len());
        Self {
            storage,
            cards,
            arrows,
            next_id,
            default_card_size: DEFAULT_CARD_SIZE,
        }
    }

    /// Use a different size for cards created from now on.
    pub fn with_default_card_size(mut self, size: Size) -> Self {
        self.default_card_size = size;
        self
    }

    // --- Cards ---

    /// Place a new editing card with its top-left at `world_point`.
    pub fn create_card(&mut self, world_point: Point) -> Card {
        let id = self.next_id;
        self.next_id += 1;

        let card = Card::new(CardId(id), world_point, self.default_card_size, id);
        self.cards.push(card.clone());
        log::info!("Created card {} at ({:.1}, {:.1})", id, world_point.x, world_point.y);

        self.persist_cards();
        self.persist_counter();
        card
    }

    /// Merge `patch` into a card. Returns false if the card is gone.
    pub fn update_card(&mut self, id: CardId, patch: &CardPatch) -> bool {
        let Some(card) = self.card_mut(id) else {
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        patch.apply(card);
        self.persist_cards();
        true
    }

    /// Remove a card. Arrows pointing at it stay stored but become undrawable.
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        let card = self.cards.remove(index);
        log::info!("Removed card {}", id);
        self.persist_cards();
        Some(card)
    }

    /// Replace the text of a card that is still being edited.
    pub fn set_card_content(&mut self, id: CardId, content: &str) -> bool {
        match self.card_mut(id) {
            Some(card) if card.is_editing() => {
                card.content = content.to_string();
                self.persist_cards();
                true
            }
            _ => false,
        }
    }

    /// Promote an editing card to embedded content.
    ///
    /// Content is trimmed first; blank or whitespace-only content is rejected
    /// and the card stays in editing mode.
    pub fn commit_card_content(&mut self, id: CardId, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        match self.card_mut(id) {
            Some(card) if card.is_editing() => {
                card.content = content.to_string();
                card.kind = CardKind::Embedded;
                log::info!("Card {} now embeds {}", id, content);
                self.persist_cards();
                true
            }
            _ => false,
        }
    }

    /// Drop a card that lost focus without anything typed into it.
    pub fn discard_empty_card(&mut self, id: CardId) -> bool {
        let abandoned = self.card(id).is_some_and(|c| c.is_editing() && c.is_blank());
        abandoned && self.remove_card(id).is_some()
    }

    // --- Arrows ---

    /// Insert an arrow and claim its origin anchor.
    ///
    /// A no-op when an arrow with the same id exists, the origin card is
    /// gone, or the origin anchor is already taken.
    pub fn create_arrow(&mut self, arrow: Arrow) -> bool {
        if self.arrow(&arrow.id).is_some() {
            return false;
        }
        let Some(origin) = self.card_mut(arrow.from.card_id) else {
            return false;
        };
        if !origin.open_anchors.remove(arrow.from.anchor) {
            return false;
        }

        log::info!("Created arrow {}", arrow.id);
        self.arrows.push(arrow);
        self.persist_cards();
        self.persist_arrows();
        true
    }

    /// Move an arrow's destination. Returns false if the arrow is gone.
    pub fn set_arrow_end(&mut self, id: &ArrowId, end: ArrowEnd) -> bool {
        let Some(arrow) = self.arrows.iter_mut().find(|a| &a.id == id) else {
            return false;
        };
        if arrow.to != end {
            arrow.to = end;
            self.persist_arrows();
        }
        true
    }

    /// Remove an arrow and give its origin anchor back, if the card remains.
    pub fn remove_arrow(&mut self, id: &ArrowId) -> Option<Arrow> {
        let index = self.arrows.iter().position(|a| &a.id == id)?;
        let arrow = self.arrows.remove(index);

        let restored = self
            .card_mut(arrow.from.card_id)
            .map(|origin| origin.open_anchors.insert(arrow.from.anchor))
            .unwrap_or(false);

        log::info!("Removed arrow {}", arrow.id);
        if restored {
            self.persist_cards();
        }
        self.persist_arrows();
        Some(arrow)
    }

    // --- Queries ---

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn arrow(&self, id: &ArrowId) -> Option<&Arrow> {
        self.arrows.iter().find(|a| &a.id == id)
    }

    /// Cards in creation order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn arrow_count(&self) -> usize {
        self.arrows.len()
    }

    /// The id the next created card will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Endpoints of an arrow, or `None` if it references a missing card.
    pub fn resolve_arrow(&self, arrow: &Arrow) -> Option<ResolvedArrow> {
        ResolvedArrow::resolve(arrow, |id| self.card(id))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // --- Persistence ---

    fn persist_cards(&self) {
        if let Err(e) = save_json(&self.storage, ITEMS_KEY, &self.cards) {
            log::error!("Failed to persist cards: {}", e);
        }
    }

    fn persist_arrows(&self) {
        if let Err(e) = save_json(&self.storage, ARROWS_KEY, &self.arrows) {
            log::error!("Failed to persist arrows: {}", e);
        }
    }

    fn persist_counter(&self) {
        if let Err(e) = save_json(&self.storage, ID_COUNTER_KEY, &self.next_id) {
            log::error!("Failed to persist id counter: {}", e);
        }
    }
}

fn load_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore,
{
    match load_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Ignoring stored {}: {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Anchor, AttachedEnd};
    use crate::storage::{MemoryStorage, StorageError, StorageResult};

    fn empty_store() -> EntityStore<MemoryStorage> {
        EntityStore::load(MemoryStorage::new())
    }

    fn arrow_from(card: CardId, anchor: Anchor) -> Arrow {
        Arrow::new(AttachedEnd::new(card, anchor), ArrowEnd::free(Point::new(0.0, 0.0)))
    }

    #[test]
    fn test_create_card_defaults() {
        let mut store = empty_store();
        let card = store.create_card(Point::new(100.0, 100.0));

        assert_eq!(card.id, CardId(1));
        assert_eq!(card.z, 1);
        assert_eq!(card.size(), DEFAULT_CARD_SIZE);
        assert_eq!(card.kind, CardKind::Editing);
        assert_eq!(card.open_anchors.len(), 4);
        assert_eq!(store.next_id(), 2);

        let second = store.create_card(Point::ZERO);
        assert_eq!(second.id, CardId(2));
        assert!(second.z > card.z);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = empty_store();
        let first = store.create_card(Point::ZERO);
        store.remove_card(first.id);
        let second = store.create_card(Point::ZERO);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_mutations_are_persisted() {
        let mut store = empty_store();
        let card = store.create_card(Point::new(1.0, 2.0));
        store.update_card(card.id, &CardPatch::moved_to(Point::new(5.0, 6.0)));

        let raw = store.storage().get(ITEMS_KEY).unwrap().unwrap();
        let saved: Vec<Card> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved[0].position(), Point::new(5.0, 6.0));
        assert_eq!(store.storage().get(ID_COUNTER_KEY).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_update_missing_card() {
        let mut store = empty_store();
        assert!(!store.update_card(CardId(42), &CardPatch::moved_to(Point::ZERO)));
        assert!(store.storage().get(ITEMS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_commit_content() {
        let mut store = empty_store();
        let id = store.create_card(Point::ZERO).id;

        assert!(!store.commit_card_content(id, "   "));
        assert_eq!(store.card(id).unwrap().kind, CardKind::Editing);

        assert!(store.commit_card_content(id, " example.com "));
        let card = store.card(id).unwrap();
        assert_eq!(card.kind, CardKind::Embedded);
        assert_eq!(card.content, "example.com");

        // Embedded cards no longer take text.
        assert!(!store.set_card_content(id, "other"));
        assert!(!store.commit_card_content(id, "other.org"));
        assert_eq!(store.card(id).unwrap().content, "example.com");
    }

    #[test]
    fn test_commit_rejects_whitespace_only() {
        let mut store = empty_store();
        let id = store.create_card(Point::ZERO).id;
        store.set_card_content(id, "\t\n ");

        assert!(!store.commit_card_content(id, "\t\n "));
        let card = store.card(id).unwrap();
        assert!(card.is_editing());
        assert_eq!(card.content, "\t\n ");
    }

    #[test]
    fn test_discard_empty_card() {
        let mut store = empty_store();
        let blank = store.create_card(Point::ZERO).id;
        let typed = store.create_card(Point::ZERO).id;
        store.set_card_content(typed, "draft");

        assert!(store.discard_empty_card(blank));
        assert!(!store.discard_empty_card(typed));
        assert!(!store.discard_empty_card(CardId(99)));
        assert_eq!(store.card_count(), 1);
    }

    #[test]
    fn test_create_arrow_claims_anchor() {
        let mut store = empty_store();
        let id = store.create_card(Point::ZERO).id;

        assert!(store.create_arrow(arrow_from(id, Anchor::Right)));
        assert!(!store.card(id).unwrap().open_anchors.contains(Anchor::Right));
        assert_eq!(store.arrow_count(), 1);
    }

    #[test]
    fn test_one_arrow_per_anchor() {
        let mut store = empty_store();
        let id = store.create_card(Point::ZERO).id;
        assert!(store.create_arrow(arrow_from(id, Anchor::Top)));

        let cards_before = store.cards().to_vec();
        let arrows_before = store.arrows().to_vec();
        assert!(!store.create_arrow(arrow_from(id, Anchor::Top)));
        assert_eq!(store.cards(), cards_before.as_slice());
        assert_eq!(store.arrows(), arrows_before.as_slice());
    }

    #[test]
    fn test_create_arrow_missing_origin() {
        let mut store = empty_store();
        assert!(!store.create_arrow(arrow_from(CardId(3), Anchor::Top)));
        assert_eq!(store.arrow_count(), 0);
    }

    #[test]
    fn test_remove_arrow_restores_anchor() {
        let mut store = empty_store();
        let id = store.create_card(Point::ZERO).id;
        let arrow = arrow_from(id, Anchor::Bottom);
        let arrow_id = arrow.id.clone();
        store.create_arrow(arrow);

        assert!(store.remove_arrow(&arrow_id).is_some());
        assert!(store.card(id).unwrap().open_anchors.contains(Anchor::Bottom));
        assert!(store.create_arrow(arrow_from(id, Anchor::Bottom)));
    }

    #[test]
    fn test_remove_arrow_after_origin_deleted() {
        let mut store = empty_store();
        let id = store.create_card(Point::ZERO).id;
        let arrow = arrow_from(id, Anchor::Left);
        let arrow_id = arrow.id.clone();
        store.create_arrow(arrow);
        store.remove_card(id);

        assert!(store.remove_arrow(&arrow_id).is_some());
        assert_eq!(store.arrow_count(), 0);
    }

    #[test]
    fn test_dangling_arrow_does_not_resolve() {
        let mut store = empty_store();
        let a = store.create_card(Point::ZERO).id;
        let b = store.create_card(Point::new(400.0, 0.0)).id;
        let arrow = Arrow::new(
            AttachedEnd::new(a, Anchor::Right),
            AttachedEnd::new(b, Anchor::Left).into(),
        );
        store.create_arrow(arrow.clone());
        assert!(store.resolve_arrow(&arrow).is_some());

        store.remove_card(b);
        assert_eq!(store.arrow_count(), 1);
        assert!(store.resolve_arrow(&arrow).is_none());
    }

    #[test]
    fn test_load_fail_soft() {
        let storage = MemoryStorage::with_entries([
            (ITEMS_KEY, "this is not json"),
            (ARROWS_KEY, "[]"),
            (ID_COUNTER_KEY, "\"seven\""),
        ]);
        let store = EntityStore::load(storage);
        assert_eq!(store.card_count(), 0);
        assert_eq!(store.arrow_count(), 0);
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_load_counter_fallbacks() {
        let items = r#"[
            {"id":4,"x":0,"y":0,"w":10,"h":10,"z":4},
            {"id":9,"x":0,"y":0,"w":10,"h":10,"z":9}
        ]"#;

        let store = EntityStore::load(MemoryStorage::with_entries([(ITEMS_KEY, items)]));
        assert_eq!(store.next_id(), 10);

        let store = EntityStore::load(MemoryStorage::with_entries([
            (ITEMS_KEY, items),
            (ID_COUNTER_KEY, "3"),
        ]));
        assert_eq!(store.next_id(), 10);

        let store = EntityStore::load(MemoryStorage::with_entries([
            (ITEMS_KEY, items),
            (ID_COUNTER_KEY, "25"),
        ]));
        assert_eq!(store.next_id(), 25);
    }

    #[test]
    fn test_custom_default_size() {
        let mut store = empty_store().with_default_card_size(Size::new(320.0, 180.0));
        let card = store.create_card(Point::ZERO);
        assert_eq!(card.size(), Size::new(320.0, 180.0));
    }

    /// Storage that rejects every write.
    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(format!("read-only: {}", key)))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_keep_memory_state() {
        let mut store = EntityStore::load(ReadOnlyStorage);
        let id = store.create_card(Point::ZERO).id;
        assert!(store.create_arrow(arrow_from(id, Anchor::Top)));
        assert_eq!(store.card_count(), 1);
        assert_eq!(store.arrow_count(), 1);
    }
}
