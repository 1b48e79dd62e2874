//! End-to-end board scenarios driven through the public API.

use kurbo::{Point, Vec2};
use siteboard_core::handles::HitTarget;
use siteboard_core::storage::{
    FileStorage, ID_COUNTER_KEY, ITEMS_KEY, KeyValueStore, MemoryStorage,
};
use siteboard_core::{
    Anchor, ArrowEnd, ArrowId, AttachedEnd, Board, CardKind, EntityStore, InteractionMode,
    MouseButton, PointerEvent,
};

fn down(board: &mut Board<impl KeyValueStore>, x: f64, y: f64) -> bool {
    board.handle_pointer(PointerEvent::Down {
        position: Point::new(x, y),
        button: MouseButton::Left,
    })
}

fn move_to(board: &mut Board<impl KeyValueStore>, x: f64, y: f64) {
    board.handle_pointer(PointerEvent::Move {
        position: Point::new(x, y),
    });
}

fn up(board: &mut Board<impl KeyValueStore>, x: f64, y: f64) {
    board.handle_pointer(PointerEvent::Up {
        position: Point::new(x, y),
        button: MouseButton::Left,
    });
}

#[test]
fn snap_and_unsnap_arrow_endpoint() {
    let mut board = Board::new(MemoryStorage::new());
    board.set_viewport_size(1024.0, 768.0);

    board.handle_pointer(PointerEvent::DoubleClick {
        position: Point::new(100.0, 100.0),
    });
    board.handle_pointer(PointerEvent::DoubleClick {
        position: Point::new(600.0, 300.0),
    });
    let cards = board.store().cards().to_vec();
    let (source, target) = (cards[0].id, cards[1].id);
    assert_eq!(cards[0].rect().size(), kurbo::Size::new(200.0, 100.0));

    // Source right anchor sits at (300, 150).
    assert!(down(&mut board, 300.0, 150.0));
    assert_eq!(board.mode(), InteractionMode::DrawingArrow);
    let arrow_id = ArrowId::for_origin(source, Anchor::Right);

    // Target left anchor sits at (600, 350); come within 40 units of it.
    move_to(&mut board, 580.0, 330.0);
    assert_eq!(
        board.store().arrow(&arrow_id).unwrap().to,
        ArrowEnd::Attached(AttachedEnd::new(target, Anchor::Left))
    );
    up(&mut board, 580.0, 330.0);
    assert_eq!(board.mode(), InteractionMode::Idle);

    // Grab the endpoint handle again (focused arrow) and drag it far away.
    assert_eq!(
        board.hit_test(Point::new(604.0, 351.0)),
        HitTarget::ArrowEndpoint(arrow_id.clone())
    );
    assert!(down(&mut board, 604.0, 351.0));
    move_to(&mut board, 1000.0, 700.0);
    up(&mut board, 1000.0, 700.0);

    assert_eq!(
        board.store().arrow(&arrow_id).unwrap().to,
        ArrowEnd::free(Point::new(1000.0, 700.0))
    );
}

#[test]
fn drag_commits_only_on_release() {
    let mut board = Board::new(MemoryStorage::new());
    board.handle_pointer(PointerEvent::DoubleClick {
        position: Point::new(0.0, 0.0),
    });
    let id = board.store().cards()[0].id;
    let saved_before = board.store().storage().get(ITEMS_KEY).unwrap();

    board.handle_pointer(PointerEvent::Scroll {
        position: Point::ZERO,
        delta: Vec2::new(0.0, -1.0),
    });
    let zoom = board.camera().zoom;

    assert!(down(&mut board, 50.0, 50.0));
    for step in 1..=10 {
        move_to(&mut board, 50.0 + step as f64 * 11.0, 50.0);
        assert_eq!(board.store().card(id).unwrap().x, 0.0);
    }
    assert_eq!(board.store().storage().get(ITEMS_KEY).unwrap(), saved_before);

    up(&mut board, 160.0, 50.0);
    let x = board.store().card(id).unwrap().x;
    assert!((x - 110.0 / zoom).abs() < 1e-9);
}

#[test]
fn deleting_arrow_reopens_anchor() {
    let mut board = Board::new(MemoryStorage::new());
    board.handle_pointer(PointerEvent::DoubleClick { position: Point::ZERO });
    let card = board.store().cards()[0].id;

    // Bottom anchor sits at (100, 100).
    assert!(down(&mut board, 100.0, 100.0));
    up(&mut board, 100.0, 100.0);
    assert!(!board.store().card(card).unwrap().open_anchors.contains(Anchor::Bottom));

    // Same anchor again is no longer a handle, and no second arrow appears.
    board.pointer_down_on(HitTarget::AnchorHandle(card, Anchor::Bottom), Point::new(100.0, 100.0));
    assert_eq!(board.store().arrow_count(), 1);

    let arrow_id = ArrowId::for_origin(card, Anchor::Bottom);
    assert!(board.delete_arrow(&arrow_id));
    assert!(board.store().card(card).unwrap().open_anchors.contains(Anchor::Bottom));

    assert!(board.pointer_down_on(
        HitTarget::AnchorHandle(card, Anchor::Bottom),
        Point::new(100.0, 100.0)
    ));
    assert_eq!(board.store().arrow_count(), 1);
}

#[test]
fn persistence_round_trip() {
    let mut board = Board::new(MemoryStorage::new());
    board.handle_pointer(PointerEvent::DoubleClick { position: Point::ZERO });
    board.handle_pointer(PointerEvent::DoubleClick {
        position: Point::new(500.0, 0.0),
    });
    let cards = board.store().cards().to_vec();
    board.set_card_content(cards[0].id, "example.com");
    board.commit_card(cards[0].id);

    // One attached arrow, one free arrow.
    down(&mut board, 200.0, 50.0);
    move_to(&mut board, 495.0, 52.0);
    up(&mut board, 495.0, 52.0);
    down(&mut board, 100.0, 100.0);
    move_to(&mut board, 140.0, 400.0);
    up(&mut board, 140.0, 400.0);

    let before_cards = board.store().cards().to_vec();
    let before_arrows = board.store().arrows().to_vec();
    let before_next = board.store().next_id();
    assert_eq!(before_arrows.len(), 2);
    assert_eq!(before_cards[0].kind, CardKind::Embedded);

    let reloaded = EntityStore::load(board.into_storage());
    assert_eq!(reloaded.cards(), before_cards.as_slice());
    assert_eq!(reloaded.arrows(), before_arrows.as_slice());
    assert_eq!(reloaded.next_id(), before_next);
}

#[test]
fn file_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let mut board = Board::new(FileStorage::new(dir.path()).unwrap());
    board.handle_pointer(PointerEvent::DoubleClick {
        position: Point::new(10.0, 20.0),
    });
    let before = board.store().cards().to_vec();
    drop(board);

    let storage = FileStorage::new(dir.path()).unwrap();
    assert_eq!(storage.get(ID_COUNTER_KEY).unwrap().as_deref(), Some("2"));
    let reloaded = EntityStore::load(storage);
    assert_eq!(reloaded.cards(), before.as_slice());
}

#[test]
fn legacy_records_load() {
    let storage = MemoryStorage::with_entries([
        (
            ITEMS_KEY,
            r#"[
                {"id":1,"x":0,"y":0,"w":200,"h":100,"z":1,
                 "type":"input","value":"","anchors":["top","left"]},
                {"id":2,"x":400,"y":0,"w":200,"h":100,"z":2,
                 "type":"iframe","value":"example.com",
                 "anchors":["top","right","bottom","left"]}
            ]"#,
        ),
        (
            "arrows",
            r#"[{"id":"1-right",
                 "from":{"cardId":1,"anchor":"right"},
                 "to":{"type":"attached","cardId":2,"anchor":"left"}}]"#,
        ),
    ]);
    let store = EntityStore::load(storage);
    assert_eq!(store.card_count(), 2);
    assert_eq!(store.cards()[1].kind, CardKind::Embedded);
    assert_eq!(store.next_id(), 3);

    let arrow = &store.arrows()[0];
    assert_eq!(arrow.id, ArrowId::for_origin(store.cards()[0].id, Anchor::Right));
    assert!(store.resolve_arrow(arrow).is_some());
}
