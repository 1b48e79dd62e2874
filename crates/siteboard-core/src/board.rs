//! Board runtime: the entity store, camera, gesture machine and focus
//! wired together behind one event-driven API.

use crate::camera::Camera;
use crate::config::BoardConfig;
use crate::entities::{Arrow, ArrowId, Card, CardId};
use crate::geometry::ResolvedArrow;
use crate::handles::{self, HitTarget};
use crate::input::{KeyEvent, MouseButton, PointerEvent};
use crate::interaction::{Focus, InteractionContext, InteractionMachine, InteractionMode};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;
use kurbo::{Point, Size};

/// An interactive board backed by a key-value store.
#[derive(Debug)]
pub struct Board<S: KeyValueStore> {
    store: EntityStore<S>,
    camera: Camera,
    interaction: InteractionMachine,
    focus: Option<Focus>,
    viewport: Size,
    config: BoardConfig,
}

impl<S: KeyValueStore> Board<S> {
    /// Load a board with the default configuration.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, BoardConfig::default())
    }

    pub fn with_config(storage: S, config: BoardConfig) -> Self {
        Self {
            store: EntityStore::load(storage).with_default_card_size(config.default_card_size),
            camera: config.camera(),
            interaction: InteractionMachine::from_config(&config),
            focus: None,
            viewport: Size::ZERO,
            config,
        }
    }

    fn split(&mut self) -> (&mut InteractionMachine, InteractionContext<'_, S>) {
        (
            &mut self.interaction,
            InteractionContext {
                camera: &mut self.camera,
                store: &mut self.store,
                focus: &mut self.focus,
            },
        )
    }

    // --- Input ---

    /// What lies under a screen point.
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        let world = self.camera.screen_to_world(screen);
        let focused_arrow = self.focus.as_ref().and_then(Focus::arrow);
        handles::hit_test(&self.store, world, self.camera.zoom, focused_arrow)
    }

    /// Feed a pointer event. Returns true when the view needs a redraw.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, button } => {
                if button != MouseButton::Left {
                    return false;
                }
                let target = self.hit_test(position);
                self.pointer_down_on(target, position)
            }
            PointerEvent::Up { button, .. } => {
                if button != MouseButton::Left || self.interaction.is_idle() {
                    return false;
                }
                let (machine, cx) = self.split();
                machine.pointer_up(cx);
                true
            }
            PointerEvent::Move { position } => {
                if self.interaction.is_idle() {
                    return false;
                }
                let (machine, cx) = self.split();
                machine.pointer_move(cx, position);
                true
            }
            PointerEvent::Scroll { position, delta } => {
                if delta.y == 0.0 {
                    return false;
                }
                self.interaction.wheel(&mut self.camera, position, delta);
                true
            }
            PointerEvent::DoubleClick { position } => {
                if self.hit_test(position) != HitTarget::Empty {
                    return false;
                }
                let (machine, cx) = self.split();
                machine.double_click(cx, position).is_some()
            }
        }
    }

    /// Start a gesture on a target the host resolved itself (for example a
    /// DOM handle element).
    pub fn pointer_down_on(&mut self, target: HitTarget, screen: Point) -> bool {
        let (machine, cx) = self.split();
        machine.pointer_down(cx, target, screen)
    }

    /// Feed a keyboard event. Returns true if anything changed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match event {
            KeyEvent::Pressed(key) => {
                let (machine, cx) = self.split();
                machine.key(cx, key)
            }
            KeyEvent::Released(_) => false,
        }
    }

    // --- View ---

    pub fn zoom_in(&mut self) {
        let factor = self.interaction.zoom_in_factor();
        self.camera.zoom_from_center(self.viewport, factor);
    }

    pub fn zoom_out(&mut self) {
        let factor = self.interaction.zoom_out_factor();
        self.camera.zoom_from_center(self.viewport, factor);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Set the viewport size in screen pixels.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width.max(0.0), height.max(0.0));
    }

    // --- Entities ---

    /// Live text edit on a card that is still editing.
    pub fn set_card_content(&mut self, id: CardId, content: &str) -> bool {
        self.store.set_card_content(id, content)
    }

    /// Confirm what was typed into a card, turning it into embedded content.
    pub fn commit_card(&mut self, id: CardId) -> bool {
        let Some(content) = self.store.card(id).map(|c| c.content.clone()) else {
            return false;
        };
        self.store.commit_card_content(id, &content)
    }

    /// Input focus left a card. Blank editing cards are discarded.
    pub fn blur_card(&mut self, id: CardId) -> bool {
        let removed = self.store.discard_empty_card(id);
        if removed {
            self.clear_focus_if(|focus| focus.card() == Some(id));
        }
        removed
    }

    /// Remove a card via its close button.
    pub fn close_card(&mut self, id: CardId) -> Option<Card> {
        let card = self.store.remove_card(id)?;
        self.clear_focus_if(|focus| focus.card() == Some(id));
        Some(card)
    }

    /// Remove an arrow via its delete affordance.
    pub fn delete_arrow(&mut self, id: &ArrowId) -> bool {
        let removed = self.store.remove_arrow(id).is_some();
        self.clear_focus_if(|focus| focus.arrow() == Some(id));
        removed
    }

    pub fn set_focus(&mut self, focus: Option<Focus>) {
        self.focus = focus;
    }

    fn clear_focus_if(&mut self, pred: impl FnOnce(&Focus) -> bool) {
        if self.focus.as_ref().is_some_and(pred) {
            self.focus = None;
        }
    }

    // --- Display ---

    /// A card as it should be drawn, with in-flight gestures applied.
    pub fn display_card(&self, id: CardId) -> Option<Card> {
        self.store.card(id).map(|card| self.interaction.preview_card(card))
    }

    /// All cards as drawn, back to front.
    pub fn display_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .store
            .cards()
            .iter()
            .map(|card| self.interaction.preview_card(card))
            .collect();
        cards.sort_by_key(|card| card.z);
        cards
    }

    /// Endpoints of an arrow against the displayed card positions, so arrows
    /// follow a card while it is being dragged.
    pub fn resolve_arrow(&self, arrow: &Arrow) -> Option<ResolvedArrow> {
        let cards = self.display_cards();
        ResolvedArrow::resolve(arrow, |id| cards.iter().find(|c| c.id == id))
    }

    /// Every drawable arrow with its endpoints. Dangling arrows are skipped.
    pub fn resolved_arrows(&self) -> Vec<(&Arrow, ResolvedArrow)> {
        let cards = self.display_cards();
        self.store
            .arrows()
            .iter()
            .filter_map(|arrow| {
                ResolvedArrow::resolve(arrow, |id| cards.iter().find(|c| c.id == id))
                    .map(|r| (arrow, r))
            })
            .collect()
    }

    // --- Accessors ---

    pub fn store(&self) -> &EntityStore<S> {
        &self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn interaction(&self) -> &InteractionMachine {
        &self.interaction
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }
}
