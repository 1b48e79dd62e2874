//! Pointer gesture state machine.
//!
//! One gesture runs at a time, from pointer-down to pointer-up. Card drags
//! and resizes stay transient until release and are committed to the store
//! in a single update; arrow drawing writes through on every move so the
//! arrow renders live.

use crate::camera::Camera;
use crate::config::{BoardConfig, MIN_CARD_SIZE};
use crate::entities::{Arrow, ArrowEnd, ArrowId, AttachedEnd, Card, CardId, CardPatch};
use crate::geometry::anchor_position;
use crate::handles::HitTarget;
use crate::input::Key;
use crate::snap::{AnchorSnapResolver, SnapResolver};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;
use kurbo::{Point, Rect, Size, Vec2};

/// Coarse gesture state, for cursors and status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
    DraggingCard,
    ResizingCard,
    DrawingArrow,
}

/// Active gesture with its transient data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        /// Screen point of the previous move.
        last: Point,
    },
    DraggingCard {
        card: CardId,
        last: Point,
        /// World-space offset accumulated since the press.
        offset: Vec2,
    },
    ResizingCard {
        card: CardId,
        last: Point,
        /// World-space size change accumulated since the press.
        delta: Vec2,
    },
    DrawingArrow {
        arrow: ArrowId,
    },
}

impl Gesture {
    pub fn mode(&self) -> InteractionMode {
        match self {
            Gesture::Idle => InteractionMode::Idle,
            Gesture::Panning { .. } => InteractionMode::Panning,
            Gesture::DraggingCard { .. } => InteractionMode::DraggingCard,
            Gesture::ResizingCard { .. } => InteractionMode::ResizingCard,
            Gesture::DrawingArrow { .. } => InteractionMode::DrawingArrow,
        }
    }
}

/// The currently selected entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Card(CardId),
    Arrow(ArrowId),
}

impl Focus {
    pub fn card(&self) -> Option<CardId> {
        match self {
            Focus::Card(id) => Some(*id),
            Focus::Arrow(_) => None,
        }
    }

    pub fn arrow(&self) -> Option<&ArrowId> {
        match self {
            Focus::Arrow(id) => Some(id),
            Focus::Card(_) => None,
        }
    }
}

/// Mutable board state a gesture acts on.
pub struct InteractionContext<'a, S: KeyValueStore> {
    pub camera: &'a mut Camera,
    pub store: &'a mut EntityStore<S>,
    pub focus: &'a mut Option<Focus>,
}

/// Drives gestures from pointer, wheel and key input.
#[derive(Debug)]
pub struct InteractionMachine {
    gesture: Gesture,
    snap: Box<dyn SnapResolver>,
    min_card_size: Size,
    zoom_in_factor: f64,
    zoom_out_factor: f64,
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(Box::new(AnchorSnapResolver::default()))
    }
}

impl InteractionMachine {
    pub fn new(snap: Box<dyn SnapResolver>) -> Self {
        Self {
            gesture: Gesture::Idle,
            snap,
            min_card_size: MIN_CARD_SIZE,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            min_card_size: config.min_card_size,
            zoom_in_factor: config.zoom_in_factor,
            zoom_out_factor: config.zoom_out_factor,
            ..Self::new(Box::new(AnchorSnapResolver::new(config.snap_threshold)))
        }
    }

    /// Swap the snapping strategy.
    pub fn set_snap_resolver(&mut self, snap: Box<dyn SnapResolver>) {
        self.snap = snap;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn mode(&self) -> InteractionMode {
        self.gesture.mode()
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// Start a gesture on `target`. Returns false when the press is ignored.
    ///
    /// Presses during an active gesture are rejected, which also keeps an
    /// arrow draw from turning into a card drag.
    pub fn pointer_down<S: KeyValueStore>(
        &mut self,
        cx: InteractionContext<'_, S>,
        target: HitTarget,
        screen: Point,
    ) -> bool {
        if !self.is_idle() {
            log::debug!("Ignoring press during {:?}", self.mode());
            return false;
        }

        let gesture = match target {
            HitTarget::Empty => {
                *cx.focus = None;
                Gesture::Panning { last: screen }
            }
            HitTarget::CardBody(card) => {
                if cx.store.card(card).is_none() {
                    return false;
                }
                *cx.focus = Some(Focus::Card(card));
                Gesture::DraggingCard {
                    card,
                    last: screen,
                    offset: Vec2::ZERO,
                }
            }
            HitTarget::ResizeHandle(card) => {
                if cx.store.card(card).is_none() {
                    return false;
                }
                Gesture::ResizingCard {
                    card,
                    last: screen,
                    delta: Vec2::ZERO,
                }
            }
            HitTarget::AnchorHandle(card_id, anchor) => {
                let start = match cx.store.card(card_id) {
                    Some(card) if card.open_anchors.contains(anchor) => {
                        anchor_position(card, anchor)
                    }
                    _ => return false,
                };
                let arrow = Arrow::new(AttachedEnd::new(card_id, anchor), ArrowEnd::free(start));
                let id = arrow.id.clone();
                if !cx.store.create_arrow(arrow) {
                    return false;
                }
                *cx.focus = Some(Focus::Arrow(id.clone()));
                Gesture::DrawingArrow { arrow: id }
            }
            HitTarget::ArrowEndpoint(id) => {
                if cx.store.arrow(&id).is_none() {
                    return false;
                }
                *cx.focus = Some(Focus::Arrow(id.clone()));
                Gesture::DrawingArrow { arrow: id }
            }
            HitTarget::ArrowCurve(id) => {
                if cx.store.arrow(&id).is_none() {
                    return false;
                }
                // Selecting an arrow is a click, not a gesture.
                *cx.focus = Some(Focus::Arrow(id));
                return true;
            }
        };

        log::debug!("Gesture started: {:?}", gesture.mode());
        self.gesture = gesture;
        true
    }

    /// Advance the active gesture to the pointer at `screen`.
    pub fn pointer_move<S: KeyValueStore>(&mut self, cx: InteractionContext<'_, S>, screen: Point) {
        let zoom = cx.camera.zoom;
        let mut stale = false;

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                cx.camera.pan(delta);
            }
            Gesture::DraggingCard { card, last, offset } => {
                if cx.store.card(*card).is_none() {
                    stale = true;
                } else {
                    *offset += (screen - *last) / zoom;
                    *last = screen;
                }
            }
            Gesture::ResizingCard { card, last, delta } => {
                if cx.store.card(*card).is_none() {
                    stale = true;
                } else {
                    *delta += (screen - *last) / zoom;
                    *last = screen;
                }
            }
            Gesture::DrawingArrow { arrow } => {
                if cx.store.arrow(arrow).is_none() {
                    stale = true;
                } else {
                    let world = cx.camera.screen_to_world(screen);
                    let end = self
                        .snap
                        .resolve(world, cx.store.cards())
                        .map(ArrowEnd::from)
                        .unwrap_or_else(|| ArrowEnd::free(world));
                    cx.store.set_arrow_end(arrow, end);
                }
            }
        }

        if stale {
            log::debug!("Abandoning {:?}: entity no longer exists", self.mode());
            self.gesture = Gesture::Idle;
        }
    }

    /// Finish the active gesture and return to idle.
    ///
    /// Hosts must route every release here, including ones outside the
    /// board surface.
    pub fn pointer_up<S: KeyValueStore>(&mut self, cx: InteractionContext<'_, S>) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::DraggingCard { card, offset, .. } => {
                if offset != Vec2::ZERO {
                    if let Some(position) = cx.store.card(card).map(|c| c.position() + offset) {
                        cx.store.update_card(card, &CardPatch::moved_to(position));
                    }
                }
            }
            Gesture::ResizingCard { card, delta, .. } => {
                if delta != Vec2::ZERO {
                    if let Some(size) = cx.store.card(card).map(|c| self.resized(c, delta)) {
                        cx.store.update_card(card, &CardPatch::resized_to(size));
                    }
                }
            }
            Gesture::DrawingArrow { arrow } => {
                let attached = cx.store.arrow(&arrow).is_some_and(|a| a.to.is_attached());
                log::debug!(
                    "Arrow {} released ({})",
                    arrow,
                    if attached { "attached" } else { "free" }
                );
            }
        }
    }

    /// Handle a key press. Returns true if it changed anything.
    pub fn key<S: KeyValueStore>(&mut self, cx: InteractionContext<'_, S>, key: &Key) -> bool {
        match key {
            Key::Delete | Key::Backspace => {
                let Some(Focus::Arrow(id)) = cx.focus.clone() else {
                    return false;
                };
                *cx.focus = None;
                cx.store.remove_arrow(&id).is_some()
            }
            Key::Enter => {
                let Some(Focus::Card(id)) = *cx.focus else {
                    return false;
                };
                let content = match cx.store.card(id) {
                    Some(card) if card.is_editing() => card.content.clone(),
                    _ => return false,
                };
                cx.store.commit_card_content(id, &content)
            }
            Key::Escape => cx.focus.take().is_some(),
            Key::Other(_) => false,
        }
    }

    /// Place a new card at the pointer and focus it.
    pub fn double_click<S: KeyValueStore>(
        &mut self,
        cx: InteractionContext<'_, S>,
        screen: Point,
    ) -> Option<CardId> {
        if !self.is_idle() {
            return None;
        }
        let world = cx.camera.screen_to_world(screen);
        let id = cx.store.create_card(world).id;
        *cx.focus = Some(Focus::Card(id));
        Some(id)
    }

    /// Zoom around the cursor. Scrolling down (positive delta) zooms out.
    pub fn wheel(&self, camera: &mut Camera, screen: Point, delta: Vec2) {
        if delta.y == 0.0 {
            return;
        }
        let factor = if delta.y > 0.0 {
            self.zoom_out_factor
        } else {
            self.zoom_in_factor
        };
        camera.zoom_at(screen, factor);
    }

    pub fn zoom_in_factor(&self) -> f64 {
        self.zoom_in_factor
    }

    pub fn zoom_out_factor(&self) -> f64 {
        self.zoom_out_factor
    }

    fn resized(&self, card: &Card, delta: Vec2) -> Size {
        Size::new(
            (card.w + delta.x).max(self.min_card_size.width),
            (card.h + delta.y).max(self.min_card_size.height),
        )
    }

    /// `card` as it should be drawn right now, with any in-flight drag or
    /// resize applied. The stored card is not touched.
    pub fn preview_card(&self, card: &Card) -> Card {
        let mut preview = card.clone();
        match &self.gesture {
            Gesture::DraggingCard { card: id, offset, .. } if *id == card.id => {
                preview.x += offset.x;
                preview.y += offset.y;
            }
            Gesture::ResizingCard { card: id, delta, .. } if *id == card.id => {
                let size = self.resized(card, *delta);
                preview.w = size.width;
                preview.h = size.height;
            }
            _ => {}
        }
        preview
    }

    pub fn preview_rect(&self, card: &Card) -> Rect {
        self.preview_card(card).rect()
    }
}
