//! Normalized input events delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Left,
        }
    }
}

/// Pointer event in screen coordinates (pixels from the viewport's
/// top-left).
///
/// `Up` must be delivered even when the release happens outside the
/// board, otherwise a gesture never ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
    DoubleClick {
        position: Point,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. }
            | PointerEvent::DoubleClick { position } => position,
        }
    }
}

/// Keys the board reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Enter,
    Escape,
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double clicks for hosts that only report raw presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a left press now. Returns true when it completes a double click.
    pub fn register(&mut self, position: Point) -> bool {
        self.register_at(Instant::now(), position)
    }

    /// Record a left press at a given instant.
    pub fn register_at(&mut self, now: Instant, position: Point) -> bool {
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = now.duration_since(last_time).as_millis();
            if elapsed < DOUBLE_CLICK_TIME_MS
                && last_pos.distance(position) < DOUBLE_CLICK_DISTANCE
            {
                // Reset so a triple click is not a second double click.
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }

    pub fn reset(&mut self) {
        self.last_click = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_double_click_detected() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!tracker.register_at(t0, Point::new(10.0, 10.0)));
        assert!(tracker.register_at(t0 + Duration::from_millis(200), Point::new(12.0, 11.0)));
    }

    #[test]
    fn test_slow_or_distant_clicks_are_single() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        tracker.register_at(t0, Point::ZERO);
        assert!(!tracker.register_at(t0 + Duration::from_millis(600), Point::ZERO));
        assert!(!tracker.register_at(t0 + Duration::from_millis(700), Point::new(20.0, 0.0)));
    }

    #[test]
    fn test_triple_click_is_one_double_click() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        tracker.register_at(t0, Point::ZERO);
        assert!(tracker.register_at(t0 + Duration::from_millis(100), Point::ZERO));
        assert!(!tracker.register_at(t0 + Duration::from_millis(200), Point::ZERO));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Delete"), Key::Delete);
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
        assert!(Key::from_name("Backspace").is_delete());
        assert!(!Key::Enter.is_delete());
    }

    #[test]
    fn test_dom_buttons() {
        assert_eq!(MouseButton::from_dom(0), MouseButton::Left);
        assert_eq!(MouseButton::from_dom(1), MouseButton::Middle);
        assert_eq!(MouseButton::from_dom(2), MouseButton::Right);
    }
}
