//! SiteBoard Core Library
//!
//! Platform-agnostic spatial interaction engine for the SiteBoard canvas:
//! camera math, anchor geometry, the gesture state machine and the
//! persisted entity store.

pub mod board;
pub mod camera;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod interaction;
pub mod snap;
pub mod storage;
pub mod store;

pub use board::Board;
pub use camera::Camera;
pub use config::{BoardConfig, ConfigError};
pub use entities::{
    Anchor, Arrow, ArrowEnd, ArrowId, AttachedEnd, Card, CardId, CardKind, CardPatch, OpenAnchors,
};
pub use geometry::{
    ResolvedArrow, anchor_position, control_offset, cubic_bezier_point, find_snap_target,
};
pub use handles::HitTarget;
pub use input::{ClickTracker, Key, KeyEvent, MouseButton, PointerEvent};
pub use interaction::{Focus, Gesture, InteractionMachine, InteractionMode};
pub use snap::{AnchorSnapResolver, SnapResolver};
pub use storage::{KeyValueStore, MemoryStorage, StorageError, StorageResult};
pub use store::EntityStore;
