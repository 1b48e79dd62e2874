//! Core application state and lifecycle.

use crate::ui::{UiAction, UiState};
use serde::{Deserialize, Serialize};
use siteboard_core::storage::{KeyValueStore, StorageError};
use siteboard_core::{
    ArrowId, Board, BoardConfig, CardId, ClickTracker, ConfigError, Focus, HitTarget,
    InteractionMode, Key, KeyEvent, MouseButton, PointerEvent,
};
use siteboard_render::{
    DisplayList, GridStyle, RenderContext, Renderer, RendererError, SceneRenderer,
};
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub board: BoardConfig,
    /// Where board data lives. Defaults to the platform data directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub storage_dir: Option<PathBuf>,
    #[serde(skip)]
    pub grid_style: GridStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SiteBoard".to_string(),
            width: 1280,
            height: 800,
            board: BoardConfig::default(),
            #[cfg(not(target_arch = "wasm32"))]
            storage_dir: None,
            grid_style: GridStyle::Dots,
        }
    }
}

impl AppConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.board.validate()?;
        Ok(config)
    }

    /// Open the file storage this config points at.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_storage(&self) -> Result<siteboard_core::storage::FileStorage, AppError> {
        let storage = match &self.storage_dir {
            Some(dir) => siteboard_core::storage::FileStorage::new(dir.clone())?,
            None => siteboard_core::storage::FileStorage::default_location()?,
        };
        Ok(storage)
    }
}

/// The application: a board plus the chrome around it.
///
/// Hosts feed raw pointer and key events in and pull a display list out.
#[derive(Debug)]
pub struct App<S: KeyValueStore> {
    config: AppConfig,
    board: Board<S>,
    renderer: SceneRenderer,
    clicks: ClickTracker,
    ui: UiState,
    scale_factor: f64,
}

impl<S: KeyValueStore> App<S> {
    /// Load the board from `storage`.
    pub fn new(storage: S, config: AppConfig) -> Self {
        let mut board = Board::with_config(storage, config.board.clone());
        board.set_viewport_size(config.width as f64, config.height as f64);

        let mut ui = UiState::default();
        ui.sync(&board);
        log::info!(
            "{} loaded: {} cards, {} arrows",
            config.title,
            ui.card_count,
            ui.arrow_count
        );

        Self {
            config,
            board,
            renderer: SceneRenderer::new(),
            clicks: ClickTracker::new(),
            ui,
            scale_factor: 1.0,
        }
    }

    /// Feed a raw pointer event. Left presses that complete a double click
    /// on empty canvas place a card instead of starting a pan.
    pub fn pointer_event(&mut self, event: PointerEvent) -> bool {
        self.pointer_event_at(Instant::now(), event)
    }

    pub fn pointer_event_at(&mut self, now: Instant, event: PointerEvent) -> bool {
        let event = match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                let double = self.clicks.register_at(now, position);
                if double
                    && self.board.mode() == InteractionMode::Idle
                    && self.board.hit_test(position) == HitTarget::Empty
                {
                    PointerEvent::DoubleClick { position }
                } else {
                    event
                }
            }
            _ => event,
        };
        self.dispatch(|board| board.handle_pointer(event))
    }

    /// Feed a key press or release. Escape closes the help dialog before it
    /// reaches the board.
    pub fn key_event(&mut self, event: KeyEvent) -> bool {
        if matches!(event, KeyEvent::Pressed(Key::Escape)) && self.ui.help_open {
            self.ui.help_open = false;
            return true;
        }
        self.dispatch(|board| board.handle_key(&event))
    }

    /// Apply a toolbar or dialog action.
    pub fn apply_action(&mut self, action: UiAction) {
        log::debug!("UI action: {:?}", action);
        match action {
            UiAction::ZoomIn => self.board.zoom_in(),
            UiAction::ZoomOut => self.board.zoom_out(),
            UiAction::ResetView => self.board.reset_view(),
            UiAction::ToggleHelp => self.ui.help_open = !self.ui.help_open,
            UiAction::CloseHelp => self.ui.help_open = false,
        }
        self.ui.sync(&self.board);
    }

    /// The host surface changed size.
    pub fn resize(&mut self, width: f64, height: f64, scale_factor: f64) {
        self.board.set_viewport_size(width, height);
        self.scale_factor = scale_factor;
    }

    /// Text typed into an editing card.
    pub fn card_input(&mut self, id: CardId, text: &str) -> bool {
        self.dispatch(|board| board.set_card_content(id, text))
    }

    /// A card's close button.
    pub fn close_card(&mut self, id: CardId) -> bool {
        self.dispatch(|board| board.close_card(id).is_some())
    }

    /// The selected arrow's delete button.
    pub fn delete_arrow(&mut self, id: &ArrowId) -> bool {
        self.dispatch(|board| board.delete_arrow(id))
    }

    /// Build the next frame.
    pub fn render(&mut self) -> Result<&DisplayList, AppError> {
        let ctx = RenderContext::from_board(&self.board)
            .with_scale_factor(self.scale_factor)
            .with_grid(self.config.grid_style);
        self.renderer.build_scene(&ctx)?;
        Ok(self.renderer.display_list())
    }

    /// Run a board operation, then blur a card that lost focus and refresh
    /// the UI mirror.
    fn dispatch(&mut self, op: impl FnOnce(&mut Board<S>) -> bool) -> bool {
        let before = self.board.focus().and_then(Focus::card);
        let mut changed = op(&mut self.board);

        if let Some(card) = before {
            if self.lost_focus(card) {
                changed |= self.board.blur_card(card);
            }
        }
        self.ui.sync(&self.board);
        changed
    }

    /// Focus moving to an arrow drawn out of `card` keeps the card.
    fn lost_focus(&self, card: CardId) -> bool {
        match self.board.focus() {
            Some(Focus::Card(id)) => *id != card,
            Some(Focus::Arrow(id)) => self
                .board
                .store()
                .arrow(id)
                .is_none_or(|arrow| arrow.from.card_id != card),
            None => true,
        }
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_board(self) -> Board<S> {
        self.board
    }
}
