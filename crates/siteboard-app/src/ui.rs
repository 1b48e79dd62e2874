//! Toolbar, status bar and help dialog state.
//!
//! The host draws the chrome; this module only decides what it shows and
//! which action each control maps to.

use crate::shortcuts::ShortcutRegistry;
use siteboard_core::storage::KeyValueStore;
use siteboard_core::Board;

/// Actions triggered from the toolbar or help dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleHelp,
    CloseHelp,
}

impl UiAction {
    /// Parse a host-side action name (`zoomIn`, `zoomOut`, `resetView`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "zoomIn" => Some(UiAction::ZoomIn),
            "zoomOut" => Some(UiAction::ZoomOut),
            "resetView" => Some(UiAction::ResetView),
            "toggleHelp" => Some(UiAction::ToggleHelp),
            "closeHelp" => Some(UiAction::CloseHelp),
            _ => None,
        }
    }
}

/// A toolbar button.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarButton {
    pub label: &'static str,
    pub tooltip: &'static str,
    pub action: UiAction,
}

/// Toolbar buttons, left to right.
pub fn toolbar_buttons() -> [ToolbarButton; 4] {
    [
        ToolbarButton {
            label: "-",
            tooltip: "Zoom out",
            action: UiAction::ZoomOut,
        },
        ToolbarButton {
            label: "+",
            tooltip: "Zoom in",
            action: UiAction::ZoomIn,
        },
        ToolbarButton {
            label: "Reset",
            tooltip: "Reset view",
            action: UiAction::ResetView,
        },
        ToolbarButton {
            label: "?",
            tooltip: "Help",
            action: UiAction::ToggleHelp,
        },
    ]
}

/// UI state mirrored from the board after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Whether the help dialog is open.
    pub help_open: bool,
    /// Current zoom, rounded to a whole percentage.
    pub zoom_percent: u32,
    pub card_count: usize,
    pub arrow_count: usize,
}

impl UiState {
    /// Refresh the mirrored board values, keeping dialog state.
    pub fn sync<S: KeyValueStore>(&mut self, board: &Board<S>) {
        self.zoom_percent = board.camera().zoom_percent();
        self.card_count = board.store().card_count();
        self.arrow_count = board.store().arrow_count();
    }

    /// Zoom label for the toolbar.
    pub fn zoom_label(&self) -> String {
        format!("{}%", self.zoom_percent)
    }

    /// Status bar text.
    pub fn status_text(&self) -> String {
        format!(
            "{} card{}, {} arrow{}",
            self.card_count,
            if self.card_count == 1 { "" } else { "s" },
            self.arrow_count,
            if self.arrow_count == 1 { "" } else { "s" },
        )
    }

    /// Help dialog body, or nothing when closed.
    pub fn help_text(&self) -> Option<String> {
        self.help_open.then(|| ShortcutRegistry::help_lines().join("\n"))
    }
}
