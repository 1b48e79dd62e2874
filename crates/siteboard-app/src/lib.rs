//! SiteBoard Application
//!
//! The application shell: host event intake, toolbar and help chrome,
//! and the native and WASM entry points.

mod app;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, AppError};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{ToolbarButton, UiAction, UiState, toolbar_buttons};

#[cfg(target_arch = "wasm32")]
mod web;
