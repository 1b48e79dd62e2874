//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use siteboard_core::geometry::ResolvedArrow;
use siteboard_core::storage::KeyValueStore;
use siteboard_core::{ArrowId, Board, Camera, Card, Focus};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// Plain background.
    None,
    /// Dots at grid intersections.
    #[default]
    Dots,
    /// Full grid lines.
    Lines,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Dots,
            GridStyle::Dots => GridStyle::Lines,
            GridStyle::Lines => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Dots => "Dots",
            GridStyle::Lines => "Lines",
        }
    }
}

/// hsl(240 10% 6%)
pub const BACKGROUND_COLOR: Color = Color::from_rgba8(14, 14, 17, 255);
/// hsl(240 5% 20%)
pub const GRID_COLOR: Color = Color::from_rgba8(48, 48, 54, 255);
/// #3b82f6
pub const ARROW_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);
/// #60a5fa
pub const ARROW_SELECTED_COLOR: Color = Color::from_rgba8(96, 165, 250, 255);

/// A drawable arrow with its endpoints already resolved.
#[derive(Debug, Clone)]
pub struct ArrowView {
    pub id: ArrowId,
    pub resolved: ResolvedArrow,
}

/// Everything a renderer needs for one frame.
///
/// Snapshotted from a board so renderers never borrow live state.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: Camera,
    /// Viewport size in CSS/logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    pub background_color: Color,
    pub grid_color: Color,
    pub grid_style: GridStyle,
    /// Grid spacing in world units.
    pub grid_spacing: f64,
    pub arrow_color: Color,
    pub selection_color: Color,
    /// Cards back to front, with in-flight gestures applied.
    pub cards: Vec<Card>,
    /// Drawable arrows only.
    pub arrows: Vec<ArrowView>,
    pub focus: Option<Focus>,
}

impl RenderContext {
    /// Create an empty context for a camera and viewport.
    pub fn new(camera: Camera, viewport_size: Size) -> Self {
        Self {
            camera,
            viewport_size,
            scale_factor: 1.0,
            background_color: BACKGROUND_COLOR,
            grid_color: GRID_COLOR,
            grid_style: GridStyle::default(),
            grid_spacing: siteboard_core::config::DEFAULT_GRID_SPACING,
            arrow_color: ARROW_COLOR,
            selection_color: ARROW_SELECTED_COLOR,
            cards: Vec::new(),
            arrows: Vec::new(),
            focus: None,
        }
    }

    /// Snapshot a board.
    pub fn from_board<S: KeyValueStore>(board: &Board<S>) -> Self {
        let arrows = board
            .resolved_arrows()
            .into_iter()
            .map(|(arrow, resolved)| ArrowView {
                id: arrow.id.clone(),
                resolved,
            })
            .collect();

        Self {
            grid_spacing: board.config().grid_spacing,
            cards: board.display_cards(),
            arrows,
            focus: board.focus().cloned(),
            ..Self::new(board.camera().clone(), board.viewport())
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn is_arrow_selected(&self, id: &ArrowId) -> bool {
        self.focus.as_ref().and_then(Focus::arrow) == Some(id)
    }

    pub fn is_card_focused(&self, card: &Card) -> bool {
        self.focus.as_ref().and_then(Focus::card) == Some(card.id)
    }

    pub fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(RendererError::InvalidViewport(format!("{}x{}", width, height)));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
///
/// The board calls `draw_background_grid` and `position_layer` after every
/// camera change or viewport resize, and `build_scene` whenever entities
/// change.
pub trait Renderer: Send + Sync {
    /// Redraw the screen-space background.
    fn draw_background_grid(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Apply the world-to-screen transform to the layer hosting cards and
    /// arrows, keeping it aligned with the background.
    fn position_layer(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Build the full frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
