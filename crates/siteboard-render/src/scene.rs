//! Backend-neutral display list renderer.
//!
//! Hosts (the DOM bridge, tests, a native preview) consume the resulting
//! [`DisplayList`] instead of talking to a graphics API directly.

use crate::arrows::{ARROW_STROKE_WIDTH, layout_arrows};
use crate::grid::{grid_dots, grid_lines};
use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer};
use kurbo::{Affine, CubicBez, Line, Point, Rect};
use peniko::Color;
use siteboard_core::handles::{HandleKind, card_handles};
use siteboard_core::{ArrowId, CardId, CardKind};

/// Endpoint handle radius, in world units.
pub const ENDPOINT_HANDLE_RADIUS: f64 = 5.0;
/// Screen-space grid line width.
pub const GRID_LINE_WIDTH: f64 = 0.5;

/// A single drawing primitive.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(Color),
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Line {
        line: Line,
        width: f64,
        color: Color,
    },
    Card {
        id: CardId,
        rect: Rect,
        kind: CardKind,
        /// Typed text while editing.
        content: String,
        /// Normalized link once embedded.
        embed_url: Option<String>,
        focused: bool,
    },
    Handle {
        card: CardId,
        position: Point,
        kind: HandleKind,
    },
    Arrow {
        id: ArrowId,
        curve: CubicBez,
        head: [Point; 3],
        width: f64,
        color: Color,
    },
    DeleteButton {
        arrow: ArrowId,
        center: Point,
    },
}

/// Output of one frame.
///
/// `background` is in screen space. `layer` is in world space and is shown
/// through `layer_transform`.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub background: Vec<DrawCommand>,
    pub layer_transform: Affine,
    pub layer: Vec<DrawCommand>,
}

/// CSS `transform` value for an affine map.
pub fn css_matrix(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!("matrix({}, {}, {}, {}, {}, {})", a, b, c, d, e, f)
}

/// Renderer that records a [`DisplayList`].
#[derive(Debug, Default)]
pub struct SceneRenderer {
    display: DisplayList,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently built frame.
    pub fn display_list(&self) -> &DisplayList {
        &self.display
    }

    pub fn take_display_list(&mut self) -> DisplayList {
        std::mem::take(&mut self.display)
    }

    fn build_layer(&mut self, ctx: &RenderContext) {
        let layer = &mut self.display.layer;
        layer.clear();

        for card in &ctx.cards {
            layer.push(DrawCommand::Card {
                id: card.id,
                rect: card.rect(),
                kind: card.kind,
                content: card.content.clone(),
                embed_url: card.embed_url(),
                focused: ctx.is_card_focused(card),
            });
            layer.extend(card_handles(card).into_iter().map(|handle| DrawCommand::Handle {
                card: card.id,
                position: handle.position,
                kind: handle.kind,
            }));
        }

        // Arrows sit above cards.
        for arrow in layout_arrows(ctx) {
            let color = if arrow.selected {
                ctx.selection_color
            } else {
                ctx.arrow_color
            };
            layer.push(DrawCommand::Arrow {
                id: arrow.id.clone(),
                curve: arrow.curve,
                head: arrow.head,
                width: ARROW_STROKE_WIDTH,
                color,
            });
            if let Some(center) = arrow.endpoint_handle {
                layer.push(DrawCommand::Circle {
                    center,
                    radius: ENDPOINT_HANDLE_RADIUS,
                    color,
                });
            }
            if arrow.selected {
                layer.push(DrawCommand::DeleteButton {
                    arrow: arrow.id,
                    center: arrow.midpoint,
                });
            }
        }
    }
}

impl Renderer for SceneRenderer {
    fn draw_background_grid(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
        let clear = self.background_color(ctx);
        let background = &mut self.display.background;
        background.clear();
        background.push(DrawCommand::Clear(clear));

        match ctx.grid_style {
            GridStyle::None => {}
            GridStyle::Dots => {
                let dots = grid_dots(&ctx.camera, viewport, ctx.grid_spacing);
                background.extend(dots.into_iter().map(|dot| DrawCommand::Circle {
                    center: dot.center,
                    radius: dot.radius,
                    color: ctx.grid_color,
                }));
            }
            GridStyle::Lines => {
                let lines = grid_lines(&ctx.camera, viewport, ctx.grid_spacing);
                background.extend(lines.into_iter().map(|line| DrawCommand::Line {
                    line,
                    width: GRID_LINE_WIDTH,
                    color: ctx.grid_color,
                }));
            }
        }
        Ok(())
    }

    fn position_layer(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.display.layer_transform = ctx.camera.transform();
        Ok(())
    }

    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.draw_background_grid(ctx)?;
        self.position_layer(ctx)?;
        self.build_layer(ctx);
        log::debug!(
            "Built scene: {} background, {} layer commands",
            self.display.background.len(),
            self.display.layer.len()
        );
        Ok(())
    }
}
