//! SiteBoard Render Library
//!
//! Renderer abstraction for SiteBoard. Produces the background dot grid,
//! the camera transform for the card/arrow layer, and arrow geometry as a
//! backend-neutral display list.

pub mod arrows;
pub mod grid;
mod renderer;
pub mod scene;

pub use arrows::{ArrowLayout, layout_arrows};
pub use grid::{GridDot, dot_radius, grid_dots};
pub use renderer::{ArrowView, GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DisplayList, DrawCommand, SceneRenderer, css_matrix};
