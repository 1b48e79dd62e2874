//! World-space arrow geometry ready for drawing.

use crate::renderer::RenderContext;
use kurbo::{CubicBez, Point, Vec2};
use siteboard_core::ArrowId;
use siteboard_core::handles::endpoint_handle_position;

/// Arrowhead length along the tip direction, in world units.
pub const ARROWHEAD_LENGTH: f64 = 10.0;
/// Arrowhead width across the tip direction, in world units.
pub const ARROWHEAD_WIDTH: f64 = 7.0;
/// Arrow stroke width, in world units.
pub const ARROW_STROKE_WIDTH: f64 = 2.0;

/// Everything needed to draw one arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowLayout {
    pub id: ArrowId,
    pub curve: CubicBez,
    /// Arrowhead triangle: tip, then the two back corners.
    pub head: [Point; 3],
    /// Where the delete button goes when the arrow is selected.
    pub midpoint: Point,
    /// Draggable endpoint handle, only present on the focused arrow.
    pub endpoint_handle: Option<Point>,
    pub selected: bool,
    /// Whether the far end is attached to a card.
    pub attached: bool,
}

/// Direction the curve is travelling in at its tip.
///
/// Falls back through earlier control points when later ones coincide with
/// the tip, so degenerate curves still get a sensible head.
fn tip_direction(curve: &CubicBez) -> Vec2 {
    [curve.p2, curve.p1, curve.p0]
        .into_iter()
        .map(|p| curve.p3 - p)
        .find(|d| d.hypot2() > f64::EPSILON)
        .map(|d| d.normalize())
        .unwrap_or(Vec2::new(1.0, 0.0))
}

fn arrowhead(curve: &CubicBez) -> [Point; 3] {
    let dir = tip_direction(curve);
    let normal = Vec2::new(-dir.y, dir.x);
    let tip = curve.p3;
    let back = tip - dir * ARROWHEAD_LENGTH;
    let half = ARROWHEAD_WIDTH / 2.0;
    [tip, back + normal * half, back - normal * half]
}

/// Lay out every drawable arrow in a frame.
pub fn layout_arrows(ctx: &RenderContext) -> Vec<ArrowLayout> {
    ctx.arrows
        .iter()
        .map(|view| {
            let curve = view.resolved.curve();
            let selected = ctx.is_arrow_selected(&view.id);
            ArrowLayout {
                id: view.id.clone(),
                curve,
                head: arrowhead(&curve),
                midpoint: view.resolved.midpoint(),
                endpoint_handle: selected.then(|| endpoint_handle_position(&view.resolved)),
                selected,
                attached: view.resolved.to_anchor.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ArrowView;
    use kurbo::Size;
    use siteboard_core::{Anchor, Camera, CardId, Focus, ResolvedArrow};

    fn view(to: Point, to_anchor: Option<Anchor>) -> ArrowView {
        ArrowView {
            id: ArrowId::for_origin(CardId(1), Anchor::Right),
            resolved: ResolvedArrow {
                from: Point::new(0.0, 0.0),
                from_anchor: Anchor::Right,
                to,
                to_anchor,
            },
        }
    }

    #[test]
    fn test_tip_direction_fallbacks() {
        let straight = CubicBez::new((0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0));
        assert_eq!(tip_direction(&straight), Vec2::new(1.0, 0.0));

        let p2_on_tip = CubicBez::new((0.0, 0.0), (0.0, 10.0), (0.0, 20.0), (0.0, 20.0));
        assert_eq!(tip_direction(&p2_on_tip), Vec2::new(0.0, 1.0));

        let point = CubicBez::new((5.0, 5.0), (5.0, 5.0), (5.0, 5.0), (5.0, 5.0));
        assert_eq!(tip_direction(&point), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_arrowhead_shape() {
        let curve = CubicBez::new((0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0));
        let [tip, a, b] = arrowhead(&curve);
        assert_eq!(tip, Point::new(30.0, 0.0));
        assert_eq!(a, Point::new(20.0, 3.5));
        assert_eq!(b, Point::new(20.0, -3.5));
    }

    #[test]
    fn test_handle_only_on_selected() {
        let mut ctx = RenderContext::new(Camera::new(), Size::new(800.0, 600.0));
        ctx.arrows.push(view(Point::new(300.0, 0.0), Some(Anchor::Left)));

        let layout = layout_arrows(&ctx);
        assert!(!layout[0].selected);
        assert!(layout[0].endpoint_handle.is_none());
        assert!(layout[0].attached);

        ctx.focus = Some(Focus::Arrow(ctx.arrows[0].id.clone()));
        let layout = layout_arrows(&ctx);
        assert!(layout[0].selected);
        assert_eq!(layout[0].endpoint_handle, Some(Point::new(305.0, 0.0)));
    }

    #[test]
    fn test_free_end_layout() {
        let mut ctx = RenderContext::new(Camera::new(), Size::new(800.0, 600.0));
        ctx.arrows.push(view(Point::new(0.0, 200.0), None));
        let layout = layout_arrows(&ctx);
        assert!(!layout[0].attached);
        assert_eq!(layout[0].head[0], Point::new(0.0, 200.0));
        assert_eq!(layout[0].curve.p0, Point::ZERO);
    }
}
