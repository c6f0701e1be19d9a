use crate::geometry::math::{is_rect_contained, point_in_rect};
use crate::geometry::shapes::sample_link;
use crate::geometry::tolerance::ARC_SAMPLE_STEPS;
use crate::model::{ObjectId, Rect, Vec2};
use crate::Graph;

/// Unlocked nodes whose bounding square lies inside `rect`, then unlocked
/// non-marker links whose every sampled point does.
pub fn objects_in_rectangle_impl(g: &Graph, rect: &Rect) -> Vec<ObjectId> {
    let r = g.node_radius;
    let mut out = Vec::new();
    for (id, n) in g.nodes() {
        if n.locked {
            continue;
        }
        let bbox = Rect::new(n.pos - Vec2::new(r, r), n.pos + Vec2::new(r, r));
        if is_rect_contained(rect, &bbox) {
            out.push(ObjectId::Node(id));
        }
    }
    for (id, l) in g.links() {
        if l.is_locked() || l.is_start() {
            continue;
        }
        let Some(geom) = g.geometry_of(l) else { continue };
        if sample_link(&geom, ARC_SAMPLE_STEPS).into_iter().all(|p| point_in_rect(rect, p)) {
            out.push(ObjectId::Link(id));
        }
    }
    out
}
