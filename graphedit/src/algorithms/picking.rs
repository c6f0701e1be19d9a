use crate::geometry::shapes::{point_in_node, point_on_link};
use crate::geometry::tolerance::HIT_TARGET_PADDING;
use crate::model::{LinkId, NodeId, ObjectId, Vec2};
use crate::Graph;

pub fn nodes_at_impl(g: &Graph, p: Vec2, use_padding: bool) -> Vec<NodeId> {
    g.nodes()
        .filter(|(_, n)| point_in_node(p, n, g.node_radius, use_padding))
        .map(|(id, _)| id)
        .collect()
}

// Start markers are not pickable.
pub fn links_at_impl(g: &Graph, p: Vec2) -> Vec<LinkId> {
    let mut out = Vec::new();
    for (id, l) in g.links() {
        if l.is_start() {
            continue;
        }
        if let Some(geom) = g.geometry_of(l) {
            if point_on_link(p, &geom, HIT_TARGET_PADDING) {
                out.push(id);
            }
        }
    }
    out
}

pub fn object_at_impl(g: &Graph, p: Vec2, use_padding: bool) -> Option<ObjectId> {
    // Nodes first
    if let Some(id) = g
        .nodes()
        .find(|(_, n)| point_in_node(p, n, g.node_radius, use_padding))
        .map(|(id, _)| id)
    {
        log::trace!("pick ({:.1},{:.1}) -> node {}", p.x, p.y, id);
        return Some(ObjectId::Node(id));
    }
    let hit = links_at_impl(g, p).first().copied().map(ObjectId::Link);
    log::trace!("pick ({:.1},{:.1}) -> {:?}", p.x, p.y, hit);
    hit
}
