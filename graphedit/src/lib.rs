pub mod model;
pub mod config;
pub mod error;
pub mod policy;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod shapes;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
    pub mod selection;
    pub mod start_anchor;
}
pub mod json;
pub mod history;
pub mod input;
mod controller;
mod editor;

pub use config::{EditorConfig, LabelRules};
pub use editor::{Editor, Gesture, Grab, Mode, Notice, Overlay, ProvisionalLink};
pub use input::{Button, InputEvent, Key, Modifiers};
pub use error::{ConfigError, EditError, InvariantViolation, LoadError};
pub use geometry::shapes::LinkGeometry;
pub use history::History;
pub use json::SaveOptions;
pub use model::{
    Bend, Circle, Color, GraphType, Link, LinkAttrs, LinkId, Node, NodeId, ObjectId, PetriKind, Rect,
    Vec2,
};
pub use policy::{ConfigPolicy, EditKind, EditPolicy};

use geometry::shapes::{regular_link_geometry, self_loop_geometry, start_link_geometry};
use geometry::tolerance::{DEFAULT_NODE_RADIUS, DUPLICATE_LINK_OFFSET};

/// Nodes and links removed by one delete call, cascaded links included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Removed {
    pub nodes: Vec<NodeId>,
    pub links: Vec<LinkId>,
}

impl Removed {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) graph_type: GraphType,
    pub(crate) node_radius: f64,
    pub(crate) nodes: Vec<Option<Node>>, // id is index
    pub(crate) links: Vec<Option<Link>>, // id is index
    pub(crate) ver: u64,
}

impl Graph {
    pub fn new(graph_type: GraphType) -> Self {
        Graph::with_radius(graph_type, DEFAULT_NODE_RADIUS)
    }
    pub fn with_radius(graph_type: GraphType, node_radius: f64) -> Self {
        Graph { graph_type, node_radius, nodes: Vec::new(), links: Vec::new(), ver: 1 }
    }
    pub fn graph_type(&self) -> GraphType {
        self.graph_type
    }
    pub fn node_radius(&self) -> f64 {
        self.node_radius
    }
    /// Bumped on every mutation; lets a renderer skip unchanged frames.
    pub fn version(&self) -> u64 {
        self.ver
    }
    fn bump(&mut self) {
        self.ver = self.ver.wrapping_add(1);
    }

    // Nodes
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Some(node));
        self.bump();
        id
    }
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize).and_then(|n| n.as_ref())
    }
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id as usize).and_then(|n| n.as_mut());
        if n.is_some() {
            self.ver = self.ver.wrapping_add(1);
        }
        n
    }
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (i as NodeId, n)))
    }
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }
    /// True when the node exists and its position actually changed.
    pub fn move_node(&mut self, id: NodeId, pos: Vec2) -> bool {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return false;
        }
        match self.nodes.get_mut(id as usize) {
            Some(Some(n)) if n.pos != pos => {
                n.pos = pos;
                self.bump();
                true
            }
            _ => false,
        }
    }

    // Links
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id as usize).and_then(|l| l.as_ref())
    }
    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        let l = self.links.get_mut(id as usize).and_then(|l| l.as_mut());
        if l.is_some() {
            self.ver = self.ver.wrapping_add(1);
        }
        l
    }
    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|l| (i as LinkId, l)))
    }
    pub fn link_count(&self) -> usize {
        self.links.iter().filter(|l| l.is_some()).count()
    }
    /// Links the user drew, i.e. everything except initial markers.
    pub fn edge_count(&self) -> usize {
        self.links().filter(|(_, l)| !l.is_start()).count()
    }

    fn petri_kind_of(&self, n: &Node) -> PetriKind {
        n.petri_kind.unwrap_or_default()
    }

    /// Checks whether `link` could be added without breaking a structural rule.
    pub fn validate_link(&self, link: &Link) -> Result<(), InvariantViolation> {
        let (a, b) = link.endpoints();
        let na = self.node(a).ok_or(InvariantViolation::MissingNode(a))?;
        let nb = self.node(b).ok_or(InvariantViolation::MissingNode(b))?;
        match *link {
            Link::Regular { from, to, .. } => {
                if from == to {
                    return Err(InvariantViolation::SelfLoopNotAllowed);
                }
                match self.graph_type {
                    GraphType::Petri => {
                        let kind = self.petri_kind_of(na);
                        if kind == self.petri_kind_of(nb) {
                            return Err(InvariantViolation::SamePetriKind(kind));
                        }
                    }
                    GraphType::Undirected => {
                        let dup = self.links().any(|(_, l)| match *l {
                            Link::Regular { from: f, to: t, .. } => {
                                (f == from && t == to) || (f == to && t == from)
                            }
                            _ => false,
                        });
                        if dup {
                            return Err(InvariantViolation::DuplicateEdge);
                        }
                    }
                    GraphType::Directed => {
                        let dup = self.links().any(|(_, l)| {
                            matches!(*l, Link::Regular { from: f, to: t, .. } if f == from && t == to)
                        });
                        if dup {
                            return Err(InvariantViolation::DuplicateDirectedEdge);
                        }
                    }
                    GraphType::Fsm => {}
                }
            }
            Link::SelfLoop { node, .. } => {
                if !self.graph_type.allows_self_loops() {
                    return Err(InvariantViolation::SelfLoopNotAllowed);
                }
                if self.graph_type == GraphType::Directed
                    && self
                        .links()
                        .any(|(_, l)| matches!(*l, Link::SelfLoop { node: n, .. } if n == node))
                {
                    return Err(InvariantViolation::DuplicateSelfLoop);
                }
            }
            Link::Start { .. } => {
                if !self.graph_type.is_fsm() || !na.initial {
                    return Err(InvariantViolation::StartLinkWithoutInitial);
                }
            }
        }
        Ok(())
    }

    /// Adds a link after validating it; the model is untouched on error.
    pub fn add_link(&mut self, link: Link) -> Result<LinkId, InvariantViolation> {
        self.validate_link(&link)?;
        let id = self.links.len() as LinkId;
        self.links.push(Some(link));
        self.bump();
        Ok(id)
    }

    /// Perpendicular offset for a new `from`->`to` link so it fans out from
    /// the links already joining the pair; `None` when there are none.
    pub fn fan_out_offset(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let mut max_perp: Option<f64> = None;
        for (_, l) in self.links() {
            let Link::Regular { from: f, to: t, bend, .. } = l else { continue };
            let cand = if *f == from && *t == to {
                bend.perpendicular
            } else if *f == to && *t == from {
                -bend.perpendicular
            } else {
                continue;
            };
            max_perp = Some(max_perp.map_or(cand, |m| m.max(cand)));
        }
        max_perp.map(|m| m + DUPLICATE_LINK_OFFSET)
    }

    /// Removes the given nodes and every link touching them.
    pub fn delete_nodes(&mut self, ids: &[NodeId]) -> Removed {
        let mut removed = Removed::default();
        for &id in ids {
            if let Some(slot) = self.nodes.get_mut(id as usize) {
                if slot.take().is_some() {
                    removed.nodes.push(id);
                }
            }
        }
        if removed.nodes.is_empty() {
            return removed;
        }
        for (lid, slot) in self.links.iter_mut().enumerate() {
            let hit = slot
                .as_ref()
                .map_or(false, |l| removed.nodes.iter().any(|n| l.touches(*n)));
            if hit {
                *slot = None;
                removed.links.push(lid as LinkId);
            }
        }
        self.bump();
        removed
    }

    pub fn delete_links(&mut self, ids: &[LinkId]) -> Vec<LinkId> {
        let mut removed = Vec::new();
        for &id in ids {
            if let Some(slot) = self.links.get_mut(id as usize) {
                if slot.take().is_some() {
                    removed.push(id);
                }
            }
        }
        if !removed.is_empty() {
            self.bump();
        }
        removed
    }

    /// Drops all nodes; links go with them.
    pub fn clear_nodes(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.bump();
    }
    pub fn clear_links(&mut self) {
        self.links.clear();
        self.bump();
    }

    // Geometry
    pub fn geometry_of(&self, link: &Link) -> Option<LinkGeometry> {
        let r = self.node_radius;
        match link {
            Link::Regular { from, to, bend, .. } => {
                Some(regular_link_geometry(self.node(*from)?, self.node(*to)?, bend, r))
            }
            Link::SelfLoop { node, anchor_angle, .. } => {
                Some(self_loop_geometry(self.node(*node)?, *anchor_angle, r))
            }
            Link::Start { node, offset, .. } => Some(start_link_geometry(self.node(*node)?, *offset, r)),
        }
    }
    pub fn link_geometry(&self, id: LinkId) -> Option<LinkGeometry> {
        self.geometry_of(self.link(id)?)
    }

    // Spatial queries
    pub fn nodes_at(&self, p: Vec2, use_padding: bool) -> Vec<NodeId> {
        algorithms::picking::nodes_at_impl(self, p, use_padding)
    }
    pub fn links_at(&self, p: Vec2) -> Vec<LinkId> {
        algorithms::picking::links_at_impl(self, p)
    }
    /// Node hits take precedence over link hits.
    pub fn object_at(&self, p: Vec2, use_padding: bool) -> Option<ObjectId> {
        algorithms::picking::object_at_impl(self, p, use_padding)
    }
    pub fn objects_in_rectangle(&self, rect: &Rect) -> Vec<ObjectId> {
        algorithms::selection::objects_in_rectangle_impl(self, rect)
    }
    pub fn is_locked(&self, obj: ObjectId) -> bool {
        match obj {
            ObjectId::Node(id) => self.node(id).map_or(false, |n| n.locked),
            ObjectId::Link(id) => self.link(id).map_or(false, |l| l.is_locked()),
        }
    }
    pub fn contains(&self, obj: ObjectId) -> bool {
        match obj {
            ObjectId::Node(id) => self.node(id).is_some(),
            ObjectId::Link(id) => self.link(id).is_some(),
        }
    }

    // FSM initial markers
    pub fn incident_angles(&self, node: NodeId) -> Vec<f64> {
        algorithms::start_anchor::incident_angles_impl(self, node)
    }

    /// Brings the initial markers in line with the nodes' `initial` flags.
    /// Existing markers keep their ids; the version moves only when a marker
    /// is added, removed or repositioned.
    pub fn refresh_start_links(&mut self) {
        let fsm = self.graph_type.is_fsm();
        let wanted: Vec<(NodeId, Vec2)> = if fsm {
            self.nodes()
                .filter(|(_, n)| n.initial)
                .map(|(id, _)| (id, algorithms::start_anchor::start_offset_impl(self, id)))
                .collect()
        } else {
            Vec::new()
        };
        let mut covered: Vec<NodeId> = Vec::new();
        let mut changed = false;
        for slot in self.links.iter_mut() {
            let Some(Link::Start { node, .. }) = slot.as_ref() else { continue };
            let node = *node;
            let target = wanted.iter().find(|(id, _)| *id == node).map(|(_, o)| *o);
            match (target, slot.as_mut()) {
                (Some(o), Some(Link::Start { offset, .. })) if !covered.contains(&node) => {
                    covered.push(node);
                    if *offset != o {
                        *offset = o;
                        changed = true;
                    }
                }
                _ => {
                    *slot = None;
                    changed = true;
                }
            }
        }
        for (id, offset) in wanted {
            if covered.contains(&id) {
                continue;
            }
            let marker = Link::Start { node: id, offset, attrs: LinkAttrs::default() };
            match self.add_link(marker) {
                Ok(_) => changed = true,
                Err(e) => log::warn!("initial marker for node {}: {}", id, e),
            }
        }
        if changed {
            self.bump();
        }
    }

    /// Sets or clears the FSM initial flag and regenerates the markers.
    pub fn set_initial(&mut self, id: NodeId, initial: bool) -> bool {
        if !self.graph_type.is_fsm() {
            return false;
        }
        match self.nodes.get_mut(id as usize) {
            Some(Some(n)) => n.initial = initial,
            _ => return false,
        }
        self.refresh_start_links();
        true
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.bump();
    }

    // JSON
    pub fn to_json_value(&self, opts: &SaveOptions) -> serde_json::Value {
        json::to_json_impl(self, opts)
    }
    pub fn from_json_value(&mut self, v: serde_json::Value, opts: &SaveOptions) -> Result<(), LoadError> {
        json::from_json_impl(self, v, opts)
    }
}
