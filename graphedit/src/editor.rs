use crate::config::{EditorConfig, LabelRules};
use crate::error::{ConfigError, EditError, InvariantViolation, LoadError};
use crate::geometry::limits::{MAX_LABEL_LEN, MAX_TOKENS};
use crate::geometry::shapes::{closest_point_on_node, regular_link_geometry, self_loop_geometry, LinkGeometry};
use crate::history::History;
use crate::json::{self, SaveOptions};
use crate::model::{Bend, Color, Link, LinkAttrs, LinkId, NodeId, ObjectId, PetriKind, Rect, Vec2};
use crate::policy::{EditKind, EditPolicy};
use crate::{Graph, Removed};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Select,
    Draw,
}

/// Link being drawn, re-evaluated on every pointer move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisionalLink {
    SelfLoop { node: NodeId, anchor_angle: f64 },
    Regular { from: NodeId, to: NodeId, bend: Bend },
    /// Follows the pointer without a target; never committed.
    Dangling { from: NodeId, to: Vec2 },
}

impl ProvisionalLink {
    pub fn origin(&self) -> NodeId {
        match *self {
            ProvisionalLink::SelfLoop { node, .. } => node,
            ProvisionalLink::Regular { from, .. } | ProvisionalLink::Dangling { from, .. } => from,
        }
    }
    pub fn is_dangling(&self) -> bool {
        matches!(self, ProvisionalLink::Dangling { .. })
    }
    fn into_link(self, attrs: LinkAttrs) -> Option<Link> {
        match self {
            ProvisionalLink::SelfLoop { node, anchor_angle } => Some(Link::SelfLoop { node, anchor_angle, attrs }),
            ProvisionalLink::Regular { from, to, bend } => Some(Link::Regular { from, to, bend, attrs }),
            ProvisionalLink::Dangling { .. } => None,
        }
    }
}

/// One object following the pointer during a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Grab {
    /// `offset` is node position minus pointer at drag start.
    Node { id: NodeId, offset: Vec2 },
    /// `angle_offset` keeps a self-loop from jumping to the pointer angle.
    Link { id: LinkId, angle_offset: f64 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { clicked: ObjectId, items: Vec<Grab>, moved: bool },
    RectangleSelecting { start: Vec2, current: Vec2 },
    PendingLink { origin: NodeId, provisional: Option<ProvisionalLink> },
}

/// User-facing message queued for the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Violation(String),
    LoadFailed(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Violation(m) | Notice::LoadFailed(m) => m,
        }
    }
}

/// Transient shapes a renderer paints on top of the diagram.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Overlay {
    pub rectangle: Option<Rect>,
    pub provisional: Option<LinkGeometry>,
}

/// One editor instance: model, history, selection and the interaction state.
pub struct Editor {
    pub(crate) graph: Graph,
    pub(crate) config: EditorConfig,
    pub(crate) labels: LabelRules,
    pub(crate) policy: Box<dyn EditPolicy>,
    pub(crate) history: History,
    pub(crate) mode: Mode,
    pub(crate) temp_draw: bool,
    pub(crate) selection: Vec<ObjectId>,
    pub(crate) saved_selection: Vec<ObjectId>,
    pub(crate) gesture: Gesture,
    pub(crate) pointer: Option<Vec2>,
    pub(crate) notices: Vec<Notice>,
    pub(crate) draw_petri_kind: PetriKind,
    pub(crate) text: String,
    pub(crate) failed: bool,
    pub(crate) fail_message: Option<String>,
}

// Snapshots keep every attribute regardless of what the host persists.
const SNAPSHOT: SaveOptions = SaveOptions {
    vertex_colors: true,
    edge_colors: true,
    highlight_vertices: true,
    highlight_edges: true,
    save_locked: false,
    ignore_locked: false,
};

impl Editor {
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        let labels = config.label_rules()?;
        let mut ed = Editor {
            graph: Graph::with_radius(config.graph_type, config.node_radius),
            labels,
            policy: Box::new(config.policy()),
            history: History::new(config.max_history),
            mode: Mode::Select,
            temp_draw: false,
            selection: Vec::new(),
            saved_selection: Vec::new(),
            gesture: Gesture::Idle,
            pointer: None,
            notices: Vec::new(),
            draw_petri_kind: PetriKind::Place,
            text: String::new(),
            failed: false,
            fail_message: None,
            config,
        };
        let initial = ed.snapshot();
        ed.history.reset(initial);
        Ok(ed)
    }

    /// Editor for the given parameters JSON, loaded with `text`. A load
    /// failure is reported through [`Editor::failed`], not as an error.
    pub fn from_params(params: &str, text: &str) -> Result<Self, ConfigError> {
        let mut ed = Editor::new(EditorConfig::from_json_str(params)?)?;
        let _ = ed.load_from_text(text);
        Ok(ed)
    }

    pub fn set_policy<P: EditPolicy + 'static>(&mut self, policy: P) {
        self.policy = Box::new(policy);
    }

    /// Read-only editors allow nothing regardless of the policy.
    pub fn allows(&self, kind: EditKind) -> bool {
        !self.config.readonly && self.policy.allows(kind)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
    pub fn history(&self) -> &History {
        &self.history
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    /// Mode the pointer currently acts in, temporary Draw included.
    pub fn effective_mode(&self) -> Mode {
        if self.temp_draw {
            Mode::Draw
        } else {
            self.mode
        }
    }
    pub fn temp_draw_active(&self) -> bool {
        self.temp_draw
    }
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }
    pub fn draw_petri_kind(&self) -> PetriKind {
        self.draw_petri_kind
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode && !self.temp_draw {
            return;
        }
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.finish_drag();
        if self.temp_draw {
            self.end_temp_draw();
        }
        self.gesture = Gesture::Idle;
        self.mode = mode;
    }

    pub fn set_draw_petri_kind(&mut self, kind: PetriKind) {
        self.draw_petri_kind = kind;
    }

    // Selection

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }
    pub fn is_selected(&self, obj: ObjectId) -> bool {
        self.selection.contains(&obj)
    }
    /// Whether `obj` may enter the selection: it exists, is not locked and is
    /// not an initial marker.
    pub fn is_selectable(&self, obj: ObjectId) -> bool {
        let marker = match obj {
            ObjectId::Link(id) => self.graph.link(id).map_or(false, Link::is_start),
            ObjectId::Node(_) => false,
        };
        self.graph.contains(obj) && !marker && !self.graph.is_locked(obj)
    }
    pub fn select_only(&mut self, obj: ObjectId) -> bool {
        if !self.is_selectable(obj) {
            return false;
        }
        self.selection = vec![obj];
        true
    }
    pub fn toggle_in_selection(&mut self, obj: ObjectId) -> bool {
        if let Some(i) = self.selection.iter().position(|o| *o == obj) {
            self.selection.remove(i);
            return true;
        }
        if !self.is_selectable(obj) {
            return false;
        }
        self.selection.push(obj);
        true
    }
    pub fn set_selection<I: IntoIterator<Item = ObjectId>>(&mut self, objs: I) {
        let mut sel = Vec::new();
        for o in objs {
            if self.is_selectable(o) && !sel.contains(&o) {
                sel.push(o);
            }
        }
        self.selection = sel;
    }
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Deletes the selection and every link attached to a deleted node. All or
    /// nothing: a locked object or a denied kind aborts the whole delete.
    pub fn delete_selection(&mut self) -> Result<Removed, EditError> {
        if self.selection.is_empty() {
            return Ok(Removed::default());
        }
        if self.selection.iter().any(|o| self.graph.is_locked(*o)) {
            return Err(EditError::Locked);
        }
        let nodes: Vec<NodeId> = self
            .selection
            .iter()
            .filter_map(|o| match o {
                ObjectId::Node(id) => Some(*id),
                _ => None,
            })
            .collect();
        let links: Vec<LinkId> = self
            .selection
            .iter()
            .filter_map(|o| match o {
                ObjectId::Link(id) => Some(*id),
                _ => None,
            })
            .collect();
        if !nodes.is_empty() && !self.allows(EditKind::DeleteVertex) {
            return Err(EditError::PolicyDenied(EditKind::DeleteVertex));
        }
        if !links.is_empty() && !self.allows(EditKind::DeleteEdge) {
            return Err(EditError::PolicyDenied(EditKind::DeleteEdge));
        }
        let mut removed = Removed { nodes: Vec::new(), links: self.graph.delete_links(&links) };
        let cascade = self.graph.delete_nodes(&nodes);
        removed.nodes = cascade.nodes;
        removed.links.extend(cascade.links);
        self.refresh_markers();
        self.selection.clear();
        self.saved_selection.clear();
        log::debug!("deleted {} nodes, {} links", removed.nodes.len(), removed.links.len());
        self.record_change();
        Ok(removed)
    }

    // Drawing links

    pub fn provisional_link(&self) -> Option<&ProvisionalLink> {
        match &self.gesture {
            Gesture::PendingLink { provisional, .. } => provisional.as_ref(),
            _ => None,
        }
    }

    /// Commits the link being drawn. `Ok(None)` when there is nothing to
    /// commit (no gesture, or a dangling link).
    pub fn commit_provisional_link(&mut self) -> Result<Option<LinkId>, EditError> {
        let provisional = match std::mem::take(&mut self.gesture) {
            Gesture::PendingLink { provisional: Some(p), .. } => p,
            other => {
                self.gesture = other;
                return Ok(None);
            }
        };
        if provisional.is_dangling() {
            return Ok(None);
        }
        if !self.allows(EditKind::AddEdge) {
            return Err(EditError::PolicyDenied(EditKind::AddEdge));
        }
        self.commit_link(provisional).map(Some).map_err(EditError::from)
    }

    pub fn abort_provisional_link(&mut self) {
        if matches!(self.gesture, Gesture::PendingLink { .. }) {
            log::debug!("provisional link dropped");
            self.gesture = Gesture::Idle;
        }
    }

    pub(crate) fn commit_link(&mut self, p: ProvisionalLink) -> Result<LinkId, InvariantViolation> {
        let attrs = LinkAttrs { color: self.config.default_edge_color(), ..LinkAttrs::default() };
        let Some(link) = p.into_link(attrs) else {
            return Err(InvariantViolation::MissingNode(p.origin()));
        };
        match self.graph.add_link(link) {
            Ok(id) => {
                log::debug!("link {} committed", id);
                self.selection = vec![ObjectId::Link(id)];
                self.saved_selection = self.selection.clone();
                self.refresh_markers();
                self.record_change();
                Ok(id)
            }
            Err(v) => {
                log::warn!("link rejected: {}", v);
                self.notices.push(Notice::Violation(v.to_string()));
                Err(v)
            }
        }
    }

    // Toolbar entry points

    fn check_edit(&self, obj: ObjectId, kind: EditKind) -> Result<(), EditError> {
        if !self.graph.contains(obj) {
            return Err(EditError::UnknownObject);
        }
        if let ObjectId::Link(id) = obj {
            if self.graph.link(id).map_or(false, Link::is_start) {
                return Err(EditError::UnknownObject);
            }
        }
        if !self.allows(kind) {
            return Err(EditError::PolicyDenied(kind));
        }
        if self.graph.is_locked(obj) {
            return Err(EditError::Locked);
        }
        Ok(())
    }

    fn fsm_node(&self, id: NodeId) -> Result<(), EditError> {
        if !self.graph.graph_type.is_fsm() {
            return Err(EditError::Unsupported);
        }
        self.check_edit(ObjectId::Node(id), EditKind::FsmFlags)
    }

    pub fn label_is_valid(&self, obj: ObjectId, label: &str) -> bool {
        if label.len() > MAX_LABEL_LEN {
            return false;
        }
        match obj {
            ObjectId::Node(_) => self.labels.vertex_label_is_valid(label),
            ObjectId::Link(_) => self.labels.edge_label_is_valid(label),
        }
    }

    pub fn set_label(&mut self, obj: ObjectId, label: &str) -> Result<(), EditError> {
        let kind = match obj {
            ObjectId::Node(_) => EditKind::VertexLabels,
            ObjectId::Link(_) => EditKind::EdgeLabels,
        };
        self.check_edit(obj, kind)?;
        if !self.label_is_valid(obj, label) {
            return Err(EditError::InvalidLabel);
        }
        let slot = match obj {
            ObjectId::Node(id) => self.graph.node_mut(id).map(|n| &mut n.label),
            ObjectId::Link(id) => self.graph.link_mut(id).map(|l| &mut l.attrs_mut().label),
        };
        let Some(slot) = slot else {
            return Err(EditError::UnknownObject);
        };
        if slot != label {
            *slot = label.to_owned();
            self.record_change();
        }
        Ok(())
    }

    pub fn set_color(&mut self, obj: ObjectId, color: Option<Color>) -> Result<(), EditError> {
        let kind = match obj {
            ObjectId::Node(_) => EditKind::VertexColors,
            ObjectId::Link(_) => EditKind::EdgeColors,
        };
        self.check_edit(obj, kind)?;
        let slot = match obj {
            ObjectId::Node(id) => self.graph.node_mut(id).map(|n| &mut n.color),
            ObjectId::Link(id) => self.graph.link_mut(id).map(|l| &mut l.attrs_mut().color),
        };
        let Some(slot) = slot else {
            return Err(EditError::UnknownObject);
        };
        if *slot != color {
            *slot = color;
            self.record_change();
        }
        Ok(())
    }

    /// Highlighting shares the color permissions.
    pub fn set_highlighted(&mut self, obj: ObjectId, on: bool) -> Result<(), EditError> {
        let kind = match obj {
            ObjectId::Node(_) => EditKind::VertexColors,
            ObjectId::Link(_) => EditKind::EdgeColors,
        };
        self.check_edit(obj, kind)?;
        let slot = match obj {
            ObjectId::Node(id) => self.graph.node_mut(id).map(|n| &mut n.highlighted),
            ObjectId::Link(id) => self.graph.link_mut(id).map(|l| &mut l.attrs_mut().highlighted),
        };
        let Some(slot) = slot else {
            return Err(EditError::UnknownObject);
        };
        if *slot != on {
            *slot = on;
            self.record_change();
        }
        Ok(())
    }

    pub fn set_initial(&mut self, id: NodeId, initial: bool) -> Result<(), EditError> {
        self.fsm_node(id)?;
        if self.graph.node(id).map_or(false, |n| n.initial == initial) {
            return Ok(());
        }
        self.graph.set_initial(id, initial);
        self.record_change();
        Ok(())
    }

    pub fn set_final(&mut self, id: NodeId, is_final: bool) -> Result<(), EditError> {
        self.fsm_node(id)?;
        let Some(n) = self.graph.node_mut(id) else {
            return Err(EditError::UnknownObject);
        };
        if n.is_final != is_final {
            n.is_final = is_final;
            self.record_change();
        }
        Ok(())
    }

    /// Token count of a Petri place, capped at the ingestion limit.
    pub fn set_tokens(&mut self, id: NodeId, tokens: u32) -> Result<(), EditError> {
        if !self.graph.graph_type.is_petri() || self.graph.node(id).map_or(false, |n| n.is_transition()) {
            return Err(EditError::Unsupported);
        }
        self.check_edit(ObjectId::Node(id), EditKind::PetriMarking)?;
        let Some(n) = self.graph.node_mut(id) else {
            return Err(EditError::UnknownObject);
        };
        let tokens = tokens.min(MAX_TOKENS);
        if n.tokens != tokens {
            n.tokens = tokens;
            self.record_change();
        }
        Ok(())
    }

    // History and persistence

    fn snapshot(&self) -> String {
        json::to_json_impl(&self.graph, &SNAPSHOT).to_string()
    }

    /// Re-derives the persisted text. Left alone after a failed load so the
    /// unreadable answer is not overwritten.
    fn sync_text(&mut self) {
        if self.failed {
            return;
        }
        if let Some(t) = json::save(&self.graph, &self.config.save_options(), &self.text) {
            self.text = t;
        }
    }

    pub(crate) fn record_change(&mut self) {
        let snap = self.snapshot();
        self.history.record(snap);
        self.sync_text();
    }

    pub(crate) fn refresh_markers(&mut self) {
        if self.graph.graph_type.is_fsm() {
            self.graph.refresh_start_links();
        }
    }

    fn restore(&mut self, snapshot: &str) {
        if let Err(e) = json::load(&mut self.graph, snapshot, &SNAPSHOT) {
            log::warn!("history snapshot failed to load: {}", e);
        }
        self.selection.clear();
        self.saved_selection.clear();
        self.gesture = Gesture::Idle;
        self.sync_text();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(snap) = self.history.undo().map(str::to_owned) else {
            return false;
        };
        self.restore(&snap);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snap) = self.history.redo().map(str::to_owned) else {
            return false;
        };
        self.restore(&snap);
        true
    }

    /// Persisted text for the current model.
    pub fn save_now(&mut self) -> &str {
        self.sync_text();
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the diagram with `text`. On failure the model keeps its
    /// previous contents and the failure flag is raised.
    pub fn load_from_text(&mut self, text: &str) -> Result<(), LoadError> {
        match json::load(&mut self.graph, text, &self.config.save_options()) {
            Ok(()) => {
                self.text = text.to_owned();
                self.failed = false;
                self.fail_message = None;
                self.selection.clear();
                self.saved_selection.clear();
                self.gesture = Gesture::Idle;
                let snap = self.snapshot();
                self.history.reset(snap);
                log::debug!("loaded {} nodes, {} links", self.graph.node_count(), self.graph.link_count());
                Ok(())
            }
            Err(e) => {
                log::warn!("load failed: {}", e);
                self.text = text.to_owned();
                self.failed = true;
                self.fail_message = Some(e.to_string());
                self.notices.push(Notice::LoadFailed(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }
    pub fn fail_message(&self) -> Option<&str> {
        self.fail_message.as_deref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // Render data

    pub fn link_has_arrow(&self) -> bool {
        self.graph.graph_type.has_arrows()
    }

    pub fn overlay(&self) -> Overlay {
        let mut out = Overlay::default();
        match &self.gesture {
            Gesture::RectangleSelecting { start, current } => out.rectangle = Some(Rect::new(*start, *current)),
            Gesture::PendingLink { provisional: Some(p), .. } => out.provisional = self.provisional_geometry(p),
            _ => {}
        }
        out
    }

    fn provisional_geometry(&self, p: &ProvisionalLink) -> Option<LinkGeometry> {
        let r = self.graph.node_radius;
        match *p {
            ProvisionalLink::SelfLoop { node, anchor_angle } => {
                Some(self_loop_geometry(self.graph.node(node)?, anchor_angle, r))
            }
            ProvisionalLink::Regular { from, to, bend } => {
                Some(regular_link_geometry(self.graph.node(from)?, self.graph.node(to)?, &bend, r))
            }
            ProvisionalLink::Dangling { from, to } => {
                let start = closest_point_on_node(self.graph.node(from)?, r, to);
                Some(LinkGeometry::straight(start, to))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphType, Node};

    fn editor(t: GraphType) -> Editor {
        Editor::new(EditorConfig::new(t)).unwrap()
    }

    #[test]
    fn locked_objects_never_enter_the_selection() {
        let mut ed = editor(GraphType::Undirected);
        let a = ed.graph.add_node(Node { locked: true, ..Node::at(Vec2::new(0.0, 0.0)) });
        let b = ed.graph.add_node(Node::at(Vec2::new(100.0, 0.0)));
        assert!(!ed.select_only(ObjectId::Node(a)));
        assert!(!ed.toggle_in_selection(ObjectId::Node(a)));
        ed.set_selection([ObjectId::Node(a), ObjectId::Node(b), ObjectId::Node(b)]);
        assert_eq!(ed.selection(), &[ObjectId::Node(b)]);
    }

    #[test]
    fn delete_is_all_or_nothing() {
        let mut ed = editor(GraphType::Directed);
        let a = ed.graph.add_node(Node::at(Vec2::new(0.0, 0.0)));
        let b = ed.graph.add_node(Node::at(Vec2::new(100.0, 0.0)));
        let l = ed.graph.add_link(Link::regular(a, b)).unwrap();
        ed.set_policy(|k: EditKind| k != EditKind::DeleteEdge);
        ed.set_selection([ObjectId::Node(a), ObjectId::Link(l)]);
        assert_eq!(ed.delete_selection(), Err(EditError::PolicyDenied(EditKind::DeleteEdge)));
        assert_eq!(ed.graph.node_count(), 2);

        ed.set_selection([ObjectId::Node(a)]);
        let removed = ed.delete_selection().unwrap();
        assert_eq!(removed.nodes, vec![a]);
        assert_eq!(removed.links, vec![l]);
        assert!(ed.selection().is_empty());
    }

    #[test]
    fn labels_are_checked_against_the_pattern() {
        let cfg = EditorConfig { vertex_label_regex: Some("^[a-z]$".into()), ..EditorConfig::new(GraphType::Undirected) };
        let mut ed = Editor::new(cfg).unwrap();
        let a = ed.graph.add_node(Node::at(Vec2::new(0.0, 0.0)));
        assert_eq!(ed.set_label(ObjectId::Node(a), "AB"), Err(EditError::InvalidLabel));
        ed.set_label(ObjectId::Node(a), "x").unwrap();
        assert_eq!(ed.graph.node(a).unwrap().label, "x");
        assert!(ed.can_undo());
    }

    #[test]
    fn fsm_and_petri_setters_check_the_graph_type() {
        let mut ed = editor(GraphType::Undirected);
        let a = ed.graph.add_node(Node::at(Vec2::new(0.0, 0.0)));
        assert_eq!(ed.set_initial(a, true), Err(EditError::Unsupported));
        assert_eq!(ed.set_tokens(a, 3), Err(EditError::Unsupported));

        let mut fsm = editor(GraphType::Fsm);
        let q = fsm.graph.add_node(Node::at(Vec2::new(0.0, 0.0)));
        fsm.set_initial(q, true).unwrap();
        fsm.set_final(q, true).unwrap();
        assert_eq!(fsm.graph.links().filter(|(_, l)| l.is_start()).count(), 1);

        let mut petri = editor(GraphType::Petri);
        let t = petri
            .graph
            .add_node(Node { petri_kind: Some(PetriKind::Transition), ..Node::at(Vec2::new(0.0, 0.0)) });
        let p = petri.graph.add_node(Node { petri_kind: Some(PetriKind::Place), ..Node::at(Vec2::new(90.0, 0.0)) });
        assert_eq!(petri.set_tokens(t, 2), Err(EditError::Unsupported));
        petri.set_tokens(p, u32::MAX).unwrap();
        assert_eq!(petri.graph.node(p).unwrap().tokens, MAX_TOKENS);
    }

    #[test]
    fn readonly_blocks_every_edit() {
        let cfg = EditorConfig { readonly: true, ..EditorConfig::new(GraphType::Undirected) };
        let mut ed = Editor::new(cfg).unwrap();
        ed.set_policy(|_: EditKind| true);
        let a = ed.graph.add_node(Node::at(Vec2::new(0.0, 0.0)));
        assert_eq!(
            ed.set_label(ObjectId::Node(a), "x"),
            Err(EditError::PolicyDenied(EditKind::VertexLabels))
        );
    }

    #[test]
    fn failed_load_keeps_the_model_and_reports() {
        let mut ed = editor(GraphType::Undirected);
        ed.load_from_text(r#"{"_version":1,"vertices":[{"label":"a","position":[1,2]}],"edges":[]}"#).unwrap();
        assert!(ed.load_from_text("{not json").is_err());
        assert!(ed.failed());
        assert!(ed.fail_message().is_some());
        assert_eq!(ed.graph.node_count(), 1);
        assert_eq!(ed.text(), "{not json");
        assert!(matches!(ed.take_notices().as_slice(), [Notice::LoadFailed(_)]));
        assert!(ed.take_notices().is_empty());
    }
}
