// Pointer and keyboard state machine driving the editor.

use crate::editor::{Editor, Gesture, Grab, Mode, ProvisionalLink};
use crate::geometry::limits::in_coord_bounds;
use crate::geometry::math::snap;
use crate::geometry::shapes::{drag_bend, self_loop_anchor};
use crate::geometry::tolerance::SNAP_TO_PADDING;
use crate::input::{Button, InputEvent, Key, Modifiers};
use crate::model::{Bend, Link, LinkId, Node, NodeId, ObjectId, Rect, Vec2};
use crate::policy::EditKind;

impl Editor {
    /// Feeds one input event through the state machine.
    pub fn handle(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::PointerDown { pos, button, modifiers } => {
                if button == Button::Primary {
                    self.pointer_down(pos, modifiers);
                }
            }
            InputEvent::PointerMove { pos, modifiers: _ } => self.pointer_move(pos),
            InputEvent::PointerUp { pos, modifiers } => self.pointer_up(Some(pos), modifiers),
            InputEvent::PointerEnter { modifiers } => {
                if self.temp_draw && !modifiers.ctrl {
                    self.end_temp_draw();
                }
            }
            InputEvent::PointerLeave { modifiers } => {
                self.pointer_up(None, modifiers);
                self.pointer = None;
            }
            InputEvent::KeyDown { key, modifiers: _ } => self.key_down(key),
            InputEvent::KeyUp { key, modifiers: _ } => {
                if key == Key::Control && self.temp_draw {
                    self.end_temp_draw();
                }
            }
            InputEvent::FocusLost => {
                self.pointer_up(None, Modifiers::NONE);
                if self.temp_draw {
                    self.end_temp_draw();
                }
            }
        }
    }

    fn key_down(&mut self, key: Key) {
        match key {
            Key::Delete => {
                if let Err(e) = self.delete_selection() {
                    log::warn!("delete refused: {}", e);
                }
            }
            Key::Escape => {
                self.finish_drag();
                self.gesture = Gesture::Idle;
                self.clear_selection();
            }
            Key::Control => {
                if self.mode == Mode::Select
                    && !self.temp_draw
                    && (self.allows(EditKind::AddVertex) || self.allows(EditKind::AddEdge))
                {
                    log::debug!("temporary draw on");
                    self.temp_draw = true;
                    self.saved_selection = self.selection.clone();
                }
            }
            Key::Other => {}
        }
    }

    pub(crate) fn end_temp_draw(&mut self) {
        log::debug!("temporary draw off");
        self.temp_draw = false;
        self.abort_provisional_link();
        let saved = std::mem::take(&mut self.saved_selection);
        self.set_selection(saved.iter().copied());
        self.saved_selection = saved;
    }

    fn pointer_down(&mut self, pos: Vec2, modifiers: Modifiers) {
        self.pointer = Some(pos);
        if self.temp_draw && !modifiers.ctrl {
            self.end_temp_draw();
        }
        // A gesture never survives a new press.
        self.finish_drag();
        self.gesture = Gesture::Idle;

        let clicked = self.graph.object_at(pos, true);
        let mode = self.effective_mode();
        if mode == Mode::Select || clicked.is_some() {
            self.select_on_press(clicked, modifiers.shift);
            let Some(obj) = clicked else {
                if mode == Mode::Select {
                    self.gesture = Gesture::RectangleSelecting { start: pos, current: pos };
                }
                return;
            };
            match (mode, obj) {
                (Mode::Draw, ObjectId::Node(origin)) if self.allows(EditKind::AddEdge) => {
                    log::debug!("drawing from node {}", origin);
                    self.gesture = Gesture::PendingLink { origin, provisional: None };
                }
                (Mode::Draw, _) => {
                    self.gesture = Gesture::Dragging { clicked: obj, items: Vec::new(), moved: false };
                }
                (Mode::Select, _) => {
                    let items = self.grab(obj, pos);
                    log::debug!("dragging {} objects", items.len());
                    self.gesture = Gesture::Dragging { clicked: obj, items, moved: false };
                }
            }
        } else {
            self.create_node(pos);
        }
    }

    fn select_on_press(&mut self, clicked: Option<ObjectId>, shift: bool) {
        match clicked {
            Some(obj) if shift => {
                self.toggle_in_selection(obj);
            }
            Some(obj) => {
                if !self.is_selected(obj) && !self.select_only(obj) {
                    self.clear_selection();
                }
            }
            None if shift => {}
            None => self.clear_selection(),
        }
    }

    /// Objects that follow the pointer: the selection plus the clicked object,
    /// minus anything locked or pinned by `locknodes`/`lockedges`.
    fn grab(&self, clicked: ObjectId, pos: Vec2) -> Vec<Grab> {
        let pinned = match clicked {
            ObjectId::Node(_) => self.config.locknodes,
            ObjectId::Link(_) => self.config.lockedges,
        };
        if pinned {
            return Vec::new();
        }
        let mut objs = self.selection.clone();
        if !objs.contains(&clicked) {
            objs.push(clicked);
        }
        objs.into_iter()
            .filter(|o| !self.graph.is_locked(*o))
            .filter_map(|o| match o {
                ObjectId::Node(id) => {
                    let n = self.graph.node(id)?;
                    Some(Grab::Node { id, offset: n.pos - pos })
                }
                ObjectId::Link(id) => match self.graph.link(id)? {
                    Link::SelfLoop { node, anchor_angle, .. } => {
                        let c = self.graph.node(*node)?.pos;
                        Some(Grab::Link { id, angle_offset: anchor_angle - (pos - c).angle() })
                    }
                    Link::Regular { .. } => Some(Grab::Link { id, angle_offset: 0.0 }),
                    Link::Start { .. } => None,
                },
            })
            .collect()
    }

    fn create_node(&mut self, pos: Vec2) {
        if !self.allows(EditKind::AddVertex) || !in_coord_bounds(pos.x) || !in_coord_bounds(pos.y) {
            return;
        }
        let mut node = Node::at(pos);
        node.color = self.config.default_vertex_color();
        if self.graph.graph_type.is_petri() {
            node.petri_kind = Some(self.draw_petri_kind);
        }
        let id = self.graph.add_node(node);
        if self.graph.graph_type.is_fsm() && self.graph.node_count() == 1 {
            self.graph.set_initial(id, true);
        }
        log::debug!("node {} created at ({:.1},{:.1})", id, pos.x, pos.y);
        self.selection = vec![ObjectId::Node(id)];
        self.saved_selection = self.selection.clone();
        self.record_change();
    }

    fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
        let mode = self.effective_mode();
        match self.gesture {
            Gesture::PendingLink { origin, .. } => {
                let p = self.provisional_toward(origin, pos);
                if let Gesture::PendingLink { provisional, .. } = &mut self.gesture {
                    *provisional = p;
                }
            }
            // Temporary draw cancels the rubber band.
            Gesture::RectangleSelecting { start, .. } => {
                self.gesture = if mode == Mode::Draw {
                    Gesture::Idle
                } else {
                    Gesture::RectangleSelecting { start, current: pos }
                };
            }
            Gesture::Dragging { .. } if mode == Mode::Select => self.drag_to(pos),
            _ => {}
        }
    }

    fn provisional_toward(&self, origin: NodeId, pos: Vec2) -> Option<ProvisionalLink> {
        if !self.allows(EditKind::AddEdge) {
            return None;
        }
        let target = match self.graph.object_at(pos, true) {
            Some(ObjectId::Node(id)) => Some(id),
            _ => None,
        };
        match target {
            Some(t) if t == origin => {
                if !self.graph.graph_type.allows_self_loops() {
                    return None;
                }
                let c = self.graph.node(origin)?.pos;
                Some(ProvisionalLink::SelfLoop { node: origin, anchor_angle: self_loop_anchor(c, pos, 0.0) })
            }
            Some(to) => {
                let perpendicular = self.graph.fan_out_offset(origin, to).unwrap_or(0.0);
                Some(ProvisionalLink::Regular { from: origin, to, bend: Bend { perpendicular, ..Bend::default() } })
            }
            None if self.graph.object_at(pos, false).is_none() => {
                Some(ProvisionalLink::Dangling { from: origin, to: pos })
            }
            // Over a link: nothing to show.
            None => None,
        }
    }

    fn drag_to(&mut self, pos: Vec2) {
        if !self.allows(EditKind::Move) {
            return;
        }
        let (clicked, mut items, moved) = match std::mem::take(&mut self.gesture) {
            Gesture::Dragging { clicked, items, moved } => (clicked, items, moved),
            other => {
                self.gesture = other;
                return;
            }
        };
        let changed = match clicked {
            ObjectId::Node(_) => self.move_nodes(&items, pos),
            // Only the clicked link follows; once it bends it is dragged alone.
            ObjectId::Link(clicked_id) => {
                let grab = items.iter().copied().find(|g| matches!(g, Grab::Link { id, .. } if *id == clicked_id));
                match grab {
                    Some(Grab::Link { id, angle_offset }) => {
                        let before = self.graph.link(id).cloned();
                        if !self.move_link(id, angle_offset, pos) {
                            items.retain(|g| *g == Grab::Link { id, angle_offset });
                        }
                        self.graph.link(id) != before.as_ref()
                    }
                    _ => false,
                }
            }
        };
        self.refresh_markers();
        self.gesture = Gesture::Dragging { clicked, items, moved: moved || changed };
    }

    fn move_nodes(&mut self, items: &[Grab], pos: Vec2) -> bool {
        let dragged: Vec<NodeId> = items
            .iter()
            .filter_map(|g| match g {
                Grab::Node { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        let positions: Vec<Vec2> = dragged.iter().filter_map(|id| self.graph.node(*id).map(|n| n.pos)).collect();
        let same_x = positions.windows(2).all(|w| w[0].x == w[1].x);
        let same_y = positions.windows(2).all(|w| w[0].y == w[1].y);
        let others: Vec<Vec2> = self
            .graph
            .nodes()
            .filter(|(id, _)| !dragged.contains(id))
            .map(|(_, n)| n.pos)
            .collect();
        let tol_x = if same_x { SNAP_TO_PADDING } else { 0.0 };
        let tol_y = if same_y { SNAP_TO_PADDING } else { 0.0 };
        let mut changed = false;
        for g in items {
            if let Grab::Node { id, offset } = *g {
                let mut p = pos + offset;
                snap(&mut p, others.iter().copied(), tol_x, tol_y);
                if in_coord_bounds(p.x) && in_coord_bounds(p.y) {
                    changed |= self.graph.move_node(id, p);
                }
            }
        }
        changed
    }

    /// Moves a link's bend or loop anchor to the pointer; true when a regular
    /// link snapped straight.
    fn move_link(&mut self, id: LinkId, angle_offset: f64, pos: Vec2) -> bool {
        let Some(link) = self.graph.link(id) else {
            return false;
        };
        match *link {
            Link::Regular { from, to, bend, .. } => {
                let (Some(a), Some(b)) = (self.graph.node(from), self.graph.node(to)) else {
                    return false;
                };
                let (new_bend, snapped) = drag_bend(a.pos, b.pos, &bend, pos);
                if new_bend != bend {
                    if let Some(Link::Regular { bend, .. }) = self.graph.link_mut(id) {
                        *bend = new_bend;
                    }
                }
                snapped
            }
            Link::SelfLoop { node, anchor_angle, .. } => {
                let Some(c) = self.graph.node(node).map(|n| n.pos) else {
                    return false;
                };
                let angle = self_loop_anchor(c, pos, angle_offset);
                if angle != anchor_angle {
                    if let Some(Link::SelfLoop { anchor_angle, .. }) = self.graph.link_mut(id) {
                        *anchor_angle = angle;
                    }
                }
                false
            }
            Link::Start { .. } => false,
        }
    }

    /// Ends a drag gesture, recording it if anything moved.
    pub(crate) fn finish_drag(&mut self) {
        if let Gesture::Dragging { moved: true, .. } = self.gesture {
            self.gesture = Gesture::Idle;
            self.record_change();
        }
    }

    fn pointer_up(&mut self, pos: Option<Vec2>, modifiers: Modifiers) {
        if let Some(p) = pos {
            self.pointer = Some(p);
        }
        let gesture = std::mem::take(&mut self.gesture);
        if self.temp_draw && !modifiers.ctrl {
            self.end_temp_draw();
        }
        match gesture {
            Gesture::Idle => {}
            Gesture::PendingLink { origin, provisional } => {
                let provisional = match pos {
                    Some(p) => self.provisional_toward(origin, p),
                    None => provisional,
                };
                if let Some(p) = provisional.filter(|p| !p.is_dangling()) {
                    if self.allows(EditKind::AddEdge) {
                        // Rejections are queued as notices.
                        let _ = self.commit_link(p);
                    }
                }
            }
            Gesture::RectangleSelecting { start, current } => {
                let rect = Rect::new(start, pos.unwrap_or(current));
                self.select_in_rectangle(&rect, modifiers.shift);
            }
            Gesture::Dragging { clicked, moved, .. } => {
                if moved {
                    self.record_change();
                } else if !modifiers.shift && !self.select_only(clicked) {
                    self.clear_selection();
                }
            }
        }
    }

    /// Rectangle release: replace the selection, or with shift remove the
    /// contained objects when all are selected and add them otherwise.
    fn select_in_rectangle(&mut self, rect: &Rect, toggle: bool) {
        let objs = self.graph.objects_in_rectangle(rect);
        if !toggle {
            self.selection = objs;
        } else if objs.iter().all(|o| self.selection.contains(o)) {
            self.selection.retain(|o| !objs.contains(o));
        } else {
            for o in objs {
                if !self.selection.contains(&o) {
                    self.selection.push(o);
                }
            }
        }
        log::debug!("rectangle selection: {} objects", self.selection.len());
    }
}
