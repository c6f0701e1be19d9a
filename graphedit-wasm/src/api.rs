use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, new_obj, parse_name, set_kv, to_js};
use crate::policy::JsPolicy;
use crate::GraphEditor;
use graphedit::{
    Button, Color, EditError, InputEvent, Key, Link, LinkGeometry, Mode, Modifiers, NodeId, ObjectId, PetriKind,
    Vec2,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes core log records to the browser console. `level` is one of
/// "error", "warn", "info", "debug", "trace"; anything else means "warn".
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let lvl = match level {
        "error" => log::Level::Error,
        "info" => log::Level::Info,
        "debug" => log::Level::Debug,
        "trace" => log::Level::Trace,
        _ => log::Level::Warn,
    };
    if let Err(e) = console_log::init_with_level(lvl) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("graphedit logging not installed: {}", e)));
    }
}

// Bits of `flags` in get_node_data.
const FLAG_SELECTED: u8 = 1;
const FLAG_LOCKED: u8 = 1 << 1;
const FLAG_HIGHLIGHTED: u8 = 1 << 2;
const FLAG_INITIAL: u8 = 1 << 3;
const FLAG_FINAL: u8 = 1 << 4;
const FLAG_TRANSITION: u8 = 1 << 5;

#[derive(Serialize)]
struct NodeView<'a> {
    id: NodeId,
    x: f64,
    y: f64,
    label: &'a str,
    color: Option<&'static str>,
    locked: bool,
    highlighted: bool,
    selected: bool,
    initial: bool,
    #[serde(rename = "final")]
    is_final: bool,
    petri_type: Option<PetriKind>,
    tokens: u32,
}

#[derive(Serialize)]
struct LinkView<'a> {
    id: u32,
    kind: &'static str,
    from: NodeId,
    to: NodeId,
    label: &'a str,
    color: Option<&'static str>,
    locked: bool,
    highlighted: bool,
    selected: bool,
    arrow: bool,
    geometry: Option<LinkGeometry>,
}

fn object(kind: &str, id: u32) -> Option<ObjectId> {
    match kind {
        "node" | "vertex" => Some(ObjectId::Node(id)),
        "link" | "edge" => Some(ObjectId::Link(id)),
        _ => None,
    }
}

fn parse_color(name: &str) -> Option<Color> {
    parse_name::<Color>(name).or_else(|| Color::from_code(name))
}

fn modifiers(shift: bool, ctrl: bool) -> Modifiers {
    Modifiers { shift, ctrl }
}

fn unit_result(r: Result<(), EditError>) -> JsValue {
    match r {
        Ok(()) => error::ok(JsValue::UNDEFINED),
        Err(e) => error::edit(&e),
    }
}

#[wasm_bindgen]
impl GraphEditor {
    /// `params` is the editor parameters JSON, `text` the stored answer.
    /// An unreadable answer does not fail construction; check `failed()`.
    #[wasm_bindgen(constructor)]
    pub fn new(params: &str, text: &str) -> Result<GraphEditor, JsValue> {
        crate::GraphEditor::rs_new(params, text).map_err(|e| error::config(&e))
    }
    pub fn version(&self) -> u64 {
        self.rs_version()
    }
    pub fn graph_type(&self) -> JsValue {
        to_js(&self.inner.graph().graph_type())
    }
    pub fn node_radius(&self) -> f64 {
        self.inner.graph().node_radius()
    }
    pub fn link_has_arrow(&self) -> bool {
        self.inner.link_has_arrow()
    }

    // Input
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::PointerDown {
            pos: Vec2::new(x, y),
            button: Button::from_dom(button),
            modifiers: modifiers(shift, ctrl),
        });
    }
    pub fn pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::PointerMove { pos: Vec2::new(x, y), modifiers: modifiers(shift, ctrl) });
    }
    pub fn pointer_up(&mut self, x: f64, y: f64, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::PointerUp { pos: Vec2::new(x, y), modifiers: modifiers(shift, ctrl) });
    }
    pub fn pointer_enter(&mut self, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::PointerEnter { modifiers: modifiers(shift, ctrl) });
    }
    pub fn pointer_leave(&mut self, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::PointerLeave { modifiers: modifiers(shift, ctrl) });
    }
    /// `key` is the DOM `KeyboardEvent.key` value.
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::KeyDown { key: Key::from_dom(key), modifiers: modifiers(shift, ctrl) });
    }
    pub fn key_up(&mut self, key: &str, shift: bool, ctrl: bool) {
        self.inner.handle(InputEvent::KeyUp { key: Key::from_dom(key), modifiers: modifiers(shift, ctrl) });
    }
    pub fn focus_lost(&mut self) {
        self.inner.handle(InputEvent::FocusLost);
    }
    /// Event in its serialised form, e.g. `{kind: "pointer_down", pos: {x, y}}`.
    pub fn handle_event(&mut self, ev: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<InputEvent>(ev) {
            Ok(e) => {
                self.inner.handle(e);
                true
            }
            Err(_) => false,
        }
    }
    pub fn handle_event_res(&mut self, ev: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<InputEvent>(ev) {
            Ok(e) => {
                self.inner.handle(e);
                error::ok(JsValue::UNDEFINED)
            }
            Err(e) => error::err("invalid_event", format!("{}", e), None),
        }
    }

    // Modes
    pub fn mode(&self) -> JsValue {
        to_js(&self.inner.mode())
    }
    /// Mode in force, counting a held ctrl key as Draw.
    pub fn effective_mode(&self) -> JsValue {
        to_js(&self.inner.effective_mode())
    }
    pub fn set_mode(&mut self, mode: &str) -> bool {
        match parse_name::<Mode>(mode) {
            Some(m) => {
                self.inner.set_mode(m);
                true
            }
            None => false,
        }
    }
    pub fn set_mode_res(&mut self, mode: &str) -> JsValue {
        match parse_name::<Mode>(mode) {
            Some(m) => {
                self.inner.set_mode(m);
                error::ok(JsValue::UNDEFINED)
            }
            None => error::invalid_value("mode", mode),
        }
    }
    pub fn set_draw_petri_kind(&mut self, kind: &str) -> bool {
        match parse_name::<PetriKind>(kind) {
            Some(k) => {
                self.inner.set_draw_petri_kind(k);
                true
            }
            None => false,
        }
    }

    // Policy
    /// Replaces the parameter-derived policy with `callback(kind) -> bool`.
    /// A read-only editor stays read-only.
    pub fn set_policy(&mut self, callback: js_sys::Function) {
        self.inner.set_policy(JsPolicy { callback });
    }
    pub fn clear_policy(&mut self) {
        let p = self.inner.config().policy();
        self.inner.set_policy(p);
    }
    pub fn allows(&self, kind: &str) -> bool {
        graphedit::EditKind::parse(kind).map_or(false, |k| self.inner.allows(k))
    }

    // History
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // Persistence
    pub fn save(&mut self) -> String {
        self.inner.save_now().to_owned()
    }
    pub fn text(&self) -> String {
        self.inner.text().to_owned()
    }
    pub fn load(&mut self, text: &str) -> bool {
        self.inner.load_from_text(text).is_ok()
    }
    pub fn load_res(&mut self, text: &str) -> JsValue {
        match self.inner.load_from_text(text) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.graph().node_count() as f64)),
            Err(e) => error::load(&e),
        }
    }
    pub fn failed(&self) -> bool {
        self.inner.failed()
    }
    pub fn fail_message(&self) -> Option<String> {
        self.inner.fail_message().map(str::to_owned)
    }

    // Render data
    pub fn node_count(&self) -> u32 {
        self.inner.graph().node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.graph().edge_count() as u32
    }
    pub fn get_nodes(&self) -> JsValue {
        let views: Vec<NodeView> = self
            .inner
            .graph()
            .nodes()
            .map(|(id, n)| NodeView {
                id,
                x: n.pos.x,
                y: n.pos.y,
                label: &n.label,
                color: n.color.map(Color::code),
                locked: n.locked,
                highlighted: n.highlighted,
                selected: self.inner.is_selected(ObjectId::Node(id)),
                initial: n.initial,
                is_final: n.is_final,
                petri_type: n.petri_kind,
                tokens: n.tokens,
            })
            .collect();
        to_js(&views)
    }
    /// Every link with its drawable geometry, initial markers included.
    pub fn get_links(&self) -> JsValue {
        let g = self.inner.graph();
        let arrow = self.inner.link_has_arrow();
        let views: Vec<LinkView> = g
            .links()
            .map(|(id, l)| {
                let (from, to) = l.endpoints();
                let kind = match l {
                    Link::Regular { .. } => "regular",
                    Link::SelfLoop { .. } => "self_loop",
                    Link::Start { .. } => "start",
                };
                let attrs = l.attrs();
                LinkView {
                    id,
                    kind,
                    from,
                    to,
                    label: &attrs.label,
                    color: attrs.color.map(Color::code),
                    locked: attrs.locked,
                    highlighted: attrs.highlighted,
                    selected: self.inner.is_selected(ObjectId::Link(id)),
                    arrow: arrow || l.is_start(),
                    geometry: g.geometry_of(l),
                }
            })
            .collect();
        to_js(&views)
    }
    /// Typed-array node data: `ids`, interleaved `positions` and per-node `flags`.
    pub fn get_node_data(&self) -> JsValue {
        let g = self.inner.graph();
        let mut ids = Vec::with_capacity(g.node_count());
        let mut pos = Vec::with_capacity(g.node_count() * 2);
        let mut flags = Vec::with_capacity(g.node_count());
        let mut tokens = Vec::with_capacity(g.node_count());
        for (id, n) in g.nodes() {
            ids.push(id);
            pos.push(n.pos.x);
            pos.push(n.pos.y);
            let mut f = 0u8;
            if self.inner.is_selected(ObjectId::Node(id)) { f |= FLAG_SELECTED; }
            if n.locked { f |= FLAG_LOCKED; }
            if n.highlighted { f |= FLAG_HIGHLIGHTED; }
            if n.initial { f |= FLAG_INITIAL; }
            if n.is_final { f |= FLAG_FINAL; }
            if n.is_transition() { f |= FLAG_TRANSITION; }
            flags.push(f);
            tokens.push(n.tokens);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        set_kv(&obj, "flags", &arr_u8(&flags).into());
        set_kv(&obj, "tokens", &arr_u32(&tokens).into());
        obj.into()
    }
    /// Rubber-band rectangle and provisional link, either may be null.
    pub fn overlay(&self) -> JsValue {
        to_js(&self.inner.overlay())
    }
    pub fn pointer(&self) -> JsValue {
        to_js(&self.inner.pointer())
    }
    pub fn object_at(&self, x: f64, y: f64) -> JsValue {
        to_js(&self.inner.graph().object_at(Vec2::new(x, y), true))
    }

    // Selection
    pub fn selection(&self) -> JsValue {
        to_js(self.inner.selection())
    }
    pub fn select_res(&mut self, kind: &str, id: u32) -> JsValue {
        let Some(obj) = object(kind, id) else {
            return error::invalid_value("kind", kind);
        };
        if !self.inner.graph().contains(obj) {
            return error::invalid_id(kind, id);
        }
        if !self.inner.select_only(obj) {
            return error::edit(&EditError::Locked);
        }
        error::ok(JsValue::UNDEFINED)
    }
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }
    pub fn delete_selection_res(&mut self) -> JsValue {
        match self.inner.delete_selection() {
            Ok(removed) => {
                let o = new_obj();
                set_kv(&o, "nodes", &arr_u32(&removed.nodes).into());
                set_kv(&o, "links", &arr_u32(&removed.links).into());
                error::ok(o.into())
            }
            Err(e) => error::edit(&e),
        }
    }
    pub fn take_notices(&mut self) -> JsValue {
        to_js(&self.inner.take_notices())
    }

    // Toolbar
    pub fn label_is_valid(&self, kind: &str, id: u32, label: &str) -> bool {
        object(kind, id).map_or(false, |o| self.inner.label_is_valid(o, label))
    }
    pub fn set_label_res(&mut self, kind: &str, id: u32, label: &str) -> JsValue {
        match object(kind, id) {
            Some(o) => unit_result(self.inner.set_label(o, label)),
            None => error::invalid_value("kind", kind),
        }
    }
    /// `color` is a palette name or its hex code; undefined clears it.
    pub fn set_color_res(&mut self, kind: &str, id: u32, color: Option<String>) -> JsValue {
        let Some(o) = object(kind, id) else {
            return error::invalid_value("kind", kind);
        };
        let c = match color.as_deref() {
            None => None,
            Some(name) => match parse_color(name) {
                Some(c) => Some(c),
                None => return error::invalid_value("color", name),
            },
        };
        unit_result(self.inner.set_color(o, c))
    }
    pub fn set_highlighted_res(&mut self, kind: &str, id: u32, on: bool) -> JsValue {
        match object(kind, id) {
            Some(o) => unit_result(self.inner.set_highlighted(o, on)),
            None => error::invalid_value("kind", kind),
        }
    }
    pub fn set_initial_res(&mut self, id: u32, initial: bool) -> JsValue {
        unit_result(self.inner.set_initial(id, initial))
    }
    pub fn set_final_res(&mut self, id: u32, is_final: bool) -> JsValue {
        unit_result(self.inner.set_final(id, is_final))
    }
    pub fn set_tokens_res(&mut self, id: u32, tokens: u32) -> JsValue {
        unit_result(self.inner.set_tokens(id, tokens))
    }
}
