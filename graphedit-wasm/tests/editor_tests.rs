use graphedit_wasm::GraphEditor;
use js_sys::{Array, Float64Array, Reflect, Uint8Array};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn click(ed: &mut GraphEditor, x: f64, y: f64) {
    ed.pointer_down(x, y, 0, false, false);
    ed.pointer_up(x, y, false, false);
}

#[wasm_bindgen_test]
fn draw_link_through_pointer_events() {
    let mut ed = GraphEditor::new(r#"{"type": "undirected"}"#, "").unwrap();
    assert!(ed.set_mode("draw"));
    click(&mut ed, 10.0, 10.0);
    click(&mut ed, 50.0, 50.0);
    ed.pointer_down(10.0, 10.0, 0, false, false);
    ed.pointer_move(50.0, 50.0, false, false);
    assert!(!get(&ed.overlay(), "provisional").is_null());
    ed.pointer_up(50.0, 50.0, false, false);
    assert_eq!(ed.node_count(), 2);
    assert_eq!(ed.edge_count(), 1);

    let saved: serde_json::Value = serde_json::from_str(&ed.save()).unwrap();
    assert_eq!(saved["edges"][0]["from"], 0);
    assert_eq!(saved["edges"][0]["to"], 1);

    assert!(ed.undo());
    assert_eq!(ed.edge_count(), 0);
    assert!(ed.redo());
    assert_eq!(ed.edge_count(), 1);
}

#[wasm_bindgen_test]
fn node_data_is_typed() {
    let text = r#"{"_version":1,"vertices":[
        {"label":"a","position":[10,20],"locked":true},
        {"label":"b","position":[90,20],"locked":false}],"edges":[]}"#;
    let ed = GraphEditor::new("{}", text).unwrap();
    assert!(!ed.failed());
    let data = ed.get_node_data();
    let pos: Float64Array = get(&data, "positions").into();
    assert_eq!(pos.to_vec(), vec![10.0, 20.0, 90.0, 20.0]);
    let flags: Uint8Array = get(&data, "flags").into();
    assert_eq!(flags.to_vec()[0] & 2, 2);
    assert_eq!(flags.to_vec()[1] & 2, 0);

    let nodes: Array = ed.get_nodes().into();
    assert_eq!(nodes.length(), 2);
    assert_eq!(get(&nodes.get(0), "label").as_string().as_deref(), Some("a"));
}

#[wasm_bindgen_test]
fn fsm_links_include_the_initial_marker() {
    let mut ed = GraphEditor::new(r#"{"type": "fsm"}"#, "").unwrap();
    ed.set_mode("draw");
    click(&mut ed, 100.0, 100.0);
    let links: Array = ed.get_links().into();
    assert_eq!(links.length(), 1);
    let marker = links.get(0);
    assert_eq!(get(&marker, "kind").as_string().as_deref(), Some("start"));
    assert_eq!(get(&get(&marker, "geometry"), "kind").as_string().as_deref(), Some("straight"));
    assert_eq!(ed.edge_count(), 0);
}

#[wasm_bindgen_test]
fn js_policy_gates_edits() {
    let mut ed = GraphEditor::new(r#"{"type": "directed"}"#, "").unwrap();
    let deny_vertices = js_sys::Function::new_with_args("kind", "return kind !== 'add_vertex';");
    ed.set_policy(deny_vertices);
    assert!(!ed.allows("add_vertex"));
    assert!(ed.allows("add_edge"));
    ed.set_mode("draw");
    click(&mut ed, 100.0, 100.0);
    assert_eq!(ed.node_count(), 0);

    // A throwing callback denies.
    ed.set_policy(js_sys::Function::new_no_args("throw new Error('boom');"));
    assert!(!ed.allows("move"));

    ed.clear_policy();
    click(&mut ed, 100.0, 100.0);
    assert_eq!(ed.node_count(), 1);
}

#[wasm_bindgen_test]
fn serialized_events_are_accepted() {
    let mut ed = GraphEditor::new("", "").unwrap();
    ed.set_mode("draw");
    let ev: JsValue = js_sys::JSON::parse(r#"{"kind":"pointer_down","pos":{"x":40,"y":40}}"#).unwrap();
    assert!(ed.handle_event(ev));
    let up: JsValue = js_sys::JSON::parse(r#"{"kind":"pointer_up","pos":{"x":40,"y":40}}"#).unwrap();
    assert!(ed.handle_event(up));
    assert_eq!(ed.node_count(), 1);
    let sel: Array = ed.selection().into();
    assert_eq!(get(&sel.get(0), "type").as_string().as_deref(), Some("node"));

    ed.key_down("Delete", false, false);
    assert_eq!(ed.node_count(), 0);
}
