use graphedit::input::InputEvent;
use graphedit::{Editor, EditorConfig, GraphType, Link, Mode, Notice, ObjectId, PetriKind};
use serde_json::Value;

fn editor(t: GraphType) -> Editor {
    let mut ed = Editor::new(EditorConfig::new(t)).unwrap();
    ed.set_mode(Mode::Draw);
    ed
}

fn click(ed: &mut Editor, x: f64, y: f64) {
    ed.handle(InputEvent::down(x, y));
    ed.handle(InputEvent::up(x, y));
}

fn draw_link(ed: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    ed.handle(InputEvent::down(from.0, from.1));
    ed.handle(InputEvent::moved(to.0, to.1));
    ed.handle(InputEvent::up(to.0, to.1));
}

fn saved(ed: &mut Editor) -> Value {
    serde_json::from_str(ed.save_now()).unwrap()
}

#[test]
fn undirected_link_with_undo_and_redo() {
    let mut ed = editor(GraphType::Undirected);
    click(&mut ed, 10.0, 10.0);
    click(&mut ed, 50.0, 50.0);
    assert_eq!(ed.graph().node_count(), 2);

    draw_link(&mut ed, (10.0, 10.0), (50.0, 50.0));
    assert_eq!(ed.graph().edge_count(), 1);
    assert_eq!(ed.selection(), &[ObjectId::Link(0)]);

    let v = saved(&mut ed);
    assert_eq!(v["_version"], 1);
    assert_eq!(v["vertices"].as_array().unwrap().len(), 2);
    assert_eq!(v["vertices"][0]["position"], serde_json::json!([10.0, 10.0]));
    assert_eq!(v["edges"].as_array().unwrap().len(), 1);
    assert_eq!(v["edges"][0]["from"], 0);
    assert_eq!(v["edges"][0]["to"], 1);

    let linked = ed.save_now().to_owned();
    assert!(ed.undo());
    assert_eq!(ed.graph().edge_count(), 0);
    assert_eq!(saved(&mut ed)["edges"].as_array().unwrap().len(), 0);
    assert!(ed.redo());
    assert_eq!(ed.save_now(), linked);
    assert!(!ed.can_redo());
}

#[test]
fn undirected_graphs_refuse_self_loops_and_reverse_duplicates() {
    let mut ed = editor(GraphType::Undirected);
    click(&mut ed, 100.0, 100.0);
    click(&mut ed, 300.0, 100.0);
    draw_link(&mut ed, (100.0, 100.0), (110.0, 100.0));
    assert_eq!(ed.graph().edge_count(), 0);

    draw_link(&mut ed, (100.0, 100.0), (300.0, 100.0));
    draw_link(&mut ed, (300.0, 100.0), (100.0, 100.0));
    assert_eq!(ed.graph().edge_count(), 1);
    let notices = ed.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message(), "Two edges between two nodes is not permitted.");
}

#[test]
fn directed_parallel_links_fan_out() {
    let mut ed = editor(GraphType::Directed);
    click(&mut ed, 100.0, 100.0);
    click(&mut ed, 300.0, 100.0);
    draw_link(&mut ed, (100.0, 100.0), (300.0, 100.0));
    draw_link(&mut ed, (300.0, 100.0), (100.0, 100.0));
    assert_eq!(ed.graph().edge_count(), 2);
    let (_, back) = ed.graph().links().nth(1).unwrap();
    assert!(matches!(back, Link::Regular { bend, .. } if bend.perpendicular > 0.0));
    assert!(ed.link_has_arrow());
}

#[test]
fn fsm_initial_state_survives_a_round_trip() {
    let mut ed = editor(GraphType::Fsm);
    click(&mut ed, 200.0, 200.0);
    let a = 0;
    assert!(ed.graph().node(a).unwrap().initial);

    // With nothing attached the marker sits to the upper left.
    let (_, marker) = ed.graph().links().find(|(_, l)| l.is_start()).unwrap();
    let Link::Start { offset, .. } = *marker else { unreachable!() };
    assert!(offset.x < 0.0 && offset.y < 0.0);

    let text = ed.save_now().to_owned();
    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["vertices"][0]["initial"], true);
    assert!(v["edges"].as_array().unwrap().is_empty());

    let mut back = Editor::new(EditorConfig::new(GraphType::Fsm)).unwrap();
    back.load_from_text(&text).unwrap();
    assert!(back.graph().node(0).unwrap().initial);
    assert_eq!(back.graph().links().filter(|(_, l)| l.is_start()).count(), 1);
    assert_eq!(back.graph().edge_count(), 0);
}

#[test]
fn fsm_final_states_and_self_loops() {
    let mut ed = editor(GraphType::Fsm);
    click(&mut ed, 200.0, 200.0);
    ed.set_final(0, true).unwrap();
    draw_link(&mut ed, (200.0, 200.0), (210.0, 170.0));
    assert!(ed.graph().links().any(|(_, l)| matches!(l, Link::SelfLoop { .. })));
    let v = saved(&mut ed);
    assert_eq!(v["vertices"][0]["final"], true);
    assert_eq!(v["edges"][0]["from"], v["edges"][0]["to"]);
}

#[test]
fn petri_place_to_place_is_aborted_with_a_notice() {
    let mut ed = editor(GraphType::Petri);
    click(&mut ed, 100.0, 100.0);
    click(&mut ed, 300.0, 100.0);
    let before = ed.history().len();

    draw_link(&mut ed, (100.0, 100.0), (300.0, 100.0));
    assert_eq!(ed.graph().edge_count(), 0);
    assert_eq!(ed.history().len(), before);
    let notices = ed.take_notices();
    assert!(matches!(notices.as_slice(), [Notice::Violation(m)] if m.contains("place")));

    ed.set_draw_petri_kind(PetriKind::Transition);
    click(&mut ed, 200.0, 300.0);
    assert!(ed.graph().node(2).unwrap().is_transition());
    draw_link(&mut ed, (100.0, 100.0), (200.0, 300.0));
    assert_eq!(ed.graph().edge_count(), 1);
    assert!(ed.take_notices().is_empty());

    let linked = ed.save_now().to_owned();
    assert!(ed.undo());
    assert_eq!(ed.graph().edge_count(), 0);
    assert!(ed.redo());
    assert_eq!(ed.save_now(), linked);
}

#[test]
fn dragging_the_initial_state_keeps_its_marker() {
    let mut ed = editor(GraphType::Fsm);
    click(&mut ed, 200.0, 200.0);
    ed.set_mode(Mode::Select);
    let marker = |ed: &Editor| ed.graph().links().find(|(_, l)| l.is_start()).map(|(id, _)| id);
    let before = marker(&ed);
    assert!(before.is_some());

    ed.handle(InputEvent::down(200.0, 200.0));
    for i in 1..=200 {
        ed.handle(InputEvent::moved(200.0 + i as f64, 200.0 + (i % 7) as f64));
    }
    ed.handle(InputEvent::up(400.0, 200.0 + (200 % 7) as f64));
    assert_eq!(marker(&ed), before);
    assert_eq!(ed.graph().link_count(), 1);
    assert_eq!(ed.graph().node(0).unwrap().pos.x, 400.0);

    let moved = ed.save_now().to_owned();
    assert!(ed.undo());
    assert_eq!(ed.graph().node(0).unwrap().pos.x, 200.0);
    assert!(ed.redo());
    assert_eq!(ed.save_now(), moved);
}

#[test]
fn release_over_a_node_commits_without_a_move() {
    let mut ed = editor(GraphType::Directed);
    click(&mut ed, 100.0, 100.0);
    click(&mut ed, 300.0, 100.0);
    ed.handle(InputEvent::down(100.0, 100.0));
    ed.handle(InputEvent::up(300.0, 100.0));
    assert_eq!(ed.graph().edge_count(), 1);
    let (_, link) = ed.graph().links().next().unwrap();
    assert!(matches!(*link, Link::Regular { from: 0, to: 1, .. }));
}
