use graphedit::geometry::limits::{MAX_LABEL_LEN, MAX_NODES, MAX_TOKENS};
use graphedit::{Graph, GraphType, LoadError, SaveOptions};
use serde_json::json;

#[test]
fn json_caps_exceeded_nodes() {
    let mut g = Graph::new(GraphType::Undirected);
    let vertices: Vec<_> = (0..MAX_NODES + 1)
        .map(|_| json!({"label": "", "position": [0.0, 0.0], "locked": false}))
        .collect();
    let v = json!({"_version": 1, "vertices": vertices, "edges": []});
    let err = g.from_json_value(v, &SaveOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::TooLarge { what: "vertices", .. }));
    assert_eq!(err.code(), "caps_exceeded");
    assert_eq!(g.node_count(), 0);
}

#[test]
fn json_out_of_range_position() {
    let mut g = Graph::new(GraphType::Undirected);
    let v = json!({"_version": 1, "vertices": [{"label": "", "position": [1.0e38, 0.0]}], "edges": []});
    let err = g.from_json_value(v, &SaveOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::OutOfBounds { index: 0 }));
}

#[test]
fn json_overlong_label() {
    let mut g = Graph::new(GraphType::Undirected);
    let label = "x".repeat(MAX_LABEL_LEN + 1);
    let v = json!({"_version": 1, "vertices": [{"label": label, "position": [0, 0]}], "edges": []});
    assert!(g.from_json_value(v, &SaveOptions::default()).is_err());
}

#[test]
fn tokens_are_clamped() {
    let mut g = Graph::new(GraphType::Petri);
    let v = json!({"_version": 1, "vertices": [
        {"label": "", "position": [0, 0], "petri_type": "place", "tokens": -4},
        {"label": "", "position": [90, 0], "petri_type": "place", "tokens": 1u64 << 40}
    ], "edges": []});
    g.from_json_value(v, &SaveOptions::default()).unwrap();
    assert_eq!(g.node(0).unwrap().tokens, 0);
    assert_eq!(g.node(1).unwrap().tokens, MAX_TOKENS);
}

#[test]
fn fractional_tokens_are_rounded() {
    let mut g = Graph::new(GraphType::Petri);
    let v = json!({"_version": 1, "vertices": [
        {"label": "", "position": [0, 0], "petri_type": "place", "tokens": 2.0},
        {"label": "", "position": [90, 0], "petri_type": "place", "tokens": 2.6},
        {"label": "", "position": [180, 0], "petri_type": "place", "tokens": -1.5}
    ], "edges": []});
    g.from_json_value(v, &SaveOptions::default()).unwrap();
    let tokens: Vec<u32> = g.nodes().map(|(_, n)| n.tokens).collect();
    assert_eq!(tokens, vec![2, 3, 0]);
}

#[test]
fn wrong_field_types_fail_cleanly() {
    let mut g = Graph::new(GraphType::Directed);
    let v = json!({"_version": 1, "vertices": [{"label": 7, "position": [0, 0]}], "edges": []});
    let err = g.from_json_value(v, &SaveOptions::default()).unwrap_err();
    assert_eq!(err.code(), "json_parse");
}
