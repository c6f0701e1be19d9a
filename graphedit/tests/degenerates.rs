use graphedit::geometry::math::{circle_through_three_points, is_rect_contained};
use graphedit::geometry::shapes::{point_on_link, regular_link_geometry};
use graphedit::geometry::tolerance::HIT_TARGET_PADDING;
use graphedit::{Bend, Graph, GraphType, Link, LinkGeometry, Node, ObjectId, PetriKind, Rect, Vec2};

#[test]
fn collinear_bend_falls_back_to_a_straight_line() {
    // Coincident nodes: no circle through the three points.
    let a = Node::at(Vec2::new(10.0, 10.0));
    let b = Node::at(Vec2::new(10.0, 10.0));
    let bend = Bend { perpendicular: 20.0, ..Bend::default() };
    let geom = regular_link_geometry(&a, &b, &bend, 26.0);
    assert!(matches!(geom, LinkGeometry::Straight { .. }));
    assert!(circle_through_three_points(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0)).is_none());
}

#[test]
fn node_wins_over_link_at_the_same_point() {
    let mut g = Graph::new(GraphType::Directed);
    let a = g.add_node(Node::at(Vec2::new(0.0, 0.0)));
    let b = g.add_node(Node::at(Vec2::new(200.0, 0.0)));
    let c = g.add_node(Node::at(Vec2::new(100.0, 10.0)));
    g.add_link(Link::regular(a, b)).unwrap();
    let p = Vec2::new(100.0, 0.0);
    assert_eq!(g.links_at(p).len(), 1);
    assert_eq!(g.nodes_at(p, true), vec![c]);
    assert_eq!(g.object_at(p, true), Some(ObjectId::Node(c)));
    // Away from the node the link is found.
    assert_eq!(g.object_at(Vec2::new(40.0, 2.0), true), Some(ObjectId::Link(0)));
}

#[test]
fn rectangle_excludes_locked_and_partial_objects() {
    let mut g = Graph::new(GraphType::Fsm);
    let a = g.add_node(Node::at(Vec2::new(50.0, 50.0)));
    let locked = g.add_node(Node { locked: true, ..Node::at(Vec2::new(120.0, 50.0)) });
    let outside = g.add_node(Node::at(Vec2::new(400.0, 50.0)));
    g.add_link(Link::regular(a, locked)).unwrap();
    g.add_link(Link::regular(a, outside)).unwrap();
    g.set_initial(a, true);

    let rect = Rect::new(Vec2::new(200.0, 0.0), Vec2::new(0.0, 100.0));
    let objs = g.objects_in_rectangle(&rect);
    assert!(objs.contains(&ObjectId::Node(a)));
    assert!(!objs.contains(&ObjectId::Node(locked)));
    assert!(!objs.contains(&ObjectId::Node(outside)));
    assert!(objs.contains(&ObjectId::Link(0)));
    assert!(!objs.contains(&ObjectId::Link(1)));
    // Initial markers never take part.
    assert_eq!(objs.len(), 2);
}

#[test]
fn bent_link_needs_the_whole_arc_inside() {
    let mut g = Graph::new(GraphType::Directed);
    let a = g.add_node(Node::at(Vec2::new(100.0, 100.0)));
    let b = g.add_node(Node::at(Vec2::new(200.0, 100.0)));
    let mut l = Link::regular(a, b);
    if let Link::Regular { bend, .. } = &mut l {
        bend.perpendicular = 60.0;
    }
    g.add_link(l).unwrap();
    // Endpoints fit, the bulge does not.
    let tight = Rect::new(Vec2::new(60.0, 60.0), Vec2::new(240.0, 140.0));
    assert!(!g.objects_in_rectangle(&tight).contains(&ObjectId::Link(0)));
    let loose = Rect::new(Vec2::new(60.0, 0.0), Vec2::new(240.0, 240.0));
    assert!(g.objects_in_rectangle(&loose).contains(&ObjectId::Link(0)));
}

#[test]
fn rect_containment_ignores_corner_order() {
    let outer = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0));
    let inner = Rect::new(Vec2::new(9.0, 1.0), Vec2::new(1.0, 9.0));
    assert!(is_rect_contained(&outer, &inner));
    assert!(!is_rect_contained(&inner, &outer));
}

#[test]
fn arc_hit_test_follows_the_curve() {
    let a = Node::at(Vec2::new(0.0, 0.0));
    let b = Node::at(Vec2::new(100.0, 0.0));
    let bend = Bend { perpendicular: 30.0, ..Bend::default() };
    let geom = regular_link_geometry(&a, &b, &bend, 20.0);
    let LinkGeometry::Arc { circle, .. } = geom else {
        panic!("expected an arc");
    };
    // Apex of the arc lies 30px off the chord, on the anchor side.
    let apex = Vec2::new(50.0, 30.0);
    assert!((apex.dist(circle.center) - circle.radius).abs() < 1e-6);
    assert!(point_on_link(apex, &geom, HIT_TARGET_PADDING));
    assert!(!point_on_link(Vec2::new(50.0, 0.0), &geom, HIT_TARGET_PADDING));
}

#[test]
fn transition_hit_region_is_square() {
    let mut g = Graph::new(GraphType::Petri);
    let t = g.add_node(Node { petri_kind: Some(PetriKind::Transition), ..Node::at(Vec2::new(0.0, 0.0)) });
    // Corner of the square is outside the circle of the same radius.
    assert_eq!(g.nodes_at(Vec2::new(24.0, 24.0), false), vec![t]);
    g.add_node(Node { petri_kind: Some(PetriKind::Place), ..Node::at(Vec2::new(200.0, 0.0)) });
    assert!(g.nodes_at(Vec2::new(224.0, 24.0), false).is_empty());
}
