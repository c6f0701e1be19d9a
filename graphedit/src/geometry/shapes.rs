// Node outlines and link geometry shared by hit testing, selection and rendering

use super::math::{arc_endpoints_and_angles, circle_through_three_points, quadratic_roots};
use super::tolerance::{
    wrap_angle, EPS_LEN, HIT_TARGET_PADDING, SELF_LOOP_CENTER_DIST, SELF_LOOP_RADIUS, SELF_LOOP_SNAP,
    SELF_LOOP_SWEEP, SNAP_TO_PADDING, TAU,
};
use crate::model::{Bend, Circle, Node, Vec2};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};

/// Point on the node outline in the direction of `toward`. Places are circles,
/// transitions are squares with half side `radius`.
pub fn closest_point_on_node(node: &Node, radius: f64, toward: Vec2) -> Vec2 {
    let d = toward - node.pos;
    if node.is_transition() {
        let m = d.x.abs().max(d.y.abs());
        if m <= EPS_LEN {
            return node.pos + Vec2::new(radius, 0.0);
        }
        node.pos + d * (radius / m)
    } else {
        let len = d.len();
        if len <= EPS_LEN {
            return node.pos + Vec2::new(radius, 0.0);
        }
        node.pos + d * (radius / len)
    }
}

/// Hit test against the node outline, optionally widened by the hit padding.
pub fn point_in_node(p: Vec2, node: &Node, radius: f64, use_padding: bool) -> bool {
    let r = if use_padding { radius + HIT_TARGET_PADDING } else { radius };
    let d = p - node.pos;
    if node.is_transition() {
        d.x.abs() <= r && d.y.abs() <= r
    } else {
        d.x * d.x + d.y * d.y <= r * r
    }
}

/// Intersections of a circle with the outline of the axis-aligned square
/// centred at `c` with half side `half`.
pub fn circle_square_intersections(c: Vec2, half: f64, circle: Circle) -> Vec<Vec2> {
    let mut out = Vec::new();
    let Circle { center: o, radius: r } = circle;
    for y in [c.y - half, c.y + half] {
        let k = (y - o.y) * (y - o.y) - r * r;
        if let Some((t0, t1)) = quadratic_roots(1.0, -2.0 * o.x, o.x * o.x + k) {
            for x in [t0, t1] {
                if c.x - half <= x && x <= c.x + half {
                    out.push(Vec2::new(x, y));
                }
            }
        }
    }
    for x in [c.x - half, c.x + half] {
        let k = (x - o.x) * (x - o.x) - r * r;
        if let Some((t0, t1)) = quadratic_roots(1.0, -2.0 * o.y, o.y * o.y + k) {
            for y in [t0, t1] {
                if c.y - half <= y && y <= c.y + half {
                    out.push(Vec2::new(x, y));
                }
            }
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LinkGeometry {
    Straight {
        start: Vec2,
        end: Vec2,
        arrow_angle: f64,
    },
    /// Drawn from `start_angle` to `end_angle`; counterclockwise on screen when `reversed`.
    Arc {
        circle: Circle,
        start_angle: f64,
        end_angle: f64,
        start: Vec2,
        end: Vec2,
        reversed: bool,
        arrow_angle: f64,
    },
}

impl LinkGeometry {
    pub fn start(&self) -> Vec2 {
        match *self {
            LinkGeometry::Straight { start, .. } | LinkGeometry::Arc { start, .. } => start,
        }
    }
    pub fn end(&self) -> Vec2 {
        match *self {
            LinkGeometry::Straight { end, .. } | LinkGeometry::Arc { end, .. } => end,
        }
    }
    pub fn arrow_angle(&self) -> f64 {
        match *self {
            LinkGeometry::Straight { arrow_angle, .. } | LinkGeometry::Arc { arrow_angle, .. } => arrow_angle,
        }
    }

    pub fn straight(start: Vec2, end: Vec2) -> Self {
        LinkGeometry::Straight { start, end, arrow_angle: (end - start).angle() }
    }

    /// Angular interval covered by the arc as (lo, hi) with hi >= lo, walking
    /// in increasing-angle direction.
    fn sweep(start_angle: f64, end_angle: f64, reversed: bool) -> (f64, f64) {
        let (mut lo, mut hi) = if reversed { (end_angle, start_angle) } else { (start_angle, end_angle) };
        lo = wrap_angle(lo);
        hi = wrap_angle(hi);
        if hi < lo {
            hi += TAU;
        }
        (lo, hi)
    }
}

/// Anchor point of a regular link bend: `parallel` along the segment and
/// `perpendicular` px to its left.
pub fn bend_anchor(a: Vec2, b: Vec2, bend: &Bend) -> Vec2 {
    let d = b - a;
    let scale = d.len().max(EPS_LEN);
    Vec2::new(
        a.x + d.x * bend.parallel - d.y * bend.perpendicular / scale,
        a.y + d.y * bend.parallel + d.x * bend.perpendicular / scale,
    )
}

/// Inverse of [`bend_anchor`]: (parallel, perpendicular) of point `p`.
pub fn bend_from_point(a: Vec2, b: Vec2, p: Vec2) -> (f64, f64) {
    let d = b - a;
    let scale = d.len().max(EPS_LEN);
    let w = p - a;
    let parallel = (d.x * w.x + d.y * w.y) / (scale * scale);
    let perpendicular = (d.x * w.y - d.y * w.x) / scale;
    (parallel, perpendicular)
}

pub fn regular_link_geometry(a: &Node, b: &Node, bend: &Bend, radius: f64) -> LinkGeometry {
    let straight = || {
        let mid = (a.pos + b.pos) * 0.5;
        LinkGeometry::straight(closest_point_on_node(a, radius, mid), closest_point_on_node(b, radius, mid))
    };
    if bend.is_straight() {
        return straight();
    }
    let anchor = bend_anchor(a.pos, b.pos, bend);
    let Some(circle) = circle_through_three_points(a.pos, b.pos, anchor) else {
        return straight();
    };
    let reversed = bend.perpendicular > 0.0;
    let reverse_scale = if reversed { 1.0 } else { -1.0 };
    let mut ends = arc_endpoints_and_angles(a.pos, b.pos, circle, reverse_scale, radius);
    if a.is_transition() {
        if let Some(p) = nearest(circle_square_intersections(a.pos, radius, circle), ends.start) {
            ends.start = p;
            ends.start_angle = (p - circle.center).angle();
        }
    }
    if b.is_transition() {
        if let Some(p) = nearest(circle_square_intersections(b.pos, radius, circle), ends.end) {
            ends.end = p;
            ends.end_angle = (p - circle.center).angle();
        }
    }
    LinkGeometry::Arc {
        circle,
        start_angle: ends.start_angle,
        end_angle: ends.end_angle,
        start: ends.start,
        end: ends.end,
        reversed,
        arrow_angle: ends.end_angle - reverse_scale * (PI / 2.0),
    }
}

fn nearest(points: Vec<Vec2>, to: Vec2) -> Option<Vec2> {
    points
        .into_iter()
        .min_by(|p, q| p.dist(to).total_cmp(&q.dist(to)))
}

pub fn self_loop_geometry(node: &Node, anchor_angle: f64, radius: f64) -> LinkGeometry {
    let circle = Circle {
        center: node.pos + Vec2::from_polar(SELF_LOOP_CENTER_DIST * radius, anchor_angle),
        radius: SELF_LOOP_RADIUS * radius,
    };
    let start_angle = anchor_angle - PI * SELF_LOOP_SWEEP;
    let end_angle = anchor_angle + PI * SELF_LOOP_SWEEP;
    LinkGeometry::Arc {
        circle,
        start_angle,
        end_angle,
        start: circle.center + Vec2::from_polar(circle.radius, start_angle),
        end: circle.center + Vec2::from_polar(circle.radius, end_angle),
        reversed: false,
        arrow_angle: end_angle + PI * 0.4,
    }
}

pub fn start_link_geometry(node: &Node, offset: Vec2, radius: f64) -> LinkGeometry {
    let start = node.pos + offset;
    let end = closest_point_on_node(node, radius, start);
    LinkGeometry::Straight { start, end, arrow_angle: (-offset.y).atan2(-offset.x) }
}

/// Hit test against a link: perpendicular distance inside the segment span for
/// straight links, ring distance plus angular span for arcs.
pub fn point_on_link(p: Vec2, geom: &LinkGeometry, tol: f64) -> bool {
    match *geom {
        LinkGeometry::Straight { start, end, .. } => {
            let d = end - start;
            let len = d.len();
            if len <= EPS_LEN {
                return p.dist(start) < tol;
            }
            let w = p - start;
            let percent = (d.x * w.x + d.y * w.y) / (len * len);
            let distance = (d.x * w.y - d.y * w.x) / len;
            percent > 0.0 && percent < 1.0 && distance.abs() < tol
        }
        LinkGeometry::Arc { circle, start_angle, end_angle, reversed, .. } => {
            let v = p - circle.center;
            if (v.len() - circle.radius).abs() >= tol {
                return false;
            }
            let (lo, hi) = LinkGeometry::sweep(start_angle, end_angle, reversed);
            let mut angle = wrap_angle(v.angle());
            if angle < lo {
                angle += TAU;
            }
            angle > lo && angle < hi
        }
    }
}

/// Points along the drawn path: both ends for straight links, `steps + 1`
/// evenly spaced points (ends included) along the arc sweep otherwise.
pub fn sample_link(geom: &LinkGeometry, steps: usize) -> Vec<Vec2> {
    match *geom {
        LinkGeometry::Straight { start, end, .. } => vec![start, end],
        LinkGeometry::Arc { circle, start_angle, end_angle, reversed, .. } => {
            let (lo, hi) = LinkGeometry::sweep(start_angle, end_angle, reversed);
            let steps = steps.max(1);
            (0..=steps)
                .map(|i| {
                    let t = lo + (hi - lo) * (i as f64 / steps as f64);
                    circle.center + Vec2::from_polar(circle.radius, t)
                })
                .collect()
        }
    }
}

/// Bend of a regular link whose anchor is dragged to `p`. Snaps straight when
/// `p` projects strictly between the endpoints within snap padding; the flag
/// reports whether it did. `lineAngleAdjust` only changes on a snap.
pub fn drag_bend(a: Vec2, b: Vec2, current: &Bend, p: Vec2) -> (Bend, bool) {
    let (parallel, perpendicular) = bend_from_point(a, b, p);
    if parallel > 0.0 && parallel < 1.0 && perpendicular.abs() < SNAP_TO_PADDING {
        let line_angle_adjust = if perpendicular < 0.0 { PI } else { 0.0 };
        return (Bend { parallel, perpendicular: 0.0, line_angle_adjust }, true);
    }
    (Bend { parallel, perpendicular, line_angle_adjust: current.line_angle_adjust }, false)
}

/// Anchor angle of a self-loop dragged to `p`, snapped to right angles and
/// kept in [-pi, pi].
pub fn self_loop_anchor(center: Vec2, p: Vec2, offset: f64) -> f64 {
    let mut a = (p - center).angle() + offset;
    let snapped = (a / FRAC_PI_2).round() * FRAC_PI_2;
    if (a - snapped).abs() < SELF_LOOP_SNAP {
        a = snapped;
    }
    if a < -PI {
        a += TAU;
    }
    if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tolerance::approx_eq;
    use crate::model::PetriKind;

    fn node(x: f64, y: f64) -> Node {
        Node::at(Vec2::new(x, y))
    }

    #[test]
    fn straight_link_meets_node_boundaries() {
        let g = regular_link_geometry(&node(0.0, 0.0), &node(100.0, 0.0), &Bend::default(), 26.0);
        match g {
            LinkGeometry::Straight { start, end, arrow_angle } => {
                assert!(approx_eq(start.x, 26.0, 1e-9));
                assert!(approx_eq(end.x, 74.0, 1e-9));
                assert!(approx_eq(arrow_angle, 0.0, 1e-12));
            }
            other => panic!("expected straight, got {:?}", other),
        }
    }

    #[test]
    fn bent_link_is_an_arc_through_the_anchor() {
        let bend = Bend { parallel: 0.5, perpendicular: 30.0, line_angle_adjust: 0.0 };
        let a = node(0.0, 0.0);
        let b = node(100.0, 0.0);
        let g = regular_link_geometry(&a, &b, &bend, 26.0);
        let LinkGeometry::Arc { circle, reversed, .. } = g else { panic!("expected arc") };
        assert!(reversed);
        let anchor = bend_anchor(a.pos, b.pos, &bend);
        assert!(approx_eq(anchor.dist(circle.center), circle.radius, 1e-6));
        assert!(point_on_link(anchor, &g, 6.0));
        // the opposite side of the circle is not part of the link
        let far = circle.center * 2.0 - anchor;
        assert!(!point_on_link(far, &g, 6.0));
    }

    #[test]
    fn bend_round_trips_through_anchor() {
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(70.0, -15.0);
        let bend = Bend { parallel: 0.3, perpendicular: -12.5, line_angle_adjust: 0.0 };
        let (par, perp) = bend_from_point(a, b, bend_anchor(a, b, &bend));
        assert!(approx_eq(par, 0.3, 1e-9));
        assert!(approx_eq(perp, -12.5, 1e-9));
    }

    #[test]
    fn transition_nodes_are_squares() {
        let mut t = node(0.0, 0.0);
        t.petri_kind = Some(PetriKind::Transition);
        assert!(point_in_node(Vec2::new(25.0, 25.0), &t, 26.0, false));
        assert!(!point_in_node(Vec2::new(25.0, 25.0), &node(0.0, 0.0), 26.0, false));
        let p = closest_point_on_node(&t, 26.0, Vec2::new(100.0, 50.0));
        assert!(approx_eq(p.x, 26.0, 1e-9));
        assert!(approx_eq(p.y, 13.0, 1e-9));
    }

    #[test]
    fn padding_widens_hit_region() {
        let n = node(0.0, 0.0);
        assert!(!point_in_node(Vec2::new(30.0, 0.0), &n, 26.0, false));
        assert!(point_in_node(Vec2::new(30.0, 0.0), &n, 26.0, true));
    }

    #[test]
    fn self_loop_sits_beside_the_node() {
        let n = node(0.0, 0.0);
        let g = self_loop_geometry(&n, 0.0, 20.0);
        let LinkGeometry::Arc { circle, .. } = g else { panic!("expected arc") };
        assert!(approx_eq(circle.center.x, 30.0, 1e-9));
        assert!(approx_eq(circle.radius, 15.0, 1e-9));
        assert!(point_on_link(Vec2::new(45.0, 0.0), &g, 6.0));
    }

    #[test]
    fn arc_samples_cover_the_sweep() {
        let bend = Bend { parallel: 0.5, perpendicular: -40.0, line_angle_adjust: 0.0 };
        let g = regular_link_geometry(&node(0.0, 0.0), &node(200.0, 0.0), &bend, 26.0);
        let pts = sample_link(&g, 100);
        assert_eq!(pts.len(), 101);
        assert!(pts[0].dist(g.start()) < 1e-6 || pts[0].dist(g.end()) < 1e-6);
        // all samples lie on the bulge side (perpendicular < 0 bends toward -y)
        assert!(pts.iter().all(|p| p.y <= 1e-6));
        assert!(pts.iter().any(|p| p.y < -30.0));
    }

    #[test]
    fn circle_hits_square_sides() {
        let pts = circle_square_intersections(
            Vec2::new(0.0, 0.0),
            10.0,
            Circle { center: Vec2::new(20.0, 0.0), radius: 12.0 },
        );
        assert_eq!(pts.len(), 2);
        for p in pts {
            assert!(approx_eq(p.x, 10.0, 1e-9));
            assert!(approx_eq(p.y.abs(), (44.0f64).sqrt(), 1e-9));
        }
    }

    #[test]
    fn dragging_near_the_chord_straightens() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);
        let (bend, snapped) = drag_bend(a, b, &Bend::default(), Vec2::new(40.0, -3.0));
        assert!(snapped);
        assert!(bend.is_straight());
        assert_eq!(bend.line_angle_adjust, PI);
        let (bend, snapped) = drag_bend(a, b, &bend, Vec2::new(40.0, 30.0));
        assert!(!snapped);
        assert!(approx_eq(bend.perpendicular, 30.0, 1e-9));
        assert_eq!(bend.line_angle_adjust, PI);
        // Beyond the endpoints never snaps.
        assert!(!drag_bend(a, b, &Bend::default(), Vec2::new(120.0, 1.0)).1);
    }

    #[test]
    fn self_loop_anchor_snaps_to_right_angles() {
        let c = Vec2::new(0.0, 0.0);
        assert_eq!(self_loop_anchor(c, Vec2::new(10.0, 0.5), 0.0), 0.0);
        assert!(approx_eq(self_loop_anchor(c, Vec2::new(0.0, 10.0), 0.0), FRAC_PI_2, 1e-12));
        let a = self_loop_anchor(c, Vec2::new(-10.0, 0.0), 0.5);
        assert!((-PI..=PI).contains(&a));
    }
}
