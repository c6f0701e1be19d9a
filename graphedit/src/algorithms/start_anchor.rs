// Placement of the FSM initial marker around its node

use crate::geometry::math::angle_between;
use crate::geometry::tolerance::{
    angle_distance, wrap_angle, INITIAL_LINK_LENGTH, SNAP_TO_PADDING, START_ANGLE_DIVISIONS,
    START_ANGLE_TOLERANCE, TAU, UPPER_LEFT,
};
use crate::model::{Link, NodeId, Vec2};
use crate::Graph;

/// Directions (radians, counterclockwise on screen) in which links leave `node`.
/// Self-loops contribute both of their ends; start markers are ignored.
pub fn incident_angles_impl(g: &Graph, node: NodeId) -> Vec<f64> {
    let Some(n) = g.node(node) else { return Vec::new() };
    let right = Vec2::new(1.0, 0.0);
    let mut out = Vec::new();
    for (_, l) in g.links() {
        if !l.touches(node) {
            continue;
        }
        let Some(geom) = g.geometry_of(l) else { continue };
        match l {
            Link::Regular { from, to, .. } => {
                if *from == node {
                    out.push(angle_between(n.pos - geom.start(), right));
                }
                if *to == node {
                    out.push(angle_between(n.pos - geom.end(), right));
                }
            }
            Link::SelfLoop { .. } => {
                out.push(angle_between(n.pos - geom.start(), right));
                out.push(angle_between(n.pos - geom.end(), right));
            }
            Link::Start { .. } => {}
        }
    }
    out
}

/// Candidate directions: for every gap between consecutive incident angles,
/// the gap midpoint plus and minus up to three eighths of the gap.
fn candidate_angles(sorted: &[f64]) -> Vec<f64> {
    let div = START_ANGLE_DIVISIONS as i32;
    let half = div / 2 - 1;
    let mut out = Vec::with_capacity(sorted.len() * (2 * half as usize + 1));
    for (i, &start) in sorted.iter().enumerate() {
        let end = sorted.get(i + 1).copied().unwrap_or(sorted[0] + TAU);
        let avg = (start + end) / 2.0;
        let range = (end - start).abs();
        for k in -half..=half {
            out.push(wrap_angle(avg + (k as f64 / div as f64) * range));
        }
    }
    out
}

/// Picks the marker direction given the incident angles (must be non-empty).
pub fn choose_start_angle(angles: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = angles.iter().copied().map(wrap_angle).collect();
    sorted.sort_by(f64::total_cmp);
    let candidates = candidate_angles(&sorted);
    let free = candidates
        .iter()
        .copied()
        .filter(|c| sorted.iter().all(|a| angle_distance(*a, *c) >= START_ANGLE_TOLERANCE))
        .min_by(|a, b| angle_distance(*a, UPPER_LEFT).total_cmp(&angle_distance(*b, UPPER_LEFT)));
    if let Some(best) = free {
        return best;
    }
    // Crowded node: take the candidate with the most room around it.
    let mut best = candidates[0];
    let mut best_room = 0.0;
    for c in candidates {
        let room = sorted
            .iter()
            .map(|a| angle_distance(*a, c))
            .fold(f64::INFINITY, f64::min);
        if room > best_room {
            best_room = room;
            best = c;
        }
    }
    best
}

/// Offset of the marker tail from the node center.
pub fn start_offset_impl(g: &Graph, node: NodeId) -> Vec2 {
    let r = g.node_radius;
    let angles = incident_angles_impl(g, node);
    if angles.is_empty() {
        let d = r + INITIAL_LINK_LENGTH;
        return Vec2::new(-d, -d);
    }
    let a = choose_start_angle(&angles);
    let dist = r + 2.0 * INITIAL_LINK_LENGTH;
    let mut off = Vec2::new(dist * a.cos(), -dist * a.sin());
    if off.x.abs() < SNAP_TO_PADDING {
        off.x = 0.0;
    }
    if off.y.abs() < SNAP_TO_PADDING {
        off.y = 0.0;
    }
    off
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tolerance::approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn single_link_on_the_right_keeps_upper_left() {
        assert!(approx_eq(choose_start_angle(&[0.0]), UPPER_LEFT, 1e-12));
    }

    #[test]
    fn link_at_upper_left_pushes_marker_aside() {
        let a = choose_start_angle(&[UPPER_LEFT]);
        assert!(angle_distance(a, UPPER_LEFT) > 0.5);
        assert!(approx_eq(angle_distance(a, UPPER_LEFT), PI / 4.0, 1e-12));
    }

    #[test]
    fn candidates_avoid_incident_angles() {
        let angles = [0.1, 1.7, 2.4, 4.0, 5.5];
        let a = choose_start_angle(&angles);
        assert!(angles.iter().all(|x| angle_distance(*x, a) >= START_ANGLE_TOLERANCE));
    }

    #[test]
    fn candidates_per_gap() {
        let c = candidate_angles(&[0.0, PI]);
        assert_eq!(c.len(), 14);
        assert!(c.iter().all(|x| (0.0..TAU).contains(x)));
    }
}
