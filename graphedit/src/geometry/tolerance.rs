// Centralized tolerances, paddings and editor constants

pub const EPS_LEN: f64 = 1e-9;            // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-6;          // determinant guard for three-point circle fits

// Interaction paddings (editor-nominal px)
pub const SNAP_TO_PADDING: f64 = 6.0;     // axis snap / straight-link snap distance
pub const HIT_TARGET_PADDING: f64 = 6.0;  // widens node and link hit regions
pub const DUPLICATE_LINK_OFFSET: f64 = 16.0; // perpendicular step between parallel links

// Node and marker sizing
pub const DEFAULT_NODE_RADIUS: f64 = 26.0;
pub const INITIAL_LINK_LENGTH: f64 = 25.0;

// Self-loop shape, in node radii
pub const SELF_LOOP_CENTER_DIST: f64 = 1.5;
pub const SELF_LOOP_RADIUS: f64 = 0.75;
pub const SELF_LOOP_SWEEP: f64 = 0.8;    // half sweep, fraction of pi

// Self-loop anchor snaps to multiples of 90 degrees within this slack (radians)
pub const SELF_LOOP_SNAP: f64 = 0.1;

pub const MAX_UNDO_REDO: usize = 100;

// Rectangle selection samples arcs with this many steps (steps + 1 points)
pub const ARC_SAMPLE_STEPS: usize = 100;

// Start marker placement
pub const START_ANGLE_DIVISIONS: u32 = 8;
pub const START_ANGLE_TOLERANCE: f64 = 0.05; // radians
pub const UPPER_LEFT: f64 = 0.75 * std::f64::consts::PI;

pub const TAU: f64 = std::f64::consts::TAU;

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

/// Wraps an angle into [0, 2pi).
#[inline]
pub fn wrap_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r >= TAU { 0.0 } else { r }
}

/// Shortest distance between two angles on the circle, in [0, pi].
#[inline]
pub fn angle_distance(a: f64, b: f64) -> f64 {
    let d = wrap_angle(a - b);
    d.min(TAU - d)
}
