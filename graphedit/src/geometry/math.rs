use super::tolerance::{wrap_angle, EPS_DENOM, EPS_LEN};
use crate::model::{Circle, Rect, Vec2};

#[inline]
#[allow(clippy::too_many_arguments)]
fn det3(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, g: f64, h: f64, i: f64) -> f64 {
    a * e * i + b * f * g + c * d * h - a * f * h - b * d * i - c * e * g
}

/// Circle through three points. `None` when the points are (nearly) collinear;
/// callers fall back to straight-line geometry.
pub fn circle_through_three_points(p1: Vec2, p2: Vec2, p3: Vec2) -> Option<Circle> {
    let (x1, y1, x2, y2, x3, y3) = (p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
    let s1 = x1 * x1 + y1 * y1;
    let s2 = x2 * x2 + y2 * y2;
    let s3 = x3 * x3 + y3 * y3;
    let a = det3(x1, y1, 1.0, x2, y2, 1.0, x3, y3, 1.0);
    if a.abs() <= EPS_DENOM {
        return None;
    }
    let bx = -det3(s1, y1, 1.0, s2, y2, 1.0, s3, y3, 1.0);
    let by = det3(s1, x1, 1.0, s2, x2, 1.0, s3, x3, 1.0);
    let c = -det3(s1, x1, y1, s2, x2, y2, s3, x3, y3);
    let disc = bx * bx + by * by - 4.0 * a * c;
    if !disc.is_finite() || disc < 0.0 {
        return None;
    }
    let circle = Circle {
        center: Vec2::new(-bx / (2.0 * a), -by / (2.0 * a)),
        radius: disc.sqrt() / (2.0 * a.abs()),
    };
    if !circle.radius.is_finite() || !circle.center.x.is_finite() || !circle.center.y.is_finite() {
        return None;
    }
    Some(circle)
}

/// Angle in [0, 2pi) turning `v1` onto `v2`, offset by pi.
///
/// With `v1 = node - link_point` and `v2 = (1, 0)` this is the direction of the
/// link point as seen from the node, measured counterclockwise on screen
/// (y pointing down).
pub fn angle_between(v1: Vec2, v2: Vec2) -> f64 {
    wrap_angle(v2.angle() - v1.angle() + std::f64::consts::PI)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcEnds {
    pub start_angle: f64,
    pub end_angle: f64,
    pub start: Vec2,
    pub end: Vec2,
}

/// Pulls the ends of an arc from node centers `a`/`b` back to `distance` along
/// the circle, so the arc meets the node boundary instead of the center.
pub fn arc_endpoints_and_angles(a: Vec2, b: Vec2, circle: Circle, reverse_scale: f64, distance: f64) -> ArcEnds {
    let r_ratio = reverse_scale * distance / circle.radius;
    let start_angle = (a - circle.center).angle() - r_ratio;
    let end_angle = (b - circle.center).angle() + r_ratio;
    ArcEnds {
        start_angle,
        end_angle,
        start: circle.center + Vec2::from_polar(circle.radius, start_angle),
        end: circle.center + Vec2::from_polar(circle.radius, end_angle),
    }
}

pub fn point_in_rect(outer: &Rect, p: Vec2) -> bool {
    let (lo, hi) = outer.normalized();
    lo.x <= p.x && p.x <= hi.x && lo.y <= p.y && p.y <= hi.y
}

/// True iff `inner` lies completely inside `outer` (boundary inclusive).
pub fn is_rect_contained(outer: &Rect, inner: &Rect) -> bool {
    point_in_rect(outer, inner.a) && point_in_rect(outer, inner.b)
}

/// Aligns `pos` with any candidate closer than the per-axis tolerance. A
/// tolerance of zero disables that axis.
pub fn snap<I>(pos: &mut Vec2, candidates: I, tol_x: f64, tol_y: f64)
where
    I: IntoIterator<Item = Vec2>,
{
    for c in candidates {
        if (pos.x - c.x).abs() < tol_x {
            pos.x = c.x;
        }
        if (pos.y - c.y).abs() < tol_y {
            pos.y = c.y;
        }
    }
}

/// Real roots of `a t^2 + b t + c = 0`.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() <= EPS_LEN {
        return None;
    }
    let d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return None;
    }
    let s = d.sqrt();
    Some(((-b - s) / (2.0 * a), (-b + s) / (2.0 * a)))
}
