//! Geometry kernel
//!
//! Closed-form line/line and line/circle intersection plus the few vector
//! helpers the resolver needs. Everything here is stateless and pure.
//!
//! Both intersection tests work on the infinite lines through the given
//! endpoints and return raw parameters. Bounding a hit to the finite
//! segments (`(0, 1]` along the path, `[0, 1]` along the surface) is left
//! to the caller.

use glam::Vec2;

/// Determinant magnitude below which two lines count as parallel
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Discriminant magnitude treated as a single tangential root
pub const TANGENT_EPSILON: f32 = 1e-6;

/// Parametric intersection of two lines.
///
/// The point is `lerp(l0, l1, l_param) == lerp(m0, m1, m_param)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    pub l_param: f32,
    pub m_param: f32,
}

impl LineHit {
    /// Hit lies on the swept path `(0, 1]` and on the surface segment `[0, 1]`
    #[inline]
    pub fn within_segments(&self) -> bool {
        self.l_param > 0.0
            && self.l_param <= 1.0
            && self.m_param >= 0.0
            && self.m_param <= 1.0
    }
}

/// Roots of a line/circle intersection, sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleHit {
    None,
    Tangent(f32),
    Secant(f32, f32),
}

impl CircleHit {
    /// Number of roots (0, 1 or 2)
    pub fn count(&self) -> usize {
        match self {
            CircleHit::None => 0,
            CircleHit::Tangent(_) => 1,
            CircleHit::Secant(_, _) => 2,
        }
    }

    /// Smallest root, if any
    pub fn first(&self) -> Option<f32> {
        match *self {
            CircleHit::None => None,
            CircleHit::Tangent(t) | CircleHit::Secant(t, _) => Some(t),
        }
    }
}

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Reflect `incident` about a unit `normal`: `v - 2(v·n)n`.
///
/// `normal` is assumed to be unit length and is not renormalized.
#[inline]
pub fn reflect(incident: Vec2, normal: Vec2) -> Vec2 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Linear interpolation between two points
#[inline]
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Intersect the line through `l0, l1` with the line through `m0, m1`.
///
/// Returns `None` when the lines are parallel or either segment is
/// degenerate (determinant within [`PARALLEL_EPSILON`] of zero).
pub fn intersect_line_line(l0: Vec2, l1: Vec2, m0: Vec2, m1: Vec2) -> Option<LineHit> {
    let r = l1 - l0;
    let q = m1 - m0;
    let det = cross(r, q);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let w = m0 - l0;
    Some(LineHit {
        l_param: cross(w, q) / det,
        m_param: cross(w, r) / det,
    })
}

/// Intersect the line through `l0, l1` with a circle.
///
/// Solves `|l0 + t(l1 - l0) - center| = radius` for `t`. A degenerate
/// (zero-length) line reports no intersection.
pub fn intersect_line_circle(l0: Vec2, l1: Vec2, center: Vec2, radius: f32) -> CircleHit {
    let d = l1 - l0;
    let f = l0 - center;

    let a = d.dot(d);
    if a < PARALLEL_EPSILON {
        return CircleHit::None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let delta = b * b - 4.0 * a * c;
    if delta.abs() < TANGENT_EPSILON {
        CircleHit::Tangent(-b / (2.0 * a))
    } else if delta < 0.0 {
        CircleHit::None
    } else {
        let sqrt_delta = delta.sqrt();
        let t1 = (-b - sqrt_delta) / (2.0 * a);
        let t2 = (-b + sqrt_delta) / (2.0 * a);
        // a > 0, so t1 <= t2
        CircleHit::Secant(t1, t2)
    }
}
