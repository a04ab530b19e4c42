//! Swept collision tests for the ball
//!
//! The ball is reduced to its center point by Minkowski-adjusting every
//! surface by the ball radius: paddle edges move outward and its corners
//! become circles, playfield walls move inward. Each test sweeps the ball
//! center along its displacement for this step and reports the earliest
//! contact as a fraction of that displacement.

use glam::Vec2;

use super::geometry::{intersect_line_circle, intersect_line_line, lerp};
use super::playfield::{Playfield, Wall};
use super::state::corners_at;

/// Parameters closer than this resolve as one simultaneous hit
pub const SIMULTANEOUS_EPSILON: f32 = 1e-6;

/// Outward normals of the paddle edges; edge `i` runs from corner `i` to
/// corner `i + 1` of [`corners_at`]
pub const PADDLE_EDGE_NORMALS: [Vec2; 4] = [
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, -1.0),
];

/// Which surface produced a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Paddle edge index (left, bottom, right, top)
    PaddleEdge(usize),
    /// Paddle corner index (top-left, bottom-left, bottom-right, top-right)
    PaddleCorner(usize),
    Wall(Wall),
}

/// Result of a swept collision test
#[derive(Debug, Clone, Copy)]
pub struct CollisionResult {
    /// Fraction of the attempted displacement consumed before contact, in `(0, 1]`
    pub param: f32,
    /// Ball center at contact
    pub point: Vec2,
    /// Unit normal of the struck surface, pointing toward the ball
    pub normal: Vec2,
    /// Struck surface, `None` on a miss
    pub surface: Option<Surface>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            param: 0.0,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            surface: None,
        }
    }

    /// Whether a collision occurred
    #[inline]
    pub fn exists(&self) -> bool {
        self.surface.is_some()
    }

    /// Keep the earlier of the current result and a candidate.
    ///
    /// Ties keep the current result, so candidates offered first win.
    fn offer(&mut self, param: f32, point: Vec2, normal: Vec2, surface: Surface) {
        if self.surface.is_none() || param < self.param {
            *self = Self {
                param,
                point,
                normal,
                surface: Some(surface),
            };
        }
    }
}

/// Sweep the ball against the paddle.
///
/// The paddle is held at `paddle_pos` (its position at the start of the
/// step) and its own displacement is subtracted from the ball's, so the
/// test runs in the paddle's frame. Edges are tested before corners and
/// ties keep the first hit found; the reported point lies on the ball's
/// world path at the hit parameter.
///
/// Surfaces the ball is moving away from (or grazing) are ignored.
pub fn collide_ball_paddle(
    ball_pos: Vec2,
    ball_radius: f32,
    ball_movement: Vec2,
    paddle_pos: Vec2,
    paddle_half_dims: Vec2,
    paddle_movement: Vec2,
) -> CollisionResult {
    let mut ret = CollisionResult::miss();
    let movement = ball_movement - paddle_movement;
    let expected = ball_pos + movement;
    let world_end = ball_pos + ball_movement;

    let corners = corners_at(paddle_pos, paddle_half_dims);

    for (i, normal) in PADDLE_EDGE_NORMALS.iter().copied().enumerate() {
        if movement.dot(normal) >= 0.0 {
            continue;
        }
        let displacement = normal * ball_radius;
        let m0 = corners[i] + displacement;
        let m1 = corners[(i + 1) % 4] + displacement;
        let Some(hit) = intersect_line_line(ball_pos, expected, m0, m1) else {
            continue;
        };
        if hit.within_segments() {
            let point = lerp(ball_pos, world_end, hit.l_param);
            ret.offer(hit.l_param, point, normal, Surface::PaddleEdge(i));
        }
    }

    for (i, corner) in corners.iter().copied().enumerate() {
        // Entry root only: a ball already overlapping the corner is not a hit
        let Some(t) = intersect_line_circle(ball_pos, expected, corner, ball_radius).first() else {
            continue;
        };
        if !(t > 0.0 && t <= 1.0) {
            continue;
        }
        let normal = (lerp(ball_pos, expected, t) - corner).normalize_or_zero();
        if movement.dot(normal) >= 0.0 {
            continue;
        }
        let point = lerp(ball_pos, world_end, t);
        ret.offer(t, point, normal, Surface::PaddleCorner(i));
    }

    ret
}

/// Earliest wall contact of a sweep, with every wall struck at that instant
#[derive(Debug, Clone, PartialEq)]
pub struct WallCollision {
    pub param: f32,
    pub point: Vec2,
    /// Walls hit simultaneously, in sweep order (two when entering a corner)
    pub walls: Vec<Wall>,
}

impl WallCollision {
    /// Whether any struck wall loses the ball
    pub fn is_loss(&self) -> bool {
        self.walls.iter().any(|w| w.is_loss())
    }

    /// Combined unit normal of the struck walls
    pub fn normal(&self) -> Vec2 {
        self.walls
            .iter()
            .map(|w| w.inward_normal())
            .sum::<Vec2>()
            .normalize_or_zero()
    }
}

/// Sweep the ball center from `start` to `end` against the playfield
/// shrunk by `ball_radius`.
///
/// A start point on or behind a wall it is moving into counts as a hit at
/// parameter 0, with the contact point pulled back inside the shrunk
/// playfield.
pub fn collide_walls(
    start: Vec2,
    end: Vec2,
    playfield: &Playfield,
    ball_radius: f32,
) -> Option<WallCollision> {
    let movement = end - start;
    let mut hits: Vec<(f32, Wall)> = Vec::new();

    for seg in playfield.shrunk_walls(ball_radius) {
        if movement.dot(seg.normal) >= 0.0 {
            continue;
        }
        if (start - seg.start).dot(seg.normal) <= 0.0 {
            hits.push((0.0, seg.wall));
            continue;
        }
        let Some(hit) = intersect_line_line(start, end, seg.start, seg.end) else {
            continue;
        };
        if hit.within_segments() {
            hits.push((hit.l_param, seg.wall));
        }
    }

    let param = hits.iter().map(|&(t, _)| t).reduce(f32::min)?;
    let walls = hits
        .iter()
        .filter(|&&(t, _)| t - param <= SIMULTANEOUS_EPSILON)
        .map(|&(_, wall)| wall)
        .collect();

    let point = if param > 0.0 {
        lerp(start, end, param)
    } else {
        playfield.clamp_inside(start, ball_radius)
    };
    Some(WallCollision {
        param,
        point,
        walls,
    })
}
