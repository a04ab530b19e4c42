//! Playfield rectangle and its boundary segments
//!
//! Screen coordinates: origin top-left, +y pointing down. The playfield is
//! the axis-aligned rectangle `[0, 0]..[width, height]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four playfield boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Bottom,
    Right,
    Top,
}

impl Wall {
    /// Walls in sweep order
    pub const ALL: [Wall; 4] = [Wall::Left, Wall::Bottom, Wall::Right, Wall::Top];

    /// Unit normal pointing into the playfield
    pub fn inward_normal(self) -> Vec2 {
        match self {
            Wall::Left => Vec2::new(1.0, 0.0),
            Wall::Bottom => Vec2::new(0.0, -1.0),
            Wall::Right => Vec2::new(-1.0, 0.0),
            Wall::Top => Vec2::new(0.0, 1.0),
        }
    }

    /// Crossing the bottom loses the ball instead of bouncing
    #[inline]
    pub fn is_loss(self) -> bool {
        self == Wall::Bottom
    }
}

/// A boundary segment with its inward normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub wall: Wall,
    pub start: Vec2,
    pub end: Vec2,
    pub normal: Vec2,
}

/// Axis-aligned playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Corners shrunk inward by `inset` on every side, in the order
    /// top-left, bottom-left, bottom-right, top-right
    pub fn shrunk_corners(&self, inset: f32) -> [Vec2; 4] {
        [
            Vec2::new(inset, inset),
            Vec2::new(inset, self.height - inset),
            Vec2::new(self.width - inset, self.height - inset),
            Vec2::new(self.width - inset, inset),
        ]
    }

    /// Boundary segments of the playfield shrunk by `inset`.
    ///
    /// Shrinking by the ball radius turns circle-vs-wall into
    /// point-vs-wall for the ball center.
    pub fn shrunk_walls(&self, inset: f32) -> [WallSegment; 4] {
        let corners = self.shrunk_corners(inset);
        std::array::from_fn(|i| {
            let wall = Wall::ALL[i];
            WallSegment {
                wall,
                start: corners[i],
                end: corners[(i + 1) % 4],
                normal: wall.inward_normal(),
            }
        })
    }

    /// Nearest point to `pos` inside the playfield shrunk by `inset`
    pub fn clamp_inside(&self, pos: Vec2, inset: f32) -> Vec2 {
        pos.clamp(
            Vec2::splat(inset),
            Vec2::new(self.width - inset, self.height - inset),
        )
    }

    /// Whether a circle of `radius` at `pos` lies fully inside
    pub fn contains_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= radius
            && pos.y >= radius
            && pos.x <= self.width - radius
            && pos.y <= self.height - radius
    }
}
