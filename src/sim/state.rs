//! Simulation state and core types
//!
//! `SimState` is the explicit simulation context: the frame loop owns it and
//! passes it to [`advance`](super::tick::advance) every frame.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::playfield::Playfield;
use crate::config::Config;

/// Ball state - resting on the paddle or sweeping through the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Tracks the paddle, waiting for launch input
    Resting,
    /// Advances by sweeping every frame
    InFlight,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Unit direction; only meaningful while in flight
    pub dir: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            dir: Vec2::ZERO,
            radius,
            state: BallState::Resting,
        }
    }

    #[inline]
    pub fn in_movement(&self) -> bool {
        self.state == BallState::InFlight
    }

    /// Where a resting ball sits: centered on the paddle, touching its top
    pub fn rest_position(&self, paddle: &Paddle) -> Vec2 {
        Vec2::new(paddle.pos.x, paddle.top() - self.radius)
    }

    /// Put the ball back on the paddle
    pub fn rest_on(&mut self, paddle: &Paddle) {
        self.state = BallState::Resting;
        self.pos = self.rest_position(paddle);
    }

    /// Launch upward, biased left or right by the horizontal input.
    ///
    /// The bias only contributes its sign so the launch vector is never zero.
    pub fn launch(&mut self, horizontal_bias: f32) {
        if self.state == BallState::Resting {
            let x = if horizontal_bias >= 0.0 { 1.0 } else { -1.0 };
            self.dir = Vec2::new(x, -1.0).normalize();
            self.state = BallState::InFlight;
        }
    }
}

/// The player's paddle (axis-aligned box, `pos` is its center)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub half_extents: Vec2,
    /// Horizontal velocity applied this frame (px/s)
    pub velocity: f32,
}

impl Paddle {
    pub fn new(pos: Vec2, half_extents: Vec2) -> Self {
        Self {
            pos,
            half_extents,
            velocity: 0.0,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_extents.y
    }

    /// Move horizontally from input in `[-1, 1]` and clamp to the playfield
    pub fn move_by_input(&mut self, movement: f32, speed: f32, dt: f32, field: &Playfield) {
        self.velocity = movement.clamp(-1.0, 1.0) * speed;
        self.pos.x += self.velocity * dt;
        self.clamp_to(field);
    }

    /// Keep the paddle within `[half_x, width - half_x]`
    pub fn clamp_to(&mut self, field: &Playfield) {
        let min_x = self.half_extents.x;
        let max_x = field.width - self.half_extents.x;
        if self.pos.x < min_x {
            self.pos.x = min_x;
        }
        if self.pos.x > max_x {
            self.pos.x = max_x;
        }
    }
}

/// Box corners around `center`, in the order top-left, bottom-left,
/// bottom-right, top-right
pub fn corners_at(center: Vec2, half: Vec2) -> [Vec2; 4] {
    [
        Vec2::new(center.x - half.x, center.y - half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x + half.x, center.y - half.y),
    ]
}

/// Running counters, never gameplay-affecting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub frames: u64,
    pub launches: u64,
    pub bounces: u64,
    pub balls_lost: u64,
    /// Frames where the bounce loop hit its iteration cap
    pub capped_frames: u64,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: Config,
    pub playfield: Playfield,
    pub paddle: Paddle,
    pub ball: Ball,
    pub diagnostics: Diagnostics,
    /// Ball history for rendering (oldest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl SimState {
    /// Fresh state: paddle centered, ball resting on it
    pub fn new(config: Config) -> Self {
        let playfield = config.playfield();
        let paddle = Paddle::new(
            Vec2::new(
                0.5 * playfield.width,
                config.paddle_vert_pos * playfield.height,
            ),
            config.paddle_half_dims,
        );
        let mut ball = Ball::new(config.ball_radius);
        ball.rest_on(&paddle);

        Self {
            trail: VecDeque::with_capacity(config.trail_capacity),
            config,
            playfield,
            paddle,
            ball,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Append to the ball history, dropping the oldest point when full
    pub fn record_trail(&mut self, point: Vec2) {
        if self.config.trail_capacity == 0 {
            return;
        }
        while self.trail.len() >= self.config.trail_capacity {
            self.trail.pop_front();
        }
        self.trail.push_back(point);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}
