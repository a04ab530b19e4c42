//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, driven by an explicit `dt`
//! - No ambient or static state; everything lives in `SimState`
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod playfield;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Surface, WallCollision, collide_ball_paddle, collide_walls};
pub use geometry::{CircleHit, LineHit, intersect_line_circle, intersect_line_line, lerp, reflect};
pub use playfield::{Playfield, Wall, WallSegment};
pub use state::{Ball, BallState, Diagnostics, Paddle, SimState};
pub use tick::{Contact, StepReport, TickInput, advance};
