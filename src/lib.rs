//! BrykOut - Breakout prototype core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry kernel, swept collisions, state)
//! - `config`: Tuning values, loadable from JSON
//! - `pacing`: Fixed-rate frame pacing and FPS statistics
//! - `error`: Error types for the outer layers

pub mod config;
pub mod error;
pub mod pacing;
pub mod sim;

pub use config::Config;
pub use error::ConfigError;
pub use pacing::{FramePacer, FrameStats};

/// Game configuration constants
pub mod consts {
    /// Target frame rate; the simulation steps once per frame
    pub const TARGET_FPS: u32 = 120;

    /// Window dimensions (height derived from the aspect ratio)
    pub const WINDOW_WIDTH: u32 = 600;
    pub const WINDOW_ASPECT_RATIO: f32 = 3.0 / 4.0;

    /// Paddle defaults
    pub const PADDLE_SPEED: f32 = 1000.0;
    /// Vertical position of the paddle center as a fraction of window height
    pub const PADDLE_VERT_POS: f32 = 0.90;
    pub const PADDLE_HALF_WIDTH: f32 = 80.0;
    pub const PADDLE_HALF_HEIGHT: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED: f32 = 1200.0;

    /// Remaining frame budget below which the bounce loop stops
    pub const REMAINING_EPSILON: f32 = 0.001;
    /// Hard cap on resolver iterations within one frame
    pub const MAX_BOUNCES_PER_FRAME: u32 = 64;
    /// Maximum number of points kept in the ball history trail
    pub const TRAIL_CAPACITY: usize = 256;
}
