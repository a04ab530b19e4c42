//! Runtime configuration
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Playfield;

/// Simulation and window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_fps: u32,
    pub window_width: u32,
    /// Explicit height; derived from the aspect ratio when absent
    pub window_height: Option<u32>,
    /// Width / height
    pub window_aspect_ratio: f32,

    pub paddle_speed: f32,
    /// Paddle center height as a fraction of the window height
    pub paddle_vert_pos: f32,
    pub paddle_half_dims: Vec2,

    pub ball_radius: f32,
    pub ball_speed: f32,

    pub max_bounces_per_frame: u32,
    pub trail_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            window_width: WINDOW_WIDTH,
            window_height: None,
            window_aspect_ratio: WINDOW_ASPECT_RATIO,

            paddle_speed: PADDLE_SPEED,
            paddle_vert_pos: PADDLE_VERT_POS,
            paddle_half_dims: Vec2::new(PADDLE_HALF_WIDTH, PADDLE_HALF_HEIGHT),

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,

            max_bounces_per_frame: MAX_BOUNCES_PER_FRAME,
            trail_capacity: TRAIL_CAPACITY,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Window height, derived from width and aspect ratio unless given
    pub fn window_height(&self) -> u32 {
        self.window_height
            .unwrap_or_else(|| (self.window_width as f32 / self.window_aspect_ratio).round() as u32)
    }

    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.window_width as f32, self.window_height() as f32)
    }

    /// Seconds per simulation step
    pub fn time_step(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::invalid("target_fps", "must be positive"));
        }
        if self.window_width == 0 {
            return Err(ConfigError::invalid("window_width", "must be positive"));
        }
        if self.window_height.is_none()
            && !(self.window_aspect_ratio.is_finite() && self.window_aspect_ratio > 0.0)
        {
            return Err(ConfigError::invalid("window_aspect_ratio", "must be positive"));
        }
        if self.window_height() == 0 {
            return Err(ConfigError::invalid("window_height", "must be positive"));
        }
        if !(self.paddle_speed >= 0.0) {
            return Err(ConfigError::invalid("paddle_speed", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.paddle_vert_pos) {
            return Err(ConfigError::invalid("paddle_vert_pos", "must be within [0, 1]"));
        }
        if !(self.paddle_half_dims.x > 0.0 && self.paddle_half_dims.y > 0.0) {
            return Err(ConfigError::invalid("paddle_half_dims", "must be positive"));
        }
        if !(self.ball_radius > 0.0) {
            return Err(ConfigError::invalid("ball_radius", "must be positive"));
        }
        if !(self.ball_speed > 0.0) {
            return Err(ConfigError::invalid("ball_speed", "must be positive"));
        }
        if self.max_bounces_per_frame == 0 {
            return Err(ConfigError::invalid("max_bounces_per_frame", "must be positive"));
        }

        let field = self.playfield();
        if 2.0 * self.paddle_half_dims.x > field.width {
            return Err(ConfigError::invalid(
                "paddle_half_dims",
                format!("paddle wider than playfield ({})", field.width),
            ));
        }
        if 2.0 * self.ball_radius >= field.width.min(field.height) {
            return Err(ConfigError::invalid(
                "ball_radius",
                "ball does not fit inside the playfield",
            ));
        }
        Ok(())
    }
}
