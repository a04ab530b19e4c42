//! Frame pacing
//!
//! The simulation steps once per frame with a fixed `dt`, so the loop
//! around it has to hold frames to the target rate. `FramePacer` waits out
//! the rest of each frame and `FrameStats` turns the waits into a
//! once-per-second FPS line.

use std::fmt;
use std::time::{Duration, Instant};

/// How often `FrameStats` produces a summary
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Waits until each frame's deadline
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_time: Duration,
    next_frame_start: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        let frame_time = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);
        Self {
            frame_time,
            next_frame_start: Instant::now() + frame_time,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Spin (yielding) until the current frame's deadline, then schedule
    /// the next one. Returns the time spent waiting.
    ///
    /// Deadlines advance by exactly one frame time, so a late frame is
    /// made up by shorter waits afterwards rather than drifting.
    pub fn wait(&mut self) -> Duration {
        let waste_start = Instant::now();
        let mut now = waste_start;
        while now < self.next_frame_start {
            std::thread::yield_now();
            now = Instant::now();
        }
        self.next_frame_start += self.frame_time;
        now - waste_start
    }
}

/// Per-interval frame statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub wastage_ms: f64,
    /// Share of the interval spent waiting, in percent
    pub wastage_pct: f64,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BrykOut    [FPS = {:7.2}, frame time = {:7.2}ms, wastage = {:7.2}ms ({:4.1}%)]",
            self.fps, self.frame_time_ms, self.wastage_ms, self.wastage_pct
        )
    }
}

/// Accumulates frames and wait time between summaries
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval_start: Instant,
    frames: u32,
    wastage: Duration,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            interval_start: now,
            frames: 0,
            wastage: Duration::ZERO,
        }
    }

    /// Count a finished frame. Returns a summary once per
    /// [`REPORT_INTERVAL`] and starts a new interval.
    pub fn record(&mut self, now: Instant, wasted: Duration) -> Option<FrameSummary> {
        self.frames += 1;
        self.wastage += wasted;

        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let frames = self.frames as f64;
        let wastage_ms = self.wastage.as_secs_f64() * 1000.0;
        let summary = FrameSummary {
            fps: frames / elapsed_ms * 1000.0,
            frame_time_ms: elapsed_ms / frames,
            wastage_ms: wastage_ms / frames,
            wastage_pct: wastage_ms / elapsed_ms * 100.0,
        };

        self.interval_start = now;
        self.frames = 0;
        self.wastage = Duration::ZERO;
        Some(summary)
    }
}
