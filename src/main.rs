//! BrykOut headless runner
//!
//! Drives the simulation with a seeded autoplay input and logs what the
//! ball does. Window, rendering and keyboard input live outside this crate.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -- --frames 2000 --seed 7
//!   cargo run -- --config brykout.json --realtime --dump-state

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use brykout::sim::{SimState, TickInput, advance};
use brykout::{Config, FramePacer, FrameStats};

#[derive(Parser)]
#[command(name = "brykout")]
#[command(about = "Run the BrykOut simulation headless with an autoplay paddle")]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 1200)]
    frames: u64,

    /// Seed for the autoplay input
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON config file (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hold frames to the configured target rate
    #[arg(long)]
    realtime: bool,

    /// Print the final simulation state as JSON
    #[arg(long)]
    dump_state: bool,
}

/// Autoplay: chase the ball with some jitter, launch after a short random delay
struct Autoplay {
    rng: Pcg32,
    serve_delay: u32,
}

impl Autoplay {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            serve_delay: 0,
        }
    }

    fn input(&mut self, state: &SimState) -> TickInput {
        let jitter = self.rng.random_range(-40.0f32..40.0);
        let target_x = state.ball.pos.x + jitter;
        let offset = target_x - state.paddle.pos.x;
        let movement = (offset / state.paddle.half_extents.x).clamp(-1.0, 1.0);

        let mut launch = false;
        if !state.ball.in_movement() {
            if self.serve_delay == 0 {
                self.serve_delay = self.rng.random_range(10..60);
            }
            self.serve_delay -= 1;
            launch = self.serve_delay == 0;
        }

        TickInput { movement, launch }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let dt = config.time_step();
    log::info!(
        "BrykOut starting: {}x{} playfield, {} fps, seed {}",
        config.window_width,
        config.window_height(),
        config.target_fps,
        args.seed
    );

    let mut pacer = args.realtime.then(|| FramePacer::new(config.target_fps));
    if let Some(pacer) = &pacer {
        log::info!(
            "Realtime pacing: {:.2}ms per frame",
            pacer.frame_time().as_secs_f64() * 1000.0
        );
    }
    let mut stats = FrameStats::new(Instant::now());
    let mut autoplay = Autoplay::new(args.seed);
    let mut state = SimState::new(config);

    for frame in 0..args.frames {
        let input = autoplay.input(&state);
        let report = advance(&mut state, &input, dt);

        for contact in &report.contacts {
            log::debug!(
                "frame {frame}: {:?} at ({:.1}, {:.1})",
                contact.surface,
                contact.point.x,
                contact.point.y
            );
        }
        if report.lost {
            log::info!("frame {frame}: ball lost");
        }

        if let Some(pacer) = pacer.as_mut() {
            let wasted = pacer.wait();
            if let Some(summary) = stats.record(Instant::now(), wasted) {
                log::info!("{summary}");
            }
        }
    }

    let diag = &state.diagnostics;
    log::info!(
        "Done: {} frames, {} launches, {} bounces, {} balls lost, {} capped frames",
        diag.frames,
        diag.launches,
        diag.bounces,
        diag.balls_lost,
        diag.capped_frames
    );

    if args.dump_state {
        let json = serde_json::to_string_pretty(&state).context("serializing state")?;
        println!("{json}");
    }

    Ok(())
}
