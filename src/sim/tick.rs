//! Per-frame simulation step
//!
//! Moves the paddle, keeps a resting ball on it, and sweeps a ball in
//! flight through the frame against paddle and walls, reflecting and
//! spending the frame's displacement budget until it runs out.

use glam::Vec2;

use super::collision::{Surface, collide_ball_paddle, collide_walls};
use super::geometry::reflect;
use super::state::{BallState, SimState};
use crate::consts::REMAINING_EPSILON;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal paddle input in `[-1, 1]`
    pub movement: f32,
    /// Launch the ball (edge-triggered)
    pub launch: bool,
}

/// A contact resolved during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub point: Vec2,
    pub normal: Vec2,
    pub surface: Surface,
    /// Fraction of the whole frame's displacement spent reaching this contact
    pub consumed: f32,
}

/// What happened during one call to [`advance`]
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Contacts in the order they were resolved
    pub contacts: Vec<Contact>,
    /// Total fraction of the frame's displacement applied
    pub consumed: f32,
    /// Fraction left unapplied (non-zero after a loss or a capped loop)
    pub remaining: f32,
    pub launched: bool,
    /// Ball crossed the bottom and went back to the paddle
    pub lost: bool,
    /// Bounce loop stopped at the iteration cap
    pub capped: bool,
}

/// Advance the simulation by one frame of `dt` seconds
pub fn advance(state: &mut SimState, input: &TickInput, dt: f32) -> StepReport {
    let mut report = StepReport::default();
    state.diagnostics.frames += 1;

    // Update paddle position
    let paddle_start = state.paddle.pos;
    state.paddle.move_by_input(
        input.movement,
        state.config.paddle_speed,
        dt,
        &state.playfield,
    );
    let paddle_movement = state.paddle.pos - paddle_start;

    if state.ball.state == BallState::Resting {
        state.ball.rest_on(&state.paddle);
        if !input.launch {
            return report;
        }

        state.ball.launch(input.movement);
        state.diagnostics.launches += 1;
        state.clear_trail();
        state.record_trail(state.ball.pos);
        report.launched = true;
        log::debug!(
            "Launch from ({:.1}, {:.1}) dir ({:.3}, {:.3})",
            state.ball.pos.x,
            state.ball.pos.y,
            state.ball.dir.x,
            state.ball.dir.y
        );
    }

    sweep_ball(state, paddle_start, paddle_movement, dt, &mut report);
    report
}

/// Bounce-consumption loop for a ball in flight.
///
/// Each pass sweeps what is left of the frame against the walls and, until
/// the ball has bounced off it, the paddle. The paddle wins ties but never
/// a contact past the first wall hit.
fn sweep_ball(
    state: &mut SimState,
    paddle_start: Vec2,
    paddle_movement: Vec2,
    dt: f32,
    report: &mut StepReport,
) {
    let radius = state.ball.radius;
    let step = state.config.ball_speed * dt;
    let max_iterations = state.config.max_bounces_per_frame;

    let mut remaining = 1.0_f32;
    let mut bp = state.ball.pos;
    let mut bd = state.ball.dir;
    let mut iterations = 0_u32;
    let mut paddle_pending = true;

    while remaining > REMAINING_EPSILON {
        if iterations >= max_iterations {
            report.capped = true;
            state.diagnostics.capped_frames += 1;
            log::warn!(
                "Bounce cap ({}) reached with {:.4} of the frame left; holding ball at ({:.1}, {:.1})",
                max_iterations,
                remaining,
                bp.x,
                bp.y
            );
            break;
        }

        let movement = bd * (step * remaining);
        let ep = bp + movement;
        let wall_hit = collide_walls(bp, ep, &state.playfield, radius);

        if paddle_pending {
            // Paddle as it stands at this point of the frame
            let elapsed = 1.0 - remaining;
            let paddle_hit = collide_ball_paddle(
                bp,
                radius,
                movement,
                paddle_start + paddle_movement * elapsed,
                state.paddle.half_extents,
                paddle_movement * remaining,
            );
            let before_wall = wall_hit
                .as_ref()
                .is_none_or(|wall| paddle_hit.param <= wall.param);
            if let (Some(surface), true) = (paddle_hit.surface, before_wall) {
                let consumed = paddle_hit.param * remaining;
                bp = paddle_hit.point;
                bd = reflect(bd, paddle_hit.normal).normalize();
                remaining -= consumed;
                iterations += 1;
                paddle_pending = false;
                push_contact(state, report, bp, paddle_hit.normal, surface, consumed);
                state.diagnostics.bounces += 1;
                continue;
            }
        }

        let Some(hit) = wall_hit else {
            bp = ep;
            remaining = 0.0;
            break;
        };

        let consumed = hit.param * remaining;
        bp = hit.point;
        for wall in &hit.walls {
            bd = reflect(bd, wall.inward_normal());
        }
        bd = bd.normalize();
        remaining -= consumed;
        iterations += 1;

        let surface = Surface::Wall(hit.walls[0]);
        push_contact(state, report, bp, hit.normal(), surface, consumed);

        if hit.is_loss() {
            report.lost = true;
            break;
        }
        state.diagnostics.bounces += 1;
    }

    report.remaining = remaining;
    report.consumed = 1.0 - remaining;

    if report.lost {
        state.diagnostics.balls_lost += 1;
        state.ball.rest_on(&state.paddle);
        log::debug!("Ball lost at ({:.1}, {:.1})", bp.x, bp.y);
        return;
    }

    state.ball.pos = bp;
    state.ball.dir = bd;
    state.record_trail(bp);
}

fn push_contact(
    state: &mut SimState,
    report: &mut StepReport,
    point: Vec2,
    normal: Vec2,
    surface: Surface,
    consumed: f32,
) {
    log::trace!("Contact {:?} at ({:.2}, {:.2})", surface, point.x, point.y);
    state.record_trail(point);
    report.contacts.push(Contact {
        point,
        normal,
        surface,
        consumed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::playfield::Wall;
    use crate::sim::state::Ball;
    use proptest::prelude::*;

    fn in_flight(config: Config, pos: Vec2, dir: Vec2) -> SimState {
        let mut state = SimState::new(config);
        state.ball = Ball {
            pos,
            dir: dir.normalize(),
            radius: state.config.ball_radius,
            state: BallState::InFlight,
        };
        state
    }

    #[test]
    fn test_resting_without_launch_tracks_paddle() {
        let mut state = SimState::new(Config::default());
        let report = advance(
            &mut state,
            &TickInput {
                movement: 1.0,
                ..Default::default()
            },
            1.0 / 120.0,
        );
        assert!(report.contacts.is_empty());
        assert_eq!(state.ball.state, BallState::Resting);
        assert_eq!(state.ball.pos, state.ball.rest_position(&state.paddle));
        assert!(state.paddle.pos.x > 300.0);
    }

    #[test]
    fn test_resting_repositions_regardless_of_prior_position() {
        let mut state = SimState::new(Config::default());
        for prior in [Vec2::new(5.0, 5.0), Vec2::new(590.0, 10.0), Vec2::new(-100.0, 1e4)] {
            state.ball.pos = prior;
            advance(&mut state, &TickInput::default(), 1.0 / 120.0);
            assert_eq!(
                state.ball.pos,
                Vec2::new(state.paddle.pos.x, state.paddle.top() - state.ball.radius)
            );
        }
    }

    #[test]
    fn test_launch_moves_ball_up_and_resets_trail() {
        let mut state = SimState::new(Config::default());
        state.record_trail(Vec2::new(1.0, 1.0));
        let start = state.ball.rest_position(&state.paddle);

        let report = advance(
            &mut state,
            &TickInput {
                movement: 0.0,
                launch: true,
            },
            1.0 / 120.0,
        );
        assert!(report.launched);
        assert!(report.contacts.is_empty());
        assert_eq!(state.ball.state, BallState::InFlight);
        assert!(state.ball.pos.y < start.y);
        assert!(state.ball.pos.x > start.x);
        assert_eq!(state.trail.front().copied(), Some(start));
        assert_eq!(state.trail.len(), 2);
        assert_eq!(state.diagnostics.launches, 1);
    }

    #[test]
    fn test_top_wall_single_bounce() {
        let config = Config {
            ball_speed: 2000.0,
            ..Config::default()
        };
        let dt = 1.0 / 120.0;
        let mut state = in_flight(config, Vec2::new(300.0, 300.0), Vec2::new(0.0, -1.0));

        let mut frames = 0;
        let report = loop {
            let report = advance(&mut state, &TickInput::default(), dt);
            frames += 1;
            if !report.contacts.is_empty() || frames > 100 {
                break report;
            }
        };

        assert_eq!(report.contacts.len(), 1);
        let contact = report.contacts[0];
        assert_eq!(contact.surface, Surface::Wall(Wall::Top));
        assert!((contact.point - Vec2::new(300.0, 10.0)).length() < 1e-3);
        assert_eq!(state.ball.dir, Vec2::new(0.0, 1.0));
        assert!(state.ball.pos.y >= 10.0);
        assert!((report.consumed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_top_wall_bounce_within_frame() {
        let config = Config {
            ball_speed: 2000.0,
            ..Config::default()
        };
        let dt = 1.0 / 120.0;
        let step = 2000.0 * dt;
        let mut state = in_flight(config, Vec2::new(300.0, 20.0), Vec2::new(0.0, -1.0));

        let report = advance(&mut state, &TickInput::default(), dt);
        assert_eq!(report.contacts.len(), 1);
        assert!((report.contacts[0].point.y - 10.0).abs() < 1e-4);
        assert!((report.contacts[0].consumed - 10.0 / step).abs() < 1e-5);
        // Remaining budget carries the ball back down
        assert!((state.ball.pos.y - (10.0 + step - 10.0)).abs() < 1e-3);
        assert_eq!(state.ball.dir, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_bottom_crossing_loses_ball() {
        let mut state = in_flight(Config::default(), Vec2::new(300.0, 785.0), Vec2::new(0.0, 1.0));
        state.record_trail(Vec2::new(300.0, 700.0));

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        assert!(report.lost);
        assert_eq!(report.contacts.len(), 1);
        assert_eq!(report.contacts[0].surface, Surface::Wall(Wall::Bottom));
        assert!(report.remaining > 0.0);
        assert_eq!(state.ball.state, BallState::Resting);
        assert_eq!(state.ball.pos, state.ball.rest_position(&state.paddle));
        assert_eq!(state.diagnostics.balls_lost, 1);
        assert_eq!(state.diagnostics.bounces, 0);
        // Loss point stays in the history
        assert_eq!(state.trail.back().copied(), Some(report.contacts[0].point));
    }

    #[test]
    fn test_paddle_bounce_sends_ball_up() {
        // Paddle top at 710, expanded top edge at 700
        let mut state = in_flight(Config::default(), Vec2::new(300.0, 695.0), Vec2::new(0.0, 1.0));

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        assert_eq!(report.contacts.len(), 1);
        assert_eq!(report.contacts[0].surface, Surface::PaddleEdge(3));
        assert!((report.contacts[0].point.y - 700.0).abs() < 1e-3);
        assert_eq!(state.ball.dir, Vec2::new(0.0, -1.0));
        assert!(state.ball.pos.y < 700.0);
        assert!((report.consumed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_paddle_then_wall_in_one_frame() {
        // Paddle pushed against the left wall; ball drops onto it close to
        // the wall, bounces up-left and reaches the wall in the same frame
        let config = Config {
            ball_speed: 6000.0,
            ..Config::default()
        };
        let mut state = in_flight(config, Vec2::new(20.0, 670.0), Vec2::new(-0.3, 1.0));
        state.paddle.pos.x = 80.0;

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        let surfaces: Vec<_> = report.contacts.iter().map(|c| c.surface).collect();
        assert_eq!(surfaces, vec![Surface::PaddleEdge(3), Surface::Wall(Wall::Left)]);
        let consumed: f32 = report.contacts.iter().map(|c| c.consumed).sum();
        assert!(consumed <= report.consumed + 1e-6);
        assert!(state.ball.dir.x > 0.0 && state.ball.dir.y < 0.0);
    }

    #[test]
    fn test_wall_hit_before_paddle_keeps_ball_inside() {
        // Paddle flush against the left wall; the ball reaches the wall
        // before the paddle's top edge, then drops onto the paddle
        let mut state = in_flight(Config::default(), Vec2::new(12.0, 695.0), Vec2::new(-0.6, 0.8));
        state.paddle.pos.x = 80.0;

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        let surfaces: Vec<_> = report.contacts.iter().map(|c| c.surface).collect();
        assert_eq!(surfaces, vec![Surface::Wall(Wall::Left), Surface::PaddleEdge(3)]);
        assert!((report.contacts[0].point - Vec2::new(10.0, 697.0 + 2.0 / 3.0)).length() < 1e-3);
        assert!((report.contacts[1].point.y - 700.0).abs() < 1e-3);
        assert!((state.ball.dir - Vec2::new(0.6, -0.8)).length() < 1e-5);
        assert!((state.ball.pos - Vec2::new(14.0, 697.0)).length() < 1e-3);

        for _ in 0..500 {
            advance(&mut state, &TickInput::default(), 1.0 / 120.0);
            assert!(
                state.playfield.contains_circle(state.ball.pos, state.ball.radius - 1e-2),
                "ball escaped to {:?}",
                state.ball.pos
            );
        }
    }

    #[test]
    fn test_ball_on_wall_line_moving_out_bounces() {
        let mut state = in_flight(Config::default(), Vec2::new(10.0, 300.0), Vec2::new(-1.0, 0.0));

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        assert_eq!(report.contacts.len(), 1);
        assert_eq!(report.contacts[0].surface, Surface::Wall(Wall::Left));
        assert_eq!(report.contacts[0].consumed, 0.0);
        assert_eq!(state.ball.dir, Vec2::new(1.0, 0.0));
        assert!((state.ball.pos - Vec2::new(20.0, 300.0)).length() < 1e-4);
    }

    #[test]
    fn test_ball_past_wall_line_is_brought_back() {
        let mut state = in_flight(Config::default(), Vec2::new(6.0, 300.0), Vec2::new(-0.6, 0.8));

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        assert_eq!(report.contacts[0].surface, Surface::Wall(Wall::Left));
        assert_eq!(report.contacts[0].point, Vec2::new(10.0, 300.0));
        assert!(state.ball.dir.x > 0.0);
        assert!(state.playfield.contains_circle(state.ball.pos, state.ball.radius));
    }

    #[test]
    fn test_corner_entry_reverses_direction() {
        let mut state = in_flight(Config::default(), Vec2::new(15.0, 15.0), Vec2::new(-1.0, -1.0));

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        assert_eq!(report.contacts.len(), 1);
        assert!((report.contacts[0].point - Vec2::new(10.0, 10.0)).length() < 1e-4);
        assert!((state.ball.dir - Vec2::new(1.0, 1.0).normalize()).length() < 1e-6);
        assert!(state.playfield.contains_circle(state.ball.pos, state.ball.radius - 1e-3));
    }

    #[test]
    fn test_bounce_cap_holds_last_position() {
        let config = Config {
            ball_speed: 12000.0,
            max_bounces_per_frame: 1,
            ..Config::default()
        };
        let mut state = in_flight(config, Vec2::new(20.0, 300.0), Vec2::new(-1.0, 0.0));

        let report = advance(&mut state, &TickInput::default(), 1.0 / 120.0);
        assert!(report.capped);
        assert_eq!(report.contacts.len(), 1);
        assert!((report.remaining - 0.9).abs() < 1e-4);
        assert!((state.ball.pos - Vec2::new(10.0, 300.0)).length() < 1e-4);
        assert_eq!(state.ball.dir, Vec2::new(1.0, 0.0));
        assert_eq!(state.diagnostics.capped_frames, 1);
    }

    #[test]
    fn test_determinism_and_snapshot() {
        let mut state1 = SimState::new(Config::default());
        let mut state2 = SimState::new(Config::default());

        let inputs = [
            TickInput { movement: 0.5, launch: false },
            TickInput { movement: -1.0, launch: true },
            TickInput { movement: 1.0, launch: false },
            TickInput::default(),
        ];
        for _ in 0..50 {
            for input in &inputs {
                advance(&mut state1, input, 1.0 / 120.0);
                advance(&mut state2, input, 1.0 / 120.0);
            }
        }
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.diagnostics, state2.diagnostics);

        let json = serde_json::to_string(&state1).expect("serializes");
        let restored: SimState = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(restored.ball.pos, state1.ball.pos);
        assert_eq!(restored.paddle.pos, state1.paddle.pos);
        assert!(restored.trail.is_empty());
    }

    fn start_x() -> impl Strategy<Value = f32> {
        prop_oneof![10.0f32..25.0, 575.0f32..590.0, 10.0f32..590.0]
    }

    proptest! {
        #[test]
        fn budget_never_overspent(
            x in start_x(),
            y in 10.0f32..690.0,
            paddle_x in 80.0f32..=520.0,
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 100.0f32..20000.0,
            moves in proptest::collection::vec(-1.0f32..=1.0, 1..30),
        ) {
            let config = Config { ball_speed: speed, ..Config::default() };
            let mut state = in_flight(config, Vec2::new(x, y), Vec2::new(angle.cos(), angle.sin()));
            state.paddle.pos.x = paddle_x;
            prop_assume!(state.ball.dir.is_finite());

            for &movement in &moves {
                let report = advance(&mut state, &TickInput { movement, launch: true }, 1.0 / 120.0);
                prop_assert!(report.consumed <= 1.0 + 1e-6);
                let spent: f32 = report.contacts.iter().map(|c| c.consumed).sum();
                prop_assert!(spent <= report.consumed + 1e-5);
                if state.ball.in_movement() {
                    prop_assert!((state.ball.dir.length() - 1.0).abs() < 1e-4);
                    prop_assert!(
                        state.playfield.contains_circle(state.ball.pos, state.ball.radius - 1e-2),
                        "ball at {:?}",
                        state.ball.pos
                    );
                }
            }
        }
    }
}
