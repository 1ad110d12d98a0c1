//! Fixed timestep simulation tick
//!
//! One call advances the state machine by exactly one tick:
//! input → paddle → ball → walls → paddle → bricks → win/loss → transition.

use super::collision::{resolve_bricks, resolve_paddle, resolve_walls};
use super::levels::LevelError;
use super::state::{GameEvent, GamePhase, GameState};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest known pointer x (playfield units)
    pub pointer_x: Option<f32>,
    /// Primary action (click / space): start, launch, advance, restart
    pub action: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Fails only when a level transition asks the layout table for a level it
/// does not define.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), LevelError> {
    state.time_ticks += 1;

    // Paddle ignores the pointer outside LevelLoad/Running
    if state.phase.tracks_pointer()
        && let Some(x) = input.pointer_x
    {
        state.paddle.track(x, state.settings.screen_width);
    }

    match state.phase {
        GamePhase::StartScreen => {
            if input.action {
                state.ball.rest_on(&state.paddle);
                state.set_phase(GamePhase::LevelLoad);
            }
        }

        GamePhase::LevelLoad => {
            // Ball rides on the paddle until launch
            state.ball.rest_on(&state.paddle);
            if input.action {
                state.ball.launch();
                state.events.push(GameEvent::Launched);
                state.set_phase(GamePhase::Running);
            }
        }

        GamePhase::Running => step_running(state)?,

        // Only lingers here when auto-advance is off
        GamePhase::LevelComplete => {
            if input.action {
                state.ball.rest_on(&state.paddle);
                state.set_phase(GamePhase::LevelLoad);
            }
        }

        GamePhase::GameOver | GamePhase::Won => {
            if input.action {
                state.reset()?;
                state.set_phase(GamePhase::StartScreen);
            }
        }
    }

    Ok(())
}

fn step_running(state: &mut GameState) -> Result<(), LevelError> {
    state.ball.advance();

    for wall in resolve_walls(&mut state.ball, state.settings.screen_width) {
        state.events.push(GameEvent::WallBounce(wall));
    }

    let max_angle = state.settings.max_bounce_angle();
    if resolve_paddle(&mut state.ball, &state.paddle, max_angle).is_some() {
        state.events.push(GameEvent::PaddleBounce);
    }

    if let Some(hit) = resolve_bricks(&mut state.ball, &mut state.bricks) {
        state.score += u64::from(hit.points);
        state.events.push(GameEvent::BrickBroken {
            color: hit.color,
            points: hit.points,
        });
    }

    if state.bricks_remaining() == 0 {
        return complete_level(state);
    }

    if state.ball.fell_below(state.settings.screen_height) {
        state.events.push(GameEvent::BallLost);
        state.set_phase(GamePhase::GameOver);
        let score = state.score;
        state.events.push(GameEvent::GameOver { score });
        state.record_high_score();
    }

    Ok(())
}

/// All bricks cleared: win on the final level, otherwise load the next one.
///
/// Entering LevelComplete increments the level and loads its layout (with the
/// per-level speed increase) before anything renders.
fn complete_level(state: &mut GameState) -> Result<(), LevelError> {
    if state.is_final_level() {
        state.set_phase(GamePhase::Won);
        state.events.push(GameEvent::Won { score: state.score });
        if state.settings.persist_on_win {
            state.record_high_score();
        }
        return Ok(());
    }

    let cleared = state.level;
    state.set_phase(GamePhase::LevelComplete);
    state.events.push(GameEvent::LevelComplete { cleared });
    state.load_level(cleared + 1)?;

    if state.settings.auto_advance {
        state.set_phase(GamePhase::LevelLoad);
    }
    Ok(())
}
