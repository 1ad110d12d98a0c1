//! End-to-end scenarios through the public API

use std::io;

use brick_breaker::audio::{AudioSink, Tone};
use brick_breaker::consts::*;
use brick_breaker::platform::{InputSnapshot, InputSource};
use brick_breaker::renderer::{Frame, Renderer};
use brick_breaker::sim::{GameEvent, GamePhase, GameState, Paddle, TickInput, Wall, tick};
use brick_breaker::{Game, MemoryStore, Settings};
use glam::Vec2;
use proptest::prelude::*;

struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> io::Result<InputSnapshot> {
        Ok(InputSnapshot::default())
    }
}

struct NoScreen;

impl Renderer for NoScreen {
    fn present(&mut self, _frame: &Frame<'_>) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Tones(Vec<Tone>);

impl AudioSink for Tones {
    fn play(&mut self, tone: Tone) {
        self.0.push(tone);
    }
}

fn game(store: MemoryStore) -> Game<NoInput, NoScreen, Tones, MemoryStore> {
    Game::new(
        Settings::default(),
        NoInput,
        NoScreen,
        Tones::default(),
        store,
    )
    .unwrap()
}

fn click() -> InputSnapshot {
    InputSnapshot {
        primary: true,
        ..Default::default()
    }
}

fn running(settings: Settings) -> GameState {
    let mut state = GameState::new(settings, 0).unwrap();
    let action = TickInput {
        action: true,
        ..Default::default()
    };
    tick(&mut state, &action).unwrap();
    tick(&mut state, &action).unwrap();
    assert_eq!(state.phase, GamePhase::Running);
    state.drain_events();
    state
}

/// Aim the ball at the centre of brick `index` so the next tick breaks it
fn aim_at_brick(state: &mut GameState, index: usize) {
    let target = state.bricks[index].rect.center();
    let vel = Vec2::new(0.0, -state.ball.speed);
    state.ball.vel = vel;
    state.ball.pos = target - vel;
}

#[test]
fn clearing_level_one_scores_240() {
    let mut state = running(Settings::default());

    // Bottom row first so the ball never passes through another brick
    for index in (0..state.bricks.len()).rev() {
        aim_at_brick(&mut state, index);
        tick(&mut state, &TickInput::default()).unwrap();
    }

    assert_eq!(state.score, 240);
    assert_eq!(state.level, 2);
    assert_eq!(state.phase, GamePhase::LevelLoad);
    let broken = state
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::BrickBroken { .. }))
        .count();
    assert_eq!(broken, 80);
}

#[test]
fn free_flight_moves_by_velocity() {
    let mut state = running(Settings::default());
    state.ball.pos = Vec2::new(400.0, 300.0);
    state.ball.vel = Vec2::new(5.0, -5.0);

    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(state.ball.pos, Vec2::new(405.0, 295.0));
    assert_eq!(state.ball.vel, Vec2::new(5.0, -5.0));
}

#[test]
fn left_wall_flips_and_clamps() {
    let mut state = running(Settings::default());
    state.ball.pos = Vec2::new(12.0, 300.0);
    state.ball.vel = Vec2::new(-3.0, -4.0);

    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(state.ball.pos.x, BALL_RADIUS);
    assert!(state.ball.vel.x > 0.0);
    assert!((state.ball.vel.length() - state.ball.speed).abs() < 1e-4);
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::WallBounce(Wall::Left))
    );
}

#[test]
fn overlapping_bricks_break_one_per_tick() {
    let mut state = running(Settings::default());
    // Straddles the seam between the first two bricks of the bottom row
    state.ball.pos = Vec2::new(50.0, 160.0);
    state.ball.vel = Vec2::new(0.0, -state.ball.speed);

    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(state.bricks_remaining(), 79);
}

#[test]
fn game_over_persists_high_score_once() {
    let mut game = game(MemoryStore::with_score(100));
    game.step(&click()).unwrap();
    game.step(&click()).unwrap();

    let state = game.state_mut();
    state.score = 120;
    state.ball.pos = Vec2::new(400.0, 700.0);
    state.ball.vel = Vec2::new(0.0, 5.0);

    for _ in 0..10 {
        game.step(&InputSnapshot::default()).unwrap();
    }
    assert_eq!(game.state().phase, GamePhase::GameOver);
    assert_eq!(game.state().high_score, 120);
    assert_eq!(game.store().high_score, 120);
    assert_eq!(game.store().writes, 1);

    // Restart keeps the high score and starts over
    game.step(&click()).unwrap();
    assert_eq!(game.state().phase, GamePhase::StartScreen);
    assert_eq!(game.state().score, 0);
    assert_eq!(game.state().high_score, 120);
}

#[test]
fn level_three_clear_loads_level_four_faster() {
    let mut state = running(Settings::default());
    state.load_level(3).unwrap();
    state.set_phase(GamePhase::Running);
    state.ball.launch();
    let speed = state.ball.speed;
    for brick in &mut state.bricks {
        brick.active = false;
    }

    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(state.phase, GamePhase::LevelLoad);
    assert_eq!(state.level, 4);
    let expected = speed * (1.0 + SPEED_INCREASE_PERCENT / 100.0);
    assert!((state.ball.speed - expected).abs() < 1e-4);
}

#[test]
fn autopilot_keeps_speed_invariant() {
    let mut game = game(MemoryStore::default());
    game.step(&click()).unwrap();

    for _ in 0..3000 {
        let state = game.state();
        let input = InputSnapshot {
            pointer_x: Some(state.ball.pos.x),
            primary: state.phase == GamePhase::LevelLoad,
            quit: false,
        };
        let score_before = state.score;
        game.step(&input).unwrap();

        let state = game.state();
        assert_ne!(state.phase, GamePhase::GameOver);
        assert!(state.score >= score_before);
        if state.phase == GamePhase::Running {
            let error = (state.ball.vel.length() - state.ball.speed).abs();
            assert!(error < 1e-3 * state.ball.speed, "speed drifted by {error}");
        }
    }

    assert!(game.state().score > 0);
    assert!(!game.audio().sink().0.is_empty());
}

proptest! {
    #[test]
    fn paddle_stays_on_screen(pointer in -5_000.0f32..5_000.0) {
        let mut paddle = Paddle::new(SCREEN_WIDTH, SCREEN_HEIGHT, PADDLE_WIDTH, PADDLE_HEIGHT);
        paddle.track(pointer, SCREEN_WIDTH);
        prop_assert!(paddle.pos.x >= 0.0);
        prop_assert!(paddle.pos.x <= SCREEN_WIDTH - PADDLE_WIDTH);
    }

    #[test]
    fn pointer_input_is_clamped_while_running(pointer in -5_000.0f32..5_000.0) {
        let mut state = running(Settings::default());
        let input = TickInput { pointer_x: Some(pointer), action: false };
        tick(&mut state, &input).unwrap();
        prop_assert!(state.paddle.pos.x >= 0.0);
        prop_assert!(state.paddle.pos.x <= SCREEN_WIDTH - PADDLE_WIDTH);
    }
}
