//! Game state and core simulation types
//!
//! The whole session lives in one owned `GameState`; the game loop is its only
//! mutator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Wall;
use super::levels::LevelError;
use super::rect::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start trigger
    StartScreen,
    /// Level bricks loaded, ball resting on the paddle until launch
    LevelLoad,
    /// Active gameplay
    Running,
    /// Level cleared; the next level is already loaded
    LevelComplete,
    /// Ball fell past the paddle
    GameOver,
    /// Final level cleared
    Won,
}

impl GamePhase {
    /// Whether the paddle follows the pointer in this phase
    pub fn tracks_pointer(self) -> bool {
        matches!(self, GamePhase::LevelLoad | GamePhase::Running)
    }
}

/// Discrete things that happened during a tick.
///
/// Collaborators (audio, persistence) react to these; the simulation never
/// calls out to them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    WallBounce(Wall),
    PaddleBounce,
    BrickBroken {
        color: BrickColor,
        points: u32,
    },
    Launched,
    LevelStarted { level: u32 },
    LevelComplete { cleared: u32 },
    BallLost,
    GameOver { score: u64 },
    Won { score: u64 },
    /// The session's high score was raised and should be persisted
    NewHighScore(u64),
}

/// Brick palette. Point value is fixed by color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrickColor {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
}

impl BrickColor {
    /// Palette order used when cycling colors by row/column
    pub const PALETTE: [BrickColor; 5] = [
        BrickColor::Red,
        BrickColor::Green,
        BrickColor::Blue,
        BrickColor::Orange,
        BrickColor::Yellow,
    ];

    /// Palette entry for a cycle index (wraps)
    pub fn cycle(index: u32) -> Self {
        Self::PALETTE[index as usize % Self::PALETTE.len()]
    }

    pub fn points(self) -> u32 {
        match self {
            BrickColor::Red => 5,
            BrickColor::Green => 4,
            BrickColor::Blue => 3,
            BrickColor::Orange => 2,
            BrickColor::Yellow => 1,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            BrickColor::Red => (255, 0, 0),
            BrickColor::Green => (0, 255, 0),
            BrickColor::Blue => (0, 0, 255),
            BrickColor::Orange => (255, 165, 0),
            BrickColor::Yellow => (255, 255, 0),
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle centred horizontally, flush with the bottom of the screen
    pub fn new(screen_width: f32, screen_height: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(screen_width / 2.0 - width / 2.0, screen_height - height),
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::new(self.width, self.height),
        }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Centre the paddle under the pointer, clamped to `[0, screen_width - width]`
    pub fn track(&mut self, pointer_x: f32, screen_width: f32) {
        let max_x = (screen_width - self.width).max(0.0);
        self.pos.x = (pointer_x - self.width / 2.0).min(max_x).max(0.0);
    }
}

/// The ball. `|vel| == speed` is re-established after every collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in units per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Scalar speed the velocity is renormalized to
    pub speed: f32,
}

impl Ball {
    pub fn new(radius: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            speed,
        }
    }

    /// Bounding square used for every collision test
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Advance one tick
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Rescale velocity to the current speed, keeping direction
    pub fn renormalize(&mut self) {
        self.vel = self.vel.normalize_or(Vec2::NEG_Y) * self.speed;
    }

    /// Raise speed by a percentage and carry it into the velocity
    pub fn increase_speed(&mut self, percent: f32) {
        self.speed *= 1.0 + percent / 100.0;
        if self.vel != Vec2::ZERO {
            self.renormalize();
        }
    }

    /// Park the ball centred on top of the paddle
    pub fn rest_on(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius - 1.0);
    }

    /// Launch up and to the right at 45 degrees
    pub fn launch(&mut self) {
        self.vel = Vec2::new(1.0, -1.0).normalize() * self.speed;
    }

    /// Whether the ball has fully left the bottom of the screen
    pub fn fell_below(&self, screen_height: f32) -> bool {
        self.pos.y - self.radius > screen_height
    }
}

/// A brick. Deactivated on hit; the set is replaced wholesale on level load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: BrickColor,
    pub active: bool,
}

impl Brick {
    pub fn new(pos: Vec2, color: BrickColor) -> Self {
        Self {
            rect: Rect {
                pos,
                size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            },
            color,
            active: true,
        }
    }

    pub fn points(&self) -> u32 {
        self.color.points()
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Engine parameters for this session
    pub settings: Settings,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Bricks in insertion order (collision scan order)
    pub bricks: Vec<Brick>,
    /// Events recorded since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on the start screen with level 1 loaded
    pub fn new(settings: Settings, high_score: u64) -> Result<Self, LevelError> {
        let paddle = Paddle::new(
            settings.screen_width,
            settings.screen_height,
            settings.paddle_width,
            settings.paddle_height,
        );
        let ball = Ball::new(settings.ball_radius, settings.ball_start_speed);
        let mut state = Self {
            settings,
            phase: GamePhase::StartScreen,
            level: 1,
            score: 0,
            high_score,
            time_ticks: 0,
            paddle,
            ball,
            bricks: Vec::new(),
            events: Vec::new(),
        };
        state.load_level(1)?;
        Ok(state)
    }

    /// Number of levels in the layout table
    pub fn level_count(&self) -> u32 {
        self.settings.layouts.len()
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.level_count()
    }

    /// Active bricks left in the current level
    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!(
                "Phase {:?} -> {:?} (level {})",
                self.phase,
                phase,
                self.level
            );
            self.phase = phase;
        }
    }

    /// Replace the brick set with the layout for `level` and apply the speed schedule.
    ///
    /// Level 1 resets the ball to its base speed; every later level raises it
    /// once by the configured percentage.
    pub fn load_level(&mut self, level: u32) -> Result<(), LevelError> {
        let bricks = self.settings.layouts.bricks(level)?;
        self.level = level;
        self.bricks = bricks;

        if level == 1 {
            self.ball.speed = self.settings.ball_start_speed;
        } else {
            let pct = self.settings.speed_increase_percent;
            self.ball.increase_speed(pct);
        }
        self.ball.vel = Vec2::ZERO;
        self.ball.rest_on(&self.paddle);

        log::info!(
            "Loaded level {} ({} bricks, ball speed {:.2})",
            level,
            self.bricks.len(),
            self.ball.speed
        );
        self.events.push(GameEvent::LevelStarted { level });
        Ok(())
    }

    /// Back to level 1 with a zero score and a fresh ball
    pub fn reset(&mut self) -> Result<(), LevelError> {
        self.score = 0;
        self.ball = Ball::new(self.settings.ball_radius, self.settings.ball_start_speed);
        self.load_level(1)
    }

    /// Raise the high score if this session beat it.
    ///
    /// Returns true when a new high score was recorded.
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
            log::info!("New high score: {}", self.score);
            true
        } else {
            false
        }
    }

    /// Take the events recorded so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_on_title_with_level_one() {
        let state = GameState::new(Settings::default(), 42).unwrap();
        assert_eq!(state.phase, GamePhase::StartScreen);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 42);
        assert_eq!(state.bricks.len(), 80);
        assert_eq!(state.ball.speed, BALL_START_SPEED);
    }

    #[test]
    fn test_paddle_starts_centred_at_bottom() {
        let paddle = Paddle::new(SCREEN_WIDTH, SCREEN_HEIGHT, PADDLE_WIDTH, PADDLE_HEIGHT);
        assert_eq!(paddle.pos, Vec2::new(350.0, 585.0));
        assert_eq!(paddle.center_x(), 400.0);
    }

    #[test]
    fn test_paddle_track_clamps() {
        let mut paddle = Paddle::new(SCREEN_WIDTH, SCREEN_HEIGHT, PADDLE_WIDTH, PADDLE_HEIGHT);
        paddle.track(-500.0, SCREEN_WIDTH);
        assert_eq!(paddle.pos.x, 0.0);
        paddle.track(5000.0, SCREEN_WIDTH);
        assert_eq!(paddle.pos.x, SCREEN_WIDTH - PADDLE_WIDTH);
        paddle.track(200.0, SCREEN_WIDTH);
        assert_eq!(paddle.pos.x, 150.0);
    }

    #[test]
    fn test_ball_rests_on_paddle() {
        let paddle = Paddle::new(SCREEN_WIDTH, SCREEN_HEIGHT, PADDLE_WIDTH, PADDLE_HEIGHT);
        let mut ball = Ball::new(BALL_RADIUS, BALL_START_SPEED);
        ball.rest_on(&paddle);
        assert_eq!(ball.pos, Vec2::new(400.0, 574.0));
        assert!(!ball.bounds().intersects(&paddle.rect()));
    }

    #[test]
    fn test_increase_speed_rescales_velocity() {
        let mut ball = Ball::new(BALL_RADIUS, 5.0);
        ball.launch();
        ball.increase_speed(8.0);
        assert!((ball.speed - 5.4).abs() < 1e-5);
        assert!((ball.vel.length() - ball.speed).abs() < 1e-4);
    }

    #[test]
    fn test_brick_points_by_color() {
        let points: Vec<u32> = BrickColor::PALETTE.iter().map(|c| c.points()).collect();
        assert_eq!(points, vec![5, 4, 3, 2, 1]);
        assert_eq!(BrickColor::cycle(7), BrickColor::Blue);
    }

    #[test]
    fn test_load_level_applies_speed_once_per_level() {
        let mut state = GameState::new(Settings::default(), 0).unwrap();
        state.load_level(2).unwrap();
        state.load_level(3).unwrap();
        let expected = BALL_START_SPEED * 1.08 * 1.08;
        assert!((state.ball.speed - expected).abs() < 1e-4);

        state.reset().unwrap();
        assert_eq!(state.ball.speed, BALL_START_SPEED);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_record_high_score_only_increases() {
        let mut state = GameState::new(Settings::default(), 100).unwrap();
        state.score = 80;
        assert!(!state.record_high_score());
        assert_eq!(state.high_score, 100);

        state.score = 120;
        assert!(state.record_high_score());
        assert_eq!(state.high_score, 120);
        assert!(state.drain_events().contains(&GameEvent::NewHighScore(120)));
    }
}
