//! Rendering module
//!
//! The core hands the renderer a read-only `Frame` each loop iteration and
//! never reads anything back.

pub mod terminal;

use std::io;

use glam::Vec2;

use crate::sim::{Brick, GamePhase, GameState, Rect};

pub use terminal::{TerminalGuard, TerminalRenderer};

/// Text shown over the playfield for the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    LevelReady { level: u32 },
    LevelComplete { cleared: u32 },
    GameOver { score: u64 },
    Won { score: u64 },
}

impl Overlay {
    pub fn for_state(state: &GameState) -> Option<Self> {
        match state.phase {
            GamePhase::StartScreen => Some(Overlay::Start),
            GamePhase::LevelLoad => Some(Overlay::LevelReady { level: state.level }),
            // The next level is already loaded by the time this renders
            GamePhase::LevelComplete => Some(Overlay::LevelComplete {
                cleared: state.level.saturating_sub(1),
            }),
            GamePhase::Running => None,
            GamePhase::GameOver => Some(Overlay::GameOver { score: state.score }),
            GamePhase::Won => Some(Overlay::Won { score: state.score }),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match *self {
            Overlay::Start => vec!["Click to Start".to_string()],
            Overlay::LevelReady { level } => {
                vec![format!("Level {}", level), "Click to Launch".to_string()]
            }
            Overlay::LevelComplete { cleared } => vec![
                format!("Level {} Complete!", cleared),
                "Click to Continue".to_string(),
            ],
            Overlay::GameOver { score } => vec![
                "GAME OVER".to_string(),
                format!("Final Score: {}", score),
                "Click to Restart".to_string(),
            ],
            Overlay::Won { score } => vec![
                "Congratulations, you win!".to_string(),
                format!("Final Score: {}", score),
                "Click to Restart".to_string(),
            ],
        }
    }
}

/// Drawable snapshot of one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub phase: GamePhase,
    pub field: Vec2,
    pub paddle: Rect,
    pub ball_center: Vec2,
    pub ball_radius: f32,
    pub bricks: &'a [Brick],
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub overlay: Option<Overlay>,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            field: Vec2::new(state.settings.screen_width, state.settings.screen_height),
            paddle: state.paddle.rect(),
            ball_center: state.ball.pos,
            ball_radius: state.ball.radius,
            bricks: &state.bricks,
            score: state.score,
            high_score: state.high_score,
            level: state.level,
            overlay: Overlay::for_state(state),
        }
    }

    pub fn active_bricks(&self) -> impl Iterator<Item = &'a Brick> {
        self.bricks.iter().filter(|b| b.active)
    }
}

/// Presents frames
pub trait Renderer {
    fn present(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}
