//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are per tick)
//! - Stable iteration order (bricks in insertion order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod levels;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{
    BrickHit, CollisionSide, PaddleHit, Wall, collision_side, resolve_bricks, resolve_paddle,
    resolve_walls,
};
pub use levels::{LevelError, LevelTable, Pattern, Placement, level_layout};
pub use rect::Rect;
pub use state::{Ball, Brick, BrickColor, GameEvent, GamePhase, GameState, Paddle};
pub use tick::{TickInput, tick};
