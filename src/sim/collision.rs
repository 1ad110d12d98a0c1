//! Collision detection and response
//!
//! The ball is approximated by its bounding square for every test. Walls,
//! paddle and bricks are resolved in that order each tick; at most one brick
//! is resolved per tick.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, Brick, BrickColor, Paddle};

/// Screen boundary the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
}

/// Edge of a rectangle judged to have been struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Decide which side of `rect` a ball at `center` moving along `vel` struck.
///
/// The vertical test runs first: moving down with the centre above the top
/// edge is a top hit, moving up with the centre below the bottom edge is a
/// bottom hit. Then the horizontal test the same way. When neither is
/// conclusive the hit is classified vertically by comparing the centre with
/// the rectangle's vertical midpoint.
pub fn collision_side(center: Vec2, vel: Vec2, rect: &Rect) -> CollisionSide {
    if vel.y > 0.0 && center.y < rect.top() {
        return CollisionSide::Top;
    }
    if vel.y < 0.0 && center.y > rect.bottom() {
        return CollisionSide::Bottom;
    }

    if vel.x > 0.0 && center.x < rect.left() {
        return CollisionSide::Left;
    }
    if vel.x < 0.0 && center.x > rect.right() {
        return CollisionSide::Right;
    }

    if center.y < rect.center().y {
        CollisionSide::Top
    } else {
        CollisionSide::Bottom
    }
}

/// Bounce off the left, right and top walls.
///
/// The crossed component is pointed back into the playfield, the ball is
/// nudged onto the boundary, and velocity is renormalized to the ball's
/// speed. Left/right and top are independent, so a corner yields two hits.
pub fn resolve_walls(ball: &mut Ball, screen_width: f32) -> Vec<Wall> {
    let mut hits = Vec::new();

    if ball.pos.x <= ball.radius {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = ball.radius;
        hits.push(Wall::Left);
    } else if ball.pos.x >= screen_width - ball.radius {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = screen_width - ball.radius;
        hits.push(Wall::Right);
    }

    if ball.pos.y <= ball.radius {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = ball.radius;
        hits.push(Wall::Top);
    }

    if !hits.is_empty() {
        ball.renormalize();
    }
    hits
}

/// Outcome of a paddle collision that changed the ball's velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleHit {
    pub side: CollisionSide,
    /// Bounce angle from vertical (radians) for top hits
    pub angle: Option<f32>,
}

/// Bounce off the paddle.
///
/// A top hit while falling maps the impact offset from the paddle centre,
/// normalized to `[-0.5, 0.5]`, linearly onto `±max_bounce_angle` and sends
/// the ball upward at full speed. A side hit reverses the horizontal
/// component only. Overlaps that need no response (e.g. a ball still rising
/// out of the paddle) return `None`.
pub fn resolve_paddle(
    ball: &mut Ball,
    paddle: &Paddle,
    max_bounce_angle: f32,
) -> Option<PaddleHit> {
    let rect = paddle.rect();
    if !ball.bounds().intersects(&rect) {
        return None;
    }

    match collision_side(ball.pos, ball.vel, &rect) {
        CollisionSide::Top if ball.vel.y > 0.0 => {
            let offset = ((ball.pos.x - rect.left()) / paddle.width - 0.5).clamp(-0.5, 0.5);
            let angle = max_bounce_angle * offset * 2.0;
            ball.vel = Vec2::new(ball.speed * angle.sin(), -ball.speed * angle.cos());
            log::debug!(
                "Paddle hit at offset {:.2}, angle {:.1}°",
                offset,
                angle.to_degrees()
            );
            Some(PaddleHit {
                side: CollisionSide::Top,
                angle: Some(angle),
            })
        }
        side @ (CollisionSide::Left | CollisionSide::Right) => {
            ball.vel.x = -ball.vel.x;
            ball.renormalize();
            Some(PaddleHit { side, angle: None })
        }
        _ => None,
    }
}

/// A brick destroyed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    /// Index into the brick slice
    pub index: usize,
    pub color: BrickColor,
    pub points: u32,
    pub side: CollisionSide,
}

/// Resolve the first active brick (insertion order) the ball overlaps.
///
/// The brick is deactivated, the velocity component matching the struck side
/// is reflected if the ball is moving into that side, and velocity is
/// renormalized. Scanning stops after one brick even when several overlap.
pub fn resolve_bricks(ball: &mut Ball, bricks: &mut [Brick]) -> Option<BrickHit> {
    let bounds = ball.bounds();
    let (index, brick) = bricks
        .iter_mut()
        .enumerate()
        .find(|(_, b)| b.active && b.rect.intersects(&bounds))?;

    brick.active = false;
    let side = collision_side(ball.pos, ball.vel, &brick.rect);

    match side {
        CollisionSide::Top if ball.vel.y > 0.0 => ball.vel.y = -ball.vel.y,
        CollisionSide::Bottom if ball.vel.y < 0.0 => ball.vel.y = -ball.vel.y,
        CollisionSide::Left if ball.vel.x > 0.0 => ball.vel.x = -ball.vel.x,
        CollisionSide::Right if ball.vel.x < 0.0 => ball.vel.x = -ball.vel.x,
        _ => {}
    }
    ball.renormalize();

    log::debug!("Brick {} ({:?}) hit on {:?}", index, brick.color, side);
    Some(BrickHit {
        index,
        color: brick.color,
        points: brick.points(),
        side,
    })
}
