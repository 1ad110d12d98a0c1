//! crossterm renderer
//!
//! Scales the playfield onto the character grid: row 0 carries the HUD,
//! the rest is the field. All terminal output for a frame is queued and
//! flushed once.

use std::io::{self, Write};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{self, Color, Print},
    terminal,
};

use super::{Frame, Overlay, Renderer};
use crate::platform::Viewport;
use crate::sim::{BrickColor, GamePhase};

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HIGH: Color = Color::Cyan;
const C_HUD_LEVEL: Color = Color::White;
const C_PADDLE: Color = Color::White;
const C_BALL: Color = Color::White;
const C_OVERLAY: Color = Color::White;
const C_GAME_OVER: Color = Color::Red;
const C_WON: Color = Color::Green;

fn brick_color(color: BrickColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb { r, g, b }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    /// Re-read the terminal size every frame
    follow_terminal: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer sized to the current terminal
    pub fn new(out: W, world_width: f32, world_height: f32) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            viewport: Viewport::new(cols, rows, world_width, world_height),
            follow_terminal: true,
        })
    }

    /// Renderer with a fixed grid
    pub fn with_viewport(out: W, viewport: Viewport) -> Self {
        Self {
            out,
            viewport,
            follow_terminal: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_hud(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let cols = self.viewport.cols;

        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!("Score: {}", frame.score)))?;

        let high = format!("High Score: {}", frame.high_score);
        let hx = (cols / 2).saturating_sub(high.chars().count() as u16 / 2);
        self.out.queue(cursor::MoveTo(hx, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_HIGH))?;
        self.out.queue(Print(&high))?;

        let level = format!("Level: {}", frame.level);
        let lx = cols.saturating_sub(level.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(lx, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
        self.out.queue(Print(&level))?;
        Ok(())
    }

    fn draw_bricks(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        for brick in frame.active_bricks() {
            let rect = brick.rect;
            let (start, end) = self.viewport.span_cols(rect.left(), rect.size.x);
            let row = self.viewport.y_to_row(rect.top());
            let width = usize::from(end - start + 1);

            // Right edge drawn as a half block so neighbours stay distinct
            let sprite = if width > 1 {
                format!("{}▌", "█".repeat(width - 1))
            } else {
                "█".to_string()
            };
            self.out.queue(cursor::MoveTo(start, row))?;
            let color = brick_color(brick.color);
            self.out.queue(style::SetForegroundColor(color))?;
            self.out.queue(Print(sprite))?;
        }
        Ok(())
    }

    fn draw_paddle(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let paddle = &frame.paddle;
        let (start, end) = self.viewport.span_cols(paddle.left(), paddle.size.x);
        let row = self.viewport.y_to_row(paddle.top());
        self.out.queue(cursor::MoveTo(start, row))?;
        self.out.queue(style::SetForegroundColor(C_PADDLE))?;
        self.out.queue(Print("▀".repeat(usize::from(end - start + 1))))?;
        Ok(())
    }

    fn draw_ball(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        // Only in play, and not once it fell out of the field
        if !matches!(frame.phase, GamePhase::LevelLoad | GamePhase::Running)
            || frame.ball_center.y - frame.ball_radius > frame.field.y
        {
            return Ok(());
        }
        let col = self.viewport.x_to_col(frame.ball_center.x);
        let row = self.viewport.y_to_row(frame.ball_center.y);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(C_BALL))?;
        self.out.queue(Print("●"))?;
        Ok(())
    }

    fn draw_overlay(&mut self, overlay: Overlay) -> io::Result<()> {
        let lines = overlay.lines();
        let headline = match overlay {
            Overlay::GameOver { .. } => C_GAME_OVER,
            Overlay::Won { .. } => C_WON,
            _ => C_OVERLAY,
        };

        let cx = self.viewport.cols / 2;
        let field_mid = Viewport::HUD_ROWS + self.viewport.field_rows() / 2;
        let start_row = field_mid.saturating_sub(lines.len() as u16 / 2);

        for (i, line) in lines.iter().enumerate() {
            let col = cx.saturating_sub(line.chars().count() as u16 / 2);
            let color = if i == 0 { headline } else { C_OVERLAY };
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(color))?;
            self.out.queue(Print(line))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn present(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        if self.follow_terminal
            && let Ok((cols, rows)) = terminal::size()
        {
            self.viewport = Viewport::new(cols, rows, frame.field.x, frame.field.y);
        }

        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_hud(frame)?;
        self.draw_bricks(frame)?;
        self.draw_paddle(frame)?;
        self.draw_ball(frame)?;
        if let Some(overlay) = frame.overlay {
            self.draw_overlay(overlay)?;
        }

        // Park cursor and flush
        self.out.queue(style::ResetColor)?;
        let bottom = self.viewport.rows.saturating_sub(1);
        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out.flush()
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
