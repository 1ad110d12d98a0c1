//! crossterm input backend
//!
//! Mouse motion drives the pointer; left click, Space and Enter are the
//! primary action; the arrow keys nudge the pointer for keyboard-only play.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use super::{InputSnapshot, InputSource, Viewport};

/// Pointer step per arrow key press (playfield units)
pub const NUDGE: f32 = 25.0;

pub struct TerminalInput {
    viewport: Viewport,
    pointer_x: Option<f32>,
}

impl TerminalInput {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pointer_x: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fold one terminal event into the snapshot being built
    pub fn apply(&mut self, event: Event, snapshot: &mut InputSnapshot) {
        match event {
            Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    self.pointer_x = Some(self.viewport.col_to_x(column));
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    self.pointer_x = Some(self.viewport.col_to_x(column));
                    snapshot.primary = true;
                }
                _ => {}
            },
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                if kind == KeyEventKind::Release {
                    return;
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => snapshot.quit = true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        snapshot.quit = true;
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => snapshot.primary = true,
                    KeyCode::Left => self.nudge(-NUDGE),
                    KeyCode::Right => self.nudge(NUDGE),
                    _ => {}
                }
            }
            Event::Resize(cols, rows) => {
                self.viewport = Viewport::new(
                    cols,
                    rows,
                    self.viewport.world_width,
                    self.viewport.world_height,
                );
                log::debug!("Terminal resized to {}x{}", cols, rows);
            }
            _ => {}
        }
    }

    fn nudge(&mut self, dx: f32) {
        let x = self.pointer_x.unwrap_or(self.viewport.world_width / 2.0);
        self.pointer_x = Some((x + dx).clamp(0.0, self.viewport.world_width));
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<InputSnapshot> {
        let mut snapshot = InputSnapshot::default();
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            self.apply(ev, &mut snapshot);
        }
        snapshot.pointer_x = self.pointer_x;
        Ok(snapshot)
    }
}
