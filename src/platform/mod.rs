//! Platform abstraction layer
//!
//! Input contract plus the mapping between the playfield and the terminal
//! character grid. The crossterm backend lives in `terminal`.

pub mod terminal;

use std::io;

use crate::sim::TickInput;

pub use terminal::TerminalInput;

/// Input state gathered since the last poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Latest known pointer x (playfield units)
    pub pointer_x: Option<f32>,
    /// Primary action pressed (click / space / enter)
    pub primary: bool,
    /// Quit requested
    pub quit: bool,
}

impl InputSnapshot {
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            pointer_x: self.pointer_x,
            action: self.primary,
        }
    }
}

/// Source of per-frame input
pub trait InputSource {
    /// Gather pending events without blocking
    fn poll(&mut self) -> io::Result<InputSnapshot>;
}

/// Playfield to character-grid mapping. Row 0 is the HUD; the playfield
/// fills the rows below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub world_width: f32,
    pub world_height: f32,
}

impl Viewport {
    pub const HUD_ROWS: u16 = 1;

    pub fn new(cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(Self::HUD_ROWS + 1),
            world_width,
            world_height,
        }
    }

    pub fn field_rows(&self) -> u16 {
        self.rows - Self::HUD_ROWS
    }

    /// Playfield x at the centre of a column
    pub fn col_to_x(&self, col: u16) -> f32 {
        (f32::from(col) + 0.5) * self.world_width / f32::from(self.cols)
    }

    pub fn x_to_col(&self, x: f32) -> u16 {
        let col = (x / self.world_width * f32::from(self.cols)).floor();
        col.clamp(0.0, f32::from(self.cols - 1)) as u16
    }

    /// Screen row for a playfield y (below the HUD)
    pub fn y_to_row(&self, y: f32) -> u16 {
        let rows = self.field_rows();
        let row = (y / self.world_height * f32::from(rows)).floor();
        Self::HUD_ROWS + row.clamp(0.0, f32::from(rows - 1)) as u16
    }

    /// Columns spanned by `[x, x + width)`, at least one
    pub fn span_cols(&self, x: f32, width: f32) -> (u16, u16) {
        let start = self.x_to_col(x);
        let end = self.x_to_col(x + width * 0.999);
        (start, end.max(start))
    }
}
