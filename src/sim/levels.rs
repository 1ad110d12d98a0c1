//! Procedural brick layouts
//!
//! Every pattern is a closed-form placement rule over the 16-column grid
//! (50 units per column, 20 per row, rows starting at y = 50). Layouts are
//! pure: the same level always yields the same ordered placements.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{Brick, BrickColor};
use crate::consts::{BRICK_COLUMNS, BRICK_HEIGHT, BRICK_TOP, BRICK_WIDTH};

/// Requesting a layout the table does not define
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {level} is outside the layout table (levels 1..={levels})")]
    OutOfRange { level: u32, levels: u32 },
}

/// A brick position (top-left) and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub color: BrickColor,
}

/// The ten layout rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Five full rows, one color per row
    UniformRows,
    /// Five full rows, color cycles along the diagonals
    Checkerboard,
    /// Two mirrored clusters over two full rows
    SymmetricClusters,
    Diamond,
    /// Rows with every fourth column open and staggered holes
    GappedGrid,
    HollowRectangle,
    Pyramid,
    Towers,
    /// Column-colored left half, row-colored right half, open centre
    MirroredCheckerboard,
    /// Color bands by grid distance from the centre
    DistanceRings,
}

impl Pattern {
    /// All patterns in level order
    pub const ALL: [Pattern; 10] = [
        Pattern::UniformRows,
        Pattern::Checkerboard,
        Pattern::SymmetricClusters,
        Pattern::Diamond,
        Pattern::GappedGrid,
        Pattern::HollowRectangle,
        Pattern::Pyramid,
        Pattern::Towers,
        Pattern::MirroredCheckerboard,
        Pattern::DistanceRings,
    ];

    /// Ordered placements for this pattern
    pub fn placements(self) -> Vec<Placement> {
        let mut out = Vec::new();
        let cols = BRICK_COLUMNS;

        match self {
            Pattern::UniformRows => {
                for row in 0..5 {
                    for col in 0..cols {
                        out.push(place(row, col, BrickColor::cycle(row)));
                    }
                }
            }
            Pattern::Checkerboard => {
                for row in 0..5 {
                    for col in 0..cols {
                        out.push(place(row, col, BrickColor::cycle(row + col)));
                    }
                }
            }
            Pattern::SymmetricClusters => {
                for row in 0..3 {
                    for col in 0..cols {
                        let outside = col < 3 || col > 12;
                        let notch = row == 1 && (col < 6 || col > 9);
                        if outside || notch {
                            continue;
                        }
                        out.push(place(row, col, BrickColor::cycle(row)));
                    }
                }
                for row in 5..7 {
                    for col in 0..cols {
                        out.push(place(row, col, BrickColor::cycle(col)));
                    }
                }
            }
            Pattern::Diamond => {
                let rows: u32 = 9;
                for row in 0..rows {
                    let width = rows - (rows / 2).abs_diff(row);
                    let start = (cols - width) / 2;
                    for i in 0..width {
                        out.push(place(row, start + i, BrickColor::cycle(row + i)));
                    }
                }
            }
            Pattern::GappedGrid => {
                for row in 0..6 {
                    for col in 0..cols {
                        if col % 4 == 0 || (row % 2 == 0 && col % 4 == 2) {
                            continue;
                        }
                        out.push(place(row, col, BrickColor::cycle(row + col)));
                    }
                }
            }
            Pattern::HollowRectangle => {
                for row in 0..9 {
                    for col in 0..cols {
                        if (2..=6).contains(&row) && (3..=12).contains(&col) {
                            continue;
                        }
                        out.push(place(row, col, BrickColor::cycle(col)));
                    }
                }
            }
            Pattern::Pyramid => {
                let height = 8;
                for row in 0..height {
                    let width = cols - (height - 1 - row) * 2;
                    let start = (cols - width) / 2;
                    let color = BrickColor::cycle(row);
                    for col in start..start + width {
                        out.push(place(row, col, color));
                    }
                }
            }
            Pattern::Towers => {
                let (tower_width, tower_height, towers, spacing) = (3, 10, 4, 1);
                for tower in 0..towers {
                    let start = tower * (tower_width + spacing);
                    for row in 0..tower_height {
                        let color = BrickColor::cycle(row + tower);
                        for col in start..start + tower_width {
                            out.push(place(row, col, color));
                        }
                    }
                }
            }
            Pattern::MirroredCheckerboard => {
                let half = cols / 2;
                for row in 2..10 {
                    for col in 0..cols {
                        if col == half - 1 || col == half {
                            continue;
                        }
                        let color = if col < half {
                            BrickColor::cycle(col)
                        } else {
                            BrickColor::cycle(row)
                        };
                        out.push(place(row, col, color));
                    }
                }
            }
            Pattern::DistanceRings => {
                let (first_row, rows): (u32, u32) = (2, 16);
                let (center_left, center_right) = (cols / 2 - 1, cols / 2);
                let center_top = (first_row + rows) / 2;
                let center_bottom = center_top + 1;
                for row in first_row..first_row + rows {
                    for col in 0..cols {
                        let horizontal = col.abs_diff(center_left).min(col.abs_diff(center_right));
                        let vertical = row.abs_diff(center_top).min(row.abs_diff(center_bottom));
                        out.push(place(row, col, BrickColor::cycle(horizontal + vertical)));
                    }
                }
            }
        }

        out
    }
}

fn place(row: u32, col: u32, color: BrickColor) -> Placement {
    Placement {
        pos: Vec2::new(
            col as f32 * BRICK_WIDTH,
            row as f32 * BRICK_HEIGHT + BRICK_TOP,
        ),
        color,
    }
}

/// Level-number to pattern table. Its length is the number of levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    patterns: Vec<Pattern>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::extended()
    }
}

impl LevelTable {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// All ten patterns, one per level
    pub fn extended() -> Self {
        Self::new(Pattern::ALL.to_vec())
    }

    /// The first five patterns
    pub fn classic() -> Self {
        Self::new(Pattern::ALL[..5].to_vec())
    }

    pub fn len(&self) -> u32 {
        self.patterns.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern for a 1-based level number
    pub fn pattern(&self, level: u32) -> Result<Pattern, LevelError> {
        level
            .checked_sub(1)
            .and_then(|i| self.patterns.get(i as usize))
            .copied()
            .ok_or(LevelError::OutOfRange {
                level,
                levels: self.len(),
            })
    }

    pub fn layout(&self, level: u32) -> Result<Vec<Placement>, LevelError> {
        Ok(self.pattern(level)?.placements())
    }

    /// Fresh, all-active bricks for a level
    pub fn bricks(&self, level: u32) -> Result<Vec<Brick>, LevelError> {
        Ok(self
            .layout(level)?
            .into_iter()
            .map(|p| Brick::new(p.pos, p.color))
            .collect())
    }
}

/// Layout for a level of the default ten-level table
pub fn level_layout(level: u32) -> Result<Vec<Placement>, LevelError> {
    LevelTable::extended().layout(level)
}
