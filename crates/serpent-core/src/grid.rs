//! Board geometry: cells, headings, and heading-relative ray offsets.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One board cell. Signed so that an off-board head computed during a
/// collision check is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell shifted by a (dx, dy) offset.
    #[must_use]
    pub const fn offset(self, delta: (i32, i32)) -> Self {
        Self {
            x: self.x + delta.0,
            y: self.y + delta.1,
        }
    }
}

/// Absolute heading on the board. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Cell delta for one step in this heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Discrete encoding fed to the network as a vision scalar.
    #[must_use]
    pub const fn scalar(self) -> f64 {
        match self {
            Self::Up => 0.0,
            Self::Down => 0.33,
            Self::Left => 0.66,
            Self::Right => 1.0,
        }
    }

    #[must_use]
    pub fn random(rng: &mut SmallRng) -> Self {
        match rng.random_range(0..4u8) {
            0 => Self::Up,
            1 => Self::Down,
            2 => Self::Left,
            _ => Self::Right,
        }
    }

    /// The 8 vision ray offsets relative to this heading, clockwise from
    /// straight ahead: ahead, ahead-right, right, behind-right, behind,
    /// behind-left, left, ahead-left.
    #[must_use]
    pub fn rays(self) -> [(i32, i32); 8] {
        let (ax, ay) = self.delta();
        // Clockwise rotation with y growing downward.
        let (rx, ry) = (-ay, ax);
        [
            (ax, ay),
            (ax + rx, ay + ry),
            (rx, ry),
            (rx - ax, ry - ay),
            (-ax, -ay),
            (-ax - rx, -ay - ry),
            (-rx, -ry),
            (ax - rx, ay - ry),
        ]
    }
}

/// Linearly remap a coordinate stored under one cell size onto another,
/// used when a saved population is loaded into a differently scaled
/// board.
#[must_use]
pub fn rescale_coordinate(value: i32, stored_cell_size: u32, cell_size: u32) -> i32 {
    if stored_cell_size == cell_size || value == 0 {
        return value;
    }
    if stored_cell_size > cell_size {
        value / (stored_cell_size / cell_size) as i32
    } else {
        value * (cell_size / stored_cell_size) as i32
    }
}
