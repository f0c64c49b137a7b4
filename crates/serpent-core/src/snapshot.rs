//! Serde types crossing the persistence boundary.
//!
//! Coordinates are stored in world units together with the cell size
//! they were produced under, so a snapshot written at one scale can be
//! loaded at another.

use serde::{Deserialize, Serialize};
use serpent_brain::Network;

use crate::grid::{Cell, Heading};

/// At most this many ranked snakes are persisted per snapshot. Large
/// populations would otherwise dominate save files with genomes that
/// never get selected again.
pub const MAX_SAVED_SNAKES: usize = 1000;

/// Persisted state of one snake, genome included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub network: Network,
    /// Body cells in world units, head first.
    pub cells: Vec<Cell>,
    pub heading: Heading,
    pub starting_cell: Cell,
    pub starting_heading: Heading,
    pub alive: bool,
    pub score: u32,
    pub ticks_alive: u64,
    pub life_budget: u32,
    pub food: Option<Cell>,
    pub food_history: Vec<Cell>,
    pub food_cursor: usize,
    pub elite_replay: bool,
}

/// Persisted state of a whole population, snakes ranked best first and
/// capped at [`MAX_SAVED_SNAKES`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// Cell size the coordinates below were scaled with.
    pub cell_size: u32,
    pub generation: u64,
    pub best_score: u32,
    pub best_fitness: f64,
    pub snakes: Vec<SnakeSnapshot>,
}
