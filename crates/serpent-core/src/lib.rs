//! Core simulation for a population of evolved snakes.
//!
//! The crate is split the way the data flows: [`grid`] holds board
//! geometry, [`config`] the validated tunables, [`snake`] a single agent
//! (vision, movement, lifespan, fitness), [`population`] the parallel
//! tick loop and the generational evolutionary step, and [`snapshot`]
//! the serde types handed across the external persistence boundary.

pub mod config;
pub mod grid;
pub mod population;
pub mod snake;
pub mod snapshot;

pub use config::{ConfigError, SimulationConfig};
pub use grid::{Cell, Heading};
pub use population::{Population, TickReport};
pub use snake::{Action, DeathCause, Snake, VISION_INPUTS};
pub use snapshot::{PopulationSnapshot, SnakeSnapshot};

/// Number of actions a snake can take each tick.
pub const ACTION_COUNT: usize = 3;
