//! Validated simulation configuration.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serpent_brain::{BrainError, NetworkTopology};
use thiserror::Error;

use crate::{ACTION_COUNT, VISION_INPUTS};

/// Errors raised when validating a [`SimulationConfig`] or building a
/// population from one. All of these are fatal at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Brain(#[from] BrainError),
}

/// Static tunables for a simulation run. Constructed once, handed to the
/// [`crate::Population`], and only updated through the population's own
/// setters between ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Board width in world units.
    pub board_width: u32,
    /// Board height in world units.
    pub board_height: u32,
    /// Size of one grid cell in world units (must divide both board
    /// dimensions).
    pub cell_size: u32,
    /// Number of agents per generation.
    pub population_size: usize,
    /// Per-cell weight mutation probability.
    pub mutation_rate: f64,
    /// Probability that a child is produced by crossover instead of a
    /// clone of one parent.
    pub crossover_rate: f64,
    /// Top-ranked genomes carried unmutated into the next generation.
    pub elite_count: usize,
    /// Candidates drawn per tournament round.
    pub tournament_size: usize,
    /// Fraction of the ranked population eligible as tournament
    /// candidates.
    pub survivor_fraction: f64,
    /// Hidden layer width of each genome.
    pub hidden_nodes: usize,
    /// Number of hidden layers in each genome.
    pub hidden_layers: usize,
    /// Optional RNG seed for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            board_width: 800,
            board_height: 800,
            cell_size: 40,
            population_size: 200,
            mutation_rate: 0.03,
            crossover_rate: 0.9,
            elite_count: 5,
            tournament_size: 5,
            survivor_fraction: 0.5,
            hidden_nodes: 24,
            hidden_layers: 2,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(ConfigError::Invalid("board dimensions must be non-zero"));
        }
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be non-zero"));
        }
        if self.board_width % self.cell_size != 0 || self.board_height % self.cell_size != 0 {
            return Err(ConfigError::Invalid(
                "board dimensions must be divisible by cell_size",
            ));
        }
        if self.population_size == 0 {
            return Err(ConfigError::Invalid("population_size must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Invalid("mutation_rate must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::Invalid("crossover_rate must lie in [0, 1]"));
        }
        if !(0.1..=1.0).contains(&self.survivor_fraction) {
            return Err(ConfigError::Invalid(
                "survivor_fraction must lie in [0.1, 1]",
            ));
        }
        if self.elite_count >= self.population_size {
            return Err(ConfigError::Invalid(
                "elite_count must be smaller than population_size",
            ));
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::Invalid("tournament_size must be non-zero"));
        }
        if self.hidden_nodes == 0 || self.hidden_layers == 0 {
            return Err(ConfigError::Invalid(
                "network hidden dimensions must be non-zero",
            ));
        }
        Ok(())
    }

    /// Board width in cells.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.board_width / self.cell_size
    }

    /// Board height in cells.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.board_height / self.cell_size
    }

    /// Total number of board cells.
    #[must_use]
    pub const fn board_cells(&self) -> u32 {
        self.cols() * self.rows()
    }

    /// Starvation budget in ticks; also the amount replenished per apple.
    #[must_use]
    pub const fn life_budget(&self) -> u32 {
        self.cols() * 10
    }

    /// Genome topology derived from the vision and action vectors.
    #[must_use]
    pub const fn topology(&self) -> NetworkTopology {
        NetworkTopology {
            inputs: VISION_INPUTS,
            hidden: self.hidden_nodes,
            outputs: ACTION_COUNT,
            hidden_layers: self.hidden_layers,
        }
    }

    /// RNG seeded from the configuration, or from entropy when no seed
    /// is pinned.
    #[must_use]
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        }
    }
}
