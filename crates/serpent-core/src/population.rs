//! The generational loop: parallel ticks across the population, then a
//! selection and reproduction step once every snake is dead.
//!
//! Ticks fan out with rayon; each snake owns its genome and RNG, so the
//! parallel phase takes no locks. All cross-snake bookkeeping happens in
//! a single-threaded commit after the fan-out returns.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ordered_float::OrderedFloat;
use rand::rngs::SmallRng;
use rand::Rng;
use rayon::prelude::*;
use serpent_brain::Network;
use tracing::{error, info};

use crate::config::{ConfigError, SimulationConfig};
use crate::grid::{Cell, Heading};
use crate::snake::Snake;
use crate::snapshot::{PopulationSnapshot, MAX_SAVED_SNAKES};

const MIN_MUTATION_RATE: f64 = 1e-4;
const SURVIVOR_STEP: f64 = 0.1;

/// What a single [`Population::step_tick`] call did, for the caller's
/// display and pacing loop.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    pub generation: u64,
    pub alive: usize,
    pub dead: usize,
    /// Best score seen in the current generation.
    pub high_score: u32,
    /// A snake filled the board; the run is over.
    pub completed: bool,
    /// This tick ended a generation and bred the next one.
    pub evolved: bool,
}

/// Frozen record of the best run seen so far. Replayed unchanged at
/// slot 0 of every following generation: same start, same heading, same
/// food order.
#[derive(Debug, Clone)]
struct Champion {
    network: Network,
    starting_cell: Cell,
    starting_heading: Heading,
    food_trace: Vec<Cell>,
    score: u32,
    fitness: f64,
}

/// A full population of snakes plus the evolution bookkeeping.
#[derive(Debug)]
pub struct Population {
    config: SimulationConfig,
    snakes: Vec<Snake>,
    generation: u64,
    high_score: u32,
    best_score: u32,
    best_fitness: f64,
    avg_fitness: f64,
    champion: Option<Champion>,
    completed: bool,
    paused: bool,
    delay_ms: u64,
    best_only: bool,
    show_best_only: bool,
    rng: SmallRng,
}

impl Population {
    /// Build generation 0 from a validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = config.seeded_rng();
        let mut snakes = Vec::with_capacity(config.population_size);
        for _ in 0..config.population_size {
            let network = Network::random(config.topology(), &mut rng)?;
            let seed = rng.random();
            snakes.push(Snake::spawn(&config, network, seed));
        }
        Ok(Self {
            config,
            snakes,
            generation: 0,
            high_score: 0,
            best_score: 0,
            best_fitness: 0.0,
            avg_fitness: 0.0,
            champion: None,
            completed: false,
            paused: false,
            delay_ms: 0,
            best_only: false,
            show_best_only: false,
            rng,
        })
    }

    /// Advance every live snake by one tick. Does nothing while paused
    /// or after a completed run. When the tick kills the last snake the
    /// evolutionary step runs inline and the report says so.
    pub fn step_tick(&mut self) -> TickReport {
        if self.paused || self.completed {
            return self.report(false);
        }

        // Parallel fan-out. A panicking snake must not tear down the
        // whole generation, so each unit is isolated and a faulted
        // snake is retired in the commit phase.
        let faulted: Vec<usize> = self
            .snakes
            .par_iter_mut()
            .enumerate()
            .filter_map(|(index, snake)| {
                match catch_unwind(AssertUnwindSafe(|| snake.step())) {
                    Ok(()) => None,
                    Err(_) => Some(index),
                }
            })
            .collect();
        for index in faulted {
            error!(snake = index, "snake tick panicked; retiring the agent");
            self.snakes[index].mark_faulted();
        }

        // Single-threaded commit.
        let mut alive = 0;
        for snake in &self.snakes {
            if snake.alive() {
                alive += 1;
            }
            self.high_score = self.high_score.max(snake.score());
            if snake.cells().len() as u32 >= self.config.board_cells() {
                self.completed = true;
            }
        }
        if self.completed {
            info!(generation = self.generation, "a snake filled the board");
            return self.report(false);
        }

        let mut evolved = false;
        if alive == 0 {
            self.evolve();
            evolved = true;
        }
        self.report(evolved)
    }

    fn report(&self, evolved: bool) -> TickReport {
        let alive = self.snakes.iter().filter(|snake| snake.alive()).count();
        TickReport {
            generation: self.generation,
            alive,
            dead: self.snakes.len() - alive,
            high_score: self.high_score,
            completed: self.completed,
            evolved,
        }
    }

    /// Score the finished generation, refresh the champion, and breed
    /// the next generation: the champion replay at slot 0, unmutated
    /// elite clones, then tournament-selected offspring.
    fn evolve(&mut self) {
        self.snakes.par_iter_mut().for_each(|snake| {
            snake.evaluate_fitness();
        });
        let total: f64 = self.snakes.iter().map(Snake::fitness).sum();
        self.avg_fitness = total / self.snakes.len() as f64;

        self.refresh_champion();
        self.snakes.sort_by(|a, b| {
            OrderedFloat(b.fitness()).cmp(&OrderedFloat(a.fitness()))
        });
        // High-water mark over all generations. Kept separate from the
        // champion record: the score-first champion rule can promote a
        // run whose fitness is below an earlier fitness peak.
        if let Some(top) = self.snakes.first() {
            self.best_fitness = self.best_fitness.max(top.fitness());
        }

        let mut next = Vec::with_capacity(self.config.population_size);
        if let Some(champion) = self.champion.clone() {
            let seed = self.rng.random();
            next.push(Snake::replay(
                &self.config,
                champion.network,
                champion.starting_cell,
                champion.starting_heading,
                champion.food_trace,
                seed,
            ));
        }
        for elite in self.snakes.iter().take(self.config.elite_count) {
            if next.len() >= self.config.population_size {
                break;
            }
            let seed = self.rng.random();
            next.push(Snake::spawn(&self.config, elite.network().clone(), seed));
        }
        while next.len() < self.config.population_size {
            let parent_a = tournament(&self.snakes, &self.config, self.best_only, &mut self.rng);
            let parent_b = tournament(&self.snakes, &self.config, self.best_only, &mut self.rng);
            let mut genome = if self.rng.random::<f64>() < self.config.crossover_rate {
                parent_a
                    .network()
                    .crossover(parent_b.network(), &mut self.rng)
                    .unwrap_or_else(|_| parent_a.network().clone())
            } else {
                parent_a.network().clone()
            };
            genome.mutate(self.config.mutation_rate, &mut self.rng);
            let seed = self.rng.random();
            next.push(Snake::spawn(&self.config, genome, seed));
        }

        self.snakes = next;
        self.generation += 1;
        self.high_score = 0;
        info!(
            generation = self.generation,
            best_score = self.best_score,
            best_fitness = self.best_fitness,
            avg_fitness = self.avg_fitness,
            "generation bred"
        );
    }

    /// Promote this generation's best run to champion if it beats the
    /// standing record. Score outranks fitness so a long idle survivor
    /// never displaces a shorter run that actually ate.
    fn refresh_champion(&mut self) {
        let Some(gen_best) = self.snakes.iter().max_by(|a, b| {
            a.score()
                .cmp(&b.score())
                .then(OrderedFloat(a.fitness()).cmp(&OrderedFloat(b.fitness())))
        }) else {
            return;
        };

        let beats_record = match &self.champion {
            None => true,
            Some(champion) => {
                gen_best.score() > champion.score
                    || (gen_best.score() == champion.score
                        && gen_best.fitness() > champion.fitness)
            }
        };
        if beats_record {
            self.champion = Some(Champion {
                network: gen_best.network().clone(),
                starting_cell: gen_best.starting_cell(),
                starting_heading: gen_best.starting_heading(),
                food_trace: gen_best.food_history().to_vec(),
                score: gen_best.score(),
                fitness: gen_best.fitness(),
            });
            self.best_score = gen_best.score();
            info!(
                score = gen_best.score(),
                fitness = gen_best.fitness(),
                "new champion"
            );
        }
    }

    // Runtime knobs, applied between ticks.

    pub fn double_mutation_rate(&mut self) {
        self.config.mutation_rate = (self.config.mutation_rate * 2.0).min(1.0);
    }

    pub fn halve_mutation_rate(&mut self) {
        self.config.mutation_rate = (self.config.mutation_rate / 2.0).max(MIN_MUTATION_RATE);
    }

    pub fn widen_survivor_pool(&mut self) {
        self.config.survivor_fraction = (self.config.survivor_fraction + SURVIVOR_STEP).min(1.0);
    }

    pub fn narrow_survivor_pool(&mut self) {
        self.config.survivor_fraction = (self.config.survivor_fraction - SURVIVOR_STEP).max(0.1);
    }

    pub fn toggle_best_only(&mut self) {
        self.best_only = !self.best_only;
    }

    pub fn toggle_show_best_only(&mut self) {
        self.show_best_only = !self.show_best_only;
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    // Read-only views.

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub const fn best_score(&self) -> u32 {
        self.best_score
    }

    #[must_use]
    pub const fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    #[must_use]
    pub const fn avg_fitness(&self) -> f64 {
        self.avg_fitness
    }

    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub const fn paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    #[must_use]
    pub const fn best_only(&self) -> bool {
        self.best_only
    }

    #[must_use]
    pub const fn show_best_only(&self) -> bool {
        self.show_best_only
    }

    /// Persistable snapshot: snakes ranked best first, capped at
    /// [`MAX_SAVED_SNAKES`], coordinates scaled to world units.
    #[must_use]
    pub fn snapshot(&self) -> PopulationSnapshot {
        let mut ranked = self.snakes.clone();
        for snake in &mut ranked {
            snake.evaluate_fitness();
        }
        ranked.sort_by(|a, b| OrderedFloat(b.fitness()).cmp(&OrderedFloat(a.fitness())));
        ranked.truncate(MAX_SAVED_SNAKES);
        PopulationSnapshot {
            cell_size: self.config.cell_size,
            generation: self.generation,
            best_score: self.best_score,
            best_fitness: self.best_fitness,
            snakes: ranked
                .iter()
                .map(|snake| snake.snapshot(self.config.cell_size))
                .collect(),
        }
    }

    /// Rebuild a population from a snapshot. Coordinates are remapped
    /// when the stored cell size differs; a short snapshot is topped up
    /// with fresh random snakes and an oversized one is truncated.
    pub fn from_snapshot(
        snapshot: &PopulationSnapshot,
        config: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = config.seeded_rng();
        let mut snakes = Vec::with_capacity(config.population_size);
        for stored in snapshot.snakes.iter().take(config.population_size) {
            let seed = rng.random();
            snakes.push(Snake::from_snapshot(stored, &config, snapshot.cell_size, seed)?);
        }
        while snakes.len() < config.population_size {
            let network = Network::random(config.topology(), &mut rng)?;
            let seed = rng.random();
            snakes.push(Snake::spawn(&config, network, seed));
        }

        let champion = snakes.iter().find(|snake| snake.is_elite_replay()).map(|snake| {
            Champion {
                network: snake.network().clone(),
                starting_cell: snake.starting_cell(),
                starting_heading: snake.starting_heading(),
                food_trace: snake.food_history().to_vec(),
                score: snapshot.best_score,
                fitness: snapshot.best_fitness,
            }
        });
        let high_score = snakes.iter().map(Snake::score).max().unwrap_or(0);

        Ok(Self {
            config,
            snakes,
            generation: snapshot.generation,
            high_score,
            best_score: snapshot.best_score,
            best_fitness: snapshot.best_fitness,
            avg_fitness: 0.0,
            champion,
            completed: false,
            paused: false,
            delay_ms: 0,
            best_only: false,
            show_best_only: false,
            rng,
        })
    }
}

/// Fitness tournament over the top `survivor_fraction` of the ranked
/// population. `best_only` collapses selection to the top genome.
fn tournament<'a>(
    ranked: &'a [Snake],
    config: &SimulationConfig,
    best_only: bool,
    rng: &mut SmallRng,
) -> &'a Snake {
    if best_only {
        return &ranked[0];
    }
    let pool = ((ranked.len() as f64 * config.survivor_fraction) as usize).max(1);
    let mut best = &ranked[rng.random_range(0..pool)];
    for _ in 1..config.tournament_size {
        let candidate = &ranked[rng.random_range(0..pool)];
        if candidate.fitness() > best.fitness() {
            best = candidate;
        }
    }
    best
}
