//! A single simulated snake: vision rays, decision, movement,
//! collisions, lifespan, and the generation-end fitness formula.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serpent_brain::{argmax, Network};

use crate::config::{ConfigError, SimulationConfig};
use crate::grid::{rescale_coordinate, Cell, Heading};
use crate::snapshot::SnakeSnapshot;

/// Length of the vision vector: two heading scalars plus 8 rays with a
/// food flag, a body inverse distance, and a wall inverse distance each.
pub const VISION_INPUTS: usize = 2 + 8 * 3;

/// Inverse distances are rounded half-up to 2 decimal places. The exact
/// precision measurably changes learned behavior, so it is pinned here.
const VISION_PRECISION: f64 = 100.0;

/// Heading-relative action decoded from the network output. The argmax
/// index maps in declaration order: 0 left, 1 right, 2 straight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnLeft,
    TurnRight,
    Straight,
}

impl Action {
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::TurnLeft,
            1 => Self::TurnRight,
            _ => Self::Straight,
        }
    }
}

/// Why a snake left the Alive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Starved,
    Wall,
    Body,
    /// The tick task panicked; the snake is retired so the generation
    /// barrier still completes.
    Faulted,
}

/// One agent. Owns its genome exclusively; a tick touches nothing
/// outside this struct, which is what makes the population's parallel
/// phase lock-free.
#[derive(Debug, Clone)]
pub struct Snake {
    cols: u32,
    rows: u32,
    cells: VecDeque<Cell>,
    heading: Heading,
    starting_cell: Cell,
    starting_heading: Heading,
    alive: bool,
    death_cause: Option<DeathCause>,
    score: u32,
    ticks_alive: u64,
    life_budget: u32,
    life_cap: u32,
    fitness: f64,
    network: Network,
    food: Option<Cell>,
    food_history: Vec<Cell>,
    food_cursor: usize,
    elite_replay: bool,
    rng: SmallRng,
}

impl Snake {
    /// Spawn a fresh snake at a random cell with a random heading.
    #[must_use]
    pub fn spawn(config: &SimulationConfig, network: Network, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let start = Cell::new(
            rng.random_range(0..config.cols()) as i32,
            rng.random_range(0..config.rows()) as i32,
        );
        let heading = Heading::random(&mut rng);
        Self::with_start(config, network, start, heading, Vec::new(), false, rng)
    }

    /// Spawn the champion replay: frozen starting cell, heading, and
    /// food trace, so the run can be watched unchanged every generation.
    #[must_use]
    pub fn replay(
        config: &SimulationConfig,
        network: Network,
        starting_cell: Cell,
        starting_heading: Heading,
        food_trace: Vec<Cell>,
        seed: u64,
    ) -> Self {
        let rng = SmallRng::seed_from_u64(seed);
        Self::with_start(
            config,
            network,
            starting_cell,
            starting_heading,
            food_trace,
            true,
            rng,
        )
    }

    fn with_start(
        config: &SimulationConfig,
        network: Network,
        starting_cell: Cell,
        starting_heading: Heading,
        food_trace: Vec<Cell>,
        elite_replay: bool,
        rng: SmallRng,
    ) -> Self {
        let life_cap = config.life_budget();
        let mut snake = Self {
            cols: config.cols(),
            rows: config.rows(),
            cells: VecDeque::from([starting_cell]),
            heading: starting_heading,
            starting_cell,
            starting_heading,
            alive: true,
            death_cause: None,
            score: 0,
            ticks_alive: 0,
            life_budget: life_cap,
            life_cap,
            fitness: 0.0,
            network,
            food: None,
            food_history: food_trace,
            food_cursor: 0,
            elite_replay,
            rng,
        };
        snake.spawn_food();
        snake
    }

    /// One simulation tick: starve check, vision, decision, move.
    pub fn step(&mut self) {
        if !self.alive {
            return;
        }
        self.ticks_alive += 1;
        self.life_budget = self.life_budget.saturating_sub(1);
        if self.life_budget == 0 {
            self.die(DeathCause::Starved);
            return;
        }
        let vision = self.vision();
        let decision = self.network.forward(&vision);
        self.apply(Action::from_index(argmax(&decision)));
    }

    fn apply(&mut self, action: Action) {
        self.heading = match action {
            Action::TurnLeft => self.heading.turn_left(),
            Action::TurnRight => self.heading.turn_right(),
            Action::Straight => self.heading,
        };
        let new_head = self.head().offset(self.heading.delta());
        if self.out_of_bounds(new_head) {
            self.die(DeathCause::Wall);
            return;
        }
        let ate = self.food == Some(new_head);
        // Unless the snake grows this tick, the tail cell vacates and
        // moving into it is legal.
        let occupied = if ate {
            self.cells.len()
        } else {
            self.cells.len() - 1
        };
        if self.cells.iter().take(occupied).any(|cell| *cell == new_head) {
            self.die(DeathCause::Body);
            return;
        }
        if !ate {
            self.cells.pop_back();
        }
        self.cells.push_front(new_head);
        if ate {
            self.score += 1;
            self.life_budget = (self.life_budget + self.life_cap).min(self.life_cap);
            self.spawn_food();
        }
    }

    /// Build the 26-value vision vector fed to the genome.
    #[must_use]
    pub fn vision(&self) -> [f64; VISION_INPUTS] {
        let mut vision = [0.0; VISION_INPUTS];
        vision[0] = self.heading.scalar();
        vision[1] = self.tail_heading().scalar();
        for (ray, delta) in self.heading.rays().into_iter().enumerate() {
            let (food, body, wall) = self.cast_ray(delta);
            vision[2 + ray * 3] = food;
            vision[3 + ray * 3] = body;
            vision[4 + ray * 3] = wall;
        }
        vision
    }

    /// Walk one ray until the boundary, reporting a food flag, the
    /// rounded inverse distance to the nearest body segment (0 if none),
    /// and the rounded inverse distance to the wall. The food flag is
    /// raised even when a body segment sits closer on the same ray; the
    /// body channel already carries the occlusion signal.
    fn cast_ray(&self, delta: (i32, i32)) -> (f64, f64, f64) {
        let mut probe = self.head().offset(delta);
        let mut distance = 1.0_f64;
        let mut food = 0.0;
        let mut body = 0.0;
        while !self.out_of_bounds(probe) {
            if food == 0.0 && self.food == Some(probe) {
                food = 1.0;
            }
            if body == 0.0 && self.body_contains(probe) {
                body = round_inverse(distance);
            }
            probe = probe.offset(delta);
            distance += 1.0;
        }
        (food, body, round_inverse(distance))
    }

    /// Travel direction of the tail segment; falls back to the current
    /// heading before the snake has grown a tail.
    fn tail_heading(&self) -> Heading {
        if self.cells.len() < 2 {
            return self.heading;
        }
        let tail = self.cells[self.cells.len() - 1];
        let ahead_of_tail = self.cells[self.cells.len() - 2];
        if tail.x == ahead_of_tail.x {
            if ahead_of_tail.y > tail.y {
                Heading::Down
            } else {
                Heading::Up
            }
        } else if ahead_of_tail.x > tail.x {
            Heading::Right
        } else {
            Heading::Left
        }
    }

    fn body_contains(&self, cell: Cell) -> bool {
        self.cells.iter().skip(1).any(|body| *body == cell)
    }

    fn out_of_bounds(&self, cell: Cell) -> bool {
        cell.x < 0 || cell.y < 0 || cell.x >= self.cols as i32 || cell.y >= self.rows as i32
    }

    fn die(&mut self, cause: DeathCause) {
        self.alive = false;
        self.death_cause = Some(cause);
    }

    /// Mark the snake dead after its tick task panicked.
    pub(crate) fn mark_faulted(&mut self) {
        self.die(DeathCause::Faulted);
    }

    /// Pick the next food cell: the frozen replay trace first for the
    /// champion, otherwise a uniform draw over unoccupied cells (which
    /// is appended to the trace).
    fn spawn_food(&mut self) {
        if self.cells.len() as u32 >= self.cols * self.rows {
            // Board full: the run is won, nothing left to spawn.
            self.food = None;
            return;
        }
        if self.elite_replay && self.food_cursor < self.food_history.len() {
            self.food = Some(self.food_history[self.food_cursor]);
            self.food_cursor += 1;
            return;
        }
        let cell = loop {
            let candidate = Cell::new(
                self.rng.random_range(0..self.cols) as i32,
                self.rng.random_range(0..self.rows) as i32,
            );
            if !self.cells.contains(&candidate) {
                break candidate;
            }
        };
        self.food = Some(cell);
        self.food_history.push(cell);
    }

    /// Generation-end fitness. Quadratic in lifetime, doubling per apple
    /// up to ten, then linear in further apples, plus a cubic score
    /// bonus that rewards eating over mere survival.
    pub fn evaluate_fitness(&mut self) -> f64 {
        let lifetime = (self.ticks_alive as f64).powi(2).floor();
        let mut fitness = if self.score < 10 {
            lifetime * 2.0_f64.powi(self.score as i32)
        } else {
            lifetime * 2.0_f64.powi(10) * f64::from(self.score - 9)
        };
        fitness += f64::from(self.score).powi(3) * 1000.0;
        self.fitness = fitness;
        self.network.record_fitness(fitness);
        fitness
    }

    // Read-only snapshot accessors consumed by the presentation layer.

    #[must_use]
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    /// Position history, head first.
    #[must_use]
    pub fn cells(&self) -> &VecDeque<Cell> {
        &self.cells
    }

    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    #[must_use]
    pub const fn alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub const fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn ticks_alive(&self) -> u64 {
        self.ticks_alive
    }

    #[must_use]
    pub const fn life_budget(&self) -> u32 {
        self.life_budget
    }

    /// Valid only after [`Self::evaluate_fitness`] ran at generation end.
    #[must_use]
    pub const fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub const fn is_elite_replay(&self) -> bool {
        self.elite_replay
    }

    #[must_use]
    pub const fn food(&self) -> Option<Cell> {
        self.food
    }

    #[must_use]
    pub fn food_history(&self) -> &[Cell] {
        &self.food_history
    }

    #[must_use]
    pub const fn starting_cell(&self) -> Cell {
        self.starting_cell
    }

    #[must_use]
    pub const fn starting_heading(&self) -> Heading {
        self.starting_heading
    }

    #[must_use]
    pub const fn network(&self) -> &Network {
        &self.network
    }

    /// Full reconstructable state for the external persistence boundary.
    /// Coordinates are stored in world units (`cell * cell_size`) so a
    /// load under a different cell size can remap them linearly.
    #[must_use]
    pub fn snapshot(&self, cell_size: u32) -> SnakeSnapshot {
        let scale = |cell: Cell| Cell::new(cell.x * cell_size as i32, cell.y * cell_size as i32);
        SnakeSnapshot {
            network: self.network.clone(),
            cells: self.cells.iter().copied().map(scale).collect(),
            heading: self.heading,
            starting_cell: scale(self.starting_cell),
            starting_heading: self.starting_heading,
            alive: self.alive,
            score: self.score,
            ticks_alive: self.ticks_alive,
            life_budget: self.life_budget,
            food: self.food.map(scale),
            food_history: self.food_history.iter().copied().map(scale).collect(),
            food_cursor: self.food_cursor,
            elite_replay: self.elite_replay,
        }
    }

    /// Rebuild a snake from persisted state, remapping world-unit
    /// coordinates when the stored cell size differs from the current
    /// configuration. The RNG is reseeded; replay determinism comes from
    /// the food trace, not RNG state.
    pub fn from_snapshot(
        snapshot: &SnakeSnapshot,
        config: &SimulationConfig,
        stored_cell_size: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if snapshot.network.topology() != config.topology() {
            return Err(ConfigError::Invalid(
                "stored network topology does not match configuration",
            ));
        }
        if stored_cell_size == 0 {
            return Err(ConfigError::Invalid("stored cell_size must be non-zero"));
        }
        let cell_size = config.cell_size;
        // The remap is an integer ratio; incommensurate sizes would
        // silently leave coordinates unscaled and off-board.
        if stored_cell_size % cell_size != 0 && cell_size % stored_cell_size != 0 {
            return Err(ConfigError::Invalid(
                "stored cell_size must divide or be a multiple of the configured cell_size",
            ));
        }
        let unscale = |cell: Cell| {
            Cell::new(
                rescale_coordinate(cell.x, stored_cell_size, cell_size) / cell_size as i32,
                rescale_coordinate(cell.y, stored_cell_size, cell_size) / cell_size as i32,
            )
        };
        let life_cap = config.life_budget();
        Ok(Self {
            cols: config.cols(),
            rows: config.rows(),
            cells: snapshot.cells.iter().copied().map(unscale).collect(),
            heading: snapshot.heading,
            starting_cell: unscale(snapshot.starting_cell),
            starting_heading: snapshot.starting_heading,
            alive: snapshot.alive,
            death_cause: None,
            score: snapshot.score,
            ticks_alive: snapshot.ticks_alive,
            life_budget: snapshot.life_budget.min(life_cap),
            life_cap,
            fitness: 0.0,
            network: snapshot.network.clone(),
            food: snapshot.food.map(unscale),
            food_history: snapshot.food_history.iter().copied().map(unscale).collect(),
            food_cursor: snapshot.food_cursor,
            elite_replay: snapshot.elite_replay,
            rng: SmallRng::seed_from_u64(seed),
        })
    }
}

fn round_inverse(distance: f64) -> f64 {
    ((1.0 / distance) * VISION_PRECISION).round() / VISION_PRECISION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig {
            board_width: 200,
            board_height: 200,
            cell_size: 40,
            rng_seed: Some(7),
            ..SimulationConfig::default()
        }
    }

    fn network(config: &SimulationConfig, seed: u64) -> Network {
        Network::random(config.topology(), &mut SmallRng::seed_from_u64(seed)).unwrap()
    }

    /// A replay snake is fully deterministic: frozen start, heading, and
    /// food trace.
    fn rigged(config: &SimulationConfig, start: Cell, heading: Heading, trace: Vec<Cell>) -> Snake {
        Snake::replay(config, network(config, 1), start, heading, trace, 99)
    }

    #[test]
    fn spawn_places_head_inside_board() {
        let config = config();
        let snake = Snake::spawn(&config, network(&config, 2), 3);
        let head = snake.head();
        assert!(head.x >= 0 && head.x < config.cols() as i32);
        assert!(head.y >= 0 && head.y < config.rows() as i32);
        assert_eq!(snake.cells().len(), 1);
        assert_eq!(snake.life_budget(), config.life_budget());
        assert!(snake.food().is_some());
    }

    #[test]
    fn food_never_spawns_on_the_body() {
        let config = config();
        for seed in 0..32 {
            let snake = Snake::spawn(&config, network(&config, seed), seed);
            assert_ne!(snake.food(), Some(snake.head()));
        }
    }

    #[test]
    fn eating_grows_scores_and_refills_the_budget() {
        let config = config();
        let start = Cell::new(1, 2);
        let food = Cell::new(2, 2);
        let mut snake = rigged(&config, start, Heading::Right, vec![food, Cell::new(4, 4)]);
        assert_eq!(snake.food(), Some(food));

        snake.apply(Action::Straight);
        assert!(snake.alive());
        assert_eq!(snake.score(), 1);
        assert_eq!(snake.cells().len(), 2);
        assert_eq!(snake.head(), food);
        assert_eq!(snake.life_budget(), config.life_budget());
        assert_eq!(snake.food(), Some(Cell::new(4, 4)));
    }

    #[test]
    fn moving_without_food_keeps_length() {
        let config = config();
        let mut snake = rigged(&config, Cell::new(1, 1), Heading::Down, vec![Cell::new(4, 4)]);
        snake.apply(Action::Straight);
        assert!(snake.alive());
        assert_eq!(snake.cells().len(), 1);
        assert_eq!(snake.head(), Cell::new(1, 2));
    }

    #[test]
    fn wall_collision_kills_without_moving_the_head_off_board() {
        let config = config();
        let mut snake = rigged(&config, Cell::new(0, 0), Heading::Up, vec![Cell::new(4, 4)]);
        snake.apply(Action::Straight);
        assert!(!snake.alive());
        assert_eq!(snake.death_cause(), Some(DeathCause::Wall));
        assert_eq!(snake.head(), Cell::new(0, 0));
    }

    #[test]
    fn body_collision_kills() {
        let config = config();
        // Grow to length 5, then hook back into a mid-body segment.
        let trace = vec![
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(4, 2),
            Cell::new(4, 3),
            Cell::new(0, 0),
        ];
        let mut snake = rigged(&config, Cell::new(1, 2), Heading::Right, trace);
        snake.apply(Action::Straight); // eat (2,2)
        snake.apply(Action::Straight); // eat (3,2)
        snake.apply(Action::Straight); // eat (4,2)
        snake.apply(Action::TurnRight); // down, eat (4,3)
        assert_eq!(snake.cells().len(), 5);
        snake.apply(Action::TurnRight); // left to (3,3)
        snake.apply(Action::TurnRight); // up into (3,2), still occupied
        assert!(!snake.alive());
        assert_eq!(snake.death_cause(), Some(DeathCause::Body));
    }

    #[test]
    fn moving_into_the_vacated_tail_cell_is_legal() {
        let config = config();
        // Grow to length 4 in an L, then circle through the old tail slot.
        let trace = vec![
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(3, 3),
            Cell::new(0, 0),
        ];
        let mut snake = rigged(&config, Cell::new(1, 2), Heading::Right, trace);
        snake.apply(Action::Straight); // eat (2,2)
        snake.apply(Action::Straight); // eat (3,2)
        snake.apply(Action::TurnRight); // down, eat (3,3)
        assert_eq!(snake.cells().len(), 4);
        snake.apply(Action::TurnRight); // left to (2,3)
        snake.apply(Action::TurnRight); // up into (2,2) just as the tail leaves it
        assert!(snake.alive());
        let unique: std::collections::HashSet<_> = snake.cells().iter().copied().collect();
        assert_eq!(unique.len(), snake.cells().len());
    }

    #[test]
    fn starvation_fires_when_the_budget_runs_out() {
        let config = config();
        let mut snake = rigged(&config, Cell::new(2, 2), Heading::Right, vec![Cell::new(4, 4)]);
        for _ in 0..config.life_budget() {
            if !snake.alive() {
                break;
            }
            snake.ticks_alive += 1;
            snake.life_budget = snake.life_budget.saturating_sub(1);
            if snake.life_budget == 0 {
                snake.die(DeathCause::Starved);
            }
        }
        assert!(!snake.alive());
        assert_eq!(snake.death_cause(), Some(DeathCause::Starved));
    }

    #[test]
    fn vision_flags_food_on_the_ahead_ray() {
        let config = config();
        let snake = rigged(
            &config,
            Cell::new(1, 2),
            Heading::Right,
            vec![Cell::new(3, 2)],
        );
        let vision = snake.vision();
        assert_eq!(vision[0], Heading::Right.scalar());
        // Ray 0 is straight ahead: food flag set, no body, wall at the
        // far edge (distance 4 from x=1 on a 5-cell board).
        assert_eq!(vision[2], 1.0);
        assert_eq!(vision[3], 0.0);
        assert_eq!(vision[4], 0.25);
    }

    #[test]
    fn vision_reports_wall_distances_rounded() {
        let config = config();
        let snake = rigged(
            &config,
            Cell::new(2, 2),
            Heading::Up,
            vec![Cell::new(4, 4)],
        );
        let vision = snake.vision();
        // Ahead (up): wall 3 cells away -> 1/3 rounded to 0.33.
        assert_eq!(vision[4], 0.33);
        // Behind (down): wall 3 cells away as well on a 5x5 board.
        assert_eq!(vision[4 + 4 * 3], 0.33);
    }

    #[test]
    fn vision_reports_food_beyond_a_body_segment() {
        let config = config();
        // Grow straight along a row so the body trails directly behind
        // the head, then land the next apple behind the tail on the
        // same row.
        let trace = vec![Cell::new(2, 2), Cell::new(3, 2), Cell::new(0, 2)];
        let mut snake = rigged(&config, Cell::new(1, 2), Heading::Right, trace);
        snake.apply(Action::Straight);
        snake.apply(Action::Straight);
        assert_eq!(snake.cells().len(), 3);
        assert_eq!(snake.food(), Some(Cell::new(0, 2)));

        let vision = snake.vision();
        // Ray 4 looks behind: the body sits at distance 1 and the food
        // lies past it. The flag still fires; occlusion is the body
        // channel's job.
        assert_eq!(vision[2 + 4 * 3], 1.0);
        assert_eq!(vision[3 + 4 * 3], 1.0);
    }

    #[test]
    fn fitness_matches_the_formula_exactly() {
        let config = config();
        let mut snake = rigged(&config, Cell::new(1, 1), Heading::Right, vec![Cell::new(4, 4)]);
        snake.ticks_alive = 100;
        snake.score = 3;
        let fitness = snake.evaluate_fitness();
        assert_eq!(fitness, 10_000.0 * 8.0 + 27_000.0);

        snake.score = 12;
        let fitness = snake.evaluate_fitness();
        assert_eq!(fitness, 10_000.0 * 1024.0 * 3.0 + 1_728_000.0);
    }

    #[test]
    fn fitness_is_increasing_in_score_for_equal_lifetimes() {
        let config = config();
        let mut hungry = rigged(&config, Cell::new(1, 1), Heading::Right, vec![Cell::new(4, 4)]);
        let mut fed = hungry.clone();
        hungry.ticks_alive = 500;
        fed.ticks_alive = 500;
        hungry.score = 0;
        fed.score = 3;
        assert!(fed.evaluate_fitness() > hungry.evaluate_fitness());
    }

    #[test]
    fn fitness_raises_the_genome_high_water_mark() {
        let config = config();
        let mut snake = rigged(&config, Cell::new(1, 1), Heading::Right, vec![Cell::new(4, 4)]);
        snake.ticks_alive = 10;
        let fitness = snake.evaluate_fitness();
        assert_eq!(snake.network().highest_fitness(), fitness);
    }

    #[test]
    fn replay_consumes_the_frozen_trace_then_goes_random() {
        let config = config();
        let trace = vec![Cell::new(2, 2), Cell::new(3, 3)];
        let mut snake = rigged(&config, Cell::new(1, 2), Heading::Right, trace.clone());
        assert_eq!(snake.food(), Some(trace[0]));
        snake.apply(Action::Straight); // eat first apple
        assert_eq!(snake.food(), Some(trace[1]));
        snake.spawn_food(); // trace exhausted, falls back to random
        let food = snake.food().unwrap();
        assert!(food.x >= 0 && food.x < config.cols() as i32);
    }

    #[test]
    fn snapshot_round_trips_with_rescaling() {
        let config = config();
        let mut snake = rigged(&config, Cell::new(1, 2), Heading::Right, vec![Cell::new(2, 2)]);
        snake.apply(Action::Straight); // eat, grow to 2
        let snapshot = snake.snapshot(config.cell_size);
        assert_eq!(snapshot.cells[0], Cell::new(80, 80));

        let halved = SimulationConfig {
            board_width: 100,
            board_height: 100,
            cell_size: 20,
            ..config.clone()
        };
        let restored = Snake::from_snapshot(&snapshot, &halved, config.cell_size, 5).unwrap();
        assert_eq!(restored.head(), snake.head());
        assert_eq!(restored.score(), snake.score());
        assert_eq!(restored.cells().len(), snake.cells().len());
        assert_eq!(restored.food_history().len(), snake.food_history().len());
    }

    #[test]
    fn snapshot_rejects_incommensurate_cell_size() {
        let config = config();
        let snake = rigged(&config, Cell::new(1, 1), Heading::Right, vec![Cell::new(3, 3)]);
        let snapshot = snake.snapshot(config.cell_size);
        // 40 and 30 share no integer ratio, so the remap cannot work.
        let incommensurate = SimulationConfig {
            board_width: 150,
            board_height: 150,
            cell_size: 30,
            ..config.clone()
        };
        assert!(
            Snake::from_snapshot(&snapshot, &incommensurate, config.cell_size, 5).is_err()
        );
    }

    #[test]
    fn snapshot_rejects_foreign_topology() {
        let config = config();
        let snake = rigged(&config, Cell::new(1, 1), Heading::Right, vec![Cell::new(3, 3)]);
        let snapshot = snake.snapshot(config.cell_size);
        let other = SimulationConfig {
            hidden_nodes: 12,
            ..config
        };
        assert!(Snake::from_snapshot(&snapshot, &other, other.cell_size, 5).is_err());
    }
}
