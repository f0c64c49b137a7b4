use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serpent_core::{Population, PopulationSnapshot, SimulationConfig};
use tracing::{info, warn};

/// Headless runner: evolves snake populations and reports per-generation
/// progress through tracing. Snapshots cross the process boundary as
/// JSON so runs can be stopped and resumed.
#[derive(Debug, Parser)]
#[command(name = "serpent", about = "Evolve snake-playing neural networks")]
struct Args {
    /// Stop after this many further generations.
    #[arg(long, default_value_t = 100)]
    generations: u64,
    /// Board width in world units.
    #[arg(long, default_value_t = 800)]
    board_width: u32,
    /// Board height in world units.
    #[arg(long, default_value_t = 800)]
    board_height: u32,
    /// Grid cell size in world units.
    #[arg(long, default_value_t = 40)]
    cell_size: u32,
    /// Snakes per generation.
    #[arg(long, default_value_t = 200)]
    population: usize,
    /// Per-weight mutation probability.
    #[arg(long, default_value_t = 0.03)]
    mutation_rate: f64,
    /// Probability a child comes from crossover instead of a clone.
    #[arg(long, default_value_t = 0.9)]
    crossover_rate: f64,
    /// Pin the RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds to sleep between ticks.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Resume from a saved population snapshot.
    #[arg(long)]
    load: Option<PathBuf>,
    /// Save the population here when the run stops.
    #[arg(long)]
    save: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            board_width: self.board_width,
            board_height: self.board_height,
            cell_size: self.cell_size,
            population_size: self.population,
            mutation_rate: self.mutation_rate,
            crossover_rate: self.crossover_rate,
            rng_seed: self.seed,
            ..SimulationConfig::default()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.config();

    let mut population = match &args.load {
        Some(path) => {
            let snapshot = load_snapshot(path)?;
            if snapshot.cell_size != config.cell_size {
                warn!(
                    stored = snapshot.cell_size,
                    current = config.cell_size,
                    "snapshot cell size differs; remapping coordinates"
                );
            }
            info!(
                path = %path.display(),
                generation = snapshot.generation,
                best_score = snapshot.best_score,
                "resuming from snapshot"
            );
            Population::from_snapshot(&snapshot, config)?
        }
        None => Population::new(config)?,
    };
    population.set_delay_ms(args.delay_ms);

    let target = population.generation() + args.generations;
    run(&mut population, target);

    if let Some(path) = &args.save {
        save_snapshot(path, &population.snapshot())?;
        info!(path = %path.display(), "population saved");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run(population: &mut Population, target_generation: u64) {
    loop {
        let report = population.step_tick();
        if report.completed {
            info!(generation = report.generation, "a snake filled the board; stopping");
            break;
        }
        if report.evolved {
            info!(
                generation = population.generation(),
                best_score = population.best_score(),
                best_fitness = population.best_fitness(),
                avg_fitness = population.avg_fitness(),
                "generation finished"
            );
            if population.generation() >= target_generation {
                break;
            }
        }
        if population.delay_ms() > 0 {
            thread::sleep(Duration::from_millis(population.delay_ms()));
        }
    }
}

fn load_snapshot(path: &Path) -> Result<PopulationSnapshot> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("parsing snapshot {}", path.display()))
}

fn save_snapshot(path: &Path, snapshot: &PopulationSnapshot) -> Result<()> {
    let data = serde_json::to_string(snapshot)?;
    fs::write(path, data).with_context(|| format!("writing snapshot to {}", path.display()))
}
