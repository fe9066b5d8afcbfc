#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for releasing adversaries into the pen.

use maze_chase_core::{
    AdversaryColor, CellCoord, Command, Direction, Event, ADVERSARY_COLORS,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of adversaries released when a game starts.
pub const DEFAULT_ADVERSARY_COUNT: usize = 4;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    adversary_count: usize,
    colors: Vec<AdversaryColor>,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration. An empty palette falls back to [`ADVERSARY_COLORS`].
    #[must_use]
    pub fn new(adversary_count: usize, colors: Vec<AdversaryColor>, rng_seed: u64) -> Self {
        let colors = if colors.is_empty() {
            ADVERSARY_COLORS.to_vec()
        } else {
            colors
        };
        Self {
            adversary_count,
            colors,
            rng_seed,
        }
    }

    /// Default adversary count and palette driven by `rng_seed`.
    #[must_use]
    pub fn with_seed(rng_seed: u64) -> Self {
        Self::new(DEFAULT_ADVERSARY_COUNT, ADVERSARY_COLORS.to_vec(), rng_seed)
    }
}

/// Pure system that emits one spawn command per adversary whenever a game starts.
#[derive(Debug)]
pub struct Spawning {
    adversary_count: usize,
    colors: Vec<AdversaryColor>,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            adversary_count: config.adversary_count,
            colors: config.colors,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and the pen layout to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], spawns: &[CellCoord], out: &mut Vec<Command>) {
        let started = events
            .iter()
            .any(|event| matches!(event, Event::SimulationStarted));
        if !started {
            return;
        }

        for index in 0..self.adversary_count {
            let Some(&spawn) = spawns.choose(&mut self.rng) else {
                return;
            };
            let direction = Direction::from_index(self.rng.gen_range(0..Direction::ALL.len()));
            out.push(Command::SpawnAdversary {
                spawn,
                direction,
                color: self.color(index),
            });
        }
    }

    fn color(&self, index: usize) -> AdversaryColor {
        self.colors[index % self.colors.len()]
    }
}
