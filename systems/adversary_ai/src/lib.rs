#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random-walk steering for adversaries.
//!
//! Each adversary standing exactly on a cell picks a new direction among the
//! neighbours it is allowed to enter. Turning back is only permitted when it is
//! the sole way out, so adversaries sweep corridors instead of jittering.

use maze_chase_core::{AdversarySnapshot, AdversaryView, Command, Direction, Lifecycle};
use maze_chase_world::{motion, Maze};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Configuration parameters required to construct the steering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration seeding the direction choices.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits turn or hold commands for aligned adversaries.
#[derive(Debug)]
pub struct AdversaryAi {
    rng: ChaCha8Rng,
    candidates: Vec<Direction>,
}

impl AdversaryAi {
    /// Creates a new steering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            candidates: Vec::with_capacity(Direction::ALL.len()),
        }
    }

    /// Consumes the adversary view and the live maze to emit steering commands.
    pub fn handle(
        &mut self,
        lifecycle: Lifecycle,
        adversaries: &AdversaryView,
        maze: &Maze,
        sub_cell_units: u32,
        out: &mut Vec<Command>,
    ) {
        if lifecycle != Lifecycle::Running {
            return;
        }

        for adversary in adversaries.iter() {
            if !adversary.position.is_aligned(sub_cell_units) {
                continue;
            }
            self.collect_candidates(adversary, maze, sub_cell_units);

            match self.candidates.choose(&mut self.rng) {
                Some(&direction) if direction != adversary.direction => {
                    out.push(Command::TurnAdversary {
                        adversary: adversary.id,
                        direction,
                    });
                }
                Some(_) => {}
                None => {
                    debug!(adversary = adversary.id.get(), "adversary has no exit");
                    out.push(Command::HoldAdversary {
                        adversary: adversary.id,
                    });
                }
            }
        }
    }

    fn collect_candidates(&mut self, adversary: &AdversarySnapshot, maze: &Maze, units: u32) {
        let cell = adversary.position.cell(units);
        let current = maze.kind(cell);

        self.candidates.clear();
        self.candidates.extend(Direction::ALL.into_iter().filter(|direction| {
            let target = maze.kind(maze.neighbor(cell, *direction));
            !motion::is_blocked_for_adversary(target, current)
        }));

        if self.candidates.len() > 1 {
            let reverse = adversary.direction.opposite();
            self.candidates.retain(|direction| *direction != reverse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{AdversaryId, Position, ADVERSARY_COLORS};

    fn adversary(x: u32, y: u32, direction: Direction) -> AdversarySnapshot {
        AdversarySnapshot {
            id: AdversaryId::new(0),
            position: Position::new(x, y),
            direction,
            color: ADVERSARY_COLORS[0],
        }
    }

    #[test]
    fn dead_end_keeps_the_reverse_direction() {
        let maze = Maze::parse(&["s###", "  g#", "####"]).expect("maze parses");
        let mut ai = AdversaryAi::new(Config::new(9));
        ai.collect_candidates(&adversary(5, 5, Direction::Right), &maze, 5);
        assert_eq!(ai.candidates, vec![Direction::Left]);
    }

    #[test]
    fn junction_drops_only_the_reverse_direction() {
        let maze = Maze::parse(&["s    ", "     ", "     ", "     ", "    g"]).expect("maze parses");
        let mut ai = AdversaryAi::new(Config::new(9));
        ai.collect_candidates(&adversary(10, 10, Direction::Right), &maze, 5);
        assert_eq!(
            ai.candidates,
            vec![Direction::Up, Direction::Right, Direction::Down]
        );
    }
}
