#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-rate driver that sequences the systems around the world.
//!
//! [`Simulation`] owns the world together with every system and performs one
//! complete tick per call. [`Clock`] repeats those ticks at a fixed rate,
//! feeding inputs in and handing each finished frame to a presenter.

use std::{
    num::NonZeroU32,
    ops::ControlFlow,
    thread,
    time::{Duration, Instant},
};

use maze_chase_core::{
    AdversaryColor, Command, Direction, Event, Lifecycle, SimulationSnapshot, ADVERSARY_COLORS,
    DEFAULT_SUB_CELL_UNITS,
};
use maze_chase_system_adversary_ai::{self as adversary_ai, AdversaryAi};
use maze_chase_system_player_control::PlayerControl;
use maze_chase_system_spawning::{self as spawning, Spawning, DEFAULT_ADVERSARY_COUNT};
use maze_chase_world::{self as world, query, Maze, MazeError, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Tick rate used when none is configured.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 20;

/// Parameters shaping a simulation.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Sub-cell units per cell edge.
    pub sub_cell_units: NonZeroU32,
    /// Adversaries released on every (re)start.
    pub adversary_count: usize,
    /// Palette cycled through when adversaries are released.
    pub adversary_colors: Vec<AdversaryColor>,
    /// Seed from which every random choice is derived.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sub_cell_units: NonZeroU32::new(DEFAULT_SUB_CELL_UNITS).unwrap_or(NonZeroU32::MIN),
            adversary_count: DEFAULT_ADVERSARY_COUNT,
            adversary_colors: ADVERSARY_COLORS.to_vec(),
            seed: 0,
        }
    }
}

/// External inputs applied at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInputs {
    /// Most recent direction requested by the player.
    pub intent: Option<Direction>,
    /// Most recent heart count reported by the credit service.
    pub lives: Option<u32>,
}

/// World plus the systems reacting to it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    player_control: PlayerControl,
    adversary_ai: AdversaryAi,
    spawning: Spawning,
}

impl Simulation {
    /// Creates a simulation around `maze`. The game starts with [`Simulation::start`].
    ///
    /// Fails when the maze cannot be addressed at `config.sub_cell_units`.
    pub fn new(maze: Maze, config: SimulationConfig) -> Result<Self, MazeError> {
        let mut seeder = ChaCha8Rng::seed_from_u64(config.seed);
        let spawning_seed = seeder.next_u64();
        let steering_seed = seeder.next_u64();

        Ok(Self {
            world: World::new(maze, config.sub_cell_units)?,
            player_control: PlayerControl,
            adversary_ai: AdversaryAi::new(adversary_ai::Config::new(steering_seed)),
            spawning: Spawning::new(spawning::Config::new(
                config.adversary_count,
                config.adversary_colors,
                spawning_seed,
            )),
        })
    }

    /// Starts the game, or resumes it when stopped.
    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.execute(Command::Start, &mut events);
        events
    }

    /// Throws the current game away and starts a fresh one.
    pub fn restart(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.execute(Command::Restart, &mut events);
        events
    }

    /// Pauses the game.
    pub fn stop(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.execute(Command::Stop, &mut events);
        events
    }

    /// Performs one complete tick and returns every event it produced.
    pub fn tick(&mut self, inputs: TickInputs) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(hearts) = inputs.lives {
            world::apply(&mut self.world, Command::SetLives { hearts }, &mut events);
        }
        if let Some(direction) = inputs.intent {
            world::apply(
                &mut self.world,
                Command::SetPlayerIntent { direction },
                &mut events,
            );
        }

        let lifecycle = query::lifecycle(&self.world);
        let units = query::sub_cell_units(&self.world);
        let mut commands = Vec::new();
        self.player_control.handle(
            lifecycle,
            &query::player(&self.world),
            query::maze(&self.world),
            units,
            &mut commands,
        );
        self.adversary_ai.handle(
            lifecycle,
            &query::adversary_view(&self.world),
            query::maze(&self.world),
            units,
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::Tick, &mut events);
        events
    }

    /// Captures the state a renderer draws.
    #[must_use]
    pub fn snapshot(&self) -> SimulationSnapshot {
        query::snapshot(&self.world)
    }

    /// Read-only access to the world for further queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn execute(&mut self, command: Command, events: &mut Vec<Event>) {
        let first = events.len();
        world::apply(&mut self.world, command, events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events[first..],
            query::adversary_spawns(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }
}

/// Waits out the remainder of a tick period.
pub trait Pacer {
    /// Blocks until `period` has elapsed since the previous call returned.
    fn wait(&mut self, period: Duration);
}

/// Pacer sleeping the current thread.
#[derive(Debug, Default)]
pub struct ThreadPacer {
    last: Option<Instant>,
}

impl Pacer for ThreadPacer {
    fn wait(&mut self, period: Duration) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Fixed-rate tick loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    period: Duration,
    frame_limit: Option<u64>,
}

impl Clock {
    /// Creates a clock ticking `ticks_per_second` times per second.
    #[must_use]
    pub fn from_rate(ticks_per_second: NonZeroU32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.get(),
            frame_limit: None,
        }
    }

    /// Stops the loop after `frames` ticks.
    #[must_use]
    pub const fn with_frame_limit(mut self, frames: Option<u64>) -> Self {
        self.frame_limit = frames;
        self
    }

    /// Time between two ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Ticks `simulation` until the frame limit is hit, the presenter breaks,
    /// or the game stops running. Returns the number of ticks performed.
    ///
    /// `input` receives the frame about to be played. `present` sees the
    /// snapshot after each tick together with the events it produced.
    pub fn run<P, I, R, E>(
        &self,
        simulation: &mut Simulation,
        pacer: &mut P,
        mut input: I,
        mut present: R,
    ) -> Result<u64, E>
    where
        P: Pacer,
        I: FnMut(u64) -> TickInputs,
        R: FnMut(&SimulationSnapshot, &[Event]) -> Result<ControlFlow<()>, E>,
    {
        let mut ticks = 0;
        loop {
            if self.frame_limit.is_some_and(|limit| ticks >= limit) {
                debug!(ticks, "frame limit reached");
                break;
            }
            if query::lifecycle(simulation.world()) != Lifecycle::Running {
                debug!(ticks, "simulation no longer running");
                break;
            }

            pacer.wait(self.period);
            let inputs = input(query::frame(simulation.world()));
            let events = simulation.tick(inputs);
            ticks += 1;

            if present(&simulation.snapshot(), &events)?.is_break() {
                debug!(ticks, "presenter stopped the clock");
                break;
            }
        }
        Ok(ticks)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::from_rate(NonZeroU32::new(DEFAULT_TICKS_PER_SECOND).unwrap_or(NonZeroU32::MIN))
    }
}
