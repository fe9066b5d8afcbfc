#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The [`World`] owns the live maze, the player, every adversary, and the frame
//! counter. Nothing outside this crate mutates that state directly: callers
//! submit [`Command`] values through [`apply`] and observe the resulting
//! [`Event`] values, while [`query`] exposes read-only views.

pub mod maze;
pub mod motion;

use std::num::NonZeroU32;

use maze_chase_core::{
    AdversaryColor, AdversaryId, CellCoord, Command, Direction, Event, Lifecycle, MoverKind,
    Position, DEFAULT_SUB_CELL_UNITS, WELCOME_BANNER,
};
use tracing::debug;

pub use maze::{Maze, MazeError, Spawns};

/// Represents the authoritative Maze Chase world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    template: Maze,
    maze: Maze,
    units: NonZeroU32,
    lifecycle: Lifecycle,
    player: Player,
    adversaries: Vec<Adversary>,
    next_adversary_id: u32,
    frame: u64,
    lives: Option<u32>,
}

impl World {
    /// Creates a world around a validated maze. No game runs until [`Command::Start`].
    ///
    /// Fails when sub-cell coordinates at `sub_cell_units` per cell would not
    /// fit the maze into `u32`.
    pub fn new(maze: Maze, sub_cell_units: NonZeroU32) -> Result<Self, MazeError> {
        maze.check_resolution(sub_cell_units.get())?;
        let player = Player::at_spawn(maze.spawns().player, sub_cell_units.get());
        Ok(Self {
            banner: WELCOME_BANNER,
            template: maze.clone(),
            maze,
            units: sub_cell_units,
            lifecycle: Lifecycle::Uninitialized,
            player,
            adversaries: Vec::new(),
            next_adversary_id: 0,
            frame: 0,
            lives: None,
        })
    }

    /// Parses `template` and builds a world around it.
    pub fn from_template<S: AsRef<str>>(
        template: &[S],
        sub_cell_units: NonZeroU32,
    ) -> Result<Self, MazeError> {
        Self::new(Maze::parse(template)?, sub_cell_units)
    }

    /// Builds a world around the classic maze using the default sub-cell resolution.
    pub fn classic() -> Result<Self, MazeError> {
        let units = NonZeroU32::new(DEFAULT_SUB_CELL_UNITS).unwrap_or(NonZeroU32::MIN);
        Self::new(Maze::classic()?, units)
    }

    fn set_lifecycle(&mut self, lifecycle: Lifecycle, out_events: &mut Vec<Event>) {
        if self.lifecycle == lifecycle {
            return;
        }
        debug!(from = ?self.lifecycle, to = ?lifecycle, "lifecycle changed");
        self.lifecycle = lifecycle;
        out_events.push(Event::LifecycleChanged { lifecycle });
    }

    fn initialize(&mut self, out_events: &mut Vec<Event>) {
        self.maze = self.template.clone();
        self.player = Player::at_spawn(self.template.spawns().player, self.units.get());
        self.adversaries.clear();
        self.next_adversary_id = 0;
        self.frame = 0;
        self.set_lifecycle(Lifecycle::Running, out_events);
        out_events.push(Event::SimulationStarted);
    }

    fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    fn adversary_mut(&mut self, id: AdversaryId) -> Option<&mut Adversary> {
        self.adversaries.iter_mut().find(|adversary| adversary.id == id)
    }

    fn spawn_adversary(
        &mut self,
        spawn: CellCoord,
        direction: Direction,
        color: AdversaryColor,
        out_events: &mut Vec<Event>,
    ) {
        if !self.template.spawns().adversaries.contains(&spawn) {
            debug!(?spawn, "ignoring adversary spawn outside the pen");
            return;
        }

        let id = AdversaryId::new(self.next_adversary_id);
        self.next_adversary_id = self.next_adversary_id.saturating_add(1);
        let position = Position::at_cell(spawn, self.units.get());
        self.adversaries.push(Adversary {
            id,
            position,
            direction,
            color,
            holding: false,
        });
        out_events.push(Event::AdversarySpawned {
            adversary: id,
            position,
            direction,
            color,
        });
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        let units = self.units.get();

        let from = self.player.position;
        let to = motion::step(
            &self.maze,
            units,
            from,
            self.player.direction,
            MoverKind::Player,
        )
        .position();
        if to != from {
            self.player.position = to;
            out_events.push(Event::PlayerMoved { from, to });
        }
        if to.is_aligned(units) {
            let cell = to.cell(units);
            if let Some(kind) = self.maze.consume_pickup(cell) {
                out_events.push(Event::PickupConsumed { cell, kind });
            }
        }

        for adversary in &mut self.adversaries {
            if std::mem::take(&mut adversary.holding) {
                continue;
            }
            let from = adversary.position;
            let to = motion::step(
                &self.maze,
                units,
                from,
                adversary.direction,
                MoverKind::Adversary,
            )
            .position();
            if to != from {
                adversary.position = to;
                out_events.push(Event::AdversaryMoved {
                    adversary: adversary.id,
                    from,
                    to,
                });
            }
        }

        self.frame = self.frame.saturating_add(1);
        out_events.push(Event::FrameAdvanced { frame: self.frame });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => match world.lifecycle {
            Lifecycle::Running => {
                debug!("start requested while a game is running");
                out_events.push(Event::StartRejected);
            }
            Lifecycle::Uninitialized => world.initialize(out_events),
            Lifecycle::Stopped => world.set_lifecycle(Lifecycle::Running, out_events),
        },
        Command::Restart => world.initialize(out_events),
        Command::Stop => {
            if world.is_running() {
                world.set_lifecycle(Lifecycle::Stopped, out_events);
            }
        }
        Command::Tick => {
            if world.is_running() {
                world.advance(out_events);
            }
        }
        Command::SetPlayerIntent { direction } => {
            world.player.intent = direction;
        }
        Command::TurnPlayer { direction } => {
            if world.is_running() && world.player.direction != direction {
                let from = world.player.direction;
                world.player.direction = direction;
                out_events.push(Event::PlayerTurned {
                    from,
                    to: direction,
                });
            }
        }
        Command::SpawnAdversary {
            spawn,
            direction,
            color,
        } => {
            if world.is_running() {
                world.spawn_adversary(spawn, direction, color, out_events);
            }
        }
        Command::TurnAdversary {
            adversary,
            direction,
        } => {
            if !world.is_running() {
                return;
            }
            if let Some(state) = world.adversary_mut(adversary) {
                if state.direction != direction {
                    let from = state.direction;
                    state.direction = direction;
                    out_events.push(Event::AdversaryTurned {
                        adversary,
                        from,
                        to: direction,
                    });
                }
            }
        }
        Command::HoldAdversary { adversary } => {
            if !world.is_running() {
                return;
            }
            if let Some(state) = world.adversary_mut(adversary) {
                state.holding = true;
            }
        }
        Command::SetLives { hearts } => {
            if world.lives != Some(hearts) {
                world.lives = Some(hearts);
                out_events.push(Event::LivesUpdated { hearts });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{
        AdversarySnapshot, AdversaryView, CellCoord, Lifecycle, PlayerSnapshot,
        SimulationSnapshot,
    };

    use super::{Maze, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn lifecycle(world: &World) -> Lifecycle {
        world.lifecycle
    }

    /// Number of ticks completed since the game started.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Live maze, including pickups consumed so far.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Sub-cell units per cell edge.
    #[must_use]
    pub fn sub_cell_units(world: &World) -> u32 {
        world.units.get()
    }

    /// Adversary spawn cells in declaration order.
    #[must_use]
    pub fn adversary_spawns(world: &World) -> &[CellCoord] {
        &world.template.spawns().adversaries
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of the adversaries roaming the maze.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        AdversaryView::from_snapshots(adversary_snapshots(world))
    }

    /// Remaining lives, once reported.
    #[must_use]
    pub fn lives(world: &World) -> Option<u32> {
        world.lives
    }

    /// Captures everything a renderer needs to draw the current frame.
    #[must_use]
    pub fn snapshot(world: &World) -> SimulationSnapshot {
        SimulationSnapshot {
            lifecycle: world.lifecycle,
            frame: world.frame,
            columns: world.maze.columns(),
            rows: world.maze.rows(),
            sub_cell_units: world.units.get(),
            cells: world.maze.cells().to_vec(),
            player: world.player.snapshot(),
            adversaries: adversary_snapshots(world),
            lives: world.lives,
        }
    }

    fn adversary_snapshots(world: &World) -> Vec<AdversarySnapshot> {
        world
            .adversaries
            .iter()
            .map(|adversary| AdversarySnapshot {
                id: adversary.id,
                position: adversary.position,
                direction: adversary.direction,
                color: adversary.color,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Position,
    direction: Direction,
    intent: Direction,
}

impl Player {
    fn at_spawn(spawn: CellCoord, units: u32) -> Self {
        Self {
            position: Position::at_cell(spawn, units),
            direction: Direction::Left,
            intent: Direction::Left,
        }
    }

    fn snapshot(&self) -> maze_chase_core::PlayerSnapshot {
        maze_chase_core::PlayerSnapshot {
            position: self.position,
            direction: self.direction,
            intent: self.intent,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Adversary {
    id: AdversaryId,
    position: Position,
    direction: Direction,
    color: AdversaryColor,
    holding: bool,
}
