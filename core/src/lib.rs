#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems consume immutable snapshots and
//! respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Number of sub-cell units that make up a single cell edge by default.
pub const DEFAULT_SUB_CELL_UNITS: u32 = 5;

/// Lifecycle of the simulation owned by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// The world holds a validated maze but no game has been started yet.
    Uninitialized,
    /// Ticks advance movers.
    Running,
    /// Ticks are ignored until the game is started or restarted again.
    Stopped,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a fresh game, or resumes a stopped one.
    Start,
    /// Discards the current game and starts a fresh one from the maze template.
    Restart,
    /// Halts the running game without discarding its state.
    Stop,
    /// Advances every mover by one sub-cell step and bumps the frame counter.
    Tick,
    /// Records the direction most recently requested by the input source.
    SetPlayerIntent {
        /// Direction the player would like to travel in.
        direction: Direction,
    },
    /// Switches the player's current direction of travel.
    TurnPlayer {
        /// Direction the player travels in from now on.
        direction: Direction,
    },
    /// Places a new adversary on one of the maze's adversary spawn cells.
    SpawnAdversary {
        /// Spawn cell the adversary starts on.
        spawn: CellCoord,
        /// Initial direction of travel.
        direction: Direction,
        /// Appearance assigned to the adversary.
        color: AdversaryColor,
    },
    /// Switches an adversary's current direction of travel.
    TurnAdversary {
        /// Identifier of the adversary that turns.
        adversary: AdversaryId,
        /// Direction the adversary travels in from now on.
        direction: Direction,
    },
    /// Keeps an adversary in place during the next tick.
    HoldAdversary {
        /// Identifier of the adversary that holds position.
        adversary: AdversaryId,
    },
    /// Replaces the number of remaining lives reported by the credit service.
    SetLives {
        /// Remaining lives ("hearts") owned by the player.
        hearts: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the simulation entered a new lifecycle stage.
    LifecycleChanged {
        /// Stage that became active after processing the command.
        lifecycle: Lifecycle,
    },
    /// Announces that a fresh game was initialized from the maze template.
    SimulationStarted,
    /// Reports that a start request arrived while a game was already running.
    StartRejected,
    /// Confirms that a tick completed.
    FrameAdvanced {
        /// Frame counter after the tick.
        frame: u64,
    },
    /// Confirms that the player switched direction.
    PlayerTurned {
        /// Direction before the switch.
        from: Direction,
        /// Direction after the switch.
        to: Direction,
    },
    /// Confirms that the player changed position during a tick.
    PlayerMoved {
        /// Position before the step.
        from: Position,
        /// Position after the step.
        to: Position,
    },
    /// Confirms that the player ate the pickup lying on a cell.
    PickupConsumed {
        /// Cell that held the pickup.
        cell: CellCoord,
        /// Kind of pickup that was eaten.
        kind: CellKind,
    },
    /// Confirms that an adversary was placed into the maze.
    AdversarySpawned {
        /// Identifier assigned to the adversary.
        adversary: AdversaryId,
        /// Position the adversary starts at.
        position: Position,
        /// Initial direction of travel.
        direction: Direction,
        /// Appearance assigned to the adversary.
        color: AdversaryColor,
    },
    /// Confirms that an adversary switched direction.
    AdversaryTurned {
        /// Identifier of the adversary.
        adversary: AdversaryId,
        /// Direction before the switch.
        from: Direction,
        /// Direction after the switch.
        to: Direction,
    },
    /// Confirms that an adversary changed position during a tick.
    AdversaryMoved {
        /// Identifier of the adversary.
        adversary: AdversaryId,
        /// Position before the step.
        from: Position,
        /// Position after the step.
        to: Position,
    },
    /// Confirms that the remaining lives changed.
    LivesUpdated {
        /// Remaining lives after the update.
        hearts: u32,
    },
}

/// Cardinal movement directions.
///
/// The discriminants follow the order `Left, Up, Right, Down`, which makes the
/// opposite direction a rotation by two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
}

impl Direction {
    /// Every direction in canonical evaluation order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Zero-based index of the direction within [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }

    /// Direction stored at `index` modulo four.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Direction pointing the other way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Reports whether travel happens along the column axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Reports whether travel decreases the coordinate on its axis.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }

    /// Parses a direction name such as `left` or a single-letter shorthand.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "up" | "u" => Some(Self::Up),
            "right" | "r" => Some(Self::Right),
            "down" | "d" => Some(Self::Down),
            _ => None,
        }
    }
}

/// Semantics attached to a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable for every mover.
    Wall,
    /// Open floor without a pickup.
    Empty,
    /// Small pickup.
    Pickup,
    /// Large pickup.
    LargePickup,
    /// Cell where the player starts.
    PlayerSpawn,
    /// Cell inside the adversary pen where adversaries start.
    AdversarySpawn,
    /// Corridor reserved for adversaries leaving the pen.
    Restricted,
}

impl CellKind {
    /// Maps a template symbol onto its cell kind.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Empty),
            '.' => Some(Self::Pickup),
            'o' => Some(Self::LargePickup),
            's' => Some(Self::PlayerSpawn),
            'g' => Some(Self::AdversarySpawn),
            '_' => Some(Self::Restricted),
            _ => None,
        }
    }

    /// Template symbol describing the cell kind.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => ' ',
            Self::Pickup => '.',
            Self::LargePickup => 'o',
            Self::PlayerSpawn => 's',
            Self::AdversarySpawn => 'g',
            Self::Restricted => '_',
        }
    }

    /// Reports whether the player eats something when standing on the cell.
    #[must_use]
    pub const fn is_pickup(self) -> bool {
        matches!(self, Self::Pickup | Self::LargePickup)
    }
}

/// Kind of mover whose legality is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoverKind {
    /// The player-controlled character.
    Player,
    /// A roaming adversary.
    Adversary,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Continuous mover position measured in sub-cell units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a position from raw sub-cell coordinates.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Position sitting exactly on the provided cell.
    #[must_use]
    pub const fn at_cell(cell: CellCoord, units: u32) -> Self {
        Self {
            x: cell.column() * units,
            y: cell.row() * units,
        }
    }

    /// Coordinate along the column axis.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Coordinate along the row axis.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether both coordinates sit exactly on a cell boundary.
    #[must_use]
    pub const fn is_aligned(&self, units: u32) -> bool {
        self.x % units == 0 && self.y % units == 0
    }

    /// Cell containing the position, rounding both coordinates down.
    #[must_use]
    pub const fn cell(&self, units: u32) -> CellCoord {
        CellCoord::new(self.x / units, self.y / units)
    }
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Visual appearance applied to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdversaryColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl AdversaryColor {
    /// Creates a new adversary color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a `#rrggbb` (or `rrggbb`) hexadecimal color.
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Palette cycled through when adversaries are spawned.
pub const ADVERSARY_COLORS: [AdversaryColor; 4] = [
    AdversaryColor::from_rgb(0xff, 0x00, 0x00),
    AdversaryColor::from_rgb(0x00, 0xff, 0x00),
    AdversaryColor::from_rgb(0x00, 0x00, 0xff),
    AdversaryColor::from_rgb(0xff, 0x77, 0x00),
];

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Current position in sub-cell units.
    pub position: Position,
    /// Direction the player currently travels in.
    pub direction: Direction,
    /// Direction most recently requested by the input source.
    pub intent: Direction,
}

/// Immutable representation of a single adversary used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarySnapshot {
    /// Unique identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Current position in sub-cell units.
    pub position: Position,
    /// Direction the adversary currently travels in.
    pub direction: Direction,
    /// Appearance assigned to the adversary.
    pub color: AdversaryColor,
}

/// Read-only snapshot describing all adversaries within the maze.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new adversary view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AdversarySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Number of adversaries captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no adversary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AdversarySnapshot> {
        self.snapshots
    }
}

/// Complete read-only state handed to renderers after every tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Lifecycle stage at the time of capture.
    pub lifecycle: Lifecycle,
    /// Number of completed ticks.
    pub frame: u64,
    /// Number of maze columns.
    pub columns: u32,
    /// Number of maze rows.
    pub rows: u32,
    /// Sub-cell units per cell edge.
    pub sub_cell_units: u32,
    /// Live cell kinds in row-major order.
    pub cells: Vec<CellKind>,
    /// Player state.
    pub player: PlayerSnapshot,
    /// Adversary states in spawn order.
    pub adversaries: Vec<AdversarySnapshot>,
    /// Remaining lives, once the credit service reported them.
    pub lives: Option<u32>,
}

impl SimulationSnapshot {
    /// Cell kind stored at the provided coordinate, if it lies within the maze.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellKind> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.cells.get(row * width + column).copied()
    }
}
