//! Maze layout and per-cell semantics.

use maze_chase_core::{CellCoord, CellKind, Direction};
use thiserror::Error;

/// Template of the maze shipped with the game.
pub const CLASSIC_TEMPLATE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.#####.##.#####.######",
    "######.#####.##.#####.######",
    "######.##..........##.######",
    "######.##.###__###.##.######",
    "######.##.#gg__gg#.##.######",
    "      ....#gg__gg#....      ",
    "######.##.#gggggg#.##.######",
    "######.##.########.##.######",
    "######.##..........##.######",
    "######.##.########.##.######",
    "######.##.########.##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#...##.......s........##...#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Reasons a maze template cannot be turned into a playable maze.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// The template contains no row or only empty rows.
    #[error("maze template is empty")]
    Empty,
    /// A row differs in width from the first row.
    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A symbol outside the maze alphabet was found.
    #[error("unknown maze symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
    /// No cell is marked as the player's spawn.
    #[error("maze has no player spawn")]
    MissingPlayerSpawn,
    /// More than one cell is marked as the player's spawn.
    #[error("maze declares {count} player spawns, expected exactly one")]
    DuplicatePlayerSpawn {
        /// Number of player spawn cells found.
        count: usize,
    },
    /// No cell is marked as an adversary spawn.
    #[error("maze has no adversary spawn")]
    MissingAdversarySpawn,
    /// Sub-cell positions along an axis would not fit in `u32`.
    #[error("a {columns}x{rows} maze cannot hold {units} sub-cell units per cell")]
    ResolutionTooFine {
        /// Number of maze columns.
        columns: u32,
        /// Number of maze rows.
        rows: u32,
        /// Rejected sub-cell units per cell edge.
        units: u32,
    },
}

/// Spawn locations discovered in a maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawns {
    /// Cell where the player starts.
    pub player: CellCoord,
    /// Adversary spawn cells in declaration order.
    pub adversaries: Vec<CellCoord>,
}

/// Rectangular toroidal grid of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
    spawns: Spawns,
}

impl Maze {
    /// Builds the maze shipped with the game.
    pub fn classic() -> Result<Self, MazeError> {
        Self::parse(&CLASSIC_TEMPLATE)
    }

    /// Parses a template made of equally wide rows of maze symbols.
    pub fn parse<S: AsRef<str>>(template: &[S]) -> Result<Self, MazeError> {
        let expected = template
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        if expected == 0 {
            return Err(MazeError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * template.len());
        for (row_index, row) in template.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(MazeError::Ragged {
                    row: row_index,
                    expected,
                    found,
                });
            }

            for (column, symbol) in row.chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or(MazeError::UnknownSymbol {
                    symbol,
                    row: row_index,
                    column,
                })?;
                cells.push(kind);
            }
        }

        let columns = u32::try_from(expected).map_err(|_| MazeError::Empty)?;
        let rows = u32::try_from(template.len()).map_err(|_| MazeError::Empty)?;
        let mut maze = Self {
            columns,
            rows,
            cells,
            spawns: Spawns {
                player: CellCoord::new(0, 0),
                adversaries: Vec::new(),
            },
        };
        maze.spawns = maze.find_spawns()?;
        Ok(maze)
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Checks that every sub-cell coordinate at `units` per cell fits in `u32`.
    pub fn check_resolution(&self, units: u32) -> Result<(), MazeError> {
        let fits = |extent: u32| extent.checked_mul(units).is_some();
        if fits(self.columns) && fits(self.rows) {
            Ok(())
        } else {
            Err(MazeError::ResolutionTooFine {
                columns: self.columns,
                rows: self.rows,
                units,
            })
        }
    }

    /// Cell kinds in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Spawn locations discovered when the maze was parsed.
    #[must_use]
    pub fn spawns(&self) -> &Spawns {
        &self.spawns
    }

    /// Looks up a cell, wrapping both indices around the maze edges.
    #[must_use]
    pub fn cell_at(&self, row: i64, column: i64) -> CellKind {
        let row = row.rem_euclid(i64::from(self.rows));
        let column = column.rem_euclid(i64::from(self.columns));
        let index = row * i64::from(self.columns) + column;
        usize::try_from(index)
            .ok()
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Wall)
    }

    /// Kind of the provided cell, wrapping out-of-range coordinates.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> CellKind {
        self.cell_at(i64::from(cell.row()), i64::from(cell.column()))
    }

    /// Adjacent cell in `direction`, wrapping around the maze edges.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        let column = cell.column() % self.columns;
        let row = cell.row() % self.rows;
        match direction {
            Direction::Left => CellCoord::new((column + self.columns - 1) % self.columns, row),
            Direction::Up => CellCoord::new(column, (row + self.rows - 1) % self.rows),
            Direction::Right => CellCoord::new((column + 1) % self.columns, row),
            Direction::Down => CellCoord::new(column, (row + 1) % self.rows),
        }
    }

    /// Scans the whole grid for spawn cells.
    ///
    /// Columns are visited in the outer loop and rows in the inner loop, so
    /// adversary spawns come out ordered column by column.
    pub fn find_spawns(&self) -> Result<Spawns, MazeError> {
        let mut players = Vec::new();
        let mut adversaries = Vec::new();
        for column in 0..self.columns {
            for row in 0..self.rows {
                let cell = CellCoord::new(column, row);
                match self.kind(cell) {
                    CellKind::PlayerSpawn => players.push(cell),
                    CellKind::AdversarySpawn => adversaries.push(cell),
                    _ => {}
                }
            }
        }

        let player = match players.as_slice() {
            [] => return Err(MazeError::MissingPlayerSpawn),
            [player] => *player,
            _ => {
                return Err(MazeError::DuplicatePlayerSpawn {
                    count: players.len(),
                })
            }
        };
        if adversaries.is_empty() {
            return Err(MazeError::MissingAdversarySpawn);
        }

        Ok(Spawns {
            player,
            adversaries,
        })
    }

    /// Turns a pickup cell into an empty one, reporting what was eaten.
    pub(crate) fn consume_pickup(&mut self, cell: CellCoord) -> Option<CellKind> {
        let index = self.index(cell)?;
        let slot = self.cells.get_mut(index)?;
        if !slot.is_pickup() {
            return None;
        }
        let eaten = *slot;
        *slot = CellKind::Empty;
        Some(eaten)
    }

    /// Number of pickups of either size still lying in the maze.
    #[must_use]
    pub fn remaining_pickups(&self) -> usize {
        self.cells.iter().filter(|kind| kind.is_pickup()).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}
