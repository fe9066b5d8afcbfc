//! Movement legality and sub-cell stepping.
//!
//! Every mover advances one sub-cell unit per tick. A step either lands inside
//! the maze, wraps around to the opposite edge, or stalls against a cell the
//! mover may not enter. Which cell the mover is considered to be leaving
//! depends on the direction of travel: see [`departure_index_negative`] and
//! [`departure_index_positive`].

use maze_chase_core::{CellCoord, CellKind, Direction, MoverKind, Position};

use crate::maze::Maze;

/// Outcome of a single sub-cell step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The mover advanced by one unit inside the maze.
    Advanced(Position),
    /// The mover crossed an edge and reappeared on the opposite side.
    Wrapped(Position),
    /// The target cell is blocked; the mover keeps its position.
    Stalled(Position),
}

impl Step {
    /// Position of the mover after the step.
    #[must_use]
    pub const fn position(self) -> Position {
        match self {
            Self::Advanced(position) | Self::Wrapped(position) | Self::Stalled(position) => {
                position
            }
        }
    }
}

/// Reports whether an adversary standing on `current` may not enter `target`.
///
/// Adversaries inside the pen may walk anywhere but into walls, which lets
/// them leave through the restricted corridor. Once in the corridor they can
/// no longer fall back into the pen, and outside the pen region they can enter
/// neither the pen nor the corridor.
#[must_use]
pub const fn is_blocked_for_adversary(target: CellKind, current: CellKind) -> bool {
    match current {
        CellKind::AdversarySpawn => matches!(target, CellKind::Wall),
        CellKind::Restricted => matches!(target, CellKind::Wall | CellKind::AdversarySpawn),
        _ => matches!(
            target,
            CellKind::Wall | CellKind::AdversarySpawn | CellKind::Restricted
        ),
    }
}

/// Reports whether the player may not enter `target`.
#[must_use]
pub const fn is_blocked_for_player(target: CellKind) -> bool {
    matches!(
        target,
        CellKind::Wall | CellKind::AdversarySpawn | CellKind::Restricted
    )
}

/// Cell index a mover leaves when travelling toward decreasing coordinates.
///
/// Rounds up so that a mover part-way out of a cell still counts as standing
/// on the cell it came from.
#[must_use]
pub const fn departure_index_negative(coordinate: u32, units: u32) -> u32 {
    coordinate.div_ceil(units)
}

/// Cell index a mover leaves when travelling toward increasing coordinates.
#[must_use]
pub const fn departure_index_positive(coordinate: u32, units: u32) -> u32 {
    coordinate / units
}

/// Cell index entered after stepping toward decreasing coordinates.
#[must_use]
pub const fn target_index_negative(coordinate: u32, units: u32) -> u32 {
    coordinate / units
}

/// Cell index entered after stepping toward increasing coordinates.
#[must_use]
pub const fn target_index_positive(coordinate: u32, units: u32) -> u32 {
    coordinate.div_ceil(units)
}

/// Cell a mover at `position` is considered to stand on while heading `direction`.
#[must_use]
pub const fn departure_cell(position: Position, direction: Direction, units: u32) -> CellCoord {
    match direction {
        Direction::Left => CellCoord::new(
            departure_index_negative(position.x(), units),
            position.y() / units,
        ),
        Direction::Up => CellCoord::new(
            position.x() / units,
            departure_index_negative(position.y(), units),
        ),
        Direction::Right => CellCoord::new(
            departure_index_positive(position.x(), units),
            position.y() / units,
        ),
        Direction::Down => CellCoord::new(
            position.x() / units,
            departure_index_positive(position.y(), units),
        ),
    }
}

/// Reports whether `mover` may not step from `position` into `target` while heading `direction`.
#[must_use]
pub fn is_blocked(
    maze: &Maze,
    units: u32,
    target: CellKind,
    position: Position,
    direction: Direction,
    mover: MoverKind,
) -> bool {
    match mover {
        MoverKind::Player => is_blocked_for_player(target),
        MoverKind::Adversary => {
            let current = maze.kind(departure_cell(position, direction, units));
            is_blocked_for_adversary(target, current)
        }
    }
}

/// Advances `position` by one sub-cell unit along `direction`.
///
/// Stepping off an edge wraps to the last aligned position of the opposite
/// edge. Blocked steps leave the position untouched.
#[must_use]
pub fn step(
    maze: &Maze,
    units: u32,
    position: Position,
    direction: Direction,
    mover: MoverKind,
) -> Step {
    let (coordinate, across) = if direction.is_horizontal() {
        (position.x(), position.y() / units)
    } else {
        (position.y(), position.x() / units)
    };
    let extent = if direction.is_horizontal() {
        maze.columns()
    } else {
        maze.rows()
    };
    let last = (extent - 1) * units;

    let (next, target_index, wrapped) = if direction.is_negative() {
        match coordinate.checked_sub(1) {
            Some(next) => (next, target_index_negative(next, units), false),
            None => (last, extent - 1, true),
        }
    } else {
        let next = coordinate + 1;
        if next > last {
            (0, 0, true)
        } else {
            (next, target_index_positive(next, units), false)
        }
    };

    let target_cell = if direction.is_horizontal() {
        CellCoord::new(target_index, across)
    } else {
        CellCoord::new(across, target_index)
    };
    if is_blocked(maze, units, maze.kind(target_cell), position, direction, mover) {
        return Step::Stalled(position);
    }

    let moved = if direction.is_horizontal() {
        Position::new(next, position.y())
    } else {
        Position::new(position.x(), next)
    };
    if wrapped {
        Step::Wrapped(moved)
    } else {
        Step::Advanced(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNITS: u32 = 5;

    #[test]
    fn negative_departure_rounds_up() {
        assert_eq!(departure_index_negative(0, UNITS), 0);
        assert_eq!(departure_index_negative(1, UNITS), 1);
        assert_eq!(departure_index_negative(4, UNITS), 1);
        assert_eq!(departure_index_negative(5, UNITS), 1);
        assert_eq!(departure_index_negative(6, UNITS), 2);
    }

    #[test]
    fn positive_departure_rounds_down() {
        assert_eq!(departure_index_positive(0, UNITS), 0);
        assert_eq!(departure_index_positive(4, UNITS), 0);
        assert_eq!(departure_index_positive(5, UNITS), 1);
        assert_eq!(departure_index_positive(9, UNITS), 1);
    }

    #[test]
    fn targets_round_toward_travel() {
        assert_eq!(target_index_negative(9, UNITS), 1);
        assert_eq!(target_index_negative(10, UNITS), 2);
        assert_eq!(target_index_positive(11, UNITS), 3);
        assert_eq!(target_index_positive(10, UNITS), 2);
    }

    #[test]
    fn player_is_blocked_by_walls_and_pen_cells() {
        for kind in [CellKind::Wall, CellKind::AdversarySpawn, CellKind::Restricted] {
            assert!(is_blocked_for_player(kind), "{kind:?} should block");
        }
        for kind in [
            CellKind::Empty,
            CellKind::Pickup,
            CellKind::LargePickup,
            CellKind::PlayerSpawn,
        ] {
            assert!(!is_blocked_for_player(kind), "{kind:?} should not block");
        }
    }

    #[test]
    fn adversary_rules_depend_on_current_cell() {
        use CellKind::{AdversarySpawn, Empty, Pickup, Restricted, Wall};

        assert!(is_blocked_for_adversary(Wall, AdversarySpawn));
        assert!(!is_blocked_for_adversary(Restricted, AdversarySpawn));
        assert!(!is_blocked_for_adversary(AdversarySpawn, AdversarySpawn));
        assert!(!is_blocked_for_adversary(Empty, AdversarySpawn));

        assert!(is_blocked_for_adversary(Wall, Restricted));
        assert!(is_blocked_for_adversary(AdversarySpawn, Restricted));
        assert!(!is_blocked_for_adversary(Restricted, Restricted));
        assert!(!is_blocked_for_adversary(Pickup, Restricted));

        assert!(is_blocked_for_adversary(Wall, Pickup));
        assert!(is_blocked_for_adversary(AdversarySpawn, Empty));
        assert!(is_blocked_for_adversary(Restricted, Empty));
        assert!(!is_blocked_for_adversary(Pickup, Empty));
    }

    #[test]
    fn steps_advance_one_unit() {
        let maze = Maze::parse(&["s...g"]).expect("maze parses");
        let start = Position::new(5, 0);
        assert_eq!(
            step(&maze, UNITS, start, Direction::Right, MoverKind::Player),
            Step::Advanced(Position::new(6, 0))
        );
        assert_eq!(
            step(&maze, UNITS, start, Direction::Left, MoverKind::Player),
            Step::Advanced(Position::new(4, 0))
        );
    }

    #[test]
    fn walls_stall_at_the_cell_boundary() {
        let maze = Maze::parse(&["#s.#g"]).expect("maze parses");
        let boundary = Position::new(10, 0);
        assert_eq!(
            step(&maze, UNITS, boundary, Direction::Right, MoverKind::Player),
            Step::Stalled(boundary)
        );
        let left_boundary = Position::new(5, 0);
        assert_eq!(
            step(&maze, UNITS, left_boundary, Direction::Left, MoverKind::Player),
            Step::Stalled(left_boundary)
        );
    }

    #[test]
    fn edges_wrap_both_ways() {
        let maze = Maze::parse(&[" s g"]).expect("maze parses");
        assert_eq!(
            step(&maze, UNITS, Position::new(0, 0), Direction::Left, MoverKind::Player),
            Step::Stalled(Position::new(0, 0))
        );
        assert_eq!(
            step(&maze, UNITS, Position::new(15, 0), Direction::Right, MoverKind::Player),
            Step::Wrapped(Position::new(0, 0))
        );

        let open = Maze::parse(&["  s", "  g"]).expect("maze parses");
        assert_eq!(
            step(&open, UNITS, Position::new(0, 0), Direction::Left, MoverKind::Player),
            Step::Wrapped(Position::new(10, 0))
        );
        assert_eq!(
            step(&open, UNITS, Position::new(0, 0), Direction::Up, MoverKind::Player),
            Step::Wrapped(Position::new(0, 5))
        );
        assert_eq!(
            step(&open, UNITS, Position::new(0, 5), Direction::Down, MoverKind::Player),
            Step::Wrapped(Position::new(0, 0))
        );
    }

    #[test]
    fn adversaries_leave_the_pen_but_do_not_return() {
        let maze = Maze::parse(&[".s", "_#", "g#"]).expect("maze parses");
        let in_pen = Position::new(0, 10);
        assert_eq!(
            step(&maze, UNITS, in_pen, Direction::Up, MoverKind::Adversary),
            Step::Advanced(Position::new(0, 9))
        );

        let in_corridor = Position::new(0, 5);
        assert_eq!(
            step(&maze, UNITS, in_corridor, Direction::Up, MoverKind::Adversary),
            Step::Advanced(Position::new(0, 4))
        );
        assert_eq!(
            step(&maze, UNITS, in_corridor, Direction::Down, MoverKind::Adversary),
            Step::Stalled(in_corridor)
        );

        let outside = Position::new(0, 0);
        assert_eq!(
            step(&maze, UNITS, outside, Direction::Down, MoverKind::Adversary),
            Step::Stalled(outside)
        );
    }

    #[test]
    fn mid_cell_adversary_keeps_departure_cell_rules() {
        let maze = Maze::parse(&[".s", "_#", "g#"]).expect("maze parses");
        // Part-way between the pen (row 2) and the corridor (row 1).
        let between = Position::new(0, 7);
        assert_eq!(
            departure_cell(between, Direction::Up, UNITS),
            CellCoord::new(0, 2)
        );
        assert_eq!(
            step(&maze, UNITS, between, Direction::Up, MoverKind::Adversary),
            Step::Advanced(Position::new(0, 6))
        );
    }
}
