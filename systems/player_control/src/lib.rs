#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating the player's requested direction into turns.

use maze_chase_core::{Command, Lifecycle, PlayerSnapshot};
use maze_chase_world::{motion, Maze};

/// Decides when the player's requested direction becomes its travel direction.
///
/// Reversals take effect immediately, even between cells. Any other turn waits
/// until the player is aligned on a cell whose neighbour in the requested
/// direction is open.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Inspects the player and emits a turn command when the intent can be honoured.
    pub fn handle(
        &mut self,
        lifecycle: Lifecycle,
        player: &PlayerSnapshot,
        maze: &Maze,
        sub_cell_units: u32,
        out: &mut Vec<Command>,
    ) {
        if lifecycle != Lifecycle::Running || player.intent == player.direction {
            return;
        }

        if player.intent == player.direction.opposite() {
            out.push(Command::TurnPlayer {
                direction: player.intent,
            });
            return;
        }

        if !player.position.is_aligned(sub_cell_units) {
            return;
        }

        let neighbor = maze.neighbor(player.position.cell(sub_cell_units), player.intent);
        if !motion::is_blocked_for_player(maze.kind(neighbor)) {
            out.push(Command::TurnPlayer {
                direction: player.intent,
            });
        }
    }
}
