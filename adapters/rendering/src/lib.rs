#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.
//!
//! Backends never see the world. They receive a [`Scene`] derived from a
//! [`SimulationSnapshot`], with every mover expressed in fractional tile
//! coordinates so that sub-cell motion can be drawn smoothly.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use maze_chase_core::{
    AdversaryColor, AdversaryId, CellKind, Direction, Lifecycle, Position, SimulationSnapshot,
};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<AdversaryColor> for Color {
    fn from(color: AdversaryColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Player as drawn in the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Top-left corner of the sprite in tile units.
    pub position: Vec2,
    /// Direction the player is facing.
    pub facing: Direction,
}

/// Adversary as drawn in the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdversaryPresentation {
    /// Identifier allocated by the world.
    pub id: AdversaryId,
    /// Top-left corner of the sprite in tile units.
    pub position: Vec2,
    /// Body color.
    pub color: Color,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Row-major tile kinds.
    pub tiles: Vec<CellKind>,
    /// The player sprite.
    pub player: PlayerPresentation,
    /// Adversary sprites ordered by identifier.
    pub adversaries: Vec<AdversaryPresentation>,
    /// Frame the scene was captured at.
    pub frame: u64,
    /// Lifecycle stage the scene was captured in.
    pub lifecycle: Lifecycle,
    /// Remaining lives, once reported.
    pub lives: Option<u32>,
}

impl Scene {
    /// Converts a simulation snapshot into tile-space presentation data.
    pub fn from_snapshot(snapshot: &SimulationSnapshot) -> Result<Self, RenderingError> {
        if snapshot.sub_cell_units == 0 {
            return Err(RenderingError::InvalidSubCellUnits);
        }
        let expected = snapshot.columns as usize * snapshot.rows as usize;
        if snapshot.cells.len() != expected {
            return Err(RenderingError::TileCountMismatch {
                expected,
                found: snapshot.cells.len(),
            });
        }

        let units = snapshot.sub_cell_units as f32;
        let adversaries = snapshot
            .adversaries
            .iter()
            .map(|adversary| AdversaryPresentation {
                id: adversary.id,
                position: tile_space(adversary.position, units),
                color: adversary.color.into(),
            })
            .collect();

        Ok(Self {
            columns: snapshot.columns,
            rows: snapshot.rows,
            tiles: snapshot.cells.clone(),
            player: PlayerPresentation {
                position: tile_space(snapshot.player.position, units),
                facing: snapshot.player.direction,
            },
            adversaries,
            frame: snapshot.frame,
            lifecycle: snapshot.lifecycle,
            lives: snapshot.lives,
        })
    }

    /// Number of pickups still visible.
    #[must_use]
    pub fn pickups(&self) -> usize {
        self.tiles.iter().filter(|kind| kind.is_pickup()).count()
    }
}

fn tile_space(position: Position, units: f32) -> Vec2 {
    Vec2::new(position.x() as f32, position.y() as f32) / units
}

/// Backend able to present successive scenes.
pub trait RenderingBackend {
    /// Draws one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend printing frames as text, one character per tile.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing frames to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders `scene` into lines of text without writing them.
    #[must_use]
    pub fn render(scene: &Scene) -> Vec<String> {
        let columns = scene.columns as usize;
        let mut grid: Vec<Vec<char>> = scene
            .tiles
            .chunks(columns.max(1))
            .map(|row| row.iter().map(|kind| tile_glyph(*kind)).collect())
            .collect();

        let mut stamp = |position: Vec2, glyph: char| {
            let column = nearest_tile(position.x, scene.columns);
            let row = nearest_tile(position.y, scene.rows);
            if let Some(slot) = grid.get_mut(row).and_then(|line| line.get_mut(column)) {
                *slot = glyph;
            }
        };
        stamp(scene.player.position, player_glyph(scene.player.facing));
        for adversary in &scene.adversaries {
            stamp(adversary.position, 'A');
        }

        let mut lines: Vec<String> = grid.into_iter().map(String::from_iter).collect();
        let lives = scene
            .lives
            .map_or_else(|| "-".to_owned(), |hearts| hearts.to_string());
        lines.push(format!(
            "frame {}  pickups {}  lives {}",
            scene.frame,
            scene.pickups(),
            lives
        ));
        lines
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        for line in Self::render(scene) {
            writeln!(self.out, "{line}").context("failed to write frame")?;
        }
        writeln!(self.out).context("failed to write frame separator")?;
        self.out.flush().context("failed to flush frame")
    }
}

fn nearest_tile(coordinate: f32, extent: u32) -> usize {
    let rounded = coordinate.round() as u32;
    if rounded >= extent {
        0
    } else {
        rounded as usize
    }
}

fn tile_glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Wall => '#',
        CellKind::Pickup => '.',
        CellKind::LargePickup => 'o',
        CellKind::Restricted => '-',
        CellKind::Empty | CellKind::PlayerSpawn | CellKind::AdversarySpawn => ' ',
    }
}

fn player_glyph(facing: Direction) -> char {
    match facing {
        Direction::Left => '>',
        Direction::Up => 'v',
        Direction::Right => '<',
        Direction::Down => '^',
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Sub-cell units must be positive to map positions onto tiles.
    #[error("sub-cell units must be positive")]
    InvalidSubCellUnits,
    /// The snapshot does not carry one tile per grid slot.
    #[error("expected {expected} tiles but the snapshot holds {found}")]
    TileCountMismatch {
        /// Tile count implied by the grid dimensions.
        expected: usize,
        /// Tile count present in the snapshot.
        found: usize,
    },
}
