#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for Maze Chase.
//!
//! A [`Level`] is parsed from a plain-text layout with one glyph per cell and
//! implements [`Board`] so the agent can query and consume it. The adversaries
//! living in the level's pit are modelled by [`Ghost`].

mod ghost;

use std::{fs, io, path::Path, path::PathBuf};

use maze_chase_core::{Board, CellCoord, SpawnRegion, Tile};
use thiserror::Error;

pub use self::ghost::{Ghost, GhostId, GhostMode};

const CLASSIC_LAYOUT: &str = include_str!("../layouts/classic.txt");

const GLYPH_WALL: char = '#';
const GLYPH_PILL: char = '.';
const GLYPH_POWER_PILL: char = 'o';
const GLYPH_EMPTY: char = ' ';
const GLYPH_PIT: char = '-';
const GLYPH_GHOST: char = 'G';

/// Errors reported while loading a level layout.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The layout did not contain a single row.
    #[error("level layout is empty")]
    Empty,
    /// The layout is too large to address with cell coordinates.
    #[error("level layout exceeds the addressable grid size")]
    TooLarge,
    /// A glyph without a tile mapping was encountered.
    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// One-based line of the glyph.
        line: usize,
        /// One-based column of the glyph.
        column: usize,
    },
    /// The layout has no ghost pit to derive a spawn from.
    #[error("level layout has no ghost pit")]
    MissingPit,
    /// The cell below the pit, where the agent spawns, is closed.
    #[error("agent spawn cell ({}, {}) is not enterable", .cell.column(), .cell.row())]
    SpawnBlocked {
        /// Spawn cell derived from the pit.
        cell: CellCoord,
    },
    /// The layout file could not be read.
    #[error("failed to read level layout from {}", .path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Maze grid that the agent moves through.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    pristine: Vec<Tile>,
    pit: SpawnRegion,
    ghost_starts: Vec<CellCoord>,
}

impl Level {
    /// Returns the built-in layout shipped with the game.
    #[must_use]
    pub fn classic() -> Self {
        Self::parse(CLASSIC_LAYOUT).expect("built-in classic layout is valid")
    }

    /// Reads and parses a layout file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses a layout with one glyph per cell.
    ///
    /// `#` wall, `.` pill, `o` power pill, space empty, `-` pit floor and `G`
    /// pit floor hosting a ghost. Short lines are padded with empty floor and
    /// trailing empty lines are dropped.
    pub fn parse(layout: &str) -> Result<Self, LevelError> {
        let mut lines: Vec<&str> = layout.lines().collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            let _ = lines.pop();
        }
        if lines.is_empty() {
            return Err(LevelError::Empty);
        }

        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let columns = u32::try_from(width).map_err(|_| LevelError::TooLarge)?;
        let rows = u32::try_from(lines.len()).map_err(|_| LevelError::TooLarge)?;

        let mut tiles = vec![Tile::Empty; width * lines.len()];
        let mut ghost_starts = Vec::new();
        let mut pit_bounds: Option<(CellCoord, CellCoord)> = None;

        for (row_index, line) in lines.iter().enumerate() {
            for (column_index, glyph) in line.chars().enumerate() {
                let tile = tile_for_glyph(glyph).ok_or(LevelError::UnknownGlyph {
                    glyph,
                    line: row_index + 1,
                    column: column_index + 1,
                })?;
                tiles[row_index * width + column_index] = tile;

                if tile != Tile::GhostPit {
                    continue;
                }
                let cell = CellCoord::new(column_index as u32, row_index as u32);
                if glyph == GLYPH_GHOST {
                    ghost_starts.push(cell);
                }
                pit_bounds = Some(match pit_bounds {
                    None => (cell, cell),
                    Some((min, max)) => (
                        CellCoord::new(min.column().min(cell.column()), min.row().min(cell.row())),
                        CellCoord::new(max.column().max(cell.column()), max.row().max(cell.row())),
                    ),
                });
            }
        }

        let (min, max) = pit_bounds.ok_or(LevelError::MissingPit)?;
        let pit = SpawnRegion::new(
            min,
            max.column() - min.column() + 1,
            max.row() - min.row() + 1,
        );

        let level = Self {
            columns,
            rows,
            pristine: tiles.clone(),
            tiles,
            pit,
            ghost_starts,
        };

        let spawn = pit.agent_spawn();
        if !level.is_enterable(spawn) {
            return Err(LevelError::SpawnBlocked { cell: spawn });
        }

        Ok(level)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells marked as ghost starting positions, in reading order.
    #[must_use]
    pub fn ghost_starts(&self) -> &[CellCoord] {
        &self.ghost_starts
    }

    /// Number of pickups, plain or power, still on the board.
    #[must_use]
    pub fn remaining_pills(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_pickup()).count()
    }

    /// Puts every consumed pickup back in place.
    pub fn restore(&mut self) {
        self.tiles.clone_from(&self.pristine);
    }

    /// Iterates over every cell and its contents in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl Board for Level {
    fn is_enterable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.tiles.get(index))
            .is_some_and(|tile| tile.is_open())
    }

    fn tile(&self, cell: CellCoord) -> Tile {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Wall)
    }

    fn set_tile(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    fn spawn_region(&self) -> SpawnRegion {
        self.pit
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

fn tile_for_glyph(glyph: char) -> Option<Tile> {
    match glyph {
        GLYPH_WALL => Some(Tile::Wall),
        GLYPH_PILL => Some(Tile::Pill),
        GLYPH_POWER_PILL => Some(Tile::PowerPill),
        GLYPH_EMPTY => Some(Tile::Empty),
        GLYPH_PIT | GLYPH_GHOST => Some(Tile::GhostPit),
        _ => None,
    }
}
