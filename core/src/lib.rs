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
//! This crate defines the vocabulary that connects the maze, the player
//! controlled agent, its adversaries and the adapters. The maze is reached
//! exclusively through the [`Board`] trait and adversaries through the
//! [`Adversary`] trait, so the agent's state machine never depends on a
//! concrete level or ghost type. Systems report what happened during a tick by
//! appending [`Event`] values to a caller-provided buffer.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Cardinal movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

/// Physical keys the input decoder understands.
///
/// Both the arrow keys and the WASD cluster steer the agent. Everything else
/// collapses into [`Key::Other`] and is ignored by the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Arrow key pointing up.
    ArrowUp,
    /// Arrow key pointing down.
    ArrowDown,
    /// Arrow key pointing left.
    ArrowLeft,
    /// Arrow key pointing right.
    ArrowRight,
    /// `W`, an alias for up.
    W,
    /// `A`, an alias for left.
    A,
    /// `S`, an alias for down.
    S,
    /// `D`, an alias for right.
    D,
    /// Any key without a movement binding.
    Other,
}

impl Key {
    /// Direction bound to the key, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowUp | Self::W => Some(Direction::Up),
            Self::ArrowDown | Self::S => Some(Direction::Down),
            Self::ArrowLeft | Self::A => Some(Direction::Left),
            Self::ArrowRight | Self::D => Some(Direction::Right),
            Self::Other => None,
        }
    }
}

/// Discrete keyboard transitions delivered by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// The key went down on this frame.
    KeyDown(Key),
    /// The key was released on this frame.
    KeyUp(Key),
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

    /// Returns the neighbouring cell one step in `direction`.
    ///
    /// Returns `None` when the step would leave the unsigned coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_sub(1)),
            Direction::Down => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
        };
        Some(CellCoord::new(column?, row?))
    }
}

/// Contents of a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open floor with nothing to collect.
    #[default]
    Empty,
    /// Plain pickup worth a single point.
    Pill,
    /// Pickup that empowers the agent.
    PowerPill,
    /// Solid obstacle.
    Wall,
    /// Floor of the adversaries' pit, closed to the agent.
    GhostPit,
}

impl Tile {
    /// Reports whether the tile is a pickup the agent can consume.
    #[must_use]
    pub const fn is_pickup(self) -> bool {
        matches!(self, Self::Pill | Self::PowerPill)
    }

    /// Reports whether the agent may stand on the tile.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Wall | Self::GhostPit)
    }
}

/// Rectangular region of the board that hosts the adversaries' pit.
///
/// The agent spawns directly below the region's bottom edge, centred on its
/// width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnRegion {
    origin: CellCoord,
    width: u32,
    height: u32,
}

impl SpawnRegion {
    /// Creates a region anchored at its upper-left cell.
    #[must_use]
    pub const fn new(origin: CellCoord, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Upper-left cell of the region.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Width of the region in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the region in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell where the agent enters the round: one row below the region,
    /// at the column `origin + width / 2`.
    #[must_use]
    pub const fn agent_spawn(&self) -> CellCoord {
        CellCoord::new(
            self.origin.column() + self.width / 2,
            self.origin.row() + self.height,
        )
    }
}

/// Queryable maze consumed by the agent.
pub trait Board {
    /// Reports whether the agent may occupy `cell`.
    fn is_enterable(&self, cell: CellCoord) -> bool;

    /// Contents of `cell`. Cells outside the board read as [`Tile::Wall`].
    fn tile(&self, cell: CellCoord) -> Tile;

    /// Replaces the contents of `cell`. Writes outside the board are ignored.
    fn set_tile(&mut self, cell: CellCoord, tile: Tile);

    /// Region hosting the adversaries' pit, used to derive the agent spawn.
    fn spawn_region(&self) -> SpawnRegion;

    /// Board size as `(columns, rows)`.
    fn dimensions(&self) -> (u32, u32);
}

/// Entity that reacts to the agent's empowered state.
///
/// The agent only ever calls [`Adversary::notify_empowered`]; it never reads
/// adversary state.
pub trait Adversary {
    /// Reports the agent's remaining empowered time in milliseconds.
    ///
    /// Values at or below zero mean the empowerment is over.
    fn notify_empowered(&mut self, time_left_ms: f64);
}

impl<T: Adversary + ?Sized> Adversary for Box<T> {
    fn notify_empowered(&mut self, time_left_ms: f64) {
        (**self).notify_empowered(time_left_ms);
    }
}

impl<T: Adversary + ?Sized> Adversary for &mut T {
    fn notify_empowered(&mut self, time_left_ms: f64) {
        (**self).notify_empowered(time_left_ms);
    }
}

/// Events broadcast by the agent while advancing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The agent completed a single-cell step.
    AgentMoved {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after the move.
        to: CellCoord,
    },
    /// A move attempt fired but the neighbouring cell was not enterable.
    AgentBlocked {
        /// Cell the agent remains on.
        at: CellCoord,
        /// Direction that was held during the attempt.
        direction: Direction,
    },
    /// The agent consumed a pickup.
    TileConsumed {
        /// Cell that held the pickup.
        cell: CellCoord,
        /// Pickup that was consumed.
        tile: Tile,
        /// Score after the pickup was credited.
        score: u32,
    },
    /// A power pickup switched the agent into empowered mode.
    EmpowermentStarted {
        /// Duration granted by the pickup, in milliseconds.
        duration_ms: f64,
    },
    /// The empowered time ran out.
    EmpowermentEnded,
}
