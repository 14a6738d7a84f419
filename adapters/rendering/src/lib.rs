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
//! Everything here is pure pixel math and plain data. Backends receive a
//! [`Presentation`] once, then repeatedly hand the latest [`Scene`] to their
//! draw routine using the shapes computed by [`CellMetrics`],
//! [`AgentPresentation`] and [`GhostPresentation`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{CellCoord, Direction, InputEvent, Tile};
use std::time::Duration;
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
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

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

/// Immutable set of colors used to draw a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind the maze.
    pub background: Color,
    /// Wall blocks.
    pub wall: Color,
    /// Plain pills.
    pub pill: Color,
    /// Power pills.
    pub power_pill: Color,
    /// Body of the agent.
    pub agent_body: Color,
    /// Mouth wedge cut out of the agent.
    pub agent_mouth: Color,
    /// Ghosts while chasing.
    pub ghost: Color,
    /// Ghosts while the agent is empowered.
    pub frightened_ghost: Color,
}

impl Palette {
    /// Arcade colors: green walls, a yellow agent with a black mouth.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            background: Color::from_rgb_u8(0, 0, 0),
            wall: Color::from_rgb_u8(0x00, 0xff, 0x00),
            pill: Color::from_rgb_u8(0xff, 0xe0, 0xc0),
            power_pill: Color::from_rgb_u8(0xff, 0xff, 0xff),
            agent_body: Color::from_rgb_u8(0xff, 0xff, 0x00),
            agent_mouth: Color::from_rgb_u8(0, 0, 0),
            ghost: Color::from_rgb_u8(0xff, 0x30, 0x30),
            frightened_ghost: Color::from_rgb_u8(0x30, 0x30, 0xff),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Movement key transitions observed during the frame, in arrival order.
    pub key_events: Vec<InputEvent>,
    /// Whether the player requested a round restart on this frame.
    pub restart: bool,
}

/// Pixel dimensions of a single maze cell on a given surface.
///
/// The surface is divided into `columns + 2` by `rows + 2` whole-pixel cells
/// so a one-cell margin surrounds the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellMetrics {
    cell_width: u32,
    cell_height: u32,
}

impl CellMetrics {
    /// Computes the cell size for a `columns` by `rows` maze drawn on a
    /// surface of `surface_width` by `surface_height` pixels.
    pub fn new(
        surface_width: u32,
        surface_height: u32,
        columns: u32,
        rows: u32,
    ) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }

        let cell_width = surface_width / columns.saturating_add(2);
        let cell_height = surface_height / rows.saturating_add(2);
        if cell_width == 0 || cell_height == 0 {
            return Err(RenderingError::SurfaceTooSmall {
                width: surface_width,
                height: surface_height,
            });
        }

        Ok(Self {
            cell_width,
            cell_height,
        })
    }

    /// Width of a cell in pixels.
    #[must_use]
    pub const fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Height of a cell in pixels.
    #[must_use]
    pub const fn cell_height(&self) -> u32 {
        self.cell_height
    }

    /// Cell size as a vector.
    #[must_use]
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(self.cell_width as f32, self.cell_height as f32)
    }

    /// Upper-left pixel of `cell`, shifted by the one-cell margin.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            ((cell.column() + 1) * self.cell_width) as f32,
            ((cell.row() + 1) * self.cell_height) as f32,
        )
    }

    /// Whole-pixel centre of `cell`.
    #[must_use]
    pub fn cell_centre(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell)
            + Vec2::new(
                (self.cell_width / 2) as f32,
                (self.cell_height / 2) as f32,
            )
    }

    /// Radius of the round bodies drawn inside a cell.
    #[must_use]
    pub fn body_radius(&self) -> f32 {
        (self.cell_width * 2 / 5) as f32
    }
}

/// Shapes composing the agent: a disc with a wedge-shaped mouth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPresentation {
    /// Centre of the body disc.
    pub centre: Vec2,
    /// Radius of the body disc.
    pub radius: f32,
    /// Mouth triangle; the first vertex is the centre.
    pub mouth: [Vec2; 3],
}

impl AgentPresentation {
    /// Lays out the agent on `cell` with the mouth opening toward `facing`.
    ///
    /// The mouth spans from the centre to the two corners of the cell edge
    /// the agent faces.
    #[must_use]
    pub fn new(metrics: &CellMetrics, cell: CellCoord, facing: Direction) -> Self {
        let origin = metrics.cell_origin(cell);
        let size = metrics.cell_size();
        let centre = metrics.cell_centre(cell);
        let (x, y) = (origin.x, origin.y);

        let edge = match facing {
            Direction::Right => [Vec2::new(x + size.x, y), Vec2::new(x + size.x, y + size.y)],
            Direction::Left => [Vec2::new(x, y + size.y), Vec2::new(x, y)],
            Direction::Up => [Vec2::new(x, y), Vec2::new(x + size.x, y)],
            Direction::Down => [Vec2::new(x + size.x, y + size.y), Vec2::new(x, y + size.y)],
        };

        Self {
            centre,
            radius: metrics.body_radius(),
            mouth: [centre, edge[0], edge[1]],
        }
    }
}

/// Ghost visible in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneGhost {
    /// Cell the ghost occupies.
    pub cell: CellCoord,
    /// Whether the ghost is fleeing an empowered agent.
    pub frightened: bool,
}

/// Shape used to draw a ghost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostPresentation {
    /// Centre of the ghost's body.
    pub centre: Vec2,
    /// Radius of the ghost's body.
    pub radius: f32,
    /// Fill color resolved from the palette.
    pub color: Color,
}

impl GhostPresentation {
    /// Lays out `ghost` and resolves its color from `palette`.
    #[must_use]
    pub fn new(metrics: &CellMetrics, ghost: SceneGhost, palette: &Palette) -> Self {
        Self {
            centre: metrics.cell_centre(ghost.cell),
            radius: metrics.body_radius(),
            color: if ghost.frightened {
                palette.frightened_ghost
            } else {
                palette.ghost
            },
        }
    }
}

/// Snapshot of a round handed to the draw routine.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of columns in the maze.
    pub columns: u32,
    /// Number of rows in the maze.
    pub rows: u32,
    /// Tiles in row-major order.
    pub tiles: Vec<Tile>,
    /// Cell occupied by the agent.
    pub agent_cell: CellCoord,
    /// Direction the agent's mouth faces.
    pub agent_facing: Direction,
    /// Ghosts currently in the maze.
    pub ghosts: Vec<SceneGhost>,
    /// Score shown in the corner.
    pub score: u32,
    /// Whether the agent is empowered.
    pub empowered: bool,
}

impl Scene {
    /// Tile at `cell`, if it lies inside the maze.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = usize::try_from(cell.row() * self.columns + cell.column()).ok()?;
        self.tiles.get(index).copied()
    }

    /// Iterates over every cell together with its tile.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        (0_u32..)
            .zip(self.tiles.iter())
            .map(move |(index, tile)| (CellCoord::new(index % columns, index / columns), *tile))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Colors used for every frame.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The maze has no cells to lay out.
    #[error("cannot lay out an empty {columns}x{rows} grid")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The surface cannot fit a single pixel per cell.
    #[error("surface of {width}x{height} pixels is too small for the maze")]
    SurfaceTooSmall {
        /// Surface width in pixels.
        width: u32,
        /// Surface height in pixels.
        height: u32,
    },
}
