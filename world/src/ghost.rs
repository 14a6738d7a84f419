use maze_chase_core::{Adversary, CellCoord};

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
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

/// Behaviour a ghost currently follows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GhostMode {
    /// Normal behaviour while the agent is not empowered.
    Chasing,
    /// The agent is empowered; the ghost turns blue and flees.
    Frightened {
        /// Empowered time the agent reported most recently, in milliseconds.
        remaining_ms: f64,
    },
}

/// Adversary living in the level's pit.
#[derive(Clone, Debug, PartialEq)]
pub struct Ghost {
    id: GhostId,
    cell: CellCoord,
    mode: GhostMode,
}

impl Ghost {
    /// Creates a chasing ghost at `cell`.
    #[must_use]
    pub const fn new(id: GhostId, cell: CellCoord) -> Self {
        Self {
            id,
            cell,
            mode: GhostMode::Chasing,
        }
    }

    /// Identifier of the ghost.
    #[must_use]
    pub const fn id(&self) -> GhostId {
        self.id
    }

    /// Cell occupied by the ghost.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current behaviour of the ghost.
    #[must_use]
    pub const fn mode(&self) -> GhostMode {
        self.mode
    }

    /// Reports whether the ghost is fleeing from an empowered agent.
    #[must_use]
    pub const fn is_frightened(&self) -> bool {
        matches!(self.mode, GhostMode::Frightened { .. })
    }

    /// Returns the ghost to its chasing behaviour.
    pub fn reset(&mut self) {
        self.mode = GhostMode::Chasing;
    }
}

impl Adversary for Ghost {
    fn notify_empowered(&mut self, time_left_ms: f64) {
        self.mode = if time_left_ms > 0.0 {
            GhostMode::Frightened {
                remaining_ms: time_left_ms,
            }
        } else {
            GhostMode::Chasing
        };
    }
}
