#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven state machine for the player-controlled agent.
//!
//! Elapsed time drains a move timer; whenever the timer drops below zero the
//! agent attempts a single-cell step in the held direction, consumes whatever
//! pickup lies under it and re-arms the timer. Consuming a power pill switches
//! the agent into [`AgentMode::Empowered`], which halves the cadence until the
//! empowered time runs out. Adversaries are told the remaining empowered time
//! on every tick while the mode is active, including the tick on which it
//! ends.

use std::time::Duration;

use maze_chase_core::{Adversary, Board, CellCoord, Direction, Event, InputEvent, Tile};
use tracing::{debug, trace};

const PILL_SCORE: u32 = 1;
const POWER_PILL_SCORE: u32 = 10;

const DEFAULT_BASE_INTERVAL_MS: f64 = 200.0;
const DEFAULT_EMPOWERED_DURATION_MS: f64 = 15_000.0;

/// Configuration parameters required to construct the agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    base_interval_ms: f64,
    empowered_duration_ms: f64,
}

impl Config {
    /// Creates a configuration from the normal-mode cadence and the duration
    /// granted by each power pill, both in milliseconds.
    #[must_use]
    pub const fn new(base_interval_ms: f64, empowered_duration_ms: f64) -> Self {
        Self {
            base_interval_ms,
            empowered_duration_ms,
        }
    }

    /// Time between move attempts in normal mode.
    #[must_use]
    pub const fn base_interval_ms(&self) -> f64 {
        self.base_interval_ms
    }

    /// Empowered time granted by a single power pill.
    #[must_use]
    pub const fn empowered_duration_ms(&self) -> f64 {
        self.empowered_duration_ms
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_INTERVAL_MS, DEFAULT_EMPOWERED_DURATION_MS)
    }
}

/// Movement mode of the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AgentMode {
    /// Regular cadence.
    #[default]
    Normal,
    /// A power pill is active; the agent moves twice as fast.
    Empowered,
}

impl AgentMode {
    /// Time between move attempts in this mode.
    #[must_use]
    pub fn cadence_ms(self, base_interval_ms: f64) -> f64 {
        match self {
            Self::Normal => base_interval_ms,
            Self::Empowered => base_interval_ms / 2.0,
        }
    }
}

/// Immutable copy of the agent's state used by renderers and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Cell currently occupied by the agent.
    pub position: CellCoord,
    /// Points collected this round.
    pub score: u32,
    /// Direction currently held by the player, if any.
    pub direction: Option<Direction>,
    /// Direction of the last successful step; the mouth faces this way.
    pub facing: Direction,
    /// Active movement mode.
    pub mode: AgentMode,
    /// Countdown until the next move attempt.
    pub move_timer_ms: f64,
    /// Remaining empowered time; only meaningful while empowered.
    pub empowered_time_left_ms: f64,
}

/// Player-controlled agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    config: Config,
    position: CellCoord,
    score: u32,
    direction: Option<Direction>,
    facing: Direction,
    mode: AgentMode,
    move_timer_ms: f64,
    empowered_time_left_ms: f64,
}

impl Agent {
    /// Creates an agent and places it at the board's spawn.
    #[must_use]
    pub fn new<B>(config: Config, board: &B) -> Self
    where
        B: Board + ?Sized,
    {
        let mut agent = Self {
            config,
            position: CellCoord::new(0, 0),
            score: 0,
            direction: None,
            facing: Direction::Right,
            mode: AgentMode::Normal,
            move_timer_ms: config.base_interval_ms,
            empowered_time_left_ms: 0.0,
        };
        agent.reset(board);
        agent
    }

    /// Restores the start-of-round state.
    ///
    /// The agent is placed one row below the spawn region, centred on its
    /// width. The board itself is left untouched.
    pub fn reset<B>(&mut self, board: &B)
    where
        B: Board + ?Sized,
    {
        self.position = board.spawn_region().agent_spawn();
        self.score = 0;
        self.direction = None;
        self.facing = Direction::Right;
        self.mode = AgentMode::Normal;
        self.empowered_time_left_ms = 0.0;
        self.move_timer_ms = self.cadence_ms();
    }

    /// Applies a decoded keyboard transition.
    ///
    /// Pressing a movement key holds its direction. Releasing a movement key
    /// clears the held direction only when it is the one being held, so a
    /// late release of a previous key does not cancel the current one.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                if let Some(direction) = key.direction() {
                    self.direction = Some(direction);
                }
            }
            InputEvent::KeyUp(key) => {
                if let Some(direction) = key.direction() {
                    if self.direction == Some(direction) {
                        self.direction = None;
                    }
                }
            }
        }
    }

    /// Advances the agent by `dt` of simulated time.
    ///
    /// At most one step and at most one tile write happen per call. Every
    /// adversary is notified exactly once per call while the agent is
    /// empowered at the start of the call.
    pub fn advance<B, A>(
        &mut self,
        dt: Duration,
        board: &mut B,
        adversaries: &mut [A],
        out: &mut Vec<Event>,
    ) where
        B: Board + ?Sized,
        A: Adversary,
    {
        let elapsed_ms = dt.as_nanos() as f64 / 1_000_000.0;
        self.move_timer_ms -= elapsed_ms;

        if self.mode == AgentMode::Empowered {
            self.empowered_time_left_ms -= elapsed_ms;
            if self.empowered_time_left_ms <= 0.0 {
                self.mode = AgentMode::Normal;
                self.move_timer_ms = self.cadence_ms();
                debug!(
                    time_left_ms = self.empowered_time_left_ms,
                    "agent empowerment ended"
                );
                out.push(Event::EmpowermentEnded);
            }
            for adversary in adversaries.iter_mut() {
                adversary.notify_empowered(self.empowered_time_left_ms);
            }
        }

        if self.move_timer_ms < 0.0 {
            self.attempt_step(&*board, out);
            self.consume_tile(board, out);
            self.move_timer_ms = self.cadence_ms();
        }
    }

    /// Cell currently occupied by the agent.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Points collected this round.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Direction currently held, if any.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Active movement mode.
    #[must_use]
    pub const fn mode(&self) -> AgentMode {
        self.mode
    }

    /// Reports whether a power pill is active.
    #[must_use]
    pub fn is_empowered(&self) -> bool {
        self.mode == AgentMode::Empowered
    }

    /// Countdown until the next move attempt.
    #[must_use]
    pub const fn move_timer_ms(&self) -> f64 {
        self.move_timer_ms
    }

    /// Remaining empowered time.
    #[must_use]
    pub const fn empowered_time_left_ms(&self) -> f64 {
        self.empowered_time_left_ms
    }

    /// Captures an immutable copy of the agent's state.
    #[must_use]
    pub const fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            score: self.score,
            direction: self.direction,
            facing: self.facing,
            mode: self.mode,
            move_timer_ms: self.move_timer_ms,
            empowered_time_left_ms: self.empowered_time_left_ms,
        }
    }

    fn cadence_ms(&self) -> f64 {
        self.mode.cadence_ms(self.config.base_interval_ms)
    }

    fn attempt_step<B>(&mut self, board: &B, out: &mut Vec<Event>)
    where
        B: Board + ?Sized,
    {
        let Some(direction) = self.direction else {
            return;
        };

        match self
            .position
            .step(direction)
            .filter(|candidate| board.is_enterable(*candidate))
        {
            Some(destination) => {
                let from = self.position;
                self.position = destination;
                self.facing = direction;
                trace!(
                    column = destination.column(),
                    row = destination.row(),
                    "agent stepped"
                );
                out.push(Event::AgentMoved {
                    from,
                    to: destination,
                });
            }
            None => out.push(Event::AgentBlocked {
                at: self.position,
                direction,
            }),
        }
    }

    fn consume_tile<B>(&mut self, board: &mut B, out: &mut Vec<Event>)
    where
        B: Board + ?Sized,
    {
        let cell = self.position;
        let tile = board.tile(cell);
        let reward = match tile {
            Tile::Pill => PILL_SCORE,
            Tile::PowerPill => POWER_PILL_SCORE,
            Tile::Empty | Tile::Wall | Tile::GhostPit => return,
        };

        board.set_tile(cell, Tile::Empty);
        self.score = self.score.saturating_add(reward);
        out.push(Event::TileConsumed {
            cell,
            tile,
            score: self.score,
        });

        if tile == Tile::PowerPill {
            self.mode = AgentMode::Empowered;
            self.empowered_time_left_ms = self.config.empowered_duration_ms;
            debug!(
                duration_ms = self.config.empowered_duration_ms,
                "agent empowered"
            );
            out.push(Event::EmpowermentStarted {
                duration_ms: self.config.empowered_duration_ms,
            });
        }
    }
}
