#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-level orchestration of a single Maze Chase round.
//!
//! A [`Session`] owns the level, the agent and the ghosts hatched from the
//! level's pit. Adapters feed it decoded input and elapsed frame time and read
//! the resulting state back for presentation.

use std::time::Duration;

use maze_chase_core::{Event, InputEvent, Tile, WELCOME_BANNER};
use maze_chase_system_agent::{Agent, Config};
use maze_chase_world::{Ghost, GhostId, Level};
use tracing::{debug, info};

/// Running round composed of a level, its agent and its ghosts.
#[derive(Clone, Debug)]
pub struct Session {
    level: Level,
    agent: Agent,
    ghosts: Vec<Ghost>,
}

impl Session {
    /// Starts a round on `level` with an agent built from `config`.
    ///
    /// One ghost is hatched for every ghost start of the level.
    #[must_use]
    pub fn new(level: Level, config: Config) -> Self {
        let agent = Agent::new(config, &level);
        let ghosts = hatch_ghosts(&level);
        info!(
            columns = level.columns(),
            rows = level.rows(),
            ghosts = ghosts.len(),
            pills = level.remaining_pills(),
            "session started"
        );
        Self {
            level,
            agent,
            ghosts,
        }
    }

    /// Banner shown when the experience boots.
    #[must_use]
    pub const fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }

    /// Forwards a decoded keyboard transition to the agent.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.agent.handle_input(event);
    }

    /// Advances the round by one frame and returns what happened.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        self.agent
            .advance(dt, &mut self.level, &mut self.ghosts, &mut events);

        for event in &events {
            match event {
                Event::TileConsumed {
                    tile: Tile::PowerPill,
                    score,
                    ..
                } => debug!(score, "power pill consumed"),
                Event::TileConsumed { score, .. } if self.level.remaining_pills() == 0 => {
                    info!(score, "every pill consumed");
                }
                Event::EmpowermentEnded => debug!("ghosts resume chasing"),
                _ => {}
            }
        }

        events
    }

    /// Restores every pickup and returns the agent and ghosts to their
    /// starting state.
    pub fn restart(&mut self) {
        self.level.restore();
        self.agent.reset(&self.level);
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
        info!(
            pills = self.level.remaining_pills(),
            "round restarted"
        );
    }

    /// Level the round is played on.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Player-controlled agent.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Ghosts hatched from the level's pit.
    #[must_use]
    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }
}

fn hatch_ghosts(level: &Level) -> Vec<Ghost> {
    level
        .ghost_starts()
        .iter()
        .zip(0_u32..)
        .map(|(cell, id)| Ghost::new(GhostId::new(id), *cell))
        .collect()
}
