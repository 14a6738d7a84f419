#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Chase experience.

mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use maze_chase_core::{InputEvent, Key};
use maze_chase_rendering::{Palette, Presentation, RenderingBackend, Scene, SceneGhost};
use maze_chase_rendering_macroquad::MacroquadBackend;
use maze_chase_system_agent::AgentMode;
use maze_chase_system_session::Session;
use maze_chase_world::Level;
use tracing::{info, trace};

use self::config::{FileConfig, Overrides, Settings};

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about = "Guide the agent through the maze")]
struct Args {
    /// Level layout file; the built-in classic maze is used when omitted.
    #[arg(long)]
    level: Option<PathBuf>,
    /// TOML file with agent tuning and the window title.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Milliseconds between move attempts in normal mode.
    #[arg(long)]
    base_interval_ms: Option<f64>,
    /// Milliseconds of empowerment granted by a power pill.
    #[arg(long)]
    empowered_ms: Option<f64>,
    /// Runs a fixed number of frames without opening a window.
    #[arg(long)]
    headless: bool,
    /// Frames simulated in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Simulated frame length in headless mode.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Direction held for the whole headless run.
    #[arg(long, value_enum)]
    hold: Option<HeldDirection>,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HeldDirection {
    Up,
    Down,
    Left,
    Right,
}

impl HeldDirection {
    const fn key(self) -> Key {
        match self {
            Self::Up => Key::ArrowUp,
            Self::Down => Key::ArrowDown,
            Self::Left => Key::ArrowLeft,
            Self::Right => Key::ArrowRight,
        }
    }
}

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq)]
struct HeadlessSummary {
    frames: u32,
    score: u32,
    column: u32,
    row: u32,
    mode: AgentMode,
    remaining_pills: usize,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            base_interval_ms: args.base_interval_ms,
            empowered_duration_ms: args.empowered_ms,
        },
    )?;

    let level = match &args.level {
        Some(path) => Level::from_path(path)
            .with_context(|| format!("failed to load level {}", path.display()))?,
        None => Level::classic(),
    };

    let mut session = Session::new(level, settings.agent);
    println!("{}", session.welcome_banner());

    if args.headless {
        let summary = run_headless(
            &mut session,
            args.hold.map(HeldDirection::key),
            args.frames,
            Duration::from_millis(args.frame_ms),
        );
        println!(
            "frames: {} score: {} position: ({}, {}) mode: {:?} pills left: {}",
            summary.frames,
            summary.score,
            summary.column,
            summary.row,
            summary.mode,
            summary.remaining_pills
        );
        return Ok(());
    }

    run_windowed(session, settings.window_title, args.vsync)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run_headless(
    session: &mut Session,
    hold: Option<Key>,
    frames: u32,
    frame: Duration,
) -> HeadlessSummary {
    if let Some(key) = hold {
        session.handle_input(InputEvent::KeyDown(key));
    }
    for _ in 0..frames {
        for event in session.step(frame) {
            trace!(?event, "headless frame event");
        }
    }

    let agent = session.agent();
    let summary = HeadlessSummary {
        frames,
        score: agent.score(),
        column: agent.position().column(),
        row: agent.position().row(),
        mode: agent.mode(),
        remaining_pills: session.level().remaining_pills(),
    };
    info!(score = summary.score, frames, "headless run finished");
    summary
}

fn run_windowed(mut session: Session, window_title: String, vsync: bool) -> Result<()> {
    let presentation = Presentation::new(window_title, Palette::classic(), scene_for(&session));
    MacroquadBackend::new()
        .with_vsync(vsync)
        .run(presentation, move |dt, input, scene| {
            if input.restart {
                session.restart();
            }
            for event in input.key_events {
                session.handle_input(event);
            }
            for event in session.step(dt) {
                trace!(?event, "frame event");
            }
            *scene = scene_for(&session);
        })
}

fn scene_for(session: &Session) -> Scene {
    let level = session.level();
    let agent = session.agent().snapshot();
    Scene {
        columns: level.columns(),
        rows: level.rows(),
        tiles: level.iter().map(|(_, tile)| tile).collect(),
        agent_cell: agent.position,
        agent_facing: agent.facing,
        ghosts: session
            .ghosts()
            .iter()
            .map(|ghost| SceneGhost {
                cell: ghost.cell(),
                frightened: ghost.is_frightened(),
            })
            .collect(),
        score: agent.score,
        empowered: agent.mode == AgentMode::Empowered,
    }
}
