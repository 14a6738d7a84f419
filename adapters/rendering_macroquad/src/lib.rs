#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Chase.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature.
//!
//! The adapter decodes the arrow keys and the WASD cluster into
//! [`InputEvent`]s, forwards them together with the restart shortcut through
//! [`FrameInput`], and draws the returned [`Scene`] with primitive shapes.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, is_key_released, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use maze_chase_core::{InputEvent, Key, Tile};
use maze_chase_rendering::{
    AgentPresentation, CellMetrics, Color, FrameInput, GhostPresentation, Palette, Presentation,
    RenderingBackend, Scene,
};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_WINDOW_SIZE: i32 = 672;

const MOVEMENT_KEYS: [KeyCode; 8] = [
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
];

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` restarts the round.
    restart_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            restart_requested: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self { swap_interval } = self;

        let Presentation {
            window_title,
            palette,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: DEFAULT_WINDOW_SIZE,
            window_height: DEFAULT_WINDOW_SIZE,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    debug!("quit requested");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    key_events: gather_key_events(is_key_pressed, is_key_released),
                    restart: keyboard.restart_requested,
                };

                update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(to_macroquad_color(palette.background));
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                match CellMetrics::new(
                    screen_width.max(0.0) as u32,
                    screen_height.max(0.0) as u32,
                    scene.columns,
                    scene.rows,
                ) {
                    Ok(metrics) => draw_scene(&scene, &metrics, &palette),
                    Err(error) => warn!(%error, "skipping frame"),
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps a macroquad key code onto the keys the agent understands.
fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::W => Key::W,
        KeyCode::A => Key::A,
        KeyCode::S => Key::S,
        KeyCode::D => Key::D,
        _ => Key::Other,
    }
}

/// Collects movement key transitions for the frame, releases before presses.
fn gather_key_events<P, R>(pressed: P, released: R) -> Vec<InputEvent>
where
    P: Fn(KeyCode) -> bool,
    R: Fn(KeyCode) -> bool,
{
    let releases = MOVEMENT_KEYS
        .into_iter()
        .filter(|code| released(*code))
        .map(|code| InputEvent::KeyUp(key_from_code(code)));
    let presses = MOVEMENT_KEYS
        .into_iter()
        .filter(|code| pressed(*code))
        .map(|code| InputEvent::KeyDown(key_from_code(code)));
    releases.chain(presses).collect()
}

fn draw_scene(scene: &Scene, metrics: &CellMetrics, palette: &Palette) {
    draw_tiles(scene, metrics, palette);

    for ghost in &scene.ghosts {
        let ghost = GhostPresentation::new(metrics, *ghost, palette);
        macroquad::shapes::draw_circle(
            ghost.centre.x,
            ghost.centre.y,
            ghost.radius,
            to_macroquad_color(ghost.color),
        );
    }

    let agent = AgentPresentation::new(metrics, scene.agent_cell, scene.agent_facing);
    macroquad::shapes::draw_circle(
        agent.centre.x,
        agent.centre.y,
        agent.radius,
        to_macroquad_color(palette.agent_body),
    );
    let [tip, upper, lower] = agent.mouth;
    macroquad::shapes::draw_triangle(
        to_macroquad_vec(tip),
        to_macroquad_vec(upper),
        to_macroquad_vec(lower),
        to_macroquad_color(palette.agent_mouth),
    );

    let font_size = metrics.cell_size().y;
    let _ = macroquad::text::draw_text(
        &format!("Score: {}", scene.score),
        metrics.cell_size().x,
        font_size * 0.8,
        font_size,
        to_macroquad_color(palette.pill),
    );
}

fn draw_tiles(scene: &Scene, metrics: &CellMetrics, palette: &Palette) {
    let size = metrics.cell_size();
    for (cell, tile) in scene.cells() {
        let origin = metrics.cell_origin(cell);
        let centre = metrics.cell_centre(cell);
        match tile {
            Tile::Wall => macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x,
                size.y,
                to_macroquad_color(palette.wall),
            ),
            Tile::Pill => macroquad::shapes::draw_circle(
                centre.x,
                centre.y,
                size.x / 8.0,
                to_macroquad_color(palette.pill),
            ),
            Tile::PowerPill => macroquad::shapes::draw_circle(
                centre.x,
                centre.y,
                size.x / 4.0,
                to_macroquad_color(palette.power_pill),
            ),
            Tile::GhostPit => macroquad::shapes::draw_line(
                origin.x,
                centre.y,
                origin.x + size.x,
                centre.y,
                2.0,
                to_macroquad_color(palette.wall),
            ),
            Tile::Empty => {}
        }
    }
}

fn to_macroquad_vec(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
