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
//! The game is silent, so macroquad is built without its `audio` feature.

use anyhow::Result;
use glam::Vec2;
use log::info;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use maze_chase_core::{ActorKind, Direction, DirectionSet};
use maze_chase_rendering::{
    ActorPresentation, Color, FrameInput, FrameSimulationBreakdown, Presentation,
    RenderingBackend, Scene,
};
use std::time::{Duration, Instant};

const HUD_FONT_SIZE: f32 = 24.0;
const HUD_MARGIN: f32 = 16.0;
const HUD_LINE_SPACING: f32 = 32.0;

const MOVEMENT_KEYS: [(KeyCode, Direction); 8] = [
    (KeyCode::Up, Direction::North),
    (KeyCode::W, Direction::North),
    (KeyCode::Down, Direction::South),
    (KeyCode::S, Direction::South),
    (KeyCode::Left, Direction::West),
    (KeyCode::A, Direction::West),
    (KeyCode::Right, Direction::East),
    (KeyCode::D, Direction::East),
];

/// Translates held keys into movement directions.
///
/// Arrow keys and WASD map to the four cardinal directions; other keys are
/// ignored.
#[must_use]
pub fn directions_from_keys<I>(keys: I) -> DirectionSet
where
    I: IntoIterator<Item = KeyCode>,
{
    keys.into_iter()
        .filter_map(|key| {
            MOVEMENT_KEYS
                .iter()
                .find(|(candidate, _)| *candidate == key)
                .map(|(_, direction)| *direction)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` carves a new maze.
    regenerate: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let regenerate = is_key_pressed(KeyCode::R);

        Self {
            quit_requested,
            regenerate,
        }
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts) -> FrameInput {
    let held = directions_from_keys(
        MOVEMENT_KEYS
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| is_key_down(*key)),
    );

    FrameInput {
        held,
        regenerate: keyboard.regenerate,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
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

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Time spent on the phases of a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FrameTiming {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Frame rate and mean phase timings over the last reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsReport {
    frames_per_second: f32,
    mean: FrameTiming,
}

/// Averages frame timings over one-second windows.
#[derive(Debug, Default)]
struct FpsCounter {
    frames: u32,
    totals: FrameTiming,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    /// Records a frame, returning a report once a full window has elapsed.
    fn record(&mut self, timing: FrameTiming) -> Option<FpsReport> {
        self.frames = self.frames.saturating_add(1);
        self.totals.frame += timing.frame;
        self.totals.simulation += timing.simulation;
        self.totals.scene_population += timing.scene_population;
        self.totals.render += timing.render;

        if self.totals.frame < Self::WINDOW {
            return None;
        }

        let frames = self.frames;
        let totals = std::mem::take(&mut self.totals);
        self.frames = 0;
        Some(FpsReport {
            frames_per_second: frames as f32 / totals.frame.as_secs_f32(),
            mean: FrameTiming {
                frame: totals.frame / frames,
                simulation: totals.simulation / frames,
                scene_population: totals.scene_population / frames,
                render: totals.render / frames,
            },
        })
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: world_extent(&scene).0.ceil() as i32,
            window_height: world_extent(&scene).1.ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(keyboard);
                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_floor(&scene, &metrics);
                draw_walls(&scene, &metrics);
                draw_actors(&scene.actors, &metrics);
                draw_hud(&scene, &metrics);
                let render_duration = render_start.elapsed();

                let report = fps_counter.record(FrameTiming {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if let Some(report) = report.filter(|_| show_fps) {
                    info!(
                        "{:.1} fps | sim {:.2}ms scene {:.2}ms render {:.2}ms",
                        report.frames_per_second,
                        millis(report.mean.simulation),
                        millis(report.mean.scene_population),
                        millis(report.mean.render),
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps world units onto the screen while preserving the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let (world_width, world_height) = world_extent(scene);
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        // Boundary strokes overhang the maze by half a wall on every side.
        let inset = scene.maze.wall_thickness * 0.5 * scale;
        let offset_x = ((screen_width - world_width * scale) * 0.5).max(0.0) + inset;
        let offset_y = ((screen_height - world_height * scale) * 0.5).max(0.0) + inset;

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }
}

fn world_extent(scene: &Scene) -> (f32, f32) {
    let overhang = scene.maze.wall_thickness;
    (scene.total_width() + overhang, scene.total_height() + overhang)
}

fn draw_floor(scene: &Scene, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        scene.maze.width() * metrics.scale,
        scene.maze.height() * metrics.scale,
        to_macroquad_color(scene.maze.floor_color),
    );
}

fn draw_walls(scene: &Scene, metrics: &SceneMetrics) {
    let thickness = scene.maze.wall_thickness * metrics.scale;
    if thickness <= f32::EPSILON {
        return;
    }

    let color = to_macroquad_color(scene.maze.wall_color);
    for segment in &scene.maze.segments {
        let from = metrics.to_screen(segment.from);
        let to = metrics.to_screen(segment.to);
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }
}

fn draw_actors(actors: &[ActorPresentation], metrics: &SceneMetrics) {
    let mut ordered: Vec<_> = actors.iter().collect();
    ordered.sort_by_key(|actor| draw_layer(actor.kind));

    for actor in ordered {
        let center = metrics.to_screen(actor.position);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            actor.radius * metrics.scale,
            to_macroquad_color(actor.color),
        );
    }
}

const fn draw_layer(kind: ActorKind) -> u8 {
    match kind {
        ActorKind::Goal => 0,
        ActorKind::Avatar => 1,
        ActorKind::Enemy => 2,
    }
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics) {
    let anchor = hud_anchor(scene, metrics);
    let color = macroquad::color::WHITE;

    let labels = [scene.hud.time_label(), scene.hud.best_label()];
    for (line, label) in labels.iter().enumerate() {
        let _ = macroquad::text::draw_text(
            label,
            anchor.x,
            anchor.y + line as f32 * HUD_LINE_SPACING,
            HUD_FONT_SIZE,
            color,
        );
    }
}

fn hud_anchor(scene: &Scene, metrics: &SceneMetrics) -> Vec2 {
    let panel_origin = metrics.to_screen(Vec2::new(scene.maze.width(), 0.0));
    Vec2::new(
        panel_origin.x + HUD_MARGIN + scene.maze.wall_thickness * metrics.scale,
        panel_origin.y + HUD_LINE_SPACING,
    )
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{MazeDimensions, MazeGeometry, MazeLayout};
    use maze_chase_rendering::{HudPresentation, MazePresentation, DEFAULT_SIDE_PANEL_WIDTH};

    fn scene(columns: u32, rows: u32) -> Scene {
        let layout = MazeLayout {
            dimensions: MazeDimensions::new(columns, rows).expect("valid dimensions"),
            horizontal: vec![true; ((rows + 1) * columns) as usize],
            vertical: vec![true; (rows * (columns + 1)) as usize],
        };
        let maze = MazePresentation::new(
            layout.walls(),
            MazeGeometry::new(50.0, 16.0).expect("valid geometry"),
            Color::from_rgb_u8(0, 0, 0),
            Color::from_rgb_u8(255, 255, 255),
        );
        Scene::new(
            maze,
            Vec::new(),
            HudPresentation::default(),
            DEFAULT_SIDE_PANEL_WIDTH,
        )
        .expect("valid scene")
    }

    #[test]
    fn directions_from_keys_ignores_unmapped_keys() {
        let held = directions_from_keys([KeyCode::W, KeyCode::Right, KeyCode::Space]);

        assert!(held.contains(Direction::North));
        assert!(held.contains(Direction::East));
        assert!(!held.contains(Direction::South));
        assert!(!held.contains(Direction::West));
    }

    #[test]
    fn scene_metrics_keep_maze_inside_screen() {
        let scene = scene(6, 4);
        let metrics = SceneMetrics::from_scene(&scene, 1000.0, 400.0);

        let top_left = metrics.to_screen(Vec2::ZERO);
        let bottom_right =
            metrics.to_screen(Vec2::new(scene.total_width(), scene.total_height()));
        assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
        assert!(bottom_right.x <= 1000.0 + 1e-3);
        assert!(bottom_right.y <= 400.0 + 1e-3);
        assert!(metrics.scale > 0.0);
    }

    #[test]
    fn hud_sits_right_of_the_maze() {
        let scene = scene(3, 3);
        let metrics = SceneMetrics::from_scene(&scene, 350.0, 150.0);

        let anchor = hud_anchor(&scene, &metrics);
        let maze_right = metrics.to_screen(Vec2::new(scene.maze.width(), 0.0)).x;
        assert!(anchor.x > maze_right);
    }

    #[test]
    fn draw_layers_put_enemy_on_top() {
        assert!(draw_layer(ActorKind::Goal) < draw_layer(ActorKind::Avatar));
        assert!(draw_layer(ActorKind::Avatar) < draw_layer(ActorKind::Enemy));
    }

    fn timing(frame_millis: u64, render_millis: u64) -> FrameTiming {
        FrameTiming {
            frame: Duration::from_millis(frame_millis),
            render: Duration::from_millis(render_millis),
            ..FrameTiming::default()
        }
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();

        for _ in 0..3 {
            assert!(counter.record(timing(250, 4)).is_none());
        }
        let report = counter
            .record(timing(250, 8))
            .expect("a second of frames was recorded");

        assert!((report.frames_per_second - 4.0).abs() <= 1e-3);
        assert_eq!(report.mean.frame, Duration::from_millis(250));
        assert_eq!(report.mean.render, Duration::from_millis(5));
    }

    #[test]
    fn fps_counter_starts_a_fresh_window_after_reporting() {
        let mut counter = FpsCounter::default();
        assert!(counter.record(timing(1_000, 0)).is_some());

        for _ in 0..9 {
            assert!(counter.record(timing(100, 0)).is_none());
        }
        let report = counter
            .record(timing(100, 0))
            .expect("second window completes");

        assert!((report.frames_per_second - 10.0).abs() <= 1e-3);
    }
}
