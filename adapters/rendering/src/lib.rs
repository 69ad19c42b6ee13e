#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{ActorKind, DirectionSet, MazeGeometry, MazeWalls};
use std::time::Duration;
use thiserror::Error;

/// Width of the HUD panel drawn to the right of the maze, in world units.
pub const DEFAULT_SIDE_PANEL_WIDTH: f32 = 200.0;

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

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Movement directions held during this frame.
    pub held: DirectionSet,
    /// Whether the player asked for a freshly carved maze on this frame.
    pub regenerate: bool,
}

/// Time spent by the simulation while producing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Duration spent applying commands and running systems.
    pub simulation: Duration,
    /// Duration spent copying world state into the scene.
    pub scene_population: Duration,
}

/// Straight wall stroke in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Start of the stroke.
    pub from: Vec2,
    /// End of the stroke.
    pub to: Vec2,
}

/// Builds one stroke per standing wall.
///
/// Horizontal strokes are extended by half the wall thickness at both ends
/// and vertical strokes likewise, so corners close without gaps.
#[must_use]
pub fn wall_segments(walls: MazeWalls<'_>, geometry: MazeGeometry) -> Vec<WallSegment> {
    let length = geometry.cell_length();
    let overhang = geometry.wall_thickness() / 2.0;

    let horizontal = walls.horizontal.walled().map(|(row, column)| {
        let y = row as f32 * length;
        WallSegment {
            from: Vec2::new(column as f32 * length - overhang, y),
            to: Vec2::new((column + 1) as f32 * length + overhang, y),
        }
    });
    let vertical = walls.vertical.walled().map(|(row, column)| {
        let x = column as f32 * length;
        WallSegment {
            from: Vec2::new(x, row as f32 * length - overhang),
            to: Vec2::new(x, (row + 1) as f32 * length + overhang),
        }
    });

    horizontal.chain(vertical).collect()
}

/// Maze geometry and wall strokes ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of columns in the maze.
    pub columns: u32,
    /// Number of rows in the maze.
    pub rows: u32,
    /// Side length of a cell in world units.
    pub cell_length: f32,
    /// Stroke width used for walls.
    pub wall_thickness: f32,
    /// Wall strokes in world units.
    pub segments: Vec<WallSegment>,
    /// Color used to stroke walls.
    pub wall_color: Color,
    /// Color used to fill the maze floor.
    pub floor_color: Color,
}

impl MazePresentation {
    /// Captures the walls and geometry of a maze.
    #[must_use]
    pub fn new(
        walls: MazeWalls<'_>,
        geometry: MazeGeometry,
        wall_color: Color,
        floor_color: Color,
    ) -> Self {
        let (columns, rows) = walls.cell_dimensions();
        Self {
            columns,
            rows,
            cell_length: geometry.cell_length(),
            wall_thickness: geometry.wall_thickness(),
            segments: wall_segments(walls, geometry),
            wall_color,
            floor_color,
        }
    }

    /// Width of the maze in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Height of the maze in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }
}

/// Disc drawn for an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Role of the actor, used by backends to layer drawing.
    pub kind: ActorKind,
    /// Centre of the disc in world units.
    pub position: Vec2,
    /// Radius of the disc in world units.
    pub radius: f32,
    /// Fill color of the disc.
    pub color: Color,
}

impl ActorPresentation {
    /// Creates a new actor presentation descriptor.
    #[must_use]
    pub const fn new(kind: ActorKind, position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            kind,
            position,
            radius,
            color,
        }
    }
}

/// Round timer shown beside the maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Time spent in the current round.
    pub elapsed: Duration,
    /// Fastest completed round, if any.
    pub best: Option<Duration>,
}

impl HudPresentation {
    /// Label for the running round timer.
    #[must_use]
    pub fn time_label(&self) -> String {
        format!("Time: {:.2}", self.elapsed.as_secs_f64())
    }

    /// Label for the best completed round.
    #[must_use]
    pub fn best_label(&self) -> String {
        match self.best {
            Some(best) => format!("Best: {:.2}", best.as_secs_f64()),
            None => "Best: None".to_owned(),
        }
    }
}

/// Scene description combining the maze, its actors and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Maze walls and geometry.
    pub maze: MazePresentation,
    /// Actors in drawing order.
    pub actors: Vec<ActorPresentation>,
    /// Round timer.
    pub hud: HudPresentation,
    side_panel_width: f32,
}

impl Scene {
    /// Creates a new scene descriptor.
    pub fn new(
        maze: MazePresentation,
        actors: Vec<ActorPresentation>,
        hud: HudPresentation,
        side_panel_width: f32,
    ) -> Result<Self, RenderingError> {
        if !side_panel_width.is_finite() || side_panel_width < 0.0 {
            return Err(RenderingError::InvalidSidePanelWidth {
                width: side_panel_width,
            });
        }

        Ok(Self {
            maze,
            actors,
            hud,
            side_panel_width,
        })
    }

    /// Width reserved for the HUD panel.
    #[must_use]
    pub const fn side_panel_width(&self) -> f32 {
        self.side_panel_width
    }

    /// Width of the entire scene including the HUD panel.
    #[must_use]
    pub fn total_width(&self) -> f32 {
        self.maze.width() + self.side_panel_width
    }

    /// Height of the entire scene.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.maze.height()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The HUD panel width must be finite and non-negative.
    #[error("side panel width must be finite and non-negative (received {width})")]
    InvalidSidePanelWidth {
        /// Provided width that failed validation.
        width: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{MazeDimensions, MazeLayout};

    fn closed_layout(columns: u32, rows: u32) -> MazeLayout {
        MazeLayout {
            dimensions: MazeDimensions::new(columns, rows).expect("valid dimensions"),
            horizontal: vec![true; ((rows + 1) * columns) as usize],
            vertical: vec![true; (rows * (columns + 1)) as usize],
        }
    }

    fn geometry() -> MazeGeometry {
        MazeGeometry::new(50.0, 16.0).expect("valid geometry")
    }

    #[test]
    fn single_cell_produces_four_overlapping_strokes() {
        let layout = closed_layout(1, 1);
        let segments = wall_segments(layout.walls(), geometry());

        assert_eq!(
            segments,
            vec![
                WallSegment {
                    from: Vec2::new(-8.0, 0.0),
                    to: Vec2::new(58.0, 0.0),
                },
                WallSegment {
                    from: Vec2::new(-8.0, 50.0),
                    to: Vec2::new(58.0, 50.0),
                },
                WallSegment {
                    from: Vec2::new(0.0, -8.0),
                    to: Vec2::new(0.0, 58.0),
                },
                WallSegment {
                    from: Vec2::new(50.0, -8.0),
                    to: Vec2::new(50.0, 58.0),
                },
            ]
        );
    }

    #[test]
    fn open_edges_are_not_drawn() {
        let mut layout = closed_layout(2, 1);
        layout.vertical[1] = false;

        let segments = wall_segments(layout.walls(), geometry());

        assert_eq!(segments.len(), 6);
        assert!(!segments
            .iter()
            .any(|segment| segment.from.x == 50.0 && segment.to.x == 50.0));
    }

    #[test]
    fn hud_labels_use_two_decimals() {
        let mut hud = HudPresentation {
            elapsed: Duration::from_millis(12_346),
            best: None,
        };
        assert_eq!(hud.time_label(), "Time: 12.35");
        assert_eq!(hud.best_label(), "Best: None");

        hud.best = Some(Duration::from_millis(7_250));
        assert_eq!(hud.best_label(), "Best: 7.25");
    }

    #[test]
    fn scene_dimensions_include_side_panel() {
        let layout = closed_layout(4, 3);
        let maze = MazePresentation::new(
            layout.walls(),
            geometry(),
            Color::from_rgb_u8(0, 0, 0),
            Color::from_rgb_u8(255, 255, 255),
        );

        let scene = Scene::new(
            maze,
            Vec::new(),
            HudPresentation::default(),
            DEFAULT_SIDE_PANEL_WIDTH,
        )
        .expect("valid panel width");

        assert_eq!(scene.total_width(), 400.0);
        assert_eq!(scene.total_height(), 150.0);
        assert_eq!(scene.maze.columns, 4);
        assert_eq!(scene.maze.rows, 3);
    }

    #[test]
    fn scene_rejects_negative_panel_width() {
        let layout = closed_layout(1, 1);
        let maze = MazePresentation::new(
            layout.walls(),
            geometry(),
            Color::from_rgb_u8(0, 0, 0),
            Color::from_rgb_u8(0, 0, 0),
        );

        let error = Scene::new(maze, Vec::new(), HudPresentation::default(), -1.0)
            .expect_err("negative width must be rejected");

        assert_eq!(error, RenderingError::InvalidSidePanelWidth { width: -1.0 });
    }
}
