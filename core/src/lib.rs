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
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views such as [`MazeWalls`], and respond exclusively with new command
//! batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the maze dimensions and geometry, then starts a fresh round.
    ConfigureMaze {
        /// Number of cells along each axis.
        dimensions: MazeDimensions,
        /// Cell length and wall thickness shared by the resolver and renderer.
        geometry: MazeGeometry,
    },
    /// Configures the speeds of the movable actors and starts a fresh round.
    ConfigureRoster {
        /// Avatar speed in world units per second.
        avatar_speed: f32,
        /// Enemy speed in world units per second, `None` disables the enemy.
        enemy_speed: Option<f32>,
    },
    /// Discards the current maze, carves a new one and re-places every actor.
    StartRound,
    /// Starts a round on a previously exported maze layout.
    LoadLayout {
        /// Layout that replaces the generated walls.
        layout: MazeLayout,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a movable actor be relocated to a resolved position.
    MoveActor {
        /// Actor being moved.
        actor: ActorKind,
        /// Resolved continuous position in world units.
        position: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new maze was built and the actors were placed.
    RoundStarted {
        /// Sequential index of the round, starting at one.
        round: u64,
        /// Cell the avatar starts in.
        avatar: CellCoord,
        /// Cell holding the goal.
        goal: CellCoord,
        /// Cell the enemy starts in, if the enemy is enabled.
        enemy: Option<CellCoord>,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor accepted a new position.
    ActorMoved {
        /// Actor that moved.
        actor: ActorKind,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// The avatar reached the goal.
    RoundCompleted {
        /// Index of the completed round.
        round: u64,
        /// Simulated time spent in the round.
        elapsed: Duration,
        /// Best completion time after recording this round.
        best: Duration,
    },
    /// The enemy reached the avatar before the goal was found.
    AvatarCaught {
        /// Index of the lost round.
        round: u64,
        /// Simulated time spent in the round.
        elapsed: Duration,
    },
    /// A layout load request was refused.
    LayoutRejected {
        /// Reason the layout failed validation.
        reason: LayoutError,
    },
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices (up).
    North,
    /// Movement toward increasing column indices (right).
    East,
    /// Movement toward increasing row indices (down).
    South,
    /// Movement toward decreasing column indices (left).
    West,
}

impl Direction {
    /// Every direction, in the order the movement resolver evaluates them.
    pub const RESOLUTION_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::East => 0b0010,
            Self::South => 0b0100,
            Self::West => 0b1000,
        }
    }
}

/// Set of currently held movement directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionSet {
    bits: u8,
}

impl DirectionSet {
    /// Set without any held direction.
    pub const EMPTY: DirectionSet = DirectionSet { bits: 0 };

    /// Returns a copy of the set that also contains `direction`.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self {
            bits: self.bits | direction.bit(),
        }
    }

    /// Adds `direction` to the set.
    pub fn insert(&mut self, direction: Direction) {
        self.bits |= direction.bit();
    }

    /// Removes `direction` from the set.
    pub fn remove(&mut self, direction: Direction) {
        self.bits &= !direction.bit();
    }

    /// Reports whether `direction` is held.
    #[must_use]
    pub const fn contains(&self, direction: Direction) -> bool {
        self.bits & direction.bit() != 0
    }

    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Held directions in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::RESOLUTION_ORDER
            .into_iter()
            .filter(|direction| self.contains(*direction))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY, |set, direction| set.with(direction))
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
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

    /// Cell containing `position`, computed by floor division with `cell_length`.
    ///
    /// Returns `None` for positions left of or above the grid origin and for
    /// non-finite coordinates.
    #[must_use]
    pub fn containing(position: Vec2, cell_length: f32) -> Option<Self> {
        let column = (position.x / cell_length).floor();
        let row = (position.y / cell_length).floor();
        if !(column >= 0.0 && row >= 0.0) || !column.is_finite() || !row.is_finite() {
            return None;
        }
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }

        Some(Self::new(column as u32, row as u32))
    }

    /// Centre of the cell in world units.
    #[must_use]
    pub fn center(&self, cell_length: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * cell_length,
            (self.row as f32 + 0.5) * cell_length,
        )
    }
}

/// Number of cells along each axis of a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeDimensions {
    columns: u32,
    rows: u32,
}

impl MazeDimensions {
    /// Creates a dimension descriptor, rejecting grids without cells.
    pub fn new(columns: u32, rows: u32) -> Result<Self, DimensionsError> {
        if columns == 0 || rows == 0 {
            return Err(DimensionsError::Empty { columns, rows });
        }

        Ok(Self { columns, rows })
    }

    /// Number of cell columns (horizontal cells).
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows (vertical cells).
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

impl Default for MazeDimensions {
    /// Fifteen by fifteen cells.
    fn default() -> Self {
        Self {
            columns: 15,
            rows: 15,
        }
    }
}

/// Reasons maze dimensions may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DimensionsError {
    /// At least one axis has no cells.
    #[error("maze must contain at least one cell (received {columns}x{rows})")]
    Empty {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Physical measurements shared by the movement resolver and the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeGeometry {
    cell_length: f32,
    wall_thickness: f32,
}

impl MazeGeometry {
    /// Creates a geometry descriptor.
    ///
    /// `cell_length` must be positive and `wall_thickness` must lie in
    /// `0.0..cell_length`.
    pub fn new(cell_length: f32, wall_thickness: f32) -> Result<Self, GeometryError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(GeometryError::NonPositiveCellLength { cell_length });
        }
        if !wall_thickness.is_finite() || wall_thickness < 0.0 || wall_thickness >= cell_length {
            return Err(GeometryError::WallThicknessOutOfRange {
                wall_thickness,
                cell_length,
            });
        }

        Ok(Self {
            cell_length,
            wall_thickness,
        })
    }

    /// Side length of a square cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Thickness of a wall in world units.
    #[must_use]
    pub const fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    /// Size of the maze in world units.
    #[must_use]
    pub fn pixel_size(&self, dimensions: MazeDimensions) -> Vec2 {
        Vec2::new(
            dimensions.columns() as f32 * self.cell_length,
            dimensions.rows() as f32 * self.cell_length,
        )
    }
}

impl Default for MazeGeometry {
    /// Fifty-unit cells bounded by sixteen-unit walls.
    fn default() -> Self {
        Self {
            cell_length: 50.0,
            wall_thickness: 16.0,
        }
    }
}

/// Reasons a geometry descriptor may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// Cells must have a positive, finite length.
    #[error("cell length must be positive (received {cell_length})")]
    NonPositiveCellLength {
        /// Provided cell length.
        cell_length: f32,
    },
    /// Walls must be thinner than a cell.
    #[error("wall thickness {wall_thickness} must lie in 0..{cell_length}")]
    WallThicknessOutOfRange {
        /// Provided wall thickness.
        wall_thickness: f32,
        /// Cell length the thickness was compared against.
        cell_length: f32,
    },
}

/// Orientation of a wall matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallAxis {
    /// Edges between vertically adjacent cells.
    Horizontal,
    /// Edges between horizontally adjacent cells.
    Vertical,
}

/// Read-only view into one dense wall matrix.
///
/// Lookups outside the matrix report a wall so callers probing past the
/// boundary observe a closed maze.
#[derive(Clone, Copy, Debug)]
pub struct WallGridView<'a> {
    cells: &'a [bool],
    rows: u32,
    columns: u32,
}

impl<'a> WallGridView<'a> {
    /// Captures a view over a row-major wall matrix.
    #[must_use]
    pub fn new(cells: &'a [bool], rows: u32, columns: u32) -> Self {
        Self {
            cells,
            rows,
            columns,
        }
    }

    /// Reports whether the edge at `row`, `column` is walled.
    #[must_use]
    pub fn is_walled(&self, row: i64, column: i64) -> bool {
        self.index(row, column)
            .map_or(true, |index| self.cells.get(index).copied().unwrap_or(true))
    }

    /// Matrix size as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Iterates over the `(row, column)` index of every walled entry.
    pub fn walled(&self) -> impl Iterator<Item = (u32, u32)> + 'a {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, walled)| **walled)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some((index / columns, index % columns))
            })
    }

    fn index(&self, row: i64, column: i64) -> Option<usize> {
        let row = u32::try_from(row).ok()?;
        let column = u32::try_from(column).ok()?;
        if row < self.rows && column < self.columns {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Both wall matrices of a maze.
#[derive(Clone, Copy, Debug)]
pub struct MazeWalls<'a> {
    /// `(rows + 1) x columns` matrix of horizontal edges.
    pub horizontal: WallGridView<'a>,
    /// `rows x (columns + 1)` matrix of vertical edges.
    pub vertical: WallGridView<'a>,
}

impl<'a> MazeWalls<'a> {
    /// Maze size in cells as `(columns, rows)`.
    #[must_use]
    pub const fn cell_dimensions(&self) -> (u32, u32) {
        let (_, columns) = self.horizontal.dimensions();
        let (rows, _) = self.vertical.dimensions();
        (columns, rows)
    }

    /// Reports whether two grid-adjacent cells share an open edge.
    ///
    /// Cells that are not grid-adjacent never share an edge.
    #[must_use]
    pub fn is_open_between(&self, a: CellCoord, b: CellCoord) -> bool {
        if a.row() == b.row() && a.column().abs_diff(b.column()) == 1 {
            let column = a.column().max(b.column());
            !self
                .vertical
                .is_walled(i64::from(a.row()), i64::from(column))
        } else if a.column() == b.column() && a.row().abs_diff(b.row()) == 1 {
            let row = a.row().max(b.row());
            !self
                .horizontal
                .is_walled(i64::from(row), i64::from(a.column()))
        } else {
            false
        }
    }

    /// Neighbours reachable from `cell` through an open edge.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let column = cell.column();
        let row = cell.row();
        let candidates = [
            row.checked_sub(1).map(|up| CellCoord::new(column, up)),
            row.checked_add(1).map(|down| CellCoord::new(column, down)),
            column.checked_sub(1).map(|left| CellCoord::new(left, row)),
            column.checked_add(1).map(|right| CellCoord::new(right, row)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(move |neighbor| self.is_open_between(cell, *neighbor))
    }
}

/// Portable description of a maze's walls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    /// Number of cells along each axis.
    pub dimensions: MazeDimensions,
    /// Row-major `(rows + 1) x columns` horizontal wall matrix.
    pub horizontal: Vec<bool>,
    /// Row-major `rows x (columns + 1)` vertical wall matrix.
    pub vertical: Vec<bool>,
}

impl MazeLayout {
    /// Checks matrix sizes and boundary closure.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let columns = self.dimensions.columns();
        let rows = self.dimensions.rows();
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid);
        }

        let columns_usize = usize::try_from(columns).unwrap_or(usize::MAX);
        let rows_usize = usize::try_from(rows).unwrap_or(usize::MAX);
        let expected_horizontal = rows_usize.saturating_add(1).saturating_mul(columns_usize);
        let expected_vertical = rows_usize.saturating_mul(columns_usize.saturating_add(1));

        if self.horizontal.len() != expected_horizontal {
            return Err(LayoutError::WallCountMismatch {
                axis: WallAxis::Horizontal,
                expected: expected_horizontal,
                actual: self.horizontal.len(),
            });
        }
        if self.vertical.len() != expected_vertical {
            return Err(LayoutError::WallCountMismatch {
                axis: WallAxis::Vertical,
                expected: expected_vertical,
                actual: self.vertical.len(),
            });
        }

        let walls = self.walls();
        for column in 0..columns {
            for row in [0, rows] {
                if !walls
                    .horizontal
                    .is_walled(i64::from(row), i64::from(column))
                {
                    return Err(LayoutError::OpenBoundary {
                        axis: WallAxis::Horizontal,
                        row,
                        column,
                    });
                }
            }
        }
        for row in 0..rows {
            for column in [0, columns] {
                if !walls.vertical.is_walled(i64::from(row), i64::from(column)) {
                    return Err(LayoutError::OpenBoundary {
                        axis: WallAxis::Vertical,
                        row,
                        column,
                    });
                }
            }
        }

        Ok(())
    }

    /// Views over both wall matrices.
    #[must_use]
    pub fn walls(&self) -> MazeWalls<'_> {
        MazeWalls {
            horizontal: WallGridView::new(
                &self.horizontal,
                self.dimensions.rows().saturating_add(1),
                self.dimensions.columns(),
            ),
            vertical: WallGridView::new(
                &self.vertical,
                self.dimensions.rows(),
                self.dimensions.columns().saturating_add(1),
            ),
        }
    }
}

/// Reasons a maze layout may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout declares no cells.
    #[error("layout must contain at least one cell")]
    EmptyGrid,
    /// A wall matrix does not match the declared dimensions.
    #[error("{axis:?} wall matrix holds {actual} entries, expected {expected}")]
    WallCountMismatch {
        /// Matrix with the wrong size.
        axis: WallAxis,
        /// Entry count implied by the dimensions.
        expected: usize,
        /// Entry count found in the layout.
        actual: usize,
    },
    /// A boundary edge is open.
    #[error("{axis:?} boundary wall at row {row}, column {column} is open")]
    OpenBoundary {
        /// Matrix holding the open edge.
        axis: WallAxis,
        /// Row index of the edge.
        row: u32,
        /// Column index of the edge.
        column: u32,
    },
}

/// Roles an actor can play within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorKind {
    /// Player-controlled actor.
    Avatar,
    /// Stationary target the avatar must reach.
    Goal,
    /// Pursuer chasing the avatar.
    Enemy,
}

/// Continuous and discrete location of an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    /// Role of the actor.
    pub kind: ActorKind,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Cell derived from `position` by floor division with the cell length.
    pub cell: CellCoord,
    /// Speed in world units per second. Zero for the goal.
    pub speed: f32,
}

impl Actor {
    /// Creates an actor standing at the centre of `cell`.
    #[must_use]
    pub fn centered_in(kind: ActorKind, cell: CellCoord, cell_length: f32, speed: f32) -> Self {
        Self {
            kind,
            position: cell.center(cell_length),
            cell,
            speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_layout(columns: u32, rows: u32) -> MazeLayout {
        let dimensions = MazeDimensions::new(columns, rows).expect("valid dimensions");
        MazeLayout {
            dimensions,
            horizontal: vec![true; ((rows + 1) * columns) as usize],
            vertical: vec![true; (rows * (columns + 1)) as usize],
        }
    }

    #[test]
    fn direction_set_iterates_in_resolution_order() {
        let set: DirectionSet = [Direction::East, Direction::North, Direction::West]
            .into_iter()
            .collect();

        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![Direction::North, Direction::West, Direction::East]
        );
        assert!(!set.contains(Direction::South));
    }

    #[test]
    fn direction_set_insert_and_remove() {
        let mut set = DirectionSet::EMPTY;
        assert!(set.is_empty());

        set.insert(Direction::South);
        set.insert(Direction::South);
        assert!(set.contains(Direction::South));
        assert_eq!(set.iter().count(), 1);

        set.remove(Direction::South);
        assert!(set.is_empty());
    }

    #[test]
    fn containing_floors_positions() {
        assert_eq!(
            CellCoord::containing(Vec2::new(49.9, 50.0), 50.0),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(
            CellCoord::containing(Vec2::new(0.0, 0.0), 50.0),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(CellCoord::containing(Vec2::new(-0.1, 10.0), 50.0), None);
        assert_eq!(CellCoord::containing(Vec2::new(f32::NAN, 10.0), 50.0), None);
    }

    #[test]
    fn center_lies_inside_cell() {
        let cell = CellCoord::new(3, 1);
        let center = cell.center(20.0);
        assert_eq!(center, Vec2::new(70.0, 30.0));
        assert_eq!(CellCoord::containing(center, 20.0), Some(cell));
    }

    #[test]
    fn dimensions_reject_empty_grids() {
        assert_eq!(
            MazeDimensions::new(0, 4),
            Err(DimensionsError::Empty {
                columns: 0,
                rows: 4
            })
        );
        let dimensions = MazeDimensions::new(3, 2).expect("valid dimensions");
        assert_eq!(dimensions.cell_count(), 6);
        assert_eq!(dimensions.cells().last(), Some(CellCoord::new(2, 1)));
        assert!(!dimensions.contains(CellCoord::new(3, 0)));
    }

    #[test]
    fn geometry_requires_wall_thinner_than_cell() {
        assert!(MazeGeometry::new(50.0, 16.0).is_ok());
        assert!(matches!(
            MazeGeometry::new(0.0, 0.0),
            Err(GeometryError::NonPositiveCellLength { .. })
        ));
        assert!(matches!(
            MazeGeometry::new(10.0, 10.0),
            Err(GeometryError::WallThicknessOutOfRange { .. })
        ));
        assert!(matches!(
            MazeGeometry::new(10.0, -1.0),
            Err(GeometryError::WallThicknessOutOfRange { .. })
        ));
    }

    #[test]
    fn wall_view_treats_out_of_bounds_as_walled() {
        let cells = [false, false, false, false];
        let view = WallGridView::new(&cells, 2, 2);

        assert!(!view.is_walled(1, 1));
        assert!(view.is_walled(-1, 0));
        assert!(view.is_walled(0, 2));
        assert!(view.is_walled(2, 0));
        assert_eq!(view.walled().count(), 0);
    }

    #[test]
    fn open_neighbors_follow_carved_edges() {
        let mut layout = closed_layout(2, 2);
        // Open the vertical edge between (0,0) and (1,0).
        layout.vertical[1] = false;
        // Open the horizontal edge between (1,0) and (1,1).
        layout.horizontal[3] = false;
        let walls = layout.walls();

        let from_origin: Vec<_> = walls.open_neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(from_origin, vec![CellCoord::new(1, 0)]);

        let from_corner: Vec<_> = walls.open_neighbors(CellCoord::new(1, 0)).collect();
        assert_eq!(
            from_corner,
            vec![CellCoord::new(1, 1), CellCoord::new(0, 0)]
        );
        assert!(!walls.is_open_between(CellCoord::new(0, 0), CellCoord::new(1, 1)));
        assert_eq!(walls.cell_dimensions(), (2, 2));
    }

    #[test]
    fn layout_validation_detects_open_boundary() {
        let mut layout = closed_layout(3, 2);
        assert_eq!(layout.validate(), Ok(()));

        // Right boundary of row 1.
        layout.vertical[7] = false;
        assert_eq!(
            layout.validate(),
            Err(LayoutError::OpenBoundary {
                axis: WallAxis::Vertical,
                row: 1,
                column: 3,
            })
        );
    }

    #[test]
    fn layout_validation_detects_size_mismatch() {
        let mut layout = closed_layout(3, 2);
        let _ = layout.horizontal.pop();

        assert_eq!(
            layout.validate(),
            Err(LayoutError::WallCountMismatch {
                axis: WallAxis::Horizontal,
                expected: 9,
                actual: 8,
            })
        );
    }

    #[test]
    fn layout_survives_json_encoding() {
        let mut layout = closed_layout(2, 1);
        layout.vertical[1] = false;

        let json = serde_json::to_string(&layout).expect("serialize");
        let restored: MazeLayout = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, layout);
    }
}
