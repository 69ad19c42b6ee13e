//! Randomized depth-first maze carving.

use maze_chase_core::{
    CellCoord, LayoutError, MazeDimensions, MazeLayout, MazeWalls, WallGridView,
};
use rand::{seq::SliceRandom, Rng};

/// Grid of cells whose walls are carved into a perfect maze.
///
/// Horizontal walls form a `(rows + 1) x columns` matrix where entry
/// `[row][column]` is the edge above `row`; vertical walls form a
/// `rows x (columns + 1)` matrix where entry `[row][column]` is the edge left
/// of `column`. Boundary rows and columns of both matrices stay walled.
#[derive(Clone, Debug)]
pub struct Maze {
    dimensions: MazeDimensions,
    visited: Vec<bool>,
    horizontal: Vec<bool>,
    vertical: Vec<bool>,
}

impl Maze {
    /// Creates a fully walled maze with every cell unvisited.
    #[must_use]
    pub fn new(dimensions: MazeDimensions) -> Self {
        let mut maze = Self {
            dimensions,
            visited: Vec::new(),
            horizontal: Vec::new(),
            vertical: Vec::new(),
        };
        maze.initialize(dimensions);
        maze
    }

    /// Rebuilds a maze from an exported layout.
    ///
    /// Every cell is marked visited so a later [`Maze::generate`] leaves the
    /// loaded walls untouched.
    pub fn from_layout(layout: MazeLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let MazeLayout {
            dimensions,
            horizontal,
            vertical,
        } = layout;

        Ok(Self {
            dimensions,
            visited: vec![true; dimensions.cell_count()],
            horizontal,
            vertical,
        })
    }

    /// Resets the visited grid and restores every wall, boundary and interior alike.
    pub fn initialize(&mut self, dimensions: MazeDimensions) {
        let columns = dimension_len(dimensions.columns());
        let rows = dimension_len(dimensions.rows());

        self.dimensions = dimensions;
        reset(&mut self.visited, dimensions.cell_count(), false);
        reset(
            &mut self.horizontal,
            rows.saturating_add(1).saturating_mul(columns),
            true,
        );
        reset(
            &mut self.vertical,
            rows.saturating_mul(columns.saturating_add(1)),
            true,
        );
    }

    /// Carves a perfect maze with a randomized depth-first walk.
    ///
    /// The walk starts at the top-left cell and backtracks through an explicit
    /// stack. Must run once per [`Maze::initialize`]; a second call finds every
    /// cell visited and changes nothing.
    pub fn generate<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut path = vec![CellCoord::new(0, 0)];

        while let Some(&current) = path.last() {
            self.mark_visited(current);

            let Some(&next) = self.unvisited_neighbors(current).choose(&mut *rng) else {
                let _ = path.pop();
                continue;
            };

            self.carve(current, next);
            path.push(next);
        }
    }

    /// Number of cells along each axis.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Read-only view of the horizontal wall matrix.
    #[must_use]
    pub fn horizontal_walls(&self) -> WallGridView<'_> {
        WallGridView::new(
            &self.horizontal,
            self.dimensions.rows().saturating_add(1),
            self.dimensions.columns(),
        )
    }

    /// Read-only view of the vertical wall matrix.
    #[must_use]
    pub fn vertical_walls(&self) -> WallGridView<'_> {
        WallGridView::new(
            &self.vertical,
            self.dimensions.rows(),
            self.dimensions.columns().saturating_add(1),
        )
    }

    /// Both wall matrices bundled for movement resolution and rendering.
    #[must_use]
    pub fn walls(&self) -> MazeWalls<'_> {
        MazeWalls {
            horizontal: self.horizontal_walls(),
            vertical: self.vertical_walls(),
        }
    }

    /// Reports whether generation has entered `cell`.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.visited.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of interior edges removed by carving.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        let open_horizontal = self.horizontal.iter().filter(|walled| !**walled).count();
        let open_vertical = self.vertical.iter().filter(|walled| !**walled).count();
        open_horizontal + open_vertical
    }

    /// Exports the current walls.
    #[must_use]
    pub fn layout(&self) -> MazeLayout {
        MazeLayout {
            dimensions: self.dimensions,
            horizontal: self.horizontal.clone(),
            vertical: self.vertical.clone(),
        }
    }

    fn mark_visited(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.visited.get_mut(index) {
                *slot = true;
            }
        }
    }

    fn unvisited_neighbors(&self, cell: CellCoord) -> Vec<CellCoord> {
        let column = cell.column();
        let row = cell.row();
        let candidates = [
            column.checked_sub(1).map(|left| CellCoord::new(left, row)),
            column.checked_add(1).map(|right| CellCoord::new(right, row)),
            row.checked_sub(1).map(|up| CellCoord::new(column, up)),
            row.checked_add(1).map(|down| CellCoord::new(column, down)),
        ];

        let mut neighbors = Vec::with_capacity(candidates.len());
        for candidate in candidates.into_iter().flatten() {
            if self.dimensions.contains(candidate) && !self.is_visited(candidate) {
                neighbors.push(candidate);
            }
        }
        neighbors
    }

    fn carve(&mut self, from: CellCoord, to: CellCoord) {
        let columns = dimension_len(self.dimensions.columns());
        if from.row() == to.row() {
            // Adjacent columns c and c + 1 share the vertical edge at c + 1.
            let row = dimension_len(from.row());
            let column = dimension_len(from.column().max(to.column()));
            let index = row * columns.saturating_add(1) + column;
            if let Some(slot) = self.vertical.get_mut(index) {
                *slot = false;
            }
        } else {
            let row = dimension_len(from.row().max(to.row()));
            let column = dimension_len(from.column());
            if let Some(slot) = self.horizontal.get_mut(row * columns + column) {
                *slot = false;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.dimensions.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.dimensions.columns()).ok()?;
        Some(row * width + column)
    }
}

fn dimension_len(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn reset(cells: &mut Vec<bool>, len: usize, value: bool) {
    cells.clear();
    cells.resize(len, value);
}
