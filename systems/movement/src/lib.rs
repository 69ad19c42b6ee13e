#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall-aware movement resolution for actors inside a carved maze.

use std::time::Duration;

use log::trace;
use maze_chase_core::{
    Actor, ActorKind, CellCoord, Command, Direction, DirectionSet, Event, MazeGeometry, MazeWalls,
};

/// Displacement applied when a held direction is not blocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepLimit {
    /// Applies `min(speed * dt, cell_length)`, the same target the blocking
    /// clamp uses, so a single step never crosses more than one cell.
    #[default]
    CappedToCell,
    /// Applies the raw `speed * dt` displacement. Long frames may carry the
    /// actor through interior walls, but never past the faces of the outer
    /// boundary.
    Uncapped,
}

/// Advances `actor` along every held direction, stopping flush against walls.
///
/// Directions resolve one after another in [`Direction::RESOLUTION_ORDER`]
/// and the actor's cell is re-derived after every step, so later directions
/// see the cell reached by earlier ones. Wall lookups outside the matrices
/// count as walled.
///
/// # Panics
///
/// Panics when the actor's cell lies outside the maze or does not contain the
/// actor's position.
pub fn advance(
    actor: &mut Actor,
    directions: DirectionSet,
    dt: Duration,
    walls: MazeWalls<'_>,
    geometry: MazeGeometry,
    limit: StepLimit,
) {
    let (columns, rows) = walls.cell_dimensions();
    assert!(
        actor.cell.column() < columns && actor.cell.row() < rows,
        "actor cell {:?} lies outside the {columns}x{rows} maze",
        actor.cell
    );
    assert_eq!(
        CellCoord::containing(actor.position, geometry.cell_length()),
        Some(actor.cell),
        "actor cell does not contain its position {}",
        actor.position
    );

    let distance = actor.speed * dt.as_secs_f32();
    for direction in directions.iter() {
        step(actor, direction, distance, walls, geometry, limit);
        actor.cell = derive_cell(actor, geometry.cell_length());
    }
}

fn step(
    actor: &mut Actor,
    direction: Direction,
    distance: f32,
    walls: MazeWalls<'_>,
    geometry: MazeGeometry,
    limit: StepLimit,
) {
    let length = geometry.cell_length();
    let thickness = geometry.wall_thickness();
    let (columns, rows) = walls.cell_dimensions();
    let width = columns as f32 * length;
    let height = rows as f32 * length;
    let capped = distance.min(length);
    let applied = match limit {
        StepLimit::CappedToCell => capped,
        StepLimit::Uncapped => distance,
    };

    let column = i64::from(actor.cell.column());
    let row = i64::from(actor.cell.row());
    let left = column as f32 * length;
    let top = row as f32 * length;
    let right = left + length;
    let bottom = top + length;
    let position = &mut actor.position;

    // Near a corner the perpendicular wall of the cell ahead also blocks.
    let near_right = right - position.x < thickness;
    let near_left = position.x - left < thickness;
    let near_bottom = bottom - position.y < thickness;
    let near_top = position.y - top < thickness;
    let horizontal = |r: i64, c: i64| walls.horizontal.is_walled(r, c);
    let vertical = |r: i64, c: i64| walls.vertical.is_walled(r, c);

    let blocked = match direction {
        Direction::North => {
            horizontal(row, column)
                || (near_right && vertical(row - 1, column + 1))
                || (near_left && vertical(row - 1, column))
        }
        Direction::South => {
            horizontal(row + 1, column)
                || (near_right && vertical(row + 1, column + 1))
                || (near_left && vertical(row + 1, column))
        }
        Direction::West => {
            vertical(row, column)
                || (near_bottom && horizontal(row + 1, column - 1))
                || (near_top && horizontal(row, column - 1))
        }
        Direction::East => {
            vertical(row, column + 1)
                || (near_bottom && horizontal(row + 1, column + 1))
                || (near_top && horizontal(row, column + 1))
        }
    };

    if blocked {
        trace!("{:?} blocked moving {direction:?} in {:?}", actor.kind, actor.cell);
        match direction {
            Direction::North => position.y = (position.y - capped).max(top + thickness),
            Direction::South => position.y = (position.y + capped).min(bottom - thickness),
            Direction::West => position.x = (position.x - capped).max(left + thickness),
            Direction::East => position.x = (position.x + capped).min(right - thickness),
        }
    } else {
        // The outer boundary is always walled, so overshoot stops at its face.
        match direction {
            Direction::North => position.y = (position.y - applied).max(thickness),
            Direction::South => position.y = (position.y + applied).min(height - thickness),
            Direction::West => position.x = (position.x - applied).max(thickness),
            Direction::East => position.x = (position.x + applied).min(width - thickness),
        }
    }
}

fn derive_cell(actor: &Actor, cell_length: f32) -> CellCoord {
    match CellCoord::containing(actor.position, cell_length) {
        Some(cell) => cell,
        None => panic!(
            "{:?} left the maze at {}",
            actor.kind, actor.position
        ),
    }
}

/// Pure system that turns held directions into avatar movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    limit: StepLimit,
}

impl Movement {
    /// Creates a movement system applying the provided step limit.
    #[must_use]
    pub const fn new(limit: StepLimit) -> Self {
        Self { limit }
    }

    /// Step limit applied to unblocked displacement.
    #[must_use]
    pub const fn step_limit(&self) -> StepLimit {
        self.limit
    }

    /// Consumes world events and the avatar snapshot to emit a move command.
    ///
    /// Time is the sum of every `TimeAdvanced` event in the batch. Nothing is
    /// emitted when no time passed, no avatar exists or the resolved position
    /// equals the current one.
    pub fn handle(
        &mut self,
        events: &[Event],
        held: DirectionSet,
        avatar: Option<Actor>,
        walls: MazeWalls<'_>,
        geometry: MazeGeometry,
        out: &mut Vec<Command>,
    ) {
        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if dt.is_zero() || held.is_empty() {
            return;
        }

        let Some(mut actor) = avatar.filter(|actor| actor.kind == ActorKind::Avatar) else {
            return;
        };
        let before = actor.position;
        advance(&mut actor, held, dt, walls, geometry, self.limit);

        if actor.position != before {
            out.push(Command::MoveActor {
                actor: ActorKind::Avatar,
                position: actor.position,
            });
        }
    }
}
