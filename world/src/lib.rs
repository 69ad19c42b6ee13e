#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The world owns the carved [`Maze`], the three actors of a round and the
//! round clock. Adapters and systems never mutate it directly: they submit
//! [`Command`] values through [`apply`] and observe the resulting [`Event`]
//! stream plus the read-only [`query`] functions.

pub mod maze;

use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};
use maze_chase_core::{
    Actor, ActorKind, CellCoord, Command, Event, MazeDimensions, MazeGeometry, WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use maze::Maze;

const DEFAULT_SEED: u64 = 0x6d61_7a65_6368_6173;
const DEFAULT_AVATAR_SPEED: f32 = 256.0;

/// Fraction of a cell within which two actors count as touching on each axis.
const CONTACT_FRACTION: f32 = 0.2;

const PLACEMENT_ATTEMPTS: usize = 32;

/// Speeds assigned to the movable actors when a round starts.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Roster {
    avatar_speed: f32,
    enemy_speed: Option<f32>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            avatar_speed: DEFAULT_AVATAR_SPEED,
            enemy_speed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct RoundClock {
    index: u64,
    elapsed: Duration,
    best: Option<Duration>,
}

impl RoundClock {
    fn begin(&mut self) {
        self.index = self.index.saturating_add(1);
        self.elapsed = Duration::ZERO;
    }

    fn record_completion(&mut self) -> Duration {
        let best = match self.best {
            Some(best) if best <= self.elapsed => best,
            _ => self.elapsed,
        };
        self.best = Some(best);
        best
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    geometry: MazeGeometry,
    maze: Maze,
    roster: Roster,
    avatar: Actor,
    goal: Actor,
    enemy: Option<Actor>,
    round: RoundClock,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world seeded with the default seed and a first round in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world whose mazes and actor placements derive from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let geometry = MazeGeometry::default();
        let origin = CellCoord::new(0, 0);
        let mut world = Self {
            banner: WELCOME_BANNER,
            geometry,
            maze: Maze::new(MazeDimensions::default()),
            roster: Roster::default(),
            avatar: Actor::centered_in(
                ActorKind::Avatar,
                origin,
                geometry.cell_length(),
                DEFAULT_AVATAR_SPEED,
            ),
            goal: Actor::centered_in(ActorKind::Goal, origin, geometry.cell_length(), 0.0),
            enemy: None,
            round: RoundClock::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        let mut discarded = Vec::new();
        world.start_round(&mut discarded);
        world
    }

    fn start_round(&mut self, out_events: &mut Vec<Event>) {
        self.place_actors();
        let dimensions = self.maze.dimensions();
        self.maze.initialize(dimensions);
        self.maze.generate(&mut self.rng);
        debug!(
            "carved {}x{} maze with {} open edges",
            dimensions.columns(),
            dimensions.rows(),
            self.maze.open_edge_count()
        );
        self.begin_round(out_events);
    }

    fn begin_round(&mut self, out_events: &mut Vec<Event>) {
        self.round.begin();
        info!(
            "round {} started: avatar at {:?}, goal at {:?}",
            self.round.index, self.avatar.cell, self.goal.cell
        );
        out_events.push(Event::RoundStarted {
            round: self.round.index,
            avatar: self.avatar.cell,
            goal: self.goal.cell,
            enemy: self.enemy.map(|enemy| enemy.cell),
        });
    }

    fn place_actors(&mut self) {
        let cell_length = self.geometry.cell_length();
        let mut taken: Vec<CellCoord> = Vec::with_capacity(3);

        let avatar_cell = self.random_free_cell(&taken);
        taken.push(avatar_cell);
        let goal_cell = self.random_free_cell(&taken);
        taken.push(goal_cell);

        self.avatar = Actor::centered_in(
            ActorKind::Avatar,
            avatar_cell,
            cell_length,
            self.roster.avatar_speed,
        );
        self.goal = Actor::centered_in(ActorKind::Goal, goal_cell, cell_length, 0.0);
        self.enemy = match self.roster.enemy_speed {
            Some(speed) => {
                let enemy_cell = self.random_free_cell(&taken);
                Some(Actor::centered_in(
                    ActorKind::Enemy,
                    enemy_cell,
                    cell_length,
                    speed,
                ))
            }
            None => None,
        };
    }

    /// Picks a uniformly random cell, retrying a bounded number of times to
    /// avoid cells that are already taken.
    fn random_free_cell(&mut self, taken: &[CellCoord]) -> CellCoord {
        let dimensions = self.maze.dimensions();
        let mut cell = CellCoord::new(0, 0);
        for _ in 0..PLACEMENT_ATTEMPTS {
            cell = CellCoord::new(
                self.rng.gen_range(0..dimensions.columns()),
                self.rng.gen_range(0..dimensions.rows()),
            );
            if !taken.contains(&cell) {
                break;
            }
        }
        cell
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let reach = CONTACT_FRACTION * self.geometry.cell_length();

        if in_contact(self.avatar.position, self.goal.position, reach) {
            let elapsed = self.round.elapsed;
            let best = self.round.record_completion();
            info!(
                "round {} completed in {:.2}s (best {:.2}s)",
                self.round.index,
                elapsed.as_secs_f32(),
                best.as_secs_f32()
            );
            out_events.push(Event::RoundCompleted {
                round: self.round.index,
                elapsed,
                best,
            });
            self.start_round(out_events);
            return;
        }

        let caught = self
            .enemy
            .is_some_and(|enemy| in_contact(self.avatar.position, enemy.position, reach));
        if caught {
            let elapsed = self.round.elapsed;
            info!(
                "round {} lost after {:.2}s",
                self.round.index,
                elapsed.as_secs_f32()
            );
            out_events.push(Event::AvatarCaught {
                round: self.round.index,
                elapsed,
            });
            self.start_round(out_events);
        }
    }

    fn move_actor(&mut self, kind: ActorKind, position: Vec2, out_events: &mut Vec<Event>) {
        let dimensions = self.maze.dimensions();
        let Some(cell) = CellCoord::containing(position, self.geometry.cell_length())
            .filter(|cell| dimensions.contains(*cell))
        else {
            warn!("rejected move of {kind:?} to {position} outside the maze");
            return;
        };

        let actor = match kind {
            ActorKind::Avatar => &mut self.avatar,
            ActorKind::Enemy => match self.enemy.as_mut() {
                Some(enemy) => enemy,
                None => {
                    warn!("rejected enemy move while the enemy is disabled");
                    return;
                }
            },
            ActorKind::Goal => {
                warn!("rejected move of the stationary goal");
                return;
            }
        };

        let from = actor.cell;
        actor.position = position;
        actor.cell = cell;
        out_events.push(Event::ActorMoved {
            actor: kind,
            from,
            to: cell,
        });

        self.resolve_contacts(out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze {
            dimensions,
            geometry,
        } => {
            world.geometry = geometry;
            world.maze = Maze::new(dimensions);
            world.start_round(out_events);
        }
        Command::ConfigureRoster {
            avatar_speed,
            enemy_speed,
        } => {
            world.roster = Roster {
                avatar_speed,
                enemy_speed,
            };
            world.start_round(out_events);
        }
        Command::StartRound => world.start_round(out_events),
        Command::LoadLayout { layout } => match Maze::from_layout(layout) {
            Ok(maze) => {
                world.maze = maze;
                world.place_actors();
                world.begin_round(out_events);
            }
            Err(reason) => {
                warn!("rejected maze layout: {reason}");
                out_events.push(Event::LayoutRejected { reason });
            }
        },
        Command::Tick { dt } => {
            world.round.elapsed = world.round.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.resolve_contacts(out_events);
        }
        Command::MoveActor { actor, position } => world.move_actor(actor, position, out_events),
    }
}

fn in_contact(a: Vec2, b: Vec2, reach: f32) -> bool {
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use maze_chase_core::{Actor, ActorKind, MazeDimensions, MazeGeometry, MazeLayout, MazeWalls};

    use super::{Maze, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the carved maze.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Views over both wall matrices of the current maze.
    #[must_use]
    pub fn walls(world: &World) -> MazeWalls<'_> {
        world.maze.walls()
    }

    /// Exports the current maze walls.
    #[must_use]
    pub fn layout(world: &World) -> MazeLayout {
        world.maze.layout()
    }

    /// Cell length and wall thickness of the current maze.
    #[must_use]
    pub fn geometry(world: &World) -> MazeGeometry {
        world.geometry
    }

    /// Number of cells along each axis of the current maze.
    #[must_use]
    pub fn dimensions(world: &World) -> MazeDimensions {
        world.maze.dimensions()
    }

    /// Size of the current maze in world units.
    #[must_use]
    pub fn pixel_size(world: &World) -> Vec2 {
        world.geometry.pixel_size(world.maze.dimensions())
    }

    /// Snapshot of the requested actor, `None` when the enemy is disabled.
    #[must_use]
    pub fn actor(world: &World, kind: ActorKind) -> Option<Actor> {
        match kind {
            ActorKind::Avatar => Some(world.avatar),
            ActorKind::Goal => Some(world.goal),
            ActorKind::Enemy => world.enemy,
        }
    }

    /// Snapshots of every actor in the round: goal, avatar, then enemy.
    #[must_use]
    pub fn actors(world: &World) -> Vec<Actor> {
        let mut actors = vec![world.goal, world.avatar];
        actors.extend(world.enemy);
        actors
    }

    /// Captures the round clock.
    #[must_use]
    pub fn round(world: &World) -> RoundSnapshot {
        RoundSnapshot {
            index: world.round.index,
            elapsed: world.round.elapsed,
            best: world.round.best,
        }
    }

    /// Immutable view of the round clock.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RoundSnapshot {
        /// Sequential index of the round in progress.
        pub index: u64,
        /// Simulated time spent in the round so far.
        pub elapsed: Duration,
        /// Fastest completed round since the process started.
        pub best: Option<Duration>,
    }
}
