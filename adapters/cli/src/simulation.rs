//! Frame loop wiring the world, the movement and pursuit systems and the scene.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use maze_chase_core::{ActorKind, Command, Event};
use maze_chase_rendering::{
    ActorPresentation, Color, FrameInput, FrameSimulationBreakdown, HudPresentation,
    MazePresentation, RenderingError, Scene, DEFAULT_SIDE_PANEL_WIDTH,
};
use maze_chase_system_movement::Movement;
use maze_chase_system_pursuit::{Config as PursuitConfig, Pursuit};
use maze_chase_world::{self as world, query, World};

use crate::{layout_transfer, settings::Settings};

const WALL_COLOR: Color = Color::from_rgb_u8(0, 0, 0);
const FLOOR_COLOR: Color = Color::from_rgb_u8(236, 232, 220);
const AVATAR_COLOR: Color = Color::from_rgb_u8(52, 105, 201);
const GOAL_COLOR: Color = Color::from_rgb_u8(61, 168, 84);
const ENEMY_COLOR: Color = Color::from_rgb_u8(204, 58, 52);
/// Actor disc radius relative to the cell length.
const ACTOR_RADIUS_FRACTION: f32 = 0.32;

/// Owns the world and the systems that drive it frame by frame.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    movement: Movement,
    pursuit: Pursuit,
    print_layout: bool,
    rendered_round: u64,
}

impl Simulation {
    /// Boots a world configured from `settings`.
    pub(crate) fn new(settings: &Settings) -> Result<Self> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        info!("using maze seed {seed}");

        let mut world = World::with_seed(seed);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureMaze {
                dimensions: settings.dimensions,
                geometry: settings.geometry,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::ConfigureRoster {
                avatar_speed: settings.avatar_speed,
                enemy_speed: settings.enemy_speed,
            },
            &mut events,
        );

        if let Some(code) = &settings.layout {
            let layout = layout_transfer::decode(code).context("could not load --layout")?;
            world::apply(&mut world, Command::LoadLayout { layout }, &mut events);
            if let Some(Event::LayoutRejected { reason }) = events.last() {
                bail!("layout was rejected: {reason}");
            }
        }

        let simulation = Self {
            world,
            movement: Movement::default(),
            pursuit: Pursuit::new(PursuitConfig::new(settings.enemy_step_interval)),
            print_layout: settings.print_layout,
            rendered_round: 0,
        };
        simulation.report(&events);
        Ok(simulation)
    }

    /// Read-only access to the simulated world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Builds the scene describing the current world state.
    pub(crate) fn build_scene(&self) -> Result<Scene, RenderingError> {
        Scene::new(
            maze_presentation(&self.world),
            actor_presentations(&self.world),
            hud_presentation(&self.world),
            DEFAULT_SIDE_PANEL_WIDTH,
        )
    }

    /// Advances the world by `dt` using the captured input, then refreshes `scene`.
    pub(crate) fn frame(
        &mut self,
        dt: Duration,
        input: FrameInput,
        scene: &mut Scene,
    ) -> FrameSimulationBreakdown {
        let simulation_started = Instant::now();
        let events = self.step(dt, input);
        self.report(&events);
        let simulation = simulation_started.elapsed();

        let population_started = Instant::now();
        self.populate_scene(scene);
        FrameSimulationBreakdown {
            simulation,
            scene_population: population_started.elapsed(),
        }
    }

    fn step(&mut self, dt: Duration, input: FrameInput) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.movement.handle(
            &events,
            input.held,
            query::actor(&self.world, ActorKind::Avatar),
            query::walls(&self.world),
            query::geometry(&self.world),
            &mut commands,
        );
        self.apply_all(commands, &mut events);

        let mut commands = Vec::new();
        self.pursuit.handle(
            &events,
            query::actor(&self.world, ActorKind::Enemy),
            query::actor(&self.world, ActorKind::Avatar),
            &mut commands,
        );
        self.apply_all(commands, &mut events);

        if input.regenerate {
            world::apply(&mut self.world, Command::StartRound, &mut events);
        }
        events
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn report(&self, events: &[Event]) {
        let round_started = events
            .iter()
            .any(|event| matches!(event, Event::RoundStarted { .. }));
        if !round_started || !self.print_layout {
            return;
        }

        match layout_transfer::encode(&query::layout(&self.world)) {
            Ok(code) => info!("layout: {code}"),
            Err(error) => warn!("could not encode layout: {error}"),
        }
    }

    fn populate_scene(&mut self, scene: &mut Scene) {
        let round = query::round(&self.world);
        if round.index != self.rendered_round {
            scene.maze = maze_presentation(&self.world);
            self.rendered_round = round.index;
        }
        scene.actors = actor_presentations(&self.world);
        scene.hud = HudPresentation {
            elapsed: round.elapsed,
            best: round.best,
        };
    }
}

fn maze_presentation(world: &World) -> MazePresentation {
    MazePresentation::new(
        query::walls(world),
        query::geometry(world),
        WALL_COLOR,
        FLOOR_COLOR,
    )
}

fn actor_presentations(world: &World) -> Vec<ActorPresentation> {
    let radius = query::geometry(world).cell_length() * ACTOR_RADIUS_FRACTION;
    query::actors(world)
        .into_iter()
        .map(|actor| {
            let color = match actor.kind {
                ActorKind::Avatar => AVATAR_COLOR,
                ActorKind::Goal => GOAL_COLOR,
                ActorKind::Enemy => ENEMY_COLOR,
            };
            ActorPresentation::new(actor.kind, actor.position, radius, color)
        })
        .collect()
}

fn hud_presentation(world: &World) -> HudPresentation {
    let round = query::round(world);
    HudPresentation {
        elapsed: round.elapsed,
        best: round.best,
    }
}
