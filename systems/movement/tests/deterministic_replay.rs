use std::time::Duration;

use maze_chase_core::{
    ActorKind, CellCoord, Command, Direction, DirectionSet, Event, MazeDimensions, MazeGeometry,
};
use maze_chase_system_movement::Movement;
use maze_chase_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(scripted_frames());
    let second = replay(scripted_frames());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, EventRecord::ActorMoved { .. })),
        "expected the avatar to move at least once"
    );
}

fn replay(frames: Vec<(DirectionSet, Duration)>) -> ReplayOutcome {
    let mut world = World::with_seed(0x5eed);
    let mut movement = Movement::default();
    let mut log = Vec::new();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureMaze {
            dimensions: MazeDimensions::new(6, 5).expect("valid dimensions"),
            geometry: MazeGeometry::new(40.0, 10.0).expect("valid geometry"),
        },
        &mut events,
    );
    record_events(&events, &mut log);

    for (held, dt) in frames {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        record_events(&events, &mut log);
        process_movement(&mut world, &mut movement, held, events, &mut log);
    }

    let avatar = query::actor(&world, ActorKind::Avatar).expect("avatar present");
    ReplayOutcome {
        avatar_cell: avatar.cell,
        avatar_position: (avatar.position.x.to_bits(), avatar.position.y.to_bits()),
        events: log,
    }
}

fn process_movement(
    world: &mut World,
    movement: &mut Movement,
    held: DirectionSet,
    events: Vec<Event>,
    log: &mut Vec<EventRecord>,
) {
    let mut commands = Vec::new();
    movement.handle(
        &events,
        held,
        query::actor(world, ActorKind::Avatar),
        query::walls(world),
        query::geometry(world),
        &mut commands,
    );

    for command in commands {
        let mut generated_events = Vec::new();
        world::apply(world, command, &mut generated_events);
        record_events(&generated_events, log);
    }
}

fn record_events(events: &[Event], log: &mut Vec<EventRecord>) {
    log.extend(events.iter().map(EventRecord::from));
}

fn scripted_frames() -> Vec<(DirectionSet, Duration)> {
    let pattern = [
        DirectionSet::EMPTY.with(Direction::East),
        DirectionSet::EMPTY.with(Direction::South),
        DirectionSet::EMPTY
            .with(Direction::West)
            .with(Direction::North),
        DirectionSet::EMPTY,
    ];
    (0..120)
        .map(|frame| (pattern[(frame / 10) % pattern.len()], Duration::from_millis(16)))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    avatar_cell: CellCoord,
    avatar_position: (u32, u32),
    events: Vec<EventRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum EventRecord {
    RoundStarted {
        round: u64,
        avatar: CellCoord,
        goal: CellCoord,
    },
    TimeAdvanced {
        dt_micros: u128,
    },
    ActorMoved {
        actor: ActorKind,
        from: CellCoord,
        to: CellCoord,
    },
    RoundEnded {
        round: u64,
        elapsed_micros: u128,
    },
    Other,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::RoundStarted {
                round,
                avatar,
                goal,
                ..
            } => Self::RoundStarted {
                round: *round,
                avatar: *avatar,
                goal: *goal,
            },
            Event::TimeAdvanced { dt } => Self::TimeAdvanced {
                dt_micros: dt.as_micros(),
            },
            Event::ActorMoved { actor, from, to } => Self::ActorMoved {
                actor: *actor,
                from: *from,
                to: *to,
            },
            Event::RoundCompleted { round, elapsed, .. }
            | Event::AvatarCaught { round, elapsed } => Self::RoundEnded {
                round: *round,
                elapsed_micros: elapsed.as_micros(),
            },
            Event::LayoutRejected { .. } => Self::Other,
        }
    }
}
