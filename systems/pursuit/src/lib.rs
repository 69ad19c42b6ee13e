#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy pursuit system steering the enemy toward the avatar.
//!
//! The enemy ignores walls: every fixed step it closes the gap on each axis
//! independently by at most `speed * step_interval`, never overshooting.

use std::time::Duration;

use glam::Vec2;
use maze_chase_core::{Actor, ActorKind, Command, Event};

/// Configuration parameters required to construct the pursuit system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    step_interval: Duration,
}

impl Config {
    /// Creates a configuration stepping the enemy once per `step_interval`.
    #[must_use]
    pub const fn new(step_interval: Duration) -> Self {
        Self { step_interval }
    }
}

/// Pure system that emits enemy movement commands at a fixed cadence.
#[derive(Debug)]
pub struct Pursuit {
    step_interval: Duration,
    accumulator: Duration,
}

impl Pursuit {
    /// Creates a new pursuit system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step_interval: config.step_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and actor snapshots to emit at most one enemy move.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemy: Option<Actor>,
        avatar: Option<Actor>,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::RoundStarted { .. } => {
                    self.accumulator = Duration::ZERO;
                    accumulated = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        let (Some(enemy), Some(avatar)) = (enemy, avatar) else {
            self.accumulator = Duration::ZERO;
            return;
        };
        if self.step_interval.is_zero() || accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let steps = self.resolve_steps();
        if steps == 0 {
            return;
        }

        let reach = enemy.speed * self.step_interval.as_secs_f32();
        let mut position = enemy.position;
        for _ in 0..steps {
            position = step_toward(position, avatar.position, reach);
        }

        if position != enemy.position {
            out.push(Command::MoveActor {
                actor: ActorKind::Enemy,
                position,
            });
        }
    }

    fn resolve_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.accumulator >= self.step_interval {
            self.accumulator -= self.step_interval;
            steps += 1;
        }
        steps
    }
}

fn step_toward(from: Vec2, to: Vec2, reach: f32) -> Vec2 {
    let delta = (to - from).clamp(Vec2::splat(-reach), Vec2::splat(reach));
    from + delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::CellCoord;

    fn actor(kind: ActorKind, position: Vec2, speed: f32) -> Actor {
        Actor {
            kind,
            position,
            cell: CellCoord::containing(position, 50.0).expect("inside grid"),
            speed,
        }
    }

    #[test]
    fn step_never_overshoots_target() {
        let next = step_toward(Vec2::new(10.0, 10.0), Vec2::new(12.0, 40.0), 5.0);

        assert_eq!(next, Vec2::new(12.0, 15.0));
    }

    #[test]
    fn leftover_time_carries_to_next_batch() {
        let mut pursuit = Pursuit::new(Config::new(Duration::from_millis(50)));
        pursuit.accumulator = Duration::from_millis(120);

        assert_eq!(pursuit.resolve_steps(), 2);
        assert_eq!(pursuit.accumulator, Duration::from_millis(20));
    }

    #[test]
    fn round_start_discards_accumulated_time() {
        let mut pursuit = Pursuit::new(Config::new(Duration::from_millis(100)));
        let enemy = actor(ActorKind::Enemy, Vec2::new(25.0, 25.0), 100.0);
        let avatar = actor(ActorKind::Avatar, Vec2::new(225.0, 25.0), 256.0);
        let mut out = Vec::new();

        pursuit.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(90),
            }],
            Some(enemy),
            Some(avatar),
            &mut out,
        );
        pursuit.handle(
            &[
                Event::RoundStarted {
                    round: 2,
                    avatar: avatar.cell,
                    goal: CellCoord::new(0, 3),
                    enemy: Some(enemy.cell),
                },
                Event::TimeAdvanced {
                    dt: Duration::from_millis(20),
                },
            ],
            Some(enemy),
            Some(avatar),
            &mut out,
        );

        assert!(out.is_empty());
        assert_eq!(pursuit.accumulator, Duration::from_millis(20));
    }
}
