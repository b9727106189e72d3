//! Enemy spawn scheduling
//!
//! A pure function of elapsed game time and internal counters: when the
//! interval elapses, a batch of spawn commands is produced with positions,
//! types, and elite flags all drawn from the scheduler's own seeded sequence.
//! Two schedulers with the same seed and the same `advance` call sequence
//! emit identical batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::rng::RandomSequence;
use super::state::EnemyKind;

/// Interval shrink factor per spawn event
const INTERVAL_DECAY: f32 = 0.985;
/// The interval never drops below this
const INTERVAL_FLOOR: f32 = 0.25;
/// Swarm phases multiply the batch size
const SWARM_MULTIPLIER: f32 = 2.5;

/// One unit to spawn, relative to the anchor (the player)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub offset: Vec2,
    pub kind: EnemyKind,
    pub elite: bool,
}

/// Decides when, where, how many, and what kind of enemies appear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    rng: RandomSequence,
    last_spawn_time: f32,
    spawn_interval: f32,
}

impl SpawnScheduler {
    pub fn new(seed: &str) -> Self {
        Self {
            rng: RandomSequence::new(seed),
            last_spawn_time: 0.0,
            spawn_interval: 1.0,
        }
    }

    pub fn last_spawn_time(&self) -> f32 {
        self.last_spawn_time
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    /// Produce the spawn batch for the current time, if the interval has
    /// elapsed. Empty when it has not.
    pub fn advance(&mut self, game_time: f32) -> Vec<Spawn> {
        if game_time <= self.last_spawn_time + self.spawn_interval {
            return Vec::new();
        }
        self.last_spawn_time = game_time;
        self.spawn_interval = (self.spawn_interval * INTERVAL_DECAY).max(INTERVAL_FLOOR);

        let mut count = 1 + (game_time / 50.0).floor() as u32;

        // Swarm phase: the first 8 seconds of every minute, past the opening
        let swarm = (game_time.floor() as u32) % 60 < 8 && game_time > 30.0;
        if swarm {
            count = (count as f32 * SWARM_MULTIPLIER).round() as u32;
            log::debug!("swarm batch of {count} at t={game_time:.1}");
        }

        let whole_secs = game_time.floor() as u32;
        let mut batch = Vec::with_capacity(count as usize);
        for i in 0..count {
            // Draw order is part of the determinism contract:
            // angle, distance, type roll, elite roll.
            let angle = self.rng.next_f32() * TAU;
            let dist = 600.0 + self.rng.next_f32() * 200.0;
            let offset = Vec2::new(angle.cos(), angle.sin()) * dist;

            // Later time gates re-assign the type on the same roll; this is
            // the de-facto balance contract, not a cumulative distribution.
            let roll = self.rng.next_f32();
            let mut kind = EnemyKind::Basic;
            if game_time > 15.0 {
                if roll < 0.15 {
                    kind = EnemyKind::Charger;
                } else if roll < 0.25 {
                    kind = EnemyKind::Explosive;
                }
            }
            if game_time > 40.0 {
                if roll < 0.12 {
                    kind = EnemyKind::Ranged;
                } else if roll < 0.2 {
                    kind = EnemyKind::Splitter;
                }
            }
            if game_time > 60.0 && roll < 0.08 {
                kind = EnemyKind::Healer;
            }

            // Guaranteed mini-boss leads the batch at every 120s boundary.
            // The elite roll is consumed either way to keep the stream stable.
            let mini_boss = whole_secs > 0 && whole_secs % 120 == 0 && i == 0;
            let elite = self.rng.next_f32() < 0.05 || mini_boss;

            batch.push(Spawn { offset, kind, elite });
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Fire the scheduler once per second for `secs` seconds
    fn run_for(scheduler: &mut SpawnScheduler, secs: u32) -> Vec<Spawn> {
        let mut all = Vec::new();
        for s in 1..=secs {
            all.extend(scheduler.advance(s as f32 + 0.01));
        }
        all
    }

    #[test]
    fn same_seed_same_batches() {
        let mut a = SpawnScheduler::new("abc123");
        let mut b = SpawnScheduler::new("abc123");
        for step in 0..600 {
            let t = step as f32 * 0.7;
            assert_eq!(a.advance(t), b.advance(t));
        }
        assert_eq!(a.last_spawn_time(), b.last_spawn_time());
    }

    #[test]
    fn no_batch_before_first_interval() {
        let mut s = SpawnScheduler::new("abc123");
        assert!(s.advance(0.5).is_empty());
        // The opening interval must strictly elapse
        assert!(s.advance(1.0).is_empty());
        assert!(!s.advance(1.01).is_empty());
        assert_eq!(s.last_spawn_time(), 1.01);
    }

    #[test]
    fn only_basics_before_fifteen_seconds() {
        let mut s = SpawnScheduler::new("variety");
        for spawn in run_for(&mut s, 14) {
            assert_eq!(spawn.kind, EnemyKind::Basic);
        }
    }

    #[test]
    fn offsets_stay_in_spawn_band() {
        let mut s = SpawnScheduler::new("band");
        for spawn in run_for(&mut s, 120) {
            let d = spawn.offset.length();
            assert!((600.0..800.0).contains(&d), "offset distance {d}");
        }
    }

    #[test]
    fn mini_boss_leads_120s_batch() {
        let mut s = SpawnScheduler::new("boss");
        // Exhaust earlier firings so the next lands inside the 120s second
        let mut t = 0.0;
        loop {
            t += 0.2;
            if t >= 120.0 {
                break;
            }
            s.advance(t);
        }
        let batch = s.advance(120.5);
        assert!(!batch.is_empty());
        assert!(batch[0].elite);
    }

    proptest! {
        #[test]
        fn interval_never_below_floor(times in proptest::collection::vec(0.0f32..10_000.0, 1..200)) {
            let mut s = SpawnScheduler::new("floor");
            let mut t = 0.0;
            for dt in times {
                t += dt;
                s.advance(t);
                prop_assert!(s.spawn_interval() >= INTERVAL_FLOOR - f32::EPSILON);
            }
        }
    }
}
