//! Per-kind enemy behavior
//!
//! Movement, the charger/explosive state machines, healer pulses and the
//! local separation force all live here. Damage to the player, death
//! resolution and drops stay in the tick so this pass never removes
//! entities.

use glam::Vec2;

use super::state::{Enemy, EnemyKind, EnemyMode};
use crate::consts::{KNOCKBACK_DECAY, SEPARATION_RANGE};
use crate::{dir_toward, dist_sq};

/// Charger telegraph trigger distance
const CHARGE_TRIGGER: f32 = 250.0;
const WINDUP_TIME: f32 = 1.0;
const CHARGE_TIME: f32 = 0.5;
const CHARGE_SPEED_MULT: f32 = 4.0;

/// Ranged kiting band
const RANGED_FAR: f32 = 300.0;
const RANGED_NEAR: f32 = 200.0;

/// Explosive fuse
const FUSE_TRIGGER: f32 = 40.0;
const FUSE_TIME: f32 = 1.0;

/// Healer pulse
const HEAL_PERIOD: f32 = 3.0;
const HEAL_RADIUS: f32 = 150.0;
const HEAL_AMOUNT: f32 = 2.0;

/// Index of the living enemy nearest to `pos` within `max_dist`
pub fn nearest_enemy(pos: Vec2, enemies: &[Enemy], max_dist: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, enemy) in enemies.iter().enumerate() {
        let d_sq = dist_sq(pos, enemy.pos);
        if d_sq <= max_dist * max_dist && best.is_none_or(|(_, b)| d_sq < b) {
            best = Some((i, d_sq));
        }
    }
    best.map(|(i, _)| i)
}

/// Advance every enemy's behavior state and position by `dt`
pub fn update_enemies(enemies: &mut [Enemy], player_pos: Vec2, dt: f32) {
    // Separation is computed against last frame's positions; a snapshot
    // keeps the pass order-independent.
    let positions: Vec<Vec2> = enemies.iter().map(|e| e.pos).collect();
    // Healer pulses touch other enemies, so they are deferred past the
    // mutable iteration. The index tags the pulsing healer, which never
    // heals itself.
    let mut heals: Vec<(usize, Vec2)> = Vec::new();

    for (i, enemy) in enemies.iter_mut().enumerate() {
        if enemy.flash > 0.0 {
            enemy.flash -= dt;
        }

        let mut separation = Vec2::ZERO;
        for (j, &other) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = enemy.pos - other;
            let dist = d.length();
            if dist < SEPARATION_RANGE {
                separation += d / (dist + 1.0) * 20.0;
            }
        }

        let to_player = player_pos - enemy.pos;
        let player_dist = to_player.length();
        let approach = dir_toward(enemy.pos, player_pos);

        let mut velocity = match enemy.kind {
            EnemyKind::Charger => match enemy.mode {
                EnemyMode::Default => {
                    if player_dist < CHARGE_TRIGGER {
                        enemy.mode = EnemyMode::WindingUp;
                        enemy.state_timer = WINDUP_TIME;
                        Vec2::ZERO
                    } else {
                        approach * enemy.speed
                    }
                }
                EnemyMode::WindingUp => {
                    enemy.state_timer -= dt;
                    if enemy.state_timer <= 0.0 {
                        enemy.mode = EnemyMode::Charging;
                        enemy.state_timer = CHARGE_TIME;
                        // Direction locks at launch; the burst does not track
                        enemy.charge_dir = approach;
                    }
                    Vec2::ZERO
                }
                EnemyMode::Charging => {
                    enemy.state_timer -= dt;
                    if enemy.state_timer <= 0.0 {
                        enemy.mode = EnemyMode::Default;
                    }
                    enemy.charge_dir * enemy.speed * CHARGE_SPEED_MULT
                }
                EnemyMode::Exploding => Vec2::ZERO,
            },
            EnemyKind::Ranged => {
                if player_dist > RANGED_FAR {
                    approach * enemy.speed
                } else if player_dist < RANGED_NEAR {
                    -approach * enemy.speed
                } else {
                    Vec2::ZERO
                }
            }
            EnemyKind::Explosive => {
                // Keeps closing in while the fuse burns
                if enemy.mode == EnemyMode::Exploding {
                    enemy.state_timer -= dt;
                    if enemy.state_timer <= 0.0 {
                        // Detonation: the death pass resolves the blast
                        enemy.hp = 0.0;
                    }
                } else if player_dist < FUSE_TRIGGER {
                    enemy.mode = EnemyMode::Exploding;
                    enemy.state_timer = FUSE_TIME;
                }
                approach * enemy.speed
            }
            EnemyKind::Healer => {
                enemy.state_timer -= dt;
                if enemy.state_timer <= 0.0 {
                    enemy.state_timer = HEAL_PERIOD;
                    heals.push((i, enemy.pos));
                }
                approach * enemy.speed
            }
            EnemyKind::Basic | EnemyKind::Splitter => approach * enemy.speed,
        };

        velocity += separation;
        enemy.pos += velocity * dt;

        enemy.pos += enemy.knockback * (dt * 60.0);
        enemy.knockback *= KNOCKBACK_DECAY;
    }

    for (healer, heal_pos) in heals {
        for (j, enemy) in enemies.iter_mut().enumerate() {
            if j == healer {
                continue;
            }
            if enemy.hp > 0.0 && dist_sq(enemy.pos, heal_pos) <= HEAL_RADIUS * HEAL_RADIUS {
                enemy.hp = (enemy.hp + HEAL_AMOUNT).min(enemy.max_hp);
            }
        }
    }
}
