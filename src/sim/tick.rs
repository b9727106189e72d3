//! The frame loop
//!
//! `tick` advances the whole simulation by `dt` seconds in a fixed phase
//! order: input, player, abilities, effects, spawning, enemies, bullets,
//! deaths, gems, pickups, terminal checks. Every phase either reads
//! pre-phase state or defers its mutations, so a tick is a pure function
//! of (state, input, dt).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ability::Modifiers;
use super::catalog::{CharacterId, PassiveId};
use super::effects::{update_effects, Effect, EffectKind};
use super::enemy::{nearest_enemy, update_enemies};
use super::spawn::Spawn;
use super::state::{
    Bullet, Enemy, EnemyKind, GameEvent, Phase, Pickup, PickupKind, SimState, XpGem,
};
use crate::consts::*;
use crate::{dir_toward, dist_sq};

/// Hp scaling applied to each full minute survived
const WAVE_HP_STEP: f32 = 0.15;
/// Shake decay per second
const SHAKE_DECAY: f32 = 10.0;
/// Splitter children only spawn from full-size splitters
const SPLIT_MIN_SCALE: f32 = 0.6;

/// Per-tick external input
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired movement direction; clamped to unit length
    pub move_dir: Vec2,
    /// True on the tick the pause control was pressed
    pub pause: bool,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    // Phase transitions happen even while frozen
    if input.pause {
        match state.phase {
            Phase::Running => state.phase = Phase::Paused,
            Phase::Paused => state.phase = Phase::Running,
            Phase::LevelUp | Phase::GameOver => {}
        }
    }
    if state.phase != Phase::Running {
        return;
    }

    state.game_time += dt;
    state.shake = (state.shake - SHAKE_DECAY * dt).max(0.0);

    // -- player ------------------------------------------------------------
    let move_dir = if input.move_dir.length_squared() > 1.0 {
        input.move_dir.normalize_or_zero()
    } else {
        input.move_dir
    };
    let profile = state.character.profile();
    let level = state.progression.level as f32;
    let per_level = if state.character == CharacterId::Gunner {
        0.008
    } else {
        0.004
    };
    state.player.fire_cooldown = (profile.fire_rate - level * per_level).max(MIN_FIRE_COOLDOWN);
    state.player.update(dt, move_dir);
    state.camera_target = state.player.pos;

    let elixir = f32::from(state.inventory.passive_level(PassiveId::LifeElixir));
    if elixir > 0.0 {
        state.player.hp = (state.player.hp + elixir * dt).min(state.player.max_hp);
    }

    // -- abilities and their effects ---------------------------------------
    let mods = Modifiers::compute(state);
    let impact = state.engine.update(
        &state.inventory,
        &mods,
        state.player.pos,
        state.game_time,
        &mut state.enemies,
        &mut state.effects,
        &mut state.misc_rng,
        dt,
    );
    state.add_shake(impact);
    let impact = update_effects(&mut state.effects, &mut state.enemies, state.player.pos, dt);
    state.add_shake(impact);

    // -- auto-fire ---------------------------------------------------------
    if let Some(target) = nearest_enemy(state.player.pos, &state.enemies, AUTOFIRE_RANGE) {
        if state.player.try_fire() {
            let dir = dir_toward(state.player.pos, state.enemies[target].pos);
            // base damage x honing stone x character might
            let mut damage = profile.damage * mods.damage;
            if state.character == CharacterId::Shadow && state.misc_rng.next_f32() < 0.2 {
                damage *= 3.0;
                state.add_shake(0.5);
            }
            let speed_mult = if state.character == CharacterId::Void {
                1.3
            } else {
                1.0
            };
            state.bullets.push(Bullet {
                pos: state.player.pos,
                vel: dir * BULLET_SPEED * speed_mult * mods.projectile_speed,
                damage,
                lifetime: BULLET_LIFETIME,
            });
        }
    }

    // -- spawning ----------------------------------------------------------
    if state.game_time < SPAWN_CUTOFF {
        let hp_mult = 1.0 + (state.game_time / 60.0).floor() * WAVE_HP_STEP;
        let batch: Vec<Spawn> = state.scheduler.advance(state.game_time);
        for spawn in batch {
            let id = state.next_enemy_id();
            let mut enemy = Enemy::new(id, state.player.pos + spawn.offset, spawn.kind, spawn.elite);
            enemy.hp *= hp_mult;
            enemy.max_hp = enemy.hp;
            state.enemies.push(enemy);
        }
    } else if !state.boss_spawned && state.enemies.is_empty() {
        let id = state.next_enemy_id();
        state
            .enemies
            .push(Enemy::boss(id, state.player.pos + Vec2::new(0.0, -500.0)));
        state.boss_spawned = true;
        log::info!("boss spawned at t={:.0}s", state.game_time);
    }

    // -- enemies: contact damage first, on pre-move positions --------------
    let armor = state.passive_modifier(PassiveId::DragonArmor, 0.12);
    let is_tank = state.character == CharacterId::Tank;
    let player_pos = state.player.pos;
    let mut contact_damage = 0.0;
    for enemy in state.enemies.iter_mut() {
        if dist_sq(enemy.pos, player_pos) <= CONTACT_RANGE * CONTACT_RANGE {
            contact_damage += CONTACT_DPS * dt;
            if is_tank {
                enemy.hp -= THORNS_DPS * dt;
                enemy.apply_knockback(dir_toward(player_pos, enemy.pos), 2.0);
            }
        }
    }
    if contact_damage > 0.0 {
        state.player.hp -= contact_damage / armor;
        state.add_shake(0.1);
    }
    update_enemies(&mut state.enemies, player_pos, dt);

    // -- deaths ------------------------------------------------------------
    // Bullet hits land after this pass, so a bullet kill lingers one tick.
    let luck = state.passive_modifier(PassiveId::RabbitFoot, 0.25);
    let mut i = state.enemies.len();
    while i > 0 {
        i -= 1;
        if state.enemies[i].hp > 0.0 {
            continue;
        }
        let enemy = state.enemies.remove(i);

        if enemy.kind == EnemyKind::Explosive
            && dist_sq(enemy.pos, state.player.pos) <= EXPLOSION_RANGE * EXPLOSION_RANGE
        {
            state.player.hp -= EXPLOSION_DAMAGE / armor;
            state.add_shake(0.6);
        }
        if enemy.kind == EnemyKind::Splitter && enemy.scale > SPLIT_MIN_SCALE {
            for _ in 0..2 {
                let offset = Vec2::new(
                    (state.misc_rng.next_f32() - 0.5) * 20.0,
                    (state.misc_rng.next_f32() - 0.5) * 20.0,
                );
                let id = state.next_enemy_id();
                state
                    .enemies
                    .push(Enemy::split_child(id, enemy.pos + offset));
            }
        }

        state.effects.push(Effect::new(enemy.pos, 0.5, EffectKind::Burst));
        state.add_shake(0.3);
        state.kills += 1;
        state.gems.push(XpGem {
            pos: enemy.pos,
            value: GEM_XP,
        });

        if state.misc_rng.next_f32() < PICKUP_DROP_CHANCE * luck {
            let roll = state.misc_rng.next_f32();
            let kind = if roll < 1.0 / 3.0 {
                PickupKind::Health
            } else if roll < 2.0 / 3.0 {
                PickupKind::Magnet
            } else {
                PickupKind::Nuke
            };
            state.pickups.push(Pickup {
                pos: enemy.pos,
                kind,
            });
        }

        if enemy.boss {
            log::info!("boss defeated at t={:.0}s", state.game_time);
            state.phase = Phase::GameOver;
            state.events.push(GameEvent::GameOver);
        }
    }

    // -- bullets -----------------------------------------------------------
    let mut b = state.bullets.len();
    while b > 0 {
        b -= 1;
        let bullet = &mut state.bullets[b];
        bullet.update(dt);
        if bullet.lifetime <= 0.0 {
            state.bullets.remove(b);
            continue;
        }
        let bpos = bullet.pos;
        let bdir = bullet.vel.normalize_or_zero();
        let bdamage = bullet.damage;
        let mut consumed = false;
        for enemy in state.enemies.iter_mut() {
            if dist_sq(enemy.pos, bpos) <= BULLET_HIT_RANGE * BULLET_HIT_RANGE {
                enemy.hp -= bdamage;
                enemy.apply_knockback(bdir, 5.0);
                state.effects.push(Effect::new(
                    enemy.pos,
                    0.6,
                    EffectKind::DamageNumber { value: bdamage },
                ));
                consumed = true;
                break;
            }
        }
        if consumed {
            state.bullets.remove(b);
            state.add_shake(0.1);
        }
    }

    // -- xp gems -----------------------------------------------------------
    let range = state.gem_pickup_range();
    let ppos = state.player.pos;
    let mut gained = 0.0;
    state.gems.retain(|gem| {
        if dist_sq(gem.pos, ppos) <= range * range {
            gained += gem.value;
            false
        } else {
            true
        }
    });
    if gained > 0.0 {
        state.gain_xp(gained);
    }

    // -- pickups -----------------------------------------------------------
    let mut p = state.pickups.len();
    while p > 0 {
        p -= 1;
        if dist_sq(state.pickups[p].pos, state.player.pos) > PICKUP_RANGE * PICKUP_RANGE {
            continue;
        }
        let pickup = state.pickups.remove(p);
        match pickup.kind {
            PickupKind::Health => {
                state.player.hp = (state.player.hp + HEALTH_RESTORE).min(state.player.max_hp);
            }
            PickupKind::Magnet => {
                // Yank every gem to the player; collected next tick
                for gem in state.gems.iter_mut() {
                    gem.pos = state.player.pos;
                }
            }
            PickupKind::Nuke => {
                for enemy in state.enemies.iter_mut() {
                    enemy.hp -= NUKE_DAMAGE;
                    enemy.flash = 0.1;
                }
                state.add_shake(2.0);
            }
        }
    }

    // -- terminal ----------------------------------------------------------
    if state.player.hp <= 0.0 && state.phase == Phase::Running {
        state.player.hp = 0.0;
        state.phase = Phase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "game over at t={:.0}s, level {}, {} kills",
            state.game_time,
            state.progression.level,
            state.kills
        );
    }
}
