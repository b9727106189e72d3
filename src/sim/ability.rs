//! Ability engine
//!
//! Walks the owned actives each tick in inventory order, counts down
//! cooldowns, and emits effects. Targeted abilities hold their cooldown
//! until a target is actually in range; evolved forms that run as
//! continuous fields bypass the cooldown clock entirely.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{ActiveId, PassiveId};
use super::effects::{Effect, EffectKind};
use super::enemy::nearest_enemy;
use super::rng::RandomSequence;
use super::state::{ActiveAbility, Enemy, Inventory, SimState};
use crate::{dir_toward, dist_sq};

/// Distance walked between earthquake shockwaves
const QUAKE_STEP: f32 = 150.0;
/// Distance walked between lava trail patches (evolved earthquake)
const TRAIL_STEP: f32 = 30.0;

/// Aggregated passive modifiers, recomputed once per tick
#[derive(Debug, Clone, Copy)]
pub struct Modifiers {
    /// Cooldown divisor (bigger is faster)
    pub cooldown: f32,
    /// Extra projectiles per volley
    pub amount: usize,
    /// Radius multiplier, character area stat included
    pub area: f32,
    /// Ability damage multiplier, character might included
    pub damage: f32,
    /// Thrown/launched projectile speed multiplier
    pub projectile_speed: f32,
}

impl Modifiers {
    pub fn compute(state: &SimState) -> Self {
        let profile = state.character.profile();
        let amount =
            (state.passive_modifier(PassiveId::SpareMag, 1.2) - 0.8).floor().max(0.0) as usize;
        Self {
            cooldown: state.passive_modifier(PassiveId::Chronometer, 0.15),
            amount,
            area: state.passive_modifier(PassiveId::Magnifier, 0.2) * profile.area,
            damage: state.passive_modifier(PassiveId::HoningStone, 0.2) * profile.might,
            projectile_speed: state.passive_modifier(PassiveId::MercuryMix, 0.1),
        }
    }
}

/// Per-run ability state: cooldown clocks plus the odd bits of persistent
/// state some abilities carry (kill counter, trail anchor, bee positions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityEngine {
    cooldowns: HashMap<ActiveId, f32>,
    /// Distance walked since the last shockwave
    step_travel: f32,
    last_pos: Option<Vec2>,
    /// Last lava patch position (evolved earthquake)
    last_trail_pos: Option<Vec2>,
    /// Permanent damage earned by evolved claw kills
    claw_bonus: f32,
    /// Smoothed positions of the evolved drone swarm
    swarm_bees: Vec<Vec2>,
}

impl AbilityEngine {
    /// Run every owned ability for one tick. Returns the strongest impact
    /// intensity produced.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        inventory: &Inventory,
        mods: &Modifiers,
        player_pos: Vec2,
        game_time: f32,
        enemies: &mut [Enemy],
        effects: &mut Vec<Effect>,
        rng: &mut RandomSequence,
        dt: f32,
    ) -> f32 {
        let mut impact: f32 = 0.0;

        if let Some(last) = self.last_pos {
            self.step_travel += (player_pos - last).length();
        }
        self.last_pos = Some(player_pos);

        for active in &inventory.active {
            // Discrete triggers follow the level curve; continuous evolved
            // fields take a flat doubling instead.
            let level_mult = 1.0 + f32::from(active.level - 1) * 0.25;
            let damage_mult = level_mult * mods.damage;
            let flat_mult = 2.0 * mods.damage;

            if active.evolved {
                match active.id {
                    ActiveId::RunicCircle => {
                        self.infinity_ring(player_pos, mods, flat_mult, enemies, dt);
                        continue;
                    }
                    ActiveId::DroneBees => {
                        self.hive_swarm(player_pos, game_time, flat_mult, enemies, dt);
                        continue;
                    }
                    ActiveId::BoneChain => {
                        self.hell_shackles(player_pos, game_time, mods, flat_mult, enemies, dt);
                        continue;
                    }
                    ActiveId::Earthquake => {
                        // Lava trail replaces the shockwave outright
                        let moved = self
                            .last_trail_pos
                            .is_none_or(|p| dist_sq(p, player_pos) > TRAIL_STEP * TRAIL_STEP);
                        if moved {
                            self.last_trail_pos = Some(player_pos);
                            effects.push(Effect::new(
                                player_pos,
                                3.0,
                                EffectKind::Lava {
                                    radius: 45.0 * mods.area,
                                    dps: 10.0 * flat_mult,
                                },
                            ));
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            if active.id == ActiveId::Earthquake {
                if self.step_travel > QUAKE_STEP {
                    self.step_travel = 0.0;
                    effects.push(Effect::new(
                        player_pos,
                        10.0,
                        EffectKind::QuakeRing {
                            radius: 0.0,
                            max_radius: 280.0 * mods.area,
                            dps: 15.0 * damage_mult,
                        },
                    ));
                    impact = impact.max(0.4);
                }
                continue;
            }

            {
                let timer = self.cooldowns.entry(active.id).or_insert(0.0);
                if *timer > 0.0 {
                    *timer -= dt;
                    continue;
                }
            }

            let fired =
                self.trigger(active, mods, damage_mult, player_pos, enemies, effects, rng);
            if let Some(kick) = fired {
                impact = impact.max(kick);
                let base = if active.evolved {
                    active.id.evolved_cooldown()
                } else {
                    active.id.base_cooldown()
                };
                self.cooldowns.insert(active.id, base / mods.cooldown);
            }
        }

        impact
    }

    /// Fire one cooldown-gated ability. `None` means no valid target was in
    /// range and the cooldown must not be consumed.
    fn trigger(
        &mut self,
        active: &ActiveAbility,
        mods: &Modifiers,
        damage_mult: f32,
        player_pos: Vec2,
        enemies: &mut [Enemy],
        effects: &mut Vec<Effect>,
        rng: &mut RandomSequence,
    ) -> Option<f32> {
        match active.id {
            ActiveId::ShadowClaw => {
                let (range, hit_dist, arc) = if active.evolved {
                    (300.0 * mods.area, 180.0 * mods.area, 1.5f32)
                } else {
                    (180.0 * mods.area, 100.0 * mods.area, 0.6f32)
                };
                let target = nearest_enemy(player_pos, enemies, range)?;
                let dir = dir_toward(player_pos, enemies[target].pos);
                let base = if active.evolved { 60.0 } else { 30.0 };
                let damage = (base + self.claw_bonus) * damage_mult;
                let cos_arc = arc.cos();
                for enemy in enemies.iter_mut() {
                    let to_enemy = enemy.pos - player_pos;
                    if to_enemy.length_squared() > hit_dist * hit_dist {
                        continue;
                    }
                    if to_enemy.normalize_or_zero().dot(dir) < cos_arc {
                        continue;
                    }
                    let was_alive = enemy.hp > 0.0;
                    enemy.hp -= damage;
                    enemy.apply_knockback(dir, if active.evolved { 15.0 } else { 8.0 });
                    if active.evolved && was_alive && enemy.hp <= 0.0 {
                        self.claw_bonus += 0.2;
                    }
                }
                effects.push(Effect::new(player_pos, 0.12, EffectKind::Slash { dir }));
                Some(0.2)
            }

            ActiveId::RunicCircle => {
                effects.push(Effect::new(
                    player_pos,
                    1.8,
                    EffectKind::RunicPulse {
                        age: 0.0,
                        duration: 1.8,
                        max_radius: 180.0 * mods.area,
                        dps: 25.0 * damage_mult,
                        knockback: 1.5,
                    },
                ));
                Some(0.0)
            }

            ActiveId::ToxicBottle => {
                let target = nearest_enemy(player_pos, enemies, 500.0)?;
                let (cloud_radius, cloud_dps, cloud_life) = if active.evolved {
                    (160.0 * mods.area, 6.0 * damage_mult, 6.0)
                } else {
                    (90.0 * mods.area, 2.0 * damage_mult, 4.0)
                };
                effects.push(Effect::new(
                    player_pos,
                    0.5,
                    EffectKind::Bottle {
                        target: enemies[target].pos,
                        cloud_radius,
                        cloud_dps,
                        cloud_life,
                        evolved: active.evolved,
                    },
                ));
                Some(0.0)
            }

            ActiveId::SpectralSwords => {
                let damage = 50.0 * damage_mult;
                if active.evolved {
                    // Radial graveyard burst, no target needed
                    let count = 8 + 2 * mods.amount;
                    for i in 0..count {
                        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
                        effects.push(Effect::new(
                            player_pos,
                            2.0,
                            EffectKind::SpectralSword {
                                dir: Vec2::from_angle(angle),
                                origin: player_pos,
                                damage,
                                ricochets: 1,
                                delay: 0.0,
                                ignore: None,
                            },
                        ));
                    }
                } else {
                    let target = nearest_enemy(player_pos, enemies, 550.0)?;
                    let dir = dir_toward(player_pos, enemies[target].pos);
                    for i in 0..=mods.amount {
                        effects.push(Effect::new(
                            player_pos,
                            2.0,
                            EffectKind::SpectralSword {
                                dir,
                                origin: player_pos,
                                damage,
                                ricochets: 0,
                                delay: i as f32 * 0.1,
                                ignore: None,
                            },
                        ));
                    }
                }
                Some(0.1)
            }

            // Step-gated, handled before the cooldown clock
            ActiveId::Earthquake => None,

            ActiveId::SolarBeam => {
                let target = nearest_enemy(player_pos, enemies, 700.0)?;
                let (radius, dps, knockback) = if active.evolved {
                    (110.0 * mods.area, 150.0 * damage_mult, 20.0)
                } else {
                    (70.0 * mods.area, 80.0 * damage_mult, 10.0)
                };
                let beam = |anchor| {
                    Effect::new(
                        anchor,
                        1.0,
                        EffectKind::SolarBeam {
                            age: 0.0,
                            radius,
                            dps,
                            knockback,
                        },
                    )
                };
                if active.evolved {
                    // Three columns scattered around the player, each snapping
                    // to whatever enemy is nearest its scatter point
                    for _ in 0..3 {
                        let scatter = player_pos
                            + Vec2::new(
                                (rng.next_f32() - 0.5) * 600.0,
                                (rng.next_f32() - 0.5) * 600.0,
                            );
                        let anchor = nearest_enemy(scatter, enemies, 700.0)
                            .map_or(scatter, |t| enemies[t].pos);
                        effects.push(beam(anchor));
                    }
                } else {
                    effects.push(beam(enemies[target].pos));
                }
                Some(0.0)
            }

            ActiveId::BoomerangAxe => {
                let target = nearest_enemy(player_pos, enemies, 500.0)?;
                let dir = dir_toward(player_pos, enemies[target].pos);
                let radius = if active.evolved { 60.0 } else { 40.0 } * mods.area;
                let dps = if active.evolved { 40.0 } else { 25.0 };
                effects.push(Effect::new(
                    player_pos,
                    if active.evolved { 4.0 } else { 1.1 },
                    EffectKind::BoomerangAxe {
                        dir,
                        age: 0.0,
                        radius,
                        dps: dps * damage_mult,
                        evolved: active.evolved,
                    },
                ));
                Some(0.1)
            }

            ActiveId::BoneChain => {
                effects.push(Effect::new(
                    player_pos,
                    1.0,
                    EffectKind::BoneSweep {
                        age: 0.0,
                        radius: 150.0 * mods.area,
                        dps: 30.0 * damage_mult,
                    },
                ));
                Some(0.1)
            }

            ActiveId::ChaosOrb => {
                let sign_x = if rng.next_f32() < 0.5 { -1.0 } else { 1.0 };
                let sign_y = if rng.next_f32() < 0.5 { -1.0 } else { 1.0 };
                let speed = 300.0 * mods.projectile_speed;
                effects.push(Effect::new(
                    player_pos,
                    3.0,
                    EffectKind::ChaosOrb {
                        vel: Vec2::new(sign_x * speed, sign_y * speed),
                        radius: 30.0 * mods.area,
                        dps: 40.0 * damage_mult,
                        evolved: active.evolved,
                    },
                ));
                Some(0.0)
            }

            ActiveId::DroneBees => {
                let target = nearest_enemy(player_pos, enemies, 300.0)?;
                effects.push(Effect::new(
                    player_pos,
                    10.0,
                    EffectKind::DroneBee {
                        target_id: enemies[target].id,
                        damage: 20.0 * damage_mult,
                    },
                ));
                Some(0.0)
            }
        }
    }

    /// Evolved runic circle: a standing field that burns and slows
    fn infinity_ring(
        &mut self,
        player_pos: Vec2,
        mods: &Modifiers,
        damage_mult: f32,
        enemies: &mut [Enemy],
        dt: f32,
    ) {
        let fr = dt * 60.0;
        let radius = 220.0 * mods.area;
        for enemy in enemies.iter_mut() {
            if dist_sq(enemy.pos, player_pos) > radius * radius {
                continue;
            }
            enemy.hp -= 40.0 * damage_mult / 60.0 * fr;
            // Push back by half the enemy's own speed: an effective slow
            let outward = dir_toward(player_pos, enemy.pos);
            enemy.pos += outward * enemy.speed * 0.5 * dt;
            enemy.apply_knockback(outward, 0.4);
        }
    }

    /// Evolved drone bees: five smoothed bees that chase anything close
    fn hive_swarm(
        &mut self,
        player_pos: Vec2,
        game_time: f32,
        damage_mult: f32,
        enemies: &mut [Enemy],
        dt: f32,
    ) {
        let fr = dt * 60.0;
        if self.swarm_bees.len() != 5 {
            self.swarm_bees = vec![player_pos; 5];
        }
        for (i, bee) in self.swarm_bees.iter_mut().enumerate() {
            let angle = game_time * 2.0 + i as f32 / 5.0 * std::f32::consts::TAU;
            let mut desired = player_pos + Vec2::from_angle(angle) * 80.0;
            if let Some(t) = nearest_enemy(*bee, enemies, 150.0) {
                desired = enemies[t].pos;
            }
            *bee = bee.lerp(desired, (0.1 * fr).min(1.0));
            for enemy in enemies.iter_mut() {
                if dist_sq(enemy.pos, *bee) <= 40.0 * 40.0 {
                    enemy.hp -= 5.0 * damage_mult / 60.0 * fr;
                }
            }
        }
    }

    /// Evolved bone chain: three flails orbiting the player
    fn hell_shackles(
        &mut self,
        player_pos: Vec2,
        game_time: f32,
        mods: &Modifiers,
        damage_mult: f32,
        enemies: &mut [Enemy],
        dt: f32,
    ) {
        let fr = dt * 60.0;
        let orbit = 120.0 * mods.area;
        for i in 0..3 {
            let angle = game_time * 4.0 + i as f32 / 3.0 * std::f32::consts::TAU;
            let flail = player_pos + Vec2::from_angle(angle) * orbit;
            for enemy in enemies.iter_mut() {
                if dist_sq(enemy.pos, flail) <= 30.0 * 30.0 {
                    enemy.hp -= 20.0 * damage_mult / 60.0 * fr;
                    enemy.apply_knockback(dir_toward(player_pos, enemy.pos), 2.0);
                }
            }
        }
    }

    /// Remaining cooldown for an ability, zero when ready
    pub fn cooldown(&self, id: ActiveId) -> f32 {
        self.cooldowns.get(&id).copied().unwrap_or(0.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::CharacterId;
    use crate::sim::state::EnemyKind;

    fn mods() -> Modifiers {
        Modifiers {
            cooldown: 1.0,
            amount: 0,
            area: 1.0,
            damage: 1.0,
            projectile_speed: 1.0,
        }
    }

    fn inventory_with(id: ActiveId, level: u8, evolved: bool) -> Inventory {
        Inventory {
            active: vec![ActiveAbility { id, level, evolved }],
            passive: Vec::new(),
        }
    }

    fn run_engine(
        engine: &mut AbilityEngine,
        inventory: &Inventory,
        enemies: &mut [Enemy],
        effects: &mut Vec<Effect>,
        ticks: usize,
    ) {
        let mut rng = RandomSequence::new("engine-test");
        let dt = 1.0 / 60.0;
        for i in 0..ticks {
            engine.update(
                inventory,
                &mods(),
                Vec2::ZERO,
                i as f32 * dt,
                enemies,
                effects,
                &mut rng,
                dt,
            );
        }
    }

    #[test]
    fn claw_damages_in_range_and_respects_cooldown() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::ShadowClaw, 1, false);
        let mut enemies = vec![Enemy::new(1, Vec2::new(50.0, 0.0), EnemyKind::Basic, false)];
        enemies[0].hp = 1000.0;
        let mut effects = Vec::new();

        // One strike over 0.8s of ticks, not one per tick
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 40);
        assert_eq!(enemies[0].hp, 970.0);
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 20);
        assert_eq!(enemies[0].hp, 940.0);
    }

    #[test]
    fn targeted_ability_holds_cooldown_without_target() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::SpectralSwords, 1, false);
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 300);
        assert!(effects.is_empty());

        // The instant a target appears, the volley launches
        let mut enemies = vec![Enemy::new(1, Vec2::new(100.0, 0.0), EnemyKind::Basic, false)];
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn level_scales_ability_damage() {
        for (level, expected) in [(1u8, 30.0f32), (3, 45.0), (5, 60.0)] {
            let mut engine = AbilityEngine::default();
            let inventory = inventory_with(ActiveId::ShadowClaw, level, false);
            let mut enemies = vec![Enemy::new(1, Vec2::new(50.0, 0.0), EnemyKind::Basic, false)];
            enemies[0].hp = 1000.0;
            let mut effects = Vec::new();
            run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
            assert!((1000.0 - enemies[0].hp - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn spare_mag_adds_swords_to_the_volley() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::SpectralSwords, 1, false);
        let mut enemies = vec![Enemy::new(1, Vec2::new(400.0, 0.0), EnemyKind::Basic, false)];
        let mut effects = Vec::new();
        let mut rng = RandomSequence::new("mag");
        let mut m = mods();
        m.amount = 2;
        engine.update(
            &inventory,
            &m,
            Vec2::ZERO,
            0.0,
            &mut enemies,
            &mut effects,
            &mut rng,
            1.0 / 60.0,
        );
        assert_eq!(effects.len(), 3);
    }

    #[test]
    fn earthquake_fires_from_distance_walked() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::Earthquake, 1, false);
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut effects = Vec::new();
        let mut rng = RandomSequence::new("quake");

        // Stationary: nothing, regardless of elapsed time
        for _ in 0..600 {
            engine.update(
                &inventory,
                &mods(),
                Vec2::ZERO,
                0.0,
                &mut enemies,
                &mut effects,
                &mut rng,
                1.0 / 60.0,
            );
        }
        assert!(effects.is_empty());

        // Walk 160 units over two frames
        engine.update(
            &inventory,
            &mods(),
            Vec2::new(160.0, 0.0),
            0.0,
            &mut enemies,
            &mut effects,
            &mut rng,
            1.0 / 60.0,
        );
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0].kind, EffectKind::QuakeRing { .. }));
    }

    #[test]
    fn evolved_graveyard_bursts_radially_without_target() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::SpectralSwords, 5, true);
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
        let swords = effects
            .iter()
            .filter(|e| matches!(e.kind, EffectKind::SpectralSword { .. }))
            .count();
        assert_eq!(swords, 8);
    }

    #[test]
    fn evolved_sword_damage_follows_level_curve_only() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::SpectralSwords, 5, true);
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
        let EffectKind::SpectralSword { damage, .. } = &effects[0].kind else {
            panic!("expected a sword");
        };
        // 50 base through the maxed level curve, nothing stacked on top
        assert!((*damage - 100.0).abs() < 1e-3);
    }

    #[test]
    fn evolved_earthquake_trades_shockwaves_for_lava() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::Earthquake, 1, true);
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut effects = Vec::new();
        let mut rng = RandomSequence::new("lava");
        for step in 0..5 {
            engine.update(
                &inventory,
                &mods(),
                Vec2::new(step as f32 * 50.0, 0.0),
                0.0,
                &mut enemies,
                &mut effects,
                &mut rng,
                1.0 / 60.0,
            );
        }
        assert!(effects.iter().any(|e| matches!(e.kind, EffectKind::Lava { .. })));
        assert!(!effects.iter().any(|e| matches!(e.kind, EffectKind::QuakeRing { .. })));
    }

    #[test]
    fn evolved_beam_snaps_each_column_to_a_target() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::SolarBeam, 1, true);
        let mut enemies = vec![Enemy::new(1, Vec2::new(100.0, 0.0), EnemyKind::Basic, false)];
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
        let beams: Vec<&Effect> = effects
            .iter()
            .filter(|e| matches!(e.kind, EffectKind::SolarBeam { .. }))
            .collect();
        assert_eq!(beams.len(), 3);
        // The lone enemy is within reach of any scatter point
        assert!(beams.iter().all(|b| b.pos == Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn continuous_fields_ignore_the_level_curve() {
        let mut burned = [0.0f32; 2];
        for (slot, level) in [(0usize, 1u8), (1, 5)] {
            let mut engine = AbilityEngine::default();
            let inventory = inventory_with(ActiveId::RunicCircle, level, true);
            let mut enemies = vec![Enemy::new(1, Vec2::new(100.0, 0.0), EnemyKind::Basic, false)];
            enemies[0].hp = 1000.0;
            let mut effects = Vec::new();
            run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 30);
            burned[slot] = 1000.0 - enemies[0].hp;
        }
        assert!(burned[0] > 0.0);
        assert!((burned[0] - burned[1]).abs() < 1e-3);
    }

    #[test]
    fn hell_shackles_grind_at_orbit_range() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::BoneChain, 1, true);
        let mut enemies = vec![Enemy::new(1, Vec2::new(120.0, 0.0), EnemyKind::Basic, false)];
        enemies[0].hp = 1000.0;
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
        assert!(enemies[0].hp < 1000.0);
        // Orbiting flails emit no one-shot effects
        assert!(effects.is_empty());
    }

    #[test]
    fn infinity_ring_burns_continuously() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::RunicCircle, 5, true);
        let mut enemies = vec![Enemy::new(1, Vec2::new(100.0, 0.0), EnemyKind::Basic, false)];
        enemies[0].hp = 1000.0;
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 60);
        assert!(enemies[0].hp < 1000.0);
        // Continuous form leaves no pulse effects behind
        assert!(effects.is_empty());
    }

    #[test]
    fn evolved_claw_kills_grow_its_damage() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::ShadowClaw, 1, true);
        let mut enemies = vec![Enemy::new(1, Vec2::new(50.0, 0.0), EnemyKind::Basic, false)];
        enemies[0].hp = 1.0;
        let mut effects = Vec::new();
        run_engine(&mut engine, &inventory, &mut enemies, &mut effects, 1);
        assert!(enemies[0].hp <= 0.0);
        assert!((engine.claw_bonus - 0.2).abs() < 1e-6);
    }

    #[test]
    fn chronometer_shortens_cooldowns() {
        let mut engine = AbilityEngine::default();
        let inventory = inventory_with(ActiveId::BoneChain, 1, false);
        let mut enemies: Vec<Enemy> = Vec::new();
        let mut effects = Vec::new();
        let mut rng = RandomSequence::new("cd");
        let mut m = mods();
        m.cooldown = 1.5;
        engine.update(
            &inventory,
            &m,
            Vec2::ZERO,
            0.0,
            &mut enemies,
            &mut effects,
            &mut rng,
            1.0 / 60.0,
        );
        assert!((engine.cooldown(ActiveId::BoneChain) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn modifiers_fold_in_character_stats() {
        let state = SimState::new(CharacterId::Mage, "mods");
        let m = Modifiers::compute(&state);
        assert!((m.area - 1.5).abs() < 1e-3);
        assert!((m.damage - 1.3).abs() < 1e-3);
        assert_eq!(m.amount, 0);
    }
}
