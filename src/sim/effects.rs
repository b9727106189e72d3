//! Timed ability effects
//!
//! Every projectile, zone and feedback marker an ability leaves behind is
//! one tagged `Effect` entity. Damage values and radii are resolved at
//! trigger time, so the update pass only applies them. Expired effects are
//! pruned at the end of each pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Enemy;
use crate::{dir_toward, dist_sq};

/// Sword despawn distance from its launch point
const SWORD_RANGE: f32 = 1000.0;
const SWORD_SPEED: f32 = 15.0;
const SWORD_HIT: f32 = 30.0;
/// How far a ricocheting sword may look for its next target
const SWORD_RETARGET: f32 = 450.0;

/// Behavior and payload of one effect entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectKind {
    /// Melee arc flash (cosmetic)
    Slash { dir: Vec2 },
    /// Lobbed bottle homing on its impact point; leaves a cloud on expiry
    Bottle {
        target: Vec2,
        cloud_radius: f32,
        cloud_dps: f32,
        cloud_life: f32,
        evolved: bool,
    },
    /// Lingering damage-over-time zone
    ToxicCloud {
        radius: f32,
        dps: f32,
        evolved: bool,
    },
    /// Straight-flying blade; hits once, may ricochet to a new target
    SpectralSword {
        dir: Vec2,
        origin: Vec2,
        damage: f32,
        ricochets: u8,
        delay: f32,
        ignore: Option<u32>,
    },
    /// Expanding shockwave damaging a thin band at its edge
    QuakeRing {
        radius: f32,
        max_radius: f32,
        dps: f32,
    },
    /// Sine-eased pulse ring around its anchor
    RunicPulse {
        age: f32,
        duration: f32,
        max_radius: f32,
        dps: f32,
        knockback: f32,
    },
    /// Telegraphed vertical strike with a short damage window
    SolarBeam {
        age: f32,
        radius: f32,
        dps: f32,
        knockback: f32,
    },
    /// Arcing throw anchored to the player; evolved form flies straight
    BoomerangAxe {
        dir: Vec2,
        age: f32,
        radius: f32,
        dps: f32,
        evolved: bool,
    },
    /// Short melee sweep around the player
    BoneSweep { age: f32, radius: f32, dps: f32 },
    /// Bouncing projectile confined to a box around the player
    ChaosOrb {
        vel: Vec2,
        radius: f32,
        dps: f32,
        evolved: bool,
    },
    /// Homing bee locked onto one enemy
    DroneBee { target_id: u32, damage: f32 },
    /// Floating damage readout (cosmetic)
    DamageNumber { value: f32 },
    /// Death burst (cosmetic)
    Burst,
    /// Heal twinkle left by evolved toxic kills (cosmetic)
    HealthOrb,
    /// Burning ground left by the evolved runic trail
    Lava { radius: f32, dps: f32 },
}

/// One transient effect entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub pos: Vec2,
    pub life: f32,
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(pos: Vec2, life: f32, kind: EffectKind) -> Self {
        Self { pos, life, kind }
    }
}

/// Advance every effect, apply zone/projectile damage, prune the expired.
/// Returns the strongest impact intensity produced this pass.
pub fn update_effects(
    effects: &mut Vec<Effect>,
    enemies: &mut [Enemy],
    player_pos: Vec2,
    dt: f32,
) -> f32 {
    let fr = dt * 60.0;
    let mut impact: f32 = 0.0;
    let mut spawned: Vec<Effect> = Vec::new();

    for effect in effects.iter_mut() {
        effect.life -= dt;
        match &mut effect.kind {
            EffectKind::Slash { .. }
            | EffectKind::Burst
            | EffectKind::HealthOrb => {}

            EffectKind::DamageNumber { .. } => {
                effect.pos.y -= 40.0 * dt;
            }

            EffectKind::Bottle {
                target,
                cloud_radius,
                cloud_dps,
                cloud_life,
                evolved,
            } => {
                effect.pos = effect.pos.lerp(*target, (0.15 * fr).min(1.0));
                if effect.life <= 0.0 {
                    spawned.push(Effect::new(
                        effect.pos,
                        *cloud_life,
                        EffectKind::ToxicCloud {
                            radius: *cloud_radius,
                            dps: *cloud_dps,
                            evolved: *evolved,
                        },
                    ));
                }
            }

            EffectKind::ToxicCloud {
                radius,
                dps,
                evolved,
            } => {
                for enemy in enemies.iter_mut() {
                    if dist_sq(enemy.pos, effect.pos) <= *radius * *radius {
                        let was_alive = enemy.hp > 0.0;
                        enemy.hp -= *dps * fr;
                        enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), 0.3);
                        if *evolved && was_alive && enemy.hp <= 0.0 {
                            spawned.push(Effect::new(enemy.pos, 1.0, EffectKind::HealthOrb));
                        }
                    }
                }
            }

            EffectKind::SpectralSword {
                dir,
                origin,
                damage,
                ricochets,
                delay,
                ignore,
            } => {
                if *delay > 0.0 {
                    *delay -= dt;
                    effect.life += dt; // lifetime starts after launch
                } else {
                    effect.pos += *dir * SWORD_SPEED * fr;
                    if dist_sq(effect.pos, *origin) > SWORD_RANGE * SWORD_RANGE {
                        effect.life = 0.0;
                    }
                    for enemy in enemies.iter_mut() {
                        if Some(enemy.id) == *ignore {
                            continue;
                        }
                        if dist_sq(enemy.pos, effect.pos) <= SWORD_HIT * SWORD_HIT {
                            enemy.hp -= *damage;
                            enemy.apply_knockback(*dir, 10.0);
                            spawned.push(Effect::new(
                                enemy.pos,
                                0.6,
                                EffectKind::DamageNumber { value: *damage },
                            ));
                            impact = impact.max(0.1);
                            if *ricochets > 0 {
                                *ricochets -= 1;
                                *ignore = Some(enemy.id);
                                *origin = effect.pos;
                                effect.life = effect.life.max(0.5);
                                // zero dir marks "retarget me" for the pass below
                                *dir = Vec2::ZERO;
                            } else {
                                effect.life = 0.0;
                            }
                            break;
                        }
                    }
                }
            }

            EffectKind::QuakeRing {
                radius,
                max_radius,
                dps,
            } => {
                *radius += 10.0 * fr;
                if *radius >= *max_radius {
                    effect.life = 0.0;
                }
                for enemy in enemies.iter_mut() {
                    let dist = (enemy.pos - effect.pos).length();
                    if (dist - *radius).abs() < 25.0 {
                        enemy.hp -= *dps * fr;
                        enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), 12.0);
                    }
                }
            }

            EffectKind::RunicPulse {
                age,
                duration,
                max_radius,
                dps,
                knockback,
            } => {
                *age += dt;
                let radius = (*age / *duration * std::f32::consts::PI).sin() * *max_radius;
                for enemy in enemies.iter_mut() {
                    let dist = (enemy.pos - effect.pos).length();
                    if (dist - radius).abs() < 25.0 {
                        enemy.hp -= *dps * dt;
                        enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), *knockback);
                    }
                }
            }

            EffectKind::SolarBeam {
                age,
                radius,
                dps,
                knockback,
            } => {
                *age += dt;
                // 0.5s telegraph, then a 0.4s burn window
                if *age >= 0.5 && *age < 0.9 {
                    for enemy in enemies.iter_mut() {
                        if dist_sq(enemy.pos, effect.pos) <= *radius * *radius {
                            enemy.hp -= *dps * fr;
                            enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), *knockback);
                        }
                    }
                    impact = impact.max(0.3);
                }
            }

            EffectKind::BoomerangAxe {
                dir,
                age,
                radius,
                dps,
                evolved,
            } => {
                *age += dt;
                if *evolved {
                    effect.pos += *dir * 10.0 * fr;
                    if dist_sq(effect.pos, player_pos) > 600.0 * 600.0 {
                        effect.life = 0.0;
                    }
                } else {
                    let reach = (*age * std::f32::consts::PI).sin() * 300.0;
                    effect.pos = player_pos + *dir * reach;
                    if *age >= 1.0 {
                        effect.life = 0.0;
                    }
                }
                for enemy in enemies.iter_mut() {
                    if dist_sq(enemy.pos, effect.pos) <= *radius * *radius {
                        enemy.hp -= *dps * fr;
                        enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), 3.0);
                    }
                }
            }

            EffectKind::BoneSweep { age, radius, dps } => {
                *age += dt * 3.0;
                effect.pos = player_pos;
                if *age >= 1.0 {
                    effect.life = 0.0;
                }
                for enemy in enemies.iter_mut() {
                    if dist_sq(enemy.pos, effect.pos) <= *radius * *radius {
                        enemy.hp -= *dps * fr;
                        enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), 5.0);
                    }
                }
            }

            EffectKind::ChaosOrb {
                vel,
                radius,
                dps,
                evolved,
            } => {
                effect.pos += *vel * dt;
                // Bounce inside a box tracking the player
                if (effect.pos.x - player_pos.x).abs() > 400.0 {
                    vel.x = -vel.x;
                }
                if (effect.pos.y - player_pos.y).abs() > 400.0 {
                    vel.y = -vel.y;
                }
                for enemy in enemies.iter_mut() {
                    if dist_sq(enemy.pos, effect.pos) <= *radius * *radius {
                        enemy.hp -= *dps * fr;
                        enemy.apply_knockback(*vel * 0.01, 2.0);
                        if *evolved {
                            spawned.push(Effect::new(
                                effect.pos,
                                1.0,
                                EffectKind::SpectralSword {
                                    dir: dir_toward(effect.pos, enemy.pos),
                                    origin: effect.pos,
                                    damage: *dps * 0.5,
                                    ricochets: 0,
                                    delay: 0.0,
                                    ignore: None,
                                },
                            ));
                        }
                    }
                }
            }

            EffectKind::DroneBee { target_id, damage } => {
                let Some(target) = enemies.iter_mut().find(|e| e.id == *target_id) else {
                    effect.life = 0.0;
                    continue;
                };
                let to_target = target.pos - effect.pos;
                effect.pos += to_target.normalize_or_zero() * 12.0 * fr;
                if dist_sq(effect.pos, target.pos) <= 10.0 * 10.0 {
                    target.hp -= *damage;
                    target.apply_knockback(to_target.normalize_or_zero(), 2.0);
                    spawned.push(Effect::new(
                        target.pos,
                        0.6,
                        EffectKind::DamageNumber { value: *damage },
                    ));
                    effect.life = 0.0;
                }
            }

            EffectKind::Lava { radius, dps } => {
                for enemy in enemies.iter_mut() {
                    if dist_sq(enemy.pos, effect.pos) <= *radius * *radius {
                        enemy.hp -= *dps * fr;
                        enemy.apply_knockback(dir_toward(effect.pos, enemy.pos), 0.4);
                    }
                }
            }
        }
    }

    // Ricocheting swords pick their next target once all enemy borrows end;
    // the struck enemy is excluded so the blade always travels somewhere new.
    for effect in effects.iter_mut() {
        if let EffectKind::SpectralSword { dir, ignore, .. } = &mut effect.kind {
            if *dir == Vec2::ZERO {
                let mut best: Option<(f32, Vec2)> = None;
                for enemy in enemies.iter() {
                    if Some(enemy.id) == *ignore {
                        continue;
                    }
                    let d_sq = dist_sq(effect.pos, enemy.pos);
                    if d_sq <= SWORD_RETARGET * SWORD_RETARGET && best.is_none_or(|(b, _)| d_sq < b) {
                        best = Some((d_sq, enemy.pos));
                    }
                }
                match best {
                    Some((_, target)) => *dir = dir_toward(effect.pos, target),
                    None => effect.life = 0.0,
                }
            }
        }
    }

    effects.extend(spawned);
    effects.retain(|e| e.life > 0.0);
    impact
}
