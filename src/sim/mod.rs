//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep driven from outside
//! - Seeded RNG only
//! - Stable iteration order, removal only at designated pruning points
//! - No rendering or platform dependencies

pub mod ability;
pub mod catalog;
pub mod effects;
pub mod enemy;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ability::{AbilityEngine, Modifiers};
pub use catalog::{ActiveId, CharacterId, CharacterProfile, Evolution, PassiveId, MAX_LEVEL, MAX_SLOTS};
pub use effects::{Effect, EffectKind};
pub use enemy::{nearest_enemy, update_enemies};
pub use rng::RandomSequence;
pub use spawn::{Spawn, SpawnScheduler};
pub use state::{
    ActiveAbility, Bullet, Enemy, EnemyKind, EnemyMode, GameEvent, Inventory, PassiveAbility,
    Phase, Pickup, PickupKind, Player, Progression, SimState, UpgradeChoice, XpGem,
};
pub use tick::{TickInput, tick};
