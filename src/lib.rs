//! Nightswarm - a survival-combat horde simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, abilities, game state)
//!
//! Rendering, input translation, and lobby management are external
//! collaborators: the core consumes a per-tick movement vector and emits
//! entity state plus discrete events (level-up, game-over).

pub mod sim;

pub use sim::{SimState, TickInput, tick};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Enemies deal contact damage inside this distance
    pub const CONTACT_RANGE: f32 = 25.0;
    /// Contact damage per second
    pub const CONTACT_DPS: f32 = 20.0;
    /// Thorn damage per second reflected by the tank trait
    pub const THORNS_DPS: f32 = 30.0;

    /// Auto-fire targeting range
    pub const AUTOFIRE_RANGE: f32 = 500.0;
    /// Bullet travel speed (units/sec)
    pub const BULLET_SPEED: f32 = 600.0;
    /// Bullet lifetime in seconds
    pub const BULLET_LIFETIME: f32 = 2.0;
    /// Bullet-vs-enemy hit distance
    pub const BULLET_HIT_RANGE: f32 = 20.0;
    /// Fire cooldown never drops below this
    pub const MIN_FIRE_COOLDOWN: f32 = 0.05;

    /// XP granted per gem
    pub const GEM_XP: f32 = 30.0;
    /// Extra gem pickup range granted by the magnet glove passive
    pub const MAGNET_GLOVE_BONUS: f32 = 100.0;
    /// World pickup collection distance
    pub const PICKUP_RANGE: f32 = 30.0;
    /// Chance of a pickup dropping on enemy death
    pub const PICKUP_DROP_CHANCE: f32 = 0.03;
    /// Health restored by a health pickup (capped at max)
    pub const HEALTH_RESTORE: f32 = 30.0;
    /// Flat damage dealt by a nuke pickup to every enemy
    pub const NUKE_DAMAGE: f32 = 200.0;

    /// Explosive enemies damage the player inside this radius on death
    pub const EXPLOSION_RANGE: f32 = 100.0;
    /// Flat damage from an explosive enemy's blast
    pub const EXPLOSION_DAMAGE: f32 = 10.0;

    /// Pairwise enemy separation kicks in below this distance
    pub const SEPARATION_RANGE: f32 = 30.0;
    /// Per-frame decay factor for accumulated knockback
    pub const KNOCKBACK_DECAY: f32 = 0.85;

    /// Ordinary spawning stops after this many seconds; the boss follows
    pub const SPAWN_CUTOFF: f32 = 600.0;
}

/// Squared distance between two points (cheap reject before sqrt)
#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Unit vector from `from` toward `to`, zero if coincident
#[inline]
pub fn dir_toward(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
