//! Static reference data: characters, abilities, evolutions
//!
//! Immutable catalog tables looked up by id. Owned ability instances carry
//! only id/level/evolved state; everything else lives here.

use serde::{Deserialize, Serialize};

/// Ability level cap
pub const MAX_LEVEL: u8 = 5;
/// Slots per inventory category (active and passive each)
pub const MAX_SLOTS: usize = 5;

/// Playable character roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterId {
    Gunner,
    Tank,
    Mage,
    Shadow,
    Collector,
    Void,
}

/// Per-character base stats, read-only
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: &'static str,
    pub hp: f32,
    pub speed: f32,
    /// Seconds between auto-fire shots at level 1
    pub fire_rate: f32,
    pub damage: f32,
    /// Global damage multiplier
    pub might: f32,
    /// Global effect-size multiplier
    pub area: f32,
    pub pickup_range: f32,
    pub trait_name: &'static str,
    pub trait_desc: &'static str,
    pub starting_ability: Option<ActiveId>,
}

impl CharacterId {
    pub const ALL: [CharacterId; 6] = [
        CharacterId::Gunner,
        CharacterId::Tank,
        CharacterId::Mage,
        CharacterId::Shadow,
        CharacterId::Collector,
        CharacterId::Void,
    ];

    /// Parse an external character id; unknown ids fall back to the default
    /// profile rather than failing.
    pub fn parse(id: &str) -> CharacterId {
        match id {
            "tank" => CharacterId::Tank,
            "mage" => CharacterId::Mage,
            "shadow" => CharacterId::Shadow,
            "collector" => CharacterId::Collector,
            "void" => CharacterId::Void,
            _ => CharacterId::Gunner,
        }
    }

    pub fn profile(self) -> CharacterProfile {
        match self {
            CharacterId::Gunner => CharacterProfile {
                name: "Sharpshooter",
                hp: 100.0,
                speed: 250.0,
                fire_rate: 0.35,
                damage: 8.0,
                might: 1.0,
                area: 1.0,
                pickup_range: 60.0,
                trait_name: "Rapid Fire",
                trait_desc: "Fire rate improves with every level.",
                starting_ability: Some(ActiveId::SpectralSwords),
            },
            CharacterId::Tank => CharacterProfile {
                name: "Armored Knight",
                hp: 250.0,
                speed: 180.0,
                fire_rate: 0.7,
                damage: 12.0,
                might: 1.2,
                area: 1.1,
                pickup_range: 50.0,
                trait_name: "Thorned Armor",
                trait_desc: "Enemies in contact take damage back.",
                starting_ability: Some(ActiveId::BoneChain),
            },
            CharacterId::Mage => CharacterProfile {
                name: "Sky Mage",
                hp: 80.0,
                speed: 220.0,
                fire_rate: 0.6,
                damage: 15.0,
                might: 1.3,
                area: 1.5,
                pickup_range: 70.0,
                trait_name: "Area Dominance",
                trait_desc: "All effect areas are 20% larger.",
                starting_ability: Some(ActiveId::SolarBeam),
            },
            CharacterId::Shadow => CharacterProfile {
                name: "Shadow Assassin",
                hp: 70.0,
                speed: 350.0,
                fire_rate: 0.3,
                damage: 20.0,
                might: 1.5,
                area: 0.8,
                pickup_range: 50.0,
                trait_name: "Critical Strike",
                trait_desc: "20% chance to deal triple damage.",
                starting_ability: Some(ActiveId::ShadowClaw),
            },
            CharacterId::Collector => CharacterProfile {
                name: "Energy Collector",
                hp: 120.0,
                speed: 280.0,
                fire_rate: 0.5,
                damage: 6.0,
                might: 0.8,
                area: 1.0,
                pickup_range: 150.0,
                trait_name: "Magnet Eye",
                trait_desc: "Gains 25% more experience.",
                starting_ability: Some(ActiveId::DroneBees),
            },
            CharacterId::Void => CharacterProfile {
                name: "Void Walker",
                hp: 110.0,
                speed: 240.0,
                fire_rate: 0.5,
                damage: 10.0,
                might: 1.1,
                area: 1.2,
                pickup_range: 80.0,
                trait_name: "Ricochet",
                trait_desc: "Main bullets travel faster.",
                starting_ability: Some(ActiveId::ChaosOrb),
            },
        }
    }
}

/// Active (triggered) abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveId {
    ShadowClaw,
    RunicCircle,
    ToxicBottle,
    SpectralSwords,
    Earthquake,
    SolarBeam,
    BoomerangAxe,
    BoneChain,
    ChaosOrb,
    DroneBees,
}

/// Passive (stat-modifying) abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveId {
    HoningStone,
    Chronometer,
    Magnifier,
    MercuryMix,
    SpareMag,
    DragonArmor,
    RabbitFoot,
    MagnetGlove,
    PhoenixFeather,
    LifeElixir,
}

/// Evolution rule: a maxed active plus the required passive unlocks the
/// evolved form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Evolution {
    pub required: PassiveId,
    pub name: &'static str,
    pub desc: &'static str,
}

impl ActiveId {
    pub const ALL: [ActiveId; 10] = [
        ActiveId::ShadowClaw,
        ActiveId::RunicCircle,
        ActiveId::ToxicBottle,
        ActiveId::SpectralSwords,
        ActiveId::Earthquake,
        ActiveId::SolarBeam,
        ActiveId::BoomerangAxe,
        ActiveId::BoneChain,
        ActiveId::ChaosOrb,
        ActiveId::DroneBees,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActiveId::ShadowClaw => "Shadow Claw",
            ActiveId::RunicCircle => "Runic Circle",
            ActiveId::ToxicBottle => "Toxic Bottle",
            ActiveId::SpectralSwords => "Spectral Swords",
            ActiveId::Earthquake => "Earthquake",
            ActiveId::SolarBeam => "Solar Beam",
            ActiveId::BoomerangAxe => "Boomerang Axe",
            ActiveId::BoneChain => "Bone Chain",
            ActiveId::ChaosOrb => "Chaos Orb",
            ActiveId::DroneBees => "Drone Bees",
        }
    }

    pub fn desc(self) -> &'static str {
        match self {
            ActiveId::ShadowClaw => "Rakes the nearest enemy with a quick short-range slash.",
            ActiveId::RunicCircle => "An energy ring that swells and contracts around you.",
            ActiveId::ToxicBottle => "Lobs a poison cloud where the enemies are.",
            ActiveId::SpectralSwords => "Ghost blades hurled at the nearest target.",
            ActiveId::Earthquake => "Every few steps, a shockwave knocks enemies back.",
            ActiveId::SolarBeam => "A column of searing light drops onto enemies.",
            ActiveId::BoomerangAxe => "An axe that flies out and returns, cutting everything.",
            ActiveId::BoneChain => "A flailing chain that staggers nearby enemies.",
            ActiveId::ChaosOrb => "A bouncing orb of unstable energy.",
            ActiveId::DroneBees => "Robotic bees that sting enemies in range.",
        }
    }

    /// Cooldown for the base form, seconds
    pub fn base_cooldown(self) -> f32 {
        match self {
            ActiveId::ShadowClaw => 0.8,
            ActiveId::RunicCircle => 4.0,
            ActiveId::ToxicBottle => 3.0,
            ActiveId::SpectralSwords => 2.5,
            ActiveId::Earthquake => 0.0, // gated by distance walked, not time
            ActiveId::SolarBeam => 5.0,
            ActiveId::BoomerangAxe => 2.0,
            ActiveId::BoneChain => 1.5,
            ActiveId::ChaosOrb => 3.0,
            ActiveId::DroneBees => 1.2,
        }
    }

    /// Cooldown for the evolved form, seconds
    pub fn evolved_cooldown(self) -> f32 {
        match self {
            ActiveId::ShadowClaw => 0.5,
            ActiveId::RunicCircle => 0.0, // continuous field
            ActiveId::ToxicBottle => 2.0,
            ActiveId::SpectralSwords => 3.0,
            ActiveId::Earthquake => 0.1,
            ActiveId::SolarBeam => 3.0,
            ActiveId::BoomerangAxe => 1.5,
            ActiveId::BoneChain => 1.0,
            ActiveId::ChaosOrb => 2.5,
            ActiveId::DroneBees => 0.8,
        }
    }

    /// Every active has exactly one evolution
    pub fn evolution(self) -> Evolution {
        match self {
            ActiveId::ShadowClaw => Evolution {
                required: PassiveId::HoningStone,
                name: "Nightmare Claw",
                desc: "Strikes a wide cone; damage grows permanently with kills.",
            },
            ActiveId::RunicCircle => Evolution {
                required: PassiveId::Magnifier,
                name: "Infinity Ring",
                desc: "A permanent giant energy field that slows enemies.",
            },
            ActiveId::ToxicBottle => Evolution {
                required: PassiveId::LifeElixir,
                name: "Plague Mist",
                desc: "Enormous clouds; the dying leave life orbs behind.",
            },
            ActiveId::SpectralSwords => Evolution {
                required: PassiveId::SpareMag,
                name: "Sword Graveyard",
                desc: "A circular burst of blades that ricochet.",
            },
            ActiveId::Earthquake => Evolution {
                required: PassiveId::PhoenixFeather,
                name: "Tectonic Cataclysm",
                desc: "Leaves a trail of lava as you move.",
            },
            ActiveId::SolarBeam => Evolution {
                required: PassiveId::Chronometer,
                name: "Divine Wrath",
                desc: "Relentless multiple light columns.",
            },
            ActiveId::BoomerangAxe => Evolution {
                required: PassiveId::MercuryMix,
                name: "Razor Storm",
                desc: "A giant saw careening across the field.",
            },
            ActiveId::BoneChain => Evolution {
                required: PassiveId::DragonArmor,
                name: "Hell Shackles",
                desc: "Orbiting flails that grind everything nearby.",
            },
            ActiveId::ChaosOrb => Evolution {
                required: PassiveId::RabbitFoot,
                name: "Cosmic Chaos",
                desc: "Energy bolts that seek out enemies.",
            },
            ActiveId::DroneBees => Evolution {
                required: PassiveId::MagnetGlove,
                name: "Hive Mothership",
                desc: "A standing swarm that gnaws at everything in reach.",
            },
        }
    }
}

impl PassiveId {
    pub const ALL: [PassiveId; 10] = [
        PassiveId::HoningStone,
        PassiveId::Chronometer,
        PassiveId::Magnifier,
        PassiveId::MercuryMix,
        PassiveId::SpareMag,
        PassiveId::DragonArmor,
        PassiveId::RabbitFoot,
        PassiveId::MagnetGlove,
        PassiveId::PhoenixFeather,
        PassiveId::LifeElixir,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassiveId::HoningStone => "Honing Stone",
            PassiveId::Chronometer => "Ancient Chronometer",
            PassiveId::Magnifier => "Giant's Magnifier",
            PassiveId::MercuryMix => "Mercury Mix",
            PassiveId::SpareMag => "Spare Magazine",
            PassiveId::DragonArmor => "Dragon Armor",
            PassiveId::RabbitFoot => "Rabbit's Foot",
            PassiveId::MagnetGlove => "Magnet Glove",
            PassiveId::PhoenixFeather => "Phoenix Feather",
            PassiveId::LifeElixir => "Life Elixir",
        }
    }

    pub fn desc(self) -> &'static str {
        match self {
            PassiveId::HoningStone => "Raises the damage of all physical weapons.",
            PassiveId::Chronometer => "Shortens every ability cooldown.",
            PassiveId::Magnifier => "Enlarges ability areas and blast radii.",
            PassiveId::MercuryMix => "Speeds up bullets and thrown objects.",
            PassiveId::SpareMag => "Adds projectiles to each volley.",
            PassiveId::DragonArmor => "Hardens defenses against incoming damage.",
            PassiveId::RabbitFoot => "Improves luck.",
            PassiveId::MagnetGlove => "Extends XP collection range.",
            PassiveId::PhoenixFeather => "Raises movement speed.",
            PassiveId::LifeElixir => "Grants maximum HP and regeneration.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_character_falls_back_to_default() {
        assert_eq!(CharacterId::parse("no_such_hero"), CharacterId::Gunner);
        assert_eq!(CharacterId::parse("tank"), CharacterId::Tank);
    }

    #[test]
    fn every_active_has_an_evolution_requirement() {
        for id in ActiveId::ALL {
            let evo = id.evolution();
            assert!(!evo.name.is_empty());
            assert!(PassiveId::ALL.contains(&evo.required));
        }
    }

    #[test]
    fn cooldown_tables_are_sane() {
        for id in ActiveId::ALL {
            assert!(id.base_cooldown() >= 0.0);
            assert!(id.evolved_cooldown() >= 0.0);
        }
    }
}
