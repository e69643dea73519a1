//! Unit and building kinds with their base-stats tables
//!
//! All per-kind tuning lives here as static lookups consulted once at
//! spawn time, instead of kind-string branches scattered through the
//! simulation.

use serde::{Deserialize, Serialize};

/// Base stats applied to a unit at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_health: u32,
    pub attack_damage: u32,
    pub attack_range: f32,
    /// Ticks between attacks.
    pub cooldown: u32,
    /// World units advanced per tick while moving.
    pub move_speed: f32,
    /// Collision radius in world units.
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Worker,
    Soldier,
    Tank,
}

impl UnitKind {
    pub fn stats(&self) -> UnitStats {
        match self {
            UnitKind::Worker => UnitStats {
                max_health: 50,
                attack_damage: 5,
                attack_range: 20.0,
                cooldown: 45,
                move_speed: 2.0,
                radius: 14.0,
            },
            UnitKind::Soldier => UnitStats {
                max_health: 100,
                attack_damage: 10,
                attack_range: 25.0,
                cooldown: 30,
                move_speed: 2.0,
                radius: 16.0,
            },
            UnitKind::Tank => UnitStats {
                max_health: 200,
                attack_damage: 20,
                attack_range: 50.0,
                cooldown: 60,
                move_speed: 1.5,
                radius: 20.0,
            },
        }
    }

    /// Ticks a production order for this kind takes to complete.
    pub fn production_time(&self) -> u32 {
        match self {
            UnitKind::Worker => 180,
            UnitKind::Soldier => 300,
            UnitKind::Tank => 480,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Worker => "worker",
            UnitKind::Soldier => "soldier",
            UnitKind::Tank => "tank",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "worker" => Some(UnitKind::Worker),
            "soldier" => Some(UnitKind::Soldier),
            "tank" => Some(UnitKind::Tank),
            _ => None,
        }
    }
}

/// Base stats applied to a building at spawn.
///
/// Footprint is in tiles; the registry converts it to world units and
/// derives the collision radius from the larger side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingStats {
    pub max_health: u32,
    pub footprint: (u32, u32),
    pub can_attack: bool,
    pub attack_damage: u32,
    pub attack_range: f32,
    pub cooldown: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    CommandCenter,
    Barracks,
    Factory,
    Turret,
}

impl BuildingKind {
    pub fn stats(&self) -> BuildingStats {
        match self {
            BuildingKind::CommandCenter => BuildingStats {
                max_health: 1000,
                footprint: (3, 3),
                can_attack: false,
                attack_damage: 0,
                attack_range: 0.0,
                cooldown: 0,
            },
            BuildingKind::Barracks => BuildingStats {
                max_health: 500,
                footprint: (2, 2),
                can_attack: false,
                attack_damage: 0,
                attack_range: 0.0,
                cooldown: 0,
            },
            BuildingKind::Factory => BuildingStats {
                max_health: 800,
                footprint: (3, 2),
                can_attack: false,
                attack_damage: 0,
                attack_range: 0.0,
                cooldown: 0,
            },
            BuildingKind::Turret => BuildingStats {
                max_health: 300,
                footprint: (1, 1),
                can_attack: true,
                attack_damage: 15,
                attack_range: 150.0,
                cooldown: 30,
            },
        }
    }

    /// Unit kinds this building can produce.
    pub fn production_options(&self) -> &'static [UnitKind] {
        match self {
            BuildingKind::CommandCenter => &[UnitKind::Worker],
            BuildingKind::Barracks => &[UnitKind::Soldier],
            BuildingKind::Factory => &[UnitKind::Tank],
            BuildingKind::Turret => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::CommandCenter => "command_center",
            BuildingKind::Barracks => "barracks",
            BuildingKind::Factory => "factory",
            BuildingKind::Turret => "turret",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "command_center" => Some(BuildingKind::CommandCenter),
            "barracks" => Some(BuildingKind::Barracks),
            "factory" => Some(BuildingKind::Factory),
            "turret" => Some(BuildingKind::Turret),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_stats_table() {
        let worker = UnitKind::Worker.stats();
        assert_eq!(worker.max_health, 50);
        assert_eq!(worker.attack_damage, 5);
        assert_eq!(worker.cooldown, 45);

        let tank = UnitKind::Tank.stats();
        assert_eq!(tank.max_health, 200);
        assert!((tank.move_speed - 1.5).abs() < 1e-6);
        assert!((tank.attack_range - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_production_times() {
        assert_eq!(UnitKind::Worker.production_time(), 180);
        assert_eq!(UnitKind::Soldier.production_time(), 300);
        assert_eq!(UnitKind::Tank.production_time(), 480);
    }

    #[test]
    fn test_building_stats_table() {
        let center = BuildingKind::CommandCenter.stats();
        assert_eq!(center.max_health, 1000);
        assert_eq!(center.footprint, (3, 3));
        assert!(!center.can_attack);

        let turret = BuildingKind::Turret.stats();
        assert!(turret.can_attack);
        assert_eq!(turret.attack_damage, 15);
        assert!((turret.attack_range - 150.0).abs() < 1e-6);
        assert_eq!(turret.cooldown, 30);
    }

    #[test]
    fn test_production_options() {
        assert_eq!(BuildingKind::CommandCenter.production_options(), &[UnitKind::Worker]);
        assert_eq!(BuildingKind::Barracks.production_options(), &[UnitKind::Soldier]);
        assert_eq!(BuildingKind::Factory.production_options(), &[UnitKind::Tank]);
        assert!(BuildingKind::Turret.production_options().is_empty());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [UnitKind::Worker, UnitKind::Soldier, UnitKind::Tank] {
            assert_eq!(UnitKind::from_name(kind.name()), Some(kind));
        }
        for kind in [
            BuildingKind::CommandCenter,
            BuildingKind::Barracks,
            BuildingKind::Factory,
            BuildingKind::Turret,
        ] {
            assert_eq!(BuildingKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(UnitKind::from_name("archer"), None);
        assert_eq!(BuildingKind::from_name("wall"), None);
    }
}
