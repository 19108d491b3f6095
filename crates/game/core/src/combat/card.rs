//! Payloads attached to posted rolls.
//!
//! A card remembers what a roll was about so a later resolution step
//! (damage, defense, save) can be triggered from it without re-deriving
//! the attack.

use super::hit::{AttackOutcome, TargetType};
use super::maneuver::Maneuver;
use crate::state::{ActorId, Power, Weapon};

/// Posted weapon attack that hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackCard {
    pub attacker: ActorId,
    pub target: ActorId,
    pub weapon_name: String,
    pub damage_formula: String,
    pub maneuver: Maneuver,
    pub target_type: TargetType,
    pub attack_roll_total: i32,
}

impl AttackCard {
    pub fn new(attacker: ActorId, target: ActorId, weapon: &Weapon, outcome: &AttackOutcome) -> Self {
        Self {
            attacker,
            target,
            weapon_name: weapon.name.clone(),
            damage_formula: weapon.damage_formula.clone(),
            maneuver: weapon.maneuver.clone(),
            target_type: outcome.target_type,
            attack_roll_total: outcome.roll_total,
        }
    }

    /// Outcome to feed back into the damage engine.
    pub fn outcome(&self) -> AttackOutcome {
        AttackOutcome::hit(self.target_type, self.attack_roll_total)
    }
}

/// Posted power use.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerCard {
    pub user: ActorId,
    pub power_name: String,
    pub save_type: Option<String>,
    pub save_dc: i32,
    pub damage_formula: Option<String>,
}

impl PowerCard {
    pub fn new(user: ActorId, power: &Power) -> Self {
        Self {
            user,
            power_name: power.name.clone(),
            save_type: power
                .save_type
                .clone()
                .filter(|save| !save.is_empty() && save != "none"),
            save_dc: power.save_dc,
            damage_formula: power.damage_formula.clone().filter(|f| !f.trim().is_empty()),
        }
    }

    pub fn offers_save(&self) -> bool {
        self.save_type.is_some()
    }

    pub fn deals_damage(&self) -> bool {
        self.damage_formula.is_some()
    }
}

/// Rolled damage waiting to be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageCard {
    pub total: i32,
    /// Half damage, rounded down.
    pub half: i32,
}

impl DamageCard {
    pub fn from_total(total: i32) -> Self {
        Self {
            total,
            half: total / 2,
        }
    }

    pub fn amount(&self, halved: bool) -> i32 {
        if halved { self.half } else { self.total }
    }
}
