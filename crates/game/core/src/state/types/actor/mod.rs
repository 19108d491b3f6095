//! Actor record: the numeric sheet fields the rules engine reads and writes.

use std::collections::{BTreeMap, BTreeSet};

use super::common::{ActorId, ItemId, Pool};
use super::item::{Power, Skill, Weapon};
use crate::combat::{DefenseKind, Maneuver};
use crate::dice::RollContext;
use crate::stats::{ActiveEffect, Penalties};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActorKind {
    #[default]
    Character,
    Npc,
}

/// An attribute score with its derived roll modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub value: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    /// Intelligence quotient, drives the skill bonus.
    pub iq: Attribute,
    /// Physical prowess, adds to maneuver rolls.
    pub pp: Attribute,
}

/// Labelled bonus (a save, a maneuver).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rated {
    pub label: String,
    pub bonus: i32,
}

impl Rated {
    pub fn new(label: impl Into<String>, bonus: i32) -> Self {
        Self {
            label: label.into(),
            bonus,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Defenses {
    pub parry: i32,
    pub dodge: i32,
}

impl Defenses {
    pub fn bonus(&self, kind: DefenseKind) -> i32 {
        match kind {
            DefenseKind::Parry => self.parry,
            DefenseKind::Dodge => self.dodge,
        }
    }
}

/// Absorption layers, applied in a fixed order by the damage engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefensivePools {
    /// Armor rating of worn armor; 0 when unarmored.
    pub worn_armor_rating: i32,
    pub worn_armor_sdc: Pool,
    /// Threshold a clean hit must exceed to deal damage.
    pub natural_armor_rating: i32,
    pub character_sdc: Pool,
    pub health: Pool,
}

impl DefensivePools {
    pub fn wears_armor(&self) -> bool {
        self.worn_armor_rating > 0
    }

    /// Target number an attack roll must meet: worn AR if armored, natural AR otherwise.
    pub fn primary_armor_rating(&self) -> i32 {
        if self.wears_armor() {
            self.worn_armor_rating
        } else {
            self.natural_armor_rating
        }
    }
}

/// Plain actor record shared between the host and the rules engine.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ActorKind,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
    /// Flat initiative bonus added to the initiative die.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub perception: i32,
    pub actions: Pool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub isp: Pool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chi: Pool,
    pub pools: DefensivePools,
    #[cfg_attr(feature = "serde", serde(default))]
    pub saves: BTreeMap<String, Rated>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defenses: Defenses,
    #[cfg_attr(feature = "serde", serde(default))]
    pub maneuvers: BTreeMap<String, Rated>,
    /// Base penalties; active effects add on top, see [`ActorState::effective_penalties`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub penalties: Penalties,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<Skill>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapons: Vec<Weapon>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub powers: Vec<Power>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<ActiveEffect>,
    /// Status markers shown on the actor's tokens (`dead`, `prone`, ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: BTreeSet<String>,
}

#[cfg(feature = "serde")]
fn default_level() -> i32 {
    1
}

impl ActorState {
    pub fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: 1,
            ..Self::default()
        }
    }

    pub fn with_actions(mut self, max: i32) -> Self {
        self.actions = Pool::full(max);
        self
    }

    pub fn with_pools(mut self, pools: DefensivePools) -> Self {
        self.pools = pools;
        self
    }

    pub fn skill(&self, id: ItemId) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn weapon(&self, id: ItemId) -> Option<&Weapon> {
        self.weapons.iter().find(|weapon| weapon.id == id)
    }

    pub fn power(&self, id: ItemId) -> Option<&Power> {
        self.powers.iter().find(|power| power.id == id)
    }

    pub fn save_bonus(&self, save_type: &str) -> i32 {
        self.saves.get(save_type).map_or(0, |save| save.bonus)
    }

    pub fn save_label(&self, save_type: &str) -> Option<&str> {
        self.saves.get(save_type).map(|save| save.label.as_str())
    }

    pub fn maneuver_bonus(&self, maneuver: &Maneuver) -> i32 {
        self.maneuvers
            .get(maneuver.as_key())
            .map_or(0, |entry| entry.bonus)
    }

    pub fn maneuver_label(&self, maneuver: &Maneuver) -> Option<&str> {
        self.maneuvers
            .get(maneuver.as_key())
            .map(|entry| entry.label.as_str())
    }

    /// Base penalties plus every active effect.
    pub fn effective_penalties(&self) -> Penalties {
        self.effects
            .iter()
            .fold(self.penalties, |total, effect| total + effect.penalties())
    }

    pub fn is_defeated(&self) -> bool {
        self.statuses.contains(crate::config::RulesConfig::DEFEATED_STATUS)
    }

    /// Named values available to roll formulas as `@path`.
    pub fn roll_data(&self) -> RollContext {
        let penalties = self.effective_penalties();
        let mut ctx = RollContext::new();
        ctx.insert("level.value", self.level);
        ctx.insert("initiative.value", self.initiative);
        ctx.insert("perception.value", self.perception);
        ctx.insert("attributes.iq.value", self.attributes.iq.value);
        ctx.insert("attributes.iq.mod", self.attributes.iq.modifier);
        ctx.insert("attributes.pp.value", self.attributes.pp.value);
        ctx.insert("attributes.pp.mod", self.attributes.pp.modifier);
        ctx.insert("actions.value", self.actions.value);
        ctx.insert("penalties.weaponAttacks", penalties.weapon_attacks);
        ctx.insert("penalties.defenses", penalties.defenses);
        ctx.insert("penalties.savingThrows", penalties.saving_throws);
        ctx
    }
}
