//! Items owned by an actor: skills, weapons, powers and effect items.

use bitflags::bitflags;

use super::common::ItemId;
use crate::combat::Maneuver;

/// Percentile skill. `total` is derived, see [`crate::stats::prepare_skills`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: ItemId,
    pub name: String,
    pub base: i32,
    pub per_level: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total: i32,
}

impl Skill {
    pub fn new(id: ItemId, name: impl Into<String>, base: i32, per_level: i32) -> Self {
        Self {
            id,
            name: name.into(),
            base,
            per_level,
            total: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub maneuver: Maneuver,
    pub damage_formula: String,
}

/// Psionic, chi or magic power that may call for a save and/or roll damage.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Power {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Actions spent when the power is used during combat.
    #[cfg_attr(feature = "serde", serde(default))]
    pub action_cost: i32,
    /// Key into the target's saves; `None` means no save is offered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub save_type: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub save_dc: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_formula: Option<String>,
}

bitflags! {
    /// Roll categories an effect penalty applies to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AppliesTo: u8 {
        const WEAPON_ATTACKS = 1 << 0;
        const DEFENSES       = 1 << 1;
        const SAVING_THROWS  = 1 << 2;
    }
}

impl AppliesTo {
    /// Comma-separated labels, as shown next to an active effect.
    pub fn describe(&self) -> String {
        let mut labels = Vec::new();
        if self.contains(Self::WEAPON_ATTACKS) {
            labels.push("Attacks");
        }
        if self.contains(Self::DEFENSES) {
            labels.push("Defenses");
        }
        if self.contains(Self::SAVING_THROWS) {
            labels.push("Saves");
        }
        labels.join(", ")
    }
}

/// Template for an active effect (e.g. "Blinded", "Shaken").
///
/// Effect items are never stored on an actor as-is; applying one produces an
/// [`crate::stats::ActiveEffect`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectItem {
    pub id: ItemId,
    pub name: String,
    pub penalty: i32,
    pub applies_to: AppliesTo,
    /// Optional host status marker toggled on the actor's tokens.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effect: Option<String>,
}
