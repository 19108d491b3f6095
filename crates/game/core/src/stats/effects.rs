//! Roll penalties and the active effects that contribute to them.

use std::ops::Add;

use crate::state::{AppliesTo, EffectItem, ItemId};

/// Flat penalties (usually negative) added to each roll category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Penalties {
    pub weapon_attacks: i32,
    pub defenses: i32,
    pub saving_throws: i32,
}

impl Add for Penalties {
    type Output = Penalties;

    fn add(self, rhs: Penalties) -> Penalties {
        Penalties {
            weapon_attacks: self.weapon_attacks + rhs.weapon_attacks,
            defenses: self.defenses + rhs.defenses,
            saving_throws: self.saving_throws + rhs.saving_throws,
        }
    }
}

/// Effect applied to an actor, created from an [`EffectItem`].
///
/// Permanent until removed; there is no duration tracking.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub name: String,
    /// Item the effect was created from.
    pub origin: ItemId,
    pub penalty: i32,
    pub applies_to: AppliesTo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<String>,
}

impl ActiveEffect {
    pub fn from_item(item: &EffectItem) -> Self {
        Self {
            name: item.name.clone(),
            origin: item.id,
            penalty: item.penalty,
            applies_to: item.applies_to,
            status: item.status_effect.clone(),
        }
    }

    /// Contribution of this effect to each penalty category.
    pub fn penalties(&self) -> Penalties {
        let pick = |flag| {
            if self.applies_to.contains(flag) {
                self.penalty
            } else {
                0
            }
        };
        Penalties {
            weapon_attacks: pick(AppliesTo::WEAPON_ATTACKS),
            defenses: pick(AppliesTo::DEFENSES),
            saving_throws: pick(AppliesTo::SAVING_THROWS),
        }
    }

    /// Label listing the categories, e.g. "Attacks, Saves".
    pub fn applies_to_label(&self) -> String {
        self.applies_to.describe()
    }
}
