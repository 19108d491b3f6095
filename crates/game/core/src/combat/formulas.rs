//! Roll formulas for each roll category.
//!
//! Sheet bonuses are baked in as constants; penalties stay as `@` variables so
//! the roll context at evaluation time decides their value.

use super::check::defense_penalty;
use super::maneuver::{DefenseKind, Maneuver};
use crate::config::RulesConfig;
use crate::state::ActorState;

const D20: &str = "1d20";

/// Aimed/called shot toggles read from the attacker's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotModifiers {
    pub aimed: bool,
    pub called: bool,
}

impl ShotModifiers {
    pub fn total(&self, config: &RulesConfig) -> i32 {
        let aimed = if self.aimed { config.aimed_shot_bonus } else { 0 };
        let called = if self.called {
            config.called_shot_penalty
        } else {
            0
        };
        aimed + called
    }
}

fn sum(terms: &[String]) -> String {
    terms.join(" + ")
}

/// `1d20 + maneuver + @penalties.weaponAttacks + shot modifiers`.
pub fn attack(
    attacker: &ActorState,
    maneuver: &Maneuver,
    shot: ShotModifiers,
    config: &RulesConfig,
) -> String {
    let mut terms = vec![
        D20.to_owned(),
        attacker.maneuver_bonus(maneuver).to_string(),
        "@penalties.weaponAttacks".to_owned(),
    ];
    if shot.aimed {
        terms.push(config.aimed_shot_bonus.to_string());
    }
    if shot.called {
        terms.push(config.called_shot_penalty.to_string());
    }
    sum(&terms)
}

/// Sheet maneuver roll: `1d20 + @attributes.pp.mod + maneuver + @penalties.weaponAttacks`.
pub fn maneuver(attacker: &ActorState, maneuver: &Maneuver) -> String {
    sum(&[
        D20.to_owned(),
        "@attributes.pp.mod".to_owned(),
        attacker.maneuver_bonus(maneuver).to_string(),
        "@penalties.weaponAttacks".to_owned(),
    ])
}

/// `1d20 + defense + dodge penalty + @penalties.defenses`.
pub fn defense(
    defender: &ActorState,
    kind: DefenseKind,
    against: &Maneuver,
    config: &RulesConfig,
) -> String {
    sum(&[
        D20.to_owned(),
        defender.defenses.bonus(kind).to_string(),
        defense_penalty(kind, against, config).to_string(),
        "@penalties.defenses".to_owned(),
    ])
}

/// `1d20 + save + @penalties.savingThrows`.
pub fn save(defender: &ActorState, save_type: &str) -> String {
    sum(&[
        D20.to_owned(),
        defender.save_bonus(save_type).to_string(),
        "@penalties.savingThrows".to_owned(),
    ])
}

pub fn perception(actor: &ActorState) -> String {
    sum(&[D20.to_owned(), actor.perception.to_string()])
}

pub fn skill() -> String {
    RulesConfig::SKILL_DIE.to_owned()
}
