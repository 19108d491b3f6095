//! Check resolution against a target number.
//!
//! The comparison differs by roll category:
//!
//! | Check            | Rule           | Success            |
//! |------------------|----------------|--------------------|
//! | Skill (d100)     | `RollUnder`    | `roll <= target`   |
//! | Save / generic   | `MeetOrExceed` | `roll >= dc`       |
//! | Defense vs hit   | `Exceed`       | `roll > dc`        |

use super::maneuver::{DefenseKind, Maneuver};
use crate::config::RulesConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CheckRule {
    RollUnder,
    MeetOrExceed,
    Exceed,
}

impl CheckRule {
    pub fn passes(self, roll_total: i32, target: i32) -> bool {
        match self {
            Self::RollUnder => roll_total <= target,
            Self::MeetOrExceed => roll_total >= target,
            Self::Exceed => roll_total > target,
        }
    }
}

/// Outcome of a single check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckResult {
    pub roll_total: i32,
    pub target: i32,
    pub rule: CheckRule,
    pub success: bool,
}

impl CheckResult {
    pub fn label(&self) -> &'static str {
        if self.success { "SUCCESS" } else { "FAILURE" }
    }
}

pub fn resolve_check(roll_total: i32, target: i32, rule: CheckRule) -> CheckResult {
    CheckResult {
        roll_total,
        target,
        rule,
        success: rule.passes(roll_total, target),
    }
}

/// Percentile skill check: success when the d100 comes up at or under the skill total.
pub fn resolve_skill(roll_total: i32, skill_total: i32) -> CheckResult {
    resolve_check(roll_total, skill_total, CheckRule::RollUnder)
}

/// Saving throw or generic target: success when the roll meets the DC.
pub fn resolve_save(roll_total: i32, dc: i32) -> CheckResult {
    resolve_check(roll_total, dc, CheckRule::MeetOrExceed)
}

/// Parry or dodge: the defense must beat the attack total outright.
pub fn resolve_defense(roll_total: i32, attack_total: i32) -> CheckResult {
    resolve_check(roll_total, attack_total, CheckRule::Exceed)
}

/// Flat modifier applied to a defense roll against `maneuver`.
///
/// Only dodging sniper and proficient-ranged attacks is penalised.
pub fn defense_penalty(kind: DefenseKind, maneuver: &Maneuver, config: &RulesConfig) -> i32 {
    if kind == DefenseKind::Dodge && maneuver.penalises_dodge() {
        config.dodge_penalty_vs_ranged
    } else {
        0
    }
}
