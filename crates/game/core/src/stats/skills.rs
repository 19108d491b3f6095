//! Skill totals derived from level, IQ and per-skill growth.
//!
//! Formula:
//! - IQ bonus: 0 below 16, `IQ - 14` up to 30, then `16 + 2 × ⌊(IQ - 30) / 5⌋`
//! - Total: `base + (level - 1) × per_level + IQ bonus`, capped at the skill cap

use crate::config::RulesConfig;
use crate::state::ActorState;

/// IQ score at which the bonus starts.
const IQ_BONUS_THRESHOLD: i32 = 16;
/// IQ score above which the bonus grows in steps.
const IQ_LINEAR_CEILING: i32 = 30;

/// Percentile bonus granted by an IQ score.
pub fn iq_bonus(iq: i32) -> i32 {
    if iq < IQ_BONUS_THRESHOLD {
        return 0;
    }
    if iq <= IQ_LINEAR_CEILING {
        return iq - 14;
    }

    let bonus_at_ceiling = IQ_LINEAR_CEILING - 14;
    let steps = (iq - IQ_LINEAR_CEILING) / 5;
    bonus_at_ceiling + steps * 2
}

/// Skill total for the default cap (98).
pub fn compute_skill_total(level: i32, iq: i32, base: i32, per_level: i32) -> i32 {
    compute_skill_total_capped(level, iq, base, per_level, RulesConfig::DEFAULT_SKILL_CAP)
}

/// Skill total with an explicit upper cap. No lower clamp is applied.
pub fn compute_skill_total_capped(
    level: i32,
    iq: i32,
    base: i32,
    per_level: i32,
    cap: i32,
) -> i32 {
    let level_bonus = (level - 1) * per_level;
    (base + level_bonus + iq_bonus(iq)).min(cap)
}

/// Derived-data refresh: recomputes every skill total on the actor.
///
/// Must run whenever level, IQ, or any skill's base/growth changes.
pub fn prepare_skills(actor: &mut ActorState, config: &RulesConfig) {
    let level = actor.level;
    let iq = actor.attributes.iq.value;
    for skill in &mut actor.skills {
        skill.total =
            compute_skill_total_capped(level, iq, skill.base, skill.per_level, config.skill_cap);
    }
}
