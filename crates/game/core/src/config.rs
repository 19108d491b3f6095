/// Rules constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Upper bound of any skill total.
    pub skill_cap: i32,
    /// Minimum attack roll for ranged, sniper and thrown maneuvers.
    pub ranged_minimum_roll: i32,
    /// Minimum attack roll for every other maneuver.
    pub melee_minimum_roll: i32,
    /// Dodge modifier when dodging sniper or proficient-ranged attacks.
    pub dodge_penalty_vs_ranged: i32,
    /// Attack modifier while the aimed-shot flag is set.
    pub aimed_shot_bonus: i32,
    /// Attack modifier while the called-shot flag is set.
    pub called_shot_penalty: i32,
    /// Multiplier for shift-clicked ISP/Chi adjustments.
    pub resource_shift_multiplier: i32,
    /// Formula rolled for every combatant at the top of each round.
    pub initiative_formula: String,
}

impl RulesConfig {
    // ===== fixed rules values =====
    pub const DEFAULT_SKILL_CAP: i32 = 98;
    /// Die rolled for percentile skill checks.
    pub const SKILL_DIE: &'static str = "1d100";
    /// Status marker applied to a defeated actor's tokens.
    pub const DEFEATED_STATUS: &'static str = "dead";
    /// Flag namespace used in the host's flag store.
    pub const FLAG_SCOPE: &'static str = "palladium";
    pub const AIMED_SHOT_FLAG: &'static str = "aimedShot";
    pub const CALLED_SHOT_FLAG: &'static str = "calledShot";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RANGED_MINIMUM_ROLL: i32 = 8;
    pub const DEFAULT_MELEE_MINIMUM_ROLL: i32 = 4;
    pub const DEFAULT_DODGE_PENALTY_VS_RANGED: i32 = -10;
    pub const DEFAULT_AIMED_SHOT_BONUS: i32 = 3;
    pub const DEFAULT_CALLED_SHOT_PENALTY: i32 = -3;
    pub const DEFAULT_RESOURCE_SHIFT_MULTIPLIER: i32 = 5;
    pub const DEFAULT_INITIATIVE_FORMULA: &'static str = "1d20 + @initiative.value";

    pub fn new() -> Self {
        Self {
            skill_cap: Self::DEFAULT_SKILL_CAP,
            ranged_minimum_roll: Self::DEFAULT_RANGED_MINIMUM_ROLL,
            melee_minimum_roll: Self::DEFAULT_MELEE_MINIMUM_ROLL,
            dodge_penalty_vs_ranged: Self::DEFAULT_DODGE_PENALTY_VS_RANGED,
            aimed_shot_bonus: Self::DEFAULT_AIMED_SHOT_BONUS,
            called_shot_penalty: Self::DEFAULT_CALLED_SHOT_PENALTY,
            resource_shift_multiplier: Self::DEFAULT_RESOURCE_SHIFT_MULTIPLIER,
            initiative_formula: Self::DEFAULT_INITIATIVE_FORMULA.to_owned(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
