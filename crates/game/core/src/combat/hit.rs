//! Attack roll classification.

use std::fmt;

use super::maneuver::Maneuver;
use crate::config::RulesConfig;
use crate::state::DefensivePools;

/// Which layer an attack strikes first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TargetType {
    /// Strikes worn armor; only armor SDC absorbs it.
    ArmorHit,
    /// Bypasses worn armor and must beat natural AR.
    #[default]
    CleanHit,
}

impl TargetType {
    /// Armored defenders take armor hits unless the attacker says otherwise.
    pub fn for_defender(pools: &DefensivePools) -> Self {
        if pools.wears_armor() {
            Self::ArmorHit
        } else {
            Self::CleanHit
        }
    }
}

/// Result of one attack roll against one defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub target_type: TargetType,
    pub roll_total: i32,
    pub minimum_roll_threshold: i32,
    pub target_armor_rating: i32,
    pub is_hit: bool,
}

/// Why an attack missed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissReason {
    BelowMinimum(i32),
    BelowArmor(i32),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum(min) => write!(f, "failed min. roll of {min}"),
            Self::BelowArmor(ar) => write!(f, "failed vs AR {ar}"),
        }
    }
}

impl AttackOutcome {
    /// An already-rolled outcome carried on a card.
    pub fn hit(target_type: TargetType, roll_total: i32) -> Self {
        Self {
            target_type,
            roll_total,
            minimum_roll_threshold: 0,
            target_armor_rating: 0,
            is_hit: true,
        }
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        if self.is_hit {
            None
        } else if self.roll_total < self.minimum_roll_threshold {
            Some(MissReason::BelowMinimum(self.minimum_roll_threshold))
        } else {
            Some(MissReason::BelowArmor(self.target_armor_rating))
        }
    }
}

/// Minimum attack total for `maneuver`, before armor is considered.
pub fn minimum_roll(maneuver: &Maneuver, config: &RulesConfig) -> i32 {
    if maneuver.is_ranged() {
        config.ranged_minimum_roll
    } else {
        config.melee_minimum_roll
    }
}

/// Classifies an attack total against the defender's armor.
///
/// Hit iff the total meets both the maneuver floor and the defender's primary AR.
pub fn resolve_attack(
    roll_total: i32,
    maneuver: &Maneuver,
    defender: &DefensivePools,
    target_type: TargetType,
    config: &RulesConfig,
) -> AttackOutcome {
    let minimum_roll_threshold = minimum_roll(maneuver, config);
    let target_armor_rating = defender.primary_armor_rating();

    AttackOutcome {
        target_type,
        roll_total,
        minimum_roll_threshold,
        target_armor_rating,
        is_hit: roll_total >= minimum_roll_threshold && roll_total >= target_armor_rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools(worn: i32, natural: i32) -> DefensivePools {
        DefensivePools {
            worn_armor_rating: worn,
            natural_armor_rating: natural,
            ..DefensivePools::default()
        }
    }

    #[test]
    fn ranged_seven_misses_regardless_of_armor() {
        let config = RulesConfig::default();
        for maneuver in [
            Maneuver::Sniper,
            Maneuver::ProficientRanged,
            Maneuver::ProficientThrown,
        ] {
            let outcome =
                resolve_attack(7, &maneuver, &pools(0, 0), TargetType::CleanHit, &config);
            assert!(!outcome.is_hit);
            assert_eq!(outcome.miss_reason(), Some(MissReason::BelowMinimum(8)));
        }
    }

    #[test]
    fn melee_four_hits_armor_three() {
        let config = RulesConfig::default();
        let outcome = resolve_attack(
            4,
            &Maneuver::Strike,
            &pools(3, 0),
            TargetType::ArmorHit,
            &config,
        );
        assert!(outcome.is_hit);
        assert_eq!(outcome.target_armor_rating, 3);
        assert_eq!(outcome.miss_reason(), None);
    }

    #[test]
    fn miss_against_armor_reports_rating() {
        let config = RulesConfig::default();
        let outcome = resolve_attack(
            11,
            &Maneuver::Strike,
            &pools(12, 4),
            TargetType::ArmorHit,
            &config,
        );
        assert!(!outcome.is_hit);
        assert_eq!(
            outcome.miss_reason().map(|reason| reason.to_string()),
            Some("failed vs AR 12".to_owned())
        );
    }

    #[test]
    fn target_type_follows_worn_armor() {
        assert_eq!(TargetType::for_defender(&pools(10, 0)), TargetType::ArmorHit);
        assert_eq!(TargetType::for_defender(&pools(0, 8)), TargetType::CleanHit);
    }
}
