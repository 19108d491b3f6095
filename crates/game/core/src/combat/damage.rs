//! Damage resolution through the defensive layers.
//!
//! Three paths, each with a fixed layer order:
//!
//! ```text
//! weapon, armor hit : worn armor SDC                      (excess discarded)
//! weapon, clean hit : natural AR gate → character SDC → HP
//! power             : worn armor SDC → character SDC → HP
//! direct HP         : half the roll → HP                  (SDC bypassed)
//! ```
//!
//! All functions are pure: they take a copy of the pools, compute every
//! deduction, and return the new pools with a log. The caller writes the
//! result back in a single update.

use std::fmt;

use super::hit::{AttackOutcome, TargetType};
use crate::error::{ErrorSeverity, RulesError};
use crate::state::DefensivePools;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DamageError {
    #[error("damage must not be negative (got {0})")]
    NegativeDamage(i32),
}

impl RulesError for DamageError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Guarded
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeDamage(_) => "DAMAGE_NEGATIVE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    Weapon,
    Power,
    DirectHp,
}

/// One step of the damage log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageEntry {
    ArmorStruck,
    /// Armor-hit deduction; anything beyond it is lost.
    ArmorOnly(i32),
    ArmorEmpty,
    CleanHit,
    StoppedByNaturalArmor,
    /// Power-path deduction; the remainder carries on.
    Armor(i32),
    CharacterSdc(i32),
    Health(i32),
    DirectHealth(i32),
    /// Half of the roll rounded down to zero.
    DirectHealthNegligible,
}

impl fmt::Display for DamageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArmorStruck => f.write_str("- Attack hits Worn Armor."),
            Self::ArmorOnly(n) => write!(f, "- {n} damage to armor SDC only."),
            Self::ArmorEmpty => f.write_str("- Armor has no SDC to absorb the blow!"),
            Self::CleanHit => f.write_str("- Attack is a Clean Hit!."),
            Self::StoppedByNaturalArmor => f.write_str("- Damage stopped by Natural Armor!"),
            Self::Armor(n) => write!(f, "- {n} damage to armor SDC."),
            Self::CharacterSdc(n) => write!(f, "- {n} damage to character SDC."),
            Self::Health(n) => write!(f, "- {n} damage to HP."),
            Self::DirectHealth(n) => write!(f, "{n} damage applied directly to HP, bypassing SDC."),
            Self::DirectHealthNegligible => {
                f.write_str("Half damage was less than 1, no HP damage taken.")
            }
        }
    }
}

/// Pools before and after one damage application, with the steps taken.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReport {
    pub kind: DamageKind,
    /// Damage offered to the pipeline.
    pub damage: i32,
    pub before: DefensivePools,
    pub after: DefensivePools,
    pub entries: Vec<DamageEntry>,
}

impl DamageReport {
    fn start(kind: DamageKind, damage: i32, pools: &DefensivePools) -> Self {
        Self {
            kind,
            damage,
            before: *pools,
            after: *pools,
            entries: Vec::new(),
        }
    }

    /// Health crossed from above zero to zero or below.
    pub fn defeated(&self) -> bool {
        self.before.health.value > 0 && self.after.health.value <= 0
    }

    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    /// Total deducted from all layers.
    pub fn absorbed(&self) -> i32 {
        let drop = |before: i32, after: i32| before - after;
        drop(
            self.before.worn_armor_sdc.value,
            self.after.worn_armor_sdc.value,
        ) + drop(
            self.before.character_sdc.value,
            self.after.character_sdc.value,
        ) + drop(self.before.health.value, self.after.health.value)
    }

    /// Human-readable log, headed by a line naming the target.
    pub fn describe(&self, target_name: &str) -> Vec<String> {
        let header = match self.kind {
            DamageKind::Weapon => format!("Applying {} damage to {target_name}...", self.damage),
            DamageKind::Power => {
                format!("Applying {} power damage to {target_name}...", self.damage)
            }
            DamageKind::DirectHp => format!("Direct HP Damage vs. {target_name}"),
        };
        std::iter::once(header)
            .chain(self.entries.iter().map(ToString::to_string))
            .collect()
    }
}

fn check_damage(damage: i32) -> Result<(), DamageError> {
    if damage < 0 {
        return Err(DamageError::NegativeDamage(damage));
    }
    Ok(())
}

/// Applies weapon damage according to the attack's classification.
pub fn apply_damage(
    pools: &DefensivePools,
    damage: i32,
    outcome: &AttackOutcome,
) -> Result<DamageReport, DamageError> {
    check_damage(damage)?;
    let mut report = DamageReport::start(DamageKind::Weapon, damage, pools);
    let after = &mut report.after;

    match outcome.target_type {
        TargetType::ArmorHit => {
            report.entries.push(DamageEntry::ArmorStruck);
            if after.worn_armor_sdc.is_depleted() {
                report.entries.push(DamageEntry::ArmorEmpty);
            } else {
                let absorbed = after.worn_armor_sdc.absorb(damage);
                report.entries.push(DamageEntry::ArmorOnly(absorbed));
            }
        }
        TargetType::CleanHit => {
            report.entries.push(DamageEntry::CleanHit);
            if outcome.roll_total <= after.natural_armor_rating {
                report.entries.push(DamageEntry::StoppedByNaturalArmor);
            } else {
                let mut remaining = damage;
                if !after.character_sdc.is_depleted() && remaining > 0 {
                    let absorbed = after.character_sdc.absorb(remaining);
                    remaining -= absorbed;
                    report.entries.push(DamageEntry::CharacterSdc(absorbed));
                }
                if remaining > 0 {
                    let absorbed = after.health.absorb(remaining);
                    report.entries.push(DamageEntry::Health(absorbed));
                }
            }
        }
    }

    Ok(report)
}

/// Applies power damage: worn armor, then character SDC, then HP.
pub fn apply_power_damage(
    pools: &DefensivePools,
    damage: i32,
) -> Result<DamageReport, DamageError> {
    check_damage(damage)?;
    let mut report = DamageReport::start(DamageKind::Power, damage, pools);
    let after = &mut report.after;
    let mut remaining = damage;

    if !after.worn_armor_sdc.is_depleted() {
        let absorbed = after.worn_armor_sdc.absorb(remaining);
        remaining -= absorbed;
        report.entries.push(DamageEntry::Armor(absorbed));
    }
    if remaining > 0 && !after.character_sdc.is_depleted() {
        let absorbed = after.character_sdc.absorb(remaining);
        remaining -= absorbed;
        report.entries.push(DamageEntry::CharacterSdc(absorbed));
    }
    if remaining > 0 {
        let absorbed = after.health.absorb(remaining);
        report.entries.push(DamageEntry::Health(absorbed));
    }

    Ok(report)
}

/// Applies half of `rolled_total` (rounded down) straight to HP.
///
/// When half is below one nothing changes and the report carries
/// [`DamageEntry::DirectHealthNegligible`].
pub fn apply_direct_hp_damage(
    pools: &DefensivePools,
    rolled_total: i32,
) -> Result<DamageReport, DamageError> {
    check_damage(rolled_total)?;
    let half = rolled_total / 2;
    let mut report = DamageReport::start(DamageKind::DirectHp, half, pools);

    if half < 1 {
        report.entries.push(DamageEntry::DirectHealthNegligible);
        return Ok(report);
    }

    report.after.health.absorb(half);
    report.entries.push(DamageEntry::DirectHealth(half));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Pool;

    fn pools() -> DefensivePools {
        DefensivePools {
            worn_armor_rating: 12,
            worn_armor_sdc: Pool::full(5),
            natural_armor_rating: 15,
            character_sdc: Pool::full(10),
            health: Pool::full(20),
        }
    }

    #[test]
    fn armor_hit_only_touches_worn_armor() {
        let outcome = AttackOutcome::hit(TargetType::ArmorHit, 18);
        let report = apply_damage(&pools(), 20, &outcome).unwrap();

        assert_eq!(report.after.worn_armor_sdc.value, 0);
        assert_eq!(report.after.character_sdc, pools().character_sdc);
        assert_eq!(report.after.health, pools().health);
        assert_eq!(
            report.entries,
            vec![DamageEntry::ArmorStruck, DamageEntry::ArmorOnly(5)]
        );
    }

    #[test]
    fn armor_hit_on_broken_armor_is_logged() {
        let mut broken = pools();
        broken.worn_armor_sdc.value = 0;
        let outcome = AttackOutcome::hit(TargetType::ArmorHit, 18);
        let report = apply_damage(&broken, 8, &outcome).unwrap();

        assert!(report.is_noop());
        assert_eq!(
            report.describe("Orc"),
            vec![
                "Applying 8 damage to Orc...",
                "- Attack hits Worn Armor.",
                "- Armor has no SDC to absorb the blow!",
            ]
        );
    }

    #[test]
    fn clean_hit_at_natural_armor_is_stopped() {
        let outcome = AttackOutcome::hit(TargetType::CleanHit, 15);
        let report = apply_damage(&pools(), 12, &outcome).unwrap();

        assert!(report.is_noop());
        assert_eq!(
            report.entries.last(),
            Some(&DamageEntry::StoppedByNaturalArmor)
        );
    }

    #[test]
    fn clean_hit_spills_from_sdc_into_health() {
        let mut target = pools();
        target.natural_armor_rating = 0;
        let outcome = AttackOutcome::hit(TargetType::CleanHit, 16);
        let report = apply_damage(&target, 15, &outcome).unwrap();

        assert_eq!(report.after.character_sdc.value, 0);
        assert_eq!(report.after.health.value, 15);
        assert_eq!(report.after.worn_armor_sdc, target.worn_armor_sdc);
        assert_eq!(report.absorbed(), 15);
    }

    #[test]
    fn power_damage_runs_all_layers() {
        let report = apply_power_damage(&pools(), 40).unwrap();

        assert_eq!(report.after.worn_armor_sdc.value, 0);
        assert_eq!(report.after.character_sdc.value, 0);
        assert_eq!(report.after.health.value, 0);
        assert!(report.defeated());
        assert_eq!(
            report.describe("Orc"),
            vec![
                "Applying 40 power damage to Orc...",
                "- 5 damage to armor SDC.",
                "- 10 damage to character SDC.",
                "- 20 damage to HP.",
            ]
        );
    }

    #[test]
    fn pools_never_leave_their_range() {
        let mut target = pools();
        target.natural_armor_rating = 0;
        for damage in [0, 1, 4, 5, 9, 15, 30, 35, 100] {
            for report in [
                apply_damage(&target, damage, &AttackOutcome::hit(TargetType::CleanHit, 20))
                    .unwrap(),
                apply_damage(&target, damage, &AttackOutcome::hit(TargetType::ArmorHit, 20))
                    .unwrap(),
                apply_power_damage(&target, damage).unwrap(),
            ] {
                for pool in [
                    report.after.worn_armor_sdc,
                    report.after.character_sdc,
                    report.after.health,
                ] {
                    assert!(pool.value >= 0 && pool.value <= pool.max);
                }
                assert!(report.absorbed() <= damage);
            }
        }
    }

    #[test]
    fn direct_hp_damage_halves_and_bypasses_sdc() {
        let report = apply_direct_hp_damage(&pools(), 9).unwrap();
        assert_eq!(report.after.health.value, 16);
        assert_eq!(report.after.character_sdc, pools().character_sdc);
        assert_eq!(
            report.entries,
            vec![DamageEntry::DirectHealth(4)]
        );
    }

    #[test]
    fn direct_hp_damage_below_one_is_negligible() {
        let report = apply_direct_hp_damage(&pools(), 1).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.entries, vec![DamageEntry::DirectHealthNegligible]);
    }

    #[test]
    fn defeat_only_on_crossing() {
        let mut down = pools();
        down.health.value = 0;
        let report = apply_power_damage(&down, 50).unwrap();
        assert!(!report.defeated());
    }

    #[test]
    fn negative_damage_is_guarded() {
        let err = apply_power_damage(&pools(), -3).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Guarded);
    }
}
