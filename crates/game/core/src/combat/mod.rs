//! Combat resolution.
//!
//! Pure functions only: rolls arrive as totals, defenders as pool snapshots,
//! and every result is a value the caller decides how to write back.
//!
//! # Core Functions
//!
//! - `resolve_attack`: maneuver floor and armor rating vs. the attack total
//! - `resolve_defense` / `resolve_save` / `resolve_skill`: single checks
//! - `apply_damage` / `apply_power_damage` / `apply_direct_hp_damage`: layered absorption
//! - `formulas`: roll formulas for every roll category

pub mod card;
pub mod check;
pub mod damage;
pub mod formulas;
pub mod hit;
pub mod maneuver;

pub use card::{AttackCard, DamageCard, PowerCard};
pub use check::{
    CheckResult, CheckRule, defense_penalty, resolve_check, resolve_defense, resolve_save,
    resolve_skill,
};
pub use damage::{
    DamageEntry, DamageError, DamageKind, DamageReport, apply_damage, apply_direct_hp_damage,
    apply_power_damage,
};
pub use formulas::ShotModifiers;
pub use hit::{AttackOutcome, MissReason, TargetType, minimum_roll, resolve_attack};
pub use maneuver::{DefenseKind, Maneuver};
