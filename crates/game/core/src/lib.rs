//! Deterministic Palladium rules shared by every host integration.
//!
//! `palladium-core` holds the plain data records the host reads and writes,
//! derived-stat calculation, check and attack resolution, the layered damage
//! engine, dice formulas and turn-order decisions. Nothing here performs I/O
//! or awaits; the runtime crate drives these functions from host
//! notifications.
pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod state;
pub mod stats;

pub use combat::{
    AttackCard, AttackOutcome, CheckResult, CheckRule, DamageCard, DamageEntry, DamageError,
    DamageKind, DamageReport, DefenseKind, Maneuver, MissReason, PowerCard, ShotModifiers,
    TargetType, apply_damage, apply_direct_hp_damage, apply_power_damage, defense_penalty,
    minimum_roll, resolve_attack, resolve_check, resolve_defense, resolve_save, resolve_skill,
};
pub use config::RulesConfig;
pub use dice::{DieRoller, Formula, FormulaError, PcgDice, Roll, RollContext, SequenceDice};
pub use engine::{TurnDecision, all_exhausted, decide_turn, leading_exhausted};
pub use error::{ErrorSeverity, LookupError, RulesError};
pub use state::{
    ActorId, ActorKind, ActorState, AppliesTo, Attribute, Attributes, CombatChange, CombatFields,
    CombatRoundState, Combatant, CombatantId, Defenses, DefensivePools, EffectItem, ItemId, Pool,
    Power, Rated, SequencerPhase, Skill, Weapon,
};
pub use stats::{
    ActiveEffect, Penalties, ResourceError, ResourceKind, adjust_resource, compute_skill_total,
    iq_bonus, prepare_skills, reset_essentials, reset_sdc, spend_actions,
};
