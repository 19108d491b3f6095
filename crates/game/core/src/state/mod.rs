//! Plain data records shared with the host.
//!
//! The host owns persistence; these types only describe the numeric and
//! state fields the rules engine reads and writes. Runtime layers clone or
//! query them and hand them back through the collaborator interfaces.
pub mod types;

pub use types::{
    ActorId, ActorKind, ActorState, AppliesTo, Attribute, Attributes, CombatChange, CombatFields,
    CombatRoundState, Combatant, CombatantId, Defenses, DefensivePools, EffectItem, ItemId, Pool,
    Power, Rated, SequencerPhase, Skill, Weapon,
};
