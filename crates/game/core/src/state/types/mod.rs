pub mod actor;
pub mod combat;
pub mod common;
pub mod item;

// Re-export actor-related types
pub use actor::{ActorKind, ActorState, Attribute, Attributes, Defenses, DefensivePools, Rated};

// Re-export encounter types
pub use combat::{Combatant, CombatChange, CombatFields, CombatRoundState, SequencerPhase};

// Re-export common types
pub use common::{ActorId, CombatantId, ItemId, Pool};

// Re-export item types
pub use item::{AppliesTo, EffectItem, Power, Skill, Weapon};
