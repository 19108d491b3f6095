//! Async orchestration of the Palladium rules around a host platform.
//!
//! This crate wires the pure rules of `palladium-core` to the collaborators a
//! host provides (encounter storage, dice, chat) and reacts to the host's
//! combat-state notifications. Consumers embed [`Runtime`] to sequence turns,
//! subscribe to events, and obtain services for user actions.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the collaborator traits, errors and the [`CombatHandle`]
//! - [`sequencer`] holds the turn sequencer, round initializer and controller
//! - [`services`] implements attacks, rolls, powers and card resolution
//! - [`handlers`] reacts to actor writes (defeat)
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`memory`] provides in-memory collaborators
pub mod api;
pub mod events;
pub mod handlers;
pub mod memory;
pub mod runtime;
pub mod sequencer;
pub mod services;

pub use api::{
    ActionContext, Announcement, AnnouncementSink, Collaborators, CombatHandle, CombatHost,
    InitiativeRoll, Notice, NoticeLevel, Result, RollEvaluator, RuntimeError,
};
pub use events::{CombatEvent, Event, EventBus, Topic};
pub use handlers::DefeatHandler;
pub use memory::{BusSink, DiceRoller, MemoryEncounter, RecordingSink};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use sequencer::{
    CombatController, IgnoreReason, RoundInitializer, RoundLock, RoundOutcome, TurnOutcome,
    TurnSequencer,
};
pub use services::{
    AppliedDamage, AttackReport, AttackService, PowerService, PowerUse, Resolution,
    ResolutionAction, ResolutionService, RollService, SheetService,
};
