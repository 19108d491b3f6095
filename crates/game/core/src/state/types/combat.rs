//! Encounter-level state: combatants, change notifications and the sequencer locks.

use bitflags::bitflags;

use super::common::{ActorId, CombatantId, Pool};

/// One participant of an encounter, as seen by the turn logic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub actor: ActorId,
    pub name: String,
    /// `None` until initiative has been rolled.
    pub initiative: Option<i32>,
    /// Mirror of the actor's action pool.
    pub actions: Pool,
}

impl Combatant {
    /// A combatant can act while it has actions left.
    pub fn is_active(&self) -> bool {
        self.actions.value > 0
    }
}

bitflags! {
    /// Fields carried by a combat-state change notification.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CombatFields: u8 {
        const ROUND = 1 << 0;
        const TURN  = 1 << 1;
    }
}

/// Notification emitted by the host whenever the round counter or turn pointer moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatChange {
    pub fields: CombatFields,
    pub round: u32,
    pub turn: Option<usize>,
}

impl CombatChange {
    pub fn turn(round: u32, turn: Option<usize>) -> Self {
        Self {
            fields: CombatFields::TURN,
            round,
            turn,
        }
    }

    /// A new round always resets the turn pointer as well.
    pub fn round(round: u32, turn: Option<usize>) -> Self {
        Self {
            fields: CombatFields::ROUND | CombatFields::TURN,
            round,
            turn,
        }
    }

    pub fn touches_turn(&self) -> bool {
        self.fields.contains(CombatFields::TURN)
    }

    pub fn touches_round(&self) -> bool {
        self.fields.contains(CombatFields::ROUND)
    }
}

/// Observable phase of the turn/round state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequencerPhase {
    #[default]
    Idle,
    ProcessingTurn,
    AwaitingReroll,
}

/// Per-encounter round bookkeeping and the two cooperative locks.
///
/// The re-roll lock takes precedence: while it is held no turn is processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRoundState {
    pub round: u32,
    pub turn: Option<usize>,
    processing_turn: bool,
    rerolling: bool,
}

impl CombatRoundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SequencerPhase {
        if self.rerolling {
            SequencerPhase::AwaitingReroll
        } else if self.processing_turn {
            SequencerPhase::ProcessingTurn
        } else {
            SequencerPhase::Idle
        }
    }

    pub fn is_processing_turn(&self) -> bool {
        self.processing_turn
    }

    pub fn is_rerolling(&self) -> bool {
        self.rerolling
    }

    /// Takes the turn lock. Fails while a re-roll or another turn is in progress.
    pub fn try_begin_turn(&mut self) -> bool {
        if self.rerolling || self.processing_turn {
            return false;
        }
        self.processing_turn = true;
        true
    }

    pub fn end_turn(&mut self) {
        self.processing_turn = false;
    }

    /// Takes the re-roll lock. Fails only if a re-roll is already running.
    pub fn try_begin_reroll(&mut self) -> bool {
        if self.rerolling {
            return false;
        }
        self.rerolling = true;
        true
    }

    pub fn end_reroll(&mut self) {
        self.rerolling = false;
    }

    /// Records the latest observed round and turn pointer.
    pub fn observe(&mut self, change: &CombatChange) {
        self.round = change.round;
        self.turn = change.turn;
    }
}
