//! Event types for the combat topic.

use palladium_core::{ActorId, CombatantId};
use serde::{Deserialize, Serialize};

/// Round and turn transitions observed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Initiative was re-rolled and the order rebuilt.
    RoundStarted { round: u32 },

    /// A combatant without actions was passed over.
    TurnSkipped {
        round: u32,
        combatant: CombatantId,
    },

    /// A combatant with actions is up.
    TurnStarted {
        round: u32,
        combatant: CombatantId,
        actions: i32,
    },

    /// Nobody had actions left; every pool was refilled.
    ExchangeReset { round: u32 },

    /// An actor's health crossed zero.
    Defeated { actor: ActorId, name: String },
}
