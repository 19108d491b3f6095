use crate::state::{Combatant, CombatantId};

/// What the turn sequencer should do with the current pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnDecision {
    /// Nobody has actions left: reset everyone and start a new round.
    ExchangeExhausted,
    /// The current combatant is out of actions: move to the next turn.
    Skip { combatant: CombatantId, name: String },
    /// The current combatant acts.
    Begin {
        combatant: CombatantId,
        name: String,
        actions: i32,
    },
    /// The pointer does not reference a combatant.
    NoCombatant,
}

/// True when no combatant can act. An empty encounter is not exhausted.
pub fn all_exhausted(combatants: &[Combatant]) -> bool {
    !combatants.is_empty() && combatants.iter().all(|c| !c.is_active())
}

/// Decides the action for `turn` in the host's current order.
pub fn decide_turn(combatants: &[Combatant], turn: Option<usize>) -> TurnDecision {
    let Some(current) = turn.and_then(|index| combatants.get(index)) else {
        return TurnDecision::NoCombatant;
    };

    if all_exhausted(combatants) {
        return TurnDecision::ExchangeExhausted;
    }

    if current.is_active() {
        TurnDecision::Begin {
            combatant: current.id,
            name: current.name.clone(),
            actions: current.actions.value,
        }
    } else {
        TurnDecision::Skip {
            combatant: current.id,
            name: current.name.clone(),
        }
    }
}

/// Combatants without actions at the head of the order, starting at `from`.
///
/// Stops at the first active combatant. Returns nothing when every combatant
/// is exhausted, leaving that case to the exchange reset.
pub fn leading_exhausted(combatants: &[Combatant], from: usize) -> Vec<&Combatant> {
    if all_exhausted(combatants) {
        return Vec::new();
    }
    combatants
        .iter()
        .skip(from)
        .take_while(|c| !c.is_active())
        .collect()
}
