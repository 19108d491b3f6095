use palladium_core::{CombatChange, CombatantId, TurnDecision, decide_turn};
use tracing::{debug, info};

use super::{IgnoreReason, RoundLock};
use crate::api::{Announcement, Collaborators, Result};
use crate::events::{CombatEvent, Event, EventBus};

/// What the sequencer did with a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Ignored(IgnoreReason),
    /// The turn pointer does not reference a combatant.
    NoCombatant,
    ExchangeReset,
    Skipped(CombatantId),
    Began { combatant: CombatantId, actions: i32 },
}

/// Reacts to turn-pointer changes: exhaustion reset, skip, or turn start.
#[derive(Clone)]
pub struct TurnSequencer {
    collaborators: Collaborators,
    lock: RoundLock,
    events: EventBus,
}

impl TurnSequencer {
    pub fn new(collaborators: Collaborators, lock: RoundLock, events: EventBus) -> Self {
        Self {
            collaborators,
            lock,
            events,
        }
    }

    pub async fn on_combat_updated(&self, change: &CombatChange) -> Result<TurnOutcome> {
        if !change.touches_turn() {
            return Ok(TurnOutcome::Ignored(IgnoreReason::Irrelevant));
        }

        let _guard = match self.lock.try_turn() {
            Ok(guard) => guard,
            Err(reason) => {
                debug!(?reason, round = change.round, turn = ?change.turn, "turn notification ignored");
                return Ok(TurnOutcome::Ignored(reason));
            }
        };

        let host = &self.collaborators.host;
        let round = host.round().await?;
        let turn = host.turn().await?;
        if change.round != round || change.turn != turn {
            debug!(
                notified_round = change.round,
                notified_turn = ?change.turn,
                round,
                turn = ?turn,
                "stale turn notification"
            );
            return Ok(TurnOutcome::Ignored(IgnoreReason::Stale));
        }
        self.lock.observe(change);

        let combatants = host.combatants().await?;
        match decide_turn(&combatants, turn) {
            TurnDecision::NoCombatant => Ok(TurnOutcome::NoCombatant),
            TurnDecision::ExchangeExhausted => {
                info!(round, "all combatants exhausted; resetting actions");
                self.announce(
                    "All combatants have used their actions. Resetting actions for a new exchange.",
                )
                .await;

                for combatant in &combatants {
                    let mut actor = host.actor(combatant.actor).await?;
                    actor.actions.restore();
                    host.update_actor(actor).await?;
                }
                self.events
                    .publish(Event::Combat(CombatEvent::ExchangeReset { round }));
                host.next_round().await?;
                Ok(TurnOutcome::ExchangeReset)
            }
            TurnDecision::Skip { combatant, name } => {
                debug!(round, %combatant, "skipping combatant without actions");
                self.announce(&skip_message(&name)).await;
                self.events
                    .publish(Event::Combat(CombatEvent::TurnSkipped { round, combatant }));
                host.next_turn().await?;
                Ok(TurnOutcome::Skipped(combatant))
            }
            TurnDecision::Begin {
                combatant,
                name,
                actions,
            } => {
                info!(round, %combatant, actions, "turn started");
                self.announce(&format!(
                    "It is now {name}'s turn. Actions remaining: {actions}."
                ))
                .await;
                self.events.publish(Event::Combat(CombatEvent::TurnStarted {
                    round,
                    combatant,
                    actions,
                }));
                Ok(TurnOutcome::Began { combatant, actions })
            }
        }
    }

    async fn announce(&self, text: &str) {
        self.collaborators
            .sink
            .announce(Announcement::system(text))
            .await;
    }
}

pub(super) fn skip_message(name: &str) -> String {
    format!("{name} has no actions remaining and is skipped.")
}
