use std::time::Duration;

use palladium_core::{CombatChange, RulesConfig, all_exhausted, leading_exhausted};
use tracing::{debug, info, warn};

use super::turn::skip_message;
use super::{IgnoreReason, RoundLock};
use crate::api::{Announcement, Collaborators, InitiativeRoll, Result};
use crate::events::{CombatEvent, Event, EventBus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Ignored(IgnoreReason),
    Rerolled {
        round: u32,
        /// Combatants passed over because they started the round without actions.
        skipped: usize,
    },
}

/// Re-rolls initiative at the top of every round and fast-forwards past
/// combatants that cannot act.
#[derive(Clone)]
pub struct RoundInitializer {
    collaborators: Collaborators,
    lock: RoundLock,
    events: EventBus,
    initiative_formula: String,
    settle_timeout: Duration,
}

impl RoundInitializer {
    pub fn new(
        collaborators: Collaborators,
        lock: RoundLock,
        events: EventBus,
        rules: &RulesConfig,
        settle_timeout: Duration,
    ) -> Self {
        Self {
            collaborators,
            lock,
            events,
            initiative_formula: rules.initiative_formula.clone(),
            settle_timeout,
        }
    }

    pub async fn on_round_changed(&self, change: &CombatChange) -> Result<RoundOutcome> {
        if !change.touches_round() {
            return Ok(RoundOutcome::Ignored(IgnoreReason::Irrelevant));
        }

        let Some(_guard) = self.lock.try_reroll() else {
            debug!(round = change.round, "re-roll already in progress");
            return Ok(RoundOutcome::Ignored(IgnoreReason::Rerolling));
        };

        let host = &self.collaborators.host;
        let round = host.round().await?;
        if change.round != round {
            debug!(notified = change.round, round, "stale round notification");
            return Ok(RoundOutcome::Ignored(IgnoreReason::Stale));
        }

        let combatants = host.combatants().await?;
        let mut rolls = Vec::with_capacity(combatants.len());
        for combatant in &combatants {
            let actor = host.actor(combatant.actor).await?;
            let roll = self
                .collaborators
                .dice
                .evaluate(&self.initiative_formula, &actor.roll_data())
                .await?;
            rolls.push(InitiativeRoll {
                combatant: combatant.id,
                total: roll.total,
            });
        }
        host.reroll_initiative(rolls).await?;
        info!(round, combatants = combatants.len(), "initiative re-rolled");
        self.collaborators
            .sink
            .announce(Announcement::system(format!(
                "Round {round}: initiative has been re-rolled for all combatants."
            )))
            .await;
        self.events
            .publish(Event::Combat(CombatEvent::RoundStarted { round }));

        host.set_turn(0).await?;

        match tokio::time::timeout(self.settle_timeout, host.turn_order_settled()).await {
            Ok(settled) => settled?,
            Err(_) => warn!(
                round,
                timeout_ms = self.settle_timeout.as_millis() as u64,
                "turn order did not settle in time; continuing with current order"
            ),
        }

        let skipped = self.fast_forward(round).await?;
        Ok(RoundOutcome::Rerolled { round, skipped })
    }

    /// Advances past zero-action combatants at the top of the order.
    ///
    /// Bounded by the number of combatants. Stops without skipping anyone when
    /// every combatant is exhausted.
    async fn fast_forward(&self, round: u32) -> Result<usize> {
        let host = &self.collaborators.host;
        let bound = host.combatants().await?.len();
        let mut skipped = 0;

        for _ in 0..bound {
            let order = host.combatants().await?;
            if all_exhausted(&order) {
                debug!(round, "every combatant exhausted; leaving reset to the turn sequencer");
                break;
            }
            let Some(turn) = host.turn().await? else {
                break;
            };
            let Some(current) = leading_exhausted(&order, turn).first().copied() else {
                break;
            };

            debug!(round, combatant = %current.id, "fast-forwarding past exhausted combatant");
            self.collaborators
                .sink
                .announce(Announcement::system(skip_message(&current.name)))
                .await;
            self.events.publish(Event::Combat(CombatEvent::TurnSkipped {
                round,
                combatant: current.id,
            }));
            host.next_turn().await?;
            skipped += 1;
        }

        Ok(skipped)
    }
}
