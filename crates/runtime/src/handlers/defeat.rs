//! Handler for actor defeat.

use palladium_core::ActorState;
use tracing::info;

use crate::api::{Announcement, Collaborators, Result};
use crate::events::{CombatEvent, Event, EventBus};

/// Writes actor updates back and reacts when health crosses zero.
///
/// Defeat is detected from the health captured before and after the single
/// write: only a transition from above zero to zero or below triggers it, so
/// repeated damage to a downed actor never re-announces.
#[derive(Clone)]
pub struct DefeatHandler {
    collaborators: Collaborators,
    events: EventBus,
}

impl DefeatHandler {
    pub fn new(collaborators: Collaborators, events: EventBus) -> Self {
        Self {
            collaborators,
            events,
        }
    }

    pub fn crossed(before: &ActorState, after: &ActorState) -> bool {
        before.pools.health.value > 0 && after.pools.health.value <= 0
    }

    /// Writes `after` and returns whether the actor was defeated by it.
    pub async fn update(&self, before: &ActorState, after: ActorState) -> Result<bool> {
        let defeated = Self::crossed(before, &after);
        let id = after.id;
        let name = after.name.clone();

        self.collaborators.host.update_actor(after).await?;

        if defeated {
            info!(actor = %id, %name, "actor defeated");
            self.collaborators.host.mark_defeated(id).await?;
            self.collaborators
                .sink
                .announce(Announcement::system(format!("{name} has been defeated!")))
                .await;
            self.events
                .publish(Event::Combat(CombatEvent::Defeated { actor: id, name }));
        }

        Ok(defeated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palladium_core::{ActorId, Pool};

    fn with_health(value: i32) -> ActorState {
        let mut actor = ActorState::new(ActorId(1), "Orc");
        actor.pools.health = Pool::new(value, 20);
        actor
    }

    #[test]
    fn only_the_crossing_counts() {
        assert!(DefeatHandler::crossed(&with_health(5), &with_health(0)));
        assert!(DefeatHandler::crossed(&with_health(5), &with_health(-3)));
        assert!(!DefeatHandler::crossed(&with_health(0), &with_health(-3)));
        assert!(!DefeatHandler::crossed(&with_health(5), &with_health(1)));
    }
}
