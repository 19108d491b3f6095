use palladium_core::{ActorId, ItemId, LookupError, PowerCard, ResourceError, spend_actions};
use tracing::{debug, info};

use crate::api::{Announcement, Collaborators, Result};

/// What happened when a power was posted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PowerUse {
    Posted(PowerCard),
    /// The user is in combat and cannot pay the action cost; nothing was written.
    NotEnoughActions { available: i32, required: i32 },
}

#[derive(Clone)]
pub struct PowerService {
    collaborators: Collaborators,
}

impl PowerService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Posts a power card, paying its action cost first when the user is in combat.
    pub async fn use_power(&self, user: ActorId, power: ItemId) -> Result<PowerUse> {
        let host = &self.collaborators.host;
        let mut actor = host.actor(user).await?;
        let power = actor.power(power).cloned().ok_or(LookupError::ItemNotFound {
            actor: user,
            item: power,
        })?;

        if host.in_combat(user).await? {
            match spend_actions(&mut actor, power.action_cost) {
                Ok(remaining) => {
                    debug!(actor = %user, cost = power.action_cost, remaining, "power action cost paid");
                    host.update_actor(actor.clone()).await?;
                }
                Err(ResourceError::InsufficientActions {
                    available,
                    required,
                }) => {
                    self.collaborators
                        .sink
                        .announce(Announcement::new(
                            &actor.name,
                            format!(
                                "{} is trying to use {} and does not have enough actions. They have: {available} and need: {required}.",
                                actor.name, power.name
                            ),
                        ))
                        .await;
                    return Ok(PowerUse::NotEnoughActions {
                        available,
                        required,
                    });
                }
            }
        }

        let card = PowerCard::new(user, &power);
        info!(actor = %user, power = %power.name, save = ?card.save_type, "power posted");

        let mut text = power.name.clone();
        if !power.description.is_empty() {
            text.push_str(". ");
            text.push_str(&power.description);
        }
        if let Some(save_type) = &card.save_type {
            let label = actor.save_label(save_type).unwrap_or("Save");
            text.push_str(&format!(" [{label} vs DC {}]", card.save_dc));
        }
        self.collaborators
            .sink
            .announce(Announcement::new(&actor.name, text))
            .await;

        Ok(PowerUse::Posted(card))
    }
}
