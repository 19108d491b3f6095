use palladium_core::{
    ActiveEffect, ActorId, EffectItem, ItemId, ResourceKind, RulesConfig, adjust_resource,
    reset_essentials, reset_sdc,
};
use tracing::debug;

use crate::api::{Collaborators, Result};

/// Resource counters and active effects edited from the character sheet.
#[derive(Clone)]
pub struct SheetService {
    collaborators: Collaborators,
    rules: RulesConfig,
}

impl SheetService {
    pub fn new(collaborators: Collaborators, rules: RulesConfig) -> Self {
        Self {
            collaborators,
            rules,
        }
    }

    /// Returns the new value of the resource.
    pub async fn adjust(
        &self,
        actor: ActorId,
        kind: ResourceKind,
        amount: i32,
        boosted: bool,
    ) -> Result<i32> {
        let mut state = self.collaborators.host.actor(actor).await?;
        let value = adjust_resource(&mut state, kind, amount, boosted, &self.rules);
        debug!(%actor, %kind, amount, boosted, value, "resource adjusted");
        self.collaborators.host.update_actor(state).await?;
        Ok(value)
    }

    pub async fn reset_sdc(&self, actor: ActorId) -> Result<()> {
        let mut state = self.collaborators.host.actor(actor).await?;
        reset_sdc(&mut state);
        self.collaborators.host.update_actor(state).await
    }

    pub async fn reset_essentials(&self, actor: ActorId) -> Result<()> {
        let mut state = self.collaborators.host.actor(actor).await?;
        reset_essentials(&mut state);
        self.collaborators.host.update_actor(state).await
    }

    /// Adds an active effect built from `item` and shows its status marker.
    pub async fn apply_effect(&self, actor: ActorId, item: &EffectItem) -> Result<ActiveEffect> {
        let mut state = self.collaborators.host.actor(actor).await?;
        let effect = ActiveEffect::from_item(item);
        if let Some(status) = &effect.status {
            state.statuses.insert(status.clone());
        }
        state.effects.push(effect.clone());
        debug!(%actor, effect = %effect.name, "effect applied");
        self.collaborators.host.update_actor(state).await?;
        Ok(effect)
    }

    /// Removes every effect created from `origin`. Returns how many were removed.
    pub async fn remove_effect(&self, actor: ActorId, origin: ItemId) -> Result<usize> {
        let mut state = self.collaborators.host.actor(actor).await?;
        let (removed, kept): (Vec<_>, Vec<_>) = state
            .effects
            .drain(..)
            .partition(|effect| effect.origin == origin);
        state.effects = kept;

        for status in removed.iter().filter_map(|effect| effect.status.as_ref()) {
            let still_used = state
                .effects
                .iter()
                .any(|effect| effect.status.as_ref() == Some(status));
            if !still_used {
                state.statuses.remove(status);
            }
        }

        if !removed.is_empty() {
            self.collaborators.host.update_actor(state).await?;
        }
        Ok(removed.len())
    }
}
