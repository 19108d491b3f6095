//! Explicit user context for resolution actions.
use palladium_core::ActorId;
use serde::{Deserialize, Serialize};

use super::errors::{Result, RuntimeError};

/// What the acting user is pointing at.
///
/// Targets are tokens the user has targeted (attacks); controlled tokens are
/// the ones they have selected (saves, power damage).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    pub user: String,
    pub targets: Vec<ActorId>,
    pub controlled: Vec<ActorId>,
}

impl ActionContext {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }

    pub fn targeting(mut self, target: ActorId) -> Self {
        self.targets.push(target);
        self
    }

    pub fn controlling(mut self, actor: ActorId) -> Self {
        self.controlled.push(actor);
        self
    }

    /// First target, or a user-input error carrying `message`.
    pub fn require_target(&self, message: &str) -> Result<ActorId> {
        self.targets
            .first()
            .copied()
            .ok_or_else(|| RuntimeError::user_input(message))
    }

    /// All controlled tokens, or a user-input error carrying `message`.
    pub fn require_controlled(&self, message: &str) -> Result<&[ActorId]> {
        if self.controlled.is_empty() {
            return Err(RuntimeError::user_input(message));
        }
        Ok(&self.controlled)
    }
}
