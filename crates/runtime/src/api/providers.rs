//! Asynchronous collaborator interfaces implemented by the host platform.
//!
//! The rules engine never owns encounter or actor storage. A host (a virtual
//! tabletop bridge, the in-memory encounter in [`crate::memory`], a test
//! fixture) plugs in:
//! - [`CombatHost`]: combatants, turn pointer, actor records and flags
//! - [`RollEvaluator`]: dice
//! - [`AnnouncementSink`]: chat cards and user notices
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use palladium_core::{
    ActorId, ActorState, Combatant, CombatantId, ErrorSeverity, Roll, RollContext,
};
use serde::{Deserialize, Serialize};

use super::errors::Result;

/// New initiative value for one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    pub combatant: CombatantId,
    pub total: i32,
}

/// Encounter and actor storage owned by the host.
///
/// Every mutator that moves the round counter or turn pointer must emit a
/// combat-change notification to the controller queue when the value actually
/// changes.
#[async_trait]
pub trait CombatHost: Send + Sync {
    /// Combatants in current turn order.
    async fn combatants(&self) -> Result<Vec<Combatant>>;

    async fn round(&self) -> Result<u32>;

    /// Index into [`CombatHost::combatants`] of the acting combatant.
    async fn turn(&self) -> Result<Option<usize>>;

    async fn next_turn(&self) -> Result<()>;

    /// Advances the round counter and resets the turn pointer to the top.
    async fn next_round(&self) -> Result<()>;

    async fn set_turn(&self, turn: usize) -> Result<()>;

    /// Stores new initiative values and re-sorts the turn order.
    async fn reroll_initiative(&self, rolls: Vec<InitiativeRoll>) -> Result<()>;

    /// Resolves once the order rebuilt by the last re-roll is observable.
    async fn turn_order_settled(&self) -> Result<()>;

    async fn actor(&self, id: ActorId) -> Result<ActorState>;

    /// Writes an actor record back in a single update.
    async fn update_actor(&self, actor: ActorState) -> Result<()>;

    /// Applies the defeated status marker and removes the actor from combat.
    async fn mark_defeated(&self, id: ActorId) -> Result<()>;

    async fn flag(&self, actor: ActorId, scope: &str, key: &str)
    -> Result<Option<serde_json::Value>>;

    async fn set_flag(
        &self,
        actor: ActorId,
        scope: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()>;

    /// Whether `actor` currently takes part in the encounter.
    async fn in_combat(&self, actor: ActorId) -> Result<bool> {
        Ok(self.combatants().await?.iter().any(|c| c.actor == actor))
    }
}

/// Dice oracle.
#[async_trait]
pub trait RollEvaluator: Send + Sync {
    async fn evaluate(&self, formula: &str, ctx: &RollContext) -> Result<Roll>;
}

/// Chat message posted on behalf of a speaker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub speaker: String,
    pub text: String,
}

impl Announcement {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Message from the system rather than an actor.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Self::SYSTEM_SPEAKER, text)
    }

    pub const SYSTEM_SPEAKER: &'static str = "Game System";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    /// `None` for failures that are never shown.
    pub fn for_severity(severity: ErrorSeverity) -> Option<Self> {
        match severity {
            ErrorSeverity::Warning => Some(Self::Warning),
            ErrorSeverity::Error => Some(Self::Error),
            ErrorSeverity::Guarded => None,
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Transient notification shown to the acting user only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Output side of the host: chat and notices.
#[async_trait]
pub trait AnnouncementSink: Send + Sync {
    async fn announce(&self, announcement: Announcement);

    async fn notify(&self, notice: Notice);
}

/// The three collaborators, shared by every service.
#[derive(Clone)]
pub struct Collaborators {
    pub host: Arc<dyn CombatHost>,
    pub dice: Arc<dyn RollEvaluator>,
    pub sink: Arc<dyn AnnouncementSink>,
}

impl Collaborators {
    pub fn new(
        host: Arc<dyn CombatHost>,
        dice: Arc<dyn RollEvaluator>,
        sink: Arc<dyn AnnouncementSink>,
    ) -> Self {
        Self { host, dice, sink }
    }

    /// Shows a failure to the user according to its severity.
    ///
    /// Guarded failures are only traced.
    pub async fn report(&self, error: &super::RuntimeError) {
        match NoticeLevel::for_severity(error.severity()) {
            Some(level) => {
                tracing::warn!(code = error.error_code(), %error, "action aborted");
                self.sink
                    .notify(Notice {
                        level,
                        text: error.to_string(),
                    })
                    .await;
            }
            None => tracing::debug!(code = error.error_code(), %error, "guarded failure"),
        }
    }
}
