//! Unified error types surfaced by the runtime API.
//!
//! Wraps rules failures from palladium-core, host collaborator failures and
//! controller coordination so callers can map every failure to a user notice
//! through [`RuntimeError::severity`].
use palladium_core::{
    ActorId, DamageError, ErrorSeverity, FormulaError, LookupError, ResourceError, RulesError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Invalid or missing user input (no target, no token selected).
    #[error("{0}")]
    UserInput(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Damage(#[from] DamageError),

    #[error("host operation '{operation}' failed: {message}")]
    Host {
        operation: &'static str,
        message: String,
    },

    #[error("combat notification channel closed")]
    NotificationChannelClosed,

    #[error("combat notification queue is full")]
    NotificationQueueFull,

    #[error("combat controller task join failed")]
    ControllerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput(message.into())
    }

    pub fn actor_not_found(actor: ActorId) -> Self {
        Self::Lookup(LookupError::ActorNotFound(actor))
    }

    pub fn host(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Host {
            operation,
            message: message.into(),
        }
    }

    /// How this failure should be surfaced to the user.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UserInput(_) => ErrorSeverity::Warning,
            Self::Lookup(e) => e.severity(),
            Self::Formula(e) => e.severity(),
            Self::Resource(e) => e.severity(),
            Self::Damage(e) => e.severity(),
            Self::Host { .. }
            | Self::NotificationChannelClosed
            | Self::NotificationQueueFull
            | Self::ControllerJoin(_) => ErrorSeverity::Error,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserInput(_) => "RUNTIME_USER_INPUT",
            Self::Lookup(e) => e.error_code(),
            Self::Formula(e) => e.error_code(),
            Self::Resource(e) => e.error_code(),
            Self::Damage(e) => e.error_code(),
            Self::Host { .. } => "RUNTIME_HOST",
            Self::NotificationChannelClosed => "RUNTIME_NOTIFICATION_CLOSED",
            Self::NotificationQueueFull => "RUNTIME_NOTIFICATION_FULL",
            Self::ControllerJoin(_) => "RUNTIME_CONTROLLER_JOIN",
        }
    }
}
