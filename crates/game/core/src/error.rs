//! Common error infrastructure for palladium-core.
//!
//! Domain-specific errors (e.g. `FormulaError`, `ResourceError`) are defined in
//! their respective modules. Each implements [`RulesError`] so the runtime can
//! route every failure to the right kind of user notice without matching on
//! concrete types.

use crate::state::{ActorId, ItemId};

/// How a failure is surfaced to the user.
///
/// - **Warning**: invalid user input (no target, not enough actions); nothing changed
/// - **Error**: a referenced actor, item or effect no longer exists
/// - **Guarded**: an invariant would have been broken and was clamped or skipped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Warning,
    Error,
    Guarded,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Guarded => "guarded",
        }
    }

    /// Guarded failures are never shown to the user.
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Guarded)
    }
}

/// Common trait for all palladium-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by how the user should be told, not by impact
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant (metrics, tests).
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A referenced record no longer exists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("item {item} not found on actor {actor}")]
    ItemNotFound { actor: ActorId, item: ItemId },
}

impl RulesError for LookupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "LOOKUP_ACTOR_NOT_FOUND",
            Self::ItemNotFound { .. } => "LOOKUP_ITEM_NOT_FOUND",
        }
    }
}
