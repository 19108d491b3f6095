//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate:
//! the collaborator traits a host implements, the user action context, and
//! the error type every service returns.

pub mod context;
pub mod errors;
pub mod handle;
pub mod providers;

pub use context::ActionContext;
pub use errors::{Result, RuntimeError};
pub use handle::CombatHandle;
pub use providers::{
    Announcement, AnnouncementSink, Collaborators, CombatHost, InitiativeRoll, Notice,
    NoticeLevel, RollEvaluator,
};
