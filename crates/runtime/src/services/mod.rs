//! User-triggered operations.
//!
//! Each service reads actor records through the host, runs the pure rules
//! from palladium-core, posts the result to chat and writes changes back.
//! Services are cheap to clone; they share the same [`Collaborators`].
//!
//! [`Collaborators`]: crate::api::Collaborators

mod attack;
mod power;
mod resolution;
mod rolls;
mod sheet;

pub use attack::{AttackReport, AttackService};
pub use power::{PowerService, PowerUse};
pub use resolution::{AppliedDamage, Resolution, ResolutionAction, ResolutionService};
pub use rolls::RollService;
pub use sheet::SheetService;
