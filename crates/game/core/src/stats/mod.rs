//! Derived character data.
//!
//! # Layers
//!
//! ```text
//! [ Sheet fields (level, IQ, skill base/growth) ]
//!      ↓
//! [ Skill totals ]            skills.rs
//! [ Effective penalties ]     effects.rs
//! [ Spendable resources ]     resources.rs
//! ```
//!
//! Skill totals and penalties are never stored authoritatively; they are
//! recomputed on every derived-data refresh.

pub mod effects;
pub mod resources;
pub mod skills;

pub use effects::{ActiveEffect, Penalties};
pub use resources::{
    ResourceError, ResourceKind, adjust_resource, reset_essentials, reset_sdc, spend_actions,
};
pub use skills::{compute_skill_total, compute_skill_total_capped, iq_bonus, prepare_skills};
