//! Data-driven content for the Palladium rules engine.
//!
//! This crate provides loaders for the files a table ships with:
//! - Rules configuration (TOML)
//! - Rosters of characters, NPCs and effect items (RON)
//!
//! Content is handed to the runtime's host at startup; it never changes
//! during an encounter.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, Roster, RosterLoader};
