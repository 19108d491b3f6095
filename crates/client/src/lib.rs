//! Headless Palladium client.
//!
//! Composition root for the `palladium` binary: reads configuration from the
//! environment, installs logging, loads rules and roster content, and drives
//! an in-memory encounter through the runtime.
//!
//! ```text
//! ClientConfig ──→ ConfigLoader / RosterLoader (palladium-content)
//!       │
//!       └──→ Skirmish ──→ Runtime + MemoryEncounter + DiceRoller + BusSink
//! ```

pub mod config;
pub mod logging;
pub mod skirmish;

pub use config::ClientConfig;
pub use skirmish::{Skirmish, Summary};
