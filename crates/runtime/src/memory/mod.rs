//! In-memory collaborators.
//!
//! Enough of a host to run an encounter without a virtual tabletop: the
//! integration tests and the `palladium` binary are built on these.

mod dice;
mod encounter;
mod sink;

pub use dice::DiceRoller;
pub use encounter::MemoryEncounter;
pub use sink::{BusSink, RecordingSink};
