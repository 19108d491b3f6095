//! Turn-order decisions.
//!
//! The engine never moves the turn pointer itself. Given the host's ordered
//! combatants and current pointer it decides what the sequencer should do
//! next; the runtime carries the decision out through the host.

pub mod turns;

pub use turns::{TurnDecision, all_exhausted, decide_turn, leading_exhausted};
