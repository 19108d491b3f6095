//! Handlers reacting to actor writes.
//!
//! Handlers run after a service has computed new actor state and are
//! responsible for writing it back and for any follow-up effects.

mod defeat;

pub use defeat::DefeatHandler;
