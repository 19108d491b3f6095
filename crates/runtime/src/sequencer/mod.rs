//! Combat turn and round sequencing.
//!
//! ```text
//! host write ──► CombatChange ──► mpsc queue ──► CombatController
//!                                                 ├─ RoundInitializer (round changed)
//!                                                 └─ TurnSequencer    (turn changed)
//! ```
//!
//! Both sequencers share one [`RoundLock`]. Acquiring it yields an RAII guard
//! that clears the flag on drop, so an early `?` return or a panic inside a
//! handler never leaves combat wedged.

mod controller;
mod round;
mod turn;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use palladium_core::{CombatChange, CombatRoundState, SequencerPhase};

pub use controller::CombatController;
pub use round::{RoundInitializer, RoundOutcome};
pub use turn::{TurnOutcome, TurnSequencer};

/// Why a notification was dropped without acting on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The change did not touch the field this handler reacts to.
    Irrelevant,
    /// An initiative re-roll is in progress.
    Rerolling,
    /// Another turn is being processed.
    Busy,
    /// The host has moved on since the notification was emitted.
    Stale,
}

/// Shared [`CombatRoundState`] behind a mutex.
///
/// The mutex is only held for flag flips, never across an await.
#[derive(Clone, Debug, Default)]
pub struct RoundLock {
    state: Arc<Mutex<CombatRoundState>>,
}

impl RoundLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CombatRoundState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> SequencerPhase {
        self.state().phase()
    }

    pub fn snapshot(&self) -> CombatRoundState {
        *self.state()
    }

    pub fn observe(&self, change: &CombatChange) {
        self.state().observe(change);
    }

    /// Enters `ProcessingTurn`, or returns why it cannot.
    pub fn try_turn(&self) -> Result<TurnGuard, IgnoreReason> {
        let mut state = self.state();
        if state.is_rerolling() {
            return Err(IgnoreReason::Rerolling);
        }
        if !state.try_begin_turn() {
            return Err(IgnoreReason::Busy);
        }
        Ok(TurnGuard { lock: self.clone() })
    }

    /// Enters `AwaitingReroll`, or `None` if a re-roll is already running.
    pub fn try_reroll(&self) -> Option<RerollGuard> {
        self.state()
            .try_begin_reroll()
            .then(|| RerollGuard { lock: self.clone() })
    }
}

/// Held while a turn notification is processed.
#[derive(Debug)]
pub struct TurnGuard {
    lock: RoundLock,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.lock.state().end_turn();
    }
}

/// Held while initiative is re-rolled and the new round fast-forwarded.
#[derive(Debug)]
pub struct RerollGuard {
    lock: RoundLock,
}

impl Drop for RerollGuard {
    fn drop(&mut self) {
        self.lock.state().end_reroll();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_release_on_drop() {
        let lock = RoundLock::new();
        {
            let _turn = lock.try_turn().unwrap();
            assert_eq!(lock.phase(), SequencerPhase::ProcessingTurn);
            assert_eq!(lock.try_turn().unwrap_err(), IgnoreReason::Busy);
        }
        assert_eq!(lock.phase(), SequencerPhase::Idle);

        let reroll = lock.try_reroll().unwrap();
        assert!(lock.try_reroll().is_none());
        assert_eq!(lock.try_turn().unwrap_err(), IgnoreReason::Rerolling);
        drop(reroll);
        assert!(lock.try_turn().is_ok());
    }

    #[test]
    fn guard_released_when_handler_panics() {
        let lock = RoundLock::new();
        let inner = lock.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.try_turn().unwrap();
            panic!("handler failed");
        });
        assert!(result.is_err());
        assert_eq!(lock.phase(), SequencerPhase::Idle);
    }
}
