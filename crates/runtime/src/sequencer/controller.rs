use std::sync::Arc;

use palladium_core::CombatChange;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use super::{RoundInitializer, TurnSequencer};
use crate::api::Collaborators;
use crate::api::handle::Backlog;

/// Drains the notification queue, one change at a time.
///
/// A change that moves the round goes to the [`RoundInitializer`] first and
/// then to the [`TurnSequencer`]; plain turn changes only to the latter.
/// Failures are reported to the user and never stop the loop.
pub struct CombatController {
    rounds: RoundInitializer,
    turns: TurnSequencer,
    collaborators: Collaborators,
    notify_rx: mpsc::Receiver<CombatChange>,
    backlog: Arc<Backlog>,
}

impl CombatController {
    pub(crate) fn new(
        rounds: RoundInitializer,
        turns: TurnSequencer,
        collaborators: Collaborators,
        notify_rx: mpsc::Receiver<CombatChange>,
        backlog: Arc<Backlog>,
    ) -> Self {
        Self {
            rounds,
            turns,
            collaborators,
            notify_rx,
            backlog,
        }
    }

    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        debug!("combat controller started");
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                received = self.notify_rx.recv() => match received {
                    Some(change) => {
                        self.process(&change).await;
                        self.backlog.pop();
                    }
                    None => break,
                },
            }
        }
        debug!("combat controller stopped");
    }

    async fn process(&self, change: &CombatChange) {
        trace!(?change, "processing combat change");

        if change.touches_round() {
            match self.rounds.on_round_changed(change).await {
                Ok(outcome) => debug!(?outcome, "round notification handled"),
                Err(error) => self.collaborators.report(&error).await,
            }
        }

        match self.turns.on_combat_updated(change).await {
            Ok(outcome) => debug!(?outcome, "turn notification handled"),
            Err(error) => self.collaborators.report(&error).await,
        }
    }
}
