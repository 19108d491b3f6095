//! Cloneable façade for feeding the combat controller.
//!
//! [`CombatHandle`] hides channel plumbing: hosts push combat-change
//! notifications through it and clients subscribe to event topics.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Notify, broadcast, mpsc};

use palladium_core::CombatChange;

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};

/// Count of queued or in-flight notifications.
#[derive(Debug, Default)]
pub(crate) struct Backlog {
    pending: AtomicUsize,
    drained: Notify,
}

impl Backlog {
    fn push(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    /// Undo a `push` whose send failed, or mark one notification processed.
    pub(crate) fn pop(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
    }

    async fn drained(&self) {
        loop {
            let drained = self.drained.notified();
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            drained.await;
        }
    }
}

/// Client-facing handle to the combat controller.
#[derive(Clone)]
pub struct CombatHandle {
    notify_tx: mpsc::Sender<CombatChange>,
    backlog: Arc<Backlog>,
    event_bus: EventBus,
}

impl CombatHandle {
    pub(crate) fn new(
        notify_tx: mpsc::Sender<CombatChange>,
        backlog: Arc<Backlog>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            notify_tx,
            backlog,
            event_bus,
        }
    }

    /// Queue a combat-state change for the controller.
    pub async fn notify(&self, change: CombatChange) -> Result<()> {
        self.backlog.push();
        self.notify_tx.send(change).await.map_err(|_| {
            self.backlog.pop();
            RuntimeError::NotificationChannelClosed
        })
    }

    /// Queue without waiting; fails when the queue is full.
    ///
    /// Hosts call this from inside controller-driven writes, where awaiting
    /// queue space would block the controller on itself.
    pub fn try_notify(&self, change: CombatChange) -> Result<()> {
        self.backlog.push();
        self.notify_tx.try_send(change).map_err(|e| {
            self.backlog.pop();
            match e {
                mpsc::error::TrySendError::Full(_) => RuntimeError::NotificationQueueFull,
                mpsc::error::TrySendError::Closed(_) => RuntimeError::NotificationChannelClosed,
            }
        })
    }

    /// Resolves once every queued notification, including the ones emitted
    /// while processing, has been handled.
    pub async fn idle(&self) {
        self.backlog.drained().await;
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Chat` - Announcements posted by the rules engine
    /// - `Topic::Notice` - Warnings and errors for the acting user
    /// - `Topic::Combat` - Round and turn transitions
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
