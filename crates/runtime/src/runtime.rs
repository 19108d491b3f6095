//! High-level runtime orchestrator.
//!
//! The runtime owns the combat controller task, wires up the notification
//! queue and event bus, and hands out services bound to the host's
//! collaborators.

use std::sync::Arc;
use std::time::Duration;

use palladium_core::{RulesConfig, SequencerPhase};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::handle::Backlog;
use crate::api::{CombatHandle, Collaborators, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::sequencer::{CombatController, RoundInitializer, RoundLock, TurnSequencer};
use crate::services::{AttackService, PowerService, ResolutionService, RollService, SheetService};

/// Runtime configuration shared across the orchestrator and services.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rules: RulesConfig,
    /// Upper bound on waiting for the host to rebuild its turn order.
    pub settle_timeout: Duration,
    pub notification_buffer: usize,
    pub event_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 250;

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    pub fn with_notification_buffer(mut self, size: usize) -> Self {
        self.notification_buffer = size;
        self
    }

    pub fn with_event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            settle_timeout: Duration::from_millis(Self::DEFAULT_SETTLE_TIMEOUT_MS),
            notification_buffer: 64,
            event_buffer_size: 100,
        }
    }
}

struct Running {
    collaborators: Collaborators,
    controller: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

/// Main runtime that drives combat sequencing.
///
/// Built in two steps because the host needs the [`CombatHandle`] to emit
/// notifications before the controller can be given the host:
///
/// ```ignore
/// let mut runtime = Runtime::builder().build();
/// let encounter = Arc::new(MemoryEncounter::new(runtime.handle()));
/// runtime.start(Collaborators::new(encounter, dice, sink))?;
/// ```
pub struct Runtime {
    config: RuntimeConfig,
    handle: CombatHandle,
    backlog: Arc<Backlog>,
    lock: RoundLock,
    notify_rx: Option<mpsc::Receiver<palladium_core::CombatChange>>,
    running: Option<Running>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> CombatHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        self.handle.event_bus()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn phase(&self) -> SequencerPhase {
        self.lock.phase()
    }

    /// Spawns the combat controller against the host's collaborators.
    ///
    /// Must be called from inside a Tokio runtime, at most once.
    pub fn start(&mut self, collaborators: Collaborators) -> Result<()> {
        let notify_rx = self
            .notify_rx
            .take()
            .ok_or(RuntimeError::NotificationChannelClosed)?;
        let events = self.event_bus().clone();

        let rounds = RoundInitializer::new(
            collaborators.clone(),
            self.lock.clone(),
            events.clone(),
            &self.config.rules,
            self.config.settle_timeout,
        );
        let turns = TurnSequencer::new(collaborators.clone(), self.lock.clone(), events);
        let controller = CombatController::new(
            rounds,
            turns,
            collaborators.clone(),
            notify_rx,
            Arc::clone(&self.backlog),
        );

        let (shutdown, shutdown_rx) = oneshot::channel();
        let controller = tokio::spawn(controller.run(shutdown_rx));
        info!("combat runtime started");

        self.running = Some(Running {
            collaborators,
            controller,
            shutdown,
        });
        Ok(())
    }

    fn collaborators(&self) -> Result<Collaborators> {
        self.running
            .as_ref()
            .map(|running| running.collaborators.clone())
            .ok_or_else(|| RuntimeError::host("services", "runtime has not been started"))
    }

    pub fn attacks(&self) -> Result<AttackService> {
        Ok(AttackService::new(
            self.collaborators()?,
            self.config.rules.clone(),
        ))
    }

    pub fn rolls(&self) -> Result<RollService> {
        Ok(RollService::new(self.collaborators()?))
    }

    pub fn powers(&self) -> Result<PowerService> {
        Ok(PowerService::new(self.collaborators()?))
    }

    pub fn sheets(&self) -> Result<SheetService> {
        Ok(SheetService::new(
            self.collaborators()?,
            self.config.rules.clone(),
        ))
    }

    pub fn resolutions(&self) -> Result<ResolutionService> {
        Ok(ResolutionService::new(
            self.collaborators()?,
            self.event_bus().clone(),
            self.config.rules.clone(),
        ))
    }

    /// Shutdown the runtime gracefully
    ///
    /// Notifications still queued are dropped.
    pub async fn shutdown(self) -> Result<()> {
        let Some(running) = self.running else {
            return Ok(());
        };
        // The controller may already have stopped on its own.
        let _ = running.shutdown.send(());
        running
            .controller
            .await
            .map_err(RuntimeError::ControllerJoin)?;
        info!("combat runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(mut self, rules: RulesConfig) -> Self {
        self.config.rules = rules;
        self
    }

    pub fn settle_timeout(mut self, timeout: Duration) -> Self {
        self.config.settle_timeout = timeout;
        self
    }

    pub fn build(self) -> Runtime {
        let (notify_tx, notify_rx) = mpsc::channel(self.config.notification_buffer.max(1));
        let backlog = Arc::new(Backlog::default());
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = CombatHandle::new(notify_tx, Arc::clone(&backlog), events);

        Runtime {
            config: self.config,
            handle,
            backlog,
            lock: RoundLock::new(),
            notify_rx: Some(notify_rx),
            running: None,
        }
    }
}
