//! In-memory [`CombatHost`] for tests, demos and headless play.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use palladium_core::{
    ActorId, ActorState, CombatChange, Combatant, CombatantId, RulesConfig,
};
use tracing::{debug, warn};

use crate::api::{CombatHandle, CombatHost, InitiativeRoll, Result, RuntimeError};

#[derive(Clone, Debug)]
struct Entry {
    id: CombatantId,
    actor: ActorId,
    initiative: Option<i32>,
}

#[derive(Debug, Default)]
struct Encounter {
    actors: BTreeMap<ActorId, ActorState>,
    order: Vec<Entry>,
    round: u32,
    turn: Option<usize>,
    flags: HashMap<(ActorId, String, String), serde_json::Value>,
    next_combatant: u32,
}

impl Encounter {
    fn combatants(&self) -> Vec<Combatant> {
        self.order
            .iter()
            .filter_map(|entry| {
                let actor = self.actors.get(&entry.actor)?;
                Some(Combatant {
                    id: entry.id,
                    actor: entry.actor,
                    name: actor.name.clone(),
                    initiative: entry.initiative,
                    actions: actor.actions,
                })
            })
            .collect()
    }

    /// Highest initiative first; unrolled combatants last; ties by join order.
    fn sort(&mut self) {
        self.order.sort_by(|a, b| {
            b.initiative
                .cmp(&a.initiative)
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    fn top(&self) -> Option<usize> {
        (!self.order.is_empty()).then_some(0)
    }
}

/// Round counter, turn pointer and actor records kept in memory.
///
/// Every mutator that actually moves the round or turn queues a
/// [`CombatChange`] through the [`CombatHandle`] without waiting, so it is
/// safe to call from inside the combat controller.
pub struct MemoryEncounter {
    inner: Mutex<Encounter>,
    handle: CombatHandle,
    settle_delay: Option<Duration>,
}

impl MemoryEncounter {
    pub fn new(handle: CombatHandle) -> Self {
        Self {
            inner: Mutex::new(Encounter::default()),
            handle,
            settle_delay: None,
        }
    }

    /// Delays [`CombatHost::turn_order_settled`], imitating a host that
    /// rebuilds its turn order asynchronously.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    fn state(&self) -> MutexGuard<'_, Encounter> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an actor without adding it to combat.
    pub fn add_actor(&self, actor: ActorState) {
        self.state().actors.insert(actor.id, actor);
    }

    /// Registers `actor` and adds it to the encounter.
    pub fn add_combatant(&self, actor: ActorState) -> CombatantId {
        let mut state = self.state();
        state.next_combatant += 1;
        let id = CombatantId(state.next_combatant);
        state.order.push(Entry {
            id,
            actor: actor.id,
            initiative: None,
        });
        state.actors.insert(actor.id, actor);
        id
    }

    /// Starts round one at the top of the order.
    pub fn begin(&self) -> Result<()> {
        let change = {
            let mut state = self.state();
            let top = state.top();
            Self::move_to(&mut state, 1, top)
        };
        self.emit(change)
    }

    /// Current copy of an actor record, if known.
    pub fn actor_state(&self, id: ActorId) -> Option<ActorState> {
        self.state().actors.get(&id).cloned()
    }

    pub fn current_round(&self) -> u32 {
        self.state().round
    }

    pub fn current_combatant(&self) -> Option<Combatant> {
        let state = self.state();
        let turn = state.turn?;
        state.combatants().into_iter().nth(turn)
    }

    /// Moves the pointer and returns the notification describing the move, if any.
    fn move_to(state: &mut Encounter, round: u32, turn: Option<usize>) -> Option<CombatChange> {
        let change = if round != state.round {
            Some(CombatChange::round(round, turn))
        } else if turn != state.turn {
            Some(CombatChange::turn(round, turn))
        } else {
            None
        };
        state.round = round;
        state.turn = turn;
        change
    }

    fn emit(&self, change: Option<CombatChange>) -> Result<()> {
        let Some(change) = change else {
            return Ok(());
        };
        debug!(?change, "encounter moved");
        self.handle.try_notify(change).inspect_err(|error| {
            warn!(%error, ?change, "combat change notification dropped");
        })
    }

    fn advance(state: &mut Encounter) -> Option<CombatChange> {
        let next = state.turn.map_or(0, |turn| turn + 1);
        if next >= state.order.len() {
            let top = state.top();
            let round = state.round + 1;
            Self::move_to(state, round, top)
        } else {
            let round = state.round;
            Self::move_to(state, round, Some(next))
        }
    }
}

#[async_trait]
impl CombatHost for MemoryEncounter {
    async fn combatants(&self) -> Result<Vec<Combatant>> {
        Ok(self.state().combatants())
    }

    async fn round(&self) -> Result<u32> {
        Ok(self.state().round)
    }

    async fn turn(&self) -> Result<Option<usize>> {
        Ok(self.state().turn)
    }

    async fn next_turn(&self) -> Result<()> {
        let change = Self::advance(&mut self.state());
        self.emit(change)
    }

    async fn next_round(&self) -> Result<()> {
        let change = {
            let mut state = self.state();
            let round = state.round + 1;
            let top = state.top();
            Self::move_to(&mut state, round, top)
        };
        self.emit(change)
    }

    async fn set_turn(&self, turn: usize) -> Result<()> {
        let change = {
            let mut state = self.state();
            if turn >= state.order.len() {
                return Err(RuntimeError::host(
                    "set_turn",
                    format!("turn {turn} is out of range"),
                ));
            }
            let round = state.round;
            Self::move_to(&mut state, round, Some(turn))
        };
        self.emit(change)
    }

    async fn reroll_initiative(&self, rolls: Vec<InitiativeRoll>) -> Result<()> {
        let mut state = self.state();
        for roll in rolls {
            if let Some(entry) = state.order.iter_mut().find(|e| e.id == roll.combatant) {
                entry.initiative = Some(roll.total);
            }
        }
        state.sort();
        Ok(())
    }

    async fn turn_order_settled(&self) -> Result<()> {
        if let Some(delay) = self.settle_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn actor(&self, id: ActorId) -> Result<ActorState> {
        self.state()
            .actors
            .get(&id)
            .cloned()
            .ok_or_else(|| RuntimeError::actor_not_found(id))
    }

    async fn update_actor(&self, actor: ActorState) -> Result<()> {
        let mut state = self.state();
        match state.actors.get_mut(&actor.id) {
            Some(slot) => {
                *slot = actor;
                Ok(())
            }
            None => Err(RuntimeError::actor_not_found(actor.id)),
        }
    }

    async fn mark_defeated(&self, id: ActorId) -> Result<()> {
        let change = {
            let mut state = self.state();
            let actor = state
                .actors
                .get_mut(&id)
                .ok_or_else(|| RuntimeError::actor_not_found(id))?;
            actor
                .statuses
                .insert(RulesConfig::DEFEATED_STATUS.to_owned());

            let Some(index) = state.order.iter().position(|e| e.actor == id) else {
                return Ok(());
            };
            state.order.remove(index);
            debug!(actor = %id, index, "defeated combatant removed");

            let round = state.round;
            let current = state.turn;
            match current {
                _ if state.order.is_empty() => Self::move_to(&mut state, round, None),
                Some(turn) if index < turn => {
                    // Same combatant keeps acting; the index shifts silently.
                    state.turn = Some(turn - 1);
                    None
                }
                Some(turn) if index == turn && turn >= state.order.len() => {
                    let top = state.top();
                    Self::move_to(&mut state, round + 1, top)
                }
                // The next combatant slid into the acting slot.
                Some(turn) if index == turn => Some(CombatChange::turn(round, Some(turn))),
                _ => None,
            }
        };
        self.emit(change)
    }

    async fn flag(
        &self,
        actor: ActorId,
        scope: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>> {
        Ok(self
            .state()
            .flags
            .get(&(actor, scope.to_owned(), key.to_owned()))
            .cloned())
    }

    async fn set_flag(
        &self,
        actor: ActorId,
        scope: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        self.state()
            .flags
            .insert((actor, scope.to_owned(), key.to_owned()), value);
        Ok(())
    }
}
