//! Headless free-for-all: every combatant swings its first weapon at the
//! next combatant in the order until one is left standing.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use palladium_content::Roster;
use palladium_core::{CombatantId, ResourceKind};
use palladium_runtime::{
    ActionContext, BusSink, CombatEvent, CombatHost, Collaborators, DiceRoller, Event,
    MemoryEncounter, Resolution, ResolutionAction, Runtime, RuntimeConfig, Topic,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

/// How the skirmish ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub turns: usize,
    pub rounds: u32,
    pub standing: Vec<String>,
}

/// Chat, notices and combat events rendered as plain lines.
struct Transcript {
    receivers: Vec<broadcast::Receiver<Event>>,
    names: HashMap<CombatantId, String>,
}

impl Transcript {
    fn new(runtime: &Runtime) -> Self {
        Self {
            receivers: [Topic::Combat, Topic::Chat, Topic::Notice]
                .into_iter()
                .map(|topic| runtime.subscribe(topic))
                .collect(),
            names: HashMap::new(),
        }
    }

    fn render(&self, event: Event) -> Option<String> {
        Some(match event {
            Event::Chat(announcement) => format!("[{}] {}", announcement.speaker, announcement.text),
            Event::Notice(notice) => format!("({}) {}", notice.level, notice.text),
            Event::Combat(CombatEvent::RoundStarted { round }) => format!("== Round {round} =="),
            Event::Combat(CombatEvent::TurnStarted {
                combatant, actions, ..
            }) => format!("-- {} is up with {actions} action(s)", self.name(combatant)),
            Event::Combat(CombatEvent::TurnSkipped { combatant, .. }) => {
                format!("-- {} has no actions left", self.name(combatant))
            }
            Event::Combat(CombatEvent::ExchangeReset { .. }) => {
                "-- everyone is spent; actions are restored".to_owned()
            }
            Event::Combat(CombatEvent::Defeated { .. }) => return None,
        })
    }

    fn name(&self, combatant: CombatantId) -> &str {
        self.names
            .get(&combatant)
            .map_or("someone", String::as_str)
    }

    /// Writes everything published so far. Topics are drained in order, so
    /// combat lines come before the chat they triggered.
    fn drain(&mut self, out: &mut impl Write) -> Result<()> {
        for index in 0..self.receivers.len() {
            loop {
                let event = match self.receivers[index].try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(skipped, "transcript fell behind");
                        continue;
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                };
                if let Some(line) = self.render(event) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        Ok(())
    }
}

pub struct Skirmish {
    runtime: Runtime,
    encounter: Arc<MemoryEncounter>,
    transcript: Transcript,
}

impl Skirmish {
    /// Seats every roster actor and starts the runtime. Must run inside Tokio.
    pub fn start(config: RuntimeConfig, roster: Roster, dice: DiceRoller) -> Result<Self> {
        let mut runtime = Runtime::builder().config(config).build();
        let encounter = Arc::new(MemoryEncounter::new(runtime.handle()));
        let mut transcript = Transcript::new(&runtime);

        for actor in roster.actors {
            let name = actor.name.clone();
            let combatant = encounter.add_combatant(actor);
            transcript.names.insert(combatant, name);
        }
        info!(combatants = transcript.names.len(), "skirmish seated");

        let sink = Arc::new(BusSink::new(runtime.event_bus().clone()));
        runtime.start(Collaborators::new(encounter.clone(), Arc::new(dice), sink))?;

        Ok(Self {
            runtime,
            encounter,
            transcript,
        })
    }

    /// Plays until one combatant is left or `max_turns` turns were taken.
    pub async fn play(&mut self, max_turns: usize, out: &mut impl Write) -> Result<Summary> {
        let handle = self.runtime.handle();
        let attacks = self.runtime.attacks()?;
        let resolutions = self.runtime.resolutions()?;
        let sheets = self.runtime.sheets()?;

        self.encounter.begin()?;
        handle.idle().await;
        self.transcript.drain(out)?;

        let mut turns = 0;
        while turns < max_turns {
            let Some(current) = self.encounter.current_combatant() else {
                break;
            };
            let combatants = self.encounter.combatants().await?;
            let Some(target) = combatants
                .iter()
                .cycle()
                .skip_while(|c| c.id != current.id)
                .nth(1)
                .filter(|c| c.id != current.id)
            else {
                break;
            };

            let attacker = self
                .encounter
                .actor_state(current.actor)
                .with_context(|| format!("combatant {} has no actor", current.id))?;
            let ctx = ActionContext::new(&current.name).targeting(target.actor);

            match attacker.weapons.first() {
                Some(weapon) => {
                    let report = attacks
                        .weapon_attack(attacker.id, weapon.id, &ctx, None)
                        .await?;
                    if let Some(attack) = report.card {
                        let rolled = resolutions
                            .resolve(ResolutionAction::RollDamage(attack.clone()), &ctx)
                            .await?;
                        if let Resolution::DamageRolled { card, .. } = rolled {
                            resolutions
                                .resolve(
                                    ResolutionAction::ApplyDamage {
                                        attack,
                                        damage: card,
                                        half: false,
                                    },
                                    &ctx,
                                )
                                .await?;
                        }
                    }
                }
                None => info!(actor = %attacker.id, "no weapon, passing"),
            }

            sheets
                .adjust(attacker.id, ResourceKind::Actions, -1, false)
                .await?;
            self.encounter.next_turn().await?;
            handle.idle().await;
            self.transcript.drain(out)?;
            turns += 1;
        }

        let standing = self
            .encounter
            .combatants()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        Ok(Summary {
            turns,
            rounds: self.encounter.current_round(),
            standing,
        })
    }

    pub async fn finish(self) -> Result<()> {
        self.runtime.shutdown().await?;
        Ok(())
    }
}
