use std::sync::Arc;
use std::time::Duration;

use palladium_core::{ActorId, ActorState, CombatChange, Pool, ResourceKind, SequencerPhase};
use palladium_runtime::{
    CombatEvent, CombatHost, Collaborators, DiceRoller, Event, MemoryEncounter, RecordingSink,
    Runtime, Topic,
};

struct Table {
    runtime: Runtime,
    encounter: Arc<MemoryEncounter>,
    sink: Arc<RecordingSink>,
}

/// Every d20 comes up 10, so initiative order follows the initiative bonus.
fn table() -> Table {
    let mut runtime = Runtime::builder().build();
    let encounter = Arc::new(MemoryEncounter::new(runtime.handle()));
    let sink = Arc::new(RecordingSink::new());
    runtime
        .start(Collaborators::new(
            encounter.clone(),
            Arc::new(DiceRoller::scripted([10])),
            sink.clone(),
        ))
        .unwrap();
    Table {
        runtime,
        encounter,
        sink,
    }
}

fn fighter(id: u32, name: &str, initiative: i32, actions: i32) -> ActorState {
    let mut actor = ActorState::new(ActorId(id), name);
    actor.initiative = initiative;
    actor.actions = Pool::new(actions, 2);
    actor.pools.health = Pool::full(20);
    actor
}

fn count(texts: &[String], needle: &str) -> usize {
    texts.iter().filter(|text| text.contains(needle)).count()
}

#[tokio::test]
async fn exhausted_exchange_resets_once_under_repeated_notifications() {
    let table = table();
    let handle = table.runtime.handle();
    table.encounter.add_combatant(fighter(1, "Ragnar", 3, 0));
    table.encounter.add_combatant(fighter(2, "Orc", 2, 0));

    table.encounter.begin().unwrap();
    for _ in 0..3 {
        handle.notify(CombatChange::turn(1, Some(0))).await.unwrap();
    }
    handle.idle().await;

    let texts = table.sink.texts();
    assert_eq!(
        count(&texts, "All combatants have used their actions"),
        1,
        "{texts:#?}"
    );
    assert_eq!(table.encounter.current_round(), 2);
    for id in [1, 2] {
        let actor = table.encounter.actor_state(ActorId(id)).unwrap();
        assert_eq!(actor.actions.value, 2);
    }
    assert_eq!(
        texts.last().map(String::as_str),
        Some("It is now Ragnar's turn. Actions remaining: 2.")
    );
    assert_eq!(table.runtime.phase(), SequencerPhase::Idle);

    table.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn new_round_fast_forwards_past_exhausted_leaders() {
    let table = table();
    let mut combat = table.runtime.subscribe(Topic::Combat);
    table.encounter.add_combatant(fighter(1, "Ragnar", 5, 0));
    table.encounter.add_combatant(fighter(2, "Orc", 4, 0));
    let goblin = table.encounter.add_combatant(fighter(3, "Goblin", 3, 2));

    table.encounter.begin().unwrap();
    table.runtime.handle().idle().await;

    let texts = table.sink.texts();
    assert_eq!(count(&texts, "Ragnar has no actions remaining and is skipped."), 1);
    assert_eq!(count(&texts, "Orc has no actions remaining and is skipped."), 1);
    assert_eq!(count(&texts, "It is now Goblin's turn. Actions remaining: 2."), 1);
    assert_eq!(count(&texts, "initiative has been re-rolled"), 1);

    let current = table.encounter.current_combatant().unwrap();
    assert_eq!(current.id, goblin);
    assert_eq!(table.encounter.current_round(), 1);

    let mut seen = Vec::new();
    while let Ok(Event::Combat(event)) = combat.try_recv() {
        seen.push(event);
    }
    assert_eq!(seen.first(), Some(&CombatEvent::RoundStarted { round: 1 }));
    assert!(seen.contains(&CombatEvent::TurnStarted {
        round: 1,
        combatant: goblin,
        actions: 2,
    }));

    table.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn manual_round_advance_keeps_spent_actions() {
    let table = table();
    table.encounter.add_combatant(fighter(1, "Ragnar", 5, 2));
    let orc = table.encounter.add_combatant(fighter(2, "Orc", 4, 2));

    table.encounter.begin().unwrap();
    table.runtime.handle().idle().await;
    table
        .runtime
        .sheets()
        .unwrap()
        .adjust(ActorId(1), ResourceKind::Actions, -2, false)
        .await
        .unwrap();

    table.encounter.next_round().await.unwrap();
    table.runtime.handle().idle().await;

    assert_eq!(table.encounter.current_round(), 2);
    let ragnar = table.encounter.actor_state(ActorId(1)).unwrap();
    assert_eq!(ragnar.actions.value, 0);
    assert_eq!(table.encounter.current_combatant().unwrap().id, orc);

    let texts = table.sink.texts();
    assert_eq!(count(&texts, "initiative has been re-rolled"), 2);
    assert_eq!(count(&texts, "Ragnar has no actions remaining and is skipped."), 1);
    assert_eq!(
        texts.last().map(String::as_str),
        Some("It is now Orc's turn. Actions remaining: 2.")
    );

    table.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn initiative_reroll_orders_by_total() {
    let table = table();
    table.encounter.add_combatant(fighter(1, "Slow", 1, 2));
    table.encounter.add_combatant(fighter(2, "Quick", 9, 2));

    table.encounter.begin().unwrap();
    table.runtime.handle().idle().await;

    let current = table.encounter.current_combatant().unwrap();
    assert_eq!(current.name, "Quick");
    assert_eq!(current.initiative, Some(19));
    assert_eq!(
        table.sink.texts().last().map(String::as_str),
        Some("It is now Quick's turn. Actions remaining: 2.")
    );

    table.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn mid_round_turn_skips_exhausted_combatant() {
    let table = table();
    table.encounter.add_combatant(fighter(1, "Ragnar", 5, 2));
    table.encounter.add_combatant(fighter(2, "Orc", 4, 2));
    table.encounter.add_combatant(fighter(3, "Goblin", 3, 1));

    table.encounter.begin().unwrap();
    table.runtime.handle().idle().await;

    // The orc spends everything before its turn comes up.
    let mut orc = table.encounter.actor_state(ActorId(2)).unwrap();
    orc.actions.value = 0;
    palladium_runtime::CombatHost::update_actor(table.encounter.as_ref(), orc)
        .await
        .unwrap();
    table.sink.clear();

    palladium_runtime::CombatHost::next_turn(table.encounter.as_ref())
        .await
        .unwrap();
    table.runtime.handle().idle().await;

    assert_eq!(
        table.sink.texts(),
        vec![
            "Orc has no actions remaining and is skipped.".to_owned(),
            "It is now Goblin's turn. Actions remaining: 1.".to_owned(),
        ]
    );

    table.runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn slow_host_settle_is_bounded() {
    let mut runtime = Runtime::builder()
        .settle_timeout(Duration::from_millis(20))
        .build();
    let encounter = Arc::new(
        MemoryEncounter::new(runtime.handle()).with_settle_delay(Duration::from_secs(5)),
    );
    let sink = Arc::new(RecordingSink::new());
    runtime
        .start(Collaborators::new(
            encounter.clone(),
            Arc::new(DiceRoller::scripted([10])),
            sink.clone(),
        ))
        .unwrap();

    encounter.add_combatant(fighter(1, "Ragnar", 5, 0));
    encounter.add_combatant(fighter(2, "Orc", 4, 2));
    encounter.begin().unwrap();

    tokio::time::timeout(Duration::from_secs(2), runtime.handle().idle())
        .await
        .expect("controller should not wait for the slow host");

    assert_eq!(encounter.current_combatant().unwrap().name, "Orc");
    assert_eq!(runtime.phase(), SequencerPhase::Idle);
    runtime.shutdown().await.unwrap();
}
