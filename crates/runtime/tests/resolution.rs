use std::sync::Arc;

use palladium_core::{
    ActorId, ActorState, AttackCard, DamageCard, DamageEntry, DefenseKind, DefensivePools,
    ErrorSeverity, ItemId, Maneuver, Pool, Power, PowerCard, Rated, TargetType, Weapon,
};
use palladium_runtime::{
    ActionContext, CombatEvent, Collaborators, DiceRoller, Event, MemoryEncounter, NoticeLevel,
    PowerUse, RecordingSink, Resolution, ResolutionAction, Runtime, Topic,
};

const RAGNAR: ActorId = ActorId(1);
const ORC: ActorId = ActorId(2);
const SWORD: ItemId = ItemId(10);
const RIFLE: ItemId = ItemId(11);
const MIND_BOLT: ItemId = ItemId(20);

struct Table {
    runtime: Runtime,
    encounter: Arc<MemoryEncounter>,
    sink: Arc<RecordingSink>,
}

fn ragnar() -> ActorState {
    let mut actor = ActorState::new(RAGNAR, "Ragnar").with_actions(2);
    actor.pools.health = Pool::full(30);
    actor
        .maneuvers
        .insert("strike".into(), Rated::new("Strike", 2));
    actor.weapons.push(Weapon {
        id: SWORD,
        name: "Longsword".into(),
        maneuver: Maneuver::Strike,
        damage_formula: "2d6".into(),
    });
    actor.weapons.push(Weapon {
        id: RIFLE,
        name: "Rifle".into(),
        maneuver: Maneuver::Sniper,
        damage_formula: "4d6".into(),
    });
    actor.powers.push(Power {
        id: MIND_BOLT,
        name: "Mind Bolt".into(),
        action_cost: 2,
        save_type: Some("psionic".into()),
        save_dc: 12,
        damage_formula: Some("3d6".into()),
        ..Power::default()
    });
    actor
}

fn orc(pools: DefensivePools) -> ActorState {
    let mut actor = ActorState::new(ORC, "Orc").with_actions(2).with_pools(pools);
    actor.defenses.dodge = 4;
    actor.saves.insert("psionic".into(), Rated::new("Psionic Save", 3));
    actor
}

fn armored() -> DefensivePools {
    DefensivePools {
        worn_armor_rating: 12,
        worn_armor_sdc: Pool::full(5),
        natural_armor_rating: 6,
        character_sdc: Pool::full(10),
        health: Pool::full(20),
    }
}

fn table(defender: DefensivePools, dice: impl Into<Vec<u32>>) -> Table {
    let mut runtime = Runtime::builder().build();
    let encounter = Arc::new(MemoryEncounter::new(runtime.handle()));
    let sink = Arc::new(RecordingSink::new());
    encounter.add_actor(ragnar());
    encounter.add_actor(orc(defender));
    runtime
        .start(Collaborators::new(
            encounter.clone(),
            Arc::new(DiceRoller::scripted(dice)),
            sink.clone(),
        ))
        .unwrap();
    Table {
        runtime,
        encounter,
        sink,
    }
}

fn at_orc() -> ActionContext {
    ActionContext::new("gm").targeting(ORC)
}

fn card(target_type: TargetType, attack_roll_total: i32) -> AttackCard {
    AttackCard {
        attacker: RAGNAR,
        target: ORC,
        weapon_name: "Longsword".into(),
        damage_formula: "2d6".into(),
        maneuver: Maneuver::Strike,
        target_type,
        attack_roll_total,
    }
}

#[tokio::test]
async fn armor_hit_only_damages_worn_armor() {
    let table = table(armored(), [15]);
    let attacks = table.runtime.attacks().unwrap();

    let report = attacks
        .weapon_attack(RAGNAR, SWORD, &at_orc(), None)
        .await
        .unwrap();
    assert_eq!(report.roll.total, 17);
    assert!(report.outcome.is_hit);
    assert!(table.sink.texts()[0].ends_with("HIT!"));
    let attack = report.card.expect("a hit posts a card");
    assert_eq!(attack.target_type, TargetType::ArmorHit);

    let resolution = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::ApplyDamage {
                attack,
                damage: DamageCard::from_total(20),
                half: false,
            },
            &at_orc(),
        )
        .await
        .unwrap();

    let Resolution::Damage(applied) = resolution else {
        panic!("expected damage, got {resolution:?}");
    };
    assert!(!applied[0].defeated);

    let orc = table.encounter.actor_state(ORC).unwrap();
    assert_eq!(orc.pools.worn_armor_sdc.value, 0);
    assert_eq!(orc.pools.character_sdc.value, 10);
    assert_eq!(orc.pools.health.value, 20);

    let log = table.sink.announcements().pop().unwrap();
    assert_eq!(log.speaker, "Game System");
    assert_eq!(
        log.text,
        "Applying 20 damage to Orc...\n- Attack hits Worn Armor.\n- 5 damage to armor SDC only."
    );
}

#[tokio::test]
async fn clean_hit_at_natural_armor_is_stopped() {
    let pools = DefensivePools {
        natural_armor_rating: 15,
        character_sdc: Pool::full(10),
        health: Pool::full(20),
        ..DefensivePools::default()
    };
    let table = table(pools, [13]);

    let report = table
        .runtime
        .attacks()
        .unwrap()
        .weapon_attack(RAGNAR, SWORD, &at_orc(), Some(TargetType::CleanHit))
        .await
        .unwrap();
    assert_eq!(report.roll.total, 15);
    let attack = report.card.unwrap();

    let resolution = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::ApplyDamage {
                attack,
                damage: DamageCard::from_total(8),
                half: false,
            },
            &at_orc(),
        )
        .await
        .unwrap();

    let Resolution::Damage(applied) = resolution else {
        panic!("expected damage");
    };
    assert!(applied[0].report.is_noop());
    assert!(
        applied[0]
            .report
            .entries
            .contains(&DamageEntry::StoppedByNaturalArmor)
    );
    assert_eq!(table.encounter.actor_state(ORC).unwrap().pools, pools);
}

#[tokio::test]
async fn clean_hit_spills_from_sdc_into_health() {
    let pools = DefensivePools {
        natural_armor_rating: 6,
        character_sdc: Pool::full(10),
        health: Pool::full(20),
        ..DefensivePools::default()
    };
    let table = table(pools, [1]);

    table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::ApplyDamage {
                attack: card(TargetType::CleanHit, 17),
                damage: DamageCard::from_total(15),
                half: false,
            },
            &ActionContext::new("gm"),
        )
        .await
        .unwrap();

    let orc = table.encounter.actor_state(ORC).unwrap();
    assert_eq!(orc.pools.character_sdc.value, 0);
    assert_eq!(orc.pools.health.value, 15);
}

#[tokio::test]
async fn ranged_attack_below_floor_misses() {
    let table = table(DefensivePools::default(), [5]);

    let report = table
        .runtime
        .attacks()
        .unwrap()
        .weapon_attack(RAGNAR, RIFLE, &at_orc(), None)
        .await
        .unwrap();

    assert!(!report.outcome.is_hit);
    assert!(report.card.is_none());
    assert!(
        table.sink.texts()[0].ends_with("MISS! (failed min. roll of 8)"),
        "{:?}",
        table.sink.texts()
    );
}

#[tokio::test]
async fn aimed_shot_flag_adds_to_attack() {
    let table = table(armored(), [10]);
    let attacks = table.runtime.attacks().unwrap();
    attacks.set_aimed_shot(RAGNAR, true).await.unwrap();

    let report = attacks
        .weapon_attack(RAGNAR, SWORD, &at_orc(), None)
        .await
        .unwrap();
    // 10 + strike 2 + aimed 3
    assert_eq!(report.roll.total, 15);
}

#[tokio::test]
async fn attack_without_target_is_a_warning() {
    let table = table(armored(), [10]);

    let err = table
        .runtime
        .attacks()
        .unwrap()
        .weapon_attack(RAGNAR, SWORD, &ActionContext::new("gm"), None)
        .await
        .unwrap_err();

    assert_eq!(err.severity(), ErrorSeverity::Warning);
    assert_eq!(err.to_string(), "Please target a token.");
    assert!(table.sink.announcements().is_empty());
}

#[tokio::test]
async fn dodge_against_sniper_takes_penalty() {
    let table = table(armored(), [10]);
    let mut attack = card(TargetType::ArmorHit, 17);
    attack.maneuver = Maneuver::Sniper;

    let resolution = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::RollDefense {
                attack,
                defense: DefenseKind::Dodge,
            },
            &ActionContext::new("gm"),
        )
        .await
        .unwrap();

    let Resolution::Defense(check) = resolution else {
        panic!("expected a defense check");
    };
    // 10 + dodge 4 - 10
    assert_eq!(check.roll_total, 4);
    assert!(!check.success);
    let text = &table.sink.texts()[0];
    assert!(text.starts_with("Orc attempts to dodge! Target DC: 17."));
    assert!(text.contains("-10 penalty vs. Ranged Attack"));
    assert!(text.ends_with("FAILURE!"));
}

#[tokio::test]
async fn power_damage_defeats_once() {
    let pools = DefensivePools {
        health: Pool::new(3, 20),
        ..DefensivePools::default()
    };
    let table = table(pools, [1]);
    let mut combat = table.runtime.subscribe(Topic::Combat);
    let resolutions = table.runtime.resolutions().unwrap();
    let ctx = ActionContext::new("gm").controlling(ORC);
    let action = ResolutionAction::ApplyPowerDamage {
        damage: DamageCard::from_total(10),
        half: false,
    };

    let first = resolutions.resolve(action.clone(), &ctx).await.unwrap();
    let Resolution::Damage(applied) = first else {
        panic!("expected damage");
    };
    assert!(applied[0].defeated);

    let orc = table.encounter.actor_state(ORC).unwrap();
    assert_eq!(orc.pools.health.value, 0);
    assert!(orc.is_defeated());
    match combat.try_recv().unwrap() {
        Event::Combat(CombatEvent::Defeated { actor, name }) => {
            assert_eq!(actor, ORC);
            assert_eq!(name, "Orc");
        }
        other => panic!("unexpected event {other:?}"),
    }

    resolutions.resolve(action, &ctx).await.unwrap();
    let defeats = table
        .sink
        .texts()
        .iter()
        .filter(|text| text.as_str() == "Orc has been defeated!")
        .count();
    assert_eq!(defeats, 1);
}

#[tokio::test]
async fn power_damage_needs_a_selection() {
    let table = table(armored(), [1]);
    let err = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::ApplyPowerDamage {
                damage: DamageCard::from_total(10),
                half: true,
            },
            &ActionContext::new("gm"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please select token(s) to apply damage to.");
    assert_eq!(table.encounter.actor_state(ORC).unwrap().pools, armored());
}

#[tokio::test]
async fn power_damage_goes_through_every_layer() {
    let table = table(armored(), [1]);
    table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::ApplyPowerDamage {
                damage: DamageCard::from_total(18),
                half: false,
            },
            &ActionContext::new("gm").controlling(ORC),
        )
        .await
        .unwrap();

    let orc = table.encounter.actor_state(ORC).unwrap();
    assert_eq!(orc.pools.worn_armor_sdc.value, 0);
    assert_eq!(orc.pools.character_sdc.value, 0);
    assert_eq!(orc.pools.health.value, 17);
}

#[tokio::test]
async fn negligible_direct_damage_only_informs() {
    let table = table(armored(), [1]);
    let mut attack = card(TargetType::CleanHit, 17);
    attack.damage_formula = "1".into();

    let resolution = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::RollApplyHpDamage(attack),
            &ActionContext::new("gm"),
        )
        .await
        .unwrap();

    assert_eq!(resolution, Resolution::Nothing);
    let notices = table.sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(
        notices[0].text,
        "Half damage was less than 1, no HP damage taken."
    );
    assert_eq!(table.encounter.actor_state(ORC).unwrap().pools, armored());
}

#[tokio::test]
async fn direct_damage_bypasses_sdc() {
    let table = table(armored(), [5, 4]);

    table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::RollApplyHpDamage(card(TargetType::CleanHit, 17)),
            &ActionContext::new("gm"),
        )
        .await
        .unwrap();

    let orc = table.encounter.actor_state(ORC).unwrap();
    // 2d6 = 9, half rounds down
    assert_eq!(orc.pools.health.value, 16);
    assert_eq!(orc.pools.character_sdc.value, 10);
    assert_eq!(orc.pools.worn_armor_sdc.value, 5);
}

#[tokio::test]
async fn power_in_combat_without_actions_is_refused() {
    let table = table(armored(), [10]);
    let mut tired = ragnar();
    tired.actions.value = 1;
    table.encounter.add_combatant(tired);

    let used = table
        .runtime
        .powers()
        .unwrap()
        .use_power(RAGNAR, MIND_BOLT)
        .await
        .unwrap();

    assert_eq!(
        used,
        PowerUse::NotEnoughActions {
            available: 1,
            required: 2
        }
    );
    assert_eq!(
        table.sink.texts(),
        vec![
            "Ragnar is trying to use Mind Bolt and does not have enough actions. They have: 1 and need: 2."
                .to_owned()
        ]
    );
    assert_eq!(table.encounter.actor_state(RAGNAR).unwrap().actions.value, 1);
}

#[tokio::test]
async fn power_in_combat_pays_its_cost() {
    let table = table(armored(), [10]);
    table.encounter.add_combatant(ragnar());

    let used = table
        .runtime
        .powers()
        .unwrap()
        .use_power(RAGNAR, MIND_BOLT)
        .await
        .unwrap();

    let PowerUse::Posted(card) = used else {
        panic!("expected a posted power");
    };
    assert!(card.offers_save());
    assert!(card.deals_damage());
    assert_eq!(table.encounter.actor_state(RAGNAR).unwrap().actions.value, 0);
}

#[tokio::test]
async fn power_out_of_combat_is_free() {
    let table = table(armored(), [10]);
    let used = table
        .runtime
        .powers()
        .unwrap()
        .use_power(RAGNAR, MIND_BOLT)
        .await
        .unwrap();

    assert!(matches!(used, PowerUse::Posted(_)));
    assert_eq!(table.encounter.actor_state(RAGNAR).unwrap().actions.value, 2);
}

#[tokio::test]
async fn power_saves_roll_for_each_selected_token() {
    let table = table(armored(), [10]);
    let power = PowerCard {
        user: RAGNAR,
        power_name: "Mind Bolt".into(),
        save_type: Some("psionic".into()),
        save_dc: 12,
        damage_formula: None,
    };

    let err = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::RollPowerSave(power.clone()),
            &ActionContext::new("gm"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please select a token to roll the save.");

    let resolution = table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::RollPowerSave(power),
            &ActionContext::new("gm").controlling(ORC),
        )
        .await
        .unwrap();
    let Resolution::Saves(saves) = resolution else {
        panic!("expected saves");
    };
    assert_eq!(saves.len(), 1);
    // 10 + psionic 3 vs DC 12
    assert_eq!(saves[0].1.roll_total, 13);
    assert!(saves[0].1.success);
    assert!(table.sink.texts()[0].ends_with("SAVE SUCCESSFUL"));
}

#[tokio::test]
async fn defeated_combatant_leaves_the_encounter() {
    let pools = DefensivePools {
        health: Pool::new(2, 20),
        ..DefensivePools::default()
    };
    let table = table(pools, [10]);
    table.encounter.add_combatant(ragnar());
    table.encounter.add_combatant(orc(pools));

    table
        .runtime
        .resolutions()
        .unwrap()
        .resolve(
            ResolutionAction::ApplyDamage {
                attack: card(TargetType::CleanHit, 17),
                damage: DamageCard::from_total(6),
                half: false,
            },
            &ActionContext::new("gm"),
        )
        .await
        .unwrap();

    let combatants =
        palladium_runtime::CombatHost::combatants(table.encounter.as_ref())
            .await
            .unwrap();
    assert_eq!(combatants.len(), 1);
    assert_eq!(combatants[0].actor, RAGNAR);
}
