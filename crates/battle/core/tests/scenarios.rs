mod common;

use battle_core::{
    Action, ActionError, ActionRequest, ActionTemplate, AiProfile, BattleContext, BattleEngine,
    BattleError, BattlePhase, BattleState, CombatEvent, CombatantId, DropEntry, FixedRng,
    Inventory, ItemBag, ItemId, OutcomeEvaluator, OutcomeKind, PcgRng, Predicate, ResolvedEffect,
    RewardTable, Rule, Side, SkillId, StatusEffect, StatusKind, TargetSelector, TemplateAction,
    TickEffect, write_back,
};
use common::*;

fn damage_dealt_to(state: &BattleState, target: CombatantId) -> Vec<(u32, bool)> {
    state
        .log
        .events()
        .filter_map(|event| match event {
            CombatEvent::ActionResolved(result) => Some(result),
            _ => None,
        })
        .flat_map(|result| result.outcomes.iter())
        .filter(|outcome| outcome.target == target)
        .filter_map(|outcome| match outcome.effect {
            ResolvedEffect::Damaged { amount, guarded, .. } => Some((amount, guarded)),
            _ => None,
        })
        .collect()
}

#[test]
fn two_attacks_down_a_ten_hp_enemy() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let mut state = BattleState::new(
        &encounter(vec![enemy("Slime", 10, 1, 2)]),
        &[hero(30, 6, 10)],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);

    assert_eq!(engine.start(&mut ctx), Ok(BattlePhase::AwaitingPlayerInput));
    assert_eq!(
        engine.submit(&mut ctx, &attack(0, 1)),
        Ok(BattlePhase::AwaitingPlayerInput)
    );
    assert_eq!(engine.state().combatants[1].hp(), 4);
    assert!(!engine.state().combatants[1].is_downed());

    assert_eq!(engine.submit(&mut ctx, &attack(0, 1)), Ok(BattlePhase::Victory));
    let slime = &engine.state().combatants[1];
    assert_eq!(slime.hp(), 0);
    assert!(slime.is_downed());

    // Victory fires right after the second attack: the round never reaches the slime.
    let last = engine.state().log.iter().last().expect("log entry");
    assert_eq!(last.round, 2);
    assert_eq!(
        last.event,
        CombatEvent::BattleEnded {
            outcome: OutcomeKind::Victory
        }
    );
    assert_eq!(
        engine.submit(&mut ctx, &attack(0, 1)),
        Err(BattleError::BattleOver)
    );
}

#[test]
fn guard_halves_the_next_hit_and_drops_on_the_next_turn() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let mut state = BattleState::new(
        &encounter(vec![enemy("Ogre", 50, 10, 2)]),
        &[hero(30, 4, 10)],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");

    assert_eq!(
        engine.submit(&mut ctx, &act(0, Action::Guard)),
        Ok(BattlePhase::AwaitingPlayerInput)
    );
    let state = engine.state();
    assert_eq!(damage_dealt_to(state, CombatantId(0)), vec![(5, true)]);
    assert_eq!(state.combatants[0].hp(), 25);
    assert!(!state.combatants[0].statuses.has(StatusKind::Guard));
    assert!(state.log.events().any(|event| *event
        == CombatEvent::GuardLowered {
            actor: CombatantId(0)
        }));
}

#[test]
fn talking_three_times_spares_the_last_enemy() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let shy = enemy("Shy Slime", 10, 1, 2).with_mercy_threshold(3);
    let mut state = BattleState::new(&encounter(vec![shy]), &[hero(30, 6, 10)], 1, &ctx.env)
        .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");

    let talk = ActionRequest::targeting(CombatantId(0), Action::Talk, CombatantId(1));
    assert_eq!(
        engine.submit(&mut ctx, &talk),
        Ok(BattlePhase::AwaitingPlayerInput)
    );
    assert_eq!(
        engine.submit(&mut ctx, &talk),
        Ok(BattlePhase::AwaitingPlayerInput)
    );
    assert_eq!(engine.submit(&mut ctx, &talk), Ok(BattlePhase::Spared));

    let slime = &engine.state().combatants[1];
    assert!(slime.spared);
    assert_eq!(slime.hp(), 10);
    assert_eq!(slime.morale, 3);
}

#[test]
fn fleeing_ends_the_battle_but_not_against_a_boss() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let mut state = BattleState::new(
        &encounter(vec![enemy("Slime", 10, 1, 2)]),
        &[hero(30, 6, 10)],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");
    assert_eq!(
        engine.submit(&mut ctx, &act(0, Action::Flee)),
        Ok(BattlePhase::Fled)
    );

    let mut state = BattleState::new(
        &boss(vec![enemy("Dragon", 500, 1, 2)]),
        &[hero(30, 6, 10)],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");
    assert_eq!(
        engine.submit(&mut ctx, &act(0, Action::Flee)),
        Ok(BattlePhase::AwaitingPlayerInput)
    );
    assert!(!engine.state().fled);
}

#[test]
fn rejected_actions_leave_the_battle_untouched() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let caster = hero(30, 6, 10)
        .with_actions([Action::Attack, Action::Skill("fire".into())])
        .with_sp(2);
    let mut state = BattleState::new(
        &encounter(vec![enemy("Slime", 10, 1, 2)]),
        &[caster],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");
    let before = engine.state().clone();

    let fire = ActionRequest::targeting(CombatantId(0), Action::Skill("fire".into()), CombatantId(1));
    assert!(matches!(
        engine.submit(&mut ctx, &fire),
        Err(BattleError::Action(ActionError::InsufficientSp {
            required: 4,
            available: 2
        }))
    ));
    assert!(matches!(
        engine.submit(&mut ctx, &attack(0, 0)),
        Err(BattleError::Action(ActionError::InvalidTarget(_)))
    ));
    let potion = ActionRequest::targeting(CombatantId(0), Action::Item("potion".into()), CombatantId(0));
    assert!(matches!(
        engine.submit(&mut ctx, &potion),
        Err(BattleError::Action(ActionError::ItemUnavailable(_)))
    ));
    assert_eq!(engine.state(), &before);

    // The same combatant can still act afterwards.
    assert_eq!(
        engine.submit(&mut ctx, &attack(0, 1)),
        Ok(BattlePhase::AwaitingPlayerInput)
    );
}

#[test]
fn items_are_consumed_from_the_inventory() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new().with("potion", 2);
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let wounded = hero(40, 6, 10).with_hp(10);
    let mut state = BattleState::new(
        &encounter(vec![enemy("Slime", 10, 1, 2)]),
        &[wounded],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");

    let potion = ActionRequest::targeting(CombatantId(0), Action::Item("potion".into()), CombatantId(0));
    engine.submit(&mut ctx, &potion).expect("potion accepted");
    // 10 + 20 healed, then 1 damage from the slime.
    assert_eq!(engine.state().combatants[0].hp(), 29);
    drop(engine);

    assert_eq!(bag.quantity(&ItemId::new("potion")), 1);
}

#[test]
fn poisoned_attacker_takes_damage_after_its_own_action() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let poisoned = hero(30, 6, 10).with_status(StatusEffect::new(StatusKind::Poison, 2, 4));
    let mut state = BattleState::new(
        &encounter(vec![enemy("Slime", 50, 0, 2)]),
        &[poisoned],
        1,
        &ctx.env,
    )
    .expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    engine.start(&mut ctx).expect("start");

    // Each round: 4 poison after the hero acts, then the slime's minimum 1.
    engine.submit(&mut ctx, &attack(0, 1)).expect("round 1");
    assert_eq!(engine.state().combatants[0].hp(), 25);
    engine.submit(&mut ctx, &attack(0, 1)).expect("round 2");
    assert_eq!(engine.state().combatants[0].hp(), 20);
    assert!(!engine.state().combatants[0].statuses.has(StatusKind::Poison));
    engine.submit(&mut ctx, &attack(0, 1)).expect("round 3");
    assert_eq!(engine.state().combatants[0].hp(), 19);

    let poison_ticks: Vec<_> = engine
        .state()
        .log
        .events()
        .filter_map(|event| match event {
            CombatEvent::StatusTicked { actor, event } if *actor == CombatantId(0) => {
                Some(event.effect)
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        poison_ticks,
        vec![
            TickEffect::Damaged {
                amount: 4,
                hp_after: 26
            },
            TickEffect::Damaged {
                amount: 4,
                hp_after: 21
            },
            TickEffect::Expired,
        ]
    );
}

#[test]
fn victory_pays_rewards_and_writes_back_the_party() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let mut definition = encounter(vec![enemy("Slime", 10, 1, 2)]);
    definition.rewards = RewardTable {
        experience: 12,
        currency: 5,
        drops: vec![
            DropEntry {
                item: ItemId::new("potion"),
                chance: 100,
                quantity: 2,
            },
            DropEntry {
                item: ItemId::new("antidote"),
                chance: 0,
                quantity: 1,
            },
        ],
    };
    let mut party = vec![
        hero(30, 6, 10)
            .with_status(StatusEffect::new(StatusKind::Poison, 9, 1))
            .with_status(StatusEffect::new(StatusKind::Haste, 9, 20)),
    ];

    let mut state = BattleState::new(&definition, &party, 1, &ctx.env).expect("valid battle");
    assert_eq!(autoplay(&mut state, &mut ctx, 10), BattlePhase::Victory);

    let outcome = OutcomeEvaluator::evaluate(&state, &ctx.env).expect("battle is over");
    assert_eq!(outcome.kind, OutcomeKind::Victory);
    assert_eq!(outcome.rewards.experience, 12);
    assert_eq!(outcome.rewards.currency, 5);
    assert_eq!(outcome.rewards.items, vec![(ItemId::new("potion"), 2)]);
    assert_eq!(outcome.log, state.log.to_vec());

    write_back(&mut state, &mut party).expect("write back");
    assert_eq!(party[0].hp(), state.party()[0].hp());
    assert!(party[0].hp() < 30);
    assert!(party[0].statuses.has(StatusKind::Poison));
    assert!(!party[0].statuses.has(StatusKind::Haste));
    assert_eq!(
        write_back(&mut state, &mut party),
        Err(BattleError::AlreadyWrittenBack)
    );
}

#[test]
fn defeat_pays_nothing_and_is_not_written_back() {
    let world = World::new();
    let rng = FixedRng::always();
    let mut bag = ItemBag::new();
    let mut ctx = BattleContext::new(world.env(&rng), &mut bag);

    let mut definition = encounter(vec![enemy("Ogre", 50, 10, 20)]);
    definition.rewards.experience = 100;
    let mut party = vec![hero(30, 6, 10).with_hp(5)];

    let mut state = BattleState::new(&definition, &party, 1, &ctx.env).expect("valid battle");
    let mut engine = BattleEngine::new(&mut state);
    assert_eq!(engine.start(&mut ctx), Ok(BattlePhase::Defeat));

    let outcome = OutcomeEvaluator::evaluate(&state, &ctx.env).expect("battle is over");
    assert_eq!(outcome.kind, OutcomeKind::Defeat);
    assert!(outcome.rewards.is_empty());
    assert_eq!(
        write_back(&mut state, &mut party),
        Err(BattleError::NotWritable {
            outcome: OutcomeKind::Defeat
        })
    );
    assert_eq!(party[0].hp(), 5);
}

#[test]
fn replaying_the_same_inputs_gives_the_same_battle() {
    let world = World::new();
    let rng = PcgRng;

    let swing = Rule::new(
        Predicate::SelfSpAtLeast(3),
        ActionTemplate::new(
            TemplateAction::Skill(SkillId::new("wild_swing")),
            TargetSelector::HighestHpOpponent,
        ),
    );
    let sting = Rule::new(
        Predicate::EveryNthRound(2),
        ActionTemplate::new(
            TemplateAction::Skill(SkillId::new("sting")),
            TargetSelector::LowestHpOpponent,
        ),
    );
    let brute = enemy("Brute", 60, 7, 6)
        .with_skills([SkillId::new("wild_swing")])
        .with_profile(AiProfile::with_rules(vec![swing]));
    let stinger = enemy("Stinger", 35, 4, 12)
        .with_skills([SkillId::new("sting")])
        .with_profile(AiProfile::with_rules(vec![sting]));
    let definition = encounter(vec![brute, stinger]);
    let party = [hero(80, 9, 8), hero(60, 7, 11)];

    let run = |seed: u64| {
        let mut bag = ItemBag::new();
        let mut ctx = BattleContext::new(world.env(&rng), &mut bag);
        let mut state = BattleState::new(&definition, &party, seed, &ctx.env).expect("valid battle");
        autoplay(&mut state, &mut ctx, 100);
        state
    };

    let first = run(0xC0FFEE);
    let second = run(0xC0FFEE);
    assert!(first.is_over());
    assert_eq!(first, second);
    assert_eq!(first.log.to_vec(), second.log.to_vec());

    #[cfg(feature = "serde")]
    assert_eq!(first.digest().expect("digest"), second.digest().expect("digest"));
}

#[test]
fn battle_state_lists_party_before_enemies() {
    let world = World::new();
    let rng = FixedRng::always();
    let env = world.env(&rng);

    let state = BattleState::new(
        &encounter(vec![enemy("A", 10, 1, 1), enemy("B", 10, 1, 1)]),
        &[hero(30, 6, 10)],
        9,
        &env,
    )
    .expect("valid battle");

    assert_eq!(state.phase, BattlePhase::Setup);
    assert_eq!(state.party().len(), 1);
    assert_eq!(state.enemies().len(), 2);
    assert!(state.enemies().iter().all(|c| c.side == Side::Enemy));
    assert_eq!(state.enemies()[1].id, CombatantId(2));
}
