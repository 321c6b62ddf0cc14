#![allow(dead_code)]

use battle_core::{
    Action, ActionRequest, BattleContext, BattleEngine, BattleEnv, BattlePhase, BattleState,
    BaseStats, Combatant, CombatantId, Element, EncounterDefinition, EnemyTemplate, ItemCatalog,
    ItemDefinition, ItemEffect, ItemId, RewardTable, RngOracle, Scaling, Side, SkillCatalog,
    SkillDefinition, SkillEffect, SkillId, StatusInfliction, StatusKind, Targeting, BattleConfig,
};

/// Skill and item catalogs shared by the scenario tests.
pub struct World {
    pub skills: SkillCatalog,
    pub items: ItemCatalog,
    pub config: BattleConfig,
}

impl World {
    pub fn new() -> Self {
        let skills = [
            skill("fire", 4, 100, Scaling::Magic, Element::Fire, SkillEffect::Damage),
            SkillDefinition {
                infliction: Some(StatusInfliction::new(StatusKind::Poison, 100, 2, 3)),
                ..skill("sting", 2, 50, Scaling::Attack, Element::Poison, SkillEffect::Damage)
            },
            SkillDefinition {
                hit_chance: Some(60),
                infliction: Some(StatusInfliction::new(StatusKind::Stun, 40, 1, 0)),
                ..skill("wild_swing", 3, 150, Scaling::Attack, Element::Physical, SkillEffect::Damage)
            },
            SkillDefinition {
                targeting: Targeting::SingleAlly,
                ..skill("mend", 3, 100, Scaling::Magic, Element::Holy, SkillEffect::Heal)
            },
        ]
        .into_iter()
        .collect();

        let items = [
            ItemDefinition {
                id: ItemId::new("potion"),
                name: "Potion".into(),
                targeting: Targeting::SingleAlly,
                effect: ItemEffect::Heal(20),
            },
            ItemDefinition {
                id: ItemId::new("antidote"),
                name: "Antidote".into(),
                targeting: Targeting::SingleAlly,
                effect: ItemEffect::Cure(vec![StatusKind::Poison]),
            },
        ]
        .into_iter()
        .collect();

        Self {
            skills,
            items,
            config: BattleConfig::default(),
        }
    }

    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle) -> BattleEnv<'a> {
        BattleEnv::new(&self.skills, &self.items, rng, &self.config)
    }
}

fn skill(
    id: &str,
    sp_cost: u32,
    power: u32,
    scaling: Scaling,
    element: Element,
    effect: SkillEffect,
) -> SkillDefinition {
    SkillDefinition {
        id: SkillId::new(id),
        name: id.to_string(),
        sp_cost,
        power,
        scaling,
        element,
        targeting: Targeting::SingleEnemy,
        hit_chance: None,
        effect,
        infliction: None,
    }
}

pub fn stats(max_hp: u32, attack: u32, speed: u32) -> BaseStats {
    BaseStats {
        max_hp,
        max_sp: 10,
        attack,
        speed,
        ..BaseStats::default()
    }
}

pub fn hero(max_hp: u32, attack: u32, speed: u32) -> Combatant {
    Combatant::new("Hero", Side::Player, stats(max_hp, attack, speed)).with_actions([
        Action::Attack,
        Action::Guard,
        Action::Talk,
        Action::Flee,
    ])
}

pub fn enemy(name: &str, max_hp: u32, attack: u32, speed: u32) -> EnemyTemplate {
    EnemyTemplate::new(name, stats(max_hp, attack, speed))
}

pub fn encounter(enemies: Vec<EnemyTemplate>) -> EncounterDefinition {
    EncounterDefinition {
        id: "test".into(),
        name: "Test Encounter".into(),
        boss: false,
        enemies,
        rewards: RewardTable::default(),
    }
}

pub fn boss(enemies: Vec<EnemyTemplate>) -> EncounterDefinition {
    EncounterDefinition {
        id: "boss".into(),
        boss: true,
        ..encounter(enemies)
    }
}

pub fn attack(actor: u8, target: u8) -> ActionRequest {
    ActionRequest::targeting(CombatantId(actor), Action::Attack, CombatantId(target))
}

pub fn act(actor: u8, action: Action) -> ActionRequest {
    ActionRequest::untargeted(CombatantId(actor), action)
}

/// Plays the party side by attacking the weakest enemy until the battle
/// ends or `max_turns` player turns have passed.
pub fn autoplay(state: &mut BattleState, ctx: &mut BattleContext<'_>, max_turns: usize) -> BattlePhase {
    let mut engine = BattleEngine::new(state);
    let mut phase = engine.start(ctx).expect("battle starts");
    for _ in 0..max_turns {
        if phase != BattlePhase::AwaitingPlayerInput {
            break;
        }
        let actor = engine.state().awaiting_actor().expect("awaiting actor");
        let target = engine
            .state()
            .active_on(Side::Enemy)
            .min_by_key(|enemy| enemy.hp())
            .expect("an enemy remains")
            .id;
        let request = ActionRequest::targeting(actor, Action::Attack, target);
        phase = engine.submit(ctx, &request).expect("attack accepted");
    }
    phase
}
