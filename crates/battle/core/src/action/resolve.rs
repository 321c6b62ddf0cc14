//! Action validation and resolution.

use super::targeting::select_targets;
use super::{
    Action, ActionError, ActionRequest, ActionResult, ItemDefinition, ItemEffect, ResolvedEffect,
    Scaling, SkillDefinition, SkillEffect, StatusInfliction, TargetOutcome, Targeting,
};
use crate::combat::{self, Element};
use crate::env::{BattleContext, BattleEnv, Inventory, compute_seed};
use crate::state::{BattleState, Combatant, CombatantId};
use crate::stats::Stat;
use crate::status::{StackPolicy, StatusEffect, StatusKind};

// Roll contexts within one resolution: `target_index * ROLL_STRIDE + roll`.
const ROLL_STRIDE: u32 = 4;
const ROLL_HIT: u32 = 0;
const ROLL_INFLICT: u32 = 1;
const ROLL_FLEE: u32 = 2;

/// What a validated request will do, with definitions already looked up.
enum Plan<'e> {
    Attack,
    Skill(&'e SkillDefinition),
    Item(&'e ItemDefinition),
    Guard,
    Talk,
    Memory,
    Flee,
}

struct Validated<'e> {
    plan: Plan<'e>,
    targets: Vec<CombatantId>,
}

/// Checks a request without modifying anything and returns its final targets.
///
/// The AI uses this to skip rules whose instantiated action is illegal.
pub fn validate_action(
    env: &BattleEnv<'_>,
    inventory: &dyn Inventory,
    state: &BattleState,
    request: &ActionRequest,
) -> Result<Vec<CombatantId>, ActionError> {
    validate(env, inventory, state, request).map(|validated| validated.targets)
}

fn validate<'e>(
    env: &BattleEnv<'e>,
    inventory: &dyn Inventory,
    state: &BattleState,
    request: &ActionRequest,
) -> Result<Validated<'e>, ActionError> {
    let actor = state
        .combatant(request.actor)
        .ok_or(ActionError::ActorNotFound(request.actor))?;
    if actor.is_downed() {
        return Err(ActionError::ActorDowned(actor.id));
    }
    if actor.spared {
        return Err(ActionError::ActorSpared(actor.id));
    }
    if !actor.can_use(&request.action) {
        return Err(ActionError::ActionNotAvailable {
            actor: actor.id,
            action: request.action.category().into(),
        });
    }

    let (plan, targeting) = match &request.action {
        Action::Attack => (Plan::Attack, Targeting::SingleEnemy),
        Action::Skill(id) => {
            let skill = env
                .skill(id)
                .ok_or_else(|| ActionError::UnknownSkill(id.clone()))?;
            if actor.sp() < skill.sp_cost {
                return Err(ActionError::InsufficientSp {
                    required: skill.sp_cost,
                    available: actor.sp(),
                });
            }
            (Plan::Skill(skill), skill.targeting)
        }
        Action::Item(id) => {
            let item = env
                .item(id)
                .ok_or_else(|| ActionError::UnknownItem(id.clone()))?;
            if inventory.quantity(id) == 0 {
                return Err(ActionError::ItemUnavailable(id.clone()));
            }
            (Plan::Item(item), item.targeting)
        }
        Action::Guard => (Plan::Guard, Targeting::SelfOnly),
        Action::Talk => (Plan::Talk, Targeting::SingleEnemy),
        Action::Memory => (Plan::Memory, Targeting::SelfOnly),
        Action::Flee => (Plan::Flee, Targeting::SelfOnly),
    };

    let targets = select_targets(state, actor, targeting, &request.targets)?;
    Ok(Validated { plan, targets })
}

/// Validates and resolves one action.
///
/// On error nothing has changed: not the state, not the inventory. On
/// success costs are paid, every target's outcome is applied in target order
/// and the full result is returned. The nonce is left to the caller.
pub fn resolve_action(
    ctx: &mut BattleContext<'_>,
    state: &mut BattleState,
    request: &ActionRequest,
) -> Result<ActionResult, ActionError> {
    let env = ctx.env;
    let Validated { plan, targets } = validate(&env, &*ctx.inventory, state, request)?;
    let actor = request.actor;

    let mut result = ActionResult {
        actor,
        action: request.action.clone(),
        targets: targets.clone(),
        outcomes: Vec::with_capacity(targets.len()),
        sp_spent: 0,
        item_consumed: None,
    };

    match plan {
        Plan::Attack => {
            let strike = Strike {
                power: env.config().attack_power,
                scaling: Scaling::Attack,
                element: Element::Physical,
                hit_chance: None,
            };
            for (index, target) in targets.iter().copied().enumerate() {
                let effect = strike_target(&env, state, actor, target, &strike, index);
                push(&mut result, target, effect);
            }
        }
        Plan::Skill(skill) => {
            let paid = state
                .combatant_mut(actor)
                .is_some_and(|combatant| combatant.spend_sp(skill.sp_cost));
            if paid {
                result.sp_spent = skill.sp_cost;
            }
            for (index, target) in targets.iter().copied().enumerate() {
                apply_skill(&env, state, actor, target, skill, index, &mut result);
            }
        }
        Plan::Item(item) => {
            if !ctx.inventory.consume(&item.id) {
                return Err(ActionError::ItemUnavailable(item.id.clone()));
            }
            result.item_consumed = Some(item.id.clone());
            for (index, target) in targets.iter().copied().enumerate() {
                apply_item(&env, state, actor, target, item, index, &mut result);
            }
        }
        Plan::Guard => {
            if let Some(combatant) = state.combatant_mut(actor) {
                combatant.add_status(
                    StatusEffect::new(StatusKind::Guard, 1, 0).with_policy(StackPolicy::Refresh),
                );
            }
            push(&mut result, actor, Some(ResolvedEffect::Guarding));
        }
        Plan::Talk => {
            let morale = env.config().talk_morale;
            for target in targets.iter().copied() {
                let effect = state.combatant_mut(target).map(|combatant| {
                    let spared = combatant.add_morale(morale);
                    ResolvedEffect::MoraleRaised {
                        morale: combatant.morale,
                        spared,
                    }
                });
                push(&mut result, target, effect);
            }
        }
        Plan::Memory => {
            let percent = env.config().memory_sp_restore_percent;
            let effect = state.combatant_mut(actor).map(|combatant| {
                let amount = combat::percent_of(combatant.max_sp(), percent);
                let amount = combatant.restore_sp(amount);
                ResolvedEffect::SpRestored {
                    amount,
                    sp_after: combatant.sp(),
                }
            });
            push(&mut result, actor, effect);
        }
        Plan::Flee => {
            let effect = attempt_flee(&env, state, actor);
            push(&mut result, actor, effect);
        }
    }

    tracing::debug!(
        actor = %actor,
        action = %result.action,
        targets = ?result.targets,
        damage = result.total_damage(),
        "action resolved"
    );

    Ok(result)
}

fn push(result: &mut ActionResult, target: CombatantId, effect: Option<ResolvedEffect>) {
    if let Some(effect) = effect {
        result.outcomes.push(TargetOutcome { target, effect });
    }
}

fn roll_seed(state: &BattleState, actor: CombatantId, index: usize, roll: u32) -> u64 {
    let context = (index as u32).wrapping_mul(ROLL_STRIDE).wrapping_add(roll);
    compute_seed(state.seed, state.nonce, u32::from(actor.0), context)
}

fn offense(combatant: &Combatant, scaling: Scaling) -> u32 {
    match scaling {
        Scaling::Attack => combatant.stat(Stat::Attack),
        Scaling::Magic => combatant.stat(Stat::Magic),
    }
}

fn defense(combatant: &Combatant, scaling: Scaling) -> u32 {
    match scaling {
        Scaling::Attack => combatant.stat(Stat::Defense),
        Scaling::Magic => combatant.stat(Stat::Magic),
    }
}

struct Strike {
    power: u32,
    scaling: Scaling,
    element: Element,
    hit_chance: Option<u32>,
}

/// Rolls to hit (if the strike can miss) and applies the damage.
///
/// # Formula
///
/// ```text
/// base   = calculate_damage(offense, power, defense)
/// guard  = base / guard_divisor            (target guarding)
/// dealt  = guard × affinity_multiplier / 100
/// ```
fn strike_target(
    env: &BattleEnv<'_>,
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
    strike: &Strike,
    index: usize,
) -> Option<ResolvedEffect> {
    let offense = offense(state.combatant(actor)?, strike.scaling);

    if let Some(chance) = strike.hit_chance {
        let seed = roll_seed(state, actor, index, ROLL_HIT);
        if !env.rng().check(seed, chance) {
            tracing::debug!(actor = %actor, target = %target, chance, "missed");
            return Some(ResolvedEffect::Missed);
        }
    }

    let config = env.config();
    let combatant = state.combatant_mut(target)?;
    let mut damage =
        combat::calculate_damage(offense, strike.power, defense(combatant, strike.scaling), config);
    let guarded = combatant.statuses.has(StatusKind::Guard);
    if guarded {
        damage = combat::guarded(damage, config);
    }
    let multiplier = combatant.affinities.multiplier(strike.element);
    let amount = combatant.apply_damage(damage, strike.element);
    let downed = combatant.is_downed();

    let mut woke = false;
    if amount > 0 && !downed {
        for kind in StatusKind::ALL {
            if kind.breaks_on_damage() && combatant.statuses.remove(kind) {
                woke = true;
            }
        }
    }

    Some(ResolvedEffect::Damaged {
        amount,
        element: strike.element,
        multiplier,
        guarded,
        hp_after: combatant.hp(),
        downed,
        woke,
    })
}

/// Rolls a status infliction against the target's resistance.
///
/// # Formula
///
/// ```text
/// hostile chance = base + actor_luck / 10 - min(resistance, max_status_resistance)
/// friendly chance = base
/// ```
///
/// `guaranteed` skips the roll entirely (items).
fn inflict(
    env: &BattleEnv<'_>,
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
    infliction: &StatusInfliction,
    index: usize,
    guaranteed: bool,
) -> Option<ResolvedEffect> {
    let source = state.combatant(actor)?;
    let (actor_side, luck) = (source.side, source.stat(Stat::Luck));
    let victim = state.combatant(target)?;
    if victim.is_downed() {
        return None;
    }

    if !guaranteed {
        let hostile = victim.side != actor_side && infliction.kind.is_harmful();
        let mut chance = infliction.chance;
        if hostile && chance > 0 {
            let resistance = victim
                .status_resistance
                .min(env.config().max_status_resistance);
            chance = (chance + luck / 10).saturating_sub(resistance);
        }
        let seed = roll_seed(state, actor, index, ROLL_INFLICT);
        if !env.rng().check(seed, chance.min(100)) {
            return Some(ResolvedEffect::StatusResisted {
                kind: infliction.kind,
            });
        }
    }

    let effect = StatusEffect::new(infliction.kind, infliction.duration, infliction.potency)
        .with_policy(infliction.policy());
    let application = state.combatant_mut(target)?.add_status(effect);
    Some(ResolvedEffect::StatusApplied {
        kind: infliction.kind,
        application,
    })
}

fn cure(combatant: &mut Combatant, kinds: &[StatusKind]) -> ResolvedEffect {
    let removed = kinds
        .iter()
        .copied()
        .filter(|kind| combatant.statuses.remove(*kind))
        .collect();
    ResolvedEffect::Cured { removed }
}

fn apply_skill(
    env: &BattleEnv<'_>,
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
    skill: &SkillDefinition,
    index: usize,
    result: &mut ActionResult,
) {
    match &skill.effect {
        SkillEffect::Damage => {
            let strike = Strike {
                power: skill.power,
                scaling: skill.scaling,
                element: skill.element,
                hit_chance: skill.hit_chance,
            };
            let effect = strike_target(env, state, actor, target, &strike, index);
            let landed = matches!(effect, Some(ResolvedEffect::Damaged { downed: false, .. }));
            push(result, target, effect);
            if let (true, Some(infliction)) = (landed, &skill.infliction) {
                let effect = inflict(env, state, actor, target, infliction, index, false);
                push(result, target, effect);
            }
        }
        SkillEffect::Heal => {
            let magic = state.combatant(actor).map_or(0, |c| c.stat(Stat::Magic));
            let amount = combat::calculate_healing(magic, skill.power);
            let effect = state.combatant_mut(target).map(|combatant| {
                let amount = combatant.apply_healing(amount);
                ResolvedEffect::Healed {
                    amount,
                    hp_after: combatant.hp(),
                }
            });
            push(result, target, effect);
            if let Some(infliction) = &skill.infliction {
                let effect = inflict(env, state, actor, target, infliction, index, false);
                push(result, target, effect);
            }
        }
        SkillEffect::Support => {
            if let Some(chance) = skill.hit_chance {
                let seed = roll_seed(state, actor, index, ROLL_HIT);
                if !env.rng().check(seed, chance) {
                    push(result, target, Some(ResolvedEffect::Missed));
                    return;
                }
            }
            if let Some(infliction) = &skill.infliction {
                let effect = inflict(env, state, actor, target, infliction, index, false);
                push(result, target, effect);
            }
        }
        SkillEffect::Cure(kinds) => {
            let effect = state.combatant_mut(target).map(|c| cure(c, kinds));
            push(result, target, effect);
        }
        SkillEffect::Revive { hp_percent } => {
            let effect = state.combatant_mut(target).map(|combatant| {
                let hp = combat::percent_of(combatant.max_hp(), *hp_percent);
                ResolvedEffect::Revived {
                    hp: combatant.revive(hp),
                }
            });
            push(result, target, effect);
        }
    }
}

fn apply_item(
    env: &BattleEnv<'_>,
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
    item: &ItemDefinition,
    index: usize,
    result: &mut ActionResult,
) {
    let effect = match &item.effect {
        ItemEffect::Heal(amount) => state.combatant_mut(target).map(|combatant| {
            let amount = combatant.apply_healing(*amount);
            ResolvedEffect::Healed {
                amount,
                hp_after: combatant.hp(),
            }
        }),
        ItemEffect::RestoreSp(amount) => state.combatant_mut(target).map(|combatant| {
            let amount = combatant.restore_sp(*amount);
            ResolvedEffect::SpRestored {
                amount,
                sp_after: combatant.sp(),
            }
        }),
        ItemEffect::Cure(kinds) => state.combatant_mut(target).map(|c| cure(c, kinds)),
        ItemEffect::Revive(hp) => state.combatant_mut(target).map(|combatant| {
            ResolvedEffect::Revived {
                hp: combatant.revive(*hp),
            }
        }),
        ItemEffect::ApplyStatus(infliction) => {
            inflict(env, state, actor, target, infliction, index, true)
        }
        ItemEffect::Damage { amount, element } => {
            state.combatant_mut(target).map(|combatant| {
                let multiplier = combatant.affinities.multiplier(*element);
                let amount = combatant.apply_damage(*amount, *element);
                ResolvedEffect::Damaged {
                    amount,
                    element: *element,
                    multiplier,
                    guarded: false,
                    hp_after: combatant.hp(),
                    downed: combatant.is_downed(),
                    woke: false,
                }
            })
        }
    };
    push(result, target, effect);
}

/// Flee chance is `100 × speed / (speed + average enemy speed)`; boss
/// encounters cannot be fled.
fn attempt_flee(
    env: &BattleEnv<'_>,
    state: &BattleState,
    actor: CombatantId,
) -> Option<ResolvedEffect> {
    let runner = state.combatant(actor)?;
    let speed = u64::from(runner.speed());

    let (total, count) = state
        .active_on(runner.side.opposing())
        .fold((0u64, 0u64), |(total, count), enemy| {
            (total + u64::from(enemy.speed()), count + 1)
        });
    let average = if count == 0 { 0 } else { total / count };

    let chance = if state.encounter.boss {
        0
    } else {
        (100 * speed / (speed + average).max(1)) as u32
    };
    let success = chance > 0 && env.rng().check(roll_seed(state, actor, 0, ROLL_FLEE), chance);

    tracing::debug!(actor = %actor, chance, success, "flee attempt");
    Some(ResolvedEffect::FleeAttempt { chance, success })
}
