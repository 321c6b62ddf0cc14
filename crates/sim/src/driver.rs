//! Plays one encounter to completion with scripted or automatic player input.

use std::str::FromStr;

use anyhow::{Context, Result};
use battle_content::Content;
use battle_core::{
    Action, ActionRequest, BattleContext, BattleEngine, BattleEnv, BattlePhase, BattleState,
    Combatant, CombatantId, GameError, Inventory, ItemBag, ItemEffect, ItemId, Outcome,
    OutcomeEvaluator, PcgRng, Side, SkillEffect, SkillId, Targeting, write_back,
};

/// Party members at or below this HP percent get healed by the autopilot.
const LOW_HP_PERCENT: u32 = 35;

/// Upper bound on player turns before a battle is declared stuck.
const MAX_PLAYER_TURNS: usize = 1_000;

/// One scripted player input.
///
/// Tokens are `attack[:T]`, `talk[:T]`, `guard`, `memory`, `flee`,
/// `skill:ID[:T]`, `item:ID[:T]` and `auto`, where `T` is a roster index.
/// Without a target the usual one is picked for the action's targeting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Auto,
    Attack(Option<u8>),
    Talk(Option<u8>),
    Guard,
    Memory,
    Flee,
    Skill(SkillId, Option<u8>),
    Item(ItemId, Option<u8>),
}

impl FromStr for PlayerCommand {
    type Err = anyhow::Error;

    fn from_str(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.trim().split(':').collect();
        let target = |index: usize| -> Result<Option<u8>> {
            parts
                .get(index)
                .map(|raw| {
                    raw.parse::<u8>()
                        .with_context(|| format!("invalid target '{raw}' in '{token}'"))
                })
                .transpose()
        };

        let command = match parts.as_slice() {
            ["auto"] => PlayerCommand::Auto,
            ["attack"] | ["attack", _] => PlayerCommand::Attack(target(1)?),
            ["talk"] | ["talk", _] => PlayerCommand::Talk(target(1)?),
            ["guard"] => PlayerCommand::Guard,
            ["memory"] => PlayerCommand::Memory,
            ["flee"] => PlayerCommand::Flee,
            ["skill", id] | ["skill", id, _] => PlayerCommand::Skill(SkillId::new(*id), target(2)?),
            ["item", id] | ["item", id, _] => PlayerCommand::Item(ItemId::new(*id), target(2)?),
            _ => anyhow::bail!("unrecognized command '{token}'"),
        };
        Ok(command)
    }
}

/// Parses a comma-separated script; an empty string is an empty script.
pub fn parse_script(script: &str) -> Result<Vec<PlayerCommand>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(PlayerCommand::from_str)
        .collect()
}

/// A finished battle.
#[derive(Debug)]
pub struct Played {
    pub state: BattleState,
    pub outcome: Outcome,
    /// The party after write-back; unchanged on defeat.
    pub party: Vec<Combatant>,
    /// Inventory after consumption and drops.
    pub inventory: ItemBag,
    pub player_turns: usize,
}

/// Plays `encounter` from `content` with `seed`.
///
/// Scripted commands are consumed one per player turn; once the script runs
/// out the autopilot takes over. A command the engine rejects as recoverable
/// (no SP left, item used up) is replaced by the autopilot's pick for that
/// turn; any other rejection ends the run with an error.
pub fn play(
    content: &Content,
    encounter: &str,
    seed: u64,
    script: &[PlayerCommand],
) -> Result<Played> {
    let definition = content
        .encounter(encounter)
        .with_context(|| format!("no encounter '{encounter}' in content"))?;
    let rng = PcgRng;
    let env = content.env(&rng);
    let mut inventory = content.party.inventory.clone();
    let mut state = BattleState::new(definition, &content.party.members, seed, &env)?;

    let mut script = script.iter();
    let mut player_turns = 0;
    {
        let mut ctx = BattleContext::new(env, &mut inventory);
        let mut engine = BattleEngine::new(&mut state);
        let mut phase = engine.start(&mut ctx)?;

        while phase == BattlePhase::AwaitingPlayerInput {
            if player_turns == MAX_PLAYER_TURNS {
                anyhow::bail!("battle did not finish within {MAX_PLAYER_TURNS} player turns");
            }
            let actor = engine
                .state()
                .awaiting_actor()
                .context("battle awaits input without an actor")?;
            let request = match script.next() {
                Some(command) => command_request(command, actor, engine.state(), &ctx, content),
                None => autopilot(actor, engine.state(), &ctx, content),
            };
            tracing::debug!(turn = player_turns, actor = %actor, action = %request.action, "player input");

            phase = match engine.submit(&mut ctx, &request) {
                Ok(phase) => phase,
                Err(error) if error.severity().is_recoverable() => {
                    tracing::warn!(
                        turn = player_turns,
                        actor = %actor,
                        code = error.error_code(),
                        severity = error.severity().as_str(),
                        %error,
                        "command rejected, autopilot acts instead"
                    );
                    let fallback = autopilot(actor, engine.state(), &ctx, content);
                    engine.submit(&mut ctx, &fallback).with_context(|| {
                        format!("player turn {player_turns}: autopilot {} rejected", fallback.action)
                    })?
                }
                Err(error) => {
                    return Err(error).with_context(|| {
                        format!("player turn {player_turns}: {} rejected", request.action)
                    });
                }
            };
            player_turns += 1;
        }
    }

    let outcome = OutcomeEvaluator::evaluate(&state, &env)
        .with_context(|| format!("battle stopped in non-terminal phase {}", state.phase))?;

    let mut party = content.party.members.clone();
    if outcome.kind.writes_back() {
        write_back(&mut state, &mut party)?;
    }
    for (item, quantity) in &outcome.rewards.items {
        inventory.add(item, *quantity);
    }

    Ok(Played {
        state,
        outcome,
        party,
        inventory,
        player_turns,
    })
}

fn command_request(
    command: &PlayerCommand,
    actor: CombatantId,
    state: &BattleState,
    ctx: &BattleContext<'_>,
    content: &Content,
) -> ActionRequest {
    let (action, targeting, target) = match command {
        PlayerCommand::Auto => return autopilot(actor, state, ctx, content),
        PlayerCommand::Attack(target) => (Action::Attack, Targeting::SingleEnemy, *target),
        PlayerCommand::Talk(target) => (Action::Talk, Targeting::SingleEnemy, *target),
        PlayerCommand::Guard => (Action::Guard, Targeting::SelfOnly, None),
        PlayerCommand::Memory => (Action::Memory, Targeting::SelfOnly, None),
        PlayerCommand::Flee => (Action::Flee, Targeting::SelfOnly, None),
        PlayerCommand::Skill(id, target) => {
            // Unknown ids fall through to the engine, which rejects them.
            let targeting = ctx
                .env
                .skill(id)
                .map_or(Targeting::SingleEnemy, |skill| skill.targeting);
            (Action::Skill(id.clone()), targeting, *target)
        }
        PlayerCommand::Item(id, target) => {
            let targeting = ctx
                .env
                .item(id)
                .map_or(Targeting::SingleAlly, |item| item.targeting);
            (Action::Item(id.clone()), targeting, *target)
        }
    };

    let targets = match target {
        Some(index) => vec![CombatantId(index)],
        None => default_targets(targeting, actor, state),
    };
    ActionRequest::new(actor, action, targets)
}

/// The obvious pick for a single-target rule, the actor for self rules,
/// and nothing for multi-target rules, which the engine expands.
fn default_targets(targeting: Targeting, actor: CombatantId, state: &BattleState) -> Vec<CombatantId> {
    let pick = match targeting {
        Targeting::SingleEnemy => state.active_on(Side::Enemy).min_by_key(|c| c.hp()).map(|c| c.id),
        Targeting::SingleAlly => state
            .active_on(Side::Player)
            .min_by_key(|c| c.hp_percent())
            .map(|c| c.id),
        Targeting::DownedAlly => state.party().iter().find(|c| c.is_downed()).map(|c| c.id),
        Targeting::SelfOnly | Targeting::AllEnemies | Targeting::AllAllies => None,
    };
    match (targeting, pick) {
        (Targeting::SelfOnly, _) => vec![actor],
        (_, Some(target)) => vec![target],
        (_, None) => Vec::new(),
    }
}

/// Heals a badly hurt ally when it can, otherwise attacks the weakest enemy.
fn autopilot(
    actor: CombatantId,
    state: &BattleState,
    ctx: &BattleContext<'_>,
    content: &Content,
) -> ActionRequest {
    let attack = || {
        let targets = default_targets(Targeting::SingleEnemy, actor, state);
        ActionRequest::new(actor, Action::Attack, targets)
    };
    let Some(me) = state.combatant(actor) else {
        return attack();
    };
    let Some(patient) = state
        .active_on(Side::Player)
        .filter(|c| c.hp_at_or_below(LOW_HP_PERCENT))
        .min_by_key(|c| c.hp_percent())
        .map(|c| c.id)
    else {
        return attack();
    };

    if let Some(skill) = healing_skill(me, &ctx.env) {
        return ActionRequest::targeting(actor, Action::Skill(skill), patient);
    }
    let healing_item = content
        .items
        .iter()
        .filter(|item| matches!(item.effect, ItemEffect::Heal(_)))
        .filter(|item| item.targeting == Targeting::SingleAlly)
        .find(|item| ctx.inventory.quantity(&item.id) > 0);
    match healing_item {
        Some(item) => ActionRequest::targeting(actor, Action::Item(item.id.clone()), patient),
        None => attack(),
    }
}

fn healing_skill(me: &Combatant, env: &BattleEnv<'_>) -> Option<SkillId> {
    me.actions.iter().find_map(|action| {
        let Action::Skill(id) = action else {
            return None;
        };
        env.skill(id)
            .filter(|skill| skill.effect == SkillEffect::Heal)
            .filter(|skill| skill.targeting == Targeting::SingleAlly)
            .filter(|skill| skill.sp_cost <= me.sp())
            .map(|_| id.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_content::ContentFactory;
    use battle_core::OutcomeKind;
    use std::path::PathBuf;

    fn bundled() -> Content {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../battle/content/data");
        ContentFactory::new(dir).load().unwrap()
    }

    #[test]
    fn parses_scripts() {
        let script = parse_script(" attack, skill:fire:3 ,item:potion, talk:2,auto,").unwrap();
        assert_eq!(
            script,
            vec![
                PlayerCommand::Attack(None),
                PlayerCommand::Skill(SkillId::new("fire"), Some(3)),
                PlayerCommand::Item(ItemId::new("potion"), None),
                PlayerCommand::Talk(Some(2)),
                PlayerCommand::Auto,
            ]
        );
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_commands_and_bad_targets() {
        assert!(parse_script("dance").is_err());
        assert!(parse_script("attack:x").is_err());
        assert!(parse_script("guard:1").is_err());
    }

    #[test]
    fn autopilot_finishes_every_bundled_encounter() {
        let content = bundled();
        for encounter in &content.encounters {
            let played = play(&content, &encounter.id, 7, &[]).unwrap();
            assert!(played.state.phase.is_terminal(), "{} did not finish", encounter.id);
            assert_eq!(played.outcome.kind.phase(), played.state.phase);
        }
    }

    #[test]
    fn same_seed_same_digest() {
        let content = bundled();
        let first = play(&content, "wolf_den", 42, &[]).unwrap();
        let second = play(&content, "wolf_den", 42, &[]).unwrap();
        assert_eq!(first.state.digest().unwrap(), second.state.digest().unwrap());
        assert_eq!(first.state.log, second.state.log);
    }

    #[test]
    fn talking_spares_the_meadow() {
        let content = bundled();
        let script = parse_script("talk:2,talk:2,talk:3,talk:3").unwrap();
        let played = play(&content, "meadow", 1, &script).unwrap();
        assert_eq!(played.outcome.kind, OutcomeKind::Spared);
        assert!(played.state.written_back);
    }

    #[test]
    fn used_up_items_fall_back_to_the_autopilot() {
        let content = bundled();
        assert_eq!(content.party.inventory.quantity(&ItemId::new("ether")), 1);

        let script = parse_script("item:ether,item:ether").unwrap();
        let played = play(&content, "meadow", 1, &script).unwrap();
        assert!(played.state.phase.is_terminal());
        assert_eq!(played.inventory.quantity(&ItemId::new("ether")), 0);
    }

    #[test]
    fn invalid_targets_end_the_run() {
        let content = bundled();
        let script = parse_script("attack:0").unwrap();
        let err = play(&content, "meadow", 1, &script).unwrap_err();
        assert!(err.to_string().contains("player turn 0: attack rejected"));
    }

    #[test]
    fn unknown_encounter_is_an_error() {
        let content = bundled();
        let err = play(&content, "nowhere", 1, &[]).unwrap_err();
        assert!(err.to_string().contains("no encounter 'nowhere'"));
    }
}
