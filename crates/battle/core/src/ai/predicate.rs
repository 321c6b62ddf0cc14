//! Rule conditions.

use super::{AiContext, IntentTag};
use crate::action::ActionCategory;
use crate::env::BattleEnv;
use crate::error::ConfigError;
use crate::status::StatusKind;

/// Condition checked against the current battle from the deciding
/// combatant's point of view. HP values are percents of max HP; "opponents"
/// and "allies" only count active combatants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predicate {
    Always,
    SelfHpAtOrBelow(u32),
    SelfHpAbove(u32),
    AnyOpponentHpAtOrBelow(u32),
    SelfHas(StatusKind),
    SelfLacks(StatusKind),
    AnyOpponentHas(StatusKind),
    AnyOpponentLacks(StatusKind),
    RoundAtLeast(u32),
    /// Holds on rounds divisible by N.
    EveryNthRound(u32),
    /// Other active allies, the deciding combatant excluded.
    AlliesAtMost(usize),
    SelfSpAtLeast(u32),
    /// A group member has posted this intent earlier in the round.
    AllyIntent(IntentTag),
    /// The player's share of `category` among remembered actions is at least
    /// `percent`. Never holds without adaptive tracking.
    PlayerFavors {
        category: ActionCategory,
        percent: u32,
    },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, ctx: &AiContext<'_>) -> bool {
        let me = ctx.me();
        match self {
            Predicate::Always => true,
            Predicate::SelfHpAtOrBelow(percent) => me.hp_at_or_below(*percent),
            Predicate::SelfHpAbove(percent) => !me.hp_at_or_below(*percent),
            Predicate::AnyOpponentHpAtOrBelow(percent) => {
                ctx.opponents().any(|c| c.hp_at_or_below(*percent))
            }
            Predicate::SelfHas(kind) => me.statuses.has(*kind),
            Predicate::SelfLacks(kind) => !me.statuses.has(*kind),
            Predicate::AnyOpponentHas(kind) => ctx.opponents().any(|c| c.statuses.has(*kind)),
            Predicate::AnyOpponentLacks(kind) => ctx.opponents().any(|c| !c.statuses.has(*kind)),
            Predicate::RoundAtLeast(round) => ctx.round() >= *round,
            Predicate::EveryNthRound(n) => *n > 0 && ctx.round() % n == 0,
            Predicate::AlliesAtMost(count) => ctx.allies().filter(|c| c.id != me.id).count() <= *count,
            Predicate::SelfSpAtLeast(sp) => me.sp() >= *sp,
            Predicate::AllyIntent(tag) => ctx.group_intents().any(|intent| intent.tag == *tag),
            Predicate::PlayerFavors { category, percent } => ctx
                .adaptive()
                .is_some_and(|adaptive| adaptive.share_percent(*category) >= *percent),
            Predicate::All(predicates) => predicates.iter().all(|p| p.evaluate(ctx)),
            Predicate::Any(predicates) => predicates.iter().any(|p| p.evaluate(ctx)),
            Predicate::Not(predicate) => !predicate.evaluate(ctx),
        }
    }

    pub(crate) fn validate(&self, location: &str, env: &BattleEnv<'_>) -> Result<(), ConfigError> {
        match self {
            Predicate::EveryNthRound(0) => Err(ConfigError::InvalidDefinition {
                owner: location.to_string(),
                reason: "every_nth_round needs a period of at least 1",
            }),
            Predicate::AllyIntent(IntentTag::UsedSkill(id)) if env.skill(id).is_none() => {
                Err(ConfigError::UnknownSkill {
                    owner: location.to_string(),
                    skill: id.clone(),
                })
            }
            Predicate::All(predicates) | Predicate::Any(predicates) => predicates
                .iter()
                .try_for_each(|predicate| predicate.validate(location, env)),
            Predicate::Not(predicate) => predicate.validate(location, env),
            _ => Ok(()),
        }
    }
}
