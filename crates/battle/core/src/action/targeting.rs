//! Target rules and target-list validation.

use super::ActionError;
use crate::state::{BattleState, Combatant, CombatantId};

/// Who an action may affect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Targeting {
    SelfOnly,
    /// One living ally, the actor included.
    SingleAlly,
    SingleEnemy,
    AllEnemies,
    AllAllies,
    /// One downed ally (revival).
    DownedAlly,
}

impl Targeting {
    /// Whether `target` is acceptable for `actor` under this rule.
    pub fn accepts(self, actor: &Combatant, target: &Combatant) -> bool {
        let ally = actor.side == target.side;
        match self {
            Targeting::SelfOnly => actor.id == target.id,
            Targeting::SingleAlly | Targeting::AllAllies => ally && !target.is_downed(),
            Targeting::SingleEnemy | Targeting::AllEnemies => !ally && target.is_active(),
            Targeting::DownedAlly => ally && target.is_downed(),
        }
    }

    pub const fn is_multi(self) -> bool {
        matches!(self, Targeting::AllEnemies | Targeting::AllAllies)
    }
}

/// Checks `requested` against the rule and returns the final target list.
///
/// - self-targeted actions accept no target or the actor itself
/// - single-target actions require exactly one acceptable target
/// - multi-target actions expand to every acceptable target when `requested`
///   is empty; otherwise each requested target must be acceptable
pub(crate) fn select_targets(
    state: &BattleState,
    actor: &Combatant,
    targeting: Targeting,
    requested: &[CombatantId],
) -> Result<Vec<CombatantId>, ActionError> {
    if targeting == Targeting::SelfOnly {
        return match requested {
            [] => Ok(vec![actor.id]),
            [only] if *only == actor.id => Ok(vec![actor.id]),
            [other] => Err(ActionError::InvalidTarget(*other)),
            _ => Err(ActionError::TargetCount {
                expected: 1,
                given: requested.len(),
            }),
        };
    }

    if targeting.is_multi() && requested.is_empty() {
        let targets: Vec<_> = state
            .combatants
            .iter()
            .filter(|target| targeting.accepts(actor, target))
            .map(|target| target.id)
            .collect();
        if targets.is_empty() {
            return Err(ActionError::NoValidTargets);
        }
        return Ok(targets);
    }

    if !targeting.is_multi() && requested.len() != 1 {
        return Err(ActionError::TargetCount {
            expected: 1,
            given: requested.len(),
        });
    }

    let mut targets = Vec::with_capacity(requested.len());
    for id in requested {
        let target = state
            .combatant(*id)
            .ok_or(ActionError::TargetNotFound(*id))?;
        if !targeting.accepts(actor, target) {
            return Err(ActionError::InvalidTarget(*id));
        }
        if !targets.contains(id) {
            targets.push(*id);
        }
    }
    targets.sort();
    Ok(targets)
}
