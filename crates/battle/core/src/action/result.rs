use super::{Action, ActionCategory, ItemId};
use crate::combat::Element;
use crate::state::CombatantId;
use crate::status::{StatusApplication, StatusKind};

/// Effect of an action on a single target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolvedEffect {
    Damaged {
        /// Post-affinity damage.
        amount: u32,
        element: Element,
        /// Affinity multiplier percent that applied.
        multiplier: u32,
        guarded: bool,
        hp_after: u32,
        downed: bool,
        /// The hit broke the target's Sleep.
        woke: bool,
    },
    Missed,
    Healed {
        amount: u32,
        hp_after: u32,
    },
    SpRestored {
        amount: u32,
        sp_after: u32,
    },
    StatusApplied {
        kind: StatusKind,
        application: StatusApplication,
    },
    StatusResisted {
        kind: StatusKind,
    },
    Cured {
        removed: Vec<StatusKind>,
    },
    Revived {
        hp: u32,
    },
    Guarding,
    MoraleRaised {
        morale: u32,
        spared: bool,
    },
    FleeAttempt {
        chance: u32,
        success: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: CombatantId,
    pub effect: ResolvedEffect,
}

/// Everything a resolved action did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    pub actor: CombatantId,
    pub action: Action,
    pub targets: Vec<CombatantId>,
    pub outcomes: Vec<TargetOutcome>,
    pub sp_spent: u32,
    pub item_consumed: Option<ItemId>,
}

impl ActionResult {
    pub fn category(&self) -> ActionCategory {
        self.action.category()
    }

    /// True when this was a Flee that succeeded.
    pub fn fled(&self) -> bool {
        self.outcomes.iter().any(|outcome| {
            matches!(
                outcome.effect,
                ResolvedEffect::FleeAttempt { success: true, .. }
            )
        })
    }

    /// Total damage dealt across all targets.
    pub fn total_damage(&self) -> u32 {
        self.outcomes
            .iter()
            .map(|outcome| match outcome.effect {
                ResolvedEffect::Damaged { amount, .. } => amount,
                _ => 0,
            })
            .sum()
    }

    /// Statuses that landed, with their targets.
    pub fn applied_statuses(&self) -> impl Iterator<Item = (CombatantId, StatusKind)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome.effect {
                ResolvedEffect::StatusApplied { kind, application }
                    if application != StatusApplication::Ignored =>
                {
                    Some((outcome.target, kind))
                }
                _ => None,
            })
    }
}
