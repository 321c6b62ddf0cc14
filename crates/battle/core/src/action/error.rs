//! Action validation errors.

use super::{ItemId, SkillId};
use crate::error::{ErrorSeverity, GameError};
use crate::state::CombatantId;

/// Reasons an action request is rejected.
///
/// Every variant is raised before the battle state is modified.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("actor {0} not found")]
    ActorNotFound(CombatantId),

    #[error("actor {0} is downed")]
    ActorDowned(CombatantId),

    #[error("actor {0} has been spared")]
    ActorSpared(CombatantId),

    #[error("{action} is not available to {actor}")]
    ActionNotAvailable {
        actor: CombatantId,
        action: &'static str,
    },

    #[error("unknown skill '{0}'")]
    UnknownSkill(SkillId),

    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),

    #[error("no '{0}' left in the inventory")]
    ItemUnavailable(ItemId),

    #[error("not enough SP: requires {required}, has {available}")]
    InsufficientSp { required: u32, available: u32 },

    #[error("target {0} not found")]
    TargetNotFound(CombatantId),

    #[error("target {0} is not a valid target for this action")]
    InvalidTarget(CombatantId),

    #[error("expected exactly {expected} target(s), got {given}")]
    TargetCount { expected: usize, given: usize },

    #[error("no valid targets")]
    NoValidTargets,
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            ActorNotFound(_) | TargetNotFound(_) => ErrorSeverity::Validation,
            UnknownSkill(_) | UnknownItem(_) => ErrorSeverity::Validation,
            InvalidTarget(_) | TargetCount { .. } => ErrorSeverity::Validation,
            ActorDowned(_) | ActorSpared(_) | ActionNotAvailable { .. } => {
                ErrorSeverity::Recoverable
            }
            ItemUnavailable(_) | InsufficientSp { .. } | NoValidTargets => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            ActorNotFound(_) => "ACTION_ACTOR_NOT_FOUND",
            ActorDowned(_) => "ACTION_ACTOR_DOWNED",
            ActorSpared(_) => "ACTION_ACTOR_SPARED",
            ActionNotAvailable { .. } => "ACTION_NOT_AVAILABLE",
            UnknownSkill(_) => "ACTION_UNKNOWN_SKILL",
            UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            ItemUnavailable(_) => "ACTION_ITEM_UNAVAILABLE",
            InsufficientSp { .. } => "ACTION_INSUFFICIENT_SP",
            TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            InvalidTarget(_) => "ACTION_INVALID_TARGET",
            TargetCount { .. } => "ACTION_TARGET_COUNT",
            NoValidTargets => "ACTION_NO_VALID_TARGETS",
        }
    }
}
