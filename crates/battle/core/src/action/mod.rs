//! Actions and their resolution.
//!
//! An [`ActionRequest`] names an actor, an [`Action`] and optional explicit
//! targets. [`resolve_action`] validates the request completely before it
//! touches any state, then applies costs and effects and reports them as an
//! [`ActionResult`].
mod definition;
mod error;
mod resolve;
mod result;
mod targeting;

pub use definition::{
    ItemDefinition, ItemEffect, ItemId, Scaling, SkillDefinition, SkillEffect, SkillId,
    StatusInfliction,
};
pub use error::ActionError;
pub use resolve::{resolve_action, validate_action};
pub use result::{ActionResult, ResolvedEffect, TargetOutcome};
pub use targeting::Targeting;

use crate::state::CombatantId;

/// Commands a combatant can issue on its turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Basic physical attack; never misses.
    Attack,
    Skill(SkillId),
    Item(ItemId),
    /// Halve incoming hits until the actor's next turn.
    Guard,
    /// Raise an enemy's morale toward sparing it.
    Talk,
    /// Recover a share of max SP.
    Memory,
    /// Attempt to leave the battle.
    Flee,
}

impl Action {
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::Attack => ActionCategory::Attack,
            Action::Skill(_) => ActionCategory::Skill,
            Action::Item(_) => ActionCategory::Item,
            Action::Guard => ActionCategory::Guard,
            Action::Talk => ActionCategory::Talk,
            Action::Memory => ActionCategory::Memory,
            Action::Flee => ActionCategory::Flee,
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Action::Skill(id) => write!(f, "skill:{id}"),
            Action::Item(id) => write!(f, "item:{id}"),
            other => f.write_str(other.category().as_ref()),
        }
    }
}

/// Coarse action kinds, tracked by adaptive AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCategory {
    Attack,
    Skill,
    Item,
    Guard,
    Talk,
    Memory,
    Flee,
}

/// A fully specified action submitted for resolution.
///
/// `targets` may be empty for self-targeted actions and for multi-target
/// actions, which then expand to every valid target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub actor: CombatantId,
    pub action: Action,
    pub targets: Vec<CombatantId>,
}

impl ActionRequest {
    pub fn new(actor: CombatantId, action: Action, targets: Vec<CombatantId>) -> Self {
        Self {
            actor,
            action,
            targets,
        }
    }

    /// Request with a single explicit target.
    pub fn targeting(actor: CombatantId, action: Action, target: CombatantId) -> Self {
        Self::new(actor, action, vec![target])
    }

    /// Request with no explicit targets.
    pub fn untargeted(actor: CombatantId, action: Action) -> Self {
        Self::new(actor, action, Vec::new())
    }
}
