//! Action templates: an action shape plus a target selector.

use super::AiContext;
use crate::action::{Action, ActionRequest, SkillId};
use crate::state::{Combatant, CombatantId};

/// Actions an AI template may produce. Items, Talk and Flee are party-only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateAction {
    Attack,
    Skill(SkillId),
    Guard,
    Memory,
}

impl TemplateAction {
    pub fn to_action(&self) -> Action {
        match self {
            TemplateAction::Attack => Action::Attack,
            TemplateAction::Skill(id) => Action::Skill(id.clone()),
            TemplateAction::Guard => Action::Guard,
            TemplateAction::Memory => Action::Memory,
        }
    }
}

/// How a template picks its targets. Ties break on lowest roster index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSelector {
    Myself,
    #[default]
    LowestHpOpponent,
    HighestHpOpponent,
    FirstOpponent,
    /// The first still-active opponent targeted by the group this round.
    BlackboardTarget,
    /// Ally (self included) with the lowest HP percent.
    LowestHpAlly,
    AllOpponents,
    AllAllies,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTemplate {
    pub action: TemplateAction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetSelector,
}

impl Default for ActionTemplate {
    fn default() -> Self {
        Self {
            action: TemplateAction::Attack,
            target: TargetSelector::LowestHpOpponent,
        }
    }
}

impl ActionTemplate {
    pub fn new(action: TemplateAction, target: TargetSelector) -> Self {
        Self { action, target }
    }

    /// Builds a concrete request, or `None` when the selector finds nobody.
    ///
    /// The request is not validated here.
    pub fn instantiate(&self, ctx: &AiContext<'_>) -> Option<ActionRequest> {
        let me = ctx.me().id;
        let targets = match self.target {
            TargetSelector::Myself => vec![me],
            TargetSelector::LowestHpOpponent => {
                vec![lowest_by(ctx.opponents(), |c| c.hp())?]
            }
            TargetSelector::HighestHpOpponent => {
                // max_by_key keeps the last maximum; reverse to keep the first.
                let best = ctx
                    .opponents()
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .max_by_key(|c| c.hp())?;
                vec![best.id]
            }
            TargetSelector::FirstOpponent => vec![ctx.opponents().next()?.id],
            TargetSelector::BlackboardTarget => {
                let target = ctx
                    .group_intents()
                    .filter_map(|intent| intent.target)
                    .find(|id| ctx.opponents().any(|c| c.id == *id))?;
                vec![target]
            }
            TargetSelector::LowestHpAlly => {
                vec![lowest_by(ctx.allies(), |c| c.hp_percent())?]
            }
            TargetSelector::AllOpponents | TargetSelector::AllAllies => Vec::new(),
        };
        Some(ActionRequest::new(me, self.action.to_action(), targets))
    }
}

/// `min_by_key` keeps the first minimum, which is the lowest roster index.
fn lowest_by<'a>(
    candidates: impl Iterator<Item = &'a Combatant>,
    key: impl Fn(&Combatant) -> u32,
) -> Option<CombatantId> {
    candidates.min_by_key(|c| key(c)).map(|c| c.id)
}
