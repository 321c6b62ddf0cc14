//! Per-round shared memory for coordinated enemies.

use std::collections::BTreeMap;

use super::CoordinationGroup;
use crate::action::{Action, ActionResult, SkillId};
use crate::state::CombatantId;
use crate::status::StatusKind;

/// What a group member just did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentTag {
    Attacked,
    UsedSkill(SkillId),
    AppliedStatus(StatusKind),
    Guarded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intent {
    pub actor: CombatantId,
    pub tag: IntentTag,
    pub target: Option<CombatantId>,
}

/// Intents posted by each group during the current round.
///
/// Cleared whenever a new round begins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blackboard {
    round: u32,
    groups: BTreeMap<CoordinationGroup, Vec<Intent>>,
}

impl Blackboard {
    pub fn reset(&mut self, round: u32) {
        self.round = round;
        self.groups.clear();
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn post(&mut self, group: &CoordinationGroup, intent: Intent) {
        self.groups.entry(group.clone()).or_default().push(intent);
    }

    /// Posts the intents implied by a resolved action.
    pub fn record(&mut self, group: &CoordinationGroup, result: &ActionResult) {
        for intent in intents_from(result) {
            self.post(group, intent);
        }
    }

    pub fn intents(&self, group: &CoordinationGroup) -> &[Intent] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

fn intents_from(result: &ActionResult) -> Vec<Intent> {
    let actor = result.actor;
    let primary = result.targets.first().copied();
    let mut intents = Vec::new();

    match &result.action {
        Action::Attack => intents.push(Intent {
            actor,
            tag: IntentTag::Attacked,
            target: primary,
        }),
        Action::Skill(id) => intents.push(Intent {
            actor,
            tag: IntentTag::UsedSkill(id.clone()),
            target: primary,
        }),
        Action::Guard => intents.push(Intent {
            actor,
            tag: IntentTag::Guarded,
            target: None,
        }),
        _ => {}
    }

    intents.extend(
        result
            .applied_statuses()
            .map(|(target, kind)| Intent {
                actor,
                tag: IntentTag::AppliedStatus(kind),
                target: Some(target),
            }),
    );
    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ResolvedEffect, TargetOutcome};
    use crate::status::StatusApplication;

    #[test]
    fn skill_with_status_posts_both_intents() {
        let group = CoordinationGroup::new("wolves");
        let result = ActionResult {
            actor: CombatantId(2),
            action: Action::Skill(SkillId::new("howl")),
            targets: vec![CombatantId(0)],
            outcomes: vec![TargetOutcome {
                target: CombatantId(0),
                effect: ResolvedEffect::StatusApplied {
                    kind: StatusKind::Weaken,
                    application: StatusApplication::Added,
                },
            }],
            sp_spent: 2,
            item_consumed: None,
        };

        let mut blackboard = Blackboard::default();
        blackboard.record(&group, &result);

        let tags: Vec<_> = blackboard.intents(&group).iter().map(|i| i.tag.clone()).collect();
        assert_eq!(
            tags,
            vec![
                IntentTag::UsedSkill(SkillId::new("howl")),
                IntentTag::AppliedStatus(StatusKind::Weaken),
            ]
        );

        blackboard.reset(2);
        assert!(blackboard.is_empty());
        assert!(blackboard.intents(&group).is_empty());
    }
}
