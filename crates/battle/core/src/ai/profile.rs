//! Declarative enemy behavior: phases of ordered rules plus a fallback.

use super::{ActionTemplate, Predicate, TemplateAction};
use crate::action::Action;
use crate::env::BattleEnv;
use crate::error::ConfigError;
use crate::state::Combatant;

/// Enemies sharing a group coordinate through the blackboard and act in
/// roster order relative to each other.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CoordinationGroup(pub String);

impl CoordinationGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// One ordered rule: the first rule whose predicate holds and whose action is
/// legal wins.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub when: Predicate,
    pub then: ActionTemplate,
}

impl Rule {
    pub fn new(when: Predicate, then: ActionTemplate) -> Self {
        Self { when, then }
    }
}

/// Rules active while HP is at or below `threshold` percent of max.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiPhase {
    pub threshold: u32,
    pub rules: Vec<Rule>,
}

/// Per-profile overrides for adaptive tracking; unset values use the
/// battle configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdaptiveConfig {
    pub window: Option<usize>,
    pub decay_percent: Option<u32>,
}

/// Complete behavior of an AI-controlled combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiProfile {
    /// Thresholds strictly descend from 100. Empty means fallback only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub phases: Vec<AiPhase>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fallback: ActionTemplate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<CoordinationGroup>,
    /// Enables tracking of the player's action mix.
    #[cfg_attr(feature = "serde", serde(default))]
    pub adaptive: Option<AdaptiveConfig>,
}

impl Default for AiProfile {
    /// Fallback-only profile: attack the weakest opponent.
    fn default() -> Self {
        Self {
            phases: Vec::new(),
            fallback: ActionTemplate::default(),
            group: None,
            adaptive: None,
        }
    }
}

impl AiProfile {
    /// Single-phase profile with the given rules.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self {
            phases: vec![AiPhase {
                threshold: 100,
                rules,
            }],
            ..Self::default()
        }
    }

    /// Deepest phase whose threshold the combatant's HP is at or below.
    pub fn phase_for(&self, combatant: &Combatant) -> usize {
        self.phases
            .iter()
            .rposition(|phase| combatant.hp_at_or_below(phase.threshold))
            .unwrap_or(0)
    }

    /// Checks thresholds and every skill reference against the catalog and
    /// the owner's known actions.
    pub fn validate(
        &self,
        owner: &str,
        known: &[Action],
        boss: bool,
        env: &BattleEnv<'_>,
    ) -> Result<(), ConfigError> {
        if let Some(first) = self.phases.first() {
            let descending = self
                .phases
                .windows(2)
                .all(|pair| pair[0].threshold > pair[1].threshold);
            if first.threshold != 100 || !descending {
                return Err(ConfigError::InvalidPhaseThresholds {
                    owner: owner.to_string(),
                });
            }
        }
        if self.phases.len() > 1 && !boss {
            return Err(ConfigError::MultiPhaseRequiresBoss {
                owner: owner.to_string(),
            });
        }

        for (phase_index, phase) in self.phases.iter().enumerate() {
            for (rule_index, rule) in phase.rules.iter().enumerate() {
                let location = format!("{owner} phase {phase_index} rule {rule_index}");
                rule.when.validate(&location, env)?;
                validate_template(&rule.then, &location, known, env)?;
            }
        }
        validate_template(&self.fallback, &format!("{owner} fallback"), known, env)
    }
}

fn validate_template(
    template: &ActionTemplate,
    location: &str,
    known: &[Action],
    env: &BattleEnv<'_>,
) -> Result<(), ConfigError> {
    let TemplateAction::Skill(id) = &template.action else {
        return Ok(());
    };
    if env.skill(id).is_none() {
        return Err(ConfigError::UnknownSkill {
            owner: location.to_string(),
            skill: id.clone(),
        });
    }
    if !known.contains(&Action::Skill(id.clone())) {
        return Err(ConfigError::SkillNotKnown {
            owner: location.to_string(),
            skill: id.clone(),
        });
    }
    Ok(())
}
