//! Enemy decision pipeline.
//!
//! Each AI turn runs three stages:
//!
//! 1. **SelectingPhase**: the active phase ratchets forward if HP crossed a
//!    threshold (it never moves back, even after healing). The engine also
//!    ratchets every AI combatant after each action and status tick, so a
//!    threshold crossed between turns is never missed
//! 2. **EvaluatingRules**: the active phase's rules are tried in order; the
//!    first rule whose predicate holds and whose instantiated action passes
//!    validation wins
//! 3. **ActionChosen**: the request is handed to the action resolver
//!
//! When no rule applies the profile fallback is used, and if even that is
//! illegal the combatant guards. A decision therefore always exists.

use super::{AdaptiveState, AiContext, AiProfile};
use crate::action::{Action, ActionRequest, validate_action};
use crate::config::BattleConfig;
use crate::env::{BattleEnv, Inventory};
use crate::state::{BattleState, Combatant, CombatantId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiStage {
    #[default]
    SelectingPhase,
    EvaluatingRules,
    ActionChosen,
}

/// Decision state carried by an AI-controlled combatant across turns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiState {
    pub profile: AiProfile,
    /// Index into `profile.phases`; only ever increases.
    pub phase: usize,
    pub stage: AiStage,
    pub adaptive: Option<AdaptiveState>,
}

impl AiState {
    pub fn new(profile: AiProfile, config: &BattleConfig) -> Self {
        let adaptive = profile.adaptive.map(|overrides| {
            AdaptiveState::new(
                overrides.window.unwrap_or(config.adaptive_window),
                overrides
                    .decay_percent
                    .unwrap_or(config.adaptive_decay_percent),
            )
        });
        Self {
            profile,
            phase: 0,
            stage: AiStage::SelectingPhase,
            adaptive,
        }
    }
}

/// Where a decision came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionSource {
    Rule { phase: usize, rule: usize },
    Fallback,
    /// Neither a rule nor the fallback was legal; the combatant guards.
    Failsafe,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiDecision {
    pub request: ActionRequest,
    pub source: DecisionSource,
}

/// Ratchets the combatant's phase forward; returns the new phase if it moved.
pub fn update_phase(combatant: &mut Combatant) -> Option<usize> {
    let candidate = combatant.ai.as_ref()?.profile.phase_for(combatant);
    let ai = combatant.ai.as_mut()?;
    if candidate > ai.phase {
        tracing::debug!(
            combatant = %combatant.id,
            from = ai.phase,
            to = candidate,
            "AI phase advanced"
        );
        ai.phase = candidate;
        return Some(candidate);
    }
    None
}

/// Chooses an action for `actor` without modifying the battle.
///
/// Returns `None` only when `actor` does not exist or is not AI-controlled.
pub fn decide(
    actor: CombatantId,
    state: &BattleState,
    env: &BattleEnv<'_>,
    inventory: &dyn Inventory,
) -> Option<AiDecision> {
    let me = state.combatant(actor)?;
    let ai = me.ai.as_ref()?;
    let ctx = AiContext::new(me, ai, state, *env);

    if let Some(phase) = ai.profile.phases.get(ai.phase) {
        tracing::debug!(
            combatant = %actor,
            phase = ai.phase,
            rules = phase.rules.len(),
            "evaluating rules"
        );
        for (index, rule) in phase.rules.iter().enumerate() {
            if !rule.when.evaluate(&ctx) {
                tracing::trace!(combatant = %actor, rule = index, "predicate false");
                continue;
            }
            let Some(request) = rule.then.instantiate(&ctx) else {
                tracing::debug!(combatant = %actor, rule = index, "no target for rule");
                continue;
            };
            match validate_action(env, inventory, state, &request) {
                Ok(_) => {
                    tracing::debug!(
                        combatant = %actor,
                        rule = index,
                        action = %request.action,
                        "rule selected"
                    );
                    return Some(AiDecision {
                        request,
                        source: DecisionSource::Rule {
                            phase: ai.phase,
                            rule: index,
                        },
                    });
                }
                Err(error) => {
                    tracing::debug!(combatant = %actor, rule = index, %error, "rule skipped");
                }
            }
        }
    }

    let fallback = ai
        .profile
        .fallback
        .instantiate(&ctx)
        .filter(|request| validate_action(env, inventory, state, request).is_ok());
    if let Some(request) = fallback {
        tracing::debug!(combatant = %actor, action = %request.action, "fallback selected");
        return Some(AiDecision {
            request,
            source: DecisionSource::Fallback,
        });
    }

    tracing::warn!(combatant = %actor, "fallback unavailable, guarding");
    Some(AiDecision {
        request: ActionRequest::untargeted(actor, Action::Guard),
        source: DecisionSource::Failsafe,
    })
}
