//! Battle state machine.
//!
//! The [`BattleEngine`] is the only writer of a [`BattleState`] once setup
//! is done. It drives rounds and turns, asks the AI for enemy actions, and
//! stops whenever a party member needs input or the battle ends:
//!
//! ```text
//! Setup → (round) → ResolvingAction ⇄ AwaitingPlayerInput
//!                         ↓
//!                  CheckingOutcome → Victory | Defeat | Fled | Spared
//! ```
//!
//! Every turn follows the same pipeline: lower Guard, skip if a control
//! status blocks, resolve the action, tick the actor's own statuses, advance
//! the nonce, then check for a terminal outcome. AI phases are re-checked
//! after the action and after the ticks.

mod errors;
mod turns;
mod writeback;

pub use errors::BattleError;
pub use turns::turn_order;
pub use writeback::write_back;

use crate::action::{Action, ActionRequest, ActionResult, resolve_action};
use crate::ai::{AiDecision, AiStage, DecisionSource, decide, update_phase};
use crate::env::BattleContext;
use crate::outcome::OutcomeEvaluator;
use crate::state::{BattlePhase, BattleState, CombatEvent, CombatantId, Side, TurnQueue};
use crate::status::{StatusKind, resolve_tick};

/// Drives one battle from setup to a terminal phase.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Leaves setup and runs until the first player turn or the end.
    pub fn start(&mut self, ctx: &mut BattleContext<'_>) -> Result<BattlePhase, BattleError> {
        if self.state.phase != BattlePhase::Setup {
            return Err(BattleError::AlreadyStarted {
                phase: self.state.phase,
            });
        }
        tracing::info!(
            encounter = %self.state.encounter.id,
            seed = self.state.seed,
            combatants = self.state.combatants.len(),
            "battle started"
        );
        let event = CombatEvent::BattleStarted {
            encounter: self.state.encounter.id.clone(),
            seed: self.state.seed,
        };
        self.state.log_event(event);
        self.check_outcome();
        if self.state.phase.is_terminal() {
            return Ok(self.state.phase);
        }
        self.state.phase = BattlePhase::ResolvingAction;
        Ok(self.drive(ctx))
    }

    /// Resolves the awaited party member's action and runs on.
    ///
    /// A rejected request leaves the battle untouched and still awaiting the
    /// same combatant, so the caller can simply ask again.
    pub fn submit(
        &mut self,
        ctx: &mut BattleContext<'_>,
        request: &ActionRequest,
    ) -> Result<BattlePhase, BattleError> {
        if self.state.phase.is_terminal() {
            return Err(BattleError::BattleOver);
        }
        let Some(expected) = self.state.awaiting_actor() else {
            return Err(BattleError::NotAwaitingInput {
                phase: self.state.phase,
            });
        };
        if request.actor != expected {
            return Err(BattleError::NotActorsTurn {
                expected,
                got: request.actor,
            });
        }

        let result = resolve_action(ctx, self.state, request)?;
        self.state.phase = BattlePhase::ResolvingAction;
        self.observe_player(&result);
        if result.fled() {
            self.state.fled = true;
        }
        self.state.log_event(CombatEvent::ActionResolved(result));
        self.advance_phases();
        self.end_turn(expected);
        Ok(self.drive(ctx))
    }

    /// Runs turns until a party member must act or the battle ends.
    fn drive(&mut self, ctx: &mut BattleContext<'_>) -> BattlePhase {
        while !self.state.phase.is_terminal() {
            if self.state.turns.is_exhausted() {
                self.begin_round();
                if self.state.turns.is_exhausted() {
                    // Nobody can act; settle the battle on its current state.
                    self.check_outcome();
                    if !self.state.phase.is_terminal() {
                        tracing::warn!(round = self.state.round, "no combatant can act");
                        self.state.phase = BattlePhase::Defeat;
                    }
                    break;
                }
                continue;
            }
            let Some(actor) = self.state.turns.current() else {
                continue;
            };
            let side = match self.state.combatant(actor) {
                Some(combatant) if combatant.is_active() => combatant.side,
                _ => {
                    self.state.turns.advance();
                    continue;
                }
            };

            self.lower_guard(actor);
            if let Some(status) = self
                .state
                .combatant(actor)
                .and_then(|combatant| combatant.statuses.blocking())
            {
                tracing::debug!(combatant = %actor, %status, "turn skipped");
                self.state
                    .log_event(CombatEvent::TurnSkipped { actor, status });
                self.end_turn(actor);
                continue;
            }

            match side {
                Side::Player => {
                    self.state.phase = BattlePhase::AwaitingPlayerInput;
                    tracing::debug!(combatant = %actor, "awaiting player input");
                    break;
                }
                Side::Enemy => {
                    self.enemy_turn(ctx, actor);
                    self.end_turn(actor);
                }
            }
        }
        self.state.phase
    }

    fn begin_round(&mut self) {
        self.state.round += 1;
        let round = self.state.round;
        self.state.blackboard.reset(round);
        for combatant in &mut self.state.combatants {
            if let Some(adaptive) = combatant.ai.as_mut().and_then(|ai| ai.adaptive.as_mut()) {
                adaptive.decay();
            }
        }

        let order = turn_order(self.state);
        tracing::info!(round, order = ?order, "round started");
        self.state.turns = TurnQueue::new(order.clone());
        self.state
            .log_event(CombatEvent::RoundStarted { round, order });
    }

    /// Guard lasts until the start of its owner's next turn.
    fn lower_guard(&mut self, actor: CombatantId) {
        let lowered = self
            .state
            .combatant_mut(actor)
            .is_some_and(|combatant| combatant.statuses.remove(StatusKind::Guard));
        if lowered {
            self.state.log_event(CombatEvent::GuardLowered { actor });
        }
    }

    fn enemy_turn(&mut self, ctx: &mut BattleContext<'_>, actor: CombatantId) {
        self.set_stage(actor, AiStage::SelectingPhase);
        self.advance_phases();
        self.set_stage(actor, AiStage::EvaluatingRules);

        let decision = decide(actor, self.state, &ctx.env, &*ctx.inventory).unwrap_or_else(|| {
            tracing::warn!(combatant = %actor, "enemy has no AI state, guarding");
            AiDecision {
                request: ActionRequest::untargeted(actor, Action::Guard),
                source: DecisionSource::Failsafe,
            }
        });
        self.set_stage(actor, AiStage::ActionChosen);
        self.state.log_event(CombatEvent::AiDecided {
            actor,
            source: decision.source,
        });

        let result = match resolve_action(ctx, self.state, &decision.request) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(combatant = %actor, %error, "AI action rejected, guarding");
                let guard = ActionRequest::untargeted(actor, Action::Guard);
                match resolve_action(ctx, self.state, &guard) {
                    Ok(result) => result,
                    Err(_) => return,
                }
            }
        };

        let group = self
            .state
            .combatant(actor)
            .and_then(|combatant| combatant.ai.as_ref())
            .and_then(|ai| ai.profile.group.clone());
        if let Some(group) = group {
            self.state.blackboard.record(&group, &result);
        }
        self.state.log_event(CombatEvent::ActionResolved(result));
        self.advance_phases();
    }

    /// Ratchets every AI combatant still in play to the phase its HP calls for.
    ///
    /// Runs after every HP change, so a boss that is hurt below a threshold
    /// and healed before its own turn has still entered the deeper phase.
    fn advance_phases(&mut self) {
        let advanced: Vec<_> = self
            .state
            .combatants
            .iter_mut()
            .filter(|combatant| combatant.is_active())
            .filter_map(|combatant| update_phase(combatant).map(|phase| (combatant.id, phase)))
            .collect();
        for (actor, phase) in advanced {
            self.state
                .log_event(CombatEvent::PhaseChanged { actor, phase });
        }
    }

    fn set_stage(&mut self, actor: CombatantId, stage: AiStage) {
        if let Some(ai) = self
            .state
            .combatant_mut(actor)
            .and_then(|combatant| combatant.ai.as_mut())
        {
            ai.stage = stage;
        }
    }

    /// Feeds the player's action category to every adaptive enemy still in play.
    fn observe_player(&mut self, result: &ActionResult) {
        let category = result.category();
        for enemy in self
            .state
            .combatants
            .iter_mut()
            .filter(|combatant| combatant.side == Side::Enemy && combatant.is_active())
        {
            if let Some(adaptive) = enemy.ai.as_mut().and_then(|ai| ai.adaptive.as_mut()) {
                adaptive.observe(category);
            }
        }
    }

    fn end_turn(&mut self, actor: CombatantId) {
        let ticks = self
            .state
            .combatant_mut(actor)
            .map(resolve_tick)
            .unwrap_or_default();
        for event in ticks {
            tracing::debug!(combatant = %actor, ?event, "status ticked");
            self.state
                .log_event(CombatEvent::StatusTicked { actor, event });
        }
        self.advance_phases();
        self.state.nonce += 1;
        self.check_outcome();
        if !self.state.phase.is_terminal() {
            self.state.turns.advance();
            self.state.phase = BattlePhase::ResolvingAction;
        }
    }

    fn check_outcome(&mut self) {
        self.state.phase = BattlePhase::CheckingOutcome;
        if let Some(outcome) = OutcomeEvaluator::terminal(self.state) {
            tracing::info!(
                encounter = %self.state.encounter.id,
                round = self.state.round,
                %outcome,
                "battle ended"
            );
            self.state.phase = outcome.phase();
            self.state.log_event(CombatEvent::BattleEnded { outcome });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use crate::encounter::{EncounterDefinition, EnemyTemplate, RewardTable};
    use crate::env::{BattleEnv, FixedRng, ItemBag, ItemCatalog, SkillCatalog};
    use crate::state::Combatant;
    use crate::stats::BaseStats;
    use crate::status::StatusEffect;

    fn stats(hp: u32, attack: u32, speed: u32) -> BaseStats {
        BaseStats {
            max_hp: hp,
            attack,
            speed,
            ..BaseStats::default()
        }
    }

    fn encounter(enemies: Vec<EnemyTemplate>) -> EncounterDefinition {
        EncounterDefinition {
            id: "test".into(),
            name: "Test".into(),
            boss: false,
            enemies,
            rewards: RewardTable::default(),
        }
    }

    fn hero() -> Combatant {
        Combatant::new("Hero", Side::Player, stats(30, 6, 10))
            .with_actions([Action::Attack, Action::Guard, Action::Talk, Action::Flee])
    }

    #[test]
    fn faster_party_member_is_asked_first() {
        let skills = SkillCatalog::default();
        let items = ItemCatalog::default();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);
        let mut bag = ItemBag::new();
        let mut ctx = BattleContext::new(env, &mut bag);

        let mut state = BattleState::new(
            &encounter(vec![EnemyTemplate::new("Slime", stats(10, 3, 2))]),
            &[hero()],
            1,
            &ctx.env,
        )
        .expect("valid battle");
        let mut engine = BattleEngine::new(&mut state);

        assert_eq!(engine.start(&mut ctx), Ok(BattlePhase::AwaitingPlayerInput));
        assert_eq!(engine.state().awaiting_actor(), Some(CombatantId(0)));
        assert_eq!(engine.state().round, 1);
        assert!(matches!(
            engine.start(&mut ctx),
            Err(BattleError::AlreadyStarted { .. })
        ));
    }

    #[test]
    fn wrong_actor_is_rejected_without_changes() {
        let skills = SkillCatalog::default();
        let items = ItemCatalog::default();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);
        let mut bag = ItemBag::new();
        let mut ctx = BattleContext::new(env, &mut bag);

        let mut state = BattleState::new(
            &encounter(vec![EnemyTemplate::new("Slime", stats(10, 3, 2))]),
            &[hero()],
            1,
            &ctx.env,
        )
        .expect("valid battle");
        let mut engine = BattleEngine::new(&mut state);
        engine.start(&mut ctx).expect("start");
        let before = engine.state().clone();

        let request = ActionRequest::targeting(CombatantId(1), Action::Attack, CombatantId(0));
        assert_eq!(
            engine.submit(&mut ctx, &request),
            Err(BattleError::NotActorsTurn {
                expected: CombatantId(0),
                got: CombatantId(1),
            })
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn stunned_party_member_is_skipped() {
        let skills = SkillCatalog::default();
        let items = ItemCatalog::default();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);
        let mut bag = ItemBag::new();
        let mut ctx = BattleContext::new(env, &mut bag);

        let stunned = hero().with_status(StatusEffect::new(StatusKind::Stun, 1, 0));
        let mut state = BattleState::new(
            &encounter(vec![EnemyTemplate::new("Slime", stats(10, 3, 2))]),
            &[stunned],
            1,
            &ctx.env,
        )
        .expect("valid battle");
        let mut engine = BattleEngine::new(&mut state);

        // Round 1: the hero's turn is skipped, the slime attacks.
        // Round 2: the stun has worn off and the hero is asked for input.
        assert_eq!(engine.start(&mut ctx), Ok(BattlePhase::AwaitingPlayerInput));
        assert_eq!(engine.state().round, 2);
        assert!(engine.state().log.events().any(|event| matches!(
            event,
            CombatEvent::TurnSkipped {
                status: StatusKind::Stun,
                ..
            }
        )));
        assert!(!engine.state().combatants[0].statuses.has(StatusKind::Stun));
    }
}
