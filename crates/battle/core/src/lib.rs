//! Deterministic turn-based combat engine.
//!
//! `battle-core` defines the canonical combat rules (combatants, status effects,
//! actions, enemy AI, the battle state machine and outcome evaluation) and
//! exposes pure, synchronous APIs. A battle is a function of its initial
//! [`BattleState`] and the ordered sequence of player actions; all mutation
//! flows through [`engine::BattleEngine`].
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod engine;
pub mod env;
pub mod error;
pub mod outcome;
pub mod state;
pub mod stats;
pub mod status;

pub use action::{
    Action, ActionCategory, ActionError, ActionRequest, ActionResult, ItemDefinition, ItemEffect,
    ItemId, ResolvedEffect, Scaling, SkillDefinition, SkillEffect, SkillId, StatusInfliction,
    TargetOutcome, Targeting, resolve_action, validate_action,
};
pub use ai::{
    ActionTemplate, AdaptiveConfig, AdaptiveState, AiContext, AiDecision, AiPhase, AiProfile,
    AiStage, AiState, Blackboard, CoordinationGroup, DecisionSource, Intent, IntentTag, Predicate,
    Rule, TargetSelector, TemplateAction, decide, update_phase,
};
pub use combat::{Affinities, Affinity, Element};
pub use config::BattleConfig;
pub use encounter::{DropEntry, EncounterDefinition, EnemyTemplate, RewardTable, validate_party};
pub use engine::{BattleEngine, BattleError, turn_order, write_back};
pub use env::{
    BattleContext, BattleEnv, FixedRng, Inventory, ItemBag, ItemCatalog, ItemOracle, PcgRng,
    RngOracle, SkillCatalog, SkillOracle, compute_seed,
};
pub use error::{ConfigError, ErrorSeverity, GameError};
pub use outcome::{Outcome, OutcomeEvaluator, OutcomeKind, Rewards};
pub use state::{
    BattlePhase, BattleState, CombatEvent, CombatLog, Combatant, CombatantId, EncounterInfo,
    LogEntry, Side, TurnQueue,
};
pub use stats::{BaseStats, Bonus, BonusStack, Stat, StatModifier};
pub use status::{
    StackPolicy, StatusApplication, StatusCategory, StatusEffect, StatusEffects, StatusKind,
    TickEffect, TickEvent, resolve_tick,
};
