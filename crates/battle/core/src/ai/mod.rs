//! Rule-based enemy AI.
//!
//! Profiles are data: ordered phases of `predicate → action template` rules
//! plus a mandatory fallback. Decisions are deterministic functions of the
//! battle state, the combatant's [`AiState`] and the group blackboard; no
//! randomness is involved.
mod adaptive;
mod blackboard;
mod context;
mod decision;
mod predicate;
mod profile;
mod template;

pub use adaptive::AdaptiveState;
pub use blackboard::{Blackboard, Intent, IntentTag};
pub use context::AiContext;
pub use decision::{AiDecision, AiStage, AiState, DecisionSource, decide, update_phase};
pub use predicate::Predicate;
pub use profile::{AdaptiveConfig, AiPhase, AiProfile, CoordinationGroup, Rule};
pub use template::{ActionTemplate, TargetSelector, TemplateAction};
