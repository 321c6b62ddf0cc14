//! Error types for the battle state machine.

use crate::action::ActionError;
use crate::error::{ErrorSeverity, GameError};
use crate::outcome::OutcomeKind;
use crate::state::{BattlePhase, CombatantId};

/// Misuse of the battle state machine, or a rejected player action.
///
/// In every case the battle state is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("action rejected: {0}")]
    Action(#[from] ActionError),

    #[error("battle already started (phase {phase})")]
    AlreadyStarted { phase: BattlePhase },

    #[error("battle is over")]
    BattleOver,

    #[error("not awaiting player input (phase {phase})")]
    NotAwaitingInput { phase: BattlePhase },

    #[error("it is {expected}'s turn, not {got}'s")]
    NotActorsTurn {
        expected: CombatantId,
        got: CombatantId,
    },

    #[error("battle has not finished")]
    NotFinished,

    #[error("a {outcome} battle does not write back to the party")]
    NotWritable { outcome: OutcomeKind },

    #[error("party state has already been written back")]
    AlreadyWrittenBack,

    #[error("party size mismatch: battle has {expected}, got {got}")]
    PartyMismatch { expected: usize, got: usize },
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Action(error) => error.severity(),
            Self::NotActorsTurn { .. } | Self::NotAwaitingInput { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::PartyMismatch { .. } => ErrorSeverity::Validation,
            Self::AlreadyStarted { .. }
            | Self::BattleOver
            | Self::NotFinished
            | Self::NotWritable { .. }
            | Self::AlreadyWrittenBack => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Action(error) => error.error_code(),
            Self::AlreadyStarted { .. } => "BATTLE_ALREADY_STARTED",
            Self::BattleOver => "BATTLE_OVER",
            Self::NotAwaitingInput { .. } => "BATTLE_NOT_AWAITING_INPUT",
            Self::NotActorsTurn { .. } => "BATTLE_NOT_ACTORS_TURN",
            Self::NotFinished => "BATTLE_NOT_FINISHED",
            Self::NotWritable { .. } => "BATTLE_NOT_WRITABLE",
            Self::AlreadyWrittenBack => "BATTLE_ALREADY_WRITTEN_BACK",
            Self::PartyMismatch { .. } => "BATTLE_PARTY_MISMATCH",
        }
    }
}
