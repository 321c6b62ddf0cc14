//! Common error infrastructure for battle-core.
//!
//! Shared severity classification used by every error enum in the crate.
//! Action and battle errors live next to the code that raises them;
//! [`ConfigError`] lives here because encounters, profiles, skills and the
//! configuration itself all report through it.

use crate::action::{ItemId, SkillId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may retry with a different action
/// - **Validation**: the input is malformed and must be fixed first
/// - **Internal**: a state inconsistency that indicates a bug
/// - **Fatal**: the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry with the same or an alternative action.
    ///
    /// Examples: not enough SP, target already downed.
    Recoverable,

    /// Invalid input; do not retry without changes.
    ///
    /// Examples: unknown skill id, malformed AI profile.
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// Battle state is unusable.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Malformed encounter, profile, catalog or configuration data.
///
/// Raised when content is loaded or a battle is constructed, never mid-battle.
/// `owner` strings name the offending record (for example
/// `"encounter 'crypt' enemy #1 (Wraith)"`) so content authors can locate it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("invalid battle config: {0}")]
    InvalidConfig(&'static str),

    #[error("encounter '{encounter}' has no enemies")]
    EmptyEncounter { encounter: String },

    #[error("party has no members")]
    EmptyParty,

    #[error("encounter '{encounter}' has {count} enemies (max {max})")]
    TooManyEnemies {
        encounter: String,
        count: usize,
        max: usize,
    },

    #[error("party has {count} members (max {max})")]
    TooManyPartyMembers { count: usize, max: usize },

    #[error("{owner}: unknown skill '{skill}'")]
    UnknownSkill { owner: String, skill: SkillId },

    #[error("{owner}: unknown item '{item}'")]
    UnknownItem { owner: String, item: ItemId },

    #[error("{owner}: skill '{skill}' is not in the combatant's known actions")]
    SkillNotKnown { owner: String, skill: SkillId },

    #[error("{owner}: phase thresholds must start at 100 and strictly descend")]
    InvalidPhaseThresholds { owner: String },

    #[error("{owner}: multiple AI phases require a boss encounter")]
    MultiPhaseRequiresBoss { owner: String },

    #[error("{owner}: {reason}")]
    InvalidDefinition { owner: String, reason: &'static str },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidConfig(_) => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "CONFIG_INVALID",
            Self::EmptyEncounter { .. } => "CONFIG_EMPTY_ENCOUNTER",
            Self::EmptyParty => "CONFIG_EMPTY_PARTY",
            Self::TooManyEnemies { .. } => "CONFIG_TOO_MANY_ENEMIES",
            Self::TooManyPartyMembers { .. } => "CONFIG_TOO_MANY_PARTY_MEMBERS",
            Self::UnknownSkill { .. } => "CONFIG_UNKNOWN_SKILL",
            Self::UnknownItem { .. } => "CONFIG_UNKNOWN_ITEM",
            Self::SkillNotKnown { .. } => "CONFIG_SKILL_NOT_KNOWN",
            Self::InvalidPhaseThresholds { .. } => "CONFIG_INVALID_PHASE_THRESHOLDS",
            Self::MultiPhaseRequiresBoss { .. } => "CONFIG_MULTI_PHASE_REQUIRES_BOSS",
            Self::InvalidDefinition { .. } => "CONFIG_INVALID_DEFINITION",
        }
    }
}
