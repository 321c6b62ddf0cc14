//! Battle configuration constants and tunable balance parameters.

use crate::error::ConfigError;

/// Battle configuration: capacity constants plus runtime-tunable balance values.
///
/// All percentages are stored as integers (`50` = 50%) so every formula stays
/// in integer arithmetic and replays bit-for-bit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Power of the basic Attack command, as a percent of the attacker's Attack.
    pub attack_power: u32,

    /// Percent of the defender's Defense (or Magic, for magical skills)
    /// subtracted from the raw damage.
    pub mitigation_percent: u32,

    /// Floor applied to every successful hit before elemental scaling.
    pub minimum_damage: u32,

    /// Incoming hit damage is divided by this while the target is guarding.
    pub guard_divisor: u32,

    /// Morale added to the target per Talk.
    pub talk_morale: u32,

    /// Mercy threshold used when an enemy template does not declare one.
    /// `None` means enemies cannot be spared unless their template says so.
    pub default_mercy_threshold: Option<u32>,

    /// Percent of max SP restored by the Memory command.
    pub memory_sp_restore_percent: u32,

    /// Number of player actions remembered by adaptive AI.
    pub adaptive_window: usize,

    /// Weight retained by each remembered player action per round (100 = no decay).
    pub adaptive_decay_percent: u32,

    /// Maximum number of entries retained in the rolling combat log.
    pub log_capacity: usize,

    /// Upper bound for a combatant's status resistance.
    pub max_status_resistance: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// One slot per status kind; reapplication never needs a second slot.
    pub const MAX_STATUS_EFFECTS: usize = 12;
    pub const MAX_PARTY: usize = 4;
    pub const MAX_ENEMIES: usize = 8;
    pub const MAX_COMBATANTS: usize = Self::MAX_PARTY + Self::MAX_ENEMIES;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATTACK_POWER: u32 = 100;
    pub const DEFAULT_MITIGATION_PERCENT: u32 = 50;
    pub const DEFAULT_MINIMUM_DAMAGE: u32 = 1;
    pub const DEFAULT_GUARD_DIVISOR: u32 = 2;
    pub const DEFAULT_TALK_MORALE: u32 = 1;
    pub const DEFAULT_MEMORY_SP_RESTORE_PERCENT: u32 = 25;
    pub const DEFAULT_ADAPTIVE_WINDOW: usize = 8;
    pub const DEFAULT_ADAPTIVE_DECAY_PERCENT: u32 = 80;
    pub const DEFAULT_LOG_CAPACITY: usize = 512;
    pub const DEFAULT_MAX_STATUS_RESISTANCE: u32 = 95;

    pub fn new() -> Self {
        Self {
            attack_power: Self::DEFAULT_ATTACK_POWER,
            mitigation_percent: Self::DEFAULT_MITIGATION_PERCENT,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
            guard_divisor: Self::DEFAULT_GUARD_DIVISOR,
            talk_morale: Self::DEFAULT_TALK_MORALE,
            default_mercy_threshold: None,
            memory_sp_restore_percent: Self::DEFAULT_MEMORY_SP_RESTORE_PERCENT,
            adaptive_window: Self::DEFAULT_ADAPTIVE_WINDOW,
            adaptive_decay_percent: Self::DEFAULT_ADAPTIVE_DECAY_PERCENT,
            log_capacity: Self::DEFAULT_LOG_CAPACITY,
            max_status_resistance: Self::DEFAULT_MAX_STATUS_RESISTANCE,
        }
    }

    /// Builder-style override for the mitigation percent.
    #[must_use]
    pub fn with_mitigation_percent(mut self, percent: u32) -> Self {
        self.mitigation_percent = percent;
        self
    }

    /// Builder-style override for the adaptive decay (100 disables decay).
    #[must_use]
    pub fn with_adaptive_decay_percent(mut self, percent: u32) -> Self {
        self.adaptive_decay_percent = percent;
        self
    }

    /// Builder-style override for the default mercy threshold.
    #[must_use]
    pub fn with_default_mercy_threshold(mut self, threshold: Option<u32>) -> Self {
        self.default_mercy_threshold = threshold;
        self
    }

    /// Rejects values that would make a formula divide by zero or never terminate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guard_divisor == 0 {
            return Err(ConfigError::InvalidConfig("guard_divisor must be at least 1"));
        }
        if self.adaptive_window == 0 {
            return Err(ConfigError::InvalidConfig("adaptive_window must be at least 1"));
        }
        if self.adaptive_decay_percent > 100 {
            return Err(ConfigError::InvalidConfig(
                "adaptive_decay_percent must be within 0..=100",
            ));
        }
        if self.max_status_resistance > 100 {
            return Err(ConfigError::InvalidConfig(
                "max_status_resistance must be within 0..=100",
            ));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::InvalidConfig("log_capacity must be at least 1"));
        }
        Ok(())
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use strum::EnumCount;

    use super::*;
    use crate::status::StatusKind;

    #[test]
    fn status_capacity_covers_every_kind() {
        assert!(BattleConfig::MAX_STATUS_EFFECTS >= StatusKind::COUNT);
    }

    #[test]
    fn defaults_validate() {
        assert!(BattleConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_guard_divisor_is_rejected() {
        let mut config = BattleConfig::default();
        config.guard_divisor = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
