//! Damage and healing formulas.

use crate::config::BattleConfig;

// ============================================================================
// Damage Calculation
// ============================================================================

/// Base damage of a successful hit, before elemental affinity.
///
/// # Formula
///
/// ```text
/// raw     = offense × power / 100
/// reduced = raw - defense × mitigation_percent / 100
/// base    = max(reduced, minimum_damage)
/// ```
///
/// # Arguments
///
/// * `offense` - Attacker's effective Attack (physical) or Magic (magical)
/// * `power` - Action power percent (`attack_power` for the basic Attack)
/// * `defense` - Target's effective Defense (physical) or Magic (magical)
/// * `config` - Balance parameters
pub fn calculate_damage(offense: u32, power: u32, defense: u32, config: &BattleConfig) -> u32 {
    let raw = u64::from(offense) * u64::from(power) / 100;
    let mitigation = u64::from(defense) * u64::from(config.mitigation_percent) / 100;
    let reduced = raw.saturating_sub(mitigation);
    let base = reduced.max(u64::from(config.minimum_damage));
    u32::try_from(base).unwrap_or(u32::MAX)
}

/// Damage that reaches a guarding target.
///
/// Integer division floors (10 → 5, 7 → 3); a non-zero hit never drops below
/// `minimum_damage`.
pub fn guarded(damage: u32, config: &BattleConfig) -> u32 {
    if damage == 0 {
        return 0;
    }
    (damage / config.guard_divisor.max(1)).max(config.minimum_damage)
}

/// Applies an affinity multiplier percent to `amount`, flooring.
pub fn scale_by_affinity(amount: u32, multiplier_percent: u32) -> u32 {
    let scaled = u64::from(amount) * u64::from(multiplier_percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Healing from a skill: `magic × power / 100`, at least 1.
pub fn calculate_healing(magic: u32, power: u32) -> u32 {
    let amount = u64::from(magic) * u64::from(power) / 100;
    u32::try_from(amount.max(1)).unwrap_or(u32::MAX)
}

/// `percent` of `max`, rounded down but at least 1 when both are non-zero.
pub fn percent_of(max: u32, percent: u32) -> u32 {
    let amount = u64::from(max) * u64::from(percent) / 100;
    if amount == 0 && max > 0 && percent > 0 {
        return 1;
    }
    u32::try_from(amount).unwrap_or(u32::MAX)
}
