//! Combatant statistics.
//!
//! [`BaseStats`] holds the template values; equipment and status effects
//! contribute [`Bonus`]es that are folded through a [`BonusStack`] whenever an
//! effective value is needed. Nothing here is cached, so a stat always reflects
//! the combatant's current statuses.
mod bonus;

pub use bonus::{Bonus, BonusStack};

/// Upper clamp for any effective stat.
pub const STAT_CAP: i32 = 9_999;

/// Stat identifiers, used by equipment and status modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    MaxHp,
    MaxSp,
    Attack,
    Defense,
    Magic,
    Speed,
    Luck,
}

/// Template statistics of a combatant before any modifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub max_hp: u32,
    pub max_sp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Both magical power and magical mitigation.
    pub magic: u32,
    pub speed: u32,
    pub luck: u32,
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::MaxHp => self.max_hp,
            Stat::MaxSp => self.max_sp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Magic => self.magic,
            Stat::Speed => self.speed,
            Stat::Luck => self.luck,
        }
    }
}

/// A bonus bound to the stat it modifies (equipment, passive traits).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: Stat,
    pub bonus: Bonus,
}

impl StatModifier {
    pub fn new(stat: Stat, bonus: Bonus) -> Self {
        Self { stat, bonus }
    }
}

/// Folds every bonus for `stat` over the base value.
///
/// Max HP and Speed floor at 1 so a combatant can never become unkillable by
/// division or drop out of the turn order entirely; every other stat floors at 0.
pub fn effective_stat(
    base: &BaseStats,
    stat: Stat,
    bonuses: impl IntoIterator<Item = Bonus>,
) -> u32 {
    let floor = match stat {
        Stat::MaxHp | Stat::Speed => 1,
        _ => 0,
    };
    let stack: BonusStack = bonuses.into_iter().collect();
    let base = i32::try_from(base.get(stat)).unwrap_or(STAT_CAP);
    stack.apply(base, floor, STAT_CAP) as u32
}
