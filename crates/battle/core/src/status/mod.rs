//! Status effects and their per-turn resolution.
//!
//! A combatant holds at most one [`StatusEffect`] per [`StatusKind`];
//! reapplying a kind is governed by the effect's [`StackPolicy`]. Durations
//! count the owner's turns and are advanced by [`resolve_tick`].

mod resolver;

pub use resolver::{TickEffect, TickEvent, resolve_tick};

use arrayvec::ArrayVec;

use crate::combat::Element;
use crate::config::BattleConfig;
use crate::stats::{Bonus, Stat};

/// Types of status effects, in resolution order.
///
/// The declaration order is significant: damage-over-time effects tick in
/// this order, and every listing (logs, digests) follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr, strum::EnumCount)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Poison,
    Burn,
    Bleed,

    // ========================================================================
    // Healing over time
    // ========================================================================
    Regen,

    // ========================================================================
    // Control (owner skips its turn)
    // ========================================================================
    Stun,
    Sleep,
    Frozen,

    // ========================================================================
    // Stance
    // ========================================================================
    /// Halves incoming hits until the owner's next turn begins.
    Guard,

    // ========================================================================
    // Stat modifiers (potency is a percent)
    // ========================================================================
    Weaken,
    Shield,
    Haste,
    Slow,
}

/// Broad grouping that decides how a kind is resolved each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    DamageOverTime,
    HealOverTime,
    Control,
    Stance,
    Modifier,
}

impl StatusKind {
    pub const ALL: [StatusKind; 12] = [
        StatusKind::Poison,
        StatusKind::Burn,
        StatusKind::Bleed,
        StatusKind::Regen,
        StatusKind::Stun,
        StatusKind::Sleep,
        StatusKind::Frozen,
        StatusKind::Guard,
        StatusKind::Weaken,
        StatusKind::Shield,
        StatusKind::Haste,
        StatusKind::Slow,
    ];

    pub const fn category(self) -> StatusCategory {
        match self {
            Self::Poison | Self::Burn | Self::Bleed => StatusCategory::DamageOverTime,
            Self::Regen => StatusCategory::HealOverTime,
            Self::Stun | Self::Sleep | Self::Frozen => StatusCategory::Control,
            Self::Guard => StatusCategory::Stance,
            Self::Weaken | Self::Shield | Self::Haste | Self::Slow => StatusCategory::Modifier,
        }
    }

    /// Policy used when a skill or item does not override it.
    pub const fn default_policy(self) -> StackPolicy {
        match self {
            Self::Poison | Self::Bleed => StackPolicy::Stack { cap: 30 },
            Self::Stun | Self::Sleep | Self::Frozen => StackPolicy::Ignore,
            _ => StackPolicy::Refresh,
        }
    }

    /// Element of the periodic damage dealt by this kind, if any.
    pub const fn element(self) -> Option<Element> {
        match self {
            Self::Poison => Some(Element::Poison),
            Self::Burn => Some(Element::Fire),
            Self::Bleed => Some(Element::Physical),
            _ => None,
        }
    }

    /// Control statuses cost the owner its turn.
    pub const fn prevents_action(self) -> bool {
        matches!(self.category(), StatusCategory::Control)
    }

    /// Broken early when the owner takes a direct hit.
    pub const fn breaks_on_damage(self) -> bool {
        matches!(self, Self::Sleep)
    }

    /// Survives the end of battle when written back to the party.
    pub const fn persists_after_battle(self) -> bool {
        matches!(self, Self::Poison)
    }

    /// Harmful kinds are subject to the target's status resistance.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            Self::Poison
                | Self::Burn
                | Self::Bleed
                | Self::Stun
                | Self::Sleep
                | Self::Frozen
                | Self::Weaken
                | Self::Slow
        )
    }

    /// Durations tick down at the owner's turn end; Guard is instead cleared
    /// when the owner's next turn begins.
    pub const fn ticks_down(self) -> bool {
        !matches!(self, Self::Guard)
    }

    /// Stat modifier contributed by this kind at the given potency.
    pub fn stat_bonus(self, potency: u32) -> Option<(Stat, Bonus)> {
        let percent = i32::try_from(potency.min(100)).unwrap_or(100);
        match self {
            Self::Weaken => Some((Stat::Attack, Bonus::less(percent))),
            Self::Shield => Some((Stat::Defense, Bonus::increased(percent))),
            Self::Haste => Some((Stat::Speed, Bonus::increased(percent))),
            Self::Slow => Some((Stat::Speed, Bonus::less(percent))),
            _ => None,
        }
    }
}

/// How reapplying an already-active kind behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// Replace duration and potency with the new application.
    Refresh,
    /// Accumulate potency up to `cap`; duration becomes the longer of the two.
    Stack { cap: u32 },
    /// Keep the existing effect untouched.
    Ignore,
}

/// A single active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Owner turns left, including the current one.
    pub remaining: u32,
    /// Damage/heal per tick, or a percent for stat modifiers.
    pub potency: u32,
    pub policy: StackPolicy,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: u32, potency: u32) -> Self {
        Self {
            kind,
            remaining: duration,
            potency,
            policy: kind.default_policy(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StackPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Result of [`StatusEffects::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusApplication {
    Added,
    Refreshed,
    Stacked { potency: u32 },
    Ignored,
}

/// Active status effects on a combatant, one slot per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Applies `effect` following the stacking policy it carries.
    ///
    /// A zero-duration application is ignored.
    pub fn apply(&mut self, effect: StatusEffect) -> StatusApplication {
        if effect.remaining == 0 {
            return StatusApplication::Ignored;
        }

        let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) else {
            let mut effect = effect;
            if let StackPolicy::Stack { cap } = effect.policy {
                effect.potency = effect.potency.min(cap);
            }
            // One slot per kind and capacity covers every kind.
            if self.effects.try_push(effect).is_err() {
                return StatusApplication::Ignored;
            }
            self.effects.sort_by_key(|e| e.kind);
            return StatusApplication::Added;
        };

        match effect.policy {
            StackPolicy::Refresh => {
                existing.remaining = effect.remaining;
                existing.potency = effect.potency;
                existing.policy = effect.policy;
                StatusApplication::Refreshed
            }
            StackPolicy::Stack { cap } => {
                existing.potency = existing.potency.saturating_add(effect.potency).min(cap);
                existing.remaining = existing.remaining.max(effect.remaining);
                existing.policy = effect.policy;
                StatusApplication::Stacked {
                    potency: existing.potency,
                }
            }
            StackPolicy::Ignore => StatusApplication::Ignored,
        }
    }

    /// Removes `kind`; returns whether it was present.
    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&StatusEffect) -> bool) {
        self.effects.retain(|e| keep(e));
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// First active status that costs the owner its turn.
    pub fn blocking(&self) -> Option<StatusKind> {
        self.effects
            .iter()
            .map(|e| e.kind)
            .find(|kind| kind.prevents_action())
    }

    /// Stat bonuses contributed by active modifier statuses.
    pub fn bonuses_for(&self, stat: Stat) -> impl Iterator<Item = Bonus> + '_ {
        self.effects.iter().filter_map(move |e| match e.kind.stat_bonus(e.potency) {
            Some((target, bonus)) if target == stat => Some(bonus),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use strum::EnumCount;

    use super::*;

    #[test]
    fn all_lists_every_kind_in_declared_order() {
        assert_eq!(StatusKind::ALL.len(), StatusKind::COUNT);
        assert!(StatusKind::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn refresh_replaces_duration_and_potency() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Burn, 3, 4));
        let result = statuses.apply(StatusEffect::new(StatusKind::Burn, 1, 7));

        assert_eq!(result, StatusApplication::Refreshed);
        let burn = statuses.get(StatusKind::Burn).copied();
        assert_eq!(burn.map(|e| (e.remaining, e.potency)), Some((1, 7)));
    }

    #[test]
    fn stack_accumulates_up_to_cap() {
        let mut statuses = StatusEffects::empty();
        let dose = StatusEffect::new(StatusKind::Poison, 2, 4)
            .with_policy(StackPolicy::Stack { cap: 10 });

        assert_eq!(statuses.apply(dose), StatusApplication::Added);
        assert_eq!(
            statuses.apply(dose),
            StatusApplication::Stacked { potency: 8 }
        );
        assert_eq!(
            statuses.apply(dose),
            StatusApplication::Stacked { potency: 10 }
        );
        assert_eq!(statuses.len(), 1);
    }

    #[test]
    fn ignore_keeps_existing_effect() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Stun, 1, 0));
        let result = statuses.apply(StatusEffect::new(StatusKind::Stun, 5, 0));

        assert_eq!(result, StatusApplication::Ignored);
        assert_eq!(statuses.get(StatusKind::Stun).map(|e| e.remaining), Some(1));
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut statuses = StatusEffects::empty();
        let result = statuses.apply(StatusEffect::new(StatusKind::Haste, 0, 20));
        assert_eq!(result, StatusApplication::Ignored);
        assert!(statuses.is_empty());
    }

    #[test]
    fn modifiers_feed_matching_stat_only() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Weaken, 2, 25));
        statuses.apply(StatusEffect::new(StatusKind::Haste, 2, 50));

        let attack: Vec<_> = statuses.bonuses_for(Stat::Attack).collect();
        let speed: Vec<_> = statuses.bonuses_for(Stat::Speed).collect();

        assert_eq!(attack, vec![Bonus::less(25)]);
        assert_eq!(speed, vec![Bonus::increased(50)]);
        assert_eq!(statuses.bonuses_for(Stat::Defense).count(), 0);
    }

    #[test]
    fn blocking_reports_control_statuses() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Guard, 1, 0));
        assert_eq!(statuses.blocking(), None);

        statuses.apply(StatusEffect::new(StatusKind::Frozen, 1, 0));
        assert_eq!(statuses.blocking(), Some(StatusKind::Frozen));
    }
}
