//! Combatant model: one participant in a battle.

use crate::action::Action;
use crate::ai::AiState;
use crate::combat::{Affinities, Element, scale_by_affinity};
use crate::state::{CombatantId, Side};
use crate::stats::{BaseStats, Stat, StatModifier, effective_stat};
use crate::status::{StatusApplication, StatusEffect, StatusEffects};

/// A participant in a battle (party member or enemy).
///
/// HP and SP are private so `0 <= hp <= max_hp` and `0 <= sp <= max_sp` hold
/// after every operation; everything else is plain data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    /// Roster index assigned when the battle is constructed.
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub stats: BaseStats,
    /// Equipment and passive modifiers.
    pub equipment: Vec<StatModifier>,
    pub affinities: Affinities,
    /// Percent subtracted from hostile status infliction chances.
    pub status_resistance: u32,
    hp: u32,
    sp: u32,
    pub statuses: StatusEffects,
    /// Skills and commands this combatant may use.
    pub actions: Vec<Action>,
    /// Accumulated by Talk.
    pub morale: u32,
    /// Morale needed to spare this combatant; `None` means it cannot be spared.
    pub mercy_threshold: Option<u32>,
    pub spared: bool,
    /// Decision state for AI-controlled combatants.
    pub ai: Option<AiState>,
}

impl Combatant {
    /// Creates a combatant at full HP and SP.
    pub fn new(name: impl Into<String>, side: Side, stats: BaseStats) -> Self {
        let mut combatant = Self {
            id: CombatantId(0),
            name: name.into(),
            side,
            stats,
            equipment: Vec::new(),
            affinities: Affinities::default(),
            status_resistance: 0,
            hp: 0,
            sp: 0,
            statuses: StatusEffects::empty(),
            actions: Vec::new(),
            morale: 0,
            mercy_threshold: None,
            spared: false,
            ai: None,
        };
        combatant.hp = combatant.max_hp();
        combatant.sp = combatant.max_sp();
        combatant
    }

    // ========================================================================
    // Builders
    // ========================================================================

    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    /// Adds equipment modifiers and re-clamps HP/SP to the new maxima.
    #[must_use]
    pub fn with_equipment(mut self, modifiers: impl IntoIterator<Item = StatModifier>) -> Self {
        self.equipment.extend(modifiers);
        self.hp = self.hp.min(self.max_hp());
        self.sp = self.sp.min(self.max_sp());
        self
    }

    #[must_use]
    pub fn with_affinities(mut self, affinities: Affinities) -> Self {
        self.affinities = affinities;
        self
    }

    #[must_use]
    pub fn with_status_resistance(mut self, percent: u32) -> Self {
        self.status_resistance = percent;
        self
    }

    #[must_use]
    pub fn with_mercy_threshold(mut self, threshold: Option<u32>) -> Self {
        self.mercy_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.set_hp(hp);
        self
    }

    #[must_use]
    pub fn with_sp(mut self, sp: u32) -> Self {
        self.sp = sp.min(self.max_sp());
        self
    }

    #[must_use]
    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.statuses.apply(effect);
        self
    }

    #[must_use]
    pub fn with_ai(mut self, ai: AiState) -> Self {
        self.ai = Some(ai);
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn sp(&self) -> u32 {
        self.sp
    }

    /// Effective value of `stat` after equipment and status modifiers.
    pub fn stat(&self, stat: Stat) -> u32 {
        let equipment = self
            .equipment
            .iter()
            .filter(|modifier| modifier.stat == stat)
            .map(|modifier| modifier.bonus);
        let statuses = self.statuses.bonuses_for(stat);
        effective_stat(&self.stats, stat, equipment.chain(statuses))
    }

    pub fn max_hp(&self) -> u32 {
        self.stat(Stat::MaxHp)
    }

    pub fn max_sp(&self) -> u32 {
        self.stat(Stat::MaxSp)
    }

    pub fn speed(&self) -> u32 {
        self.stat(Stat::Speed)
    }

    pub fn is_downed(&self) -> bool {
        self.hp == 0
    }

    /// Still taking part: neither downed nor spared.
    pub fn is_active(&self) -> bool {
        !self.is_downed() && !self.spared
    }

    /// True when `hp / max_hp <= percent / 100`, compared exactly.
    pub fn hp_at_or_below(&self, percent: u32) -> bool {
        u64::from(self.hp) * 100 <= u64::from(percent) * u64::from(self.max_hp())
    }

    /// Current HP as a whole percent of max HP, rounded down.
    pub fn hp_percent(&self) -> u32 {
        let max = u64::from(self.max_hp().max(1));
        (u64::from(self.hp) * 100 / max) as u32
    }

    /// Whether this combatant may submit `action` at all (ignores costs).
    pub fn can_use(&self, action: &Action) -> bool {
        match action {
            Action::Skill(_) => self.actions.contains(action),
            Action::Item(_) | Action::Talk | Action::Flee => self.side == Side::Player,
            Action::Attack | Action::Guard | Action::Memory => true,
        }
    }

    pub fn can_be_spared(&self) -> bool {
        self.mercy_threshold.is_some()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Applies `amount` raw damage of `element`, scaled by affinity.
    ///
    /// Returns the post-affinity amount (which may exceed the HP actually
    /// lost). HP floors at 0; reaching 0 downs the combatant and clears its
    /// statuses.
    pub fn apply_damage(&mut self, amount: u32, element: Element) -> u32 {
        if self.is_downed() {
            return 0;
        }
        let dealt = scale_by_affinity(amount, self.affinities.multiplier(element));
        self.hp = self.hp.saturating_sub(dealt);
        if self.is_downed() {
            self.statuses.clear();
        }
        dealt
    }

    /// Heals up to max HP; returns the HP actually restored.
    ///
    /// Downed combatants are not healed; use [`Combatant::revive`].
    pub fn apply_healing(&mut self, amount: u32) -> u32 {
        if self.is_downed() {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
        self.hp - before
    }

    /// Brings a downed combatant back with `hp` (at least 1, at most max).
    ///
    /// Returns the HP it now has, or 0 if it was not downed.
    pub fn revive(&mut self, hp: u32) -> u32 {
        if !self.is_downed() {
            return 0;
        }
        self.hp = hp.clamp(1, self.max_hp());
        self.hp
    }

    /// Spends SP if enough is available; returns whether it was spent.
    pub fn spend_sp(&mut self, amount: u32) -> bool {
        if self.sp < amount {
            return false;
        }
        self.sp -= amount;
        true
    }

    /// Restores SP up to max; returns the SP actually restored.
    pub fn restore_sp(&mut self, amount: u32) -> u32 {
        let before = self.sp;
        self.sp = self.sp.saturating_add(amount).min(self.max_sp());
        self.sp - before
    }

    /// Applies a status effect following its stacking policy.
    ///
    /// Downed combatants accept no statuses.
    pub fn add_status(&mut self, effect: StatusEffect) -> StatusApplication {
        if self.is_downed() {
            return StatusApplication::Ignored;
        }
        self.statuses.apply(effect)
    }

    /// Adds morale and reports whether the combatant is now spared.
    pub fn add_morale(&mut self, amount: u32) -> bool {
        self.morale = self.morale.saturating_add(amount);
        let reached = self
            .mercy_threshold
            .is_some_and(|threshold| self.morale >= threshold);
        if reached && !self.is_downed() {
            self.spared = true;
        }
        self.spared
    }

    /// Sets HP directly, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }

    pub fn set_sp(&mut self, sp: u32) {
        self.sp = sp.min(self.max_sp());
    }
}
