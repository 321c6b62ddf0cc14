//! Skill and item definitions supplied by content.

use super::Targeting;
use crate::combat::Element;
use crate::error::ConfigError;
use crate::status::{StackPolicy, StatusKind};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SkillId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which stats a skill's damage uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scaling {
    /// Actor Attack against target Defense.
    #[default]
    Attack,
    /// Actor Magic against target Magic.
    Magic,
}

/// A status a skill or item may apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusInfliction {
    pub kind: StatusKind,
    /// Base chance percent before the target's resistance.
    pub chance: u32,
    pub duration: u32,
    pub potency: u32,
    /// Overrides the kind's default stacking policy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: Option<StackPolicy>,
}

impl StatusInfliction {
    pub fn new(kind: StatusKind, chance: u32, duration: u32, potency: u32) -> Self {
        Self {
            kind,
            chance,
            duration,
            potency,
            policy: None,
        }
    }

    pub fn policy(&self) -> StackPolicy {
        self.policy.unwrap_or(self.kind.default_policy())
    }
}

/// Primary effect of a skill on each target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Damage scaled by `power`; the infliction (if any) rolls only on a hit.
    Damage,
    /// Heal `magic × power / 100`.
    Heal,
    /// No direct effect; only the infliction applies.
    Support,
    /// Remove the listed statuses.
    Cure(Vec<StatusKind>),
    /// Revive a downed ally with a percent of max HP.
    Revive { hp_percent: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub sp_cost: u32,
    /// Power percent; `100` means the actor's full offensive stat.
    pub power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: Scaling,
    pub element: Element,
    pub targeting: Targeting,
    /// Percent chance to land; `None` always hits.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hit_chance: Option<u32>,
    pub effect: SkillEffect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub infliction: Option<StatusInfliction>,
}

/// Effect of consuming one item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    Heal(u32),
    RestoreSp(u32),
    Cure(Vec<StatusKind>),
    /// Revive a downed ally with this much HP.
    Revive(u32),
    /// Guaranteed status application (chance is ignored).
    ApplyStatus(StatusInfliction),
    /// Fixed damage of an element; ignores the target's defense.
    Damage { amount: u32, element: Element },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub targeting: Targeting,
    pub effect: ItemEffect,
}

impl SkillDefinition {
    /// Rejects definitions whose numbers cannot mean anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check().map_err(|reason| ConfigError::InvalidDefinition {
            owner: format!("skill '{}'", self.id),
            reason,
        })
    }

    fn check(&self) -> Result<(), &'static str> {
        if self.hit_chance.is_some_and(|chance| chance > 100) {
            return Err("hit_chance must be within 0..=100");
        }
        if let Some(infliction) = &self.infliction {
            check_infliction(infliction)?;
        }
        match (&self.effect, self.targeting) {
            (SkillEffect::Revive { .. }, targeting) if targeting != Targeting::DownedAlly => {
                Err("revive skills must target a downed ally")
            }
            (SkillEffect::Support, _) if self.infliction.is_none() => {
                Err("support skills need an infliction")
            }
            _ => Ok(()),
        }
    }
}

impl ItemDefinition {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check().map_err(|reason| ConfigError::InvalidDefinition {
            owner: format!("item '{}'", self.id),
            reason,
        })
    }

    fn check(&self) -> Result<(), &'static str> {
        match &self.effect {
            ItemEffect::Revive(_) if self.targeting != Targeting::DownedAlly => {
                Err("revive items must target a downed ally")
            }
            ItemEffect::ApplyStatus(infliction) => check_infliction(infliction),
            _ => Ok(()),
        }
    }
}

fn check_infliction(infliction: &StatusInfliction) -> Result<(), &'static str> {
    if infliction.chance > 100 {
        return Err("infliction chance must be within 0..=100");
    }
    if infliction.duration == 0 {
        return Err("infliction duration must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bite() -> SkillDefinition {
        SkillDefinition {
            id: SkillId::new("bite"),
            name: "Bite".into(),
            sp_cost: 0,
            power: 120,
            scaling: Scaling::Attack,
            element: Element::Physical,
            targeting: Targeting::SingleEnemy,
            hit_chance: Some(90),
            effect: SkillEffect::Damage,
            infliction: Some(StatusInfliction::new(StatusKind::Bleed, 30, 2, 3)),
        }
    }

    #[test]
    fn well_formed_skill_passes() {
        assert_eq!(bite().validate(), Ok(()));
    }

    #[test]
    fn zero_duration_infliction_is_rejected() {
        let mut skill = bite();
        skill.infliction = Some(StatusInfliction::new(StatusKind::Bleed, 30, 0, 3));
        assert_eq!(
            skill.validate(),
            Err(ConfigError::InvalidDefinition {
                owner: "skill 'bite'".into(),
                reason: "infliction duration must be at least 1",
            })
        );
    }

    #[test]
    fn revive_item_must_target_downed_ally() {
        let item = ItemDefinition {
            id: ItemId::new("phoenix_down"),
            name: "Phoenix Down".into(),
            targeting: Targeting::SingleAlly,
            effect: ItemEffect::Revive(10),
        };
        assert!(matches!(
            item.validate(),
            Err(ConfigError::InvalidDefinition { .. })
        ));
    }
}
