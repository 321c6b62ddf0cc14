//! Encounter definitions: the enemy roster, its AI and the rewards.

use crate::action::{Action, ItemId, SkillId};
use crate::ai::{AiProfile, AiState};
use crate::combat::Affinities;
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::error::ConfigError;
use crate::state::{Combatant, CombatantId, Side};
use crate::stats::{BaseStats, StatModifier};

/// One possible item drop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub item: ItemId,
    /// Percent chance, rolled independently per entry.
    pub chance: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: u32,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardTable {
    pub experience: u32,
    pub currency: u32,
    pub drops: Vec<DropEntry>,
}

/// Blueprint for one enemy in an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affinities: Affinities,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_resistance: u32,
    /// Falls back to the configured default when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mercy_threshold: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub profile: AiProfile,
}

impl EnemyTemplate {
    pub fn new(name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            stats,
            skills: Vec::new(),
            equipment: Vec::new(),
            affinities: Affinities::default(),
            status_resistance: 0,
            mercy_threshold: None,
            profile: AiProfile::default(),
        }
    }

    #[must_use]
    pub fn with_skills(mut self, skills: impl IntoIterator<Item = SkillId>) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: AiProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn with_mercy_threshold(mut self, threshold: u32) -> Self {
        self.mercy_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_affinities(mut self, affinities: Affinities) -> Self {
        self.affinities = affinities;
        self
    }

    /// Every action this enemy knows: the basic commands plus its skills.
    pub fn known_actions(&self) -> Vec<Action> {
        let mut actions = vec![Action::Attack, Action::Guard, Action::Memory];
        actions.extend(self.skills.iter().cloned().map(Action::Skill));
        actions
    }

    pub fn instantiate(&self, id: CombatantId, config: &BattleConfig) -> Combatant {
        let mut combatant = Combatant::new(self.name.clone(), Side::Enemy, self.stats)
            .with_actions(self.known_actions())
            .with_equipment(self.equipment.iter().copied())
            .with_affinities(self.affinities.clone())
            .with_status_resistance(self.status_resistance.min(config.max_status_resistance))
            .with_mercy_threshold(self.mercy_threshold.or(config.default_mercy_threshold))
            .with_ai(AiState::new(self.profile.clone(), config));
        combatant.id = id;
        combatant
    }
}

/// A complete encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterDefinition {
    pub id: String,
    pub name: String,
    /// Enables multi-phase AI and forbids fleeing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: bool,
    pub enemies: Vec<EnemyTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: RewardTable,
}

impl EncounterDefinition {
    /// Checks roster size, skill references, AI profiles and drops.
    ///
    /// Errors name the enemy by index and name, e.g.
    /// `encounter 'crypt' enemy #1 (Wraith)`.
    pub fn validate(&self, env: &BattleEnv<'_>) -> Result<(), ConfigError> {
        if self.enemies.is_empty() {
            return Err(ConfigError::EmptyEncounter {
                encounter: self.id.clone(),
            });
        }
        if self.enemies.len() > BattleConfig::MAX_ENEMIES {
            return Err(ConfigError::TooManyEnemies {
                encounter: self.id.clone(),
                count: self.enemies.len(),
                max: BattleConfig::MAX_ENEMIES,
            });
        }

        for (index, enemy) in self.enemies.iter().enumerate() {
            let owner = format!("encounter '{}' enemy #{} ({})", self.id, index, enemy.name);
            if enemy.stats.max_hp == 0 {
                return Err(ConfigError::InvalidDefinition {
                    owner,
                    reason: "max_hp must be at least 1",
                });
            }
            for skill in &enemy.skills {
                let Some(definition) = env.skill(skill) else {
                    return Err(ConfigError::UnknownSkill {
                        owner,
                        skill: skill.clone(),
                    });
                };
                definition.validate()?;
            }
            enemy
                .profile
                .validate(&owner, &enemy.known_actions(), self.boss, env)?;
        }

        for drop in &self.rewards.drops {
            let Some(definition) = env.item(&drop.item) else {
                return Err(ConfigError::UnknownItem {
                    owner: format!("encounter '{}' rewards", self.id),
                    item: drop.item.clone(),
                });
            };
            definition.validate()?;
            if drop.chance > 100 {
                return Err(ConfigError::InvalidDefinition {
                    owner: format!("encounter '{}' drop '{}'", self.id, drop.item),
                    reason: "drop chance must be within 0..=100",
                });
            }
        }
        Ok(())
    }
}

/// Checks party size and every skill a member knows.
pub fn validate_party(party: &[Combatant], env: &BattleEnv<'_>) -> Result<(), ConfigError> {
    if party.is_empty() {
        return Err(ConfigError::EmptyParty);
    }
    if party.len() > BattleConfig::MAX_PARTY {
        return Err(ConfigError::TooManyPartyMembers {
            count: party.len(),
            max: BattleConfig::MAX_PARTY,
        });
    }
    for (index, member) in party.iter().enumerate() {
        let skills = member.actions.iter().filter_map(|action| match action {
            Action::Skill(skill) => Some(skill),
            _ => None,
        });
        for skill in skills {
            let Some(definition) = env.skill(skill) else {
                return Err(ConfigError::UnknownSkill {
                    owner: format!("party member #{} ({})", index, member.name),
                    skill: skill.clone(),
                });
            };
            definition.validate()?;
        }
        if member.stats.max_hp == 0 {
            return Err(ConfigError::InvalidDefinition {
                owner: format!("party member #{} ({})", index, member.name),
                reason: "max_hp must be at least 1",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Scaling, SkillDefinition, SkillEffect, Targeting};
    use crate::ai::{ActionTemplate, AiPhase, Rule, TemplateAction, TargetSelector, Predicate};
    use crate::combat::Element;
    use crate::env::{FixedRng, ItemCatalog, SkillCatalog};

    fn slime() -> EnemyTemplate {
        EnemyTemplate::new(
            "Slime",
            BaseStats {
                max_hp: 10,
                attack: 2,
                speed: 3,
                ..BaseStats::default()
            },
        )
    }

    fn encounter(boss: bool, enemies: Vec<EnemyTemplate>) -> EncounterDefinition {
        EncounterDefinition {
            id: "cave".into(),
            name: "Cave".into(),
            boss,
            enemies,
            rewards: RewardTable::default(),
        }
    }

    fn spit() -> SkillDefinition {
        SkillDefinition {
            id: SkillId::new("spit"),
            name: "Spit".into(),
            sp_cost: 2,
            power: 80,
            scaling: Scaling::Attack,
            element: Element::Poison,
            targeting: Targeting::SingleEnemy,
            hit_chance: None,
            effect: SkillEffect::Damage,
            infliction: None,
        }
    }

    #[test]
    fn empty_roster_is_rejected() {
        let skills = SkillCatalog::new();
        let items = ItemCatalog::new();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);

        assert_eq!(
            encounter(false, Vec::new()).validate(&env),
            Err(ConfigError::EmptyEncounter {
                encounter: "cave".into()
            })
        );
    }

    #[test]
    fn unknown_skill_names_the_enemy() {
        let skills = SkillCatalog::new();
        let items = ItemCatalog::new();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);

        let enemy = slime().with_skills([SkillId::new("spit")]);
        assert_eq!(
            encounter(false, vec![slime(), enemy]).validate(&env),
            Err(ConfigError::UnknownSkill {
                owner: "encounter 'cave' enemy #1 (Slime)".into(),
                skill: SkillId::new("spit"),
            })
        );
    }

    #[test]
    fn phases_need_a_boss_encounter() {
        let skills: SkillCatalog = [spit()].into_iter().collect();
        let items = ItemCatalog::new();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);

        let spit_rule = Rule::new(
            Predicate::Always,
            ActionTemplate::new(
                TemplateAction::Skill(SkillId::new("spit")),
                TargetSelector::LowestHpOpponent,
            ),
        );
        let profile = AiProfile {
            phases: vec![
                AiPhase {
                    threshold: 100,
                    rules: Vec::new(),
                },
                AiPhase {
                    threshold: 50,
                    rules: vec![spit_rule],
                },
            ],
            ..AiProfile::default()
        };
        let enemy = slime()
            .with_skills([SkillId::new("spit")])
            .with_profile(profile);

        assert!(matches!(
            encounter(false, vec![enemy.clone()]).validate(&env),
            Err(ConfigError::MultiPhaseRequiresBoss { .. })
        ));
        assert_eq!(encounter(true, vec![enemy]).validate(&env), Ok(()));
    }

    #[test]
    fn instantiated_enemy_uses_configured_mercy() {
        let config = BattleConfig::default().with_default_mercy_threshold(Some(4));
        let enemy = slime().instantiate(CombatantId(3), &config);

        assert_eq!(enemy.id, CombatantId(3));
        assert_eq!(enemy.side, Side::Enemy);
        assert_eq!(enemy.mercy_threshold, Some(4));
        assert_eq!(enemy.hp(), 10);
        assert!(enemy.ai.is_some());

        let stubborn = slime()
            .with_mercy_threshold(9)
            .instantiate(CombatantId(3), &config);
        assert_eq!(stubborn.mercy_threshold, Some(9));
    }

    #[test]
    fn party_size_is_bounded() {
        let skills = SkillCatalog::new();
        let items = ItemCatalog::new();
        let rng = FixedRng::always();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&skills, &items, &rng, &config);

        let member = Combatant::new(
            "Hero",
            Side::Player,
            BaseStats {
                max_hp: 20,
                ..BaseStats::default()
            },
        );
        let party = vec![member; BattleConfig::MAX_PARTY + 1];
        assert_eq!(
            validate_party(&party, &env),
            Err(ConfigError::TooManyPartyMembers {
                count: BattleConfig::MAX_PARTY + 1,
                max: BattleConfig::MAX_PARTY,
            })
        );
        assert_eq!(validate_party(&[], &env), Err(ConfigError::EmptyParty));
    }
}
