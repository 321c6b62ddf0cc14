//! Encounter loader.
//!
//! An encounter file describes one fight. Enemies may share named AI
//! profiles and may appear several times via `count`:
//!
//! ```ron
//! (
//!     id: "wolf_den",
//!     name: "Wolf Den",
//!     profiles: {"pack": (group: Some("den"))},
//!     enemies: [
//!         (name: "Wolf", stats: (max_hp: 18, attack: 5, speed: 6), uses: Some("pack"), count: 2),
//!     ],
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{
    AiProfile, Affinities, BaseStats, BattleEnv, EncounterDefinition, EnemyTemplate, GameError,
    Predicate, RewardTable, SkillId, StatModifier, TemplateAction,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One enemy entry as written in content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    pub stats: BaseStats,
    #[serde(default)]
    pub skills: Vec<SkillId>,
    #[serde(default)]
    pub equipment: Vec<StatModifier>,
    #[serde(default)]
    pub affinities: Affinities,
    #[serde(default)]
    pub status_resistance: u32,
    #[serde(default)]
    pub mercy_threshold: Option<u32>,
    /// Inline AI profile.
    #[serde(default)]
    pub ai: Option<AiProfile>,
    /// Name of a profile declared in the encounter's `profiles`.
    #[serde(default)]
    pub uses: Option<String>,
    /// Copies to spawn; copies are suffixed A, B, C... in roster order.
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// Encounter structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub profiles: BTreeMap<String, AiProfile>,
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub rewards: RewardTable,
}

/// Loader that parses encounter files and resolves them against catalogs.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load an encounter spec from a RON file without resolving it.
    pub fn load(path: &Path) -> LoadResult<EncounterSpec> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))
    }

    /// Resolves a spec into a validated [`EncounterDefinition`].
    ///
    /// Unknown skill, item and profile references are collected and reported
    /// together, each with the enemy (and rule) where it occurs. Structural
    /// problems (empty roster, phase thresholds, party-only actions) are then
    /// reported by the core validation.
    pub fn resolve(spec: &EncounterSpec, env: &BattleEnv<'_>) -> LoadResult<EncounterDefinition> {
        let problems = unknown_references(spec, env);
        if !problems.is_empty() {
            anyhow::bail!(
                "Encounter '{}' has unresolved references:\n  {}",
                spec.id,
                problems.join("\n  ")
            );
        }

        let mut enemies = Vec::new();
        for enemy in &spec.enemies {
            let profile = match (&enemy.ai, &enemy.uses) {
                (Some(_), Some(name)) => anyhow::bail!(
                    "Encounter '{}' enemy '{}' sets both `ai` and `uses: \"{}\"`",
                    spec.id,
                    enemy.name,
                    name
                ),
                (Some(profile), None) => profile.clone(),
                (None, Some(name)) => spec.profiles.get(name).cloned().ok_or_else(|| {
                    anyhow::anyhow!("Encounter '{}' has no profile '{}'", spec.id, name)
                })?,
                (None, None) => AiProfile::default(),
            };

            let template = EnemyTemplate {
                name: enemy.name.clone(),
                stats: enemy.stats,
                skills: enemy.skills.clone(),
                equipment: enemy.equipment.clone(),
                affinities: enemy.affinities.clone(),
                status_resistance: enemy.status_resistance,
                mercy_threshold: enemy.mercy_threshold,
                profile,
            };
            match enemy.count {
                0 => {}
                1 => enemies.push(template),
                count => {
                    for copy in 0..count {
                        enemies.push(EnemyTemplate {
                            name: format!("{} {}", enemy.name, copy_suffix(copy)),
                            ..template.clone()
                        });
                    }
                }
            }
        }

        let definition = EncounterDefinition {
            id: spec.id.clone(),
            name: spec.name.clone(),
            boss: spec.boss,
            enemies,
            rewards: spec.rewards.clone(),
        };
        definition
            .validate(env)
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.error_code(), e))?;

        tracing::debug!(
            encounter = %definition.id,
            enemies = definition.enemies.len(),
            boss = definition.boss,
            "resolved encounter"
        );
        Ok(definition)
    }
}

/// `A`..`Z`, then `AA`, `AB`...
fn copy_suffix(index: u32) -> String {
    let mut index = index;
    let mut suffix = Vec::new();
    loop {
        suffix.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    suffix.iter().rev().map(|&b| b as char).collect()
}

fn unknown_references(spec: &EncounterSpec, env: &BattleEnv<'_>) -> Vec<String> {
    let mut problems = Vec::new();

    for (name, profile) in &spec.profiles {
        profile_references(profile, env, &format!("profile '{name}'"), &mut problems);
    }
    for (index, enemy) in spec.enemies.iter().enumerate() {
        let owner = format!("enemy #{index} ({})", enemy.name);
        for skill in enemy.skills.iter().filter(|id| env.skill(id).is_none()) {
            problems.push(format!("{owner}: unknown skill '{skill}'"));
        }
        if let Some(profile) = &enemy.ai {
            profile_references(profile, env, &owner, &mut problems);
        }
        if let Some(name) = enemy.uses.as_ref().filter(|name| !spec.profiles.contains_key(*name)) {
            problems.push(format!("{owner}: unknown profile '{name}'"));
        }
    }
    for drop in spec.rewards.drops.iter().filter(|d| env.item(&d.item).is_none()) {
        problems.push(format!("rewards: unknown item '{}'", drop.item));
    }

    problems
}

fn profile_references(
    profile: &AiProfile,
    env: &BattleEnv<'_>,
    owner: &str,
    problems: &mut Vec<String>,
) {
    for (phase_index, phase) in profile.phases.iter().enumerate() {
        for (rule_index, rule) in phase.rules.iter().enumerate() {
            let location = format!("{owner} phase {phase_index} rule {rule_index}");
            predicate_skills(&rule.when, &mut |id| {
                if env.skill(id).is_none() {
                    problems.push(format!("{location}: unknown skill '{id}' in condition"));
                }
            });
            template_skill(&rule.then.action, env, &location, problems);
        }
    }
    template_skill(&profile.fallback.action, env, &format!("{owner} fallback"), problems);
}

fn template_skill(
    action: &TemplateAction,
    env: &BattleEnv<'_>,
    location: &str,
    problems: &mut Vec<String>,
) {
    let TemplateAction::Skill(id) = action else {
        return;
    };
    if env.skill(id).is_none() {
        problems.push(format!("{location}: unknown skill '{id}'"));
    }
}

/// Visits every skill id a predicate mentions.
fn predicate_skills(predicate: &Predicate, visit: &mut dyn FnMut(&SkillId)) {
    use battle_core::IntentTag;

    match predicate {
        Predicate::AllyIntent(IntentTag::UsedSkill(id)) => visit(id),
        Predicate::All(inner) | Predicate::Any(inner) => {
            for p in inner {
                predicate_skills(p, visit);
            }
        }
        Predicate::Not(inner) => predicate_skills(inner, visit),
        _ => {}
    }
}
