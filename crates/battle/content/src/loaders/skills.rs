//! Skill catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use battle_core::{GameError, SkillCatalog, SkillDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillFile {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for the skill catalog.
pub struct SkillLoader;

impl SkillLoader {
    /// Load the skill catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a `SkillFile`
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Parse and validate a skill catalog.
    ///
    /// Rejects duplicate ids and definitions whose numbers are out of range.
    pub fn parse(content: &str) -> LoadResult<SkillCatalog> {
        let file: SkillFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for skill in &file.skills {
            if !seen.insert(skill.id.clone()) {
                anyhow::bail!("Duplicate skill id '{}'", skill.id);
            }
            skill.validate().map_err(|e| anyhow::anyhow!("[{}] {}", e.error_code(), e))?;
        }

        tracing::debug!(count = file.skills.len(), "loaded skills");
        Ok(file.skills.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{SkillId, SkillOracle};

    #[test]
    fn bundled_skills_parse() {
        let catalog = SkillLoader::parse(include_str!("../../data/skills.ron")).unwrap();
        assert!(catalog.skill(&SkillId::new("fire")).is_some());
        assert!(catalog.skill(&SkillId::new("sting")).is_some());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ron = r#"(skills: [
            (id: "bite", name: "Bite", sp_cost: 0, power: 100, element: Physical,
             targeting: SingleEnemy, effect: Damage),
            (id: "bite", name: "Bite", sp_cost: 0, power: 120, element: Physical,
             targeting: SingleEnemy, effect: Damage),
        ])"#;
        let err = SkillLoader::parse(ron).unwrap_err();
        assert!(err.to_string().contains("Duplicate skill id 'bite'"));
    }

    #[test]
    fn out_of_range_hit_chance_is_rejected() {
        let ron = r#"(skills: [
            (id: "lunge", name: "Lunge", sp_cost: 1, power: 100, element: Physical,
             targeting: SingleEnemy, hit_chance: Some(140), effect: Damage),
        ])"#;
        let err = SkillLoader::parse(ron).unwrap_err();
        assert!(err.to_string().contains("skill 'lunge'"));
    }
}
