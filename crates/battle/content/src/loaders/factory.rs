//! Content factory for loading a whole content directory.

use std::path::{Path, PathBuf};

use battle_core::{
    BattleConfig, BattleEnv, EncounterDefinition, ItemCatalog, PcgRng, RngOracle, SkillCatalog,
};

use crate::loaders::{
    ConfigLoader, EncounterLoader, EncounterSpec, ItemLoader, LoadResult, Party, PartyLoader,
    SkillLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// ├── items.ron
/// ├── party.ron
/// └── encounters/
///     ├── meadow.ron
///     └── crypt.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    ///
    /// A missing file means the default configuration.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load every `encounters/*.ron` spec, sorted by file name.
    pub fn load_encounter_specs(&self) -> LoadResult<Vec<EncounterSpec>> {
        let dir = self.data_dir.join("encounters");
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            anyhow::anyhow!("Failed to read encounter directory {}: {}", dir.display(), e)
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| anyhow::anyhow!("Failed to read entry in {}: {}", dir.display(), e))?
                .path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| EncounterLoader::load(path)).collect()
    }

    /// Load and cross-check everything in the directory.
    pub fn load(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let skills = self.load_skills()?;
        let items = self.load_items()?;
        let party = PartyLoader::load(&self.data_dir.join("party.ron"), &skills, &items)?;

        let specs = self.load_encounter_specs()?;
        let rng = PcgRng;
        let env = BattleEnv::new(&skills, &items, &rng, &config);
        let mut encounters: Vec<EncounterDefinition> = Vec::with_capacity(specs.len());
        for spec in &specs {
            if encounters.iter().any(|e| e.id == spec.id) {
                anyhow::bail!("Duplicate encounter id '{}'", spec.id);
            }
            encounters.push(EncounterLoader::resolve(spec, &env)?);
        }

        tracing::info!(
            dir = %self.data_dir.display(),
            skills = skills.len(),
            items = items.len(),
            party = party.members.len(),
            encounters = encounters.len(),
            "content loaded"
        );

        Ok(Content {
            config,
            skills,
            items,
            party,
            encounters,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Everything a battle needs, loaded and validated.
#[derive(Debug, Clone)]
pub struct Content {
    pub config: BattleConfig,
    pub skills: SkillCatalog,
    pub items: ItemCatalog,
    pub party: Party,
    pub encounters: Vec<EncounterDefinition>,
}

impl Content {
    pub fn encounter(&self, id: &str) -> Option<&EncounterDefinition> {
        self.encounters.iter().find(|e| e.id == id)
    }

    /// Builds a battle environment over this content.
    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle) -> BattleEnv<'a> {
        BattleEnv::new(&self.skills, &self.items, rng, &self.config)
    }
}
