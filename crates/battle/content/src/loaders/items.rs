//! Item catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use battle_core::{GameError, ItemCatalog, ItemDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for the item catalog.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: ItemFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for item in &file.items {
            if !seen.insert(item.id.clone()) {
                anyhow::bail!("Duplicate item id '{}'", item.id);
            }
            item.validate().map_err(|e| anyhow::anyhow!("[{}] {}", e.error_code(), e))?;
        }

        tracing::debug!(count = file.items.len(), "loaded items");
        Ok(file.items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ItemEffect, ItemId, ItemOracle};

    #[test]
    fn bundled_items_parse() {
        let catalog = ItemLoader::parse(include_str!("../../data/items.ron")).unwrap();
        let potion = catalog.item(&ItemId::new("potion")).unwrap();
        assert_eq!(potion.effect, ItemEffect::Heal(30));
    }

    #[test]
    fn revive_must_target_the_downed() {
        let ron = r#"(items: [
            (id: "feather", name: "Feather", targeting: SingleAlly, effect: Revive(10)),
        ])"#;
        let err = ItemLoader::parse(ron).unwrap_err();
        assert!(err.to_string().contains("item 'feather'"));
    }
}
