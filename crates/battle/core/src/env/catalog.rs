use std::collections::BTreeMap;

use crate::action::{ItemDefinition, ItemId, SkillDefinition, SkillId};

/// Read-only lookup of skill definitions by id.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition>;
}

/// Read-only lookup of item definitions by id.
pub trait ItemOracle: Send + Sync {
    fn item(&self, id: &ItemId) -> Option<&ItemDefinition>;
}

/// In-memory skill table, usually built by the content loaders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    skills: BTreeMap<SkillId, SkillDefinition>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, skill: SkillDefinition) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }
}

impl FromIterator<SkillDefinition> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = SkillDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for skill in iter {
            catalog.insert(skill);
        }
        catalog
    }
}

impl SkillOracle for SkillCatalog {
    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }
}

/// In-memory item table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }
}

impl FromIterator<ItemDefinition> for ItemCatalog {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for item in iter {
            catalog.insert(item);
        }
        catalog
    }
}

impl ItemOracle for ItemCatalog {
    fn item(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.get(id)
    }
}
