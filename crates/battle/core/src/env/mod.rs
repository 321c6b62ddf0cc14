//! Read-only battle data and the per-resolution context.
//!
//! Oracles expose skill and item definitions plus the RNG. [`BattleEnv`]
//! bundles them with the [`BattleConfig`] so the engine never couples to a
//! concrete content source. [`BattleContext`] adds the one piece of mutable
//! outside state a resolution touches: the party inventory.
mod catalog;
mod inventory;
mod rng;

pub use catalog::{ItemCatalog, ItemOracle, SkillCatalog, SkillOracle};
pub use inventory::{Inventory, ItemBag};
pub use rng::{FixedRng, PcgRng, RngOracle, compute_seed};

use crate::action::{ItemDefinition, ItemId, SkillDefinition, SkillId};
use crate::config::BattleConfig;

/// Aggregates read-only oracles required by the resolvers and the AI.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    skills: &'a dyn SkillOracle,
    items: &'a dyn ItemOracle,
    rng: &'a dyn RngOracle,
    config: &'a BattleConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        skills: &'a dyn SkillOracle,
        items: &'a dyn ItemOracle,
        rng: &'a dyn RngOracle,
        config: &'a BattleConfig,
    ) -> Self {
        Self {
            skills,
            items,
            rng,
            config,
        }
    }

    pub fn skill(&self, id: &SkillId) -> Option<&'a SkillDefinition> {
        self.skills.skill(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&'a ItemDefinition> {
        self.items.item(id)
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a BattleConfig {
        self.config
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

/// Everything a single resolution needs beyond the battle state itself.
pub struct BattleContext<'a> {
    pub env: BattleEnv<'a>,
    pub inventory: &'a mut dyn Inventory,
}

impl<'a> BattleContext<'a> {
    pub fn new(env: BattleEnv<'a>, inventory: &'a mut dyn Inventory) -> Self {
        Self { env, inventory }
    }
}
