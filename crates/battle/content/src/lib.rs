//! Data-driven battle content and its loaders.
//!
//! Content lives in RON/TOML files and is parsed once into `battle-core`
//! types:
//! - skill and item catalogs (RON)
//! - the party roster and starting inventory (RON)
//! - encounters, one file each (RON)
//! - balance configuration (TOML)
//!
//! Every reference between files is resolved and validated at load time, so
//! a battle built from loaded content never meets an unknown id.

pub mod loaders;

pub use loaders::{
    ConfigLoader, Content, ContentFactory, EncounterLoader, EncounterSpec, EnemySpec, ItemLoader,
    LoadResult, Party, PartyLoader, PartyMemberSpec, SkillLoader,
};
