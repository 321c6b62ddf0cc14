//! Content loaders for reading battle data from files.
//!
//! Each loader offers `load(path)` for files on disk and `parse(str)` for
//! embedded data; [`ContentFactory`] ties them together for a whole
//! content directory.

pub mod config;
pub mod encounter;
pub mod factory;
pub mod items;
pub mod party;
pub mod skills;

pub use config::ConfigLoader;
pub use encounter::{EncounterLoader, EncounterSpec, EnemySpec};
pub use factory::{Content, ContentFactory};
pub use items::ItemLoader;
pub use party::{Party, PartyLoader, PartyMemberSpec};
pub use skills::SkillLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
