//! Subcommands.

mod list;
mod run;
mod verify;

pub use list::List;
pub use run::Run;
pub use verify::Verify;

use std::path::{Path, PathBuf};

use anyhow::Result;
use battle_content::{Content, ContentFactory};
use clap::Args;

/// Where content is read from; shared by every subcommand.
#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Content directory (config.toml, skills.ron, items.ron, party.ron, encounters/)
    #[arg(short, long, value_name = "DIR", default_value = "crates/battle/content/data")]
    content: PathBuf,
}

impl ContentArgs {
    pub fn load(&self) -> Result<Content> {
        ContentFactory::new(&self.content).load()
    }

    pub fn dir(&self) -> &Path {
        &self.content
    }
}
