//! List the encounters in a content directory.

use anyhow::Result;
use clap::Parser;
use console::style;

use super::ContentArgs;

/// List encounters
#[derive(Parser)]
pub struct List {
    #[command(flatten)]
    content: ContentArgs,
}

impl List {
    pub fn execute(self) -> Result<()> {
        let content = self.content.load()?;

        println!("{}", style(format!("Encounters in {}", self.content.dir().display())).bold());
        for encounter in &content.encounters {
            let roster: Vec<_> = encounter.enemies.iter().map(|e| e.name.as_str()).collect();
            let boss = if encounter.boss {
                style(" [boss]").red().to_string()
            } else {
                String::new()
            };
            println!(
                "  {:<12} {}{boss}\n      {}",
                style(&encounter.id).cyan(),
                encounter.name,
                style(roster.join(", ")).dim()
            );
        }
        Ok(())
    }
}
