//! Replay encounters and compare state digests.

use anyhow::Result;
use clap::Parser;
use console::style;

use super::ContentArgs;
use crate::driver::{parse_script, play};

/// Check that replays are deterministic
#[derive(Parser)]
pub struct Verify {
    #[command(flatten)]
    content: ContentArgs,

    /// Encounter id; every encounter when omitted
    #[arg(short, long, value_name = "ID")]
    encounter: Option<String>,

    /// Battle seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Comma-separated player commands (see `run --help`)
    #[arg(long, value_name = "COMMANDS", default_value = "")]
    script: String,
}

impl Verify {
    pub fn execute(self) -> Result<()> {
        let content = self.content.load()?;
        let script = parse_script(&self.script)?;
        let ids: Vec<String> = match self.encounter {
            Some(id) => vec![id],
            None => content.encounters.iter().map(|e| e.id.clone()).collect(),
        };

        let mut mismatches = 0;
        for id in &ids {
            let first = play(&content, id, self.seed, &script)?;
            let second = play(&content, id, self.seed, &script)?;
            let a = hex::encode(first.state.digest()?);
            let b = hex::encode(second.state.digest()?);

            if a == b {
                println!("{} {:<12} {} {}", style("ok").green(), id, first.outcome.kind, style(&a[..16]).dim());
            } else {
                mismatches += 1;
                println!("{} {:<12} {a} != {b}", style("MISMATCH").red().bold(), id);
                tracing::error!(encounter = %id, seed = self.seed, "replay diverged");
            }
        }

        if mismatches > 0 {
            anyhow::bail!("{mismatches} of {} encounters diverged on replay", ids.len());
        }
        Ok(())
    }
}
