//! Play one encounter and print the combat log.

use anyhow::{Context, Result};
use clap::Parser;

use super::ContentArgs;
use crate::driver::{parse_script, play};
use crate::report;

/// Play an encounter
#[derive(Parser)]
pub struct Run {
    #[command(flatten)]
    content: ContentArgs,

    /// Encounter id (see `list`)
    #[arg(short, long, value_name = "ID")]
    encounter: String,

    /// Battle seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Comma-separated player commands, e.g. `attack:2,skill:fire,guard`.
    /// The autopilot plays once the script runs out.
    #[arg(long, value_name = "COMMANDS", default_value = "")]
    script: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Colored combat log followed by the outcome
    Text,
    /// Final battle state as RON
    Ron,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let content = self.content.load()?;
        let script = parse_script(&self.script)?;
        let played = play(&content, &self.encounter, self.seed, &script)?;

        tracing::info!(
            encounter = %self.encounter,
            seed = self.seed,
            outcome = %played.outcome.kind,
            rounds = played.state.round,
            player_turns = played.player_turns,
            "battle finished"
        );

        match self.format {
            OutputFormat::Text => println!("{}", report::render(&played)),
            OutputFormat::Ron => {
                let text = ron::ser::to_string_pretty(&played.state, ron::ser::PrettyConfig::default())
                    .context("Failed to serialize battle state")?;
                println!("{text}");
            }
        }
        Ok(())
    }
}
