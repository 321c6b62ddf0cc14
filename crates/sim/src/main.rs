//! Command-line driver for the battle engine.
//!
//! Loads a content directory, plays encounters with a scripted or automatic
//! party, and checks that replays are deterministic.
//! Run with: `cargo run -p battle-sim -- <command>`

mod commands;
mod driver;
mod report;

use anyhow::Result;
use clap::Parser;
use commands::{List, Run, Verify};

/// Turn-based battle simulator
#[derive(Parser)]
#[command(name = "battle-sim")]
#[command(about = "Play and verify battle encounters", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play an encounter and print the combat log
    Run(Run),

    /// Play encounters twice and compare state digests
    Verify(Verify),

    /// List the encounters in a content directory
    List(List),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Verify(cmd) => cmd.execute(),
        Command::List(cmd) => cmd.execute(),
    }
}
