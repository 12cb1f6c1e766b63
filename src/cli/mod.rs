//! CLI module for Repograph.
//!
//! Subcommands:
//! - `visualize`: Render a graph JSON file in 3D
//! - `scan`: Build a graph from git history, then render or save it

mod scan;
mod visualize;

use clap::{Parser, Subcommand};

use crate::config::Config;

pub use scan::ScanCommand;
pub use visualize::VisualizeCommand;

/// Repograph - 3D repository activity graph
#[derive(Parser)]
#[command(name = "repograph")]
#[command(about = "Explore a repository's files as an interactive 3D graph")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Visualize a graph from a JSON file in 3D
    Visualize(VisualizeCommand),

    /// Build a co-edit graph from a git repository
    Scan(ScanCommand),
}

impl App {
    /// Run the CLI application.
    pub fn run(self, config: Config) -> color_eyre::Result<()> {
        match self.command {
            Command::Visualize(cmd) => cmd.run(&config),
            Command::Scan(cmd) => cmd.run(&config),
        }
    }
}
