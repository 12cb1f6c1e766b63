//! Scan subcommand - build a graph from git history.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::AppError;
use crate::git::GitOps;
use crate::visualization::run_visualizer;

/// Build a co-edit graph from a git repository.
#[derive(Parser)]
pub struct ScanCommand {
    /// Repository to scan.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Write the graph as JSON to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not open the viewer.
    #[arg(long)]
    pub no_view: bool,
}

impl ScanCommand {
    /// Run the scan command.
    pub fn run(self, config: &Config) -> color_eyre::Result<()> {
        let git = GitOps::open(&self.path)?;
        tracing::info!("Scanning {} at {}", self.path.display(), git.get_head_sha()?);

        let graph = git.scan(&config.scan)?;

        if let Some(output) = &self.output {
            let json = serde_json::to_string_pretty(&graph)?;
            std::fs::write(output, json)?;
            tracing::info!("Wrote graph to {}", output.display());
        }

        if self.no_view {
            return Ok(());
        }
        if graph.nodes.is_empty() {
            return Err(AppError::EmptyGraph.into());
        }

        run_visualizer(&graph, git.workdir(), config);
        Ok(())
    }
}
