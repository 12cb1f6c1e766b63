//! Visualize subcommand - render graph from JSON file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::AppError;
use crate::git::GitOps;
use crate::models::RepoGraph;
use crate::visualization::run_visualizer;

/// Visualize a graph from a JSON file.
#[derive(Parser)]
pub struct VisualizeCommand {
    /// Path to JSON file with `nodes` and `edges`.
    pub input: PathBuf,

    /// Repository the node IDs are paths in; enables commit history.
    #[arg(short, long)]
    pub repo: Option<PathBuf>,
}

/// Read and validate a graph file.
pub fn load_graph(path: &std::path::Path) -> Result<RepoGraph, AppError> {
    let content = std::fs::read_to_string(path)?;
    let graph = RepoGraph::from_json(&content)?;
    if graph.nodes.is_empty() {
        return Err(AppError::EmptyGraph);
    }

    let dangling = graph.dangling_edges().len();
    if dangling > 0 {
        tracing::debug!("{} edges reference unknown nodes and will be skipped", dangling);
    }
    tracing::info!(
        "Loaded {} nodes and {} edges from {}",
        graph.nodes.len(),
        graph.edges.len(),
        path.display()
    );
    Ok(graph)
}

impl VisualizeCommand {
    /// Run the visualize command.
    pub fn run(self, config: &Config) -> color_eyre::Result<()> {
        let graph = load_graph(&self.input)?;

        let history_root = match &self.repo {
            Some(path) => Some(GitOps::open(path)?.workdir().unwrap_or_else(|| path.clone())),
            None => None,
        };

        run_visualizer(&graph, history_root, config);
        Ok(())
    }
}
