//! Repository graph models: files as nodes, co-edit relations as edges.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A file in the repository graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Unique node identifier (usually the repository-relative path).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of commits that touched this file.
    #[serde(default)]
    pub edit_count: u32,
    /// Number of lines in the file.
    #[serde(default, alias = "lengthOfFile")]
    pub file_length: u32,
}

/// A relation between two files. Direction carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEdge {
    /// Unique edge identifier.
    pub id: String,
    /// Source node ID.
    pub source: String,
    /// Target node ID.
    pub target: String,
}

/// The node and edge sets for one viewing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoGraph {
    /// File nodes.
    pub nodes: Vec<FileNode>,
    /// Relations between files.
    #[serde(default)]
    pub edges: Vec<FileEdge>,
}

impl RepoGraph {
    /// Parse a graph from its JSON representation.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Largest edit count in the graph, or 0 when empty.
    pub fn max_edit_count(&self) -> u32 {
        self.nodes.iter().map(|n| n.edit_count).max().unwrap_or(0)
    }

    /// Edges whose endpoints do not both exist in the node set.
    pub fn dangling_edges(&self) -> Vec<&FileEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }
}
