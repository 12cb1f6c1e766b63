//! Domain models for the repository graph.

mod commit;
mod graph;

pub use commit::CommitInfo;
pub use graph::{FileEdge, FileNode, RepoGraph};
