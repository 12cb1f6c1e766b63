//! Git operations for building repository graphs and file histories.
//!
//! Provides utilities for working with git repositories:
//! - Scan history into a co-edit graph (files as nodes)
//! - List the commits that touched a single file
//! - Count lines of files at HEAD

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::DateTime;
use git2::{Commit, ObjectType, Repository, Sort, Tree, TreeWalkMode, TreeWalkResult};

use crate::config::ScanConfig;
use crate::error::AppError;
use crate::models::{CommitInfo, FileEdge, FileNode, RepoGraph};

/// Git operations helper.
pub struct GitOps {
    repo: Repository,
}

fn git_err(context: &'static str) -> impl Fn(git2::Error) -> AppError {
    move |e| AppError::GitMessage {
        message: format!("{}: {}", context, e),
    }
}

impl GitOps {
    /// Open a git repository at the given path (or any parent of it).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .map_err(|_| AppError::RepoNotFound(path.display().to_string()))?;
        Ok(Self { repo })
    }

    /// Root of the working tree, if the repository has one.
    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    /// Get the current HEAD commit SHA.
    pub fn get_head_sha(&self) -> Result<String, AppError> {
        Ok(self.head_commit()?.id().to_string())
    }

    fn head_commit(&self) -> Result<Commit<'_>, AppError> {
        let head = self.repo.head().map_err(git_err("Failed to get HEAD"))?;
        head.peel_to_commit()
            .map_err(git_err("Failed to get HEAD commit"))
    }

    /// Commits reachable from HEAD, newest first.
    fn history(&self, limit: usize) -> Result<Vec<Commit<'_>>, AppError> {
        let mut walk = self.repo.revwalk().map_err(git_err("Failed to walk history"))?;
        walk.push_head().map_err(git_err("Failed to get HEAD"))?;
        walk.set_sorting(Sort::TIME)
            .map_err(git_err("Failed to sort history"))?;

        let mut commits = Vec::new();
        for oid in walk.take(limit) {
            let oid = oid.map_err(git_err("Failed to walk history"))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(git_err("Commit not found"))?;
            commits.push(commit);
        }
        Ok(commits)
    }

    /// Paths changed by a commit relative to its first parent.
    ///
    /// Root commits report every file they add.
    fn changed_paths(&self, commit: &Commit<'_>) -> Result<Vec<String>, AppError> {
        let tree = commit.tree().map_err(git_err("Failed to get tree"))?;
        let parent_tree: Option<Tree<'_>> = match commit.parent(0) {
            Ok(parent) => Some(parent.tree().map_err(git_err("Failed to get tree"))?),
            Err(_) => None,
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(git_err("Failed to compute diff"))?;

        let mut paths = Vec::new();
        diff.foreach(
            &mut |delta, _| {
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().to_string());
                if let Some(path) = path {
                    paths.push(path);
                }
                true
            },
            None,
            None,
            None,
        )
        .map_err(git_err("Failed to iterate diff"))?;

        Ok(paths)
    }

    /// Line counts of every blob in the HEAD tree, keyed by path.
    ///
    /// Binary files count as zero lines.
    pub fn head_file_lengths(&self) -> Result<HashMap<String, u32>, AppError> {
        let tree = self
            .head_commit()?
            .tree()
            .map_err(git_err("Failed to get tree"))?;

        let mut lengths = HashMap::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let Some(name) = entry.name() else {
                return TreeWalkResult::Ok;
            };
            if let Ok(blob) = self.repo.find_blob(entry.id()) {
                let lines = if blob.is_binary() {
                    0
                } else {
                    count_lines(blob.content())
                };
                lengths.insert(format!("{}{}", root, name), lines);
            }
            TreeWalkResult::Ok
        })
        .map_err(git_err("Failed to walk tree"))?;

        Ok(lengths)
    }

    /// Build a co-edit graph from the repository history.
    ///
    /// Nodes are files present at HEAD that were edited at least once within
    /// the scanned commits. Two files are connected when they changed together
    /// in at least `min_coedits` commits.
    pub fn scan(&self, config: &ScanConfig) -> Result<RepoGraph, AppError> {
        let lengths = self.head_file_lengths()?;
        let commits = self.history(config.max_commits)?;

        let mut edit_counts: BTreeMap<String, u32> = BTreeMap::new();
        let mut pair_counts: BTreeMap<(String, String), u32> = BTreeMap::new();

        for commit in &commits {
            let mut paths: Vec<String> = self
                .changed_paths(commit)?
                .into_iter()
                .filter(|p| lengths.contains_key(p))
                .collect();
            paths.sort();
            paths.dedup();

            for path in &paths {
                *edit_counts.entry(path.clone()).or_default() += 1;
            }

            if paths.len() > config.max_files_per_commit {
                tracing::debug!(
                    "Skipping co-edits for commit {} ({} files)",
                    commit.id(),
                    paths.len()
                );
                continue;
            }

            for (i, a) in paths.iter().enumerate() {
                for b in &paths[i + 1..] {
                    *pair_counts.entry((a.clone(), b.clone())).or_default() += 1;
                }
            }
        }

        let nodes: Vec<FileNode> = edit_counts
            .iter()
            .map(|(path, &edit_count)| FileNode {
                id: path.clone(),
                name: file_name(path),
                edit_count,
                file_length: lengths.get(path).copied().unwrap_or(0),
            })
            .collect();

        let edges: Vec<FileEdge> = pair_counts
            .into_iter()
            .filter(|(_, count)| *count >= config.min_coedits)
            .map(|((a, b), _)| FileEdge {
                id: format!("{}|{}", a, b),
                source: a,
                target: b,
            })
            .collect();

        tracing::info!(
            "Scanned {} commits: {} files, {} co-edit edges",
            commits.len(),
            nodes.len(),
            edges.len()
        );

        Ok(RepoGraph { nodes, edges })
    }

    /// Commits that touched `path`, newest first, at most `limit` entries.
    pub fn file_history(&self, path: &str, limit: usize) -> Result<Vec<CommitInfo>, AppError> {
        let target = Path::new(path);
        let mut entries = Vec::new();

        for commit in self.history(usize::MAX)? {
            if entries.len() >= limit {
                break;
            }

            let tree = commit.tree().map_err(git_err("Failed to get tree"))?;
            let current = tree.get_path(target).ok().map(|e| e.id());
            let previous = match commit.parent(0) {
                Ok(parent) => parent
                    .tree()
                    .map_err(git_err("Failed to get tree"))?
                    .get_path(target)
                    .ok()
                    .map(|e| e.id()),
                Err(_) => None,
            };

            if current == previous {
                continue;
            }

            entries.push(CommitInfo {
                sha: commit.id().to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
                summary: commit.summary().unwrap_or("").to_string(),
                time: DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or_default(),
            });
        }

        Ok(entries)
    }
}

/// Final path component, or the whole path when it has none.
fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn count_lines(content: &[u8]) -> u32 {
    if content.is_empty() {
        return 0;
    }
    let newlines = content.iter().filter(|&&b| b == b'\n').count();
    let trailing = usize::from(content.last() != Some(&b'\n'));
    u32::try_from(newlines + trailing).unwrap_or(u32::MAX)
}
