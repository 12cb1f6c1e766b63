//! Commit history entries shown in the detail panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit that touched a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full commit SHA.
    pub sha: String,
    /// Author name.
    pub author: String,
    /// First line of the commit message.
    pub summary: String,
    /// Commit time.
    pub time: DateTime<Utc>,
}

impl CommitInfo {
    /// Abbreviated SHA for display.
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
