//! Commit history fetches for the selected node.
//!
//! The fetch runs on the async compute pool so layout and camera keep
//! animating while git walks history. Results go through
//! [`SceneEngine::apply_detail`](crate::visualization::engine::SceneEngine::apply_detail),
//! which drops anything that no longer matches the selection.

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool};

use crate::git::GitOps;
use crate::visualization::engine::EngineEvent;
use crate::visualization::resources::{
    DetailFetch, EngineRes, FrameEvents, HistorySource, PendingFetch,
};

/// Start a history fetch whenever a node becomes selected.
pub fn start_detail_fetch_system(
    mut engine: ResMut<EngineRes>,
    events: Res<FrameEvents>,
    source: Res<HistorySource>,
    mut fetch: ResMut<DetailFetch>,
) {
    for event in &events.0 {
        let EngineEvent::SelectionChanged { current, .. } = event else {
            continue;
        };
        // Dropping a task cancels it
        fetch.pending = None;

        let Some(node_id) = current.clone() else {
            continue;
        };
        let Some(root) = source.root.clone() else {
            engine.0.apply_detail(
                &node_id,
                Err("no repository given; pass --repo to see history".to_string()),
            );
            continue;
        };

        tracing::debug!("Fetching history for {}", node_id);
        let path = node_id.clone();
        let limit = source.limit;
        let task = AsyncComputeTaskPool::get().spawn(async move {
            GitOps::open(&root)
                .and_then(|git| git.file_history(&path, limit))
                .map_err(|e| e.to_string())
        });
        fetch.pending = Some(PendingFetch { node_id, task });
    }
}

/// Apply a finished history fetch.
pub fn poll_detail_fetch_system(mut engine: ResMut<EngineRes>, mut fetch: ResMut<DetailFetch>) {
    let Some(pending) = fetch.pending.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(&mut pending.task)) else {
        return;
    };
    let node_id = pending.node_id.clone();
    fetch.pending = None;
    engine.0.apply_detail(&node_id, result);
}
