//! Owned registry of spawned scene primitives.
//!
//! Every primitive the viewer creates is recorded under a typed key, so a
//! group (the ranked overlay) or everything (teardown) can be released
//! exactly once.

use std::collections::HashMap;

use crate::visualization::ranking::ReferencePlane;

/// Identity of one scene primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// Node sphere, by node ID.
    NodeMesh(String),
    /// Screen-space node label, by node ID.
    NodeLabel(String),
    /// Edge segment, by layout edge index.
    Edge(usize),
    /// Reference grid line.
    PlaneLine(ReferencePlane, usize),
    /// Ranked-view axis or grid line.
    OverlayLine(usize),
    /// Ranked-view axis caption.
    OverlayCaption(usize),
}

/// Coarse grouping used for bulk release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceGroup {
    Nodes,
    Labels,
    Edges,
    Planes,
    Overlay,
}

impl ResourceKey {
    pub fn group(&self) -> ResourceGroup {
        match self {
            ResourceKey::NodeMesh(_) => ResourceGroup::Nodes,
            ResourceKey::NodeLabel(_) => ResourceGroup::Labels,
            ResourceKey::Edge(_) => ResourceGroup::Edges,
            ResourceKey::PlaneLine(..) => ResourceGroup::Planes,
            ResourceKey::OverlayLine(_) | ResourceKey::OverlayCaption(_) => ResourceGroup::Overlay,
        }
    }
}

/// Map from key to a backend handle (an entity, in the viewer).
#[derive(Debug, Clone)]
pub struct ResourceRegistry<H> {
    entries: HashMap<ResourceKey, H>,
}

impl<H> Default for ResourceRegistry<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> ResourceRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `handle` under `key`. A handle it replaces is returned so the
    /// caller can release it.
    pub fn insert(&mut self, key: ResourceKey, handle: H) -> Option<H> {
        self.entries.insert(key, handle)
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&H> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn release(&mut self, key: &ResourceKey) -> Option<H> {
        self.entries.remove(key)
    }

    /// Remove and return every handle in `group`.
    pub fn release_group(&mut self, group: ResourceGroup) -> Vec<H> {
        let keys: Vec<ResourceKey> = self
            .entries
            .keys()
            .filter(|k| k.group() == group)
            .cloned()
            .collect();
        keys.iter().filter_map(|k| self.entries.remove(k)).collect()
    }

    /// Number of handles in `group`.
    pub fn count(&self, group: ResourceGroup) -> usize {
        self.entries.keys().filter(|k| k.group() == group).count()
    }

    /// Remove and return every handle.
    pub fn drain_all(&mut self) -> Vec<H> {
        self.entries.drain().map(|(_, h)| h).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
