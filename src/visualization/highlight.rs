//! Hover emphasis: one-hop neighborhoods are brightened, the rest dimmed.

use std::collections::HashSet;

use bevy::color::Color;

use crate::visualization::color::Rgb;
use crate::visualization::graph::GraphLayout;

/// Visual emphasis bucket for a node or edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tier {
    #[default]
    Neutral,
    Emphasis,
    Dimmed,
}

/// Tiers for every node and edge, indexed like the layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightTiers {
    pub nodes: Vec<Tier>,
    pub edges: Vec<Tier>,
}

impl HighlightTiers {
    /// All nodes and edges neutral.
    pub fn neutral(layout: &GraphLayout) -> Self {
        Self {
            nodes: vec![Tier::Neutral; layout.nodes.len()],
            edges: vec![Tier::Neutral; layout.edges.len()],
        }
    }

    /// Tier of the node at `idx`, neutral when out of range.
    pub fn node(&self, idx: usize) -> Tier {
        self.nodes.get(idx).copied().unwrap_or_default()
    }

    pub fn edge(&self, idx: usize) -> Tier {
        self.edges.get(idx).copied().unwrap_or_default()
    }
}

/// Indices of nodes sharing an edge with `idx`.
pub fn neighbors(layout: &GraphLayout, idx: usize) -> HashSet<usize> {
    let mut set = HashSet::new();
    for edge in &layout.edges {
        if edge.from_idx == idx {
            set.insert(edge.to_idx);
        } else if edge.to_idx == idx {
            set.insert(edge.from_idx);
        }
    }
    set
}

/// Compute tiers for a hovered node ID.
///
/// Only resolved layout edges take part, so an edge naming a missing node
/// never contributes adjacency.
pub fn compute_tiers(layout: &GraphLayout, hovered: Option<&str>) -> HighlightTiers {
    let Some(hovered_idx) = hovered.and_then(|id| layout.index_of(id)) else {
        return HighlightTiers::neutral(layout);
    };

    let near = neighbors(layout, hovered_idx);
    let nodes = (0..layout.nodes.len())
        .map(|i| {
            if i == hovered_idx || near.contains(&i) {
                Tier::Emphasis
            } else {
                Tier::Dimmed
            }
        })
        .collect();
    let edges = layout
        .edges
        .iter()
        .map(|e| {
            if e.from_idx == hovered_idx || e.to_idx == hovered_idx {
                Tier::Emphasis
            } else {
                Tier::Dimmed
            }
        })
        .collect();

    HighlightTiers { nodes, edges }
}

/// Caches tiers and recomputes them only when the hovered node changes.
#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    hovered: Option<String>,
    tiers: HighlightTiers,
}

impl HighlightEngine {
    pub fn new(layout: &GraphLayout) -> Self {
        Self {
            hovered: None,
            tiers: HighlightTiers::neutral(layout),
        }
    }

    pub fn tiers(&self) -> &HighlightTiers {
        &self.tiers
    }

    /// Returns true when the tiers changed.
    pub fn update(&mut self, layout: &GraphLayout, hovered: Option<&str>) -> bool {
        if self.hovered.as_deref() == hovered {
            return false;
        }
        self.hovered = hovered.map(str::to_string);
        self.tiers = compute_tiers(layout, hovered);
        true
    }
}

/// Node color for a tier, given its heat-map color.
pub fn node_color(heat: Rgb, tier: Tier) -> Rgb {
    match tier {
        Tier::Neutral => heat,
        Tier::Emphasis => heat.whitened(0.4),
        Tier::Dimmed => heat.scaled(0.3),
    }
}

/// Edge color (with alpha) for a tier.
pub fn edge_color(tier: Tier) -> Color {
    match tier {
        Tier::Neutral => Color::srgba(1.0, 1.0, 1.0, 0.6),
        Tier::Emphasis => Color::srgba(0.0, 1.0, 1.0, 1.0),
        Tier::Dimmed => Color::srgba(0.27, 0.27, 0.27, 0.3),
    }
}
