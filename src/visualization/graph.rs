//! Force-directed graph layout algorithm.

use bevy::math::Vec3;
use std::collections::HashMap;

use crate::config::PhysicsConfig;
use crate::models::RepoGraph;

/// A node in the layout with position and velocity.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// Node ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Commits that touched the file.
    pub edit_count: u32,
    /// Lines in the file.
    pub file_length: u32,
    /// Current position in 3D space.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Ranked-layout destination, set only while ranked.
    pub target: Option<Vec3>,
}

/// An edge in the layout. Both endpoints are resolved indices.
#[derive(Debug, Clone)]
pub struct LayoutEdge {
    /// Edge ID.
    pub id: String,
    /// Source node index.
    pub from_idx: usize,
    /// Target node index.
    pub to_idx: usize,
}

/// Graph layout with nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct GraphLayout {
    /// Nodes with positions.
    pub nodes: Vec<LayoutNode>,
    /// Edges connecting nodes.
    pub edges: Vec<LayoutEdge>,
    index: HashMap<String, usize>,
}

impl GraphLayout {
    /// Create a layout from a repository graph.
    ///
    /// Duplicate node IDs keep their first occurrence. Edges with a missing
    /// endpoint are dropped here, so nothing downstream ever sees them.
    pub fn from_repo_graph(graph: &RepoGraph) -> Self {
        let mut nodes = Vec::with_capacity(graph.nodes.len());
        let mut index = HashMap::with_capacity(graph.nodes.len());

        for node in &graph.nodes {
            if index.contains_key(&node.id) {
                tracing::warn!("Ignoring duplicate node id {}", node.id);
                continue;
            }
            index.insert(node.id.clone(), nodes.len());
            nodes.push(LayoutNode {
                id: node.id.clone(),
                name: node.name.clone(),
                edit_count: node.edit_count,
                file_length: node.file_length,
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
                target: None,
            });
        }

        let total = nodes.len();
        for (i, node) in nodes.iter_mut().enumerate() {
            node.position = initial_position(i, total);
        }

        let mut edges = Vec::with_capacity(graph.edges.len());
        for e in &graph.edges {
            match (index.get(&e.source), index.get(&e.target)) {
                (Some(&from_idx), Some(&to_idx)) => edges.push(LayoutEdge {
                    id: e.id.clone(),
                    from_idx,
                    to_idx,
                }),
                _ => tracing::debug!(
                    "Skipping edge {} ({} -> {}): missing endpoint",
                    e.id,
                    e.source,
                    e.target
                ),
            }
        }

        Self {
            nodes,
            edges,
            index,
        }
    }

    /// Index of the node with the given ID.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Node with the given ID.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Largest edit count among the nodes.
    pub fn max_edit_count(&self) -> u32 {
        self.nodes.iter().map(|n| n.edit_count).max().unwrap_or(0)
    }

    /// Current node positions, in node order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    /// Run one step of the force-directed layout.
    ///
    /// Velocities accumulate repulsion, edge springs, and centering; damping
    /// is applied afterwards and positions are integrated last. `dt` is
    /// clamped to `[0, max_dt]`.
    pub fn step(&mut self, dt: f32, config: &PhysicsConfig) {
        let n = self.nodes.len();
        if n == 0 {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, config.max_dt)
        } else {
            0.0
        };

        // --- Repulsion: inverse-square between all pairs ---
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.nodes[j].position - self.nodes[i].position;
                let dist = delta.length() + config.min_distance;
                let force = repulsion_magnitude(dist - config.min_distance, config);
                let dir = if delta.length_squared() > 0.0 {
                    delta / dist
                } else {
                    separation_direction(i, j)
                };

                self.nodes[i].velocity -= dir * force * dt;
                self.nodes[j].velocity += dir * force * dt;
            }
        }

        // --- Attraction: linear springs along edges ---
        for edge in &self.edges {
            if edge.from_idx == edge.to_idx {
                continue;
            }
            let delta = self.nodes[edge.to_idx].position - self.nodes[edge.from_idx].position;
            let dist = delta.length();
            let force = spring_force(dist, config);
            let dir = delta / dist.max(config.min_distance);

            self.nodes[edge.from_idx].velocity += dir * force * dt;
            self.nodes[edge.to_idx].velocity -= dir * force * dt;
        }

        // --- Centering, damping and integration ---
        for node in &mut self.nodes {
            node.velocity -= node.position * config.centering_strength * dt;
            node.velocity *= config.damping;
            node.position += node.velocity * dt;
        }
    }

    /// Run the layout for a number of iterations to stabilize.
    pub fn stabilize(&mut self, iterations: usize, config: &PhysicsConfig) {
        let dt = 0.016; // ~60fps timestep
        for _ in 0..iterations {
            self.step(dt, config);
        }
    }

    /// Sum of squared speeds, proportional to kinetic energy for unit masses.
    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(|n| n.velocity.length_squared()).sum()
    }

    /// Calculate the bounding sphere radius that encompasses all nodes.
    /// Returns (center, radius) where center is the centroid of all nodes.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.nodes.is_empty() {
            return (Vec3::ZERO, 1.0);
        }

        let center: Vec3 =
            self.nodes.iter().map(|n| n.position).sum::<Vec3>() / self.nodes.len() as f32;

        let max_dist = self
            .nodes
            .iter()
            .map(|n| (n.position - center).length())
            .fold(0.0_f32, |a, b| a.max(b));

        // Add some padding
        (center, max_dist + 2.0)
    }
}

/// Repulsion between two nodes `distance` apart.
///
/// `k / (d + eps)²`, so it is finite at zero and strictly decreasing in `d`.
pub fn repulsion_magnitude(distance: f32, config: &PhysicsConfig) -> f32 {
    let d = distance.max(0.0) + config.min_distance;
    config.repulsion_strength / (d * d)
}

/// Spring force for an edge of length `distance`: positive pulls together.
pub fn spring_force(distance: f32, config: &PhysicsConfig) -> f32 {
    (distance - config.rest_length) * config.attraction_strength
}

/// Deterministic push direction for coincident nodes.
fn separation_direction(i: usize, j: usize) -> Vec3 {
    let angle = (i * 31 + j * 17) as f32 * 2.399_963; // golden angle
    Vec3::new(angle.cos(), 0.5, angle.sin()).normalize()
}

/// Initial position on a Fibonacci sphere for even spacing.
fn initial_position(i: usize, total_nodes: usize) -> Vec3 {
    let golden_ratio = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let idx = i as f32 + 0.5;
    let n = total_nodes.max(1) as f32;

    let theta = 2.0 * std::f32::consts::PI * idx / golden_ratio;
    let phi = (1.0 - 2.0 * idx / n).clamp(-1.0, 1.0).acos();

    // Larger graphs need more space
    let radius = 3.0 + (n / 10.0).sqrt() * 2.0;

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}
