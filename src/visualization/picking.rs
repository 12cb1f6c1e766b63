//! Pointer picking: screen coordinates to a node via ray casting.

use bevy::math::{Vec2, Vec3};

use crate::config::{CameraConfig, PickingConfig};
use crate::visualization::director::CameraPose;
use crate::visualization::graph::GraphLayout;

/// Screen rectangle the scene is drawn into, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Convert client coordinates to normalized device coordinates.
///
/// X grows right and Y grows up, both in `[-1, 1]` inside the viewport.
/// Returns `None` for an empty viewport.
pub fn pointer_to_ndc(client: Vec2, viewport: &Viewport) -> Option<Vec2> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }
    let x = (client.x - viewport.left) / viewport.width * 2.0 - 1.0;
    let y = -((client.y - viewport.top) / viewport.height * 2.0 - 1.0);
    Some(Vec2::new(x, y))
}

/// A ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    /// Perspective ray through `ndc` for a camera at `pose`.
    pub fn from_camera(pose: &CameraPose, ndc: Vec2, fov_y: f32, aspect: f32) -> Option<Self> {
        let forward = (pose.look_at - pose.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return None;
        }
        let mut right = forward.cross(Vec3::Y);
        if right.length_squared() < 1e-8 {
            // Looking straight up or down
            right = Vec3::X;
        }
        let right = right.normalize();
        let up = right.cross(forward);

        let half = (fov_y / 2.0).tan();
        let direction =
            (forward + right * ndc.x * half * aspect + up * ndc.y * half).normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        Some(Self {
            origin: pose.position,
            direction,
        })
    }

    /// Where the ray crosses the `z = 0` plane, if it does.
    pub fn hit_ground_xy(&self) -> Option<Vec3> {
        if self.direction.z.abs() < 1e-6 {
            return None;
        }
        let t = -self.origin.z / self.direction.z;
        (t > 0.0).then(|| self.origin + self.direction * t)
    }

    /// Distance along the ray to the first intersection with a sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let along = to_center.dot(self.direction);
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = radius * radius;
        if closest_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - closest_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if near > 0.0 {
            Some(near)
        } else if far > 0.0 {
            // Origin inside the sphere
            Some(far)
        } else {
            None
        }
    }
}

/// Index of the nearest node hit by `ray`.
pub fn nearest_hit<'a>(
    ray: &PickRay,
    positions: impl IntoIterator<Item = &'a Vec3>,
    radius: f32,
) -> Option<usize> {
    let mut closest: Option<(usize, f32)> = None;
    for (idx, position) in positions.into_iter().enumerate() {
        if let Some(t) = ray.intersect_sphere(*position, radius) {
            if closest.map_or(true, |(_, best)| t < best) {
                closest = Some((idx, t));
            }
        }
    }
    closest.map(|(idx, _)| idx)
}

/// Offset pushing a node at `position` away from the pointer's world point.
///
/// Falls off linearly to zero at `influence_radius`. Nodes almost on the
/// pointer are left alone.
pub fn pointer_push(position: Vec3, pointer: Vec3, config: &PickingConfig) -> Vec3 {
    let delta = position - pointer;
    let distance = delta.length();
    if distance >= config.influence_radius || distance <= 0.1 {
        return Vec3::ZERO;
    }
    let influence = (1.0 - distance / config.influence_radius) * config.influence_strength;
    delta / distance * influence
}

/// Resolves pointer positions to node IDs.
#[derive(Debug, Clone)]
pub struct Picker {
    radius: f32,
    fov_y: f32,
}

impl Picker {
    pub fn new(picking: &PickingConfig, camera: &CameraConfig) -> Self {
        Self {
            radius: picking.node_radius,
            fov_y: camera.fov_degrees.to_radians(),
        }
    }

    /// Ray under `client`, or `None` outside a usable viewport.
    pub fn ray(&self, client: Vec2, viewport: &Viewport, pose: &CameraPose) -> Option<PickRay> {
        let ndc = pointer_to_ndc(client, viewport)?;
        PickRay::from_camera(pose, ndc, self.fov_y, viewport.aspect_ratio())
    }

    /// Index of the nearest of `positions` under `client`.
    pub fn pick_index(
        &self,
        client: Vec2,
        viewport: &Viewport,
        pose: &CameraPose,
        positions: &[Vec3],
    ) -> Option<usize> {
        let ray = self.ray(client, viewport, pose)?;
        nearest_hit(&ray, positions, self.radius)
    }

    /// Node under `client` for a camera at `pose`, using positions as they
    /// stand right now.
    pub fn pick<'a>(
        &self,
        client: Vec2,
        viewport: &Viewport,
        pose: &CameraPose,
        layout: &'a GraphLayout,
    ) -> Option<&'a str> {
        let ray = self.ray(client, viewport, pose)?;
        let idx = nearest_hit(&ray, layout.nodes.iter().map(|n| &n.position), self.radius)?;
        Some(layout.nodes[idx].id.as_str())
    }
}
