//! Scripted camera flights and the return to the pre-flight pose.
//!
//! One state machine owns every automatic camera movement:
//!
//! ```text
//! Idle ──select / enter ranked──▶ FlyTo ──arrived / budget spent──▶ Idle
//!   │                               │
//!   └──────────deselect─────────────┴──▶ Returning ──arrived──▶ Idle
//! ```
//!
//! The pose captured before the first flight is kept until a return
//! completes, so chained flights always return to the original viewpoint.

use bevy::math::Vec3;

use crate::config::CameraConfig;

/// Camera position and the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Largest of the position and look-at distances to `other`.
    pub fn distance(&self, other: &CameraPose) -> f32 {
        self.position
            .distance(other.position)
            .max(self.look_at.distance(other.look_at))
    }

    /// Move both points `easing` of the way toward `target`.
    fn ease_toward(&mut self, target: &CameraPose, easing: f32) {
        self.position += (target.position - self.position) * easing;
        self.look_at += (target.look_at - self.look_at) * easing;
    }
}

/// Why a flight was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightKind {
    /// Focus on a selected node. Bounded by a hard time budget.
    NodeFocus,
    /// Frame the ranked layout. Ends only on arrival.
    ViewMode,
}

/// Camera animation state.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraState {
    /// User has free control.
    Idle,
    /// Flying toward `target`.
    FlyTo {
        target: CameraPose,
        started_at: f32,
        kind: FlightKind,
    },
    /// Returning to the saved pose.
    Returning { target: CameraPose },
}

/// Drives the camera through scripted flights.
#[derive(Debug, Clone)]
pub struct CameraDirector {
    state: CameraState,
    saved: Option<CameraPose>,
    config: CameraConfig,
}

impl CameraDirector {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            state: CameraState::Idle,
            saved: None,
            config,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, CameraState::Idle)
    }

    /// The pose a deselection will return to, if any.
    pub fn saved_pose(&self) -> Option<&CameraPose> {
        self.saved.as_ref()
    }

    /// Pose that frames a node from the configured offset.
    pub fn focus_pose(&self, node_position: Vec3) -> CameraPose {
        CameraPose::new(
            node_position + Vec3::from_array(self.config.focus_offset),
            node_position,
        )
    }

    /// Pose that faces the ranked layout plane head-on.
    pub fn ranked_pose(&self, center: Vec3) -> CameraPose {
        CameraPose::new(center + Vec3::Z * self.config.ranked_distance, center)
    }

    /// Start a flight from `current` to `target`.
    ///
    /// The current pose is saved only when no saved pose exists yet.
    pub fn fly_to(&mut self, current: &CameraPose, target: CameraPose, kind: FlightKind, now: f32) {
        if self.saved.is_none() {
            self.saved = Some(*current);
        }
        self.state = CameraState::FlyTo {
            target,
            started_at: now,
            kind,
        };
    }

    /// Begin returning to the saved pose. Does nothing without one.
    pub fn return_home(&mut self) {
        if let Some(saved) = self.saved {
            self.state = CameraState::Returning { target: saved };
        }
    }

    /// Close the view-mode part of a flight cycle when the ranked view is left.
    ///
    /// A view-mode flight still underway stops where it is. The saved pose is
    /// dropped unless `keep_saved` is set or a return is underway.
    pub fn leave_view_mode(&mut self, keep_saved: bool) {
        if matches!(
            self.state,
            CameraState::FlyTo {
                kind: FlightKind::ViewMode,
                ..
            }
        ) {
            self.state = CameraState::Idle;
        }
        if !keep_saved && !matches!(self.state, CameraState::Returning { .. }) {
            self.saved = None;
        }
    }

    /// Advance the current animation, mutating `pose`.
    pub fn step(&mut self, pose: &mut CameraPose, now: f32) {
        match self.state.clone() {
            CameraState::Idle => {}
            CameraState::FlyTo {
                target,
                started_at,
                kind,
            } => {
                if kind == FlightKind::NodeFocus
                    && now - started_at >= self.config.focus_budget_secs
                {
                    // Freeze wherever the camera got to
                    self.state = CameraState::Idle;
                    return;
                }
                let easing = match kind {
                    FlightKind::NodeFocus => self.config.focus_easing,
                    FlightKind::ViewMode => self.config.view_easing,
                };
                if pose.distance(&target) <= self.config.arrive_epsilon {
                    *pose = target;
                    self.state = CameraState::Idle;
                } else {
                    pose.ease_toward(&target, easing);
                }
            }
            CameraState::Returning { target } => {
                if pose.distance(&target) <= self.config.arrive_epsilon {
                    *pose = target;
                    self.saved = None;
                    self.state = CameraState::Idle;
                } else {
                    pose.ease_toward(&target, self.config.return_easing);
                }
            }
        }
    }
}

/// Orbit parameters around a look-at point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrbit {
    /// Horizontal rotation angle (radians).
    pub yaw: f32,
    /// Vertical rotation angle (radians).
    pub pitch: f32,
    /// Distance from target.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: 25.0,
            target: Vec3::ZERO,
        }
    }
}

impl CameraOrbit {
    /// Orbit parameters that reproduce `pose`.
    pub fn from_pose(pose: &CameraPose) -> Self {
        let offset = pose.position - pose.look_at;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return Self {
                target: pose.look_at,
                distance: 0.0,
                ..Self::default()
            };
        }
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target: pose.look_at,
        }
    }

    /// Camera position for these orbit parameters.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn to_pose(&self) -> CameraPose {
        CameraPose::new(self.position(), self.target)
    }

    /// Unit vector pointing right of the view on the ground plane.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Unit vector pointing into the view on the ground plane.
    pub fn forward(&self) -> Vec3 {
        -Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> CameraDirector {
        CameraDirector::new(CameraConfig::default())
    }

    fn run(director: &mut CameraDirector, pose: &mut CameraPose, clock: &mut f32, frames: usize) {
        for _ in 0..frames {
            *clock += 1.0 / 60.0;
            director.step(pose, *clock);
        }
    }

    #[test]
    fn test_focus_flight_ends_within_budget_regardless_of_distance() {
        for distance in [1.0, 50.0, 5_000.0, 1.0e6] {
            let mut director = director();
            let mut pose = CameraPose::new(Vec3::new(0.0, 0.0, distance), Vec3::ZERO);
            let target = director.focus_pose(Vec3::ZERO);
            let mut clock = 0.0;

            director.fly_to(&pose, target, FlightKind::NodeFocus, clock);
            let budget_frames = (CameraConfig::default().focus_budget_secs * 60.0).ceil() as usize;
            run(&mut director, &mut pose, &mut clock, budget_frames + 1);

            assert!(director.is_idle(), "still flying from {}", distance);
            assert!(pose.position.is_finite());
        }
    }

    #[test]
    fn test_budget_expiry_freezes_in_place() {
        let mut director = director();
        let mut pose = CameraPose::new(Vec3::new(0.0, 0.0, 1000.0), Vec3::ZERO);
        let target = director.focus_pose(Vec3::ZERO);
        director.fly_to(&pose, target, FlightKind::NodeFocus, 0.0);

        director.step(&mut pose, 0.5);
        let frozen = pose;
        director.step(&mut pose, 1.5);
        assert!(director.is_idle());
        assert_eq!(pose, frozen);
        assert_ne!(pose, target);
    }

    #[test]
    fn test_view_mode_flight_has_no_budget() {
        let mut director = director();
        let mut pose = CameraPose::new(Vec3::new(0.0, 10.0, 25.0), Vec3::ZERO);
        let target = director.ranked_pose(Vec3::new(0.0, 5.0, 0.0));
        director.fly_to(&pose, target, FlightKind::ViewMode, 0.0);

        // Far past the focus budget, still converging
        director.step(&mut pose, 10.0);
        assert!(matches!(director.state(), CameraState::FlyTo { .. }));

        let mut clock = 10.0;
        run(&mut director, &mut pose, &mut clock, 2000);
        assert!(director.is_idle());
        assert_eq!(pose, target);
    }

    #[test]
    fn test_chained_flights_keep_first_saved_pose() {
        let mut director = director();
        let home = CameraPose::new(Vec3::new(0.0, 10.0, 25.0), Vec3::ZERO);
        let mut pose = home;

        let target = director.focus_pose(Vec3::X * 5.0);
        director.fly_to(&pose, target, FlightKind::NodeFocus, 0.0);
        let mut clock = 0.0;
        run(&mut director, &mut pose, &mut clock, 10);
        let target = director.focus_pose(Vec3::Y * 5.0);
        director.fly_to(&pose, target, FlightKind::NodeFocus, clock);

        assert_eq!(director.saved_pose(), Some(&home));
    }

    #[test]
    fn test_return_snaps_to_saved_pose_and_clears_it() {
        let mut director = director();
        let home = CameraPose::new(Vec3::new(3.0, 10.0, 25.0), Vec3::new(1.0, 0.0, 0.0));
        let mut pose = home;
        let mut clock = 0.0;

        let target = director.focus_pose(Vec3::splat(4.0));
        director.fly_to(&pose, target, FlightKind::NodeFocus, clock);
        run(&mut director, &mut pose, &mut clock, 90);
        assert!(director.is_idle());

        director.return_home();
        assert!(matches!(director.state(), CameraState::Returning { .. }));
        run(&mut director, &mut pose, &mut clock, 1000);

        assert!(director.is_idle());
        assert_eq!(pose, home);
        assert!(director.saved_pose().is_none());
    }

    #[test]
    fn test_return_without_saved_pose_is_noop() {
        let mut director = director();
        director.return_home();
        assert!(director.is_idle());
    }

    #[test]
    fn test_deselect_mid_flight_returns() {
        let mut director = director();
        let home = CameraPose::new(Vec3::new(0.0, 10.0, 25.0), Vec3::ZERO);
        let mut pose = home;
        let target = director.focus_pose(Vec3::X * 8.0);
        director.fly_to(&pose, target, FlightKind::NodeFocus, 0.0);
        director.step(&mut pose, 0.016);

        director.return_home();
        assert_eq!(director.state(), &CameraState::Returning { target: home });
    }

    #[test]
    fn test_leaving_view_mode_frees_next_capture() {
        let mut director = director();
        let home = CameraPose::new(Vec3::new(0.0, 10.0, 25.0), Vec3::ZERO);
        let mut pose = home;
        let target = director.ranked_pose(Vec3::new(0.0, 5.0, 0.0));
        director.fly_to(&pose, target, FlightKind::ViewMode, 0.0);
        director.step(&mut pose, 0.016);

        director.leave_view_mode(false);
        assert!(director.is_idle());
        assert!(director.saved_pose().is_none());

        let before_click = pose;
        let target = director.focus_pose(Vec3::X * 3.0);
        director.fly_to(&pose, target, FlightKind::NodeFocus, 1.0);
        assert_eq!(director.saved_pose(), Some(&before_click));
    }

    #[test]
    fn test_leaving_view_mode_keeps_pending_return() {
        let mut director = director();
        let home = CameraPose::new(Vec3::new(0.0, 10.0, 25.0), Vec3::ZERO);
        let pose = home;
        let target = director.focus_pose(Vec3::X * 3.0);
        director.fly_to(&pose, target, FlightKind::NodeFocus, 0.0);
        director.return_home();

        director.leave_view_mode(false);
        assert_eq!(director.saved_pose(), Some(&home));
        assert!(matches!(director.state(), CameraState::Returning { .. }));
    }

    #[test]
    fn test_orbit_round_trip() {
        let orbit = CameraOrbit {
            yaw: 0.7,
            pitch: 0.4,
            distance: 12.0,
            target: Vec3::new(1.0, 2.0, 3.0),
        };
        let back = CameraOrbit::from_pose(&orbit.to_pose());
        assert!((back.yaw - orbit.yaw).abs() < 1e-4);
        assert!((back.pitch - orbit.pitch).abs() < 1e-4);
        assert!((back.distance - orbit.distance).abs() < 1e-3);
        assert_eq!(back.target, orbit.target);
    }
}
