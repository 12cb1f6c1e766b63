//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/repograph/config.toml` (XDG) or platform config dir
//! 2. Project config: `.repograph.toml`
//! 3. Environment variables: `REPOGRAPH_<SECTION>__<KEY>`
//!
//! Every section has defaults, so no file is required. Example:
//!
//! ```toml
//! [physics]
//! repulsion_strength = 5.0
//! damping = 0.9
//!
//! [camera]
//! focus_budget_secs = 1.0
//! focus_offset = [0.0, 2.0, 8.0]
//!
//! [scan]
//! max_commits = 2000
//! ```
//!
//! Environment keys use a double underscore between section and key, so
//! `REPOGRAPH_PHYSICS__REST_LENGTH=4` sets `physics.rest_length`.

use std::ops::Deref;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub ranking: RankingConfig,
    pub camera: CameraConfig,
    pub picking: PickingConfig,
    pub scan: ScanConfig,
    pub history: HistoryConfig,
}

/// Viewer window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Repograph".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Force simulation constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Inverse-square repulsion constant between every node pair.
    pub repulsion_strength: f32,
    /// Spring constant for edges.
    pub attraction_strength: f32,
    /// Edge length at which the spring exerts no force.
    pub rest_length: f32,
    /// Pull toward the origin, proportional to position.
    pub centering_strength: f32,
    /// Velocity multiplier applied every step. Must be below 1.
    pub damping: f32,
    /// Added to pair distances before any division.
    pub min_distance: f32,
    /// Upper bound for a single step's elapsed time, in seconds.
    pub max_dt: f32,
    /// Steps run before the first frame.
    pub warmup_steps: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            repulsion_strength: 5.0,
            attraction_strength: 0.05,
            rest_length: 3.0,
            centering_strength: 0.01,
            damping: 0.9,
            min_distance: 0.01,
            max_dt: 0.1,
            warmup_steps: 300,
        }
    }
}

/// Ranked 2D projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Horizontal distance between consecutive ranks.
    pub spacing: f32,
    /// Height of the largest file.
    pub height: f32,
    /// Fraction of the remaining distance closed per frame.
    pub easing: f32,
    /// Distance below which a node counts as arrived.
    pub arrive_epsilon: f32,
    /// Number of horizontal tick intervals in the overlay.
    pub height_ticks: u32,
    /// Margin between the outermost ranks and the axis lines.
    pub axis_padding: f32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            spacing: 3.0,
            height: 10.0,
            easing: 0.025,
            arrive_epsilon: 0.01,
            height_ticks: 10,
            axis_padding: 2.0,
        }
    }
}

/// Camera animation and orbit settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Easing for node-focus flights.
    pub focus_easing: f32,
    /// Easing for the view-mode flight.
    pub view_easing: f32,
    /// Easing for the return to the saved pose.
    pub return_easing: f32,
    /// Hard time budget for node-focus flights, in seconds.
    pub focus_budget_secs: f32,
    /// Distance below which a flight counts as arrived.
    pub arrive_epsilon: f32,
    /// Camera offset from a focused node.
    pub focus_offset: [f32; 3],
    /// Camera distance from the ranked layout plane.
    pub ranked_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Closest manual zoom distance.
    pub min_distance: f32,
    /// Farthest manual zoom distance.
    pub max_distance: f32,
    /// Largest orbit pitch above or below the horizon, in radians.
    pub max_pitch: f32,
    /// Radians per pixel of orbit drag.
    pub orbit_sensitivity: f32,
    /// Distance change per scroll line.
    pub zoom_step: f32,
    /// World units per frame of keyboard panning.
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            focus_easing: 0.08,
            view_easing: 0.03,
            return_easing: 0.08,
            focus_budget_secs: 1.0,
            arrive_epsilon: 0.01,
            focus_offset: [0.0, 2.0, 8.0],
            ranked_distance: 20.0,
            fov_degrees: 75.0,
            min_distance: 2.0,
            max_distance: 150.0,
            max_pitch: 1.5,
            orbit_sensitivity: 0.01,
            zoom_step: 1.0,
            pan_speed: 0.2,
        }
    }
}

/// Pointer picking settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Radius of every node's bounding sphere.
    pub node_radius: f32,
    /// Nodes closer than this to the pointer are nudged away from it.
    pub influence_radius: f32,
    /// Largest nudge, applied at zero distance.
    pub influence_strength: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            node_radius: 1.0,
            influence_radius: 8.0,
            influence_strength: 1.2,
        }
    }
}

/// Limits for building a graph from git history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Commits walked from HEAD.
    pub max_commits: usize,
    /// Commits touching more files than this do not produce co-edit edges.
    pub max_files_per_commit: usize,
    /// Co-edits needed before two files are connected.
    pub min_coedits: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_commits: 2000,
            max_files_per_commit: 40,
            min_coedits: 2,
        }
    }
}

/// Per-file commit history settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum commits listed for a selected file.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// The layered figment used by [`Config::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(".repograph.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("REPOGRAPH_").split("__"))
    }

    /// Extract a config from an arbitrary figment.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(ConfigError::from)
    }

    /// User config path: ~/.config/repograph/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("repograph").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("repograph").join("config.toml"))
            .unwrap_or_default()
    }
}
