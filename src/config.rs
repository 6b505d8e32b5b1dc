use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BackdropError, Result};

/// Camera placement for the backdrop scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Camera distance along +Z, looking toward the origin
    pub z: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            z: 5.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Number of samples kept; fixed for the lifetime of the scene
    pub capacity: usize,
    /// World-space depth of the plane the pointer is projected onto
    pub depth: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            depth: 0.0,
        }
    }
}

/// Tuning for the floating decorative shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    pub parallax_strength: f32,
    /// Base depth at which parallax fades out entirely
    pub max_depth: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    /// Per-frame rotation per unit of speed, x/y/z
    pub rotation_rates: [f32; 3],
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            parallax_strength: 0.8,
            max_depth: 10.0,
            bob_amplitude: 0.3,
            bob_frequency: 1.0,
            rotation_rates: [0.01, 0.015, 0.005],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub count: usize,
    pub radius: f32,
    pub seed: u64,
    /// Bulk rotation rate (radians per second) about x and y
    pub rotation_rates: [f32; 2],
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            radius: 25.0,
            seed: 0x5eed,
            rotation_rates: [0.02, 0.03],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// World-space depth of the shaded quad
    pub depth: f32,
    /// Fractional oversize beyond the frustum
    pub margin: f32,
    /// Multiplicative scroll-velocity damping applied once per frame
    pub velocity_decay: f32,
    /// Scale the decay by real frame time instead of applying it per frame
    pub frame_rate_independent_decay: bool,
    /// Frame time the decay factor is defined for
    pub reference_frame_time: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            depth: -5.0,
            margin: 0.2,
            velocity_decay: 0.95,
            frame_rate_independent_decay: false,
            reference_frame_time: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            strength: 0.8,
            radius: 0.4,
            threshold: 0.2,
        }
    }
}

/// Complete backdrop tuning; every field has a default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub camera: CameraConfig,
    pub trail: TrailConfig,
    pub objects: ObjectConfig,
    pub ambient: AmbientConfig,
    pub background: BackgroundConfig,
    pub bloom: BloomConfig,
}

impl BackdropConfig {
    /// Load a JSON config file; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| BackdropError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|source| BackdropError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.validated())
    }

    /// Clamp values that would break scene invariants
    pub fn validated(mut self) -> Self {
        self.trail.capacity = self.trail.capacity.max(1);
        self.objects.max_depth = self.objects.max_depth.max(f32::EPSILON);
        self.background.margin = self.background.margin.max(0.0);
        if !(self.background.velocity_decay > 0.0 && self.background.velocity_decay <= 1.0) {
            log::warn!(
                "velocity_decay {} out of range, using default",
                self.background.velocity_decay
            );
            self.background.velocity_decay = BackgroundConfig::default().velocity_decay;
        }
        if self.background.reference_frame_time <= 0.0 {
            self.background.reference_frame_time = BackgroundConfig::default().reference_frame_time;
        }
        self.camera.fov_degrees = self.camera.fov_degrees.clamp(1.0, 179.0);
        self
    }
}
