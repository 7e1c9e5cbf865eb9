//! Core configuration for vizij-placement-core.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

/// How the picked object's orientation follows the camera.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationDelta {
    /// Adds `new_camera - previous_camera` to the object quaternion
    /// coefficient by coefficient. Not a rotation; the result drifts off the
    /// unit sphere under sustained camera rotation.
    #[default]
    Componentwise,
    /// Pre-multiplies the object orientation by `new * previous⁻¹`, the same
    /// rotation applied to the offset vector.
    Composed,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffuseModel {
    #[default]
    Lambert,
    Unlit,
}

/// Appearance of spawned objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Packed 0xAARRGGBB.
    pub color_argb: u32,
    /// Blend between the flat color (1.0) and the texture (0.0).
    pub color_influence: f32,
    pub lighting: bool,
    pub diffuse: DiffuseModel,
    /// Texture resource name; `None` spawns untextured objects.
    pub texture: Option<String>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color_argb: 0xff00_9900,
            color_influence: 0.1,
            lighting: true,
            diffuse: DiffuseModel::Lambert,
            texture: Some("instructions".to_string()),
        }
    }
}

impl MaterialConfig {
    /// Color as linear-agnostic RGBA in `[0, 1]`.
    pub fn rgba(&self) -> [f32; 4] {
        let c = self.color_argb;
        let ch = |shift: u32| ((c >> shift) & 0xff) as f32 / 255.0;
        [ch(16), ch(8), ch(0), ch(24)]
    }
}

/// Directional light added when the scene is initialised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub direction: Vec3,
    pub color: Vec3,
    pub power: f32,
    pub position: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, 0.2, -1.0),
            color: Vec3::ONE,
            power: 0.8,
            position: Vec3::new(3.0, 2.0, 4.0),
        }
    }
}

/// Configuration for placement sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Edge length of spawned cubes (metres).
    pub cube_side_length: f32,
    /// How far in front of the camera a new object appears (metres).
    pub spawn_distance: f32,
    pub material: MaterialConfig,
    pub light: LightConfig,
    pub orientation_delta: OrientationDelta,
    /// Feed samples whose status is not `Valid` to the transformer anyway.
    pub accept_unverified_poses: bool,
    /// Used by hosts that build pick rays from a perspective camera.
    pub vertical_fov_deg: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cube_side_length: 0.5,
            spawn_distance: 1.0,
            material: MaterialConfig::default(),
            light: LightConfig::default(),
            orientation_delta: OrientationDelta::default(),
            accept_unverified_poses: false,
            vertical_fov_deg: 60.0,
        }
    }
}

impl PlacementConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cube_side_length.is_finite() && self.cube_side_length > 0.0) {
            return Err(PlacementError::invalid_config(format!(
                "cube_side_length must be positive, got {}",
                self.cube_side_length
            )));
        }
        if !(self.spawn_distance.is_finite() && self.spawn_distance > 0.0) {
            return Err(PlacementError::invalid_config(format!(
                "spawn_distance must be positive, got {}",
                self.spawn_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.material.color_influence) {
            return Err(PlacementError::invalid_config(format!(
                "material.color_influence must be within [0, 1], got {}",
                self.material.color_influence
            )));
        }
        if !(self.vertical_fov_deg > 0.0 && self.vertical_fov_deg < 180.0) {
            return Err(PlacementError::invalid_config(format!(
                "vertical_fov_deg must be within (0, 180), got {}",
                self.vertical_fov_deg
            )));
        }
        if self.light.direction.length_squared() == 0.0 || !self.light.direction.is_finite() {
            return Err(PlacementError::invalid_config(
                "light.direction must be a finite non-zero vector",
            ));
        }
        Ok(())
    }
}
