//! Render host capability trait.
//!
//! The session drives everything through this trait so the core never
//! touches a concrete scene graph. Adapters (Bevy, headless test hosts)
//! implement it over their own scene representation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{DiffuseModel, LightConfig, MaterialConfig};
use crate::error::PlacementError;
use crate::ids::ObjectId;
use crate::picking::ViewPoint;
use crate::pose::Pose;

/// Opaque texture handle issued by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLightSpec {
    pub direction: Vec3,
    pub color: Vec3,
    pub power: f32,
    pub position: Vec3,
}

impl From<&LightConfig> for DirectionalLightSpec {
    fn from(cfg: &LightConfig) -> Self {
        Self {
            direction: cfg.direction.normalize(),
            color: cfg.color,
            power: cfg.power,
            position: cfg.position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub color: [f32; 4],
    pub color_influence: f32,
    pub lighting: bool,
    pub diffuse: DiffuseModel,
    /// `None` when the texture failed to load or none was configured.
    pub texture: Option<TextureHandle>,
}

impl MaterialSpec {
    pub fn untextured(cfg: &MaterialConfig) -> Self {
        Self {
            color: cfg.rgba(),
            color_influence: cfg.color_influence,
            lighting: cfg.lighting,
            diffuse: cfg.diffuse,
            texture: None,
        }
    }
}

/// Everything a host needs to put a new cube into the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub pose: Pose,
    pub side_length: f32,
    pub material: MaterialSpec,
}

pub trait RenderHost {
    /// Current render camera pose in the render world.
    fn camera_pose(&self) -> Pose;

    fn set_camera_pose(&mut self, pose: Pose);

    /// `None` when the object is not (or no longer) in the scene.
    fn object_pose(&self, id: ObjectId) -> Option<Pose>;

    fn set_object_pose(&mut self, id: ObjectId, pose: Pose) -> Result<(), PlacementError>;

    fn add_light(&mut self, light: &DirectionalLightSpec);

    /// Fallible; a failure never aborts a spawn.
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, PlacementError>;

    /// Add a new object to the scene under the id chosen by the core.
    fn add_object(&mut self, id: ObjectId, spec: &ObjectSpec);

    /// Make `id` eligible for [`RenderHost::query_pick_at`].
    fn register_pickable(&mut self, id: ObjectId, spec: &ObjectSpec);

    /// Ray cast at `point`. Hosts with an asynchronous picker return `None`
    /// here and later report through `PlacementSession::on_object_picked`.
    fn query_pick_at(&mut self, point: ViewPoint) -> Option<ObjectId>;

    /// `false` when `query_pick_at` only starts a query. The session then
    /// keeps the pick pending until the next tick and spawns only if no hit
    /// was reported in between.
    fn picks_synchronously(&self) -> bool {
        true
    }
}
