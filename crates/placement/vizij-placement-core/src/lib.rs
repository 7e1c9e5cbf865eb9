//! Vizij Placement Core (engine-agnostic)
//!
//! Keeps a touch-placed object anchored while an AR device moves. The crate
//! holds the pose math (device pose → render camera, camera delta → object
//! displacement), the picked/anchored state machine, the intent mailbox that
//! separates input from the render tick, and a session driving all of it
//! against a [`RenderHost`].

pub mod config;
pub mod error;
pub mod host;
pub mod ids;
pub mod inputs;
pub mod outputs;
pub mod picking;
pub mod pose;
pub mod session;
pub mod tracker;
pub mod transform;

// Re-exports for consumers (adapters)
pub use config::{DiffuseModel, LightConfig, MaterialConfig, OrientationDelta, PlacementConfig};
pub use error::PlacementError;
pub use host::{DirectionalLightSpec, MaterialSpec, ObjectSpec, RenderHost, TextureHandle};
pub use ids::{IdAllocator, ObjectId};
pub use inputs::{Intent, IntentMailbox, TouchAction};
pub use outputs::{PlacementEvent, SkipReason, TickOutputs};
pub use picking::{ray_cube_distance, PickRay, Pickables, ViewPoint};
pub use pose::{
    to_render_camera_pose, to_render_world_pose, DeviceExtrinsics, Pose, PoseSample, PoseStatus,
};
pub use session::{CameraState, PlacementSession};
pub use tracker::{PlacementState, PlacementTracker, Resolution, TrackedObject};
pub use transform::{displacement, follow_camera, update_camera_and_object_pose, PoseUpdate};
pub use glam::{Quat, Vec3};
