//! Pose delta transformer.
//!
//! Moves the camera to the latest device pose and drags the picked object
//! along so that it keeps its offset in the previous camera frame.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::OrientationDelta;
use crate::pose::{to_render_camera_pose, DeviceExtrinsics, Pose};
use crate::tracker::TrackedObject;

/// Result of one transformer step.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseUpdate {
    pub camera: Pose,
    pub object: Option<Pose>,
}

/// Displacement applied to the picked object for one camera move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Displacement {
    pub position: Vec3,
    /// Raw quaternion coefficient difference `new - previous`.
    pub orientation: Quat,
    /// Incremental camera rotation `new * previous⁻¹`.
    pub rotation: Quat,
}

/// Compute how an object must move when the camera goes from `previous`
/// to `current`.
pub fn displacement(previous: &Pose, current: &Pose, object_position: Vec3) -> Displacement {
    let distance = object_position - previous.position;
    let rotation = current.orientation * previous.orientation.inverse();
    let rotated = rotation * distance;
    Displacement {
        position: (current.position - previous.position) + (rotated - distance),
        orientation: current.orientation - previous.orientation,
        rotation,
    }
}

/// Apply a camera move to an object pose.
pub fn follow_camera(
    previous: &Pose,
    current: &Pose,
    object: &Pose,
    mode: OrientationDelta,
) -> Pose {
    let d = displacement(previous, current, object.position);
    let orientation = match mode {
        OrientationDelta::Componentwise => object.orientation + d.orientation,
        OrientationDelta::Composed => (d.rotation * object.orientation).normalize(),
    };
    Pose {
        position: object.position + d.position,
        orientation,
    }
}

/// One render-tick pose update.
///
/// Must be called from the render context only, at most once per tick.
pub fn update_camera_and_object_pose(
    device_pose: &Pose,
    extrinsics: &DeviceExtrinsics,
    previous_camera: &Pose,
    picked: Option<&TrackedObject>,
    mode: OrientationDelta,
) -> PoseUpdate {
    let camera = to_render_camera_pose(device_pose, extrinsics);
    let object = picked.map(|obj| follow_camera(previous_camera, &camera, &obj.pose, mode));
    PoseUpdate { camera, object }
}
