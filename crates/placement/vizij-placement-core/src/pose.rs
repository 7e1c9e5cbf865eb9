//! Rigid poses, device extrinsics and the scene pose calculator.
//!
//! Poses coming from the pose source live in the start-of-service frame
//! (Z up, Y forward). The render world is Y up with cameras looking down -Z.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform: position plus unit orientation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    #[inline]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    #[inline]
    pub const fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    #[inline]
    pub const fn from_orientation(orientation: Quat) -> Self {
        Self::new(Vec3::ZERO, orientation)
    }

    /// `self * other`: applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose {
            position: self.orientation * other.position + self.position,
            orientation: self.orientation * other.orientation,
        }
    }

    #[must_use]
    pub fn inverse(&self) -> Pose {
        let inv = self.orientation.inverse();
        Pose {
            position: inv * (-self.position),
            orientation: inv,
        }
    }

    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.orientation * point + self.position
    }

    /// Forward axis in the render convention (-Z rotated by the orientation).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Same orientation, moved `distance` along [`Pose::forward`].
    #[must_use]
    pub fn translated_forward(&self, distance: f32) -> Pose {
        Pose {
            position: self.position + self.forward() * distance,
            orientation: self.orientation,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }

    pub fn abs_diff_eq(&self, other: &Pose, eps: f32) -> bool {
        self.position.abs_diff_eq(other.position, eps)
            && self.orientation.abs_diff_eq(other.orientation, eps)
    }
}

/// Tracking quality reported alongside each pose sample.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoseStatus {
    Initializing,
    Valid,
    Invalid,
    #[default]
    Unknown,
}

/// One device pose in the start-of-service frame, stamped with the time of
/// the color frame it belongs to (seconds).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub timestamp: f64,
    pub pose: Pose,
    #[serde(default)]
    pub status: PoseStatus,
}

impl PoseSample {
    pub fn valid(timestamp: f64, pose: Pose) -> Self {
        Self {
            timestamp,
            pose,
            status: PoseStatus::Valid,
        }
    }
}

/// Fixed calibration between the IMU, the device body and the cameras.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceExtrinsics {
    pub imu_t_device: Pose,
    pub imu_t_color_camera: Pose,
    pub imu_t_depth_camera: Pose,
}

impl DeviceExtrinsics {
    pub fn new(imu_t_device: Pose, imu_t_color_camera: Pose, imu_t_depth_camera: Pose) -> Self {
        Self {
            imu_t_device,
            imu_t_color_camera,
            imu_t_depth_camera,
        }
    }

    pub fn device_t_color_camera(&self) -> Pose {
        self.imu_t_device.inverse().compose(&self.imu_t_color_camera)
    }

    pub fn device_t_depth_camera(&self) -> Pose {
        self.imu_t_device.inverse().compose(&self.imu_t_depth_camera)
    }
}

/// Start-of-service (Z up) to render world (Y up).
pub fn render_t_start_of_service() -> Pose {
    Pose::from_orientation(Quat::from_rotation_x(-FRAC_PI_2))
}

/// Color camera (looks down +Z, Y down) to render camera (looks down -Z, Y up).
pub fn color_camera_t_render_camera() -> Pose {
    Pose::from_orientation(Quat::from_rotation_x(PI))
}

/// Re-express a start-of-service pose in the render world frame.
pub fn to_render_world_pose(pose: &Pose) -> Pose {
    render_t_start_of_service().compose(pose)
}

/// Render camera pose for a device pose sampled at the last color frame.
pub fn to_render_camera_pose(device_pose: &Pose, extrinsics: &DeviceExtrinsics) -> Pose {
    let pose = to_render_world_pose(device_pose)
        .compose(&extrinsics.device_t_color_camera())
        .compose(&color_camera_t_render_camera());
    Pose {
        position: pose.position,
        orientation: pose.orientation.normalize(),
    }
}
