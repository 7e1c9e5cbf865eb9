use bevy::prelude::*;
use vizij_placement_core::Pose;

// Components go through arrays so the core's glam and Bevy's re-export never
// have to be the same crate instance.

pub fn pose_from_transform(tf: &Transform) -> Pose {
    Pose::new(
        vizij_placement_core::Vec3::from_array(tf.translation.to_array()),
        vizij_placement_core::Quat::from_array(tf.rotation.to_array()),
    )
}

/// Writes translation and rotation, keeping scale. The rotation is copied
/// as-is, without renormalising.
pub fn apply_pose(tf: &mut Transform, pose: &Pose) {
    tf.translation = Vec3::from_array(pose.position.to_array());
    tf.rotation = Quat::from_array(pose.orientation.to_array());
}

pub fn transform_from_pose(pose: &Pose) -> Transform {
    let mut tf = Transform::IDENTITY;
    apply_pose(&mut tf, pose);
    tf
}

pub fn to_bevy_vec3(v: vizij_placement_core::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}
