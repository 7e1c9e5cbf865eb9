//! View rays and ray vs. cube tests for hosts without a picker of their own.

use glam::Vec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;
use crate::pose::Pose;

/// Normalised viewport position: (0, 0) top-left, (1, 1) bottom-right.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewPoint {
    pub const CENTER: ViewPoint = ViewPoint { x: 0.5, y: 0.5 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl PickRay {
    pub fn from_view_center(camera: &Pose) -> Self {
        Self {
            origin: camera.position,
            direction: camera.forward().normalize(),
        }
    }

    /// Ray through `point` for a perspective camera with vertical field of
    /// view `fov_y` (radians) and width/height `aspect`.
    pub fn through(camera: &Pose, point: ViewPoint, fov_y: f32, aspect: f32) -> Self {
        let half = (fov_y * 0.5).tan();
        let local = Vec3::new(
            (2.0 * point.x - 1.0) * half * aspect,
            (1.0 - 2.0 * point.y) * half,
            -1.0,
        );
        Self {
            origin: camera.position,
            direction: (camera.orientation * local).normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Distance along `ray` to the first hit on a cube of `half_extent`
/// centred at `pose`, or `None` on a miss. Hits behind the origin are
/// ignored; an origin inside the cube hits at distance 0.
pub fn ray_cube_distance(ray: &PickRay, pose: &Pose, half_extent: f32) -> Option<f32> {
    let inv = pose.orientation.normalize().inverse();
    let origin = inv * (ray.origin - pose.position);
    let dir = inv * ray.direction;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            if o.abs() > half_extent {
                return None;
            }
            continue;
        }
        let t1 = (-half_extent - o) / d;
        let t2 = (half_extent - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

/// Objects registered for picking and their cube half extents.
#[derive(Debug, Default, Clone)]
pub struct Pickables {
    extents: HashMap<ObjectId, f32>,
}

impl Pickables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ObjectId, half_extent: f32) {
        self.extents.insert(id, half_extent);
    }

    pub fn unregister(&mut self, id: ObjectId) -> bool {
        self.extents.remove(&id).is_some()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.extents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Nearest registered object hit by `ray`. `pose_of` looks up current
    /// poses; objects it cannot resolve are skipped.
    pub fn pick<F>(&self, ray: &PickRay, mut pose_of: F) -> Option<ObjectId>
    where
        F: FnMut(ObjectId) -> Option<Pose>,
    {
        let mut best: Option<(f32, ObjectId)> = None;
        for (&id, &half) in self.extents.iter() {
            let Some(pose) = pose_of(id) else {
                continue;
            };
            if let Some(t) = ray_cube_distance(ray, &pose, half) {
                // Ties go to the lower id so results do not depend on map order.
                let better = match best {
                    None => true,
                    Some((bt, bid)) => t < bt || (t == bt && id < bid),
                };
                if better {
                    best = Some((t, id));
                }
            }
        }
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn center_ray_hits_cube_ahead() {
        let ray = PickRay::from_view_center(&Pose::IDENTITY);
        let cube = Pose::from_position(Vec3::new(0.0, 0.0, -2.0));
        let t = ray_cube_distance(&ray, &cube, 0.25).unwrap();
        assert!((t - 1.75).abs() < 1e-5);
        // Entry point lies on the near face.
        assert!(ray.at(t).abs_diff_eq(Vec3::new(0.0, 0.0, -1.75), 1e-5));
    }

    #[test]
    fn cube_behind_camera_is_missed() {
        let ray = PickRay::from_view_center(&Pose::IDENTITY);
        let cube = Pose::from_position(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(ray_cube_distance(&ray, &cube, 0.25), None);
    }

    #[test]
    fn rotated_cube_uses_its_own_frame() {
        // Rotated 45° about Y, the cube's corner reaches out to half * sqrt(2).
        let ray = PickRay {
            origin: Vec3::new(0.3, 0.0, 0.0),
            direction: Vec3::NEG_Z,
        };
        let axis_aligned = Pose::from_position(Vec3::new(0.0, 0.0, -2.0));
        let turned = Pose::new(axis_aligned.position, Quat::from_rotation_y(FRAC_PI_4));
        assert_eq!(ray_cube_distance(&ray, &axis_aligned, 0.25), None);
        assert!(ray_cube_distance(&ray, &turned, 0.25).is_some());
    }

    #[test]
    fn origin_inside_cube_hits_at_zero() {
        let ray = PickRay::from_view_center(&Pose::IDENTITY);
        assert_eq!(ray_cube_distance(&ray, &Pose::IDENTITY, 0.5), Some(0.0));
    }

    #[test]
    fn off_center_ray_points_into_the_quadrant() {
        let ray = PickRay::through(
            &Pose::IDENTITY,
            ViewPoint::new(1.0, 0.0),
            60f32.to_radians(),
            1.5,
        );
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.z < 0.0);
        let center = PickRay::through(&Pose::IDENTITY, ViewPoint::CENTER, 1.0, 1.0);
        assert!(center.direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn nearest_registered_object_wins() {
        let mut p = Pickables::new();
        p.register(ObjectId(0), 0.25);
        p.register(ObjectId(1), 0.25);
        p.register(ObjectId(2), 0.25);
        let poses = [
            Pose::from_position(Vec3::new(0.0, 0.0, -3.0)),
            Pose::from_position(Vec3::new(0.0, 0.0, -1.0)),
            Pose::from_position(Vec3::new(5.0, 0.0, -1.0)),
        ];
        let ray = PickRay::from_view_center(&Pose::IDENTITY);
        let hit = p.pick(&ray, |id| poses.get(id.0 as usize).copied());
        assert_eq!(hit, Some(ObjectId(1)));
        assert!(p.unregister(ObjectId(1)));
        let hit = p.pick(&ray, |id| poses.get(id.0 as usize).copied());
        assert_eq!(hit, Some(ObjectId(0)));
    }
}
