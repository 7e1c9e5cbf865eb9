#![allow(dead_code)]
use std::collections::BTreeMap;

use serde::Deserialize;
use vizij_placement_core::{
    DeviceExtrinsics, DirectionalLightSpec, ObjectId, ObjectSpec, PickRay, Pickables,
    PlacementError, Pose, PoseSample, RenderHost, TextureHandle, ViewPoint,
};

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn approx_vec3(a: glam::Vec3, b: glam::Vec3, eps: f32) {
    assert!(a.abs_diff_eq(b, eps), "left={a:?} right={b:?} eps={eps}");
}

#[derive(Debug, Deserialize)]
pub struct PoseTrace {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub extrinsics: DeviceExtrinsics,
    pub samples: Vec<PoseSample>,
}

pub fn trace(name: &str) -> PoseTrace {
    vizij_test_fixtures::pose_traces::load(name).expect("pose trace fixture")
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub spec: ObjectSpec,
    pub pose: Pose,
}

/// In-memory scene that records every call made by the session.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub camera: Pose,
    pub objects: BTreeMap<ObjectId, SceneObject>,
    pub pickables: Pickables,
    pub lights: Vec<DirectionalLightSpec>,
    pub fail_textures: bool,
    pub texture_requests: Vec<String>,
    pub pick_queries: Vec<ViewPoint>,
    pub object_writes: Vec<(ObjectId, Pose)>,
    /// Answer picks with `None` so hits only arrive via the async callback.
    pub async_picker: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes_for(&self, id: ObjectId) -> usize {
        self.object_writes.iter().filter(|(w, _)| *w == id).count()
    }

    pub fn pose_of(&self, id: ObjectId) -> Pose {
        self.objects[&id].pose
    }
}

impl RenderHost for RecordingHost {
    fn camera_pose(&self) -> Pose {
        self.camera
    }

    fn set_camera_pose(&mut self, pose: Pose) {
        self.camera = pose;
    }

    fn object_pose(&self, id: ObjectId) -> Option<Pose> {
        self.objects.get(&id).map(|o| o.pose)
    }

    fn set_object_pose(&mut self, id: ObjectId, pose: Pose) -> Result<(), PlacementError> {
        let obj = self
            .objects
            .get_mut(&id)
            .ok_or(PlacementError::UnknownObject(id))?;
        obj.pose = pose;
        self.object_writes.push((id, pose));
        Ok(())
    }

    fn add_light(&mut self, light: &DirectionalLightSpec) {
        self.lights.push(light.clone());
    }

    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, PlacementError> {
        self.texture_requests.push(name.to_string());
        if self.fail_textures {
            Err(PlacementError::resource_load(name, "decode failed"))
        } else {
            Ok(TextureHandle(self.texture_requests.len() as u64))
        }
    }

    fn add_object(&mut self, id: ObjectId, spec: &ObjectSpec) {
        self.objects.insert(
            id,
            SceneObject {
                spec: spec.clone(),
                pose: spec.pose,
            },
        );
    }

    fn register_pickable(&mut self, id: ObjectId, spec: &ObjectSpec) {
        self.pickables.register(id, spec.side_length * 0.5);
    }

    fn picks_synchronously(&self) -> bool {
        !self.async_picker
    }

    fn query_pick_at(&mut self, point: ViewPoint) -> Option<ObjectId> {
        self.pick_queries.push(point);
        if self.async_picker {
            return None;
        }
        let ray = PickRay::through(&self.camera, point, 60f32.to_radians(), 1.0);
        let objects = &self.objects;
        self.pickables
            .pick(&ray, |id| objects.get(&id).map(|o| o.pose))
    }
}
