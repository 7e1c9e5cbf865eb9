use bevy::prelude::*;
use hashbrown::HashMap;
use vizij_placement_core::{
    DeviceExtrinsics, ObjectId, Pickables, PlacementEvent, PoseSample, TickOutputs, TouchAction,
};

/// Latest device pose from the AR bridge. The tick consumes `latest`, so
/// each sample is applied at most once.
#[derive(Resource, Debug, Default)]
pub struct DevicePoseFeed {
    pub latest: Option<PoseSample>,
    pub extrinsics: DeviceExtrinsics,
}

impl DevicePoseFeed {
    pub fn with_extrinsics(extrinsics: DeviceExtrinsics) -> Self {
        Self {
            latest: None,
            extrinsics,
        }
    }

    /// Replace the pending sample; older unconsumed samples are dropped.
    pub fn push(&mut self, sample: PoseSample) {
        self.latest = Some(sample);
    }
}

/// Entities and pick volumes for every spawned object.
#[derive(Resource, Debug, Default)]
pub struct PlacementObjects {
    pub entities: HashMap<ObjectId, Entity>,
    pub pickables: Pickables,
}

impl PlacementObjects {
    pub fn entity(&self, id: ObjectId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }
}

/// Texture handles issued to the core, indexed by `TextureHandle.0`.
#[derive(Resource, Debug, Default)]
pub struct PlacementTextures {
    pub images: Vec<Handle<Image>>,
}

/// Outputs of the most recent tick, for diagnostics and UI.
#[derive(Resource, Debug, Default)]
pub struct LastTickOutputs(pub TickOutputs);

/// Touch action posted by app code (alternative to raw `TouchInput`).
#[derive(Event, Debug, Clone, Copy)]
pub struct PlacementTouch(pub TouchAction);

/// Result from an external picker; forwarded to the session before the
/// next tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct ObjectPicked(pub ObjectId);

/// Placement events re-emitted into the ECS after each tick.
#[derive(Event, Debug, Clone)]
pub struct PlacementNotice(pub PlacementEvent);
