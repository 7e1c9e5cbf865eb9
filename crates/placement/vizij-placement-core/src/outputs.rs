//! Output contracts from a placement tick.
//!
//! Poses have already been committed to the host when these are returned;
//! adapters use them for diagnostics and to forward events.

use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;
use crate::pose::Pose;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Pose status was not `Valid`.
    Untracked,
    /// Timestamp not newer than the last accepted sample.
    Stale { last: f64 },
    NonFinite,
}

/// Discrete signals emitted during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlacementEvent {
    ObjectSpawned { id: ObjectId, pose: Pose },
    ObjectPicked { id: ObjectId },
    ObjectReleased { id: ObjectId },
    /// The picked object disappeared from the host scene.
    ObjectLost { id: ObjectId },
    ResourceLoadFailed { resource: String, message: String },
    SampleSkipped { timestamp: f64, reason: SkipReason },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOutputs {
    /// Camera pose committed this tick, if a sample was accepted.
    pub camera: Option<Pose>,
    /// Object pose committed this tick, if one was picked.
    pub object: Option<(ObjectId, Pose)>,
    #[serde(default)]
    pub events: Vec<PlacementEvent>,
}

impl TickOutputs {
    #[inline]
    pub fn push_event(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.camera.is_none() && self.object.is_none() && self.events.is_empty()
    }

    pub fn spawned(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.events.iter().filter_map(|e| match e {
            PlacementEvent::ObjectSpawned { id, .. } => Some(*id),
            _ => None,
        })
    }
}
