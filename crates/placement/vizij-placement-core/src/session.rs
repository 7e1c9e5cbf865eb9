//! PlacementSession: owns placement state and runs one render tick at a time.
//!
//! Methods:
//! - new / try_new (validated config), init_scene (light + camera seed), post_touch (input context),
//!   on_object_picked (picker callback), tick (intent → pick/spawn → poses)

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::error::PlacementError;
use crate::host::{DirectionalLightSpec, MaterialSpec, ObjectSpec, RenderHost};
use crate::ids::{IdAllocator, ObjectId};
use crate::inputs::{Intent, IntentMailbox, TouchAction};
use crate::outputs::{PlacementEvent, SkipReason, TickOutputs};
use crate::picking::ViewPoint;
use crate::pose::{DeviceExtrinsics, Pose, PoseSample, PoseStatus};
use crate::tracker::{PlacementState, PlacementTracker, Resolution, TrackedObject};
use crate::transform::update_camera_and_object_pose;

/// Camera pose as last committed by the render tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub pose: Pose,
    /// Timestamp of the sample the pose came from; `None` when seeded
    /// from the host.
    pub timestamp: Option<f64>,
}

#[derive(Debug)]
pub struct PlacementSession {
    cfg: PlacementConfig,
    ids: IdAllocator,
    tracker: PlacementTracker,
    mailbox: IntentMailbox,
    camera: Option<CameraState>,
    /// A tap arrived while the pick was still waiting on the picker.
    release_after_pick: bool,
}

impl PlacementSession {
    /// A config that fails [`PlacementConfig::validate`] is logged and
    /// replaced by the defaults. [`PlacementSession::try_new`] returns the
    /// error instead.
    pub fn new(cfg: PlacementConfig) -> Self {
        Self::try_new(cfg).unwrap_or_else(|err| {
            warn!("placement config rejected, using defaults: {err}");
            Self::with_config(PlacementConfig::default())
        })
    }

    pub fn try_new(cfg: PlacementConfig) -> Result<Self, PlacementError> {
        cfg.validate()?;
        Ok(Self::with_config(cfg))
    }

    fn with_config(cfg: PlacementConfig) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            tracker: PlacementTracker::new(),
            mailbox: IntentMailbox::new(),
            camera: None,
            release_after_pick: false,
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.cfg
    }

    pub fn state(&self) -> PlacementState {
        self.tracker.state()
    }

    pub fn picked(&self) -> Option<ObjectId> {
        self.tracker.picked()
    }

    pub fn camera(&self) -> Option<CameraState> {
        self.camera
    }

    pub fn objects_spawned(&self) -> u32 {
        self.ids.allocated()
    }

    pub fn pending_intent(&self) -> Option<Intent> {
        self.mailbox.peek()
    }

    /// Add the configured light and seed the camera from the host.
    pub fn init_scene<H: RenderHost + ?Sized>(&mut self, host: &mut H) {
        host.add_light(&DirectionalLightSpec::from(&self.cfg.light));
        self.camera = Some(CameraState {
            pose: host.camera_pose(),
            timestamp: None,
        });
    }

    /// Input context entry point. Never touches the scene.
    pub fn post_touch(&mut self, action: TouchAction) {
        self.mailbox.post(action);
    }

    /// Picker callback for hosts that resolve picks asynchronously.
    pub fn on_object_picked(&mut self, id: ObjectId) {
        self.tracker.on_object_picked(id);
    }

    /// Run one render tick. `sample` is the device pose for the color frame
    /// about to be shown; `None` leaves the camera where it is.
    pub fn tick<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        sample: Option<&PoseSample>,
        extrinsics: &DeviceExtrinsics,
    ) -> TickOutputs {
        let mut out = TickOutputs::default();
        let intent = self.mailbox.take();

        // Left open last tick for an asynchronous picker.
        if self.tracker.is_add_pending() {
            self.settle_pick(host, None, &mut out);
            if std::mem::take(&mut self.release_after_pick) {
                self.release(&mut out);
            }
        }

        if intent == Some(Intent::Release) {
            self.release(&mut out);
        }
        if intent.is_some_and(Intent::picks) {
            self.pick_or_spawn(host, &mut out);
        }

        if let Some(sample) = sample {
            match self.check_sample(sample) {
                Ok(()) => self.apply_sample(host, sample, extrinsics, &mut out),
                Err(reason) => {
                    debug!("skipping pose sample at {}: {:?}", sample.timestamp, reason);
                    out.push_event(PlacementEvent::SampleSkipped {
                        timestamp: sample.timestamp,
                        reason,
                    });
                }
            }
        }

        if intent == Some(Intent::Tap) {
            if self.tracker.is_add_pending() {
                self.release_after_pick = true;
            } else {
                self.release(&mut out);
            }
        }
        out
    }

    fn release(&mut self, out: &mut TickOutputs) {
        if let Some(id) = self.tracker.release() {
            out.push_event(PlacementEvent::ObjectReleased { id });
        }
    }

    fn pick_or_spawn<H: RenderHost + ?Sized>(&mut self, host: &mut H, out: &mut TickOutputs) {
        if let Some(dropped) = self.tracker.begin_pick() {
            out.push_event(PlacementEvent::ObjectReleased { id: dropped });
        }
        let hit = host.query_pick_at(ViewPoint::CENTER);
        if hit.is_none() && !host.picks_synchronously() {
            debug!("pick query in flight; settling next tick");
            return;
        }
        self.settle_pick(host, hit, out);
    }

    fn settle_pick<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        hit: Option<ObjectId>,
        out: &mut TickOutputs,
    ) {
        match self.tracker.resolve_pending(hit) {
            Resolution::Picked(id) => {
                debug!("picked existing {id}");
                out.push_event(PlacementEvent::ObjectPicked { id });
            }
            Resolution::Spawn => {
                let id = self.spawn_object(host, out);
                self.tracker.attach_spawned(id);
            }
            Resolution::Nothing => {}
        }
    }

    fn camera_pose<H: RenderHost + ?Sized>(&self, host: &H) -> Pose {
        self.camera
            .map(|c| c.pose)
            .unwrap_or_else(|| host.camera_pose())
    }

    fn spawn_object<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        out: &mut TickOutputs,
    ) -> ObjectId {
        let pose = self
            .camera_pose(host)
            .translated_forward(self.cfg.spawn_distance);

        let mut material = MaterialSpec::untextured(&self.cfg.material);
        if let Some(name) = self.cfg.material.texture.as_deref() {
            match host.load_texture(name) {
                Ok(handle) => material.texture = Some(handle),
                Err(err) => {
                    warn!("spawning without texture: {err}");
                    out.push_event(PlacementEvent::ResourceLoadFailed {
                        resource: name.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let spec = ObjectSpec {
            pose,
            side_length: self.cfg.cube_side_length,
            material,
        };
        let id = self.ids.alloc_object();
        host.register_pickable(id, &spec);
        host.add_object(id, &spec);
        debug!("spawned {id} at {:?}", pose.position);
        out.push_event(PlacementEvent::ObjectSpawned { id, pose });
        id
    }

    fn check_sample(&self, sample: &PoseSample) -> Result<(), SkipReason> {
        if sample.status != PoseStatus::Valid && !self.cfg.accept_unverified_poses {
            return Err(SkipReason::Untracked);
        }
        if !sample.timestamp.is_finite() || !sample.pose.is_finite() {
            return Err(SkipReason::NonFinite);
        }
        if let Some(last) = self.camera.and_then(|c| c.timestamp) {
            if sample.timestamp <= last {
                return Err(SkipReason::Stale { last });
            }
        }
        Ok(())
    }

    fn apply_sample<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        sample: &PoseSample,
        extrinsics: &DeviceExtrinsics,
        out: &mut TickOutputs,
    ) {
        let previous = self.camera_pose(host);
        let picked = match self.tracker.picked() {
            Some(id) => match host.object_pose(id) {
                Some(pose) => Some(TrackedObject { id, pose }),
                None => {
                    self.lose(id, out);
                    None
                }
            },
            None => None,
        };

        let update = update_camera_and_object_pose(
            &sample.pose,
            extrinsics,
            &previous,
            picked.as_ref(),
            self.cfg.orientation_delta,
        );

        if let (Some(obj), Some(pose)) = (picked, update.object) {
            match host.set_object_pose(obj.id, pose) {
                Ok(()) => {
                    debug!("moving {}", obj.id);
                    out.object = Some((obj.id, pose));
                }
                Err(err) => {
                    warn!("could not move {}: {err}", obj.id);
                    self.lose(obj.id, out);
                }
            }
        }

        host.set_camera_pose(update.camera);
        self.camera = Some(CameraState {
            pose: update.camera,
            timestamp: Some(sample.timestamp),
        });
        out.camera = Some(update.camera);
    }

    fn lose(&mut self, id: ObjectId, out: &mut TickOutputs) {
        warn!("picked {id} is gone from the scene; detaching");
        self.tracker.detach(id);
        out.push_event(PlacementEvent::ObjectLost { id });
    }
}

impl Default for PlacementSession {
    fn default() -> Self {
        Self::new(PlacementConfig::default())
    }
}
