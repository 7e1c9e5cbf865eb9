//! Placement state tracker: which object, if any, follows the camera.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;
use crate::pose::Pose;

/// An object owned by the render host, as seen by the transformer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub id: ObjectId,
    pub pose: Pose,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementState {
    /// Nothing picked, nothing pending.
    #[default]
    Idle,
    /// Touch-down seen and the pick query issued. Synchronous pickers settle
    /// it in the same tick; asynchronous ones on the tick after.
    AddPending,
    /// The object follows camera motion until release.
    Picked(ObjectId),
}

/// What a tick must do after a pick query came back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// An existing object was hit and is now picked.
    Picked(ObjectId),
    /// Nothing was hit; the caller spawns an object and calls
    /// [`PlacementTracker::attach_spawned`].
    Spawn,
    /// No pick was pending.
    Nothing,
}

#[derive(Debug, Default)]
pub struct PlacementTracker {
    state: PlacementState,
    /// Result of an asynchronous pick query that landed while pending.
    pending_hit: Option<ObjectId>,
}

impl PlacementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> PlacementState {
        self.state
    }

    #[inline]
    pub fn picked(&self) -> Option<ObjectId> {
        match self.state {
            PlacementState::Picked(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_add_pending(&self) -> bool {
        self.state == PlacementState::AddPending
    }

    /// Touch-down consumed: wait for the pick query issued alongside it.
    /// Any previously picked object is dropped first.
    pub fn begin_pick(&mut self) -> Option<ObjectId> {
        let dropped = self.picked();
        self.state = PlacementState::AddPending;
        self.pending_hit = None;
        dropped
    }

    /// Picker callback. Records the hit as the followed object regardless of
    /// the current state.
    pub fn on_object_picked(&mut self, id: ObjectId) {
        debug!("object picked: {id}");
        if self.state == PlacementState::AddPending {
            self.pending_hit = Some(id);
        } else {
            self.state = PlacementState::Picked(id);
        }
    }

    /// Settle a pending pick on the render tick. `hit` is the synchronous
    /// query result, if the host has one.
    pub fn resolve_pending(&mut self, hit: Option<ObjectId>) -> Resolution {
        if self.state != PlacementState::AddPending {
            return Resolution::Nothing;
        }
        match hit.or(self.pending_hit.take()) {
            Some(id) => {
                self.state = PlacementState::Picked(id);
                Resolution::Picked(id)
            }
            None => Resolution::Spawn,
        }
    }

    /// Follow a freshly spawned object; clears the pending add.
    pub fn attach_spawned(&mut self, id: ObjectId) {
        self.pending_hit = None;
        self.state = PlacementState::Picked(id);
    }

    /// Touch-up: stop following. Returns the object that was released.
    /// Releasing with nothing picked is a no-op.
    pub fn release(&mut self) -> Option<ObjectId> {
        let released = self.picked();
        if self.state == PlacementState::Idle {
            debug!("release with nothing picked");
        }
        self.state = PlacementState::Idle;
        self.pending_hit = None;
        released
    }

    /// Drop the picked reference without a touch-up (object vanished).
    pub fn detach(&mut self, id: ObjectId) {
        if self.picked() == Some(id) {
            self.state = PlacementState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_asks_for_spawn_then_follows_new_object() {
        let mut t = PlacementTracker::new();
        assert_eq!(t.begin_pick(), None);
        assert!(t.is_add_pending());
        assert_eq!(t.resolve_pending(None), Resolution::Spawn);
        t.attach_spawned(ObjectId(3));
        assert_eq!(t.state(), PlacementState::Picked(ObjectId(3)));
        assert_eq!(t.release(), Some(ObjectId(3)));
        assert_eq!(t.state(), PlacementState::Idle);
    }

    #[test]
    fn synchronous_hit_picks_existing() {
        let mut t = PlacementTracker::new();
        t.begin_pick();
        assert_eq!(
            t.resolve_pending(Some(ObjectId(1))),
            Resolution::Picked(ObjectId(1))
        );
        assert_eq!(t.picked(), Some(ObjectId(1)));
    }

    #[test]
    fn asynchronous_hit_is_used_on_resolve() {
        let mut t = PlacementTracker::new();
        t.begin_pick();
        t.on_object_picked(ObjectId(9));
        assert!(t.is_add_pending());
        assert_eq!(t.resolve_pending(None), Resolution::Picked(ObjectId(9)));
    }

    #[test]
    fn release_when_idle_is_noop() {
        let mut t = PlacementTracker::new();
        assert_eq!(t.release(), None);
        assert_eq!(t.state(), PlacementState::Idle);
    }

    #[test]
    fn late_callback_while_idle_sets_followed_object() {
        let mut t = PlacementTracker::new();
        t.on_object_picked(ObjectId(2));
        assert_eq!(t.picked(), Some(ObjectId(2)));
    }

    #[test]
    fn resolve_without_pending_does_nothing() {
        let mut t = PlacementTracker::new();
        assert_eq!(t.resolve_pending(Some(ObjectId(1))), Resolution::Nothing);
        assert_eq!(t.state(), PlacementState::Idle);
    }

    #[test]
    fn begin_pick_drops_previous_object() {
        let mut t = PlacementTracker::new();
        t.on_object_picked(ObjectId(4));
        assert_eq!(t.begin_pick(), Some(ObjectId(4)));
        assert_eq!(t.picked(), None);
    }
}
