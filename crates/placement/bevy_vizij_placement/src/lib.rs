//! Bevy adapter for `vizij-placement-core`.
//!
//! Push device poses into [`DevicePoseFeed`], tag the AR camera with
//! [`PlacementCamera`], and touches place and drag cubes in the scene.

use bevy::prelude::*;
use vizij_placement_core::{PlacementConfig, PlacementSession};

pub mod components;
pub mod convert;
pub mod host;
pub mod resources;
pub mod systems;

pub use components::{PlacedObject, PlacementCamera};
pub use host::WorldHost;
pub use resources::{
    DevicePoseFeed, LastTickOutputs, ObjectPicked, PlacementNotice, PlacementObjects,
    PlacementTextures, PlacementTouch,
};

#[derive(Resource, Debug)]
pub struct VizijPlacement(pub PlacementSession);

#[derive(Default)]
pub struct VizijPlacementPlugin {
    pub config: PlacementConfig,
}

impl VizijPlacementPlugin {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }
}

impl Plugin for VizijPlacementPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(VizijPlacement(PlacementSession::new(self.config.clone())))
            .init_resource::<DevicePoseFeed>()
            .init_resource::<PlacementObjects>()
            .init_resource::<PlacementTextures>()
            .init_resource::<LastTickOutputs>()
            .add_event::<TouchInput>()
            .add_event::<PlacementTouch>()
            .add_event::<ObjectPicked>()
            .add_event::<PlacementNotice>()
            .add_systems(PostStartup, systems::init_scene_system)
            .add_systems(
                Update,
                (systems::collect_touch_system, systems::placement_tick_system).chain(),
            );
    }
}
