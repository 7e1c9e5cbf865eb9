use bevy::input::touch::TouchPhase;
use bevy::prelude::*;
use hashbrown::HashSet;
use vizij_placement_core::{DeviceExtrinsics, ObjectId, TouchAction};

use crate::host::WorldHost;
use crate::resources::{
    DevicePoseFeed, LastTickOutputs, ObjectPicked, PlacementNotice, PlacementTouch,
};
use crate::VizijPlacement;

/// Seeds the session camera from the `PlacementCamera` transform and adds the
/// configured light. Runs once, after user startup systems spawned the camera.
pub fn init_scene_system(world: &mut World) {
    if !world.contains_resource::<VizijPlacement>() {
        return;
    }
    world.resource_scope(|world, mut placement: Mut<VizijPlacement>| {
        let fov = placement.0.config().vertical_fov_deg.to_radians();
        let mut host = WorldHost::new(world, fov);
        placement.0.init_scene(&mut host);
    });
}

/// Placement action for a single touch phase; moves carry none.
pub fn action_for_phase(phase: TouchPhase) -> Option<TouchAction> {
    match phase {
        TouchPhase::Started => Some(TouchAction::Down),
        TouchPhase::Ended => Some(TouchAction::Up),
        TouchPhase::Canceled => Some(TouchAction::Cancel),
        TouchPhase::Moved => None,
    }
}

/// Input side: turns raw touches, app-posted actions and the left mouse
/// button into mailbox posts. Never touches the scene.
///
/// Multi-touch collapses to one gesture: down on the first finger, up when
/// the last one lifts.
pub fn collect_touch_system(
    mut placement: ResMut<VizijPlacement>,
    mut touches: EventReader<TouchInput>,
    mut posted: EventReader<PlacementTouch>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut active: Local<HashSet<u64>>,
) {
    for touch in touches.read() {
        match touch.phase {
            TouchPhase::Started => {
                if active.is_empty() {
                    if let Some(action) = action_for_phase(touch.phase) {
                        placement.0.post_touch(action);
                    }
                }
                active.insert(touch.id);
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                if active.remove(&touch.id) && active.is_empty() {
                    if let Some(action) = action_for_phase(touch.phase) {
                        placement.0.post_touch(action);
                    }
                }
            }
            TouchPhase::Moved => {}
        }
    }

    for PlacementTouch(action) in posted.read() {
        placement.0.post_touch(*action);
    }

    if let Some(mouse) = mouse {
        if mouse.just_pressed(MouseButton::Left) {
            placement.0.post_touch(TouchAction::Down);
        }
        if mouse.just_released(MouseButton::Left) {
            placement.0.post_touch(TouchAction::Up);
        }
    }
}

/// Render side: forwards external pick results, consumes the latest device
/// pose and runs one session tick against the world.
pub fn placement_tick_system(world: &mut World) {
    if !world.contains_resource::<VizijPlacement>() {
        return;
    }

    let picks: Vec<ObjectId> = world
        .get_resource_mut::<Events<ObjectPicked>>()
        .map(|mut events| events.drain().map(|ObjectPicked(id)| id).collect())
        .unwrap_or_default();

    let (sample, extrinsics) = match world.get_resource_mut::<DevicePoseFeed>() {
        Some(mut feed) => (feed.latest.take(), feed.extrinsics),
        None => (None, DeviceExtrinsics::default()),
    };

    let outputs = world.resource_scope(|world, mut placement: Mut<VizijPlacement>| {
        for id in picks {
            placement.0.on_object_picked(id);
        }
        let fov = placement.0.config().vertical_fov_deg.to_radians();
        let mut host = WorldHost::new(world, fov);
        placement.0.tick(&mut host, sample.as_ref(), &extrinsics)
    });

    for event in &outputs.events {
        world.send_event(PlacementNotice(event.clone()));
    }
    world.insert_resource(LastTickOutputs(outputs));
}
