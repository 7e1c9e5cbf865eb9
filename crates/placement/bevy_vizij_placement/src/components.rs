use bevy::prelude::*;
use vizij_placement_core::ObjectId;

/// Marker for the camera driven by the device pose feed.
/// The first entity carrying it is used; it should not have a parent.
#[derive(Component, Debug, Default)]
pub struct PlacementCamera;

/// An object spawned by the placement session.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedObject(pub ObjectId);
