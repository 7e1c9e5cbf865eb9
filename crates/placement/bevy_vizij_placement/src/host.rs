//! `RenderHost` over a Bevy `World`.
//!
//! Built fresh for every tick by the exclusive tick system. Objects live as
//! entities tracked in [`PlacementObjects`]; picking is a ray cast against
//! the registered cube volumes.

use bevy::prelude::*;
use vizij_placement_core::{
    DiffuseModel, DirectionalLightSpec, MaterialSpec, ObjectId, ObjectSpec, PickRay,
    PlacementError, Pose, RenderHost, TextureHandle, ViewPoint,
};

use crate::components::{PlacedObject, PlacementCamera};
use crate::convert::{apply_pose, pose_from_transform, to_bevy_vec3, transform_from_pose};
use crate::resources::{PlacementObjects, PlacementTextures};

/// Lux per unit of configured light power.
const LUX_PER_POWER: f32 = 10_000.0;

pub struct WorldHost<'w> {
    world: &'w mut World,
    camera: Option<Entity>,
    /// Radians; used when the camera has no perspective projection.
    fallback_fov_y: f32,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World, fallback_fov_y: f32) -> Self {
        let camera = world
            .query_filtered::<Entity, With<PlacementCamera>>()
            .iter(world)
            .next();
        if camera.is_none() {
            debug!("no PlacementCamera entity; camera writes are dropped");
        }
        Self {
            world,
            camera,
            fallback_fov_y,
        }
    }

    fn object_entity(&self, id: ObjectId) -> Option<Entity> {
        self.world
            .get_resource::<PlacementObjects>()
            .and_then(|objects| objects.entity(id))
    }

    fn fov_and_aspect(&self) -> (f32, f32) {
        let projection = self
            .camera
            .and_then(|e| self.world.get::<Projection>(e));
        match projection {
            Some(Projection::Perspective(p)) => (p.fov, p.aspect_ratio),
            _ => (self.fallback_fov_y, 1.0),
        }
    }

    fn standard_material(&self, spec: &MaterialSpec) -> StandardMaterial {
        let texture = spec.texture.and_then(|handle| {
            self.world
                .get_resource::<PlacementTextures>()
                .and_then(|t| t.images.get(handle.0 as usize).cloned())
        });
        let [r, g, b, a] = spec.color;
        // Textured: tint towards the flat color by the influence factor.
        let k = if texture.is_some() {
            spec.color_influence.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mix = |c: f32| 1.0 + (c - 1.0) * k;
        StandardMaterial {
            base_color: Color::srgba(mix(r), mix(g), mix(b), a),
            base_color_texture: texture,
            unlit: !spec.lighting || spec.diffuse == DiffuseModel::Unlit,
            ..default()
        }
    }
}

fn texture_path(name: &str) -> String {
    if name.contains('.') {
        format!("textures/{name}")
    } else {
        format!("textures/{name}.png")
    }
}

impl RenderHost for WorldHost<'_> {
    fn camera_pose(&self) -> Pose {
        self.camera
            .and_then(|e| self.world.get::<Transform>(e))
            .map(pose_from_transform)
            .unwrap_or(Pose::IDENTITY)
    }

    fn set_camera_pose(&mut self, pose: Pose) {
        let Some(camera) = self.camera else {
            return;
        };
        if let Some(mut tf) = self.world.get_mut::<Transform>(camera) {
            apply_pose(&mut tf, &pose);
        }
    }

    fn object_pose(&self, id: ObjectId) -> Option<Pose> {
        let entity = self.object_entity(id)?;
        self.world.get::<Transform>(entity).map(pose_from_transform)
    }

    fn set_object_pose(&mut self, id: ObjectId, pose: Pose) -> Result<(), PlacementError> {
        let entity = self
            .object_entity(id)
            .ok_or(PlacementError::UnknownObject(id))?;
        let mut tf = self
            .world
            .get_mut::<Transform>(entity)
            .ok_or(PlacementError::UnknownObject(id))?;
        apply_pose(&mut tf, &pose);
        Ok(())
    }

    fn add_light(&mut self, light: &DirectionalLightSpec) {
        let c = light.color;
        let transform = Transform::from_translation(to_bevy_vec3(light.position))
            .looking_to(to_bevy_vec3(light.direction), Vec3::Y);
        self.world.spawn((
            Name::new("placement light"),
            DirectionalLightBundle {
                directional_light: DirectionalLight {
                    color: Color::srgb(c.x, c.y, c.z),
                    illuminance: light.power * LUX_PER_POWER,
                    ..default()
                },
                transform,
                ..default()
            },
        ));
    }

    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, PlacementError> {
        let image: Handle<Image> = match self.world.get_resource::<AssetServer>() {
            Some(server) => server.load(texture_path(name)),
            None => return Err(PlacementError::resource_load(name, "no asset server")),
        };
        let mut textures = self
            .world
            .get_resource_or_insert_with(PlacementTextures::default);
        textures.images.push(image);
        Ok(TextureHandle((textures.images.len() - 1) as u64))
    }

    fn add_object(&mut self, id: ObjectId, spec: &ObjectSpec) {
        let side = spec.side_length;
        let mesh = self
            .world
            .get_resource_mut::<Assets<Mesh>>()
            .map(|mut meshes| meshes.add(Cuboid::new(side, side, side)));
        let material = self.standard_material(&spec.material);
        let material = self
            .world
            .get_resource_mut::<Assets<StandardMaterial>>()
            .map(|mut materials| materials.add(material));

        let mut entity = self.world.spawn((
            Name::new(format!("placed {id}")),
            PlacedObject(id),
            SpatialBundle::from_transform(transform_from_pose(&spec.pose)),
        ));
        if let Some(mesh) = mesh {
            entity.insert(mesh);
        }
        if let Some(material) = material {
            entity.insert(material);
        }
        let entity = entity.id();

        self.world
            .get_resource_or_insert_with(PlacementObjects::default)
            .entities
            .insert(id, entity);
    }

    fn register_pickable(&mut self, id: ObjectId, spec: &ObjectSpec) {
        self.world
            .get_resource_or_insert_with(PlacementObjects::default)
            .pickables
            .register(id, spec.side_length * 0.5);
    }

    fn query_pick_at(&mut self, point: ViewPoint) -> Option<ObjectId> {
        let (fov_y, aspect) = self.fov_and_aspect();
        let ray = PickRay::through(&self.camera_pose(), point, fov_y, aspect);
        let objects = self.world.get_resource::<PlacementObjects>()?;
        objects.pickables.pick(&ray, |id| {
            let entity = objects.entity(id)?;
            self.world.get::<Transform>(entity).map(pose_from_transform)
        })
    }
}
