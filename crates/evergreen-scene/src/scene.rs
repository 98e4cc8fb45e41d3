//! Scene setup - camera, lights, ground, and the tree
//!
//! Everything is spawned once at startup from the `TreeScene` resource.
//! Nothing here is ever despawned.

use bevy::light::{NotShadowCaster, NotShadowReceiver, PointLightShadowMap};
use bevy::prelude::*;
use bevy::render::view::Hdr;
use evergreen_core::scene::MeshNode;
use evergreen_core::ShadowFlags;

use crate::camera::MainCamera;
use crate::lighting;
use crate::mesh::shape_mesh;
use crate::TreeScene;

/// Marker component for the ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the trunk
#[derive(Component)]
pub struct Trunk;

/// A foliage cone, numbered from the bottom
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Foliage {
    pub level: u32,
}

/// Marker component for the star on top of the tree
#[derive(Component)]
pub struct StarOrnament;

/// Marker component for the scene's spot light
#[derive(Component)]
pub struct MainSpotLight;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn vec3(v: evergreen_core::glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scene: Res<TreeScene>,
) {
    // Camera - Y is up, looking at the middle of the tree
    let camera = &scene.camera;
    let mut camera_entity = commands.spawn((
        Camera3d::default(),
        Hdr,
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_radians,
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_translation(vec3(camera.eye)).looking_at(vec3(camera.target), Vec3::Y),
        MainCamera,
    ));
    if let Some(bloom) = scene.pipeline.bloom() {
        camera_entity.insert(lighting::bloom(bloom));
    }

    // Lighting - dim ambient fill plus one shadow-casting spot from above
    commands.insert_resource(lighting::ambient_light(&scene.ambient));
    commands.insert_resource(PointLightShadowMap {
        size: scene.spot.shadow_map_size as usize,
    });
    commands.spawn((
        lighting::spot_light(&scene.spot),
        Transform::from_translation(vec3(scene.spot.position)).looking_at(vec3(scene.spot.target), Vec3::Y),
        MainSpotLight,
    ));

    let ground = spawn_mesh_node(&mut commands, &mut meshes, &mut materials, &scene.ground);
    commands.entity(ground).insert(Ground);

    let trunk = spawn_mesh_node(&mut commands, &mut meshes, &mut materials, &scene.trunk);
    commands.entity(trunk).insert(Trunk);

    // One material shared by every cone
    let foliage_material = scene
        .foliage
        .first()
        .map(|node| materials.add(lighting::standard_material(&node.material)));
    for (level, node) in scene.foliage.iter().enumerate() {
        let Some(material) = foliage_material.clone() else {
            break;
        };
        let entity = commands
            .spawn((
                Mesh3d(meshes.add(shape_mesh(&node.shape))),
                MeshMaterial3d(material),
                Transform::from_translation(vec3(node.translation)),
                Name::new(node.name.clone()),
                Foliage { level: level as u32 },
            ))
            .id();
        apply_shadow_flags(&mut commands, entity, node.shadows);
    }

    let star = spawn_mesh_node(&mut commands, &mut meshes, &mut materials, &scene.star);
    commands.entity(star).insert(StarOrnament);

    tracing::info!(
        levels = scene.foliage.len(),
        tree_top = scene.tree_top,
        star_y = scene.star.translation.y,
        "Scene spawned"
    );
}

fn spawn_mesh_node(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    node: &MeshNode,
) -> Entity {
    let entity = commands
        .spawn((
            Mesh3d(meshes.add(shape_mesh(&node.shape))),
            MeshMaterial3d(materials.add(lighting::standard_material(&node.material))),
            Transform::from_translation(vec3(node.translation)),
            Name::new(node.name.clone()),
        ))
        .id();
    apply_shadow_flags(commands, entity, node.shadows);
    entity
}

fn apply_shadow_flags(commands: &mut Commands, entity: Entity, shadows: ShadowFlags) {
    let mut entity = commands.entity(entity);
    if !shadows.cast {
        entity.insert(NotShadowCaster);
    }
    if !shadows.receive {
        entity.insert(NotShadowReceiver);
    }
}
