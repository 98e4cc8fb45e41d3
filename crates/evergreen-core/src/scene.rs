//! Scene description: every node of the tree scene, fully configured
//!
//! `SceneDescription::build` is the single place the scene is assembled.
//! The result is immutable; renderers spawn it once at startup and never
//! remove or replace any of it.

use glam::Vec3;
use serde::Serialize;
use tracing::debug;

use crate::config::{ControlsConfig, Rgb, SceneConfig};
use crate::layout::{foliage_layout, star_height};
use crate::pipeline::{BloomSettings, RenderPipeline};
use crate::star::{star_mesh, GeometryError, MeshData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShadowFlags {
    pub cast: bool,
    pub receive: bool,
}

impl ShadowFlags {
    pub const CAST: ShadowFlags = ShadowFlags { cast: true, receive: false };
    pub const RECEIVE: ShadowFlags = ShadowFlags { cast: false, receive: true };
    pub const BOTH: ShadowFlags = ShadowFlags { cast: true, receive: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialSpec {
    pub base_color: Rgb,
    pub emissive: Option<Rgb>,
    pub emissive_intensity: f32,
}

impl MaterialSpec {
    pub fn solid(base_color: Rgb) -> Self {
        Self {
            base_color,
            emissive: None,
            emissive_intensity: 0.0,
        }
    }
}

/// Geometry of a mesh node; primitives are centred on their origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    /// Square in the XZ plane facing +Y
    Plane { size: f32 },
    /// Upright along Y
    Cylinder { radius: f32, height: f32, segments: u32 },
    /// Upright along Y, tip at +Y
    Cone { radius: f32, height: f32, segments: u32 },
    Extruded {
        triangles: usize,
        #[serde(skip_serializing)]
        mesh: MeshData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshNode {
    pub name: String,
    pub shape: Shape,
    pub material: MaterialSpec,
    pub translation: Vec3,
    pub shadows: ShadowFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraSpec {
    /// Vertical field of view
    pub fov_radians: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmbientLightSpec {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotLightSpec {
    pub color: Rgb,
    /// Candela
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Outer cone half-angle
    pub angle_radians: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub distance: f32,
    pub cast_shadows: bool,
    pub shadow_map_size: u32,
    pub shadow_near: f32,
}

impl SpotLightSpec {
    /// Angle at which the penumbra falloff starts
    pub fn inner_angle_radians(&self) -> f32 {
        self.angle_radians * (1.0 - self.penumbra)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDescription {
    pub camera: CameraSpec,
    pub controls: ControlsConfig,
    pub ambient: AmbientLightSpec,
    pub spot: SpotLightSpec,
    pub ground: MeshNode,
    pub trunk: MeshNode,
    /// Bottom to top
    pub foliage: Vec<MeshNode>,
    pub star: MeshNode,
    pub pipeline: RenderPipeline,
    /// Y of the topmost foliage level
    pub tree_top: f32,
}

impl SceneDescription {
    /// Assemble the whole scene from configuration
    pub fn build(config: &SceneConfig) -> Result<Self, GeometryError> {
        let camera = CameraSpec {
            fov_radians: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            eye: Vec3::from_array(config.camera.position),
            target: Vec3::from_array(config.camera.target),
        };

        let ambient = AmbientLightSpec {
            color: config.lights.ambient.color,
            intensity: config.lights.ambient.intensity,
        };

        let spot_config = &config.lights.spot;
        let spot = SpotLightSpec {
            color: spot_config.color,
            intensity: spot_config.intensity,
            position: Vec3::from_array(spot_config.position),
            target: Vec3::ZERO,
            angle_radians: spot_config.angle_degrees.to_radians(),
            penumbra: spot_config.penumbra,
            decay: spot_config.decay,
            distance: spot_config.distance,
            cast_shadows: true,
            shadow_map_size: spot_config.shadow_map_size,
            shadow_near: spot_config.shadow_near,
        };

        let ground = MeshNode {
            name: "ground".to_string(),
            shape: Shape::Plane { size: config.ground.size },
            material: MaterialSpec::solid(config.ground.color),
            translation: Vec3::ZERO,
            shadows: ShadowFlags::RECEIVE,
        };

        let tree = &config.tree;
        let trunk = MeshNode {
            name: "trunk".to_string(),
            shape: Shape::Cylinder {
                radius: tree.trunk_radius,
                height: tree.trunk_height,
                segments: tree.trunk_segments,
            },
            material: MaterialSpec::solid(tree.trunk_color),
            // base resting on the ground
            translation: Vec3::new(0.0, tree.trunk_height / 2.0, 0.0),
            shadows: ShadowFlags::CAST,
        };

        let layout = foliage_layout(tree.levels);
        let tree_top = layout
            .top()
            .ok_or_else(|| GeometryError::InvalidParameter("tree needs at least one foliage level".to_string()))?;

        let foliage = layout
            .levels
            .iter()
            .map(|level| MeshNode {
                name: format!("foliage-{}", level.index),
                shape: Shape::Cone {
                    radius: level.radius,
                    height: level.height,
                    segments: tree.cone_segments,
                },
                material: MaterialSpec::solid(tree.foliage_color),
                translation: Vec3::new(0.0, level.y, 0.0),
                shadows: ShadowFlags::BOTH,
            })
            .collect();

        let star_config = &config.star;
        let mesh = star_mesh(star_config)?;
        let star = MeshNode {
            name: "star".to_string(),
            shape: Shape::Extruded {
                triangles: mesh.triangle_count(),
                mesh,
            },
            material: MaterialSpec {
                base_color: star_config.color,
                emissive: Some(star_config.emissive),
                emissive_intensity: star_config.emissive_intensity,
            },
            translation: Vec3::new(0.0, star_height(tree_top, star_config.offset), 0.0),
            shadows: ShadowFlags::CAST,
        };

        let pipeline = RenderPipeline::with_bloom(BloomSettings::from(&config.bloom));

        debug!(
            levels = tree.levels,
            tree_top,
            star_y = star.translation.y,
            "Scene description built"
        );

        Ok(Self {
            camera,
            controls: config.controls.clone(),
            ambient,
            spot,
            ground,
            trunk,
            foliage,
            star,
            pipeline,
            tree_top,
        })
    }

    /// All mesh nodes in insertion order
    pub fn mesh_nodes(&self) -> impl Iterator<Item = &MeshNode> {
        std::iter::once(&self.ground)
            .chain(std::iter::once(&self.trunk))
            .chain(self.foliage.iter())
            .chain(std::iter::once(&self.star))
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
