//! Conversion of scene shapes into Bevy meshes

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use evergreen_core::{MeshData, Shape};

/// Build the Bevy mesh for a shape
pub fn shape_mesh(shape: &Shape) -> Mesh {
    match shape {
        Shape::Plane { size } => Plane3d::default().mesh().size(*size, *size).build(),
        Shape::Cylinder { radius, height, segments } => Cylinder::new(*radius, *height)
            .mesh()
            .resolution(*segments)
            .build(),
        Shape::Cone { radius, height, segments } => Cone::new(*radius, *height)
            .mesh()
            .resolution(*segments)
            .build(),
        Shape::Extruded { mesh, .. } => mesh_from_data(mesh),
    }
}

/// Upload prebuilt triangle buffers as a Bevy mesh
pub fn mesh_from_data(data: &MeshData) -> Mesh {
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone())
        .with_inserted_indices(Indices::U32(data.indices.clone()))
}
