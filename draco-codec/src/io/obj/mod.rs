// use tobj to load the obj file and convert it to our internal mesh representation
use crate::prelude::{AttributeType, MeshBuilder};
use crate::Mesh;
use std::fmt::Debug;
use std::path::Path;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Failed to load OBJ file: {0}")]
    LoadError(#[from] tobj::LoadError),
    #[error("Mesh Builder Error: {0}")]
    MeshBuilderError(#[from] crate::core::mesh::builder::Err),
    #[error("The OBJ file contains no model")]
    NoModel,
}

/// Loads the first model of an OBJ file as a triangle mesh.
/// Polygons are triangulated, and positions, normals, and texture coordinates
/// are merged into a single index so every attribute has one value per point.
pub fn load_obj<P: AsRef<Path> + Debug>(path: P) -> Result<Mesh, Err> {
    let op = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &op)?;
    let model = models.first().ok_or(Err::NoModel)?;
    let faces = model.mesh.indices.chunks_exact(3)
        .map(|x| [x[0] as usize, x[1] as usize, x[2] as usize])
        .collect::<Vec<_>>();

    let mut builder = MeshBuilder::new();
    builder.set_connectivity_attribute(faces);
    builder.add_attribute(&model.mesh.positions, AttributeType::Position, 3);
    if !model.mesh.normals.is_empty() {
        builder.add_attribute(&model.mesh.normals, AttributeType::Normal, 3);
    }
    if !model.mesh.texcoords.is_empty() {
        builder.add_attribute(&model.mesh.texcoords, AttributeType::TextureCoordinate, 2);
    }

    Ok(builder.build()?)
}
