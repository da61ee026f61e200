use thiserror::Error;

use crate::core::attribute::{Attribute, AttributeId, AttributeType};
use crate::core::shared::PointIdx;
use super::metadata::{AttributeMetadata, GeometryMetadata, Metadata};
use super::Mesh;

pub struct MeshBuilder {
    attributes: Vec<Attribute>,
    faces: Vec<[PointIdx; 3]>,
    metadata: Option<GeometryMetadata>,
    current_id: usize,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            faces: Vec::new(),
            metadata: None,
            current_id: 0,
        }
    }

    /// Adds a float attribute with `num_components` values per point and returns its unique id.
    pub fn add_attribute(&mut self, values: &[f32], att_type: AttributeType, num_components: usize) -> AttributeId {
        let unique_id = AttributeId::new(self.current_id);
        self.attributes.push(
            Attribute::from_f32(unique_id, att_type, num_components, values)
        );
        self.current_id += 1;
        unique_id
    }

    pub fn set_connectivity_attribute(&mut self, faces: Vec<[PointIdx; 3]>) {
        self.faces = faces;
    }

    /// Sets the metadata of the whole geometry.
    pub fn set_metadata(&mut self, metadata: Metadata) {
        *self.metadata.get_or_insert_with(GeometryMetadata::default).metadata_mut() = metadata;
    }

    pub fn add_attribute_metadata(&mut self, id: AttributeId, metadata: Metadata) {
        self.metadata.get_or_insert_with(GeometryMetadata::default)
            .add_attribute_metadata(AttributeMetadata::new(id, metadata));
    }

    pub fn build(self) -> Result<Mesh, Err> {
        let Self { attributes, faces, metadata, .. } = self;

        for att in &attributes {
            if att.get_num_components() == 0 {
                return Err(Err::NoComponents(att.get_id()));
            }
            if att.as_bytes().len() % att.byte_stride() != 0 {
                return Err(Err::RaggedValues(att.get_id(), att.get_num_components()));
            }
        }

        let num_points = match attributes.first() {
            Some(first) => first.len(),
            None => faces.iter().flatten().map(|&i| i + 1).max().unwrap_or(0),
        };
        if let Some(att) = attributes.iter().find(|att| att.len() != num_points) {
            return Err(Err::PointCountMismatch(att.get_id(), att.len(), num_points));
        }

        if let Some(&point) = faces.iter().flatten().find(|&&i| i >= num_points) {
            return Err(Err::PositionAndConnectivityNotCompatible(point, num_points));
        }

        if let Some(metadata) = &metadata {
            for att_metadata in metadata.attribute_metadatas() {
                let id = att_metadata.att_unique_id();
                if !attributes.iter().any(|att| att.get_id() == id) {
                    return Err(Err::UnknownAttribute(id));
                }
            }
        }

        Ok(
            Mesh {
                faces,
                attributes,
                num_points,
                metadata,
            }
        )
    }
}

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("The attribute {0:?} has no components.")]
    NoComponents(AttributeId),

    #[error("The attribute {0:?} has {1} values, but the first attribute has {2}.")]
    PointCountMismatch(AttributeId, usize, usize),

    #[error("The connectivity refers to point {0}, but the mesh has only {1} points.")]
    PositionAndConnectivityNotCompatible(usize, usize),

    #[error("The number of values in attribute {0:?} is not a multiple of its {1} components.")]
    RaggedValues(AttributeId, usize),

    #[error("Metadata refers to an unknown attribute {0:?}.")]
    UnknownAttribute(AttributeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_triangle() {
        let mut builder = MeshBuilder::new();
        let pos = builder.add_attribute(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], AttributeType::Position, 3);
        let uv = builder.add_attribute(&[0.0, 0.0, 0.5, 0.5, 1.0, 1.0], AttributeType::TextureCoordinate, 2);
        builder.set_connectivity_attribute(vec![[0, 1, 2]]);
        let mut metadata = Metadata::new();
        metadata.add_entry_string("name", "primaryUvs");
        builder.add_attribute_metadata(uv, metadata);
        let mesh = builder.build().unwrap();

        assert_eq!(mesh.num_points(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_attributes(), 2);
        assert_eq!(mesh.attribute(0).unwrap().get_id(), pos);
        assert_eq!(mesh.named_attribute_id(AttributeType::TextureCoordinate), Some(1));
        assert_eq!(mesh.named_attribute_id(AttributeType::Normal), None);
        assert_eq!(mesh.attribute_id_by_metadata_entry("name", "primaryUvs"), Some(1));
        assert_eq!(mesh.attribute_metadata(1).unwrap().get_entry_string("name"), Some("primaryUvs"));
        assert!(mesh.attribute_metadata(0).is_none());
        assert!(mesh.attribute_metadata(9).is_none());
    }

    #[test]
    fn rejects_inconsistent_input() {
        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 9], AttributeType::Position, 3);
        builder.add_attribute(&[0.0; 4], AttributeType::TextureCoordinate, 2);
        assert!(matches!(builder.build(), Err(Err::PointCountMismatch(_, 2, 3))));

        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 8], AttributeType::Position, 3);
        assert!(matches!(builder.build(), Err(Err::RaggedValues(..))));

        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 9], AttributeType::Position, 3);
        builder.set_connectivity_attribute(vec![[0, 1, 3]]);
        assert!(matches!(builder.build(), Err(Err::PositionAndConnectivityNotCompatible(3, 3))));

        let mut builder = MeshBuilder::new();
        builder.add_attribute(&[0.0; 9], AttributeType::Position, 3);
        builder.add_attribute_metadata(AttributeId::new(5), Metadata::new());
        assert!(matches!(builder.build(), Err(Err::UnknownAttribute(_))));
    }
}
