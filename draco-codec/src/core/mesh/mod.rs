pub mod builder;
pub mod metadata;

use super::attribute::{Attribute, AttributeId, AttributeType};
use super::shared::PointIdx;
use metadata::{GeometryMetadata, Metadata};

/// Represents a triangle mesh.
/// It consists of a list of faces, where each face is defined by three point indices, 
/// a list of attributes ([Attribute]) holding one value per point, and optional metadata.
/// An attribute is addressed by its position in the attribute list (its attribute id),
/// which is distinct from the unique id written in the bitstream.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub(crate) faces: Vec<[PointIdx; 3]>,
	pub(crate) attributes: Vec<Attribute>,
    pub(crate) num_points: usize,
    pub(crate) metadata: Option<GeometryMetadata>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get_faces(&self) -> &[[PointIdx; 3]] {
        &self.faces
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    #[inline]
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute(&self, att_id: usize) -> Option<&Attribute> {
        self.attributes.get(att_id)
    }

    /// Id of the first attribute of the given type.
    pub fn named_attribute_id(&self, att_type: AttributeType) -> Option<usize> {
        self.attributes.iter()
            .position(|att| att.get_attribute_type() == att_type)
    }

    pub fn named_attribute(&self, att_type: AttributeType) -> Option<&Attribute> {
        self.named_attribute_id(att_type)
            .map(|id| &self.attributes[id])
    }

    pub fn attribute_id_by_unique_id(&self, unique_id: AttributeId) -> Option<usize> {
        self.attributes.iter()
            .position(|att| att.get_id() == unique_id)
    }

    pub fn get_metadata(&self) -> Option<&GeometryMetadata> {
        self.metadata.as_ref()
    }

    /// Metadata attached to the attribute with the given attribute id.
    pub fn attribute_metadata(&self, att_id: usize) -> Option<&Metadata> {
        let unique_id = self.attributes.get(att_id)?.get_id();
        self.metadata.as_ref()?
            .get_attribute_metadata_by_unique_id(unique_id)
            .map(|m| m.metadata())
    }

    /// Id of the attribute whose metadata has the string entry `name` equal to `value`.
    /// When several attributes match, the first attribute metadata in the bitstream wins.
    pub fn attribute_id_by_metadata_entry(&self, name: &str, value: &str) -> Option<usize> {
        let att_metadata = self.metadata.as_ref()?
            .get_attribute_metadata_by_string_entry(name, value)?;
        self.attribute_id_by_unique_id(att_metadata.att_unique_id())
    }
}
