use draco_codec::core::mesh::metadata::Metadata;
use draco_codec::prelude::{
    decode, AttributeType, ConfigType, DecoderBuffer, EncodedGeometryType, Mesh
};

/// Error reported by a codec when a buffer cannot be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DecodeStatus {
    message: String,
}

impl DecodeStatus {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<decode::Err> for DecodeStatus {
    fn from(err: decode::Err) -> Self {
        Self::new(err.to_string())
    }
}

/// A mesh decoder. The pipeline depends on this trait only.
pub trait Codec {
    type Mesh: MeshHandle;

    /// Reads the geometry type from the header without consuming the buffer.
    fn encoded_geometry_type(&self, buffer: &DecoderBuffer<'_>) -> Result<EncodedGeometryType, DecodeStatus>;

    fn decode_mesh(&self, buffer: &mut DecoderBuffer<'_>) -> Result<Self::Mesh, DecodeStatus>;
}

/// Read access to a decoded mesh. Attribute ids run from 0 to `num_attributes() - 1`.
/// `None` means "not found" throughout.
pub trait MeshHandle {
    fn num_points(&self) -> usize;

    fn num_attributes(&self) -> usize;

    /// Id of the first attribute of the given semantic type.
    fn attribute_id(&self, att_type: AttributeType) -> Option<usize>;

    /// Id of the attribute whose metadata holds the string entry `key` equal to `value`.
    fn attribute_id_by_metadata_entry(&self, key: &str, value: &str) -> Option<usize>;

    fn attribute_metadata(&self, att_id: usize) -> Option<&Metadata>;

    /// Number of components per point of the attribute.
    fn attribute_num_components(&self, att_id: usize) -> Option<usize>;

    /// All values of the attribute as floats, `num_points * num_components` of them.
    fn attribute_float_for_all_points(&self, att_id: usize) -> Option<Vec<f32>>;
}

/// How an attribute is picked from a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    Semantic(AttributeType),
    MetadataEntry { key: String, value: String },
}

impl AttributeSelector {
    pub fn metadata_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        AttributeSelector::MetadataEntry { key: key.into(), value: value.into() }
    }

    pub fn resolve<M: MeshHandle>(&self, mesh: &M) -> Option<usize> {
        match self {
            AttributeSelector::Semantic(att_type) => mesh.attribute_id(*att_type),
            AttributeSelector::MetadataEntry { key, value } => mesh.attribute_id_by_metadata_entry(key, value),
        }
    }
}

/// [Codec] backed by the `draco-codec` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DracoCodec;

impl Codec for DracoCodec {
    type Mesh = Mesh;

    fn encoded_geometry_type(&self, buffer: &DecoderBuffer<'_>) -> Result<EncodedGeometryType, DecodeStatus> {
        Ok(decode::encoded_geometry_type(buffer)?)
    }

    fn decode_mesh(&self, buffer: &mut DecoderBuffer<'_>) -> Result<Mesh, DecodeStatus> {
        Ok(decode::decode_mesh(buffer, decode::Config::default())?)
    }
}

impl MeshHandle for Mesh {
    fn num_points(&self) -> usize {
        Mesh::num_points(self)
    }

    fn num_attributes(&self) -> usize {
        Mesh::num_attributes(self)
    }

    fn attribute_id(&self, att_type: AttributeType) -> Option<usize> {
        self.named_attribute_id(att_type)
    }

    fn attribute_id_by_metadata_entry(&self, key: &str, value: &str) -> Option<usize> {
        Mesh::attribute_id_by_metadata_entry(self, key, value)
    }

    fn attribute_metadata(&self, att_id: usize) -> Option<&Metadata> {
        Mesh::attribute_metadata(self, att_id)
    }

    fn attribute_num_components(&self, att_id: usize) -> Option<usize> {
        self.attribute(att_id).map(|att| att.get_num_components())
    }

    fn attribute_float_for_all_points(&self, att_id: usize) -> Option<Vec<f32>> {
        self.attribute(att_id).map(|att| att.float_values_for_all_points())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    #[test]
    fn selectors_resolve_against_the_sample() {
        let mesh = sample::sample_triangle().unwrap();
        assert_eq!(AttributeSelector::Semantic(AttributeType::Position).resolve(&mesh), Some(0));
        assert_eq!(AttributeSelector::Semantic(AttributeType::TextureCoordinate).resolve(&mesh), Some(1));
        assert_eq!(AttributeSelector::metadata_entry("name", "secondaryUvs").resolve(&mesh), Some(2));
        assert_eq!(AttributeSelector::metadata_entry("name", "tertiaryUvs").resolve(&mesh), None);
        assert_eq!(AttributeSelector::Semantic(AttributeType::Normal).resolve(&mesh), None);
    }

    #[test]
    fn draco_codec_reports_decode_errors() {
        let codec = DracoCodec;
        let data = b"DRACO\x09\x00\x01\x00\x00\x00";
        let status = codec.encoded_geometry_type(&DecoderBuffer::new(data)).unwrap_err();
        assert!(status.message().contains("version"), "{status}");
    }
}
