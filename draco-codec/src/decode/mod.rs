pub(crate) mod header;
pub(crate) mod metadata;
pub(crate) mod connectivity;
pub(crate) mod attribute;
pub(crate) mod entropy;

use crate::core::buffer::DecoderBuffer;
use crate::core::mesh::Mesh;
use crate::prelude::ConfigType;
use crate::shared::header::EncodedGeometryType;
use tracing::debug;

/// Reads the header from a copy of the buffer and returns the geometry type it declares.
/// The buffer itself is not advanced.
pub fn encoded_geometry_type(buffer: &DecoderBuffer<'_>) -> Result<EncodedGeometryType, Err> {
    let mut peek = buffer.clone();
    let header = header::decode_header(&mut peek)?;
    Ok(header.geometry_type)
}

/// Decodes a triangle mesh from the buffer.
pub fn decode_mesh(buffer: &mut DecoderBuffer<'_>, cfg: Config) -> Result<Mesh, Err> {
    // Decode header
    let header = header::decode_header(buffer)?;
    if header.geometry_type != EncodedGeometryType::TriangularMesh {
        return Err(Err::NotAMesh(header.geometry_type));
    }
    debug!(
        version = %format_args!("{}.{}", header.version_major, header.version_minor),
        method = ?header.encoding_method,
        "decoded header"
    );

    // Decode metadata
    let metadata = if header.contains_metadata {
        let metadata = metadata::decode_metadata(buffer)?;
        debug!(num_attribute_metadata = metadata.attribute_metadatas().len(), "decoded metadata");
        Some(metadata)
    } else {
        None
    };

    // Decode connectivity
    let connectivity = connectivity::decode_connectivity(buffer, &header)?;
    debug!(num_faces = connectivity.faces.len(), num_points = connectivity.num_points, "decoded connectivity");

    // Decode attributes
    let attributes = attribute::decode_attributes(buffer, &connectivity, &cfg.attribute_decoder_cfg)?;
    debug!(num_attributes = attributes.len(), remaining = buffer.remaining_size(), "decoded attributes");

    Ok(
        Mesh {
            faces: connectivity.faces,
            attributes,
            num_points: connectivity.num_points,
            metadata,
        }
    )
}


#[derive(Debug, Clone)]
pub struct Config {
    attribute_decoder_cfg: attribute::Config,
}

impl Config {
    /// Keeps quantized attributes as integers instead of restoring their float values.
    pub fn leave_quantized(mut self, leave: bool) -> Self {
        self.attribute_decoder_cfg.leave_quantized = leave;
        self
    }
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            attribute_decoder_cfg: attribute::Config::default(),
        }
    }
}


#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Attribute decoding error: {0}")]
    AttributeError(#[from] attribute::Err),
    #[error("Connectivity decoding error: {0}")]
    ConnectivityError(#[from] connectivity::Err),
    #[error("Header decoding error: {0}")]
    HeaderError(#[from] header::Err),
    #[error("Metadata decoding error: {0}")]
    MetadataError(#[from] metadata::Err),
    #[error("The input is a {0:?}, not a triangular mesh")]
    NotAMesh(EncodedGeometryType),
}
