pub(crate) mod header;
pub(crate) mod metadata;
pub(crate) mod connectivity;
pub(crate) mod attribute;
pub(crate) mod entropy;

use crate::core::attribute::AttributeType;
use crate::core::mesh::Mesh;
use crate::core::shared::ConfigType;
use crate::core::bit_coder::ByteWriter;
use thiserror::Error;

pub use crate::shared::attribute::PredictionMethod;

#[derive(Debug, Clone)]
pub struct Config {
    attribute_encoder_cfg: attribute::Config,
    compressed_connectivity: bool,
}

impl Config {
    /// Quantizes float attributes of the given type to `bits` bits per component.
    /// Attributes of types without a setting are stored losslessly.
    pub fn with_quantization(mut self, att_type: AttributeType, bits: u8) -> Self {
        self.attribute_encoder_cfg.quantization.retain(|(ty, _)| *ty != att_type);
        self.attribute_encoder_cfg.quantization.push((att_type, bits));
        self
    }

    pub fn with_prediction(mut self, prediction: PredictionMethod) -> Self {
        self.attribute_encoder_cfg.prediction = prediction;
        self
    }

    /// Entropy codes the face indices and the integer attribute values.
    pub fn with_entropy_coding(mut self, enabled: bool) -> Self {
        self.attribute_encoder_cfg.entropy_coding = enabled;
        self.compressed_connectivity = enabled;
        self
    }
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            attribute_encoder_cfg: attribute::Config::default(),
            compressed_connectivity: false,
        }
    }
}

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Attribute encoding error: {0}")]
    AttributeError(#[from] attribute::Err),
    #[error("Connectivity encoding error: {0}")]
    ConnectivityError(#[from] crate::shared::entropy::Err),
    #[error("Metadata encoding error: {0}")]
    MetadataError(#[from] metadata::Err),
}


/// Encodes the input mesh into a provided byte stream using the provided configuration.
/// The output is a sequential Draco mesh of the latest supported bitstream version.
pub fn encode<W>(mesh: &Mesh, writer: &mut W, cfg: Config) -> Result<(), Err> 
    where W: ByteWriter
{
    // Encode header
    header::encode_header(writer, mesh.get_metadata().is_some());

    // Encode metadata
    if let Some(metadata) = mesh.get_metadata() {
        metadata::encode_metadata(metadata, writer)?;
    }

    // Encode connectivity
    connectivity::encode_connectivity(mesh.get_faces(), mesh.num_points(), cfg.compressed_connectivity, writer)?;

    // Encode attributes
    attribute::encode_attributes(mesh.get_attributes(), mesh.num_points(), writer, &cfg.attribute_encoder_cfg)?;

    Ok(())
}
