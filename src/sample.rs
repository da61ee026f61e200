use draco_codec::core::mesh::builder;
use draco_codec::prelude::{encode, AttributeType, ConfigType, Mesh, MeshBuilder, Metadata};

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Failed to build the sample mesh: {0}")]
    BuildError(#[from] builder::Err),
    #[error("Failed to encode the sample mesh: {0}")]
    EncodeError(#[from] encode::Err),
}

pub const SAMPLE_POSITIONS: [f32; 9] = [
    0.0, 0.0, 0.0,
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
];
pub const SAMPLE_UVS: [f32; 6] = [
    0.0, 0.0,
    0.5, 0.5,
    1.0, 1.0,
];
pub const SAMPLE_UVS2: [f32; 6] = [
    0.1, 0.1,
    0.6, 0.6,
    0.9, 0.9,
];

/// A single triangle with positions, uvs, and secondary uvs tagged
/// `name = "secondaryUvs"` and `custom_id = 44`.
pub fn sample_triangle() -> Result<Mesh, builder::Err> {
    let mut builder = MeshBuilder::new();
    builder.add_attribute(&SAMPLE_POSITIONS, AttributeType::Position, 3);
    builder.add_attribute(&SAMPLE_UVS, AttributeType::TextureCoordinate, 2);
    let uv2 = builder.add_attribute(&SAMPLE_UVS2, AttributeType::TextureCoordinate, 2);
    builder.set_connectivity_attribute(vec![[0, 1, 2]]);

    let mut metadata = Metadata::new();
    metadata.add_entry_string("name", "secondaryUvs");
    metadata.add_entry_int("custom_id", 44);
    builder.add_attribute_metadata(uv2, metadata);

    builder.build()
}

/// Encodes [sample_triangle]. With `quantization_bits` set, positions and
/// both uv sets are quantized to that many bits.
pub fn sample_artifact(quantization_bits: Option<u8>) -> Result<Vec<u8>, Err> {
    let mut cfg = encode::Config::default();
    if let Some(bits) = quantization_bits {
        cfg = cfg
            .with_quantization(AttributeType::Position, bits)
            .with_quantization(AttributeType::TextureCoordinate, bits);
    }
    let mut out = Vec::new();
    encode::encode(&sample_triangle()?, &mut out, cfg)?;
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bits_are_an_error() {
        assert!(matches!(sample_artifact(Some(0)), Err(Err::EncodeError(_))));
        assert!(sample_artifact(Some(31)).is_err());
        assert!(sample_artifact(Some(30)).is_ok());
    }
}
